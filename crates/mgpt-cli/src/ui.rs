//! UI utilities for the terminal chat

use chrono::Local;
use colored::*;
use crossterm::{
    cursor::MoveToColumn,
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, size, Clear, ClearType},
};
use std::io::{self, IsTerminal, Write};

use crate::markdown::render_markdown;
use crate::shortcuts::{shortcuts_in, ShortcutGroup};
use mgpt_core::{ChatTurn, Conversation, Result, Role};

const PROMPT: &str = "sanjaya>";
const USER_AVATAR: &str = "🙏";
const ASSISTANT_AVATAR: &str = "🪔";

/// Display the startup banner
pub fn display_banner() {
    let terminal_width = size().map(|(w, _)| w as usize).unwrap_or(80);
    let banner_width = std::cmp::min(60, terminal_width.saturating_sub(4)).max(40);

    let top_border = format!("┌{}┐", "─".repeat(banner_width - 2));
    let bottom_border = format!("└{}┘", "─".repeat(banner_width - 2));
    let empty_line = format!("│{}│", " ".repeat(banner_width - 2));

    let boxed = |text: &str| {
        let width = text.chars().count();
        format!("│  {}{}│", text, " ".repeat(banner_width.saturating_sub(width + 4)))
    };

    println!();
    println!("{}", top_border.yellow());
    println!("{}", empty_line.yellow());
    println!("{}", boxed("MAHABHARAT GPT").yellow().bold());
    println!("{}", boxed("“Wisdom from the Itihasa”").yellow().italic());
    println!("{}", empty_line.yellow());
    println!("{}", bottom_border.yellow());
    println!();
    println!(
        "{}",
        "💡 Tip: Type in English or Hinglish! '/s' lists the chronicles, 'help' shows commands"
            .dimmed()
    );
    println!();
}

/// Handle input with question history navigation
pub async fn handle_input_with_history(history: &mut Vec<String>) -> Result<String> {
    // Piped input: read a line directly
    if !io::stdin().is_terminal() {
        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            return Ok("exit".to_string());
        }
        let input = input.trim().to_string();
        if !input.is_empty() {
            history.push(input.clone());
        }
        return Ok(input);
    }

    enable_raw_mode()?;
    let result = read_line_raw(history);
    disable_raw_mode()?;
    println!();
    result
}

fn redraw(input: &str) -> Result<()> {
    let mut stdout = io::stdout();
    execute!(stdout, MoveToColumn(0), Clear(ClearType::CurrentLine))?;
    print!("{} {}", PROMPT.green().bold(), input);
    stdout.flush()?;
    Ok(())
}

fn read_line_raw(history: &mut Vec<String>) -> Result<String> {
    let mut input = String::new();
    let mut history_index: Option<usize> = None;

    redraw(&input)?;

    loop {
        let Event::Key(key_event) = event::read()? else {
            continue;
        };
        if key_event.kind != KeyEventKind::Press {
            continue;
        }

        match key_event.code {
            KeyCode::Char('c') | KeyCode::Char('d')
                if key_event.modifiers.contains(KeyModifiers::CONTROL) =>
            {
                return Ok("exit".to_string());
            }
            KeyCode::Enter => {
                if !input.trim().is_empty() {
                    history.push(input.clone());
                }
                return Ok(input);
            }
            KeyCode::Char(c) => {
                input.push(c);
                redraw(&input)?;
            }
            KeyCode::Backspace => {
                if input.pop().is_some() {
                    redraw(&input)?;
                }
            }
            KeyCode::Up => {
                if !history.is_empty() {
                    let new_index = match history_index {
                        None => history.len() - 1,
                        Some(idx) if idx > 0 => idx - 1,
                        Some(idx) => idx,
                    };
                    history_index = Some(new_index);
                    input = history[new_index].clone();
                    redraw(&input)?;
                }
            }
            KeyCode::Down => {
                if let Some(idx) = history_index {
                    if idx + 1 < history.len() {
                        history_index = Some(idx + 1);
                        input = history[idx + 1].clone();
                    } else {
                        history_index = None;
                        input.clear();
                    }
                    redraw(&input)?;
                }
            }
            KeyCode::Esc => return Ok(String::new()),
            _ => {}
        }
    }
}

/// Display help message
pub fn print_help() {
    println!("{}", "Available commands:".bold());
    println!("  {} - Ask Sanjaya anything about the Mahabharata", "question".green());
    println!("  {} - List the chronicles (shortcut questions)", "/shortcuts, /s".green());
    println!("  {} - Ask a chronicle by number or name", "/ask <n|name>".green());
    println!("  {} - Show the conversation so far", "/history".green());
    println!("  {} - Clear the screen (history is kept)", "/clear".green());
    println!("  {} - Show this help message", "help".green());
    println!("  {} - Leave the chat", "exit/quit".green());
    println!();
    println!("{}", "Examples:".bold());
    println!("  Karna kaun tha?");
    println!("  Why did Bhishma take his vow?");
    println!("  /ask arjuna");
}

/// Display the shortcut catalog grouped by section
pub fn print_shortcuts() {
    println!("{}", "📜 Chronicles".bold());
    for group in ShortcutGroup::ALL {
        println!();
        println!("{}", group.title().yellow().bold());
        for (number, shortcut) in shortcuts_in(group) {
            println!("  {:>2}. {}", number.to_string().cyan(), shortcut.label);
        }
    }
    println!();
    println!("{}", "Use /ask <number> or /ask <name> to ask one.".dimmed());
}

/// Format one turn as it appears in the transcript
pub fn format_turn(turn: &ChatTurn) -> String {
    let time = turn.at().with_timezone(&Local).format("%H:%M").to_string();
    match turn.role() {
        Role::User => format!("{} {} {}", USER_AVATAR, time.dimmed(), turn.text().bold()),
        Role::Assistant => format!(
            "{} {} {}",
            ASSISTANT_AVATAR,
            time.dimmed(),
            render_markdown(turn.text())
        ),
    }
}

pub fn print_turn(turn: &ChatTurn) {
    println!("{}", format_turn(turn));
    println!();
}

/// Print every turn of the conversation in order
pub fn print_history(conversation: &Conversation) {
    for turn in conversation.turns() {
        print_turn(turn);
    }
}

/// Echo a question the user did not type (queued by a shortcut)
pub fn print_queued_query(query: &str) {
    println!("{} {}", USER_AVATAR, query.bold());
}

pub fn show_thinking() -> Result<()> {
    print!("{} {}", ASSISTANT_AVATAR, "Meditating on the scriptures...".dimmed().italic());
    io::stdout().flush()?;
    Ok(())
}

pub fn clear_thinking() -> Result<()> {
    execute!(io::stdout(), MoveToColumn(0), Clear(ClearType::CurrentLine))?;
    Ok(())
}

pub fn clear_screen() -> Result<()> {
    execute!(io::stdout(), Clear(ClearType::All), crossterm::cursor::MoveTo(0, 0))?;
    Ok(())
}

pub fn print_error(message: &str) {
    eprintln!("{} {}", "❌".red(), message.red());
}

pub fn print_warning(message: &str) {
    println!("{} {}", "⚠️".yellow(), message.yellow());
}
