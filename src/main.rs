use anyhow::Result;
use clap::Parser;
use colored::*;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use mgpt_cli::{
    clear_screen, clear_thinking, display_banner, find_shortcut, handle_input_with_history,
    parse_command, print_error, print_help, print_history, print_queued_query, print_shortcuts,
    print_turn, print_warning, show_thinking, AppConfig, ChatHandler, ChatSession, Engine,
    IndexStatus, ReplCommand, Shortcut,
};

#[derive(Parser)]
#[command(name = "mgpt")]
#[command(about = "Ask Sanjaya about the Mahabharata", long_about = None)]
struct Cli {
    /// Ask a single question and exit
    #[arg(short, long)]
    ask: Option<String>,

    /// Ask a shortcut question by number or name and exit
    #[arg(short, long)]
    shortcut: Option<String>,

    /// List the shortcut questions and exit
    #[arg(long)]
    list_shortcuts: bool,

    /// Directory holding the local index
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// Number of passages retrieved per question
    #[arg(short = 'k', long)]
    top_k: Option<usize>,

    /// Gemini chat model
    #[arg(short, long)]
    model: Option<String>,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> mgpt_cli::Result<AppConfig> {
    let mut config = AppConfig::from_env()?;
    if let Some(dir) = &cli.db_path {
        config = config.with_db_path(dir);
    }
    if let Some(k) = cli.top_k {
        config = config.with_top_k(k)?;
    }
    if let Some(model) = &cli.model {
        config = config.with_chat_model(model);
    }
    Ok(config)
}

fn resolve_shortcut(key: &str) -> Option<&'static Shortcut> {
    let found = find_shortcut(key);
    if found.is_none() {
        print_error(&format!(
            "No single chronicle matches '{}'. Type /s to list them.",
            key
        ));
    }
    found
}

/// Answer one question, print the reply and report whether the loop may go on
async fn ask(handler: &ChatHandler, session: &mut ChatSession, query: &str) -> Result<bool> {
    show_thinking()?;
    let outcome = handler.handle(session, query).await;
    clear_thinking()?;

    match outcome {
        Ok(_) => {
            if let Some(turn) = session.turns().last() {
                print_turn(turn);
            }
            Ok(true)
        }
        Err(e) if e.is_fatal() => {
            print_error(&e.to_string());
            Ok(false)
        }
        Err(e) => {
            print_error(&format!("Sanjaya could not answer: {}", e));
            Ok(true)
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();
    let cli = Cli::parse();

    if cli.list_shortcuts {
        print_shortcuts();
        return Ok(());
    }

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            print_error(&e.to_string());
            std::process::exit(1);
        }
    };

    info!(
        model = %config.gemini.chat_model,
        index = %config.index,
        top_k = config.top_k,
        "Starting"
    );
    let engine = Arc::new(Engine::start(&config).await?);
    let handler = ChatHandler::new(engine.clone());

    // One-shot mode
    let one_shot = match (&cli.ask, &cli.shortcut) {
        (Some(query), _) => Some(query.clone()),
        (None, Some(key)) => match resolve_shortcut(key) {
            Some(shortcut) => Some(shortcut.query.to_string()),
            None => std::process::exit(2),
        },
        (None, None) => None,
    };
    if let Some(query) = one_shot {
        let reply = handler.answer_once(&query).await?;
        println!("{}", mgpt_cli::render_markdown(&reply));
        return Ok(());
    }

    // Interactive mode
    display_banner();

    if let IndexStatus::Unavailable(reason) = engine.index_status() {
        print_warning(
            "The Sacred Texts (Database) are missing. Build the index before consulting Sanjaya.",
        );
        print_error(reason);
        std::process::exit(1);
    }

    let mut session = ChatSession::started();
    print_history(session.conversation());

    let mut history = Vec::new();

    loop {
        let query = match session.take_pending() {
            Some(query) => {
                print_queued_query(&query);
                query
            }
            None => {
                let input = handle_input_with_history(&mut history).await?;
                match parse_command(&input) {
                    ReplCommand::Empty => continue,
                    ReplCommand::Exit => {
                        println!("{}", "🙏 May dharma guide you. Farewell!".green());
                        break;
                    }
                    ReplCommand::Help => {
                        print_help();
                        continue;
                    }
                    ReplCommand::History => {
                        print_history(session.conversation());
                        continue;
                    }
                    ReplCommand::Shortcuts => {
                        print_shortcuts();
                        continue;
                    }
                    ReplCommand::Clear => {
                        clear_screen()?;
                        continue;
                    }
                    ReplCommand::Shortcut(key) => {
                        if let Some(shortcut) = resolve_shortcut(&key) {
                            session.queue_shortcut(shortcut);
                        }
                        continue;
                    }
                    ReplCommand::Unknown(cmd) => {
                        print_error(&format!("Unknown command '{}'. Type help.", cmd));
                        continue;
                    }
                    ReplCommand::Query(query) => query,
                }
            }
        };

        if !ask(&handler, &mut session, &query).await? {
            break;
        }
    }

    Ok(())
}
