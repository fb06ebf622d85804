//! Interpretation of a line typed at the prompt

/// What the user asked the REPL to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Empty,
    Exit,
    Help,
    History,
    Shortcuts,
    Clear,
    /// `/ask <number|name>`
    Shortcut(String),
    /// A slash command we do not know
    Unknown(String),
    /// Free text question
    Query(String),
}

pub fn parse_command(input: &str) -> ReplCommand {
    let input = input.trim();
    if input.is_empty() {
        return ReplCommand::Empty;
    }

    let lower = input.to_lowercase();
    match lower.as_str() {
        "exit" | "quit" | "/exit" | "/quit" => return ReplCommand::Exit,
        "help" | "/help" | "?" => return ReplCommand::Help,
        _ => {}
    }

    let Some(rest) = input.strip_prefix('/') else {
        return ReplCommand::Query(input.to_string());
    };

    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };

    match name.to_lowercase().as_str() {
        "history" | "h" => ReplCommand::History,
        "shortcuts" | "s" => ReplCommand::Shortcuts,
        "clear" => ReplCommand::Clear,
        "ask" | "a" if arg.is_empty() => ReplCommand::Shortcuts,
        "ask" | "a" => ReplCommand::Shortcut(arg.to_string()),
        _ => ReplCommand::Unknown(input.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_builtin_commands() {
        assert_eq!(parse_command("  "), ReplCommand::Empty);
        assert_eq!(parse_command("QUIT"), ReplCommand::Exit);
        assert_eq!(parse_command("/help"), ReplCommand::Help);
        assert_eq!(parse_command("/history"), ReplCommand::History);
        assert_eq!(parse_command("/s"), ReplCommand::Shortcuts);
        assert_eq!(parse_command("/clear"), ReplCommand::Clear);
    }

    #[test]
    fn test_parse_shortcut_activation() {
        assert_eq!(parse_command("/ask 3"), ReplCommand::Shortcut("3".to_string()));
        assert_eq!(
            parse_command("/ask  Arjuna (Warrior) "),
            ReplCommand::Shortcut("Arjuna (Warrior)".to_string())
        );
        assert_eq!(parse_command("/ask"), ReplCommand::Shortcuts);
    }

    #[test]
    fn test_parse_free_text() {
        assert_eq!(
            parse_command("Karna kaun tha"),
            ReplCommand::Query("Karna kaun tha".to_string())
        );
        assert_eq!(
            parse_command("/karna"),
            ReplCommand::Unknown("/karna".to_string())
        );
    }
}
