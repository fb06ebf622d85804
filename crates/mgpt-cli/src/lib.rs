//! Terminal chat interface for Mahabharat GPT
//!
//! Session state, the shortcut catalog, the retrieve-then-generate handler
//! and the terminal rendering helpers used by the `mgpt` binary.

mod command;
mod config;
mod engine;
mod handler;
mod markdown;
mod prompt;
mod session;
mod shortcuts;
mod ui;


pub use command::{parse_command, ReplCommand};
pub use config::{
    AppConfig, DEFAULT_DB_PATH, DEFAULT_QDRANT_COLLECTION, DEFAULT_QDRANT_URL, DEFAULT_TOP_K,
};
pub use engine::{Engine, IndexStatus};
pub use handler::ChatHandler;
pub use markdown::render_markdown;
pub use prompt::{build_system_instruction, Script, ScriptDetector, PERSONA, RULES};
pub use session::{ChatSession, GREETING};
pub use shortcuts::{find_shortcut, shortcuts, shortcuts_in, Shortcut, ShortcutGroup, SHORTCUTS};
pub use ui::{
    clear_screen, clear_thinking, display_banner, format_turn, handle_input_with_history,
    print_error, print_help, print_history, print_queued_query, print_shortcuts, print_turn,
    print_warning, show_thinking,
};

// Re-export core types
pub use mgpt_core::{ChatTurn, Conversation, Error, Result, Role};
