//! System instruction assembly

use regex::Regex;

/// Writing system a query was typed in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Script {
    /// Latin letters, including romanised Hindi ("Karna kaun tha")
    Latin,
    Devanagari,
    /// Any other non-Latin script
    Other,
}

impl Script {
    fn reply_hint(&self) -> &'static str {
        match self {
            Script::Latin => "The seeker wrote in Latin script; reply in Latin script.",
            Script::Devanagari => {
                "The seeker wrote in Devanagari script; reply in Devanagari script."
            }
            Script::Other => "The seeker wrote in a non-Latin script; reply in that same script.",
        }
    }
}

/// Detects the script of a query
pub struct ScriptDetector {
    devanagari: Option<Regex>,
    non_latin_letter: Option<Regex>,
}

impl ScriptDetector {
    pub fn new() -> Self {
        Self {
            devanagari: Regex::new(r"\p{Devanagari}").ok(),
            non_latin_letter: Regex::new(r"[\p{L}&&\P{Latin}]").ok(),
        }
    }

    /// Latin unless the query contains letters from another script.
    /// Text with no letters at all counts as Latin.
    pub fn detect(&self, query: &str) -> Script {
        let matches = |re: &Option<Regex>| re.as_ref().is_some_and(|r| r.is_match(query));

        if matches(&self.devanagari) {
            Script::Devanagari
        } else if matches(&self.non_latin_letter) {
            Script::Other
        } else {
            Script::Latin
        }
    }
}

impl Default for ScriptDetector {
    fn default() -> Self {
        Self::new()
    }
}

pub const PERSONA: &str = "You are Sanjaya, the wise narrator of the Mahabharata.";

pub const RULES: [&str; 4] = [
    "1. LANGUAGE: Match the user's language (English, Hindi, or Hinglish).",
    "2. SCRIPT: If user types in Latin script (e.g. 'Karna kaun tha'), use Latin script (Hinglish). Do NOT use Devanagari unless user does.",
    "3. TONE: Respectful, epic, like a Rishi.",
    "4. CONTENT: Answer strictly based on context.",
];

/// Build the instruction sent ahead of the conversation on every request
pub fn build_system_instruction(context: &str, script: Script) -> String {
    let mut instruction = String::new();
    instruction.push_str(PERSONA);
    instruction.push('\n');
    instruction.push_str("CONTEXT:\n");
    instruction.push_str(context);
    instruction.push_str("\n\nRULES:\n");
    for rule in RULES {
        instruction.push_str(rule);
        instruction.push('\n');
    }
    instruction.push_str(script.reply_hint());
    instruction
}
