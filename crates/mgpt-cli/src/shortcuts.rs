//! Shortcut catalog: character names bound to canned questions

use serde::Serialize;

/// Section of the shortcut menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ShortcutGroup {
    Pandavas,
    Kauravas,
    EldersAndDivine,
}

impl ShortcutGroup {
    pub const ALL: [ShortcutGroup; 3] = [
        ShortcutGroup::Pandavas,
        ShortcutGroup::Kauravas,
        ShortcutGroup::EldersAndDivine,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            ShortcutGroup::Pandavas => "⚜️  The Pandavas",
            ShortcutGroup::Kauravas => "🐍 The Kauravas",
            ShortcutGroup::EldersAndDivine => "👴 Elders & Divine",
        }
    }
}

/// A pre-authored question bound to a menu entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Shortcut {
    pub group: ShortcutGroup,
    pub label: &'static str,
    pub query: &'static str,
}

const fn shortcut(group: ShortcutGroup, label: &'static str, query: &'static str) -> Shortcut {
    Shortcut {
        group,
        label,
        query,
    }
}

pub const SHORTCUTS: [Shortcut; 12] = [
    shortcut(
        ShortcutGroup::Pandavas,
        "Yudhishthira (Dharma)",
        "Tell me about Yudhishthira's adherence to Truth and the game of dice.",
    ),
    shortcut(
        ShortcutGroup::Pandavas,
        "Bhima (Strength)",
        "Describe Bhima's immense strength and his vows.",
    ),
    shortcut(
        ShortcutGroup::Pandavas,
        "Arjuna (Warrior)",
        "Describe Arjuna's skills, the Gandiva bow, and his bond with Krishna.",
    ),
    shortcut(
        ShortcutGroup::Pandavas,
        "Nakula & Sahadeva",
        "What were the special skills and roles of Nakula and Sahadeva?",
    ),
    shortcut(
        ShortcutGroup::Pandavas,
        "Draupadi (Panchali)",
        "Tell me about Draupadi's birth from fire and her resilience.",
    ),
    shortcut(
        ShortcutGroup::Kauravas,
        "Duryodhana (King)",
        "Explain Duryodhana's motivations, his jealousy, and his friendship with Karna.",
    ),
    shortcut(
        ShortcutGroup::Kauravas,
        "Karna (Tragic Hero)",
        "Tell me about Karna's tragic life, his charity (Daan), and his armor (Kavach).",
    ),
    shortcut(
        ShortcutGroup::Kauravas,
        "Shakuni (Planner)",
        "What was Shakuni's role in the game of dice and influencing Duryodhana?",
    ),
    shortcut(
        ShortcutGroup::Kauravas,
        "Dushasana",
        "What was Dushasana's role in the court and his fate in the war?",
    ),
    shortcut(
        ShortcutGroup::EldersAndDivine,
        "Krishna (Divine)",
        "Describe the role of Krishna as the charioteer and his divinity.",
    ),
    shortcut(
        ShortcutGroup::EldersAndDivine,
        "Bhishma (Grandsire)",
        "What was Bhishma's vow of celibacy and his role as the commander?",
    ),
    shortcut(
        ShortcutGroup::EldersAndDivine,
        "Guru Drona",
        "Tell me about Dronacharya as the teacher of both clans and his death.",
    ),
];

pub fn shortcuts() -> &'static [Shortcut] {
    &SHORTCUTS
}

/// Shortcuts of one group, paired with their 1-based menu number
pub fn shortcuts_in(group: ShortcutGroup) -> impl Iterator<Item = (usize, &'static Shortcut)> {
    SHORTCUTS
        .iter()
        .enumerate()
        .filter(move |(_, s)| s.group == group)
        .map(|(i, s)| (i + 1, s))
}

fn label_words(label: &str) -> impl Iterator<Item = String> + '_ {
    label
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
}

/// Resolve a menu number, a full label, or the start of any word in a label.
///
/// Returns `None` when nothing or more than one shortcut matches.
pub fn find_shortcut(key: &str) -> Option<&'static Shortcut> {
    let key = key.trim();
    if key.is_empty() {
        return None;
    }

    if let Ok(n) = key.parse::<usize>() {
        return n.checked_sub(1).and_then(|i| SHORTCUTS.get(i));
    }

    if let Some(exact) = SHORTCUTS.iter().find(|s| s.label.eq_ignore_ascii_case(key)) {
        return Some(exact);
    }

    let key = key.to_lowercase();
    let mut matches = SHORTCUTS
        .iter()
        .filter(|s| label_words(s.label).any(|w| w.starts_with(&key)));

    match (matches.next(), matches.next()) {
        (Some(only), None) => Some(only),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_groups() {
        assert_eq!(shortcuts_in(ShortcutGroup::Pandavas).count(), 5);
        assert_eq!(shortcuts_in(ShortcutGroup::Kauravas).count(), 4);
        assert_eq!(shortcuts_in(ShortcutGroup::EldersAndDivine).count(), 3);
        let total: usize = ShortcutGroup::ALL
            .iter()
            .map(|g| shortcuts_in(*g).count())
            .sum();
        assert_eq!(total, shortcuts().len());
    }

    #[test]
    fn test_find_by_number() {
        assert_eq!(find_shortcut("3").unwrap().label, "Arjuna (Warrior)");
        assert_eq!(find_shortcut("12").unwrap().label, "Guru Drona");
        assert!(find_shortcut("0").is_none());
        assert!(find_shortcut("13").is_none());
    }

    #[test]
    fn test_find_by_label_and_word() {
        assert_eq!(find_shortcut("arjuna (warrior)").unwrap().label, "Arjuna (Warrior)");
        assert_eq!(find_shortcut("Karna").unwrap().label, "Karna (Tragic Hero)");
        assert_eq!(find_shortcut("sahadeva").unwrap().label, "Nakula & Sahadeva");
        assert_eq!(find_shortcut("drona").unwrap().label, "Guru Drona");
    }

    #[test]
    fn test_ambiguous_or_unknown() {
        // "d" starts Draupadi, Duryodhana, Dushasana, Dharma, Divine and Drona
        assert!(find_shortcut("d").is_none());
        assert!(find_shortcut("ghatotkacha").is_none());
        assert!(find_shortcut("   ").is_none());
    }
}
