//! Key canonicalization table
//!
//! Bidirectional mapping between platform key codes and the canonical text
//! used in chord strings (`"a"`, `"Esc"`, `"F5"`). Several texts may map to
//! the same code (`"a"` and `"A"`), but every code has exactly one canonical
//! text. The table is seeded once and only read afterwards.

use std::collections::{HashMap, HashSet};

use super::types::KeyCode;

/// Named (non-printable) keys and their canonical names
const NAMED_KEYS: &[(KeyCode, &str)] = &[
    (KeyCode::ESCAPE, "Esc"),
    (KeyCode::TAB, "Tab"),
    (KeyCode::BACKTAB, "Backtab"),
    (KeyCode::BACKSPACE, "Backspace"),
    (KeyCode::RETURN, "Return"),
    (KeyCode::ENTER, "Enter"),
    (KeyCode::INSERT, "Insert"),
    (KeyCode::DELETE, "Delete"),
    (KeyCode::PAUSE, "Pause"),
    (KeyCode::PRINT, "Print"),
    (KeyCode::SYSREQ, "SysReq"),
    (KeyCode::CLEAR, "Clear"),
    (KeyCode::HOME, "Home"),
    (KeyCode::END, "End"),
    (KeyCode::LEFT, "Left"),
    (KeyCode::UP, "Up"),
    (KeyCode::RIGHT, "Right"),
    (KeyCode::DOWN, "Down"),
    (KeyCode::PAGE_UP, "PageUp"),
    (KeyCode::PAGE_DOWN, "PageDown"),
    (KeyCode::SPACE, "Space"),
];

/// Printable symbols without a case distinction
const SYMBOLS: &str = "!\"$%&'()*+,-./0123456789:;<=>?@[\\]^_{|}~\u{a0}¡¢£¤¥¦§¨©ª«¬®¯°±²³´µ¶·¸¹º»¼½¾¿×";

/// Letters registered with their upper-case form as an alias
const LETTERS: &str = "abcdefghijklmnopqrstuvwxyzàáâãäåæçèéêëìíîïðñòóôõöøùúûüýþ";

/// Bidirectional key code ↔ canonical text table
#[derive(Debug, Clone, Default)]
pub struct KeyTable {
    code_to_char: HashMap<KeyCode, String>,
    char_to_code: HashMap<String, KeyCode>,
    /// Punctuation characters that imply shift when used in a chord string
    shift_punctuation: HashSet<char>,
}

impl KeyTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table seeded with the standard key set
    pub fn standard() -> Self {
        let mut table = Self::new();

        for &(code, name) in NAMED_KEYS {
            table.register(code, name, &[]);
        }
        for n in 1..=12u8 {
            table.register(KeyCode::function(n), &format!("F{}", n), &[]);
        }
        for c in SYMBOLS.chars() {
            table.register(KeyCode::printable(c), &c.to_string(), &[]);
        }
        for c in LETTERS.chars() {
            let upper: String = c.to_uppercase().collect();
            table.register(KeyCode::printable(c), &c.to_string(), &[upper.as_str()]);
        }

        tracing::trace!(
            codes = table.code_to_char.len(),
            texts = table.char_to_code.len(),
            "Seeded standard key table"
        );
        table
    }

    /// Register `code` with its canonical text and any alias texts
    ///
    /// Re-registering a code replaces its canonical text; the reverse entries
    /// of earlier registrations are kept.
    pub fn register(&mut self, code: KeyCode, canonical: &str, aliases: &[&str]) {
        self.code_to_char.insert(code, canonical.to_string());
        self.char_to_code.insert(canonical.to_string(), code);
        for alias in aliases {
            self.char_to_code.insert((*alias).to_string(), code);
        }
    }

    /// Look up the code a text resolves to
    pub fn code_for_char(&self, text: &str) -> Option<KeyCode> {
        self.char_to_code.get(text).copied()
    }

    /// Look up the canonical text of a code
    pub fn char_for_code(&self, code: KeyCode) -> Option<&str> {
        self.code_to_char.get(&code).map(String::as_str)
    }

    /// Whether the table knows this code
    pub fn contains_code(&self, code: KeyCode) -> bool {
        self.code_to_char.contains_key(&code)
    }

    /// Mark a punctuation character as implying shift in chord strings
    pub fn add_shift_punctuation(&mut self, c: char) {
        self.shift_punctuation.insert(c);
    }

    /// Whether `text` is a single character from the shift punctuation set
    pub fn is_shift_punctuation(&self, text: &str) -> bool {
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => self.shift_punctuation.contains(&c),
            _ => false,
        }
    }

    /// Number of registered codes
    pub fn len(&self) -> usize {
        self.code_to_char.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code_to_char.is_empty()
    }
}
