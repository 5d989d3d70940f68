//! KeyPress: one physical key chord, parsed from events or chord strings

use std::fmt;

use super::error::KeymapError;
use super::table::KeyTable;
use super::types::{EventType, KeyCode, ModifierMask, RawKeyEvent};

/// A single key press: key code, modifier flags and case
///
/// Two key presses are the same chord iff every field matches, `shift`
/// included. Lookup never inspects `shift` on its own; case is expressed
/// through `is_upper_case`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct KeyPress {
    pub code: KeyCode,
    pub ctrl: bool,
    pub alt: bool,
    pub super_: bool,
    pub shift: bool,
    pub is_upper_case: bool,
}

fn is_one_letter_upcase(text: &str) -> bool {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => c.is_alphabetic() && c.is_uppercase(),
        _ => false,
    }
}

impl KeyPress {
    /// Key press with no modifiers
    pub const fn plain(code: KeyCode) -> Self {
        Self {
            code,
            ctrl: false,
            alt: false,
            super_: false,
            shift: false,
            is_upper_case: false,
        }
    }

    /// Convert a raw platform event
    ///
    /// The decoded text is tried first: raw codes for punctuation depend on
    /// the keyboard layout, the text does not. Returns `None` for keys the
    /// table does not know; callers should ignore such events.
    pub fn from_raw_event(event: &RawKeyEvent, table: &KeyTable) -> Option<KeyPress> {
        let code = match table.code_for_char(&event.text) {
            Some(code) => code,
            None if table.contains_code(event.code) => event.code,
            None => return None,
        };

        let mods = event.modifiers;
        Some(KeyPress {
            code,
            ctrl: mods.ctrl(),
            alt: mods.alt(),
            super_: mods.meta(),
            shift: mods.shift(),
            is_upper_case: is_one_letter_upcase(&event.text),
        })
    }

    /// Parse a single chord token such as `"C-x"`, `"C-M-Q"` or `"C--"`
    ///
    /// The definition is split on its last `-`: the left side is a run of `C`
    /// (ctrl), `M` (alt) and `S` (super) prefixes, the right side the key. An
    /// empty key means the definition ended in `-`, i.e. the hyphen key itself.
    pub fn from_string(spec: &str, table: &KeyTable) -> Result<KeyPress, KeymapError> {
        let (left, text) = spec.rsplit_once('-').unwrap_or(("", spec));
        let text = if text.is_empty() { "-" } else { text };

        let mut press = KeyPress::plain(KeyCode(0));
        for part in left.split('-') {
            match part {
                "" => break,
                "C" => press.ctrl = true,
                "M" => press.alt = true,
                "S" => press.super_ = true,
                other => {
                    return Err(KeymapError::InvalidModifier {
                        modifier: other.to_string(),
                        spec: spec.to_string(),
                    })
                }
            }
        }

        press.code = table
            .code_for_char(text)
            .ok_or_else(|| KeymapError::UnknownKey {
                key: text.to_string(),
                spec: spec.to_string(),
            })?;

        press.is_upper_case = is_one_letter_upcase(text);
        if press.is_upper_case || table.is_shift_punctuation(text) {
            press.shift = true;
        }
        Ok(press)
    }

    /// Rebuild a synthetic event for replaying this key press
    ///
    /// Shift is not re-emitted; upper-case presses carry upper-cased text
    /// instead, other presses carry no text.
    pub fn to_raw_event(&self, event_type: EventType, table: &KeyTable) -> RawKeyEvent {
        let modifiers = ModifierMask::new(self.ctrl, false, self.alt, self.super_);
        let text = if self.is_upper_case {
            self.char(table).unwrap_or_default()
        } else {
            String::new()
        };
        RawKeyEvent::new(event_type, self.code, text, modifiers)
    }

    /// Whether ctrl, alt or super is held
    pub fn has_any_modifier(&self) -> bool {
        self.ctrl || self.alt || self.super_
    }

    /// Canonical key text, upper-cased for upper-case presses
    pub fn char(&self, table: &KeyTable) -> Option<String> {
        let text = table.char_for_code(self.code)?;
        Some(if self.is_upper_case {
            text.to_uppercase()
        } else {
            text.to_string()
        })
    }

    /// Canonical chord form: `C-`, `M-`, `S-` prefixes then the key
    pub fn render(&self, table: &KeyTable) -> String {
        let mut parts: Vec<String> = Vec::with_capacity(4);
        if self.ctrl {
            parts.push("C".to_string());
        }
        if self.alt {
            parts.push("M".to_string());
        }
        if self.super_ {
            parts.push("S".to_string());
        }
        parts.push(self.char(table).unwrap_or_else(|| format!("<{}>", self.code)));
        parts.join("-")
    }

    /// Adapter implementing [`fmt::Display`] through a key table
    pub fn display<'a>(&'a self, table: &'a KeyTable) -> KeyPressDisplay<'a> {
        KeyPressDisplay { press: self, table }
    }
}

/// Displays a [`KeyPress`] in its canonical chord form
pub struct KeyPressDisplay<'a> {
    press: &'a KeyPress,
    table: &'a KeyTable,
}

impl fmt::Display for KeyPressDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.press.render(self.table))
    }
}

/// Parse a whitespace-separated chord such as `"C-x C-s"`
pub fn parse_chord(chord: &str, table: &KeyTable) -> Result<Vec<KeyPress>, KeymapError> {
    let keys = chord
        .split_whitespace()
        .map(|token| KeyPress::from_string(token, table))
        .collect::<Result<Vec<_>, _>>()?;
    if keys.is_empty() {
        return Err(KeymapError::EmptyChord);
    }
    Ok(keys)
}

/// Render a key sequence as a space-joined chord string
pub fn render_chord(keys: &[KeyPress], table: &KeyTable) -> String {
    keys.iter()
        .map(|k| k.render(table))
        .collect::<Vec<_>>()
        .join(" ")
}
