//! Core types for the keymap system: KeyCode, ModifierMask, RawKeyEvent

use std::fmt;

/// Opaque platform key identifier
///
/// Printable keys use the code point of their upper-case form (`a` and `A`
/// share `0x41`), named keys live above [`KeyCode::NAMED_BASE`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyCode(pub u32);

impl KeyCode {
    pub const NAMED_BASE: u32 = 0x0100_0000;

    /// Raw code of a key the platform could not identify
    pub const UNIDENTIFIED: KeyCode = KeyCode(0);

    pub const ESCAPE: KeyCode = KeyCode(0x0100_0000);
    pub const TAB: KeyCode = KeyCode(0x0100_0001);
    pub const BACKTAB: KeyCode = KeyCode(0x0100_0002);
    pub const BACKSPACE: KeyCode = KeyCode(0x0100_0003);
    pub const RETURN: KeyCode = KeyCode(0x0100_0004);
    pub const ENTER: KeyCode = KeyCode(0x0100_0005);
    pub const INSERT: KeyCode = KeyCode(0x0100_0006);
    pub const DELETE: KeyCode = KeyCode(0x0100_0007);
    pub const PAUSE: KeyCode = KeyCode(0x0100_0008);
    pub const PRINT: KeyCode = KeyCode(0x0100_0009);
    pub const SYSREQ: KeyCode = KeyCode(0x0100_000a);
    pub const CLEAR: KeyCode = KeyCode(0x0100_000b);
    pub const HOME: KeyCode = KeyCode(0x0100_0010);
    pub const END: KeyCode = KeyCode(0x0100_0011);
    pub const LEFT: KeyCode = KeyCode(0x0100_0012);
    pub const UP: KeyCode = KeyCode(0x0100_0013);
    pub const RIGHT: KeyCode = KeyCode(0x0100_0014);
    pub const DOWN: KeyCode = KeyCode(0x0100_0015);
    pub const PAGE_UP: KeyCode = KeyCode(0x0100_0016);
    pub const PAGE_DOWN: KeyCode = KeyCode(0x0100_0017);
    pub const SPACE: KeyCode = KeyCode(0x20);

    /// Function key `F1`..`F35`
    pub const fn function(n: u8) -> KeyCode {
        KeyCode(0x0100_0030 + n as u32 - 1)
    }

    /// Code for a printable character: the upper-case code point for
    /// letters with a single-char upper-case form, the code point otherwise
    pub fn printable(c: char) -> KeyCode {
        let mut upper = c.to_uppercase();
        match (upper.next(), upper.next()) {
            (Some(u), None) => KeyCode(u as u32),
            _ => KeyCode(c as u32),
        }
    }

    /// Whether this code belongs to a named (non-printable) key
    #[inline]
    pub const fn is_named(self) -> bool {
        self.0 >= Self::NAMED_BASE
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// Modifier keys as a bitfield, the shape a platform event carries them in
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ModifierMask(u8);

impl ModifierMask {
    pub const NONE: ModifierMask = ModifierMask(0);
    pub const CTRL: ModifierMask = ModifierMask(0b0001);
    pub const SHIFT: ModifierMask = ModifierMask(0b0010);
    pub const ALT: ModifierMask = ModifierMask(0b0100);
    pub const META: ModifierMask = ModifierMask(0b1000); // Super / Cmd / Win

    /// Create a mask from individual flags
    pub const fn new(ctrl: bool, shift: bool, alt: bool, meta: bool) -> Self {
        let mut bits = 0u8;
        if ctrl {
            bits |= 0b0001;
        }
        if shift {
            bits |= 0b0010;
        }
        if alt {
            bits |= 0b0100;
        }
        if meta {
            bits |= 0b1000;
        }
        ModifierMask(bits)
    }

    #[inline]
    pub const fn ctrl(self) -> bool {
        self.0 & 0b0001 != 0
    }

    #[inline]
    pub const fn shift(self) -> bool {
        self.0 & 0b0010 != 0
    }

    #[inline]
    pub const fn alt(self) -> bool {
        self.0 & 0b0100 != 0
    }

    #[inline]
    pub const fn meta(self) -> bool {
        self.0 & 0b1000 != 0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn union(self, other: ModifierMask) -> ModifierMask {
        ModifierMask(self.0 | other.0)
    }

    #[inline]
    pub const fn contains(self, other: ModifierMask) -> bool {
        (self.0 & other.0) == other.0
    }
}

impl std::ops::BitOr for ModifierMask {
    type Output = ModifierMask;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}

impl std::ops::BitOrAssign for ModifierMask {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = self.union(rhs);
    }
}

impl fmt::Display for ModifierMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if self.ctrl() {
            parts.push("Ctrl");
        }
        if self.shift() {
            parts.push("Shift");
        }
        if self.alt() {
            parts.push("Alt");
        }
        if self.meta() {
            parts.push("Super");
        }
        write!(f, "{}", parts.join("+"))
    }
}

/// Kind of a raw key event
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventType {
    Press,
    Release,
}

/// A platform key event reduced to what key-press resolution needs
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawKeyEvent {
    pub event_type: EventType,
    /// Raw platform code; punctuation codes depend on the keyboard layout
    pub code: KeyCode,
    /// Text the event decodes to under the active layout (may be empty)
    pub text: String,
    pub modifiers: ModifierMask,
}

impl RawKeyEvent {
    pub fn new(
        event_type: EventType,
        code: KeyCode,
        text: impl Into<String>,
        modifiers: ModifierMask,
    ) -> Self {
        Self {
            event_type,
            code,
            text: text.into(),
            modifiers,
        }
    }

    /// Key press event with the given code, text and modifiers
    pub fn press(code: KeyCode, text: impl Into<String>, modifiers: ModifierMask) -> Self {
        Self::new(EventType::Press, code, text, modifiers)
    }
}
