//! Adapter to convert winit key events to our RawKeyEvent type

use winit::event::{ElementState, KeyEvent};
use winit::keyboard::{Key, KeyCode as WinitKeyCode, ModifiersState, NamedKey, PhysicalKey};

use super::types::{EventType, KeyCode, ModifierMask, RawKeyEvent};

/// Convert a winit keyboard event plus the current modifier state
///
/// Uses the text winit decoded under the active layout, which is what
/// key-press resolution tries first.
pub fn raw_event_from_key_event(event: &KeyEvent, modifiers: ModifiersState) -> RawKeyEvent {
    let mut raw = raw_event_from_winit(
        &event.logical_key,
        event.physical_key,
        modifiers,
        event.state == ElementState::Pressed,
    );
    if let Some(text) = &event.text {
        raw.text = text.to_string();
    }
    raw
}

/// Convert winit key event data to a RawKeyEvent
///
/// Named logical keys give the raw code directly; otherwise the physical key
/// is used, read as a US layout. The text is the logical character, if any.
pub fn raw_event_from_winit(
    logical_key: &Key,
    physical_key: PhysicalKey,
    modifiers: ModifiersState,
    pressed: bool,
) -> RawKeyEvent {
    let mods = ModifierMask::new(
        modifiers.control_key(),
        modifiers.shift_key(),
        modifiers.alt_key(),
        modifiers.super_key(),
    );

    let (code, text) = match logical_key {
        Key::Named(named) => (
            named_code(*named).unwrap_or_else(|| physical_code(physical_key)),
            String::new(),
        ),
        Key::Character(s) => (physical_code(physical_key), s.to_string()),
        _ => (physical_code(physical_key), String::new()),
    };

    let event_type = if pressed {
        EventType::Press
    } else {
        EventType::Release
    };
    RawKeyEvent::new(event_type, code, text, mods)
}

fn named_code(named: NamedKey) -> Option<KeyCode> {
    let code = match named {
        NamedKey::Escape => KeyCode::ESCAPE,
        NamedKey::Tab => KeyCode::TAB,
        NamedKey::Backspace => KeyCode::BACKSPACE,
        NamedKey::Enter => KeyCode::RETURN,
        NamedKey::Insert => KeyCode::INSERT,
        NamedKey::Delete => KeyCode::DELETE,
        NamedKey::Pause => KeyCode::PAUSE,
        NamedKey::PrintScreen => KeyCode::PRINT,
        NamedKey::Clear => KeyCode::CLEAR,
        NamedKey::Space => KeyCode::SPACE,

        // Navigation
        NamedKey::Home => KeyCode::HOME,
        NamedKey::End => KeyCode::END,
        NamedKey::ArrowLeft => KeyCode::LEFT,
        NamedKey::ArrowUp => KeyCode::UP,
        NamedKey::ArrowRight => KeyCode::RIGHT,
        NamedKey::ArrowDown => KeyCode::DOWN,
        NamedKey::PageUp => KeyCode::PAGE_UP,
        NamedKey::PageDown => KeyCode::PAGE_DOWN,

        // Function keys
        NamedKey::F1 => KeyCode::function(1),
        NamedKey::F2 => KeyCode::function(2),
        NamedKey::F3 => KeyCode::function(3),
        NamedKey::F4 => KeyCode::function(4),
        NamedKey::F5 => KeyCode::function(5),
        NamedKey::F6 => KeyCode::function(6),
        NamedKey::F7 => KeyCode::function(7),
        NamedKey::F8 => KeyCode::function(8),
        NamedKey::F9 => KeyCode::function(9),
        NamedKey::F10 => KeyCode::function(10),
        NamedKey::F11 => KeyCode::function(11),
        NamedKey::F12 => KeyCode::function(12),

        _ => return None,
    };
    Some(code)
}

fn physical_code(physical_key: PhysicalKey) -> KeyCode {
    let PhysicalKey::Code(code) = physical_key else {
        return KeyCode::UNIDENTIFIED;
    };

    let c = match code {
        WinitKeyCode::KeyA => 'a',
        WinitKeyCode::KeyB => 'b',
        WinitKeyCode::KeyC => 'c',
        WinitKeyCode::KeyD => 'd',
        WinitKeyCode::KeyE => 'e',
        WinitKeyCode::KeyF => 'f',
        WinitKeyCode::KeyG => 'g',
        WinitKeyCode::KeyH => 'h',
        WinitKeyCode::KeyI => 'i',
        WinitKeyCode::KeyJ => 'j',
        WinitKeyCode::KeyK => 'k',
        WinitKeyCode::KeyL => 'l',
        WinitKeyCode::KeyM => 'm',
        WinitKeyCode::KeyN => 'n',
        WinitKeyCode::KeyO => 'o',
        WinitKeyCode::KeyP => 'p',
        WinitKeyCode::KeyQ => 'q',
        WinitKeyCode::KeyR => 'r',
        WinitKeyCode::KeyS => 's',
        WinitKeyCode::KeyT => 't',
        WinitKeyCode::KeyU => 'u',
        WinitKeyCode::KeyV => 'v',
        WinitKeyCode::KeyW => 'w',
        WinitKeyCode::KeyX => 'x',
        WinitKeyCode::KeyY => 'y',
        WinitKeyCode::KeyZ => 'z',

        WinitKeyCode::Digit0 | WinitKeyCode::Numpad0 => '0',
        WinitKeyCode::Digit1 | WinitKeyCode::Numpad1 => '1',
        WinitKeyCode::Digit2 | WinitKeyCode::Numpad2 => '2',
        WinitKeyCode::Digit3 | WinitKeyCode::Numpad3 => '3',
        WinitKeyCode::Digit4 | WinitKeyCode::Numpad4 => '4',
        WinitKeyCode::Digit5 | WinitKeyCode::Numpad5 => '5',
        WinitKeyCode::Digit6 | WinitKeyCode::Numpad6 => '6',
        WinitKeyCode::Digit7 | WinitKeyCode::Numpad7 => '7',
        WinitKeyCode::Digit8 | WinitKeyCode::Numpad8 => '8',
        WinitKeyCode::Digit9 | WinitKeyCode::Numpad9 => '9',

        WinitKeyCode::Minus | WinitKeyCode::NumpadSubtract => '-',
        WinitKeyCode::Equal => '=',
        WinitKeyCode::NumpadAdd => '+',
        WinitKeyCode::NumpadMultiply => '*',
        WinitKeyCode::NumpadDivide | WinitKeyCode::Slash => '/',
        WinitKeyCode::NumpadDecimal | WinitKeyCode::Period => '.',
        WinitKeyCode::Comma => ',',
        WinitKeyCode::Semicolon => ';',
        WinitKeyCode::Quote => '\'',
        WinitKeyCode::BracketLeft => '[',
        WinitKeyCode::BracketRight => ']',
        WinitKeyCode::Backslash => '\\',

        WinitKeyCode::NumpadEnter => return KeyCode::ENTER,
        WinitKeyCode::Escape => return KeyCode::ESCAPE,
        WinitKeyCode::Tab => return KeyCode::TAB,
        WinitKeyCode::Enter => return KeyCode::RETURN,
        WinitKeyCode::Space => return KeyCode::SPACE,
        _ => return KeyCode::UNIDENTIFIED,
    };
    KeyCode::printable(c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap::keypress::KeyPress;
    use crate::keymap::table::KeyTable;

    #[test]
    fn test_character_key() {
        let raw = raw_event_from_winit(
            &Key::Character("s".into()),
            PhysicalKey::Code(WinitKeyCode::KeyS),
            ModifiersState::CONTROL,
            true,
        );

        assert_eq!(raw.event_type, EventType::Press);
        assert_eq!(raw.code, KeyCode::printable('s'));
        assert_eq!(raw.text, "s");
        assert!(raw.modifiers.ctrl());
        assert!(!raw.modifiers.shift());
    }

    #[test]
    fn test_uppercase_resolves_to_uppercase_press() {
        let table = KeyTable::standard();
        let raw = raw_event_from_winit(
            &Key::Character("S".into()),
            PhysicalKey::Code(WinitKeyCode::KeyS),
            ModifiersState::SHIFT,
            true,
        );

        let kp = KeyPress::from_raw_event(&raw, &table).expect("should map");
        assert!(kp.is_upper_case);
        assert!(kp.shift);
        assert_eq!(kp, KeyPress::from_string("S", &table).unwrap());
    }

    #[test]
    fn test_layout_symbol_uses_text() {
        let table = KeyTable::standard();
        // '?' typed on a layout where it sits on the physical Minus key
        let raw = raw_event_from_winit(
            &Key::Character("?".into()),
            PhysicalKey::Code(WinitKeyCode::Minus),
            ModifiersState::CONTROL | ModifiersState::SHIFT,
            true,
        );

        let kp = KeyPress::from_raw_event(&raw, &table).expect("should map");
        assert_eq!(kp.code, KeyCode::printable('?'));
        assert!(kp.ctrl);
    }

    #[test]
    fn test_named_key() {
        let raw = raw_event_from_winit(
            &Key::Named(NamedKey::Enter),
            PhysicalKey::Code(WinitKeyCode::Enter),
            ModifiersState::empty(),
            false,
        );

        assert_eq!(raw.event_type, EventType::Release);
        assert_eq!(raw.code, KeyCode::RETURN);
        assert!(raw.text.is_empty());
        assert!(raw.modifiers.is_empty());
    }

    #[test]
    fn test_arrow_with_modifiers() {
        let raw = raw_event_from_winit(
            &Key::Named(NamedKey::ArrowLeft),
            PhysicalKey::Code(WinitKeyCode::ArrowLeft),
            ModifiersState::ALT | ModifiersState::SUPER,
            true,
        );

        assert_eq!(raw.code, KeyCode::LEFT);
        assert!(raw.modifiers.alt());
        assert!(raw.modifiers.meta());
        assert!(!raw.modifiers.ctrl());
    }

    #[test]
    fn test_function_keys() {
        let named = [
            NamedKey::F1,
            NamedKey::F2,
            NamedKey::F3,
            NamedKey::F4,
            NamedKey::F5,
            NamedKey::F6,
            NamedKey::F7,
            NamedKey::F8,
            NamedKey::F9,
            NamedKey::F10,
            NamedKey::F11,
            NamedKey::F12,
        ];
        for (i, key) in named.into_iter().enumerate() {
            let raw = raw_event_from_winit(
                &Key::Named(key),
                PhysicalKey::Code(WinitKeyCode::F1), // doesn't matter
                ModifiersState::empty(),
                true,
            );
            assert_eq!(raw.code, KeyCode::function(i as u8 + 1));
        }
    }

    #[test]
    fn test_unidentified_key_is_ignored() {
        let table = KeyTable::standard();
        let raw = raw_event_from_winit(
            &Key::Named(NamedKey::AudioVolumeUp),
            PhysicalKey::Code(WinitKeyCode::AudioVolumeUp),
            ModifiersState::empty(),
            true,
        );

        assert_eq!(raw.code, KeyCode::UNIDENTIFIED);
        assert_eq!(KeyPress::from_raw_event(&raw, &table), None);
    }
}
