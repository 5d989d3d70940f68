//! Errors raised while parsing chords, defining bindings and loading keymaps

/// Errors that can occur when building or configuring keymaps
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeymapError {
    /// A chord string held no key presses
    #[error("Empty key chord")]
    EmptyChord,

    /// A modifier prefix other than `C`, `M` or `S`
    #[error("Unknown key modifier: {modifier} in key definition {spec}")]
    InvalidModifier { modifier: String, spec: String },

    /// The key token is not in the key table
    #[error("Unknown key {key} in key definition {spec}")]
    UnknownKey { key: String, spec: String },

    /// A named command binding refers to an unregistered command
    #[error("No such command: {0}")]
    UnknownCommand(String),

    /// A keymap with this name was already created
    #[error("A keymap named {0} already exists")]
    DuplicateKeymap(String),

    /// No keymap is registered under this name
    #[error("No such keymap: {0}")]
    UnknownKeymap(String),

    #[error("IO error: {0}")]
    Io(String),

    /// Malformed keymap configuration
    #[error("Parse error: {0}")]
    Parse(String),
}
