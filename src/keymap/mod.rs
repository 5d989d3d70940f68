//! Key chords and hierarchical keymaps
//!
//! This module provides an Emacs-style keybinding system that:
//! - Canonicalizes platform key events and chord strings (`"C-x C-s"`)
//!   into hashable key presses
//! - Stores bindings in a trie with prefix-key semantics
//! - Resolves key sequences through a chain of parent keymaps
//! - Loads bindings from YAML config files
//!
//! # Architecture
//!
//! ```text
//! winit::KeyEvent → RawKeyEvent → KeyPress → ChordDispatcher → KeymapTrie::lookup() → Command
//! ```
//!
//! # Building Keymaps
//!
//! ```ignore
//! let mut registry = KeymapRegistry::with_standard_keymaps();
//! let global = registry.require("global")?.node();
//! registry.define(global, "C-x C-s", Command::named("save-buffer"), &commands)?;
//!
//! let result = registry.lookup_chord(global, "C-x")?; // partial match
//! ```

mod binding;
mod command;
mod config;
mod defaults;
mod dispatch;
mod error;
mod keypress;
mod registry;
mod table;
mod trie;
mod types;
mod winit_adapter;

pub use binding::{Binding, NodeId};
pub use command::{Command, CommandHandle, CommandRegistry, CommandSet};
pub use config::{
    load_keymap_file, parse_keymap_yaml, ApplySummary, BindingConfig, KeymapConfig, KeymapDecl,
};
pub use defaults::{
    apply_layers, default_layers, embedded_layer, get_user_config_path, ConfigLayer,
    STANDARD_KEYMAPS,
};
pub use dispatch::{ChordDispatcher, KeyAction};
pub use error::KeymapError;
pub use keypress::{parse_chord, render_chord, KeyPress, KeyPressDisplay};
pub use registry::{Keymap, KeymapRegistry};
pub use table::KeyTable;
pub use trie::{KeymapNode, KeymapTrie, LookupResult, TraversalEntry, Traverse};
pub use types::{EventType, KeyCode, ModifierMask, RawKeyEvent};
pub use winit_adapter::{raw_event_from_key_event, raw_event_from_winit};
