//! chordmap - Emacs-style key chords and hierarchical keymaps
//!
//! This crate canonicalizes keyboard input into key presses and resolves
//! key sequences through named keymaps with parent fallback.

pub mod cli;
pub mod config_paths;
pub mod keymap;
pub mod tracing;

// Re-export commonly used types
pub use keymap::{Command, KeyPress, KeyTable, KeymapError, KeymapRegistry, LookupResult};
