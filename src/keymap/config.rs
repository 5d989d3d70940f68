//! YAML configuration for keymaps
//!
//! A keymap file can declare commands, extra keymaps, shift punctuation and
//! bindings:
//!
//! ```yaml
//! shift_punctuation: "?!"
//! commands: [save-buffer]
//! keymaps:
//!   - name: my-mode
//!     parent: global
//!     doc: "Keys for my mode"
//! bindings:
//!   - keymap: global
//!     key: "C-x C-s"
//!     command: save-buffer
//!   - keymap: webbuffer
//!     key: "q"
//!     unbind: true
//! ```

use std::path::Path;

use serde::Deserialize;

use super::command::{Command, CommandRegistry};
use super::error::KeymapError;
use super::registry::KeymapRegistry;

/// Root structure of a keymap YAML file
#[derive(Debug, Default, Deserialize)]
pub struct KeymapConfig {
    /// Punctuation characters that imply shift in chord strings
    #[serde(default)]
    pub shift_punctuation: String,
    /// Command names this file expects the host to provide
    #[serde(default)]
    pub commands: Vec<String>,
    #[serde(default)]
    pub keymaps: Vec<KeymapDecl>,
    #[serde(default)]
    pub bindings: Vec<BindingConfig>,
}

/// A keymap declared in YAML
#[derive(Debug, Deserialize)]
pub struct KeymapDecl {
    pub name: String,
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub doc: Option<String>,
}

/// A single binding entry from YAML
#[derive(Debug, Deserialize)]
pub struct BindingConfig {
    pub keymap: String,
    pub key: String,
    #[serde(default)]
    pub command: Option<String>,
    /// Remove whatever `key` resolves to instead of binding it
    #[serde(default)]
    pub unbind: bool,
    #[serde(default)]
    pub platform: Option<String>,
}

/// Counts of what applying a config changed
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ApplySummary {
    pub keymaps: usize,
    pub defined: usize,
    pub undefined: usize,
    pub skipped: usize,
}

/// Load a keymap config from a YAML file
pub fn load_keymap_file(path: &Path) -> Result<KeymapConfig, KeymapError> {
    let content = std::fs::read_to_string(path).map_err(|e| KeymapError::Io(e.to_string()))?;

    parse_keymap_yaml(&content)
}

/// Parse a keymap config from a YAML string
pub fn parse_keymap_yaml(yaml: &str) -> Result<KeymapConfig, KeymapError> {
    serde_yaml::from_str(yaml).map_err(|e| KeymapError::Parse(e.to_string()))
}

impl KeymapConfig {
    /// Apply this config to `registry`
    ///
    /// Shift punctuation is added first, then keymaps are created in order,
    /// then bindings are applied in order. Bindings for another platform are
    /// skipped. The first error aborts; earlier changes stay applied.
    pub fn apply<R: CommandRegistry + ?Sized>(
        &self,
        registry: &mut KeymapRegistry,
        commands: &R,
    ) -> Result<ApplySummary, KeymapError> {
        let mut summary = ApplySummary::default();

        for c in self.shift_punctuation.chars() {
            registry.table_mut().add_shift_punctuation(c);
        }

        for decl in &self.keymaps {
            registry.create_child(&decl.name, decl.parent.as_deref(), decl.doc.as_deref())?;
            summary.keymaps += 1;
        }

        let current_platform = get_current_platform();
        for entry in &self.bindings {
            if let Some(ref platform) = entry.platform {
                if platform != current_platform {
                    summary.skipped += 1;
                    continue;
                }
            }

            let node = registry.require(&entry.keymap)?.node();
            if entry.unbind {
                if registry.undefine(node, &entry.key)?.is_some() {
                    summary.undefined += 1;
                } else {
                    summary.skipped += 1;
                }
                continue;
            }

            let name = entry.command.as_deref().ok_or_else(|| {
                KeymapError::Parse(format!("Binding for {} has no command", entry.key))
            })?;
            registry.define(node, &entry.key, Command::named(name), commands)?;
            summary.defined += 1;
        }

        Ok(summary)
    }
}

/// Get the current platform identifier
fn get_current_platform() -> &'static str {
    if cfg!(target_os = "macos") {
        "macos"
    } else if cfg!(target_os = "windows") {
        "windows"
    } else {
        "linux"
    }
}
