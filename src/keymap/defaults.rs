//! Standard keymap hierarchy and default bindings
//!
//! The standard registry holds two root keymaps (`global`, the universal
//! fallback, and `webbuffer`, for content focus), a few other independent
//! local keymaps, and the prompt keymaps parented to `minibuffer`.
//!
//! Default bindings come from keymap.yaml at project root, embedded at
//! compile time, and can be extended by project-local and user files.

use std::path::{Path, PathBuf};

use super::command::CommandRegistry;
use super::config::{load_keymap_file, parse_keymap_yaml, KeymapConfig};
use super::error::KeymapError;
use super::registry::KeymapRegistry;
use super::table::KeyTable;

/// Default keymap YAML embedded at compile time
const DEFAULT_KEYMAP_YAML: &str = include_str!("../../keymap.yaml");

/// `(name, parent, doc)` of the standard keymaps, parents first
pub const STANDARD_KEYMAPS: &[(&str, Option<&str>, &str)] = &[
    ("empty", None, ""),
    (
        "global",
        None,
        "The global keymap is always active.\n\
         It acts as a fallback to other keymaps, which are considered local. Only one \
         local keymap can be active at a time. A binding is first searched in the \
         currently active local keymap, and if not found the global keymap is used.\n\
         Only bindings with modifiers should be bound to it, else it will be impossible \
         to edit text.",
    ),
    (
        "webbuffer",
        None,
        "Local keymap activated when a web buffer is focused.\n\
         It is enabled when no other local keymap is enabled.",
    ),
    (
        "webcontent-edit",
        None,
        "Local keymap activated when an editable content field is focused.",
    ),
    (
        "caret-browsing",
        None,
        "Local keymap activated when navigating a buffer with a caret.",
    ),
    (
        "video-fullscreen",
        None,
        "Local keymap activated when a video is played full screen.",
    ),
    (
        "minibuffer",
        None,
        "Local keymap activated when input is in the minibuffer line edit.",
    ),
    (
        "visited-links-list",
        Some("minibuffer"),
        "Local keymap activated while looking into visited links.",
    ),
    (
        "bookmarks-list",
        Some("minibuffer"),
        "Local keymap activated while looking into bookmarks.",
    ),
    (
        "buffer-list",
        Some("minibuffer"),
        "Local keymap activated while looking into buffers.",
    ),
    (
        "webjump",
        Some("minibuffer"),
        "Local keymap activated while using webjumps.",
    ),
    ("hint", Some("minibuffer"), "Local keymap used when hinting."),
    (
        "i-search",
        Some("minibuffer"),
        "Local keymap used in incremental search.",
    ),
];

impl KeymapRegistry {
    /// Registry over the standard key table, seeded with the standard keymaps
    pub fn with_standard_keymaps() -> Self {
        let mut registry = KeymapRegistry::new(KeyTable::standard());
        for &(name, parent, doc) in STANDARD_KEYMAPS {
            let doc = (!doc.is_empty()).then_some(doc);
            if let Err(e) = registry.create_child(name, parent, doc) {
                // names above are unique and parents precede children
                tracing::error!("Failed to seed keymap {}: {}", name, e);
            }
        }
        registry
    }
}

/// A parsed keymap file and where it came from
#[derive(Debug)]
pub struct ConfigLayer {
    pub source: String,
    pub config: KeymapConfig,
}

/// Get the user's keymap configuration path
///
/// Returns `~/.config/chordmap/keymap.yaml` on Unix
pub fn get_user_config_path() -> Option<PathBuf> {
    crate::config_paths::keymap_file()
}

/// The embedded default layer
pub fn embedded_layer() -> Result<ConfigLayer, KeymapError> {
    Ok(ConfigLayer {
        source: "<embedded>".to_string(),
        config: parse_keymap_yaml(DEFAULT_KEYMAP_YAML)?,
    })
}

/// Collect config layers in application order
///
/// Loading order (each layer applies on top of the previous):
/// 1. Embedded default keymap (compiled into binary)
/// 2. keymap.yaml in current directory (project-local overrides)
/// 3. User config at ~/.config/chordmap/keymap.yaml
pub fn default_layers() -> Vec<ConfigLayer> {
    let mut layers = Vec::new();

    match embedded_layer() {
        Ok(layer) => {
            tracing::info!(
                "Loaded embedded default keymap ({} bindings)",
                layer.config.bindings.len()
            );
            layers.push(layer);
        }
        Err(e) => tracing::warn!("Failed to parse embedded keymap: {}", e),
    }

    let local = Path::new("keymap.yaml");
    if local.exists() {
        match load_keymap_file(local) {
            Ok(config) => {
                tracing::info!("Loaded project keymap.yaml ({} bindings)", config.bindings.len());
                layers.push(ConfigLayer {
                    source: local.display().to_string(),
                    config,
                });
            }
            Err(e) => tracing::warn!("Failed to load project keymap.yaml: {}", e),
        }
    }

    if let Some(user_path) = get_user_config_path() {
        if user_path.exists() {
            match load_keymap_file(&user_path) {
                Ok(config) => {
                    tracing::info!(
                        "Loaded user keymap from {} ({} bindings)",
                        user_path.display(),
                        config.bindings.len()
                    );
                    layers.push(ConfigLayer {
                        source: user_path.display().to_string(),
                        config,
                    });
                }
                Err(e) => {
                    tracing::warn!("Failed to load user keymap from {}: {}", user_path.display(), e);
                }
            }
        }
    }

    layers
}

/// Apply layers in order, logging and skipping the ones that fail
///
/// A failing layer may be partially applied. Returns how many layers
/// applied cleanly.
pub fn apply_layers<R: CommandRegistry + ?Sized>(
    registry: &mut KeymapRegistry,
    layers: &[ConfigLayer],
    commands: &R,
) -> usize {
    let mut applied = 0;
    for layer in layers {
        match layer.config.apply(registry, commands) {
            Ok(summary) => {
                tracing::debug!(source = %layer.source, ?summary, "Applied keymap layer");
                applied += 1;
            }
            Err(e) => tracing::warn!("Failed to apply keymap layer {}: {}", layer.source, e),
        }
    }
    applied
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_hierarchy() {
        let registry = KeymapRegistry::with_standard_keymaps();
        assert_eq!(registry.keymaps().count(), STANDARD_KEYMAPS.len());

        let global = registry.get("global").unwrap();
        assert!(registry.parent_of(global).is_none());
        assert_eq!(global.brief_doc(), Some("The global keymap is always active."));

        for child in ["visited-links-list", "bookmarks-list", "buffer-list", "webjump", "hint", "i-search"] {
            let keymap = registry.get(child).unwrap();
            assert_eq!(registry.parent_of(keymap).map(|k| k.name()), Some("minibuffer"));
        }

        assert_eq!(registry.get("empty").unwrap().doc(), None);
    }

    #[test]
    fn test_embedded_layer_parses() {
        let layer = embedded_layer().expect("Embedded keymap.yaml should parse");
        assert!(!layer.config.bindings.is_empty());
        assert!(layer.config.commands.iter().any(|c| c == "quit"));
    }
}
