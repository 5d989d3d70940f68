//! Command-line interface for inspecting keymaps
//!
//! Supports:
//! - Listing the keymap hierarchy
//! - Resolving a chord against a keymap
//! - Listing a keymap's bindings
//! - Replaying a chord through the dispatcher, key by key

use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::keymap::{
    apply_layers, default_layers, load_keymap_file, parse_chord, render_chord, ChordDispatcher,
    CommandSet, ConfigLayer, KeyAction, KeymapError, KeymapRegistry,
};

/// Inspect Emacs-style keymaps
#[derive(Parser, Debug)]
#[command(name = "chordmap", version, about = "Inspect Emacs-style keymaps")]
pub struct CliArgs {
    /// Extra keymap files applied after the default layers
    #[arg(short = 'c', long = "config", value_name = "PATH")]
    pub configs: Vec<PathBuf>,

    /// Skip the embedded, project and user keymap files
    #[arg(long)]
    pub no_defaults: bool,

    /// Log at debug level when RUST_LOG is unset
    #[arg(short = 'v', long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum CliCommand {
    /// List keymaps with their parent and summary
    Keymaps,
    /// Resolve a chord such as "C-x C-c" in a keymap
    Lookup { keymap: String, chord: String },
    /// List bindings reachable from a keymap
    Bindings {
        keymap: String,
        /// Only bindings stored in the keymap itself
        #[arg(long)]
        local: bool,
    },
    /// Show a keymap's documentation
    Describe { keymap: String },
    /// Feed a chord to the dispatcher one key at a time
    Replay { keymap: String, chord: String },
}

impl CliArgs {
    /// Config layers in application order
    pub fn layers(&self) -> Vec<ConfigLayer> {
        let mut layers = if self.no_defaults {
            Vec::new()
        } else {
            default_layers()
        };

        for path in &self.configs {
            match load_keymap_file(path) {
                Ok(config) => layers.push(ConfigLayer {
                    source: path.display().to_string(),
                    config,
                }),
                Err(e) => tracing::warn!("Skipping {}: {}", path.display(), e),
            }
        }
        layers
    }
}

/// Commands declared by any layer, with no attached behaviour
pub fn declared_commands(layers: &[ConfigLayer]) -> CommandSet<()> {
    let mut commands = CommandSet::new();
    for layer in layers {
        for name in &layer.config.commands {
            commands.register(name.as_str(), ());
        }
    }
    commands
}

/// Standard registry with `layers` applied on top
pub fn build_registry(layers: &[ConfigLayer]) -> KeymapRegistry {
    let commands = declared_commands(layers);
    let mut registry = KeymapRegistry::with_standard_keymaps();
    let applied = apply_layers(&mut registry, layers, &commands);
    tracing::debug!("Applied {} of {} keymap layers", applied, layers.len());
    registry
}

fn io_err(e: std::io::Error) -> KeymapError {
    KeymapError::Io(e.to_string())
}

/// Run a subcommand against `registry`, writing the report to `out`
pub fn execute(
    command: &CliCommand,
    registry: &KeymapRegistry,
    out: &mut impl Write,
) -> Result<(), KeymapError> {
    match command {
        CliCommand::Keymaps => {
            for keymap in registry.keymaps() {
                let parent = registry
                    .parent_of(keymap)
                    .map(|p| p.name())
                    .unwrap_or("-");
                writeln!(
                    out,
                    "{:<20} {:<12} {}",
                    keymap.name(),
                    parent,
                    keymap.brief_doc().unwrap_or("")
                )
                .map_err(io_err)?;
            }
        }
        CliCommand::Lookup { keymap, chord } => {
            let node = registry.require(keymap)?.node();
            let keys = parse_chord(chord, registry.table())?;
            let rendered = render_chord(&keys, registry.table());
            let written = match registry.lookup(node, &keys) {
                Some(result) => match result.command {
                    Some(command) if result.consumed < keys.len() => {
                        let used = render_chord(&keys[..result.consumed], registry.table());
                        writeln!(out, "{} runs {} (bound to {})", rendered, command, used)
                    }
                    Some(command) => writeln!(out, "{} runs {}", rendered, command),
                    None => writeln!(out, "{} is a prefix key", rendered),
                },
                None => writeln!(out, "{} is not bound", rendered),
            };
            written.map_err(io_err)?;
        }
        CliCommand::Bindings { keymap, local } => {
            let node = registry.require(keymap)?.node();
            for (chord, command) in registry.all_bindings_raw(node, !local) {
                writeln!(out, "{:<16} {}", chord, command).map_err(io_err)?;
            }
        }
        CliCommand::Describe { keymap } => {
            let keymap = registry.require(keymap)?;
            writeln!(out, "{}", keymap.name()).map_err(io_err)?;
            if let Some(parent) = registry.parent_of(keymap) {
                writeln!(out, "Parent: {}", parent.name()).map_err(io_err)?;
            }
            if let Some(doc) = keymap.doc() {
                writeln!(out, "\n{}", doc).map_err(io_err)?;
            }
        }
        CliCommand::Replay { keymap, chord } => {
            let node = registry.require(keymap)?.node();
            let keys = parse_chord(chord, registry.table())?;
            let mut dispatcher = ChordDispatcher::with_default_cancel(registry);
            for key in keys {
                let action = dispatcher.handle(registry, node, key);
                let label = match &action {
                    KeyAction::Execute(command) => format!("execute {}", command),
                    KeyAction::AwaitMore => "await more".to_string(),
                    KeyAction::NoMatch => "no match".to_string(),
                    KeyAction::Cancelled => "cancelled".to_string(),
                    KeyAction::Ignored => "ignored".to_string(),
                };
                writeln!(out, "{:<8} {}", key.render(registry.table()), label).map_err(io_err)?;
            }
        }
    }
    Ok(())
}
