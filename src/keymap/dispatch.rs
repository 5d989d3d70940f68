//! Chord dispatcher: the pending-sequence side of key handling
//!
//! Accumulates key presses for the active keymap, resolves the growing
//! sequence after each press, and resets on completion, on a dead end and on
//! the cancel key.

use super::binding::NodeId;
use super::command::Command;
use super::keypress::{render_chord, KeyPress};
use super::registry::KeymapRegistry;
use super::types::{EventType, RawKeyEvent};

/// Result of handling a key press
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    /// Execute this command
    Execute(Command),
    /// Key press is part of a chord, await more input
    AwaitMore,
    /// No binding matches the pending sequence
    NoMatch,
    /// The cancel key cleared the pending sequence
    Cancelled,
    /// The raw event did not map to a known key
    Ignored,
}

/// Pending chord state for one input source
#[derive(Debug, Clone)]
pub struct ChordDispatcher {
    pending: Vec<KeyPress>,
    cancel: Option<KeyPress>,
}

impl ChordDispatcher {
    /// Dispatcher without a cancel key
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
            cancel: None,
        }
    }

    /// Dispatcher using `C-g` from `registry`'s table as the cancel key
    pub fn with_default_cancel(registry: &KeymapRegistry) -> Self {
        let cancel = KeyPress::from_string("C-g", registry.table()).ok();
        Self {
            pending: Vec::new(),
            cancel,
        }
    }

    /// Replace the cancel key
    pub fn set_cancel_key(&mut self, cancel: Option<KeyPress>) {
        self.cancel = cancel;
    }

    /// Clear pending chord state
    pub fn reset(&mut self) {
        self.pending.clear();
    }

    /// Handle a key press against the keymap rooted at `keymap`
    ///
    /// The cancel key aborts a pending chord even if the keymap binds it
    /// there. With nothing pending it resolves like any other key.
    pub fn handle(
        &mut self,
        registry: &KeymapRegistry,
        keymap: NodeId,
        keypress: KeyPress,
    ) -> KeyAction {
        if self.cancel == Some(keypress) && !self.pending.is_empty() {
            self.reset();
            tracing::debug!("Pending chord cancelled");
            return KeyAction::Cancelled;
        }

        self.pending.push(keypress);
        match registry.lookup(keymap, &self.pending) {
            Some(result) if result.complete => {
                self.reset();
                match result.command {
                    Some(command) => KeyAction::Execute(command),
                    None => KeyAction::NoMatch,
                }
            }
            Some(_) => {
                tracing::trace!(pending = %self.pending_display(registry).unwrap_or_default(), "Awaiting more keys");
                KeyAction::AwaitMore
            }
            None => {
                tracing::debug!(
                    chord = %render_chord(&self.pending, registry.table()),
                    "No binding"
                );
                self.reset();
                KeyAction::NoMatch
            }
        }
    }

    /// Convert a raw event and handle it; releases and unknown keys are ignored
    pub fn handle_raw(
        &mut self,
        registry: &KeymapRegistry,
        keymap: NodeId,
        event: &RawKeyEvent,
    ) -> KeyAction {
        if event.event_type != EventType::Press {
            return KeyAction::Ignored;
        }
        match KeyPress::from_raw_event(event, registry.table()) {
            Some(keypress) => self.handle(registry, keymap, keypress),
            None => KeyAction::Ignored,
        }
    }

    /// Check if any chord is in progress
    pub fn has_pending_chord(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn pending(&self) -> &[KeyPress] {
        &self.pending
    }

    /// Get the pending chord (for echoing to the user)
    pub fn pending_display(&self, registry: &KeymapRegistry) -> Option<String> {
        if self.pending.is_empty() {
            None
        } else {
            Some(render_chord(&self.pending, registry.table()))
        }
    }
}

impl Default for ChordDispatcher {
    fn default() -> Self {
        Self::new()
    }
}
