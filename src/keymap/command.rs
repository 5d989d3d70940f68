//! Commands bound in keymaps and the registry they resolve through
//!
//! A terminal binding either names a registered command or carries an opaque
//! handle issued by the registry. Both resolve through [`CommandRegistry`].

use std::collections::HashMap;
use std::fmt;

/// Opaque handle to an anonymous command issued by a registry
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CommandHandle {
    id: u64,
    label: String,
}

impl CommandHandle {
    pub fn new(id: u64, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Human-readable label used when listing bindings
    pub fn label(&self) -> &str {
        &self.label
    }
}

/// The terminal payload of a binding
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    /// A command registered under a name
    Named(String),
    /// An anonymous command known only by its handle
    Handle(CommandHandle),
}

impl Command {
    pub fn named(name: impl Into<String>) -> Self {
        Command::Named(name.into())
    }

    /// Name of a named command
    pub fn name(&self) -> Option<&str> {
        match self {
            Command::Named(name) => Some(name),
            Command::Handle(_) => None,
        }
    }

    /// Name or handle label
    pub fn label(&self) -> &str {
        match self {
            Command::Named(name) => name,
            Command::Handle(handle) => handle.label(),
        }
    }
}

impl From<&str> for Command {
    fn from(name: &str) -> Self {
        Command::Named(name.to_string())
    }
}

impl From<CommandHandle> for Command {
    fn from(handle: CommandHandle) -> Self {
        Command::Handle(handle)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Named(name) => f.write_str(name),
            Command::Handle(handle) => write!(f, "<{}>", handle.label()),
        }
    }
}

/// The external command table keymaps resolve against
pub trait CommandRegistry {
    type Callable: ?Sized;

    /// Whether a command is registered under `name`
    fn exists(&self, name: &str) -> bool;

    /// Resolve a bound command to its callable
    fn resolve(&self, command: &Command) -> Option<&Self::Callable>;
}

/// Entry stored in a [`CommandSet`]
#[derive(Debug)]
struct CommandEntry<C> {
    callable: C,
    visible: bool,
}

/// In-memory command registry
#[derive(Debug)]
pub struct CommandSet<C> {
    named: HashMap<String, CommandEntry<C>>,
    handles: HashMap<u64, C>,
    next_handle: u64,
}

impl<C> Default for CommandSet<C> {
    fn default() -> Self {
        Self {
            named: HashMap::new(),
            handles: HashMap::new(),
            next_handle: 1,
        }
    }
}

impl<C> CommandSet<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a named command
    pub fn register(&mut self, name: impl Into<String>, callable: C) {
        self.insert(name.into(), callable, true);
    }

    /// Register a named command hidden from command listings
    pub fn register_hidden(&mut self, name: impl Into<String>, callable: C) {
        self.insert(name.into(), callable, false);
    }

    fn insert(&mut self, name: String, callable: C, visible: bool) {
        tracing::trace!(command = %name, visible, "Registering command");
        self.named.insert(name, CommandEntry { callable, visible });
    }

    /// Register an anonymous command, returning its handle
    pub fn register_handle(&mut self, label: impl Into<String>, callable: C) -> CommandHandle {
        let id = self.next_handle;
        self.next_handle += 1;
        self.handles.insert(id, callable);
        CommandHandle::new(id, label)
    }

    /// Names of visible commands, sorted
    pub fn visible_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .named
            .iter()
            .filter(|(_, entry)| entry.visible)
            .map(|(name, _)| name.as_str())
            .collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.named.len() + self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<C> CommandRegistry for CommandSet<C> {
    type Callable = C;

    fn exists(&self, name: &str) -> bool {
        self.named.contains_key(name)
    }

    fn resolve(&self, command: &Command) -> Option<&C> {
        match command {
            Command::Named(name) => self.named.get(name).map(|entry| &entry.callable),
            Command::Handle(handle) => self.handles.get(&handle.id()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_resolution() {
        let mut commands = CommandSet::new();
        commands.register("save-buffer", 1u32);

        assert!(commands.exists("save-buffer"));
        assert!(!commands.exists("quit"));
        assert_eq!(commands.resolve(&Command::named("save-buffer")), Some(&1));
        assert_eq!(commands.resolve(&Command::named("quit")), None);
    }

    #[test]
    fn test_handle_resolution() {
        let mut commands = CommandSet::new();
        let a = commands.register_handle("scroll-a", "a");
        let b = commands.register_handle("scroll-b", "b");

        assert_ne!(a, b);
        assert_eq!(commands.resolve(&Command::from(b.clone())), Some(&"b"));
        assert_eq!(Command::from(a).label(), "scroll-a");
        // handles are not names
        assert!(!commands.exists("scroll-a"));
    }

    #[test]
    fn test_visible_names() {
        let mut commands = CommandSet::new();
        commands.register("quit", ());
        commands.register("copy", ());
        commands.register_hidden("internal", ());

        assert_eq!(commands.visible_names(), vec!["copy", "quit"]);
        assert_eq!(commands.len(), 3);
    }

    #[test]
    fn test_command_display() {
        assert_eq!(Command::named("quit").to_string(), "quit");
        assert_eq!(
            Command::from(CommandHandle::new(7, "lambda")).to_string(),
            "<lambda>"
        );
    }
}
