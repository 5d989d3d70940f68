//! Binding slots stored in keymap trie nodes

use super::command::Command;

/// Handle to a node in a [`KeymapTrie`](super::trie::KeymapTrie) arena
///
/// Handles never own the node they point to; nodes live as long as the trie.
/// A handle is only valid in the registry that issued it: another registry
/// may panic on it or resolve it to an unrelated node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// What a key press in a trie node is bound to
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Binding {
    /// Terminal binding: the chord ends here
    Command(Command),
    /// Prefix key: the chord continues in this nested node
    Submap(NodeId),
}

impl Binding {
    pub fn is_prefix(&self) -> bool {
        matches!(self, Binding::Submap(_))
    }

    pub fn command(&self) -> Option<&Command> {
        match self {
            Binding::Command(cmd) => Some(cmd),
            Binding::Submap(_) => None,
        }
    }

    pub fn submap(&self) -> Option<NodeId> {
        match self {
            Binding::Submap(id) => Some(*id),
            Binding::Command(_) => None,
        }
    }
}

impl From<Command> for Binding {
    fn from(command: Command) -> Self {
        Binding::Command(command)
    }
}
