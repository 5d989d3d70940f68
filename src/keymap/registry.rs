//! Named keymap registry
//!
//! Owns the key table, the trie arena and the table of named keymap roots.
//! The registry is an explicit value: hosts build one at startup and pass it
//! to whatever needs keymaps, tests build their own. It performs no locking;
//! callers serialize mutation and lookup.

use std::collections::HashMap;

use super::binding::{Binding, NodeId};
use super::command::{Command, CommandRegistry};
use super::error::KeymapError;
use super::keypress::{parse_chord, KeyPress};
use super::table::KeyTable;
use super::trie::{KeymapTrie, LookupResult};

/// A named keymap root
///
/// Only meaningful in the registry that created it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keymap {
    name: String,
    doc: Option<String>,
    node: NodeId,
}

impl Keymap {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn doc(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    /// First line of the documentation
    pub fn brief_doc(&self) -> Option<&str> {
        self.doc.as_deref().and_then(|doc| doc.lines().next())
    }

    /// Root node of this keymap in the registry's trie
    pub fn node(&self) -> NodeId {
        self.node
    }
}

/// Named keymaps over a shared trie and key table
#[derive(Debug, Clone)]
pub struct KeymapRegistry {
    table: KeyTable,
    trie: KeymapTrie,
    keymaps: Vec<Keymap>,
    by_name: HashMap<String, usize>,
}

impl Default for KeymapRegistry {
    fn default() -> Self {
        Self::new(KeyTable::standard())
    }
}

impl KeymapRegistry {
    /// Create an empty registry over `table`
    pub fn new(table: KeyTable) -> Self {
        Self {
            table,
            trie: KeymapTrie::new(),
            keymaps: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    pub fn table(&self) -> &KeyTable {
        &self.table
    }

    /// Mutable key table access, for seeding shift punctuation at startup
    pub fn table_mut(&mut self) -> &mut KeyTable {
        &mut self.table
    }

    pub fn trie(&self) -> &KeymapTrie {
        &self.trie
    }

    /// Create a keymap named `name` falling back to `parent`
    ///
    /// Parent chains must stay acyclic; this is not checked.
    pub fn create(
        &mut self,
        name: &str,
        parent: Option<&Keymap>,
        doc: Option<&str>,
    ) -> Result<NodeId, KeymapError> {
        let parent = parent.map(Keymap::node);
        self.create_with_parent_node(name, parent, doc)
    }

    /// Create a keymap whose parent is named rather than borrowed
    pub fn create_child(
        &mut self,
        name: &str,
        parent: Option<&str>,
        doc: Option<&str>,
    ) -> Result<NodeId, KeymapError> {
        let parent = match parent {
            Some(parent) => Some(self.require(parent)?.node()),
            None => None,
        };
        self.create_with_parent_node(name, parent, doc)
    }

    fn create_with_parent_node(
        &mut self,
        name: &str,
        parent: Option<NodeId>,
        doc: Option<&str>,
    ) -> Result<NodeId, KeymapError> {
        if self.by_name.contains_key(name) {
            return Err(KeymapError::DuplicateKeymap(name.to_string()));
        }

        let node = self.trie.add_node(parent);
        self.by_name.insert(name.to_string(), self.keymaps.len());
        self.keymaps.push(Keymap {
            name: name.to_string(),
            doc: doc.map(str::to_string),
            node,
        });
        tracing::debug!(keymap = name, ?parent, "Created keymap");
        Ok(node)
    }

    pub fn get(&self, name: &str) -> Option<&Keymap> {
        self.by_name.get(name).map(|&idx| &self.keymaps[idx])
    }

    /// Like [`get`](Self::get), failing with `UnknownKeymap`
    pub fn require(&self, name: &str) -> Result<&Keymap, KeymapError> {
        self.get(name)
            .ok_or_else(|| KeymapError::UnknownKeymap(name.to_string()))
    }

    /// Keymaps in creation order
    pub fn keymaps(&self) -> impl Iterator<Item = &Keymap> {
        self.keymaps.iter()
    }

    /// Keymap whose root is `node`, if any
    pub fn keymap_for_node(&self, node: NodeId) -> Option<&Keymap> {
        self.keymaps.iter().find(|keymap| keymap.node == node)
    }

    /// Parent keymap of a named keymap
    pub fn parent_of(&self, keymap: &Keymap) -> Option<&Keymap> {
        let parent = self.trie.node(keymap.node).parent()?;
        self.keymap_for_node(parent)
    }

    /// Bind `chord` (e.g. `"C-x C-s"`) to `command` under `node`
    ///
    /// Named commands must exist in `commands`; this is checked before the
    /// trie is touched.
    pub fn define<R: CommandRegistry + ?Sized>(
        &mut self,
        node: NodeId,
        chord: &str,
        command: Command,
        commands: &R,
    ) -> Result<(), KeymapError> {
        let keys = parse_chord(chord, &self.table)?;
        if let Command::Named(name) = &command {
            if !commands.exists(name) {
                return Err(KeymapError::UnknownCommand(name.clone()));
            }
        }

        tracing::debug!(chord, %command, "Defining key");
        self.trie.bind(node, &keys, Binding::Command(command));
        Ok(())
    }

    /// Remove the binding `chord` resolves to from `node`'s point of view
    ///
    /// When the binding is inherited, the entry is removed from the ancestor
    /// that holds it, which affects every keymap inheriting from it. Returns
    /// the node that was mutated.
    pub fn undefine(&mut self, node: NodeId, chord: &str) -> Result<Option<NodeId>, KeymapError> {
        let keys = parse_chord(chord, &self.table)?;
        let mutated = self.trie.unbind(node, &keys);
        match mutated {
            Some(owner) if owner != node => {
                tracing::warn!(
                    chord,
                    owner = ?self.keymap_for_node(owner).map(Keymap::name),
                    "Undefined an inherited binding in its owning keymap"
                );
            }
            Some(_) => tracing::debug!(chord, "Undefined key"),
            None => tracing::debug!(chord, "Nothing to undefine"),
        }
        Ok(mutated)
    }

    /// Resolve a sequence of key presses starting at `node`
    pub fn lookup(&self, node: NodeId, keys: &[KeyPress]) -> Option<LookupResult> {
        self.trie.lookup(node, keys)
    }

    /// Parse and resolve a chord string starting at `node`
    pub fn lookup_chord(&self, node: NodeId, chord: &str) -> Result<Option<LookupResult>, KeymapError> {
        let keys = parse_chord(chord, &self.table)?;
        Ok(self.trie.lookup(node, &keys))
    }

    /// `(chord, command name)` pairs reachable from `node`
    pub fn all_bindings(&self, node: NodeId, include_inherited: bool) -> Vec<(String, String)> {
        self.trie.all_bindings(node, include_inherited, &self.table)
    }

    /// Like [`all_bindings`](Self::all_bindings), also listing handles
    pub fn all_bindings_raw(&self, node: NodeId, include_inherited: bool) -> Vec<(String, String)> {
        self.trie.all_bindings_raw(node, include_inherited, &self.table)
    }
}
