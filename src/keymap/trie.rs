//! Keymap trie: nodes of key press → binding maps with parent fallback
//!
//! All nodes live in one arena owned by [`KeymapTrie`] and are addressed by
//! [`NodeId`]. A node's parent is a non-owning handle consulted when the node
//! has no entry for a key; submaps created for prefix keys have no parent.
//!
//! Resolution rules:
//! - each key press is searched in the current level, then up its parent
//!   chain, without consuming the key
//! - a prefix hit descends into the submap and marks a partial match
//! - a terminal hit ends the lookup, even if key presses remain
//! - a local entry for a key shadows the parent's entry and its whole subtree

use std::collections::HashSet;

use indexmap::IndexMap;

use super::binding::{Binding, NodeId};
use super::command::Command;
use super::keypress::{render_chord, KeyPress};
use super::table::KeyTable;

/// One level of the trie
#[derive(Debug, Clone, Default)]
pub struct KeymapNode {
    bindings: IndexMap<KeyPress, Binding>,
    parent: Option<NodeId>,
}

impl KeymapNode {
    /// Bindings in definition order
    pub fn bindings(&self) -> impl Iterator<Item = (&KeyPress, &Binding)> {
        self.bindings.iter()
    }

    pub fn get(&self, key: &KeyPress) -> Option<&Binding> {
        self.bindings.get(key)
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Outcome of resolving a key sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupResult {
    /// A terminal binding was reached
    pub complete: bool,
    /// The terminal command, when complete
    pub command: Option<Command>,
    /// Node holding the terminal binding, or the submap reached so far
    pub keymap: NodeId,
    /// Key presses consumed before the lookup stopped
    pub consumed: usize,
}

/// A terminal binding reached by [`KeymapTrie::traverse`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraversalEntry<'a> {
    pub keys: Vec<KeyPress>,
    pub command: &'a Command,
    /// Keymap the top-level key was found in
    pub origin: NodeId,
}

/// Arena of keymap nodes
#[derive(Debug, Clone, Default)]
pub struct KeymapTrie {
    nodes: Vec<KeymapNode>,
}

impl KeymapTrie {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate an empty node falling back to `parent`
    pub fn add_node(&mut self, parent: Option<NodeId>) -> NodeId {
        debug_assert!(
            parent.map_or(true, |p| self.contains(p)),
            "parent {:?} was not issued by this trie",
            parent
        );
        let id = NodeId(self.nodes.len());
        self.nodes.push(KeymapNode {
            bindings: IndexMap::new(),
            parent,
        });
        id
    }

    /// Access a node; ids are only handed out by this arena
    pub fn node(&self, id: NodeId) -> &KeymapNode {
        debug_assert!(self.contains(id), "{:?} was not issued by this trie", id);
        &self.nodes[id.0]
    }

    /// Whether `id` is in range for this arena
    ///
    /// An id from another trie may still be in range; this only rules out
    /// handles that would index past the end.
    pub fn contains(&self, id: NodeId) -> bool {
        id.0 < self.nodes.len()
    }

    /// Number of allocated nodes, including orphaned submaps
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Bind a key sequence under `node`
    ///
    /// Intermediate keys become prefix keys: an existing submap is reused,
    /// anything else (nothing, or a terminal command) is replaced by a fresh
    /// submap. The last key's slot is overwritten unconditionally, which
    /// discards a whole subtree if that slot was a prefix key.
    pub fn bind(&mut self, node: NodeId, keys: &[KeyPress], binding: Binding) {
        let Some((last, prefix)) = keys.split_last() else {
            return;
        };
        debug_assert!(self.contains(node), "{:?} was not issued by this trie", node);

        let mut current = node;
        for key in prefix {
            let existing = self.nodes[current.0].bindings.get(key).and_then(Binding::submap);
            current = match existing {
                Some(submap) => submap,
                None => {
                    let submap = self.add_node(None);
                    self.nodes[current.0]
                        .bindings
                        .insert(*key, Binding::Submap(submap));
                    submap
                }
            };
        }

        self.nodes[current.0].bindings.insert(*last, binding);
    }

    /// Remove the binding a complete lookup of `keys` resolves to
    ///
    /// The entry is removed from the node where it was found. For inherited
    /// bindings that is an ancestor, so every keymap sharing that ancestor
    /// loses the binding. Returns the mutated node, or `None` when `keys` do
    /// not resolve to a terminal binding in full.
    pub fn unbind(&mut self, node: NodeId, keys: &[KeyPress]) -> Option<NodeId> {
        let last = keys.last()?;
        let result = self.lookup(node, keys)?;
        if !result.complete || result.consumed != keys.len() {
            return None;
        }

        self.nodes[result.keymap.0].bindings.shift_remove(last);
        Some(result.keymap)
    }

    /// Find `key` in `start` or the first ancestor that binds it
    fn find_in_chain(&self, start: NodeId, key: &KeyPress) -> Option<(NodeId, &Binding)> {
        let mut current = Some(start);
        while let Some(id) = current {
            let node = &self.nodes[id.0];
            if let Some(binding) = node.bindings.get(key) {
                return Some((id, binding));
            }
            current = node.parent;
        }
        None
    }

    /// Resolve a key sequence starting at `root`
    ///
    /// Returns `complete: true` on the first terminal binding, `complete:
    /// false` when the whole sequence is a strict prefix of some binding, and
    /// `None` when no binding can match.
    pub fn lookup(&self, root: NodeId, keys: &[KeyPress]) -> Option<LookupResult> {
        let mut level = root;
        let mut partial_match = false;

        for (i, key) in keys.iter().enumerate() {
            match self.find_in_chain(level, key)? {
                (_, Binding::Submap(submap)) => {
                    level = *submap;
                    partial_match = true;
                }
                (found, Binding::Command(command)) => {
                    return Some(LookupResult {
                        complete: true,
                        command: Some(command.clone()),
                        keymap: found,
                        consumed: i + 1,
                    });
                }
            }
        }

        partial_match.then(|| LookupResult {
            complete: false,
            command: None,
            keymap: level,
            consumed: keys.len(),
        })
    }

    /// Entries visible from `node`: its own, then unshadowed ancestor entries
    fn visible_entries(&self, node: NodeId, origin: NodeId) -> Vec<(&KeyPress, &Binding, NodeId)> {
        let mut seen = HashSet::new();
        let mut entries = Vec::new();
        let mut current = Some(node);
        while let Some(id) = current {
            let level = &self.nodes[id.0];
            let entry_origin = if id == node { origin } else { id };
            for (key, binding) in &level.bindings {
                if seen.insert(*key) {
                    entries.push((key, binding, entry_origin));
                }
            }
            current = level.parent;
        }
        entries
    }

    /// Lazily enumerate every terminal binding reachable from `node`
    pub fn traverse(&self, node: NodeId) -> Traverse<'_> {
        Traverse {
            trie: self,
            stack: vec![Frame {
                prefix: Vec::new(),
                entries: self.visible_entries(node, node).into_iter(),
            }],
        }
    }

    /// `(chord, command name)` pairs for named commands reachable from `node`
    pub fn all_bindings(
        &self,
        node: NodeId,
        include_inherited: bool,
        table: &KeyTable,
    ) -> Vec<(String, String)> {
        self.collect_bindings(node, include_inherited, table, false)
    }

    /// Like [`all_bindings`](Self::all_bindings), also listing handles by label
    pub fn all_bindings_raw(
        &self,
        node: NodeId,
        include_inherited: bool,
        table: &KeyTable,
    ) -> Vec<(String, String)> {
        self.collect_bindings(node, include_inherited, table, true)
    }

    fn collect_bindings(
        &self,
        node: NodeId,
        include_inherited: bool,
        table: &KeyTable,
        include_handles: bool,
    ) -> Vec<(String, String)> {
        self.traverse(node)
            .filter(|entry| include_inherited || entry.origin == node)
            .filter_map(|entry| {
                let name = match entry.command {
                    Command::Named(name) => name.clone(),
                    Command::Handle(handle) if include_handles => handle.label().to_string(),
                    Command::Handle(_) => return None,
                };
                Some((render_chord(&entry.keys, table), name))
            })
            .collect()
    }
}

struct Frame<'a> {
    prefix: Vec<KeyPress>,
    entries: std::vec::IntoIter<(&'a KeyPress, &'a Binding, NodeId)>,
}

/// Depth-first iterator over terminal bindings, see [`KeymapTrie::traverse`]
pub struct Traverse<'a> {
    trie: &'a KeymapTrie,
    stack: Vec<Frame<'a>>,
}

impl<'a> Iterator for Traverse<'a> {
    type Item = TraversalEntry<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let frame = self.stack.last_mut()?;
            let Some((key, binding, origin)) = frame.entries.next() else {
                self.stack.pop();
                continue;
            };

            let mut keys = frame.prefix.clone();
            keys.push(*key);

            match binding {
                Binding::Command(command) => {
                    return Some(TraversalEntry {
                        keys,
                        command,
                        origin,
                    })
                }
                Binding::Submap(submap) => {
                    let entries = self.trie.visible_entries(*submap, origin).into_iter();
                    self.stack.push(Frame {
                        prefix: keys,
                        entries,
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap::keypress::parse_chord;

    fn keys(table: &KeyTable, chord: &str) -> Vec<KeyPress> {
        parse_chord(chord, table).unwrap()
    }

    fn cmd(name: &str) -> Binding {
        Binding::Command(Command::named(name))
    }

    #[test]
    fn test_contains_only_issued_ids() {
        let mut small = KeymapTrie::new();
        let mut large = KeymapTrie::new();
        small.add_node(None);
        large.add_node(None);
        let foreign = large.add_node(None);

        assert!(large.contains(foreign));
        assert!(!small.contains(foreign));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "was not issued by this trie")]
    fn test_foreign_parent_rejected_in_debug() {
        let mut other = KeymapTrie::new();
        other.add_node(None);
        let foreign = other.add_node(None);

        let mut trie = KeymapTrie::new();
        trie.add_node(Some(foreign));
    }

    #[test]
    fn test_single_key_lookup() {
        let table = KeyTable::standard();
        let mut trie = KeymapTrie::new();
        let root = trie.add_node(None);
        trie.bind(root, &keys(&table, "C-x"), cmd("a"));

        let result = trie.lookup(root, &keys(&table, "C-x")).unwrap();
        assert!(result.complete);
        assert_eq!(result.command, Some(Command::named("a")));
        assert_eq!(result.keymap, root);
        assert_eq!(result.consumed, 1);
    }

    #[test]
    fn test_prefix_then_complete() {
        let table = KeyTable::standard();
        let mut trie = KeymapTrie::new();
        let root = trie.add_node(None);
        trie.bind(root, &keys(&table, "C-x C-s"), cmd("b"));

        let partial = trie.lookup(root, &keys(&table, "C-x")).unwrap();
        assert!(!partial.complete);
        assert_eq!(partial.command, None);
        assert_ne!(partial.keymap, root);

        let full = trie.lookup(root, &keys(&table, "C-x C-s")).unwrap();
        assert!(full.complete);
        assert_eq!(full.command, Some(Command::named("b")));
        assert_eq!(full.keymap, partial.keymap);
    }

    #[test]
    fn test_no_match() {
        let table = KeyTable::standard();
        let mut trie = KeymapTrie::new();
        let root = trie.add_node(None);
        trie.bind(root, &keys(&table, "C-x C-s"), cmd("b"));

        assert_eq!(trie.lookup(root, &keys(&table, "C-y")), None);
        assert_eq!(trie.lookup(root, &keys(&table, "C-x C-y")), None);
        assert_eq!(trie.lookup(root, &[]), None);
    }

    #[test]
    fn test_terminal_short_circuits_trailing_keys() {
        let table = KeyTable::standard();
        let mut trie = KeymapTrie::new();
        let root = trie.add_node(None);
        trie.bind(root, &keys(&table, "C-x"), cmd("a"));

        let result = trie.lookup(root, &keys(&table, "C-x C-s")).unwrap();
        assert!(result.complete);
        assert_eq!(result.command, Some(Command::named("a")));
        assert_eq!(result.consumed, 1);
    }

    #[test]
    fn test_prefix_replaces_terminal() {
        let table = KeyTable::standard();
        let mut trie = KeymapTrie::new();
        let root = trie.add_node(None);
        trie.bind(root, &keys(&table, "C-c"), cmd("a"));
        trie.bind(root, &keys(&table, "C-c d"), cmd("b"));

        let result = trie.lookup(root, &keys(&table, "C-c")).unwrap();
        assert!(!result.complete);
        let result = trie.lookup(root, &keys(&table, "C-c d")).unwrap();
        assert_eq!(result.command, Some(Command::named("b")));
    }

    #[test]
    fn test_terminal_replaces_subtree() {
        let table = KeyTable::standard();
        let mut trie = KeymapTrie::new();
        let root = trie.add_node(None);
        trie.bind(root, &keys(&table, "C-c d"), cmd("b"));
        trie.bind(root, &keys(&table, "C-c e"), cmd("c"));
        trie.bind(root, &keys(&table, "C-c"), cmd("a"));

        let listed = trie.all_bindings(root, true, &table);
        assert_eq!(listed, vec![("C-c".to_string(), "a".to_string())]);
    }

    #[test]
    fn test_parent_fallback_at_top_level() {
        let table = KeyTable::standard();
        let mut trie = KeymapTrie::new();
        let base = trie.add_node(None);
        let child = trie.add_node(Some(base));
        trie.bind(base, &keys(&table, "C-q"), cmd("c"));

        let result = trie.lookup(child, &keys(&table, "C-q")).unwrap();
        assert!(result.complete);
        assert_eq!(result.keymap, base);
    }

    #[test]
    fn test_fallback_through_grandparent() {
        let table = KeyTable::standard();
        let mut trie = KeymapTrie::new();
        let root = trie.add_node(None);
        let mid = trie.add_node(Some(root));
        let leaf = trie.add_node(Some(mid));
        trie.bind(root, &keys(&table, "C-h k"), cmd("describe-key"));

        let partial = trie.lookup(leaf, &keys(&table, "C-h")).unwrap();
        assert!(!partial.complete);
        let full = trie.lookup(leaf, &keys(&table, "C-h k")).unwrap();
        assert_eq!(full.command, Some(Command::named("describe-key")));
    }

    #[test]
    fn test_local_prefix_shadows_parent_subtree() {
        let table = KeyTable::standard();
        let mut trie = KeymapTrie::new();
        let base = trie.add_node(None);
        let child = trie.add_node(Some(base));
        trie.bind(base, &keys(&table, "C-x C-f"), cmd("find-file"));
        trie.bind(child, &keys(&table, "C-x k"), cmd("kill"));

        // the child's C-x submap has no parent: base's C-x C-f is hidden
        assert_eq!(trie.lookup(child, &keys(&table, "C-x C-f")), None);
        assert!(trie.lookup(child, &keys(&table, "C-x k")).unwrap().complete);
        assert!(trie.lookup(base, &keys(&table, "C-x C-f")).unwrap().complete);
    }

    #[test]
    fn test_unbind_local() {
        let table = KeyTable::standard();
        let mut trie = KeymapTrie::new();
        let root = trie.add_node(None);
        trie.bind(root, &keys(&table, "C-x C-s"), cmd("b"));

        let mutated = trie.unbind(root, &keys(&table, "C-x C-s")).unwrap();
        assert_ne!(mutated, root);
        assert_eq!(trie.lookup(root, &keys(&table, "C-x C-s")), None);
        // the now-empty prefix submap remains
        assert!(trie.node(mutated).is_empty());
    }

    #[test]
    fn test_unbind_inherited_mutates_parent() {
        let table = KeyTable::standard();
        let mut trie = KeymapTrie::new();
        let base = trie.add_node(None);
        let child = trie.add_node(Some(base));
        let sibling = trie.add_node(Some(base));
        trie.bind(base, &keys(&table, "C-q"), cmd("c"));

        assert_eq!(trie.unbind(child, &keys(&table, "C-q")), Some(base));
        assert_eq!(trie.lookup(sibling, &keys(&table, "C-q")), None);
    }

    #[test]
    fn test_unbind_requires_full_match() {
        let table = KeyTable::standard();
        let mut trie = KeymapTrie::new();
        let root = trie.add_node(None);
        trie.bind(root, &keys(&table, "C-x"), cmd("a"));
        trie.bind(root, &keys(&table, "C-y C-z"), cmd("b"));

        assert_eq!(trie.unbind(root, &keys(&table, "C-x C-s")), None);
        assert_eq!(trie.unbind(root, &keys(&table, "C-y")), None);
        assert_eq!(trie.unbind(root, &keys(&table, "C-q")), None);
        assert!(trie.lookup(root, &keys(&table, "C-x")).unwrap().complete);
    }

    #[test]
    fn test_traverse_order_and_origin() {
        let table = KeyTable::standard();
        let mut trie = KeymapTrie::new();
        let base = trie.add_node(None);
        let child = trie.add_node(Some(base));
        trie.bind(base, &keys(&table, "C-a"), cmd("base-a"));
        trie.bind(base, &keys(&table, "C-b"), cmd("base-b"));
        trie.bind(child, &keys(&table, "C-c x"), cmd("child-cx"));
        trie.bind(child, &keys(&table, "C-b"), cmd("child-b"));

        let entries: Vec<_> = trie
            .traverse(child)
            .map(|e| (render_chord(&e.keys, &table), e.command.label().to_string(), e.origin))
            .collect();

        assert_eq!(
            entries,
            vec![
                ("C-c x".to_string(), "child-cx".to_string(), child),
                ("C-b".to_string(), "child-b".to_string(), child),
                ("C-a".to_string(), "base-a".to_string(), base),
            ]
        );
    }

    #[test]
    fn test_all_bindings_local_only() {
        let table = KeyTable::standard();
        let mut trie = KeymapTrie::new();
        let base = trie.add_node(None);
        let child = trie.add_node(Some(base));
        trie.bind(base, &keys(&table, "C-a"), cmd("base-a"));
        trie.bind(child, &keys(&table, "M-x"), cmd("child-x"));

        assert_eq!(
            trie.all_bindings(child, false, &table),
            vec![("M-x".to_string(), "child-x".to_string())]
        );
        assert_eq!(trie.all_bindings(child, true, &table).len(), 2);
    }

    #[test]
    fn test_all_bindings_skips_handles() {
        use crate::keymap::command::CommandHandle;

        let table = KeyTable::standard();
        let mut trie = KeymapTrie::new();
        let root = trie.add_node(None);
        trie.bind(
            root,
            &keys(&table, "C-l"),
            Binding::Command(Command::Handle(CommandHandle::new(1, "recenter"))),
        );
        trie.bind(root, &keys(&table, "C-g"), cmd("cancel"));

        assert_eq!(trie.all_bindings(root, true, &table).len(), 1);
        assert_eq!(
            trie.all_bindings_raw(root, true, &table),
            vec![
                ("C-l".to_string(), "recenter".to_string()),
                ("C-g".to_string(), "cancel".to_string()),
            ]
        );
    }
}
