//! Benchmarks for key resolution hot paths
//!
//! - Chord string parsing
//! - Lookup through deep parent chains
//! - Full binding listing for describe-bindings style views
//!
//! Run with: cargo bench lookup

use chordmap::keymap::{
    parse_chord, Command, CommandSet, KeyPress, KeyTable, KeymapRegistry, NodeId,
};

#[global_allocator]
static ALLOC: divan::AllocProfiler = divan::AllocProfiler::system();

fn main() {
    divan::main();
}

const LETTERS: &str = "abcdefghijklmnopqrstuvwxyz";

/// A chain of `depth` keymaps and the deepest keymap's node
///
/// The root binds `C-c <letter>` for every letter; each level binds one
/// `M-<letter> F1` chord of its own.
fn chained_registry(depth: usize) -> (KeymapRegistry, NodeId) {
    let mut commands = CommandSet::new();
    commands.register("noop", ());

    let mut registry = KeymapRegistry::default();
    let mut parent: Option<String> = None;
    let mut last = None;
    for level in 0..depth {
        let name = format!("level-{}", level);
        let node = registry
            .create_child(&name, parent.as_deref(), None)
            .unwrap();
        if level == 0 {
            for c in LETTERS.chars() {
                registry
                    .define(node, &format!("C-c {}", c), Command::named("noop"), &commands)
                    .unwrap();
            }
        }
        let unique = LETTERS.chars().nth(level % LETTERS.len()).unwrap_or('a');
        registry
            .define(node, &format!("M-{} F1", unique), Command::named("noop"), &commands)
            .unwrap();
        parent = Some(name);
        last = Some(node);
    }
    (registry, last.unwrap())
}

#[divan::bench]
fn parse_single_key() {
    let table = KeyTable::standard();
    divan::black_box(KeyPress::from_string(divan::black_box("C-M-x"), &table).ok());
}

#[divan::bench(args = [1, 4, 16])]
fn parse_chord_of_length(bencher: divan::Bencher, len: usize) {
    let table = KeyTable::standard();
    let chord = vec!["C-x"; len].join(" ");
    bencher.bench_local(|| divan::black_box(parse_chord(divan::black_box(&chord), &table).ok()));
}

#[divan::bench(args = [1, 8, 32])]
fn lookup_inherited(bencher: divan::Bencher, depth: usize) {
    let (registry, node) = chained_registry(depth);
    // bound only at the root, so every lookup walks the full chain
    let keys = parse_chord("C-c a", registry.table()).unwrap();
    bencher.bench_local(|| divan::black_box(registry.lookup(node, divan::black_box(&keys))));
}

#[divan::bench(args = [1, 8, 32])]
fn lookup_miss(bencher: divan::Bencher, depth: usize) {
    let (registry, node) = chained_registry(depth);
    let keys = parse_chord("C-q", registry.table()).unwrap();
    bencher.bench_local(|| divan::black_box(registry.lookup(node, divan::black_box(&keys))));
}

#[divan::bench(args = [1, 8, 32])]
fn all_bindings_with_inherited(bencher: divan::Bencher, depth: usize) {
    let (registry, node) = chained_registry(depth);
    bencher.bench_local(|| divan::black_box(registry.all_bindings(node, true)));
}
