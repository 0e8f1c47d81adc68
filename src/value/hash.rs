//! Content hashing for node trees.

use super::value::{Node, Value};
use xxhash_rust::xxh3::Xxh3;

/// Compute a stable structural hash of a node tree.
///
/// Map keys are hashed in sorted order, so two maps holding the same entries
/// in a different declaration order hash identically. List order is
/// significant. Source positions are not hashed.
///
/// The hash of every node is cached on first use; a collection hashes the
/// cached hashes of its children, so a tree is walked at most once however
/// often its subtrees are compared.
pub fn content_hash(node: &Node) -> u64 {
    *node.digest.get_or_init(|| {
        let mut hasher = Xxh3::new();
        write_node(&mut hasher, node);
        hasher.digest()
    })
}

/// Returns true if the tree contains a `$ref` entry anywhere. Cached per
/// node like [`content_hash`].
pub fn contains_reference(node: &Node) -> bool {
    *node.references.get_or_init(|| match node.value() {
        Value::Map(m) => m.contains_key("$ref") || m.values().any(contains_reference),
        Value::List(l) => l.iter().any(contains_reference),
        _ => false,
    })
}

fn write_node(hasher: &mut Xxh3, node: &Node) {
    match node.value() {
        Value::Null => hasher.update(&[0]),
        Value::Bool(b) => hasher.update(&[1, *b as u8]),
        Value::Int(i) => {
            hasher.update(&[2]);
            hasher.update(&i.to_le_bytes());
        }
        Value::Float(f) => {
            hasher.update(&[3]);
            hasher.update(&f.to_bits().to_le_bytes());
        }
        Value::String(s) => {
            hasher.update(&[4]);
            write_str(hasher, s);
        }
        Value::List(items) => {
            hasher.update(&[5]);
            hasher.update(&(items.len() as u64).to_le_bytes());
            for item in items {
                hasher.update(&content_hash(item).to_le_bytes());
            }
        }
        Value::Map(entries) => {
            hasher.update(&[6]);
            hasher.update(&(entries.len() as u64).to_le_bytes());
            let mut sorted: Vec<_> = entries.iter().collect();
            sorted.sort_by(|a, b| a.0.cmp(b.0));
            for (k, v) in sorted {
                write_str(hasher, k);
                hasher.update(&content_hash(v).to_le_bytes());
            }
        }
    }
}

fn write_str(hasher: &mut Xxh3, s: &str) {
    hasher.update(&(s.len() as u64).to_le_bytes());
    hasher.update(s.as_bytes());
}
