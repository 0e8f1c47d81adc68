//! Value module - In-memory representation of parsed YAML/JSON documents.
//!
//! Nodes carry a literal, a value tag and an optional source position, and
//! can be hashed structurally.

mod hash;
mod value;

pub use hash::*;
pub use value::*;
