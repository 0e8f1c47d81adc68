//! Index module - Documents and `$ref` resolution.
//!
//! A DocumentIndex owns a root document plus every document its references
//! reach, and answers where a reference points, both logically (relative to
//! the root) and physically.

mod document;
mod resolver;

pub use document::*;
pub use resolver::*;
