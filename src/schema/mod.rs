//! Schema module - Recursive comparison of JSON Schema / OpenAPI schemas.
//!
//! A [`SchemaDiffer`] walks two schemas in parallel. Equal subtrees are
//! skipped by content hash, references to the same location are equal
//! without being resolved, and every change is classified by the breaking
//! change rules. The result is a [`SchemaChanges`] tree, or `None` when the
//! schemas are equivalent.

mod changes;
mod components;
mod cycle;
mod differ;
mod proxy;


pub use changes::*;
pub use components::*;
pub use cycle::*;
pub use differ::*;
pub use proxy::*;
