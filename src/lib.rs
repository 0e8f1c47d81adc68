//! # OpenAPI Changes
//!
//! Breaking-change aware structural diff of OpenAPI and JSON Schema schemas.
//!
//! Two schemas are compared keyword by keyword and recursively through their
//! sub-schemas. Every difference is recorded as a [`Change`] and classified as
//! breaking or not by a configurable rule set.
//!
//! ## Modules
//!
//! - [`value`] - In-memory document trees with source positions and content hashing
//! - [`index`] - Documents, OpenAPI version detection and `$ref` resolution
//! - [`model`] - Changes and change-set aggregation
//! - [`rules`] - Breaking change rules, defaults and the process-wide configuration
//! - [`compare`] - Property, collection and keyed map diff primitives
//! - [`objects`] - Comparison of the small objects embedded in schemas
//! - [`schema`] - The recursive schema differ
//! - [`error`] - Errors raised while loading documents and rules

pub mod compare;
pub mod error;
pub mod index;
pub mod model;
pub mod objects;
pub mod rules;
pub mod schema;
pub mod value;

pub use error::LoadError;
pub use index::{Document, DocumentIndex};
pub use model::{Change, ChangeKind, Changed, PropertyChanges};
pub use rules::{BreakingChangeRule, BreakingRulesConfig, Component, RuleSet};
pub use schema::{compare_document_schemas, compare_schemas, SchemaChanges, SchemaDiffer, SchemaProxy};
pub use value::Node;
