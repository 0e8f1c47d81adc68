//! Compare module - Diff primitives shared by every object comparison.
//!
//! Three building blocks: a scalar property diff, an unordered diff of value
//! lists and a concurrent diff of keyed collections. Each records its
//! findings in a [`PropertyChanges`](crate::model::PropertyChanges) and asks a
//! [`RuleSet`](crate::rules::RuleSet) whether they are breaking.

mod collection;
mod keyed;
mod property;

pub use collection::*;
pub use keyed::*;
pub use property::*;
