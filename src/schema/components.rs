//! Comparison of the named schemas of two documents.

use super::changes::SchemaChanges;
use super::differ::SchemaDiffer;
use super::proxy::SchemaProxy;
use crate::compare::check_map_for_changes_with;
use crate::index::DocumentIndex;
use crate::model::{Change, Changed, PropertyChanges};
use crate::rules::Component;
use serde::Serialize;
use std::collections::BTreeMap;

/// ComponentSchemaChanges holds the changes between the named schema
/// definitions of two documents.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentSchemaChanges {
    /// Schemas that were added or removed.
    pub property_changes: PropertyChanges,
    /// Changes inside schemas present in both documents, by name.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub schema_changes: BTreeMap<String, SchemaChanges>,
}

impl Changed for ComponentSchemaChanges {
    fn visit<'a>(&'a self, f: &mut dyn FnMut(&'a Change)) {
        self.property_changes.visit(f);
        self.schema_changes.visit(f);
    }
}

impl ComponentSchemaChanges {
    /// Returns every change with its path, prefixed by the schema name.
    pub fn changes_with_paths(&self) -> Vec<(String, &Change)> {
        let mut out: Vec<(String, &Change)> = self
            .property_changes
            .iter()
            .map(|c| (format!("schemas.{}", c.original().or(c.new_value()).unwrap_or_default()), c))
            .collect();
        for (name, changes) in &self.schema_changes {
            out.extend(
                changes
                    .changes_with_paths()
                    .into_iter()
                    .map(|(path, c)| (format!("schemas.{}.{}", name, path), c)),
            );
        }
        out
    }
}

/// Compares the named schema definitions (`definitions` or
/// `components.schemas`) of the root documents of two indexes.
///
/// Schemas are matched by name; each pair runs through `differ`.
pub fn compare_document_schemas(
    left: &DocumentIndex,
    right: &DocumentIndex,
    differ: &SchemaDiffer,
) -> Option<ComponentSchemaChanges> {
    let mut property_changes = PropertyChanges::new();
    let schema_changes = check_map_for_changes_with(
        Component::Components,
        "schemas",
        left.root().schemas(),
        right.root().schemas(),
        differ.rules(),
        &mut property_changes,
        |a, b| differ.unchanged(a, b),
        |_, a, b| differ.compare(Some(SchemaProxy::root(left, a)), Some(SchemaProxy::root(right, b))),
    );

    let result = ComponentSchemaChanges {
        property_changes,
        schema_changes,
    };
    (result.total_changes() > 0).then_some(result)
}
