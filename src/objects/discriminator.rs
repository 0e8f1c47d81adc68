//! Discriminators of polymorphic schemas.

use super::extensions::{compare_extensions, ExtensionChanges};
use crate::compare::{check_map_for_changes, check_properties, PropertyCheck};
use crate::model::{Change, ChangeKind, Changed, PropertyChanges};
use crate::rules::{Component, RuleSet};
use crate::value::Node;
use serde::Serialize;

/// DiscriminatorChanges holds changes to a `discriminator` object.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscriminatorChanges {
    pub property_changes: PropertyChanges,
    /// Changes to individual `mapping` entries, by mapping key.
    #[serde(skip_serializing_if = "PropertyChanges::is_empty")]
    pub mapping_changes: PropertyChanges,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension_changes: Option<ExtensionChanges>,
}

impl Changed for DiscriminatorChanges {
    fn visit<'a>(&'a self, f: &mut dyn FnMut(&'a Change)) {
        self.property_changes.visit(f);
        self.mapping_changes.visit(f);
        self.extension_changes.visit(f);
    }
}

/// Compares two `discriminator` objects.
///
/// `mapping` entries are compared per key: a key on one side only is an
/// added or removed object, a key whose target changed is a modification.
pub fn compare_discriminator(left: &Node, right: &Node, rules: &RuleSet) -> Option<DiscriminatorChanges> {
    let component = Component::Discriminator;
    let mut changes = PropertyChanges::new();
    let checks = ["propertyName", "defaultMapping"]
        .map(|label| PropertyCheck::field(component, label, Some(left), Some(right)));
    check_properties(&checks, rules, &mut changes);

    let mut mapping_changes = PropertyChanges::new();
    let modified = check_map_for_changes(
        component,
        "mapping",
        left.get("mapping").and_then(Node::as_map),
        right.get("mapping").and_then(Node::as_map),
        rules,
        &mut mapping_changes,
        |_, l, r| {
            let breaking = rules.is_breaking(component, "mapping", ChangeKind::Modified);
            Some(Change::new(ChangeKind::Modified, "mapping", Some(l), Some(r), breaking))
        },
    );
    mapping_changes.extend(modified.into_values());

    let result = DiscriminatorChanges {
        property_changes: changes,
        mapping_changes,
        extension_changes: compare_extensions(component, Some(left), Some(right), rules),
    };
    (result.total_changes() > 0).then_some(result)
}
