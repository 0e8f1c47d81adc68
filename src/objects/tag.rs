//! Tag objects.

use super::external_docs::{compare_external_docs, ExternalDocChanges};
use super::extensions::{compare_extensions, ExtensionChanges};
use crate::compare::{check_object, check_properties, PropertyCheck};
use crate::model::{Change, Changed, PropertyChanges};
use crate::rules::{Component, RuleSet};
use crate::value::Node;
use serde::Serialize;

const TAG_PROPERTIES: [&str; 5] = ["name", "summary", "description", "parent", "kind"];

/// TagChanges holds changes to a `tag` object.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TagChanges {
    pub property_changes: PropertyChanges,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_docs_changes: Option<ExternalDocChanges>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension_changes: Option<ExtensionChanges>,
}

impl Changed for TagChanges {
    fn visit<'a>(&'a self, f: &mut dyn FnMut(&'a Change)) {
        self.property_changes.visit(f);
        self.external_docs_changes.visit(f);
        self.extension_changes.visit(f);
    }
}

/// Compares two `tag` objects.
pub fn compare_tag(left: &Node, right: &Node, rules: &RuleSet) -> Option<TagChanges> {
    let component = Component::Tag;
    let mut changes = PropertyChanges::new();
    let checks = TAG_PROPERTIES.map(|label| PropertyCheck::field(component, label, Some(left), Some(right)));
    check_properties(&checks, rules, &mut changes);

    let external_docs_changes = check_object(
        component,
        "externalDocs",
        left.get("externalDocs"),
        right.get("externalDocs"),
        rules,
        &mut changes,
    )
    .and_then(|(l, r)| compare_external_docs(l, r, rules));

    let result = TagChanges {
        property_changes: changes,
        external_docs_changes,
        extension_changes: compare_extensions(component, Some(left), Some(right), rules),
    };
    (result.total_changes() > 0).then_some(result)
}
