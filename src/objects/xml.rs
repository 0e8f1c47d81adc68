//! XML serialization hints of a schema.

use super::extensions::{compare_extensions, ExtensionChanges};
use crate::compare::{check_properties, PropertyCheck};
use crate::model::{Change, Changed, PropertyChanges};
use crate::rules::{Component, RuleSet};
use crate::value::Node;
use serde::Serialize;

const XML_PROPERTIES: [&str; 6] = ["name", "namespace", "prefix", "attribute", "wrapped", "nodeType"];

/// XmlChanges holds changes to an `xml` object.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct XmlChanges {
    pub property_changes: PropertyChanges,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension_changes: Option<ExtensionChanges>,
}

impl Changed for XmlChanges {
    fn visit<'a>(&'a self, f: &mut dyn FnMut(&'a Change)) {
        self.property_changes.visit(f);
        self.extension_changes.visit(f);
    }
}

/// Compares two `xml` objects.
pub fn compare_xml(left: &Node, right: &Node, rules: &RuleSet) -> Option<XmlChanges> {
    let component = Component::Xml;
    let mut changes = PropertyChanges::new();
    let checks = XML_PROPERTIES.map(|label| PropertyCheck::field(component, label, Some(left), Some(right)));
    check_properties(&checks, rules, &mut changes);

    let result = XmlChanges {
        property_changes: changes,
        extension_changes: compare_extensions(component, Some(left), Some(right), rules),
    };
    (result.total_changes() > 0).then_some(result)
}
