//! External documentation objects.

use super::extensions::{compare_extensions, ExtensionChanges};
use crate::compare::{check_properties, PropertyCheck};
use crate::model::{Change, Changed, PropertyChanges};
use crate::rules::{Component, RuleSet};
use crate::value::Node;
use serde::Serialize;

/// ExternalDocChanges holds changes to an `externalDocs` object.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalDocChanges {
    pub property_changes: PropertyChanges,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension_changes: Option<ExtensionChanges>,
}

impl Changed for ExternalDocChanges {
    fn visit<'a>(&'a self, f: &mut dyn FnMut(&'a Change)) {
        self.property_changes.visit(f);
        self.extension_changes.visit(f);
    }
}

/// Compares two `externalDocs` objects.
pub fn compare_external_docs(left: &Node, right: &Node, rules: &RuleSet) -> Option<ExternalDocChanges> {
    let component = Component::ExternalDocs;
    let mut changes = PropertyChanges::new();
    let checks = ["url", "description"].map(|label| PropertyCheck::field(component, label, Some(left), Some(right)));
    check_properties(&checks, rules, &mut changes);

    let result = ExternalDocChanges {
        property_changes: changes,
        extension_changes: compare_extensions(component, Some(left), Some(right), rules),
    };
    (result.total_changes() > 0).then_some(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ChangeKind;
    use crate::value::from_yaml;

    #[test]
    fn test_external_docs_never_break() {
        let left = from_yaml("url: https://example.com/v1\ndescription: Docs\n").unwrap();
        let right = from_yaml("url: https://example.com/v2\nx-audience: public\n").unwrap();
        let rules = RuleSet::defaults();

        let changes = compare_external_docs(&left, &right, &rules).unwrap();
        assert_eq!(changes.total_changes(), 3);
        assert_eq!(changes.total_breaking_changes(), 0);
        assert_eq!(changes.property_changes.changes()[1].kind(), ChangeKind::PropertyRemoved);

        assert!(compare_external_docs(&left, &left, &rules).is_none());
    }
}
