//! Specification extensions (`x-*` keys).

use crate::compare::{check_properties, PropertyCheck};
use crate::model::{Change, Changed, PropertyChanges};
use crate::rules::{Component, RuleSet};
use crate::value::Node;
use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

/// ExtensionChanges holds changes to the `x-*` keys of one object.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionChanges {
    pub property_changes: PropertyChanges,
}

impl Changed for ExtensionChanges {
    fn visit<'a>(&'a self, f: &mut dyn FnMut(&'a Change)) {
        self.property_changes.visit(f);
    }
}

/// Returns true for keys that name a specification extension.
pub fn is_extension(key: &str) -> bool {
    key.starts_with("x-")
}

fn extensions_of(node: Option<&Node>) -> IndexMap<&str, &Node> {
    node.and_then(Node::as_map)
        .map(|m| {
            m.iter()
                .filter(|(k, _)| is_extension(k))
                .map(|(k, v)| (k.as_str(), v))
                .collect()
        })
        .unwrap_or_default()
}

/// Compares the extensions declared on two objects.
///
/// Each extension is reported under its own key; whether a change is
/// breaking is decided by the `extensions` rule of `component`.
pub fn compare_extensions(
    component: Component,
    left: Option<&Node>,
    right: Option<&Node>,
    rules: &RuleSet,
) -> Option<ExtensionChanges> {
    let left = extensions_of(left);
    let right = extensions_of(right);

    let keys: IndexSet<&str> = left.keys().chain(right.keys()).copied().collect();
    let checks: Vec<_> = keys
        .into_iter()
        .map(|key| {
            PropertyCheck::new(component, key, left.get(key).copied(), right.get(key).copied())
                .with_rule("extensions")
        })
        .collect();

    let mut changes = PropertyChanges::new();
    check_properties(&checks, rules, &mut changes);
    (!changes.is_empty()).then_some(ExtensionChanges {
        property_changes: changes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ChangeKind;
    use crate::value::from_yaml;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_extension_changes() {
        let left = from_yaml("type: string\nx-internal: true\nx-owner: team-a\n").unwrap();
        let right = from_yaml("type: integer\nx-owner: team-b\nx-since: 2\n").unwrap();
        let rules = RuleSet::defaults();

        let changes = compare_extensions(Component::Schema, Some(&left), Some(&right), &rules).unwrap();
        let summary: Vec<_> = changes
            .all_changes()
            .iter()
            .map(|c| (c.kind(), c.property().to_string()))
            .collect();
        assert_eq!(
            summary,
            vec![
                (ChangeKind::PropertyRemoved, "x-internal".to_string()),
                (ChangeKind::Modified, "x-owner".to_string()),
                (ChangeKind::PropertyAdded, "x-since".to_string()),
            ]
        );
        assert_eq!(changes.total_breaking_changes(), 0);
    }

    #[test]
    fn test_structured_extensions_use_the_extensions_rule() {
        let left = from_yaml("x-meta: {team: a, tier: 1}\nx-flag: true\n").unwrap();
        let reordered = from_yaml("x-flag: true\nx-meta: {tier: 1, team: a}\n").unwrap();
        let changed = from_yaml("x-meta: {team: b, tier: 1}\nx-flag: 'true'\n").unwrap();
        let strict = RuleSet::with_overrides(&crate::rules::BreakingRulesConfig::new().with_rule(
            Component::Tag,
            "extensions",
            crate::rules::BreakingChangeRule::new(false, true, true),
        ));

        assert!(compare_extensions(Component::Tag, Some(&left), Some(&reordered), &strict).is_none());

        let changes = compare_extensions(Component::Tag, Some(&left), Some(&changed), &strict).unwrap();
        let summary: Vec<_> = changes
            .all_changes()
            .iter()
            .map(|c| (c.property().to_string(), c.kind(), c.breaking()))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("x-meta".to_string(), ChangeKind::Modified, true),
                ("x-flag".to_string(), ChangeKind::Modified, true),
            ]
        );
    }

    #[test]
    fn test_no_extensions() {
        let left = from_yaml("type: string\n").unwrap();
        let rules = RuleSet::defaults();
        assert!(compare_extensions(Component::Schema, Some(&left), None, &rules).is_none());
        assert!(compare_extensions(Component::Schema, Some(&left), Some(&left), &rules).is_none());
    }
}
