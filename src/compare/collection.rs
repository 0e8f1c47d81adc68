//! Unordered comparison of value lists.

use crate::model::{Change, ChangeKind, PropertyChanges};
use crate::rules::{Component, RuleSet};
use crate::value::Node;
use indexmap::IndexMap;

/// Compares two value lists as sets of case-insensitive display strings.
///
/// Values only on the left are reported as `PropertyRemoved`, values only on
/// the right as `PropertyAdded`, one change per value. Order is ignored and
/// there is no modification case: a changed value is a removal plus an
/// addition. A scalar in place of a list counts as a list of one.
pub fn check_for_collection_changes(
    component: Component,
    label: &str,
    left: Option<&Node>,
    right: Option<&Node>,
    rules: &RuleSet,
    changes: &mut PropertyChanges,
) {
    let left_values = normalize(left);
    let right_values = normalize(right);

    for (key, node) in &left_values {
        if !right_values.contains_key(key) {
            let breaking = rules.is_breaking(component, label, ChangeKind::PropertyRemoved);
            changes.push(Change::new(ChangeKind::PropertyRemoved, label, Some(node), None, breaking));
        }
    }
    for (key, node) in &right_values {
        if !left_values.contains_key(key) {
            let breaking = rules.is_breaking(component, label, ChangeKind::PropertyAdded);
            changes.push(Change::new(ChangeKind::PropertyAdded, label, None, Some(node), breaking));
        }
    }
}

fn normalize(node: Option<&Node>) -> IndexMap<String, &Node> {
    let mut values = IndexMap::new();
    let items = match node {
        None => return values,
        Some(n) => match n.as_list() {
            Some(items) => items.iter().collect::<Vec<_>>(),
            None if n.is_empty() || n.is_null() => Vec::new(),
            None => vec![n],
        },
    };
    for item in items {
        values.entry(item.display().to_lowercase()).or_insert(item);
    }
    values
}
