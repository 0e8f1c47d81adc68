//! Scalar property comparison.

use crate::model::{Change, ChangeKind, PropertyChanges};
use crate::rules::{Component, RuleSet};
use crate::value::{content_hash, Node};

/// PropertyCheck describes one property to compare on two objects.
#[derive(Debug, Clone, Copy)]
pub struct PropertyCheck<'a> {
    /// The component whose rules classify the change.
    pub component: Component,
    /// The property name reported on the change.
    pub label: &'a str,
    /// The rule key classifying the change; the label unless set otherwise.
    pub rule: &'a str,
    pub left: Option<&'a Node>,
    pub right: Option<&'a Node>,
}

impl<'a> PropertyCheck<'a> {
    pub fn new(
        component: Component,
        label: &'a str,
        left: Option<&'a Node>,
        right: Option<&'a Node>,
    ) -> Self {
        PropertyCheck {
            component,
            label,
            rule: label,
            left,
            right,
        }
    }

    /// Classifies the change with another rule of the component, e.g. one
    /// rule shared by many keys.
    pub fn with_rule(mut self, rule: &'a str) -> Self {
        self.rule = rule;
        self
    }

    /// Creates a check of the same key on two (possibly absent) objects.
    pub fn field(component: Component, label: &'a str, left: Option<&'a Node>, right: Option<&'a Node>) -> Self {
        PropertyCheck::new(
            component,
            label,
            left.and_then(|n| n.get(label)),
            right.and_then(|n| n.get(label)),
        )
    }
}

/// Compares a single property and records at most one change.
///
/// A side is present when it has a node whose literal is not empty. Scalars
/// are compared by literal and tag, so `true` and `"true"` differ.
/// Collections are compared by tag and content hash.
///
/// A literal `null` on one side and an empty value on the other counts as
/// unchanged.
pub fn check_property(check: &PropertyCheck<'_>, rules: &RuleSet, changes: &mut PropertyChanges) {
    if is_null_empty_pair(check.left, check.right) {
        return;
    }
    let left = check.left.filter(|n| !n.is_empty());
    let right = check.right.filter(|n| !n.is_empty());

    let kind = match (left, right) {
        (Some(_), None) => ChangeKind::PropertyRemoved,
        (None, Some(_)) => ChangeKind::PropertyAdded,
        (Some(l), Some(r)) if differs(l, r) => ChangeKind::Modified,
        _ => return,
    };
    let breaking = rules.is_breaking(check.component, check.rule, kind);
    changes.push(Change::new(kind, check.label, left, right, breaking));
}

/// Runs `check_property` over a list of checks, in order.
pub fn check_properties(checks: &[PropertyCheck<'_>], rules: &RuleSet, changes: &mut PropertyChanges) {
    for check in checks {
        check_property(check, rules, changes);
    }
}

/// Records the addition or removal of a whole sub-object.
///
/// Returns both sides when both are present, so the caller can compare
/// them further. Null and empty values count as absent.
pub fn check_object<'a>(
    component: Component,
    label: &str,
    left: Option<&'a Node>,
    right: Option<&'a Node>,
    rules: &RuleSet,
    changes: &mut PropertyChanges,
) -> Option<(&'a Node, &'a Node)> {
    let left = left.filter(|n| !n.is_null() && !n.is_empty());
    let right = right.filter(|n| !n.is_null() && !n.is_empty());
    let kind = match (left, right) {
        (Some(l), Some(r)) => return Some((l, r)),
        (Some(_), None) => ChangeKind::ObjectRemoved,
        (None, Some(_)) => ChangeKind::ObjectAdded,
        (None, None) => return None,
    };
    let breaking = rules.is_breaking(component, label, kind);
    changes.push(Change::new(kind, label, left, right, breaking));
    None
}

fn is_null_empty_pair(left: Option<&Node>, right: Option<&Node>) -> bool {
    match (left, right) {
        (Some(l), Some(r)) => {
            (l.literal() == "null" && r.is_empty()) || (l.is_empty() && r.literal() == "null")
        }
        _ => false,
    }
}

fn differs(left: &Node, right: &Node) -> bool {
    if left.tag() != right.tag() {
        return true;
    }
    if left.is_collection() {
        return content_hash(left) != content_hash(right);
    }
    left.literal() != right.literal()
}
