//! Concurrent comparison of keyed collections.

use crate::model::{Change, ChangeKind, PropertyChanges};
use crate::rules::{Component, RuleSet};
use crate::value::{content_hash, Mapping, Node};
use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

/// Compares two keyed collections, treating values with equal content hashes
/// as unchanged. See [`check_map_for_changes_with`].
pub fn check_map_for_changes<'m, R, F>(
    component: Component,
    label: &str,
    left: Option<&'m Mapping>,
    right: Option<&'m Mapping>,
    rules: &RuleSet,
    changes: &mut PropertyChanges,
    compare: F,
) -> BTreeMap<String, R>
where
    R: Send,
    F: Fn(&str, &'m Node, &'m Node) -> Option<R> + Sync,
{
    check_map_for_changes_with(
        component,
        label,
        left,
        right,
        rules,
        changes,
        |l, r| content_hash(l) == content_hash(r),
        compare,
    )
}

/// Compares two keyed collections.
///
/// Keys only on the left are reported as `ObjectRemoved`, keys only on the
/// right as `ObjectAdded`. Keys on both sides whose values are not
/// `unchanged` are handed to `compare`, and every `Some` result is kept under
/// its key.
///
/// Every key of each side is examined as its own rayon task; the call returns
/// once all of them finished. Reported changes are sorted by kind and key
/// before they are appended, so the output does not depend on scheduling.
#[allow(clippy::too_many_arguments)]
pub fn check_map_for_changes_with<'m, R, P, F>(
    component: Component,
    label: &str,
    left: Option<&'m Mapping>,
    right: Option<&'m Mapping>,
    rules: &RuleSet,
    changes: &mut PropertyChanges,
    unchanged: P,
    compare: F,
) -> BTreeMap<String, R>
where
    R: Send,
    P: Fn(&Node, &Node) -> bool + Sync,
    F: Fn(&str, &'m Node, &'m Node) -> Option<R> + Sync,
{
    tracing::trace!(
        label,
        left = left.map_or(0, |m| m.len()),
        right = right.map_or(0, |m| m.len()),
        "keyed diff"
    );

    let found: Mutex<Vec<(ChangeKind, &str, Change)>> = Mutex::new(Vec::new());
    let results: Mutex<BTreeMap<String, R>> = Mutex::new(BTreeMap::new());

    rayon::scope(|s| {
        let found = &found;
        let results = &results;
        let unchanged = &unchanged;
        let compare = &compare;

        for (key, l) in left.into_iter().flatten() {
            s.spawn(move |_| match right.and_then(|m| m.get(key)) {
                Some(r) => {
                    if unchanged(l, r) {
                        return;
                    }
                    if let Some(result) = compare(key.as_str(), l, r) {
                        results
                            .lock()
                            .unwrap_or_else(PoisonError::into_inner)
                            .insert(key.clone(), result);
                    }
                }
                None => {
                    let kind = ChangeKind::ObjectRemoved;
                    let change = Change::new(kind, label, Some(l), None, rules.is_breaking(component, label, kind))
                        .with_values(Some(display_value(key, l)), None);
                    found
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .push((kind, key.as_str(), change));
                }
            });
        }
        for (key, r) in right.into_iter().flatten() {
            s.spawn(move |_| {
                if left.map_or(false, |m| m.contains_key(key)) {
                    return;
                }
                let kind = ChangeKind::ObjectAdded;
                let change = Change::new(kind, label, None, Some(r), rules.is_breaking(component, label, kind))
                    .with_values(None, Some(display_value(key, r)));
                found
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push((kind, key.as_str(), change));
            });
        }
    });

    let mut found = found.into_inner().unwrap_or_else(PoisonError::into_inner);
    found.sort_by(|a, b| (!a.0.is_removal(), a.1).cmp(&(!b.0.is_removal(), b.1)));
    changes.extend(found.into_iter().map(|(_, _, change)| change));

    results.into_inner().unwrap_or_else(PoisonError::into_inner)
}

/// Nodes without a literal of their own are shown by their key.
fn display_value(key: &str, node: &Node) -> String {
    let literal = node.literal();
    if literal.is_empty() {
        key.to_string()
    } else {
        literal.into_owned()
    }
}
