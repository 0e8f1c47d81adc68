//! Change-sets and their totals.

use super::change::Change;
use serde::Serialize;
use std::collections::BTreeMap;

/// Changed is implemented by every change-set.
///
/// Implementations only have to walk their changes; totals are derived.
/// Absent change-sets (`None`) implement it too and report nothing, so
/// totals can be asked of any sub-change-set without checking first.
pub trait Changed {
    /// Calls `f` for every change, direct changes first, then sub-change-sets
    /// depth-first.
    fn visit<'a>(&'a self, f: &mut dyn FnMut(&'a Change));

    /// Returns every change, flattened depth-first.
    fn all_changes(&self) -> Vec<&Change> {
        let mut out = Vec::new();
        self.visit(&mut |c| out.push(c));
        out
    }

    fn total_changes(&self) -> usize {
        let mut total = 0;
        self.visit(&mut |_| total += 1);
        total
    }

    fn total_breaking_changes(&self) -> usize {
        let mut total = 0;
        self.visit(&mut |c| {
            if c.breaking() {
                total += 1;
            }
        });
        total
    }
}

impl<T: Changed> Changed for Option<T> {
    fn visit<'a>(&'a self, f: &mut dyn FnMut(&'a Change)) {
        if let Some(inner) = self {
            inner.visit(f);
        }
    }
}

impl<T: Changed + ?Sized> Changed for Box<T> {
    fn visit<'a>(&'a self, f: &mut dyn FnMut(&'a Change)) {
        (**self).visit(f);
    }
}

impl<T: Changed> Changed for Vec<T> {
    fn visit<'a>(&'a self, f: &mut dyn FnMut(&'a Change)) {
        for item in self {
            item.visit(f);
        }
    }
}

impl<K, T: Changed> Changed for BTreeMap<K, T> {
    fn visit<'a>(&'a self, f: &mut dyn FnMut(&'a Change)) {
        for item in self.values() {
            item.visit(f);
        }
    }
}

/// PropertyChanges is an ordered list of direct changes.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct PropertyChanges {
    changes: Vec<Change>,
}

impl PropertyChanges {
    pub fn new() -> Self {
        PropertyChanges::default()
    }

    pub fn push(&mut self, change: Change) {
        self.changes.push(change);
    }

    pub fn changes(&self) -> &[Change] {
        &self.changes
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Change> {
        self.changes.iter()
    }
}

impl Extend<Change> for PropertyChanges {
    fn extend<I: IntoIterator<Item = Change>>(&mut self, iter: I) {
        self.changes.extend(iter);
    }
}

impl FromIterator<Change> for PropertyChanges {
    fn from_iter<I: IntoIterator<Item = Change>>(iter: I) -> Self {
        PropertyChanges {
            changes: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for PropertyChanges {
    type Item = Change;
    type IntoIter = std::vec::IntoIter<Change>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.into_iter()
    }
}

impl Changed for PropertyChanges {
    fn visit<'a>(&'a self, f: &mut dyn FnMut(&'a Change)) {
        for change in &self.changes {
            f(change);
        }
    }
}

impl Changed for Change {
    fn visit<'a>(&'a self, f: &mut dyn FnMut(&'a Change)) {
        f(self);
    }
}

/// Totals over a group of change-sets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub changes: usize,
    pub breaking_changes: usize,
}

/// Sums the changes of several change-sets.
pub fn aggregate(sets: &[&dyn Changed]) -> Totals {
    let mut totals = Totals::default();
    for set in sets {
        set.visit(&mut |c| {
            totals.changes += 1;
            if c.breaking() {
                totals.breaking_changes += 1;
            }
        });
    }
    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ChangeKind;
    use crate::value::Node;

    fn change(property: &str, breaking: bool) -> Change {
        Change::new(
            ChangeKind::PropertyAdded,
            property,
            None,
            Some(&Node::string("x")),
            breaking,
        )
    }

    #[test]
    fn test_totals() {
        let mut changes = PropertyChanges::new();
        changes.push(change("a", true));
        changes.push(change("b", false));

        assert_eq!(changes.total_changes(), 2);
        assert_eq!(changes.total_breaking_changes(), 1);
        assert_eq!(changes.all_changes()[1].property(), "b");
    }

    #[test]
    fn test_absent_sets_report_zero() {
        let none: Option<PropertyChanges> = None;
        assert_eq!(none.total_changes(), 0);
        assert_eq!(none.total_breaking_changes(), 0);
        assert!(none.all_changes().is_empty());
    }

    #[test]
    fn test_aggregate_nested() {
        let direct: PropertyChanges = vec![change("a", true)].into_iter().collect();
        let mut nested = BTreeMap::new();
        nested.insert("x".to_string(), Some(PropertyChanges::from_iter([change("b", true)])));
        nested.insert("y".to_string(), None);
        let boxed: Option<Box<PropertyChanges>> = Some(Box::new(PropertyChanges::from_iter([
            change("c", false),
        ])));
        let missing: Option<PropertyChanges> = None;

        let totals = aggregate(&[&direct, &nested, &boxed, &missing]);
        assert_eq!(
            totals,
            Totals {
                changes: 3,
                breaking_changes: 2
            }
        );
    }
}
