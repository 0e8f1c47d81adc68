//! Reference cycle tracking.

/// VisitKey identifies a pair of references being compared: the physical
/// identity of the left target and of the right target.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VisitKey {
    pub left: String,
    pub right: String,
}

impl VisitKey {
    pub fn new(left: impl Into<String>, right: impl Into<String>) -> Self {
        VisitKey {
            left: left.into(),
            right: right.into(),
        }
    }
}

/// RefStack is the set of reference pairs being compared on the current call
/// stack.
///
/// Each frame borrows its parent, so pushing never copies and a frame is
/// gone as soon as the comparison that pushed it returns. Frames are `Sync`
/// and can be shared with the tasks of a keyed diff.
#[derive(Debug, Default)]
pub struct RefStack<'p> {
    key: Option<VisitKey>,
    parent: Option<&'p RefStack<'p>>,
}

impl RefStack<'static> {
    /// Creates an empty stack.
    pub fn new() -> Self {
        RefStack::default()
    }
}

impl<'p> RefStack<'p> {
    /// Returns a new frame on top of this one.
    pub fn push<'a>(&'a self, key: VisitKey) -> RefStack<'a> {
        RefStack {
            key: Some(key),
            parent: Some(self),
        }
    }

    /// Returns true if `key` is on the stack.
    pub fn contains(&self, key: &VisitKey) -> bool {
        let mut frame = Some(self);
        while let Some(f) = frame {
            if f.key.as_ref() == Some(key) {
                return true;
            }
            frame = f.parent;
        }
        false
    }

    /// Number of pushed frames.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut frame = Some(self);
        while let Some(f) = frame {
            if f.key.is_some() {
                depth += 1;
            }
            frame = f.parent;
        }
        depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_contains() {
        let root = RefStack::new();
        let a = VisitKey::new("l.yaml#/A", "r.yaml#/A");
        let b = VisitKey::new("l.yaml#/B", "r.yaml#/B");

        assert!(!root.contains(&a));
        let first = root.push(a.clone());
        let second = first.push(b.clone());
        assert!(second.contains(&a));
        assert!(second.contains(&b));
        assert!(!first.contains(&b));
        assert_eq!(second.depth(), 2);
        assert_eq!(root.depth(), 0);
    }

    #[test]
    fn test_same_location_in_other_trees_is_distinct() {
        let root = RefStack::new();
        let frame = root.push(VisitKey::new("left.yaml#/A", "right.yaml#/A"));
        assert!(!frame.contains(&VisitKey::new("left.yaml#/A", "other.yaml#/A")));
    }
}
