//! The unit of reported change.

use crate::value::Node;
use serde::{Deserialize, Serialize};
use std::fmt;

/// ChangeKind says what happened to a property or object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChangeKind {
    Modified,
    PropertyAdded,
    ObjectAdded,
    ObjectRemoved,
    PropertyRemoved,
}

impl ChangeKind {
    pub fn is_addition(&self) -> bool {
        matches!(self, ChangeKind::PropertyAdded | ChangeKind::ObjectAdded)
    }

    pub fn is_removal(&self) -> bool {
        matches!(self, ChangeKind::PropertyRemoved | ChangeKind::ObjectRemoved)
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ChangeKind::Modified => "modified",
            ChangeKind::PropertyAdded => "property added",
            ChangeKind::ObjectAdded => "object added",
            ChangeKind::ObjectRemoved => "object removed",
            ChangeKind::PropertyRemoved => "property removed",
        };
        f.write_str(s)
    }
}

/// ChangeContext records where the compared nodes were declared.
/// A side without a node has no position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_line: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_column: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_line: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_column: Option<usize>,
}

/// Change is one atomic difference between two compared values.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Change {
    kind: ChangeKind,
    property: String,
    breaking: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    original: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    new: Option<String>,
    context: ChangeContext,
    #[serde(skip)]
    original_object: Option<Node>,
    #[serde(skip)]
    new_object: Option<Node>,
}

impl Change {
    /// Creates a change between two (possibly absent) nodes.
    ///
    /// The original value is taken from the left node and the new value from
    /// the right node, each only when it renders to something non-empty. The
    /// nodes themselves become the original and new objects.
    pub fn new(
        kind: ChangeKind,
        property: impl Into<String>,
        left: Option<&Node>,
        right: Option<&Node>,
        breaking: bool,
    ) -> Self {
        let context = ChangeContext {
            original_line: left.and_then(|n| n.position).map(|p| p.line),
            original_column: left.and_then(|n| n.position).map(|p| p.column),
            new_line: right.and_then(|n| n.position).map(|p| p.line),
            new_column: right.and_then(|n| n.position).map(|p| p.column),
        };
        Change {
            kind,
            property: property.into(),
            breaking,
            original: left.map(Node::display).filter(|s| !s.is_empty()),
            new: right.map(Node::display).filter(|s| !s.is_empty()),
            context,
            original_object: left.cloned(),
            new_object: right.cloned(),
        }
    }

    /// Replaces the display values.
    pub fn with_values(mut self, original: Option<String>, new: Option<String>) -> Self {
        self.original = original;
        self.new = new;
        self
    }

    /// Replaces the source objects.
    pub fn with_objects(mut self, original: Option<Node>, new: Option<Node>) -> Self {
        self.original_object = original;
        self.new_object = new;
        self
    }

    pub fn kind(&self) -> ChangeKind {
        self.kind
    }

    pub fn property(&self) -> &str {
        &self.property
    }

    pub fn breaking(&self) -> bool {
        self.breaking
    }

    pub fn original(&self) -> Option<&str> {
        self.original.as_deref()
    }

    pub fn new_value(&self) -> Option<&str> {
        self.new.as_deref()
    }

    pub fn context(&self) -> &ChangeContext {
        &self.context
    }

    pub fn original_object(&self) -> Option<&Node> {
        self.original_object.as_ref()
    }

    pub fn new_object(&self) -> Option<&Node> {
        self.new_object.as_ref()
    }
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}'", self.kind, self.property)?;
        match (&self.original, &self.new) {
            (Some(o), Some(n)) => write!(f, ": {} -> {}", o, n)?,
            (Some(o), None) => write!(f, ": {}", o)?,
            (None, Some(n)) => write!(f, ": {}", n)?,
            (None, None) => {}
        }
        if self.breaking {
            write!(f, " (breaking)")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_change_takes_values_and_positions() {
        let left = Node::string("string").at(4, 9);
        let right = Node::string("integer").at(5, 9);
        let change = Change::new(ChangeKind::Modified, "type", Some(&left), Some(&right), true);

        assert_eq!(change.kind(), ChangeKind::Modified);
        assert_eq!(change.property(), "type");
        assert_eq!(change.original(), Some("string"));
        assert_eq!(change.new_value(), Some("integer"));
        assert!(change.breaking());
        assert_eq!(change.context().original_line, Some(4));
        assert_eq!(change.context().new_line, Some(5));
        assert_eq!(change.original_object(), Some(&left));
    }

    #[test]
    fn test_missing_side_has_no_value_or_position() {
        let right = Node::string("a value").at(2, 3);
        let change = Change::new(ChangeKind::PropertyAdded, "description", None, Some(&right), false);

        assert_eq!(change.original(), None);
        assert_eq!(change.context().original_line, None);
        assert_eq!(change.context().original_column, None);
        assert_eq!(change.context().new_column, Some(3));
        assert!(change.original_object().is_none());
    }

    #[test]
    fn test_empty_literal_is_not_a_value() {
        let left = Node::string("");
        let change = Change::new(ChangeKind::PropertyRemoved, "pattern", Some(&left), None, false);
        assert_eq!(change.original(), None);
    }

    #[test]
    fn test_display() {
        let change = Change::new(
            ChangeKind::Modified,
            "format",
            Some(&Node::string("int32")),
            Some(&Node::string("int64")),
            true,
        );
        assert_eq!(change.to_string(), "modified 'format': int32 -> int64 (breaking)");

        let json = serde_json::to_string(&change).unwrap();
        assert!(json.contains(r#""kind":"modified""#));
        assert!(!json.contains("originalObject"));
    }
}
