//! Document nodes: the parsed tree the differ walks.

use indexmap::IndexMap;
use once_cell::sync::OnceCell;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Serialize, Serializer};
use std::borrow::Cow;
use std::fmt;

/// Mapping is an ordered key-value map. Iteration follows declaration order.
pub type Mapping = IndexMap<String, Node>;

/// Value is the payload of a node.
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<Node>),
    Map(Mapping),
}

/// Position is the source location of a node, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

/// Tag distinguishes value kinds that share a literal, e.g. `true` and `"true"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Null,
    Bool,
    Int,
    Float,
    Str,
    Seq,
    Map,
}

impl Tag {
    /// Returns the YAML core schema spelling of the tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Tag::Null => "!!null",
            Tag::Bool => "!!bool",
            Tag::Int => "!!int",
            Tag::Float => "!!float",
            Tag::Str => "!!str",
            Tag::Seq => "!!seq",
            Tag::Map => "!!map",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Node is a value together with where it was declared.
///
/// Positions are metadata: two nodes compare equal when their values do,
/// wherever they sit in their documents.
///
/// A node's value is fixed once built, so its content hash and whether it
/// holds a `$ref` are computed at most once.
#[derive(Debug, Clone, Default)]
pub struct Node {
    value: Value,
    pub position: Option<Position>,
    pub(super) digest: OnceCell<u64>,
    pub(super) references: OnceCell<bool>,
}

impl Node {
    pub fn new(value: Value) -> Self {
        Node {
            value,
            ..Default::default()
        }
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn null() -> Self {
        Node::new(Value::Null)
    }

    pub fn bool(b: bool) -> Self {
        Node::new(Value::Bool(b))
    }

    pub fn int(i: i64) -> Self {
        Node::new(Value::Int(i))
    }

    pub fn float(f: f64) -> Self {
        Node::new(Value::Float(f))
    }

    pub fn string(s: impl Into<String>) -> Self {
        Node::new(Value::String(s.into()))
    }

    pub fn list(items: Vec<Node>) -> Self {
        Node::new(Value::List(items))
    }

    pub fn map(entries: Mapping) -> Self {
        Node::new(Value::Map(entries))
    }

    /// Attaches a source position.
    pub fn at(mut self, line: usize, column: usize) -> Self {
        self.position = Some(Position { line, column });
        self
    }

    pub fn position(&self) -> Option<Position> {
        self.position
    }

    pub fn tag(&self) -> Tag {
        match self.value {
            Value::Null => Tag::Null,
            Value::Bool(_) => Tag::Bool,
            Value::Int(_) => Tag::Int,
            Value::Float(_) => Tag::Float,
            Value::String(_) => Tag::Str,
            Value::List(_) => Tag::Seq,
            Value::Map(_) => Tag::Map,
        }
    }

    /// Returns the literal text of a scalar. Collections have no literal.
    pub fn literal(&self) -> Cow<'_, str> {
        match &self.value {
            Value::Null => Cow::Borrowed("null"),
            Value::Bool(true) => Cow::Borrowed("true"),
            Value::Bool(false) => Cow::Borrowed("false"),
            Value::Int(i) => Cow::Owned(i.to_string()),
            Value::Float(f) => Cow::Owned(format!("{:?}", f)),
            Value::String(s) => Cow::Borrowed(s),
            Value::List(_) | Value::Map(_) => Cow::Borrowed(""),
        }
    }

    /// Returns a human readable rendering: the literal for scalars, compact
    /// JSON for collections.
    pub fn display(&self) -> String {
        match &self.value {
            Value::List(_) | Value::Map(_) => {
                serde_json::to_string(self).unwrap_or_default()
            }
            _ => self.literal().into_owned(),
        }
    }

    /// Returns true for scalars whose literal is empty.
    pub fn is_empty(&self) -> bool {
        matches!(&self.value, Value::String(s) if s.is_empty())
    }

    pub fn is_null(&self) -> bool {
        matches!(self.value, Value::Null)
    }

    pub fn is_bool(&self) -> bool {
        matches!(self.value, Value::Bool(_))
    }

    pub fn is_list(&self) -> bool {
        matches!(self.value, Value::List(_))
    }

    pub fn is_map(&self) -> bool {
        matches!(self.value, Value::Map(_))
    }

    pub fn is_collection(&self) -> bool {
        self.is_list() || self.is_map()
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.value {
            Value::Bool(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match &self.value {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Node]> {
        match &self.value {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Mapping> {
        match &self.value {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Looks up a key when this node is a map.
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.as_map().and_then(|m| m.get(key))
    }

    /// Looks up a JSON pointer (RFC 6901) below this node.
    pub fn pointer(&self, pointer: &str) -> Option<&Node> {
        if pointer.is_empty() {
            return Some(self);
        }
        let rest = pointer.strip_prefix('/')?;
        let mut current = self;
        for token in rest.split('/') {
            let token = token.replace("~1", "/").replace("~0", "~");
            current = match &current.value {
                Value::Map(m) => m.get(token.as_str())?,
                Value::List(l) => l.get(token.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            _ => false,
        }
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match &self.value {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::String(s) => serializer.serialize_str(s),
            Value::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (k, v) in entries {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}

impl From<serde_yaml::Value> for Node {
    fn from(value: serde_yaml::Value) -> Self {
        use serde_yaml::Value as Yaml;
        match value {
            Yaml::Null => Node::null(),
            Yaml::Bool(b) => Node::bool(b),
            Yaml::Number(n) => number_node(n.as_i64(), n.as_f64()),
            Yaml::String(s) => Node::string(s),
            Yaml::Sequence(items) => Node::list(items.into_iter().map(Node::from).collect()),
            Yaml::Mapping(entries) => Node::map(
                entries
                    .into_iter()
                    .map(|(k, v)| (Node::from(k).display(), Node::from(v)))
                    .collect(),
            ),
            Yaml::Tagged(tagged) => Node::from(tagged.value),
        }
    }
}

impl From<serde_json::Value> for Node {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value as Json;
        match value {
            Json::Null => Node::null(),
            Json::Bool(b) => Node::bool(b),
            Json::Number(n) => number_node(n.as_i64(), n.as_f64()),
            Json::String(s) => Node::string(s),
            Json::Array(items) => Node::list(items.into_iter().map(Node::from).collect()),
            Json::Object(entries) => {
                Node::map(entries.into_iter().map(|(k, v)| (k, Node::from(v))).collect())
            }
        }
    }
}

fn number_node(int: Option<i64>, float: Option<f64>) -> Node {
    match (int, float) {
        (Some(i), _) => Node::int(i),
        (None, Some(f)) => Node::float(f),
        (None, None) => Node::null(),
    }
}

/// Parse a node tree from YAML.
pub fn from_yaml(yaml: &str) -> Result<Node, serde_yaml::Error> {
    let value: serde_yaml::Value = serde_yaml::from_str(yaml)?;
    Ok(Node::from(value))
}

/// Parse a node tree from JSON.
pub fn from_json(json: &str) -> Result<Node, serde_json::Error> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    Ok(Node::from(value))
}

/// Serialize a node tree to JSON.
pub fn to_json(node: &Node) -> Result<String, serde_json::Error> {
    serde_json::to_string(node)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_and_tag() {
        assert_eq!(Node::bool(true).literal(), "true");
        assert_eq!(Node::string("true").literal(), "true");
        assert_ne!(Node::bool(true).tag(), Node::string("true").tag());

        assert_eq!(Node::null().literal(), "null");
        assert_eq!(Node::int(42).literal(), "42");
        assert_eq!(Node::float(1.5).literal(), "1.5");
        assert_eq!(Node::float(1.0).literal(), "1.0");
        assert_eq!(Node::list(vec![]).literal(), "");
        assert_eq!(Tag::Map.as_str(), "!!map");
    }

    #[test]
    fn test_empty() {
        assert!(Node::string("").is_empty());
        assert!(!Node::null().is_empty());
        assert!(!Node::map(Mapping::new()).is_empty());
    }

    #[test]
    fn test_from_yaml_preserves_order() {
        let node = from_yaml("zeta: 1\nalpha: two\nmid: [true, 1.5]\n").unwrap();
        let keys: Vec<&str> = node.as_map().unwrap().keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
        assert_eq!(node.get("zeta").unwrap().tag(), Tag::Int);
        assert_eq!(node.get("alpha").unwrap().as_str(), Some("two"));
        assert_eq!(node.pointer("/mid/0").unwrap().as_bool(), Some(true));
    }

    #[test]
    fn test_from_json_preserves_order() {
        let node = from_json(r#"{"b": 1, "a": {"c": null}}"#).unwrap();
        let keys: Vec<&str> = node.as_map().unwrap().keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert!(node.pointer("/a/c").unwrap().is_null());
    }

    #[test]
    fn test_pointer_escapes() {
        let node = from_yaml("paths:\n  /pets/{id}:\n    a~b: 1\n").unwrap();
        let found = node.pointer("/paths/~1pets~1{id}/a~0b").unwrap();
        assert_eq!(found.literal(), "1");
        assert!(node.pointer("/paths/missing").is_none());
        assert!(node.pointer("no-slash").is_none());
        assert_eq!(node.pointer("").unwrap(), &node);
    }

    #[test]
    fn test_display_collections_as_json() {
        let node = from_yaml("type: object\nrequired: [a, b]\n").unwrap();
        assert_eq!(node.display(), r#"{"type":"object","required":["a","b"]}"#);
        assert_eq!(to_json(&node).unwrap(), node.display());
    }

    #[test]
    fn test_equality_ignores_position() {
        let a = Node::string("x").at(3, 7);
        let b = Node::string("x");
        assert_eq!(a, b);
        assert_eq!(a.position(), Some(Position { line: 3, column: 7 }));
    }
}
