//! Borrowed views of schemas inside a document index.

use crate::index::{DocId, DocumentIndex, Location};
use crate::value::Node;
use std::collections::HashSet;

/// SchemaProxy is a schema node together with the document it was found in.
///
/// A proxy may hold a `$ref`; [`SchemaProxy::schema`] returns the schema it
/// ultimately points at. Proxies are cheap to copy.
#[derive(Debug, Clone, Copy)]
pub struct SchemaProxy<'a> {
    index: &'a DocumentIndex,
    document: DocId,
    node: &'a Node,
}

impl<'a> SchemaProxy<'a> {
    pub fn new(index: &'a DocumentIndex, document: DocId, node: &'a Node) -> Self {
        SchemaProxy { index, document, node }
    }

    /// Creates a proxy for a node of the index's root document.
    pub fn root(index: &'a DocumentIndex, node: &'a Node) -> Self {
        SchemaProxy::new(index, index.root_id(), node)
    }

    /// Creates a proxy for the schema at `pointer` in the root document.
    pub fn at(index: &'a DocumentIndex, pointer: &str) -> Option<Self> {
        let node = index.root().root().pointer(pointer)?;
        Some(SchemaProxy::root(index, node))
    }

    pub fn index(&self) -> &'a DocumentIndex {
        self.index
    }

    pub fn document(&self) -> DocId {
        self.document
    }

    pub fn node(&self) -> &'a Node {
        self.node
    }

    /// Creates a proxy for a node nested in this schema.
    pub fn child(&self, node: &'a Node) -> SchemaProxy<'a> {
        SchemaProxy::new(self.index, self.document, node)
    }

    /// Creates a proxy for the value of `key`, if present.
    pub fn get(&self, key: &str) -> Option<SchemaProxy<'a>> {
        self.node.get(key).map(|n| self.child(n))
    }

    /// Returns the `$ref` string of this schema, if it is a reference.
    pub fn reference(&self) -> Option<&'a str> {
        self.node.get("$ref").and_then(Node::as_str)
    }

    pub fn is_reference(&self) -> bool {
        self.reference().is_some()
    }

    /// Returns where the reference points, relative to the root document.
    pub fn location(&self) -> Option<Location> {
        self.reference()
            .map(|reference| self.index.locate(self.document, reference))
    }

    /// Returns the physical identity of the reference target, which tells the
    /// same location in two different trees apart.
    pub fn identity(&self) -> Option<String> {
        let reference = self.reference()?;
        let location = self.index.locate(self.document, reference);
        Some(match self.index.resolve(self.document, reference) {
            Some(target) => self.index.identity(target.document, &location.pointer),
            None => location.to_string(),
        })
    }

    /// Follows `$ref`s until a schema that is not a reference.
    ///
    /// Returns `None` when this schema is not a reference, when a reference
    /// can not be resolved, or when the chain loops back on itself.
    pub fn resolve(&self) -> Option<SchemaProxy<'a>> {
        self.reference()?;
        let mut seen = HashSet::new();
        let mut current = *self;
        while let Some(reference) = current.reference() {
            let location = self.index.locate(current.document, reference);
            if !seen.insert(location.clone()) {
                tracing::debug!(reference = %location, "reference chain loops back on itself");
                return None;
            }
            let Some(target) = self.index.resolve(current.document, reference) else {
                tracing::debug!(reference = %location, "unresolved reference, comparing as written");
                return None;
            };
            current = SchemaProxy::new(self.index, target.document, target.node);
        }
        Some(current)
    }

    /// Returns the resolved schema, or this one when it can not be resolved.
    pub fn schema(&self) -> SchemaProxy<'a> {
        self.resolve().unwrap_or(*self)
    }
}
