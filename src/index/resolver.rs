//! Reference resolution across a set of documents.

use super::document::Document;
use crate::error::LoadError;
use crate::value::{Node, Value};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

/// DocId identifies a document inside one DocumentIndex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocId(usize);

const ROOT: DocId = DocId(0);

/// Location is the logical target of a reference: the document key relative
/// to the root document (empty for the root itself) and a JSON pointer.
///
/// Two trees parsed from different root files produce equal locations for
/// references that point at the same place in their respective layouts.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location {
    pub document: String,
    pub pointer: String,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.document, self.pointer)
    }
}

/// Target is a resolved reference.
#[derive(Debug, Clone, Copy)]
pub struct Target<'a> {
    pub document: DocId,
    pub node: &'a Node,
}

/// DocumentIndex holds a root document and every document it references.
#[derive(Debug, Clone)]
pub struct DocumentIndex {
    documents: Vec<Document>,
    keys: Vec<String>,
    by_key: HashMap<String, DocId>,
}

impl DocumentIndex {
    /// Creates an index around a root document.
    pub fn new(root: Document) -> Self {
        let mut by_key = HashMap::new();
        by_key.insert(String::new(), ROOT);
        if let Some(name) = Path::new(root.location()).file_name() {
            by_key.insert(name.to_string_lossy().into_owned(), ROOT);
        }
        DocumentIndex {
            documents: vec![root],
            keys: vec![String::new()],
            by_key,
        }
    }

    /// Registers a document under a key relative to the root document's
    /// directory, e.g. `schemas/pet.yaml`.
    pub fn insert(&mut self, key: &str, doc: Document) -> DocId {
        let key = join_relative("", key);
        if let Some(id) = self.by_key.get(&key) {
            return *id;
        }
        let id = DocId(self.documents.len());
        self.documents.push(doc);
        self.keys.push(key.clone());
        self.by_key.insert(key, id);
        id
    }

    /// Builder form of `insert`.
    pub fn with_document(mut self, key: &str, doc: Document) -> Self {
        self.insert(key, doc);
        self
    }

    pub fn root_id(&self) -> DocId {
        ROOT
    }

    pub fn root(&self) -> &Document {
        &self.documents[ROOT.0]
    }

    pub fn document(&self, id: DocId) -> Option<&Document> {
        self.documents.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Computes the logical location a reference written in document `from`
    /// points at. No lookup is performed.
    pub fn locate(&self, from: DocId, reference: &str) -> Location {
        let (file, fragment) = match reference.split_once('#') {
            Some((file, fragment)) => (file, fragment),
            None => (reference, ""),
        };
        let current = self.keys.get(from.0).map(String::as_str).unwrap_or("");
        let document = if file.is_empty() {
            current.to_string()
        } else {
            let key = join_relative(parent_of(current), file);
            match self.by_key.get(&key) {
                Some(&ROOT) => String::new(),
                _ => key,
            }
        };
        Location {
            document,
            pointer: fragment.to_string(),
        }
    }

    /// Resolves a reference written in document `from`.
    pub fn resolve(&self, from: DocId, reference: &str) -> Option<Target<'_>> {
        let location = self.locate(from, reference);
        let document = *self.by_key.get(&location.document)?;
        let node = self.documents[document.0].root().pointer(&location.pointer)?;
        Some(Target { document, node })
    }

    /// Returns the physical identity of a pointer inside a document, used to
    /// tell apart the same logical location in two different trees.
    pub fn identity(&self, id: DocId, pointer: &str) -> String {
        let location = self
            .document(id)
            .map(Document::location)
            .unwrap_or_default();
        format!("{}#{}", location, pointer)
    }

    /// Loads a root file and every file reachable from it through relative
    /// `$ref`s. Referenced files that cannot be read are skipped; their
    /// references stay unresolved.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        let mut index = DocumentIndex::new(Document::load(path)?);
        let mut pending = vec![ROOT];

        while let Some(id) = pending.pop() {
            let mut references = Vec::new();
            collect_references(index.documents[id.0].root(), &mut references);

            for reference in references {
                let location = index.locate(id, &reference);
                if location.document.is_empty()
                    || location.document.contains("://")
                    || index.by_key.contains_key(&location.document)
                {
                    continue;
                }
                match Document::load(&base.join(&location.document)) {
                    Ok(doc) => {
                        tracing::debug!(document = %location.document, "loaded referenced document");
                        pending.push(index.insert(&location.document, doc));
                    }
                    Err(e) => {
                        tracing::warn!("skipping unreadable reference target {}: {}", location.document, e);
                    }
                }
            }
        }

        Ok(index)
    }
}

fn collect_references(node: &Node, out: &mut Vec<String>) {
    match node.value() {
        Value::Map(m) => {
            if let Some(reference) = m.get("$ref").and_then(Node::as_str) {
                out.push(reference.to_string());
            }
            for child in m.values() {
                collect_references(child, out);
            }
        }
        Value::List(l) => {
            for child in l {
                collect_references(child, out);
            }
        }
        _ => {}
    }
}

fn parent_of(key: &str) -> &str {
    key.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("")
}

fn join_relative(base: &str, relative: &str) -> String {
    if relative.starts_with('/') || relative.contains("://") {
        return relative.to_string();
    }
    let mut segments: Vec<&str> = base.split('/').filter(|s| !s.is_empty()).collect();
    for segment in relative.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }
    segments.join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root(location: &str) -> Document {
        Document::from_yaml(
            location,
            "openapi: 3.1.0\ncomponents:\n  schemas:\n    Pet: {type: object}\n    Alias: {$ref: 'common/types.yaml#/Id'}\n",
        )
        .unwrap()
    }

    fn common() -> Document {
        Document::from_yaml("common/types.yaml", "Id: {type: string}\nBack: {$ref: '../api.yaml#/components/schemas/Pet'}\n").unwrap()
    }

    #[test]
    fn test_resolve_local_reference() {
        let index = DocumentIndex::new(root("api.yaml"));
        let target = index.resolve(index.root_id(), "#/components/schemas/Pet").unwrap();
        assert_eq!(target.document, index.root_id());
        assert_eq!(target.node.get("type").unwrap().literal(), "object");

        assert!(index.resolve(index.root_id(), "#/components/schemas/Missing").is_none());
    }

    #[test]
    fn test_resolve_external_reference() {
        let index = DocumentIndex::new(root("api.yaml")).with_document("common/types.yaml", common());
        let target = index.resolve(index.root_id(), "common/types.yaml#/Id").unwrap();
        assert_ne!(target.document, index.root_id());
        assert_eq!(target.node.get("type").unwrap().literal(), "string");

        // A relative reference from the external file back into the root.
        let back = index.locate(target.document, "../api.yaml#/components/schemas/Pet");
        assert_eq!(back.document, "");
        assert!(index.resolve(target.document, "../api.yaml#/components/schemas/Pet").is_some());
    }

    #[test]
    fn test_locations_are_logical() {
        let v1 = DocumentIndex::new(root("v1/api.yaml"));
        let v2 = DocumentIndex::new(root("v2/openapi.yaml"));
        let a = v1.locate(v1.root_id(), "#/components/schemas/Pet");
        let b = v2.locate(v2.root_id(), "#/components/schemas/Pet");
        assert_eq!(a, b);
        assert_ne!(
            v1.identity(v1.root_id(), &a.pointer),
            v2.identity(v2.root_id(), &b.pointer)
        );
        assert_eq!(a.to_string(), "#/components/schemas/Pet");
    }

    #[test]
    fn test_load_follows_relative_files() {
        let dir = tempfile::tempdir().expect("create temp dir");
        std::fs::create_dir(dir.path().join("common")).unwrap();
        std::fs::write(
            dir.path().join("api.yaml"),
            "openapi: 3.1.0\ncomponents:\n  schemas:\n    Id: {$ref: 'common/types.yaml#/Id'}\n    Gone: {$ref: 'missing.yaml#/Gone'}\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("common/types.yaml"),
            "Id: {$ref: './more.json#/Id'}\nBack: {$ref: '../api.yaml#/components/schemas/Id'}\n",
        )
        .unwrap();
        std::fs::write(dir.path().join("common/more.json"), r#"{"Id": {"type": "string"}}"#).unwrap();

        let index = DocumentIndex::load(&dir.path().join("api.yaml")).unwrap();
        // The root, its direct reference and the file that one references;
        // the missing file is skipped.
        assert_eq!(index.len(), 3);

        let types = index.resolve(index.root_id(), "common/types.yaml#/Id").unwrap();
        let more = index.resolve(types.document, "./more.json#/Id").unwrap();
        assert_eq!(more.node.get("type").unwrap().literal(), "string");
        assert!(index.document(more.document).unwrap().location().ends_with("more.json"));
        assert!(index.resolve(index.root_id(), "missing.yaml#/Gone").is_none());
    }

    #[test]
    fn test_load_missing_root_fails() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let err = DocumentIndex::load(&dir.path().join("nope.yaml")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn test_join_relative() {
        assert_eq!(join_relative("", "./a.yaml"), "a.yaml");
        assert_eq!(join_relative("schemas", "../common/b.yaml"), "common/b.yaml");
        assert_eq!(join_relative("a/b", "c.yaml"), "a/b/c.yaml");
        assert_eq!(join_relative("a", "https://example.com/x.yaml"), "https://example.com/x.yaml");
    }
}
