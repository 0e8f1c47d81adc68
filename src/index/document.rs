//! Parsed documents and OpenAPI version detection.

use crate::error::LoadError;
use crate::value::{self, Mapping, Node};
use std::path::Path;

/// The OpenAPI family a document belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecVersion {
    /// Swagger 2.0, schemas live under `definitions`.
    Swagger2,
    /// OpenAPI 3.x, schemas live under `components.schemas`.
    OpenApi3,
    /// Anything else, e.g. a bare JSON Schema or a fragment file.
    Unknown,
}

/// Document is one parsed file together with its identity.
#[derive(Debug, Clone)]
pub struct Document {
    location: String,
    root: Node,
    version: SpecVersion,
}

impl Document {
    /// Creates a document from an already parsed tree.
    ///
    /// `location` identifies the physical source (a path or URL) and is used
    /// for cycle tracking and diagnostics only.
    pub fn new(location: impl Into<String>, root: Node) -> Self {
        let version = detect_version(&root);
        Document {
            location: location.into(),
            root,
            version,
        }
    }

    /// Parses a document from YAML text.
    pub fn from_yaml(location: impl Into<String>, yaml: &str) -> Result<Self, LoadError> {
        let location = location.into();
        let root = value::from_yaml(yaml)
            .map_err(|e| LoadError::invalid_yaml(location.clone(), e.to_string()))?;
        Ok(Document::new(location, root))
    }

    /// Parses a document from JSON text.
    pub fn from_json(location: impl Into<String>, json: &str) -> Result<Self, LoadError> {
        let location = location.into();
        let root = value::from_json(json)
            .map_err(|e| LoadError::invalid_json(location.clone(), e.to_string()))?;
        Ok(Document::new(location, root))
    }

    /// Reads and parses a file; `.json` files are parsed as JSON, anything
    /// else as YAML.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let text = std::fs::read_to_string(path).map_err(|e| LoadError::io(path, e))?;
        let location = path.display().to_string();
        let is_json = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        if is_json {
            Document::from_json(location, &text)
        } else {
            Document::from_yaml(location, &text)
        }
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn version(&self) -> SpecVersion {
        self.version
    }

    /// Returns the named schema definitions of the document, if any.
    pub fn schemas(&self) -> Option<&Mapping> {
        match self.version {
            SpecVersion::Swagger2 => self.root.get("definitions")?.as_map(),
            SpecVersion::OpenApi3 => self.root.pointer("/components/schemas")?.as_map(),
            SpecVersion::Unknown => self
                .root
                .get("$defs")
                .or_else(|| self.root.get("definitions"))?
                .as_map(),
        }
    }

    /// Returns the pointer prefix under which `schemas()` lives.
    pub fn schemas_pointer(&self) -> &'static str {
        match self.version {
            SpecVersion::Swagger2 => "/definitions",
            SpecVersion::OpenApi3 => "/components/schemas",
            SpecVersion::Unknown if self.root.get("$defs").is_some() => "/$defs",
            SpecVersion::Unknown => "/definitions",
        }
    }
}

fn detect_version(root: &Node) -> SpecVersion {
    if let Some(swagger) = root.get("swagger").map(|v| v.literal()) {
        if swagger.starts_with("2.") {
            return SpecVersion::Swagger2;
        }
    }
    if let Some(openapi) = root.get("openapi").and_then(|v| v.as_str()) {
        if openapi.starts_with("3.") {
            return SpecVersion::OpenApi3;
        }
    }
    SpecVersion::Unknown
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_v2_document() {
        let doc = Document::from_json(
            "v2.json",
            r#"{
                "swagger": "2.0",
                "info": {"title": "Test API", "version": "1.0.0"},
                "definitions": {
                    "Pet": {"type": "object", "properties": {"name": {"type": "string"}}}
                }
            }"#,
        )
        .unwrap();

        assert_eq!(doc.version(), SpecVersion::Swagger2);
        assert!(doc.schemas().unwrap().contains_key("Pet"));
        assert_eq!(doc.schemas_pointer(), "/definitions");
    }

    #[test]
    fn test_detect_v3_document() {
        let doc = Document::from_yaml(
            "v3.yaml",
            "openapi: 3.1.0\ninfo: {title: Test, version: '1'}\ncomponents:\n  schemas:\n    Pet: {type: object}\n",
        )
        .unwrap();

        assert_eq!(doc.version(), SpecVersion::OpenApi3);
        assert_eq!(doc.location(), "v3.yaml");
        assert!(doc.schemas().unwrap().contains_key("Pet"));
    }

    #[test]
    fn test_unknown_document_uses_defs() {
        let doc = Document::from_yaml("schema.yaml", "$defs:\n  Id: {type: string}\n").unwrap();
        assert_eq!(doc.version(), SpecVersion::Unknown);
        assert_eq!(doc.schemas_pointer(), "/$defs");
        assert!(doc.schemas().unwrap().contains_key("Id"));
    }

    #[test]
    fn test_invalid_yaml_is_reported() {
        let err = Document::from_yaml("broken.yaml", "a: [unclosed").unwrap_err();
        assert!(matches!(err, LoadError::InvalidYaml { .. }));
        assert!(err.to_string().contains("broken.yaml"));
    }
}
