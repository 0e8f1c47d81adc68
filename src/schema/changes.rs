//! The change-set of a schema comparison.

use crate::model::{Change, Changed, PropertyChanges};
use crate::objects::{DiscriminatorChanges, ExtensionChanges, ExternalDocChanges, XmlChanges};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// SchemaChanges holds every change found between two schemas.
///
/// Direct changes to the schema's own keywords are in `property_changes`.
/// Each schema-valued keyword that changed has its own nested change-set;
/// keywords holding lists of schemas are keyed by position, keywords holding
/// maps of schemas by key.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaChanges {
    pub property_changes: PropertyChanges,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub discriminator_changes: Option<DiscriminatorChanges>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xml_changes: Option<XmlChanges>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_docs_changes: Option<ExternalDocChanges>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension_changes: Option<ExtensionChanges>,

    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub all_of_changes: BTreeMap<usize, SchemaChanges>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub any_of_changes: BTreeMap<usize, SchemaChanges>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub one_of_changes: BTreeMap<usize, SchemaChanges>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub prefix_items_changes: BTreeMap<usize, SchemaChanges>,
    /// Changes to tuple form `items`, by position.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub items_tuple_changes: BTreeMap<usize, SchemaChanges>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub not_changes: Option<Box<SchemaChanges>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub if_changes: Option<Box<SchemaChanges>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub then_changes: Option<Box<SchemaChanges>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub else_changes: Option<Box<SchemaChanges>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items_changes: Option<Box<SchemaChanges>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contains_changes: Option<Box<SchemaChanges>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_names_changes: Option<Box<SchemaChanges>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_schema_changes: Option<Box<SchemaChanges>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_properties_changes: Option<Box<SchemaChanges>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unevaluated_properties_changes: Option<Box<SchemaChanges>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unevaluated_items_changes: Option<Box<SchemaChanges>>,

    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub properties_changes: BTreeMap<String, SchemaChanges>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub pattern_properties_changes: BTreeMap<String, SchemaChanges>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub dependent_schemas_changes: BTreeMap<String, SchemaChanges>,
}

/// One step of a change path.
enum Segment<'a> {
    Keyword(&'static str),
    Index(&'static str, usize),
    Key(&'static str, &'a str),
}

impl fmt::Display for Segment<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Keyword(k) => f.write_str(k),
            Segment::Index(k, i) => write!(f, "{}.{}", k, i),
            Segment::Key(k, key) => write!(f, "{}.{}", k, key),
        }
    }
}

impl SchemaChanges {
    /// Creates a change-set holding a single direct change.
    pub fn from_change(change: Change) -> Self {
        SchemaChanges {
            property_changes: PropertyChanges::from_iter([change]),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total_changes() == 0
    }

    /// Returns every change with its dotted path from this schema, e.g.
    /// `properties.name.type`, depth-first in the order of `all_changes`.
    pub fn changes_with_paths(&self) -> Vec<(String, &Change)> {
        let mut out = Vec::new();
        self.collect_paths("", &mut out);
        out
    }

    fn collect_paths<'a>(&'a self, prefix: &str, out: &mut Vec<(String, &'a Change)>) {
        for change in self.property_changes.iter() {
            out.push((format!("{}{}", prefix, change.property()), change));
        }
        let objects: [(&str, Option<&'a dyn Changed>); 3] = [
            ("discriminator", self.discriminator_changes.as_ref().map(|c| c as &dyn Changed)),
            ("xml", self.xml_changes.as_ref().map(|c| c as &dyn Changed)),
            ("externalDocs", self.external_docs_changes.as_ref().map(|c| c as &dyn Changed)),
        ];
        for (keyword, set) in objects {
            if let Some(set) = set {
                set.visit(&mut |c| out.push((format!("{}{}.{}", prefix, keyword, c.property()), c)));
            }
        }
        // Extensions are reported under their own key.
        if let Some(extensions) = &self.extension_changes {
            for change in extensions.property_changes.iter() {
                out.push((format!("{}{}", prefix, change.property()), change));
            }
        }
        for (segment, nested) in self.nested() {
            nested.collect_paths(&format!("{}{}.", prefix, segment), out);
        }
    }

    /// Nested schema change-sets, in reporting order.
    fn nested(&self) -> Vec<(Segment<'_>, &SchemaChanges)> {
        let mut nested = Vec::new();
        let positional = [
            ("allOf", &self.all_of_changes),
            ("anyOf", &self.any_of_changes),
            ("oneOf", &self.one_of_changes),
            ("prefixItems", &self.prefix_items_changes),
            ("items", &self.items_tuple_changes),
        ];
        for (keyword, map) in positional {
            nested.extend(map.iter().map(|(i, c)| (Segment::Index(keyword, *i), c)));
        }
        let single = [
            ("not", &self.not_changes),
            ("if", &self.if_changes),
            ("then", &self.then_changes),
            ("else", &self.else_changes),
            ("items", &self.items_changes),
            ("contains", &self.contains_changes),
            ("propertyNames", &self.property_names_changes),
            ("contentSchema", &self.content_schema_changes),
            ("additionalProperties", &self.additional_properties_changes),
            ("unevaluatedProperties", &self.unevaluated_properties_changes),
            ("unevaluatedItems", &self.unevaluated_items_changes),
        ];
        for (keyword, changes) in single {
            if let Some(c) = changes {
                nested.push((Segment::Keyword(keyword), &**c));
            }
        }
        let keyed = [
            ("properties", &self.properties_changes),
            ("patternProperties", &self.pattern_properties_changes),
            ("dependentSchemas", &self.dependent_schemas_changes),
        ];
        for (keyword, map) in keyed {
            nested.extend(map.iter().map(|(k, c)| (Segment::Key(keyword, k.as_str()), c)));
        }
        nested
    }
}

impl Changed for SchemaChanges {
    fn visit<'a>(&'a self, f: &mut dyn FnMut(&'a Change)) {
        self.property_changes.visit(f);
        self.discriminator_changes.visit(f);
        self.xml_changes.visit(f);
        self.external_docs_changes.visit(f);
        self.extension_changes.visit(f);
        for (_, nested) in self.nested() {
            nested.visit(f);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ChangeKind;
    use crate::value::Node;
    use pretty_assertions::assert_eq;

    fn modified(property: &str, breaking: bool) -> Change {
        Change::new(
            ChangeKind::Modified,
            property,
            Some(&Node::string("a")),
            Some(&Node::string("b")),
            breaking,
        )
    }

    #[test]
    fn test_paths_and_totals() {
        let mut name = SchemaChanges::from_change(modified("type", true));
        name.items_changes = Some(Box::new(SchemaChanges::from_change(modified("format", false))));

        let mut root = SchemaChanges::from_change(modified("title", false));
        root.properties_changes.insert("name".to_string(), name);
        root.one_of_changes.insert(1, SchemaChanges::from_change(modified("pattern", true)));

        let paths: Vec<_> = root
            .changes_with_paths()
            .into_iter()
            .map(|(path, _)| path)
            .collect();
        assert_eq!(
            paths,
            vec![
                "title".to_string(),
                "oneOf.1.pattern".to_string(),
                "properties.name.type".to_string(),
                "properties.name.items.format".to_string(),
            ]
        );
        assert_eq!(root.total_changes(), 4);
        assert_eq!(root.total_breaking_changes(), 2);

        let flattened: Vec<_> = root.all_changes().iter().map(|c| c.property().to_string()).collect();
        assert_eq!(flattened, vec!["title", "pattern", "type", "format"]);
    }

    #[test]
    fn test_empty_change_set() {
        assert!(SchemaChanges::default().is_empty());
        let none: Option<SchemaChanges> = None;
        assert_eq!(none.total_breaking_changes(), 0);
    }
}
