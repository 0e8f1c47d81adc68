//! The recursive schema differ.

use super::changes::SchemaChanges;
use super::cycle::{RefStack, VisitKey};
use super::proxy::SchemaProxy;
use crate::compare::{
    check_for_collection_changes, check_map_for_changes, check_map_for_changes_with, check_object,
    check_properties, check_property, PropertyCheck,
};
use crate::model::{Change, ChangeKind, PropertyChanges};
use crate::objects::{compare_discriminator, compare_extensions, compare_external_docs, compare_xml};
use crate::rules::{active_rules, Component, RuleSet};
use crate::value::{content_hash, contains_reference, Node};
use std::collections::BTreeMap;
use std::sync::Arc;

const SCHEMA: Component = Component::Schema;

/// Keywords compared by literal value.
const SCALAR_KEYWORDS: [&str; 33] = [
    "$schema",
    "$id",
    "$anchor",
    "$dynamicAnchor",
    "$dynamicRef",
    "$comment",
    "title",
    "description",
    "format",
    "multipleOf",
    "maximum",
    "minimum",
    "exclusiveMaximum",
    "exclusiveMinimum",
    "maxLength",
    "minLength",
    "pattern",
    "maxItems",
    "minItems",
    "uniqueItems",
    "maxContains",
    "minContains",
    "maxProperties",
    "minProperties",
    "const",
    "nullable",
    "readOnly",
    "writeOnly",
    "deprecated",
    "default",
    "example",
    "contentEncoding",
    "contentMediaType",
];

/// Keywords compared as unordered value lists.
const COLLECTION_KEYWORDS: [&str; 3] = ["enum", "required", "examples"];

/// SchemaDiffer compares two schemas and reports what changed.
///
/// The differ classifies every change with one [`RuleSet`]. By default that
/// is the process-wide rule set in effect when the differ was created.
///
/// References are not followed by default: two references to the same
/// location are equal, whatever they point at. With
/// [`follow_references`](SchemaDiffer::follow_references) enabled, the
/// targets of such references are compared too.
#[derive(Debug, Clone)]
pub struct SchemaDiffer {
    rules: Arc<RuleSet>,
    follow_references: bool,
}

impl Default for SchemaDiffer {
    fn default() -> Self {
        SchemaDiffer::new()
    }
}

impl SchemaDiffer {
    /// Creates a differ using the process-wide rules.
    pub fn new() -> Self {
        SchemaDiffer::with_rules(active_rules())
    }

    /// Creates a differ using an explicit rule set.
    pub fn with_rules(rules: Arc<RuleSet>) -> Self {
        SchemaDiffer {
            rules,
            follow_references: false,
        }
    }

    /// Sets whether references to the same location are resolved and their
    /// targets compared.
    pub fn follow_references(mut self, follow: bool) -> Self {
        self.follow_references = follow;
        self
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Compares two schemas. Returns `None` when nothing changed.
    pub fn compare(&self, left: Option<SchemaProxy<'_>>, right: Option<SchemaProxy<'_>>) -> Option<SchemaChanges> {
        self.compare_in(left, right, &RefStack::new())
    }

    /// Reports whether two nodes can be skipped without comparing them.
    ///
    /// Equal content hashes mean equal trees, except when references are
    /// followed: the same `$ref` text may then lead to different targets.
    pub(crate) fn unchanged(&self, left: &Node, right: &Node) -> bool {
        if self.follow_references && (contains_reference(left) || contains_reference(right)) {
            return false;
        }
        content_hash(left) == content_hash(right)
    }

    fn compare_in<'a>(
        &self,
        left: Option<SchemaProxy<'a>>,
        right: Option<SchemaProxy<'a>>,
        stack: &RefStack<'_>,
    ) -> Option<SchemaChanges> {
        let (left, right) = match (left, right) {
            (None, None) => return None,
            (Some(l), None) => return Some(self.presence_change(ChangeKind::ObjectRemoved, Some(l.node()), None)),
            (None, Some(r)) => return Some(self.presence_change(ChangeKind::ObjectAdded, None, Some(r.node()))),
            (Some(l), Some(r)) => (l, r),
        };

        if let (Some(location), Some(other)) = (left.location(), right.location()) {
            if location == other {
                if !self.follow_references {
                    return None;
                }
                let (Some(l), Some(r)) = (left.resolve(), right.resolve()) else {
                    return None;
                };
                let key = VisitKey::new(
                    left.identity().unwrap_or_default(),
                    right.identity().unwrap_or_default(),
                );
                if stack.contains(&key) {
                    tracing::trace!(reference = %location, "reference cycle");
                    return None;
                }
                if self.unchanged(l.node(), r.node()) {
                    return None;
                }
                let frame = stack.push(key);
                return self.compare_targets(l, r, &frame);
            }
        }

        let (l, r) = (left.schema(), right.schema());
        if self.unchanged(l.node(), r.node()) {
            return None;
        }
        if left.is_reference() || right.is_reference() {
            return Some(self.reference_change(left, right));
        }
        self.compare_targets(l, r, stack)
    }

    /// Compares two differing schemas that are not references.
    fn compare_targets<'a>(&self, l: SchemaProxy<'a>, r: SchemaProxy<'a>, stack: &RefStack<'_>) -> Option<SchemaChanges> {
        if !l.node().is_map() || !r.node().is_map() {
            let breaking = self.rules.is_breaking(SCHEMA, "schema", ChangeKind::Modified);
            let change = Change::new(ChangeKind::Modified, "schema", Some(l.node()), Some(r.node()), breaking);
            return Some(SchemaChanges::from_change(change));
        }
        let changes = self.compare_fields(l, r, stack);
        (!changes.is_empty()).then_some(changes)
    }

    fn presence_change(&self, kind: ChangeKind, left: Option<&Node>, right: Option<&Node>) -> SchemaChanges {
        let breaking = self.rules.is_breaking(SCHEMA, "schema", kind);
        SchemaChanges::from_change(Change::new(kind, "schema", left, right, breaking))
    }

    /// A reference swapped for an inline schema, or for another reference.
    fn reference_change(&self, left: SchemaProxy<'_>, right: SchemaProxy<'_>) -> SchemaChanges {
        let breaking = self.rules.is_breaking(SCHEMA, "$ref", ChangeKind::Modified);
        let change = Change::new(ChangeKind::Modified, "$ref", Some(left.node()), Some(right.node()), breaking)
            .with_values(
                left.reference().map(str::to_string),
                right.reference().map(str::to_string),
            );
        SchemaChanges::from_change(change)
    }

    fn compare_fields<'a>(&self, l: SchemaProxy<'a>, r: SchemaProxy<'a>, stack: &RefStack<'_>) -> SchemaChanges {
        let rules = self.rules();
        let (ln, rn) = (l.node(), r.node());
        let mut changes = PropertyChanges::new();

        let checks = SCALAR_KEYWORDS.map(|keyword| PropertyCheck::field(SCHEMA, keyword, Some(ln), Some(rn)));
        check_properties(&checks, rules, &mut changes);

        let (left_type, right_type) = (ln.get("type"), rn.get("type"));
        if left_type.map_or(false, Node::is_list) || right_type.map_or(false, Node::is_list) {
            check_for_collection_changes(SCHEMA, "type", left_type, right_type, rules, &mut changes);
        } else {
            check_property(&PropertyCheck::new(SCHEMA, "type", left_type, right_type), rules, &mut changes);
        }
        for keyword in COLLECTION_KEYWORDS {
            check_for_collection_changes(SCHEMA, keyword, ln.get(keyword), rn.get(keyword), rules, &mut changes);
        }
        self.check_dependent_required(ln, rn, &mut changes);

        let mut result = SchemaChanges {
            discriminator_changes: self
                .sub_object("discriminator", ln, rn, &mut changes)
                .and_then(|(a, b)| compare_discriminator(a, b, rules)),
            xml_changes: self
                .sub_object("xml", ln, rn, &mut changes)
                .and_then(|(a, b)| compare_xml(a, b, rules)),
            external_docs_changes: self
                .sub_object("externalDocs", ln, rn, &mut changes)
                .and_then(|(a, b)| compare_external_docs(a, b, rules)),
            extension_changes: compare_extensions(SCHEMA, Some(ln), Some(rn), rules),
            ..Default::default()
        };

        result.all_of_changes = self.compare_positional("allOf", l, r, stack, &mut changes);
        result.any_of_changes = self.compare_positional("anyOf", l, r, stack, &mut changes);
        result.one_of_changes = self.compare_positional("oneOf", l, r, stack, &mut changes);
        result.prefix_items_changes = self.compare_positional("prefixItems", l, r, stack, &mut changes);

        match (ln.get("items"), rn.get("items")) {
            (Some(a), Some(b)) if a.is_list() && b.is_list() => {
                result.items_tuple_changes = self.compare_positional("items", l, r, stack, &mut changes);
            }
            _ => result.items_changes = self.compare_subschema("items", l, r, stack, &mut changes),
        }
        result.not_changes = self.compare_subschema("not", l, r, stack, &mut changes);
        result.if_changes = self.compare_subschema("if", l, r, stack, &mut changes);
        result.then_changes = self.compare_subschema("then", l, r, stack, &mut changes);
        result.else_changes = self.compare_subschema("else", l, r, stack, &mut changes);
        result.contains_changes = self.compare_subschema("contains", l, r, stack, &mut changes);
        result.property_names_changes = self.compare_subschema("propertyNames", l, r, stack, &mut changes);
        result.content_schema_changes = self.compare_subschema("contentSchema", l, r, stack, &mut changes);
        result.additional_properties_changes =
            self.compare_subschema("additionalProperties", l, r, stack, &mut changes);
        result.unevaluated_properties_changes =
            self.compare_subschema("unevaluatedProperties", l, r, stack, &mut changes);
        result.unevaluated_items_changes = self.compare_subschema("unevaluatedItems", l, r, stack, &mut changes);

        result.properties_changes = self.compare_keyed("properties", l, r, stack, &mut changes);
        result.pattern_properties_changes = self.compare_keyed("patternProperties", l, r, stack, &mut changes);
        result.dependent_schemas_changes = self.compare_keyed("dependentSchemas", l, r, stack, &mut changes);

        result.property_changes = changes;
        result
    }

    fn sub_object<'n>(
        &self,
        keyword: &str,
        left: &'n Node,
        right: &'n Node,
        changes: &mut PropertyChanges,
    ) -> Option<(&'n Node, &'n Node)> {
        check_object(SCHEMA, keyword, left.get(keyword), right.get(keyword), self.rules(), changes)
    }

    /// `dependentRequired` lists encode validation order, so any difference
    /// between two lists, reordering included, is a modification.
    fn check_dependent_required(&self, left: &Node, right: &Node, changes: &mut PropertyChanges) {
        let keyword = "dependentRequired";
        let rules = self.rules();
        let modified = check_map_for_changes(
            SCHEMA,
            keyword,
            left.get(keyword).and_then(Node::as_map),
            right.get(keyword).and_then(Node::as_map),
            rules,
            changes,
            |_, a, b| {
                let breaking = rules.is_breaking(SCHEMA, keyword, ChangeKind::Modified);
                Some(Change::new(ChangeKind::Modified, keyword, Some(a), Some(b), breaking))
            },
        );
        changes.extend(modified.into_values());
    }

    /// Compares a keyword holding a single schema, or a boolean in place of
    /// one. Switching between a boolean and a schema is a modification of
    /// the keyword; two schemas are compared recursively.
    fn compare_subschema<'a>(
        &self,
        keyword: &str,
        l: SchemaProxy<'a>,
        r: SchemaProxy<'a>,
        stack: &RefStack<'_>,
        changes: &mut PropertyChanges,
    ) -> Option<Box<SchemaChanges>> {
        let (a, b) = self.sub_object(keyword, l.node(), r.node(), changes)?;
        if a.is_map() && b.is_map() {
            return self.compare_in(Some(l.child(a)), Some(r.child(b)), stack).map(Box::new);
        }
        if content_hash(a) != content_hash(b) {
            let breaking = self.rules.is_breaking(SCHEMA, keyword, ChangeKind::Modified);
            changes.push(Change::new(ChangeKind::Modified, keyword, Some(a), Some(b), breaking));
        }
        None
    }

    /// Compares a list of schemas position by position. Trailing entries on
    /// either side are added or removed objects.
    fn compare_positional<'a>(
        &self,
        keyword: &str,
        l: SchemaProxy<'a>,
        r: SchemaProxy<'a>,
        stack: &RefStack<'_>,
        changes: &mut PropertyChanges,
    ) -> BTreeMap<usize, SchemaChanges> {
        let left = schema_list(l.node().get(keyword));
        let right = schema_list(r.node().get(keyword));
        let mut result = BTreeMap::new();

        for i in 0..left.len().max(right.len()) {
            match (left.get(i).copied(), right.get(i).copied()) {
                (Some(a), Some(b)) => {
                    if let Some(nested) = self.compare_in(Some(l.child(a)), Some(r.child(b)), stack) {
                        result.insert(i, nested);
                    }
                }
                (a, b) => {
                    let kind = if a.is_some() {
                        ChangeKind::ObjectRemoved
                    } else {
                        ChangeKind::ObjectAdded
                    };
                    let breaking = self.rules.is_breaking(SCHEMA, keyword, kind);
                    changes.push(Change::new(kind, keyword, a, b, breaking));
                }
            }
        }
        result
    }

    /// Compares a map of schemas key by key, concurrently.
    fn compare_keyed<'a>(
        &self,
        keyword: &str,
        l: SchemaProxy<'a>,
        r: SchemaProxy<'a>,
        stack: &RefStack<'_>,
        changes: &mut PropertyChanges,
    ) -> BTreeMap<String, SchemaChanges> {
        check_map_for_changes_with(
            SCHEMA,
            keyword,
            l.node().get(keyword).and_then(Node::as_map),
            r.node().get(keyword).and_then(Node::as_map),
            self.rules(),
            changes,
            |a, b| self.unchanged(a, b),
            |_, a, b| self.compare_in(Some(l.child(a)), Some(r.child(b)), stack),
        )
    }
}

/// A single schema in place of a list counts as a list of one.
fn schema_list(node: Option<&Node>) -> Vec<&Node> {
    match node {
        None => Vec::new(),
        Some(n) => match n.as_list() {
            Some(items) => items.iter().collect(),
            None => vec![n],
        },
    }
}

/// Compares two schemas with the process-wide rules.
pub fn compare_schemas(left: Option<SchemaProxy<'_>>, right: Option<SchemaProxy<'_>>) -> Option<SchemaChanges> {
    SchemaDiffer::new().compare(left, right)
}
