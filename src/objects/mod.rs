//! Objects module - Comparison of non-schema object shapes.
//!
//! Every supported shape has its own comparison routine. [`ObjectPair`]
//! selects one of them for a pair of nodes, so callers that handle several
//! shapes can dispatch once through [`compare_objects`].

mod discriminator;
mod extensions;
mod external_docs;
mod tag;
mod xml;

pub use discriminator::*;
pub use extensions::*;
pub use external_docs::*;
pub use tag::*;
pub use xml::*;

use crate::model::{Change, Changed};
use crate::rules::{Component, RuleSet};
use crate::value::Node;
use serde::Serialize;

/// ObjectPair is a left and right node of one known object shape.
#[derive(Debug, Clone, Copy)]
pub enum ObjectPair<'a> {
    Discriminator(&'a Node, &'a Node),
    Xml(&'a Node, &'a Node),
    ExternalDocs(&'a Node, &'a Node),
    Tag(&'a Node, &'a Node),
    /// The `x-*` keys of two objects of the given component.
    Extensions(Component, &'a Node, &'a Node),
}

/// ObjectChanges is the change-set produced for an ObjectPair.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "object", rename_all = "camelCase")]
pub enum ObjectChanges {
    Discriminator(DiscriminatorChanges),
    Xml(XmlChanges),
    ExternalDocs(ExternalDocChanges),
    Tag(TagChanges),
    Extensions(ExtensionChanges),
}

impl Changed for ObjectChanges {
    fn visit<'a>(&'a self, f: &mut dyn FnMut(&'a Change)) {
        match self {
            ObjectChanges::Discriminator(c) => c.visit(f),
            ObjectChanges::Xml(c) => c.visit(f),
            ObjectChanges::ExternalDocs(c) => c.visit(f),
            ObjectChanges::Tag(c) => c.visit(f),
            ObjectChanges::Extensions(c) => c.visit(f),
        }
    }
}

/// Compares a pair of objects with the routine for their shape.
pub fn compare_objects(pair: ObjectPair<'_>, rules: &RuleSet) -> Option<ObjectChanges> {
    match pair {
        ObjectPair::Discriminator(l, r) => compare_discriminator(l, r, rules).map(ObjectChanges::Discriminator),
        ObjectPair::Xml(l, r) => compare_xml(l, r, rules).map(ObjectChanges::Xml),
        ObjectPair::ExternalDocs(l, r) => compare_external_docs(l, r, rules).map(ObjectChanges::ExternalDocs),
        ObjectPair::Tag(l, r) => compare_tag(l, r, rules).map(ObjectChanges::Tag),
        ObjectPair::Extensions(component, l, r) => {
            compare_extensions(component, Some(l), Some(r), rules).map(ObjectChanges::Extensions)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::from_yaml;

    #[test]
    fn test_dispatch() {
        let left = from_yaml("name: pets\nx-order: 1\n").unwrap();
        let right = from_yaml("name: animals\nx-order: 2\n").unwrap();
        let rules = RuleSet::defaults();

        let tag = compare_objects(ObjectPair::Tag(&left, &right), &rules).unwrap();
        assert!(matches!(tag, ObjectChanges::Tag(_)));
        assert_eq!(tag.total_changes(), 2);

        let ext = compare_objects(ObjectPair::Extensions(Component::Tag, &left, &right), &rules).unwrap();
        assert_eq!(ext.total_changes(), 1);
        assert_eq!(ext.total_breaking_changes(), 0);

        assert!(compare_objects(ObjectPair::Xml(&left, &left), &rules).is_none());
    }
}
