//! Rules and the components they apply to.

use crate::model::ChangeKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// BreakingChangeRule says, per kind of change, whether a change to one
/// property of one component is breaking.
///
/// Each field is tri-state: `None` means "not specified", which inherits
/// from the layer below when merging and reads as non-breaking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BreakingChangeRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub removed: Option<bool>,
}

impl BreakingChangeRule {
    /// Creates a fully specified rule.
    pub const fn new(added: bool, modified: bool, removed: bool) -> Self {
        BreakingChangeRule {
            added: Some(added),
            modified: Some(modified),
            removed: Some(removed),
        }
    }

    /// Overlays the specified fields of `other` onto this rule.
    pub fn merge(&self, other: &BreakingChangeRule) -> BreakingChangeRule {
        BreakingChangeRule {
            added: other.added.or(self.added),
            modified: other.modified.or(self.modified),
            removed: other.removed.or(self.removed),
        }
    }

    /// Returns the verdict for a change kind; unspecified is non-breaking.
    pub fn is_breaking(&self, kind: ChangeKind) -> bool {
        let verdict = match kind {
            ChangeKind::PropertyAdded | ChangeKind::ObjectAdded => self.added,
            ChangeKind::Modified => self.modified,
            ChangeKind::PropertyRemoved | ChangeKind::ObjectRemoved => self.removed,
        };
        verdict.unwrap_or(false)
    }
}

/// Component is a specification object kind that owns a group of rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Component {
    OpenApi,
    Info,
    Contact,
    License,
    Paths,
    PathItem,
    Operation,
    Parameter,
    RequestBody,
    Responses,
    Response,
    MediaType,
    Encoding,
    Header,
    Schema,
    Discriminator,
    Xml,
    Server,
    ServerVariable,
    Tag,
    ExternalDocs,
    SecurityScheme,
    SecurityRequirement,
    OAuthFlows,
    OAuthFlow,
    Callback,
    Link,
    Example,
    Components,
}

impl Component {
    pub const ALL: [Component; 29] = [
        Component::OpenApi,
        Component::Info,
        Component::Contact,
        Component::License,
        Component::Paths,
        Component::PathItem,
        Component::Operation,
        Component::Parameter,
        Component::RequestBody,
        Component::Responses,
        Component::Response,
        Component::MediaType,
        Component::Encoding,
        Component::Header,
        Component::Schema,
        Component::Discriminator,
        Component::Xml,
        Component::Server,
        Component::ServerVariable,
        Component::Tag,
        Component::ExternalDocs,
        Component::SecurityScheme,
        Component::SecurityRequirement,
        Component::OAuthFlows,
        Component::OAuthFlow,
        Component::Callback,
        Component::Link,
        Component::Example,
        Component::Components,
    ];

    /// Returns the key used for this component in rule configuration files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Component::OpenApi => "openapi",
            Component::Info => "info",
            Component::Contact => "contact",
            Component::License => "license",
            Component::Paths => "paths",
            Component::PathItem => "pathItem",
            Component::Operation => "operation",
            Component::Parameter => "parameter",
            Component::RequestBody => "requestBody",
            Component::Responses => "responses",
            Component::Response => "response",
            Component::MediaType => "mediaType",
            Component::Encoding => "encoding",
            Component::Header => "header",
            Component::Schema => "schema",
            Component::Discriminator => "discriminator",
            Component::Xml => "xml",
            Component::Server => "server",
            Component::ServerVariable => "serverVariable",
            Component::Tag => "tag",
            Component::ExternalDocs => "externalDocs",
            Component::SecurityScheme => "securityScheme",
            Component::SecurityRequirement => "securityRequirement",
            Component::OAuthFlows => "oauthFlows",
            Component::OAuthFlow => "oauthFlow",
            Component::Callback => "callback",
            Component::Link => "link",
            Component::Example => "example",
            Component::Components => "components",
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Component {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Component::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown component: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_verdicts() {
        let rule = BreakingChangeRule::new(false, true, true);
        assert!(!rule.is_breaking(ChangeKind::PropertyAdded));
        assert!(!rule.is_breaking(ChangeKind::ObjectAdded));
        assert!(rule.is_breaking(ChangeKind::Modified));
        assert!(rule.is_breaking(ChangeKind::ObjectRemoved));

        assert!(!BreakingChangeRule::default().is_breaking(ChangeKind::Modified));
    }

    #[test]
    fn test_merge_keeps_explicit_false() {
        let base = BreakingChangeRule::new(true, true, true);
        let over = BreakingChangeRule {
            modified: Some(false),
            ..Default::default()
        };
        let merged = base.merge(&over);
        assert_eq!(merged, BreakingChangeRule::new(true, false, true));
        // The override itself is untouched.
        assert_eq!(over.added, None);
    }

    #[test]
    fn test_rule_serialization_omits_unset() {
        let rule = BreakingChangeRule {
            removed: Some(false),
            ..Default::default()
        };
        assert_eq!(serde_json::to_string(&rule).unwrap(), r#"{"removed":false}"#);
        let back: BreakingChangeRule = serde_json::from_str(r#"{"removed":false}"#).unwrap();
        assert_eq!(back, rule);
    }

    #[test]
    fn test_component_names_round_trip() {
        for component in Component::ALL {
            assert_eq!(component.as_str().parse::<Component>().unwrap(), component);
        }
        assert!("nope".parse::<Component>().is_err());
    }
}
