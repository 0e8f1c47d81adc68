//! The built-in breaking change rules.
//!
//! The key set of this table also defines which components and properties an
//! override may name; anything else is ignored when merging.

use super::config::{BreakingRulesConfig, ComponentRules};
use super::rule::{BreakingChangeRule, Component};
use once_cell::sync::Lazy;

/// Nothing about the property is breaking.
const NEVER: BreakingChangeRule = BreakingChangeRule::new(false, false, false);
/// Tightening or dropping a constraint breaks clients; adding one does not.
const CONSTRAINT: BreakingChangeRule = BreakingChangeRule::new(false, true, true);
const ALWAYS: BreakingChangeRule = BreakingChangeRule::new(true, true, true);
const REMOVAL: BreakingChangeRule = BreakingChangeRule::new(false, false, true);

pub(crate) static DEFAULT_RULES: Lazy<BreakingRulesConfig> = Lazy::new(build);

const SCHEMA: &[(&str, BreakingChangeRule)] = &[
    ("schema", CONSTRAINT),
    ("$ref", CONSTRAINT),
    ("$schema", CONSTRAINT),
    ("$id", NEVER),
    ("$anchor", NEVER),
    ("$dynamicAnchor", NEVER),
    ("$dynamicRef", CONSTRAINT),
    ("$comment", NEVER),
    ("type", CONSTRAINT),
    ("format", CONSTRAINT),
    ("title", NEVER),
    ("description", NEVER),
    ("multipleOf", CONSTRAINT),
    ("maximum", CONSTRAINT),
    ("minimum", CONSTRAINT),
    ("exclusiveMaximum", CONSTRAINT),
    ("exclusiveMinimum", CONSTRAINT),
    ("maxLength", CONSTRAINT),
    ("minLength", CONSTRAINT),
    ("pattern", CONSTRAINT),
    ("maxItems", CONSTRAINT),
    ("minItems", CONSTRAINT),
    ("uniqueItems", CONSTRAINT),
    ("maxContains", CONSTRAINT),
    ("minContains", CONSTRAINT),
    ("maxProperties", CONSTRAINT),
    ("minProperties", CONSTRAINT),
    ("required", ALWAYS),
    ("enum", CONSTRAINT),
    ("const", CONSTRAINT),
    ("nullable", CONSTRAINT),
    ("readOnly", CONSTRAINT),
    ("writeOnly", CONSTRAINT),
    ("deprecated", NEVER),
    ("default", CONSTRAINT),
    ("example", NEVER),
    ("examples", NEVER),
    ("contentEncoding", CONSTRAINT),
    ("contentMediaType", CONSTRAINT),
    ("contentSchema", CONSTRAINT),
    ("discriminator", CONSTRAINT),
    ("xml", NEVER),
    ("externalDocs", NEVER),
    ("extensions", NEVER),
    ("allOf", CONSTRAINT),
    ("anyOf", CONSTRAINT),
    ("oneOf", CONSTRAINT),
    ("not", CONSTRAINT),
    ("if", CONSTRAINT),
    ("then", CONSTRAINT),
    ("else", CONSTRAINT),
    ("items", CONSTRAINT),
    ("prefixItems", CONSTRAINT),
    ("contains", CONSTRAINT),
    ("properties", CONSTRAINT),
    ("patternProperties", CONSTRAINT),
    ("additionalProperties", CONSTRAINT),
    ("dependentSchemas", CONSTRAINT),
    ("dependentRequired", CONSTRAINT),
    ("propertyNames", CONSTRAINT),
    ("unevaluatedProperties", CONSTRAINT),
    ("unevaluatedItems", CONSTRAINT),
];

const OPENAPI: &[(&str, BreakingChangeRule)] = &[
    ("openapi", NEVER),
    ("swagger", NEVER),
    ("jsonSchemaDialect", CONSTRAINT),
    ("info", NEVER),
    ("servers", REMOVAL),
    ("paths", REMOVAL),
    ("webhooks", REMOVAL),
    ("components", REMOVAL),
    ("security", CONSTRAINT),
    ("tags", NEVER),
    ("externalDocs", NEVER),
    ("extensions", NEVER),
];

const INFO: &[(&str, BreakingChangeRule)] = &[
    ("title", NEVER),
    ("summary", NEVER),
    ("description", NEVER),
    ("termsOfService", NEVER),
    ("contact", NEVER),
    ("license", NEVER),
    ("version", NEVER),
    ("extensions", NEVER),
];

const CONTACT: &[(&str, BreakingChangeRule)] = &[
    ("name", NEVER),
    ("url", NEVER),
    ("email", NEVER),
    ("extensions", NEVER),
];

const LICENSE: &[(&str, BreakingChangeRule)] = &[
    ("name", NEVER),
    ("identifier", NEVER),
    ("url", NEVER),
    ("extensions", NEVER),
];

const PATHS: &[(&str, BreakingChangeRule)] = &[("path", REMOVAL), ("extensions", NEVER)];

const PATH_ITEM: &[(&str, BreakingChangeRule)] = &[
    ("$ref", CONSTRAINT),
    ("summary", NEVER),
    ("description", NEVER),
    ("get", REMOVAL),
    ("put", REMOVAL),
    ("post", REMOVAL),
    ("delete", REMOVAL),
    ("options", REMOVAL),
    ("head", REMOVAL),
    ("patch", REMOVAL),
    ("trace", REMOVAL),
    ("query", REMOVAL),
    ("servers", REMOVAL),
    ("parameters", REMOVAL),
    ("extensions", NEVER),
];

const OPERATION: &[(&str, BreakingChangeRule)] = &[
    ("tags", NEVER),
    ("summary", NEVER),
    ("description", NEVER),
    ("externalDocs", NEVER),
    ("operationId", CONSTRAINT),
    ("parameters", REMOVAL),
    ("requestBody", REMOVAL),
    ("responses", REMOVAL),
    ("callbacks", REMOVAL),
    ("deprecated", NEVER),
    ("security", CONSTRAINT),
    ("servers", REMOVAL),
    ("consumes", CONSTRAINT),
    ("produces", CONSTRAINT),
    ("schemes", CONSTRAINT),
    ("extensions", NEVER),
];

const PARAMETER: &[(&str, BreakingChangeRule)] = &[
    ("name", CONSTRAINT),
    ("in", CONSTRAINT),
    ("description", NEVER),
    ("required", ALWAYS),
    ("deprecated", NEVER),
    ("allowEmptyValue", CONSTRAINT),
    ("style", CONSTRAINT),
    ("explode", CONSTRAINT),
    ("allowReserved", CONSTRAINT),
    ("schema", CONSTRAINT),
    ("example", NEVER),
    ("examples", NEVER),
    ("content", CONSTRAINT),
    ("extensions", NEVER),
];

const REQUEST_BODY: &[(&str, BreakingChangeRule)] = &[
    ("description", NEVER),
    ("content", REMOVAL),
    ("required", ALWAYS),
    ("extensions", NEVER),
];

const RESPONSES: &[(&str, BreakingChangeRule)] = &[
    ("default", REMOVAL),
    ("codes", REMOVAL),
    ("extensions", NEVER),
];

const RESPONSE: &[(&str, BreakingChangeRule)] = &[
    ("description", NEVER),
    ("summary", NEVER),
    ("headers", REMOVAL),
    ("content", REMOVAL),
    ("links", REMOVAL),
    ("schema", CONSTRAINT),
    ("examples", NEVER),
    ("extensions", NEVER),
];

const MEDIA_TYPE: &[(&str, BreakingChangeRule)] = &[
    ("schema", CONSTRAINT),
    ("itemSchema", ALWAYS),
    ("example", NEVER),
    ("examples", NEVER),
    ("encoding", REMOVAL),
    ("extensions", NEVER),
];

const ENCODING: &[(&str, BreakingChangeRule)] = &[
    ("contentType", CONSTRAINT),
    ("headers", REMOVAL),
    ("style", CONSTRAINT),
    ("explode", CONSTRAINT),
    ("allowReserved", CONSTRAINT),
    ("extensions", NEVER),
];

const HEADER: &[(&str, BreakingChangeRule)] = &[
    ("description", NEVER),
    ("required", ALWAYS),
    ("deprecated", NEVER),
    ("style", CONSTRAINT),
    ("explode", CONSTRAINT),
    ("schema", CONSTRAINT),
    ("example", NEVER),
    ("examples", NEVER),
    ("content", CONSTRAINT),
    ("extensions", NEVER),
];

const DISCRIMINATOR: &[(&str, BreakingChangeRule)] = &[
    ("propertyName", CONSTRAINT),
    ("mapping", CONSTRAINT),
    ("defaultMapping", CONSTRAINT),
    ("extensions", NEVER),
];

const XML: &[(&str, BreakingChangeRule)] = &[
    ("name", CONSTRAINT),
    ("namespace", CONSTRAINT),
    ("prefix", CONSTRAINT),
    ("attribute", CONSTRAINT),
    ("wrapped", CONSTRAINT),
    ("nodeType", CONSTRAINT),
    ("extensions", NEVER),
];

const SERVER: &[(&str, BreakingChangeRule)] = &[
    ("url", CONSTRAINT),
    ("name", NEVER),
    ("description", NEVER),
    ("variables", REMOVAL),
    ("extensions", NEVER),
];

const SERVER_VARIABLE: &[(&str, BreakingChangeRule)] = &[
    ("enum", CONSTRAINT),
    ("default", CONSTRAINT),
    ("description", NEVER),
    ("extensions", NEVER),
];

const TAG: &[(&str, BreakingChangeRule)] = &[
    ("name", CONSTRAINT),
    ("summary", NEVER),
    ("description", NEVER),
    ("externalDocs", NEVER),
    ("parent", NEVER),
    ("kind", NEVER),
    ("extensions", NEVER),
];

const EXTERNAL_DOCS: &[(&str, BreakingChangeRule)] = &[
    ("url", NEVER),
    ("description", NEVER),
    ("extensions", NEVER),
];

const SECURITY_SCHEME: &[(&str, BreakingChangeRule)] = &[
    ("type", CONSTRAINT),
    ("description", NEVER),
    ("name", CONSTRAINT),
    ("in", CONSTRAINT),
    ("scheme", CONSTRAINT),
    ("bearerFormat", NEVER),
    ("flows", REMOVAL),
    ("openIdConnectUrl", CONSTRAINT),
    ("oauth2MetadataUrl", CONSTRAINT),
    ("deprecated", NEVER),
    ("flow", CONSTRAINT),
    ("authorizationUrl", CONSTRAINT),
    ("tokenUrl", CONSTRAINT),
    ("scopes", REMOVAL),
    ("extensions", NEVER),
];

const SECURITY_REQUIREMENT: &[(&str, BreakingChangeRule)] = &[
    ("schemes", CONSTRAINT),
    ("scopes", CONSTRAINT),
];

const OAUTH_FLOWS: &[(&str, BreakingChangeRule)] = &[
    ("implicit", REMOVAL),
    ("password", REMOVAL),
    ("clientCredentials", REMOVAL),
    ("authorizationCode", REMOVAL),
    ("deviceAuthorization", REMOVAL),
    ("extensions", NEVER),
];

const OAUTH_FLOW: &[(&str, BreakingChangeRule)] = &[
    ("authorizationUrl", CONSTRAINT),
    ("deviceAuthorizationUrl", CONSTRAINT),
    ("tokenUrl", CONSTRAINT),
    ("refreshUrl", CONSTRAINT),
    ("scopes", REMOVAL),
    ("extensions", NEVER),
];

const CALLBACK: &[(&str, BreakingChangeRule)] = &[("expressions", REMOVAL), ("extensions", NEVER)];

const LINK: &[(&str, BreakingChangeRule)] = &[
    ("operationRef", CONSTRAINT),
    ("operationId", CONSTRAINT),
    ("parameters", CONSTRAINT),
    ("requestBody", CONSTRAINT),
    ("description", NEVER),
    ("server", CONSTRAINT),
    ("extensions", NEVER),
];

const EXAMPLE: &[(&str, BreakingChangeRule)] = &[
    ("summary", NEVER),
    ("description", NEVER),
    ("value", NEVER),
    ("externalValue", NEVER),
    ("dataValue", NEVER),
    ("serializedValue", NEVER),
    ("extensions", NEVER),
];

const COMPONENTS: &[(&str, BreakingChangeRule)] = &[
    ("schemas", REMOVAL),
    ("responses", REMOVAL),
    ("parameters", REMOVAL),
    ("examples", NEVER),
    ("requestBodies", REMOVAL),
    ("headers", REMOVAL),
    ("securitySchemes", REMOVAL),
    ("links", REMOVAL),
    ("callbacks", REMOVAL),
    ("pathItems", REMOVAL),
    ("mediaTypes", REMOVAL),
    ("extensions", NEVER),
];

fn table(component: Component) -> &'static [(&'static str, BreakingChangeRule)] {
    match component {
        Component::OpenApi => OPENAPI,
        Component::Info => INFO,
        Component::Contact => CONTACT,
        Component::License => LICENSE,
        Component::Paths => PATHS,
        Component::PathItem => PATH_ITEM,
        Component::Operation => OPERATION,
        Component::Parameter => PARAMETER,
        Component::RequestBody => REQUEST_BODY,
        Component::Responses => RESPONSES,
        Component::Response => RESPONSE,
        Component::MediaType => MEDIA_TYPE,
        Component::Encoding => ENCODING,
        Component::Header => HEADER,
        Component::Schema => SCHEMA,
        Component::Discriminator => DISCRIMINATOR,
        Component::Xml => XML,
        Component::Server => SERVER,
        Component::ServerVariable => SERVER_VARIABLE,
        Component::Tag => TAG,
        Component::ExternalDocs => EXTERNAL_DOCS,
        Component::SecurityScheme => SECURITY_SCHEME,
        Component::SecurityRequirement => SECURITY_REQUIREMENT,
        Component::OAuthFlows => OAUTH_FLOWS,
        Component::OAuthFlow => OAUTH_FLOW,
        Component::Callback => CALLBACK,
        Component::Link => LINK,
        Component::Example => EXAMPLE,
        Component::Components => COMPONENTS,
    }
}

fn build() -> BreakingRulesConfig {
    let mut config = BreakingRulesConfig::new();
    for component in Component::ALL {
        let rules: ComponentRules = table(component).iter().copied().collect();
        config.set_component(component, rules);
    }
    tracing::debug!("built default breaking rules for {} components", Component::ALL.len());
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ChangeKind;

    fn verdict(component: Component, property: &str, kind: ChangeKind) -> bool {
        DEFAULT_RULES
            .rule(component, property)
            .map(|r| r.is_breaking(kind))
            .unwrap_or(false)
    }

    #[test]
    fn test_every_component_has_rules() {
        for component in Component::ALL {
            let rules = DEFAULT_RULES.component(component);
            assert!(rules.map(|r| !r.is_empty()).unwrap_or(false), "{}", component);
        }
    }

    #[test]
    fn test_removals_of_constraints_are_breaking() {
        for keyword in [
            "if",
            "then",
            "else",
            "not",
            "contains",
            "propertyNames",
            "unevaluatedProperties",
            "unevaluatedItems",
            "additionalProperties",
            "prefixItems",
            "items",
            "discriminator",
            "required",
        ] {
            assert!(verdict(Component::Schema, keyword, ChangeKind::PropertyRemoved), "{}", keyword);
            assert!(verdict(Component::Schema, keyword, ChangeKind::ObjectRemoved), "{}", keyword);
        }
        assert!(verdict(Component::PathItem, "get", ChangeKind::ObjectRemoved));
        assert!(verdict(Component::Operation, "security", ChangeKind::PropertyRemoved));
    }

    #[test]
    fn test_additions_mostly_not_breaking() {
        assert!(!verdict(Component::Schema, "not", ChangeKind::ObjectAdded));
        assert!(!verdict(Component::Schema, "enum", ChangeKind::PropertyAdded));
        assert!(!verdict(Component::PathItem, "post", ChangeKind::ObjectAdded));

        assert!(verdict(Component::MediaType, "itemSchema", ChangeKind::ObjectAdded));
        assert!(verdict(Component::Schema, "required", ChangeKind::PropertyAdded));
    }

    #[test]
    fn test_validation_modifications_are_breaking() {
        for keyword in ["type", "format", "pattern", "minimum", "maxLength", "enum"] {
            assert!(verdict(Component::Schema, keyword, ChangeKind::Modified), "{}", keyword);
        }
    }

    #[test]
    fn test_descriptive_fields_never_break() {
        let descriptive = [
            (Component::Schema, "description"),
            (Component::Schema, "title"),
            (Component::Schema, "externalDocs"),
            (Component::Schema, "examples"),
            (Component::Schema, "extensions"),
            (Component::Operation, "summary"),
            (Component::Info, "license"),
            (Component::Info, "contact"),
            (Component::License, "url"),
            (Component::Contact, "email"),
        ];
        for (component, property) in descriptive {
            for kind in [ChangeKind::PropertyAdded, ChangeKind::Modified, ChangeKind::PropertyRemoved] {
                assert!(!verdict(component, property, kind), "{}.{}", component, property);
            }
        }
    }
}
