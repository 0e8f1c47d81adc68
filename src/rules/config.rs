//! The breaking rules configuration tree.

use super::defaults::DEFAULT_RULES;
use super::rule::{BreakingChangeRule, Component};
use crate::error::LoadError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

/// ComponentRules maps property names of one component to their rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentRules {
    rules: BTreeMap<String, BreakingChangeRule>,
}

impl ComponentRules {
    pub fn new() -> Self {
        ComponentRules::default()
    }

    pub fn insert(&mut self, property: impl Into<String>, rule: BreakingChangeRule) {
        self.rules.insert(property.into(), rule);
    }

    pub fn get(&self, property: &str) -> Option<&BreakingChangeRule> {
        self.rules.get(property)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &BreakingChangeRule)> {
        self.rules.iter()
    }
}

impl<'a> FromIterator<(&'a str, BreakingChangeRule)> for ComponentRules {
    fn from_iter<I: IntoIterator<Item = (&'a str, BreakingChangeRule)>>(iter: I) -> Self {
        ComponentRules {
            rules: iter.into_iter().map(|(k, v)| (k.to_string(), v)).collect(),
        }
    }
}

/// BreakingRulesConfig is a tree of rules: component, then property.
///
/// It serializes as a two-level mapping, e.g.
///
/// ```yaml
/// schema:
///   type:
///     modified: false
/// ```
///
/// Unset rule fields are omitted, so an explicit `false` survives a round
/// trip and is never confused with "not specified".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BreakingRulesConfig {
    components: BTreeMap<String, ComponentRules>,
}

impl BreakingRulesConfig {
    /// Creates an empty configuration.
    pub fn new() -> Self {
        BreakingRulesConfig::default()
    }

    /// Returns the built-in default rules.
    pub fn defaults() -> &'static BreakingRulesConfig {
        &DEFAULT_RULES
    }

    /// Sets the rule for a component property.
    pub fn set(&mut self, component: Component, property: impl Into<String>, rule: BreakingChangeRule) {
        self.components
            .entry(component.as_str().to_string())
            .or_default()
            .insert(property, rule);
    }

    /// Builder form of `set`.
    pub fn with_rule(
        mut self,
        component: Component,
        property: impl Into<String>,
        rule: BreakingChangeRule,
    ) -> Self {
        self.set(component, property, rule);
        self
    }

    /// Replaces the whole rule group of a component.
    pub fn set_component(&mut self, component: Component, rules: ComponentRules) {
        self.components.insert(component.as_str().to_string(), rules);
    }

    pub fn component(&self, component: Component) -> Option<&ComponentRules> {
        self.components.get(component.as_str())
    }

    pub fn rule(&self, component: Component, property: &str) -> Option<&BreakingChangeRule> {
        self.component(component)?.get(property)
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Overlays `overrides` onto this configuration and returns the result.
    ///
    /// Only specified rule fields are taken from `overrides`. A property this
    /// configuration has no rule for takes the override rule as it is, so
    /// partial configurations can be layered. Components and properties
    /// absent from the built-in defaults are ignored. Neither input is
    /// modified.
    pub fn merge(&self, overrides: &BreakingRulesConfig) -> BreakingRulesConfig {
        let mut merged = self.clone();
        for (component, rules) in &overrides.components {
            let Some(known) = component
                .parse::<Component>()
                .ok()
                .and_then(|c| DEFAULT_RULES.component(c))
            else {
                tracing::warn!("ignoring breaking rules for unknown component '{}'", component);
                continue;
            };
            for (property, rule) in rules.iter() {
                if known.get(property).is_none() {
                    tracing::warn!(
                        "ignoring breaking rule for unknown property '{}.{}'",
                        component,
                        property
                    );
                    continue;
                }
                merged
                    .components
                    .entry(component.clone())
                    .or_default()
                    .rules
                    .entry(property.clone())
                    .and_modify(|existing| *existing = existing.merge(rule))
                    .or_insert(*rule);
            }
        }
        merged
    }

    /// Flattens the tree into `"component.property"` keys.
    pub fn flatten(&self) -> HashMap<String, BreakingChangeRule> {
        self.components
            .iter()
            .flat_map(|(component, rules)| {
                rules
                    .iter()
                    .map(move |(property, rule)| (format!("{}.{}", component, property), *rule))
            })
            .collect()
    }

    /// Parses a configuration from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, LoadError> {
        serde_yaml::from_str(yaml).map_err(|e| LoadError::invalid_rules(e.to_string()))
    }

    /// Parses a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        serde_json::from_str(json).map_err(|e| LoadError::invalid_rules(e.to_string()))
    }

    /// Reads a configuration file; `.json` files are parsed as JSON, anything
    /// else as YAML.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let text = std::fs::read_to_string(path).map_err(|e| LoadError::io(path, e))?;
        let is_json = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        if is_json {
            Self::from_json(&text)
        } else {
            Self::from_yaml(&text)
        }
    }
}

/// Overlays `overrides` onto `base`; see [`BreakingRulesConfig::merge`].
pub fn merge(base: &BreakingRulesConfig, overrides: &BreakingRulesConfig) -> BreakingRulesConfig {
    base.merge(overrides)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_merge_overlays_specified_fields() {
        let overrides = BreakingRulesConfig::from_yaml("schema:\n  type:\n    modified: false\n").unwrap();
        let merged = BreakingRulesConfig::defaults().merge(&overrides);

        assert_eq!(
            merged.rule(Component::Schema, "type"),
            Some(&BreakingChangeRule::new(false, false, true))
        );
        // Untouched branches keep their defaults.
        assert_eq!(
            merged.rule(Component::Schema, "format"),
            BreakingRulesConfig::defaults().rule(Component::Schema, "format")
        );
        // Merging is non-destructive.
        assert_eq!(
            overrides.rule(Component::Schema, "type"),
            Some(&BreakingChangeRule {
                modified: Some(false),
                ..Default::default()
            })
        );
    }

    #[test]
    fn test_merge_ignores_unknown_entries() {
        let overrides = BreakingRulesConfig::from_yaml(
            "nonsense:\n  foo:\n    added: true\nschema:\n  notAKeyword:\n    removed: true\n",
        )
        .unwrap();
        let merged = BreakingRulesConfig::defaults().merge(&overrides);
        assert_eq!(&merged, BreakingRulesConfig::defaults());
    }

    #[test]
    fn test_merge_layers_partial_configs() {
        let org = BreakingRulesConfig::new().with_rule(
            Component::Schema,
            "type",
            BreakingChangeRule {
                modified: Some(true),
                ..Default::default()
            },
        );
        let project = BreakingRulesConfig::new()
            .with_rule(
                Component::Schema,
                "format",
                BreakingChangeRule {
                    removed: Some(false),
                    ..Default::default()
                },
            )
            .with_rule(
                Component::Schema,
                "type",
                BreakingChangeRule {
                    added: Some(false),
                    ..Default::default()
                },
            );

        let merged = merge(&org, &project);
        assert_eq!(
            merged.rule(Component::Schema, "format"),
            Some(&BreakingChangeRule {
                removed: Some(false),
                ..Default::default()
            })
        );
        assert_eq!(
            merged.rule(Component::Schema, "type"),
            Some(&BreakingChangeRule {
                added: Some(false),
                modified: Some(true),
                removed: None,
            })
        );

        // An empty base takes the overrides unchanged.
        assert_eq!(merge(&BreakingRulesConfig::new(), &project), project);

        // Layered partial configs reach the defaults intact.
        let effective = BreakingRulesConfig::defaults().merge(&merged);
        assert_eq!(
            effective.rule(Component::Schema, "format"),
            Some(&BreakingChangeRule::new(false, true, false))
        );
        assert_eq!(
            effective.rule(Component::Schema, "type"),
            Some(&BreakingChangeRule::new(false, true, true))
        );
    }

    #[test]
    fn test_yaml_round_trip_keeps_explicit_false() {
        let config = BreakingRulesConfig::new()
            .with_rule(
                Component::Operation,
                "operationId",
                BreakingChangeRule {
                    removed: Some(false),
                    ..Default::default()
                },
            )
            .with_rule(Component::Schema, "enum", BreakingChangeRule::new(false, true, true));

        let yaml = serde_yaml::to_string(&config).unwrap();
        assert!(!yaml.contains("added: null"));
        let back = BreakingRulesConfig::from_yaml(&yaml).unwrap();
        assert_eq!(back, config);
        assert_eq!(back.rule(Component::Operation, "operationId").unwrap().added, None);
    }

    #[test]
    fn test_flatten_keys() {
        let config = BreakingRulesConfig::new().with_rule(
            Component::MediaType,
            "itemSchema",
            BreakingChangeRule::new(true, true, true),
        );
        let flat = config.flatten();
        assert_eq!(flat.len(), 1);
        assert!(flat.contains_key("mediaType.itemSchema"));
    }

    #[test]
    fn test_invalid_rules_rejected() {
        let err = BreakingRulesConfig::from_yaml("schema: [1, 2]").unwrap_err();
        assert!(matches!(err, LoadError::InvalidRules { .. }));
    }
}
