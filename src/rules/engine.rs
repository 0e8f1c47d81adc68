//! Rule lookup, and the process-wide active rule generation.

use super::config::BreakingRulesConfig;
use super::rule::{BreakingChangeRule, Component};
use crate::model::ChangeKind;
use once_cell::sync::{Lazy, OnceCell};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// RuleSet answers breaking change questions for one effective configuration.
///
/// Lookups go through a per-component property table that is built on first
/// use and queried without allocating. A RuleSet never changes after construction, so the table can
/// not go stale; a new configuration means a new RuleSet.
#[derive(Debug)]
pub struct RuleSet {
    config: BreakingRulesConfig,
    lookup: OnceCell<HashMap<Component, HashMap<String, BreakingChangeRule>>>,
}

static DEFAULT_RULE_SET: Lazy<Arc<RuleSet>> =
    Lazy::new(|| Arc::new(RuleSet::new(BreakingRulesConfig::defaults().clone())));

impl RuleSet {
    /// Creates a rule set over an already effective configuration.
    pub fn new(config: BreakingRulesConfig) -> Self {
        RuleSet {
            config,
            lookup: OnceCell::new(),
        }
    }

    /// Returns the shared rule set over the built-in defaults.
    pub fn defaults() -> Arc<RuleSet> {
        Arc::clone(&DEFAULT_RULE_SET)
    }

    /// Creates a rule set of the defaults with `overrides` merged on top.
    pub fn with_overrides(overrides: &BreakingRulesConfig) -> Self {
        RuleSet::new(BreakingRulesConfig::defaults().merge(overrides))
    }

    pub fn config(&self) -> &BreakingRulesConfig {
        &self.config
    }

    fn lookup(&self) -> &HashMap<Component, HashMap<String, BreakingChangeRule>> {
        self.lookup.get_or_init(|| {
            let table: HashMap<_, _> = Component::ALL
                .into_iter()
                .filter_map(|component| {
                    let rules = self.config.component(component)?;
                    let properties = rules.iter().map(|(p, r)| (p.clone(), *r)).collect();
                    Some((component, properties))
                })
                .collect();
            tracing::debug!(
                "built breaking rule lookup with {} entries",
                table.values().map(HashMap::len).sum::<usize>()
            );
            table
        })
    }

    /// Returns the effective rule for a component property, if any.
    pub fn rule(&self, component: Component, property: &str) -> Option<BreakingChangeRule> {
        self.lookup().get(&component)?.get(property).copied()
    }

    /// Reports whether a change of `kind` to `property` of `component` is
    /// breaking. Unknown properties and unset rule fields are not breaking.
    pub fn is_breaking(&self, component: Component, property: &str, kind: ChangeKind) -> bool {
        self.rule(component, property)
            .map(|rule| rule.is_breaking(kind))
            .unwrap_or(false)
    }
}

/// One installed configuration together with the rules it produces.
#[derive(Debug)]
struct Generation {
    overrides: Option<BreakingRulesConfig>,
    rules: Arc<RuleSet>,
}

impl Generation {
    fn defaults() -> Self {
        Generation {
            overrides: None,
            rules: RuleSet::defaults(),
        }
    }
}

static ACTIVE: Lazy<RwLock<Arc<Generation>>> = Lazy::new(|| RwLock::new(Arc::new(Generation::defaults())));

fn swap(generation: Generation) {
    let mut active = ACTIVE.write().unwrap_or_else(PoisonError::into_inner);
    *active = Arc::new(generation);
}

fn current() -> Arc<Generation> {
    Arc::clone(&ACTIVE.read().unwrap_or_else(PoisonError::into_inner))
}

/// Installs `overrides` on top of the default rules for the whole process.
///
/// The rules and their lookup table are rebuilt; comparisons already running
/// keep the generation they started with.
pub fn set_active_config(overrides: BreakingRulesConfig) {
    let rules = Arc::new(RuleSet::with_overrides(&overrides));
    swap(Generation {
        overrides: Some(overrides),
        rules,
    });
}

/// Removes any installed override, restoring the default rules.
pub fn reset_active_config() {
    swap(Generation::defaults());
}

/// Returns the installed override, if any.
pub fn active_config() -> Option<BreakingRulesConfig> {
    current().overrides.clone()
}

/// Returns the rules in effect for the process.
pub fn active_rules() -> Arc<RuleSet> {
    Arc::clone(&current().rules)
}

/// Reports whether a change is breaking under the process-wide rules.
pub fn is_breaking(component: Component, property: &str, kind: ChangeKind) -> bool {
    active_rules().is_breaking(component, property, kind)
}

/// Serializes tests that install a process-wide configuration.
#[cfg(test)]
pub(crate) static ACTIVE_CONFIG_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_rule_set_lookup() {
        let rules = RuleSet::defaults();
        assert!(rules.is_breaking(Component::Schema, "type", ChangeKind::Modified));
        assert!(!rules.is_breaking(Component::Schema, "type", ChangeKind::PropertyAdded));
        assert!(!rules.is_breaking(Component::Schema, "noSuchKeyword", ChangeKind::Modified));
        assert_eq!(rules.rule(Component::Schema, "noSuchKeyword"), None);
    }

    #[test]
    fn test_lookup_covers_every_configured_rule() {
        let rules = RuleSet::with_overrides(&BreakingRulesConfig::new().with_rule(
            Component::MediaType,
            "itemSchema",
            BreakingChangeRule {
                added: Some(false),
                ..Default::default()
            },
        ));
        let flat = rules.config().flatten();
        assert!(!flat.is_empty());
        for component in Component::ALL {
            for (property, rule) in rules.config().component(component).into_iter().flat_map(|c| c.iter()) {
                assert_eq!(rules.rule(component, property), Some(*rule));
                assert_eq!(flat.get(&format!("{}.{}", component, property)), Some(rule));
            }
        }
        assert!(!rules.is_breaking(Component::MediaType, "itemSchema", ChangeKind::ObjectAdded));
        assert!(rules.is_breaking(Component::MediaType, "itemSchema", ChangeKind::ObjectRemoved));
    }

    #[test]
    fn test_override_precedence_and_reset() {
        let _guard = ACTIVE_CONFIG_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        assert!(is_breaking(Component::Schema, "type", ChangeKind::Modified));

        let overrides = BreakingRulesConfig::from_yaml("schema:\n  type:\n    modified: false\n").unwrap();
        set_active_config(overrides.clone());
        assert!(!is_breaking(Component::Schema, "type", ChangeKind::Modified));
        // Other verdicts of the same rule are inherited.
        assert!(is_breaking(Component::Schema, "type", ChangeKind::PropertyRemoved));
        assert_eq!(active_config(), Some(overrides));

        reset_active_config();
        assert!(is_breaking(Component::Schema, "type", ChangeKind::Modified));
        assert_eq!(active_config(), None);
    }

    #[test]
    fn test_install_replaces_lookup() {
        let _guard = ACTIVE_CONFIG_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        // Warm the lookup of the current generation first.
        assert!(!is_breaking(Component::Schema, "description", ChangeKind::Modified));

        let before = active_rules();
        set_active_config(BreakingRulesConfig::new().with_rule(
            Component::Schema,
            "description",
            BreakingChangeRule {
                modified: Some(true),
                ..Default::default()
            },
        ));
        assert!(is_breaking(Component::Schema, "description", ChangeKind::Modified));
        // A snapshot taken earlier still answers with its own generation.
        assert!(!before.is_breaking(Component::Schema, "description", ChangeKind::Modified));

        reset_active_config();
        assert!(!is_breaking(Component::Schema, "description", ChangeKind::Modified));
    }

    #[test]
    fn test_concurrent_reads() {
        let rules = RuleSet::defaults();
        let verdicts: Vec<bool> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|_| s.spawn(|| rules.is_breaking(Component::Schema, "pattern", ChangeKind::Modified)))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert!(verdicts.into_iter().all(|v| v));
    }
}
