//! Rules module - decides which changes are breaking.
//!
//! A [`BreakingRulesConfig`] maps component and property names to a
//! [`BreakingChangeRule`]. The built-in defaults can be overlaid with user
//! overrides, either per comparison through a [`RuleSet`] or for the whole
//! process with [`set_active_config`].

mod config;
mod defaults;
mod engine;
mod rule;

pub use config::*;
pub use engine::*;
pub use rule::*;

#[cfg(test)]
pub(crate) use engine::ACTIVE_CONFIG_LOCK;
