//! Source prefab -> destination prefab lookup.

use std::collections::HashMap;

use bevy::prelude::*;

use crate::config::BarricadeConfig;

/// One configured conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplacementRule {
    pub source: String,
    pub destination: String,
}

/// Static table built from config at load time.
#[derive(Resource, Debug, Clone, Default)]
pub struct ReplacementTable {
    rules: HashMap<String, String>,
}

impl ReplacementTable {
    pub fn from_config(config: &BarricadeConfig) -> Self {
        Self::from_rules(config.barricade_replacements.iter().map(|(source, destination)| {
            ReplacementRule {
                source: source.clone(),
                destination: destination.clone(),
            }
        }))
    }

    /// Later rules with the same source replace earlier ones.
    pub fn from_rules(rules: impl IntoIterator<Item = ReplacementRule>) -> Self {
        Self {
            rules: rules
                .into_iter()
                .map(|rule| (rule.source, rule.destination))
                .collect(),
        }
    }

    pub fn destination_for(&self, source: &str) -> Option<&str> {
        self.rules.get(source).map(String::as_str)
    }

    /// A rule whose destination is itself a source, if any. The replacement
    /// of such a rule would be converted again on the next tick.
    pub fn chained_rule(&self) -> Option<ReplacementRule> {
        let mut chained: Vec<_> = self
            .rules
            .iter()
            .filter(|(_, destination)| self.rules.contains_key(destination.as_str()))
            .collect();
        chained.sort();
        chained.first().map(|(source, destination)| ReplacementRule {
            source: source.to_string(),
            destination: destination.to_string(),
        })
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
