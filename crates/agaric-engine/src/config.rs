//! Configuration for the Engine

use agaric_domain::{Evaluator, RuleBase};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::evaluator::{IndexedEvaluator, NaiveEvaluator};

/// Which rule evaluator the engine runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EvaluatorKind {
    /// Linear scan over every rule
    Naive,
    /// Inverted index from answers to the rules they satisfy
    #[default]
    Indexed,
}

impl EvaluatorKind {
    /// Build an evaluator of this kind over `rules`
    pub fn build(self, rules: Arc<RuleBase>) -> Box<dyn Evaluator> {
        match self {
            EvaluatorKind::Naive => Box::new(NaiveEvaluator::new(rules)),
            EvaluatorKind::Indexed => Box::new(IndexedEvaluator::new(rules)),
        }
    }
}

/// How answers outside an attribute's domain are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ValuePolicy {
    /// Reject with `InvalidValue`
    #[default]
    Strict,
    /// Store the value anyway and log a warning
    Lenient,
}

/// Configuration for the Engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Rule evaluator implementation
    pub evaluator: EvaluatorKind,

    /// Treatment of out-of-domain answers
    pub value_policy: ValuePolicy,

    /// Ask the highest-priority attribute first on an empty case
    pub first_question_from_priority: bool,

    /// Priority weights overriding the definition's table
    pub priority: BTreeMap<String, u32>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            evaluator: EvaluatorKind::Indexed,
            value_policy: ValuePolicy::Strict,
            first_question_from_priority: true,
            priority: BTreeMap::new(),
        }
    }
}

impl EngineConfig {
    /// Strict preset: reject out-of-domain answers
    pub fn strict() -> Self {
        Self::default()
    }

    /// Lenient preset: keep out-of-domain answers as observed
    pub fn lenient() -> Self {
        Self {
            value_policy: ValuePolicy::Lenient,
            ..Self::default()
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.priority.keys().any(|k| k.trim().is_empty()) {
            return Err("priority keys cannot be empty".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}
