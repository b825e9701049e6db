//! Loading attribute catalogs and rule bases from TOML definitions

use crate::error::EngineError;
use crate::selector::PriorityTable;
use agaric_domain::{Attribute, AttributeCatalog, Condition, Rule, RuleBase, Target};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::info;

const REFERENCE_DEFINITION: &str = include_str!("../definitions/mushroom.toml");

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDefinition {
    attributes: Vec<RawAttribute>,
    #[serde(default)]
    priority: BTreeMap<String, u32>,
    rules: Vec<RawRule>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawAttribute {
    name: String,
    values: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawRule {
    name: String,
    target: String,
    description: Option<String>,
    conditions: Vec<RawCondition>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawCondition {
    attribute: String,
    value: String,
}

/// A validated catalog, rule base and priority table
///
/// Neither the catalog nor the rule base is empty, every rule condition
/// refers to a catalog attribute and a value in its domain, and every
/// priority entry names a catalog attribute.
#[derive(Debug, Clone)]
pub struct Definition {
    catalog: AttributeCatalog,
    rules: RuleBase,
    priority: PriorityTable,
}

impl Definition {
    /// Assemble a definition, checking the rules against the catalog
    pub fn new(
        catalog: AttributeCatalog,
        rules: RuleBase,
        priority: PriorityTable,
    ) -> Result<Self, EngineError> {
        if catalog.is_empty() {
            return Err(EngineError::RuleLoad("definition has no attributes".to_string()));
        }
        if rules.is_empty() {
            return Err(EngineError::RuleLoad("definition has no rules".to_string()));
        }
        rules.validate_against(&catalog).map_err(rule_load)?;
        if let Some(unknown) = priority.attributes().find(|a| !catalog.contains(a)) {
            return Err(EngineError::RuleLoad(format!(
                "priority given for unknown attribute '{}'",
                unknown
            )));
        }
        Ok(Self {
            catalog,
            rules,
            priority,
        })
    }

    /// The built-in mushroom definition
    pub fn reference() -> Result<Self, EngineError> {
        Self::from_toml(REFERENCE_DEFINITION)
    }

    /// Load a definition from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            EngineError::RuleLoad(format!("cannot read {}: {}", path.display(), e))
        })?;
        let definition = Self::from_toml(&contents)?;
        info!(
            path = %path.display(),
            attributes = definition.catalog.len(),
            rules = definition.rules.len(),
            "loaded rule definition"
        );
        Ok(definition)
    }

    /// Parse a definition from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, EngineError> {
        let raw: RawDefinition = toml::from_str(toml_str)
            .map_err(|e| EngineError::RuleLoad(format!("Failed to parse TOML: {}", e)))?;

        let attributes = raw
            .attributes
            .into_iter()
            .map(|a| Attribute::new(a.name, a.values))
            .collect::<Result<Vec<_>, _>>()
            .map_err(rule_load)?;
        let catalog = AttributeCatalog::new(attributes).map_err(rule_load)?;

        let mut rules = Vec::with_capacity(raw.rules.len());
        for raw_rule in raw.rules {
            let target = Target::parse(&raw_rule.target).ok_or_else(|| {
                EngineError::RuleLoad(format!(
                    "rule '{}' has unknown target '{}'",
                    raw_rule.name, raw_rule.target
                ))
            })?;
            let conditions = raw_rule
                .conditions
                .into_iter()
                .map(|c| Condition::new(c.attribute, c.value))
                .collect();
            rules.push(
                Rule::new(raw_rule.name, target, conditions, raw_rule.description)
                    .map_err(rule_load)?,
            );
        }
        let rules = RuleBase::new(rules).map_err(rule_load)?;

        Self::new(catalog, rules, raw.priority.into_iter().collect())
    }

    /// The attribute catalog
    pub fn catalog(&self) -> &AttributeCatalog {
        &self.catalog
    }

    /// The rule base
    pub fn rules(&self) -> &RuleBase {
        &self.rules
    }

    /// The priority table
    pub fn priority(&self) -> &PriorityTable {
        &self.priority
    }

    /// Split into parts
    pub fn into_parts(self) -> (AttributeCatalog, RuleBase, PriorityTable) {
        (self.catalog, self.rules, self.priority)
    }
}

fn rule_load(e: agaric_domain::DomainError) -> EngineError {
    match e {
        agaric_domain::DomainError::RuleLoad(msg) => EngineError::RuleLoad(msg),
        other => EngineError::RuleLoad(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
        [[attributes]]
        name = "odor"
        values = ["f", "n"]

        [[rules]]
        name = "poisonous_odor_f"
        target = "poisonous"
        conditions = [{ attribute = "odor", value = "f" }]
    "#;

    #[test]
    fn test_reference_definition_loads() {
        let definition = Definition::reference().unwrap();
        assert_eq!(definition.catalog().len(), 14);
        assert_eq!(definition.rules().len(), 23);
        assert_eq!(definition.priority().weight("odor"), 10);
        assert_eq!(definition.priority().weight("gill_spacing"), 3);
    }

    #[test]
    fn test_reference_rule_order() {
        let definition = Definition::reference().unwrap();
        let first = definition.rules().get(0).unwrap();
        assert_eq!(first.name(), "poisonous_odor_f");
        assert_eq!(first.description(), "Poisonous: odor=f");

        let last = definition.rules().get(22).unwrap();
        assert_eq!(last.name(), "edible_gill_spacing_w_cap_color_n");
        assert_eq!(last.target(), Target::Edible);
    }

    #[test]
    fn test_minimal_definition() {
        let definition = Definition::from_toml(MINIMAL).unwrap();
        assert_eq!(definition.rules().len(), 1);
        assert!(definition.priority().is_empty());
    }

    #[test]
    fn test_syntax_error_is_rule_load() {
        let result = Definition::from_toml("[[rules]\nname = ");
        assert!(matches!(result, Err(EngineError::RuleLoad(_))));
    }

    #[test]
    fn test_empty_conditions_rejected() {
        let toml = MINIMAL.replace(r#"[{ attribute = "odor", value = "f" }]"#, "[]");
        let err = Definition::from_toml(&toml).unwrap_err();
        assert!(err.to_string().contains("no conditions"));
    }

    #[test]
    fn test_unknown_target_rejected() {
        let toml = MINIMAL.replace("target = \"poisonous\"", "target = \"toxic\"");
        let err = Definition::from_toml(&toml).unwrap_err();
        assert!(err.to_string().contains("toxic"));
    }

    #[test]
    fn test_condition_outside_domain_rejected() {
        let toml = MINIMAL.replace("value = \"f\"", "value = \"q\"");
        let err = Definition::from_toml(&toml).unwrap_err();
        assert!(matches!(err, EngineError::RuleLoad(_)));
        assert!(err.to_string().contains("poisonous_odor_f"));
    }

    #[test]
    fn test_priority_for_unknown_attribute_rejected() {
        let toml = format!("{}\n[priority]\nveil_type = 2\n", MINIMAL);
        let err = Definition::from_toml(&toml).unwrap_err();
        assert!(err.to_string().contains("veil_type"));
    }

    #[test]
    fn test_empty_rules_rejected() {
        let toml = "rules = []\n[[attributes]]\nname = \"odor\"\nvalues = [\"f\"]\n";
        let err = Definition::from_toml(toml).unwrap_err();
        assert!(matches!(err, EngineError::RuleLoad(_)));
        assert!(err.to_string().contains("no rules"));
    }

    #[test]
    fn test_empty_catalog_rejected() {
        let err = Definition::from_toml("attributes = []\nrules = []\n").unwrap_err();
        assert!(matches!(err, EngineError::RuleLoad(_)));
        assert!(err.to_string().contains("no attributes"));

        let result = Definition::new(
            AttributeCatalog::default(),
            RuleBase::default(),
            PriorityTable::default(),
        );
        assert!(matches!(result, Err(EngineError::RuleLoad(_))));
    }

    #[test]
    fn test_missing_file_is_rule_load() {
        let result = Definition::from_file("/nonexistent/agaric/rules.toml");
        assert!(matches!(result, Err(EngineError::RuleLoad(_))));
    }
}
