//! Rule module - conjunctive classification rules and the ordered rule base

use crate::{AttributeCatalog, Case, Conclusion, DomainError};
use std::collections::HashSet;
use std::fmt;

/// Classification label a rule concludes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    /// Safe to eat
    Edible,

    /// Unsafe
    Poisonous,
}

impl Target {
    /// Get the label as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Target::Edible => "edible",
            Target::Poisonous => "poisonous",
        }
    }

    /// Parse a label from a string (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "edible" | "safe" => Some(Target::Edible),
            "poisonous" | "unsafe" => Some(Target::Poisonous),
            _ => None,
        }
    }

    /// Whether this label marks the specimen as unsafe
    pub fn is_unsafe(&self) -> bool {
        matches!(self, Target::Poisonous)
    }
}

impl std::str::FromStr for Target {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid target: {}", s))
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `attribute = value` requirement of a rule
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Condition {
    /// Attribute identifier
    pub attribute: String,

    /// Required value code (exact, case-sensitive)
    pub value: String,
}

impl Condition {
    /// Create a condition
    pub fn new(attribute: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            value: value.into(),
        }
    }

    /// Whether the case answers this attribute with exactly this value
    pub fn holds(&self, case: &Case) -> bool {
        case.get(&self.attribute) == Some(self.value.as_str())
    }

    /// Whether the case answers this attribute with a different value
    pub fn is_contradicted(&self, case: &Case) -> bool {
        matches!(case.get(&self.attribute), Some(v) if v != self.value)
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.attribute, self.value)
    }
}

/// A classification rule: all conditions must hold for the target to follow
///
/// Conditions are non-empty and name each attribute at most once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    name: String,
    target: Target,
    conditions: Vec<Condition>,
    description: String,
}

impl Rule {
    /// Create a rule
    ///
    /// When `description` is `None` one is derived from the target and
    /// conditions, e.g. `Edible: odor=n AND stalk_shape=t`.
    ///
    /// # Errors
    /// Returns [`DomainError::RuleLoad`] for an empty name, an empty
    /// condition list, or an attribute constrained twice.
    pub fn new(
        name: impl Into<String>,
        target: Target,
        conditions: Vec<Condition>,
        description: Option<String>,
    ) -> Result<Self, DomainError> {
        let name = name.into();
        if name.is_empty() {
            return Err(DomainError::RuleLoad("rule name cannot be empty".to_string()));
        }
        if conditions.is_empty() {
            return Err(DomainError::RuleLoad(format!(
                "rule '{}' has no conditions",
                name
            )));
        }

        let mut seen = HashSet::with_capacity(conditions.len());
        for condition in &conditions {
            if !seen.insert(condition.attribute.as_str()) {
                return Err(DomainError::RuleLoad(format!(
                    "rule '{}' constrains '{}' more than once",
                    name, condition.attribute
                )));
            }
        }

        let description = description.unwrap_or_else(|| describe(target, &conditions));
        Ok(Self {
            name,
            target,
            conditions,
            description,
        })
    }

    /// Rule identifier
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Label concluded when the rule fires
    pub fn target(&self) -> Target {
        self.target
    }

    /// Conditions in declaration order
    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// Human-readable description
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Whether every condition holds for the case
    pub fn matches(&self, case: &Case) -> bool {
        self.conditions.iter().all(|c| c.holds(case))
    }

    /// Whether no answered attribute contradicts the rule, so it can still fire
    pub fn is_viable(&self, case: &Case) -> bool {
        !self.conditions.iter().any(|c| c.is_contradicted(case))
    }

    /// Whether the rule constrains `attribute`
    pub fn references(&self, attribute: &str) -> bool {
        self.conditions.iter().any(|c| c.attribute == attribute)
    }

    /// The conclusion this rule yields
    pub fn conclusion(&self) -> Conclusion {
        Conclusion {
            target: self.target,
            rule: self.name.clone(),
            description: self.description.clone(),
        }
    }
}

fn describe(target: Target, conditions: &[Condition]) -> String {
    let label = match target {
        Target::Edible => "Edible",
        Target::Poisonous => "Poisonous",
    };
    let clauses: Vec<String> = conditions.iter().map(Condition::to_string).collect();
    format!("{}: {}", label, clauses.join(" AND "))
}

/// Ordered, immutable collection of rules
///
/// Order is the tie-break policy: [`RuleBase::iter`] yields rules in
/// priority order and the earliest matching rule is the primary conclusion.
#[derive(Debug, Clone, Default)]
pub struct RuleBase {
    rules: Vec<Rule>,
}

impl RuleBase {
    /// Build a rule base from rules in priority order
    ///
    /// # Errors
    /// Returns [`DomainError::RuleLoad`] when two rules share a name.
    pub fn new(rules: Vec<Rule>) -> Result<Self, DomainError> {
        let mut names = HashSet::with_capacity(rules.len());
        for rule in &rules {
            if !names.insert(rule.name.as_str()) {
                return Err(DomainError::RuleLoad(format!(
                    "rule '{}' is defined twice",
                    rule.name
                )));
            }
        }
        Ok(Self { rules })
    }

    /// Check every condition against the catalog
    ///
    /// # Errors
    /// Returns [`DomainError::RuleLoad`] naming the first rule whose
    /// condition refers to an unknown attribute or an out-of-domain value.
    pub fn validate_against(&self, catalog: &AttributeCatalog) -> Result<(), DomainError> {
        for rule in &self.rules {
            for condition in &rule.conditions {
                catalog
                    .check(&condition.attribute, &condition.value)
                    .map_err(|e| DomainError::RuleLoad(format!("rule '{}': {}", rule.name, e)))?;
            }
        }
        Ok(())
    }

    /// Rules in priority order
    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.rules.iter()
    }

    /// Rules as a slice
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Rule at `position`
    pub fn get(&self, position: usize) -> Option<&Rule> {
        self.rules.get(position)
    }

    /// Number of rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the rule base holds no rules
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<'a> IntoIterator for &'a RuleBase {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Attribute;

    fn edible_odor_n_stalk_shape_t() -> Rule {
        Rule::new(
            "edible_odor_n_stalk_shape_t",
            Target::Edible,
            vec![Condition::new("odor", "n"), Condition::new("stalk_shape", "t")],
            None,
        )
        .unwrap()
    }

    #[test]
    fn test_target_parsing() {
        assert_eq!(Target::parse("Poisonous"), Some(Target::Poisonous));
        assert_eq!(Target::parse("safe"), Some(Target::Edible));
        assert_eq!("edible".parse::<Target>(), Ok(Target::Edible));
        assert!("unknown".parse::<Target>().is_err());
        assert!(Target::Poisonous.is_unsafe());
    }

    #[test]
    fn test_derived_description() {
        let rule = edible_odor_n_stalk_shape_t();
        assert_eq!(rule.description(), "Edible: odor=n AND stalk_shape=t");
    }

    #[test]
    fn test_matches_requires_all_conditions() {
        let rule = edible_odor_n_stalk_shape_t();
        let partial = Case::new().with_answer("odor", "n");
        assert!(!rule.matches(&partial));

        let full = partial.with_answer("stalk_shape", "t");
        assert!(rule.matches(&full));
    }

    #[test]
    fn test_match_is_case_sensitive() {
        let rule = edible_odor_n_stalk_shape_t();
        let case = Case::new().with_answer("odor", "N").with_answer("stalk_shape", "t");
        assert!(!rule.matches(&case));
    }

    #[test]
    fn test_viability() {
        let rule = edible_odor_n_stalk_shape_t();
        assert!(rule.is_viable(&Case::new()));
        assert!(rule.is_viable(&Case::new().with_answer("odor", "n")));
        assert!(rule.is_viable(&Case::new().with_answer("cap_color", "w")));
        assert!(!rule.is_viable(&Case::new().with_answer("stalk_shape", "e")));
    }

    #[test]
    fn test_empty_conditions_rejected() {
        let result = Rule::new("empty", Target::Edible, Vec::new(), None);
        assert!(matches!(result, Err(DomainError::RuleLoad(_))));
    }

    #[test]
    fn test_repeated_attribute_rejected() {
        let result = Rule::new(
            "twice",
            Target::Poisonous,
            vec![Condition::new("odor", "f"), Condition::new("odor", "p")],
            None,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_duplicate_rule_names_rejected() {
        let result = RuleBase::new(vec![
            edible_odor_n_stalk_shape_t(),
            edible_odor_n_stalk_shape_t(),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_against_catalog() {
        let catalog = AttributeCatalog::new(vec![
            Attribute::new("odor", vec!["f".to_string(), "n".to_string()]).unwrap(),
        ])
        .unwrap();
        let rules = RuleBase::new(vec![edible_odor_n_stalk_shape_t()]).unwrap();

        let err = rules.validate_against(&catalog).unwrap_err();
        assert!(err.to_string().contains("stalk_shape"));
    }

    #[test]
    fn test_conclusion_carries_rule_identity() {
        let conclusion = edible_odor_n_stalk_shape_t().conclusion();
        assert_eq!(conclusion.target, Target::Edible);
        assert_eq!(conclusion.rule, "edible_odor_n_stalk_shape_t");
        assert_eq!(conclusion.to_string(), "edible (edible_odor_n_stalk_shape_t)");
    }
}
