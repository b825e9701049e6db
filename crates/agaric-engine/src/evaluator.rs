//! Rule evaluators
//!
//! Both evaluators return every matching rule's conclusion in rule-base
//! order; they differ only in how they find the matches.

use agaric_domain::{Case, Conclusion, Evaluator, RuleBase};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Evaluates every rule in order against the case
#[derive(Debug, Clone)]
pub struct NaiveEvaluator {
    rules: Arc<RuleBase>,
}

impl NaiveEvaluator {
    /// Create an evaluator over `rules`
    pub fn new(rules: Arc<RuleBase>) -> Self {
        Self { rules }
    }
}

impl Evaluator for NaiveEvaluator {
    fn name(&self) -> &'static str {
        "naive"
    }

    fn rules(&self) -> &RuleBase {
        &self.rules
    }

    fn evaluate(&self, case: &Case) -> Vec<Conclusion> {
        let conclusions: Vec<Conclusion> = self
            .rules
            .iter()
            .filter(|rule| rule.matches(case))
            .map(|rule| rule.conclusion())
            .collect();
        debug!(
            evaluator = "naive",
            answers = case.len(),
            matched = conclusions.len(),
            "evaluated case"
        );
        conclusions
    }
}

/// Evaluates through an index from (attribute, value) to rule positions
///
/// Each answer in the case bumps a hit counter for the rules it satisfies; a
/// rule matches once its hits reach its condition count. This relies on a
/// rule naming each attribute at most once, which [`agaric_domain::Rule::new`]
/// enforces.
#[derive(Debug, Clone)]
pub struct IndexedEvaluator {
    rules: Arc<RuleBase>,
    index: HashMap<String, HashMap<String, Vec<usize>>>,
    arity: Vec<usize>,
}

impl IndexedEvaluator {
    /// Build the index over `rules`
    pub fn new(rules: Arc<RuleBase>) -> Self {
        let mut index: HashMap<String, HashMap<String, Vec<usize>>> = HashMap::new();
        let mut arity = Vec::with_capacity(rules.len());

        for (position, rule) in rules.iter().enumerate() {
            arity.push(rule.conditions().len());
            for condition in rule.conditions() {
                index
                    .entry(condition.attribute.clone())
                    .or_default()
                    .entry(condition.value.clone())
                    .or_default()
                    .push(position);
            }
        }

        Self { rules, index, arity }
    }

    fn matching_positions(&self, case: &Case) -> Vec<usize> {
        let mut hits = vec![0usize; self.arity.len()];
        let mut matched = Vec::new();

        for (attribute, value) in case.iter() {
            let Some(positions) = self
                .index
                .get(attribute)
                .and_then(|by_value| by_value.get(value))
            else {
                continue;
            };
            for &position in positions {
                hits[position] += 1;
                if hits[position] == self.arity[position] {
                    matched.push(position);
                }
            }
        }

        matched.sort_unstable();
        matched
    }
}

impl Evaluator for IndexedEvaluator {
    fn name(&self) -> &'static str {
        "indexed"
    }

    fn rules(&self) -> &RuleBase {
        &self.rules
    }

    fn evaluate(&self, case: &Case) -> Vec<Conclusion> {
        let conclusions: Vec<Conclusion> = self
            .matching_positions(case)
            .into_iter()
            .filter_map(|position| self.rules.get(position))
            .map(|rule| rule.conclusion())
            .collect();
        debug!(
            evaluator = "indexed",
            answers = case.len(),
            matched = conclusions.len(),
            "evaluated case"
        );
        conclusions
    }

    fn first_match(&self, case: &Case) -> Option<Conclusion> {
        self.matching_positions(case)
            .first()
            .and_then(|&position| self.rules.get(position))
            .map(|rule| rule.conclusion())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agaric_domain::{Condition, Rule, Target};

    fn rules() -> Arc<RuleBase> {
        let rule = |name: &str, target, conditions: &[(&str, &str)]| {
            Rule::new(
                name,
                target,
                conditions.iter().map(|(a, v)| Condition::new(*a, *v)).collect(),
                None,
            )
            .unwrap()
        };
        Arc::new(
            RuleBase::new(vec![
                rule("poisonous_odor_f", Target::Poisonous, &[("odor", "f")]),
                rule("poisonous_gill_color_b", Target::Poisonous, &[("gill_color", "b")]),
                rule(
                    "edible_odor_n_stalk_shape_t",
                    Target::Edible,
                    &[("odor", "n"), ("stalk_shape", "t")],
                ),
                rule(
                    "edible_cap_color_c_odor_n",
                    Target::Edible,
                    &[("cap_color", "c"), ("odor", "n")],
                ),
            ])
            .unwrap(),
        )
    }

    fn evaluators() -> Vec<Box<dyn Evaluator>> {
        vec![
            Box::new(NaiveEvaluator::new(rules())),
            Box::new(IndexedEvaluator::new(rules())),
        ]
    }

    fn rule_names(conclusions: &[Conclusion]) -> Vec<&str> {
        conclusions.iter().map(|c| c.rule.as_str()).collect()
    }

    #[test]
    fn test_empty_case_matches_nothing() {
        for evaluator in evaluators() {
            assert!(evaluator.evaluate(&Case::new()).is_empty(), "{}", evaluator.name());
            assert!(evaluator.first_match(&Case::new()).is_none());
        }
    }

    #[test]
    fn test_all_matches_in_rule_order() {
        let case = Case::new()
            .with_answer("stalk_shape", "t")
            .with_answer("odor", "n")
            .with_answer("cap_color", "c");

        for evaluator in evaluators() {
            let conclusions = evaluator.evaluate(&case);
            assert_eq!(
                rule_names(&conclusions),
                ["edible_odor_n_stalk_shape_t", "edible_cap_color_c_odor_n"],
                "{}",
                evaluator.name()
            );
        }
    }

    #[test]
    fn test_first_match_is_earliest_rule() {
        let case = Case::new().with_answer("gill_color", "b").with_answer("odor", "f");
        for evaluator in evaluators() {
            let first = evaluator.first_match(&case).unwrap();
            assert_eq!(first.rule, "poisonous_odor_f", "{}", evaluator.name());
        }
    }

    #[test]
    fn test_partial_conjunction_does_not_match() {
        let case = Case::new().with_answer("odor", "n");
        for evaluator in evaluators() {
            assert!(evaluator.evaluate(&case).is_empty(), "{}", evaluator.name());
        }
    }

    #[test]
    fn test_unknown_values_are_ignored() {
        let case = Case::new().with_answer("cap_color", "x").with_answer("gill_spacing", "x");
        for evaluator in evaluators() {
            assert!(evaluator.evaluate(&case).is_empty(), "{}", evaluator.name());
        }
    }
}
