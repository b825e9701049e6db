//! Next-question selection
//!
//! The selector asks about the unanswered attribute referenced by the most
//! rules that can still fire. Ties go to the static priority table, then to
//! catalog order, so the same case always yields the same question.

use agaric_domain::{AttributeCatalog, Case, Rule, RuleBase};
use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::debug;

/// Weight given to attributes missing from the priority table
pub const DEFAULT_WEIGHT: u32 = 1;

/// Hand-assigned importance per attribute, higher first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriorityTable {
    weights: HashMap<String, u32>,
}

impl PriorityTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the weight of `attribute`
    pub fn set(&mut self, attribute: impl Into<String>, weight: u32) {
        self.weights.insert(attribute.into(), weight);
    }

    /// Weight of `attribute`, [`DEFAULT_WEIGHT`] when unlisted
    pub fn weight(&self, attribute: &str) -> u32 {
        self.weights.get(attribute).copied().unwrap_or(DEFAULT_WEIGHT)
    }

    /// Attributes with an explicit weight
    pub fn attributes(&self) -> impl Iterator<Item = &str> {
        self.weights.keys().map(String::as_str)
    }

    /// Whether no weight is set
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

impl<A: Into<String>> FromIterator<(A, u32)> for PriorityTable {
    fn from_iter<I: IntoIterator<Item = (A, u32)>>(iter: I) -> Self {
        Self {
            weights: iter.into_iter().map(|(a, w)| (a.into(), w)).collect(),
        }
    }
}

/// Importance of one unanswered attribute for a given case
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeScore {
    /// Attribute identifier
    pub attribute: String,
    /// Number of viable rules referencing the attribute
    pub references: usize,
    /// Static priority weight
    pub weight: u32,
}

/// Picks the next attribute to ask about
#[derive(Debug, Clone)]
pub struct QuestionSelector {
    catalog: Arc<AttributeCatalog>,
    rules: Arc<RuleBase>,
    priority: PriorityTable,
    opening_from_priority: bool,
}

impl QuestionSelector {
    /// Create a selector over a catalog and rule base
    pub fn new(
        catalog: Arc<AttributeCatalog>,
        rules: Arc<RuleBase>,
        priority: PriorityTable,
    ) -> Self {
        Self {
            catalog,
            rules,
            priority,
            opening_from_priority: true,
        }
    }

    /// Choose whether an empty case is answered straight from the priority table
    pub fn with_opening_from_priority(mut self, enabled: bool) -> Self {
        self.opening_from_priority = enabled;
        self
    }

    /// The priority table in use
    pub fn priority(&self) -> &PriorityTable {
        &self.priority
    }

    /// Rules not yet contradicted by any answer
    pub fn viable_rules<'a>(&'a self, case: &'a Case) -> impl Iterator<Item = &'a Rule> + 'a {
        self.rules.iter().filter(move |rule| rule.is_viable(case))
    }

    /// Scores of every unanswered attribute referenced by a viable rule, best first
    pub fn scores(&self, case: &Case) -> Vec<AttributeScore> {
        let mut references: BTreeMap<&str, usize> = BTreeMap::new();
        for rule in self.viable_rules(case) {
            for condition in rule.conditions() {
                if !case.contains(&condition.attribute) {
                    *references.entry(condition.attribute.as_str()).or_default() += 1;
                }
            }
        }

        let mut scores: Vec<AttributeScore> = references
            .into_iter()
            .map(|(attribute, references)| AttributeScore {
                attribute: attribute.to_string(),
                references,
                weight: self.priority.weight(attribute),
            })
            .collect();
        scores.sort_by_key(|s| {
            (
                Reverse(s.references),
                Reverse(s.weight),
                self.catalog.position(&s.attribute).unwrap_or(usize::MAX),
            )
        });
        scores
    }

    /// The attribute to ask next, or `None` when no viable rule needs another answer
    pub fn next_attribute(&self, case: &Case) -> Option<String> {
        if case.is_empty() && self.opening_from_priority {
            if let Some(opening) = self.opening() {
                debug!(attribute = opening, "opening question from priority table");
                return Some(opening.to_string());
            }
        }

        let next = self.scores(case).into_iter().next().map(|s| s.attribute);
        debug!(answers = case.len(), next = ?next, "selected next attribute");
        next
    }

    fn opening(&self) -> Option<&str> {
        self.catalog
            .names()
            .enumerate()
            .max_by_key(|&(position, name)| (self.priority.weight(name), Reverse(position)))
            .map(|(_, name)| name)
    }
}
