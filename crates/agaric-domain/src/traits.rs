//! Trait definitions for evaluation and external interactions
//!
//! These traits define the seams between the domain model and the engine or
//! the integration layer. Implementations live in other crates.

use crate::{Case, Conclusion, RuleBase};
use std::collections::BTreeMap;

/// Matches cases against the rule base it was built over
///
/// Implemented by the engine (`agaric-engine`). Every implementation must
/// return the same conclusions in rule-base order for the same case, and
/// must not keep state between calls.
pub trait Evaluator: Send + Sync {
    /// Short name used in logs and configuration
    fn name(&self) -> &'static str;

    /// The rule base being evaluated
    fn rules(&self) -> &RuleBase;

    /// Conclusions of every matching rule, in rule-base order
    fn evaluate(&self, case: &Case) -> Vec<Conclusion>;

    /// Conclusion of the earliest matching rule
    fn first_match(&self, case: &Case) -> Option<Conclusion> {
        self.rules()
            .iter()
            .find(|rule| rule.matches(case))
            .map(|rule| rule.conclusion())
    }
}

/// Source of attribute values proposed from outside the questionnaire
///
/// Implemented by integrations such as image analysis. Suggestions are raw
/// attribute/value pairs; the engine filters them against the catalog before
/// they reach a case.
pub trait AttributeSuggester {
    /// Error type for suggestion operations
    type Error;

    /// Propose attribute values for the given specimen input
    fn suggest(&self, input: &[u8]) -> Result<BTreeMap<String, String>, Self::Error>;
}
