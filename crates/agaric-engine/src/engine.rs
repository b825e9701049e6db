//! The engine facade shared by every interview

use crate::config::{EngineConfig, ValuePolicy};
use crate::definition::Definition;
use crate::error::EngineError;
use crate::interview::Interview;
use crate::selector::{AttributeScore, QuestionSelector};
use crate::suggest::{self, MergeReport};
use agaric_domain::{
    AttributeCatalog, AttributeSuggester, Case, Conclusion, DomainError, Evaluator, RuleBase,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, warn};

/// A question ready for display
///
/// The engine only deals in codes; text comes from the caller's translation
/// function, keyed as `attributes.<attr>.question`,
/// `attributes.<attr>.description` and `attributes.<attr>.options.<code>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    /// Attribute being asked about
    pub attribute: String,
    /// Translation key of the prompt
    pub prompt_key: String,
    /// Translated prompt
    pub prompt: String,
    /// Translation key of the explanatory text
    pub description_key: String,
    /// Translated explanatory text
    pub description: String,
    /// `(code, label)` pairs in domain order
    pub options: Vec<(String, String)>,
}

/// Read-only catalog, rules and heuristics shared by concurrent interviews
///
/// Construct once at start-up and hand out `&Engine` (or `Arc<Engine>`) to
/// each session; nothing here is mutated after construction.
pub struct Engine {
    catalog: Arc<AttributeCatalog>,
    rules: Arc<RuleBase>,
    evaluator: Box<dyn Evaluator>,
    selector: QuestionSelector,
    config: EngineConfig,
}

impl Engine {
    /// Create an engine from a definition and configuration
    pub fn new(definition: Definition, config: EngineConfig) -> Result<Self, EngineError> {
        config.validate().map_err(EngineError::Config)?;

        let (catalog, rules, mut priority) = definition.into_parts();
        for (attribute, weight) in &config.priority {
            if !catalog.contains(attribute) {
                return Err(EngineError::Config(format!(
                    "priority override for unknown attribute '{}'",
                    attribute
                )));
            }
            priority.set(attribute.clone(), *weight);
        }

        let catalog = Arc::new(catalog);
        let rules = Arc::new(rules);
        let evaluator = config.evaluator.build(Arc::clone(&rules));
        let selector = QuestionSelector::new(Arc::clone(&catalog), Arc::clone(&rules), priority)
            .with_opening_from_priority(config.first_question_from_priority);

        info!(
            attributes = catalog.len(),
            rules = rules.len(),
            evaluator = evaluator.name(),
            "engine ready"
        );

        Ok(Self {
            catalog,
            rules,
            evaluator,
            selector,
            config,
        })
    }

    /// Engine over the built-in mushroom definition
    pub fn reference(config: EngineConfig) -> Result<Self, EngineError> {
        Self::new(Definition::reference()?, config)
    }

    /// The attribute catalog
    pub fn catalog(&self) -> &AttributeCatalog {
        &self.catalog
    }

    /// The rule base, in priority order
    pub fn rules(&self) -> &RuleBase {
        &self.rules
    }

    /// The active configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Name of the evaluator in use
    pub fn evaluator_name(&self) -> &'static str {
        self.evaluator.name()
    }

    /// Value codes valid for `attribute`
    pub fn domain_of(&self, attribute: &str) -> Result<&[String], EngineError> {
        Ok(self.catalog.domain_of(attribute)?)
    }

    /// Build the question for `attribute`, labelling it with `translate`
    pub fn question_for<F>(&self, attribute: &str, translate: F) -> Result<Question, EngineError>
    where
        F: Fn(&str) -> String,
    {
        let domain = self.catalog.domain_of(attribute)?;
        let prompt_key = format!("attributes.{}.question", attribute);
        let description_key = format!("attributes.{}.description", attribute);
        let options = domain
            .iter()
            .map(|code| {
                let label = translate(&format!("attributes.{}.options.{}", attribute, code));
                (code.clone(), label)
            })
            .collect();

        Ok(Question {
            attribute: attribute.to_string(),
            prompt: translate(&prompt_key),
            prompt_key,
            description: translate(&description_key),
            description_key,
            options,
        })
    }

    /// Record an answer, validating it against the catalog
    ///
    /// Unknown attributes are always rejected. Out-of-domain values are
    /// rejected under [`ValuePolicy::Strict`] and stored with a warning under
    /// [`ValuePolicy::Lenient`].
    pub fn submit_answer(
        &self,
        mut case: Case,
        attribute: &str,
        value: &str,
    ) -> Result<Case, EngineError> {
        match self.catalog.check(attribute, value) {
            Ok(()) => {}
            Err(DomainError::InvalidValue { .. })
                if self.config.value_policy == ValuePolicy::Lenient =>
            {
                warn!(attribute, value, "storing value outside the attribute's domain");
            }
            Err(e) => return Err(e.into()),
        }
        case.insert(attribute, value);
        Ok(case)
    }

    /// Conclusions of every matching rule, in rule order
    pub fn evaluate(&self, case: &Case) -> Vec<Conclusion> {
        self.evaluator.evaluate(case)
    }

    /// Conclusion of the earliest matching rule
    pub fn first_match(&self, case: &Case) -> Option<Conclusion> {
        self.evaluator.first_match(case)
    }

    /// The attribute to ask next, if any
    pub fn next_attribute(&self, case: &Case) -> Option<String> {
        self.selector.next_attribute(case)
    }

    /// Ranked importance of the unanswered attributes
    pub fn scores(&self, case: &Case) -> Vec<AttributeScore> {
        self.selector.scores(case)
    }

    /// Number of rules that can still fire for `case`
    pub fn viable_rule_count(&self, case: &Case) -> usize {
        self.selector.viable_rules(case).count()
    }

    /// A fresh, empty case
    pub fn reset(&self) -> Case {
        Case::new()
    }

    /// Merge suggested values into `case`, skipping anything the catalog rejects
    pub fn merge_suggestions(
        &self,
        case: Case,
        suggestions: BTreeMap<String, String>,
    ) -> MergeReport {
        suggest::merge(&self.catalog, case, suggestions)
    }

    /// Ask an external suggester for attribute values
    pub fn suggest<S>(
        &self,
        suggester: &S,
        input: &[u8],
    ) -> Result<BTreeMap<String, String>, EngineError>
    where
        S: AttributeSuggester,
        S::Error: std::fmt::Display,
    {
        suggester
            .suggest(input)
            .map_err(|e| EngineError::Suggestion(e.to_string()))
    }

    /// Start a new interview session
    pub fn start_interview(&self) -> Interview<'_> {
        Interview::new(self)
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("attributes", &self.catalog.len())
            .field("rules", &self.rules.len())
            .field("evaluator", &self.evaluator.name())
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EvaluatorKind;
    use crate::interview::Step;
    use agaric_domain::Target;

    fn engine() -> Engine {
        Engine::reference(EngineConfig::default()).unwrap()
    }

    struct FixedSuggester(&'static str);

    impl AttributeSuggester for FixedSuggester {
        type Error = String;

        fn suggest(&self, _input: &[u8]) -> Result<BTreeMap<String, String>, Self::Error> {
            if self.0.is_empty() {
                return Err("vision service unavailable".to_string());
            }
            Ok(BTreeMap::from([("cap_color".to_string(), self.0.to_string())]))
        }
    }

    #[test]
    fn test_question_for_uses_translation_keys() {
        let question = engine()
            .question_for("stalk_shape", |key| format!("<{}>", key))
            .unwrap();

        assert_eq!(question.prompt_key, "attributes.stalk_shape.question");
        assert_eq!(question.prompt, "<attributes.stalk_shape.question>");
        assert_eq!(
            question.options,
            [
                ("e".to_string(), "<attributes.stalk_shape.options.e>".to_string()),
                ("t".to_string(), "<attributes.stalk_shape.options.t>".to_string()),
            ]
        );
    }

    #[test]
    fn test_question_for_unknown_attribute() {
        let result = engine().question_for("veil_type", |k| k.to_string());
        assert!(matches!(
            result,
            Err(EngineError::Domain(DomainError::UnknownAttribute(_)))
        ));
    }

    #[test]
    fn test_submit_answer_strict() {
        let engine = engine();
        let case = engine.submit_answer(Case::new(), "odor", "f").unwrap();
        assert_eq!(case.get("odor"), Some("f"));

        let err = engine.submit_answer(case, "odor", "x").unwrap_err();
        assert!(matches!(err, EngineError::Domain(DomainError::InvalidValue { .. })));
    }

    #[test]
    fn test_submit_answer_lenient_keeps_value() {
        let engine = Engine::reference(EngineConfig::lenient()).unwrap();
        let case = engine.submit_answer(Case::new(), "cap_color", "x").unwrap();
        assert_eq!(case.get("cap_color"), Some("x"));

        let err = engine.submit_answer(case, "veil_type", "p").unwrap_err();
        assert!(matches!(err, EngineError::Domain(DomainError::UnknownAttribute(_))));
    }

    #[test]
    fn test_priority_override_applied() {
        let mut config = EngineConfig::default();
        config.priority.insert("habitat".to_string(), 20);
        let engine = Engine::reference(config).unwrap();
        assert_eq!(engine.next_attribute(&Case::new()).as_deref(), Some("habitat"));
    }

    #[test]
    fn test_priority_override_for_unknown_attribute() {
        let mut config = EngineConfig::default();
        config.priority.insert("veil_type".to_string(), 20);
        assert!(matches!(Engine::reference(config), Err(EngineError::Config(_))));
    }

    #[test]
    fn test_evaluator_selection() {
        let mut config = EngineConfig::default();
        config.evaluator = EvaluatorKind::Naive;
        let engine = Engine::reference(config).unwrap();
        assert_eq!(engine.evaluator_name(), "naive");
        assert_eq!(
            engine.first_match(&Case::new().with_answer("odor", "a")).map(|c| c.target),
            Some(Target::Edible)
        );
    }

    #[test]
    fn test_suggest_and_merge() {
        let engine = engine();
        let suggestions = engine.suggest(&FixedSuggester("w"), b"jpeg").unwrap();
        let report = engine.merge_suggestions(engine.reset(), suggestions);
        assert_eq!(report.case.get("cap_color"), Some("w"));
    }

    #[test]
    fn test_suggester_failure_surfaces() {
        let result = engine().suggest(&FixedSuggester(""), b"jpeg");
        assert!(matches!(result, Err(EngineError::Suggestion(_))));
    }

    #[test]
    fn test_engine_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Engine>();
    }

    #[test]
    fn test_concurrent_interviews_share_one_engine() {
        let engine = engine();
        let scripts: [&[(&str, &str)]; 2] = [
            &[("odor", "f")],
            &[("odor", "n"), ("stalk_shape", "t")],
        ];

        let labels: Vec<Vec<&'static str>> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|i| {
                    let engine = &engine;
                    let script = scripts[i % 2];
                    scope.spawn(move || {
                        (0..25)
                            .map(|_| {
                                let mut interview = engine.start_interview();
                                let mut step = interview.current_step();
                                for (attribute, value) in script {
                                    step = interview.submit(attribute, value).unwrap();
                                }
                                match step {
                                    Step::Concluded(outcome) => outcome.label(),
                                    Step::Ask(a) => panic!("still asking {}", a),
                                }
                            })
                            .collect::<Vec<_>>()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        for (i, run) in labels.iter().enumerate() {
            let expected = if i % 2 == 0 { "poisonous" } else { "edible" };
            assert_eq!(run.len(), 25);
            assert!(run.iter().all(|label| *label == expected), "thread {}: {:?}", i, run);
        }
    }
}
