//! Interview state machine
//!
//! One answer at a time: record it, evaluate the rules, then either conclude
//! or choose the next question. A concluded interview accepts no more
//! answers until it is reset.

use crate::engine::Engine;
use crate::error::EngineError;
use crate::suggest::Rejection;
use agaric_domain::{Case, Conclusion, SessionId};
use std::collections::BTreeMap;
use tracing::{debug, info, info_span};

/// Label reported when no rule can classify the specimen
pub const UNKNOWN_LABEL: &str = "unknown";

/// Lifecycle stage of an interview
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterviewState {
    /// No answers yet
    Intake,
    /// Some answers, no conclusion yet
    Questioning,
    /// Classified, or nothing left to ask
    Concluded,
}

/// Final result of an interview
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// At least one rule fired
    Classified {
        /// Earliest matching rule's conclusion
        primary: Conclusion,
        /// Every matching rule's conclusion, in rule order
        conclusions: Vec<Conclusion>,
    },
    /// No rule fired and no question is left to ask
    Unclassifiable,
}

impl Outcome {
    /// Target label, or [`UNKNOWN_LABEL`]
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Classified { primary, .. } => primary.target.as_str(),
            Outcome::Unclassifiable => UNKNOWN_LABEL,
        }
    }

    /// The primary conclusion, if classified
    pub fn primary(&self) -> Option<&Conclusion> {
        match self {
            Outcome::Classified { primary, .. } => Some(primary),
            Outcome::Unclassifiable => None,
        }
    }

    /// Every conclusion reached (empty when unclassifiable)
    pub fn conclusions(&self) -> &[Conclusion] {
        match self {
            Outcome::Classified { conclusions, .. } => conclusions,
            Outcome::Unclassifiable => &[],
        }
    }
}

/// What happens after an answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Ask about this attribute next
    Ask(String),
    /// The interview is over
    Concluded(Outcome),
}

/// One guided questionnaire session
///
/// Owns its case exclusively and borrows the shared engine.
#[derive(Debug)]
pub struct Interview<'e> {
    engine: &'e Engine,
    id: SessionId,
    case: Case,
    state: InterviewState,
    prompt: Option<String>,
    outcome: Option<Outcome>,
    asked: Vec<String>,
}

impl<'e> Interview<'e> {
    /// Start a session in [`InterviewState::Intake`]
    ///
    /// Concludes straight away as unclassifiable when there is nothing to
    /// ask even on an empty case.
    pub fn new(engine: &'e Engine) -> Self {
        let mut interview = Self {
            engine,
            id: SessionId::new(),
            case: Case::new(),
            state: InterviewState::Intake,
            prompt: None,
            outcome: None,
            asked: Vec::new(),
        };
        interview.open();
        info!(session = %interview.id, first = ?interview.prompt, "interview started");
        interview
    }

    /// Session identifier
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Current lifecycle stage
    pub fn state(&self) -> InterviewState {
        self.state
    }

    /// Answers collected so far
    pub fn case(&self) -> &Case {
        &self.case
    }

    /// Attribute currently being asked about
    pub fn prompt(&self) -> Option<&str> {
        self.prompt.as_deref()
    }

    /// Final outcome once concluded
    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    /// Every attribute prompted so far, in order
    pub fn asked(&self) -> &[String] {
        &self.asked
    }

    /// Number of answered attributes
    pub fn answered(&self) -> usize {
        self.case.len()
    }

    /// Whether the interview has concluded
    pub fn is_complete(&self) -> bool {
        self.state == InterviewState::Concluded
    }

    /// Answer the current prompt
    pub fn answer(&mut self, value: &str) -> Result<Step, EngineError> {
        if self.is_complete() {
            return Err(EngineError::InterviewConcluded);
        }
        let attribute = self.prompt.clone().ok_or(EngineError::NoPendingQuestion)?;
        self.submit(&attribute, value)
    }

    /// Answer any attribute, prompted or not
    pub fn submit(&mut self, attribute: &str, value: &str) -> Result<Step, EngineError> {
        let _span = info_span!("interview", session = %self.id).entered();
        if self.is_complete() {
            return Err(EngineError::InterviewConcluded);
        }

        self.case = self.engine.submit_answer(self.case.clone(), attribute, value)?;
        debug!(attribute, value, answered = self.case.len(), "answer recorded");
        Ok(self.advance())
    }

    /// Merge externally suggested values, then re-evaluate
    ///
    /// Returns the next step and the suggestions that were skipped. When no
    /// suggestion is accepted the interview does not move.
    pub fn absorb(
        &mut self,
        suggestions: BTreeMap<String, String>,
    ) -> Result<(Step, Vec<Rejection>), EngineError> {
        let _span = info_span!("interview", session = %self.id).entered();
        if self.is_complete() {
            return Err(EngineError::InterviewConcluded);
        }

        let report = self.engine.merge_suggestions(self.case.clone(), suggestions);
        if report.accepted.is_empty() {
            return Ok((self.current_step(), report.rejected));
        }

        debug!(
            accepted = report.accepted.len(),
            rejected = report.rejected.len(),
            "suggestions merged"
        );
        self.case = report.case;
        Ok((self.advance(), report.rejected))
    }

    /// Discard every answer and return to [`InterviewState::Intake`]
    pub fn reset(&mut self) {
        self.case = self.engine.reset();
        self.state = InterviewState::Intake;
        self.outcome = None;
        self.asked.clear();
        self.open();
        info!(session = %self.id, "interview reset");
    }

    /// The step the interview is currently at
    pub fn current_step(&self) -> Step {
        match (&self.outcome, &self.prompt) {
            (Some(outcome), _) => Step::Concluded(outcome.clone()),
            (None, Some(attribute)) => Step::Ask(attribute.clone()),
            (None, None) => Step::Concluded(Outcome::Unclassifiable),
        }
    }

    fn open(&mut self) -> Step {
        match self.engine.next_attribute(&self.case) {
            Some(attribute) => {
                self.prompt = Some(attribute.clone());
                self.asked.push(attribute.clone());
                Step::Ask(attribute)
            }
            None => {
                info!(answered = self.case.len(), "no question left; specimen unclassifiable");
                self.conclude(Outcome::Unclassifiable)
            }
        }
    }

    fn advance(&mut self) -> Step {
        let conclusions = self.engine.evaluate(&self.case);
        if let Some(primary) = conclusions.first().cloned() {
            info!(
                target_label = primary.target.as_str(),
                rule = %primary.rule,
                matched = conclusions.len(),
                "interview concluded"
            );
            return self.conclude(Outcome::Classified { primary, conclusions });
        }

        self.state = InterviewState::Questioning;
        self.open()
    }

    fn conclude(&mut self, outcome: Outcome) -> Step {
        self.state = InterviewState::Concluded;
        self.prompt = None;
        self.outcome = Some(outcome.clone());
        Step::Concluded(outcome)
    }
}
