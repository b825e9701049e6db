//! Agaric Engine
//!
//! Rule matching, question selection and the interview state machine for the
//! Agaric diagnostic questionnaire.
//!
//! # Overview
//!
//! The engine holds an immutable attribute catalog and rule base, loaded once
//! from a TOML definition, and shares them read-only with every interview.
//! After each answer it either reaches a classification or picks the next
//! attribute worth asking about.
//!
//! # Architecture
//!
//! ```text
//! answer → Engine::submit_answer → Case → Evaluator → conclusions?
//!                                           └─ none → QuestionSelector → next attribute
//! ```
//!
//! # Key Features
//!
//! - **Two evaluators**: a linear scan and an inverted-index evaluator with
//!   identical results, chosen by configuration
//! - **Discriminative questioning**: the next attribute is the one referenced
//!   by the most rules that can still fire
//! - **Boundary validation**: answers and external suggestions are checked
//!   against the catalog before they reach a case
//!
//! # Example Usage
//!
//! ```
//! use agaric_engine::{Definition, Engine, EngineConfig, Step};
//!
//! # fn main() -> Result<(), agaric_engine::EngineError> {
//! let engine = Engine::new(Definition::reference()?, EngineConfig::default())?;
//! let mut interview = engine.start_interview();
//!
//! assert_eq!(interview.prompt(), Some("odor"));
//! match interview.answer("f")? {
//!     Step::Concluded(outcome) => assert_eq!(outcome.label(), "poisonous"),
//!     Step::Ask(attribute) => println!("next: {}", attribute),
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod definition;
mod engine;
mod error;
mod evaluator;
mod interview;
mod selector;
mod suggest;

pub use config::{EngineConfig, EvaluatorKind, ValuePolicy};
pub use definition::Definition;
pub use engine::{Engine, Question};
pub use error::EngineError;
pub use evaluator::{IndexedEvaluator, NaiveEvaluator};
pub use interview::{Interview, InterviewState, Outcome, Step, UNKNOWN_LABEL};
pub use selector::{AttributeScore, PriorityTable, QuestionSelector};
pub use suggest::{MergeReport, Rejection};
