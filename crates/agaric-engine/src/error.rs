//! Error types for the engine

use agaric_domain::DomainError;
use thiserror::Error;

/// Errors that can occur while loading definitions or running interviews
#[derive(Error, Debug)]
pub enum EngineError {
    /// Unknown attribute or out-of-domain value at the boundary
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Malformed or missing rule definition (fatal at start-up)
    #[error("Rule load error: {0}")]
    RuleLoad(String),

    /// Invalid engine configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Answer submitted after the interview reached its conclusion
    #[error("Interview already concluded; reset to start over")]
    InterviewConcluded,

    /// Answer submitted while no question is pending
    #[error("No question is pending")]
    NoPendingQuestion,

    /// External suggestion source failed
    #[error("Suggestion error: {0}")]
    Suggestion(String),
}
