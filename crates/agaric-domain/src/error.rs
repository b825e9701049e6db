//! Domain error types

use thiserror::Error;

/// Errors raised while building or querying domain values
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The attribute identifier is not registered in the catalog
    #[error("Unknown attribute: {0}")]
    UnknownAttribute(String),

    /// The value code is not part of the attribute's domain
    #[error("Invalid value '{value}' for attribute '{attribute}'")]
    InvalidValue {
        /// Attribute the value was given for
        attribute: String,
        /// Rejected value code
        value: String,
    },

    /// The rule or catalog definition is malformed
    #[error("Rule load error: {0}")]
    RuleLoad(String),
}
