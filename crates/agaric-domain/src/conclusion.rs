//! Conclusion module - the result of a fired rule

use crate::Target;
use std::fmt;

/// A classification reached because a rule's conditions all hold
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conclusion {
    /// Classification label
    pub target: Target,

    /// Name of the rule that fired
    pub rule: String,

    /// Human-readable description of the rule
    pub description: String,
}

impl fmt::Display for Conclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.target, self.rule)
    }
}
