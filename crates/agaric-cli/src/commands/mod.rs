//! Command implementations.

pub mod attributes;
pub mod classify;
pub mod interview;
pub mod rules;

pub use self::attributes::execute_attributes;
pub use self::classify::execute_classify;
pub use self::interview::execute_interview;
pub use self::rules::execute_rules;
