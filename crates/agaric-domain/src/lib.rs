//! Agaric Domain Layer
//!
//! This crate contains the domain model of the Agaric diagnostic
//! questionnaire. It defines the value objects and trait interfaces that the
//! engine and the command-line front end depend upon, and performs no I/O.
//!
//! ## Key Concepts
//!
//! - **Attribute**: an observable trait of a specimen with a finite domain of value codes
//! - **Rule**: a conjunction of attribute=value conditions concluding a target label
//! - **Case**: the answers collected so far for one interview
//! - **Conclusion**: the (target, rule, description) result of a fired rule
//!
//! ## Architecture
//!
//! - Rule bases and attribute catalogs are immutable once constructed and are
//!   shared read-only between concurrent interviews
//! - A case belongs to exactly one interview
//! - Trait definitions mark the seams where evaluators and external
//!   suggestion sources plug in

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod attribute;
pub mod case;
pub mod conclusion;
pub mod error;
pub mod rule;
pub mod session;
pub mod traits;

// Re-exports for convenience
pub use attribute::{Attribute, AttributeCatalog};
pub use case::Case;
pub use conclusion::Conclusion;
pub use error::DomainError;
pub use rule::{Condition, Rule, RuleBase, Target};
pub use session::SessionId;
pub use traits::{AttributeSuggester, Evaluator};
