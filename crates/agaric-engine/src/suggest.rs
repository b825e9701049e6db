//! Merging externally suggested attribute values into a case

use agaric_domain::{AttributeCatalog, Case, DomainError};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// A suggested pair that was not merged
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    /// Suggested attribute
    pub attribute: String,
    /// Suggested value
    pub value: String,
    /// Why the pair was skipped
    pub reason: DomainError,
}

/// Result of merging suggestions into a case
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeReport {
    /// The case with every accepted suggestion applied
    pub case: Case,
    /// Pairs written into the case
    pub accepted: Vec<(String, String)>,
    /// Pairs skipped because the catalog does not allow them
    pub rejected: Vec<Rejection>,
}

/// Apply every suggestion whose attribute and value the catalog accepts
///
/// Suggestions must meet the same domain expectations as typed answers;
/// anything else is skipped with a warning and reported back.
pub(crate) fn merge(
    catalog: &AttributeCatalog,
    mut case: Case,
    suggestions: BTreeMap<String, String>,
) -> MergeReport {
    let mut accepted = Vec::new();
    let mut rejected = Vec::new();

    for (attribute, value) in suggestions {
        match catalog.check(&attribute, &value) {
            Ok(()) => {
                debug!(attribute = %attribute, value = %value, "accepted suggestion");
                case.insert(attribute.clone(), value.clone());
                accepted.push((attribute, value));
            }
            Err(reason) => {
                warn!(attribute = %attribute, value = %value, "skipping suggestion: {}", reason);
                rejected.push(Rejection {
                    attribute,
                    value,
                    reason,
                });
            }
        }
    }

    MergeReport {
        case,
        accepted,
        rejected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agaric_domain::Attribute;

    fn catalog() -> AttributeCatalog {
        AttributeCatalog::new(vec![
            Attribute::new("cap_color", vec!["n".to_string(), "w".to_string()]).unwrap(),
            Attribute::new("cap_shape", vec!["x".to_string(), "f".to_string()]).unwrap(),
        ])
        .unwrap()
    }

    #[test]
    fn test_valid_suggestions_merged() {
        let suggestions = BTreeMap::from([
            ("cap_color".to_string(), "w".to_string()),
            ("cap_shape".to_string(), "x".to_string()),
        ]);
        let report = merge(&catalog(), Case::new(), suggestions);

        assert_eq!(report.accepted.len(), 2);
        assert!(report.rejected.is_empty());
        assert_eq!(report.case.get("cap_color"), Some("w"));
    }

    #[test]
    fn test_invalid_suggestions_skipped() {
        let suggestions = BTreeMap::from([
            ("cap_color".to_string(), "purple".to_string()),
            ("veil_type".to_string(), "p".to_string()),
            ("cap_shape".to_string(), "f".to_string()),
        ]);
        let report = merge(&catalog(), Case::new(), suggestions);

        assert_eq!(report.accepted, [("cap_shape".to_string(), "f".to_string())]);
        assert_eq!(report.rejected.len(), 2);
        assert!(!report.case.contains("cap_color"));
        assert!(!report.case.contains("veil_type"));
        assert!(report
            .rejected
            .iter()
            .any(|r| matches!(r.reason, DomainError::UnknownAttribute(_))));
    }

    #[test]
    fn test_suggestion_overwrites_existing_answer() {
        let case = Case::new().with_answer("cap_color", "n");
        let suggestions = BTreeMap::from([("cap_color".to_string(), "w".to_string())]);
        let report = merge(&catalog(), case, suggestions);
        assert_eq!(report.case.get("cap_color"), Some("w"));
    }
}
