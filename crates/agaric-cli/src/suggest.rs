//! Attribute suggestions read from JSON.
//!
//! The input is an object mapping attribute names to value codes, the same
//! shape a vision service returns:
//!
//! ```json
//! { "cap_shape": "x", "cap_color": "n", "habitat": "d" }
//! ```

use crate::error::{CliError, Result};
use agaric_domain::AttributeSuggester;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::warn;

/// Suggests attribute values from a JSON document.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSuggester;

impl AttributeSuggester for JsonSuggester {
    type Error = CliError;

    fn suggest(&self, input: &[u8]) -> Result<BTreeMap<String, String>> {
        let document: Value = serde_json::from_slice(input)?;
        let Value::Object(entries) = document else {
            return Err(CliError::InvalidInput(
                "suggestions must be a JSON object of attribute to value".to_string(),
            ));
        };

        let mut suggestions = BTreeMap::new();
        for (attribute, value) in entries {
            match value {
                Value::String(code) => {
                    suggestions.insert(attribute, code);
                }
                Value::Null => {}
                other => warn!(
                    attribute = %attribute,
                    value = %other,
                    "ignoring non-string suggestion"
                ),
            }
        }
        Ok(suggestions)
    }
}

/// Read the raw suggestion document at `path`.
pub fn read_suggestions(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| {
        CliError::InvalidInput(format!("cannot read suggestions from {}: {}", path.display(), e))
    })
}
