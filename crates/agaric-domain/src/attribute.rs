//! Attribute catalog - the registry of observable specimen traits

use crate::DomainError;
use std::collections::HashMap;

/// An observable attribute and its domain of value codes
///
/// The domain is non-empty, ordered as declared and fixed once loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    name: String,
    values: Vec<String>,
}

impl Attribute {
    /// Create an attribute
    ///
    /// # Errors
    /// Returns [`DomainError::RuleLoad`] if the name or domain is empty, or
    /// if the domain repeats a value code.
    pub fn new(name: impl Into<String>, values: Vec<String>) -> Result<Self, DomainError> {
        let name = name.into();
        if name.is_empty() {
            return Err(DomainError::RuleLoad("attribute name cannot be empty".to_string()));
        }
        if values.is_empty() {
            return Err(DomainError::RuleLoad(format!(
                "attribute '{}' has an empty domain",
                name
            )));
        }
        for (i, value) in values.iter().enumerate() {
            if values[..i].contains(value) {
                return Err(DomainError::RuleLoad(format!(
                    "attribute '{}' lists value '{}' twice",
                    name, value
                )));
            }
        }
        Ok(Self { name, values })
    }

    /// Attribute identifier
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Value codes in declaration order
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Whether `value` belongs to this attribute's domain
    pub fn accepts(&self, value: &str) -> bool {
        self.values.iter().any(|v| v == value)
    }
}

/// Registry of every attribute the questionnaire knows about
///
/// Loaded once at start-up and never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct AttributeCatalog {
    attributes: Vec<Attribute>,
    index: HashMap<String, usize>,
}

impl AttributeCatalog {
    /// Build a catalog from attributes in display order
    ///
    /// # Errors
    /// Returns [`DomainError::RuleLoad`] if an attribute name is registered twice.
    pub fn new(attributes: Vec<Attribute>) -> Result<Self, DomainError> {
        let mut index = HashMap::with_capacity(attributes.len());
        for (position, attribute) in attributes.iter().enumerate() {
            if index.insert(attribute.name.clone(), position).is_some() {
                return Err(DomainError::RuleLoad(format!(
                    "attribute '{}' is registered twice",
                    attribute.name
                )));
            }
        }
        Ok(Self { attributes, index })
    }

    /// Look up an attribute by identifier
    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.index.get(name).map(|&i| &self.attributes[i])
    }

    /// Value codes valid for `name`
    ///
    /// # Errors
    /// Returns [`DomainError::UnknownAttribute`] for an unregistered identifier.
    pub fn domain_of(&self, name: &str) -> Result<&[String], DomainError> {
        self.get(name)
            .map(Attribute::values)
            .ok_or_else(|| DomainError::UnknownAttribute(name.to_string()))
    }

    /// Check that `value` is a legal answer for `name`
    pub fn check(&self, name: &str, value: &str) -> Result<(), DomainError> {
        if self.domain_of(name)?.iter().any(|v| v == value) {
            Ok(())
        } else {
            Err(DomainError::InvalidValue {
                attribute: name.to_string(),
                value: value.to_string(),
            })
        }
    }

    /// Whether `name` is registered
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Position of `name` in catalog order
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Attributes in catalog order
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Attribute identifiers in catalog order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.attributes.iter().map(Attribute::name)
    }

    /// Number of registered attributes
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Whether the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn sample_catalog() -> AttributeCatalog {
        AttributeCatalog::new(vec![
            Attribute::new("odor", codes(&["a", "l", "f", "n"])).unwrap(),
            Attribute::new("stalk_shape", codes(&["e", "t"])).unwrap(),
        ])
        .unwrap()
    }

    #[test]
    fn test_domain_of_known_attribute() {
        let catalog = sample_catalog();
        assert_eq!(catalog.domain_of("stalk_shape").unwrap(), ["e", "t"]);
    }

    #[test]
    fn test_domain_of_unknown_attribute() {
        let catalog = sample_catalog();
        assert_eq!(
            catalog.domain_of("veil_type"),
            Err(DomainError::UnknownAttribute("veil_type".to_string()))
        );
    }

    #[test]
    fn test_check_value_membership() {
        let catalog = sample_catalog();
        assert!(catalog.check("odor", "f").is_ok());
        assert!(matches!(
            catalog.check("odor", "F"),
            Err(DomainError::InvalidValue { .. })
        ));
        assert!(matches!(
            catalog.check("cap_color", "n"),
            Err(DomainError::UnknownAttribute(_))
        ));
    }

    #[test]
    fn test_empty_domain_rejected() {
        assert!(Attribute::new("odor", Vec::new()).is_err());
    }

    #[test]
    fn test_repeated_value_rejected() {
        assert!(Attribute::new("odor", codes(&["a", "a"])).is_err());
    }

    #[test]
    fn test_duplicate_attribute_rejected() {
        let result = AttributeCatalog::new(vec![
            Attribute::new("odor", codes(&["a"])).unwrap(),
            Attribute::new("odor", codes(&["f"])).unwrap(),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_catalog_order_preserved() {
        let catalog = sample_catalog();
        let names: Vec<_> = catalog.names().collect();
        assert_eq!(names, ["odor", "stalk_shape"]);
        assert_eq!(catalog.position("stalk_shape"), Some(1));
    }
}
