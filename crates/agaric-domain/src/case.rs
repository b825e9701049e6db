//! Case module - the answers collected during one interview

use std::collections::BTreeMap;

/// The fact set of one interview: attribute identifier to value code
///
/// Each attribute holds at most one value; answering again overwrites it.
/// Domain membership is checked at the engine boundary, not here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Case {
    answers: BTreeMap<String, String>,
}

impl Case {
    /// Create an empty case
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an answer, returning the value it replaced
    pub fn insert(
        &mut self,
        attribute: impl Into<String>,
        value: impl Into<String>,
    ) -> Option<String> {
        self.answers.insert(attribute.into(), value.into())
    }

    /// Consume the case and return it with one more answer
    ///
    /// # Examples
    ///
    /// ```
    /// use agaric_domain::Case;
    ///
    /// let case = Case::new().with_answer("odor", "n").with_answer("stalk_shape", "t");
    /// assert_eq!(case.get("odor"), Some("n"));
    /// assert_eq!(case.len(), 2);
    /// ```
    pub fn with_answer(mut self, attribute: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(attribute, value);
        self
    }

    /// Value recorded for `attribute`
    pub fn get(&self, attribute: &str) -> Option<&str> {
        self.answers.get(attribute).map(String::as_str)
    }

    /// Whether `attribute` has been answered
    pub fn contains(&self, attribute: &str) -> bool {
        self.answers.contains_key(attribute)
    }

    /// Answers sorted by attribute identifier
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.answers.iter().map(|(a, v)| (a.as_str(), v.as_str()))
    }

    /// Number of answered attributes
    pub fn len(&self) -> usize {
        self.answers.len()
    }

    /// Whether nothing has been answered yet
    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    /// Forget every answer
    pub fn clear(&mut self) {
        self.answers.clear();
    }
}

impl<A, V> FromIterator<(A, V)> for Case
where
    A: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (A, V)>>(iter: I) -> Self {
        Self {
            answers: iter.into_iter().map(|(a, v)| (a.into(), v.into())).collect(),
        }
    }
}
