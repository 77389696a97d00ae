//! Ingredient-exclusion filters.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Filter`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    /// The input is empty or whitespace only.
    #[error("filter term cannot be blank")]
    Blank,
}

/// An ingredient substring the backend excludes from results.
///
/// ## Constraints
///
/// - Leading and trailing whitespace is trimmed
/// - Must not be empty after trimming
/// - Case is kept exactly as entered
///
/// ## Examples
///
/// ```
/// use healthy_food_core::Filter;
///
/// assert_eq!(Filter::parse("  red 40 ").unwrap().as_str(), "red 40");
/// assert!(Filter::parse("   ").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Filter(String);

impl Filter {
    /// Parse a `Filter` from user input.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::Blank`] if the input is empty after trimming.
    pub fn parse(s: &str) -> Result<Self, FilterError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(FilterError::Blank);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the filter term as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Filter` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Filter {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Filter {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// The user's filters, in the order the backend returned them.
///
/// Entries are unique. The set is only ever replaced wholesale with the
/// backend's authoritative list; it is never reordered locally.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FilterSet(Vec<Filter>);

impl FilterSet {
    /// An empty filter set.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Build a set from the list a backend returned.
    ///
    /// Blank entries are dropped and only the first occurrence of a
    /// duplicate is kept, so the result preserves the backend's order.
    #[must_use]
    pub fn from_server<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut filters: Vec<Filter> = Vec::new();
        for term in terms {
            let Ok(filter) = Filter::parse(term.as_ref()) else {
                continue;
            };
            if !filters.contains(&filter) {
                filters.push(filter);
            }
        }
        Self(filters)
    }

    /// Number of filters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no filters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether the set contains `term` exactly.
    #[must_use]
    pub fn contains(&self, term: &str) -> bool {
        self.0.iter().any(|f| f.as_str() == term)
    }

    /// Iterate over the filters in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Filter> {
        self.0.iter()
    }

    /// The filters as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[Filter] {
        &self.0
    }
}

impl<'a> IntoIterator for &'a FilterSet {
    type Item = &'a Filter;
    type IntoIter = std::slice::Iter<'a, Filter>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims() {
        assert_eq!(Filter::parse("  sugar\t").unwrap().as_str(), "sugar");
    }

    #[test]
    fn test_parse_blank() {
        assert_eq!(Filter::parse(""), Err(FilterError::Blank));
        assert_eq!(Filter::parse(" \n "), Err(FilterError::Blank));
    }

    #[test]
    fn test_parse_keeps_case() {
        assert_eq!(Filter::parse("MSG").unwrap().as_str(), "MSG");
    }

    #[test]
    fn test_from_server_keeps_order_and_drops_duplicates() {
        let set = FilterSet::from_server(["seed oil", "msg", "", "seed oil", "bht"]);
        let terms: Vec<&str> = set.iter().map(Filter::as_str).collect();
        assert_eq!(terms, vec!["seed oil", "msg", "bht"]);
    }

    #[test]
    fn test_contains_is_exact() {
        let set = FilterSet::from_server(["Sugar"]);
        assert!(set.contains("Sugar"));
        assert!(!set.contains("sugar"));
    }

    #[test]
    fn test_serializes_as_string_list() {
        let set = FilterSet::from_server(["a", "b"]);
        assert_eq!(serde_json::to_string(&set).unwrap(), r#"["a","b"]"#);
    }
}
