//! Opaque identifiers.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of the user whose filter list the backend stores.
///
/// The backend treats this as an opaque key. There is no authentication
/// behind it; a single fixed identifier is used per client instance.
///
/// ```
/// use healthy_food_core::UserId;
///
/// assert_eq!(UserId::default().as_str(), "default");
/// assert_eq!(UserId::new("alice").to_string(), "alice");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// The identifier used when none is configured.
    pub const DEFAULT: &'static str = "default";

    /// Create a user ID from any string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self(Self::DEFAULT.to_owned())
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_serializes_transparently() {
        let id = UserId::new("shopper-1");
        let json = serde_json::to_string(&id).expect("serialize");
        assert_eq!(json, "\"shopper-1\"");
    }
}
