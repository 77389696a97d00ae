//! Retailer store selector.

use serde::{Deserialize, Serialize};

/// Which retailer integration a search targets.
///
/// The set is closed. The client passes the selector through to the backend
/// and never checks whether the backend actually supports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Store {
    /// Kroger (`kroger`).
    #[default]
    Kroger,
    /// H-E-B (`heb`).
    Heb,
}

impl Store {
    /// Every supported store, in display order.
    pub const ALL: [Self; 2] = [Self::Kroger, Self::Heb];

    /// Wire value sent to the backend.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Kroger => "kroger",
            Self::Heb => "heb",
        }
    }

    /// Human-facing retailer name.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Kroger => "Kroger",
            Self::Heb => "HEB",
        }
    }
}

impl std::fmt::Display for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Store {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "kroger" => Ok(Self::Kroger),
            "heb" => Ok(Self::Heb),
            _ => Err(format!("unknown store: {s}. Supported stores: heb, kroger")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_store_wire_format() {
        assert_eq!(serde_json::to_string(&Store::Kroger).unwrap(), "\"kroger\"");
        assert_eq!(serde_json::to_string(&Store::Heb).unwrap(), "\"heb\"");
        assert_eq!(serde_json::from_str::<Store>("\"heb\"").unwrap(), Store::Heb);
    }

    #[test]
    fn test_store_from_str_is_case_insensitive() {
        assert_eq!("HEB".parse::<Store>().unwrap(), Store::Heb);
        assert_eq!(" Kroger ".parse::<Store>().unwrap(), Store::Kroger);
        assert!("walmart".parse::<Store>().is_err());
    }

    #[test]
    fn test_store_default_is_kroger() {
        assert_eq!(Store::default(), Store::Kroger);
        assert_eq!(Store::Heb.display_name(), "HEB");
    }
}
