//! Search statistics.

use serde::{Deserialize, Serialize};

/// How many products a search found versus how many survived filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct SearchStats {
    /// Products the retailer returned before filtering.
    pub total_found: u32,
    /// Products left after ingredient filters were applied.
    pub filtered_count: u32,
}

impl SearchStats {
    /// Zero statistics.
    pub const ZERO: Self = Self {
        total_found: 0,
        filtered_count: 0,
    };

    /// Create statistics from raw counts.
    #[must_use]
    pub const fn new(total_found: u32, filtered_count: u32) -> Self {
        Self {
            total_found,
            filtered_count,
        }
    }

    /// Whether the statistics panel should be shown.
    ///
    /// An empty search hides the panel rather than showing "0 of 0".
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.total_found > 0
    }

    /// Summary line for the statistics panel, if it is visible.
    #[must_use]
    pub fn summary(&self) -> Option<String> {
        self.is_visible().then(|| {
            format!(
                "Found {} healthy products out of {} total",
                self.filtered_count, self.total_found
            )
        })
    }
}
