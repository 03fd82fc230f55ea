//! Request DTOs for the meetings service API
//!
//! Metadata and meeting bodies deserialize straight into their domain
//! models; only auxiliary query strings live here.

use serde::Deserialize;

/// Query string for the cache refresh operation (POST /api/metadata/refresh)
///
/// # Fields
/// - `type`: Category to invalidate; the whole cache is dropped when absent
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RefreshQuery {
    /// Category to refresh
    #[serde(rename = "type", default)]
    pub metadata_type: Option<String>,
}

impl RefreshQuery {
    /// Returns the requested category, treating a blank value as absent.
    pub fn category(&self) -> Option<&str> {
        self.metadata_type
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}
