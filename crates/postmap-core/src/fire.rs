//! Satellite fire-detection records.

use serde::Serialize;

/// Column name under which the satellite source tag is exported.
pub const SOURCE_COLUMN: &str = "satellite_source";

/// One hot-spot row from a satellite feed.
///
/// `fields` keeps the provider's column names and values exactly as received,
/// in column order. Renaming columns is left to presentation code.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FireDetection {
    /// Satellite source identifier, e.g. `VIIRS_SNPP_NRT`.
    pub source: String,
    pub fields: Vec<(String, String)>,
}

impl FireDetection {
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(column, _)| column == name)
            .map(|(_, value)| value.as_str())
    }

    /// Parsed `latitude` column.
    #[must_use]
    pub fn latitude(&self) -> Option<f64> {
        self.field("latitude").and_then(|v| v.trim().parse().ok())
    }

    /// Parsed `longitude` column.
    #[must_use]
    pub fn longitude(&self) -> Option<f64> {
        self.field("longitude").and_then(|v| v.trim().parse().ok())
    }
}
