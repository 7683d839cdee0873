//! HTTP client for the FIRMS area CSV API.

use std::time::Duration;

use futures::future::join_all;
use postmap_core::{Coordinate, FireDetection};
use reqwest::Client;

use crate::bbox::BoundingBox;
use crate::error::FirmsError;

const DEFAULT_BASE_URL: &str = "https://firms.modaps.eosdis.nasa.gov";

/// Satellite products queried for every search, in result order.
pub const SOURCES: [&str; 4] = [
    "VIIRS_NOAA20_NRT",
    "VIIRS_SNPP_NRT",
    "MODIS_NOAA20_NRT",
    "MODIS_SNPP_NRT",
];

/// Client for the FIRMS area API.
///
/// The map key is part of the request path, so URLs are never logged.
pub struct FirmsClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl FirmsClient {
    /// # Errors
    ///
    /// Returns [`reqwest::Error`] if the HTTP client cannot be built.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, reqwest::Error> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_BASE_URL)
    }

    /// # Errors
    ///
    /// Returns [`reqwest::Error`] if the HTTP client cannot be built.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Fetches detections within `radius_km` of `center` from every source.
    ///
    /// Sources are queried concurrently. A source that fails is logged and
    /// contributes nothing, so the result is empty when all of them fail.
    /// Rows keep the provider's columns and are tagged with their source.
    pub async fn fetch_nearby(
        &self,
        center: Coordinate,
        radius_km: f64,
        day_range: u32,
    ) -> Vec<FireDetection> {
        let bbox = BoundingBox::around(center, radius_km);
        tracing::info!(bbox = %bbox, day_range, "querying FIRMS");

        let results = join_all(
            SOURCES
                .iter()
                .map(|source| self.fetch_source(source, &bbox, day_range)),
        )
        .await;

        let mut detections = Vec::new();
        for (source, result) in SOURCES.iter().zip(results) {
            match result {
                Ok(rows) => {
                    tracing::debug!(source, rows = rows.len(), "FIRMS source answered");
                    detections.extend(rows);
                }
                Err(e) => {
                    tracing::warn!(source, error = %e, "FIRMS source failed, skipping");
                }
            }
        }

        tracing::info!(count = detections.len(), "fire detections collected");
        detections
    }

    /// Fetches one source. A blank body is an empty result.
    ///
    /// # Errors
    ///
    /// - [`FirmsError::Http`] on transport failure.
    /// - [`FirmsError::UnexpectedStatus`] on a non-2xx response.
    /// - [`FirmsError::Csv`] if the body is not well-formed CSV.
    pub async fn fetch_source(
        &self,
        source: &str,
        bbox: &BoundingBox,
        day_range: u32,
    ) -> Result<Vec<FireDetection>, FirmsError> {
        let url = format!(
            "{}/api/area/csv/{}/{source}/{bbox}/{day_range}",
            self.base_url, self.api_key
        );

        // The request URL carries the map key.
        let http_err = |e: reqwest::Error| FirmsError::Http {
            source_name: source.to_string(),
            source: e.without_url(),
        };

        let response = self.client.get(&url).send().await.map_err(http_err)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FirmsError::UnexpectedStatus {
                source_name: source.to_string(),
                status: status.as_u16(),
                body: body.trim().to_string(),
            });
        }

        let body = response.text().await.map_err(http_err)?;
        if body.trim().is_empty() {
            return Ok(Vec::new());
        }

        parse_detections(source, &body).map_err(|e| FirmsError::Csv {
            source_name: source.to_string(),
            source: e,
        })
    }
}

/// Parses a header-first CSV body into detections tagged with `source`.
fn parse_detections(source: &str, body: &str) -> Result<Vec<FireDetection>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new().from_reader(body.as_bytes());
    let headers = reader.headers()?.clone();

    reader
        .records()
        .map(|record| {
            let record = record?;
            let fields = headers
                .iter()
                .zip(record.iter())
                .map(|(column, value)| (column.to_string(), value.to_string()))
                .collect();
            Ok(FireDetection {
                source: source.to_string(),
                fields,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIIRS_CSV: &str = "latitude,longitude,bright_ti4,acq_date,confidence\n\
        60.31,25.01,330.5,2025-09-01,n\n\
        60.28,25.12,301.2,2025-09-01,l\n";

    #[test]
    fn parse_keeps_columns_in_order_and_tags_source() {
        let rows = parse_detections("VIIRS_SNPP_NRT", VIIRS_CSV).unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.source == "VIIRS_SNPP_NRT"));

        let columns: Vec<&str> = rows[0].fields.iter().map(|(c, _)| c.as_str()).collect();
        assert_eq!(
            columns,
            ["latitude", "longitude", "bright_ti4", "acq_date", "confidence"]
        );
        assert_eq!(rows[1].field("confidence"), Some("l"));
        assert_eq!(rows[0].latitude(), Some(60.31));
    }

    #[test]
    fn header_only_body_has_no_rows() {
        let rows = parse_detections("MODIS_SNPP_NRT", "latitude,longitude,frp\n").unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn header_names_pass_through_untrimmed() {
        let rows = parse_detections("VIIRS_SNPP_NRT", "latitude, longitude\n60.1,25.0\n").unwrap();
        let columns: Vec<&str> = rows[0].fields.iter().map(|(c, _)| c.as_str()).collect();
        assert_eq!(columns, ["latitude", " longitude"]);
        assert_eq!(rows[0].longitude(), None);
    }

    #[test]
    fn ragged_rows_are_a_parse_error() {
        let body = "latitude,longitude\n60.1,25.0\n60.2\n";
        assert!(parse_detections("MODIS_SNPP_NRT", body).is_err());
    }

    #[test]
    fn sources_are_the_four_nrt_products() {
        assert_eq!(SOURCES.len(), 4);
        assert!(SOURCES.iter().all(|s| s.ends_with("_NRT")));
    }
}
