use serde::Deserialize;

/// One candidate from the `/search?format=json` response array.
///
/// Nominatim encodes coordinates as strings.
#[derive(Debug, Deserialize)]
pub(crate) struct SearchCandidate {
    pub lat: String,
    pub lon: String,
    #[serde(default)]
    pub display_name: String,
}
