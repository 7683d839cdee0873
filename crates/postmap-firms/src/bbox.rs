//! Square search area around a point.

use std::fmt;

use postmap_core::Coordinate;

/// Approximate kilometres per degree of latitude.
const KM_PER_DEGREE: f64 = 111.0;

/// Axis-aligned box in degrees, as the FIRMS area API expects it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    /// Box extending `radius_km` from `center` in each cardinal direction.
    ///
    /// Uses a flat approximation: one degree of latitude is 111 km and one
    /// degree of longitude shrinks with `cos(lat)`. Not meaningful at the
    /// poles.
    #[must_use]
    pub fn around(center: Coordinate, radius_km: f64) -> Self {
        let lat_offset = radius_km / KM_PER_DEGREE;
        let lon_offset = radius_km / (KM_PER_DEGREE * center.lat.to_radians().cos());

        Self {
            min_lon: center.lon - lon_offset,
            min_lat: center.lat - lat_offset,
            max_lon: center.lon + lon_offset,
            max_lat: center.lat + lat_offset,
        }
    }

    #[must_use]
    pub fn lat_span(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    #[must_use]
    pub fn lon_span(&self) -> f64 {
        self.max_lon - self.min_lon
    }
}

/// Renders as `minLon,minLat,maxLon,maxLat`.
impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{}",
            self.min_lon, self.min_lat, self.max_lon, self.max_lat
        )
    }
}
