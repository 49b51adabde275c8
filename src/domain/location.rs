//! Location value object

use std::fmt;

/// A latitude/longitude pair attached to an upload.
///
/// The default (0.0, 0.0) is the "unknown" coordinate sent when no
/// location is available.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    /// Create a new point
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Whether this is the unknown coordinate
    pub fn is_unknown(&self) -> bool {
        self.latitude == 0.0 && self.longitude == 0.0
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}
