//! Location provider adapters
//!
//! There is no live positioning source on desktop targets; the fixed
//! provider stands in for the device's last-known location and the
//! denied provider models absent permission.

use async_trait::async_trait;

use crate::application::ports::LocationProvider;
use crate::domain::location::GeoPoint;

/// Provider returning a fixed, configured coordinate
pub struct FixedLocationProvider {
    point: GeoPoint,
}

impl FixedLocationProvider {
    pub fn new(point: GeoPoint) -> Self {
        Self { point }
    }
}

#[async_trait]
impl LocationProvider for FixedLocationProvider {
    async fn last_known(&self) -> Option<GeoPoint> {
        Some(self.point)
    }
}

/// Provider for when location sharing is not granted
pub struct DeniedLocationProvider;

#[async_trait]
impl LocationProvider for DeniedLocationProvider {
    async fn last_known(&self) -> Option<GeoPoint> {
        None
    }
}
