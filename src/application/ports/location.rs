//! Location provider port interface

use async_trait::async_trait;

use crate::domain::location::GeoPoint;

/// Port for the best-effort location lookup.
///
/// Queried once per upload. `None` means no location is available —
/// sharing not granted, or no fix — and the upload proceeds with the
/// unknown coordinate.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// The last known device location, if any
    async fn last_known(&self) -> Option<GeoPoint>;
}
