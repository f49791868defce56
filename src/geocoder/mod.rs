//! Address to coordinate resolution.
//!
//! [`Geocoder`] is the seam between the resolution pipeline and the outside
//! world. [`NominatimGeocoder`] talks to a Nominatim instance; tests plug in
//! their own implementations.

mod nominatim;
mod street;

use async_trait::async_trait;

use crate::error::GeocoderError;
use crate::models::{Address, Geolocation};

pub use nominatim::{NominatimConfig, NominatimGeocoder, DEFAULT_BASE_URL, DEFAULT_USER_AGENT};
pub use street::{normalize_street, STREET_PREFIXES};

/// Resolves addresses to a single best-match coordinate.
///
/// Each call performs exactly one lookup against the backing service with
/// no retry and no throttling. Callers are responsible for pacing requests.
#[async_trait(?Send)]
pub trait Geocoder {
    /// Free-text lookup.
    async fn search_string(&self, query: &str) -> Result<Geolocation, GeocoderError>;

    /// Structured lookup by city, country and normalized street.
    async fn search_structured(&self, address: &Address) -> Result<Geolocation, GeocoderError>;
}
