//! Dropoff - rank delivery points by distance from a location
//!
//! Loads delivery points from a data file, merges them with a cache of
//! previously geocoded points, geocodes the rest through Nominatim and ranks
//! them by distance.

pub mod config;
pub mod error;
pub mod geocoder;
pub mod models;
pub mod ranking;
pub mod resolve;
pub mod routing;
pub mod store;

pub use error::{GeocoderError, ParseError, StoreError};
pub use models::{Address, DeliveryPoint, Distance, DistanceUnit, Geolocation};
