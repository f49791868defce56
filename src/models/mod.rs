//! Core data models for delivery point ranking.

pub mod distance;
pub mod location;
pub mod point;

pub use distance::{Distance, DistanceUnit};
pub use location::{Address, Geolocation, DEFAULT_COUNTRY, GENERIC_STREETS};
pub use point::{DeliveryPoint, HouseValue, PointRecord};
