//! Links to OpenStreetMap's directions page. No routing happens here.

use std::fmt;

use clap::ValueEnum;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::models::Geolocation;

const DIRECTIONS_URL: &str = "https://www.openstreetmap.org/directions";

/// Everything but unreserved characters and `/` is escaped; spaces become `%20`.
const ROUTE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'/');

/// Travel mode for the directions link
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Vehicle {
    Bicycle,
    Car,
    Foot,
}

impl fmt::Display for Vehicle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Vehicle::Bicycle => write!(f, "bicycle"),
            Vehicle::Car => write!(f, "car"),
            Vehicle::Foot => write!(f, "foot"),
        }
    }
}

/// Directions URL from `from` to `to` using the OSRM engine for `vehicle`.
pub fn routing_link(from: Geolocation, to: Geolocation, vehicle: Vehicle) -> String {
    let route = format!("{};{}", from, to);
    format!(
        "{}?engine=fossgis_osrm_{}&route={}",
        DIRECTIONS_URL,
        vehicle,
        utf8_percent_encode(&route, ROUTE)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_car_link() {
        let link = routing_link(
            Geolocation::new(32.0, 34.0),
            Geolocation::new(32.1, 34.1),
            Vehicle::Car,
        );
        assert_eq!(
            link,
            "https://www.openstreetmap.org/directions?engine=fossgis_osrm_car&route=32%2C%2034%3B32.1%2C%2034.1"
        );
    }

    #[test]
    fn test_engine_per_vehicle() {
        let a = Geolocation::new(1.0, 2.0);
        assert!(routing_link(a, a, Vehicle::Foot).contains("engine=fossgis_osrm_foot&"));
        assert!(routing_link(a, a, Vehicle::Bicycle).contains("engine=fossgis_osrm_bicycle&"));
    }

    #[test]
    fn test_route_escapes_space_as_percent_twenty() {
        let link = routing_link(
            Geolocation::new(-33.5, 151.25),
            Geolocation::new(32.0, 34.0),
            Vehicle::Foot,
        );
        assert!(link.ends_with("&route=-33.5%2C%20151.25%3B32%2C%2034"), "{link}");
        assert!(!link.contains('+'));
    }
}
