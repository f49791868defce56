//! Distance between two coordinates.

use geo::{Distance as _, Geodesic, Haversine};

use crate::models::{Distance, DistanceUnit, Geolocation};

/// Computes the distance between two geolocations.
pub trait DistanceCalc {
    fn distance(&self, from: Geolocation, to: Geolocation) -> Distance;
}

impl<F> DistanceCalc for F
where
    F: Fn(Geolocation, Geolocation) -> Distance,
{
    fn distance(&self, from: Geolocation, to: Geolocation) -> Distance {
        self(from, to)
    }
}

/// Great-circle distance on a sphere of the Earth's mean radius.
#[derive(Debug, Clone, Copy, Default)]
pub struct HaversineCalc;

impl DistanceCalc for HaversineCalc {
    fn distance(&self, from: Geolocation, to: Geolocation) -> Distance {
        let meters = Haversine.distance(from.to_point(), to.to_point());
        Distance::meters(meters).convert(DistanceUnit::Kilometers)
    }
}

/// Shortest path on the WGS84 ellipsoid (Karney).
#[derive(Debug, Clone, Copy, Default)]
pub struct GeodesicCalc;

impl DistanceCalc for GeodesicCalc {
    fn distance(&self, from: Geolocation, to: Geolocation) -> Distance {
        let meters = Geodesic.distance(from.to_point(), to.to_point());
        Distance::meters(meters).convert(DistanceUnit::Kilometers)
    }
}
