//! Nearest-point ranking.

mod calc;

use tracing::debug;

use crate::models::{DeliveryPoint, Distance, Geolocation};

pub use calc::{DistanceCalc, GeodesicCalc, HaversineCalc};

/// Number of points returned when the caller doesn't choose.
pub const DEFAULT_LIMIT: usize = 10;

/// A point together with its distance from the reference location.
#[derive(Debug, Clone)]
pub struct RankedPoint<'a> {
    pub point: &'a DeliveryPoint,
    pub geolocation: Geolocation,
    pub distance: Distance,
}

/// The `limit` points nearest to `reference`, closest first.
///
/// Unresolved points are left out. The sort is stable, so points at equal
/// distance keep their input order.
pub fn rank<'a, C>(
    reference: Geolocation,
    points: &'a [DeliveryPoint],
    calc: &C,
    limit: usize,
) -> Vec<RankedPoint<'a>>
where
    C: DistanceCalc + ?Sized,
{
    let mut ranked: Vec<RankedPoint<'a>> = points
        .iter()
        .filter_map(|point| {
            point.geolocation.map(|geolocation| RankedPoint {
                point,
                geolocation,
                distance: calc.distance(reference, geolocation),
            })
        })
        .collect();

    debug!(
        "Ranking {} resolved points of {}",
        ranked.len(),
        points.len()
    );

    ranked.sort_by(|a, b| a.distance.cmp(&b.distance));
    ranked.truncate(limit);
    ranked
}
