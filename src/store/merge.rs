//! Cache merge: combine previously resolved points with fresh data.

use std::collections::HashSet;

use crate::error::ParseError;
use crate::models::{Address, DeliveryPoint, PointRecord};

/// Parse every record, failing on the first malformed one.
pub fn parse_records(records: &[PointRecord]) -> Result<Vec<DeliveryPoint>, (usize, ParseError)> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| DeliveryPoint::from_record(record).map_err(|e| (index, e)))
        .collect()
}

/// Merge cached and fresh points into one working set.
///
/// Cached points are inserted first, then fresh points whose address is not
/// already present. The first point seen for an address wins, so a cached
/// resolution is never replaced by an unresolved fresh duplicate. Insertion
/// order is preserved.
pub fn merge(
    cached: impl IntoIterator<Item = DeliveryPoint>,
    fresh: impl IntoIterator<Item = DeliveryPoint>,
) -> Vec<DeliveryPoint> {
    let mut seen: HashSet<Address> = HashSet::new();
    let mut merged = Vec::new();

    for point in cached.into_iter().chain(fresh) {
        if seen.insert(point.address().clone()) {
            merged.push(point);
        }
    }

    merged
}

/// Parse and merge raw records in one step.
pub fn load(
    fresh_records: &[PointRecord],
    cached_records: &[PointRecord],
) -> Result<Vec<DeliveryPoint>, ParseError> {
    let cached = parse_records(cached_records).map_err(|(_, e)| e)?;
    let fresh = parse_records(fresh_records).map_err(|(_, e)| e)?;
    Ok(merge(cached, fresh))
}
