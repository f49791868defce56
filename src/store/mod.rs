//! Point files and the geolocation cache.
//!
//! The data file is the externally downloaded catalog and is never written.
//! The cache file is this program's own output: the full working set with
//! any resolved geolocations, rewritten after every resolution attempt.

mod format;
mod merge;

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::StoreError;
use crate::models::{DeliveryPoint, PointRecord};

pub use format::RecordFormat;
pub use merge::{load, merge, parse_records};

/// Destination for snapshots of the working set.
pub trait PointSink {
    /// Replace the stored state with `points`.
    fn persist(&mut self, points: &[DeliveryPoint]) -> Result<(), StoreError>;
}

/// A point file at a fixed path, with its format resolved up front.
#[derive(Debug, Clone)]
pub struct CacheStore {
    path: PathBuf,
    format: RecordFormat,
}

impl CacheStore {
    /// Fails with [`StoreError::UnsupportedFormat`] for unknown extensions.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let format = RecordFormat::from_path(&path)?;
        Ok(Self { path, format })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Cached records, or nothing if the cache hasn't been written yet.
    pub fn load_records(&self) -> Result<Vec<PointRecord>, StoreError> {
        if !self.path.exists() {
            debug!("No cache file at {}", self.path.display());
            return Ok(Vec::new());
        }
        self.format.load(&self.path)
    }
}

impl PointSink for CacheStore {
    fn persist(&mut self, points: &[DeliveryPoint]) -> Result<(), StoreError> {
        let records: Vec<PointRecord> = points.iter().map(DeliveryPoint::to_record).collect();
        self.format.save(&self.path, &records)?;
        debug!("Saved {} points to {}", records.len(), self.path.display());
        Ok(())
    }
}

/// Read and validate every record in a point file.
pub fn read_points(path: &Path) -> Result<Vec<DeliveryPoint>, StoreError> {
    let records = RecordFormat::from_path(path)?.load(path)?;
    parse_file(path, &records)
}

fn parse_file(path: &Path, records: &[PointRecord]) -> Result<Vec<DeliveryPoint>, StoreError> {
    parse_records(records).map_err(|(index, source)| StoreError::Parse {
        path: path.to_path_buf(),
        index,
        source,
    })
}

/// Build the working set from the data file and the cache.
///
/// A malformed record in either file fails the whole load.
pub fn load_points(data_file: &Path, cache: &CacheStore) -> Result<Vec<DeliveryPoint>, StoreError> {
    let fresh = read_points(data_file)?;
    let cached = parse_file(cache.path(), &cache.load_records()?)?;

    let (fresh_count, cached_count) = (fresh.len(), cached.len());
    let points = merge(cached, fresh);

    info!(
        "Loaded {} points ({} from data file, {} from cache)",
        points.len(),
        fresh_count,
        cached_count
    );
    Ok(points)
}
