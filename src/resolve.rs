//! Resolution driver: geocode unresolved points one at a time and persist
//! the working set after every attempt.
//!
//! Persisting after each point costs a full rewrite per lookup but means an
//! interrupted run loses at most the lookup in flight.

use std::time::Duration;

use indicatif::ProgressBar;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, error, info};

use crate::error::{GeocoderError, StoreError};
use crate::geocoder::Geocoder;
use crate::models::{DeliveryPoint, Geolocation};
use crate::store::PointSink;

#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    /// After a failed structured lookup, retry with the display string and
    /// then with `"city, street"`.
    pub fallback: bool,
    /// Minimum spacing between consecutive geocoder calls.
    pub delay: Option<Duration>,
}

/// Outcome counts for one [`resolve_all`] run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveSummary {
    pub resolved: usize,
    pub failed: usize,
    pub skipped: usize,
}

/// Spaces out geocoder calls.
struct Throttle {
    delay: Option<Duration>,
    next: Option<Instant>,
}

impl Throttle {
    fn new(delay: Option<Duration>) -> Self {
        Self { delay, next: None }
    }

    async fn wait(&mut self) {
        let Some(delay) = self.delay else {
            return;
        };
        if let Some(next) = self.next {
            sleep_until(next).await;
        }
        self.next = Some(Instant::now() + delay);
    }
}

/// Geocode every point without a geolocation, in order.
///
/// Lookup failures are logged and leave the point unresolved; they never
/// abort the batch. After each attempted point the whole slice is handed to
/// `sink`. Already resolved points are skipped without a lookup or a write.
/// A failing `sink` is the only error returned.
pub async fn resolve_all<G, S>(
    points: &mut [DeliveryPoint],
    geocoder: &G,
    sink: &mut S,
    options: &ResolveOptions,
    progress: &ProgressBar,
) -> Result<ResolveSummary, StoreError>
where
    G: Geocoder + ?Sized,
    S: PointSink + ?Sized,
{
    let mut summary = ResolveSummary::default();
    let mut throttle = Throttle::new(options.delay);

    for i in 0..points.len() {
        if points[i].is_resolved() {
            debug!("Geolocation for {} already exists", points[i]);
            summary.skipped += 1;
            progress.inc(1);
            continue;
        }

        match locate(&points[i], geocoder, options.fallback, &mut throttle).await {
            Some(geolocation) => {
                debug!("Resolved {} to {}", points[i], geolocation);
                points[i].geolocation = Some(geolocation);
                summary.resolved += 1;
            }
            None => summary.failed += 1,
        }

        sink.persist(points)?;
        progress.inc(1);
    }

    info!(
        "Resolution finished: {} resolved, {} failed, {} already cached",
        summary.resolved, summary.failed, summary.skipped
    );
    Ok(summary)
}

async fn locate<G: Geocoder + ?Sized>(
    point: &DeliveryPoint,
    geocoder: &G,
    fallback: bool,
    throttle: &mut Throttle,
) -> Option<Geolocation> {
    debug!("Searching for {}", point);
    throttle.wait().await;
    match geocoder.search_structured(point.address()).await {
        Ok(geolocation) => return Some(geolocation),
        Err(e) => log_failure(point, "structured", &e),
    }

    if !fallback {
        return None;
    }

    let mut queries = vec![point.to_string()];
    if !point.street().is_empty() {
        queries.push(format!("{}, {}", point.city(), point.street()));
    }

    for query in queries {
        debug!("Retrying {} as free text {:?}", point, query);
        throttle.wait().await;
        match geocoder.search_string(&query).await {
            Ok(geolocation) => return Some(geolocation),
            Err(e) => log_failure(point, "free-text", &e),
        }
    }

    None
}

fn log_failure(point: &DeliveryPoint, kind: &str, err: &GeocoderError) {
    error!("Error while searching for {} ({} lookup): {}", point, kind, err);
}
