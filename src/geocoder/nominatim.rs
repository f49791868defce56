//! Nominatim `/search` client.
//!
//! Usage policy: <https://operations.osmfoundation.org/policies/nominatim/>.
//! The public instance allows at most one request per second and rejects
//! stock library user agents. This client never throttles; the resolution
//! driver paces its calls.

use std::fmt;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error, warn};
use url::Url;

use super::{normalize_street, Geocoder};
use crate::error::GeocoderError;
use crate::models::{Address, Geolocation};

pub const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org";
pub const DEFAULT_USER_AGENT: &str = concat!(
    "dropoff/",
    env!("CARGO_PKG_VERSION"),
    " (delivery point ranking)"
);
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for [`NominatimGeocoder`].
#[derive(Debug, Clone)]
pub struct NominatimConfig {
    pub base_url: String,
    pub user_agent: String,
    pub timeout: Duration,
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl NominatimConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }
}

/// Geocoder backed by a Nominatim instance
pub struct NominatimGeocoder {
    client: Client,
    search_url: Url,
}

/// One entry of the `/search?format=json` response. Only the coordinates
/// are used.
#[derive(Debug, Deserialize)]
struct SearchHit {
    lat: Coordinate,
    lon: Coordinate,
}

/// Nominatim encodes coordinates as strings; some deployments send numbers.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Coordinate {
    Text(String),
    Number(f64),
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Coordinate::Text(s) => write!(f, "{}", s),
            Coordinate::Number(n) => write!(f, "{}", n),
        }
    }
}

impl SearchHit {
    fn geolocation(&self) -> Result<Geolocation, crate::error::ParseError> {
        format!("{}, {}", self.lat, self.lon).parse()
    }
}

impl NominatimGeocoder {
    pub fn new(config: NominatimConfig) -> Result<Self> {
        let base = config.base_url.trim().trim_end_matches('/');
        let search_url = Url::parse(&format!("{}/search", base))
            .with_context(|| format!("Invalid Nominatim base URL: {}", config.base_url))?;

        let client = Client::builder()
            .user_agent(config.user_agent)
            .timeout(config.timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, search_url })
    }

    async fn search(
        &self,
        params: &[(&str, &str)],
        query: &str,
    ) -> Result<Geolocation, GeocoderError> {
        let mut url = self.search_url.clone();
        url.query_pairs_mut()
            .extend_pairs(params)
            .append_pair("format", "json")
            .append_pair("limit", "1");

        debug!("Nominatim request: {}", url);
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Nominatim returned {} for {}: {}", status, query, body);
            return Err(GeocoderError::UnexpectedStatus {
                status: status.as_u16(),
                query: query.to_string(),
            });
        }

        let hits: Vec<SearchHit> = response.json().await?;
        let Some(hit) = hits.first() else {
            warn!("No Nominatim results for {}", query);
            return Err(GeocoderError::NoResults {
                query: query.to_string(),
            });
        };

        hit.geolocation()
            .map_err(|source| GeocoderError::InvalidResponse {
                query: query.to_string(),
                source,
            })
    }
}

#[async_trait(?Send)]
impl Geocoder for NominatimGeocoder {
    async fn search_string(&self, query: &str) -> Result<Geolocation, GeocoderError> {
        self.search(&[("q", query)], query).await
    }

    async fn search_structured(&self, address: &Address) -> Result<Geolocation, GeocoderError> {
        let street = normalize_street(address);
        let mut params = vec![("city", address.city()), ("country", address.country())];
        if !street.is_empty() {
            params.push(("street", street.as_str()));
        }

        let query = describe(&params);
        self.search(&params, &query).await
    }
}

/// `key=value` pairs as sent, for logs and error messages.
fn describe(params: &[(&str, &str)]) -> String {
    params
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join(" ")
}
