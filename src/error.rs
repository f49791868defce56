//! Error types shared across the library.

use std::path::PathBuf;

use thiserror::Error;

/// A raw value could not be turned into one of the model types.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("invalid house number {0:?}")]
    InvalidHouse(String),

    #[error("invalid geolocation {0:?}")]
    InvalidGeolocation(String),
}

/// Geocoding lookup failed. Never fatal to a resolution batch.
#[derive(Debug, Error)]
pub enum GeocoderError {
    #[error("no results for {query}")]
    NoResults { query: String },

    #[error("unexpected HTTP status {status} for {query}")]
    UnexpectedStatus { status: u16, query: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid coordinates in response for {query}: {source}")]
    InvalidResponse {
        query: String,
        #[source]
        source: ParseError,
    },
}

/// Reading or writing a point file failed.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unsupported file format {extension:?} for {}", path.display())]
    UnsupportedFormat { path: PathBuf, extension: String },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("CSV error in {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("record {index} in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        index: usize,
        #[source]
        source: ParseError,
    },
}
