//! Error taxonomy for the harvest pipeline.
//!
//! Fetch and discovery failures abort the whole run; only tabular parse
//! exhaustion is recovered (the affected source degrades to a childless
//! branch in the tree).

use std::path::PathBuf;
use thiserror::Error;

/// Network-level failure while fetching a resource. Never retried.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("failed to write {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// An expected link or URL shape was missing from a fetched page,
/// meaning the portal changed its layout or text.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("cannot derive a scheme+host prefix from {url}")]
    MalformedUrl { url: String },
    #[error("no subordinate-organization listing link on {url}")]
    ListingLinkNotFound { url: String },
    #[error("no .csv link on {url}")]
    CsvLinkNotFound { url: String },
}

/// One encoding+delimiter combination failed to parse a CSV file.
///
/// Internal to the tabular extractor: exhaustion of all combinations
/// degrades to an empty column, it never aborts the run.
#[derive(Debug, Error)]
pub enum TabularError {
    #[error("{encoding} decoding produced replacement characters")]
    Decode { encoding: &'static str },
    #[error("header row has {found} column(s), need at least 2")]
    TooFewColumns { found: usize },
    #[error("malformed record")]
    Record(#[from] csv::Error),
    #[error("record {row} has no second column")]
    MissingColumn { row: usize },
}

/// Configuration loading or validation failure, surfaced before any
/// network work starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("source {name} has invalid url {url}")]
    InvalidUrl { name: String, url: String },
}

/// Chart output failure.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to write chart to {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Any failure that aborts a harvest run.
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),
}
