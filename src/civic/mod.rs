//! Elected representative lookup.
//!
//! The pipeline talks to the civic information service through the
//! [`RepresentativeLookup`] trait so that failures can be replaced by a
//! fallback message without stopping the pass.

pub mod client;

pub use client::{load_api_key, CivicClient, ClientConfig};

use crate::models::{LegislatorLookup, Official};
use thiserror::Error;
use tracing::{debug, warn};

/// Shown in place of the officials list whenever the lookup fails.
pub const FALLBACK_MESSAGE: &str =
    "You can find your representatives by visiting www.commoncause.org/take-action/find-elected-officials";

/// Any way a representative lookup can fail.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("request timed out after {0}s")]
    Timeout(u64),

    #[error("cannot connect to civic service at {0}")]
    Connect(String),

    #[error("failed to send request: {0}")]
    Request(#[source] reqwest::Error),

    #[error("civic API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("failed to parse civic response: {0}")]
    Decode(#[source] reqwest::Error),

    #[error("lookups are disabled (offline mode)")]
    Offline,
}

/// Resolves a cleaned zip code to its legislators.
#[allow(async_fn_in_trait)]
pub trait RepresentativeLookup {
    async fn legislators_by_zipcode(&self, zipcode: &str) -> Result<Vec<Official>, LookupError>;
}

/// A lookup that always fails, used with `--offline`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineLookup;

impl RepresentativeLookup for OfflineLookup {
    async fn legislators_by_zipcode(&self, _zipcode: &str) -> Result<Vec<Official>, LookupError> {
        Err(LookupError::Offline)
    }
}

/// Look up legislators, substituting the fallback message on any failure.
pub async fn lookup_or_fallback<L: RepresentativeLookup>(
    lookup: &L,
    zipcode: &str,
) -> LegislatorLookup {
    match lookup.legislators_by_zipcode(zipcode).await {
        Ok(officials) => {
            debug!("Found {} officials for {}", officials.len(), zipcode);
            LegislatorLookup::Officials(officials)
        }
        Err(LookupError::Offline) => LegislatorLookup::Fallback(FALLBACK_MESSAGE.to_string()),
        Err(e) => {
            warn!("Representative lookup for {} failed: {}", zipcode, e);
            LegislatorLookup::Fallback(FALLBACK_MESSAGE.to_string())
        }
    }
}
