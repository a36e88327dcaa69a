// Catalog resolver — turns a bracketed reference into a game record.
//
// RAWG search is lexically fuzzy: "[Doom]" can surface "Doom Eternal" and
// "[Ведьмак 3]" only matches through alternative names. The top hit is
// accepted when its name, or any alternative name, has a partial-ratio
// score above MATCH_THRESHOLD against the query. Otherwise it is a false
// match and the reference resolves to nothing.
//
// Transient catalog failures are retried with linear backoff. Once the
// attempt budget is spent the failure is returned as a LookupError, so
// "no such game" and "catalog unreachable" stay distinguishable.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};

use super::error::CatalogError;
use super::fuzzy::partial_ratio;
use super::models::CatalogGameRecord;
use super::traits::GameCatalog;

/// A candidate must score strictly above this to be accepted.
pub const MATCH_THRESHOLD: u8 = 70;

/// Attempts per catalog call, including the first one.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;

/// Backoff unit: attempt N waits N times this long before attempt N+1.
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(1);

/// A lookup that could not complete because the catalog kept failing.
#[derive(Debug, Error)]
#[error("lookup of {reference:?} failed after {attempts} attempt(s): {source}")]
pub struct LookupError {
    pub reference: String,
    pub attempts: u32,
    #[source]
    pub source: CatalogError,
}

/// Bounded linear backoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: DEFAULT_BASE_DELAY,
        }
    }
}

impl RetryPolicy {
    /// Delay after the given failed attempt (1-based).
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt)
    }
}

pub struct Resolver {
    catalog: Arc<dyn GameCatalog>,
    policy: RetryPolicy,
}

impl Resolver {
    pub fn new(catalog: Arc<dyn GameCatalog>, policy: RetryPolicy) -> Self {
        Self { catalog, policy }
    }

    /// Resolve one reference to an accepted catalog record.
    ///
    /// `Ok(None)` means the catalog answered but had no acceptable match.
    pub async fn resolve(&self, name: &str) -> Result<Option<CatalogGameRecord>, LookupError> {
        let candidate = match self
            .with_retry(name, || self.catalog.search(name))
            .await?
        {
            Some(c) => c,
            None => {
                debug!(reference = name, "No catalog results");
                return Ok(None);
            }
        };

        let record = self
            .with_retry(name, || self.catalog.details(&candidate.slug))
            .await?;

        if accepts(&record, name) {
            debug!(reference = name, slug = %record.slug, "Reference resolved");
            Ok(Some(record))
        } else {
            debug!(
                reference = name,
                candidate = %record.name,
                "Top catalog hit rejected as a false match"
            );
            Ok(None)
        }
    }

    /// Run a catalog call, retrying transient failures within the policy.
    async fn with_retry<T, F, Fut>(&self, reference: &str, operation: F) -> Result<T, LookupError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, CatalogError>>,
    {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 1u32;

        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_transient() && attempt < max_attempts => {
                    let delay = self.policy.backoff_for(attempt);
                    warn!(
                        reference = reference,
                        attempt = attempt,
                        max_attempts = max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "Catalog call failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => {
                    return Err(LookupError {
                        reference: reference.to_string(),
                        attempts: attempt,
                        source: err,
                    })
                }
            }
        }
    }
}

/// Whether `record` is a plausible match for the queried name.
pub fn accepts(record: &CatalogGameRecord, query: &str) -> bool {
    let query = query.to_lowercase();
    if name_score(&record.name, &query) > MATCH_THRESHOLD {
        return true;
    }
    record
        .alternative_names
        .iter()
        .any(|alt| name_score(alt, &query) > MATCH_THRESHOLD)
}

fn name_score(candidate: &str, lowered_query: &str) -> u8 {
    partial_ratio(&candidate.to_lowercase(), lowered_query)
}
