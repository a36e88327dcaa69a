// Ordered, capped resolution of extracted references.
//
// References are resolved in small concurrent batches. Each batch is no
// larger than the number of slots still free, so once MAX_RESULTS games
// are accepted no further lookups are issued. Results are applied in text
// order, never completion order, and a game whose slug was already
// accepted is skipped.

use std::collections::HashSet;

use futures::future::join_all;
use tracing::debug;

use crate::catalog::models::CatalogGameRecord;
use crate::catalog::resolver::{LookupError, Resolver};

/// Games per reply.
pub const MAX_RESULTS: usize = 5;

/// Default concurrent lookups per comment.
pub const DEFAULT_FANOUT: usize = 3;

/// What came out of resolving one comment's references.
#[derive(Debug, Default)]
pub struct ResolvedGames {
    /// Unique by slug, in order of first appearance, at most the cap.
    pub games: Vec<CatalogGameRecord>,
    /// References whose lookup exhausted its retries.
    pub failures: Vec<LookupError>,
    /// How many distinct references were sent to the catalog.
    pub queried: usize,
}

/// Resolve `references` into at most `max_results` distinct games.
///
/// Repeated reference strings (ignoring case) are looked up once.
pub async fn resolve_unique(
    resolver: &Resolver,
    references: &[String],
    max_results: usize,
    fanout: usize,
) -> ResolvedGames {
    let mut seen_refs = HashSet::new();
    let pending: Vec<&str> = references
        .iter()
        .map(String::as_str)
        .filter(|r| seen_refs.insert(r.to_lowercase()))
        .collect();

    let mut resolved = ResolvedGames::default();
    let mut seen_slugs = HashSet::new();
    let fanout = fanout.max(1);

    while resolved.games.len() < max_results && resolved.queried < pending.len() {
        let free_slots = max_results - resolved.games.len();
        let batch_len = fanout
            .min(free_slots)
            .min(pending.len() - resolved.queried);
        let batch = &pending[resolved.queried..resolved.queried + batch_len];
        resolved.queried += batch_len;

        // join_all keeps input order whatever order lookups finish in
        let mut lookups = Vec::with_capacity(batch_len);
        for reference in batch {
            lookups.push(resolver.resolve(reference));
        }
        let results = join_all(lookups).await;

        for (reference, result) in batch.iter().zip(results) {
            match result {
                Ok(Some(game)) => {
                    if resolved.games.len() >= max_results {
                        break;
                    }
                    if seen_slugs.insert(game.slug.clone()) {
                        resolved.games.push(game);
                    } else {
                        debug!(reference = reference, slug = %game.slug, "Duplicate game skipped");
                    }
                }
                Ok(None) => {}
                Err(e) => resolved.failures.push(e),
            }
        }
    }

    resolved
}
