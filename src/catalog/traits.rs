// Game catalog trait — the seam between the resolver and RAWG.
//
// The resolver only needs "best hit for a name" and "full record for a
// slug". Tests swap in an in-memory catalog.

use async_trait::async_trait;

use super::error::CatalogError;
use super::models::{CatalogCandidate, CatalogGameRecord};

#[async_trait]
pub trait GameCatalog: Send + Sync {
    /// Search by name and return the single best candidate, if any.
    async fn search(&self, name: &str) -> Result<Option<CatalogCandidate>, CatalogError>;

    /// Fetch the full record for a candidate's slug.
    async fn details(&self, slug: &str) -> Result<CatalogGameRecord, CatalogError>;
}
