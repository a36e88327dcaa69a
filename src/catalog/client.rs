// HTTP client for the RAWG games database.
//
// Search: GET /games?search=<name>&page_size=1
// Detail: GET /games/<slug> plus GET /games/<slug>/stores, because the
// detail payload lists storefronts without the per-game store URLs.
//
// API docs: https://api.rawg.io/docs/

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use super::error::CatalogError;
use super::models::{CatalogCandidate, CatalogGameRecord, Company, StoreLink};
use super::traits::GameCatalog;

/// RAWG REST client. Cheap to share behind an `Arc`.
pub struct RawgClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl RawgClient {
    /// Create a new client pointing at the given API root.
    pub fn new(base_url: &str, api_key: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("gamebot/0.1 (dtf comment bot)")
            .timeout(std::time::Duration::from_secs(20))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// GET `path` under the API root with the key attached and decode JSON.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T, CatalogError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(path = path, "RAWG GET request");

        let response = self
            .client
            .get(&url)
            .query(&[("key", self.api_key.as_str())])
            .query(params)
            .send()
            .await
            .map_err(|e| CatalogError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::Status { status, body });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| CatalogError::Decode(format!("{path}: {e}")))
    }
}

#[async_trait]
impl GameCatalog for RawgClient {
    async fn search(&self, name: &str) -> Result<Option<CatalogCandidate>, CatalogError> {
        let page: SearchPage = self
            .get_json("/games", &[("search", name), ("page_size", "1")])
            .await?;

        Ok(page.results.into_iter().next().map(|hit| CatalogCandidate {
            name: hit.name,
            slug: hit.slug,
        }))
    }

    async fn details(&self, slug: &str) -> Result<CatalogGameRecord, CatalogError> {
        let detail: GameDetail = self.get_json(&format!("/games/{slug}"), &[]).await?;
        let stores: StoresPage = self
            .get_json(&format!("/games/{slug}/stores"), &[])
            .await?;
        Ok(detail.into_record(&stores.results))
    }
}

// --- RAWG response types ---

/// `GET /games` search page.
#[derive(Debug, Deserialize)]
pub struct SearchPage {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub results: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
pub struct SearchHit {
    pub name: String,
    pub slug: String,
}

/// `GET /games/{slug}` detail payload (only the fields we use).
#[derive(Debug, Deserialize)]
pub struct GameDetail {
    pub name: String,
    pub slug: String,
    pub released: Option<String>,
    pub metacritic: Option<u32>,
    pub metacritic_url: Option<String>,
    #[serde(default)]
    pub developers: Vec<NamedEntity>,
    #[serde(default)]
    pub publishers: Vec<NamedEntity>,
    #[serde(default)]
    pub stores: Vec<GameStoreEntry>,
    #[serde(default)]
    pub alternative_names: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct NamedEntity {
    pub name: String,
    pub slug: String,
}

/// One `stores[]` entry of the detail payload.
#[derive(Debug, Deserialize)]
pub struct GameStoreEntry {
    #[serde(default)]
    pub url: Option<String>,
    pub store: StoreInfo,
}

#[derive(Debug, Deserialize)]
pub struct StoreInfo {
    pub id: u64,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub domain: Option<String>,
}

/// `GET /games/{slug}/stores` page.
#[derive(Debug, Deserialize)]
pub struct StoresPage {
    #[serde(default)]
    pub results: Vec<GameStoreUrl>,
}

#[derive(Debug, Deserialize)]
pub struct GameStoreUrl {
    pub store_id: u64,
    pub url: String,
}

impl GameDetail {
    /// Merge the detail payload with the per-game store URLs.
    ///
    /// A store without any usable URL is left out rather than linked to
    /// nowhere.
    pub fn into_record(self, store_urls: &[GameStoreUrl]) -> CatalogGameRecord {
        let stores = self
            .stores
            .into_iter()
            .filter_map(|entry| {
                let url = store_urls
                    .iter()
                    .find(|u| u.store_id == entry.store.id && !u.url.is_empty())
                    .map(|u| u.url.clone())
                    .or_else(|| entry.url.filter(|u| !u.is_empty()))
                    .or_else(|| {
                        entry
                            .store
                            .domain
                            .filter(|d| !d.is_empty())
                            .map(|d| format!("https://{d}"))
                    })?;
                Some(StoreLink {
                    name: entry.store.name,
                    slug: entry.store.slug,
                    url,
                })
            })
            .collect();

        CatalogGameRecord {
            name: self.name,
            slug: self.slug,
            release_date: self.released.filter(|d| !d.is_empty()),
            metacritic_score: self.metacritic.filter(|&s| s > 0),
            metacritic_url: self.metacritic_url.filter(|u| !u.is_empty()),
            developers: self.developers.into_iter().map(Company::from).collect(),
            publishers: self.publishers.into_iter().map(Company::from).collect(),
            stores,
            alternative_names: self.alternative_names,
        }
    }
}

impl From<NamedEntity> for Company {
    fn from(entity: NamedEntity) -> Self {
        Company {
            name: entity.name,
            slug: entity.slug,
        }
    }
}
