// Catalog data model — what the resolver hands to the formatter.
//
// Optional fields are real `Option`s: RAWG omits or nulls plenty of them
// (unreleased games have no date, most indies have no Metacritic score).

use serde::{Deserialize, Serialize};

/// Top search hit, before the full record is fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogCandidate {
    pub name: String,
    pub slug: String,
}

/// A developer or publisher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub name: String,
    pub slug: String,
}

/// A storefront where the game is sold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreLink {
    pub name: String,
    pub slug: String,
    pub url: String,
}

/// Full game record as used for matching and formatting.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CatalogGameRecord {
    pub name: String,
    pub slug: String,
    /// Release date as sent by the catalog (`YYYY-MM-DD`).
    pub release_date: Option<String>,
    pub metacritic_score: Option<u32>,
    pub metacritic_url: Option<String>,
    pub developers: Vec<Company>,
    pub publishers: Vec<Company>,
    pub stores: Vec<StoreLink>,
    pub alternative_names: Vec<String>,
}
