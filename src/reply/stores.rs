// Canonical storefront order for the stores line.

use crate::catalog::models::StoreLink;

/// RAWG store slugs in display order. Stores not listed here go last.
const STORE_PRIORITY: &[&str] = &[
    "steam",
    "gog",
    "epic-games",
    "playstation-store",
    "xbox-store",
    "nintendo",
    "xbox360",
    "apple-appstore",
    "google-play",
    "itch",
];

/// Rank of a store slug; unknown stores share the lowest rank.
pub fn store_rank(slug: &str) -> usize {
    STORE_PRIORITY
        .iter()
        .position(|known| *known == slug)
        .unwrap_or(STORE_PRIORITY.len())
}

/// Stores sorted by canonical rank. Ties keep catalog order.
pub fn sort_stores(stores: &[StoreLink]) -> Vec<&StoreLink> {
    let mut sorted: Vec<&StoreLink> = stores.iter().collect();
    sorted.sort_by_key(|store| store_rank(&store.slug));
    sorted
}
