// Game catalog — RAWG lookups, fuzzy acceptance and retry.
//
// The GameCatalog trait is the only thing the resolver talks to, so the
// pipeline can be tested without network access.

pub mod client;
pub mod error;
pub mod fuzzy;
pub mod models;
pub mod resolver;
pub mod traits;
