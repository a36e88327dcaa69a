// Reply formatting — one Markdown block per resolved game.
//
// Block layout (every line after the title is optional):
//
//   🎮 [Half-Life 2](https://rawg.io/games/half-life-2)
//   Дата релиза: 16.11.2004
//   Metacritic: [96](https://www.metacritic.com/game/pc/half-life-2)
//
//   Разработчик: [Valve Software](https://rawg.io/developers/valve-software)
//   Издатель: [Valve](https://rawg.io/publishers/valve)
//   🛒 [Steam](https://store.steampowered.com/app/220/) · [GOG](...)

use chrono::NaiveDate;

use super::stores::sort_stores;
use crate::catalog::models::{CatalogGameRecord, Company};
use crate::config::DEFAULT_CATALOG_WEB_URL;

/// Separator between blocks of different games.
pub const BLOCK_DIVIDER: &str = "\n\n———\n\n";

const GAME_GLYPH: &str = "🎮";
const CART_GLYPH: &str = "🛒";
const STORE_SEPARATOR: &str = " · ";

/// Renders catalog records as reply text. Pure: no I/O, never fails.
#[derive(Debug, Clone)]
pub struct ReplyFormatter {
    web_url: String,
}

impl Default for ReplyFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_CATALOG_WEB_URL)
    }
}

impl ReplyFormatter {
    /// `web_url` is the public catalog site used for title and company links.
    pub fn new(web_url: &str) -> Self {
        Self {
            web_url: web_url.trim_end_matches('/').to_string(),
        }
    }

    /// Format one game as a Markdown block.
    pub fn format(&self, game: &CatalogGameRecord) -> String {
        let mut lines = vec![format!(
            "{GAME_GLYPH} [{}]({}/games/{})",
            game.name, self.web_url, game.slug
        )];

        if let Some(date) = &game.release_date {
            lines.push(format!("Дата релиза: {}", display_date(date)));
        }

        if let Some(score) = game.metacritic_score.filter(|&s| s > 0) {
            match &game.metacritic_url {
                Some(url) => lines.push(format!("Metacritic: [{score}]({url})")),
                None => lines.push(format!("Metacritic: {score}")),
            }
        }

        // The blank line belongs to the developers line only
        if !game.developers.is_empty() {
            let label = if game.developers.len() == 1 {
                "Разработчик"
            } else {
                "Разработчики"
            };
            lines.push(String::new());
            lines.push(format!(
                "{label}: {}",
                self.company_links(&game.developers, "developers")
            ));
        }
        if !game.publishers.is_empty() {
            let label = if game.publishers.len() == 1 {
                "Издатель"
            } else {
                "Издатели"
            };
            lines.push(format!(
                "{label}: {}",
                self.company_links(&game.publishers, "publishers")
            ));
        }

        if !game.stores.is_empty() {
            let links: Vec<String> = sort_stores(&game.stores)
                .into_iter()
                .map(|store| format!("[{}]({})", store.name, store.url))
                .collect();
            lines.push(format!("{CART_GLYPH} {}", links.join(STORE_SEPARATOR)));
        }

        lines.join("\n")
    }

    /// Join formatted blocks into a reply body. `None` when there is
    /// nothing to say.
    pub fn compose(&self, games: &[CatalogGameRecord]) -> Option<String> {
        if games.is_empty() {
            return None;
        }
        let blocks: Vec<String> = games.iter().map(|g| self.format(g)).collect();
        Some(blocks.join(BLOCK_DIVIDER))
    }

    fn company_links(&self, companies: &[Company], section: &str) -> String {
        companies
            .iter()
            .map(|c| format!("[{}]({}/{section}/{})", c.name, self.web_url, c.slug))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// `YYYY-MM-DD` → `DD.MM.YYYY`. Anything unparseable is shown as sent.
pub fn display_date(raw: &str) -> String {
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => date.format("%d.%m.%Y").to_string(),
        Err(_) => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::models::StoreLink;

    fn company(name: &str) -> Company {
        Company {
            name: name.to_string(),
            slug: name.to_lowercase().replace(' ', "-"),
        }
    }

    fn half_life_2() -> CatalogGameRecord {
        CatalogGameRecord {
            name: "Half-Life 2".into(),
            slug: "half-life-2".into(),
            release_date: Some("2004-11-16".into()),
            metacritic_score: Some(96),
            metacritic_url: Some("https://www.metacritic.com/game/pc/half-life-2".into()),
            developers: vec![company("Valve Software")],
            publishers: vec![company("Valve")],
            stores: vec![
                StoreLink {
                    name: "Xbox Store".into(),
                    slug: "xbox-store".into(),
                    url: "https://xbox.example".into(),
                },
                StoreLink {
                    name: "Steam".into(),
                    slug: "steam".into(),
                    url: "https://steam.example".into(),
                },
            ],
            alternative_names: vec![],
        }
    }

    fn bare(name: &str, slug: &str) -> CatalogGameRecord {
        CatalogGameRecord {
            name: name.into(),
            slug: slug.into(),
            ..CatalogGameRecord::default()
        }
    }

    #[test]
    fn test_full_block() {
        let text = ReplyFormatter::default().format(&half_life_2());
        let expected = "🎮 [Half-Life 2](https://rawg.io/games/half-life-2)\n\
                        Дата релиза: 16.11.2004\n\
                        Metacritic: [96](https://www.metacritic.com/game/pc/half-life-2)\n\
                        \n\
                        Разработчик: [Valve Software](https://rawg.io/developers/valve-software)\n\
                        Издатель: [Valve](https://rawg.io/publishers/valve)\n\
                        🛒 [Steam](https://steam.example) · [Xbox Store](https://xbox.example)";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_title_only_has_no_stray_lines() {
        let text = ReplyFormatter::default().format(&bare("Indie Thing", "indie-thing"));
        assert_eq!(text, "🎮 [Indie Thing](https://rawg.io/games/indie-thing)");
    }

    #[test]
    fn test_plural_labels() {
        let mut game = bare("Co-op", "co-op");
        game.developers = vec![company("Studio A"), company("Studio B")];
        game.publishers = vec![company("Pub A"), company("Pub B")];
        let text = ReplyFormatter::default().format(&game);
        assert!(text.contains("Разработчики: [Studio A]"));
        assert!(text.contains(", [Studio B]"));
        assert!(text.contains("Издатели: [Pub A]"));
    }

    #[test]
    fn test_publishers_without_developers_get_no_blank_line() {
        let mut game = bare("Solo", "solo");
        game.publishers = vec![company("Pub")];
        let text = ReplyFormatter::default().format(&game);
        assert_eq!(
            text,
            "🎮 [Solo](https://rawg.io/games/solo)\nИздатель: [Pub](https://rawg.io/publishers/pub)"
        );
    }

    #[test]
    fn test_zero_metacritic_is_omitted() {
        let mut game = bare("X", "x");
        game.metacritic_score = Some(0);
        assert!(!ReplyFormatter::default().format(&game).contains("Metacritic"));
    }

    #[test]
    fn test_metacritic_without_url_is_plain() {
        let mut game = bare("X", "x");
        game.metacritic_score = Some(80);
        assert!(ReplyFormatter::default()
            .format(&game)
            .ends_with("Metacritic: 80"));
    }

    #[test]
    fn test_format_is_deterministic() {
        let formatter = ReplyFormatter::default();
        assert_eq!(formatter.format(&half_life_2()), formatter.format(&half_life_2()));
    }

    #[test]
    fn test_custom_web_url() {
        let text = ReplyFormatter::new("https://mirror.example/").format(&bare("X", "x"));
        assert_eq!(text, "🎮 [X](https://mirror.example/games/x)");
    }

    #[test]
    fn test_compose_joins_with_divider() {
        let formatter = ReplyFormatter::default();
        let reply = formatter
            .compose(&[bare("A", "a"), bare("B", "b")])
            .unwrap();
        assert_eq!(
            reply,
            "🎮 [A](https://rawg.io/games/a)\n\n———\n\n🎮 [B](https://rawg.io/games/b)"
        );
    }

    #[test]
    fn test_compose_empty_is_none() {
        assert!(ReplyFormatter::default().compose(&[]).is_none());
    }

    #[test]
    fn test_display_date() {
        assert_eq!(display_date("2004-11-16"), "16.11.2004");
        assert_eq!(display_date("TBA"), "TBA");
    }
}
