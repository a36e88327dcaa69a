use std::collections::HashSet;
use std::env;

use anyhow::{Context, Result};

/// Default RAWG REST API root.
pub const DEFAULT_CATALOG_API_URL: &str = "https://api.rawg.io/api";

/// Default public RAWG site, used when building hyperlinks in replies.
pub const DEFAULT_CATALOG_WEB_URL: &str = "https://rawg.io";

/// Default DTF API root.
pub const DEFAULT_COMMENT_API_URL: &str = "https://api.dtf.ru/v1.6";

/// Central configuration loaded from environment variables.
///
/// All secrets come from env vars (never hardcoded). The .env file
/// is loaded automatically at startup via dotenvy.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// RAWG API key (RAWG_API_KEY).
    pub rawg_api_key: String,
    pub catalog_api_url: String,
    /// Base URL used for game/developer/publisher links in replies.
    pub catalog_web_url: String,
    /// DTF device token (DTF_DEVICE_TOKEN).
    pub dtf_device_token: String,
    /// DTF device possession token (DTF_DEVICE_POSSESSION_TOKEN).
    pub dtf_possession_token: String,
    pub comment_api_url: String,
    /// Shared secret expected in the `?secret=` query of the webhook.
    pub webhook_secret: String,
    /// The bot's own DTF user id. Comments by this id are never answered.
    pub bot_author_id: Option<i64>,
    /// Optional endpoint that receives JSON failure reports.
    pub error_report_url: Option<String>,
    /// When set, replies are only posted under these posts.
    pub allowed_post_ids: Option<HashSet<i64>>,
    pub db_path: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Nothing is validated here beyond number parsing. Callers use the
    /// `require_*` helpers for the subcommand they are about to run.
    pub fn load() -> Result<Self> {
        let bot_author_id = match env::var("BOT_AUTHOR_ID") {
            Ok(raw) if !raw.trim().is_empty() => Some(
                raw.trim()
                    .parse::<i64>()
                    .with_context(|| format!("BOT_AUTHOR_ID must be an integer, got {raw:?}"))?,
            ),
            _ => None,
        };

        let allowed_post_ids = match env::var("ALLOWED_POST_IDS") {
            Ok(raw) if !raw.trim().is_empty() => Some(parse_id_list(&raw)?),
            _ => None,
        };

        Ok(Self {
            rawg_api_key: env::var("RAWG_API_KEY").unwrap_or_default(),
            catalog_api_url: env::var("CATALOG_API_URL")
                .unwrap_or_else(|_| DEFAULT_CATALOG_API_URL.to_string()),
            catalog_web_url: env::var("CATALOG_WEB_URL")
                .unwrap_or_else(|_| DEFAULT_CATALOG_WEB_URL.to_string()),
            dtf_device_token: env::var("DTF_DEVICE_TOKEN").unwrap_or_default(),
            dtf_possession_token: env::var("DTF_DEVICE_POSSESSION_TOKEN").unwrap_or_default(),
            comment_api_url: env::var("COMMENT_API_URL")
                .unwrap_or_else(|_| DEFAULT_COMMENT_API_URL.to_string()),
            webhook_secret: env::var("WEBHOOK_SECRET").unwrap_or_default(),
            bot_author_id,
            error_report_url: env::var("ERROR_REPORT_URL")
                .ok()
                .filter(|url| !url.trim().is_empty()),
            allowed_post_ids,
            db_path: env::var("GAMEBOT_DB_PATH").unwrap_or_else(|_| "./gamebot.db".to_string()),
        })
    }

    /// Check that the catalog API key is configured.
    /// Call this before any operation that queries RAWG.
    pub fn require_catalog(&self) -> Result<()> {
        if self.rawg_api_key.is_empty() {
            anyhow::bail!(
                "RAWG_API_KEY not set. Add it to your .env file.\n\
                 Get a key at https://rawg.io/apidocs"
            );
        }
        Ok(())
    }

    /// Check everything the webhook server needs at startup.
    pub fn require_server(&self) -> Result<()> {
        self.require_catalog()?;
        if self.dtf_device_token.is_empty() || self.dtf_possession_token.is_empty() {
            anyhow::bail!(
                "DTF_DEVICE_TOKEN and DTF_DEVICE_POSSESSION_TOKEN must both be set.\n\
                 They are required to post replies."
            );
        }
        if self.webhook_secret.is_empty() {
            anyhow::bail!("WEBHOOK_SECRET not set. The webhook would accept anyone.");
        }
        if self.bot_author_id.is_none() {
            anyhow::bail!(
                "BOT_AUTHOR_ID not set. Without it the bot would answer its own replies."
            );
        }
        Ok(())
    }
}

/// Parse a comma-separated list of integer ids, ignoring blanks.
fn parse_id_list(raw: &str) -> Result<HashSet<i64>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<i64>()
                .with_context(|| format!("ALLOWED_POST_IDS contains a non-integer: {s:?}"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server_ready() -> Config {
        Config {
            rawg_api_key: "key".into(),
            dtf_device_token: "device".into(),
            dtf_possession_token: "possession".into(),
            webhook_secret: "s3cret".into(),
            bot_author_id: Some(128204),
            ..Config::default()
        }
    }

    #[test]
    fn test_parse_id_list() {
        let ids = parse_id_list("47384, 12 ,,7").unwrap();
        assert_eq!(ids.len(), 3);
        assert!(ids.contains(&47384));
        assert!(ids.contains(&12));
        assert!(ids.contains(&7));
    }

    #[test]
    fn test_parse_id_list_rejects_garbage() {
        assert!(parse_id_list("1,two,3").is_err());
    }

    #[test]
    fn test_require_server_accepts_complete_config() {
        assert!(server_ready().require_server().is_ok());
    }

    #[test]
    fn test_require_server_needs_bot_id() {
        let config = Config {
            bot_author_id: None,
            ..server_ready()
        };
        assert!(config.require_server().is_err());
    }

    #[test]
    fn test_require_catalog_needs_key() {
        assert!(Config::default().require_catalog().is_err());
    }
}
