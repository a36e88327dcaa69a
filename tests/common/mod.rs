// Test doubles shared by the integration tests.
//
// Nothing here touches the network: the catalog is a fixed table, the
// poster records what it would have sent, the reporter records failures.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use gamebot::catalog::error::CatalogError;
use gamebot::catalog::models::{CatalogCandidate, CatalogGameRecord, Company, StoreLink};
use gamebot::catalog::resolver::{Resolver, RetryPolicy};
use gamebot::catalog::traits::GameCatalog;
use gamebot::db::{initialize_in_memory, SqliteAuditLog};
use gamebot::dispatch::{CommentPoster, PostedReply};
use gamebot::pipeline::{CommentPipeline, FailureContext, PipelineError, PipelineSettings};
use gamebot::reply::ReplyFormatter;
use gamebot::report::ErrorReporter;

pub const BOT_ID: i64 = 128204;

/// Catalog with a fixed set of games, keyed by lowercase search text.
#[derive(Default)]
pub struct TableCatalog {
    games: HashMap<String, CatalogGameRecord>,
    pub searches: Mutex<Vec<String>>,
}

impl TableCatalog {
    pub fn with(mut self, query: &str, record: CatalogGameRecord) -> Self {
        self.games.insert(query.to_lowercase(), record);
        self
    }

    pub fn search_count(&self) -> usize {
        self.searches.lock().unwrap().len()
    }
}

#[async_trait]
impl GameCatalog for TableCatalog {
    async fn search(&self, name: &str) -> Result<Option<CatalogCandidate>, CatalogError> {
        self.searches.lock().unwrap().push(name.to_string());
        Ok(self
            .games
            .get(&name.to_lowercase())
            .map(|g| CatalogCandidate {
                name: g.name.clone(),
                slug: g.slug.clone(),
            }))
    }

    async fn details(&self, slug: &str) -> Result<CatalogGameRecord, CatalogError> {
        self.games
            .values()
            .find(|g| g.slug == slug)
            .cloned()
            .ok_or_else(|| CatalogError::Decode(format!("unknown slug {slug}")))
    }
}

/// Records every reply instead of posting it.
#[derive(Default)]
pub struct RecordingPoster {
    pub replies: Mutex<Vec<(i64, i64, String)>>,
}

#[async_trait]
impl CommentPoster for RecordingPoster {
    async fn post_reply(
        &self,
        post_id: i64,
        comment_id: i64,
        text: &str,
    ) -> anyhow::Result<PostedReply> {
        let mut replies = self.replies.lock().unwrap();
        replies.push((post_id, comment_id, text.to_string()));
        Ok(PostedReply {
            id: 1000 + replies.len() as i64,
            text: text.to_string(),
        })
    }
}

#[derive(Default)]
pub struct RecordingReporter {
    pub failures: Mutex<Vec<(&'static str, FailureContext)>>,
}

#[async_trait]
impl ErrorReporter for RecordingReporter {
    async fn report(&self, err: &PipelineError, context: &FailureContext) {
        self.failures.lock().unwrap().push((err.kind(), *context));
    }
}

pub fn game(name: &str, slug: &str) -> CatalogGameRecord {
    CatalogGameRecord {
        name: name.to_string(),
        slug: slug.to_string(),
        ..CatalogGameRecord::default()
    }
}

pub fn half_life_2() -> CatalogGameRecord {
    CatalogGameRecord {
        name: "Half-Life 2".into(),
        slug: "half-life-2".into(),
        release_date: Some("2004-11-16".into()),
        metacritic_score: Some(96),
        metacritic_url: Some("https://www.metacritic.com/game/pc/half-life-2".into()),
        developers: vec![Company {
            name: "Valve Software".into(),
            slug: "valve-software".into(),
        }],
        publishers: vec![Company {
            name: "Valve".into(),
            slug: "valve".into(),
        }],
        stores: vec![StoreLink {
            name: "Steam".into(),
            slug: "steam".into(),
            url: "https://store.steampowered.com/app/220/".into(),
        }],
        alternative_names: vec!["HL2".into()],
    }
}

pub fn comment_payload(post_id: i64, comment_id: i64, author_id: i64, text: &str) -> Vec<u8> {
    serde_json::to_vec(&serde_json::json!({
        "type": "new_comment",
        "data": {
            "id": comment_id,
            "text": text,
            "creator": {"id": author_id},
            "content": {"id": post_id}
        }
    }))
    .unwrap()
}

/// A pipeline wired to fakes and an in-memory audit log.
pub struct Fixture {
    pub pipeline: Arc<CommentPipeline>,
    pub catalog: Arc<TableCatalog>,
    pub poster: Arc<RecordingPoster>,
    pub reporter: Arc<RecordingReporter>,
    pub audit: Arc<SqliteAuditLog>,
}

pub fn fixture(catalog: TableCatalog) -> Fixture {
    let catalog = Arc::new(catalog);
    let poster = Arc::new(RecordingPoster::default());
    let reporter = Arc::new(RecordingReporter::default());
    let audit = Arc::new(SqliteAuditLog::new(initialize_in_memory().unwrap()));

    let resolver = Resolver::new(
        catalog.clone(),
        RetryPolicy {
            max_attempts: 2,
            base_delay: Duration::from_millis(1),
        },
    );
    let pipeline = CommentPipeline::new(
        resolver,
        ReplyFormatter::default(),
        poster.clone(),
        audit.clone(),
        reporter.clone(),
        PipelineSettings {
            bot_author_id: Some(BOT_ID),
            ..PipelineSettings::default()
        },
    );

    Fixture {
        pipeline: Arc::new(pipeline),
        catalog,
        poster,
        reporter,
        audit,
    }
}
