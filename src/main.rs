use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use gamebot::catalog::client::RawgClient;
use gamebot::catalog::resolver::{Resolver, RetryPolicy};
use gamebot::config::Config;
use gamebot::db::AuditSink;
use gamebot::dispatch::dtf::DtfClient;
use gamebot::pipeline::{CommentPipeline, PipelineSettings, DEFAULT_FANOUT, MAX_RESULTS};
use gamebot::reply::ReplyFormatter;

/// Gamebot: replies to DTF comments that mention [games].
///
/// Comments arrive by webhook; every [bracketed] title is looked up on RAWG
/// and the bot answers with release date, Metacritic, studios and stores.
#[derive(Parser)]
#[command(name = "gamebot", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the audit database
    Init,

    /// Run the webhook server and comment workers
    Serve {
        /// Port to listen on (default: 8080)
        #[arg(long, default_value = "8080")]
        port: u16,

        /// Address to bind (default: 0.0.0.0)
        #[arg(long, default_value = "0.0.0.0")]
        bind: String,

        /// Comments processed in parallel (default: 4)
        #[arg(long, default_value = "4")]
        workers: usize,

        /// Catalog lookups in parallel per comment (default: 3)
        #[arg(long, default_value = "3")]
        fanout: usize,
    },

    /// Dry run: show the reply the bot would post for some text
    Lookup {
        /// Comment text, e.g. "лучше чем [Hollow Knight]?"
        text: String,
    },

    /// Show recently processed comments
    Audit {
        /// Number of records to show (default: 20)
        #[arg(long, default_value = "20")]
        limit: u32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("gamebot=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init => {
            info!("Initializing Gamebot database...");
            let config = Config::load()?;
            let audit = gamebot::db::open_audit_log(&config.db_path)?;
            let table_count = audit.table_count().await?;
            println!("Database initialized at: {}", config.db_path);
            println!("Tables created: {table_count}");
            println!("\nGamebot is ready. Next step: set up your .env file");
            println!("  (RAWG_API_KEY, DTF_DEVICE_TOKEN, DTF_DEVICE_POSSESSION_TOKEN,");
            println!("   WEBHOOK_SECRET, BOT_AUTHOR_ID)");
            println!("\nThen run: cargo run -- serve");
        }

        Commands::Serve {
            port,
            bind,
            workers,
            fanout,
        } => {
            let config = Config::load()?;
            config.require_server()?;

            let audit = gamebot::db::open_audit_log(&config.db_path)?;
            let catalog = RawgClient::new(&config.catalog_api_url, &config.rawg_api_key)?;
            let resolver = Resolver::new(Arc::new(catalog), RetryPolicy::default());
            let poster = DtfClient::new(
                &config.comment_api_url,
                &config.dtf_device_token,
                &config.dtf_possession_token,
            )?;
            let reporter = gamebot::report::reporter_from_config(&config)?;

            if let Some(ids) = &config.allowed_post_ids {
                info!(posts = ids.len(), "Replies limited to allowlisted posts");
            }

            let pipeline = CommentPipeline::new(
                resolver,
                ReplyFormatter::new(&config.catalog_web_url),
                Arc::new(poster),
                audit.clone(),
                reporter.clone(),
                PipelineSettings::from_config(&config, fanout),
            );

            let (queue, pool) =
                gamebot::scheduler::start(Arc::new(pipeline), reporter, workers);

            let state = gamebot::web::AppState {
                queue,
                status: pool.status(),
                audit,
                webhook_secret: Arc::from(config.webhook_secret.as_str()),
            };
            gamebot::web::run_server(state, port, &bind).await?;

            // The server's queue handle is gone; finish what is already queued
            pool.join().await;
            println!("{}", "Gamebot stopped.".dimmed());
        }

        Commands::Lookup { text } => {
            let config = Config::load()?;
            config.require_catalog()?;

            let catalog = RawgClient::new(&config.catalog_api_url, &config.rawg_api_key)?;
            let resolver = Resolver::new(Arc::new(catalog), RetryPolicy::default());
            let formatter = ReplyFormatter::new(&config.catalog_web_url);

            let references = gamebot::extract::extract_references(&text);

            let spinner = ProgressBar::new_spinner();
            spinner.set_style(
                ProgressStyle::default_spinner()
                    .template("  {spinner} {msg}")
                    .expect("valid template"),
            );
            spinner.set_message(format!("Looking up {} references on RAWG...", references.len()));
            spinner.enable_steady_tick(Duration::from_millis(120));

            let resolved = gamebot::pipeline::resolve_unique(
                &resolver,
                &references,
                MAX_RESULTS,
                DEFAULT_FANOUT,
            )
            .await;
            spinner.finish_and_clear();

            let reply = formatter.compose(&resolved.games);
            gamebot::output::terminal::display_lookup(&references, &resolved, reply.as_deref());
        }

        Commands::Audit { limit } => {
            let config = Config::load()?;
            let audit = gamebot::db::open_existing_audit_log(&config.db_path)?;

            let entries = audit.recent(limit).await?;
            let total = audit.count().await?;
            gamebot::output::terminal::display_audit_entries(&entries);
            println!("{}", format!("{total} comments processed in total").dimmed());
        }
    }

    Ok(())
}
