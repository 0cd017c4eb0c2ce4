//! # News Digest Hub
//!
//! Scrapes the public listing pages of a small set of research publishers,
//! normalizes every entry into a uniform [`models::NewsItem`], and serves the
//! results to a browser feed with client-side source filtering.
//!
//! ## Usage
//!
//! ```sh
//! news_digest_hub serve --bind 127.0.0.1:9002
//! news_digest_hub fetch -s RHG -s McKinsey -j ./json
//! ```
//!
//! ## Architecture
//!
//! Data flows one way, with no state retained between requests:
//! 1. **Dispatch**: a source name resolves to a scraper profile, a placeholder, or nothing
//! 2. **Fetch**: one GET of the publisher's listing page
//! 3. **Extract**: ordered selector strategies pull fields from each item card
//! 4. **Normalize**: absolute URLs, ISO-8601 dates, incomplete cards dropped
//! 5. **Serve**: JSON over HTTP, or a dated snapshot file

use chrono::Local;
use clap::Parser;
use std::error::Error;
use std::sync::Arc;
use tracing::{debug, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod aggregate;
mod cli;
mod dispatch;
mod errors;
mod extract;
mod models;
mod normalize;
mod outputs;
mod scrapers;
mod server;
mod utils;

use cli::{Cli, Command};
use dispatch::Dispatcher;
use scrapers::HttpFetcher;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("news_digest_hub starting up");

    let args = Cli::parse();
    debug!(?args.command, timeout = ?args.fetch_timeout(), "Parsed CLI arguments");

    let fetcher = HttpFetcher::new(&args.user_agent, args.fetch_timeout())?;
    let dispatcher = Dispatcher::new(Arc::new(fetcher));

    match args.command {
        Command::Serve { bind } => {
            server::serve(bind, dispatcher).await?;
        }
        Command::Fetch {
            sources,
            show,
            json_output_dir,
        } => {
            let mut digest = aggregate::aggregate(&dispatcher, &sources).await;
            if !show.is_empty() {
                digest.items = aggregate::filter_by_sources(&digest.items, &show);
            }
            match json_output_dir {
                Some(dir) => {
                    let path =
                        outputs::json::write_digest(&digest, &dir, Local::now().date_naive())
                            .await?;
                    info!(path = %path.display(), "Digest written");
                }
                None => println!("{}", serde_json::to_string_pretty(&digest)?),
            }
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );
    Ok(())
}
