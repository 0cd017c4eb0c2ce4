//! Command-line interface definitions for News Digest Hub.
//!
//! Every option can be given as a flag or through the environment.

use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::time::Duration;

/// A desktop Chrome identity; some publishers reject unidentified clients.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Command-line arguments for News Digest Hub.
///
/// # Examples
///
/// ```sh
/// # Serve the feed API
/// news_digest_hub serve --bind 0.0.0.0:9002
///
/// # Scrape two publishers once and print the digest
/// news_digest_hub fetch -s RHG -s McKinsey
///
/// # Same, but write ./json/<date>/digest.json
/// news_digest_hub fetch -s RHG -j ./json
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// User-Agent sent with every listing request
    #[arg(long, env = "NEWS_DIGEST_USER_AGENT", default_value = DEFAULT_USER_AGENT, global = true)]
    pub user_agent: String,

    /// Per-request timeout in seconds; 0 disables it
    #[arg(long, env = "NEWS_DIGEST_FETCH_TIMEOUT_SECS", default_value_t = 30, global = true)]
    pub fetch_timeout_secs: u64,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn fetch_timeout(&self) -> Option<Duration> {
        (self.fetch_timeout_secs > 0).then(|| Duration::from_secs(self.fetch_timeout_secs))
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the feed API over HTTP
    Serve {
        /// Address to listen on
        #[arg(short, long, env = "NEWS_DIGEST_BIND", default_value = "127.0.0.1:9002")]
        bind: SocketAddr,
    },
    /// Scrape sources once and emit the combined digest as JSON
    Fetch {
        /// Source to scrape (repeatable, case-insensitive)
        #[arg(short, long = "source", required = true)]
        sources: Vec<String>,

        /// Only keep items from these source labels (repeatable)
        #[arg(long)]
        show: Vec<String>,

        /// Write `<dir>/<YYYY-MM-DD>/digest.json` instead of printing
        #[arg(short, long)]
        json_output_dir: Option<String>,
    },
}
