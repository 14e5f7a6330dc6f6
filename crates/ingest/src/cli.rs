use clap::{value_parser, Parser};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;


pub const DEFAULT_LOG_FILTER: &str = "info";


#[derive(Parser, Debug)]
#[command(version, about = "Polls a TRON node for the latest block and stores it in SQLite", long_about = None)]
pub struct Cli {
    /// Base URL of the node HTTP API
    #[arg(
        long,
        env = "TRON_NODE_URL",
        value_name = "URL",
        default_value = "https://api.shasta.trongrid.io"
    )]
    pub node_url: Url,

    /// SQLite database file
    #[arg(long = "db", env = "TRON_INGEST_DB", value_name = "FILE", default_value = "blocks.db")]
    pub database: PathBuf,

    /// Interval between polls in seconds
    #[arg(
        long,
        env = "TRON_POLL_INTERVAL_SECS",
        value_name = "SECS",
        value_parser = value_parser!(u64).range(1..),
        default_value_t = 10
    )]
    pub poll_interval_secs: u64,

    /// Stop after this many polls
    #[arg(long, env = "TRON_INGEST_TICKS", value_name = "N")]
    pub ticks: Option<u64>,

    /// Log filter directives, `RUST_LOG` is used when not set
    #[arg(long, env = "TRON_INGEST_LOG", value_name = "FILTER")]
    pub log_filter: Option<String>,

    /// Whether the logs should be structured in JSON format
    #[arg(long)]
    pub json_log: bool,
}


impl Cli {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn log_filter(&self) -> String {
        self.log_filter.clone()
            .or_else(|| std::env::var("RUST_LOG").ok())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string())
    }
}
