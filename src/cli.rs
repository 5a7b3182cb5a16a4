//! Command-line interface parsing for raise-datasets
//!
//! This module handles parsing of CLI arguments using clap. The listing
//! parameters are kept as raw strings so that they go through the same
//! permissive normalization as web requests.

use std::time::Duration;

use clap::{Parser, ValueEnum};
use tracing::Level;

use crate::api::DatasetParams;
use crate::config::{ServiceConfig, MARKETPLACE_ENDPOINT};

/// How the result page is printed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// The boundary's JSON body
    #[default]
    Json,
    /// Human-readable cards with a pager line
    Text,
}

/// List datasets from the RAISE marketplace
#[derive(Parser, Debug)]
#[command(name = "raise-datasets")]
#[command(about = "Search and page through the RAISE dataset marketplace")]
#[command(version)]
pub struct Cli {
    /// Free-text filter; empty lists everything
    #[arg(long, short, default_value = "")]
    pub search: String,

    /// Page number, starting at 1
    #[arg(long, short, default_value = "1", allow_hyphen_values = true)]
    pub page: String,

    /// Datasets per page (1-50)
    #[arg(long, default_value = "10", allow_hyphen_values = true)]
    pub per_page: String,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Marketplace listing endpoint
    #[arg(long, env = "RAISE_DATASETS_ENDPOINT", default_value = MARKETPLACE_ENDPOINT)]
    pub endpoint: String,

    /// Upstream timeout in seconds
    #[arg(long, env = "RAISE_DATASETS_TIMEOUT_SECS", default_value_t = 15)]
    pub timeout_secs: u64,

    /// Show debug logs
    #[arg(long, short, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only show errors
    #[arg(long, short)]
    pub quiet: bool,
}

impl Cli {
    /// Service configuration derived from the flags
    pub fn service_config(&self) -> ServiceConfig {
        ServiceConfig::default()
            .with_endpoint(self.endpoint.clone())
            .with_timeout(Duration::from_secs(self.timeout_secs))
    }

    /// Listing parameters as the boundary receives them
    pub fn params(&self) -> DatasetParams {
        DatasetParams {
            search: Some(self.search.clone()),
            page: Some(self.page.clone()),
            per_page: Some(self.per_page.clone()),
        }
    }

    /// Log level selected by `--verbose`/`--quiet`
    pub fn log_level(&self) -> Level {
        if self.verbose {
            Level::DEBUG
        } else if self.quiet {
            Level::ERROR
        } else {
            Level::WARN
        }
    }
}
