//! Command-line interface parsing for the GIDEON client
//!
//! This module handles parsing of CLI arguments using clap and turns them into
//! a `ClientConfig` for the binary.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::cache::CacheConfig;
use crate::config::{ClientConfig, API_KEY_ENV};
use crate::diseases::DiseaseFilter;

/// File name of the persisted cache inside `--cache-dir`
const CACHE_FILE_NAME: &str = "responses.json";

/// Error types for CLI argument parsing
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CliError {
    /// A `--param` value is not of the form `key=value`
    #[error("Invalid parameter: '{0}'. Expected key=value")]
    InvalidParam(String),
}

/// GIDEON API client - query infectious disease data with local caching
#[derive(Parser, Debug)]
#[command(name = "gideon")]
#[command(about = "Cached access to the GIDEON infectious disease API")]
#[command(version)]
pub struct Cli {
    /// GIDEON API key
    #[arg(long, env = API_KEY_ENV, hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// Directory holding the persisted response cache
    #[arg(long, value_name = "DIR", global = true)]
    pub cache_dir: Option<PathBuf>,

    /// Keep the response cache in memory only
    #[arg(long, global = true, conflicts_with = "cache_dir")]
    pub no_cache_file: bool,

    /// Minimum delay between API calls in milliseconds
    #[arg(long, value_name = "MS", default_value_t = 500, global = true)]
    pub delay_ms: u64,

    /// Print debug logs to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Query an API path, using the cache when possible
    Query {
        /// API path as listed in the API documentation, e.g. /diseases
        path: String,
        #[command(flatten)]
        params: ParamArgs,
        /// Skip the cache and always call the API
        #[arg(long)]
        force_online: bool,
        /// Maximum age in hours of a usable cached response
        #[arg(long, value_name = "HOURS", default_value_t = 24)]
        max_age_hours: u64,
        /// Print the JSON response instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Call an API path online and print the raw status and body
    Raw {
        path: String,
        #[command(flatten)]
        params: ParamArgs,
    },
    /// Print the API endpoint for a category
    Endpoint { category: String },
    /// Look up the GIDEON code of an item by name
    Lookup { category: String, name: String },
    /// Outbreaks reported in a year, optionally for one country
    Outbreaks {
        #[arg(long)]
        year: i32,
        #[arg(long, value_name = "COUNTRY_CODE")]
        country: Option<String>,
    },
    /// Latest outbreak of every disease in a country
    LatestOutbreaks { country: String },
    /// Countries that have reported outbreaks of a disease
    DiseaseOutbreaks { disease: i64 },
    /// Countries where a disease is endemic
    EndemicCountries { disease: i64 },
    /// Diseases endemic to a country
    EndemicDiseases { country: String },
    /// Diseases matching fingerprint attributes
    FilterDiseases(FilterArgs),
    /// Manage the local response cache
    Cache {
        #[command(subcommand)]
        action: CacheCommand,
    },
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum CacheCommand {
    /// Remove cached responses older than the given age
    Sweep {
        #[arg(long, value_name = "HOURS")]
        hours: Option<u64>,
    },
    /// Remove every cached response
    Clear,
    /// Print the location of the cache file
    Path,
}

#[derive(Args, Debug, Default)]
pub struct ParamArgs {
    /// URL parameter as key=value (repeatable)
    #[arg(short = 'p', long = "param", value_name = "KEY=VALUE", value_parser = parse_param)]
    pub params: Vec<(String, String)>,
}

#[derive(Args, Debug, Default)]
pub struct FilterArgs {
    #[arg(long)]
    pub agent: Option<i64>,
    #[arg(long)]
    pub vector: Option<String>,
    #[arg(long)]
    pub vehicle: Option<String>,
    #[arg(long)]
    pub reservoir: Option<String>,
    #[arg(long)]
    pub country: Option<String>,
}

impl From<FilterArgs> for DiseaseFilter {
    fn from(args: FilterArgs) -> Self {
        DiseaseFilter {
            agent: args.agent,
            vector: args.vector,
            vehicle: args.vehicle,
            reservoir: args.reservoir,
            country: args.country,
        }
    }
}

/// Parses a `key=value` argument
///
/// The value may itself contain `=`; the key must be non-empty.
pub fn parse_param(s: &str) -> Result<(String, String), CliError> {
    match s.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(CliError::InvalidParam(s.to_string())),
    }
}

impl Cli {
    /// Builds the client configuration from the parsed arguments
    pub fn client_config(&self) -> ClientConfig {
        let cache = if self.no_cache_file {
            CacheConfig::in_memory()
        } else if let Some(dir) = &self.cache_dir {
            CacheConfig::with_file(dir.join(CACHE_FILE_NAME))
        } else {
            CacheConfig::default()
        };

        let pacing = (self.delay_ms > 0).then(|| Duration::from_millis(self.delay_ms));

        ClientConfig {
            api_key: self.api_key.clone(),
            ..ClientConfig::default()
        }
        .with_pacing(pacing)
        .with_cache(cache)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_param_splits_on_first_equals() {
        assert_eq!(
            parse_param("where=a=b"),
            Ok(("where".to_string(), "a=b".to_string()))
        );
    }

    #[test]
    fn test_parse_param_allows_empty_value() {
        assert_eq!(parse_param("year="), Ok(("year".to_string(), String::new())));
    }

    #[test]
    fn test_parse_param_rejects_missing_equals() {
        assert_eq!(
            parse_param("year"),
            Err(CliError::InvalidParam("year".to_string()))
        );
    }

    #[test]
    fn test_parse_param_rejects_empty_key() {
        assert!(parse_param("=2020").is_err());
    }

    #[test]
    fn test_zero_delay_disables_pacing() {
        let cli = Cli::parse_from(["gideon", "--delay-ms", "0", "endpoint", "drugs"]);
        assert!(cli.client_config().pacing_interval.is_none());
    }

    #[test]
    fn test_cache_dir_sets_cache_file() {
        let cli = Cli::parse_from(["gideon", "--cache-dir", "/tmp/g", "endpoint", "drugs"]);
        assert_eq!(
            cli.client_config().cache.persistence,
            Some(PathBuf::from("/tmp/g/responses.json"))
        );
    }

    #[test]
    fn test_filter_args_convert() {
        let filter: DiseaseFilter = FilterArgs {
            agent: Some(3),
            ..Default::default()
        }
        .into();
        assert_eq!(filter.agent, Some(3));
        assert!(filter.vector.is_none());
    }
}
