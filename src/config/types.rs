//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::constants::{DEFAULT_CACHE_PATH, DEFAULT_TIMEOUT_SECS, MAX_REDIRECT_HOPS};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Command-line options.
///
/// Exactly one of `--url` or `--search` selects the action; with neither,
/// the binary prints its help text.
#[derive(Debug, Parser)]
#[command(
    name = "rawfetch",
    about = "Fetches a page over raw HTTP/1.1-over-TLS, or searches the web, caching every result."
)]
pub struct Opt {
    /// Make a request to URL and print the classified response
    #[arg(short = 'u', long = "url", value_name = "URL", conflicts_with = "search")]
    pub url: Option<String>,

    /// Search for TERM and print the top 10 result links
    #[arg(short = 's', long = "search", value_name = "TERM", num_args = 1..)]
    pub search: Option<Vec<String>>,

    /// Cache file (JSON)
    #[arg(long, value_parser, default_value = DEFAULT_CACHE_PATH)]
    pub cache_file: PathBuf,

    /// Time allowed for the TLS exchange after connecting, in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_seconds: u64,

    /// Maximum number of redirects to follow
    #[arg(long, default_value_t = MAX_REDIRECT_HOPS)]
    pub max_redirects: u32,

    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Warn)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,
}

/// Library configuration (no CLI dependencies).
///
/// # Examples
///
/// ```no_run
/// use rawfetch::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     cache_path: PathBuf::from("/tmp/rawfetch.json"),
///     timeout_seconds: 5,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Cache file path
    pub cache_path: PathBuf,

    /// Time allowed for the TLS exchange after connecting, in seconds
    pub timeout_seconds: u64,

    /// Maximum redirect hops
    pub max_redirects: u32,

    /// Log level
    pub log_level: LogLevel,

    /// Log format
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_path: PathBuf::from(DEFAULT_CACHE_PATH),
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
            max_redirects: MAX_REDIRECT_HOPS,
            log_level: LogLevel::Warn,
            log_format: LogFormat::Plain,
        }
    }
}

impl From<&Opt> for Config {
    fn from(opt: &Opt) -> Self {
        Self {
            cache_path: opt.cache_file.clone(),
            timeout_seconds: opt.timeout_seconds,
            max_redirects: opt.max_redirects,
            log_level: opt.log_level.clone(),
            log_format: opt.log_format.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(
            log::LevelFilter::from(LogLevel::Error),
            log::LevelFilter::Error
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Warn),
            log::LevelFilter::Warn
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Info),
            log::LevelFilter::Info
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Debug),
            log::LevelFilter::Debug
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Trace),
            log::LevelFilter::Trace
        );
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.timeout_seconds, 10);
        assert_eq!(config.max_redirects, 5);
        assert_eq!(config.cache_path, PathBuf::from("./rawfetch_cache.json"));
    }

    #[test]
    fn test_opt_url_flag() {
        let opt = Opt::try_parse_from(["rawfetch", "-u", "https://example.com/a"])
            .expect("Should parse -u");
        assert_eq!(opt.url.as_deref(), Some("https://example.com/a"));
        assert!(opt.search.is_none());
    }

    #[test]
    fn test_opt_search_collects_all_words() {
        let opt = Opt::try_parse_from(["rawfetch", "-s", "rust", "tls", "client"])
            .expect("Should parse -s with several words");
        assert_eq!(
            opt.search,
            Some(vec![
                "rust".to_string(),
                "tls".to_string(),
                "client".to_string()
            ])
        );
    }

    #[test]
    fn test_opt_url_and_search_conflict() {
        let result = Opt::try_parse_from(["rawfetch", "-u", "example.com", "-s", "cats"]);
        assert!(result.is_err(), "-u and -s must not be combined");
    }

    #[test]
    fn test_config_from_opt() {
        let opt = Opt::try_parse_from([
            "rawfetch",
            "-u",
            "example.com",
            "--cache-file",
            "/tmp/c.json",
            "--timeout-seconds",
            "3",
            "--max-redirects",
            "2",
        ])
        .expect("Should parse options");
        let config = Config::from(&opt);
        assert_eq!(config.cache_path, PathBuf::from("/tmp/c.json"));
        assert_eq!(config.timeout_seconds, 3);
        assert_eq!(config.max_redirects, 2);
    }
}
