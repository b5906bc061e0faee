//! Command line and config file handling.
//!
//! Values are layered: command line flags win over the RON config file, which
//! wins over built-in defaults. Without `--config`, `./livesearch.ron` is read
//! when present.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use livesearch_core::{DispatcherConfig, JsonStyle, ResponseOrdering};
use livesearch_engine::SearchSettings;
use livesearch_logging::{LogDestination, DEFAULT_LOG_FILE};
use log::LevelFilter;
use serde::{Deserialize, Serialize};

const DEFAULT_CONFIG_FILE: &str = "livesearch.ron";

#[derive(Debug, Parser)]
#[command(
    name = "livesearch",
    version,
    about = "Search-as-you-type against a JSON search endpoint"
)]
pub struct Cli {
    /// RON config file (default: ./livesearch.ron when present)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Base URL the search endpoint is resolved against
    #[arg(long, env = "LIVESEARCH_BASE_URL", value_name = "URL")]
    pub base_url: Option<String>,

    /// Endpoint path relative to the base URL
    #[arg(long, value_name = "PATH")]
    pub endpoint: Option<String>,

    /// Quiet period after the last keystroke before searching
    #[arg(long, value_name = "MS")]
    pub debounce_ms: Option<u64>,

    /// Which responses may replace the results
    #[arg(long, value_enum)]
    pub ordering: Option<Ordering>,

    /// Indent the JSON results
    #[arg(long)]
    pub pretty: bool,

    /// Log file (default: ./livesearch.log)
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
pub enum Ordering {
    LastArrival,
    LatestRequest,
}

impl From<Ordering> for ResponseOrdering {
    fn from(value: Ordering) -> Self {
        match value {
            Ordering::LastArrival => ResponseOrdering::LastArrival,
            Ordering::LatestRequest => ResponseOrdering::LatestRequest,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    base_url: Option<String>,
    endpoint: Option<String>,
    debounce_ms: Option<u64>,
    connect_timeout_ms: Option<u64>,
    request_timeout_ms: Option<u64>,
    max_bytes: Option<u64>,
    ordering: Option<Ordering>,
    pretty: Option<bool>,
    log_file: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub dispatcher: DispatcherConfig,
    pub search: SearchSettings,
    pub log_destination: LogDestination,
    pub log_level: LevelFilter,
}

pub fn resolve(cli: &Cli) -> Result<ResolvedConfig> {
    let file = match &cli.config {
        Some(path) => load_file(path)?,
        None => load_optional(Path::new(DEFAULT_CONFIG_FILE))?,
    };
    Ok(merge(cli, file))
}

fn load_optional(path: &Path) -> Result<FileConfig> {
    match fs::read_to_string(path) {
        Ok(text) => parse(path, &text),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(FileConfig::default()),
        Err(err) => Err(err).with_context(|| format!("failed to read config {}", path.display())),
    }
}

fn load_file(path: &Path) -> Result<FileConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    parse(path, &text)
}

fn parse(path: &Path, text: &str) -> Result<FileConfig> {
    ron::from_str(text).with_context(|| format!("failed to parse config {}", path.display()))
}

fn merge(cli: &Cli, file: FileConfig) -> ResolvedConfig {
    let defaults = DispatcherConfig::default();
    let dispatcher = DispatcherConfig {
        debounce: cli
            .debounce_ms
            .or(file.debounce_ms)
            .map_or(defaults.debounce, Duration::from_millis),
        ordering: cli
            .ordering
            .or(file.ordering)
            .map_or(defaults.ordering, ResponseOrdering::from),
        json_style: if cli.pretty || file.pretty.unwrap_or(false) {
            JsonStyle::Pretty
        } else {
            JsonStyle::Compact
        },
    };

    let base = SearchSettings::default();
    let search = SearchSettings {
        base_url: cli
            .base_url
            .clone()
            .or(file.base_url)
            .unwrap_or(base.base_url),
        endpoint: cli
            .endpoint
            .clone()
            .or(file.endpoint)
            .unwrap_or(base.endpoint),
        connect_timeout: file
            .connect_timeout_ms
            .map_or(base.connect_timeout, Duration::from_millis),
        request_timeout: file
            .request_timeout_ms
            .map_or(base.request_timeout, Duration::from_millis),
        max_bytes: file.max_bytes.unwrap_or(base.max_bytes),
    };

    let log_file = cli
        .log_file
        .clone()
        .or(file.log_file)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE));

    ResolvedConfig {
        dispatcher,
        search,
        log_destination: LogDestination::File(log_file),
        log_level: if cli.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["livesearch"];
        argv.extend_from_slice(args);
        Cli::parse_from(argv)
    }

    fn config_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults_without_flags_or_file() {
        let resolved = merge(&cli(&[]), FileConfig::default());

        assert_eq!(resolved.dispatcher, DispatcherConfig::default());
        assert_eq!(resolved.search.endpoint, "db/obj/search");
        assert_eq!(resolved.search.base_url, SearchSettings::default().base_url);
        assert_eq!(
            resolved.log_destination,
            LogDestination::File(PathBuf::from(DEFAULT_LOG_FILE))
        );
        assert_eq!(resolved.log_level, LevelFilter::Info);
    }

    #[test]
    fn file_values_override_defaults() {
        let file = config_file(
            r#"(
                base_url: Some("http://inventory.local/"),
                debounce_ms: Some(400),
                request_timeout_ms: Some(1500),
                ordering: Some(LatestRequest),
                pretty: Some(true),
            )"#,
        );
        let path = file.path().to_string_lossy().into_owned();
        let cli = cli(&["--config", &path]);

        let resolved = resolve(&cli).unwrap();

        assert_eq!(resolved.search.base_url, "http://inventory.local/");
        assert_eq!(resolved.search.request_timeout, Duration::from_millis(1500));
        assert_eq!(resolved.dispatcher.debounce, Duration::from_millis(400));
        assert_eq!(
            resolved.dispatcher.ordering,
            ResponseOrdering::LatestRequest
        );
        assert_eq!(resolved.dispatcher.json_style, JsonStyle::Pretty);
    }

    #[test]
    fn flags_override_file_values() {
        let file = FileConfig {
            base_url: Some("http://from-file/".to_string()),
            debounce_ms: Some(400),
            ordering: Some(Ordering::LatestRequest),
            ..FileConfig::default()
        };
        let cli = cli(&[
            "--base-url",
            "http://from-cli/",
            "--debounce-ms",
            "100",
            "--ordering",
            "last-arrival",
            "-v",
        ]);

        let resolved = merge(&cli, file);

        assert_eq!(resolved.search.base_url, "http://from-cli/");
        assert_eq!(resolved.dispatcher.debounce, Duration::from_millis(100));
        assert_eq!(resolved.dispatcher.ordering, ResponseOrdering::LastArrival);
        assert_eq!(resolved.log_level, LevelFilter::Debug);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let cli = cli(&["--config", "/definitely/not/here/livesearch.ron"]);
        let err = resolve(&cli).unwrap_err();
        assert!(err.to_string().contains("failed to read config"));
    }

    #[test]
    fn missing_default_file_is_fine() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_optional(&dir.path().join(DEFAULT_CONFIG_FILE)).unwrap();
        assert!(config.base_url.is_none());
    }

    #[test]
    fn unknown_field_is_rejected() {
        let file = config_file("(colour: Some(\"red\"))");
        let err = load_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("failed to parse config"));
    }
}
