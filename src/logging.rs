//! Structured logging setup.
//!
//! Every component logs through `tracing` with key/value fields
//! (`request_id`, `path`, `status`, `error`). This module installs the
//! subscriber: an [`EnvFilter`] plus a JSON or pretty fmt layer, optionally
//! written through a non-blocking `tracing-appender` worker.
//!
//! ## Environment Variables
//!
//! | Variable                          | Default | Meaning                         |
//! |-----------------------------------|---------|---------------------------------|
//! | `STRICTAPI_LOG_LEVEL`             | `info`  | trace/debug/info/warn/error     |
//! | `STRICTAPI_LOG_FORMAT`            | `json`  | `json` or `pretty`              |
//! | `STRICTAPI_LOG_ASYNC`             | `true`  | buffer output on a worker thread|
//! | `STRICTAPI_LOG_TARGET_FILTER`     | unset   | extra comma-separated directives|
//! | `STRICTAPI_LOG_INCLUDE_LOCATION`  | `false` | add file:line to each event     |
//!
//! `RUST_LOG`, when set, replaces the level-derived filter.

use anyhow::{Context, Result};
use std::env;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Log format: JSON for production, pretty-print for development
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl LogFormat {
    /// Anything other than `pretty` (case-insensitive) is JSON
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "pretty" => LogFormat::Pretty,
            _ => LogFormat::Json,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// trace/debug/info/warn/error
    pub log_level: String,
    pub format: LogFormat,
    /// Write through a non-blocking worker thread
    pub async_logging: bool,
    /// Extra filter directives, comma-separated (`strictapi::route=debug`)
    pub target_filter: Option<String>,
    /// Include file:line in each event
    pub include_location: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::default_prod()
    }
}

impl LogConfig {
    /// Reads the `STRICTAPI_LOG_*` environment variables, with defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env), reading variables through `lookup`.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let flag = |key: &str, default: bool| {
            lookup(key)
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(default)
        };
        Self {
            log_level: lookup("STRICTAPI_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            format: LogFormat::parse(
                &lookup("STRICTAPI_LOG_FORMAT").unwrap_or_else(|| "json".to_string()),
            ),
            async_logging: flag("STRICTAPI_LOG_ASYNC", true),
            target_filter: lookup("STRICTAPI_LOG_TARGET_FILTER"),
            include_location: flag("STRICTAPI_LOG_INCLUDE_LOCATION", false),
        }
    }

    /// Verbose, human-readable, synchronous
    #[must_use]
    pub fn default_dev() -> Self {
        Self {
            log_level: "debug".to_string(),
            format: LogFormat::Pretty,
            async_logging: false,
            target_filter: None,
            include_location: true,
        }
    }

    #[must_use]
    pub fn default_prod() -> Self {
        Self {
            log_level: "info".to_string(),
            format: LogFormat::Json,
            async_logging: true,
            target_filter: None,
            include_location: false,
        }
    }

    /// The configured level; unknown names fall back to `INFO`
    #[must_use]
    pub fn level(&self) -> Level {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    }

    /// Builds the filter: `RUST_LOG` or the configured level, quiet
    /// `may_minihttp` internals, then any extra target directives.
    ///
    /// Invalid extra directives are skipped and returned so the caller can
    /// report them once logging is up.
    pub fn env_filter(&self) -> (EnvFilter, Vec<String>) {
        let mut filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.level().as_str()));
        if let Ok(directive) = "may_minihttp::http_server=warn".parse() {
            filter = filter.add_directive(directive);
        }

        let mut rejected = Vec::new();
        if let Some(targets) = &self.target_filter {
            for raw in targets.split(',').map(str::trim).filter(|s| !s.is_empty()) {
                match raw.parse() {
                    Ok(directive) => filter = filter.add_directive(directive),
                    Err(_) => rejected.push(raw.to_string()),
                }
            }
        }
        (filter, rejected)
    }
}

/// Installs the global subscriber described by `config`.
///
/// With `async_logging` the returned guard owns the writer thread; keep it
/// alive until shutdown or buffered events are lost.
///
/// # Errors
///
/// Fails when a global subscriber is already installed.
pub fn init_logging_with_config(config: &LogConfig) -> Result<Option<WorkerGuard>> {
    let (filter, rejected) = config.env_filter();
    let location = config.include_location;

    let (fmt_layer, guard) = if config.async_logging {
        let (writer, guard) = tracing_appender::non_blocking(std::io::stdout());
        let layer = match config.format {
            LogFormat::Json => tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(true)
                .with_target(true)
                .with_thread_ids(true)
                .with_file(location)
                .with_line_number(location)
                .with_writer(writer)
                .boxed(),
            LogFormat::Pretty => tracing_subscriber::fmt::layer()
                .pretty()
                .with_target(true)
                .with_file(location)
                .with_line_number(location)
                .with_writer(writer)
                .boxed(),
        };
        (layer, Some(guard))
    } else {
        let layer = match config.format {
            LogFormat::Json => tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(true)
                .with_target(true)
                .with_thread_ids(true)
                .with_file(location)
                .with_line_number(location)
                .boxed(),
            LogFormat::Pretty => tracing_subscriber::fmt::layer()
                .pretty()
                .with_target(true)
                .with_file(location)
                .with_line_number(location)
                .boxed(),
        };
        (layer, None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .context("Failed to initialize logging")?;

    for directive in rejected {
        tracing::warn!(directive = %directive, "Ignoring invalid log filter directive");
    }
    tracing::debug!(
        level = %config.level(),
        format = ?config.format,
        async_logging = config.async_logging,
        "Logging initialized"
    );
    Ok(guard)
}
