//! Subscriber setup for the crate's `tracing` events.
//!
//! Capability queries emit `debug` events for negative answers and `trace`
//! events for routing decisions; workloads open a span per execution. This
//! module installs a global subscriber for binaries, tests and benchmarks.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: full filter directive, wins over everything else
//!   (e.g. "neonforge::support=debug")
//! - `NEONFORGE_LOG_LEVEL`: error, warn, info, debug or trace
//! - `NEONFORGE_LOG_FORMAT`: "human" or "json"
//! - `NEONFORGE_LOG_FILE`: also append JSON lines to this file

use std::path::{Path, PathBuf};
use std::str::FromStr;

use once_cell::sync::OnceCell;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

use crate::error::{ForgeResult, NeonForgeError};
use crate::internal_error;

/// Set once a subscriber has been installed by this module.
static TRACING_INITIALIZED: OnceCell<()> = OnceCell::new();

const LOG_LEVEL_ENV: &str = "NEONFORGE_LOG_LEVEL";
const LOG_FORMAT_ENV: &str = "NEONFORGE_LOG_FORMAT";
const LOG_FILE_ENV: &str = "NEONFORGE_LOG_FILE";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Error,
    /// Default: negative capability answers are `debug`, so they stay quiet
    #[default]
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }

    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl FromStr for LogLevel {
    type Err = NeonForgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            other => Err(NeonForgeError::InvalidConfiguration(format!(
                "unknown log level '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Human,
    Json,
}

impl FromStr for LogFormat {
    type Err = NeonForgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "human" | "pretty" => Ok(LogFormat::Human),
            "json" => Ok(LogFormat::Json),
            other => Err(NeonForgeError::InvalidConfiguration(format!(
                "unknown log format '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoggingConfig {
    pub level: LogLevel,
    pub format: LogFormat,
    /// Include source file and line in console output
    pub with_file_info: bool,
    /// Emit an event when a span closes (workload execution timings)
    pub with_span_events: bool,
    /// Append JSON lines to this file in addition to the console
    pub log_file: Option<PathBuf>,
}

impl LoggingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_file_info(mut self, with_file_info: bool) -> Self {
        self.with_file_info = with_file_info;
        self
    }

    pub fn with_span_events(mut self, with_span_events: bool) -> Self {
        self.with_span_events = with_span_events;
        self
    }

    pub fn with_log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_file = Some(path.into());
        self
    }

    /// Defaults overridden by the `NEONFORGE_LOG_*` variables. Unknown
    /// values are configuration errors.
    pub fn from_env() -> ForgeResult<Self> {
        let mut config = Self::new();
        if let Ok(level) = std::env::var(LOG_LEVEL_ENV) {
            config.level = level.parse()?;
        }
        if let Ok(format) = std::env::var(LOG_FORMAT_ENV) {
            config.format = format.parse()?;
        }
        if let Ok(file) = std::env::var(LOG_FILE_ENV) {
            config.log_file = Some(PathBuf::from(file));
        }
        Ok(config)
    }
}

/// Install a subscriber from the environment, ignoring bad values.
///
/// Idempotent; later calls are no-ops.
pub fn init_logging_default() {
    let config = LoggingConfig::from_env().unwrap_or_default();
    if let Err(e) = init_with_config(&config) {
        eprintln!("neonforge: logging not initialized: {}", e);
    }
}

/// Install a subscriber from the environment, reporting bad values.
pub fn init_logging_from_env() -> ForgeResult<()> {
    init_with_config(&LoggingConfig::from_env()?)
}

/// Install a subscriber for `config`. Idempotent; only the first call that
/// succeeds has any effect.
pub fn init_with_config(config: &LoggingConfig) -> ForgeResult<()> {
    TRACING_INITIALIZED.get_or_try_init(|| install(config)).map(|_| ())
}

pub fn is_initialized() -> bool {
    TRACING_INITIALIZED.get().is_some()
}

fn install(config: &LoggingConfig) -> ForgeResult<()> {
    let env_filter = build_env_filter(config.level)?;

    let console: Box<dyn Layer<Registry> + Send + Sync> = match config.format {
        LogFormat::Human => fmt::layer()
            .with_target(true)
            .with_file(config.with_file_info)
            .with_line_number(config.with_file_info)
            .with_span_events(span_events(config.with_span_events))
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_target(false)
            .with_file(config.with_file_info)
            .with_line_number(config.with_file_info)
            .with_span_events(span_events(config.with_span_events))
            .boxed(),
    };

    let file_layer = match &config.log_file {
        Some(path) => Some(
            fmt::layer()
                .json()
                .with_writer(open_log_file(path)?)
                .with_ansi(false)
                .with_file(true)
                .with_line_number(true)
                .with_span_events(span_events(config.with_span_events)),
        ),
        None => None,
    };

    tracing_subscriber::registry()
        .with(console)
        .with(file_layer)
        .with(env_filter)
        .try_init()
        .map_err(|e| internal_error!("failed to install tracing subscriber: {}", e))
}

fn span_events(enabled: bool) -> FmtSpan {
    if enabled {
        FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    }
}

fn open_log_file(path: &Path) -> ForgeResult<std::fs::File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            NeonForgeError::InvalidConfiguration(format!("cannot create log directory {}: {}", parent.display(), e))
        })?;
    }
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| NeonForgeError::InvalidConfiguration(format!("cannot open log file {}: {}", path.display(), e)))
}

/// `RUST_LOG` when set, otherwise `default_level` for every target.
fn build_env_filter(default_level: LogLevel) -> ForgeResult<EnvFilter> {
    match std::env::var("RUST_LOG") {
        Ok(directives) => EnvFilter::try_new(&directives)
            .map_err(|e| NeonForgeError::InvalidConfiguration(format!("invalid RUST_LOG '{}': {}", directives, e))),
        Err(_) => Ok(EnvFilter::new(default_level.as_filter_str())),
    }
}
