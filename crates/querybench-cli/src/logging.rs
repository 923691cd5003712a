//! Logging setup for the querybench CLI
//!
//! Console output goes to stderr so command output on stdout stays clean.
//! JSON logs, when enabled, are written to a daily rolling file.

use std::path::PathBuf;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Directory for JSON log files
    pub log_dir: PathBuf,
    pub enable_json_logs: bool,
    pub enable_console_logs: bool,
    /// Include file/line information in console logs
    pub include_location: bool,
    /// Log span open/close events
    pub enable_spans: bool,
    /// Filter used when `RUST_LOG` is not set
    pub default_filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_dir: log_directory(),
            enable_json_logs: false,
            enable_console_logs: true,
            include_location: cfg!(debug_assertions),
            enable_spans: false,
            default_filter: "warn".to_string(),
        }
    }
}

impl LoggingConfig {
    /// Quiet console, JSON logs on disk
    pub fn production() -> Self {
        Self {
            enable_json_logs: true,
            include_location: false,
            default_filter: "warn,querybench_workbench=info".to_string(),
            ..Self::default()
        }
    }

    /// Verbose console output
    pub fn development() -> Self {
        Self {
            include_location: true,
            enable_spans: true,
            default_filter: "info,querybench_workbench=debug,querybench_schema=debug,querybench_analyzer=debug"
                .to_string(),
            ..Self::default()
        }
    }

    /// Preset picked from the command-line flags. An explicit filter wins
    /// over the preset's own.
    pub fn from_flags(verbose: bool, json_logs: bool, filter: Option<String>) -> Self {
        let config = match (verbose, json_logs) {
            (true, json_logs) => Self::development().with_json_logs(json_logs),
            (false, true) => Self::production(),
            (false, false) => Self::default(),
        };
        match filter {
            Some(filter) => config.with_filter(filter),
            None => config,
        }
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.default_filter = filter.into();
        self
    }

    pub fn with_json_logs(mut self, enabled: bool) -> Self {
        self.enable_json_logs = enabled;
        self
    }
}

/// Install the global subscriber. Must be called at most once.
pub fn init(config: LoggingConfig) -> anyhow::Result<()> {
    // RUST_LOG takes precedence over the configured filter
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_filter));

    let span_events = if config.enable_spans {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let mut layers = Vec::new();

    if config.enable_console_logs {
        let console_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_span_events(span_events.clone())
            .with_ansi(true)
            .compact()
            .with_filter(env_filter.clone())
            .boxed();
        layers.push(console_layer);
    }

    if config.enable_json_logs {
        std::fs::create_dir_all(&config.log_dir)?;
        let file_appender = tracing_appender::rolling::daily(&config.log_dir, "querybench.log");
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        // The writer flushes on guard drop; keep it for the life of the process
        std::mem::forget(guard);

        let json_layer = fmt::layer()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_span_events(span_events)
            .with_ansi(false)
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_writer(non_blocking)
            .with_filter(env_filter)
            .boxed();
        layers.push(json_layer);
    }

    tracing_subscriber::registry().with(layers).try_init()?;

    tracing::debug!(
        log_dir = %config.log_dir.display(),
        json_enabled = config.enable_json_logs,
        console_enabled = config.enable_console_logs,
        "logging initialized"
    );
    Ok(())
}

/// `<data_local_dir>/querybench/logs`
pub fn log_directory() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("querybench")
        .join("logs")
}
