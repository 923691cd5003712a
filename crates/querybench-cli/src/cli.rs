//! querybench - offline completion, plan analysis and formatting
//!
//! Runs the workbench engine against snapshot files instead of a live
//! server: schema snapshots feed completion, plan files feed analysis.

mod commands;
mod logging;
mod output;
mod snapshot;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use querybench_workbench::WorkbenchConfig;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "querybench", version, about = "Query workbench engine, offline")]
struct Cli {
    /// Path to config.toml (defaults to the platform config directory)
    #[arg(long, global = true, env = "QUERYBENCH_CONFIG")]
    config: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset (overrides the preset's filter)
    #[arg(long, global = true, env = "QUERYBENCH_LOG")]
    log_level: Option<String>,

    /// Verbose console logging with spans and source locations
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    /// Also write JSON logs to the log directory
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List completion candidates at a cursor position
    Complete(CompleteArgs),
    /// Analyze EXPLAIN rows and suggest indexes
    Analyze(AnalyzeArgs),
    /// Pretty-print SQL
    Format(FormatArgs),
}

#[derive(Args, Debug)]
pub struct CompleteArgs {
    /// Schema snapshot JSON file
    #[arg(long)]
    pub schema: PathBuf,
    /// Database to bind; defaults to the only database in the snapshot
    #[arg(long)]
    pub database: Option<String>,
    /// SQL text, or @path to read it from a file
    #[arg(long)]
    pub sql: String,
    /// 0-based cursor line (defaults to the last line)
    #[arg(long)]
    pub line: Option<usize>,
    /// 0-based cursor column (defaults to the end of the line)
    #[arg(long)]
    pub column: Option<usize>,
    /// Print JSON instead of a table
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// JSON array of EXPLAIN rows
    #[arg(long)]
    pub plan: PathBuf,
    /// SQL text, or @path to read it from a file
    #[arg(long)]
    pub sql: String,
    /// Optional schema snapshot used to bind a database
    #[arg(long)]
    pub schema: Option<PathBuf>,
    #[arg(long)]
    pub database: Option<String>,
    /// Print JSON instead of tables
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct FormatArgs {
    /// SQL text, or @path to read it from a file
    #[arg(long)]
    pub sql: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    logging::init(logging::LoggingConfig::from_flags(
        cli.verbose,
        cli.json_logs,
        cli.log_level.clone(),
    ))?;

    let config = load_config(cli.config.as_deref())?;
    tracing::debug!(?config, "resolved configuration");

    match cli.command {
        Command::Complete(args) => commands::complete(config, args).await,
        Command::Analyze(args) => commands::analyze(config, args).await,
        Command::Format(args) => commands::format(config, args),
    }
}

fn load_config(explicit: Option<&std::path::Path>) -> anyhow::Result<WorkbenchConfig> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match WorkbenchConfig::default_path() {
            Some(path) => path,
            None => return Ok(WorkbenchConfig::default()),
        },
    };
    WorkbenchConfig::load(&path).with_context(|| format!("Failed to load config: {}", path.display()))
}
