//! Subcommand implementations

use crate::output;
use crate::snapshot::{OfflineCollaborator, SchemaSnapshot};
use crate::{AnalyzeArgs, CompleteArgs, FormatArgs};
use anyhow::{Context, bail};
use querybench_workbench::{Collaborators, SqlFormatCollaborator, Workbench, WorkbenchConfig};
use std::sync::Arc;
use uuid::Uuid;

pub async fn complete(config: WorkbenchConfig, args: CompleteArgs) -> anyhow::Result<()> {
    let sql = read_sql(&args.sql)?;
    let snapshot = SchemaSnapshot::load(&args.schema)?;
    let database = args
        .database
        .or_else(|| snapshot.sole_database().map(str::to_string));

    let workbench = offline_workbench(config, OfflineCollaborator::new(snapshot));
    let tab = workbench.create_tab(Some(Uuid::new_v4()), database);
    workbench.update_content(tab, sql.as_str());
    workbench
        .refresh_tab_metadata(tab)
        .await
        .context("Failed to load schema snapshot into the metadata cache")?;

    let line = args.line.unwrap_or_else(|| last_line(&sql));
    let column = args.column.unwrap_or_else(|| line_length(&sql, line));
    let list = workbench.complete(tab, line, column);
    tracing::debug!(line, column, candidates = list.len(), "completion resolved");

    if args.json {
        println!("{}", serde_json::to_string_pretty(&list)?);
    } else {
        output::print_completions(&list);
    }
    Ok(())
}

pub async fn analyze(config: WorkbenchConfig, args: AnalyzeArgs) -> anyhow::Result<()> {
    let sql = read_sql(&args.sql)?;
    let plan = OfflineCollaborator::load_plan(&args.plan)?;
    let snapshot = match &args.schema {
        Some(path) => SchemaSnapshot::load(path)?,
        None => SchemaSnapshot::default(),
    };
    let database = args
        .database
        .or_else(|| snapshot.sole_database().map(str::to_string));

    let workbench = offline_workbench(config, OfflineCollaborator::new(snapshot).with_plan(plan));
    let tab = workbench.create_tab(Some(Uuid::new_v4()), database);
    workbench.update_content(tab, sql.as_str());

    let analysis = workbench
        .explain_tab(tab)
        .await
        .context("Plan analysis failed")?
        .context("Plan analysis produced no result")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
    } else {
        output::print_analysis(&analysis);
    }
    Ok(())
}

pub fn format(config: WorkbenchConfig, args: FormatArgs) -> anyhow::Result<()> {
    let sql = read_sql(&args.sql)?;

    let workbench = offline_workbench(config, OfflineCollaborator::default());
    let tab = workbench.create_tab(None, None);
    workbench.update_content(tab, sql.as_str());

    if !workbench.format_tab(tab) {
        bail!("Could not format the given SQL");
    }
    let formatted = workbench.with_sessions(|s| s.get(tab).map(|t| t.content().to_string()));
    print!("{}", formatted.unwrap_or_default());
    Ok(())
}

fn offline_workbench(config: WorkbenchConfig, offline: OfflineCollaborator) -> Workbench {
    let offline = Arc::new(offline);
    let collaborators = Collaborators {
        executor: offline.clone(),
        schema: offline,
        formatter: Arc::new(SqlFormatCollaborator::new()),
    };
    Workbench::from_config(config, collaborators)
}

/// SQL given inline, or read from a file when prefixed with `@`
fn read_sql(arg: &str) -> anyhow::Result<String> {
    match arg.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read SQL file: {}", path)),
        None => Ok(arg.to_string()),
    }
}

fn last_line(text: &str) -> usize {
    text.split('\n').count().saturating_sub(1)
}

fn line_length(text: &str, line: usize) -> usize {
    text.split('\n')
        .nth(line)
        .map(|l| l.trim_end_matches('\r').chars().count())
        .unwrap_or(0)
}
