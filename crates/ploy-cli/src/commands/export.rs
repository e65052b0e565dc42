//! Export command handlers

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;

use ploy_core::export::{
    export_csv, export_filename, export_ics, export_project_ics, project_ics_filename,
    CsvCollection,
};
use ploy_core::Store;

use super::find_project;
use crate::output::Output;

/// Filename prefix of full backups
const BACKUP_PREFIX: &str = "roys-ploy";

/// Filename prefix of the calendar of all active projects
const SCHEDULE_PREFIX: &str = "roys-ploy-reviews";

/// Export a full JSON backup and record it in the settings
pub async fn json(store: &mut Store, out: Option<PathBuf>, output: &Output) -> Result<()> {
    let text = store.export_backup()?;
    deliver(text, out, export_filename(BACKUP_PREFIX, "json", Utc::now()), output).await?;
    store.record_backup().await
}

/// Export one collection as CSV
pub async fn csv(
    store: &Store,
    collection: CsvCollection,
    out: Option<PathBuf>,
    output: &Output,
) -> Result<()> {
    let text = export_csv(store.document(), collection);
    let filename = export_filename(collection.file_prefix(), "csv", Utc::now());
    deliver(text, out, filename, output).await
}

/// Export the review schedule as iCalendar
pub async fn ics(
    store: &Store,
    project: Option<String>,
    out: Option<PathBuf>,
    output: &Output,
) -> Result<()> {
    let now = Utc::now();
    let doc = store.document();

    let (text, filename) = match project {
        Some(ref id) => {
            let project = find_project(doc, id)?;
            (export_project_ics(project, now), project_ics_filename(project))
        }
        None => (export_ics(doc, now), export_filename(SCHEDULE_PREFIX, "ics", now)),
    };

    deliver(text, out, filename, output).await
}

/// Write `content` to `out`, or to stdout when no path is given
///
/// When `out` is a directory the file is created inside it as `filename`.
async fn deliver(
    content: String,
    out: Option<PathBuf>,
    filename: String,
    output: &Output,
) -> Result<()> {
    let Some(out) = out else {
        let mut stdout = std::io::stdout().lock();
        stdout
            .write_all(content.as_bytes())
            .context("Failed to write export to stdout")?;
        if !content.ends_with('\n') {
            writeln!(stdout).context("Failed to write export to stdout")?;
        }
        return Ok(());
    };

    let path = if tokio::fs::metadata(&out)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false)
    {
        out.join(filename)
    } else {
        out
    };

    tokio::fs::write(&path, content.as_bytes())
        .await
        .with_context(|| format!("Failed to write export file: {:?}", path))?;

    output.success(&format!("Exported to {}", path.display()));
    Ok(())
}
