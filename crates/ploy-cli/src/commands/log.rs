//! Learning log command handlers

use anyhow::{bail, Context, Result};

use ploy_core::{LearningLog, Store};

use super::find_project;
use crate::output::Output;

/// Add a learning log entry to a project
pub async fn add(
    store: &mut Store,
    project: String,
    learned: String,
    next: String,
    impact: String,
    output: &Output,
) -> Result<()> {
    if learned.trim().is_empty() {
        bail!("Say what you learned; the entry cannot be empty");
    }

    let project = find_project(store.document(), &project)?;
    let title = project.title.clone();
    let log = LearningLog::new(project.id.clone(), learned.trim())
        .with_next_excited(next.trim())
        .with_impact_note(impact.trim());

    store
        .apply(move |doc| doc.with_log(log))
        .await
        .context("Failed to save learning log entry")?;

    output.success(&format!("Logged learning for '{}'", title));
    Ok(())
}

/// List entries, newest first
pub fn list(store: &Store, project: Option<String>, limit: usize, output: &Output) -> Result<()> {
    let doc = store.document();

    let logs = match project {
        Some(ref id) => {
            let mut logs = doc.project_logs(&find_project(doc, id)?.id);
            logs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            logs.truncate(limit);
            logs
        }
        None => doc.recent_logs(limit),
    };

    output.print_logs(&logs);
    Ok(())
}
