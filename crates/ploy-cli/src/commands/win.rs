//! Win command handlers

use anyhow::{bail, Context, Result};

use ploy_core::{Store, Win, WinKind};

use super::find_project;
use crate::output::Output;

/// Record a win on a project
pub async fn add(
    store: &mut Store,
    project: String,
    note: String,
    kind: WinKind,
    output: &Output,
) -> Result<()> {
    if note.trim().is_empty() {
        bail!("Win note cannot be empty");
    }

    let project = find_project(store.document(), &project)?;
    let title = project.title.clone();
    let win = Win::new(project.id.clone(), kind, note.trim());

    store
        .apply(move |doc| doc.with_win(win))
        .await
        .context("Failed to save win")?;

    output.success(&format!("Celebrated a {} win for '{}'", kind.as_str(), title));
    Ok(())
}

/// List wins, newest first
pub fn list(store: &Store, project: Option<String>, limit: usize, output: &Output) -> Result<()> {
    let doc = store.document();

    let wins = match project {
        Some(ref id) => {
            let mut wins = doc.project_wins(&find_project(doc, id)?.id);
            wins.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            wins.truncate(limit);
            wins
        }
        None => doc.recent_wins(limit),
    };

    output.print_wins(&wins);
    Ok(())
}
