//! Project command handlers

use anyhow::{bail, Context, Result};
use chrono::{NaiveTime, Utc};

use ploy_core::{CadenceType, NewProject, Project, ProjectStatus, Store};

use super::find_project;
use crate::output::Output;

/// Fields accepted by `ploy project add`
pub struct ProjectInput {
    pub title: String,
    pub purpose: String,
    pub values: Vec<String>,
    pub beneficiaries: Vec<String>,
    pub cadence: Option<CadenceType>,
    pub day: Option<u8>,
    pub time: Option<String>,
    pub next_step: String,
}

/// Create a new project
///
/// Cadence fields not given on the command line come from the settings.
pub async fn add(store: &mut Store, input: ProjectInput, output: &Output) -> Result<()> {
    if input.title.trim().is_empty() {
        bail!("Project title cannot be empty");
    }

    let mut cadence = store.document().settings.default_cadence();
    if let Some(kind) = input.cadence {
        cadence.kind = kind;
    }
    if let Some(day) = input.day {
        cadence.day_of_week = day;
    }
    if let Some(time) = input.time {
        NaiveTime::parse_from_str(&time, "%H:%M")
            .with_context(|| format!("Invalid review time '{}'. Use HH:MM (UTC).", time))?;
        cadence.time_utc = time;
    }

    let project = Project::new(NewProject {
        title: input.title,
        purpose: input.purpose,
        values: input.values,
        beneficiaries: input.beneficiaries,
        cadence,
        next_step: input.next_step,
        ..Default::default()
    });

    let created = project.clone();
    store
        .apply(move |doc| doc.with_project(project))
        .await
        .context("Failed to create project")?;

    output.success(&format!("Created project: {}", created.id));
    output.print_project(&created, None, Utc::now());
    Ok(())
}

/// List projects, optionally by status or only those due for review
pub fn list(store: &Store, status: Option<ProjectStatus>, due: bool, output: &Output) -> Result<()> {
    let now = Utc::now();
    let doc = store.document();

    let projects: Vec<&Project> = if due {
        doc.projects_due_for_review(now)
    } else {
        doc.projects.iter().collect()
    };
    let projects: Vec<&Project> = match status {
        Some(status) => projects.into_iter().filter(|p| p.status == status).collect(),
        None => projects,
    };

    output.print_projects(&projects, now);
    Ok(())
}

/// Show a project with its activity summary
pub fn show(store: &Store, id: String, output: &Output) -> Result<()> {
    let now = Utc::now();
    let doc = store.document();
    let project = find_project(doc, &id)?;
    let stats = doc.project_stats(&project.id, now);

    output.print_project(project, stats.as_ref(), now);
    Ok(())
}

/// Mark a project as reviewed
pub async fn review(store: &mut Store, id: String, output: &Output) -> Result<()> {
    let reviewed = find_project(store.document(), &id)?.reviewed();
    let title = reviewed.title.clone();

    store
        .apply(move |doc| doc.with_project(reviewed))
        .await
        .context("Failed to record review")?;

    output.success(&format!("Reviewed '{}'", title));
    Ok(())
}

/// Change a project's status
pub async fn set_status(
    store: &mut Store,
    id: String,
    status: ProjectStatus,
    note: Option<String>,
    output: &Output,
) -> Result<()> {
    let project = find_project(store.document(), &id)?;
    if project.status == status && note.is_none() {
        output.message(&format!("'{}' is already {}", project.title, status));
        return Ok(());
    }

    let changed = project.with_status(status, note.as_deref());
    let title = changed.title.clone();
    store
        .apply(move |doc| doc.with_project(changed))
        .await
        .context("Failed to update project")?;

    output.success(&format!("'{}' is now {}", title, status));
    Ok(())
}

/// Delete a project together with its logs and wins
pub async fn delete(store: &mut Store, id: String, output: &Output) -> Result<()> {
    let doc = store.document();
    let project = find_project(doc, &id)?;
    let project_id = project.id.clone();
    let title = project.title.clone();
    let logs = doc.project_logs(&project_id).len();
    let wins = doc.project_wins(&project_id).len();

    store
        .apply(|doc| doc.without_project(&project_id))
        .await
        .context("Failed to delete project")?;

    output.success(&format!(
        "Deleted '{}' with {} log(s) and {} win(s)",
        title, logs, wins
    ));
    Ok(())
}
