//! Idea command handlers

use anyhow::{anyhow, bail, Context, Result};
use chrono::Utc;

use ploy_core::{Idea, NewProject, Store};

use super::find_project;
use crate::output::Output;

/// Capture a new idea
pub async fn add(store: &mut Store, text: String, project: Option<String>, output: &Output) -> Result<()> {
    if text.trim().is_empty() {
        bail!("Idea text cannot be empty");
    }

    let project_id = match project {
        Some(ref id) => Some(find_project(store.document(), id)?.id.clone()),
        None => None,
    };

    let idea = Idea::new(text.trim(), project_id);
    let id = idea.id.clone();
    store
        .apply(move |doc| doc.with_idea(idea))
        .await
        .context("Failed to save idea")?;

    output.success(&format!("Captured idea: {}", id));
    Ok(())
}

/// List active or archived ideas
pub fn list(store: &Store, archived: bool, project: Option<String>, output: &Output) -> Result<()> {
    let doc = store.document();

    let ideas = match (archived, project) {
        (true, _) => doc.archived_ideas(),
        (false, Some(ref id)) => doc.project_ideas(&find_project(doc, id)?.id),
        (false, None) => doc.active_ideas(),
    };

    output.print_ideas(&ideas);
    Ok(())
}

/// Archive an idea
pub async fn archive(store: &mut Store, id: String, output: &Output) -> Result<()> {
    let idea = find_idea(store, &id)?;
    if idea.is_archived() {
        output.message("Idea is already archived");
        return Ok(());
    }

    let archived = idea.archived();
    store
        .apply(move |doc| doc.with_idea(archived))
        .await
        .context("Failed to archive idea")?;

    output.success("Idea archived");
    Ok(())
}

/// Turn an idea into a new project
pub async fn promote(store: &mut Store, id: String, title: Option<String>, output: &Output) -> Result<()> {
    let idea = find_idea(store, &id)?;
    if let Some(ref project_id) = idea.promoted_to_project_id {
        bail!("Idea was already promoted to project {}", project_id);
    }

    let (project, promoted) = idea.promote(NewProject {
        title: title.unwrap_or_default(),
        cadence: store.document().settings.default_cadence(),
        ..Default::default()
    });
    let created = project.clone();

    store
        .apply(move |doc| doc.with_project(project).with_idea(promoted))
        .await
        .context("Failed to promote idea")?;

    output.success(&format!("Promoted idea to project: {}", created.id));
    output.print_project(&created, None, Utc::now());
    Ok(())
}

fn find_idea(store: &Store, id: &str) -> Result<Idea> {
    store
        .document()
        .find_idea(id)
        .cloned()
        .ok_or_else(|| anyhow!("Idea not found (or prefix is ambiguous): {}", id))
}
