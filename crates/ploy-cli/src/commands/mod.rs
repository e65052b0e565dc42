//! Command handlers

pub mod config;
pub mod export;
pub mod idea;
pub mod import;
pub mod log;
pub mod project;
pub mod reset;
pub mod status;
pub mod win;

use anyhow::{anyhow, Result};

use ploy_core::{Document, Project};

/// Resolve a project by full id or unique prefix
pub fn find_project<'a>(doc: &'a Document, id: &str) -> Result<&'a Project> {
    doc.find_project(id)
        .ok_or_else(|| anyhow!("Project not found (or prefix is ambiguous): {}", id))
}
