//! Journal document handling
//!
//! The whole journal lives in one JSON document: every project, idea,
//! learning log, win and quarterly reflection, plus the settings record.
//! This module owns its in-memory shape, parsing (validation + migration)
//! and the copy-on-write helpers used to change it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::models::{
    Entity, Extra, Idea, LearningLog, Project, QuarterlyReflection, Settings, Win,
};
use crate::storage::schema::{self, SCHEMA_VERSION};

/// Errors that can occur while reading or writing a document
#[derive(Error, Debug)]
pub enum DocumentError {
    /// Text is not JSON at all
    #[error("Invalid JSON: {0}")]
    Parse(#[source] serde_json::Error),

    /// JSON parsed but does not have the shape of a journal document
    #[error("Invalid document: {0}")]
    Invalid(String),

    /// Serialization failed
    #[error("Failed to serialize document: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// The root aggregate holding all user data
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(rename = "version")]
    pub schema_version: u32,
    #[serde(default, deserialize_with = "crate::lenient::or_default")]
    pub exported_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "crate::lenient::string")]
    pub device_id: String,
    pub projects: Vec<Project>,
    pub ideas: Vec<Idea>,
    pub logs: Vec<LearningLog>,
    pub wins: Vec<Win>,
    #[serde(default, deserialize_with = "crate::lenient::list")]
    pub quarterly_reflections: Vec<QuarterlyReflection>,
    pub settings: Settings,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Document {
    /// Create an empty document at the current schema version
    pub fn new(device_id: impl Into<String>) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            exported_at: Utc::now(),
            device_id: device_id.into(),
            projects: Vec::new(),
            ideas: Vec::new(),
            logs: Vec::new(),
            wins: Vec::new(),
            quarterly_reflections: Vec::new(),
            settings: Settings::initial(),
            extra: Extra::new(),
        }
    }

    /// Parse, validate and migrate a serialized document
    pub fn parse(text: &str) -> Result<Self, DocumentError> {
        let value: Value = serde_json::from_str(text).map_err(DocumentError::Parse)?;
        Self::from_value(value)
    }

    /// Validate and migrate an already-parsed JSON value
    ///
    /// Only the root shape is checked. Entity fields holding the wrong type
    /// fall back to their defaults; an entity that is not an object at all
    /// fails the document.
    pub fn from_value(value: Value) -> Result<Self, DocumentError> {
        schema::validate(&value)?;
        let migrated = schema::migrate(value);
        serde_json::from_value(migrated).map_err(|e| DocumentError::Invalid(e.to_string()))
    }

    /// Compact JSON, as kept in the storage slots
    pub fn to_json(&self) -> Result<String, DocumentError> {
        serde_json::to_string(self).map_err(DocumentError::Serialize)
    }

    /// Indented JSON, as written to backup files
    pub fn to_json_pretty(&self) -> Result<String, DocumentError> {
        serde_json::to_string_pretty(self).map_err(DocumentError::Serialize)
    }

    /// Total number of entities across all collections
    pub fn entity_count(&self) -> usize {
        self.projects.len()
            + self.ideas.len()
            + self.logs.len()
            + self.wins.len()
            + self.quarterly_reflections.len()
    }

    // ==================== Projects ====================

    pub fn project(&self, id: &str) -> Option<&Project> {
        find(&self.projects, id)
    }

    /// Insert or replace a project
    pub fn with_project(mut self, project: Project) -> Self {
        upsert(&mut self.projects, project);
        self
    }

    /// Remove a project and everything that depends on it
    ///
    /// Ideas pointing at the project become unassigned; its logs and wins
    /// are removed.
    pub fn without_project(mut self, id: &str) -> Self {
        self.projects.retain(|p| p.id != id);
        self.ideas = self
            .ideas
            .into_iter()
            .map(|idea| {
                if idea.project_id.as_deref() == Some(id) {
                    idea.assigned_to(None)
                } else {
                    idea
                }
            })
            .collect();
        self.logs.retain(|l| l.project_id != id);
        self.wins.retain(|w| w.project_id != id);
        self
    }

    // ==================== Ideas ====================

    pub fn idea(&self, id: &str) -> Option<&Idea> {
        find(&self.ideas, id)
    }

    pub fn with_idea(mut self, idea: Idea) -> Self {
        upsert(&mut self.ideas, idea);
        self
    }

    pub fn without_idea(mut self, id: &str) -> Self {
        self.ideas.retain(|i| i.id != id);
        self
    }

    // ==================== Logs ====================

    pub fn log(&self, id: &str) -> Option<&LearningLog> {
        find(&self.logs, id)
    }

    pub fn with_log(mut self, log: LearningLog) -> Self {
        upsert(&mut self.logs, log);
        self
    }

    pub fn without_log(mut self, id: &str) -> Self {
        self.logs.retain(|l| l.id != id);
        self
    }

    // ==================== Wins ====================

    pub fn win(&self, id: &str) -> Option<&Win> {
        find(&self.wins, id)
    }

    pub fn with_win(mut self, win: Win) -> Self {
        upsert(&mut self.wins, win);
        self
    }

    pub fn without_win(mut self, id: &str) -> Self {
        self.wins.retain(|w| w.id != id);
        self
    }

    // ==================== Quarterly reflections ====================

    pub fn reflection(&self, id: &str) -> Option<&QuarterlyReflection> {
        find(&self.quarterly_reflections, id)
    }

    /// Insert or replace a reflection, refreshing its `updatedAt`
    pub fn with_reflection(mut self, reflection: QuarterlyReflection) -> Self {
        let mut reflection = reflection;
        reflection.updated_at = Some(Utc::now());
        upsert(&mut self.quarterly_reflections, reflection);
        self
    }

    /// Mark exactly one reflection as current
    pub fn with_current_reflection(mut self, id: &str) -> Self {
        self.quarterly_reflections = self
            .quarterly_reflections
            .into_iter()
            .map(|r| {
                let is_current = r.id == id;
                if r.is_current == is_current {
                    r
                } else {
                    r.updated(|r| r.is_current = is_current)
                }
            })
            .collect();
        self
    }

    pub fn without_reflection(mut self, id: &str) -> Self {
        self.quarterly_reflections.retain(|r| r.id != id);
        self
    }

    // ==================== Settings ====================

    /// Shallow-merge `updates` over the current settings
    pub fn with_settings(mut self, updates: &Settings) -> Self {
        self.settings = self.settings.merged_with(updates);
        self
    }

    /// Record that a backup was taken at `at`
    pub fn with_backup_recorded(mut self, at: DateTime<Utc>) -> Self {
        self.settings.last_backup_at = Some(at);
        self
    }
}

fn find<'a, T: Entity>(items: &'a [T], id: &str) -> Option<&'a T> {
    items.iter().find(|item| item.id() == id)
}

fn upsert<T: Entity>(items: &mut Vec<T>, item: T) {
    match items.iter().position(|existing| existing.id() == item.id()) {
        Some(index) => items[index] = item,
        None => items.push(item),
    }
}
