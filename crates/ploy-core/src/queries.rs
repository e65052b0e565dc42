//! Read-side helpers over a document
//!
//! Everything here borrows from the document; nothing mutates it.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::document::Document;
use crate::models::{
    Entity, Idea, LearningLog, Project, ProjectStatus, QuarterlyReflection, Win,
};

/// Number of recent wins included in [`ProjectStats`]
const RECENT_WINS_IN_STATS: usize = 5;

/// Per-project activity summary
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectStats<'a> {
    pub total_logs: usize,
    pub total_wins: usize,
    pub days_since_created: i64,
    pub days_since_last_review: Option<i64>,
    pub last_log: Option<&'a LearningLog>,
    pub recent_wins: Vec<&'a Win>,
}

/// Document-wide counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallStats {
    pub total_projects: usize,
    pub active_projects: usize,
    pub paused_projects: usize,
    pub done_projects: usize,
    pub total_ideas: usize,
    pub active_ideas: usize,
    pub total_logs: usize,
    pub total_wins: usize,
}

impl Document {
    // ==================== Projects ====================

    pub fn projects_by_status(&self, status: ProjectStatus) -> Vec<&Project> {
        self.projects.iter().filter(|p| p.status == status).collect()
    }

    pub fn active_projects(&self) -> Vec<&Project> {
        self.projects_by_status(ProjectStatus::Active)
    }

    /// Active projects whose review is due at `now`
    pub fn projects_due_for_review(&self, now: DateTime<Utc>) -> Vec<&Project> {
        self.projects.iter().filter(|p| p.is_review_due(now)).collect()
    }

    /// Find a project by full id or unique id prefix
    pub fn find_project(&self, id_or_prefix: &str) -> Option<&Project> {
        find_by_prefix(&self.projects, id_or_prefix)
    }

    pub fn project_logs(&self, project_id: &str) -> Vec<&LearningLog> {
        self.logs
            .iter()
            .filter(|l| l.project_id == project_id)
            .collect()
    }

    pub fn project_wins(&self, project_id: &str) -> Vec<&Win> {
        self.wins
            .iter()
            .filter(|w| w.project_id == project_id)
            .collect()
    }

    /// Non-archived ideas attached to a project
    pub fn project_ideas(&self, project_id: &str) -> Vec<&Idea> {
        self.ideas
            .iter()
            .filter(|i| i.project_id.as_deref() == Some(project_id) && !i.is_archived())
            .collect()
    }

    /// Most recently created log of a project
    pub fn latest_log(&self, project_id: &str) -> Option<&LearningLog> {
        self.logs
            .iter()
            .filter(|l| l.project_id == project_id)
            .max_by_key(|l| l.created_at)
    }

    pub fn project_stats(&self, project_id: &str, now: DateTime<Utc>) -> Option<ProjectStats<'_>> {
        let project = self.project(project_id)?;
        let wins = self.project_wins(project_id);

        Some(ProjectStats {
            total_logs: self.project_logs(project_id).len(),
            total_wins: wins.len(),
            days_since_created: (now - project.created_at).num_days(),
            days_since_last_review: project.last_review_at.map(|at| (now - at).num_days()),
            last_log: self.latest_log(project_id),
            recent_wins: wins.into_iter().take(RECENT_WINS_IN_STATS).collect(),
        })
    }

    // ==================== Ideas ====================

    /// Find an idea by full id or unique id prefix
    pub fn find_idea(&self, id_or_prefix: &str) -> Option<&Idea> {
        find_by_prefix(&self.ideas, id_or_prefix)
    }

    /// Non-archived ideas without a project
    pub fn unassigned_ideas(&self) -> Vec<&Idea> {
        self.ideas
            .iter()
            .filter(|i| i.project_id.is_none() && !i.is_archived())
            .collect()
    }

    pub fn archived_ideas(&self) -> Vec<&Idea> {
        self.ideas.iter().filter(|i| i.is_archived()).collect()
    }

    pub fn active_ideas(&self) -> Vec<&Idea> {
        self.ideas.iter().filter(|i| !i.is_archived()).collect()
    }

    // ==================== Logs & wins ====================

    /// Newest logs first
    pub fn recent_logs(&self, limit: usize) -> Vec<&LearningLog> {
        let mut logs: Vec<&LearningLog> = self.logs.iter().collect();
        logs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        logs.truncate(limit);
        logs
    }

    /// Newest wins first
    pub fn recent_wins(&self, limit: usize) -> Vec<&Win> {
        let mut wins: Vec<&Win> = self.wins.iter().collect();
        wins.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        wins.truncate(limit);
        wins
    }

    // ==================== Reflections ====================

    pub fn current_reflection(&self) -> Option<&QuarterlyReflection> {
        self.quarterly_reflections.iter().find(|r| r.is_current)
    }

    // ==================== Overview ====================

    pub fn overall_stats(&self) -> OverallStats {
        OverallStats {
            total_projects: self.projects.len(),
            active_projects: self.projects_by_status(ProjectStatus::Active).len(),
            paused_projects: self.projects_by_status(ProjectStatus::Paused).len(),
            done_projects: self.projects_by_status(ProjectStatus::Done).len(),
            total_ideas: self.ideas.len(),
            active_ideas: self.active_ideas().len(),
            total_logs: self.logs.len(),
            total_wins: self.wins.len(),
        }
    }

    /// Whether it has been too long since the last recorded backup
    pub fn should_show_backup_reminder(&self, now: DateTime<Utc>) -> bool {
        match self.settings.last_backup_at {
            None => true,
            Some(last) => {
                (now - last).num_days() >= i64::from(self.settings.backup_reminder_days())
            }
        }
    }
}

/// Exact id match first, otherwise the only item whose id starts with `prefix`
fn find_by_prefix<'a, T: Entity>(items: &'a [T], prefix: &str) -> Option<&'a T> {
    if prefix.is_empty() {
        return None;
    }
    if let Some(exact) = items.iter().find(|item| item.id() == prefix) {
        return Some(exact);
    }
    let mut matches = items.iter().filter(|item| item.id().starts_with(prefix));
    match (matches.next(), matches.next()) {
        (Some(item), None) => Some(item),
        _ => None,
    }
}
