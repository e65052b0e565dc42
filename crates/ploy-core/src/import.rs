//! Import preview and execution
//!
//! An import runs in two steps: a read-only preview that reports what the
//! candidate backup contains and how many of its ids already exist, then,
//! once the user has picked a strategy, the merge itself.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::document::{Document, DocumentError};
use crate::merge::{merge_documents, MergeStrategy};
use crate::models::Entity;

/// Per-collection tallies
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CollectionCounts {
    pub projects: usize,
    pub ideas: usize,
    pub logs: usize,
    pub wins: usize,
}

impl CollectionCounts {
    pub fn total(&self) -> usize {
        self.projects + self.ideas + self.logs + self.wins
    }
}

/// What an import would bring in
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum ImportPreview {
    #[serde(rename_all = "camelCase")]
    Valid {
        version: u32,
        exported_at: DateTime<Utc>,
        counts: CollectionCounts,
        /// Ids present in both the candidate and the current document
        conflicts: CollectionCounts,
    },
    Invalid { error: String },
}

impl ImportPreview {
    pub fn is_valid(&self) -> bool {
        matches!(self, ImportPreview::Valid { .. })
    }
}

/// Inspect a candidate backup without changing anything
///
/// The candidate is parsed, validated and migrated. Any failure yields
/// [`ImportPreview::Invalid`] carrying the reason.
pub fn get_import_preview(text: &str, current: &Document) -> ImportPreview {
    match Document::parse(text) {
        Ok(candidate) => preview_document(&candidate, current),
        Err(e) => ImportPreview::Invalid {
            error: e.to_string(),
        },
    }
}

/// Preview an already-parsed candidate
pub fn preview_document(candidate: &Document, current: &Document) -> ImportPreview {
    ImportPreview::Valid {
        version: candidate.schema_version,
        exported_at: candidate.exported_at,
        counts: CollectionCounts {
            projects: candidate.projects.len(),
            ideas: candidate.ideas.len(),
            logs: candidate.logs.len(),
            wins: candidate.wins.len(),
        },
        conflicts: CollectionCounts {
            projects: count_conflicts(&current.projects, &candidate.projects),
            ideas: count_conflicts(&current.ideas, &candidate.ideas),
            logs: count_conflicts(&current.logs, &candidate.logs),
            wins: count_conflicts(&current.wins, &candidate.wins),
        },
    }
}

/// Number of incoming items whose id the current collection already has
fn count_conflicts<T: Entity>(current: &[T], incoming: &[T]) -> usize {
    let existing: HashSet<&str> = current.iter().map(|item| item.id()).collect();
    incoming
        .iter()
        .filter(|item| existing.contains(item.id()))
        .count()
}

/// Parse a candidate backup and merge it into `current`
///
/// Nothing is persisted; the caller saves the result.
pub fn import_document(
    text: &str,
    current: &Document,
    strategy: MergeStrategy,
) -> Result<Document, DocumentError> {
    let incoming = Document::parse(text)?;
    Ok(merge_documents(current, &incoming, strategy))
}

/// How prominently a summary should be shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryKind {
    Error,
    Warning,
    Info,
}

/// Human-readable description of a preview
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub title: String,
    pub message: String,
    pub kind: SummaryKind,
    pub total_items: usize,
    pub total_conflicts: usize,
}

impl ImportSummary {
    /// Summary shown before the user has picked a strategy
    pub fn from_preview(preview: &ImportPreview) -> Self {
        Self::build(preview, None)
    }

    /// Summary that states what `strategy` does with the backup
    pub fn for_strategy(preview: &ImportPreview, strategy: MergeStrategy) -> Self {
        Self::build(preview, Some(strategy))
    }

    fn build(preview: &ImportPreview, strategy: Option<MergeStrategy>) -> Self {
        let (counts, conflicts) = match preview {
            ImportPreview::Invalid { error } => {
                return Self {
                    title: "Invalid Backup".to_string(),
                    message: format!("This file cannot be imported: {}", error),
                    kind: SummaryKind::Error,
                    total_items: 0,
                    total_conflicts: 0,
                }
            }
            ImportPreview::Valid {
                counts, conflicts, ..
            } => (counts, conflicts),
        };

        let total_items = counts.total();
        let total_conflicts = conflicts.total();

        let mut message = String::from("This backup contains:\n");
        message.push_str(&format!("- {}\n", plural(counts.projects, "project", "projects")));
        message.push_str(&format!("- {}\n", plural(counts.ideas, "idea", "ideas")));
        message.push_str(&format!(
            "- {}\n",
            plural(counts.logs, "learning log entry", "learning log entries")
        ));
        message.push_str(&format!("- {}\n", plural(counts.wins, "win", "wins")));

        if total_conflicts > 0 {
            let verb = if total_conflicts == 1 { "exists" } else { "exist" };
            message.push_str(&format!(
                "\n{} already {} in your data.\n",
                plural(total_conflicts, "item", "items"),
                verb
            ));
            message.push_str(match strategy {
                None => "The newest version will be kept by default.",
                Some(MergeStrategy::Newest) => "The newest version of each will be kept.",
                Some(MergeStrategy::KeepExisting) => "Your existing version of each will be kept.",
                Some(MergeStrategy::OverwriteAll) => "The backup's version of each will be kept.",
            });
        }

        let overwrite = strategy == Some(MergeStrategy::OverwriteAll);
        if overwrite {
            message.push_str("\n\nYour whole journal will be replaced by this backup.");
        }

        Self {
            title: "Import Preview".to_string(),
            message,
            kind: if total_conflicts > 0 || overwrite {
                SummaryKind::Warning
            } else {
                SummaryKind::Info
            },
            total_items,
            total_conflicts,
        }
    }
}

fn plural(n: usize, one: &str, many: &str) -> String {
    format!("{} {}", n, if n == 1 { one } else { many })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Idea, NewProject, Project};

    fn project(title: &str) -> Project {
        Project::new(NewProject {
            title: title.to_string(),
            ..Default::default()
        })
    }

    #[test]
    fn test_preview_counts_and_conflicts() {
        let shared_a = project("A");
        let shared_b = project("B");
        let current = Document::new("here")
            .with_project(shared_a.clone())
            .with_project(shared_b.clone())
            .with_project(project("Only here"));

        // Same ids, different content: still conflicts
        let candidate = Document::new("there")
            .with_project(shared_a.updated(|p| p.title = "A changed".to_string()))
            .with_project(shared_b)
            .with_project(project("Only there"))
            .with_idea(Idea::new("new idea", None));

        let preview = get_import_preview(&candidate.to_json().unwrap(), &current);
        match preview {
            ImportPreview::Valid {
                version,
                counts,
                conflicts,
                ..
            } => {
                assert_eq!(version, candidate.schema_version);
                assert_eq!(counts.projects, 3);
                assert_eq!(counts.ideas, 1);
                assert_eq!(conflicts.projects, 2);
                assert_eq!(conflicts.ideas, 0);
            }
            other => panic!("expected valid preview, got {:?}", other),
        }
    }

    #[test]
    fn test_preview_rejects_malformed() {
        let current = Document::new("here");
        let cases = [
            ("{oops", "Invalid JSON"),
            (
                r#"{"projects":[],"ideas":[],"logs":[],"wins":[],"settings":{}}"#,
                "missing version",
            ),
            (
                r#"{"version":1,"projects":{},"ideas":[],"logs":[],"wins":[],"settings":{}}"#,
                "projects must be an array",
            ),
            (
                r#"{"version":1,"projects":[],"ideas":[],"logs":[],"wins":[]}"#,
                "invalid settings",
            ),
        ];

        for (text, expected) in cases {
            match get_import_preview(text, &current) {
                ImportPreview::Invalid { error } => {
                    assert!(error.contains(expected), "{} !~ {}", error, expected)
                }
                other => panic!("expected invalid preview, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_preview_accepts_defective_entity_fields() {
        let current = Document::new("here");
        let text = r#"{
            "version": 2,
            "projects": [
                {"id": "p1", "status": "archived", "cadence": {"dayOfWeek": "2"}},
                {"id": "p2", "title": null, "createdAt": "someday"}
            ],
            "ideas": [{"id": "i1", "text": null}],
            "logs": [],
            "wins": [{"id": "w1", "kind": 5}],
            "settings": {}
        }"#;

        match get_import_preview(text, &current) {
            ImportPreview::Valid { counts, .. } => {
                assert_eq!(counts.projects, 2);
                assert_eq!(counts.ideas, 1);
                assert_eq!(counts.wins, 1);
            }
            other => panic!("expected valid preview, got {:?}", other),
        }

        let merged = import_document(text, &current, MergeStrategy::Newest).unwrap();
        assert_eq!(merged.projects.len(), 2);
        assert_eq!(merged.projects[0].cadence.day_of_week, 2);
    }

    #[test]
    fn test_preview_does_not_touch_current() {
        let current = Document::new("here").with_project(project("Mine"));
        let before = current.clone();
        let _ = get_import_preview(&current.to_json().unwrap(), &current);
        assert_eq!(current, before);
    }

    #[test]
    fn test_import_document_merges() {
        let current = Document::new("here").with_project(project("Mine"));
        let candidate = Document::new("there").with_project(project("Theirs"));

        let merged =
            import_document(&candidate.to_json().unwrap(), &current, MergeStrategy::Newest)
                .unwrap();
        assert_eq!(merged.projects.len(), 2);
        assert_eq!(merged.device_id, "here");

        let err = import_document("[]", &current, MergeStrategy::Newest).unwrap_err();
        assert!(matches!(err, DocumentError::Invalid(_)));
    }

    #[test]
    fn test_summary_for_clean_preview() {
        let preview = ImportPreview::Valid {
            version: 2,
            exported_at: Utc::now(),
            counts: CollectionCounts {
                projects: 1,
                ideas: 2,
                logs: 1,
                wins: 0,
            },
            conflicts: CollectionCounts::default(),
        };

        let summary = ImportSummary::from_preview(&preview);
        assert_eq!(summary.title, "Import Preview");
        assert_eq!(summary.kind, SummaryKind::Info);
        assert_eq!(summary.total_items, 4);
        assert!(summary.message.contains("1 project\n"));
        assert!(summary.message.contains("2 ideas\n"));
        assert!(summary.message.contains("1 learning log entry\n"));
        assert!(summary.message.contains("0 wins\n"));
        assert!(!summary.message.contains("already"));
    }

    #[test]
    fn test_summary_with_conflicts() {
        let preview = ImportPreview::Valid {
            version: 2,
            exported_at: Utc::now(),
            counts: CollectionCounts {
                projects: 3,
                ideas: 0,
                logs: 2,
                wins: 1,
            },
            conflicts: CollectionCounts {
                projects: 1,
                ..Default::default()
            },
        };

        let summary = ImportSummary::from_preview(&preview);
        assert_eq!(summary.kind, SummaryKind::Warning);
        assert_eq!(summary.total_conflicts, 1);
        assert!(summary.message.contains("1 item already exists in your data."));
        assert!(summary.message.contains("2 learning log entries"));
    }

    #[test]
    fn test_summary_names_chosen_strategy() {
        let conflicting = ImportPreview::Valid {
            version: 2,
            exported_at: Utc::now(),
            counts: CollectionCounts {
                projects: 2,
                ..Default::default()
            },
            conflicts: CollectionCounts {
                projects: 2,
                ..Default::default()
            },
        };

        let newest = ImportSummary::for_strategy(&conflicting, MergeStrategy::Newest);
        assert!(newest.message.ends_with("The newest version of each will be kept."));
        assert!(!newest.message.contains("by default"));

        let keep = ImportSummary::for_strategy(&conflicting, MergeStrategy::KeepExisting);
        assert!(keep.message.ends_with("Your existing version of each will be kept."));
        assert!(!keep.message.contains("newest"));

        let overwrite = ImportSummary::for_strategy(&conflicting, MergeStrategy::OverwriteAll);
        assert!(overwrite.message.contains("The backup's version of each will be kept."));
        assert!(overwrite
            .message
            .ends_with("Your whole journal will be replaced by this backup."));
        assert!(!overwrite.message.contains("newest"));

        // Overwriting is worth a warning even without shared ids
        let clean = ImportPreview::Valid {
            version: 2,
            exported_at: Utc::now(),
            counts: CollectionCounts {
                wins: 1,
                ..Default::default()
            },
            conflicts: CollectionCounts::default(),
        };
        let summary = ImportSummary::for_strategy(&clean, MergeStrategy::OverwriteAll);
        assert_eq!(summary.kind, SummaryKind::Warning);
        assert!(summary.message.contains("replaced"));
        assert_eq!(
            ImportSummary::for_strategy(&clean, MergeStrategy::Newest).kind,
            SummaryKind::Info
        );
    }

    #[test]
    fn test_summary_for_invalid_preview() {
        let summary = ImportSummary::from_preview(&ImportPreview::Invalid {
            error: "Invalid document: missing version".to_string(),
        });
        assert_eq!(summary.title, "Invalid Backup");
        assert_eq!(summary.kind, SummaryKind::Error);
        assert_eq!(
            summary.message,
            "This file cannot be imported: Invalid document: missing version"
        );
    }
}
