//! Document merging
//!
//! Reconciles the current document with an imported one. Every collection
//! is merged independently by entity id; settings are shallow-merged with
//! the incoming values winning. Merging is pure: nothing here touches
//! storage.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::models::Entity;

/// How id conflicts are resolved during a merge
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MergeStrategy {
    /// The version with the later `updatedAt` (or `createdAt`) wins; ties
    /// keep the current one
    #[default]
    Newest,
    /// The imported document replaces the current one wholesale
    OverwriteAll,
    /// The current version always wins; only new ids are added
    KeepExisting,
}

impl MergeStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            MergeStrategy::Newest => "newest",
            MergeStrategy::OverwriteAll => "overwriteAll",
            MergeStrategy::KeepExisting => "keepExisting",
        }
    }
}

impl fmt::Display for MergeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MergeStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "newest" => Ok(MergeStrategy::Newest),
            "overwrite" | "overwrite-all" | "overwriteAll" => Ok(MergeStrategy::OverwriteAll),
            "keep" | "keep-existing" | "keepExisting" => Ok(MergeStrategy::KeepExisting),
            other => Err(format!(
                "unknown merge strategy '{}' (expected newest, overwrite or keep)",
                other
            )),
        }
    }
}

/// Merge `incoming` into `current`
///
/// The result carries the higher of the two schema versions. With
/// [`MergeStrategy::OverwriteAll`] the result is `incoming` itself.
/// Otherwise collections keep current items in their order, followed by
/// ids only `incoming` has, and the document-level fields (`exportedAt`,
/// `deviceId`, unknown keys) come from `current`.
pub fn merge_documents(current: &Document, incoming: &Document, strategy: MergeStrategy) -> Document {
    let schema_version = current.schema_version.max(incoming.schema_version);

    if strategy == MergeStrategy::OverwriteAll {
        let mut merged = incoming.clone();
        merged.schema_version = schema_version;
        return merged;
    }

    let mut extra = incoming.extra.clone();
    extra.extend(current.extra.clone());

    Document {
        schema_version,
        exported_at: current.exported_at,
        device_id: current.device_id.clone(),
        projects: merge_collection(&current.projects, &incoming.projects, strategy),
        ideas: merge_collection(&current.ideas, &incoming.ideas, strategy),
        logs: merge_collection(&current.logs, &incoming.logs, strategy),
        wins: merge_collection(&current.wins, &incoming.wins, strategy),
        quarterly_reflections: merge_collection(
            &current.quarterly_reflections,
            &incoming.quarterly_reflections,
            strategy,
        ),
        settings: current.settings.merged_with(&incoming.settings),
        extra,
    }
}

/// Union of two collections keyed by id
///
/// A duplicated id inside `current` collapses to its last occurrence.
pub fn merge_collection<T: Entity>(current: &[T], incoming: &[T], strategy: MergeStrategy) -> Vec<T> {
    let mut merged: Vec<T> = Vec::with_capacity(current.len() + incoming.len());
    let mut index: HashMap<String, usize> = HashMap::new();

    for item in current {
        match index.get(item.id()) {
            Some(&i) => merged[i] = item.clone(),
            None => {
                index.insert(item.id().to_string(), merged.len());
                merged.push(item.clone());
            }
        }
    }

    for item in incoming {
        match index.get(item.id()) {
            None => {
                index.insert(item.id().to_string(), merged.len());
                merged.push(item.clone());
            }
            Some(&i) => {
                let replace = match strategy {
                    MergeStrategy::Newest => item.last_modified() > merged[i].last_modified(),
                    MergeStrategy::OverwriteAll => true,
                    MergeStrategy::KeepExisting => false,
                };
                if replace {
                    merged[i] = item.clone();
                }
            }
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Idea, LearningLog, NewProject, Project, Settings, Win, WinKind};
    use chrono::{Duration, Utc};

    const ALL: [MergeStrategy; 3] = [
        MergeStrategy::Newest,
        MergeStrategy::OverwriteAll,
        MergeStrategy::KeepExisting,
    ];

    fn project(title: &str) -> Project {
        Project::new(NewProject {
            title: title.to_string(),
            ..Default::default()
        })
    }

    fn sample(device: &str) -> Document {
        let p = project(&format!("{} project", device));
        Document::new(device)
            .with_idea(Idea::new("idea", Some(p.id.clone())))
            .with_log(LearningLog::new(p.id.clone(), "learned"))
            .with_win(Win::new(p.id.clone(), WinKind::Small, "win"))
            .with_project(p)
    }

    fn ids<T: Entity>(items: &[T]) -> Vec<String> {
        items.iter().map(|i| i.id().to_string()).collect()
    }

    #[test]
    fn test_strategy_parsing() {
        assert_eq!("newest".parse::<MergeStrategy>().unwrap(), MergeStrategy::Newest);
        for s in ["overwrite", "overwrite-all", "overwriteAll"] {
            assert_eq!(s.parse::<MergeStrategy>().unwrap(), MergeStrategy::OverwriteAll);
        }
        for s in ["keep", "keep-existing", "keepExisting"] {
            assert_eq!(s.parse::<MergeStrategy>().unwrap(), MergeStrategy::KeepExisting);
        }
        assert!("merge".parse::<MergeStrategy>().is_err());
        assert_eq!(MergeStrategy::OverwriteAll.to_string(), "overwriteAll");
    }

    #[test]
    fn test_merge_with_self_is_idempotent() {
        let doc = sample("a");
        for strategy in ALL {
            let merged = merge_documents(&doc, &doc, strategy);
            assert_eq!(ids(&merged.projects), ids(&doc.projects));
            assert_eq!(ids(&merged.ideas), ids(&doc.ideas));
            assert_eq!(ids(&merged.logs), ids(&doc.logs));
            assert_eq!(ids(&merged.wins), ids(&doc.wins));
            assert_eq!(merged.projects, doc.projects);
        }
    }

    #[test]
    fn test_disjoint_documents_union() {
        let a = sample("a");
        let b = sample("b");
        for strategy in [MergeStrategy::Newest, MergeStrategy::KeepExisting] {
            let merged = merge_documents(&a, &b, strategy);
            assert_eq!(merged.projects.len(), 2);
            assert_eq!(merged.ideas.len(), 2);
            assert_eq!(merged.logs.len(), 2);
            assert_eq!(merged.wins.len(), 2);
            // current first, then new incoming ids
            assert_eq!(merged.projects[0].id, a.projects[0].id);
            assert_eq!(merged.projects[1].id, b.projects[0].id);
        }
    }

    #[test]
    fn test_newest_wins_by_updated_at() {
        let base = project("Base");
        let now = Utc::now();
        let older = Project {
            title: "Older".to_string(),
            updated_at: Some(now - Duration::hours(2)),
            ..base.clone()
        };
        let newer = Project {
            title: "Newer".to_string(),
            updated_at: Some(now),
            ..base
        };

        let current = Document::new("a").with_project(older.clone());
        let incoming = Document::new("b").with_project(newer.clone());
        let merged = merge_documents(&current, &incoming, MergeStrategy::Newest);
        assert_eq!(merged.projects, vec![newer.clone()]);

        // Reversed roles: current is newer and stays
        let merged = merge_documents(&incoming, &current, MergeStrategy::Newest);
        assert_eq!(merged.projects, vec![newer]);
    }

    #[test]
    fn test_newest_tie_keeps_current() {
        let base = project("Same time");
        let other = Project {
            title: "Other title".to_string(),
            ..base.clone()
        };

        let current = Document::new("a").with_project(base.clone());
        let incoming = Document::new("b").with_project(other);
        let merged = merge_documents(&current, &incoming, MergeStrategy::Newest);
        assert_eq!(merged.projects[0].title, "Same time");
    }

    #[test]
    fn test_newest_falls_back_to_created_at() {
        let idea = Idea::new("first", None);
        let later = Idea {
            text: "edited".to_string(),
            created_at: idea.created_at + Duration::seconds(5),
            ..idea.clone()
        };
        assert!(idea.updated_at.is_none());

        let current = Document::new("a").with_idea(idea);
        let incoming = Document::new("b").with_idea(later);
        let merged = merge_documents(&current, &incoming, MergeStrategy::Newest);
        assert_eq!(merged.ideas[0].text, "edited");
    }

    #[test]
    fn test_keep_existing_ignores_conflicts() {
        let base = project("Mine");
        let theirs = Project {
            title: "Theirs".to_string(),
            updated_at: Some(Utc::now() + Duration::days(1)),
            ..base.clone()
        };
        let fresh = project("Fresh");

        let current = Document::new("a").with_project(base);
        let incoming = Document::new("b").with_project(theirs).with_project(fresh.clone());
        let merged = merge_documents(&current, &incoming, MergeStrategy::KeepExisting);

        assert_eq!(merged.projects.len(), 2);
        assert_eq!(merged.projects[0].title, "Mine");
        assert_eq!(merged.projects[1].id, fresh.id);
    }

    #[test]
    fn test_overwrite_all_replaces_document() {
        let current = sample("a");
        let mut incoming = sample("b");
        incoming.schema_version = 1;

        let merged = merge_documents(&current, &incoming, MergeStrategy::OverwriteAll);
        assert_eq!(merged.projects, incoming.projects);
        assert_eq!(merged.device_id, "b");
        assert_eq!(merged.schema_version, current.schema_version);
    }

    #[test]
    fn test_settings_incoming_keys_win() {
        let mut current = Document::new("a");
        current.settings.timezone = Some("Europe/Oslo".to_string());
        current.settings.backup_reminder_days = Some(30);

        let mut incoming = Document::new("b").with_settings(&Settings {
            backup_reminder_days: Some(7),
            ..Default::default()
        });
        incoming.settings.timezone = None;

        for strategy in [MergeStrategy::Newest, MergeStrategy::KeepExisting] {
            let merged = merge_documents(&current, &incoming, strategy);
            assert_eq!(merged.settings.backup_reminder_days, Some(7));
            assert_eq!(merged.settings.timezone.as_deref(), Some("Europe/Oslo"));
        }
    }

    #[test]
    fn test_version_is_max_and_current_identity_kept() {
        let mut current = sample("a");
        current.schema_version = 2;
        let mut incoming = sample("b");
        incoming.schema_version = 5;

        let merged = merge_documents(&current, &incoming, MergeStrategy::Newest);
        assert_eq!(merged.schema_version, 5);
        assert_eq!(merged.device_id, "a");
        assert_eq!(merged.exported_at, current.exported_at);
    }

    #[test]
    fn test_duplicate_ids_in_current_collapse() {
        let p = project("Dup");
        let later = p.updated(|p| p.title = "Dup later".to_string());
        let merged = merge_collection(&[p, later], &[], MergeStrategy::Newest);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].title, "Dup later");
    }
}
