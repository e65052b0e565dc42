//! CSV export
//!
//! Output starts with a UTF-8 byte-order mark so spreadsheet apps pick the
//! right encoding. Fields containing a comma, quote or line break are
//! quoted with inner quotes doubled.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::document::Document;

const BOM: &str = "\u{FEFF}";

/// Collections that can be exported as CSV
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsvCollection {
    Projects,
    Logs,
    Wins,
    Ideas,
}

impl CsvCollection {
    /// Filename prefix used for exports of this collection
    pub fn file_prefix(&self) -> &'static str {
        match self {
            CsvCollection::Projects => "projects",
            CsvCollection::Logs => "learning_log",
            CsvCollection::Wins => "wins",
            CsvCollection::Ideas => "ideas",
        }
    }
}

impl fmt::Display for CsvCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CsvCollection::Projects => "projects",
            CsvCollection::Logs => "logs",
            CsvCollection::Wins => "wins",
            CsvCollection::Ideas => "ideas",
        };
        f.write_str(name)
    }
}

impl FromStr for CsvCollection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "projects" => Ok(CsvCollection::Projects),
            "logs" | "learning-log" | "learning_log" => Ok(CsvCollection::Logs),
            "wins" => Ok(CsvCollection::Wins),
            "ideas" => Ok(CsvCollection::Ideas),
            other => Err(format!(
                "unknown collection '{}' (expected projects, logs, wins or ideas)",
                other
            )),
        }
    }
}

/// Render one collection of `doc` as CSV
pub fn export_csv(doc: &Document, collection: CsvCollection) -> String {
    let (headers, rows) = match collection {
        CsvCollection::Projects => (
            vec![
                "ID",
                "Title",
                "Status",
                "Purpose",
                "Values",
                "Beneficiaries",
                "Created At",
                "Updated At",
                "Cadence",
                "Last Review",
            ],
            doc.projects
                .iter()
                .map(|p| {
                    vec![
                        p.id.clone(),
                        p.title.clone(),
                        p.status.to_string(),
                        p.purpose.clone(),
                        p.values.join("; "),
                        p.beneficiaries.join("; "),
                        short_date(Some(p.created_at)),
                        short_date(p.updated_at),
                        p.cadence.kind.as_str().to_string(),
                        p.last_review_at
                            .map_or_else(|| "Never".to_string(), |at| short_date(Some(at))),
                    ]
                })
                .collect::<Vec<_>>(),
        ),
        CsvCollection::Logs => (
            vec![
                "ID",
                "Project ID",
                "Project Title",
                "Learned",
                "Next Excited",
                "Impact Note",
                "Created At",
            ],
            doc.logs
                .iter()
                .map(|l| {
                    vec![
                        l.id.clone(),
                        l.project_id.clone(),
                        project_title(doc, Some(&l.project_id)),
                        l.learned.clone(),
                        l.next_excited.clone(),
                        l.impact_note.clone(),
                        short_date(Some(l.created_at)),
                    ]
                })
                .collect(),
        ),
        CsvCollection::Wins => (
            vec![
                "ID",
                "Project ID",
                "Project Title",
                "Kind",
                "Note",
                "Created At",
            ],
            doc.wins
                .iter()
                .map(|w| {
                    vec![
                        w.id.clone(),
                        w.project_id.clone(),
                        project_title(doc, Some(&w.project_id)),
                        w.kind.as_str().to_string(),
                        w.note.clone(),
                        short_date(Some(w.created_at)),
                    ]
                })
                .collect(),
        ),
        CsvCollection::Ideas => (
            vec![
                "ID",
                "Project ID",
                "Project Title",
                "Text",
                "Archived At",
                "Promoted To Project ID",
                "Created At",
            ],
            doc.ideas
                .iter()
                .map(|i| {
                    vec![
                        i.id.clone(),
                        i.project_id.clone().unwrap_or_default(),
                        project_title(doc, i.project_id.as_deref()),
                        i.text.clone(),
                        short_date(i.archived_at),
                        i.promoted_to_project_id.clone().unwrap_or_default(),
                        short_date(Some(i.created_at)),
                    ]
                })
                .collect(),
        ),
    };

    let header_row = headers
        .iter()
        .map(|h| escape_field(h))
        .collect::<Vec<_>>()
        .join(",");
    let data_rows = rows
        .iter()
        .map(|row| {
            row.iter()
                .map(|field| escape_field(field))
                .collect::<Vec<_>>()
                .join(",")
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!("{}{}\n{}", BOM, header_row, data_rows)
}

/// Quote a field if it contains a comma, quote or line break
pub fn escape_field(value: &str) -> Cow<'_, str> {
    if value.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}

fn short_date(at: Option<DateTime<Utc>>) -> String {
    at.map(|at| at.format("%b %-d, %Y").to_string())
        .unwrap_or_default()
}

fn project_title(doc: &Document, project_id: Option<&str>) -> String {
    match project_id {
        None => "Unassigned".to_string(),
        Some(id) => doc
            .project(id)
            .map_or_else(|| "Unknown Project".to_string(), |p| p.title.clone()),
    }
}
