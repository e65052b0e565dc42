//! Export formats
//!
//! - Full backup: pretty-printed JSON of the whole document
//! - CSV: one file per collection, spreadsheet friendly
//! - ICS: recurring review events for active projects

pub mod csv;
pub mod ics;

use chrono::{DateTime, Utc};

use crate::document::{Document, DocumentError};
use crate::id::new_short_id;

pub use self::csv::{export_csv, CsvCollection};
pub use self::ics::{export_ics, export_project_ics, project_ics_filename};

/// Serialize a document as a portable backup
///
/// The copy is stamped with the current time and `device_id`; `doc` itself
/// is left untouched.
pub fn export_document(doc: &Document, device_id: &str) -> Result<String, DocumentError> {
    let mut exported = doc.clone();
    exported.exported_at = Utc::now();
    exported.device_id = device_id.to_string();
    exported.to_json_pretty()
}

/// Build an export filename: `<prefix>-YYYYMMDD-HHMM-<short id>.<ext>`
pub fn export_filename(prefix: &str, extension: &str, now: DateTime<Utc>) -> String {
    format!(
        "{}-{}-{}.{}",
        prefix,
        now.format("%Y%m%d-%H%M"),
        new_short_id(),
        extension
    )
}

/// Lowercase, dash-separated form of `text` for filenames
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;

    for c in text.trim().chars() {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(c.to_lowercase());
        } else if c.is_whitespace() || c == '-' || c == '_' {
            pending_dash = true;
        }
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewProject, Project};
    use chrono::TimeZone;

    #[test]
    fn test_export_document_stamps_copy() {
        let doc = Document::new("old-device").with_project(Project::new(NewProject {
            title: "Kiln".to_string(),
            ..Default::default()
        }));

        let text = export_document(&doc, "this-device").unwrap();
        assert!(text.contains("\n  \"version\""));

        let exported = Document::parse(&text).unwrap();
        assert_eq!(exported.device_id, "this-device");
        assert!(exported.exported_at >= doc.exported_at);
        assert_eq!(exported.projects, doc.projects);
        assert_eq!(doc.device_id, "old-device");
    }

    #[test]
    fn test_export_filename_shape() {
        let now = Utc.with_ymd_and_hms(2025, 3, 7, 9, 5, 0).unwrap();
        let name = export_filename("roys-ploy", "json", now);

        assert!(name.starts_with("roys-ploy-20250307-0905-"));
        assert!(name.ends_with(".json"));
        let short = &name["roys-ploy-20250307-0905-".len()..name.len() - ".json".len()];
        assert_eq!(short.len(), 6);
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("  My Big Project! "), "my-big-project");
        assert_eq!(slugify("a_b--c"), "a-b-c");
        assert_eq!(slugify("???"), "");
    }
}
