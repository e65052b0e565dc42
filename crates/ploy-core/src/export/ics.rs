//! iCalendar export of project reviews
//!
//! Each project becomes a weekly recurring `VEVENT` starting at the next
//! occurrence of its review cadence.

use chrono::{DateTime, Utc};

use super::slugify;
use crate::document::Document;
use crate::models::{Project, ProjectStatus};

const DAY_CODES: [&str; 7] = ["SU", "MO", "TU", "WE", "TH", "FR", "SA"];

/// Calendar with one review event per active project in `doc`
pub fn export_ics(doc: &Document, now: DateTime<Utc>) -> String {
    let active = doc
        .projects
        .iter()
        .filter(|p| p.status == ProjectStatus::Active);
    calendar(active, now)
}

/// Calendar holding the review event of a single project
pub fn export_project_ics(project: &Project, now: DateTime<Utc>) -> String {
    calendar(std::iter::once(project), now)
}

/// `review-<slug>.ics`
pub fn project_ics_filename(project: &Project) -> String {
    format!("review-{}.ics", slugify(&project.title))
}

fn calendar<'a>(projects: impl Iterator<Item = &'a Project>, now: DateTime<Utc>) -> String {
    let mut lines = vec![
        "BEGIN:VCALENDAR".to_string(),
        "VERSION:2.0".to_string(),
        "PRODID:-//Roy's Ploy//EN".to_string(),
        "CALSCALE:GREGORIAN".to_string(),
        "METHOD:PUBLISH".to_string(),
    ];
    for project in projects {
        lines.extend(event(project, now));
    }
    lines.push("END:VCALENDAR".to_string());

    let mut out = lines.join("\r\n");
    out.push_str("\r\n");
    out
}

fn event(project: &Project, now: DateTime<Utc>) -> Vec<String> {
    let start = project.next_review_at(now);
    let day = DAY_CODES[project.cadence.weekday_index() as usize];
    let description = [
        format!("Purpose: {}", or_not_set(&project.purpose)),
        String::new(),
        format!("Next Step: {}", or_not_set(&project.next_step)),
        String::new(),
        "Reflect on what you learned this week.".to_string(),
    ]
    .join("\n");

    vec![
        "BEGIN:VEVENT".to_string(),
        format!("UID:rp-review-{}@roysploy.local", project.id),
        format!("DTSTAMP:{}", ics_timestamp(now)),
        format!("DTSTART:{}", ics_timestamp(start)),
        format!("RRULE:FREQ=WEEKLY;BYDAY={}", day),
        format!("SUMMARY:{}", escape_text(&format!("Weekly Review: {}", project.title))),
        format!("DESCRIPTION:{}", escape_text(&description)),
        "LOCATION:".to_string(),
        "STATUS:CONFIRMED".to_string(),
        "TRANSP:OPAQUE".to_string(),
        "END:VEVENT".to_string(),
    ]
}

fn or_not_set(value: &str) -> &str {
    if value.trim().is_empty() {
        "Not set"
    } else {
        value
    }
}

fn ics_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y%m%dT%H%M%SZ").to_string()
}

/// Escape a TEXT value (backslash, semicolon, comma, newline)
fn escape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Cadence, CadenceType, NewProject};
    use chrono::TimeZone;

    fn project(title: &str, day_of_week: u8) -> Project {
        Project::new(NewProject {
            title: title.to_string(),
            purpose: "grow food".to_string(),
            cadence: Cadence {
                kind: CadenceType::Weekly,
                day_of_week,
                time_utc: "18:30".to_string(),
            },
            ..Default::default()
        })
    }

    #[test]
    fn test_one_event_per_active_project() {
        let active = project("Garden", 3);
        let paused = project("Paused", 1).with_status(ProjectStatus::Paused, None);
        let doc = Document::new("d")
            .with_project(active.clone())
            .with_project(paused);

        // Monday 2025-03-03 10:00 UTC
        let now = Utc.with_ymd_and_hms(2025, 3, 3, 10, 0, 0).unwrap();
        let ics = export_ics(&doc, now);

        assert!(ics.starts_with("BEGIN:VCALENDAR\r\n"));
        assert!(ics.ends_with("END:VCALENDAR\r\n"));
        assert_eq!(ics.matches("BEGIN:VEVENT").count(), 1);
        assert!(ics.contains(&format!("UID:rp-review-{}@roysploy.local\r\n", active.id)));
        assert!(ics.contains("RRULE:FREQ=WEEKLY;BYDAY=WE\r\n"));
        // Next Wednesday at 18:30
        assert!(ics.contains("DTSTART:20250305T183000Z\r\n"));
        assert!(ics.contains("DTSTAMP:20250303T100000Z\r\n"));
        assert!(ics.contains("SUMMARY:Weekly Review: Garden\r\n"));
        assert!(ics.contains(
            "DESCRIPTION:Purpose: grow food\\n\\nNext Step: Not set\\n\\nReflect on what you learned this week.\r\n"
        ));
    }

    #[test]
    fn test_text_is_escaped() {
        let p = project("Soil; compost, worms", 0);
        let ics = export_project_ics(&p, Utc::now());
        assert!(ics.contains("SUMMARY:Weekly Review: Soil\\; compost\\, worms\r\n"));
    }

    #[test]
    fn test_empty_calendar() {
        let ics = export_ics(&Document::new("d"), Utc::now());
        assert!(!ics.contains("VEVENT"));
        assert!(ics.contains("PRODID:-//Roy's Ploy//EN"));
    }

    #[test]
    fn test_project_filename() {
        assert_eq!(
            project_ics_filename(&project("My Garden!", 0)),
            "review-my-garden.ics"
        );
    }
}
