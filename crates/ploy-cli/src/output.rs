//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use chrono::{DateTime, Utc};
use serde::Serialize;

use ploy_core::queries::ProjectStats;
use ploy_core::{Idea, LearningLog, Project, Win};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Check if output is in quiet mode
    pub fn is_quiet(&self) -> bool {
        matches!(self.format, OutputFormat::Quiet)
    }

    /// Check if output is JSON
    pub fn is_json(&self) -> bool {
        matches!(self.format, OutputFormat::Json)
    }

    /// Print any serializable value as pretty JSON
    pub fn print_json<T: Serialize + ?Sized>(&self, value: &T) {
        match serde_json::to_string_pretty(value) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Error: could not serialize output: {}", e),
        }
    }

    /// Print a single project with its activity summary
    pub fn print_project(&self, project: &Project, stats: Option<&ProjectStats<'_>>, now: DateTime<Utc>) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:          {}", project.id);
                println!("Title:       {}", project.title);
                println!("Status:      {}", project.status);
                if !project.purpose.is_empty() {
                    println!("Purpose:     {}", project.purpose);
                }
                if !project.values.is_empty() {
                    println!("Values:      {}", project.values.join(", "));
                }
                if !project.beneficiaries.is_empty() {
                    println!("Serves:      {}", project.beneficiaries.join(", "));
                }
                if !project.next_step.is_empty() {
                    println!("Next step:   {}", project.next_step);
                }
                println!(
                    "Cadence:     {} on {} at {} UTC",
                    project.cadence.kind.as_str(),
                    weekday_name(project.cadence.weekday_index()),
                    project.cadence.time_utc
                );
                println!(
                    "Last review: {}",
                    project
                        .last_review_at
                        .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
                        .unwrap_or_else(|| "never".to_string())
                );
                if project.is_review_due(now) {
                    println!("Next review: due now");
                } else {
                    println!(
                        "Next review: {}",
                        project.next_review_at(now).format("%Y-%m-%d %H:%M")
                    );
                }
                if let Some(ref note) = project.reflection_note {
                    println!("Reflection:  {}", note);
                }
                for partner in &project.support_partners {
                    if partner.contact.is_empty() {
                        println!("Partner:     {}", partner.name);
                    } else {
                        println!("Partner:     {} ({})", partner.name, partner.contact);
                    }
                }
                println!("Created:     {}", project.created_at.format("%Y-%m-%d %H:%M"));

                if let Some(stats) = stats {
                    println!();
                    println!(
                        "── Activity: {} log(s), {} win(s) ──",
                        stats.total_logs, stats.total_wins
                    );
                    if let Some(log) = stats.last_log {
                        println!(
                            "Latest log [{}] {}",
                            log.created_at.format("%Y-%m-%d"),
                            truncate_line(&log.learned, 60)
                        );
                    }
                    for win in &stats.recent_wins {
                        println!(
                            "Win [{}] {} - {}",
                            win.created_at.format("%Y-%m-%d"),
                            win.kind.as_str(),
                            truncate_line(&win.note, 50)
                        );
                    }
                }
            }
            OutputFormat::Json => match stats {
                Some(stats) => self.print_json(&serde_json::json!({
                    "project": project,
                    "stats": stats,
                })),
                None => self.print_json(project),
            },
            OutputFormat::Quiet => {
                println!("{}", project.id);
            }
        }
    }

    /// Print a list of projects
    pub fn print_projects(&self, projects: &[&Project], now: DateTime<Utc>) {
        match self.format {
            OutputFormat::Human => {
                if projects.is_empty() {
                    println!("No projects found.");
                    return;
                }
                for project in projects {
                    let due = if project.is_review_due(now) {
                        " [review due]"
                    } else {
                        ""
                    };
                    println!(
                        "{} | {:<6} | {}{}",
                        short_id(&project.id),
                        project.status.as_str(),
                        truncate(&project.title, 45),
                        due
                    );
                }
                println!("\n{} project(s)", projects.len());
            }
            OutputFormat::Json => self.print_json(projects),
            OutputFormat::Quiet => {
                for project in projects {
                    println!("{}", project.id);
                }
            }
        }
    }

    /// Print a list of ideas
    pub fn print_ideas(&self, ideas: &[&Idea]) {
        match self.format {
            OutputFormat::Human => {
                if ideas.is_empty() {
                    println!("No ideas found.");
                    return;
                }
                for idea in ideas {
                    let marker = if idea.promoted_to_project_id.is_some() {
                        " [promoted]"
                    } else if idea.is_archived() {
                        " [archived]"
                    } else {
                        ""
                    };
                    println!(
                        "{} | {}{}",
                        short_id(&idea.id),
                        truncate_line(&idea.text, 60),
                        marker
                    );
                }
                println!("\n{} idea(s)", ideas.len());
            }
            OutputFormat::Json => self.print_json(ideas),
            OutputFormat::Quiet => {
                for idea in ideas {
                    println!("{}", idea.id);
                }
            }
        }
    }

    /// Print learning log entries
    pub fn print_logs(&self, logs: &[&LearningLog]) {
        match self.format {
            OutputFormat::Human => {
                if logs.is_empty() {
                    println!("No learning log entries found.");
                    return;
                }
                for log in logs {
                    println!(
                        "[{}] {} | {}",
                        log.created_at.format("%Y-%m-%d"),
                        short_id(&log.project_id),
                        truncate_line(&log.learned, 60)
                    );
                    if !log.next_excited.is_empty() {
                        println!("             next: {}", truncate_line(&log.next_excited, 55));
                    }
                }
                println!("\n{} entr(ies)", logs.len());
            }
            OutputFormat::Json => self.print_json(logs),
            OutputFormat::Quiet => {
                for log in logs {
                    println!("{}", log.id);
                }
            }
        }
    }

    /// Print wins
    pub fn print_wins(&self, wins: &[&Win]) {
        match self.format {
            OutputFormat::Human => {
                if wins.is_empty() {
                    println!("No wins yet.");
                    return;
                }
                for win in wins {
                    println!(
                        "[{}] {:<9} | {}",
                        win.created_at.format("%Y-%m-%d"),
                        win.kind.as_str(),
                        truncate_line(&win.note, 60)
                    );
                }
                println!("\n{} win(s)", wins.len());
            }
            OutputFormat::Json => self.print_json(wins),
            OutputFormat::Quiet => {
                for win in wins {
                    println!("{}", win.id);
                }
            }
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }
}

/// First eight characters of an id, enough to pass back as a prefix
pub fn short_id(id: &str) -> &str {
    match id.char_indices().nth(8) {
        Some((end, _)) => &id[..end],
        None => id,
    }
}

fn weekday_name(index: u32) -> &'static str {
    const NAMES: [&str; 7] = [
        "Sunday",
        "Monday",
        "Tuesday",
        "Wednesday",
        "Thursday",
        "Friday",
        "Saturday",
    ];
    NAMES[(index % 7) as usize]
}

/// Truncate a string to max length, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Truncate to first line and max length
fn truncate_line(s: &str, max_len: usize) -> String {
    let first_line = s.lines().next().unwrap_or("");
    truncate(first_line, max_len)
}
