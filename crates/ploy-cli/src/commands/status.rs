//! Status command handler

use anyhow::Result;
use chrono::Utc;

use ploy_core::Store;

use crate::output::{Output, OutputFormat};

/// Show status information
pub fn show(store: &Store, output: &Output) -> Result<()> {
    let stats = store.storage_stats()?;
    let config = store.config();
    let doc = store.document();
    let counts = doc.overall_stats();
    let now = Utc::now();
    let reviews_due = doc.projects_due_for_review(now).len();
    let backup_due = doc.should_show_backup_reminder(now);

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "device_id": store.device_id(),
                    "load_status": store.load_status().describe(),
                    "schema_version": doc.schema_version,
                    "saved_at": doc.exported_at,
                    "counts": counts,
                    "reflections": doc.quarterly_reflections.len(),
                    "reviews_due": reviews_due,
                    "backup": {
                        "last_backup_at": doc.settings.last_backup_at,
                        "reminder": backup_due
                    },
                    "storage": {
                        "data_dir": config.data_dir,
                        "primary_size": stats.primary_size,
                        "backup_size": stats.backup_size,
                        "total_size": stats.total_size,
                        "capacity": stats.capacity,
                        "percent_used": stats.percent_used
                    }
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", store.device_id());
        }
        OutputFormat::Human => {
            println!("Ploy Status");
            println!("===========");
            println!();
            println!("Device:   {}", store.device_id());
            println!("Journal:  {}", store.load_status().describe());
            println!("Schema:   v{}", doc.schema_version);
            println!("Saved:    {}", doc.exported_at.format("%Y-%m-%d %H:%M UTC"));
            println!();
            println!("Contents:");
            println!(
                "  Projects: {} ({} active, {} paused, {} done)",
                counts.total_projects,
                counts.active_projects,
                counts.paused_projects,
                counts.done_projects
            );
            println!(
                "  Ideas:    {} ({} open)",
                counts.total_ideas, counts.active_ideas
            );
            println!("  Logs:     {}", counts.total_logs);
            println!("  Wins:     {}", counts.total_wins);
            if let Some(current) = doc.current_reflection() {
                println!("  Quarter:  {}", current.quarter_label);
            }
            println!();
            println!("Reviews due: {}", reviews_due);
            println!(
                "Last backup: {}",
                doc.settings
                    .last_backup_at
                    .map(|at| at.format("%Y-%m-%d").to_string())
                    .unwrap_or_else(|| "never".to_string())
            );
            println!();
            println!("Storage:");
            println!("  Location: {}", config.data_dir.display());
            println!("  Size:     {}", stats.total_size_human());
            println!(
                "  Usage:    {:.1}% of {}",
                stats.percent_used,
                ploy_core::storage::persistence::format_bytes(stats.capacity)
            );
        }
    }

    Ok(())
}
