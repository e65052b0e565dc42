//! Import command handler

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use ploy_core::{ImportPreview, ImportSummary, MergeStrategy, Store};

use crate::output::{Output, OutputFormat};

/// Preview a backup and, unless `preview_only`, merge it into the journal
pub async fn import(
    store: &mut Store,
    file: PathBuf,
    strategy: MergeStrategy,
    preview_only: bool,
    output: &Output,
) -> Result<()> {
    let text = tokio::fs::read_to_string(&file)
        .await
        .with_context(|| format!("Failed to read backup file: {:?}", file))?;

    let preview = store.preview_import(&text);
    if let ImportPreview::Invalid { ref error } = preview {
        bail!("Cannot import {:?}: {}", file, error);
    }
    let summary = ImportSummary::for_strategy(&preview, strategy);

    if preview_only {
        match output.format {
            OutputFormat::Json => output.print_json(&serde_json::json!({
                "preview": preview,
                "summary": summary,
            })),
            OutputFormat::Quiet => println!("{}", summary.total_conflicts),
            OutputFormat::Human => {
                println!("{}", summary.title);
                println!();
                println!("{}", summary.message);
            }
        }
        return Ok(());
    }

    if output.format == OutputFormat::Human {
        println!("{}", summary.message);
        println!();
    }

    store.import(&text, strategy).await?;

    output.success(&format!(
        "Imported {} item(s) using the '{}' strategy",
        summary.total_items, strategy
    ));
    Ok(())
}
