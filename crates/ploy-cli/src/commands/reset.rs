//! Reset command handler

use anyhow::{bail, Result};

use ploy_core::Store;

use crate::output::Output;

/// Erase the journal, keeping only the device id
pub async fn reset(store: &mut Store, yes: bool, output: &Output) -> Result<()> {
    if !yes {
        bail!(
            "This permanently erases {} item(s) on this device.\n\
             Export a backup first with `ploy export json`, then re-run with --yes.",
            store.document().entity_count()
        );
    }

    store.reset().await?;

    output.success("Journal erased; starting fresh");
    Ok(())
}
