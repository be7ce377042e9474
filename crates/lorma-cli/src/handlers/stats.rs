//! Stats command handler.

use anyhow::{Context, Result};

use crate::bootstrap::CliContext;
use crate::presentation::display_dashboard;

/// Show the admin dashboard, as a table or as JSON.
pub async fn execute(ctx: &CliContext, json: bool) -> Result<()> {
    let actor = ctx.login().await?;
    let dashboard = ctx.app().stats().dashboard(&actor).await?;
    if json {
        let rendered =
            serde_json::to_string_pretty(&dashboard).context("Failed to serialize dashboard")?;
        println!("{rendered}");
    } else {
        display_dashboard(&dashboard);
    }
    Ok(())
}
