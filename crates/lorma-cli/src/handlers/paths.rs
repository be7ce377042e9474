//! Paths command handler.
//!
//! Prints where data, the database and the `.env` file live.

use anyhow::Result;

use lorma_core::paths::{data_root, env_file_path};

use crate::bootstrap::CliContext;

pub fn execute(ctx: &CliContext) -> Result<()> {
    let env_file = env_file_path()?;

    println!("Data root: {}", data_root()?.display());
    println!("Database:  {}", ctx.database_path.display());
    println!(
        "Env file:  {}{}",
        env_file.display(),
        if env_file.exists() { "" } else { " (not created yet)" }
    );
    Ok(())
}
