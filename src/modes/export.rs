use anyhow::{Context, Result};
use tracing::info;

use crate::storage::ScoreKeeper;

/// Headless export: write both leaderboard documents and print their paths
pub fn run_export(keeper: &ScoreKeeper) -> Result<()> {
    let html = keeper.export_html().context("Failed to export HTML leaderboard")?;
    let json = keeper.export_json().context("Failed to export JSON leaderboard")?;

    info!(html = %html.display(), json = %json.display(), "headless export done");
    println!("{}", html.display());
    println!("{}", json.display());
    Ok(())
}
