//! Rollback command — revert the cloud project to a prior version (spec.md §6).

use crate::commands::cloud::load_link;
use crate::sync::RemoteClient;
use anyhow::{Context, Result};
use colored::*;
use std::path::Path;

pub async fn run(path: String, version: u64, verbose: bool) -> Result<()> {
    if verbose {
        println!("{}", "Running rollback in verbose mode".dimmed());
    }

    let link = load_link(Path::new(&path))?;
    let client = RemoteClient::new(&link);
    client
        .rollback(&link.project_id, version)
        .await
        .context("Failed to roll back cloud project")?;

    println!(
        "{} Cloud project rolled back to version {}",
        "✓".green(),
        version
    );
    println!(
        "  {} Run `vaultenv pull` to bring this copy up to date",
        "→".cyan()
    );
    Ok(())
}
