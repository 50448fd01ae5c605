//! History command — list cloud manifest versions (spec.md §6).

use crate::commands::cloud::load_link;
use crate::sync::RemoteClient;
use anyhow::{Context, Result};
use colored::*;
use std::path::Path;

pub async fn run(path: String, verbose: bool) -> Result<()> {
    if verbose {
        println!("{}", "Running history in verbose mode".dimmed());
    }

    let link = load_link(Path::new(&path))?;
    let client = RemoteClient::new(&link);
    let entries = client
        .fetch_history(&link.project_id)
        .await
        .context("Failed to fetch history")?;

    if entries.is_empty() {
        println!("{} No history recorded for this project", "i".cyan());
        return Ok(());
    }

    println!("{:<10} {:<25} {:<20} {}", "VERSION".bold(), "UPDATED AT".bold(), "UPDATED BY".bold(), "KEY FINGERPRINT".bold());
    for entry in entries {
        println!(
            "{:<10} {:<25} {:<20} {}",
            entry.version, entry.updated_at, entry.updated_by, entry.key_fingerprint
        );
    }
    Ok(())
}
