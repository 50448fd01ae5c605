//! Rotate command — re-encrypt the manifest under a fresh key.

use crate::manifest::ManifestEngine;
use anyhow::{Context, Result};
use colored::*;

pub async fn run(path: String, verbose: bool) -> Result<()> {
    if verbose {
        println!("{}", "Running rotate in verbose mode".dimmed());
    }

    let mut engine = ManifestEngine::open(&path).await.context("Failed to open project")?;
    let outcome = engine.rotate(None)?;

    println!("{} Key rotated", "✓".green());
    println!("  {} old fingerprint: {}", "→".cyan(), outcome.old_key_fingerprint);
    println!("  {} new fingerprint: {}", "→".cyan(), outcome.new_key_fingerprint);
    Ok(())
}
