//! Rm command — remove a variable.

use crate::manifest::ManifestEngine;
use anyhow::{Context, Result};
use colored::*;

pub async fn run(path: String, key: String, service: String, scope: Option<String>, verbose: bool) -> Result<()> {
    if verbose {
        println!("{}", "Running rm in verbose mode".dimmed());
    }

    let mut engine = ManifestEngine::open(&path).await.context("Failed to open project")?;
    let removed = engine.remove_variable(&key, &service, scope.as_deref())?;

    if removed {
        engine.save().await.context("Failed to save manifest")?;
        println!("{} Removed {}", "✓".green(), key.bold());
    } else {
        println!("{} {} was not set", "⚠️".yellow(), key.bold());
    }
    Ok(())
}
