//! Set command — write a variable, validated and policy-checked.

use crate::manifest::ManifestEngine;
use anyhow::{Context, Result};
use colored::*;

pub async fn run(
    path: String,
    key: String,
    value: String,
    service: String,
    scope: Option<String>,
    verbose: bool,
) -> Result<()> {
    if verbose {
        println!("{}", "Running set in verbose mode".dimmed());
    }

    let mut engine = ManifestEngine::open(&path).await.context("Failed to open project")?;
    engine.set_variable(&key, &value, &service, scope.as_deref())?;
    engine.save().await.context("Failed to save manifest")?;

    println!("{} Set {} in {}", "✓".green(), key.bold(), service);
    Ok(())
}
