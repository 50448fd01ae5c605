//! Get command — resolve a single variable, masked unless `--reveal`.

use crate::manifest::ManifestEngine;
use anyhow::{anyhow, Context, Result};
use colored::*;

pub async fn run(
    path: String,
    key: String,
    service: String,
    scope: Option<String>,
    reveal: bool,
    verbose: bool,
) -> Result<()> {
    if verbose {
        println!("{}", "Running get in verbose mode".dimmed());
    }

    let engine = ManifestEngine::open(&path).await.context("Failed to open project")?;
    let vars = engine.get_variables(&service, scope.as_deref())?;

    let value = vars
        .get(&key)
        .ok_or_else(|| anyhow!("not-found: {} is not set", key))?;

    if !reveal || engine.policy().is_protected(&key) {
        println!("{}", "*".repeat(8));
    } else {
        println!("{}", value);
    }
    Ok(())
}
