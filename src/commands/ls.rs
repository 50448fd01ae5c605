//! Ls command — list every resolved variable for a service/scope.

use crate::manifest::ManifestEngine;
use anyhow::{Context, Result};
use colored::*;

pub async fn run(path: String, service: String, scope: Option<String>, reveal: bool, verbose: bool) -> Result<()> {
    if verbose {
        println!("{}", "Running ls in verbose mode".dimmed());
    }

    let engine = ManifestEngine::open(&path).await.context("Failed to open project")?;
    let vars = engine.get_variables(&service, scope.as_deref())?;

    let mut keys: Vec<_> = vars.keys().collect();
    keys.sort();

    if keys.is_empty() {
        println!("{} No variables set for {}", "ℹ️".cyan(), service);
        return Ok(());
    }

    for key in keys {
        let masked = reveal && !engine.policy().is_protected(key);
        let display = if masked {
            vars[key].clone()
        } else {
            "*".repeat(8)
        };
        println!("  {} = {}", key.bold(), display.dimmed());
    }
    Ok(())
}
