//! Run command — inject resolved variables into a child process (spec.md §4.5).

use crate::injector::{self, RunOptions};
use crate::manifest::ManifestEngine;
use anyhow::{Context, Result};
use colored::*;

pub async fn run(
    path: String,
    command: String,
    args: Vec<String>,
    service: String,
    scope: Option<String>,
    verbose: bool,
) -> Result<i32> {
    if verbose {
        println!("{}", "Running run in verbose mode".dimmed());
    }

    let engine = ManifestEngine::open(&path).await.context("Failed to open project")?;
    let env = engine.get_variables(&service, scope.as_deref())?;

    let opts = RunOptions {
        env,
        cwd: Some(std::path::PathBuf::from(&path)),
    };

    let code = injector::run(&command, &args, opts)
        .await
        .context("Failed to run child process")?;
    Ok(code)
}
