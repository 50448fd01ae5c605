//! Process Injector (SPEC_FULL.md §4.5): spawn a child with a merged
//! environment, forward a fixed signal set, propagate its exit status.
//!
//! Grounded on `blocksense-network-agent-harbor`'s `ah-tui/src/record.rs`
//! (`tokio::signal::unix::signal(SignalKind::interrupt())` /
//! `SignalKind::terminate()`) for the signal half, and the teacher's
//! `std::process::Command` usage (seen throughout `utils::git`) for the
//! spawn half — combined into an async `tokio::process::Command` child
//! raced against the forwarded signal streams via `tokio::select!`.

use crate::error::{CoreError, CoreResult};
use std::collections::HashMap;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;

#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};

/// Options for a single injected-process run.
#[derive(Default)]
pub struct RunOptions {
    pub env: HashMap<String, String>,
    pub cwd: Option<PathBuf>,
}

/// Spawn `command` with `args`, merging `opts.env` over the parent's
/// environment (right side wins), forward {interrupt, terminate, hangup}
/// while the child is alive, and return the process's exit code —
/// `128 + signal` on signalled death (interrupt → 130, terminate → 143,
/// hangup → 129, other → 128).
pub async fn run(command: &str, args: &[String], opts: RunOptions) -> CoreResult<i32> {
    let mut cmd = Command::new(command);
    cmd.args(args)
        .envs(opts.env)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());
    if let Some(cwd) = &opts.cwd {
        cmd.current_dir(cwd);
    }

    let mut child = cmd.spawn().map_err(|source| CoreError::SpawnFailed {
        command: command.to_string(),
        source,
    })?;

    #[cfg(unix)]
    {
        let mut sigint = signal(SignalKind::interrupt()).map_err(|source| CoreError::SpawnFailed {
            command: command.to_string(),
            source,
        })?;
        let mut sigterm = signal(SignalKind::terminate()).map_err(|source| CoreError::SpawnFailed {
            command: command.to_string(),
            source,
        })?;
        let mut sighup = signal(SignalKind::hangup()).map_err(|source| CoreError::SpawnFailed {
            command: command.to_string(),
            source,
        })?;

        loop {
            tokio::select! {
                status = child.wait() => {
                    return Ok(exit_status_to_code(status));
                }
                _ = sigint.recv() => {
                    forward_signal(&child, "INT");
                }
                _ = sigterm.recv() => {
                    forward_signal(&child, "TERM");
                }
                _ = sighup.recv() => {
                    forward_signal(&child, "HUP");
                }
            }
        }
    }

    #[cfg(not(unix))]
    {
        let status = child.wait().await;
        Ok(exit_status_to_code(status))
    }
}

#[cfg(unix)]
fn forward_signal(child: &tokio::process::Child, which: &str) {
    if let Some(pid) = child.id() {
        let sig = match which {
            "INT" => libc::SIGINT,
            "TERM" => libc::SIGTERM,
            _ => libc::SIGHUP,
        };
        unsafe {
            libc::kill(pid as i32, sig);
        }
    }
}

fn exit_status_to_code(status: std::io::Result<std::process::ExitStatus>) -> i32 {
    match status {
        Ok(status) => {
            if let Some(code) = status.code() {
                return code;
            }
            #[cfg(unix)]
            {
                use std::os::unix::process::ExitStatusExt;
                if let Some(signal) = status.signal() {
                    return 128 + signal;
                }
            }
            128
        }
        Err(_) => 128,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn exit_code_propagates() {
        let code = run("sh", &["-c".to_string(), "exit 42".to_string()], RunOptions::default())
            .await
            .unwrap();
        assert_eq!(code, 42);
    }

    #[tokio::test]
    async fn env_is_merged_and_visible_to_child() {
        let mut env = HashMap::new();
        env.insert("VAULTENV_TEST_VAR".to_string(), "Y".to_string());
        let code = run(
            "sh",
            &["-c".to_string(), "[ \"$VAULTENV_TEST_VAR\" = \"Y\" ]".to_string()],
            RunOptions {
                env,
                cwd: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(code, 0);
    }

    #[tokio::test]
    async fn spawn_failure_surfaces_as_spawn_failed() {
        let err = run("definitely-not-a-real-binary", &[], RunOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::SpawnFailed { .. }));
    }
}
