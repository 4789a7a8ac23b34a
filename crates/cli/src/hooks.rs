//! Post-deploy hook execution.
//!
//! A deploy can hand the terminal back with a caller-supplied shell
//! command once the browser session is torn down: refocusing a window,
//! tailing hub logs, firing a notification. The hook runs on success
//! and on failure alike, and its own failures are logged, never fatal.

use anyhow::Context as _;
use tracing::{info, warn};

/// Runs `command` through the shell, logging the outcome.
pub async fn run_post_hook(command: &str) {
	info!(target = "hubpush", command, "running post-hook");
	match shell(command).await {
		Ok(status) if status.success() => {}
		Ok(status) => {
			warn!(target = "hubpush", command, code = ?status.code(), "post-hook exited nonzero");
		}
		Err(e) => {
			warn!(target = "hubpush", command, error = %e, "post-hook failed to run");
		}
	}
}

async fn shell(command: &str) -> anyhow::Result<std::process::ExitStatus> {
	#[cfg(not(windows))]
	let mut cmd = {
		let mut cmd = tokio::process::Command::new("sh");
		cmd.arg("-c").arg(command);
		cmd
	};
	#[cfg(windows)]
	let mut cmd = {
		let mut cmd = tokio::process::Command::new("cmd");
		cmd.arg("/C").arg(command);
		cmd
	};

	cmd.status().await.context("failed to spawn shell")
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	#[cfg(unix)]
	async fn shell_reports_exit_status() {
		assert!(shell("true").await.unwrap().success());
		assert_eq!(shell("exit 3").await.unwrap().code(), Some(3));
	}

	#[tokio::test]
	async fn failing_hook_does_not_panic() {
		run_post_hook("definitely-not-a-real-command-7d0c").await;
	}
}
