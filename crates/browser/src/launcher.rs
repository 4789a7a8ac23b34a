//! Browser process management.
//!
//! Locates a Chromium-family executable and launches it with a DevTools
//! endpoint on an ephemeral port. The endpoint URL is learned from the
//! `DevTools listening on ws://...` line the browser prints to stderr,
//! which avoids racing for a free port number.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use tempfile::TempDir;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, ChildStderr, Command};
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// How long to wait for the browser to announce its DevTools endpoint.
pub const LAUNCH_TIMEOUT: Duration = Duration::from_secs(20);

/// Automation-friendly flags passed on every launch.
///
/// The set matches what the major driver projects use: first-run dialogs,
/// background throttling, crash reporting, sync, and keychain prompts are
/// all disabled so a fresh profile comes up ready to be driven.
static DEFAULT_ARGS: [&str; 23] = [
	"--disable-background-networking",
	"--enable-features=NetworkService,NetworkServiceInProcess",
	"--disable-background-timer-throttling",
	"--disable-backgrounding-occluded-windows",
	"--disable-breakpad",
	"--disable-client-side-phishing-detection",
	"--disable-component-extensions-with-background-pages",
	"--disable-default-apps",
	"--disable-dev-shm-usage",
	"--disable-extensions",
	"--disable-features=TranslateUI",
	"--disable-hang-monitor",
	"--disable-ipc-flooding-protection",
	"--disable-popup-blocking",
	"--disable-prompt-on-repost",
	"--disable-renderer-backgrounding",
	"--disable-sync",
	"--force-color-profile=srgb",
	"--metrics-recording-only",
	"--no-first-run",
	"--enable-automation",
	"--password-store=basic",
	"--use-mock-keychain",
];

/// Executable names checked on `PATH` when `CHROME` is not set.
const CANDIDATE_NAMES: [&str; 7] = [
	"google-chrome-stable",
	"google-chrome",
	"chromium",
	"chromium-browser",
	"chrome",
	"microsoft-edge",
	"msedge",
];

/// Options controlling how the browser is launched.
#[derive(Debug, Clone, Default)]
pub struct LaunchOptions {
	/// Run without a visible window.
	pub headless: bool,
	/// Explicit executable path, overriding detection.
	pub executable: Option<PathBuf>,
}

/// A running browser process with its DevTools endpoint.
pub struct LaunchedBrowser {
	/// Child process handle. Killed on drop as a backstop; sessions kill
	/// it explicitly on close.
	pub child: Child,
	/// Temporary profile directory, removed when dropped.
	pub profile_dir: TempDir,
	/// Browser-level `ws://host:port/devtools/browser/...` endpoint.
	pub ws_url: String,
}

/// Locates a Chromium-family executable.
///
/// Checks in order:
/// 1. `CHROME` environment variable (runtime override)
/// 2. Well-known executable names on `PATH`
///
/// # Errors
///
/// Returns [`Error::ExecutableNotFound`] when no candidate resolves.
pub fn default_executable() -> Result<PathBuf> {
	if let Ok(value) = std::env::var("CHROME") {
		let path = PathBuf::from(value);
		if path.exists() {
			return Ok(path);
		}
		warn!(
			path = %path.display(),
			"CHROME is set but does not point at an executable; scanning PATH"
		);
	}

	for name in CANDIDATE_NAMES {
		if let Ok(path) = which::which(name) {
			return Ok(path);
		}
	}

	Err(Error::ExecutableNotFound)
}

/// Spawns the browser and waits for it to announce its DevTools endpoint.
pub async fn launch(options: &LaunchOptions) -> Result<LaunchedBrowser> {
	let executable = match &options.executable {
		Some(path) => path.clone(),
		None => default_executable()?,
	};

	let profile_dir = TempDir::new()?;

	let mut cmd = Command::new(&executable);
	cmd.args(DEFAULT_ARGS);
	cmd.arg(format!("--user-data-dir={}", profile_dir.path().display()));
	cmd.arg("--remote-debugging-port=0");
	if options.headless {
		cmd.arg("--headless=new");
		cmd.arg("--hide-scrollbars");
		cmd.arg("--mute-audio");
	}
	cmd.arg("about:blank");
	cmd.stdin(Stdio::null())
		.stdout(Stdio::null())
		.stderr(Stdio::piped())
		.kill_on_drop(true);

	debug!(
		executable = %executable.display(),
		headless = options.headless,
		"launching browser"
	);

	let mut child = cmd
		.spawn()
		.map_err(|e| Error::LaunchFailed(format!("{}: {e}", executable.display())))?;

	let stderr = child
		.stderr
		.take()
		.ok_or_else(|| Error::LaunchFailed("child stderr was not captured".to_string()))?;

	let ws_url = match tokio::time::timeout(LAUNCH_TIMEOUT, ws_url_from_stderr(stderr)).await {
		Ok(result) => result?,
		Err(_) => {
			let _ = child.kill().await;
			return Err(Error::LaunchTimeout {
				timeout_ms: LAUNCH_TIMEOUT.as_millis() as u64,
			});
		}
	};

	debug!(ws_url = %ws_url, "browser ready");

	Ok(LaunchedBrowser {
		child,
		profile_dir,
		ws_url,
	})
}

/// Reads stderr lines until the endpoint announcement appears.
async fn ws_url_from_stderr(stderr: ChildStderr) -> Result<String> {
	let mut lines = BufReader::new(stderr).lines();
	while let Some(line) = lines.next_line().await? {
		debug!(line = %line, "browser stderr");
		if let Some(url) = parse_ws_url(&line) {
			return Ok(url);
		}
	}
	Err(Error::LaunchFailed(
		"browser exited before announcing its DevTools endpoint".to_string(),
	))
}

/// Extracts the WebSocket URL from a `DevTools listening on ...` line.
fn parse_ws_url(line: &str) -> Option<String> {
	let (_, url) = line.rsplit_once("listening on ")?;
	let url = url.trim();
	(url.starts_with("ws://") && url.contains("/devtools/browser/")).then(|| url.to_string())
}

/// Derives the `http://host:port` base of the discovery endpoints from
/// the browser WebSocket URL.
pub fn http_base_url(ws_url: &str) -> Result<String> {
	let parsed = url::Url::parse(ws_url)
		.map_err(|e| Error::ProtocolError(format!("invalid DevTools URL '{ws_url}': {e}")))?;
	let host = parsed
		.host_str()
		.ok_or_else(|| Error::ProtocolError(format!("DevTools URL '{ws_url}' has no host")))?;
	let port = parsed
		.port()
		.ok_or_else(|| Error::ProtocolError(format!("DevTools URL '{ws_url}' has no port")))?;
	Ok(format!("http://{host}:{port}"))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_ws_url_from_real_chrome_banner() {
		let line = "DevTools listening on ws://127.0.0.1:33459/devtools/browser/8a5bd4e5-90a1-4a6c-a3b7-0f6dd4a2b001";
		assert_eq!(
			parse_ws_url(line).as_deref(),
			Some("ws://127.0.0.1:33459/devtools/browser/8a5bd4e5-90a1-4a6c-a3b7-0f6dd4a2b001")
		);
	}

	#[test]
	fn ignores_unrelated_stderr_lines() {
		assert!(parse_ws_url("[1234:1234:0825/120000.000000:ERROR:gpu_init.cc] gpu init failed").is_none());
		assert!(parse_ws_url("Opening in existing browser session.").is_none());
		// Page-level endpoints are not the browser endpoint.
		assert!(parse_ws_url("listening on ws://127.0.0.1:9222/devtools/page/AB12").is_none());
	}

	#[test]
	fn http_base_drops_the_devtools_path() {
		let base = http_base_url("ws://127.0.0.1:33459/devtools/browser/8a5b").unwrap();
		assert_eq!(base, "http://127.0.0.1:33459");
	}

	#[test]
	fn http_base_rejects_urls_without_port() {
		assert!(http_base_url("ws://localhost/devtools/browser/8a5b").is_err());
	}

	#[test]
	fn finds_some_executable_or_reports_cleanly() {
		match default_executable() {
			Ok(path) => assert!(path.exists()),
			Err(Error::ExecutableNotFound) => {}
			Err(e) => panic!("Unexpected error: {e:?}"),
		}
	}
}
