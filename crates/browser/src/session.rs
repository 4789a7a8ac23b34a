//! Browser session lifecycle.
//!
//! A [`Session`] owns the browser process, its temporary profile, and the
//! DevTools connection to one page. Sessions are scoped resources: each
//! top-level operation launches its own and must close it before the
//! process exits, success or failure.

use std::sync::Arc;
use std::time::Duration;

use hubpush_cdp::{TargetInfo, VersionInfo};
use tempfile::TempDir;
use tokio::process::Child;
use tracing::{debug, warn};

use crate::connection::Connection;
use crate::error::{Error, Result};
use crate::launcher::{self, LaunchOptions, LaunchedBrowser};
use crate::page::Page;

/// Timeout for the `/json/list` target fetch.
const TARGET_FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// A running browser with one attached page.
pub struct Session {
	child: Child,
	connection: Arc<Connection>,
	page: Page,
	/// Held for its Drop: removes the temporary profile directory.
	_profile_dir: TempDir,
}

impl Session {
	/// Launches a browser and attaches to its initial page target.
	pub async fn launch(options: &LaunchOptions) -> Result<Self> {
		let LaunchedBrowser {
			mut child,
			profile_dir,
			ws_url,
		} = launcher::launch(options).await?;

		let base = launcher::http_base_url(&ws_url)?;

		let attach = async {
			let client = reqwest::Client::builder()
				.timeout(TARGET_FETCH_TIMEOUT)
				.build()?;
			if let Ok(version) = fetch_version(&client, &base).await {
				debug!(
					browser = %version.browser,
					protocol = %version.protocol_version,
					"DevTools endpoint up"
				);
			}
			let targets = fetch_targets(&client, &base).await?;
			let page_ws = pick_page_target(&targets).ok_or(Error::NoPageTarget)?;
			let connection = Arc::new(Connection::connect(&page_ws).await?);
			let page = Page::new(Arc::clone(&connection));
			page.enable_domains().await?;
			Ok::<_, Error>((connection, page))
		};

		let (connection, page) = match attach.await {
			Ok(parts) => parts,
			Err(e) => {
				let _ = child.kill().await;
				return Err(e);
			}
		};

		debug!("browser session ready");

		Ok(Self {
			child,
			connection,
			page,
			_profile_dir: profile_dir,
		})
	}

	/// The attached page.
	pub fn page(&self) -> &Page {
		&self.page
	}

	/// Closes the connection and kills the browser process.
	///
	/// Consumes the session; the temporary profile is removed when the
	/// session drops.
	pub async fn close(mut self) {
		self.connection.close().await;
		if let Err(e) = self.child.kill().await {
			warn!(error = %e, "failed to kill browser process");
		}
	}
}

/// Fetches browser metadata from the discovery endpoint. Diagnostics
/// only; attach proceeds without it.
async fn fetch_version(client: &reqwest::Client, base: &str) -> Result<VersionInfo> {
	let version = client
		.get(format!("{base}/json/version"))
		.send()
		.await?
		.error_for_status()?
		.json::<VersionInfo>()
		.await?;
	Ok(version)
}

/// Fetches the target list from the browser's HTTP discovery endpoint.
async fn fetch_targets(client: &reqwest::Client, base: &str) -> Result<Vec<TargetInfo>> {
	let targets = client
		.get(format!("{base}/json/list"))
		.send()
		.await?
		.error_for_status()?
		.json::<Vec<TargetInfo>>()
		.await?;
	Ok(targets)
}

/// Picks the WebSocket URL of the first attachable page target. The fresh
/// `about:blank` tab the launcher opened is preferred over anything the
/// profile restored.
fn pick_page_target(targets: &[TargetInfo]) -> Option<String> {
	targets
		.iter()
		.filter(|t| t.is_page() && t.web_socket_debugger_url.is_some())
		.max_by_key(|t| t.url == "about:blank")
		.and_then(|t| t.web_socket_debugger_url.clone())
}

#[cfg(test)]
mod tests {
	use super::*;

	fn page_target(url: &str, ws: Option<&str>) -> TargetInfo {
		TargetInfo {
			id: "T1".to_string(),
			title: String::new(),
			target_type: "page".to_string(),
			url: url.to_string(),
			description: None,
			devtools_frontend_url: None,
			web_socket_debugger_url: ws.map(str::to_string),
		}
	}

	#[test]
	fn prefers_the_blank_tab() {
		let targets = vec![
			page_target("http://example.com/restored", Some("ws://h/devtools/page/A")),
			page_target("about:blank", Some("ws://h/devtools/page/B")),
		];
		assert_eq!(
			pick_page_target(&targets).as_deref(),
			Some("ws://h/devtools/page/B")
		);
	}

	#[test]
	fn falls_back_to_any_attachable_page() {
		let targets = vec![page_target(
			"http://example.com",
			Some("ws://h/devtools/page/A"),
		)];
		assert_eq!(
			pick_page_target(&targets).as_deref(),
			Some("ws://h/devtools/page/A")
		);
	}

	#[test]
	fn skips_targets_without_a_debugger_url() {
		let mut busy = page_target("about:blank", None);
		busy.target_type = "page".to_string();
		let worker = TargetInfo {
			id: "W1".to_string(),
			title: String::new(),
			target_type: "service_worker".to_string(),
			url: "chrome://sw".to_string(),
			description: None,
			devtools_frontend_url: None,
			web_socket_debugger_url: Some("ws://h/devtools/page/W".to_string()),
		};
		assert_eq!(pick_page_target(&[busy, worker]), None);
	}
}
