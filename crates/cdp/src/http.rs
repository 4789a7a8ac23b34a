//! Types for the browser's HTTP discovery endpoints.
//!
//! Before the WebSocket is opened, the browser exposes a small HTTP API on
//! its debugging port: `GET /json/version` describes the browser itself and
//! `GET /json/list` enumerates the debuggable targets (pages, workers,
//! extensions). Field names follow Chrome's JSON exactly, including the
//! `Hyphen-Case` keys in the version payload.

use serde::{Deserialize, Serialize};

/// Browser metadata returned by `GET /json/version`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionInfo {
	/// Browser product and version (e.g. `"Chrome/126.0.6478.126"`).
	#[serde(rename = "Browser")]
	pub browser: String,
	/// DevTools protocol version (e.g. `"1.3"`).
	#[serde(rename = "Protocol-Version")]
	pub protocol_version: String,
	/// Full user agent string.
	#[serde(rename = "User-Agent")]
	pub user_agent: String,
	/// V8 engine version.
	#[serde(rename = "V8-Version", default)]
	pub v8_version: Option<String>,
	/// WebKit version string.
	#[serde(rename = "WebKit-Version", default)]
	pub webkit_version: Option<String>,
	/// WebSocket URL of the browser-level debugging endpoint.
	#[serde(rename = "webSocketDebuggerUrl")]
	pub web_socket_debugger_url: String,
}

/// One debuggable target returned by `GET /json/list`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetInfo {
	/// Opaque target identifier.
	pub id: String,
	/// Page title (may be empty for fresh tabs).
	#[serde(default)]
	pub title: String,
	/// Target kind: `"page"`, `"iframe"`, `"service_worker"`, ...
	#[serde(rename = "type")]
	pub target_type: String,
	/// URL currently loaded in the target.
	#[serde(default)]
	pub url: String,
	/// Human-readable description, when the browser provides one.
	#[serde(default)]
	pub description: Option<String>,
	/// DevTools frontend URL for opening the target in the inspector UI.
	#[serde(default)]
	pub devtools_frontend_url: Option<String>,
	/// WebSocket URL for attaching to this target directly. Absent when
	/// another client is already attached.
	#[serde(default)]
	pub web_socket_debugger_url: Option<String>,
}

impl TargetInfo {
	/// Returns true for top-level page targets (the only kind this tool
	/// attaches to).
	pub fn is_page(&self) -> bool {
		self.target_type == "page"
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn version_info_parses_chrome_payload() {
		let json = r#"{
			"Browser": "Chrome/126.0.6478.126",
			"Protocol-Version": "1.3",
			"User-Agent": "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36",
			"V8-Version": "12.6.228.28",
			"WebKit-Version": "537.36 (@a2478e5)",
			"webSocketDebuggerUrl": "ws://127.0.0.1:33459/devtools/browser/8a5b-12"
		}"#;

		let info: VersionInfo = serde_json::from_str(json).unwrap();
		assert_eq!(info.protocol_version, "1.3");
		assert!(info.browser.starts_with("Chrome/"));
		assert!(info.web_socket_debugger_url.contains("/devtools/browser/"));
	}

	#[test]
	fn target_list_parses_and_identifies_pages() {
		let json = r#"[
			{
				"description": "",
				"devtoolsFrontendUrl": "/devtools/inspector.html?ws=127.0.0.1:33459/devtools/page/AB12",
				"id": "AB12",
				"title": "about:blank",
				"type": "page",
				"url": "about:blank",
				"webSocketDebuggerUrl": "ws://127.0.0.1:33459/devtools/page/AB12"
			},
			{
				"id": "CD34",
				"title": "Service Worker",
				"type": "service_worker",
				"url": "chrome://sw"
			}
		]"#;

		let targets: Vec<TargetInfo> = serde_json::from_str(json).unwrap();
		assert_eq!(targets.len(), 2);
		assert!(targets[0].is_page());
		assert!(!targets[1].is_page());
		assert_eq!(
			targets[0].web_socket_debugger_url.as_deref(),
			Some("ws://127.0.0.1:33459/devtools/page/AB12")
		);
		assert!(targets[1].web_socket_debugger_url.is_none());
	}
}
