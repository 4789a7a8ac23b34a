//! Error types for the browser runtime.

use thiserror::Error;

/// Result type alias for browser operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while driving the browser.
#[derive(Debug, Error)]
pub enum Error {
	/// No Chromium-family executable could be located.
	#[error("No Chrome or Chromium executable found. Install one or set CHROME to its path.")]
	ExecutableNotFound,

	/// The browser process could not be spawned.
	#[error("Failed to launch browser: {0}")]
	LaunchFailed(String),

	/// The browser never announced its DevTools endpoint.
	#[error("Browser did not announce a DevTools endpoint within {timeout_ms}ms")]
	LaunchTimeout {
		/// How long we waited before giving up.
		timeout_ms: u64,
	},

	/// Failed to establish the WebSocket connection.
	#[error("Failed to connect to browser: {0}")]
	ConnectionFailed(String),

	/// The WebSocket closed while commands were still in flight.
	#[error("Browser connection closed")]
	ConnectionClosed,

	/// Transport-level error (WebSocket communication).
	#[error("Transport error: {0}")]
	TransportError(String),

	/// Protocol-level error (JSON-RPC framing).
	#[error("Protocol error: {0}")]
	ProtocolError(String),

	/// The browser answered a command with an error.
	#[error("DevTools error {code}: {message}")]
	Cdp {
		/// JSON-RPC error code reported by the browser.
		code: i64,
		/// Human-readable error message.
		message: String,
	},

	/// JavaScript evaluation threw inside the page.
	#[error("Page script threw: {0}")]
	JsException(String),

	/// Navigation was refused by the browser.
	#[error("Navigation to '{url}' failed: {reason}")]
	NavigationFailed {
		/// The URL that was requested.
		url: String,
		/// The browser's `errorText` for the refusal.
		reason: String,
	},

	/// No attachable page target was available.
	#[error("No debuggable page target found")]
	NoPageTarget,

	/// Element not found by selector.
	#[error("Element not found: selector '{0}'")]
	ElementNotFound(String),

	/// Element exists but has no renderable box to click.
	#[error("Element has no clickable area: selector '{0}'")]
	ElementNotClickable(String),

	/// Timeout waiting for an operation.
	#[error("Timeout: {0}")]
	Timeout(String),

	/// HTTP error talking to the discovery endpoints.
	#[error("HTTP error: {0}")]
	Http(#[from] reqwest::Error),

	/// I/O error.
	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),

	/// JSON serialization/deserialization error.
	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),
}

impl Error {
	/// Returns true if this is a timeout error.
	pub fn is_timeout(&self) -> bool {
		matches!(self, Error::Timeout(_) | Error::LaunchTimeout { .. })
	}
}
