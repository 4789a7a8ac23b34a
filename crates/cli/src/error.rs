use std::path::PathBuf;

use thiserror::Error;

use crate::output::{CommandError, ErrorCode};

pub type Result<T> = std::result::Result<T, PushError>;

#[derive(Debug, Error)]
pub enum PushError {
	#[error("source file not found: {}", path.display())]
	SourceNotFound { path: PathBuf },

	#[error("no editor target: pass an editor URL or use --auto to discover it")]
	MissingTarget,

	#[error("hub address required: pass --hub-ip or set {}", crate::config::HUB_IP_ENV)]
	HubAddressRequired,

	#[error("invalid hub address '{addr}': {reason}")]
	InvalidHubAddress { addr: String, reason: String },

	#[error("no {kind} named '{name}' found on hub {hub}")]
	EditorNotFound {
		kind: String,
		name: String,
		hub: String,
	},

	#[error("no code editor widget found on the page")]
	EditorWidgetNotFound,

	#[error("code injection failed: {0}")]
	InjectionFailed(String),

	#[error("no save control found on the editor page")]
	SaveButtonNotFound,

	#[error("hub rejected the code with {} compilation error(s)", errors.len())]
	CompilationErrors { errors: Vec<String> },

	#[error(transparent)]
	Browser(#[from] hubpush_browser::Error),

	#[error(transparent)]
	Io(#[from] std::io::Error),

	#[error(transparent)]
	Json(#[from] serde_json::Error),

	#[error(transparent)]
	Anyhow(#[from] anyhow::Error),
}

/// Classify a browser-layer error into the CLI's error vocabulary.
fn classify_browser_error(err: &hubpush_browser::Error) -> (ErrorCode, String) {
	use hubpush_browser::Error as Browser;

	let code = match err {
		Browser::ExecutableNotFound
		| Browser::LaunchFailed(_)
		| Browser::LaunchTimeout { .. } => ErrorCode::BrowserLaunchFailed,
		Browser::NavigationFailed { .. } => ErrorCode::NavigationFailed,
		Browser::JsException(_) => ErrorCode::JsEvalFailed,
		Browser::Timeout(_) => ErrorCode::Timeout,
		_ => ErrorCode::BrowserError,
	};

	(code, err.to_string())
}

impl PushError {
	/// Convert this error to a CommandError for structured output.
	pub fn to_command_error(&self) -> CommandError {
		let (code, message, details) = match self {
			PushError::SourceNotFound { path } => (
				ErrorCode::SourceNotFound,
				self.to_string(),
				Some(serde_json::json!({ "path": path })),
			),
			PushError::MissingTarget => (ErrorCode::MissingTarget, self.to_string(), None),
			PushError::HubAddressRequired => {
				(ErrorCode::HubAddressRequired, self.to_string(), None)
			}
			PushError::InvalidHubAddress { addr, .. } => (
				ErrorCode::InvalidHubAddress,
				self.to_string(),
				Some(serde_json::json!({ "addr": addr })),
			),
			PushError::EditorNotFound { kind, name, hub } => (
				ErrorCode::EditorNotFound,
				self.to_string(),
				Some(serde_json::json!({ "kind": kind, "name": name, "hub": hub })),
			),
			PushError::EditorWidgetNotFound => {
				(ErrorCode::EditorWidgetNotFound, self.to_string(), None)
			}
			PushError::InjectionFailed(_) => {
				(ErrorCode::InjectionFailed, self.to_string(), None)
			}
			PushError::SaveButtonNotFound => {
				(ErrorCode::SaveButtonNotFound, self.to_string(), None)
			}
			PushError::CompilationErrors { errors } => (
				ErrorCode::CompilationErrors,
				self.to_string(),
				Some(serde_json::json!({ "errors": errors })),
			),
			PushError::Browser(err) => {
				let (code, msg) = classify_browser_error(err);
				(code, msg, None)
			}
			PushError::Io(err) => (ErrorCode::IoError, err.to_string(), None),
			PushError::Json(err) => {
				(ErrorCode::InternalError, format!("JSON error: {err}"), None)
			}
			PushError::Anyhow(err) => (ErrorCode::InternalError, err.to_string(), None),
		};

		CommandError {
			code,
			message,
			details,
		}
	}
}
