//! Structured output envelope for command results.
//!
//! Every command prints exactly one envelope on stdout: `{ok, command,
//! data, error}`. Text mode renders the same envelope for humans;
//! errors additionally go to stderr so scripted callers can keep
//! stdout clean for parsing.

use clap::ValueEnum;
use colored::Colorize;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
	/// Human-readable text (default).
	#[default]
	Text,
	/// Machine-readable JSON envelope.
	Json,
}

impl std::str::FromStr for OutputFormat {
	type Err = String;

	fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
		match s.to_lowercase().as_str() {
			"text" => Ok(OutputFormat::Text),
			"json" => Ok(OutputFormat::Json),
			other => Err(format!("unknown output format '{other}' (expected text or json)")),
		}
	}
}

impl std::fmt::Display for OutputFormat {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			OutputFormat::Text => write!(f, "text"),
			OutputFormat::Json => write!(f, "json"),
		}
	}
}

/// Stable error codes for scripted callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
	SourceNotFound,
	MissingTarget,
	HubAddressRequired,
	InvalidHubAddress,
	EditorNotFound,
	EditorWidgetNotFound,
	InjectionFailed,
	SaveButtonNotFound,
	CompilationErrors,
	BrowserLaunchFailed,
	NavigationFailed,
	JsEvalFailed,
	Timeout,
	BrowserError,
	IoError,
	InternalError,
}

impl std::fmt::Display for ErrorCode {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let s = match self {
			ErrorCode::SourceNotFound => "SOURCE_NOT_FOUND",
			ErrorCode::MissingTarget => "MISSING_TARGET",
			ErrorCode::HubAddressRequired => "HUB_ADDRESS_REQUIRED",
			ErrorCode::InvalidHubAddress => "INVALID_HUB_ADDRESS",
			ErrorCode::EditorNotFound => "EDITOR_NOT_FOUND",
			ErrorCode::EditorWidgetNotFound => "EDITOR_WIDGET_NOT_FOUND",
			ErrorCode::InjectionFailed => "INJECTION_FAILED",
			ErrorCode::SaveButtonNotFound => "SAVE_BUTTON_NOT_FOUND",
			ErrorCode::CompilationErrors => "COMPILATION_ERRORS",
			ErrorCode::BrowserLaunchFailed => "BROWSER_LAUNCH_FAILED",
			ErrorCode::NavigationFailed => "NAVIGATION_FAILED",
			ErrorCode::JsEvalFailed => "JS_EVAL_FAILED",
			ErrorCode::Timeout => "TIMEOUT",
			ErrorCode::BrowserError => "BROWSER_ERROR",
			ErrorCode::IoError => "IO_ERROR",
			ErrorCode::InternalError => "INTERNAL_ERROR",
		};
		write!(f, "{s}")
	}
}

/// Structured error carried in the envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandError {
	pub code: ErrorCode,
	pub message: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub details: Option<Value>,
}

/// The single result envelope every command prints.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandResult<T: Serialize> {
	pub ok: bool,
	pub command: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub data: Option<T>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<CommandError>,
}

/// Builder for [`CommandResult`].
pub struct ResultBuilder<T: Serialize> {
	command: String,
	data: Option<T>,
	error: Option<CommandError>,
}

impl<T: Serialize> ResultBuilder<T> {
	pub fn new(command: impl Into<String>) -> Self {
		Self {
			command: command.into(),
			data: None,
			error: None,
		}
	}

	pub fn data(mut self, data: T) -> Self {
		self.data = Some(data);
		self
	}

	pub fn error(mut self, error: CommandError) -> Self {
		self.error = Some(error);
		self
	}

	pub fn build(self) -> CommandResult<T> {
		CommandResult {
			ok: self.error.is_none() && self.data.is_some(),
			command: self.command,
			data: self.data,
			error: self.error,
		}
	}
}

/// Print a command result in the requested format.
pub fn print_result<T: Serialize>(result: &CommandResult<T>, format: OutputFormat) {
	match format {
		OutputFormat::Json => {
			if let Ok(json) = serde_json::to_string_pretty(result) {
				println!("{json}");
			}
		}
		OutputFormat::Text => print_result_text(result),
	}
}

fn print_result_text<T: Serialize>(result: &CommandResult<T>) {
	if result.ok {
		println!("{} {}", "ok:".green().bold(), result.command);
		if let Some(data) = &result.data {
			if let Ok(json) = serde_json::to_value(data) {
				print_fields(&json);
			}
		}
	} else if let Some(error) = &result.error {
		println!("{} [{}] {}", "failed:".red().bold(), error.code, error.message);
	}
}

fn print_fields(value: &Value) {
	if let Some(map) = value.as_object() {
		for (key, val) in map {
			match val {
				Value::String(s) => println!("  {key}: {s}"),
				other => println!("  {key}: {other}"),
			}
		}
	}
}

/// Print an error to stderr for humans. Compiler error lists ride in
/// the details and are echoed line by line.
pub fn print_error_stderr(error: &CommandError) {
	eprintln!("{} [{}]: {}", "error".red().bold(), error.code, error.message);

	let lines = error
		.details
		.as_ref()
		.and_then(|d| d.get("errors"))
		.and_then(Value::as_array);
	if let Some(lines) = lines {
		for line in lines {
			if let Some(text) = line.as_str() {
				eprintln!("  {}", text.red());
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn envelope_is_ok_only_with_data_and_no_error() {
		let result = ResultBuilder::new("deploy").data(serde_json::json!({"x": 1})).build();
		assert!(result.ok);

		let result: CommandResult<Value> = ResultBuilder::new("deploy")
			.error(CommandError {
				code: ErrorCode::MissingTarget,
				message: "no target".into(),
				details: None,
			})
			.build();
		assert!(!result.ok);

		let result: CommandResult<Value> = ResultBuilder::new("deploy").build();
		assert!(!result.ok);
	}

	#[test]
	fn error_codes_serialize_screaming_snake() {
		let json = serde_json::to_value(ErrorCode::CompilationErrors).unwrap();
		assert_eq!(json, "COMPILATION_ERRORS");
		assert_eq!(ErrorCode::SourceNotFound.to_string(), "SOURCE_NOT_FOUND");
	}

	#[test]
	fn envelope_serializes_camel_case_and_skips_empty_fields() {
		let result = ResultBuilder::new("discover")
			.data(serde_json::json!({"id": 12}))
			.build();
		let json = serde_json::to_value(&result).unwrap();
		assert_eq!(json["ok"], true);
		assert_eq!(json["command"], "discover");
		assert!(json.get("error").is_none());
	}

	#[test]
	fn format_parses_from_str() {
		assert_eq!("json".parse::<OutputFormat>(), Ok(OutputFormat::Json));
		assert_eq!("TEXT".parse::<OutputFormat>(), Ok(OutputFormat::Text));
		assert!("yaml".parse::<OutputFormat>().is_err());
	}
}
