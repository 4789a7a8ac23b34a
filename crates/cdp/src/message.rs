//! Command, response, and event envelopes for the DevTools wire protocol.
//!
//! Every message the browser sends on the debugger WebSocket is either a
//! response (carries the `id` of the command it answers) or an event
//! (carries a `method` and no `id`). [`Message`] is the discriminated
//! union used by the connection's dispatch loop.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Command sent to the browser.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Command {
	/// Unique command ID for correlating the response.
	pub id: u64,
	/// Domain-qualified method name (e.g. `"Page.navigate"`).
	pub method: String,
	/// Method parameters as a JSON object.
	pub params: Value,
}

impl Command {
	/// Creates a command envelope. Pass `json!({})` for methods without
	/// parameters.
	pub fn new(id: u64, method: impl Into<String>, params: Value) -> Self {
		Self {
			id,
			method: method.into(),
			params,
		}
	}
}

/// Response to a previously sent [`Command`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
	/// Command ID this response correlates to.
	pub id: u64,
	/// Success result (mutually exclusive with `error`).
	#[serde(skip_serializing_if = "Option::is_none")]
	pub result: Option<Value>,
	/// Error result (mutually exclusive with `result`).
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<ErrorPayload>,
}

/// Protocol error details carried in a failed [`Response`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorPayload {
	/// JSON-RPC error code (e.g. `-32000` for server errors).
	pub code: i64,
	/// Human-readable error message.
	pub message: String,
	/// Additional error context, when the browser provides it.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub data: Option<String>,
}

/// Unsolicited event emitted by the browser.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
	/// Domain-qualified event name (e.g. `"Page.loadEventFired"`).
	pub method: String,
	/// Event parameters as a JSON object.
	#[serde(default)]
	pub params: Value,
}

/// Discriminated union of incoming protocol messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Message {
	/// Response message (has `id` field).
	Response(Response),
	/// Event message (has `method`, no `id`).
	Event(Event),
	/// Unknown message type (forward-compatible catch-all).
	Unknown(Value),
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn command_serializes_with_id_method_params() {
		let cmd = Command::new(7, "Page.navigate", serde_json::json!({"url": "http://example.com"}));
		let json = serde_json::to_string(&cmd).unwrap();
		assert!(json.contains(r#""id":7"#));
		assert!(json.contains(r#""method":"Page.navigate""#));
		assert!(json.contains(r#""url":"http://example.com""#));
	}

	#[test]
	fn response_with_result_parses_as_response() {
		let json = r#"{"id": 42, "result": {"frameId": "F1"}}"#;
		let message: Message = serde_json::from_str(json).unwrap();

		match message {
			Message::Response(response) => {
				assert_eq!(response.id, 42);
				assert_eq!(response.result.unwrap()["frameId"], "F1");
				assert!(response.error.is_none());
			}
			_ => panic!("Expected Response"),
		}
	}

	#[test]
	fn response_with_error_parses_error_payload() {
		let json = r#"{"id": 3, "error": {"code": -32000, "message": "Cannot find context"}}"#;
		let message: Message = serde_json::from_str(json).unwrap();

		match message {
			Message::Response(response) => {
				let error = response.error.unwrap();
				assert_eq!(error.code, -32000);
				assert_eq!(error.message, "Cannot find context");
				assert!(error.data.is_none());
			}
			_ => panic!("Expected Response"),
		}
	}

	#[test]
	fn event_without_id_parses_as_event() {
		let json = r#"{"method": "Page.loadEventFired", "params": {"timestamp": 12.5}}"#;
		let message: Message = serde_json::from_str(json).unwrap();

		match message {
			Message::Event(event) => {
				assert_eq!(event.method, "Page.loadEventFired");
				assert_eq!(event.params["timestamp"], 12.5);
			}
			_ => panic!("Expected Event"),
		}
	}

	#[test]
	fn event_without_params_defaults_to_null() {
		let json = r#"{"method": "Inspector.detached"}"#;
		let message: Message = serde_json::from_str(json).unwrap();

		match message {
			Message::Event(event) => {
				assert_eq!(event.method, "Inspector.detached");
				assert!(event.params.is_null());
			}
			_ => panic!("Expected Event"),
		}
	}

	#[test]
	fn unrecognized_shape_falls_through_to_unknown() {
		let json = r#"{"something": "else"}"#;
		let message: Message = serde_json::from_str(json).unwrap();
		assert!(matches!(message, Message::Unknown(_)));
	}
}
