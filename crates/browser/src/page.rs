//! Page-level operations over the DevTools connection.
//!
//! One [`Page`] drives the single tab its connection is attached to:
//! navigation, script evaluation, element queries, synthesized clicks,
//! and content extraction. Script evaluation always returns by value and
//! awaits promises, so page-side async work can be driven with one call.

use std::time::Duration;

use base64::Engine as _;
use hubpush_cdp::Event;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::debug;

use crate::connection::Connection;
use crate::error::{Error, Result};

/// How often selector polls re-check the document.
const SELECTOR_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// A handle to the attached browser tab.
pub struct Page {
	connection: Arc<Connection>,
}

impl Page {
	pub(crate) fn new(connection: Arc<Connection>) -> Self {
		Self { connection }
	}

	/// Enables the protocol domains page driving relies on.
	pub(crate) async fn enable_domains(&self) -> Result<()> {
		for method in ["Page.enable", "DOM.enable", "Runtime.enable"] {
			self.connection.send_command(method, json!({})).await?;
		}
		Ok(())
	}

	/// Navigates to `url` and waits for DOMContentLoaded.
	pub async fn goto(&self, url: &str, timeout: Duration) -> Result<()> {
		debug!(url, "navigating");
		let result = self
			.connection
			.send_command("Page.navigate", json!({ "url": url }))
			.await?;

		if let Some(reason) = result.get("errorText").and_then(Value::as_str) {
			if !reason.is_empty() {
				return Err(Error::NavigationFailed {
					url: url.to_string(),
					reason: reason.to_string(),
				});
			}
		}

		self.wait_for_event("Page.domContentEventFired", timeout)
			.await?;
		Ok(())
	}

	/// Waits for a specific lifecycle event, draining others that arrive
	/// first.
	pub async fn wait_for_event(&self, method: &str, timeout: Duration) -> Result<Event> {
		let deadline = tokio::time::Instant::now() + timeout;
		loop {
			let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
			if remaining.is_zero() {
				return Err(Error::Timeout(format!(
					"event {method} did not fire within {}ms",
					timeout.as_millis()
				)));
			}
			let event = self.connection.next_event(remaining).await?;
			if event.method == method {
				return Ok(event);
			}
		}
	}

	/// Evaluates a JavaScript expression and returns its JSON value.
	///
	/// Promises are awaited; a throw inside the page surfaces as
	/// [`Error::JsException`].
	pub async fn evaluate(&self, expression: &str) -> Result<Value> {
		let result = self
			.connection
			.send_command(
				"Runtime.evaluate",
				json!({
					"expression": expression,
					"returnByValue": true,
					"awaitPromise": true,
				}),
			)
			.await?;

		if let Some(details) = result.get("exceptionDetails") {
			return Err(Error::JsException(exception_text(details)));
		}

		Ok(result.pointer("/result/value").cloned().unwrap_or(Value::Null))
	}

	/// Returns whether `selector` currently matches an element.
	pub async fn exists(&self, selector: &str) -> Result<bool> {
		let escaped = escape_for_single_quotes(selector);
		let value = self
			.evaluate(&format!("document.querySelector('{escaped}') !== null"))
			.await?;
		Ok(value.as_bool().unwrap_or(false))
	}

	/// Polls until `selector` matches an element or the timeout elapses.
	///
	/// Evaluation errors during a poll are swallowed and retried; a page
	/// mid-navigation briefly has no usable script context.
	pub async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> Result<()> {
		let escaped = escape_for_single_quotes(selector);
		let expression = format!("document.querySelector('{escaped}') !== null");
		let deadline = tokio::time::Instant::now() + timeout;

		loop {
			if let Ok(Value::Bool(true)) = self.evaluate(&expression).await {
				return Ok(());
			}
			if tokio::time::Instant::now() + SELECTOR_POLL_INTERVAL > deadline {
				return Err(Error::Timeout(format!(
					"selector '{selector}' did not appear within {}ms",
					timeout.as_millis()
				)));
			}
			tokio::time::sleep(SELECTOR_POLL_INTERVAL).await;
		}
	}

	/// Resolves a selector to a DOM node id, or `None` when nothing
	/// matches.
	pub async fn query_selector(&self, selector: &str) -> Result<Option<i64>> {
		let root = self
			.connection
			.send_command("DOM.getDocument", json!({ "depth": 0 }))
			.await?;
		let root_id = root
			.pointer("/root/nodeId")
			.and_then(Value::as_i64)
			.ok_or_else(|| {
				Error::ProtocolError("DOM.getDocument returned no root nodeId".to_string())
			})?;

		let found = self
			.connection
			.send_command(
				"DOM.querySelector",
				json!({ "nodeId": root_id, "selector": selector }),
			)
			.await?;

		// nodeId 0 means no match.
		let node_id = found.get("nodeId").and_then(Value::as_i64).unwrap_or(0);
		Ok((node_id != 0).then_some(node_id))
	}

	/// Scrolls the element into view and clicks the center of its content
	/// box with synthesized mouse events.
	pub async fn click_selector(&self, selector: &str) -> Result<()> {
		let node_id = self
			.query_selector(selector)
			.await?
			.ok_or_else(|| Error::ElementNotFound(selector.to_string()))?;

		self.connection
			.send_command("DOM.scrollIntoViewIfNeeded", json!({ "nodeId": node_id }))
			.await?;

		let box_model = self
			.connection
			.send_command("DOM.getBoxModel", json!({ "nodeId": node_id }))
			.await?;
		let quad = box_model
			.pointer("/model/content")
			.and_then(Value::as_array)
			.ok_or_else(|| Error::ElementNotClickable(selector.to_string()))?;
		let (x, y) = center_of_quad(quad)
			.ok_or_else(|| Error::ElementNotClickable(selector.to_string()))?;

		debug!(selector, x, y, "clicking");
		self.click_at(x, y).await
	}

	/// Dispatches a mouse press/release pair at page coordinates.
	pub async fn click_at(&self, x: f64, y: f64) -> Result<()> {
		for event_type in ["mousePressed", "mouseReleased"] {
			self.connection
				.send_command(
					"Input.dispatchMouseEvent",
					json!({
						"type": event_type,
						"x": x,
						"y": y,
						"button": "left",
						"clickCount": 1,
					}),
				)
				.await?;
		}
		Ok(())
	}

	/// Returns the full serialized HTML of the page.
	pub async fn content(&self) -> Result<String> {
		let value = self.evaluate("document.documentElement.outerHTML").await?;
		value
			.as_str()
			.map(str::to_string)
			.ok_or_else(|| Error::ProtocolError("outerHTML did not evaluate to a string".to_string()))
	}

	/// Returns the rendered text of the document body.
	pub async fn body_text(&self) -> Result<String> {
		let value = self
			.evaluate("document.body ? document.body.innerText : ''")
			.await?;
		value
			.as_str()
			.map(str::to_string)
			.ok_or_else(|| Error::ProtocolError("innerText did not evaluate to a string".to_string()))
	}

	/// Captures a PNG screenshot of the viewport.
	pub async fn screenshot(&self) -> Result<Vec<u8>> {
		let result = self
			.connection
			.send_command("Page.captureScreenshot", json!({ "format": "png" }))
			.await?;
		let data = result
			.get("data")
			.and_then(Value::as_str)
			.ok_or_else(|| {
				Error::ProtocolError("Page.captureScreenshot returned no data".to_string())
			})?;
		base64::engine::general_purpose::STANDARD
			.decode(data)
			.map_err(|e| Error::ProtocolError(format!("invalid screenshot payload: {e}")))
	}
}

/// Escapes a string for embedding inside single quotes in page JS.
fn escape_for_single_quotes(value: &str) -> String {
	value.replace('\\', "\\\\").replace('\'', "\\'")
}

/// Pulls a printable message out of `exceptionDetails`.
fn exception_text(details: &Value) -> String {
	details
		.pointer("/exception/description")
		.and_then(Value::as_str)
		.or_else(|| details.get("text").and_then(Value::as_str))
		.unwrap_or("unknown JavaScript error")
		.to_string()
}

/// Center of a content quad (`[x1,y1,x2,y2,x3,y3,x4,y4]`), or `None` for
/// malformed or zero-area quads.
fn center_of_quad(quad: &[Value]) -> Option<(f64, f64)> {
	let coords: Vec<f64> = quad.iter().filter_map(Value::as_f64).collect();
	if coords.len() != 8 {
		return None;
	}

	let xs = [coords[0], coords[2], coords[4], coords[6]];
	let ys = [coords[1], coords[3], coords[5], coords[7]];
	let min_x = xs.iter().copied().fold(f64::INFINITY, f64::min);
	let max_x = xs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
	let min_y = ys.iter().copied().fold(f64::INFINITY, f64::min);
	let max_y = ys.iter().copied().fold(f64::NEG_INFINITY, f64::max);

	if max_x <= min_x || max_y <= min_y {
		return None;
	}

	Some(((min_x + max_x) / 2.0, (min_y + max_y) / 2.0))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn quad_center_is_midpoint_of_bounds() {
		let quad: Vec<Value> = [10.0, 20.0, 110.0, 20.0, 110.0, 60.0, 10.0, 60.0]
			.iter()
			.map(|n| json!(n))
			.collect();
		assert_eq!(center_of_quad(&quad), Some((60.0, 40.0)));
	}

	#[test]
	fn zero_area_quad_is_not_clickable() {
		let quad: Vec<Value> = [5.0, 5.0, 5.0, 5.0, 5.0, 5.0, 5.0, 5.0]
			.iter()
			.map(|n| json!(n))
			.collect();
		assert_eq!(center_of_quad(&quad), None);
	}

	#[test]
	fn short_quad_is_rejected() {
		let quad: Vec<Value> = [1.0, 2.0, 3.0].iter().map(|n| json!(n)).collect();
		assert_eq!(center_of_quad(&quad), None);
	}

	#[test]
	fn selector_escaping_handles_quotes_and_backslashes() {
		assert_eq!(
			escape_for_single_quotes("a[title='x']"),
			"a[title=\\'x\\']"
		);
		assert_eq!(escape_for_single_quotes(r"a\b"), r"a\\b");
	}

	#[test]
	fn exception_text_prefers_description() {
		let details = json!({
			"text": "Uncaught",
			"exception": { "description": "ReferenceError: foo is not defined" }
		});
		assert_eq!(
			exception_text(&details),
			"ReferenceError: foo is not defined"
		);
	}

	#[test]
	fn exception_text_falls_back_to_text() {
		let details = json!({ "text": "Uncaught (in promise)" });
		assert_eq!(exception_text(&details), "Uncaught (in promise)");
	}
}
