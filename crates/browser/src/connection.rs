//! DevTools connection layer.
//!
//! This module implements the command/response correlation layer on top of
//! the debugger WebSocket. It handles:
//! - Generating unique command IDs
//! - Correlating responses with pending commands
//! - Distinguishing events from responses
//! - Forwarding events to the session's event channel
//!
//! # Message Flow
//!
//! 1. Caller invokes `send_command()` with method and params
//! 2. Connection generates a unique ID and registers a oneshot channel
//! 3. Command is serialized and sent over the WebSocket
//! 4. Caller awaits on the oneshot receiver, bounded by a timeout
//! 5. The reader task receives and parses the incoming frame
//! 6. Responses are correlated by ID and delivered via the oneshot;
//!    events go to the event channel for `next_event()` consumers

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use futures_util::stream::{SplitSink, SplitStream, StreamExt};
use futures_util::SinkExt;
use hubpush_cdp::{Command, Event, Message};
use serde_json::Value;
use tokio::net::TcpStream;
use tokio::sync::{Mutex, mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Default time to wait for a command's response.
pub const COMMAND_TIMEOUT: Duration = Duration::from_secs(30);

type WsSink = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, WsMessage>;
type WsSource = SplitStream<WebSocketStream<MaybeTlsStream<TcpStream>>>;
type PendingMap = Arc<Mutex<HashMap<u64, oneshot::Sender<Result<Value>>>>>;

/// A live connection to one DevTools target.
///
/// Cheap to share behind an [`Arc`]; all methods take `&self`.
pub struct Connection {
	/// Sequential command ID counter.
	last_id: AtomicU64,
	/// Pending command callbacks keyed by command ID.
	pending: PendingMap,
	/// Writer half of the WebSocket.
	writer: Mutex<WsSink>,
	/// Incoming protocol events, in arrival order.
	event_rx: Mutex<mpsc::UnboundedReceiver<Event>>,
	/// Background reader task, aborted on close.
	reader: JoinHandle<()>,
}

impl Connection {
	/// Opens the WebSocket and starts the background reader task.
	pub async fn connect(ws_url: &str) -> Result<Self> {
		let (stream, _) = connect_async(ws_url)
			.await
			.map_err(|e| Error::ConnectionFailed(e.to_string()))?;
		let (writer, reader) = stream.split();

		let pending: PendingMap = Arc::new(Mutex::new(HashMap::new()));
		let (event_tx, event_rx) = mpsc::unbounded_channel();
		let reader = tokio::spawn(read_loop(reader, Arc::clone(&pending), event_tx));

		debug!(ws_url, "connected to DevTools target");

		Ok(Self {
			last_id: AtomicU64::new(0),
			pending,
			writer: Mutex::new(writer),
			event_rx: Mutex::new(event_rx),
			reader,
		})
	}

	/// Sends a command and awaits its response with the default timeout.
	pub async fn send_command(&self, method: &str, params: Value) -> Result<Value> {
		self.send_command_with_timeout(method, params, COMMAND_TIMEOUT)
			.await
	}

	/// Sends a command and awaits its response.
	///
	/// # Errors
	///
	/// [`Error::Cdp`] when the browser answers with an error payload,
	/// [`Error::Timeout`] when no response arrives in time, and
	/// [`Error::ConnectionClosed`] when the socket drops mid-flight.
	pub async fn send_command_with_timeout(
		&self,
		method: &str,
		params: Value,
		timeout: Duration,
	) -> Result<Value> {
		let id = self.last_id.fetch_add(1, Ordering::SeqCst) + 1;

		let (tx, rx) = oneshot::channel();
		self.pending.lock().await.insert(id, tx);

		let command = Command::new(id, method, params);
		let json = serde_json::to_string(&command)?;
		debug!(id, method, "sending command");

		{
			let mut writer = self.writer.lock().await;
			if let Err(e) = writer.send(WsMessage::Text(json.into())).await {
				self.pending.lock().await.remove(&id);
				return Err(Error::TransportError(e.to_string()));
			}
		}

		match tokio::time::timeout(timeout, rx).await {
			Ok(Ok(result)) => result,
			Ok(Err(_)) => Err(Error::ConnectionClosed),
			Err(_) => {
				self.pending.lock().await.remove(&id);
				Err(Error::Timeout(format!(
					"no response to {method} within {}ms",
					timeout.as_millis()
				)))
			}
		}
	}

	/// Receives the next protocol event, whatever its method.
	pub async fn next_event(&self, timeout: Duration) -> Result<Event> {
		let mut rx = self.event_rx.lock().await;
		match tokio::time::timeout(timeout, rx.recv()).await {
			Ok(Some(event)) => Ok(event),
			Ok(None) => Err(Error::ConnectionClosed),
			Err(_) => Err(Error::Timeout(format!(
				"no event within {}ms",
				timeout.as_millis()
			))),
		}
	}

	/// Sends a close frame and stops the reader task.
	pub async fn close(&self) {
		{
			let mut writer = self.writer.lock().await;
			let _ = writer.send(WsMessage::Close(None)).await;
		}
		self.reader.abort();
	}
}

/// Reads frames until the socket closes, dispatching responses to their
/// pending callbacks and events to the event channel. In-flight commands
/// are failed on exit so callers never hang.
async fn read_loop(mut reader: WsSource, pending: PendingMap, event_tx: mpsc::UnboundedSender<Event>) {
	while let Some(frame) = reader.next().await {
		let text = match frame {
			Ok(WsMessage::Text(text)) => text.to_string(),
			Ok(WsMessage::Binary(bytes)) => match String::from_utf8(bytes.to_vec()) {
				Ok(text) => text,
				Err(_) => {
					warn!("dropping non-UTF-8 binary frame");
					continue;
				}
			},
			Ok(WsMessage::Close(_)) => break,
			Ok(_) => continue,
			Err(e) => {
				warn!(error = %e, "WebSocket read error");
				break;
			}
		};

		match serde_json::from_str::<Message>(&text) {
			Ok(Message::Response(response)) => {
				let sender = pending.lock().await.remove(&response.id);
				match sender {
					Some(tx) => {
						let result = match response.error {
							Some(error) => Err(Error::Cdp {
								code: error.code,
								message: error.message,
							}),
							None => Ok(response.result.unwrap_or(Value::Null)),
						};
						let _ = tx.send(result);
					}
					None => {
						debug!(
							id = response.id,
							"response for unknown command (ignored)"
						);
					}
				}
			}
			Ok(Message::Event(event)) => {
				if event_tx.send(event).is_err() {
					break;
				}
			}
			Ok(Message::Unknown(value)) => {
				debug!(%value, "unknown message shape (ignored)");
			}
			Err(e) => {
				warn!(error = %e, "failed to parse DevTools frame");
			}
		}
	}

	let mut pending = pending.lock().await;
	for (_, tx) in pending.drain() {
		let _ = tx.send(Err(Error::ConnectionClosed));
	}
}
