//! Browser runtime - process lifecycle, DevTools connection, and page driving
//!
//! This crate provides the infrastructure for automating a Chromium-family
//! browser over the DevTools protocol:
//!
//! - **Launcher**: Locating a Chrome/Chromium executable and spawning it
//!   with a DevTools endpoint on an ephemeral port
//! - **Connection**: JSON-RPC command/response correlation and event
//!   dispatch over the debugger WebSocket
//! - **Page**: Navigation, script evaluation, element queries, clicks,
//!   and content extraction against one attached page
//! - **Session**: Scoped ownership of process + profile + connection
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │   Session   │  launch → attach → drive → close
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │    Page     │  Page.navigate, Runtime.evaluate, DOM.*, Input.*
//! └──────┬──────┘
//! ┌──────▼──────┐
//! │ Connection  │  command/response correlation, event channel
//! └──────┬──────┘
//! ┌──────▼──────┐
//! │  Launcher   │  process spawn, stderr endpoint handshake
//! └─────────────┘
//! ```
//!
//! Sessions are deliberately single-page: this tool drives exactly one tab
//! per invocation and tears the whole browser down afterwards.

pub mod connection;
pub mod error;
pub mod launcher;
pub mod page;
pub mod session;

pub use connection::Connection;
pub use error::{Error, Result};
pub use launcher::{LaunchOptions, LaunchedBrowser, default_executable};
pub use page::Page;
pub use session::Session;
