//! Wire types for the Chrome DevTools Protocol.
//!
//! This crate contains the serde-serializable types used for communication
//! with a Chromium-family browser over its DevTools WebSocket. These types
//! represent the "protocol layer" - the shapes of data as they appear on
//! the wire.
//!
//! # Design Philosophy
//!
//! Types in this crate are:
//! - **Pure data**: No behavior beyond serialization/deserialization
//! - **1:1 with protocol**: Match the DevTools JSON-RPC framing
//! - **Stable**: Changes only when the wire protocol changes
//!
//! The connection and page-driving layers are built on top of these types
//! in `hubpush-browser`.

pub mod http;
pub mod message;

pub use http::*;
pub use message::*;
