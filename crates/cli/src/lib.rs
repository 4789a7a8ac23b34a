//! hubpush pushes app and driver source files into a hub's web code
//! editor: it drives a local Chromium through the DevTools protocol,
//! rewrites the editor widget, clicks save and scrapes the page for
//! the hub's verdict.

pub mod cli;
pub mod commands;
pub mod config;
pub mod editor;
pub mod error;
pub mod hooks;
pub mod logging;
pub mod output;
pub mod scrape;
pub mod source;
pub mod styles;
pub mod target;
pub mod timing;
