//! Typed references to the hub's editor pages.
//!
//! The hub keeps separate editor sections per component family, with
//! URLs of the shape `http://{hub}/{kind}/editor/{id}`. This module
//! replaces loose URL strings with a typed [`EditorTarget`] wherever a
//! target has been resolved.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::config::HubConfig;

/// The two component families the hub exposes editors for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
	/// Automation app.
	App,
	/// Device driver.
	Driver,
}

impl ComponentKind {
	/// URL path segment the hub uses for this kind.
	pub fn path_segment(&self) -> &'static str {
		match self {
			ComponentKind::App => "app",
			ComponentKind::Driver => "driver",
		}
	}
}

impl std::fmt::Display for ComponentKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.path_segment())
	}
}

impl std::str::FromStr for ComponentKind {
	type Err = String;

	fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
		match s.to_lowercase().as_str() {
			"app" => Ok(ComponentKind::App),
			"driver" => Ok(ComponentKind::Driver),
			other => Err(format!("unknown component kind '{other}' (expected app or driver)")),
		}
	}
}

/// A resolved editor page: one component kind plus its numeric id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorTarget {
	pub kind: ComponentKind,
	pub id: u64,
}

impl EditorTarget {
	/// Full URL of the editor page on the given hub.
	pub fn editor_url(&self, hub: &HubConfig) -> String {
		format!("{}/{}/editor/{}", hub.base_url(), self.kind.path_segment(), self.id)
	}
}

/// Full URL of the listing page for a component kind.
pub fn list_url(hub: &HubConfig, kind: ComponentKind) -> String {
	format!("{}/{}/list", hub.base_url(), kind.path_segment())
}

#[cfg(test)]
mod tests {
	use super::*;

	fn hub() -> HubConfig {
		HubConfig { addr: "10.0.0.2".into() }
	}

	#[test]
	fn editor_url_has_kind_segment_and_id() {
		let target = EditorTarget { kind: ComponentKind::App, id: 12 };
		assert_eq!(target.editor_url(&hub()), "http://10.0.0.2/app/editor/12");

		let target = EditorTarget { kind: ComponentKind::Driver, id: 7 };
		assert_eq!(target.editor_url(&hub()), "http://10.0.0.2/driver/editor/7");
	}

	#[test]
	fn list_url_follows_the_same_scheme() {
		assert_eq!(list_url(&hub(), ComponentKind::Driver), "http://10.0.0.2/driver/list");
	}

	#[test]
	fn kind_parses_case_insensitively() {
		assert_eq!("App".parse::<ComponentKind>(), Ok(ComponentKind::App));
		assert_eq!("DRIVER".parse::<ComponentKind>(), Ok(ComponentKind::Driver));
		assert!("gadget".parse::<ComponentKind>().is_err());
	}

	#[test]
	fn kind_displays_as_path_segment() {
		assert_eq!(ComponentKind::App.to_string(), "app");
		assert_eq!(ComponentKind::Driver.to_string(), "driver");
	}
}
