//! Source file loading and component metadata sniffing.
//!
//! The payload is opaque to the tool: it is written into the editor
//! verbatim, whatever language it is in. The only inspection done here
//! is the metadata sniff auto-discovery needs, built around the two
//! declaration shapes hub sources use (`definition(name: "...")` for
//! apps, `metadata { ... name = "..." }` for drivers).

use std::path::{Path, PathBuf};

use regex_lite::Regex;

use crate::error::{PushError, Result};
use crate::target::ComponentKind;

/// A loaded source payload.
#[derive(Debug, Clone)]
pub struct SourceFile {
	pub path: PathBuf,
	pub text: String,
}

impl SourceFile {
	/// Reads the file, failing before any browser work when it is
	/// missing or unreadable.
	pub fn load(path: &Path) -> Result<Self> {
		if !path.is_file() {
			return Err(PushError::SourceNotFound { path: path.to_path_buf() });
		}
		let text = std::fs::read_to_string(path)?;
		Ok(Self { path: path.to_path_buf(), text })
	}

	/// Guesses the component kind from declaration markers. App sources
	/// carry a `definition(` block or a `name: "` metadata entry;
	/// anything else is treated as a driver.
	pub fn sniff_kind(&self) -> ComponentKind {
		if self.text.contains("definition(") || self.text.contains("name: \"") {
			ComponentKind::App
		} else {
			ComponentKind::Driver
		}
	}

	/// Extracts the declared component name, falling back to the file
	/// stem with `-` and `_` turned into spaces.
	pub fn component_name(&self, kind: ComponentKind) -> String {
		let pattern = match kind {
			ComponentKind::App => r#"name:\s*["']([^"']+)["']"#,
			ComponentKind::Driver => r#"name\s*=\s*["']([^"']+)["']"#,
		};
		// Both patterns are fixed literals; construction cannot fail.
		Regex::new(pattern)
			.ok()
			.and_then(|re| re.captures(&self.text))
			.and_then(|captures| captures.get(1))
			.map(|name| name.as_str().to_string())
			.unwrap_or_else(|| self.stem_name())
	}

	fn stem_name(&self) -> String {
		self.path
			.file_stem()
			.map(|stem| stem.to_string_lossy().replace(['-', '_'], " "))
			.unwrap_or_default()
	}
}
