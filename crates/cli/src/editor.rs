//! In-page scripts for the hub's editor.
//!
//! The editor mounts a CodeMirror 5 instance over a hidden textarea and
//! tracks dirty state through DOM events. Writing into the widget means
//! running script inside the page: set the document, then fire the
//! events the page's change tracking listens for, or the save control
//! stays disabled. Each script here is a function expression; callers
//! append an argument list (with values embedded as JSON literals,
//! since plain evaluate calls take no arguments).

use serde::{Deserialize, Serialize};

/// Login prompt heuristics for the hub's stock pages.
pub const LOGIN_FIELD_SELECTOR: &str =
	"input[type='password'], input[name*='password'], input[name*='Password']";

/// Container the code widget mounts into.
pub const EDITOR_CONTAINER_SELECTOR: &str = ".CodeMirror";

/// Selector addressing the control tagged by [`FIND_SAVE_CONTROL_JS`].
pub const SAVE_CONTROL_SELECTOR: &str = "[data-hubpush-save]";

/// Replaces the widget document and fires change notifications.
///
/// Reaches the CodeMirror instance three ways before giving up: the
/// container's `CodeMirror` property, its legacy `cm` property, then a
/// scan of every mounted widget. With no instance at all it falls
/// through to the raw textarea. Returns `{success, method, error}`.
pub const INJECT_CODE_JS: &str = r#"
(function (code) {
	const container = document.querySelector('.CodeMirror');
	let cm = null;
	if (container && container.CodeMirror) {
		cm = container.CodeMirror;
	} else if (window.CodeMirror && container && container.cm) {
		cm = container.cm;
	} else {
		for (const el of document.querySelectorAll('.CodeMirror')) {
			if (el.CodeMirror) { cm = el.CodeMirror; break; }
		}
	}

	if (!cm) {
		const textarea = document.querySelector('textarea');
		if (textarea) {
			textarea.value = code;
			textarea.dispatchEvent(new Event('input', { bubbles: true }));
			textarea.dispatchEvent(new Event('change', { bubbles: true }));
			return { success: true, method: 'textarea' };
		}
		return { success: false, error: 'no editor instance and no textarea' };
	}

	try {
		cm.setValue(code);
		if (cm.trigger) { cm.trigger('change'); }
		const textarea = cm.getTextArea ? cm.getTextArea() : null;
		if (textarea) {
			for (const type of ['input', 'change', 'keyup']) {
				textarea.dispatchEvent(new Event(type, { bubbles: true }));
			}
		}
		return { success: true, method: 'codemirror' };
	} catch (err) {
		return { success: false, error: String(err) };
	}
})
"#;

/// Last-resort injection into the first raw textarea on the page.
pub const FILL_TEXTAREA_JS: &str = r#"
(function (code) {
	const textarea = document.querySelector('textarea');
	if (!textarea) {
		return { success: false, error: 'no textarea on page' };
	}
	textarea.value = code;
	textarea.dispatchEvent(new Event('input', { bubbles: true }));
	textarea.dispatchEvent(new Event('change', { bubbles: true }));
	return { success: true, method: 'textarea' };
})
"#;

/// Finds and tags the save control.
///
/// Walks selector heuristics from most to least specific, keeps the
/// first element whose label, value or onclick handler mentions "save",
/// and marks it with `data-hubpush-save` so later calls can address it
/// by selector. Returns `{found, tag, label, disabled}`.
pub const FIND_SAVE_CONTROL_JS: &str = r#"
(function () {
	const selectors = [
		"button",
		"input[value='Save']",
		"button[type='submit']",
		".btn-primary",
		"a.btn",
		"input[type='submit']",
		"[onclick]",
	];
	const previous = document.querySelector('[data-hubpush-save]');
	if (previous) { previous.removeAttribute('data-hubpush-save'); }
	for (const selector of selectors) {
		for (const el of document.querySelectorAll(selector)) {
			const label = (el.innerText || el.value || '').trim();
			const onclick = el.getAttribute('onclick') || '';
			if (label.toLowerCase().includes('save') || onclick.toLowerCase().includes('save')) {
				el.setAttribute('data-hubpush-save', '1');
				return {
					found: true,
					tag: el.tagName.toLowerCase(),
					label: label,
					disabled: el.disabled === true,
				};
			}
		}
	}
	return { found: false };
})()
"#;

/// Whether the tagged save control is currently interactive.
pub const SAVE_ENABLED_JS: &str = r#"
(function () {
	const el = document.querySelector('[data-hubpush-save]');
	if (!el) { return false; }
	return el.disabled !== true && el.getAttribute('aria-disabled') !== 'true';
})()
"#;

/// Script-level activation of the tagged control, bypassing the
/// interactivity checks a synthesized mouse click would respect.
pub const FORCE_CLICK_SAVE_JS: &str = r#"
(function () {
	const el = document.querySelector('[data-hubpush-save]');
	if (!el) { return { clicked: false, error: 'save control vanished' }; }
	el.click();
	return { clicked: true };
})()
"#;

/// Which strategy wrote the code into the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InjectionMethod {
	Codemirror,
	Textarea,
}

impl std::fmt::Display for InjectionMethod {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			InjectionMethod::Codemirror => write!(f, "codemirror"),
			InjectionMethod::Textarea => write!(f, "textarea"),
		}
	}
}

/// Result shape returned by the injection scripts.
#[derive(Debug, Clone, Deserialize)]
pub struct InjectionOutcome {
	#[serde(default)]
	pub success: bool,
	#[serde(default)]
	pub method: Option<InjectionMethod>,
	#[serde(default)]
	pub error: Option<String>,
}

/// Result shape returned by [`FIND_SAVE_CONTROL_JS`].
#[derive(Debug, Clone, Deserialize)]
pub struct SaveControl {
	#[serde(default)]
	pub found: bool,
	#[serde(default)]
	pub tag: Option<String>,
	#[serde(default)]
	pub label: Option<String>,
	#[serde(default)]
	pub disabled: bool,
}

/// Builds the full evaluate expression: the function expression applied
/// to the payload, embedded as a JSON string literal.
pub fn apply_script(js_fn: &str, payload: &str) -> serde_json::Result<String> {
	let literal = serde_json::to_string(payload)?;
	Ok(format!("{js_fn}({literal})"))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn apply_script_embeds_payload_as_json_literal() {
		let expr = apply_script(INJECT_CODE_JS, "line1\nsay \"hi\"").unwrap();
		assert!(expr.trim_start().starts_with("(function (code)"));
		assert!(expr.ends_with("(\"line1\\nsay \\\"hi\\\"\")"));
	}

	#[test]
	fn injection_outcome_parses_success_and_failure_shapes() {
		let ok: InjectionOutcome =
			serde_json::from_str(r#"{"success": true, "method": "codemirror"}"#).unwrap();
		assert!(ok.success);
		assert_eq!(ok.method, Some(InjectionMethod::Codemirror));

		let failed: InjectionOutcome =
			serde_json::from_str(r#"{"success": false, "error": "no textarea on page"}"#).unwrap();
		assert!(!failed.success);
		assert_eq!(failed.error.as_deref(), Some("no textarea on page"));
		assert!(failed.method.is_none());
	}

	#[test]
	fn save_control_defaults_cover_the_not_found_shape() {
		let missing: SaveControl = serde_json::from_str(r#"{"found": false}"#).unwrap();
		assert!(!missing.found);
		assert!(missing.tag.is_none());
		assert!(!missing.disabled);
	}
}
