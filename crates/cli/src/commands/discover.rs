//! Editor discovery against the hub's listing pages.
//!
//! The hub has no API for "what id does the component named X have";
//! the only source of truth is the rendered listing page. Discovery
//! loads it, pauses for a manual sign-in when the hub asks for one,
//! and matches editor links two ways: a regex sweep over the raw HTML
//! with a proximity window for the name, then a coarser scan of link
//! rows for pages whose markup puts the name and the link in separate
//! elements. Page trouble is reported as not-found, never as a crash.

use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use hubpush_browser::{LaunchOptions, Session};

use crate::config::{self, HubConfig};
use crate::editor::LOGIN_FIELD_SELECTOR;
use crate::error::{PushError, Result};
use crate::output::{self, OutputFormat, ResultBuilder};
use crate::target::{ComponentKind, EditorTarget, list_url};
use crate::timing;

/// How far around an editor link the component name may sit.
const WINDOW_RADIUS: usize = 200;

/// Collects candidate rows: visible text plus the href carried by the
/// same element. Anchors are the usual hit; table rows and cells only
/// match on hubs that put hrefs on them directly.
const COLLECT_LINK_ROWS_JS: &str = r#"
(function () {
	const rows = [];
	for (const el of document.querySelectorAll('a, tr, td')) {
		const text = (el.innerText || '').trim();
		const href = el.getAttribute('href') || '';
		if (text && href) { rows.push({ text: text, href: href }); }
	}
	return rows;
})()
"#;

/// Data payload for a successful discovery.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoverData {
	pub kind: ComponentKind,
	pub name: String,
	pub id: u64,
	pub editor_url: String,
}

/// `discover` command entry point.
pub async fn execute(
	name: &str,
	kind: ComponentKind,
	hub_ip: Option<&str>,
	format: OutputFormat,
) -> Result<()> {
	let hub = config::resolve_hub(hub_ip, config::hub_from_env().as_deref())?;

	match find_editor_id(&hub, kind, name).await? {
		Some(id) => {
			let target = EditorTarget { kind, id };
			let data = DiscoverData {
				kind,
				name: name.to_string(),
				id,
				editor_url: target.editor_url(&hub),
			};
			let result = ResultBuilder::new("discover").data(data).build();
			output::print_result(&result, format);
			Ok(())
		}
		None => Err(PushError::EditorNotFound {
			kind: kind.to_string(),
			name: name.to_string(),
			hub: hub.addr.clone(),
		}),
	}
}

/// Looks up the editor id for `name` on the hub's listing page.
///
/// Always runs headed: the listing may sit behind the hub's login form,
/// and the sign-in pause only helps when a human can see the window.
pub async fn find_editor_id(
	hub: &HubConfig,
	kind: ComponentKind,
	name: &str,
) -> Result<Option<u64>> {
	let session = Session::launch(&LaunchOptions::default()).await?;
	let outcome = scan_listing(&session, hub, kind, name).await;
	session.close().await;

	match outcome {
		Ok(found) => Ok(found),
		Err(e) => {
			// A broken listing page reads the same as an absent
			// component; the caller decides how hard that failure is.
			warn!(target = "hubpush", error = %e, "listing scan failed");
			Ok(None)
		}
	}
}

async fn scan_listing(
	session: &Session,
	hub: &HubConfig,
	kind: ComponentKind,
	name: &str,
) -> Result<Option<u64>> {
	let page = session.page();
	let url = list_url(hub, kind);
	info!(target = "hubpush", url = %url, kind = %kind, name, "scanning listing page");

	page.goto(&url, timing::NAVIGATION).await?;
	tokio::time::sleep(timing::LIST_RENDER).await;

	if page.exists(LOGIN_FIELD_SELECTOR).await? {
		info!(target = "hubpush", secs = timing::MANUAL_LOGIN.as_secs(), "login form detected; pausing for manual sign-in");
		tokio::time::sleep(timing::MANUAL_LOGIN).await;
	}

	let html = page.content().await?;
	if let Some(id) = match_in_window(&html, kind, name) {
		info!(target = "hubpush", id, "matched editor link near name");
		return Ok(Some(id));
	}

	let rows = page.evaluate(COLLECT_LINK_ROWS_JS).await?;
	let rows: Vec<LinkRow> = serde_json::from_value(rows)?;
	let found = match_link_rows(&rows, kind, name);
	if let Some(id) = found {
		info!(target = "hubpush", id, "matched editor link via row scan");
	}
	Ok(found)
}

#[derive(Debug, Deserialize)]
struct LinkRow {
	text: String,
	href: String,
}

/// Regex pass: accept the first editor link whose surrounding window of
/// HTML mentions the name, case-insensitively.
fn match_in_window(html: &str, kind: ComponentKind, name: &str) -> Option<u64> {
	let pattern = format!(r"/{}/editor/(\d+)", kind.path_segment());
	let re = Regex::new(&pattern).ok()?;
	let needle = name.to_lowercase();

	for captures in re.captures_iter(html) {
		let (Some(whole), Some(id_match)) = (captures.get(0), captures.get(1)) else {
			continue;
		};
		let Ok(id) = id_match.as_str().parse::<u64>() else {
			continue;
		};
		let window = context_window(html, whole.start(), whole.end(), WINDOW_RADIUS);
		if window.to_lowercase().contains(&needle) {
			return Some(id);
		}
	}
	None
}

/// Row pass: the name and the link rendered by the same element.
fn match_link_rows(rows: &[LinkRow], kind: ComponentKind, name: &str) -> Option<u64> {
	let needle = name.to_lowercase();
	let section = format!("/{}/editor/", kind.path_segment());
	let id_re = Regex::new(r"/editor/(\d+)").ok()?;

	rows.iter()
		.filter(|row| row.text.to_lowercase().contains(&needle) && row.href.contains(&section))
		.find_map(|row| {
			id_re
				.captures(&row.href)
				.and_then(|captures| captures.get(1))
				.and_then(|id| id.as_str().parse::<u64>().ok())
		})
}

/// Slice around a match, clamped to char boundaries so multi-byte page
/// text never splits.
fn context_window(text: &str, start: usize, end: usize, radius: usize) -> &str {
	let mut from = start.saturating_sub(radius);
	while from > 0 && !text.is_char_boundary(from) {
		from -= 1;
	}
	let mut to = (end + radius).min(text.len());
	while to < text.len() && !text.is_char_boundary(to) {
		to += 1;
	}
	&text[from..to]
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn name_near_link_matches() {
		let html = r#"<tr><td>Porch Lights</td><td><a href="/app/editor/42">edit</a></td></tr>"#;
		assert_eq!(match_in_window(html, ComponentKind::App, "Porch Lights"), Some(42));
		assert_eq!(match_in_window(html, ComponentKind::App, "porch lights"), Some(42));
	}

	#[test]
	fn name_outside_the_window_does_not_match() {
		let padding = "x".repeat(400);
		let html = format!(r#"Porch Lights{padding}<a href="/app/editor/42">edit</a>"#);
		assert_eq!(match_in_window(&html, ComponentKind::App, "Porch Lights"), None);
	}

	#[test]
	fn kind_segments_are_not_interchangeable() {
		let html = r#"Relay <a href="/driver/editor/7">edit</a>"#;
		assert_eq!(match_in_window(html, ComponentKind::App, "Relay"), None);
		assert_eq!(match_in_window(html, ComponentKind::Driver, "Relay"), Some(7));
	}

	#[test]
	fn first_of_several_links_near_the_name_wins() {
		let html = r#"
			<a href="/app/editor/3">Porch Lights</a>
			<a href="/app/editor/9">Porch Lights (copy)</a>
		"#;
		assert_eq!(match_in_window(html, ComponentKind::App, "Porch Lights"), Some(3));
	}

	#[test]
	fn window_clamps_to_char_boundaries() {
		// Multi-byte text straddling the window edge must not panic.
		let html = format!("{}<a href=\"/app/editor/5\">x</a>", "€".repeat(150));
		assert_eq!(match_in_window(&html, ComponentKind::App, "missing name"), None);
		assert_eq!(match_in_window(&html, ComponentKind::App, "€€€"), Some(5));
	}

	#[test]
	fn row_scan_requires_name_and_section() {
		let rows = vec![
			LinkRow { text: "Porch Lights".into(), href: "/app/editor/42".into() },
			LinkRow { text: "Porch Lights".into(), href: "/driver/editor/7".into() },
			LinkRow { text: "Other App".into(), href: "/app/editor/9".into() },
		];
		assert_eq!(match_link_rows(&rows, ComponentKind::App, "porch lights"), Some(42));
		assert_eq!(match_link_rows(&rows, ComponentKind::Driver, "porch lights"), Some(7));
		assert_eq!(match_link_rows(&rows, ComponentKind::Driver, "Other App"), None);
	}
}
