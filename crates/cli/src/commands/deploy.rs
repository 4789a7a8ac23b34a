//! Deploy: open the editor page, replace its contents, save, and read
//! back the verdict.
//!
//! One deploy is one browser session. The session is launched after the
//! source file and target are known good, torn down on every path, and
//! never reused; leaving a hub editor open in a half-saved state is
//! worse than paying the launch again next time.

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use hubpush_browser::{LaunchOptions, Page, Session};

use crate::config;
use crate::editor::{self, InjectionMethod, InjectionOutcome, SaveControl};
use crate::error::{PushError, Result};
use crate::hooks;
use crate::output::{self, OutputFormat, ResultBuilder};
use crate::scrape::{self, ScrapeReport};
use crate::source::SourceFile;
use crate::target::{ComponentKind, EditorTarget};
use crate::timing;

use super::discover;

/// Everything the deploy command was invoked with.
#[derive(Debug)]
pub struct DeployRequest {
	pub source_path: PathBuf,
	pub editor_url: Option<String>,
	pub auto: bool,
	pub kind: Option<ComponentKind>,
	pub hub_ip: Option<String>,
	pub headless: bool,
	pub post_hook: Option<String>,
	pub artifacts_dir: Option<PathBuf>,
}

/// Data payload for a successful deploy.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployData {
	pub editor_url: String,
	pub method: InjectionMethod,
	pub chars: usize,
	pub forced_click: bool,
}

struct Deployed {
	method: InjectionMethod,
	forced_click: bool,
}

/// `deploy` command entry point.
pub async fn execute(request: DeployRequest, format: OutputFormat) -> Result<()> {
	let source = SourceFile::load(&request.source_path)?;
	info!(
		target = "hubpush",
		path = %source.path.display(),
		chars = source.text.len(),
		"loaded source"
	);

	let editor_url = resolve_editor_url(&request, &source).await?;

	let launch = LaunchOptions { headless: request.headless, ..Default::default() };
	let session = Session::launch(&launch).await?;

	let outcome = run_deploy(session.page(), &editor_url, &source.text).await;

	// Capture failure evidence while the page still exists.
	if outcome.is_err() {
		if let Some(dir) = &request.artifacts_dir {
			save_failure_screenshot(session.page(), dir).await;
		}
	}

	session.close().await;

	// The hook runs after teardown on success and failure alike, so a
	// refocus or notification fires even when the hub said no.
	if let Some(hook) = &request.post_hook {
		hooks::run_post_hook(hook).await;
	}

	let deployed = outcome?;
	info!(target = "hubpush", method = %deployed.method, "deploy complete");

	let result = ResultBuilder::new("deploy")
		.data(DeployData {
			editor_url,
			method: deployed.method,
			chars: source.text.len(),
			forced_click: deployed.forced_click,
		})
		.build();
	output::print_result(&result, format);
	Ok(())
}

/// An explicit URL wins; otherwise `--auto` sniffs the source and asks
/// the listing page. With neither, the command has no target.
async fn resolve_editor_url(request: &DeployRequest, source: &SourceFile) -> Result<String> {
	if let Some(url) = &request.editor_url {
		return Ok(url.clone());
	}
	if !request.auto {
		return Err(PushError::MissingTarget);
	}

	let hub = config::resolve_hub(request.hub_ip.as_deref(), config::hub_from_env().as_deref())?;
	let kind = request.kind.unwrap_or_else(|| source.sniff_kind());
	let name = source.component_name(kind);
	info!(target = "hubpush", kind = %kind, name = %name, "auto-discovering editor");

	match discover::find_editor_id(&hub, kind, &name).await? {
		Some(id) => Ok(EditorTarget { kind, id }.editor_url(&hub)),
		None => Err(PushError::EditorNotFound {
			kind: kind.to_string(),
			name,
			hub: hub.addr.clone(),
		}),
	}
}

async fn run_deploy(page: &Page, editor_url: &str, code: &str) -> Result<Deployed> {
	info!(target = "hubpush", url = %editor_url, "opening editor page");
	page.goto(editor_url, timing::NAVIGATION).await?;
	tokio::time::sleep(timing::EDITOR_RENDER).await;

	if page.exists(editor::LOGIN_FIELD_SELECTOR).await? {
		info!(
			target = "hubpush",
			secs = timing::MANUAL_LOGIN.as_secs(),
			"login form detected; pausing for manual sign-in"
		);
		tokio::time::sleep(timing::MANUAL_LOGIN).await;
	}

	let method = inject(page, code).await?;
	info!(target = "hubpush", method = %method, "code injected");

	tokio::time::sleep(timing::PRE_SAVE).await;
	let forced_click = save(page).await?;

	tokio::time::sleep(timing::SAVE_PROCESS).await;
	tokio::time::sleep(timing::BANNER_RENDER).await;

	let report = scrape_page(page).await?;
	if !report.is_clean() {
		warn!(target = "hubpush", count = report.errors.len(), "hub reported compilation errors");
		return Err(PushError::CompilationErrors { errors: report.errors });
	}

	info!(target = "hubpush", "no validation errors on page");
	Ok(Deployed { method, forced_click })
}

/// Writes the payload into the page: the widget script first (which
/// itself falls back to the textarea when no editor instance exists),
/// then a bare textarea fill when the widget never appeared or the
/// script path failed.
async fn inject(page: &Page, code: &str) -> Result<InjectionMethod> {
	// A timeout means the widget never mounted; anything else is real
	// browser trouble and must not be mistaken for a plain page.
	let widget_ready = match page
		.wait_for_selector(editor::EDITOR_CONTAINER_SELECTOR, timing::EDITOR_WIDGET)
		.await
	{
		Ok(()) => true,
		Err(e) if e.is_timeout() => false,
		Err(e) => return Err(e.into()),
	};

	if widget_ready {
		tokio::time::sleep(timing::EDITOR_SETTLE).await;
		let expression = editor::apply_script(editor::INJECT_CODE_JS, code)?;
		match page.evaluate(&expression).await {
			Ok(value) => {
				let outcome: InjectionOutcome = serde_json::from_value(value)?;
				match (outcome.success, outcome.method) {
					(true, Some(method)) => return Ok(method),
					_ => warn!(
						target = "hubpush",
						error = outcome.error.as_deref().unwrap_or("unknown"),
						"widget injection failed; trying raw textarea"
					),
				}
			}
			Err(e) => {
				warn!(target = "hubpush", error = %e, "widget injection threw; trying raw textarea");
			}
		}
	} else {
		warn!(target = "hubpush", "code widget never appeared; trying raw textarea");
	}

	let expression = editor::apply_script(editor::FILL_TEXTAREA_JS, code)?;
	let value = page.evaluate(&expression).await?;
	let outcome: InjectionOutcome = serde_json::from_value(value)?;
	match (outcome.success, outcome.method) {
		(true, Some(method)) => Ok(method),
		_ => {
			let reason = outcome.error.unwrap_or_else(|| "unknown".to_string());
			if reason.contains("no textarea") {
				Err(PushError::EditorWidgetNotFound)
			} else {
				Err(PushError::InjectionFailed(reason))
			}
		}
	}
}

/// Finds, waits on and activates the save control. Returns whether the
/// click had to be forced at script level.
async fn save(page: &Page) -> Result<bool> {
	let value = page.evaluate(editor::FIND_SAVE_CONTROL_JS).await?;
	let control: SaveControl = serde_json::from_value(value)?;
	if !control.found {
		return Err(PushError::SaveButtonNotFound);
	}
	info!(
		target = "hubpush",
		tag = control.tag.as_deref().unwrap_or("?"),
		label = control.label.as_deref().unwrap_or(""),
		"save control found"
	);

	tokio::time::sleep(timing::SAVE_REGISTER).await;

	if wait_until_enabled(page).await? {
		page.click_selector(editor::SAVE_CONTROL_SELECTOR).await?;
		info!(target = "hubpush", "save clicked");
		Ok(false)
	} else {
		// Some hub pages never flip the disabled attribute even though
		// the handler works; a script click still lands.
		warn!(target = "hubpush", "save control never enabled; forcing script click");
		let value = page.evaluate(editor::FORCE_CLICK_SAVE_JS).await?;
		let clicked = value.get("clicked").and_then(Value::as_bool).unwrap_or(false);
		if !clicked {
			return Err(PushError::SaveButtonNotFound);
		}
		Ok(true)
	}
}

async fn wait_until_enabled(page: &Page) -> Result<bool> {
	let deadline = tokio::time::Instant::now() + timing::SAVE_ENABLE;
	loop {
		let value = page.evaluate(editor::SAVE_ENABLED_JS).await?;
		if value.as_bool().unwrap_or(false) {
			return Ok(true);
		}
		if tokio::time::Instant::now() + timing::SAVE_ENABLE_POLL > deadline {
			return Ok(false);
		}
		tokio::time::sleep(timing::SAVE_ENABLE_POLL).await;
	}
}

/// Both scrape passes over the settled page, merged and de-duplicated.
async fn scrape_page(page: &Page) -> Result<ScrapeReport> {
	let banners = page.evaluate(scrape::COLLECT_BANNERS_JS).await?;
	let banners: Vec<String> = serde_json::from_value(banners)?;
	let banner_errors = scrape::filter_banner_errors(banners.iter().map(String::as_str));

	let body = page.body_text().await?;
	let line_errors = scrape::collect_line_errors(&body);

	let errors = scrape::merge_errors(banner_errors, line_errors);
	Ok(ScrapeReport { errors })
}

async fn save_failure_screenshot(page: &Page, dir: &Path) {
	let stamp = std::time::SystemTime::now()
		.duration_since(std::time::UNIX_EPOCH)
		.map(|d| d.as_secs())
		.unwrap_or(0);
	let path = dir.join(format!("deploy-failure-{stamp}.png"));

	let saved = async {
		tokio::fs::create_dir_all(dir).await?;
		let png = page.screenshot().await?;
		tokio::fs::write(&path, png).await?;
		Ok::<_, PushError>(())
	}
	.await;

	match saved {
		Ok(()) => info!(target = "hubpush", path = %path.display(), "saved failure screenshot"),
		Err(e) => warn!(target = "hubpush", error = %e, "could not save failure screenshot"),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn request(editor_url: Option<&str>, auto: bool) -> DeployRequest {
		DeployRequest {
			source_path: PathBuf::from("app.groovy"),
			editor_url: editor_url.map(String::from),
			auto,
			kind: None,
			hub_ip: None,
			headless: false,
			post_hook: None,
			artifacts_dir: None,
		}
	}

	fn sample_source() -> SourceFile {
		SourceFile {
			path: PathBuf::from("app.groovy"),
			text: "definition(name: \"Porch Lights\")".into(),
		}
	}

	#[tokio::test]
	async fn explicit_url_skips_discovery() {
		let request = request(Some("http://10.0.0.2/app/editor/5"), true);
		let url = resolve_editor_url(&request, &sample_source()).await.unwrap();
		assert_eq!(url, "http://10.0.0.2/app/editor/5");
	}

	#[tokio::test]
	async fn no_url_and_no_auto_is_missing_target() {
		let request = request(None, false);
		let err = resolve_editor_url(&request, &sample_source()).await.unwrap_err();
		assert!(matches!(err, PushError::MissingTarget));
	}
}
