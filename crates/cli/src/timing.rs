//! Wait durations for hub page automation.
//!
//! The hub serves classic server-rendered pages with a few scripted
//! islands (the code widget, the save-state tracker). These settle
//! times are tuned to how slowly a small embedded hub renders them;
//! none of the pages expose a readiness signal worth polling instead.

use std::time::Duration;

/// Overall navigation timeout, to DOMContentLoaded.
pub const NAVIGATION: Duration = Duration::from_secs(30);

/// Render settle after a listing page loads.
pub const LIST_RENDER: Duration = Duration::from_secs(2);

/// Render settle after an editor page loads.
pub const EDITOR_RENDER: Duration = Duration::from_secs(3);

/// Pause for manual credential entry when a login form is present.
pub const MANUAL_LOGIN: Duration = Duration::from_secs(10);

/// How long the code widget gets to initialize.
pub const EDITOR_WIDGET: Duration = Duration::from_secs(15);

/// Extra settle once the widget container exists.
pub const EDITOR_SETTLE: Duration = Duration::from_secs(2);

/// UI settle between injection and the save-control search.
pub const PRE_SAVE: Duration = Duration::from_secs(1);

/// Wait for the page to register the modification before saving.
pub const SAVE_REGISTER: Duration = Duration::from_secs(2);

/// How long the save control gets to become interactive.
pub const SAVE_ENABLE: Duration = Duration::from_secs(10);

/// Poll interval while waiting for the save control to enable.
pub const SAVE_ENABLE_POLL: Duration = Duration::from_millis(500);

/// Wait for the hub to process the save after the click lands.
pub const SAVE_PROCESS: Duration = Duration::from_secs(3);

/// Wait for validation banners to render before scraping.
pub const BANNER_RENDER: Duration = Duration::from_millis(1500);
