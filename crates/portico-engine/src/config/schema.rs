use crate::selector::SelectorSet;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_TARGET_URL: &str = "http://localhost:8193/x_mgr/start/index.html#/user/login";

/// Everything a login run needs. Built once and never mutated by the runner.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginConfig {
    pub target_url: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    /// Launch the browser without a window.
    pub headless: bool,
    pub chrome_path: Option<PathBuf>,
    /// Attach to a running browser through its DevTools WebSocket URL.
    pub remote_url: Option<String>,
    pub screenshots: ScreenshotConfig,
    pub timeouts: Timeouts,
    pub selectors: SelectorSet,
}

impl Default for LoginConfig {
    fn default() -> Self {
        Self {
            target_url: DEFAULT_TARGET_URL.to_string(),
            username: "superadmin".to_string(),
            password: String::new(),
            // Unattended runs have no display; `--visible` opts back in.
            headless: true,
            chrome_path: None,
            remote_url: None,
            screenshots: ScreenshotConfig::default(),
            timeouts: Timeouts::default(),
            selectors: SelectorSet::default(),
        }
    }
}

impl fmt::Debug for LoginConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginConfig")
            .field("target_url", &self.target_url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("headless", &self.headless)
            .field("chrome_path", &self.chrome_path)
            .field("remote_url", &self.remote_url)
            .field("screenshots", &self.screenshots)
            .field("timeouts", &self.timeouts)
            .field("selectors", &self.selectors)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenshotConfig {
    pub enabled: bool,
    pub dir: PathBuf,
    pub full_page: bool,
}

impl Default for ScreenshotConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dir: PathBuf::from("."),
            full_page: true,
        }
    }
}

/// Bounds for every wait in the workflow, in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timeouts {
    /// Session connect and every plain remote call.
    pub operation_ms: u64,
    /// Existence and visibility checks of a single locator candidate.
    pub locate_ms: u64,
    pub clickable_ms: u64,
    /// Wait per success indicator during verification.
    pub success_indicator_ms: u64,
    /// Settle period after submitting the form.
    pub navigation_settle_ms: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            operation_ms: 30_000,
            locate_ms: 5_000,
            clickable_ms: 5_000,
            success_indicator_ms: 5_000,
            navigation_settle_ms: 10_000,
        }
    }
}

impl Timeouts {
    pub fn operation(&self) -> Duration {
        Duration::from_millis(self.operation_ms)
    }

    pub fn locate(&self) -> Duration {
        Duration::from_millis(self.locate_ms)
    }

    pub fn clickable(&self) -> Duration {
        Duration::from_millis(self.clickable_ms)
    }

    pub fn success_indicator(&self) -> Duration {
        Duration::from_millis(self.success_indicator_ms)
    }

    pub fn navigation_settle(&self) -> Duration {
        Duration::from_millis(self.navigation_settle_ms)
    }

    /// Every timeout shortened to `ms`. Handy for fast tests.
    pub fn uniform(ms: u64) -> Self {
        Self {
            operation_ms: ms,
            locate_ms: ms,
            clickable_ms: ms,
            success_indicator_ms: ms,
            navigation_settle_ms: ms,
        }
    }

    pub(crate) fn all(&self) -> [(&'static str, u64); 5] {
        [
            ("operation_ms", self.operation_ms),
            ("locate_ms", self.locate_ms),
            ("clickable_ms", self.clickable_ms),
            ("success_indicator_ms", self.success_indicator_ms),
            ("navigation_settle_ms", self.navigation_settle_ms),
        ]
    }
}
