use async_trait::async_trait;
pub use crate::error::BackendError;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Parameters used to establish a browser session.
#[derive(Debug, Clone, Default)]
pub struct ConnectOptions {
    /// Chrome/Chromium executable to launch. Falls back to auto-detection.
    pub chrome_path: Option<PathBuf>,
    /// DevTools WebSocket URL of an already running browser. When set the
    /// backend attaches instead of launching.
    pub remote_url: Option<String>,
    pub headless: bool,
    pub timeout: Duration,
}

/// The narrow capability interface the workflow needs from a browser.
///
/// Every method is a single remote call. Implementations own the session
/// handle; `close` must leave the backend in a state where `is_ready`
/// returns false.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Establish the session (launch a browser or attach to a remote one).
    async fn connect(&mut self, options: &ConnectOptions) -> Result<(), BackendError>;

    /// Whether a live session is held.
    async fn is_ready(&self) -> bool;

    /// Navigate the active page to `url`.
    async fn navigate(&mut self, url: &str) -> Result<(), BackendError>;

    /// Wait until the document reports it finished loading.
    async fn wait_for_load(&mut self, timeout: Duration) -> Result<(), BackendError>;

    async fn element_exists(&mut self, selector: &str) -> Result<bool, BackendError>;

    async fn is_element_visible(&mut self, selector: &str) -> Result<bool, BackendError>;

    async fn clear_field(&mut self, selector: &str) -> Result<(), BackendError>;

    async fn type_text(&mut self, selector: &str, text: &str) -> Result<(), BackendError>;

    /// Wait until the element is visible and enabled.
    async fn wait_for_clickable(
        &mut self,
        selector: &str,
        timeout: Duration,
    ) -> Result<(), BackendError>;

    async fn click(&mut self, selector: &str) -> Result<(), BackendError>;

    async fn get_element_text(&mut self, selector: &str) -> Result<String, BackendError>;

    /// Wait until an element matching `selector` is present.
    async fn wait_for_selector(
        &mut self,
        selector: &str,
        timeout: Duration,
    ) -> Result<(), BackendError>;

    async fn get_current_url(&mut self) -> Result<String, BackendError>;

    /// Capture the page and write it to `path`.
    async fn take_screenshot(
        &mut self,
        full_page: bool,
        path: &Path,
    ) -> Result<(), BackendError>;

    /// Wait for a navigation to finish, giving up quietly after `timeout`.
    async fn wait_for_navigation_or_timeout(
        &mut self,
        timeout: Duration,
    ) -> Result<(), BackendError>;

    /// Release the session.
    async fn close(&mut self) -> Result<(), BackendError>;
}

/// Bound a remote call so it can never block the run indefinitely.
pub async fn bounded<T, F>(operation: &str, timeout: Duration, call: F) -> Result<T, BackendError>
where
    F: Future<Output = Result<T, BackendError>>,
{
    match tokio::time::timeout(timeout, call).await {
        Ok(result) => result,
        Err(_) => Err(BackendError::Timeout {
            operation: operation.to_string(),
            timeout_ms: timeout.as_millis() as u64,
        }),
    }
}
