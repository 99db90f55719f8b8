#![allow(dead_code)]

use async_trait::async_trait;
use portico_engine::backend::{Backend, BackendError, ConnectOptions};
use portico_engine::config::{LoginConfig, Timeouts};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const LOGIN_URL: &str = "http://localhost:8193/x_mgr/start/index.html#/user/login";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Connect,
    Navigate(String),
    WaitForLoad,
    Exists(String),
    Visible(String),
    Clear(String),
    Type(String, String),
    WaitClickable(String),
    Click(String),
    Text(String),
    WaitForSelector(String),
    CurrentUrl,
    Screenshot(PathBuf),
    WaitForNavigation,
    Close,
}

#[derive(Debug, Clone)]
pub struct FakeElement {
    pub visible: bool,
    pub clickable: bool,
    pub text: String,
    pub value: String,
}

impl FakeElement {
    pub fn visible() -> Self {
        Self {
            visible: true,
            clickable: true,
            text: String::new(),
            value: String::new(),
        }
    }

    pub fn hidden() -> Self {
        Self {
            visible: false,
            clickable: false,
            ..Self::visible()
        }
    }

    pub fn with_text(text: &str) -> Self {
        Self {
            text: text.to_string(),
            ..Self::visible()
        }
    }
}

/// In-memory page keyed by exact selector strings.
#[derive(Debug, Default)]
pub struct FakeBrowser {
    pub elements: HashMap<String, FakeElement>,
    /// Elements that appear once the submit button is clicked.
    pub after_click: Vec<(String, FakeElement)>,
    /// URL the page moves to once the submit button is clicked.
    pub url_after_click: Option<String>,
    pub fail_connect: bool,
    pub fail_navigate: bool,
    pub fail_type: HashSet<String>,
    pub erroring: HashSet<String>,
    pub fail_screenshots: bool,
    pub fail_close: bool,
    /// The post-submit navigation wait fails with a non-timeout error.
    pub fail_settle: bool,
    pub calls: Vec<Call>,
    connected: bool,
    url: String,
}

impl FakeBrowser {
    pub fn new() -> Self {
        Self {
            url: "about:blank".to_string(),
            ..Default::default()
        }
    }

    /// A page with `#username`, `#password` and a submit button.
    pub fn login_page() -> Self {
        Self::new()
            .with("#username", FakeElement::visible())
            .with("#password", FakeElement::visible())
            .with("button[type=\"submit\"]", FakeElement::visible())
    }

    pub fn with(mut self, selector: &str, element: FakeElement) -> Self {
        self.elements.insert(selector.to_string(), element);
        self
    }

    pub fn without(mut self, selector: &str) -> Self {
        self.elements.remove(selector);
        self
    }

    pub fn on_click_show(mut self, selector: &str, element: FakeElement) -> Self {
        self.after_click.push((selector.to_string(), element));
        self
    }

    pub fn on_click_go_to(mut self, url: &str) -> Self {
        self.url_after_click = Some(url.to_string());
        self
    }

    pub fn connected(&self) -> bool {
        self.connected
    }

    pub fn value_of(&self, selector: &str) -> Option<&str> {
        self.elements.get(selector).map(|e| e.value.as_str())
    }

    pub fn count(&self, wanted: impl Fn(&Call) -> bool) -> usize {
        self.calls.iter().filter(|c| wanted(c)).count()
    }

    pub fn clicked(&self) -> bool {
        self.calls.iter().any(|c| matches!(c, Call::Click(_)))
    }

    fn require_session(&self) -> Result<(), BackendError> {
        if self.connected {
            Ok(())
        } else {
            Err(BackendError::NotReady)
        }
    }

    fn element(&self, selector: &str) -> Result<&FakeElement, BackendError> {
        self.elements
            .get(selector)
            .ok_or_else(|| BackendError::ElementNotFound {
                selector: selector.to_string(),
            })
    }

    fn timeout(operation: &str, timeout: Duration) -> BackendError {
        BackendError::Timeout {
            operation: operation.to_string(),
            timeout_ms: timeout.as_millis() as u64,
        }
    }
}

#[async_trait]
impl Backend for FakeBrowser {
    async fn connect(&mut self, _options: &ConnectOptions) -> Result<(), BackendError> {
        self.calls.push(Call::Connect);
        if self.fail_connect {
            return Err(BackendError::Connection("no browser".into()));
        }
        self.connected = true;
        Ok(())
    }

    async fn is_ready(&self) -> bool {
        self.connected
    }

    async fn navigate(&mut self, url: &str) -> Result<(), BackendError> {
        self.calls.push(Call::Navigate(url.to_string()));
        self.require_session()?;
        if self.fail_navigate {
            return Err(BackendError::Navigation("net::ERR_CONNECTION_REFUSED".into()));
        }
        self.url = url.to_string();
        Ok(())
    }

    async fn wait_for_load(&mut self, _timeout: Duration) -> Result<(), BackendError> {
        self.calls.push(Call::WaitForLoad);
        self.require_session()
    }

    async fn element_exists(&mut self, selector: &str) -> Result<bool, BackendError> {
        self.calls.push(Call::Exists(selector.to_string()));
        self.require_session()?;
        if self.erroring.contains(selector) {
            return Err(BackendError::Script(format!("bad selector {}", selector)));
        }
        Ok(self.elements.contains_key(selector))
    }

    async fn is_element_visible(&mut self, selector: &str) -> Result<bool, BackendError> {
        self.calls.push(Call::Visible(selector.to_string()));
        Ok(self.element(selector)?.visible)
    }

    async fn clear_field(&mut self, selector: &str) -> Result<(), BackendError> {
        self.calls.push(Call::Clear(selector.to_string()));
        self.element(selector)?;
        if let Some(element) = self.elements.get_mut(selector) {
            element.value.clear();
        }
        Ok(())
    }

    async fn type_text(&mut self, selector: &str, text: &str) -> Result<(), BackendError> {
        self.calls
            .push(Call::Type(selector.to_string(), text.to_string()));
        if self.fail_type.contains(selector) {
            return Err(BackendError::Script("element is read-only".into()));
        }
        self.element(selector)?;
        if let Some(element) = self.elements.get_mut(selector) {
            element.value.push_str(text);
        }
        Ok(())
    }

    async fn wait_for_clickable(
        &mut self,
        selector: &str,
        timeout: Duration,
    ) -> Result<(), BackendError> {
        self.calls.push(Call::WaitClickable(selector.to_string()));
        let element = self.element(selector)?;
        if element.visible && element.clickable {
            Ok(())
        } else {
            Err(Self::timeout("wait_for_clickable", timeout))
        }
    }

    async fn click(&mut self, selector: &str) -> Result<(), BackendError> {
        self.calls.push(Call::Click(selector.to_string()));
        self.element(selector)?;
        for (selector, element) in self.after_click.drain(..) {
            self.elements.insert(selector, element);
        }
        if let Some(url) = self.url_after_click.take() {
            self.url = url;
        }
        Ok(())
    }

    async fn get_element_text(&mut self, selector: &str) -> Result<String, BackendError> {
        self.calls.push(Call::Text(selector.to_string()));
        Ok(self.element(selector)?.text.clone())
    }

    async fn wait_for_selector(
        &mut self,
        selector: &str,
        timeout: Duration,
    ) -> Result<(), BackendError> {
        self.calls.push(Call::WaitForSelector(selector.to_string()));
        if self.elements.contains_key(selector) {
            Ok(())
        } else {
            Err(Self::timeout("wait_for_selector", timeout))
        }
    }

    async fn get_current_url(&mut self) -> Result<String, BackendError> {
        self.calls.push(Call::CurrentUrl);
        self.require_session()?;
        Ok(self.url.clone())
    }

    async fn take_screenshot(
        &mut self,
        _full_page: bool,
        path: &Path,
    ) -> Result<(), BackendError> {
        self.calls.push(Call::Screenshot(path.to_path_buf()));
        self.require_session()?;
        if self.fail_screenshots {
            return Err(BackendError::Other("capture failed".into()));
        }
        tokio::fs::write(path, b"\x89PNG").await?;
        Ok(())
    }

    async fn wait_for_navigation_or_timeout(
        &mut self,
        _timeout: Duration,
    ) -> Result<(), BackendError> {
        self.calls.push(Call::WaitForNavigation);
        if self.fail_settle {
            return Err(BackendError::Navigation("frame detached".into()));
        }
        Ok(())
    }

    async fn close(&mut self) -> Result<(), BackendError> {
        self.calls.push(Call::Close);
        self.connected = false;
        if self.fail_close {
            return Err(BackendError::Other("browser already gone".into()));
        }
        Ok(())
    }
}

pub fn test_config(screenshot_dir: &Path) -> LoginConfig {
    let mut config = LoginConfig {
        target_url: LOGIN_URL.to_string(),
        username: "superadmin".to_string(),
        password: "abc123456".to_string(),
        timeouts: Timeouts::uniform(200),
        ..Default::default()
    };
    config.screenshots.dir = screenshot_dir.to_path_buf();
    config
}

/// A fake that is already connected, for exercising single operations.
pub async fn connected(browser: FakeBrowser) -> FakeBrowser {
    let mut browser = browser;
    browser
        .connect(&ConnectOptions::default())
        .await
        .expect("fake connect");
    browser.calls.clear();
    browser
}
