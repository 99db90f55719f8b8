use crate::cdp::CdpClient;
use crate::dom::{self, eval, poll_until};
use async_trait::async_trait;
use chromiumoxide::page::ScreenshotParams;
use portico_engine::backend::{Backend, BackendError, ConnectOptions};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// Chromium over CDP, either launched locally or attached remotely.
pub struct HeadlessBackend {
    client: Option<CdpClient>,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self { client: None }
    }

    fn page(&self) -> Result<&chromiumoxide::Page, BackendError> {
        self.client
            .as_ref()
            .map(|c| &c.page)
            .ok_or(BackendError::NotReady)
    }
}

impl Default for HeadlessBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Backend for HeadlessBackend {
    async fn connect(&mut self, options: &ConnectOptions) -> Result<(), BackendError> {
        if self.client.is_some() {
            debug!("Session already established");
            return Ok(());
        }

        let client = match &options.remote_url {
            Some(url) => CdpClient::connect(url).await,
            None => {
                info!("Launching Headless Backend (Chromium)...");
                CdpClient::launch(options).await
            }
        }
        .map_err(|e| BackendError::Connection(e.to_string()))?;

        self.client = Some(client);
        Ok(())
    }

    async fn is_ready(&self) -> bool {
        self.client.is_some()
    }

    async fn navigate(&mut self, url: &str) -> Result<(), BackendError> {
        let page = self.page()?;
        page.goto(url)
            .await
            .map_err(|e| BackendError::Navigation(e.to_string()))?;
        Ok(())
    }

    async fn wait_for_load(&mut self, timeout: Duration) -> Result<(), BackendError> {
        let page = self.page()?;
        poll_until(page, dom::READY_SCRIPT, "wait_for_load", timeout).await
    }

    async fn element_exists(&mut self, selector: &str) -> Result<bool, BackendError> {
        eval(self.page()?, &dom::exists_script(selector)).await
    }

    async fn is_element_visible(&mut self, selector: &str) -> Result<bool, BackendError> {
        eval(self.page()?, &dom::visible_script(selector)).await
    }

    async fn clear_field(&mut self, selector: &str) -> Result<(), BackendError> {
        let cleared: bool = eval(self.page()?, &dom::clear_script(selector)).await?;
        if cleared {
            Ok(())
        } else {
            Err(BackendError::ElementNotFound {
                selector: selector.to_string(),
            })
        }
    }

    async fn type_text(&mut self, selector: &str, text: &str) -> Result<(), BackendError> {
        let page = self.page()?;
        let element = page
            .find_element(selector)
            .await
            .map_err(|_| BackendError::ElementNotFound {
                selector: selector.to_string(),
            })?;
        element
            .focus()
            .await
            .map_err(|e| BackendError::Other(format!("focus failed: {}", e)))?;
        element
            .type_str(text)
            .await
            .map_err(|e| BackendError::Other(format!("type failed: {}", e)))?;
        Ok(())
    }

    async fn wait_for_clickable(
        &mut self,
        selector: &str,
        timeout: Duration,
    ) -> Result<(), BackendError> {
        let page = self.page()?;
        poll_until(
            page,
            &dom::clickable_script(selector),
            "wait_for_clickable",
            timeout,
        )
        .await
    }

    async fn click(&mut self, selector: &str) -> Result<(), BackendError> {
        let page = self.page()?;
        let element = page
            .find_element(selector)
            .await
            .map_err(|_| BackendError::ElementNotFound {
                selector: selector.to_string(),
            })?;
        element
            .click()
            .await
            .map_err(|e| BackendError::Other(format!("click failed: {}", e)))?;
        Ok(())
    }

    async fn get_element_text(&mut self, selector: &str) -> Result<String, BackendError> {
        let text: Option<String> = eval(self.page()?, &dom::text_script(selector)).await?;
        text.ok_or_else(|| BackendError::ElementNotFound {
            selector: selector.to_string(),
        })
    }

    async fn wait_for_selector(
        &mut self,
        selector: &str,
        timeout: Duration,
    ) -> Result<(), BackendError> {
        let page = self.page()?;
        poll_until(
            page,
            &dom::exists_script(selector),
            "wait_for_selector",
            timeout,
        )
        .await
    }

    async fn get_current_url(&mut self) -> Result<String, BackendError> {
        let page = self.page()?;
        let url = page
            .url()
            .await
            .map_err(|e| BackendError::Navigation(e.to_string()))?;
        Ok(url.unwrap_or_default())
    }

    async fn take_screenshot(&mut self, full_page: bool, path: &Path) -> Result<(), BackendError> {
        let page = self.page()?;
        let bytes = page
            .screenshot(ScreenshotParams::builder().full_page(full_page).build())
            .await
            .map_err(|e| BackendError::Other(format!("Screenshot failed: {}", e)))?;
        tokio::fs::write(path, bytes).await?;
        Ok(())
    }

    async fn wait_for_navigation_or_timeout(
        &mut self,
        timeout: Duration,
    ) -> Result<(), BackendError> {
        let page = self.page()?;
        match tokio::time::timeout(timeout, page.wait_for_navigation()).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(BackendError::Navigation(e.to_string())),
            Err(_) => {
                debug!("No navigation within {:?}", timeout);
                Ok(())
            }
        }
    }

    async fn close(&mut self) -> Result<(), BackendError> {
        if let Some(client) = self.client.take() {
            client
                .close()
                .await
                .map_err(|e| BackendError::Other(e.to_string()))?;
        }
        Ok(())
    }
}
