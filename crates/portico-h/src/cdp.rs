use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use portico_engine::ConnectOptions;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::task::JoinHandle;

pub struct CdpClient {
    pub browser: Browser,
    pub handler_task: JoinHandle<()>,
    pub page: Page,
    /// Attached to a browser we did not launch; closing only detaches.
    attached: bool,
    // Declared last so the browser is dropped before its profile goes away.
    profile: Option<ProfileDir>,
}

/// Chromium profile directory. A temporary one is removed on drop, so every
/// exit path of `launch` and `close` cleans it up.
struct ProfileDir {
    path: PathBuf,
    temporary: bool,
}

impl ProfileDir {
    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ProfileDir {
    fn drop(&mut self) {
        if !self.temporary {
            return;
        }
        if let Err(e) = std::fs::remove_dir_all(&self.path) {
            tracing::debug!(
                "Failed to clean up user-data-dir {}: {}",
                self.path.display(),
                e
            );
        }
    }
}

impl CdpClient {
    pub async fn launch(
        options: &ConnectOptions,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let mut config_builder = BrowserConfig::builder();
        config_builder = config_builder.no_sandbox(); // Often needed in docker/CI/restricted envs
        config_builder = config_builder.request_timeout(options.timeout);
        let profile = resolve_user_data_dir()?;
        config_builder = config_builder.user_data_dir(profile.path());

        if options.headless {
            tracing::info!("Launching browser in headless mode");
        } else {
            tracing::info!("Launching browser in visible mode");
            config_builder = config_builder.with_head();
        }

        // Explicit path wins over CHROME_BIN
        let chrome_bin = options
            .chrome_path
            .clone()
            .or_else(|| std::env::var("CHROME_BIN").ok().map(PathBuf::from));
        if let Some(chrome_bin) = chrome_bin {
            tracing::info!("Using custom Chrome binary: {}", chrome_bin.display());
            config_builder = config_builder.chrome_executable(chrome_bin);
        }

        let (browser, handler) = Browser::launch(
            config_builder
                .build()
                .map_err(|e| format!("Failed to build browser config: {}", e))?,
        )
        .await
        .map_err(|e| format!("Failed to launch browser: {}", e))?;

        let handler_task = spawn_handler(handler);
        let page = open_page(&browser).await?;

        Ok(Self {
            browser,
            handler_task,
            page,
            attached: false,
            profile: Some(profile),
        })
    }

    /// Attach to a running browser through its DevTools WebSocket URL.
    pub async fn connect(url: &str) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        tracing::info!("Attaching to browser at {}", url);
        let (browser, handler) = Browser::connect(url)
            .await
            .map_err(|e| format!("Failed to connect to {}: {}", url, e))?;

        let handler_task = spawn_handler(handler);
        let page = open_page(&browser).await?;

        Ok(Self {
            browser,
            handler_task,
            page,
            attached: true,
            profile: None,
        })
    }

    pub async fn close(mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if self.attached {
            if let Err(e) = self.page.close().await {
                tracing::debug!("Failed to close page on remote browser: {}", e);
            }
            self.handler_task.abort();
            return Ok(());
        }

        let closed = self
            .browser
            .close()
            .await
            .map(|_| ())
            .map_err(|e| format!("Error closing browser: {}", e));
        // The handler only ends once the connection drops.
        if closed.is_err() {
            self.handler_task.abort();
        }
        let joined = match self.handler_task.await {
            Err(e) if !e.is_cancelled() => Err(format!("Error awaiting handler: {}", e)),
            _ => Ok(()),
        };

        // Remove the profile whether or not the browser shut down cleanly.
        drop(self.profile.take());

        closed?;
        joined?;
        Ok(())
    }
}

fn spawn_handler(mut handler: chromiumoxide::Handler) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(h) = handler.next().await {
            if let Err(e) = h {
                tracing::error!("Browser handler error (ignoring): {}", e);
                continue;
            }
        }
        tracing::info!("Browser handler task ended");
    })
}

async fn open_page(browser: &Browser) -> Result<Page, Box<dyn std::error::Error + Send + Sync>> {
    let page = browser
        .new_page("about:blank")
        .await
        .map_err(|e| format!("Failed to create page: {}", e))?;

    let mut console_events = page
        .event_listener::<chromiumoxide::cdp::js_protocol::runtime::EventConsoleApiCalled>()
        .await
        .map_err(|e| format!("Failed to subscribe to console events: {}", e))?;

    tokio::spawn(async move {
        while let Some(event) = console_events.next().await {
            let args_str: Vec<String> = event
                .args
                .iter()
                .map(|arg| {
                    arg.description
                        .clone()
                        .unwrap_or_else(|| "unknown".to_string())
                })
                .collect();
            tracing::debug!(
                "Browser Console [{:?}]: {}",
                event.r#type,
                args_str.join(" ")
            );
        }
    });

    // Login pages often report bad credentials through alert(); accept it so
    // the page keeps running and the error shows up in the logs instead.
    let mut dialog_events = page
        .event_listener::<chromiumoxide::cdp::browser_protocol::page::EventJavascriptDialogOpening>()
        .await
        .map_err(|e| format!("Failed to subscribe to dialog events: {}", e))?;

    let page_clone = page.clone();
    tokio::spawn(async move {
        while let Some(event) = dialog_events.next().await {
            tracing::warn!(
                "Handling JavaScript Dialog: {} ({:?})",
                event.message,
                event.r#type
            );
            let cmd =
                chromiumoxide::cdp::browser_protocol::page::HandleJavaScriptDialogParams::new(true);
            if let Err(e) = page_clone.execute(cmd).await {
                tracing::error!("Failed to handle/accept dialog: {}", e);
            }
        }
    });

    Ok(page)
}

fn resolve_user_data_dir() -> Result<ProfileDir, Box<dyn std::error::Error + Send + Sync>> {
    if let Ok(dir) = std::env::var("PORTICO_USER_DATA_DIR") {
        let path = PathBuf::from(dir);
        std::fs::create_dir_all(&path)?;
        tracing::info!(
            "Using user data dir from PORTICO_USER_DATA_DIR: {}",
            path.display()
        );
        return Ok(ProfileDir {
            path,
            temporary: false,
        });
    }

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| format!("System clock error: {}", e))?
        .as_nanos();
    let unique = format!("portico-chromium-profile-{}-{}", std::process::id(), nanos);
    let path = std::env::temp_dir().join(unique);
    std::fs::create_dir_all(&path)?;
    tracing::info!("Using isolated user data dir: {}", path.display());
    Ok(ProfileDir {
        path,
        temporary: true,
    })
}
