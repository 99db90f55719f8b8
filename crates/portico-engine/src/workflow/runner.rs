use super::result::WorkflowResult;
use super::step::login_steps;
use super::verify::Verifier;
use crate::backend::{Backend, ConnectOptions, bounded};
use crate::config::LoginConfig;
use crate::diagnostics::SnapshotRecorder;
use crate::error::WorkflowError;
use crate::locator::locate;
use crate::selector::SelectorGroup;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Drives one browser session through the login workflow.
///
/// The runner owns the backend from construction through `cleanup`; nothing
/// else touches the session.
pub struct WorkflowRunner<B: Backend> {
    backend: B,
    config: LoginConfig,
    snapshots: SnapshotRecorder,
}

impl<B: Backend> WorkflowRunner<B> {
    pub fn new(backend: B, config: LoginConfig) -> Self {
        let snapshots = SnapshotRecorder::new(config.screenshots.clone());
        Self {
            backend,
            config,
            snapshots,
        }
    }

    pub fn config(&self) -> &LoginConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Snapshot tags captured during the current run.
    pub fn snapshots(&self) -> &[String] {
        self.snapshots.tags()
    }

    fn operation_timeout(&self) -> Duration {
        self.config.timeouts.operation()
    }

    pub async fn initialize(&mut self) -> bool {
        info!("Initializing browser...");
        let options = ConnectOptions {
            chrome_path: self.config.chrome_path.clone(),
            remote_url: self.config.remote_url.clone(),
            headless: self.config.headless,
            timeout: self.operation_timeout(),
        };

        let timeout = self.operation_timeout();
        match bounded("connect", timeout, self.backend.connect(&options)).await {
            Ok(()) => {
                info!("Browser initialized successfully");
                true
            }
            Err(e) => {
                error!("{}", WorkflowError::Connection(e));
                false
            }
        }
    }

    pub async fn navigate(&mut self) -> bool {
        let url = self.config.target_url.clone();
        let timeout = self.operation_timeout();
        info!("Navigating to: {}", url);

        let loaded = async {
            bounded("navigate", timeout, self.backend.navigate(&url)).await?;
            bounded("wait_for_load", timeout, self.backend.wait_for_load(timeout)).await
        };
        match loaded.await {
            Ok(()) => {
                info!("Page loaded successfully");
                true
            }
            Err(e) => {
                error!("{}", WorkflowError::Navigation(e));
                false
            }
        }
    }

    /// First present and visible candidate of `group`.
    pub async fn locate(
        &mut self,
        group: &SelectorGroup,
        per_selector_timeout: Duration,
    ) -> Result<String, WorkflowError> {
        locate(&mut self.backend, group, per_selector_timeout).await
    }

    /// Locate the field, clear it and type `value` into it.
    pub async fn fill_field(&mut self, group: &SelectorGroup, value: &str) -> bool {
        let per_selector = self.config.timeouts.locate();
        let selector = match self.locate(group, per_selector).await {
            Ok(selector) => selector,
            Err(e) => {
                error!("Failed to fill field: {}", e);
                return false;
            }
        };

        let timeout = self.operation_timeout();
        let written = async {
            bounded("clear_field", timeout, self.backend.clear_field(&selector)).await?;
            bounded("type", timeout, self.backend.type_text(&selector, value)).await
        };
        match written.await {
            Ok(()) => true,
            Err(e) => {
                error!("Failed to fill '{}': {}", selector, e);
                false
            }
        }
    }

    /// Locate the trigger, wait until it is actionable and click it.
    pub async fn submit(&mut self, group: &SelectorGroup) -> bool {
        info!("Submitting login form...");
        let per_selector = self.config.timeouts.locate();
        let selector = match self.locate(group, per_selector).await {
            Ok(selector) => selector,
            Err(e) => {
                error!("Failed to submit login form: {}", e);
                return false;
            }
        };

        let clickable = self.config.timeouts.clickable();
        let timeout = self.operation_timeout();
        let clicked = async {
            bounded(
                "wait_for_clickable",
                clickable,
                self.backend.wait_for_clickable(&selector, clickable),
            )
            .await?;
            bounded("click", timeout, self.backend.click(&selector)).await
        };
        match clicked.await {
            Ok(()) => {
                info!("Login form submitted");
                true
            }
            Err(e) => {
                error!("Failed to submit login form: {}", e);
                false
            }
        }
    }

    pub async fn verify(&mut self) -> WorkflowResult {
        Verifier::new(&self.config).verify(&mut self.backend).await
    }

    /// Execute the complete login workflow.
    ///
    /// Returns `Err(WorkflowError::StepFailed)` when a step fails; the
    /// verifier is never reached in that case.
    pub async fn run(&mut self) -> Result<WorkflowResult, WorkflowError> {
        info!("Starting login automation workflow");
        self.snapshots.reset();

        for step in login_steps::<B>() {
            info!("Step: {}", step.name);
            if !(step.action)(self).await {
                self.snapshot(&format!("{}-failed", step.name)).await;
                self.snapshot("login-failed").await;
                return Err(WorkflowError::StepFailed {
                    step: step.name.to_string(),
                });
            }
        }

        info!("Waiting for login completion...");
        let settle = self.config.timeouts.navigation_settle();
        // Headroom so a backend honouring `settle` itself is never cut short.
        let guard = settle + self.operation_timeout();
        match bounded(
            "wait_for_navigation_or_timeout",
            guard,
            self.backend.wait_for_navigation_or_timeout(settle),
        )
        .await
        {
            Ok(()) => {}
            Err(e) if e.is_timeout() => debug!("No navigation within settle period"),
            Err(e) => warn!("Waiting for navigation failed: {}", e),
        }

        let result = self.verify().await;
        self.snapshot(result.snapshot_tag()).await;

        if result.success {
            info!("Login automation completed successfully");
        } else {
            info!(
                "Login automation failed: {}",
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
        Ok(result)
    }

    async fn snapshot(&mut self, tag: &str) {
        let timeout = self.operation_timeout();
        self.snapshots.capture(&mut self.backend, tag, timeout).await;
    }

    /// Release the session. Never fails; calling it again is a no-op.
    pub async fn cleanup(&mut self) {
        if !self.backend.is_ready().await {
            debug!("No browser session to close");
            return;
        }

        let timeout = self.operation_timeout();
        match bounded("close", timeout, self.backend.close()).await {
            Ok(()) => info!("Browser session closed"),
            Err(e) => warn!("{}", WorkflowError::Cleanup(e)),
        }
    }
}
