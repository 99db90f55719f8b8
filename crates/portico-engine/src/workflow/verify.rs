use super::result::{Verdict, WorkflowResult};
use crate::backend::{Backend, BackendError, bounded};
use crate::config::LoginConfig;
use crate::error::WorkflowError;
use tracing::{debug, info, warn};

/// Decides whether a submitted login worked.
///
/// Tiers are evaluated in strict order and the first conclusive one wins:
/// error indicators, then success indicators, then a URL comparison against
/// the login page. The URL tier is a heuristic: a rejected login that also
/// redirects is reported as a success.
pub struct Verifier<'a> {
    config: &'a LoginConfig,
}

impl<'a> Verifier<'a> {
    pub fn new(config: &'a LoginConfig) -> Self {
        Self { config }
    }

    pub async fn verify<B: Backend + ?Sized>(&self, backend: &mut B) -> WorkflowResult {
        info!("Checking login status...");
        match self.evaluate(backend).await {
            Ok(result) => result,
            Err(e) => {
                warn!("Error checking login status: {}", e);
                WorkflowResult::failure(e.to_string(), Verdict::VerificationError)
            }
        }
    }

    async fn evaluate<B: Backend + ?Sized>(
        &self,
        backend: &mut B,
    ) -> Result<WorkflowResult, BackendError> {
        if let Some(result) = self.check_errors(backend).await? {
            return Ok(result);
        }
        if let Some(result) = self.check_success(backend).await {
            return Ok(result);
        }
        self.check_location(backend).await
    }

    async fn check_errors<B: Backend + ?Sized>(
        &self,
        backend: &mut B,
    ) -> Result<Option<WorkflowResult>, BackendError> {
        let timeout = self.config.timeouts.operation();
        for selector in &self.config.selectors.error_indicators {
            let present =
                bounded("element_exists", timeout, backend.element_exists(selector)).await?;
            if !present {
                continue;
            }

            let text = bounded(
                "get_element_text",
                timeout,
                backend.get_element_text(selector),
            )
            .await?;
            let text = text.trim();
            let message = if text.is_empty() {
                format!("Login error indicator present: {}", selector)
            } else {
                text.to_string()
            };

            info!("Login failed with error: {}", message);
            return Ok(Some(WorkflowResult::failure(
                message,
                Verdict::ErrorIndicator {
                    selector: selector.clone(),
                },
            )));
        }
        Ok(None)
    }

    async fn check_success<B: Backend + ?Sized>(&self, backend: &mut B) -> Option<WorkflowResult> {
        let wait = self.config.timeouts.success_indicator();
        for selector in &self.config.selectors.success_indicators {
            match bounded(
                "wait_for_selector",
                wait,
                backend.wait_for_selector(selector, wait),
            )
            .await
            {
                Ok(()) => {
                    info!("Login successful ({})", selector);
                    return Some(WorkflowResult::success(Verdict::SuccessIndicator {
                        selector: selector.clone(),
                    }));
                }
                Err(e) => debug!("Success indicator '{}' not confirmed: {}", selector, e),
            }
        }
        None
    }

    async fn check_location<B: Backend + ?Sized>(
        &self,
        backend: &mut B,
    ) -> Result<WorkflowResult, BackendError> {
        let timeout = self.config.timeouts.operation();
        let current = bounded("get_current_url", timeout, backend.get_current_url()).await?;

        if !same_location(&current, &self.config.target_url) {
            info!("Login successful (URL changed to {})", current);
            return Ok(WorkflowResult::success(Verdict::LocationChanged {
                from: self.config.target_url.clone(),
                to: current,
            }));
        }

        warn!("Login status unclear");
        Ok(WorkflowResult::failure(
            WorkflowError::VerificationAmbiguous.to_string(),
            Verdict::Ambiguous,
        ))
    }
}

/// Compare URLs in normalized form (`http://host` equals `http://host/`),
/// falling back to the raw text when either side does not parse.
fn same_location(current: &str, target: &str) -> bool {
    match (url::Url::parse(current), url::Url::parse(target)) {
        (Ok(current), Ok(target)) => current == target,
        _ => current == target,
    }
}
