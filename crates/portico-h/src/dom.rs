//! DOM queries evaluated in the page.
//!
//! Selectors are JSON-encoded into the expression so quotes and non-ASCII
//! placeholders survive intact.

use chromiumoxide::Page;
use portico_engine::BackendError;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio::time::Instant;

/// Hard cap for a single evaluation. A blocking dialog would otherwise stall
/// the JS thread indefinitely.
const EVAL_TIMEOUT: Duration = Duration::from_secs(10);

/// Maximum retries for context errors during page navigation.
const MAX_CONTEXT_RETRIES: u32 = 10;

const CONTEXT_RETRY_DELAY: Duration = Duration::from_millis(100);

pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

fn is_context_error(err: &str) -> bool {
    err.contains("Cannot find context")
        || err.contains("Execution context was destroyed")
        || err.contains("-32000")
}

fn quote(selector: &str) -> String {
    // A &str always serializes.
    serde_json::to_string(selector).unwrap_or_else(|_| "\"\"".to_string())
}

pub fn exists_script(selector: &str) -> String {
    format!("document.querySelector({}) !== null", quote(selector))
}

pub fn visible_script(selector: &str) -> String {
    format!(
        r#"(() => {{
    const el = document.querySelector({sel});
    if (!el) return false;
    const style = window.getComputedStyle(el);
    if (style.display === 'none' || style.visibility === 'hidden' || style.opacity === '0') return false;
    const rect = el.getBoundingClientRect();
    return rect.width > 0 && rect.height > 0;
}})()"#,
        sel = quote(selector)
    )
}

pub fn clickable_script(selector: &str) -> String {
    format!(
        r#"(() => {{
    const el = document.querySelector({sel});
    if (!el || el.disabled) return false;
    const style = window.getComputedStyle(el);
    if (style.display === 'none' || style.visibility === 'hidden' || style.pointerEvents === 'none') return false;
    const rect = el.getBoundingClientRect();
    return rect.width > 0 && rect.height > 0;
}})()"#,
        sel = quote(selector)
    )
}

/// Empties the field and notifies framework listeners (Vue/React bind on `input`).
pub fn clear_script(selector: &str) -> String {
    format!(
        r#"(() => {{
    const el = document.querySelector({sel});
    if (!el) return false;
    el.focus();
    el.value = '';
    el.dispatchEvent(new Event('input', {{ bubbles: true }}));
    el.dispatchEvent(new Event('change', {{ bubbles: true }}));
    return true;
}})()"#,
        sel = quote(selector)
    )
}

pub fn text_script(selector: &str) -> String {
    format!(
        r#"(() => {{
    const el = document.querySelector({sel});
    return el ? (el.innerText || el.textContent || '') : null;
}})()"#,
        sel = quote(selector)
    )
}

pub const READY_SCRIPT: &str = "document.readyState === 'complete'";

/// Evaluate `expression` and deserialize its value, retrying while the page
/// is between execution contexts.
pub async fn eval<T: DeserializeOwned>(page: &Page, expression: &str) -> Result<T, BackendError> {
    let mut last_error = None;

    for attempt in 0..MAX_CONTEXT_RETRIES {
        match tokio::time::timeout(EVAL_TIMEOUT, page.evaluate(expression)).await {
            Err(_) => {
                return Err(BackendError::Timeout {
                    operation: "evaluate".into(),
                    timeout_ms: EVAL_TIMEOUT.as_millis() as u64,
                });
            }
            Ok(Err(e)) => {
                let err_str = e.to_string();
                if !is_context_error(&err_str) {
                    return Err(BackendError::Script(err_str));
                }
                tracing::debug!(
                    "Context error during evaluation (attempt {}/{}), retrying...",
                    attempt + 1,
                    MAX_CONTEXT_RETRIES
                );
                last_error = Some(err_str);
                tokio::time::sleep(CONTEXT_RETRY_DELAY).await;
            }
            Ok(Ok(result)) => {
                return result
                    .into_value::<T>()
                    .map_err(|e| BackendError::Script(format!("Failed to get result: {}", e)));
            }
        }
    }

    Err(BackendError::Script(last_error.unwrap_or_else(|| {
        "Evaluation failed after retries".to_string()
    })))
}

/// Poll a boolean expression until it holds or `timeout` elapses.
pub async fn poll_until(
    page: &Page,
    expression: &str,
    operation: &str,
    timeout: Duration,
) -> Result<(), BackendError> {
    let deadline = deadline_after(timeout);
    loop {
        match eval::<bool>(page, expression).await {
            Ok(true) => return Ok(()),
            Ok(false) => {}
            Err(e) => tracing::debug!("{} check failed: {}", operation, e),
        }

        if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            return Err(BackendError::Timeout {
                operation: operation.to_string(),
                timeout_ms: timeout.as_millis() as u64,
            });
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }
}

/// `None` when `timeout` is too large to represent; the caller then polls
/// until an outer bound cancels it.
fn deadline_after(timeout: Duration) -> Option<Instant> {
    Instant::now().checked_add(timeout)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selectors_are_json_quoted() {
        let script = exists_script("input[placeholder*=\"用户名\"]");
        assert_eq!(
            script,
            "document.querySelector(\"input[placeholder*=\\\"用户名\\\"]\") !== null"
        );
    }

    #[test]
    fn context_errors_are_recognised() {
        assert!(is_context_error("Execution context was destroyed."));
        assert!(!is_context_error("SyntaxError: Unexpected token"));
    }

    #[test]
    fn oversized_timeout_has_no_deadline() {
        assert!(deadline_after(Duration::MAX).is_none());
        assert!(deadline_after(Duration::from_millis(200)).is_some());
    }

    #[test]
    fn scripts_embed_selector_once() {
        for script in [
            visible_script("#password"),
            clickable_script("#password"),
            clear_script("#password"),
            text_script("#password"),
        ] {
            assert_eq!(script.matches("\"#password\"").count(), 1);
        }
    }
}
