//! Multi-candidate element lookup.
//!
//! Candidates are tried strictly in order, never raced. Each candidate costs
//! one existence check and, only when present, one visibility check. A
//! candidate whose check errors or times out is treated as a miss.

use crate::backend::{Backend, bounded};
use crate::error::WorkflowError;
use crate::selector::SelectorGroup;
use std::time::Duration;
use tracing::{debug, info};

/// Return the first candidate of `group` that is both present and visible.
pub async fn locate<B: Backend + ?Sized>(
    backend: &mut B,
    group: &SelectorGroup,
    per_selector_timeout: Duration,
) -> Result<String, WorkflowError> {
    for selector in group {
        let exists = bounded(
            "element_exists",
            per_selector_timeout,
            backend.element_exists(selector),
        )
        .await;
        match exists {
            Ok(true) => {}
            Ok(false) => continue,
            Err(e) => {
                debug!("Existence check for '{}' failed: {}", selector, e);
                continue;
            }
        }

        let visible = bounded(
            "is_element_visible",
            per_selector_timeout,
            backend.is_element_visible(selector),
        )
        .await;
        match visible {
            Ok(true) => {
                info!("Found element with selector: {}", selector);
                return Ok(selector.clone());
            }
            Ok(false) => debug!("'{}' is present but not visible", selector),
            Err(e) => debug!("Visibility check for '{}' failed: {}", selector, e),
        }
    }

    Err(WorkflowError::LocatorNotFound {
        candidates: group.candidates().to_vec(),
    })
}
