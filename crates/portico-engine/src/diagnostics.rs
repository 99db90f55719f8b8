use crate::backend::{Backend, bounded};
use crate::config::ScreenshotConfig;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

/// Best-effort screenshot capture keyed by a tag such as `submit-failed`.
#[derive(Debug)]
pub struct SnapshotRecorder {
    config: ScreenshotConfig,
    taken: Vec<String>,
}

impl SnapshotRecorder {
    pub fn new(config: ScreenshotConfig) -> Self {
        Self {
            config,
            taken: Vec::new(),
        }
    }

    fn path_for(&self, tag: &str) -> PathBuf {
        self.config.dir.join(format!("{}.png", tag))
    }

    /// Tags captured so far, in order. A tag is recorded even when the
    /// screenshot itself could not be written.
    pub fn tags(&self) -> &[String] {
        &self.taken
    }

    pub fn reset(&mut self) {
        self.taken.clear();
    }

    /// Capture `<dir>/<tag>.png`. Never fails; returns the written path.
    pub async fn capture<B: Backend + ?Sized>(
        &mut self,
        backend: &mut B,
        tag: &str,
        timeout: Duration,
    ) -> Option<PathBuf> {
        self.taken.push(tag.to_string());

        if !self.config.enabled {
            return None;
        }

        let path = self.path_for(tag);
        if let Err(e) = tokio::fs::create_dir_all(&self.config.dir).await {
            warn!(
                "Failed to create screenshot dir {}: {}",
                self.config.dir.display(),
                e
            );
            return None;
        }

        let result = bounded(
            "take_screenshot",
            timeout,
            backend.take_screenshot(self.config.full_page, &path),
        )
        .await;
        match result {
            Ok(()) => {
                info!("Screenshot saved: {}", path.display());
                Some(path)
            }
            Err(e) => {
                warn!("Failed to take screenshot '{}': {}", tag, e);
                None
            }
        }
    }
}
