use serde::Deserialize;
use std::time::Duration;
use tokio::time::{self, Instant};
use tracing::debug;

use crate::browser::{page_utils, scripts, DocumentPage};
use crate::error::ScrapeError;

/// Review-item counts reported by the readiness probe script.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
pub struct ReadinessProbe {
    #[serde(default)]
    pub document: usize,
    #[serde(default)]
    pub dialog: usize,
    #[serde(default)]
    pub dialog_open: bool,
}

impl ReadinessProbe {
    pub fn is_ready(&self) -> bool {
        self.document > 0 || self.dialog > 0
    }

    pub fn items(&self) -> usize {
        self.document.max(self.dialog)
    }
}

/// Poll until at least one review item exists or `deadline` passes.
///
/// A failed probe counts as "not ready yet"; every iteration sleeps before re-checking.
pub async fn wait_for_content_ready(
    page: &dyn DocumentPage,
    deadline: Duration,
    poll_interval: Duration,
) -> Result<ReadinessProbe, ScrapeError> {
    let started = Instant::now();
    let mut polls = 0u32;

    loop {
        polls += 1;
        match page_utils::try_extract_json::<ReadinessProbe>(page, scripts::REVIEW_ITEM_PROBE).await {
            Ok(probe) if probe.is_ready() => {
                debug!(polls, items = probe.items(), "content ready");
                return Ok(probe);
            }
            Ok(_) => {}
            Err(e) => debug!("readiness probe failed: {e}"),
        }

        let elapsed = started.elapsed();
        if elapsed >= deadline {
            return Err(ScrapeError::ConvergenceTimeout {
                waited_ms: elapsed.as_millis() as u64,
            });
        }
        time::sleep(poll_interval.min(deadline - elapsed)).await;
    }
}
