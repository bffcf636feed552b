use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

use crate::browser::{page_utils, scripts, DocumentPage};
use crate::interaction::convergence::ReadinessProbe;

/// Fixed-count scrolling. There is no reliable end-of-list signal, so no early stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollPolicy {
    pub iterations: u32,
    pub step_px: u32,
    pub delay: Duration,
}

impl Default for ScrollPolicy {
    fn default() -> Self {
        Self {
            iterations: 25,
            step_px: 1200,
            delay: Duration::from_millis(350),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct StepResult {
    region: String,
    items: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub region: Option<String>,
    pub items_before: usize,
    pub items_after: usize,
    pub failed_steps: u32,
}

/// Scroll the review list `policy.iterations` times, pausing after every step so the
/// lazy loader can respond.
pub async fn load_more(page: &dyn DocumentPage, policy: &ScrollPolicy) -> LoadReport {
    let before: ReadinessProbe = page_utils::extract_json(page, scripts::REVIEW_ITEM_PROBE).await;
    let script = scripts::scroll_step(policy.step_px);

    let mut report = LoadReport {
        region: None,
        items_before: before.items(),
        items_after: before.items(),
        failed_steps: 0,
    };

    for step in 0..policy.iterations {
        match page_utils::try_extract_json::<StepResult>(page, &script).await {
            Ok(result) => {
                // Count never shrinks: virtualized lists may recycle nodes mid-scroll.
                report.items_after = report.items_after.max(result.items);
                report.region = Some(result.region);
            }
            Err(e) => {
                report.failed_steps += 1;
                debug!(step, "scroll step failed: {e}");
            }
        }
        tokio::time::sleep(policy.delay).await;
    }

    info!(
        region = report.region.as_deref().unwrap_or("none"),
        before = report.items_before,
        after = report.items_after,
        "incremental load finished"
    );
    report
}
