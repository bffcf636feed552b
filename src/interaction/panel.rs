use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

use crate::browser::{page_utils, scripts, DocumentPage};
use crate::interaction::convergence::ReadinessProbe;
use crate::interaction::strategy::{Attempt, Ranked, Strategy};

/// How the reviews panel trigger is located.
#[derive(Debug, Clone)]
pub struct PanelTrigger {
    pub phrases: Vec<&'static str>,
    pub selectors: Vec<&'static str>,
    /// Viewport-relative (x, y) fractions clicked as a last resort.
    pub guesses: Vec<(f64, f64)>,
    pub guess_settle: Duration,
}

impl Default for PanelTrigger {
    fn default() -> Self {
        Self {
            phrases: vec!["اطلاعات و نظرات", "نظرات کاربران"],
            selectors: vec![
                r#"[data-testid*="comment" i]"#,
                r#"[id*="comment" i]"#,
                r#"[class*="InfoAndComments"]"#,
                r#"[class*="CommentsButton"]"#,
                r#"[aria-label*="نظرات"]"#,
            ],
            guesses: vec![(0.5, 0.35), (0.82, 0.28), (0.18, 0.28), (0.5, 0.55)],
            guess_settle: Duration::from_millis(700),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PanelOutcome {
    pub strategy: Option<&'static str>,
}

#[derive(Debug, Deserialize)]
struct Center {
    x: f64,
    y: f64,
}

#[derive(Debug, Deserialize)]
struct Viewport {
    width: f64,
    height: f64,
}

/// Try every tier until one reports success. Never fails; whether the panel really opened
/// is for the convergence wait to decide.
pub async fn open_content_panel(page: &dyn DocumentPage, trigger: &PanelTrigger) -> PanelOutcome {
    let ranked = Ranked::new()
        .then(TextMatchClick {
            phrases: trigger.phrases.clone(),
        })
        .then(StructuralClick {
            selectors: trigger.selectors.clone(),
        })
        .then(CoordinateGuess {
            guesses: trigger.guesses.clone(),
            settle: trigger.guess_settle,
        });

    debug!(tiers = ?ranked.names(), "opening reviews panel");

    let strategy = ranked.run(page).await.map(|s| s.strategy);
    match strategy {
        Some(name) => info!(strategy = name, "reviews panel trigger clicked"),
        None => info!("no panel trigger strategy succeeded"),
    }
    PanelOutcome { strategy }
}

/// Native click followed by a pointer click at the element centre; the second one gets
/// through transparent overlays that swallow synthetic clicks.
async fn click_pair(page: &dyn DocumentPage, script: &str) -> Attempt<()> {
    let center = match page_utils::try_extract_json::<Option<Center>>(page, script).await {
        Ok(Some(center)) => center,
        Ok(None) => return Attempt::NotApplicable("no matching element".into()),
        Err(e) => return Attempt::NotApplicable(format!("lookup failed: {e}")),
    };

    if let Err(e) = page.click_at(center.x, center.y).await {
        debug!("pointer click after native click failed: {e}");
    }
    Attempt::Succeeded(())
}

pub struct TextMatchClick {
    pub phrases: Vec<&'static str>,
}

#[async_trait]
impl Strategy for TextMatchClick {
    type Output = ();

    fn name(&self) -> &'static str {
        "text-match"
    }

    async fn attempt(&self, page: &dyn DocumentPage) -> Attempt<()> {
        if self.phrases.is_empty() {
            return Attempt::NotApplicable("no trigger phrases".into());
        }
        click_pair(page, &scripts::click_by_text(&self.phrases)).await
    }
}

pub struct StructuralClick {
    pub selectors: Vec<&'static str>,
}

#[async_trait]
impl Strategy for StructuralClick {
    type Output = ();

    fn name(&self) -> &'static str {
        "structural"
    }

    async fn attempt(&self, page: &dyn DocumentPage) -> Attempt<()> {
        if self.selectors.is_empty() {
            return Attempt::NotApplicable("no trigger selectors".into());
        }
        click_pair(page, &scripts::click_by_selector(&self.selectors)).await
    }
}

pub struct CoordinateGuess {
    pub guesses: Vec<(f64, f64)>,
    pub settle: Duration,
}

#[async_trait]
impl Strategy for CoordinateGuess {
    type Output = ();

    fn name(&self) -> &'static str {
        "coordinate-guess"
    }

    async fn attempt(&self, page: &dyn DocumentPage) -> Attempt<()> {
        let viewport = page_utils::try_extract_json::<Viewport>(page, scripts::VIEWPORT_SIZE)
            .await
            .unwrap_or(Viewport {
                width: 1366.0,
                height: 900.0,
            });

        for (fx, fy) in &self.guesses {
            let (x, y) = (viewport.width * fx, viewport.height * fy);
            if let Err(e) = page.click_at(x, y).await {
                debug!("guess click at ({x:.0}, {y:.0}) failed: {e}");
                continue;
            }
            tokio::time::sleep(self.settle).await;

            let probe: ReadinessProbe =
                page_utils::extract_json(page, scripts::REVIEW_ITEM_PROBE).await;
            if probe.dialog_open || probe.is_ready() {
                return Attempt::Succeeded(());
            }
        }

        Attempt::NotApplicable("no guessed position opened the panel".into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::fake::FakePage;
    use serde_json::json;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    fn quick_trigger() -> PanelTrigger {
        PanelTrigger {
            guesses: vec![(0.5, 0.25), (0.75, 0.5), (0.25, 0.5)],
            guess_settle: Duration::from_millis(1),
            ..PanelTrigger::default()
        }
    }

    #[tokio::test]
    async fn text_match_clicks_natively_then_at_center() {
        let page = FakePage::new(|script| {
            if script.contains("PHRASES") {
                Some(json!({ "x": 120.0, "y": 340.5 }))
            } else {
                Some(json!(null))
            }
        });

        let outcome = open_content_panel(&page, &quick_trigger()).await;

        assert_eq!(outcome.strategy, Some("text-match"));
        assert_eq!(page.clicks(), vec![(120.0, 340.5)]);
        assert_eq!(page.scripts_containing("SELECTORS"), 0);
    }

    #[tokio::test]
    async fn structural_lookup_runs_when_text_match_finds_nothing() {
        let page = FakePage::new(|script| {
            if script.contains("SELECTORS") {
                Some(json!({ "x": 10.0, "y": 20.0 }))
            } else {
                Some(json!(null))
            }
        });

        let outcome = open_content_panel(&page, &quick_trigger()).await;

        assert_eq!(outcome.strategy, Some("structural"));
        assert_eq!(page.clicks(), vec![(10.0, 20.0)]);
    }

    #[tokio::test]
    async fn coordinate_guesses_stop_once_a_dialog_opens() {
        let opened = Arc::new(AtomicBool::new(false));
        let flag = opened.clone();
        let page = FakePage::new(move |script| {
            if script.contains("innerWidth") {
                Some(json!({ "width": 1000.0, "height": 800.0 }))
            } else if script.contains("dialog_open") {
                // The second probe sees the dialog.
                let was_open = flag.swap(true, Ordering::SeqCst);
                Some(json!({ "document": 0, "dialog": 0, "dialog_open": was_open }))
            } else {
                Some(json!(null))
            }
        });

        let outcome = open_content_panel(&page, &quick_trigger()).await;

        assert_eq!(outcome.strategy, Some("coordinate-guess"));
        assert_eq!(page.clicks(), vec![(500.0, 200.0), (750.0, 400.0)]);
        assert!(opened.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn a_hostile_page_never_makes_opening_fail() {
        let page = FakePage::new(|_| None);
        let outcome = open_content_panel(&page, &quick_trigger()).await;

        assert_eq!(outcome.strategy, None);
        // Every guess was still tried with the fallback viewport.
        assert_eq!(page.clicks().len(), 3);
    }
}
