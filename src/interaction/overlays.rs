use tracing::debug;

use crate::browser::{page_utils, scripts, DocumentPage};

/// Consent, marketing and app-install prompts seen in front of the menu.
pub const DISMISS_LABELS: &[&str] = &[
    "قبول",
    "قبول می‌کنم",
    "متوجه شدم",
    "باشه",
    "بستن",
    "بعدا",
    "فعلا نه",
    "نه، ممنون",
    "accept",
    "accept all",
    "dismiss",
    "not now",
    "close",
    "got it",
    "×",
    "✕",
];

/// Where dismissal clicks may land.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissScope {
    Everywhere,
    /// Once the reviews panel is open, its own close button must survive.
    OutsideDialogs,
}

/// Click every overlay dismissal control found. Zero matches is success.
pub async fn dismiss_overlays(page: &dyn DocumentPage, labels: &[&str], scope: DismissScope) -> usize {
    let script = scripts::dismiss_overlays(labels, scope == DismissScope::OutsideDialogs);
    let clicked: usize = page_utils::extract_json(page, &script).await;
    if clicked > 0 {
        debug!(clicked, ?scope, "dismissed overlays");
    }
    clicked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::fake::FakePage;
    use serde_json::json;

    #[tokio::test]
    async fn reports_number_of_dismissed_overlays() {
        let page = FakePage::new(|script| {
            assert!(script.contains("not now"));
            Some(json!(2))
        });
        assert_eq!(dismiss_overlays(&page, DISMISS_LABELS, DismissScope::Everywhere).await, 2);
    }

    #[tokio::test]
    async fn scope_decides_whether_dialog_controls_are_clickable() {
        let page = FakePage::new(|_| Some(json!(0)));
        dismiss_overlays(&page, DISMISS_LABELS, DismissScope::Everywhere).await;
        dismiss_overlays(&page, DISMISS_LABELS, DismissScope::OutsideDialogs).await;

        assert_eq!(page.scripts_containing("SPARE_DIALOGS = false"), 1);
        assert_eq!(page.scripts_containing("SPARE_DIALOGS = true"), 1);
    }

    #[tokio::test]
    async fn page_errors_are_a_no_op() {
        let page = FakePage::new(|_| None);
        assert_eq!(dismiss_overlays(&page, DISMISS_LABELS, DismissScope::OutsideDialogs).await, 0);
    }
}
