use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::browser::DocumentPage;

pub const SCREENSHOT_FILE: &str = "debug-screenshot.png";
pub const MARKUP_FILE: &str = "debug-page.html";

#[derive(Debug, Default)]
pub struct Captured {
    pub screenshot: Option<PathBuf>,
    pub markup: Option<PathBuf>,
}

/// Save a full-page screenshot and the current markup into `dir`.
/// Each artifact is attempted independently; a failed capture is logged, not raised.
pub async fn capture(page: &dyn DocumentPage, dir: &Path) -> Captured {
    let mut captured = Captured::default();
    if let Err(e) = fs::create_dir_all(dir) {
        warn!(dir = %dir.display(), error = %e, "cannot create diagnostics directory");
        return captured;
    }

    let screenshot = dir.join(SCREENSHOT_FILE);
    match page.capture_screenshot(&screenshot).await {
        Ok(()) => captured.screenshot = Some(screenshot),
        Err(e) => warn!(error = %e, "screenshot capture failed"),
    }

    match save_markup(page, &dir.join(MARKUP_FILE)).await {
        Ok(path) => captured.markup = Some(path),
        Err(e) => warn!(error = %e, "markup capture failed"),
    }

    captured
}

async fn save_markup(page: &dyn DocumentPage, path: &Path) -> Result<PathBuf> {
    let html = page.markup().await?;
    fs::write(path, html).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path.to_path_buf())
}
