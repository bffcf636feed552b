use anyhow::{bail, Result};
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::emulation::SetUserAgentOverrideParams;
use chromiumoxide::cdp::browser_protocol::network::{Headers, SetExtraHttpHeadersParams};
use futures::StreamExt;
use std::env;
use std::path::PathBuf;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::browser::page::ChromePage;
use crate::error::ScrapeError;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";
const ACCEPT_LANGUAGE: &str = "fa-IR,fa;q=0.9,en;q=0.8";
const WINDOW: (u32, u32) = (1366, 900);

/// One Chrome process for one run. Call [`BrowserSession::close`] on every exit path.
pub struct BrowserSession {
    browser: Browser,
    handler: JoinHandle<()>,
}

impl BrowserSession {
    pub async fn launch(chrome_bin: Option<PathBuf>) -> Result<Self> {
        let chrome_binary = resolve_chrome_binary(chrome_bin)?;
        debug!(binary = %chrome_binary.display(), "launching browser");

        let (browser, mut handler) = Browser::launch(
            BrowserConfig::builder()
                .disable_cache()
                .chrome_executable(chrome_binary)
                .window_size(WINDOW.0, WINDOW.1)
                .viewport(None)
                .args(vec![
                    "--no-sandbox",
                    "--disable-setuid-sandbox",
                    "--disable-dev-shm-usage",
                    "--disable-gpu",
                    "--headless",
                    "--disable-extensions",
                    "--no-first-run",
                    "--disable-sync",
                    "--lang=fa-IR",
                ])
                .build()
                .map_err(|e| anyhow::anyhow!("Failed to build browser config: {}", e))?,
        )
        .await?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("cdp handler error: {e}");
                }
            }
        });

        Ok(Self { browser, handler })
    }

    /// Open a blank tab with the desktop user agent and language header. Navigation is
    /// left to the caller so a failed load still has a page to capture.
    pub async fn new_tab(&self) -> Result<ChromePage, ScrapeError> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| ScrapeError::Browser(format!("failed to open tab: {e}")))?;

        page.execute(SetUserAgentOverrideParams::new(USER_AGENT))
            .await
            .map_err(|e| ScrapeError::Browser(format!("failed to set user agent: {e}")))?;
        page.execute(SetExtraHttpHeadersParams::new(Headers::new(
            serde_json::json!({ "Accept-Language": ACCEPT_LANGUAGE }),
        )))
        .await
        .map_err(|e| ScrapeError::Browser(format!("failed to set headers: {e}")))?;

        Ok(ChromePage::new(page))
    }

    pub async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            warn!("browser close failed: {e}");
        }
        if let Err(e) = self.browser.wait().await {
            debug!("browser wait failed: {e}");
        }
        self.handler.abort();
    }
}

fn resolve_chrome_binary(override_path: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = override_path {
        if path.is_file() {
            return Ok(path);
        }
        bail!(
            "Chrome/Chromium binary not found at provided path: {}",
            path.display()
        );
    }

    for key in ["CHROME_BIN", "CHROMIUM_BIN"] {
        if let Ok(val) = env::var(key) {
            let candidate = PathBuf::from(val);
            if candidate.is_file() {
                return Ok(candidate);
            }
        }
    }

    let mut candidates: Vec<PathBuf> = Vec::new();

    if let Some(path_var) = env::var_os("PATH") {
        for dir in env::split_paths(&path_var) {
            candidates.extend(candidate_names().map(|name| dir.join(name)));
            if cfg!(windows) {
                candidates.extend(candidate_names().map(|name| dir.join(format!("{name}.exe"))));
            }
        }
    }

    candidates.extend(known_locations());

    if let Some(found) = candidates.into_iter().find(|p| p.is_file()) {
        return Ok(found);
    }

    bail!("Could not locate Chrome/Chromium. Set --chrome-bin or CHROME_BIN.");
}

fn candidate_names() -> impl Iterator<Item = &'static str> {
    [
        "google-chrome",
        "google-chrome-stable",
        "chromium",
        "chromium-browser",
        "chrome",
    ]
    .into_iter()
}

fn known_locations() -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = Vec::new();

    if cfg!(target_os = "macos") {
        paths.push("/Applications/Google Chrome.app/Contents/MacOS/Google Chrome".into());
        paths.push("/Applications/Chromium.app/Contents/MacOS/Chromium".into());
    }

    if cfg!(target_os = "windows") {
        paths.push(r"C:\Program Files\Google\Chrome\Application\chrome.exe".into());
        paths.push(r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe".into());
    }

    if cfg!(target_os = "linux") {
        paths.extend(
            [
                "/usr/bin/google-chrome",
                "/usr/bin/google-chrome-stable",
                "/usr/bin/chromium",
                "/usr/bin/chromium-browser",
                "/snap/bin/chromium",
            ]
            .into_iter()
            .map(PathBuf::from),
        );
    }

    paths
}
