use anyhow::{Context, Result};
use async_trait::async_trait;
use chromiumoxide::layout::Point;
use chromiumoxide::page::ScreenshotParams;
use chromiumoxide::Page;
use serde_json::Value;
use std::path::Path;
use std::time::Duration;
use tokio::time;

use crate::browser::DocumentPage;
use crate::error::ScrapeError;

pub struct ChromePage {
    inner: Page,
}

impl ChromePage {
    pub fn new(inner: Page) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl DocumentPage for ChromePage {
    async fn navigate(&self, url: &str, timeout: Duration) -> Result<(), ScrapeError> {
        let navigation_error = |message: String| ScrapeError::Navigation {
            url: url.to_string(),
            message,
        };
        let navigation = async {
            self.inner.goto(url).await?;
            self.inner.wait_for_navigation().await?;
            Ok::<_, chromiumoxide::error::CdpError>(())
        };

        match time::timeout(timeout, navigation).await {
            Err(_) => Err(navigation_error(format!("timed out after {}s", timeout.as_secs()))),
            Ok(Err(e)) => Err(navigation_error(e.to_string())),
            Ok(Ok(())) => Ok(()),
        }
    }

    async fn evaluate(&self, script: &str) -> Result<Value> {
        let result = self
            .inner
            .evaluate(script)
            .await
            .context("script evaluation failed")?;
        // Scripts returning undefined have no value; treat that as null.
        Ok(result.into_value::<Value>().unwrap_or(Value::Null))
    }

    async fn click_at(&self, x: f64, y: f64) -> Result<()> {
        self.inner
            .click(Point::new(x, y))
            .await
            .with_context(|| format!("pointer click at ({x:.0}, {y:.0}) failed"))?;
        Ok(())
    }

    async fn markup(&self) -> Result<String> {
        self.inner.content().await.context("failed to read page content")
    }

    async fn capture_screenshot(&self, path: &Path) -> Result<()> {
        self.inner
            .save_screenshot(ScreenshotParams::builder().full_page(true).build(), path)
            .await
            .with_context(|| format!("failed to save screenshot to {}", path.display()))?;
        Ok(())
    }
}
