//! Browser capability consumed by the pipeline.
//!
//! Everything above this module talks to a [`DocumentPage`]; only `page` and `session`
//! know about chromiumoxide.

pub mod page;
pub mod page_utils;
pub mod scripts;
pub mod session;

#[cfg(test)]
pub mod fake;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::path::Path;
use std::time::Duration;

use crate::error::ScrapeError;

/// A browser tab the pipeline can navigate, script and click.
#[async_trait]
pub trait DocumentPage: Send + Sync {
    /// Load `url` and wait for the navigation to settle, bounded by `timeout`.
    async fn navigate(&self, url: &str, timeout: Duration) -> Result<(), ScrapeError>;

    /// Evaluate a script in the page and return its JSON-serializable result.
    async fn evaluate(&self, script: &str) -> Result<Value>;

    /// Dispatch a real pointer click at viewport coordinates.
    async fn click_at(&self, x: f64, y: f64) -> Result<()>;

    /// Serialized markup of the current document.
    async fn markup(&self) -> Result<String>;

    /// Full-page visual capture written to `path`.
    async fn capture_screenshot(&self, path: &Path) -> Result<()>;
}
