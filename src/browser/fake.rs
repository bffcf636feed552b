use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use crate::browser::DocumentPage;
use crate::error::ScrapeError;

type Responder = Box<dyn Fn(&str) -> Option<Value> + Send + Sync>;

/// In-memory page. Scripts are answered by a responder closure; `None` means the
/// evaluation fails, the way a detached or crashed page would.
pub struct FakePage {
    responder: Responder,
    pub markup: String,
    /// When set, navigation fails with this message.
    pub navigation_failure: Option<String>,
    pub clicks: Mutex<Vec<(f64, f64)>>,
    pub scripts: Mutex<Vec<String>>,
}

impl FakePage {
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&str) -> Option<Value> + Send + Sync + 'static,
    {
        Self {
            responder: Box::new(responder),
            markup: "<html><body></body></html>".to_string(),
            navigation_failure: None,
            clicks: Mutex::new(Vec::new()),
            scripts: Mutex::new(Vec::new()),
        }
    }

    pub fn clicks(&self) -> Vec<(f64, f64)> {
        self.clicks.lock().unwrap().clone()
    }

    pub fn scripts_containing(&self, needle: &str) -> usize {
        self.scripts
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.contains(needle))
            .count()
    }
}

#[async_trait]
impl DocumentPage for FakePage {
    async fn navigate(&self, url: &str, _timeout: Duration) -> Result<(), ScrapeError> {
        match &self.navigation_failure {
            Some(message) => Err(ScrapeError::Navigation {
                url: url.to_string(),
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }

    async fn evaluate(&self, script: &str) -> Result<Value> {
        self.scripts.lock().unwrap().push(script.to_string());
        (self.responder)(script).ok_or_else(|| anyhow!("evaluation failed"))
    }

    async fn click_at(&self, x: f64, y: f64) -> Result<()> {
        self.clicks.lock().unwrap().push((x, y));
        Ok(())
    }

    async fn markup(&self) -> Result<String> {
        Ok(self.markup.clone())
    }

    async fn capture_screenshot(&self, path: &Path) -> Result<()> {
        std::fs::write(path, b"\x89PNG fake")?;
        Ok(())
    }
}
