use anyhow::Result;
use serde::de::DeserializeOwned;

use crate::browser::DocumentPage;

/// Evaluate `script` and decode its result, falling back to `T::default()` on any failure.
pub async fn extract_json<T: DeserializeOwned + Default>(page: &dyn DocumentPage, script: &str) -> T {
    try_extract_json(page, script).await.unwrap_or_default()
}

pub async fn try_extract_json<T: DeserializeOwned>(page: &dyn DocumentPage, script: &str) -> Result<T> {
    let value = page.evaluate(script).await?;
    Ok(serde_json::from_value(value)?)
}
