use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::extract::slug::make_slug;
use crate::sinks::transport::HttpTransport;
use crate::sinks::Sink;
use crate::types::{ExtractionBatch, RecordOutcome, ReviewRecord, SinkReport};

const ANONYMOUS: &str = "بدون نام";

/// Publishes each record as a draft post, one request per record, in order.
pub struct WordPressSink {
    endpoint: String,
    authorization: String,
    transport: Arc<dyn HttpTransport>,
}

impl WordPressSink {
    pub fn new(
        base_url: &str,
        collection_path: &str,
        username: &str,
        app_password: &str,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        let credentials = general_purpose::STANDARD.encode(format!("{username}:{app_password}"));
        Self {
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), collection_path),
            authorization: format!("Basic {credentials}"),
            transport,
        }
    }

    async fn publish(&self, record: &ReviewRecord) -> RecordOutcome {
        let payload = post_payload(record);

        let reply = match self.transport.post_json(&self.endpoint, &self.authorization, &payload).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(author = %record.author, error = %e, "post request failed");
                return RecordOutcome::Failed {
                    status: None,
                    detail: e.to_string(),
                };
            }
        };

        if !reply.is_success() {
            warn!(status = reply.status, body = %reply.body, "post rejected");
            return RecordOutcome::Failed {
                status: Some(reply.status),
                detail: reply.body,
            };
        }

        let remote_id = serde_json::from_str::<Value>(&reply.body)
            .ok()
            .and_then(|v| match v.get("id") {
                Some(Value::Number(n)) => Some(n.to_string()),
                Some(Value::String(s)) => Some(s.clone()),
                _ => None,
            });
        debug!(status = reply.status, ?remote_id, "post created");

        RecordOutcome::Delivered { remote_id }
    }
}

#[async_trait]
impl Sink for WordPressSink {
    fn name(&self) -> &'static str {
        "wordpress"
    }

    async fn deliver(&self, batch: &ExtractionBatch) -> SinkReport {
        let mut outcomes = Vec::with_capacity(batch.len());
        for record in batch.iter() {
            outcomes.push(self.publish(record).await);
        }

        SinkReport {
            sink: self.name().to_string(),
            outcomes,
        }
    }
}

pub fn post_payload(record: &ReviewRecord) -> Value {
    json!({
        "title": record.title,
        "content": post_content(record),
        "status": "draft",
        "slug": make_slug(&record.title, &record.author, &record.date, &record.text),
    })
}

fn post_content(record: &ReviewRecord) -> String {
    let author = if record.author.is_empty() {
        ANONYMOUS
    } else {
        &record.author
    };
    let rating = if record.rating.is_empty() {
        "-"
    } else {
        &record.rating
    };

    format!(
        "<p>{} – امتیاز: {} – {} – {}</p>",
        inline_text(author),
        inline_text(rating),
        inline_text(&record.text),
        inline_text(&record.date)
    )
}

/// Escape markup and flatten line breaks so the value sits inside one paragraph.
fn inline_text(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace(['\r', '\n'], " ")
}
