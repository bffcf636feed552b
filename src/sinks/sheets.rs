use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{info, warn};

use crate::sinks::transport::HttpTransport;
use crate::sinks::Sink;
use crate::types::{ExtractionBatch, RecordOutcome, SinkReport};

const SHEETS_API: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// Appends the whole batch as rows in a single call.
pub struct SheetsSink {
    endpoint: String,
    authorization: String,
    transport: Arc<dyn HttpTransport>,
}

impl SheetsSink {
    pub fn new(spreadsheet_id: &str, range: &str, access_token: &str, transport: Arc<dyn HttpTransport>) -> Self {
        let range = url::form_urlencoded::byte_serialize(range.as_bytes()).collect::<String>();
        Self {
            endpoint: format!("{SHEETS_API}/{spreadsheet_id}/values/{range}:append?valueInputOption=RAW"),
            authorization: format!("Bearer {access_token}"),
            transport,
        }
    }
}

pub fn rows(batch: &ExtractionBatch) -> Value {
    let values: Vec<Value> = batch
        .iter()
        .map(|r| json!([r.author, r.date, r.rating, r.text]))
        .collect();
    json!({ "values": values })
}

#[async_trait]
impl Sink for SheetsSink {
    fn name(&self) -> &'static str {
        "sheets"
    }

    async fn deliver(&self, batch: &ExtractionBatch) -> SinkReport {
        let outcome = match self.transport.post_json(&self.endpoint, &self.authorization, &rows(batch)).await {
            Ok(reply) if reply.is_success() => {
                info!(rows = batch.len(), "rows appended");
                RecordOutcome::Delivered { remote_id: None }
            }
            Ok(reply) => {
                warn!(status = reply.status, body = %reply.body, "append rejected");
                RecordOutcome::Failed {
                    status: Some(reply.status),
                    detail: reply.body,
                }
            }
            Err(e) => {
                warn!(error = %e, "append request failed");
                RecordOutcome::Failed {
                    status: None,
                    detail: e.to_string(),
                }
            }
        };

        // One call covers every row, so every row shares its fate.
        SinkReport {
            sink: self.name().to_string(),
            outcomes: vec![outcome; batch.len()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sinks::transport::fake::ScriptedTransport;
    use crate::types::ReviewRecord;

    fn batch() -> ExtractionBatch {
        ExtractionBatch {
            records: vec![
                ReviewRecord {
                    title: "t".into(),
                    author: "نیما".into(),
                    rating: "5".into(),
                    text: "عالی".into(),
                    date: "امروز".into(),
                },
                ReviewRecord {
                    title: "t".into(),
                    author: "".into(),
                    rating: "".into(),
                    text: "بد نبود".into(),
                    date: "دیروز".into(),
                },
            ],
        }
    }

    #[tokio::test]
    async fn whole_batch_goes_out_in_one_append() {
        let transport = Arc::new(ScriptedTransport::replying(vec![(200, "{}")]));
        let sink = SheetsSink::new("sheet-123", "Sheet1!A:D", "tok", transport.clone());

        let report = sink.deliver(&batch()).await;

        let calls = transport.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0].url,
            "https://sheets.googleapis.com/v4/spreadsheets/sheet-123/values/Sheet1%21A%3AD:append?valueInputOption=RAW"
        );
        assert_eq!(calls[0].authorization, "Bearer tok");
        assert_eq!(calls[0].body["values"][0], json!(["نیما", "امروز", "5", "عالی"]));
        assert_eq!(calls[0].body["values"][1], json!(["", "دیروز", "", "بد نبود"]));
        assert_eq!(report.delivered(), 2);
    }

    #[tokio::test]
    async fn rejected_append_fails_every_row() {
        let transport = Arc::new(ScriptedTransport::replying(vec![(403, "forbidden")]));
        let report = SheetsSink::new("s", "A:D", "t", transport).deliver(&batch()).await;
        assert_eq!(report.failed(), 2);
        assert_eq!(report.delivered(), 0);
    }
}
