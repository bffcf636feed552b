pub mod sheets;
pub mod transport;
pub mod wordpress;

use async_trait::async_trait;
use colored::*;
use std::sync::Arc;
use tracing::info;

use crate::config::SinkTarget;
use crate::sinks::sheets::SheetsSink;
use crate::sinks::transport::HttpTransport;
use crate::sinks::wordpress::WordPressSink;
use crate::types::{ExtractionBatch, SinkReport};

/// A downstream system that receives the final batch.
/// Delivery failures are reported per record, never raised.
#[async_trait]
pub trait Sink: Send + Sync {
    fn name(&self) -> &'static str;
    async fn deliver(&self, batch: &ExtractionBatch) -> SinkReport;
}

pub fn build_sinks(targets: &[SinkTarget], transport: Arc<dyn HttpTransport>) -> Vec<Box<dyn Sink>> {
    targets
        .iter()
        .map(|target| -> Box<dyn Sink> {
            match target {
                SinkTarget::Rest {
                    base_url,
                    username,
                    app_password,
                    collection_path,
                } => Box::new(WordPressSink::new(
                    base_url,
                    collection_path,
                    username,
                    app_password,
                    transport.clone(),
                )),
                SinkTarget::Spreadsheet {
                    spreadsheet_id,
                    range,
                    access_token,
                } => Box::new(SheetsSink::new(spreadsheet_id, range, access_token, transport.clone())),
            }
        })
        .collect()
}

/// Hand the batch to each sink in turn. An empty batch reaches no sink.
pub async fn dispatch(batch: &ExtractionBatch, sinks: &[Box<dyn Sink>]) -> Vec<SinkReport> {
    if batch.is_empty() {
        println!("{} No reviews to deliver", "[!]".yellow());
        return Vec::new();
    }

    let mut reports = Vec::with_capacity(sinks.len());
    for sink in sinks {
        println!("{} Delivering {} reviews to {}", "[*]".blue(), batch.len(), sink.name());
        let report = sink.deliver(batch).await;
        info!(
            sink = sink.name(),
            delivered = report.delivered(),
            failed = report.failed(),
            "sink finished"
        );
        reports.push(report);
    }
    reports
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sinks::transport::fake::ScriptedTransport;
    use crate::types::ReviewRecord;

    fn targets() -> Vec<SinkTarget> {
        vec![
            SinkTarget::Rest {
                base_url: "https://blog.example".into(),
                username: "u".into(),
                app_password: "p".into(),
                collection_path: "/wp-json/wp/v2/posts".into(),
            },
            SinkTarget::Spreadsheet {
                spreadsheet_id: "s".into(),
                range: "A:D".into(),
                access_token: "t".into(),
            },
        ]
    }

    #[tokio::test]
    async fn empty_batch_issues_no_requests() {
        let transport = Arc::new(ScriptedTransport::replying(vec![]));
        let sinks = build_sinks(&targets(), transport.clone());

        let reports = dispatch(&ExtractionBatch::default(), &sinks).await;

        assert!(reports.is_empty());
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn sinks_run_in_configured_order() {
        let transport = Arc::new(ScriptedTransport::replying(vec![(201, "{}"), (200, "{}")]));
        let sinks = build_sinks(&targets(), transport.clone());
        let batch = ExtractionBatch {
            records: vec![ReviewRecord {
                text: "خوب".into(),
                ..Default::default()
            }],
        };

        let reports = dispatch(&batch, &sinks).await;

        let names: Vec<_> = reports.iter().map(|r| r.sink.as_str()).collect();
        assert_eq!(names, vec!["wordpress", "sheets"]);
        assert!(transport.calls()[0].url.ends_with("/wp-json/wp/v2/posts"));
        assert!(transport.calls()[1].url.contains("sheets.googleapis.com"));
    }
}
