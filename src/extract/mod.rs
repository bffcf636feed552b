pub mod dedup;
pub mod heuristic;
pub mod normalize;
pub mod patterns;
pub mod slug;
pub mod strict;

use tracing::{debug, info};

use crate::browser::DocumentPage;
use crate::extract::dedup::Deduplicator;
use crate::extract::heuristic::{HeuristicExtraction, HeuristicTuning};
use crate::extract::normalize::{collapse_whitespace, localize_digits};
use crate::extract::strict::StrictExtraction;
use crate::interaction::strategy::Ranked;
use crate::types::{ExtractionBatch, ExtractionMode, ReviewRecord, UNTAGGED};

/// Raw output of whichever extraction mode ran.
#[derive(Debug, Clone, Default)]
pub struct Extracted {
    pub mode: Option<ExtractionMode>,
    pub items_found: usize,
    pub records: Vec<ReviewRecord>,
}

/// Strict mode first; heuristic mode only when the structural markers are absent.
pub async fn extract_reviews(page: &dyn DocumentPage, tuning: &HeuristicTuning) -> Extracted {
    let ranked = Ranked::new()
        .then(StrictExtraction)
        .then(HeuristicExtraction {
            tuning: tuning.clone(),
        });

    match ranked.run(page).await {
        Some(success) => {
            let extracted = success.value;
            info!(
                mode = success.strategy,
                items = extracted.items_found,
                records = extracted.records.len(),
                "extraction finished"
            );
            extracted
        }
        None => Extracted::default(),
    }
}

/// Normalize, drop empty bodies and deduplicate, keeping first occurrences in order.
pub fn build_batch(records: Vec<ReviewRecord>) -> ExtractionBatch {
    let input = records.len();
    let mut dedup = Deduplicator::default();

    let records: Vec<ReviewRecord> = records
        .into_iter()
        .map(normalize_record)
        .filter(|r| !r.text.is_empty())
        .filter(|r| dedup.admit_record(r))
        .collect();
    debug!(input, kept = records.len(), keys = dedup.len(), "batch built");

    ExtractionBatch { records }
}

fn normalize_record(record: ReviewRecord) -> ReviewRecord {
    let title = collapse_whitespace(&record.title);
    ReviewRecord {
        title: if title.is_empty() {
            UNTAGGED.to_string()
        } else {
            title
        },
        author: collapse_whitespace(&record.author),
        rating: localize_digits(&collapse_whitespace(&record.rating)).replace('٫', "."),
        text: collapse_whitespace(&record.text),
        date: collapse_whitespace(&record.date),
    }
}
