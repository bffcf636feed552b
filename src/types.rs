use serde::{Deserialize, Serialize};

/// Title used when a review carries no tag labels.
pub const UNTAGGED: &str = "بدون برچسب";

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct ReviewRecord {
    pub title: String,
    pub author: String,
    pub rating: String,
    pub text: String,
    pub date: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMode {
    Strict,
    Heuristic,
}

impl ExtractionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionMode::Strict => "strict",
            ExtractionMode::Heuristic => "heuristic",
        }
    }
}

/// Normalized, deduplicated records in DOM traversal order.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ExtractionBatch {
    pub records: Vec<ReviewRecord>,
}

impl ExtractionBatch {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ReviewRecord> {
        self.records.iter()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RecordOutcome {
    Delivered { remote_id: Option<String> },
    Failed { status: Option<u16>, detail: String },
}

impl RecordOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, RecordOutcome::Delivered { .. })
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SinkReport {
    pub sink: String,
    pub outcomes: Vec<RecordOutcome>,
}

impl SinkReport {
    pub fn delivered(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_delivered()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.delivered()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct HarvestResult {
    pub url: String,
    pub timestamp: String,
    pub mode: Option<ExtractionMode>,
    pub items_found: usize,
    pub records: Vec<ReviewRecord>,
    pub sinks: Vec<SinkReport>,
}
