use async_trait::async_trait;
use serde::Deserialize;

use crate::browser::{page_utils, scripts, DocumentPage};
use crate::extract::dedup::Deduplicator;
use crate::extract::normalize::{collapse_whitespace, rtl_ratio};
use crate::extract::patterns::{find_date, find_rating, has_review_keyword, REVIEW_KEYWORDS};
use crate::extract::Extracted;
use crate::interaction::strategy::{Attempt, Strategy};
use crate::types::{ExtractionMode, ReviewRecord, UNTAGGED};

/// Knobs for text-pattern extraction. There is no confidence score behind these;
/// they are what worked on the observed markup.
#[derive(Debug, Clone)]
pub struct HeuristicTuning {
    pub min_chars: usize,
    pub max_chars: usize,
    pub min_rtl_ratio: f64,
    pub author_max_chars: usize,
    pub dedup_prefix_chars: usize,
    pub max_records: usize,
    pub keywords: Vec<&'static str>,
}

impl Default for HeuristicTuning {
    fn default() -> Self {
        Self {
            min_chars: 10,
            max_chars: 600,
            min_rtl_ratio: 0.5,
            author_max_chars: 30,
            dedup_prefix_chars: 80,
            max_records: 300,
            keywords: REVIEW_KEYWORDS.to_vec(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CandidateSnapshot {
    pub text: String,
    pub name_hint: Option<String>,
    /// Index of the nearest enclosing block in the same snapshot.
    #[serde(default)]
    pub parent: Option<usize>,
}

/// Turn raw text blocks into records. Order is preserved; duplicates by
/// (author, date, text prefix) and anything past `max_records` are dropped.
pub fn parse_candidates(candidates: &[CandidateSnapshot], tuning: &HeuristicTuning) -> Vec<ReviewRecord> {
    let mut dedup = Deduplicator::new(tuning.dedup_prefix_chars);
    let mut out = Vec::new();

    for candidate in select_blocks(candidates, tuning) {
        if out.len() >= tuning.max_records {
            break;
        }

        let record = parse_candidate(candidate, tuning);
        if dedup.admit(&record.author, &record.date, &record.text) {
            out.push(record);
        }
    }

    out
}

/// One block per review. The outermost candidate is kept unless it wraps two or more
/// separate candidates; then it is a list and those are used instead.
fn select_blocks<'a>(blocks: &'a [CandidateSnapshot], tuning: &HeuristicTuning) -> Vec<&'a CandidateSnapshot> {
    let eligible: Vec<bool> = blocks.iter().map(|b| is_candidate(&b.text, tuning)).collect();

    // Ancestors precede descendants in document order; anything else is ignored.
    let nearest_eligible = |mut i: usize| -> Option<usize> {
        while let Some(p) = blocks[i].parent.filter(|&p| p < i) {
            if eligible[p] {
                return Some(p);
            }
            i = p;
        }
        None
    };

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); blocks.len()];
    let mut roots = Vec::new();
    for i in (0..blocks.len()).filter(|&i| eligible[i]) {
        match nearest_eligible(i) {
            Some(p) => children[p].push(i),
            None => roots.push(i),
        }
    }

    let mut picked = Vec::new();
    let mut pending: Vec<usize> = roots.into_iter().rev().collect();
    while let Some(i) = pending.pop() {
        if children[i].len() >= 2 {
            pending.extend(children[i].iter().rev());
        } else {
            picked.push(i);
        }
    }
    picked.sort_unstable();
    picked.into_iter().map(|i| &blocks[i]).collect()
}

fn is_candidate(text: &str, tuning: &HeuristicTuning) -> bool {
    let len = text.trim().chars().count();
    len >= tuning.min_chars
        && len <= tuning.max_chars
        && rtl_ratio(text) >= tuning.min_rtl_ratio
        && has_review_keyword(text, &tuning.keywords)
}

fn parse_candidate(candidate: &CandidateSnapshot, tuning: &HeuristicTuning) -> ReviewRecord {
    let raw = candidate.text.trim();
    let author = pick_author(raw, candidate.name_hint.as_deref(), tuning);
    let date = find_date(raw).unwrap_or_default().to_string();

    // Dates such as 1402/5/12 would otherwise read as a "N/5" rating.
    let without_date = if date.is_empty() {
        raw.to_string()
    } else {
        raw.replace(&date, " ")
    };
    let rating = find_rating(&without_date);

    let mut text = without_date;
    if !author.is_empty() {
        text = text.replacen(&author, " ", 1);
    }
    if let Some(r) = &rating {
        text = text.replace(&r.raw, " ");
    }

    ReviewRecord {
        title: UNTAGGED.to_string(),
        author,
        rating: rating.map(|r| r.value).unwrap_or_default(),
        text: collapse_whitespace(&text),
        date,
    }
}

/// First line when it is a separate, name-sized line; otherwise the class-hinted element.
fn pick_author(raw: &str, hint: Option<&str>, tuning: &HeuristicTuning) -> String {
    let mut lines = raw.lines().map(str::trim).filter(|l| !l.is_empty());
    let first = lines.next();
    let has_more = lines.next().is_some();

    if let Some(first) = first {
        if has_more && first.chars().count() <= tuning.author_max_chars {
            return first.to_string();
        }
    }

    hint.map(collapse_whitespace)
        .filter(|h| !h.is_empty() && h.chars().count() <= tuning.author_max_chars)
        .unwrap_or_default()
}

pub struct HeuristicExtraction {
    pub tuning: HeuristicTuning,
}

#[async_trait]
impl Strategy for HeuristicExtraction {
    type Output = Extracted;

    fn name(&self) -> &'static str {
        "heuristic"
    }

    async fn attempt(&self, page: &dyn DocumentPage) -> Attempt<Extracted> {
        let script = scripts::heuristic_snapshot(self.tuning.min_chars, self.tuning.max_chars);
        let blocks: Vec<CandidateSnapshot> = page_utils::extract_json(page, &script).await;
        if blocks.is_empty() {
            return Attempt::NotApplicable("no text blocks in range".into());
        }

        Attempt::Succeeded(Extracted {
            mode: Some(ExtractionMode::Heuristic),
            items_found: blocks.len(),
            records: parse_candidates(&blocks, &self.tuning),
        })
    }
}
