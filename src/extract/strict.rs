use async_trait::async_trait;
use serde::Deserialize;

use crate::browser::{page_utils, scripts, DocumentPage};
use crate::extract::normalize::{collapse_whitespace, strict_rating};
use crate::extract::patterns::find_rating_phrase;
use crate::extract::Extracted;
use crate::interaction::strategy::{Attempt, Strategy};
use crate::types::{ExtractionMode, ReviewRecord, UNTAGGED};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemSnapshot {
    pub info: Option<InfoSnapshot>,
    pub body: Option<BodySnapshot>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InfoSnapshot {
    #[serde(default)]
    pub paragraphs: Vec<String>,
    pub rate: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BodySnapshot {
    #[serde(default)]
    pub paragraphs: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Read items positionally. Items missing their info or body block are skipped.
pub fn parse_items(items: &[ItemSnapshot]) -> Vec<ReviewRecord> {
    items.iter().filter_map(parse_item).collect()
}

fn parse_item(item: &ItemSnapshot) -> Option<ReviewRecord> {
    let (info, body) = (item.info.as_ref()?, item.body.as_ref()?);
    let para = |ps: &[String], i: usize| ps.get(i).map(|p| collapse_whitespace(p)).unwrap_or_default();

    let tags: Vec<String> = body
        .tags
        .iter()
        .map(|t| collapse_whitespace(t))
        .filter(|t| !t.is_empty())
        .collect();

    Some(ReviewRecord {
        title: if tags.is_empty() {
            UNTAGGED.to_string()
        } else {
            tags.join("، ")
        },
        author: para(&info.paragraphs, 0),
        date: para(&info.paragraphs, 1),
        rating: info.rate.as_deref().map(rate_value).unwrap_or_default(),
        text: para(&body.paragraphs, 0),
    })
}

/// A rate node reading `۴.۵ از ۵` keeps its scale; a bare number stays a bare number.
fn rate_value(raw: &str) -> String {
    match find_rating_phrase(raw) {
        Some(phrase) => phrase.value,
        None => strict_rating(raw),
    }
}

pub struct StrictExtraction;

#[async_trait]
impl Strategy for StrictExtraction {
    type Output = Extracted;

    fn name(&self) -> &'static str {
        "strict"
    }

    async fn attempt(&self, page: &dyn DocumentPage) -> Attempt<Extracted> {
        let items: Vec<ItemSnapshot> = page_utils::extract_json(page, scripts::STRICT_SNAPSHOT).await;
        if items.is_empty() {
            return Attempt::NotApplicable("no structured review items on the page".into());
        }

        Attempt::Succeeded(Extracted {
            mode: Some(ExtractionMode::Strict),
            items_found: items.len(),
            records: parse_items(&items),
        })
    }
}
