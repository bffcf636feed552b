use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref SEPARATORS: Regex = Regex::new(r"[\s/\\]+").unwrap();
    static ref DISALLOWED: Regex = Regex::new(r"[^a-z0-9\-\x{0600}-\x{06FF}]").unwrap();
    static ref HYPHENS: Regex = Regex::new(r"-+").unwrap();
}

pub const MAX_SLUG_CHARS: usize = 180;

/// Post slug for a review. Deterministic for identical inputs.
pub fn make_slug(title: &str, author: &str, date: &str, text: &str) -> String {
    make_slug_at(title, author, date, text, chrono::Utc::now().timestamp_millis())
}

/// Like [`make_slug`], with the fallback timestamp supplied by the caller.
pub fn make_slug_at(title: &str, author: &str, date: &str, text: &str, now_millis: i64) -> String {
    let title = if title.is_empty() { "rv" } else { title };
    let head: String = text.chars().take(40).collect();
    let base = format!("{title}-{author}-{date}-{head}").to_lowercase();

    let slug = SEPARATORS.replace_all(&base, "-");
    let slug = DISALLOWED.replace_all(&slug, "");
    let slug = HYPHENS.replace_all(&slug, "-");
    let slug: String = slug.chars().take(MAX_SLUG_CHARS).collect();

    // Nothing but separators left means nothing identifying survived.
    if slug.chars().all(|c| c == '-') {
        format!("rv-{now_millis}")
    } else {
        slug
    }
}
