//! Date and rating vocabularies for heuristic extraction.
//!
//! Tuned on the Persian review markup of one menu page. Unseen phrasing can slip
//! through; nothing here claims more than "first plausible match".

use lazy_static::lazy_static;
use regex::Regex;

use crate::extract::normalize::normalize_rating;

const D: &str = "[0-9۰-۹٠-٩]";

lazy_static! {
    pub static ref DATE_PATTERN: Regex = {
        let months = "فروردین|اردیبهشت|خرداد|تیر|مرداد|شهریور|مهر|آبان|آذر|دی|بهمن|اسفند";
        let units = "دقیقه|ساعت|روز|هفته|ماه|سال";
        let pattern = [
            // 1402/07/15, 2024-01-31
            format!(r"{D}{{4}}[/\-.]{D}{{1,2}}[/\-.]{D}{{1,2}}"),
            // 15/07/1402
            format!(r"{D}{{1,2}}[/\-.]{D}{{1,2}}[/\-.]{D}{{4}}"),
            // ۱۵ مهر ۱۴۰۲
            format!(r"{D}{{1,2}}\s*(?:{months})(?:\s*{D}{{2,4}})?"),
            // ۳ روز پیش, چند هفته قبل
            format!(r"(?:{D}+|یک|دو|سه|چهار|پنج|شش|چند)\s*(?:{units})\s*(?:پیش|قبل)"),
            "پریروز|دیروز|امروز".to_string(),
            r"(?i:today|yesterday|\d+\s+(?:minute|hour|day|week|month|year)s?\s+ago)".to_string(),
        ]
        .join("|");
        Regex::new(&pattern).unwrap()
    };

    // No lookahead in `regex`: the scale digit must be followed by a non-digit or the end,
    // and only group 1 is the rating.
    static ref RATING_OUT_OF: Regex = Regex::new(&format!(
        r"(?i)({D}+(?:[.,٫]{D}+)?\s*(?:/|از|out\s+of)\s*[5۵٥])(?:[^0-9۰-۹٠-٩]|$)"
    ))
    .unwrap();
    static ref RATING_STAR_WORD: Regex =
        Regex::new(&format!(r"(?i)({D}+(?:[.,٫]{D}+)?)\s*(?:ستاره|stars?)")).unwrap();
    static ref RATING_GLYPHS: Regex = Regex::new(r"[★⭐]{1,5}").unwrap();
}

/// Words that mark a text block as a review rather than menu copy.
pub const REVIEW_KEYWORDS: &[&str] = &[
    "نظر",
    "امتیاز",
    "ستاره",
    "عالی",
    "خوب",
    "بد",
    "کیفیت",
    "طعم",
    "خوشمزه",
    "سفارش",
    "ارسال",
    "پیک",
    "تازه",
    "سرد",
    "review",
    "rating",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatingMatch {
    /// Substring as it appeared in the block.
    pub raw: String,
    /// Canonical `N/5` form.
    pub value: String,
}

pub fn find_date(text: &str) -> Option<&str> {
    DATE_PATTERN.find(text).map(|m| m.as_str())
}

/// First rating-looking substring, earliest position wins across the pattern set.
pub fn find_rating(text: &str) -> Option<RatingMatch> {
    earliest_rating(text, true)
}

/// Like [`find_rating`], but only explicit "N of 5" or "N stars" phrases. A lone star
/// glyph next to a number is decoration, not a count.
pub fn find_rating_phrase(text: &str) -> Option<RatingMatch> {
    earliest_rating(text, false)
}

fn earliest_rating(text: &str, glyphs: bool) -> Option<RatingMatch> {
    let mut best: Option<(usize, RatingMatch)> = None;
    let mut consider = |start: usize, candidate: RatingMatch| {
        if best.as_ref().map_or(true, |(pos, _)| start < *pos) {
            best = Some((start, candidate));
        }
    };

    if let Some(m) = RATING_OUT_OF.captures(text).and_then(|c| c.get(1)) {
        consider(
            m.start(),
            RatingMatch {
                raw: m.as_str().to_string(),
                value: normalize_rating(m.as_str()),
            },
        );
    }
    if let Some((whole, number)) = RATING_STAR_WORD
        .captures(text)
        .and_then(|c| Some((c.get(0)?, c.get(1)?)))
    {
        consider(
            whole.start(),
            RatingMatch {
                raw: whole.as_str().to_string(),
                value: format!("{}/5", normalize_rating(number.as_str())),
            },
        );
    }
    if glyphs {
        if let Some(m) = RATING_GLYPHS.find(text) {
            consider(
                m.start(),
                RatingMatch {
                    raw: m.as_str().to_string(),
                    value: format!("{}/5", m.as_str().chars().count()),
                },
            );
        }
    }

    best.map(|(_, m)| m)
}

/// Keywords this short only count as whole words; `بد` must not fire inside `بدون`.
const WHOLE_WORD_MAX_CHARS: usize = 2;

pub fn has_review_keyword(text: &str, keywords: &[&str]) -> bool {
    let lower = text.to_lowercase();
    keywords.iter().any(|k| contains_keyword(&lower, k)) || find_rating(text).is_some()
}

fn contains_keyword(text: &str, keyword: &str) -> bool {
    if keyword.chars().count() > WHOLE_WORD_MAX_CHARS {
        return text.contains(keyword);
    }
    text.split(|c: char| !c.is_alphanumeric()).any(|word| word == keyword)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_and_relative_dates_are_found() {
        assert_eq!(find_date("ارسال شده ۱۴۰۲/۰۷/۱۵ عالی"), Some("۱۴۰۲/۰۷/۱۵"));
        assert_eq!(find_date("۱۵ مهر ۱۴۰۲ خوب بود"), Some("۱۵ مهر ۱۴۰۲"));
        assert_eq!(find_date("سه روز پیش سفارش دادم"), Some("سه روز پیش"));
        assert_eq!(find_date("۲ هفته قبل"), Some("۲ هفته قبل"));
        assert_eq!(find_date("خوب بود امروز"), Some("امروز"));
        assert_eq!(find_date("posted 3 days ago"), Some("3 days ago"));
        assert_eq!(find_date("Yesterday was fine"), Some("Yesterday"));
        assert_eq!(find_date("بدون تاریخ"), None);
    }

    #[test]
    fn rating_fraction_is_not_mistaken_for_a_date() {
        assert_eq!(find_date("۴.۵ از ۵"), None);
        assert_eq!(find_date("4.5/5"), None);
    }

    #[test]
    fn rating_patterns_normalize_to_slash_form() {
        let m = find_rating("نظر خوب ۴ از ۵ امروز").unwrap();
        assert_eq!(m.raw, "۴ از ۵");
        assert_eq!(m.value, "4/5");

        assert_eq!(find_rating("۴.۵ از ۵").unwrap().value, "4.5/5");
        assert_eq!(find_rating("rated 4 out of 5").unwrap().value, "4/5");
        assert_eq!(find_rating("۳ ستاره دادم").unwrap().value, "3/5");
        assert_eq!(find_rating("★★★★ nice").unwrap().value, "4/5");
        assert_eq!(find_rating("no score"), None);
    }

    #[test]
    fn earliest_rating_wins() {
        let m = find_rating("★★ later 5/5").unwrap();
        assert_eq!(m.value, "2/5");
    }

    #[test]
    fn keywords_or_ratings_mark_reviews() {
        assert!(has_review_keyword("غذا خوب بود", REVIEW_KEYWORDS));
        assert!(has_review_keyword("۵ از ۵", &[]));
        assert!(!has_review_keyword("منوی صبحانه", REVIEW_KEYWORDS));
    }

    #[test]
    fn scale_must_end_at_five() {
        assert_eq!(find_rating("۱۲ از ۵۰ نفر"), None);
        assert_eq!(find_rating("3/50"), None);

        let m = find_rating("امتیاز ۴ از ۵، عالی").unwrap();
        assert_eq!(m.raw, "۴ از ۵");
        assert_eq!(m.value, "4/5");
        assert_eq!(find_rating("rated 5/5").unwrap().raw, "5/5");
    }

    #[test]
    fn short_keywords_need_word_boundaries() {
        assert!(!has_review_keyword("پیتزا بدون گلوتن با سس مخصوص", REVIEW_KEYWORDS));
        assert!(has_review_keyword("غذا بد بود", REVIEW_KEYWORDS));
        assert!(has_review_keyword("واقعا بد، سرد رسید", &["بد"]));
    }

    #[test]
    fn phrase_search_ignores_decorative_glyphs() {
        assert_eq!(find_rating_phrase("★ 5"), None);
        assert_eq!(find_rating_phrase("★ ۴.۵ از ۵").unwrap().value, "4.5/5");
    }
}
