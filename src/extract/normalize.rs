use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
    static ref OUT_OF: Regex = Regex::new(r"(?i)\s*(?:/|از|out\s+of)\s*").unwrap();
}

/// Collapse every whitespace run (newlines included) to one space and trim.
pub fn collapse_whitespace(s: &str) -> String {
    WHITESPACE.replace_all(s, " ").trim().to_string()
}

/// Map Persian (`۰-۹`) and Arabic-Indic (`٠-٩`) digits to ASCII.
pub fn localize_digits(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '۰'..='۹' => char::from(b'0' + (c as u32 - '۰' as u32) as u8),
            '٠'..='٩' => char::from(b'0' + (c as u32 - '٠' as u32) as u8),
            _ => c,
        })
        .collect()
}

pub fn is_arabic_script(c: char) -> bool {
    ('\u{0600}'..='\u{06FF}').contains(&c)
}

/// Share of alphabetic characters written in Arabic script.
pub fn rtl_ratio(s: &str) -> f64 {
    let (letters, rtl) = s
        .chars()
        .filter(|c| c.is_alphabetic())
        .fold((0usize, 0usize), |(n, r), c| (n + 1, r + is_arabic_script(c) as usize));
    if letters == 0 {
        0.0
    } else {
        rtl as f64 / letters as f64
    }
}

/// Rating node text reduced to its number: digits and decimal point only, ASCII.
pub fn strict_rating(raw: &str) -> String {
    let kept: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || ('۰'..='۹').contains(c) || ('٠'..='٩').contains(c) || *c == '.' || *c == '٫')
        .collect();
    localize_digits(&kept).replace('٫', ".")
}

/// `"۴.۵ از ۵"`, `"4,5 out of 5"`, `"4 / 5"` all become `"4.5/5"`-style strings.
pub fn normalize_rating(raw: &str) -> String {
    let ascii = localize_digits(raw.trim()).replace(['٫', ','], ".");
    let slashed = OUT_OF.replace_all(&ascii, "/");
    slashed.chars().filter(|c| !c.is_whitespace()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_runs_become_single_spaces() {
        assert_eq!(collapse_whitespace("  خیلی\n\n  خوب\tبود  "), "خیلی خوب بود");
        assert_eq!(collapse_whitespace("\n \t"), "");
    }

    #[test]
    fn persian_and_arabic_digits_map_to_ascii() {
        assert_eq!(localize_digits("۱۴۰۲/۰۷/۱۵"), "1402/07/15");
        assert_eq!(localize_digits("٣ من ٥"), "3 من 5");
    }

    #[test]
    fn localized_rating_is_canonicalized() {
        assert_eq!(normalize_rating("۴.۵ از ۵"), "4.5/5");
        assert_eq!(normalize_rating("۴٫۵ از ۵"), "4.5/5");
        assert_eq!(normalize_rating("4 out of 5"), "4/5");
        assert_eq!(normalize_rating("3 / 5"), "3/5");
    }

    #[test]
    fn strict_rating_keeps_only_the_number() {
        assert_eq!(strict_rating(" امتیاز ۴٫۵ "), "4.5");
        assert_eq!(strict_rating("★ 5"), "5");
        assert_eq!(strict_rating(""), "");
    }

    #[test]
    fn rtl_ratio_counts_letters_only() {
        assert_eq!(rtl_ratio("سلام 123 !!"), 1.0);
        assert_eq!(rtl_ratio("123"), 0.0);
        assert!(rtl_ratio("good غذا") < 0.5);
    }
}
