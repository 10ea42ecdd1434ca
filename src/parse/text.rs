use scraper::ElementRef;

use crate::static_regex;

/// Collapses every run of whitespace (including non-breaking spaces) into a
/// single space and trims both ends.
pub fn normalize_whitespace(s: &str) -> String {
    static_regex!(WHITESPACE <- r"\s+");
    WHITESPACE.replace_all(s, " ").trim().to_owned()
}

/// All text below `element`, whitespace-normalized.
pub fn element_text(element: ElementRef) -> String {
    normalize_whitespace(&element.text().collect::<String>())
}
