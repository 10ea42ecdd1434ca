use std::collections::BTreeMap;

use regex::Regex;
use scraper::ElementRef;
use serde::{Deserialize, Serialize};

use crate::parse::statics::StaticRegex;
use crate::parse::text::{element_text, normalize_whitespace};
use crate::{static_regex, static_selector};

/// Heading text that introduces the legend block.
const LEGEND_HEADING: &str = "legende";

/// The three glossaries a canteen page publishes below its menus.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Legend {
    pub info: BTreeMap<String, String>,
    pub allergens: BTreeMap<String, String>,
    pub additives: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegendSection {
    /// `(VG) vegan`
    Info,
    /// `a1) Weizen`
    Allergens,
    /// `12) mit Phosphat`
    Additives,
}

impl LegendSection {
    fn key_pattern(self) -> &'static Regex {
        static INFO: StaticRegex = StaticRegex::new(r"\(([A-Z]+)\)");
        static ALLERGENS: StaticRegex = StaticRegex::new(r"\b([a-z]\d?)\)");
        static ADDITIVES: StaticRegex = StaticRegex::new(r"\b(\d{1,2})\)");
        let re: &'static StaticRegex = match self {
            Self::Info => &INFO,
            Self::Allergens => &ALLERGENS,
            Self::Additives => &ADDITIVES,
        };
        re
    }

    /// Scans one sub-text. Each key owns the text up to the next key.
    pub fn parse(self, text: &str) -> BTreeMap<String, String> {
        static_regex!(HEADING_PREFIX <- r"^\s*[^():]*:");
        let text = match HEADING_PREFIX.find(text) {
            Some(m) => &text[m.end()..],
            None => text,
        };

        let pattern = self.key_pattern();
        let keys: Vec<_> = pattern.captures_iter(text).collect();
        let mut out = BTreeMap::new();
        for (i, caps) in keys.iter().enumerate() {
            let (Some(whole), Some(key)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let end = keys
                .get(i + 1)
                .and_then(|next| next.get(0))
                .map_or(text.len(), |next| next.start());
            let description = clean_description(&text[whole.end()..end]);
            if !description.is_empty() {
                out.insert(key.as_str().to_owned(), description);
            }
        }
        out
    }
}

fn clean_description(s: &str) -> String {
    let s = normalize_whitespace(s);
    s.trim_end_matches([',', ';'])
        .trim_end()
        .trim_end_matches('.')
        .trim_end()
        .to_owned()
}

impl Legend {
    pub fn from_texts(info: &str, allergens: &str, additives: &str) -> Self {
        Self {
            info: LegendSection::Info.parse(info),
            allergens: LegendSection::Allergens.parse(allergens),
            additives: LegendSection::Additives.parse(additives),
        }
    }

    /// Finds the legend block of a page. A page without a legend heading, or
    /// whose legend is not laid out in three columns, has no legend.
    pub fn from_html_element(element: ElementRef) -> Option<Self> {
        static_selector!(HEADING_SELECTOR <- "h2, h3, h4");
        static_selector!(COLUMN_SELECTOR <- ".legend-column");

        let heading = element
            .select(&HEADING_SELECTOR)
            .find(|h| element_text(*h).to_lowercase().starts_with(LEGEND_HEADING))?;
        let block = heading.parent().and_then(ElementRef::wrap)?;
        let columns: Vec<String> = block.select(&COLUMN_SELECTOR).map(element_text).collect();
        match columns.as_slice() {
            [info, allergens, additives, ..] => Some(Self::from_texts(info, allergens, additives)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HTML: &str = r#"
<div class="menu-footer">
  <h3>Legende</h3>
  <div class="legend-column"><strong>Kennzeichnungen:</strong>
    (V) vegetarisch, (VG) vegan, (S) mit   Schweinefleisch.</div>
  <div class="legend-column"><strong>Allergene:</strong>
    a) glutenhaltiges Getreide a1) Weizen a2) Roggen c) Eier g) Milch.</div>
  <div class="legend-column"><strong>Zusatzstoffe:</strong>
    1) mit Farbstoff 2) mit Konservierungsstoff 12) mit Phosphat.</div>
</div>"#;

    #[test]
    fn test_sections() {
        let info = LegendSection::Info.parse("Kennzeichnungen: (V) vegetarisch, (VG) vegan.");
        assert_eq!(info.get("V").map(String::as_str), Some("vegetarisch"));
        assert_eq!(info.get("VG").map(String::as_str), Some("vegan"));

        let allergens = LegendSection::Allergens.parse("a1) Weizen  a2)\nRoggen. b) Krebstiere");
        assert_eq!(allergens.len(), 3);
        assert_eq!(allergens["a2"], "Roggen");
        assert_eq!(allergens["b"], "Krebstiere");

        let additives = LegendSection::Additives.parse("1) mit Farbstoff 12) mit Phosphat.");
        assert_eq!(additives["1"], "mit Farbstoff");
        assert_eq!(additives["12"], "mit Phosphat");
    }

    #[test]
    fn test_colon_inside_description_is_kept() {
        let allergens = LegendSection::Allergens.parse("a) Getreide: Weizen, Roggen b) Fisch");
        assert_eq!(allergens["a"], "Getreide: Weizen, Roggen");
        assert_eq!(allergens["b"], "Fisch");
    }

    #[test]
    fn test_from_html_element() {
        let doc = scraper::Html::parse_document(HTML);
        let legend = Legend::from_html_element(doc.root_element()).expect("legend is present");
        assert_eq!(legend.info.len(), 3);
        assert_eq!(legend.info["S"], "mit Schweinefleisch");
        assert_eq!(
            legend.allergens.keys().collect::<Vec<_>>(),
            vec!["a", "a1", "a2", "c", "g"]
        );
        assert_eq!(legend.additives["2"], "mit Konservierungsstoff");
    }

    #[test]
    fn test_parsing_is_idempotent() {
        let doc = scraper::Html::parse_document(HTML);
        let first = Legend::from_html_element(doc.root_element());
        let second = Legend::from_html_element(doc.root_element());
        assert!(first.is_some());
        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_legend() {
        let doc = scraper::Html::parse_document("<h3>Speiseplan</h3><div class=\"legend-column\">a) b</div>");
        assert_eq!(Legend::from_html_element(doc.root_element()), None);

        let two_columns = r#"<div><h3>Legende</h3>
            <div class="legend-column">(V) vegan</div>
            <div class="legend-column">a) Gluten</div></div>"#;
        let doc = scraper::Html::parse_document(two_columns);
        assert_eq!(Legend::from_html_element(doc.root_element()), None);
    }
}
