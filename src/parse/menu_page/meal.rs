use serde::{Deserialize, Serialize};

use super::money::MealPrice;
use crate::parse::text::{element_text, normalize_whitespace};
use crate::parse::Error;
use crate::{static_regex, static_selector};

/// Class the site puts on promoted dishes.
pub const HIGHLIGHT_CLASS: &str = "dish-highlight";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealEntry {
    pub title: String,
    pub allergens: Vec<String>,
    pub allergens_raw: Option<String>,
    pub price: Option<MealPrice>,
    pub highlight: bool,
}

impl MealEntry {
    /// Normalizes one `.dish` element. Returns `Ok(None)` if the item has no
    /// title text left once the allergen annotation is removed.
    pub fn from_html_element(element: scraper::ElementRef) -> Result<Option<Self>, Error> {
        // example html at ../html_examples/week_menu.html
        static_selector!(TITLE_SELECTOR <- ".dish-title");
        static_selector!(ANNOTATION_SELECTOR <- "sup, .allergens");
        static_selector!(PRICE_SELECTOR <- ".dish-price");
        static_regex!(TRAILING_GROUP <- r"\([^()]*\)\s*$");

        let Some(heading) = element.select(&TITLE_SELECTOR).next() else {
            return Ok(None);
        };
        let annotation_element = heading
            .select(&ANNOTATION_SELECTOR)
            .next()
            .filter(|a| !element_text(*a).is_empty());

        let (title, annotation) = match annotation_element {
            Some(a) => (text_outside(heading, a), Some(a.text().collect::<String>())),
            None => {
                let full_text: String = heading.text().collect();
                match TRAILING_GROUP.find(&full_text) {
                    Some(m) => (full_text[..m.start()].to_owned(), Some(m.as_str().to_owned())),
                    None => (full_text, None),
                }
            }
        };
        let title = normalize_whitespace(&title);
        if title.is_empty() {
            return Ok(None);
        }

        let allergens_raw = annotation.map(|a| normalize_whitespace(&a));
        let allergens = allergens_raw
            .as_deref()
            .map(split_allergens)
            .unwrap_or_default();

        let price = match element.select(&PRICE_SELECTOR).next() {
            Some(p) => MealPrice::from_text(&element_text(p))?,
            None => None,
        };

        let highlight = element.value().classes().any(|c| c == HIGHLIGHT_CLASS);

        Ok(Some(Self {
            title,
            allergens,
            allergens_raw,
            price,
            highlight,
        }))
    }
}

/// Text of `heading` without the text nodes that sit inside `skipped`.
fn text_outside(heading: scraper::ElementRef, skipped: scraper::ElementRef) -> String {
    heading
        .descendants()
        .filter(|node| !node.ancestors().any(|a| a.id() == skipped.id()))
        .filter_map(|node| node.value().as_text().map(|t| &**t))
        .collect()
}

/// `"(a1, c,, 3)"` -> `["a1", "c", "3"]`, keeping the first of any repeats.
fn split_allergens(raw: &str) -> Vec<String> {
    let inner = raw.trim().trim_start_matches('(').trim_end_matches(')');
    let mut out: Vec<String> = Vec::new();
    for token in inner.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if !out.iter().any(|seen| seen == token) {
            out.push(token.to_owned());
        }
    }
    out
}
