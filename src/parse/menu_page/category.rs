use std::fmt::Display;

use serde::{Deserialize, Serialize};

use super::meal::MealEntry;
use crate::parse::text::element_text;
use crate::parse::Error;
use crate::static_selector;

pub const UNCATEGORIZED: &str = "Uncategorized";

/// Dishes listed before any category heading land in `Uncategorized`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CategoryTitle {
    Named(String),
    Uncategorized,
}

impl From<String> for CategoryTitle {
    fn from(s: String) -> Self {
        if s.is_empty() || s == UNCATEGORIZED {
            Self::Uncategorized
        } else {
            Self::Named(s)
        }
    }
}

impl From<CategoryTitle> for String {
    fn from(title: CategoryTitle) -> Self {
        match title {
            CategoryTitle::Named(s) => s,
            CategoryTitle::Uncategorized => UNCATEGORIZED.to_owned(),
        }
    }
}

impl Display for CategoryTitle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Named(s) => write!(f, "{s}"),
            Self::Uncategorized => write!(f, "{UNCATEGORIZED}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealCategory {
    pub title: CategoryTitle,
    pub meals: Vec<MealEntry>,
}

impl MealCategory {
    const fn new(title: CategoryTitle) -> Self {
        Self {
            title,
            meals: Vec::new(),
        }
    }

    /// Walks one column of a dish row in document order. A heading opens a new
    /// category, a dish goes into the open one. Categories that end up empty
    /// are dropped. Dishes without a title are counted in `skipped`.
    pub fn from_column(
        column: scraper::ElementRef,
        skipped: &mut usize,
    ) -> Result<Vec<Self>, Error> {
        static_selector!(BLOCK_SELECTOR <- ".category-heading, .dish");
        static_selector!(HEADING_SELECTOR <- ".category-heading");

        let mut categories: Vec<Self> = Vec::new();
        for element in column.select(&BLOCK_SELECTOR) {
            if HEADING_SELECTOR.matches(&element) {
                categories.push(Self::new(element_text(element).into()));
                continue;
            }
            let Some(meal) = MealEntry::from_html_element(element)? else {
                *skipped += 1;
                continue;
            };
            match categories.last_mut() {
                Some(open) => open.meals.push(meal),
                None => {
                    let mut implicit = Self::new(CategoryTitle::Uncategorized);
                    implicit.meals.push(meal);
                    categories.push(implicit);
                }
            }
        }
        categories.retain(|c| !c.meals.is_empty());
        Ok(categories)
    }
}
