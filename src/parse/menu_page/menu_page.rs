use std::fmt::Display;

use chrono::{Local, NaiveDate};
use scraper::Html;

use super::date::{parse_anchor, resolve_date};
use super::day_menu::DayMenu;
use super::legend::Legend;
use crate::parse::text::element_text;
use crate::parse::Error;
use crate::static_selector;

/// Problems that do not stop extraction of the rest of a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractWarning {
    /// Labels and dish rows are paired up to the shorter of the two.
    DayCountMismatch {
        container: usize,
        labels: usize,
        rows: usize,
    },
    /// The heading had no `DD.MM.YYYY`; `fallback` was used as the anchor.
    MissingAnchor {
        container: usize,
        fallback: NaiveDate,
    },
    UntitledDishes { date: NaiveDate, count: usize },
}

impl Display for ExtractWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DayCountMismatch {
                container,
                labels,
                rows,
            } => write!(
                f,
                "week {container}: {labels} day labels but {rows} dish rows, extra entries ignored"
            ),
            Self::MissingAnchor {
                container,
                fallback,
            } => write!(f, "week {container}: no date in heading, assuming {fallback}"),
            Self::UntitledDishes { date, count } => {
                write!(f, "{date}: skipped {count} dish(es) without a title")
            }
        }
    }
}

/// Everything extracted from one canteen's menu page.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuPage {
    pub days: Vec<DayMenu>,
    pub legend: Option<Legend>,
    pub warnings: Vec<ExtractWarning>,
}

impl MenuPage {
    pub fn from_html(html: &Html) -> Result<Self, Error> {
        Self::from_html_at(html, Local::now().date_naive())
    }

    /// `today` anchors week containers whose heading carries no date.
    pub fn from_html_at(html: &Html, today: NaiveDate) -> Result<Self, Error> {
        static_selector!(WEEK_SELECTOR <- ".week-menu");
        static_selector!(HEADING_SELECTOR <- ".week-heading, h1, h2, h3");
        static_selector!(DAY_LABEL_SELECTOR <- ".day-label");
        static_selector!(DISH_ROW_SELECTOR <- ".dish-row");

        let containers: Vec<_> = html.select(&WEEK_SELECTOR).collect();
        if containers.is_empty() {
            return Err(Error::html_parse_error(
                "No week container found, the page layout has changed",
            ));
        }

        let mut days = Vec::new();
        let mut warnings = Vec::new();
        for (index, container) in containers.into_iter().enumerate() {
            let anchor = container
                .select(&HEADING_SELECTOR)
                .next()
                .and_then(|heading| parse_anchor(&element_text(heading)));
            let anchor = anchor.unwrap_or_else(|| {
                warnings.push(ExtractWarning::MissingAnchor {
                    container: index,
                    fallback: today,
                });
                today
            });

            let labels: Vec<String> = container
                .select(&DAY_LABEL_SELECTOR)
                .map(element_text)
                .collect();
            let rows: Vec<_> = container.select(&DISH_ROW_SELECTOR).collect();
            if labels.len() != rows.len() {
                warnings.push(ExtractWarning::DayCountMismatch {
                    container: index,
                    labels: labels.len(),
                    rows: rows.len(),
                });
            }

            let mut previous = None;
            for (label, row) in labels.into_iter().zip(rows) {
                let date = resolve_date(&label, anchor, previous)?;
                previous = Some(date);
                let mut skipped = 0;
                days.push(DayMenu::from_html_element(date, label, row, &mut skipped)?);
                if skipped > 0 {
                    warnings.push(ExtractWarning::UntitledDishes {
                        date,
                        count: skipped,
                    });
                }
            }
        }

        Ok(Self {
            days,
            legend: Legend::from_html_element(html.root_element()),
            warnings,
        })
    }
}
