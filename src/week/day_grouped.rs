use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use super::aggregate::{OutputWeek, WeekInfo};
use crate::parse::{Legend, MealCategory};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanteenDay {
    pub name: String,
    pub source_url: Url,
    pub legend: Option<Legend>,
    pub categories: Vec<MealCategory>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayEntry {
    pub label: String,
    pub canteens: BTreeMap<String, CanteenDay>,
}

/// The day-indexed document for one ISO week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayGroupedWeek {
    pub week: WeekInfo,
    pub generated_at: DateTime<Utc>,
    pub days: BTreeMap<NaiveDate, DayEntry>,
}

impl From<&OutputWeek> for DayGroupedWeek {
    /// Inverts canteen -> date into date -> canteen. A date's label is taken
    /// from the first canteen (by slug) serving that day.
    fn from(week: &OutputWeek) -> Self {
        let mut days: BTreeMap<NaiveDate, DayEntry> = BTreeMap::new();
        for (slug, canteen) in &week.canteens {
            for (date, details) in &canteen.days {
                let entry = days.entry(*date).or_insert_with(|| DayEntry {
                    label: details.label.clone(),
                    canteens: BTreeMap::new(),
                });
                entry.canteens.insert(
                    slug.clone(),
                    CanteenDay {
                        name: canteen.name.clone(),
                        source_url: canteen.source_url.clone(),
                        legend: canteen.legend.clone(),
                        categories: details.categories.clone(),
                    },
                );
            }
        }
        Self {
            week: week.week,
            generated_at: week.generated_at,
            days,
        }
    }
}
