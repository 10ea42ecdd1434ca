use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use super::partition::{WeekKey, WeekPartition};
use crate::config::Source;
use crate::parse::{Legend, MealCategory};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekInfo {
    pub iso_year: i32,
    pub iso_week: u32,
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl WeekInfo {
    pub const fn key(&self) -> WeekKey {
        WeekKey {
            iso_year: self.iso_year,
            iso_week: self.iso_week,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayDetails {
    pub label: String,
    pub categories: Vec<MealCategory>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanteenWeek {
    pub name: String,
    pub source_url: Url,
    pub legend: Option<Legend>,
    pub days: BTreeMap<NaiveDate, DayDetails>,
}

/// The canteen-indexed document for one ISO week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputWeek {
    pub week: WeekInfo,
    pub generated_at: DateTime<Utc>,
    pub canteens: BTreeMap<String, CanteenWeek>,
}

#[derive(Debug)]
struct WeekBuilder {
    from: NaiveDate,
    to: NaiveDate,
    canteens: BTreeMap<String, CanteenWeek>,
}

/// Collects the week partitions of every source. Turned into finished
/// documents with [`Aggregator::finish`] once all sources are in.
#[derive(Debug, Default)]
pub struct Aggregator {
    weeks: BTreeMap<WeekKey, WeekBuilder>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_source(
        &mut self,
        source: &Source,
        legend: Option<&Legend>,
        partitions: Vec<WeekPartition>,
    ) {
        for partition in partitions {
            let week = self
                .weeks
                .entry(partition.key)
                .or_insert_with(|| WeekBuilder {
                    from: partition.from,
                    to: partition.to,
                    canteens: BTreeMap::new(),
                });
            week.from = week.from.min(partition.from);
            week.to = week.to.max(partition.to);

            let canteen = week
                .canteens
                .entry(source.slug.clone())
                .or_insert_with(|| CanteenWeek {
                    name: source.name.clone(),
                    source_url: source.url.clone(),
                    legend: legend.cloned(),
                    days: BTreeMap::new(),
                });
            for day in partition.days {
                // one entry per date, a later duplicate replaces the earlier one
                canteen.days.insert(
                    day.date,
                    DayDetails {
                        label: day.label,
                        categories: day.categories,
                    },
                );
            }
        }
    }

    /// One document per week seen, ordered by week.
    pub fn finish(self, generated_at: DateTime<Utc>) -> Vec<OutputWeek> {
        self.weeks
            .into_iter()
            .map(|(key, week)| OutputWeek {
                week: WeekInfo {
                    iso_year: key.iso_year,
                    iso_week: key.iso_week,
                    from: week.from,
                    to: week.to,
                },
                generated_at,
                canteens: week.canteens,
            })
            .collect()
    }
}
