use std::collections::BTreeMap;
use std::fmt::Display;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::parse::DayMenu;

/// ISO-8601 week identity. Orders by year, then week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekKey {
    pub iso_year: i32,
    pub iso_week: u32,
}

impl WeekKey {
    /// Early January days can belong to the previous ISO year and late
    /// December days to the next one.
    pub fn of(date: NaiveDate) -> Self {
        let week = date.iso_week();
        Self {
            iso_year: week.year(),
            iso_week: week.week(),
        }
    }
}

impl Display for WeekKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-W{:02}", self.iso_year, self.iso_week)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeekPartition {
    pub key: WeekKey,
    pub from: NaiveDate,
    pub to: NaiveDate,
    /// Ascending by date.
    pub days: Vec<DayMenu>,
}

/// Buckets days by ISO week. Partitions come back ordered by week.
pub fn partition_by_week(days: Vec<DayMenu>) -> Vec<WeekPartition> {
    let mut buckets: BTreeMap<WeekKey, Vec<DayMenu>> = BTreeMap::new();
    for day in days {
        buckets.entry(WeekKey::of(day.date)).or_default().push(day);
    }
    buckets
        .into_iter()
        .filter_map(|(key, mut days)| {
            days.sort_by_key(|d| d.date);
            let from = days.first()?.date;
            let to = days.last()?.date;
            Some(WeekPartition {
                key,
                from,
                to,
                days,
            })
        })
        .collect()
}
