use chrono::{Datelike, NaiveDate};

use crate::parse::Error;
use crate::static_regex;

/// First `DD.MM.YYYY` in a week heading.
pub fn parse_anchor(text: &str) -> Option<NaiveDate> {
    static_regex!(FULL_DATE <- r"(\d{1,2})\.(\d{1,2})\.(\d{4})");
    let caps = FULL_DATE.captures(text)?;
    NaiveDate::from_ymd_opt(
        caps[3].parse().ok()?,
        caps[2].parse().ok()?,
        caps[1].parse().ok()?,
    )
}

/// Resolves a `DD.MM.` day label to a calendar date.
///
/// The year comes from `previous` (the day resolved just before this one in the
/// same week container) when there is one, and is bumped when the result would
/// otherwise go backwards, so a week running from December into January keeps
/// advancing. The first day of a container takes the anchor's year; if its
/// month differs from the anchor's, the year placing it closest to the anchor
/// wins.
pub fn resolve_date(
    label: &str,
    anchor: NaiveDate,
    previous: Option<NaiveDate>,
) -> Result<NaiveDate, Error> {
    static_regex!(DAY_MONTH <- r"(\d{1,2})\.(\d{1,2})\.");
    let caps = DAY_MONTH
        .captures(label)
        .ok_or_else(|| Error::DateParse(format!("no day and month in label {label:?}")))?;
    let day: u32 = caps[1]
        .parse()
        .map_err(|_| Error::DateParse(format!("bad day in label {label:?}")))?;
    let month: u32 = caps[2]
        .parse()
        .map_err(|_| Error::DateParse(format!("bad month in label {label:?}")))?;
    let build = |year: i32| NaiveDate::from_ymd_opt(year, month, day);
    let invalid = || Error::DateParse(format!("{day:02}.{month:02}. is not a calendar date ({label:?})"));

    match previous {
        Some(prev) => {
            let candidate = build(prev.year()).ok_or_else(invalid)?;
            if candidate >= prev {
                Ok(candidate)
            } else {
                build(prev.year() + 1).ok_or_else(invalid)
            }
        }
        None => {
            let candidate = build(anchor.year()).ok_or_else(invalid)?;
            if month == anchor.month() {
                return Ok(candidate);
            }
            let closest = (anchor.year() - 1..=anchor.year() + 1)
                .filter_map(build)
                .min_by_key(|c| (*c - anchor).num_days().abs());
            Ok(closest.unwrap_or(candidate))
        }
    }
}
