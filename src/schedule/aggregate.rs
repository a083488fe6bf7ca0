//! Filtering, ordering, counting and grouping of appointment lists
//!
//! Dates and times are compared as strings. That matches chronological order
//! only because inputs are validated as fixed-width `YYYY-MM-DD` and `HH:MM`.

use crate::entities::Appointment;
use chrono::{Datelike, Days, NaiveDate, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::convert::Infallible;
use std::str::FromStr;

/// Group key for appointments without a date
pub const UNDATED_GROUP: &str = "other";

pub const WEEKDAY_SHORT: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// ISO calendar date string used for comparisons
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Reference date for `today` and `upcoming`: the UTC calendar date
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

/// Which appointments a list view shows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    #[default]
    All,
    Today,
    Upcoming,
    Date,
}

impl FromStr for FilterMode {
    type Err = Infallible;

    /// Unknown modes behave as `all`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "today" => FilterMode::Today,
            "upcoming" => FilterMode::Upcoming,
            "date" => FilterMode::Date,
            _ => FilterMode::All,
        })
    }
}

/// Keep the appointments a mode selects, preserving order
///
/// `date` mode without an explicit date keeps everything.
pub fn filter_by_mode(
    list: Vec<Appointment>,
    mode: FilterMode,
    reference: NaiveDate,
    explicit_date: Option<NaiveDate>,
) -> Vec<Appointment> {
    let reference = date_key(reference);
    match (mode, explicit_date) {
        (FilterMode::Today, _) => list.into_iter().filter(|a| a.date == reference).collect(),
        (FilterMode::Upcoming, _) => list
            .into_iter()
            .filter(|a| a.date.as_str() >= reference.as_str())
            .collect(),
        (FilterMode::Date, Some(date)) => {
            let wanted = date_key(date);
            list.into_iter().filter(|a| a.date == wanted).collect()
        }
        (FilterMode::Date, None) | (FilterMode::All, _) => list,
    }
}

/// Stable ascending sort by `(date, time)`
pub fn sort_chronological(list: &mut [Appointment]) {
    list.sort_by(|a, b| (&a.date, &a.time).cmp(&(&b.date, &b.time)));
}

/// Appointment count per date; undated appointments are skipped
pub fn counts_by_date(list: &[Appointment]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for appointment in list.iter().filter(|a| !a.date.is_empty()) {
        *counts.entry(appointment.date.clone()).or_insert(0) += 1;
    }
    counts
}

/// Appointments sharing one date key
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DateGroup {
    pub date_key: String,
    pub appointments: Vec<Appointment>,
}

/// Group by date with keys ascending; order within a group is kept
pub fn group_by_date(list: &[Appointment]) -> Vec<DateGroup> {
    let mut groups: BTreeMap<&str, Vec<Appointment>> = BTreeMap::new();
    for appointment in list {
        let key = if appointment.date.is_empty() {
            UNDATED_GROUP
        } else {
            appointment.date.as_str()
        };
        groups.entry(key).or_default().push(appointment.clone());
    }

    groups
        .into_iter()
        .map(|(key, appointments)| DateGroup {
            date_key: key.to_string(),
            appointments,
        })
        .collect()
}

/// The Sunday..Saturday week containing `center` shifted by whole weeks
///
/// Offsets that would leave chrono's date range fall back to `center`.
pub fn week_window(center: NaiveDate, offset_weeks: i64) -> Vec<NaiveDate> {
    let shifted = TimeDelta::try_weeks(offset_weeks)
        .and_then(|delta| center.checked_add_signed(delta))
        .unwrap_or(center);
    let back = Days::new(u64::from(shifted.weekday().num_days_from_sunday()));
    let start = shifted.checked_sub_days(back).unwrap_or(shifted);

    start.iter_days().take(7).collect()
}

/// One day's appointments ordered by time
pub fn appointments_on(list: &[Appointment], date: NaiveDate) -> Vec<Appointment> {
    let wanted = date_key(date);
    let mut day: Vec<Appointment> = list.iter().filter(|a| a.date == wanted).cloned().collect();
    day.sort_by(|a, b| a.time.cmp(&b.time));
    day
}

/// One cell of the calendar strip
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DayCount {
    pub date: NaiveDate,
    pub weekday: String,
    pub count: usize,
}

/// The week window annotated with weekday labels and appointment counts
pub fn calendar_strip(list: &[Appointment], center: NaiveDate, offset_weeks: i64) -> Vec<DayCount> {
    let counts = counts_by_date(list);
    week_window(center, offset_weeks)
        .into_iter()
        .map(|date| DayCount {
            weekday: WEEKDAY_SHORT[date.weekday().num_days_from_sunday() as usize].to_string(),
            count: counts.get(&date_key(date)).copied().unwrap_or(0),
            date,
        })
        .collect()
}
