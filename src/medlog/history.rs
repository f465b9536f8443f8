//! Reading the intake log.
//!
//! Stored records carry no order. Everything shown to the user is sorted
//! newest first and bucketed into calendar days of the given time zone. The
//! CLI passes [`chrono::Local`]; tests pin a fixed offset.

use crate::error::{MedlogError, Result};
use crate::model::IntakeRecord;
use chrono::{Datelike, LocalResult, NaiveDate, NaiveTime, TimeZone, Timelike};
use std::collections::BTreeSet;

/// A record with its 1-based position in the newest-first log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub position: usize,
    pub record: IntakeRecord,
}

/// The entries of one calendar day, newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayGroup {
    pub day: NaiveDate,
    pub entries: Vec<HistoryEntry>,
}

/// Stable sort by timestamp, newest first.
pub fn sorted_newest_first(records: &[IntakeRecord]) -> Vec<IntakeRecord> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    sorted
}

/// The calendar day `timestamp` falls on in `tz`. `None` for timestamps
/// chrono cannot represent.
pub fn local_day<Tz: TimeZone>(timestamp: i64, tz: &Tz) -> Option<NaiveDate> {
    tz.timestamp_millis_opt(timestamp)
        .single()
        .map(|dt| dt.date_naive())
}

/// Buckets records by day, newest day first. Positions count across the
/// whole log, so they stay valid when only some days are shown.
pub fn group_by_day<Tz: TimeZone>(records: &[IntakeRecord], tz: &Tz) -> Vec<DayGroup> {
    let mut groups: Vec<DayGroup> = Vec::new();
    for (i, record) in sorted_newest_first(records).into_iter().enumerate() {
        let Some(day) = local_day(record.timestamp, tz) else {
            continue;
        };
        let entry = HistoryEntry {
            position: i + 1,
            record,
        };
        match groups.last_mut() {
            Some(group) if group.day == day => group.entries.push(entry),
            _ => groups.push(DayGroup {
                day,
                entries: vec![entry],
            }),
        }
    }
    groups
}

pub fn days_with_records<Tz: TimeZone>(records: &[IntakeRecord], tz: &Tz) -> BTreeSet<NaiveDate> {
    records
        .iter()
        .filter_map(|r| local_day(r.timestamp, tz))
        .collect()
}

/// Days of one month that have at least one record, ascending.
pub fn days_in_month<Tz: TimeZone>(
    records: &[IntakeRecord],
    year: i32,
    month: u32,
    tz: &Tz,
) -> Vec<NaiveDate> {
    days_with_records(records, tz)
        .into_iter()
        .filter(|d| d.year() == year && d.month() == month)
        .collect()
}

/// One day's group, if it has any records.
pub fn day_group<Tz: TimeZone>(
    records: &[IntakeRecord],
    day: NaiveDate,
    tz: &Tz,
) -> Option<DayGroup> {
    group_by_day(records, tz).into_iter().find(|g| g.day == day)
}

/// "Today", "Yesterday", or e.g. "Monday, May 6, 2024".
pub fn day_label(day: NaiveDate, today: NaiveDate) -> String {
    if day == today {
        return "Today".to_string();
    }
    if today.pred_opt() == Some(day) {
        return "Yesterday".to_string();
    }
    day.format("%A, %B %-d, %Y").to_string()
}

/// Epoch milliseconds for a local date and time, at minute precision.
///
/// A wall-clock time skipped by a DST change is rejected. A repeated one
/// resolves to the earlier instant.
pub fn local_timestamp<Tz: TimeZone>(date: NaiveDate, time: NaiveTime, tz: &Tz) -> Result<i64> {
    let time = NaiveTime::from_hms_opt(time.hour(), time.minute(), 0).ok_or_else(invalid_time)?;
    match tz.from_local_datetime(&date.and_time(time)) {
        LocalResult::Single(dt) => Ok(dt.timestamp_millis()),
        LocalResult::Ambiguous(earliest, _) => Ok(earliest.timestamp_millis()),
        LocalResult::None => Err(invalid_time()),
    }
}

/// Parses `YYYY-MM-DD`.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| MedlogError::Api(format!("Invalid date: {} (expected YYYY-MM-DD)", s)))
}

/// Parses `HH:MM` (24-hour).
pub fn parse_time(s: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(s.trim(), "%H:%M")
        .map_err(|_| MedlogError::Api(format!("Invalid time: {} (expected HH:MM)", s)))
}

/// Parses `YYYY-MM` into a year and month.
pub fn parse_month(s: &str) -> Result<(i32, u32)> {
    let invalid = || MedlogError::Api(format!("Invalid month: {} (expected YYYY-MM)", s));
    let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month: u32 = month.parse().map_err(|_| invalid())?;
    if !(1..=12).contains(&month) {
        return Err(invalid());
    }
    Ok((year, month))
}

fn invalid_time() -> MedlogError {
    MedlogError::Api("Invalid date or time selected.".to_string())
}
