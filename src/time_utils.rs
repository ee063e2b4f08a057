// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Reference-timezone helpers and the weekly rollup boundary.
//!
//! All default timestamps are taken in UTC+5:30. Timestamps are persisted
//! as UTC unix milliseconds and rendered back in the reference offset.
//!
//! A rollup week runs from Friday 21:31 to the following Friday 21:31.

use chrono::{
    DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveTime, SecondsFormat, TimeZone,
    Timelike, Utc,
};

/// UTC+5:30 in seconds.
const REFERENCE_OFFSET_SECS: i32 = 5 * 3600 + 30 * 60;

/// The fixed reference timezone (UTC+5:30).
pub const REFERENCE_OFFSET: FixedOffset = match FixedOffset::east_opt(REFERENCE_OFFSET_SECS) {
    Some(offset) => offset,
    None => panic!("reference offset out of range"),
};

/// Weekday the rollup week starts on, counted from Monday = 0.
const BOUNDARY_WEEKDAY: i64 = 4;
/// Time of day the rollup week starts at, in minutes after local midnight.
const BOUNDARY_MINUTES: i64 = 21 * 60 + 31;

/// Length of one rollup week in milliseconds.
pub const WEEK_MILLIS: i64 = 7 * 24 * 60 * 60 * 1000;

/// `started_date` format for identities (`DD-MM-YYYY`).
pub const STARTED_DATE_FORMAT: &str = "%d-%m-%Y";

/// Current instant in the reference timezone.
pub fn now_local() -> DateTime<FixedOffset> {
    Utc::now().with_timezone(&REFERENCE_OFFSET)
}

/// Start of the rollup week containing `now`: the latest Friday 21:31:00.000
/// (reference timezone) at or before `now`.
pub fn week_start<Tz: TimeZone>(now: &DateTime<Tz>) -> DateTime<FixedOffset> {
    let now = now.with_timezone(&REFERENCE_OFFSET);

    let dow = i64::from(now.weekday().num_days_from_monday());
    let days_since_boundary_day = (dow - BOUNDARY_WEEKDAY).rem_euclid(7);

    let since_midnight = Duration::seconds(i64::from(now.num_seconds_from_midnight()))
        + Duration::nanoseconds(i64::from(now.nanosecond()));
    let candidate = now - Duration::days(days_since_boundary_day) - since_midnight
        + Duration::minutes(BOUNDARY_MINUTES);

    // Friday before 21:31: the boundary has not been crossed yet this week.
    if candidate > now {
        candidate - Duration::days(7)
    } else {
        candidate
    }
}

/// Start of the rollup week that closed most recently before `now`'s week.
pub fn previous_week_start<Tz: TimeZone>(now: &DateTime<Tz>) -> DateTime<FixedOffset> {
    week_start(now) - Duration::days(7)
}

/// Convert stored UTC milliseconds into the reference timezone.
pub fn millis_to_local(millis: i64) -> Option<DateTime<FixedOffset>> {
    DateTime::from_timestamp_millis(millis).map(|dt| dt.with_timezone(&REFERENCE_OFFSET))
}

/// Format a timestamp as RFC3339 with millisecond precision.
pub fn format_rfc3339<Tz: TimeZone>(date: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    date.to_rfc3339_opts(SecondsFormat::Millis, false)
}

/// Format stored UTC milliseconds as RFC3339 in the reference timezone.
pub fn format_millis(millis: i64) -> String {
    millis_to_local(millis)
        .map(|dt| format_rfc3339(&dt))
        .unwrap_or_else(|| millis.to_string())
}

/// Parse an RFC3339 timestamp into the reference timezone.
pub fn parse_rfc3339(raw: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&REFERENCE_OFFSET))
}

/// Parse an ISO 8601 calendar date (`YYYY-MM-DD`).
pub fn parse_iso_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

/// UTC milliseconds of local midnight at the start of `date`.
pub fn local_day_start_millis(date: NaiveDate) -> i64 {
    let naive = date.and_time(NaiveTime::default());
    naive.and_utc().timestamp_millis() - i64::from(REFERENCE_OFFSET_SECS) * 1000
}

/// UTC milliseconds of the last millisecond of local `date`.
pub fn local_day_end_millis(date: NaiveDate) -> i64 {
    date.succ_opt()
        .map(|next| local_day_start_millis(next) - 1)
        .unwrap_or(i64::MAX)
}

/// Today's date in the reference timezone.
pub fn today_local() -> NaiveDate {
    now_local().date_naive()
}

/// Today's date in the reference timezone, formatted for `started_date`.
pub fn started_date_today() -> String {
    today_local().format(STARTED_DATE_FORMAT).to_string()
}
