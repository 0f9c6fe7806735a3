//! Calendar periods used for range filtering and day grouping.
//!
//! All periods are computed in the local calendar of a [`Calendar`]'s
//! reference time and expressed as inclusive UTC ranges at millisecond
//! resolution: a period ends one millisecond before the next one starts.

use chrono::{
    DateTime, Datelike as _, Days, FixedOffset, Local, Months, NaiveDate, NaiveDateTime, NaiveTime,
    TimeDelta, TimeZone as _, Utc,
};
use serde::{Deserialize, Serialize};

use crate::models::DateFilterMode;

/// Label used for transactions dated on the reference day.
pub const TODAY_LABEL: &str = "Today";
/// Label used for transactions dated the day before the reference day.
pub const YESTERDAY_LABEL: &str = "Yesterday";
/// `strftime` pattern for older days, e.g. `Mar 05, 2024`.
const ABSOLUTE_DAY_FORMAT: &str = "%b %d, %Y";

/// Inclusive range of timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    /// First instant in the range.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub start: DateTime<Utc>,
    /// Last instant in the range.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub end: DateTime<Utc>,
}

impl DateRange {
    /// Creates a range from `start` to `end`, both inclusive.
    #[inline]
    #[must_use]
    pub const fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Returns `true` if `start <= date <= end`.
    #[inline]
    #[must_use]
    pub fn contains(&self, date: DateTime<Utc>) -> bool {
        self.start <= date && date <= self.end
    }

    /// Returns `true` if the bounds are inverted, so nothing can match.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }
}

/// How local days map onto UTC instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Zone {
    /// One offset for every date.
    Fixed(FixedOffset),
    /// The system time zone, resolved per date so that day bounds follow
    /// daylight-saving changes.
    System,
}

/// A reference instant plus the time zone of the user's calendar.
///
/// Every relative period ("this month", "today") is derived from the
/// reference instant, so recomputing with a new `Calendar` is how a
/// long-running session rolls over to a new day or month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Calendar {
    /// Reference instant in the user's offset.
    now: DateTime<FixedOffset>,
    /// Zone used to place local midnights.
    zone: Zone,
}

impl Calendar {
    /// Creates a calendar anchored at `now` that uses `now`'s offset for
    /// every date.
    #[inline]
    #[must_use]
    pub fn new(now: DateTime<FixedOffset>) -> Self {
        Self {
            now,
            zone: Zone::Fixed(*now.offset()),
        }
    }

    /// Creates a calendar anchored at the system clock in the system time
    /// zone. Each date gets the offset in effect on that date.
    #[inline]
    #[must_use]
    pub fn now_local() -> Self {
        Self {
            now: Local::now().fixed_offset(),
            zone: Zone::System,
        }
    }

    /// Creates a UTC calendar anchored at `now`.
    #[inline]
    #[must_use]
    pub fn utc(now: DateTime<Utc>) -> Self {
        Self::new(now.fixed_offset())
    }

    /// Reference instant.
    #[inline]
    #[must_use]
    pub const fn now(&self) -> DateTime<FixedOffset> {
        self.now
    }

    /// Local calendar date of the reference instant.
    #[inline]
    #[must_use]
    pub fn today_date(&self) -> NaiveDate {
        self.now.date_naive()
    }

    /// Local calendar date of an arbitrary timestamp.
    #[inline]
    #[must_use]
    pub fn local_day(&self, date: DateTime<Utc>) -> NaiveDate {
        match self.zone {
            Zone::Fixed(offset) => date.with_timezone(&offset).date_naive(),
            Zone::System => date.with_timezone(&Local).date_naive(),
        }
    }

    /// Range covering `from` up to (not including) `until`, both local days.
    fn span(&self, from: NaiveDate, until: NaiveDate) -> DateRange {
        let end = self.local_midnight(until) - TimeDelta::milliseconds(1);
        DateRange::new(self.local_midnight(from), end)
    }

    /// UTC instant of local midnight at the start of `day`.
    fn local_midnight(&self, day: NaiveDate) -> DateTime<Utc> {
        let local: NaiveDateTime = day.and_time(NaiveTime::MIN);
        let offset = TimeDelta::seconds(i64::from(self.offset_at(local).local_minus_utc()));
        (local - offset).and_utc()
    }

    /// Offset in effect at the local time `local`.
    ///
    /// A midnight skipped by a daylight-saving jump falls back to the
    /// reference offset.
    fn offset_at(&self, local: NaiveDateTime) -> FixedOffset {
        match self.zone {
            Zone::Fixed(offset) => offset,
            Zone::System => Local
                .offset_from_local_datetime(&local)
                .earliest()
                .unwrap_or_else(|| *self.now.offset()),
        }
    }

    /// The whole local day `day`.
    #[inline]
    #[must_use]
    pub fn day(&self, day: NaiveDate) -> DateRange {
        self.span(day, next_day(day))
    }

    /// The reference day.
    #[inline]
    #[must_use]
    pub fn today(&self) -> DateRange {
        self.day(self.today_date())
    }

    /// Monday 00:00 through Sunday 23:59:59.999 of the reference week.
    #[inline]
    #[must_use]
    pub fn this_week(&self) -> DateRange {
        let today = self.today_date();
        let from_monday = u64::from(today.weekday().num_days_from_monday());
        let monday = today.checked_sub_days(Days::new(from_monday)).unwrap_or(today);
        let next_monday = monday.checked_add_days(Days::new(7)).unwrap_or(monday);
        self.span(monday, next_monday)
    }

    /// First through last day of the reference month.
    #[inline]
    #[must_use]
    pub fn this_month(&self) -> DateRange {
        let today = self.today_date();
        let first = today.with_day(1).unwrap_or(today);
        let next_first = first.checked_add_months(Months::new(1)).unwrap_or(first);
        self.span(first, next_first)
    }

    /// Range selected by a relative filter mode.
    ///
    /// Returns `None` for [`DateFilterMode::All`] and
    /// [`DateFilterMode::Custom`], whose bounds do not come from the
    /// calendar.
    #[inline]
    #[must_use]
    pub fn range_for(&self, mode: DateFilterMode) -> Option<DateRange> {
        match mode {
            DateFilterMode::ThisWeek => Some(self.this_week()),
            DateFilterMode::ThisMonth => Some(self.this_month()),
            DateFilterMode::All | DateFilterMode::Custom => None,
        }
    }

    /// Display label for the day of `date`: "Today", "Yesterday", or
    /// the absolute date.
    #[inline]
    #[must_use]
    pub fn relative_label(&self, date: DateTime<Utc>) -> String {
        self.day_label(self.local_day(date))
    }

    /// Display label for a local calendar day.
    #[inline]
    #[must_use]
    pub fn day_label(&self, day: NaiveDate) -> String {
        let today = self.today_date();
        if day == today {
            TODAY_LABEL.to_owned()
        } else if today.pred_opt() == Some(day) {
            YESTERDAY_LABEL.to_owned()
        } else {
            day.format(ABSOLUTE_DAY_FORMAT).to_string()
        }
    }
}

impl Default for Calendar {
    #[inline]
    fn default() -> Self {
        Self::now_local()
    }
}

/// The day after `day`, saturating at the calendar maximum.
fn next_day(day: NaiveDate) -> NaiveDate {
    day.succ_opt().unwrap_or(day)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone as _;

    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, offset_hours: i32) -> Calendar {
        let offset = FixedOffset::east_opt(offset_hours * 3600).unwrap();
        let now = NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 30, 0)
            .unwrap()
            .and_local_timezone(offset)
            .unwrap();
        Calendar::new(now)
    }

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32, ms: u32) -> DateTime<Utc> {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_milli_opt(h, min, s, ms)
            .unwrap()
            .and_utc()
    }

    /// UTC instant of local midnight in the system zone, as chrono resolves it.
    fn system_midnight(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        let local = NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_time(NaiveTime::MIN);
        Local
            .from_local_datetime(&local)
            .earliest()
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn system_zone_resolves_each_date_separately() {
        let calendar = Calendar::now_local();
        let winter = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let summer = NaiveDate::from_ymd_opt(2024, 7, 15).unwrap();
        assert_eq!(calendar.day(winter).start, system_midnight(2024, 1, 15));
        assert_eq!(calendar.day(summer).start, system_midnight(2024, 7, 15));
        assert_eq!(
            calendar.day(summer).end,
            system_midnight(2024, 7, 16) - TimeDelta::milliseconds(1)
        );
        assert_eq!(calendar.local_day(system_midnight(2024, 7, 15)), summer);
    }

    #[test]
    fn fixed_zone_keeps_one_offset() {
        let calendar = at(2024, 3, 13, 12, 2);
        let summer = NaiveDate::from_ymd_opt(2024, 7, 15).unwrap();
        assert_eq!(calendar.day(summer).start, utc(2024, 7, 14, 22, 0, 0, 0));
    }

    #[test]
    fn range_contains_is_inclusive() {
        let range = DateRange::new(utc(2024, 1, 1, 0, 0, 0, 0), utc(2024, 1, 31, 0, 0, 0, 0));
        assert!(range.contains(range.start));
        assert!(range.contains(range.end));
        assert!(!range.contains(utc(2023, 12, 31, 23, 59, 59, 999)));
        assert!(!range.is_empty());
    }

    #[test]
    fn inverted_range_is_empty() {
        let range = DateRange::new(utc(2024, 2, 1, 0, 0, 0, 0), utc(2024, 1, 1, 0, 0, 0, 0));
        assert!(range.is_empty());
        assert!(!range.contains(utc(2024, 1, 15, 0, 0, 0, 0)));
    }

    #[test]
    fn this_month_in_utc() {
        let calendar = at(2024, 2, 14, 12, 0);
        let month = calendar.this_month();
        assert_eq!(month.start, utc(2024, 2, 1, 0, 0, 0, 0));
        assert_eq!(month.end, utc(2024, 2, 29, 23, 59, 59, 999));
    }

    #[test]
    fn this_month_respects_offset() {
        let calendar = at(2024, 3, 10, 9, 3);
        let month = calendar.this_month();
        assert_eq!(month.start, utc(2024, 2, 29, 21, 0, 0, 0));
        assert_eq!(month.end, utc(2024, 3, 31, 20, 59, 59, 999));
    }

    #[test]
    fn this_week_runs_monday_to_sunday() {
        // 2024-05-16 is a Thursday.
        let calendar = at(2024, 5, 16, 8, 0);
        let week = calendar.this_week();
        assert_eq!(week.start, utc(2024, 5, 13, 0, 0, 0, 0));
        assert_eq!(week.end, utc(2024, 5, 19, 23, 59, 59, 999));
    }

    #[test]
    fn this_week_on_sunday_and_monday() {
        let sunday = at(2024, 5, 19, 8, 0).this_week();
        assert_eq!(sunday.start, utc(2024, 5, 13, 0, 0, 0, 0));
        let monday = at(2024, 5, 20, 8, 0).this_week();
        assert_eq!(monday.start, utc(2024, 5, 20, 0, 0, 0, 0));
    }

    #[test]
    fn today_range() {
        let today = at(2024, 12, 31, 23, 0).today();
        assert_eq!(today.start, utc(2024, 12, 31, 0, 0, 0, 0));
        assert_eq!(today.end, utc(2024, 12, 31, 23, 59, 59, 999));
    }

    #[test]
    fn range_for_modes() {
        let calendar = at(2024, 5, 16, 8, 0);
        assert_eq!(
            calendar.range_for(DateFilterMode::ThisMonth),
            Some(calendar.this_month())
        );
        assert_eq!(
            calendar.range_for(DateFilterMode::ThisWeek),
            Some(calendar.this_week())
        );
        assert_eq!(calendar.range_for(DateFilterMode::All), None);
        assert_eq!(calendar.range_for(DateFilterMode::Custom), None);
    }

    #[test]
    fn relative_labels() {
        let calendar = at(2024, 3, 5, 10, 0);
        assert_eq!(calendar.relative_label(utc(2024, 3, 5, 1, 0, 0, 0)), "Today");
        assert_eq!(
            calendar.relative_label(utc(2024, 3, 4, 23, 0, 0, 0)),
            "Yesterday"
        );
        assert_eq!(
            calendar.relative_label(utc(2024, 2, 3, 12, 0, 0, 0)),
            "Feb 03, 2024"
        );
    }

    #[test]
    fn local_day_uses_offset() {
        let calendar = at(2024, 3, 5, 10, -5);
        // 02:00 UTC on the 5th is still the 4th at UTC-5.
        assert_eq!(
            calendar.local_day(utc(2024, 3, 5, 2, 0, 0, 0)),
            NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
        );
    }
}
