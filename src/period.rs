// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Datelike, Duration, Local, NaiveDate};
use serde::Serialize;

/// Named reporting window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    ThisMonth,
    LastMonth,
    ThisYear,
    LastYear,
    Custom,
    /// No bounds; any unrecognised name maps here.
    All,
}

impl Period {
    pub fn parse(name: &str) -> Period {
        match name {
            "this_month" => Period::ThisMonth,
            "last_month" => Period::LastMonth,
            "this_year" => Period::ThisYear,
            "last_year" => Period::LastYear,
            "custom" => Period::Custom,
            _ => Period::All,
        }
    }
}

/// Inclusive date window; a missing side is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn unbounded() -> DateRange {
        DateRange::default()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.is_none_or(|s| date >= s) && self.end.is_none_or(|e| date <= e)
    }

    /// Whole calendar month containing `date`.
    pub fn month_of(date: NaiveDate) -> DateRange {
        DateRange {
            start: Some(first_of_month(date)),
            end: Some(last_of_month(date)),
        }
    }
}

fn first_of_month(d: NaiveDate) -> NaiveDate {
    d - Duration::days(d.day0() as i64)
}

// The 28th exists in every month and +4 days always crosses into the next one.
fn last_of_month(d: NaiveDate) -> NaiveDate {
    let day28 = first_of_month(d) + Duration::days(27);
    let next_month = day28 + Duration::days(4);
    first_of_month(next_month) - Duration::days(1)
}

fn first_of_year(d: NaiveDate) -> NaiveDate {
    d - Duration::days(d.ordinal0() as i64)
}

fn last_of_year(d: NaiveDate) -> NaiveDate {
    let next_year = first_of_year(d) + Duration::days(366);
    first_of_year(next_year) - Duration::days(1)
}

/// Maps a period name onto concrete bounds relative to `today`.
///
/// `custom` hands back the caller's bounds untouched, including a start
/// that falls after the end.
pub fn resolve(
    period: &str,
    custom_start: Option<NaiveDate>,
    custom_end: Option<NaiveDate>,
    today: NaiveDate,
) -> DateRange {
    match Period::parse(period) {
        Period::ThisMonth => DateRange::month_of(today),
        Period::LastMonth => {
            let end = first_of_month(today) - Duration::days(1);
            DateRange {
                start: Some(first_of_month(end)),
                end: Some(end),
            }
        }
        Period::ThisYear => DateRange {
            start: Some(first_of_year(today)),
            end: Some(last_of_year(today)),
        },
        Period::LastYear => {
            let end = first_of_year(today) - Duration::days(1);
            DateRange {
                start: Some(first_of_year(end)),
                end: Some(end),
            }
        }
        Period::Custom => DateRange {
            start: custom_start,
            end: custom_end,
        },
        Period::All => DateRange::unbounded(),
    }
}

pub fn resolve_today(
    period: &str,
    custom_start: Option<NaiveDate>,
    custom_end: Option<NaiveDate>,
) -> DateRange {
    resolve(period, custom_start, custom_end, Local::now().date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn this_month_ends_on_last_calendar_day() {
        let r = resolve("this_month", None, None, d(2024, 2, 10));
        assert_eq!(r.start, Some(d(2024, 2, 1)));
        assert_eq!(r.end, Some(d(2024, 2, 29)));

        let r = resolve("this_month", None, None, d(2023, 2, 28));
        assert_eq!(r.end, Some(d(2023, 2, 28)));

        for (m, last) in [(1, 31), (4, 30), (7, 31), (9, 30), (12, 31)] {
            let r = resolve("this_month", None, None, d(2025, m, 31.min(last)));
            assert_eq!(r.end, Some(d(2025, m, last)), "month {}", m);
        }
    }

    #[test]
    fn last_month_wraps_year() {
        let r = resolve("last_month", None, None, d(2025, 1, 15));
        assert_eq!(r.start, Some(d(2024, 12, 1)));
        assert_eq!(r.end, Some(d(2024, 12, 31)));

        let r = resolve("last_month", None, None, d(2024, 3, 31));
        assert_eq!(r.start, Some(d(2024, 2, 1)));
        assert_eq!(r.end, Some(d(2024, 2, 29)));
    }

    #[test]
    fn year_bounds() {
        let r = resolve("this_year", None, None, d(2024, 12, 31));
        assert_eq!(r.start, Some(d(2024, 1, 1)));
        assert_eq!(r.end, Some(d(2024, 12, 31)));

        let r = resolve("last_year", None, None, d(2025, 1, 1));
        assert_eq!(r.start, Some(d(2024, 1, 1)));
        assert_eq!(r.end, Some(d(2024, 12, 31)));
    }

    #[test]
    fn custom_is_passed_through_unchecked() {
        let r = resolve("custom", Some(d(2025, 5, 1)), Some(d(2025, 4, 1)), d(2025, 6, 1));
        assert_eq!(r.start, Some(d(2025, 5, 1)));
        assert_eq!(r.end, Some(d(2025, 4, 1)));

        let r = resolve("custom", None, Some(d(2025, 4, 1)), d(2025, 6, 1));
        assert_eq!(r.start, None);
    }

    #[test]
    fn unknown_period_is_unbounded() {
        let r = resolve("all", None, None, d(2025, 6, 1));
        assert_eq!(r, DateRange::unbounded());
        assert!(r.contains(d(1999, 1, 1)));
    }

    #[test]
    fn contains_is_inclusive() {
        let r = DateRange::month_of(d(2025, 6, 9));
        assert!(r.contains(d(2025, 6, 1)));
        assert!(r.contains(d(2025, 6, 30)));
        assert!(!r.contains(d(2025, 7, 1)));
    }
}
