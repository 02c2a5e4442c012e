//! Month-index arithmetic for the date range slider.
//!
//! A month index counts months from year 0: `year * 12 + (month - 1)`.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Months shown by default (the trailing two years).
pub const DEFAULT_WINDOW_MONTHS: i32 = 24;

pub fn month_index(date: NaiveDate) -> i32 {
    date.year() * 12 + (date.month0() as i32)
}

/// First day of the month for `idx`. `None` outside chrono's calendar range.
pub fn index_to_date(idx: i32) -> Option<NaiveDate> {
    let year = idx.div_euclid(12);
    let month = idx.rem_euclid(12) as u32 + 1;
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// First day of the month containing `date`.
pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Shift a month by `months` (negative goes back), landing on the first day.
pub fn shift_months(date: NaiveDate, months: i32) -> Option<NaiveDate> {
    index_to_date(month_index(date) + months)
}

/// `"Jan 2024"` style label used under the slider.
pub fn month_label(idx: i32) -> Option<String> {
    index_to_date(idx).map(|d| d.format("%b %Y").to_string())
}

/// Inclusive range of month indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthRange {
    pub start: i32,
    pub end: i32,
}

impl MonthRange {
    /// Build a range, swapping the bounds if they arrive reversed.
    pub fn new(start: i32, end: i32) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self { start: end, end: start }
        }
    }

    /// Trailing [`DEFAULT_WINDOW_MONTHS`] months ending at `max`, clamped to `min`.
    pub fn default_for(min: NaiveDate, max: NaiveDate) -> Self {
        let min_idx = month_index(min);
        let max_idx = month_index(max);
        Self::new(min_idx.max(max_idx - (DEFAULT_WINDOW_MONTHS - 1)), max_idx)
    }

    #[inline]
    pub fn contains(&self, date: NaiveDate) -> bool {
        let idx = month_index(date);
        idx >= self.start && idx <= self.end
    }

    pub fn from_pair(pair: [i32; 2]) -> Self {
        Self::new(pair[0], pair[1])
    }
}

/// Slider mark: the January of a year inside the data bounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearMark {
    pub index: i32,
    pub label: String,
}

pub fn year_marks(min: NaiveDate, max: NaiveDate) -> Vec<YearMark> {
    let min_idx = month_index(min);
    let max_idx = month_index(max);
    (min.year()..=max.year())
        .map(|year| (year, year * 12))
        .filter(|&(_, idx)| idx >= min_idx && idx <= max_idx)
        .map(|(year, index)| YearMark {
            index,
            label: year.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, 1).unwrap()
    }

    #[test]
    fn index_round_trips_across_year_boundaries() {
        for idx in (2018 * 12 - 3)..(2026 * 12 + 3) {
            let date = index_to_date(idx).unwrap();
            assert_eq!(month_index(date), idx);
            assert_eq!(date.day(), 1);
        }
    }

    #[test]
    fn index_formula() {
        assert_eq!(month_index(ymd(2024, 1)), 2024 * 12);
        assert_eq!(month_index(ymd(2024, 12)), 2024 * 12 + 11);
        assert_eq!(index_to_date(2024 * 12 + 11), Some(ymd(2024, 12)));
    }

    #[test]
    fn shift_months_crosses_years() {
        assert_eq!(shift_months(ymd(2024, 1), -1), Some(ymd(2023, 12)));
        assert_eq!(shift_months(ymd(2024, 3), -12), Some(ymd(2023, 3)));
    }

    #[test]
    fn default_range_is_last_24_months_clamped() {
        let r = MonthRange::default_for(ymd(2020, 1), ymd(2024, 6));
        assert_eq!(r.end, month_index(ymd(2024, 6)));
        assert_eq!(r.start, month_index(ymd(2022, 7)));

        let short = MonthRange::default_for(ymd(2024, 1), ymd(2024, 6));
        assert_eq!(short.start, month_index(ymd(2024, 1)));
    }

    #[test]
    fn reversed_range_is_swapped() {
        let r = MonthRange::new(10, 3);
        assert_eq!((r.start, r.end), (3, 10));
    }

    #[test]
    fn year_marks_only_inside_bounds() {
        let marks = year_marks(ymd(2021, 5), ymd(2023, 2));
        let labels: Vec<_> = marks.iter().map(|m| m.label.as_str()).collect();
        assert_eq!(labels, vec!["2022", "2023"]);
    }

    #[test]
    fn label_format() {
        assert_eq!(month_label(2024 * 12).as_deref(), Some("Jan 2024"));
    }
}
