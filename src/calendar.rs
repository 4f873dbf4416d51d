//! Day-of-year accounting.

use chrono::{Datelike, NaiveDate};

/// Returns true for proleptic Gregorian leap years.
pub fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Returns 366 for leap years and 365 otherwise.
pub fn days_in_year(year: i32) -> u32 {
    if is_leap_year(year) { 366 } else { 365 }
}

/// Progress through the year of a reference date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearProgress {
    pub year: i32,
    /// 1-based ordinal, Jan 1 = 1.
    pub day_of_year: u32,
    pub days_in_year: u32,
}

impl YearProgress {
    pub fn for_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            day_of_year: date.ordinal(),
            days_in_year: days_in_year(date.year()),
        }
    }

    /// Days strictly before the reference date.
    pub fn days_passed(&self) -> u32 {
        self.day_of_year - 1
    }

    /// Days strictly after the reference date.
    pub fn days_left(&self) -> u32 {
        self.days_in_year - self.day_of_year
    }

    /// `round(day_of_year / days_in_year * 100)`, half rounding away from zero.
    pub fn percent_complete(&self) -> u32 {
        (self.day_of_year as f64 / self.days_in_year as f64 * 100.0).round() as u32
    }

    /// Footer caption, e.g. `"333 days • 9% Complete"`.
    pub fn caption(&self) -> String {
        format!(
            "{} days \u{2022} {}% Complete",
            self.days_left(),
            self.percent_complete()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn leap_year_rule() {
        assert!(is_leap_year(2024));
        assert!(!is_leap_year(2026));
        assert!(!is_leap_year(1900));
        assert!(is_leap_year(2000));
        assert_eq!(days_in_year(2024), 366);
        assert_eq!(days_in_year(2026), 365);

        for year in 1582..2500 {
            assert_eq!(
                is_leap_year(year),
                NaiveDate::from_ymd_opt(year, 2, 29).is_some(),
                "leap rule disagrees with the calendar for {year}"
            );
        }
    }

    #[test]
    fn day_of_year_boundaries() {
        assert_eq!(YearProgress::for_date(date(2026, 1, 1)).day_of_year, 1);
        assert_eq!(YearProgress::for_date(date(2026, 12, 31)).day_of_year, 365);
        assert_eq!(YearProgress::for_date(date(2024, 12, 31)).day_of_year, 366);
        assert_eq!(YearProgress::for_date(date(2024, 2, 29)).day_of_year, 60);
    }

    #[test]
    fn passed_today_and_left_sum_to_year_length() {
        for year in [2023, 2024, 2026, 2100] {
            let mut d = date(year, 1, 1);
            while d.year() == year {
                let p = YearProgress::for_date(d);
                assert_eq!(p.days_passed() + 1 + p.days_left(), p.days_in_year, "{d}");
                d = d.succ_opt().unwrap();
            }
        }
    }

    #[test]
    fn caption_for_february_first() {
        let p = YearProgress::for_date(date(2026, 2, 1));
        assert_eq!(p.day_of_year, 32);
        assert_eq!(p.days_left(), 333);
        assert_eq!(p.percent_complete(), 9);
        assert_eq!(p.caption(), "333 days • 9% Complete");
    }

    #[test]
    fn caption_at_year_end() {
        let p = YearProgress::for_date(date(2024, 12, 31));
        assert_eq!(p.caption(), "0 days • 100% Complete");
        let p = YearProgress::for_date(date(2026, 1, 1));
        assert_eq!(p.percent_complete(), 0);
    }
}
