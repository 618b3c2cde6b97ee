use anyhow::{anyhow, Result};
use chrono::{Datelike, Duration, NaiveDate};

/// `YYYY-MM-DD`, zero padded. Used as the key of every per-day document.
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn parse_date_key(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| anyhow!("Bad date '{}': {}", s, e))
}

/// The calendar day before `date`.
pub fn previous_day(date: NaiveDate) -> NaiveDate {
    date.pred_opt().unwrap_or(date)
}

/// Sunday..=Saturday week containing `date`.
pub fn week_range(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let offset = date.weekday().num_days_from_sunday() as i64;
    let start = date - Duration::days(offset);
    (start, start + Duration::days(6))
}

/// Every day of a month, in order. `month` is 1-based.
pub fn month_days(year: i32, month: u32) -> Result<Vec<NaiveDate>> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| anyhow!("Bad month {}-{:02}", year, month))?;
    Ok(first
        .iter_days()
        .take_while(|d| d.month() == month)
        .collect())
}

/// Parse `YYYY-MM` into (year, month).
pub fn parse_month(s: &str) -> Result<(i32, u32)> {
    let date = NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d")
        .map_err(|_| anyhow!("Bad month '{}', expected YYYY-MM", s))?;
    Ok((date.year(), date.month()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn keys_are_zero_padded() {
        assert_eq!(date_key(d(2024, 3, 5)), "2024-03-05");
        assert_eq!(parse_date_key("2024-03-05").unwrap(), d(2024, 3, 5));
        assert!(parse_date_key("5/3/2024").is_err());
    }

    #[test]
    fn previous_day_crosses_month_and_year() {
        assert_eq!(previous_day(d(2024, 3, 1)), d(2024, 2, 29));
        assert_eq!(previous_day(d(2025, 1, 1)), d(2024, 12, 31));
    }

    #[test]
    fn week_starts_on_sunday() {
        // 2024-03-13 is a Wednesday
        let (start, end) = week_range(d(2024, 3, 13));
        assert_eq!(start, d(2024, 3, 10));
        assert_eq!(end, d(2024, 3, 16));
        assert_eq!(week_range(d(2024, 3, 10)).0, d(2024, 3, 10));
    }

    #[test]
    fn month_days_handles_leap_february() {
        assert_eq!(month_days(2024, 2).unwrap().len(), 29);
        assert_eq!(month_days(2023, 2).unwrap().len(), 28);
        assert!(month_days(2024, 13).is_err());
        assert_eq!(parse_month("2024-11").unwrap(), (2024, 11));
    }
}
