use chrono::NaiveDate;
use serde::Serialize;

use super::{fallback_user_type, load_growth_day, load_prayer_day, GrowthAverages, GrowthDay, PrayerDay, PrayerTotals};
use crate::db::{DocumentStore, StoreResult};
use crate::utils::dates::{date_key, week_range};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyReport {
    pub start: String,
    pub end: String,
    pub prayers: Vec<PrayerDay>,
    pub growth: Vec<GrowthDay>,
    pub totals: PrayerTotals,
    pub averages: GrowthAverages,
    /// Days with a prayer or a growth record.
    pub tracked_days: u32,
}

/// The Sunday to Saturday week containing `date`.
pub fn weekly_report(store: &dyn DocumentStore, uid: &str, date: NaiveDate) -> StoreResult<WeeklyReport> {
    let (start, end) = week_range(date);
    let fallback = fallback_user_type(store, uid)?;

    let mut prayers = Vec::new();
    let mut growth = Vec::new();
    let mut tracked_days = 0;
    for day in start.iter_days().take_while(|d| *d <= end) {
        let p = load_prayer_day(store, uid, day)?;
        let g = load_growth_day(store, uid, day, fallback)?;
        if p.is_some() || g.is_some() {
            tracked_days += 1;
        }
        prayers.extend(p);
        growth.extend(g);
    }

    Ok(WeeklyReport {
        start: date_key(start),
        end: date_key(end),
        totals: PrayerTotals::of(&prayers),
        averages: GrowthAverages::of(&growth),
        prayers,
        growth,
        tracked_days,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::MemoryStore;
    use crate::report::fixtures::{growth, prayers, UID};

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    #[test]
    fn week_runs_sunday_to_saturday() {
        let store = MemoryStore::new();
        // 2024-03-09 is a Saturday, 03-10 the next Sunday
        prayers(&store, d(2), 5, 5);
        prayers(&store, d(3), 3, 1);
        prayers(&store, d(9), 2, 0);
        prayers(&store, d(10), 5, 5);

        let report = weekly_report(&store, UID, d(6)).unwrap();
        assert_eq!(report.start, "2024-03-03");
        assert_eq!(report.end, "2024-03-09");
        assert_eq!(report.prayers.len(), 2);
        assert_eq!(report.totals, PrayerTotals { total: 5, jamat: 1, missed: 5 });
        assert_eq!(report.tracked_days, 2);
    }

    #[test]
    fn tracked_days_count_either_record_once() {
        let store = MemoryStore::new();
        prayers(&store, d(4), 5, 0);
        growth(&store, d(4), Some("student"), &["quran"], &[]);
        growth(&store, d(5), Some("student"), &["quran", "prayer", "istigfar"], &["sleep"]);

        let report = weekly_report(&store, UID, d(4)).unwrap();
        assert_eq!(report.tracked_days, 2);
        assert_eq!(report.growth.len(), 2);
        // iman 20 and 60, life 0 and 20
        assert_eq!(report.averages.iman, 40);
        assert_eq!(report.averages.life, 10);
        // overall 10 and 40
        assert_eq!(report.averages.overall, 25);
    }
}
