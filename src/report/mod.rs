//! Daily, weekly and monthly summaries over the stored per-day records.
//!
//! Reports only read. A day counts as tracked when a record exists for it,
//! so days the tracker was never opened are simply absent from the rows.

pub mod daily;
pub mod monthly;
pub mod weekly;

pub use daily::{daily_report, DailyReport};
pub use monthly::{monthly_report, MonthlyReport};
pub use weekly::{weekly_report, WeeklyReport};

use chrono::NaiveDate;
use serde::Serialize;

use crate::db::repository::{GrowthRepo, PreferencesRepo, PrayerRepo};
use crate::db::{DocumentStore, StoreResult};
use crate::engine::growth_scores;
use crate::models::{GrowthScores, PrayerStats, UserType};
use crate::utils::dates::date_key;

pub use crate::engine::average as get_average;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrayerDay {
    pub date: String,
    pub prayed: u8,
    pub jamat: u8,
    pub missed: u8,
    pub percentage: u8,
}

impl From<(String, PrayerStats)> for PrayerDay {
    fn from((date, stats): (String, PrayerStats)) -> Self {
        PrayerDay {
            date,
            prayed: stats.total_prayed,
            jamat: stats.total_jamat,
            missed: stats.total_missed,
            percentage: stats.percentage(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GrowthDay {
    pub date: String,
    pub user_type: UserType,
    #[serde(flatten)]
    pub scores: GrowthScores,
}

/// Role used for days whose growth record carries none.
pub(crate) fn fallback_user_type(store: &dyn DocumentStore, uid: &str) -> StoreResult<UserType> {
    Ok(PreferencesRepo::user_type(store, uid)?.unwrap_or_default())
}

pub(crate) fn load_prayer_day(store: &dyn DocumentStore, uid: &str, date: NaiveDate) -> StoreResult<Option<PrayerDay>> {
    let key = date_key(date);
    let day = PrayerRepo::load(store, uid, &key)?;
    Ok(day.map(|p| PrayerDay::from((key, p.stats()))))
}

pub(crate) fn load_growth_day(
    store: &dyn DocumentStore,
    uid: &str,
    date: NaiveDate,
    fallback: UserType,
) -> StoreResult<Option<GrowthDay>> {
    let key = date_key(date);
    let day = GrowthRepo::load(store, uid, &key, fallback)?;
    Ok(day.map(|g| GrowthDay {
        date: key,
        user_type: g.user_type,
        scores: growth_scores(&g),
    }))
}

/// Prayer and jamat totals over a run of days.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrayerTotals {
    pub total: u32,
    pub jamat: u32,
    pub missed: u32,
}

impl PrayerTotals {
    pub fn of(days: &[PrayerDay]) -> Self {
        days.iter().fold(PrayerTotals::default(), |acc, d| PrayerTotals {
            total: acc.total + d.prayed as u32,
            jamat: acc.jamat + d.jamat as u32,
            missed: acc.missed + d.missed as u32,
        })
    }
}

/// Average iman, life and overall scores over the days with growth records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GrowthAverages {
    pub iman: u8,
    pub life: u8,
    pub overall: u8,
}

impl GrowthAverages {
    pub fn of(days: &[GrowthDay]) -> Self {
        let collect = |f: fn(&GrowthScores) -> u8| days.iter().map(|d| f(&d.scores)).collect::<Vec<_>>();
        GrowthAverages {
            iman: get_average(&collect(|s| s.iman_score)),
            life: get_average(&collect(|s| s.life_score)),
            overall: get_average(&collect(|s| s.overall_score)),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::{growth, prayers, UID};
    use super::*;
    use crate::db::memory::MemoryStore;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    #[test]
    fn prayer_day_counts_from_record() {
        let store = MemoryStore::new();
        prayers(&store, d(4), 4, 2);
        let day = load_prayer_day(&store, UID, d(4)).unwrap().unwrap();
        assert_eq!((day.prayed, day.jamat, day.missed, day.percentage), (4, 2, 1, 80));
        assert!(load_prayer_day(&store, UID, d(5)).unwrap().is_none());
    }

    #[test]
    fn growth_day_falls_back_to_given_role() {
        let store = MemoryStore::new();
        growth(&store, d(4), None, &["quran"], &["deepWork", "sleep"]);
        let day = load_growth_day(&store, UID, d(4), UserType::Professional).unwrap().unwrap();
        assert_eq!(day.user_type, UserType::Professional);
        assert_eq!(day.scores.iman_score, 20);
        assert_eq!(day.scores.life_score, 40);
        assert_eq!(day.scores.overall_score, 30);
    }

    #[test]
    fn averages_of_nothing_are_zero() {
        assert_eq!(GrowthAverages::of(&[]), GrowthAverages::default());
        assert_eq!(PrayerTotals::of(&[]), PrayerTotals::default());
    }
}
