use serde::Serialize;

use super::{fallback_user_type, load_growth_day, load_prayer_day, GrowthAverages, GrowthDay, PrayerDay, PrayerTotals};
use crate::db::{DocumentStore, StoreResult};
use crate::engine::percent;
use crate::utils::dates::month_days;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySummary {
    pub total_days: u32,
    /// Days with a growth record.
    pub tracked_days: u32,
    pub prayers: PrayerTotals,
    /// Share of the five daily prayers prayed, over days with a prayer record.
    pub prayer_average: u8,
    pub growth: GrowthAverages,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyReport {
    pub year: i32,
    pub month: u32,
    pub summary: MonthlySummary,
    pub prayers: Vec<PrayerDay>,
    pub growth: Vec<GrowthDay>,
    pub insights: Vec<String>,
}

impl MonthlyReport {
    pub fn has_data(&self) -> bool {
        !self.prayers.is_empty() || !self.growth.is_empty()
    }
}

pub fn monthly_report(store: &dyn DocumentStore, uid: &str, year: i32, month: u32) -> anyhow::Result<MonthlyReport> {
    let days = month_days(year, month)?;
    Ok(collect(store, uid, year, month, &days)?)
}

fn collect(
    store: &dyn DocumentStore,
    uid: &str,
    year: i32,
    month: u32,
    days: &[chrono::NaiveDate],
) -> StoreResult<MonthlyReport> {
    let fallback = fallback_user_type(store, uid)?;
    let mut prayers = Vec::new();
    let mut growth = Vec::new();
    for day in days {
        prayers.extend(load_prayer_day(store, uid, *day)?);
        growth.extend(load_growth_day(store, uid, *day, fallback)?);
    }

    let totals = PrayerTotals::of(&prayers);
    let summary = MonthlySummary {
        total_days: days.len() as u32,
        tracked_days: growth.len() as u32,
        prayers: totals,
        prayer_average: percent(totals.total, prayers.len() as u32 * 5),
        growth: GrowthAverages::of(&growth),
    };
    let insights = monthly_insights(&summary, !prayers.is_empty(), !growth.is_empty());

    Ok(MonthlyReport {
        year,
        month,
        summary,
        prayers,
        growth,
        insights,
    })
}

fn monthly_insights(summary: &MonthlySummary, has_prayers: bool, has_growth: bool) -> Vec<String> {
    let mut insights: Vec<&str> = Vec::new();

    if has_prayers {
        insights.push(match summary.prayer_average {
            90.. => "Excellent prayer consistency! Keep up the great work.",
            70.. => "Good prayer habits. Try to improve consistency for even better results.",
            _ => "Focus on improving prayer consistency. Set reminders to help maintain regular prayers.",
        });
        match percent(summary.prayers.jamat, summary.prayers.total) {
            70.. => insights.push("Great job maintaining Jamat prayers!"),
            40.. => insights.push("Try to increase Jamat prayer participation when possible."),
            _ => {}
        }
    }

    if has_growth {
        let g = &summary.growth;
        insights.push(match g.overall {
            80.. => "Outstanding personal growth! You're maintaining excellent habits.",
            60.. => "Good progress on personal development. Keep building these positive habits.",
            _ => "Focus on building consistent daily habits for better personal growth.",
        });
        if g.iman > g.life {
            insights.push("Your spiritual practices are strong. Consider balancing with life skills development.");
        } else if g.life > g.iman {
            insights.push("Great life management! Consider strengthening spiritual practices for balance.");
        }
    }

    if percent(summary.tracked_days, summary.total_days) < 70 {
        insights.push("Try to track your progress more consistently for better insights and motivation.");
    }

    insights.into_iter().map(str::to_string).collect()
}
