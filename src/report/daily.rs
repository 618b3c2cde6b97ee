use chrono::NaiveDate;
use serde::Serialize;

use super::{fallback_user_type, load_growth_day, load_prayer_day, GrowthDay, PrayerDay};
use crate::db::{DocumentStore, StoreResult};
use crate::utils::dates::date_key;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyReport {
    pub date: String,
    pub prayers: Option<PrayerDay>,
    pub growth: Option<GrowthDay>,
    pub insights: Vec<String>,
}

impl DailyReport {
    pub fn has_data(&self) -> bool {
        self.prayers.is_some() || self.growth.is_some()
    }
}

pub fn daily_report(store: &dyn DocumentStore, uid: &str, date: NaiveDate) -> StoreResult<DailyReport> {
    let fallback = fallback_user_type(store, uid)?;
    let prayers = load_prayer_day(store, uid, date)?;
    let growth = load_growth_day(store, uid, date, fallback)?;
    let insights = daily_insights(prayers.as_ref(), growth.as_ref());
    Ok(DailyReport {
        date: date_key(date),
        prayers,
        growth,
        insights,
    })
}

fn daily_insights(prayers: Option<&PrayerDay>, growth: Option<&GrowthDay>) -> Vec<String> {
    let mut insights = Vec::new();
    if let Some(p) = prayers {
        insights.push(
            match p.percentage {
                100.. => "MashaAllah! Every prayer was prayed today.",
                80.. => "Good! Most of today's prayers were prayed.",
                _ => "Try to pray more of them tomorrow.",
            }
            .to_string(),
        );
    }
    if let Some(g) = growth {
        insights.push(
            match g.scores.overall_score {
                80.. => "Excellent growth today.",
                60.. => "Good progress, with room to grow.",
                _ => "Aim a little higher tomorrow.",
            }
            .to_string(),
        );
    }
    insights
}
