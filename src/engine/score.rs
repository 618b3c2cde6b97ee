use std::collections::BTreeMap;

use crate::models::{DailyGrowth, GrowthScores, IMAN_KEYS};

/// `numerator / denominator` as a whole number, halves rounded up.
fn div_round(numerator: u32, denominator: u32) -> u32 {
    (2 * numerator + denominator) / (2 * denominator)
}

/// Percentage of `required` keys checked in `checklist`, 0 when nothing is required.
pub fn compute_score(checklist: &BTreeMap<String, bool>, required: &[&str]) -> u8 {
    if required.is_empty() {
        return 0;
    }
    let done = required
        .iter()
        .filter(|k| checklist.get(**k).copied().unwrap_or(false))
        .count() as u32;
    div_round(100 * done, required.len() as u32) as u8
}

pub fn growth_scores(day: &DailyGrowth) -> GrowthScores {
    let iman_score = compute_score(&day.data.iman, IMAN_KEYS);
    let life_score = compute_score(&day.data.life, day.user_type.life_keys());
    GrowthScores {
        iman_score,
        life_score,
        overall_score: div_round(iman_score as u32 + life_score as u32, 2) as u8,
    }
}

/// Rounded mean, 0 for an empty slice.
pub fn average(values: &[u8]) -> u8 {
    if values.is_empty() {
        return 0;
    }
    let sum: u32 = values.iter().map(|v| *v as u32).sum();
    div_round(sum, values.len() as u32) as u8
}

/// Rounded percentage of `part` in `whole`, 0 when `whole` is 0.
pub fn percent(part: u32, whole: u32) -> u8 {
    if whole == 0 {
        return 0;
    }
    div_round(100 * part, whole).min(u8::MAX as u32) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GrowthCategory, GrowthData, UserType};

    fn checklist(pairs: &[(&str, bool)]) -> BTreeMap<String, bool> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    const KEYS: &[&str] = &["a", "b", "c", "d", "e"];

    #[test]
    fn three_of_five_is_sixty() {
        let c = checklist(&[("a", true), ("b", true), ("c", true), ("d", false)]);
        assert_eq!(compute_score(&c, KEYS), 60);
    }

    #[test]
    fn bounds() {
        let none = checklist(&[]);
        let all = checklist(&KEYS.iter().map(|k| (*k, true)).collect::<Vec<_>>());
        assert_eq!(compute_score(&none, KEYS), 0);
        assert_eq!(compute_score(&all, KEYS), 100);
        assert_eq!(compute_score(&all, &[]), 0);
    }

    #[test]
    fn keys_outside_the_required_set_do_not_count() {
        let c = checklist(&[("a", true), ("zzz", true)]);
        assert_eq!(compute_score(&c, KEYS), 20);
    }

    #[test]
    fn score_never_drops_when_an_item_is_checked() {
        let keys = &["a", "b", "c"];
        let mut c = checklist(&[]);
        let mut last = compute_score(&c, keys);
        for k in keys {
            c.insert(k.to_string(), true);
            let next = compute_score(&c, keys);
            assert!(next >= last);
            last = next;
        }
        assert_eq!(last, 100);
    }

    #[test]
    fn rounds_half_up() {
        assert_eq!(compute_score(&checklist(&[("a", true)]), &["a", "b", "c"]), 33);
        assert_eq!(compute_score(&checklist(&[("a", true), ("b", true)]), &["a", "b", "c"]), 67);
        assert_eq!(average(&[60, 41]), 51);
        assert_eq!(average(&[]), 0);
        assert_eq!(percent(1, 8), 13);
        assert_eq!(percent(3, 0), 0);
    }

    #[test]
    fn overall_is_mean_of_iman_and_life() {
        let mut data = GrowthData::fresh(UserType::Student);
        for k in ["istigfar", "prayer", "quran"] {
            data.toggle(GrowthCategory::Iman, k, UserType::Student).unwrap();
        }
        data.toggle(GrowthCategory::Life, "sleep", UserType::Student).unwrap();
        let scores = growth_scores(&DailyGrowth {
            user_type: UserType::Student,
            data,
        });
        assert_eq!(scores.iman_score, 60);
        assert_eq!(scores.life_score, 20);
        assert_eq!(scores.overall_score, 40);
    }
}
