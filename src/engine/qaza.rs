use crate::models::{CompletedQaza, DailyPrayers, QazaSet};

/// Prayers owed from `source_date`, normally yesterday.
///
/// With no record for the source day nothing is owed. Otherwise every prayer
/// not prayed that day is owed, except those already made up.
pub fn compute_prayer_qaza(
    source_date: &str,
    source_day: Option<&DailyPrayers>,
    completed: Option<&CompletedQaza>,
) -> QazaSet {
    let Some(day) = source_day else {
        return QazaSet::default();
    };

    let mut missed: std::collections::BTreeMap<_, _> =
        day.iter().map(|(name, slot)| (name, !slot.prayed)).collect();

    if let Some(done) = completed {
        missed.retain(|name, _| !done.contains(*name));
    }

    QazaSet {
        source_date: Some(source_date.to_string()),
        missed,
    }
}
