use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::models::PrayerName;

/// Prayers from the source day that are still owed.
///
/// `missed` carries one entry per prayer the source day recorded; `true` means
/// still outstanding. Names completed as qaza are removed entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QazaSet {
    pub source_date: Option<String>,
    pub missed: BTreeMap<PrayerName, bool>,
}

impl QazaSet {
    pub fn is_outstanding(&self, name: PrayerName) -> bool {
        self.missed.get(&name).copied().unwrap_or(false)
    }

    pub fn outstanding(&self) -> impl Iterator<Item = PrayerName> + '_ {
        self.missed
            .iter()
            .filter(|(_, missed)| **missed)
            .map(|(name, _)| *name)
    }

    pub fn total(&self) -> usize {
        self.outstanding().count()
    }

    /// Marks an outstanding prayer as made up. Returns false when there was
    /// nothing to make up for that prayer.
    pub fn pray(&mut self, name: PrayerName) -> bool {
        if self.source_date.is_none() || !self.is_outstanding(name) {
            return false;
        }
        self.missed.insert(name, false);
        true
    }

    /// The completion record to persist under the source date.
    pub fn completion_record(&self) -> CompletedQaza {
        CompletedQaza {
            completed: PrayerName::all()
                .into_iter()
                .filter(|n| !self.is_outstanding(*n))
                .collect(),
        }
    }
}

/// Prayers of one source day that no longer count as owed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletedQaza {
    pub completed: BTreeSet<PrayerName>,
}

impl CompletedQaza {
    /// Stored flags use `false` for "completed" and `true` for "still owed".
    pub fn from_flags(flags: &BTreeMap<String, bool>) -> Self {
        let completed = flags
            .iter()
            .filter(|(_, owed)| !**owed)
            .filter_map(|(name, _)| name.parse::<PrayerName>().ok())
            .collect();
        CompletedQaza { completed }
    }

    pub fn to_flags(&self) -> BTreeMap<PrayerName, bool> {
        PrayerName::all()
            .into_iter()
            .map(|n| (n, !self.completed.contains(&n)))
            .collect()
    }

    pub fn contains(&self, name: PrayerName) -> bool {
        self.completed.contains(&name)
    }
}
