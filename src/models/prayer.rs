use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrayerName {
    Fajr,
    Dhuhr,
    Asr,
    Maghrib,
    Isha,
}

impl PrayerName {
    pub fn all() -> [PrayerName; 5] {
        [
            PrayerName::Fajr,
            PrayerName::Dhuhr,
            PrayerName::Asr,
            PrayerName::Maghrib,
            PrayerName::Isha,
        ]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PrayerName::Fajr => "Fajr",
            PrayerName::Dhuhr => "Dhuhr",
            PrayerName::Asr => "Asr",
            PrayerName::Maghrib => "Maghrib",
            PrayerName::Isha => "Isha",
        }
    }
}

impl std::fmt::Display for PrayerName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for PrayerName {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fajr" => Ok(PrayerName::Fajr),
            "dhuhr" | "zuhr" | "dhuhur" => Ok(PrayerName::Dhuhr),
            "asr" => Ok(PrayerName::Asr),
            "maghrib" => Ok(PrayerName::Maghrib),
            "isha" => Ok(PrayerName::Isha),
            _ => Err(anyhow::anyhow!("Unknown prayer: {}", s)),
        }
    }
}

/// Which half of a prayer slot a toggle targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrayerField {
    Prayed,
    Jamat,
}

/// Outcome of one prayer on one day. `jamat` implies `prayed`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrayerSlot {
    #[serde(default)]
    pub prayed: bool,
    #[serde(default)]
    pub jamat: bool,
}

/// The five slots of a single day, stored under `dailyPrayers/{date}.prayers`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DailyPrayers {
    pub fajr: PrayerSlot,
    pub dhuhr: PrayerSlot,
    pub asr: PrayerSlot,
    pub maghrib: PrayerSlot,
    pub isha: PrayerSlot,
}

impl DailyPrayers {
    pub fn slot(&self, name: PrayerName) -> &PrayerSlot {
        match name {
            PrayerName::Fajr => &self.fajr,
            PrayerName::Dhuhr => &self.dhuhr,
            PrayerName::Asr => &self.asr,
            PrayerName::Maghrib => &self.maghrib,
            PrayerName::Isha => &self.isha,
        }
    }

    pub fn slot_mut(&mut self, name: PrayerName) -> &mut PrayerSlot {
        match name {
            PrayerName::Fajr => &mut self.fajr,
            PrayerName::Dhuhr => &mut self.dhuhr,
            PrayerName::Asr => &mut self.asr,
            PrayerName::Maghrib => &mut self.maghrib,
            PrayerName::Isha => &mut self.isha,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (PrayerName, &PrayerSlot)> {
        PrayerName::all().into_iter().map(move |n| (n, self.slot(n)))
    }

    pub fn stats(&self) -> PrayerStats {
        PrayerStats::from(self)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrayerStats {
    pub total_prayed: u8,
    pub total_jamat: u8,
    pub total_missed: u8,
}

impl PrayerStats {
    /// Share of the five prayers that were prayed.
    pub fn percentage(&self) -> u8 {
        self.total_prayed * 20
    }
}

impl From<&DailyPrayers> for PrayerStats {
    fn from(day: &DailyPrayers) -> Self {
        let total_prayed = day.iter().filter(|(_, s)| s.prayed).count() as u8;
        let total_jamat = day.iter().filter(|(_, s)| s.jamat).count() as u8;
        PrayerStats {
            total_prayed,
            total_jamat,
            total_missed: 5 - total_prayed,
        }
    }
}
