use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

pub const IMAN_KEYS: &[&str] = &["istigfar", "prayer", "quran", "islamicLecture", "protection"];

const STUDENT_KEYS: &[&str] = &["deepStudy", "careerDev", "family", "exercise", "sleep"];
const PROFESSIONAL_KEYS: &[&str] = &["deepWork", "professionalDev", "family", "exercise", "sleep"];
const HOMEMAKER_KEYS: &[&str] = &["hobby", "journaling", "selfCare", "communication", "sleep"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    #[default]
    Student,
    Professional,
    Homemaker,
}

impl UserType {
    pub fn all() -> [UserType; 3] {
        [UserType::Student, UserType::Professional, UserType::Homemaker]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Student => "student",
            UserType::Professional => "professional",
            UserType::Homemaker => "homemaker",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            UserType::Student => "Student",
            UserType::Professional => "Professional",
            UserType::Homemaker => "Homemaker",
        }
    }

    /// Life checklist keys for this role.
    pub fn life_keys(&self) -> &'static [&'static str] {
        match self {
            UserType::Student => STUDENT_KEYS,
            UserType::Professional => PROFESSIONAL_KEYS,
            UserType::Homemaker => HOMEMAKER_KEYS,
        }
    }
}

impl FromStr for UserType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "student" => Ok(UserType::Student),
            "professional" => Ok(UserType::Professional),
            "homemaker" => Ok(UserType::Homemaker),
            _ => Err(anyhow!("Unknown user type: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrowthCategory {
    Iman,
    Life,
}

impl FromStr for GrowthCategory {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "iman" => Ok(GrowthCategory::Iman),
            "life" => Ok(GrowthCategory::Life),
            _ => Err(anyhow!("Unknown checklist: {} (use iman or life)", s)),
        }
    }
}

/// Checklist state stored under `dailyGrowth/{date}.growthData`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrowthData {
    pub iman: BTreeMap<String, bool>,
    pub life: BTreeMap<String, bool>,
}

impl GrowthData {
    /// A blank day: every iman item and every life item of `user_type` unchecked.
    pub fn fresh(user_type: UserType) -> Self {
        let mut data = GrowthData {
            iman: IMAN_KEYS.iter().map(|k| (k.to_string(), false)).collect(),
            life: BTreeMap::new(),
        };
        data.align_life(user_type);
        data
    }

    /// Rebuilds `life` for `user_type`, keeping values of keys both roles share.
    pub fn align_life(&mut self, user_type: UserType) {
        self.life = user_type
            .life_keys()
            .iter()
            .map(|k| (k.to_string(), self.life.get(*k).copied().unwrap_or(false)))
            .collect();
    }

    pub fn is_checked(&self, category: GrowthCategory, key: &str) -> bool {
        let map = match category {
            GrowthCategory::Iman => &self.iman,
            GrowthCategory::Life => &self.life,
        };
        map.get(key).copied().unwrap_or(false)
    }

    pub fn toggle(&mut self, category: GrowthCategory, key: &str, user_type: UserType) -> Result<bool> {
        let (allowed, map) = match category {
            GrowthCategory::Iman => (IMAN_KEYS, &mut self.iman),
            GrowthCategory::Life => (user_type.life_keys(), &mut self.life),
        };
        if !allowed.contains(&key) {
            return Err(anyhow!("'{}' is not on the {} checklist", key, category_name(category)));
        }
        let entry = map.entry(key.to_string()).or_insert(false);
        *entry = !*entry;
        Ok(*entry)
    }
}

fn category_name(category: GrowthCategory) -> &'static str {
    match category {
        GrowthCategory::Iman => "iman",
        GrowthCategory::Life => "life",
    }
}

/// One day of the growth tracker: the role it was scored under plus its checklists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DailyGrowth {
    pub user_type: UserType,
    pub data: GrowthData,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrowthScores {
    pub iman_score: u8,
    pub life_score: u8,
    pub overall_score: u8,
}
