use serde::{Deserialize, Serialize};

use crate::models::UserType;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Profile {
    pub name: String,
    pub email: String,
    pub user_type: UserType,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notifications {
    #[serde(default = "default_true")]
    pub prayer: bool,
    #[serde(default = "default_true")]
    pub tasks: bool,
    #[serde(default)]
    pub growth: bool,
}

impl Default for Notifications {
    fn default() -> Self {
        Self {
            prayer: true,
            tasks: true,
            growth: false,
        }
    }
}

/// Per-user settings stored under `userSettings/{uid}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    pub profile: Profile,
    pub notifications: Notifications,
}
