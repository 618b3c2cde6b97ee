pub mod contact;
pub mod growth;
pub mod prayer;
pub mod qaza;
pub mod settings;
pub mod task;

pub use contact::{Contact, ContactKind, Contacts};
pub use growth::{DailyGrowth, GrowthCategory, GrowthData, GrowthScores, UserType, IMAN_KEYS};
pub use prayer::{DailyPrayers, PrayerField, PrayerName, PrayerSlot, PrayerStats};
pub use qaza::{CompletedQaza, QazaSet};
pub use settings::{Notifications, Profile, UserSettings};
pub use task::{Task, TaskBucket, TaskLists, TaskSection};
