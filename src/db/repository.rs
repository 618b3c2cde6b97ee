use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::db::{field, DocPath, Document, DocumentStore, SetOptions, StoreResult};
use crate::models::{
    CompletedQaza, Contacts, DailyGrowth, DailyPrayers, GrowthData, Notifications, Profile,
    TaskLists, UserSettings, UserType,
};

fn to_value<T: Serialize>(value: &T) -> StoreResult<Value> {
    Ok(serde_json::to_value(value)?)
}

/// Reads a document, treating wiped documents as absent.
pub(crate) fn read(store: &dyn DocumentStore, path: &DocPath) -> StoreResult<Option<Document>> {
    let doc = store.get(path)?;
    Ok(doc.filter(|d| d.get("deleted").and_then(Value::as_bool) != Some(true)))
}

fn with_timestamp(store: &dyn DocumentStore, mut doc: Document) -> Document {
    doc.insert("lastUpdated".to_string(), store.server_timestamp());
    doc
}

// ─── Prayers ────────────────────────────────────────────────────────────────

pub struct PrayerRepo;

impl PrayerRepo {
    pub fn load(store: &dyn DocumentStore, uid: &str, date: &str) -> StoreResult<Option<DailyPrayers>> {
        let doc = read(store, &DocPath::daily_prayers(uid, date))?;
        Ok(doc.and_then(|d| field::<DailyPrayers>(&d, "prayers")))
    }

    pub fn document(store: &dyn DocumentStore, date: &str, prayers: &DailyPrayers) -> StoreResult<Document> {
        let mut doc = Document::new();
        doc.insert("prayers".to_string(), to_value(prayers)?);
        doc.insert("date".to_string(), Value::String(date.to_string()));
        Ok(with_timestamp(store, doc))
    }

    pub fn save(store: &dyn DocumentStore, uid: &str, date: &str, prayers: &DailyPrayers) -> StoreResult<()> {
        let doc = Self::document(store, date, prayers)?;
        store.set(&DocPath::daily_prayers(uid, date), doc, SetOptions::overwrite())
    }
}

// ─── Qaza ───────────────────────────────────────────────────────────────────

pub struct QazaRepo;

impl QazaRepo {
    pub fn load_completed(
        store: &dyn DocumentStore,
        uid: &str,
        source_date: &str,
    ) -> StoreResult<Option<CompletedQaza>> {
        let doc = read(store, &DocPath::completed_qaza(uid, source_date))?;
        Ok(doc
            .and_then(|d| field::<BTreeMap<String, bool>>(&d, "completedPrayers"))
            .map(|flags| CompletedQaza::from_flags(&flags)))
    }

    /// Stored under the day the prayers were missed, not the day they were made up.
    pub fn save_completed(
        store: &dyn DocumentStore,
        uid: &str,
        source_date: &str,
        completed: &CompletedQaza,
    ) -> StoreResult<()> {
        let mut doc = Document::new();
        doc.insert("completedPrayers".to_string(), to_value(&completed.to_flags())?);
        doc.insert("date".to_string(), Value::String(source_date.to_string()));
        let doc = with_timestamp(store, doc);
        store.set(&DocPath::completed_qaza(uid, source_date), doc, SetOptions::overwrite())
    }
}

// ─── Growth ─────────────────────────────────────────────────────────────────

pub struct GrowthRepo;

impl GrowthRepo {
    /// The day's record; its own `userType` wins over `fallback`.
    pub fn load(
        store: &dyn DocumentStore,
        uid: &str,
        date: &str,
        fallback: UserType,
    ) -> StoreResult<Option<DailyGrowth>> {
        let Some(doc) = read(store, &DocPath::daily_growth(uid, date))? else {
            return Ok(None);
        };
        let Some(data) = field::<GrowthData>(&doc, "growthData") else {
            return Ok(None);
        };
        let user_type = field::<UserType>(&doc, "userType").unwrap_or(fallback);
        Ok(Some(DailyGrowth { user_type, data }))
    }

    pub fn document(store: &dyn DocumentStore, date: &str, day: &DailyGrowth) -> StoreResult<Document> {
        let mut doc = Document::new();
        doc.insert("growthData".to_string(), to_value(&day.data)?);
        doc.insert("userType".to_string(), to_value(&day.user_type)?);
        doc.insert("date".to_string(), Value::String(date.to_string()));
        Ok(with_timestamp(store, doc))
    }

    /// Saves the day and remembers its role as the user's preference.
    pub fn save(store: &dyn DocumentStore, uid: &str, date: &str, day: &DailyGrowth) -> StoreResult<()> {
        let doc = Self::document(store, date, day)?;
        store.set(&DocPath::daily_growth(uid, date), doc, SetOptions::overwrite())?;
        PreferencesRepo::save_user_type(store, uid, day.user_type)
    }
}

pub struct PreferencesRepo;

impl PreferencesRepo {
    pub fn user_type(store: &dyn DocumentStore, uid: &str) -> StoreResult<Option<UserType>> {
        let doc = read(store, &DocPath::preferences(uid))?;
        Ok(doc.and_then(|d| field::<UserType>(&d, "userType")))
    }

    pub fn save_user_type(store: &dyn DocumentStore, uid: &str, user_type: UserType) -> StoreResult<()> {
        let mut doc = Document::new();
        doc.insert("userType".to_string(), to_value(&user_type)?);
        let doc = with_timestamp(store, doc);
        store.set(&DocPath::preferences(uid), doc, SetOptions::merge())
    }
}

// ─── Tasks ──────────────────────────────────────────────────────────────────

pub struct TaskRepo;

impl TaskRepo {
    /// Persisted (today, missed) buckets, exactly as last written.
    pub fn load(store: &dyn DocumentStore, uid: &str) -> StoreResult<Option<(TaskLists, TaskLists)>> {
        let doc = read(store, &DocPath::tasks(uid))?;
        Ok(doc.map(|d| {
            (
                field::<TaskLists>(&d, "todayTasks").unwrap_or_default(),
                field::<TaskLists>(&d, "missedTasks").unwrap_or_default(),
            )
        }))
    }

    pub fn document(
        store: &dyn DocumentStore,
        today_key: &str,
        today: &TaskLists,
        missed: &TaskLists,
    ) -> StoreResult<Document> {
        let mut doc = Document::new();
        doc.insert("todayTasks".to_string(), to_value(today)?);
        doc.insert("missedTasks".to_string(), to_value(missed)?);
        doc.insert("dateUpdated".to_string(), Value::String(today_key.to_string()));
        Ok(with_timestamp(store, doc))
    }

    pub fn save(
        store: &dyn DocumentStore,
        uid: &str,
        today_key: &str,
        today: &TaskLists,
        missed: &TaskLists,
    ) -> StoreResult<()> {
        let doc = Self::document(store, today_key, today, missed)?;
        store.set(&DocPath::tasks(uid), doc, SetOptions::overwrite())
    }
}

// ─── Contacts ───────────────────────────────────────────────────────────────

pub struct ContactRepo;

impl ContactRepo {
    pub fn load(store: &dyn DocumentStore, uid: &str) -> StoreResult<Option<Contacts>> {
        let doc = read(store, &DocPath::contacts(uid))?;
        Ok(doc.and_then(|d| field::<Contacts>(&d, "contacts")))
    }

    pub fn document(store: &dyn DocumentStore, contacts: &Contacts) -> StoreResult<Document> {
        let mut doc = Document::new();
        doc.insert("contacts".to_string(), to_value(contacts)?);
        Ok(with_timestamp(store, doc))
    }

    pub fn save(store: &dyn DocumentStore, uid: &str, contacts: &Contacts) -> StoreResult<()> {
        let doc = Self::document(store, contacts)?;
        store.set(&DocPath::contacts(uid), doc, SetOptions::overwrite())
    }
}

// ─── Settings ───────────────────────────────────────────────────────────────

pub struct SettingsRepo;

impl SettingsRepo {
    pub fn load(store: &dyn DocumentStore, uid: &str) -> StoreResult<Option<UserSettings>> {
        let doc = read(store, &DocPath::settings(uid))?;
        Ok(doc.map(|d| UserSettings {
            profile: field::<Profile>(&d, "profile").unwrap_or_default(),
            notifications: field::<Notifications>(&d, "notifications").unwrap_or_default(),
        }))
    }

    /// Loads settings, writing `initial` first when the user has none yet.
    pub fn load_or_init(store: &dyn DocumentStore, uid: &str, initial: Profile) -> StoreResult<UserSettings> {
        if let Some(settings) = Self::load(store, uid)? {
            return Ok(settings);
        }
        let settings = UserSettings {
            profile: initial,
            notifications: Notifications::default(),
        };
        Self::save(store, uid, &settings)?;
        Ok(settings)
    }

    pub fn document(store: &dyn DocumentStore, settings: &UserSettings) -> StoreResult<Document> {
        let mut doc = Document::new();
        doc.insert("profile".to_string(), to_value(&settings.profile)?);
        doc.insert("notifications".to_string(), to_value(&settings.notifications)?);
        Ok(with_timestamp(store, doc))
    }

    pub fn save(store: &dyn DocumentStore, uid: &str, settings: &UserSettings) -> StoreResult<()> {
        let doc = Self::document(store, settings)?;
        store.set(&DocPath::settings(uid), doc, SetOptions::overwrite())
    }
}

// ─── Account wipe ───────────────────────────────────────────────────────────

/// Marks every top-level document of the user as deleted. Per-day records
/// below `userPrayers`/`userGrowth` are left in place, only their parents are
/// flagged. Returns how many documents were flagged.
pub fn wipe_user(store: &dyn DocumentStore, uid: &str) -> StoreResult<usize> {
    let paths = [
        DocPath::tasks(uid),
        DocPath::contacts(uid),
        DocPath::settings(uid),
        DocPath::preferences(uid),
        DocPath::prayers_root(uid),
        DocPath::growth_root(uid),
    ];
    let mut flagged = 0;
    for path in &paths {
        let mut doc = Document::new();
        doc.insert("deleted".to_string(), Value::Bool(true));
        doc.insert("deletedAt".to_string(), store.server_timestamp());
        match store.set(path, doc, SetOptions::overwrite()) {
            Ok(()) => flagged += 1,
            Err(e) => log::warn!("Could not clear {}: {}", path, e),
        }
    }
    Ok(flagged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::MemoryStore;
    use crate::models::{GrowthCategory, PrayerName, PrayerSlot};
    use serde_json::json;

    const UID: &str = "u1";

    #[test]
    fn prayers_round_trip_with_date_and_timestamp() {
        let store = MemoryStore::new();
        let mut day = DailyPrayers::default();
        *day.slot_mut(PrayerName::Asr) = PrayerSlot { prayed: true, jamat: true };
        PrayerRepo::save(&store, UID, "2024-03-10", &day).unwrap();

        let raw = store.raw(&DocPath::daily_prayers(UID, "2024-03-10")).unwrap();
        assert_eq!(raw["date"], json!("2024-03-10"));
        assert!(raw.contains_key("lastUpdated"));
        assert_eq!(raw["prayers"]["asr"], json!({"prayed": true, "jamat": true}));
        assert_eq!(PrayerRepo::load(&store, UID, "2024-03-10").unwrap(), Some(day));
    }

    #[test]
    fn malformed_prayer_document_loads_as_absent() {
        let store = MemoryStore::new();
        store.insert(DocPath::daily_prayers(UID, "2024-03-10"), json!({"prayers": "oops"}));
        assert_eq!(PrayerRepo::load(&store, UID, "2024-03-10").unwrap(), None);
    }

    #[test]
    fn growth_save_updates_preference_without_clobbering_it() {
        let store = MemoryStore::new();
        store.insert(DocPath::preferences(UID), json!({"userType": "student", "theme": "dark"}));
        let mut data = GrowthData::fresh(UserType::Homemaker);
        data.toggle(GrowthCategory::Life, "hobby", UserType::Homemaker).unwrap();
        let day = DailyGrowth {
            user_type: UserType::Homemaker,
            data,
        };
        GrowthRepo::save(&store, UID, "2024-03-10", &day).unwrap();

        let prefs = store.raw(&DocPath::preferences(UID)).unwrap();
        assert_eq!(prefs["userType"], json!("homemaker"));
        assert_eq!(prefs["theme"], json!("dark"));
        let loaded = GrowthRepo::load(&store, UID, "2024-03-10", UserType::Student).unwrap();
        assert_eq!(loaded, Some(day));
    }

    #[test]
    fn growth_day_without_role_uses_fallback() {
        let store = MemoryStore::new();
        store.insert(
            DocPath::daily_growth(UID, "2024-03-10"),
            json!({"growthData": {"iman": {"quran": true}}}),
        );
        let loaded = GrowthRepo::load(&store, UID, "2024-03-10", UserType::Professional)
            .unwrap()
            .unwrap();
        assert_eq!(loaded.user_type, UserType::Professional);
        assert!(loaded.data.is_checked(GrowthCategory::Iman, "quran"));
    }

    #[test]
    fn qaza_completion_uses_inverted_flags_on_disk() {
        let store = MemoryStore::new();
        let done = CompletedQaza {
            completed: [PrayerName::Fajr].into_iter().collect(),
        };
        QazaRepo::save_completed(&store, UID, "2024-03-09", &done).unwrap();
        let raw = store.raw(&DocPath::completed_qaza(UID, "2024-03-09")).unwrap();
        assert_eq!(raw["completedPrayers"]["fajr"], json!(false));
        assert_eq!(raw["completedPrayers"]["isha"], json!(true));
        assert_eq!(QazaRepo::load_completed(&store, UID, "2024-03-09").unwrap(), Some(done));
    }

    #[test]
    fn settings_are_initialised_once() {
        let store = MemoryStore::new();
        let profile = Profile {
            name: "Amina".to_string(),
            ..Profile::default()
        };
        let first = SettingsRepo::load_or_init(&store, UID, profile).unwrap();
        assert_eq!(first.profile.name, "Amina");
        assert!(first.notifications.prayer);
        assert!(!first.notifications.growth);

        let second = SettingsRepo::load_or_init(&store, UID, Profile::default()).unwrap();
        assert_eq!(second, first);
        assert_eq!(store.writes(), 1);
    }

    #[test]
    fn wiped_documents_read_as_absent() {
        let store = MemoryStore::new();
        ContactRepo::save(&store, UID, &Contacts::default()).unwrap();
        TaskRepo::save(&store, UID, "2024-03-10", &TaskLists::default(), &TaskLists::default()).unwrap();
        assert_eq!(wipe_user(&store, UID).unwrap(), 6);
        assert_eq!(ContactRepo::load(&store, UID).unwrap(), None);
        assert_eq!(TaskRepo::load(&store, UID).unwrap(), None);
        assert_eq!(PreferencesRepo::user_type(&store, UID).unwrap(), None);
    }

    #[test]
    fn store_failures_propagate() {
        let store = MemoryStore::new();
        store.fail_reads.set(true);
        assert!(TaskRepo::load(&store, UID).is_err());
    }
}
