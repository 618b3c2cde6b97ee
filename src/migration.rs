//! One-shot import of the browser-era local storage dump.
//!
//! The dump is a JSON object keyed like the old local storage. Values may be
//! the raw JSON strings local storage held or already-parsed JSON. Each kind is
//! imported only when the user has no document of that kind yet.

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::db::repository::{read, ContactRepo, SettingsRepo, TaskRepo};
use crate::db::{DocPath, Document, DocumentStore, SetOptions, StoreResult};
use crate::models::{Contacts, DailyPrayers, GrowthData, Notifications, Profile, TaskLists, UserSettings, UserType};
use crate::utils::dates::{date_key, parse_date_key};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationReport {
    pub tasks: usize,
    pub contacts: usize,
    pub settings: bool,
    pub user_type: bool,
    pub prayer_days: usize,
    pub growth_days: usize,
    /// Kinds left out because the user already has them stored.
    pub skipped: Vec<String>,
    /// Kinds left out because a value in the dump did not parse.
    pub invalid: Vec<String>,
}

impl MigrationReport {
    pub fn is_empty(&self) -> bool {
        self.tasks == 0
            && self.contacts == 0
            && !self.settings
            && !self.user_type
            && self.prayer_days == 0
            && self.growth_days == 0
    }
}

/// Parses a dump value, unwrapping the JSON-in-a-string form.
fn decode<T: DeserializeOwned>(key: &str, value: &Value) -> Option<T> {
    let parsed = match value {
        Value::String(s) => serde_json::from_str::<T>(s).map_err(|e| e.to_string()),
        other => serde_json::from_value::<T>(other.clone()).map_err(|e| e.to_string()),
    };
    match parsed {
        Ok(v) => Some(v),
        Err(e) => {
            log::warn!("Skipping legacy key '{}': {}", key, e);
            None
        }
    }
}

/// Decodes an optional dump value. `None` means the value was there but did
/// not parse; a missing key gives `Some(None)`.
fn decode_if_present<T: DeserializeOwned>(key: &str, value: Option<&Value>) -> Option<Option<T>> {
    match value {
        None => Some(None),
        Some(v) => decode(key, v).map(Some),
    }
}

/// `prayer-2024-03-10` or the old `prayer-Sun Mar 10 2024` form.
fn dated_key(key: &str, prefix: &str) -> Option<NaiveDate> {
    let rest = key.strip_prefix(prefix)?.strip_prefix('-')?;
    parse_date_key(rest)
        .ok()
        .or_else(|| NaiveDate::parse_from_str(rest, "%a %b %d %Y").ok())
}

fn stamped(store: &dyn DocumentStore, mut doc: Document) -> Document {
    doc.insert("migratedFrom".to_string(), Value::String("localStorage".to_string()));
    doc.insert("migrationDate".to_string(), store.server_timestamp());
    doc
}

fn is_present(store: &dyn DocumentStore, path: &DocPath) -> StoreResult<bool> {
    Ok(read(store, path)?.is_some())
}

pub fn import_legacy(
    store: &dyn DocumentStore,
    uid: &str,
    dump: &serde_json::Map<String, Value>,
    today: NaiveDate,
) -> StoreResult<MigrationReport> {
    let mut report = MigrationReport::default();
    let today_key = date_key(today);

    // ─── Tasks ──────────────────────────────────────────────────────────────
    let daily = dump.get("dailyTasks");
    let missed = dump.get("missedTasks");
    if daily.is_some() || missed.is_some() {
        if is_present(store, &DocPath::tasks(uid))? {
            report.skipped.push("tasks".to_string());
        } else if let (Some(today_tasks), Some(missed_tasks)) = (
            decode_if_present::<TaskLists>("dailyTasks", daily),
            decode_if_present::<TaskLists>("missedTasks", missed),
        ) {
            let mut today_tasks = today_tasks.unwrap_or_default();
            let mut missed_tasks = missed_tasks.unwrap_or_default();
            for lists in [&mut today_tasks, &mut missed_tasks] {
                for section in crate::models::TaskSection::all() {
                    for task in lists.section_mut(section) {
                        task.date_created.get_or_insert_with(|| today_key.clone());
                    }
                }
            }
            let doc = TaskRepo::document(store, &today_key, &today_tasks, &missed_tasks)?;
            store.set(&DocPath::tasks(uid), stamped(store, doc), SetOptions::overwrite())?;
            report.tasks = today_tasks.len() + missed_tasks.len();
        } else {
            report.invalid.push("tasks".to_string());
        }
    }

    // ─── Contacts ───────────────────────────────────────────────────────────
    if let Some(value) = dump.get("urgentContacts") {
        if is_present(store, &DocPath::contacts(uid))? {
            report.skipped.push("contacts".to_string());
        } else if let Some(contacts) = decode::<Contacts>("urgentContacts", value) {
            let doc = ContactRepo::document(store, &contacts)?;
            store.set(&DocPath::contacts(uid), stamped(store, doc), SetOptions::overwrite())?;
            report.contacts = contacts.len();
        } else {
            report.invalid.push("contacts".to_string());
        }
    }

    // ─── Settings and role ──────────────────────────────────────────────────
    let profile = dump.get("userProfile");
    let notifications = dump.get("notifications");
    let user_type = dump.get("userType").and_then(|v| match v {
        Value::String(s) => s.trim_matches('"').parse::<UserType>().ok(),
        _ => None,
    });
    if profile.is_some() || notifications.is_some() || user_type.is_some() {
        if is_present(store, &DocPath::settings(uid))? {
            report.skipped.push("settings".to_string());
        } else if let (Some(profile), Some(notifications)) = (
            decode_if_present::<Profile>("userProfile", profile),
            decode_if_present::<Notifications>("notifications", notifications),
        ) {
            let settings = UserSettings {
                profile: profile.unwrap_or_default(),
                notifications: notifications.unwrap_or_default(),
            };
            let doc = SettingsRepo::document(store, &settings)?;
            store.set(&DocPath::settings(uid), stamped(store, doc), SetOptions::overwrite())?;
            report.settings = true;

            if let Some(t) = user_type {
                let mut doc = Document::new();
                doc.insert("userType".to_string(), Value::String(t.as_str().to_string()));
                doc.insert("lastUpdated".to_string(), store.server_timestamp());
                store.set(&DocPath::preferences(uid), stamped(store, doc), SetOptions::overwrite())?;
                report.user_type = true;
            }
        } else {
            report.invalid.push("settings".to_string());
        }
    }

    // ─── Per-day records ────────────────────────────────────────────────────
    for (key, value) in dump {
        if let Some(date) = dated_key(key, "prayer") {
            let path = DocPath::daily_prayers(uid, &date_key(date));
            if is_present(store, &path)? {
                continue;
            }
            let Some(prayers) = decode::<DailyPrayers>(key, value) else {
                report.invalid.push(key.clone());
                continue;
            };
            let mut doc = Document::new();
            doc.insert("prayers".to_string(), serde_json::to_value(&prayers)?);
            doc.insert("date".to_string(), Value::String(date_key(date)));
            doc.insert("lastUpdated".to_string(), store.server_timestamp());
            store.set(&path, stamped(store, doc), SetOptions::overwrite())?;
            report.prayer_days += 1;
        } else if let Some(date) = dated_key(key, "growth") {
            let path = DocPath::daily_growth(uid, &date_key(date));
            if is_present(store, &path)? {
                continue;
            }
            let Some(growth) = decode::<GrowthData>(key, value) else {
                report.invalid.push(key.clone());
                continue;
            };
            let mut doc = Document::new();
            doc.insert("growthData".to_string(), serde_json::to_value(&growth)?);
            doc.insert("date".to_string(), Value::String(date_key(date)));
            doc.insert("lastUpdated".to_string(), store.server_timestamp());
            store.set(&path, stamped(store, doc), SetOptions::overwrite())?;
            report.growth_days += 1;
        }
    }

    log::info!(
        "Imported {} tasks, {} contacts, {} prayer days, {} growth days",
        report.tasks,
        report.contacts,
        report.prayer_days,
        report.growth_days
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::MemoryStore;
    use crate::db::repository::{PreferencesRepo, PrayerRepo};
    use serde_json::json;

    const UID: &str = "u1";

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
    }

    fn dump(value: Value) -> serde_json::Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn tasks_without_dates_are_stamped_today() {
        let store = MemoryStore::new();
        let d = dump(json!({
            "dailyTasks": "{\"mustDo\":[{\"id\":1,\"text\":\"call mum\",\"completed\":false}],\"goodToDo\":[]}",
            "missedTasks": {"mustDo": [], "goodToDo": [{"id": 2, "text": "read", "completed": false, "dateCreated": "2024-03-01"}]}
        }));
        let report = import_legacy(&store, UID, &d, today()).unwrap();
        assert_eq!(report.tasks, 2);

        let raw = store.raw(&DocPath::tasks(UID)).unwrap();
        assert_eq!(raw["migratedFrom"], json!("localStorage"));
        assert!(raw.contains_key("migrationDate"));
        let (t, m) = TaskRepo::load(&store, UID).unwrap().unwrap();
        assert_eq!(t.must_do[0].date_created.as_deref(), Some("2024-03-10"));
        assert_eq!(m.good_to_do[0].date_created.as_deref(), Some("2024-03-01"));
    }

    #[test]
    fn existing_documents_are_left_alone() {
        let store = MemoryStore::new();
        store.insert(DocPath::contacts(UID), json!({"contacts": {"message": [], "call": []}}));
        let d = dump(json!({"urgentContacts": {"message": [{"id": 5, "name": "Yusuf"}], "call": []}}));
        let report = import_legacy(&store, UID, &d, today()).unwrap();
        assert_eq!(report.contacts, 0);
        assert_eq!(report.skipped, vec!["contacts".to_string()]);
        assert_eq!(ContactRepo::load(&store, UID).unwrap().unwrap().len(), 0);
    }

    #[test]
    fn settings_carry_role_into_preferences() {
        let store = MemoryStore::new();
        let d = dump(json!({
            "userProfile": "{\"name\":\"Amina\"}",
            "userType": "professional"
        }));
        let report = import_legacy(&store, UID, &d, today()).unwrap();
        assert!(report.settings && report.user_type);
        let settings = SettingsRepo::load(&store, UID).unwrap().unwrap();
        assert_eq!(settings.profile.name, "Amina");
        assert!(settings.notifications.prayer);
        assert_eq!(PreferencesRepo::user_type(&store, UID).unwrap(), Some(UserType::Professional));
    }

    #[test]
    fn dated_keys_accept_both_formats() {
        let store = MemoryStore::new();
        let d = dump(json!({
            "prayer-Sat Mar 09 2024": {"fajr": {"prayed": true, "jamat": true}},
            "prayer-2024-03-08": "{\"isha\":{\"prayed\":true,\"jamat\":false}}",
            "growth-2024-03-09": {"iman": {"quran": true}, "life": {}},
            "prayer-garbage": {}
        }));
        let report = import_legacy(&store, UID, &d, today()).unwrap();
        assert_eq!(report.prayer_days, 2);
        assert_eq!(report.growth_days, 1);
        let day = PrayerRepo::load(&store, UID, "2024-03-09").unwrap().unwrap();
        assert!(day.fajr.jamat);
    }

    #[test]
    fn malformed_values_are_skipped() {
        let store = MemoryStore::new();
        let d = dump(json!({"urgentContacts": "not json", "prayer-2024-03-09": "[1, 2"}));
        let report = import_legacy(&store, UID, &d, today()).unwrap();
        assert!(report.is_empty());
        assert_eq!(report.invalid, vec!["contacts".to_string(), "prayer-2024-03-09".to_string()]);
        assert!(store.raw(&DocPath::contacts(UID)).is_none());
    }

    #[test]
    fn unparseable_tasks_leave_room_for_a_corrected_import() {
        let store = MemoryStore::new();
        let bad = dump(json!({
            "dailyTasks": "{not json",
            "missedTasks": {"mustDo": [], "goodToDo": []}
        }));
        let report = import_legacy(&store, UID, &bad, today()).unwrap();
        assert_eq!(report.tasks, 0);
        assert_eq!(report.invalid, vec!["tasks".to_string()]);
        assert!(store.raw(&DocPath::tasks(UID)).is_none());

        let good = dump(json!({
            "dailyTasks": {"mustDo": [{"id": 1, "text": "call mum", "completed": false}], "goodToDo": []}
        }));
        let report = import_legacy(&store, UID, &good, today()).unwrap();
        assert!(report.skipped.is_empty());
        assert_eq!(report.tasks, 1);
    }

    #[test]
    fn unparseable_profile_writes_no_settings() {
        let store = MemoryStore::new();
        let bad = dump(json!({
            "userProfile": "{\"name\":",
            "notifications": {"prayer": false},
            "userType": "homemaker"
        }));
        let report = import_legacy(&store, UID, &bad, today()).unwrap();
        assert!(!report.settings && !report.user_type);
        assert_eq!(report.invalid, vec!["settings".to_string()]);
        assert!(store.raw(&DocPath::settings(UID)).is_none());
        assert!(store.raw(&DocPath::preferences(UID)).is_none());

        let good = dump(json!({"userProfile": {"name": "Amina"}}));
        let report = import_legacy(&store, UID, &good, today()).unwrap();
        assert!(report.settings);
        assert_eq!(SettingsRepo::load(&store, UID).unwrap().unwrap().profile.name, "Amina");
    }
}
