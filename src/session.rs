//! The tracker's state for one user on one day.
//!
//! [`DaySession::load`] pulls everything the dashboard shows out of the store
//! and runs the day-boundary rules over it. Every mutation updates memory
//! first and then writes through; a failed write is logged and the in-memory
//! state stays authoritative until the next successful save.

use anyhow::{anyhow, Result};
use chrono::{Local, NaiveDate};

use crate::db::repository::{ContactRepo, GrowthRepo, PreferencesRepo, PrayerRepo, QazaRepo, TaskRepo};
use crate::db::{DocumentStore, StoreResult};
use crate::engine::{
    advance_day_boundary, compute_prayer_qaza, compute_task_rollover, toggle_outcome, Clock, DayWatcher,
    TaskRollover,
};
use crate::models::{
    Contact, ContactKind, Contacts, DailyGrowth, DailyPrayers, GrowthCategory, GrowthData,
    PrayerField, PrayerName, PrayerSlot, QazaSet, Task, TaskBucket, TaskLists, TaskSection, UserType,
};
use crate::utils::dates::{date_key, previous_day};

/// What a read of one stored part turned up.
enum Stored<T> {
    Found(T),
    Absent,
    Unreadable,
}

fn stored<T>(what: &str, result: StoreResult<Option<T>>) -> Stored<T> {
    match result {
        Ok(Some(value)) => Stored::Found(value),
        Ok(None) => Stored::Absent,
        Err(e) => {
            log::warn!("Could not load {}: {}", what, e);
            Stored::Unreadable
        }
    }
}

/// Write failures are logged and otherwise ignored.
fn persist(what: &str, result: StoreResult<()>) {
    if let Err(e) = result {
        log::error!("Could not save {}: {}", what, e);
    }
}

/// Parts whose stored copy could not be read at load time.
///
/// Such a part shows defaults and is never written back, so an outage cannot
/// overwrite what is already stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Unreadable {
    pub prayers: bool,
    pub qaza: bool,
    pub growth: bool,
    pub tasks: bool,
    pub contacts: bool,
}

impl Unreadable {
    pub fn any(&self) -> bool {
        self.prayers || self.qaza || self.growth || self.tasks || self.contacts
    }
}

/// Whether `what` may be saved; logs when it may not.
fn writable(what: &str, unreadable: bool) -> bool {
    if unreadable {
        log::warn!("Not saving {}: the stored copy could not be read", what);
    }
    !unreadable
}

#[derive(Debug, Clone)]
pub struct DaySession {
    pub user_id: String,
    pub date: NaiveDate,
    pub today: String,
    pub prayers: DailyPrayers,
    pub qaza: QazaSet,
    pub growth: DailyGrowth,
    pub tasks: TaskRollover,
    pub contacts: Contacts,
    pub unreadable: Unreadable,
}

impl DaySession {
    pub fn load(store: &dyn DocumentStore, user_id: &str, date: NaiveDate) -> Self {
        let today = date_key(date);
        let yesterday = date_key(previous_day(date));
        let mut unreadable = Unreadable::default();
        log::debug!("Loading {} for {}", today, user_id);

        let prayers = match stored("prayers", PrayerRepo::load(store, user_id, &today)) {
            Stored::Found(p) => p,
            Stored::Absent => {
                let fresh = DailyPrayers::default();
                persist("prayers", PrayerRepo::save(store, user_id, &today, &fresh));
                fresh
            }
            Stored::Unreadable => {
                unreadable.prayers = true;
                DailyPrayers::default()
            }
        };

        // Without yesterday's record nothing is owed, so a failed read only hides qaza
        let source_day = match stored("yesterday's prayers", PrayerRepo::load(store, user_id, &yesterday)) {
            Stored::Found(p) => Some(p),
            Stored::Absent | Stored::Unreadable => None,
        };
        let completed = match stored("qaza", QazaRepo::load_completed(store, user_id, &yesterday)) {
            Stored::Found(c) => Some(c),
            Stored::Absent => None,
            Stored::Unreadable => {
                unreadable.qaza = true;
                None
            }
        };
        let qaza = compute_prayer_qaza(&yesterday, source_day.as_ref(), completed.as_ref());

        let (preferred, preferred_known) = match stored("preferences", PreferencesRepo::user_type(store, user_id)) {
            Stored::Found(t) => (t, true),
            Stored::Absent => (UserType::default(), true),
            Stored::Unreadable => (UserType::default(), false),
        };
        let growth = match stored("growth", GrowthRepo::load(store, user_id, &today, preferred)) {
            Stored::Found(mut g) => {
                g.data.align_life(g.user_type);
                g
            }
            found => {
                let fresh = DailyGrowth {
                    user_type: preferred,
                    data: GrowthData::fresh(preferred),
                };
                // Saving also records the role, so an unknown role must not be written
                if matches!(found, Stored::Absent) && preferred_known {
                    persist("growth", GrowthRepo::save(store, user_id, &today, &fresh));
                } else {
                    unreadable.growth = true;
                }
                fresh
            }
        };

        let tasks = match stored("tasks", TaskRepo::load(store, user_id)) {
            Stored::Found((stored_today, stored_missed)) => {
                let rolled = compute_task_rollover(&stored_today, &stored_missed, &today);
                if rolled.today != stored_today || rolled.missed != stored_missed {
                    log::info!(
                        "Rolled tasks over to {}: {} today, {} missed",
                        today,
                        rolled.today.len(),
                        rolled.missed.len()
                    );
                    persist(
                        "tasks",
                        TaskRepo::save(store, user_id, &today, &rolled.today, &rolled.missed),
                    );
                }
                rolled
            }
            Stored::Absent => TaskRollover::default(),
            Stored::Unreadable => {
                unreadable.tasks = true;
                TaskRollover::default()
            }
        };

        let contacts = match stored("contacts", ContactRepo::load(store, user_id)) {
            Stored::Found(c) => c,
            Stored::Absent => Contacts::default(),
            Stored::Unreadable => {
                unreadable.contacts = true;
                Contacts::default()
            }
        };

        DaySession {
            user_id: user_id.to_string(),
            date,
            today,
            prayers,
            qaza,
            growth,
            tasks,
            contacts,
            unreadable,
        }
    }

    /// Reads the current day again; used to recover once the store is back.
    pub fn reload(&mut self, store: &dyn DocumentStore) {
        *self = DaySession::load(store, &self.user_id, self.date);
    }

    /// Reloads everything once the watcher's day differs from this session's.
    pub fn reload_if_new_day<C: Clock>(&mut self, store: &dyn DocumentStore, watcher: &DayWatcher<C>) -> bool {
        if !advance_day_boundary(&self.today, watcher.current()) {
            return false;
        }
        *self = DaySession::load(store, &self.user_id, watcher.today());
        true
    }

    // ─── Prayers ────────────────────────────────────────────────────────────

    pub fn toggle_prayer(&mut self, store: &dyn DocumentStore, name: PrayerName, field: PrayerField) -> PrayerSlot {
        let slot = self.prayers.slot_mut(name);
        *slot = toggle_outcome(*slot, field);
        let updated = *slot;
        if writable("prayers", self.unreadable.prayers) {
            persist("prayers", PrayerRepo::save(store, &self.user_id, &self.today, &self.prayers));
        }
        updated
    }

    /// Records a made-up prayer against the day it was missed.
    pub fn pray_qaza(&mut self, store: &dyn DocumentStore, name: PrayerName) -> bool {
        if !self.qaza.pray(name) {
            return false;
        }
        if !writable("qaza", self.unreadable.qaza) {
            return true;
        }
        if let Some(source) = &self.qaza.source_date {
            let record = self.qaza.completion_record();
            persist("qaza", QazaRepo::save_completed(store, &self.user_id, source, &record));
        }
        true
    }

    // ─── Growth ─────────────────────────────────────────────────────────────

    pub fn set_user_type(&mut self, store: &dyn DocumentStore, user_type: UserType) {
        self.growth.user_type = user_type;
        self.growth.data.align_life(user_type);
        self.save_growth(store);
    }

    pub fn toggle_growth(&mut self, store: &dyn DocumentStore, category: GrowthCategory, key: &str) -> Result<bool> {
        let checked = self.growth.data.toggle(category, key, self.growth.user_type)?;
        self.save_growth(store);
        Ok(checked)
    }

    fn save_growth(&self, store: &dyn DocumentStore) {
        if !writable("growth", self.unreadable.growth) {
            return;
        }
        persist("growth", GrowthRepo::save(store, &self.user_id, &self.today, &self.growth));
    }

    // ─── Tasks ──────────────────────────────────────────────────────────────

    fn lists_mut(&mut self, bucket: TaskBucket) -> &mut TaskLists {
        match bucket {
            TaskBucket::Today => &mut self.tasks.today,
            TaskBucket::Missed => &mut self.tasks.missed,
        }
    }

    fn save_tasks(&self, store: &dyn DocumentStore) {
        if !writable("tasks", self.unreadable.tasks) {
            return;
        }
        persist(
            "tasks",
            TaskRepo::save(store, &self.user_id, &self.today, &self.tasks.today, &self.tasks.missed),
        );
    }

    /// Ids are creation times in milliseconds, bumped past any existing id.
    fn next_task_id(&self) -> i64 {
        let now = Local::now().timestamp_millis();
        let max = self
            .tasks
            .today
            .iter()
            .chain(self.tasks.missed.iter())
            .map(|(_, t)| t.id)
            .max()
            .unwrap_or(0);
        now.max(max + 1)
    }

    /// New tasks always go on today's list.
    pub fn add_task(&mut self, store: &dyn DocumentStore, section: TaskSection, text: &str) -> Result<i64> {
        let text = text.trim();
        if text.is_empty() {
            return Err(anyhow!("Task text is empty"));
        }
        let id = self.next_task_id();
        let task = Task {
            id,
            text: text.to_string(),
            completed: false,
            created_at: Some(Local::now().to_rfc3339()),
            date_created: Some(self.today.clone()),
        };
        self.tasks.today.section_mut(section).push(task);
        self.save_tasks(store);
        Ok(id)
    }

    pub fn toggle_task(&mut self, store: &dyn DocumentStore, bucket: TaskBucket, id: i64) -> Result<bool> {
        let task = self
            .lists_mut(bucket)
            .find_mut(id)
            .ok_or_else(|| anyhow!("No task with id {}", id))?;
        task.completed = !task.completed;
        let completed = task.completed;
        self.save_tasks(store);
        Ok(completed)
    }

    pub fn delete_task(&mut self, store: &dyn DocumentStore, bucket: TaskBucket, id: i64) -> Result<Task> {
        let (_, task) = self
            .lists_mut(bucket)
            .remove(id)
            .ok_or_else(|| anyhow!("No task with id {}", id))?;
        self.save_tasks(store);
        Ok(task)
    }

    /// Brings a missed task back to today as a fresh, open task.
    pub fn move_task_to_today(&mut self, store: &dyn DocumentStore, id: i64) -> Result<()> {
        let (section, mut task) = self
            .tasks
            .missed
            .remove(id)
            .ok_or_else(|| anyhow!("No missed task with id {}", id))?;
        task.date_created = Some(self.today.clone());
        task.completed = false;
        self.tasks.today.section_mut(section).push(task);
        self.save_tasks(store);
        Ok(())
    }

    // ─── Contacts ───────────────────────────────────────────────────────────

    fn save_contacts(&self, store: &dyn DocumentStore) {
        if writable("contacts", self.unreadable.contacts) {
            persist("contacts", ContactRepo::save(store, &self.user_id, &self.contacts));
        }
    }

    pub fn add_contact(&mut self, store: &dyn DocumentStore, kind: ContactKind, name: &str) -> Result<i64> {
        let name = name.trim();
        if name.is_empty() {
            return Err(anyhow!("Contact name is empty"));
        }
        let max = self.contacts.message.iter().chain(self.contacts.call.iter()).map(|c| c.id).max();
        let id = Local::now().timestamp_millis().max(max.unwrap_or(0) + 1);
        self.contacts.list_mut(kind).push(Contact {
            id,
            name: name.to_string(),
            created_at: Some(Local::now().to_rfc3339()),
        });
        self.save_contacts(store);
        Ok(id)
    }

    pub fn delete_contact(&mut self, store: &dyn DocumentStore, id: i64) -> Result<Contact> {
        for kind in [ContactKind::Message, ContactKind::Call] {
            let list = self.contacts.list_mut(kind);
            if let Some(pos) = list.iter().position(|c| c.id == id) {
                let removed = list.remove(pos);
                self.save_contacts(store);
                return Ok(removed);
            }
        }
        Err(anyhow!("No contact with id {}", id))
    }
}
