use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Creation time in epoch milliseconds; unique per user.
    pub id: i64,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Local day the task belongs to. Legacy tasks have none and count as today's.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_created: Option<String>,
}

impl Task {
    pub fn is_from(&self, date: &str) -> bool {
        match &self.date_created {
            None => true,
            Some(d) => d == date,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskSection {
    MustDo,
    GoodToDo,
}

impl TaskSection {
    pub fn all() -> [TaskSection; 2] {
        [TaskSection::MustDo, TaskSection::GoodToDo]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            TaskSection::MustDo => "Must do",
            TaskSection::GoodToDo => "Good to do",
        }
    }
}

impl FromStr for TaskSection {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', '_'], "").as_str() {
            "mustdo" | "must" => Ok(TaskSection::MustDo),
            "goodtodo" | "good" => Ok(TaskSection::GoodToDo),
            _ => Err(anyhow!("Unknown task section: {}", s)),
        }
    }
}

/// Which list a task currently lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskBucket {
    Today,
    Missed,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskLists {
    pub must_do: Vec<Task>,
    pub good_to_do: Vec<Task>,
}

impl TaskLists {
    pub fn section(&self, section: TaskSection) -> &Vec<Task> {
        match section {
            TaskSection::MustDo => &self.must_do,
            TaskSection::GoodToDo => &self.good_to_do,
        }
    }

    pub fn section_mut(&mut self, section: TaskSection) -> &mut Vec<Task> {
        match section {
            TaskSection::MustDo => &mut self.must_do,
            TaskSection::GoodToDo => &mut self.good_to_do,
        }
    }

    pub fn len(&self) -> usize {
        self.must_do.len() + self.good_to_do.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (TaskSection, &Task)> {
        self.must_do
            .iter()
            .map(|t| (TaskSection::MustDo, t))
            .chain(self.good_to_do.iter().map(|t| (TaskSection::GoodToDo, t)))
    }

    /// Locates a task by id in either section.
    pub fn find_mut(&mut self, id: i64) -> Option<&mut Task> {
        self.must_do.iter_mut().chain(self.good_to_do.iter_mut()).find(|t| t.id == id)
    }

    pub fn remove(&mut self, id: i64) -> Option<(TaskSection, Task)> {
        for section in TaskSection::all() {
            let list = self.section_mut(section);
            if let Some(pos) = list.iter().position(|t| t.id == id) {
                return Some((section, list.remove(pos)));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: i64, date: Option<&str>) -> Task {
        Task {
            id,
            text: format!("task {}", id),
            completed: false,
            created_at: None,
            date_created: date.map(str::to_string),
        }
    }

    #[test]
    fn legacy_task_without_date_is_from_any_day() {
        assert!(task(1, None).is_from("2024-03-10"));
        assert!(task(2, Some("2024-03-10")).is_from("2024-03-10"));
        assert!(!task(3, Some("2024-03-09")).is_from("2024-03-10"));
    }

    #[test]
    fn remove_finds_task_in_either_section() {
        let mut lists = TaskLists {
            must_do: vec![task(1, None)],
            good_to_do: vec![task(2, None), task(3, None)],
        };
        let (section, removed) = lists.remove(3).unwrap();
        assert_eq!(section, TaskSection::GoodToDo);
        assert_eq!(removed.id, 3);
        assert_eq!(lists.len(), 2);
        assert!(lists.remove(42).is_none());
    }

    #[test]
    fn find_mut_reaches_both_sections() {
        let mut lists = TaskLists {
            must_do: vec![task(1, None)],
            good_to_do: vec![task(2, None)],
        };
        lists.find_mut(2).unwrap().completed = true;
        assert!(lists.good_to_do[0].completed);
        assert!(lists.find_mut(1).is_some());
        assert!(lists.find_mut(3).is_none());
    }

    #[test]
    fn wire_format_uses_camel_case_sections() {
        let json = r#"{"mustDo":[{"id":7,"text":"call","completed":true,"dateCreated":"2024-03-10"}]}"#;
        let lists: TaskLists = serde_json::from_str(json).unwrap();
        assert_eq!(lists.must_do[0].date_created.as_deref(), Some("2024-03-10"));
        assert!(lists.good_to_do.is_empty());
    }
}
