use crate::models::{TaskLists, TaskSection};

/// Today's tasks and the carried-forward missed tasks after a rollover.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskRollover {
    pub today: TaskLists,
    pub missed: TaskLists,
}

/// Splits the persisted `today` bucket at the `now` day boundary.
///
/// Tasks dated `now` (or undated legacy tasks) stay in today. Older tasks move
/// to the end of `missed` if still open and are dropped if already completed.
/// The persisted `missed` bucket is carried over untouched.
pub fn compute_task_rollover(today: &TaskLists, missed: &TaskLists, now: &str) -> TaskRollover {
    let mut result = TaskRollover {
        today: TaskLists::default(),
        missed: missed.clone(),
    };

    for section in TaskSection::all() {
        for task in today.section(section) {
            if task.is_from(now) {
                result.today.section_mut(section).push(task.clone());
            } else if !task.completed {
                result.missed.section_mut(section).push(task.clone());
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Task;
    use std::collections::HashSet;

    const NOW: &str = "2024-03-10";

    fn task(id: i64, date: Option<&str>, completed: bool) -> Task {
        Task {
            id,
            text: format!("task {}", id),
            completed,
            created_at: None,
            date_created: date.map(str::to_string),
        }
    }

    fn ids(lists: &TaskLists) -> Vec<i64> {
        lists.iter().map(|(_, t)| t.id).collect()
    }

    #[test]
    fn stale_open_task_moves_to_missed() {
        let today = TaskLists {
            must_do: vec![task(1, Some("2024-03-08"), false)],
            good_to_do: vec![],
        };
        let out = compute_task_rollover(&today, &TaskLists::default(), NOW);
        assert!(out.today.must_do.is_empty());
        assert_eq!(ids(&out.missed), vec![1]);
        assert_eq!(out.missed.must_do.len(), 1);
    }

    #[test]
    fn stale_completed_task_is_dropped() {
        let today = TaskLists {
            must_do: vec![],
            good_to_do: vec![task(1, Some("2024-03-09"), true)],
        };
        let out = compute_task_rollover(&today, &TaskLists::default(), NOW);
        assert!(out.today.is_empty());
        assert!(out.missed.is_empty());
    }

    #[test]
    fn legacy_and_current_tasks_stay_today() {
        let today = TaskLists {
            must_do: vec![task(1, None, false), task(2, Some(NOW), true)],
            good_to_do: vec![task(3, None, true)],
        };
        let out = compute_task_rollover(&today, &TaskLists::default(), NOW);
        assert_eq!(out.today, today);
        assert!(out.missed.is_empty());
    }

    #[test]
    fn new_missed_tasks_append_after_existing_ones() {
        let missed = TaskLists {
            must_do: vec![task(10, Some("2024-03-01"), false)],
            good_to_do: vec![],
        };
        let today = TaskLists {
            must_do: vec![task(11, Some("2024-03-09"), false)],
            good_to_do: vec![task(12, Some("2024-03-09"), false)],
        };
        let out = compute_task_rollover(&today, &missed, NOW);
        assert_eq!(ids(&out.missed), vec![10, 11, 12]);
        assert_eq!(out.missed.good_to_do[0].id, 12);
    }

    #[test]
    fn every_task_lands_in_exactly_one_place() {
        let today = TaskLists {
            must_do: vec![
                task(1, Some(NOW), false),
                task(2, Some("2024-03-09"), false),
                task(3, Some("2024-03-09"), true),
                task(4, None, false),
            ],
            good_to_do: vec![task(5, Some("2024-02-01"), false), task(6, Some(NOW), true)],
        };
        let missed = TaskLists {
            must_do: vec![task(7, Some("2024-03-02"), false)],
            good_to_do: vec![],
        };
        let out = compute_task_rollover(&today, &missed, NOW);

        let today_ids: HashSet<i64> = ids(&out.today).into_iter().collect();
        let missed_ids: HashSet<i64> = ids(&out.missed).into_iter().collect();
        assert!(today_ids.is_disjoint(&missed_ids));
        assert_eq!(today_ids, HashSet::from([1, 4, 6]));
        assert_eq!(missed_ids, HashSet::from([2, 5, 7]));
        // 3 was completed on a past day
        assert_eq!(today_ids.len() + missed_ids.len() + 1, 7);
    }

    #[test]
    fn rollover_is_a_fixed_point_for_the_same_day() {
        let today = TaskLists {
            must_do: vec![task(1, Some("2024-03-09"), false), task(2, Some(NOW), false)],
            good_to_do: vec![task(3, Some("2024-03-07"), true)],
        };
        let once = compute_task_rollover(&today, &TaskLists::default(), NOW);
        let twice = compute_task_rollover(&once.today, &once.missed, NOW);
        assert_eq!(once, twice);
    }
}
