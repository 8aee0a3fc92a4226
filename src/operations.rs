//! Mutations on a loaded collection. Each call validates, mutates, then
//! rewrites the identity's whole file.

use chrono::NaiveDate;

use crate::error::{PlannerError, Result};
use crate::store::TaskStore;
use crate::task::Task;

/// Returns a copy of the appended task.
pub fn add(
    store: &TaskStore,
    identity: &str,
    tasks: &mut Vec<Task>,
    description: &str,
    deadline: NaiveDate,
) -> Result<Task> {
    check_description(description)?;
    let task = Task::new(description, deadline);
    tasks.push(task.clone());
    store.save(identity, tasks)?;
    Ok(task)
}

pub fn edit(
    store: &TaskStore,
    identity: &str,
    tasks: &mut [Task],
    index: usize,
    new_description: &str,
    new_deadline: NaiveDate,
) -> Result<()> {
    check_index(tasks, index)?;
    check_description(new_description)?;
    tasks[index].reschedule(new_description, new_deadline);
    store.save(identity, tasks)
}

pub fn delete(
    store: &TaskStore,
    identity: &str,
    tasks: &mut Vec<Task>,
    index: usize,
) -> Result<Task> {
    check_index(tasks, index)?;
    let removed = tasks.remove(index);
    store.save(identity, tasks)?;
    Ok(removed)
}

pub fn toggle_complete(
    store: &TaskStore,
    identity: &str,
    tasks: &mut [Task],
    index: usize,
    value: bool,
) -> Result<()> {
    check_index(tasks, index)?;
    tasks[index].completed = value;
    store.save(identity, tasks)
}

/// Drops every completed task and returns what is left.
pub fn purge_completed(
    store: &TaskStore,
    identity: &str,
    tasks: Vec<Task>,
) -> Result<Vec<Task>> {
    let remaining: Vec<Task> = tasks.into_iter().filter(|t| !t.completed).collect();
    store.save(identity, &remaining)?;
    Ok(remaining)
}

pub fn all_completed(tasks: &[Task]) -> bool {
    !tasks.is_empty() && tasks.iter().all(|t| t.completed)
}

fn check_index(tasks: &[Task], index: usize) -> Result<()> {
    if index < tasks.len() {
        Ok(())
    } else {
        Err(PlannerError::OutOfRange {
            index,
            len: tasks.len(),
        })
    }
}

fn check_description(description: &str) -> Result<()> {
    if description.trim().is_empty() {
        Err(PlannerError::EmptyDescription)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_store() -> (TaskStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        (TaskStore::new(temp_dir.path()), temp_dir)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// A store whose data directory is a regular file, so every save fails.
    fn unwritable_store() -> (TaskStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("not-a-dir");
        fs::write(&blocker, "").unwrap();
        (TaskStore::new(blocker), temp_dir)
    }

    fn open_tasks() -> Vec<Task> {
        vec![
            Task::new("one", date(2024, 1, 1)),
            Task::new("two", date(2024, 1, 2)),
        ]
    }

    fn seeded(store: &TaskStore) -> Vec<Task> {
        let mut tasks = Vec::new();
        add(store, "alice", &mut tasks, "one", date(2024, 1, 1)).unwrap();
        add(store, "alice", &mut tasks, "two", date(2024, 1, 2)).unwrap();
        tasks
    }

    #[test]
    fn add_appends_and_persists() {
        let (store, _temp) = create_test_store();
        let mut tasks = seeded(&store);
        let added = add(&store, "alice", &mut tasks, "three", date(2024, 1, 1)).unwrap();
        assert_eq!(tasks.last(), Some(&added));

        assert_eq!(added.day_of_week, Weekday::Mon);
        assert!(!added.completed);
        let loaded = store.load("alice").unwrap();
        assert_eq!(loaded.last(), Some(&added));
        assert_eq!(loaded.len(), 3);
    }

    #[test]
    fn add_rejects_blank_description() {
        let (store, _temp) = create_test_store();
        let mut tasks = Vec::new();
        let err = add(&store, "alice", &mut tasks, "   ", date(2024, 1, 1)).unwrap_err();
        assert!(matches!(err, PlannerError::EmptyDescription));
        assert!(tasks.is_empty());
        assert!(!store.path_for("alice").exists());
    }

    #[test]
    fn edit_rewrites_description_deadline_and_weekday() {
        let (store, _temp) = create_test_store();
        let mut tasks = seeded(&store);
        edit(&store, "alice", &mut tasks, 0, "uno", date(2024, 1, 6)).unwrap();

        let loaded = store.load("alice").unwrap();
        assert_eq!(loaded[0].description, "uno");
        assert_eq!(loaded[0].deadline, "2024-01-06");
        assert_eq!(loaded[0].day_of_week, Weekday::Sat);
        assert_eq!(loaded[1].description, "two");
    }

    #[test]
    fn edit_out_of_range_leaves_storage_alone() {
        let (store, _temp) = create_test_store();
        let mut tasks = seeded(&store);
        let before = store.load("alice").unwrap();

        let err = edit(&store, "alice", &mut tasks, 2, "x", date(2024, 1, 1)).unwrap_err();
        assert!(matches!(err, PlannerError::OutOfRange { index: 2, len: 2 }));
        assert_eq!(tasks, before);
        assert_eq!(store.load("alice").unwrap(), before);
    }

    #[test]
    fn delete_removes_entry() {
        let (store, _temp) = create_test_store();
        let mut tasks = seeded(&store);
        let removed = delete(&store, "alice", &mut tasks, 0).unwrap();

        assert_eq!(removed.description, "one");
        let loaded = store.load("alice").unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].description, "two");
    }

    #[test]
    fn delete_out_of_range_leaves_storage_alone() {
        let (store, _temp) = create_test_store();
        let mut tasks = seeded(&store);
        let before = store.load("alice").unwrap();

        let err = delete(&store, "alice", &mut tasks, 5).unwrap_err();
        assert!(matches!(err, PlannerError::OutOfRange { index: 5, len: 2 }));
        assert_eq!(store.load("alice").unwrap(), before);
    }

    #[test]
    fn toggle_complete_sets_flag() {
        let (store, _temp) = create_test_store();
        let mut tasks = seeded(&store);
        toggle_complete(&store, "alice", &mut tasks, 1, true).unwrap();
        assert!(store.load("alice").unwrap()[1].completed);

        toggle_complete(&store, "alice", &mut tasks, 1, false).unwrap();
        assert!(!store.load("alice").unwrap()[1].completed);

        assert!(toggle_complete(&store, "alice", &mut tasks, 9, true).is_err());
    }

    #[test]
    fn purge_completed_keeps_open_tasks_in_order() {
        let (store, _temp) = create_test_store();
        let mut tasks = seeded(&store);
        add(&store, "alice", &mut tasks, "three", date(2024, 1, 3)).unwrap();
        toggle_complete(&store, "alice", &mut tasks, 1, true).unwrap();

        let remaining = purge_completed(&store, "alice", tasks).unwrap();
        let names: Vec<&str> = remaining.iter().map(|t| t.description.as_str()).collect();
        assert_eq!(names, ["one", "three"]);
        assert_eq!(store.load("alice").unwrap(), remaining);
    }

    #[test]
    fn purge_completed_on_all_done_empties_storage() {
        let (store, _temp) = create_test_store();
        let mut tasks = seeded(&store);
        toggle_complete(&store, "alice", &mut tasks, 0, true).unwrap();
        toggle_complete(&store, "alice", &mut tasks, 1, true).unwrap();
        assert!(all_completed(&tasks));

        let remaining = purge_completed(&store, "alice", tasks).unwrap();
        assert!(remaining.is_empty());
        assert!(store.load("alice").unwrap().is_empty());
    }

    #[test]
    fn all_completed_is_false_for_empty_collection() {
        assert!(!all_completed(&[]));
    }

    #[test]
    fn add_reports_write_failure_and_keeps_task_in_memory() {
        let (store, _temp) = unwritable_store();
        let mut tasks = Vec::new();

        let result = add(&store, "alice", &mut tasks, "one", date(2024, 1, 1));
        assert!(matches!(result, Err(PlannerError::Io(_))));
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].description, "one");
    }

    #[test]
    fn edit_and_toggle_report_write_failure() {
        let (store, _temp) = unwritable_store();
        let mut tasks = open_tasks();

        let err = edit(&store, "alice", &mut tasks, 0, "uno", date(2024, 1, 5)).unwrap_err();
        assert!(matches!(err, PlannerError::Io(_)));
        assert_eq!(tasks[0].description, "uno");

        let err = toggle_complete(&store, "alice", &mut tasks, 1, true).unwrap_err();
        assert!(matches!(err, PlannerError::Io(_)));
        assert!(tasks[1].completed);
    }

    #[test]
    fn delete_and_purge_report_write_failure() {
        let (store, _temp) = unwritable_store();
        let mut tasks = open_tasks();

        let err = delete(&store, "alice", &mut tasks, 0).unwrap_err();
        assert!(matches!(err, PlannerError::Io(_)));
        assert_eq!(tasks.len(), 1);

        tasks[0].completed = true;
        let err = purge_completed(&store, "alice", tasks).unwrap_err();
        assert!(matches!(err, PlannerError::Io(_)));
    }
}
