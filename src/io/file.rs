use std::path::Path;

use crate::error::{GanttError, GanttResult};
use crate::model::Task;

/// Save a task list to a JSON file.
pub fn save_tasks(tasks: &[Task], path: &Path) -> GanttResult<()> {
    let json = serde_json::to_string_pretty(tasks)?;
    std::fs::write(path, json).map_err(|source| GanttError::Io {
        path: path.display().to_string(),
        source,
    })
}

/// Load a task list from a JSON file.
pub fn load_tasks(path: &Path) -> GanttResult<Vec<Task>> {
    let json = std::fs::read_to_string(path).map_err(|source| GanttError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(serde_json::from_str(&json)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn tasks_round_trip_through_a_file() {
        let dir = std::env::temp_dir().join("ganttview-io-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("tasks.json");

        let tasks = vec![Task::new(
            "A",
            "Kickoff",
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
        )];
        save_tasks(&tasks, &path).unwrap();
        let loaded = load_tasks(&path).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, "A");
        assert_eq!(loaded[0].start, tasks[0].start);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn missing_file_reports_its_path() {
        let err = load_tasks(Path::new("/nonexistent/tasks.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/tasks.json"));
    }
}
