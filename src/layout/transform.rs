use chrono::Duration;
use tracing::warn;

use crate::layout::timeline::Timeline;
use crate::model::Task;

/// A task plus its derived bar geometry. Recomputed whenever the task list or
/// scale changes; never stored independently of its source task.
#[derive(Debug, Clone)]
pub struct TaskTransformed {
    pub task: Task,
    /// Pixel offset of the bar's left edge from the grid origin.
    pub bar_left: f32,
    pub bar_width: f32,
    /// 1-based vertical rank, matching the task's position in the input list.
    pub order: usize,
}

impl TaskTransformed {
    pub fn bar_right(&self) -> f32 {
        self.bar_left + self.bar_width
    }
}

/// Map every task's date range onto the grid's pixel scale.
///
/// The right edge sits on the boundary after the task's last occupied day, so
/// a task whose start and end coincide is still one day wide. Dates outside
/// the grid clamp to the nearest edge instead of failing; they indicate a
/// stale grid and resolve on the next rebuild.
pub fn transform(tasks: &[Task], timeline: &Timeline) -> Vec<TaskTransformed> {
    tasks
        .iter()
        .enumerate()
        .map(|(index, task)| {
            if task.start < timeline.min_date || task.end > timeline.max_date {
                warn!(
                    task = %task.id,
                    "task dates fall outside the timeline grid; clamping"
                );
            }
            let bar_left = timeline.date_to_x(task.start);
            let bar_end = timeline.date_to_x(task.end + Duration::days(1));
            TaskTransformed {
                task: task.clone(),
                bar_left,
                bar_width: (bar_end - bar_left).max(0.0),
                order: index + 1,
            }
        })
        .collect()
}
