use chrono::{Duration, NaiveDate};
use tracing::{debug, warn};

use crate::model::{GanttScale, Task};

/// Which part of the bar the pointer grabbed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragMode {
    /// Grab anywhere on the bar body: both dates shift, duration preserved.
    Move,
    /// Left handle: only the start date moves.
    ResizeLeft,
    /// Right handle: only the end date moves.
    ResizeRight,
}

#[derive(Debug, Clone)]
struct ActiveDrag {
    task_id: String,
    mode: DragMode,
    origin_start: NaiveDate,
    origin_end: NaiveDate,
    origin_pointer_x: f32,
    preview: (NaiveDate, NaiveDate),
}

/// Final dates produced by a committed drag.
#[derive(Debug, Clone)]
pub struct DragResult {
    pub task_id: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// One drag gesture at a time: Idle until `begin`, Active through `update`,
/// back to Idle via `commit` or `cancel`.
///
/// The engine never touches the shared task list. It hands out provisional
/// dates for live feedback and a single `DragResult` at commit; applying
/// either is the caller's business.
#[derive(Debug, Default)]
pub struct DragEngine {
    active: Option<ActiveDrag>,
}

impl DragEngine {
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Provisional dates for the task currently being dragged, if any.
    pub fn preview_for(&self, task_id: &str) -> Option<(NaiveDate, NaiveDate)> {
        self.active
            .as_ref()
            .filter(|drag| drag.task_id == task_id)
            .map(|drag| drag.preview)
    }

    /// Start tracking a drag. A second pointer-down while a drag is active is
    /// ignored; the current gesture must resolve first.
    pub fn begin(&mut self, task: &Task, mode: DragMode, pointer_x: f32) {
        if let Some(active) = &self.active {
            warn!(
                task = %task.id,
                active = %active.task_id,
                "ignoring drag start while another drag is active"
            );
            return;
        }
        debug!(task = %task.id, ?mode, "drag started");
        self.active = Some(ActiveDrag {
            task_id: task.id.clone(),
            mode,
            origin_start: task.start,
            origin_end: task.end,
            origin_pointer_x: pointer_x,
            preview: (task.start, task.end),
        });
    }

    /// Feed the latest pointer x-position. Converts the accumulated pixel
    /// delta to whole days under the scale and returns the provisional dates.
    /// Resizes clamp at a one-day minimum duration; the bar stops shrinking
    /// rather than the gesture failing.
    pub fn update(&mut self, pointer_x: f32, scale: GanttScale) -> Option<(NaiveDate, NaiveDate)> {
        let drag = self.active.as_mut()?;
        let delta_days =
            ((pointer_x - drag.origin_pointer_x) / scale.px_per_day()).round() as i64;
        let delta = Duration::days(delta_days);

        drag.preview = match drag.mode {
            DragMode::Move => (drag.origin_start + delta, drag.origin_end + delta),
            DragMode::ResizeLeft => {
                let start = (drag.origin_start + delta)
                    .min(drag.origin_end - Duration::days(1));
                (start, drag.origin_end)
            }
            DragMode::ResizeRight => {
                let end = (drag.origin_end + delta)
                    .max(drag.origin_start + Duration::days(1));
                (drag.origin_start, end)
            }
        };
        Some(drag.preview)
    }

    /// Resolve the gesture, yielding the final dates exactly once.
    pub fn commit(&mut self) -> Option<DragResult> {
        let drag = self.active.take()?;
        debug!(task = %drag.task_id, "drag committed");
        Some(DragResult {
            task_id: drag.task_id,
            start: drag.preview.0,
            end: drag.preview.1,
        })
    }

    /// Discard the gesture, e.g. on lost pointer capture. The provisional
    /// dates are dropped and nothing reaches the task list.
    pub fn cancel(&mut self) {
        if let Some(drag) = self.active.take() {
            debug!(task = %drag.task_id, "drag cancelled");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn task() -> Task {
        Task::new("A", "A", date(5), date(10))
    }

    #[test]
    fn move_shifts_both_dates_and_preserves_duration() {
        let mut engine = DragEngine::default();
        let task = task();
        engine.begin(&task, DragMode::Move, 100.0);

        // +2 day-widths at daily scale (48 px/day).
        let (start, end) = engine.update(100.0 + 96.0, GanttScale::Day).unwrap();
        assert_eq!(start, date(7));
        assert_eq!(end, date(12));
        assert_eq!((end - start).num_days(), task.duration_days());

        let result = engine.commit().unwrap();
        assert_eq!(result.task_id, "A");
        assert_eq!(result.start, date(7));
        assert!(!engine.is_active());
    }

    #[test]
    fn move_round_trips_back_to_the_origin() {
        let mut engine = DragEngine::default();
        let task = task();
        engine.begin(&task, DragMode::Move, 0.0);
        engine.update(3.0 * 48.0, GanttScale::Day).unwrap();
        // Deltas are measured from the gesture origin, so returning the
        // pointer returns the dates.
        let (start, end) = engine.update(0.0, GanttScale::Day).unwrap();
        assert_eq!(start, task.start);
        assert_eq!(end, task.end);
    }

    #[test]
    fn left_resize_moves_only_the_start() {
        let mut engine = DragEngine::default();
        engine.begin(&task(), DragMode::ResizeLeft, 0.0);
        let (start, end) = engine.update(-2.0 * 48.0, GanttScale::Day).unwrap();
        assert_eq!(start, date(3));
        assert_eq!(end, date(10));
    }

    #[test]
    fn left_resize_clamps_at_one_day_before_the_end() {
        let mut engine = DragEngine::default();
        engine.begin(&task(), DragMode::ResizeLeft, 0.0);
        let (start, end) = engine.update(20.0 * 48.0, GanttScale::Day).unwrap();
        assert_eq!(start, date(9));
        assert_eq!(end, date(10));
    }

    #[test]
    fn right_resize_clamps_at_one_day_after_the_start() {
        let mut engine = DragEngine::default();
        engine.begin(&task(), DragMode::ResizeRight, 0.0);
        let (start, end) = engine.update(-20.0 * 48.0, GanttScale::Day).unwrap();
        assert_eq!(start, date(5));
        assert_eq!(end, date(6));
    }

    #[test]
    fn weekly_scale_converts_pixels_at_its_own_rate() {
        let mut engine = DragEngine::default();
        engine.begin(&task(), DragMode::Move, 0.0);
        // One week cell is 84 px, so 12 px per day.
        let (start, _) = engine.update(24.0, GanttScale::Week).unwrap();
        assert_eq!(start, date(7));
    }

    #[test]
    fn overlapping_drag_start_is_ignored() {
        let mut engine = DragEngine::default();
        let first = task();
        let second = Task::new("B", "B", date(1), date(2));
        engine.begin(&first, DragMode::Move, 0.0);
        engine.begin(&second, DragMode::ResizeRight, 50.0);

        engine.update(48.0, GanttScale::Day).unwrap();
        let result = engine.commit().unwrap();
        assert_eq!(result.task_id, "A");
    }

    #[test]
    fn cancel_discards_the_provisional_state() {
        let mut engine = DragEngine::default();
        engine.begin(&task(), DragMode::Move, 0.0);
        engine.update(5.0 * 48.0, GanttScale::Day).unwrap();
        engine.cancel();
        assert!(!engine.is_active());
        assert!(engine.commit().is_none());
    }

    #[test]
    fn update_without_begin_is_a_no_op() {
        let mut engine = DragEngine::default();
        assert!(engine.update(100.0, GanttScale::Day).is_none());
    }
}
