use chrono::{Datelike, Duration, NaiveDate};

use crate::error::{GanttError, GanttResult};
use crate::model::{GanttScale, GroupingRule, Task};

/// One bottom-row header cell. `end` is exclusive, so consecutive cells share
/// a boundary and the sequence tiles the timeline without gaps.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineCell {
    pub label: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub width: f32,
}

impl TimelineCell {
    /// Calendar days spanned by this cell (varies for month cells even though
    /// the rendered width does not).
    pub fn span_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

/// One coarse top-row header group spanning a run of bottom cells.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderGroup {
    pub label: String,
    pub width: f32,
}

/// The computed timeline grid: the anchor for all later pixel math.
#[derive(Debug, Clone)]
pub struct Timeline {
    pub scale: GanttScale,
    /// Earliest task start across the input, reported back to the caller.
    pub min_date: NaiveDate,
    /// Latest task end across the input.
    pub max_date: NaiveDate,
    pub bottom_cells: Vec<TimelineCell>,
    pub top_groups: Vec<HeaderGroup>,
    pub total_width: f32,
}

impl Timeline {
    /// Build the grid covering every task's date range at the given scale.
    ///
    /// Bottom cells walk unit-aligned boundaries from the unit containing the
    /// earliest start through the unit containing the latest end, one
    /// fixed-width cell per unit.
    pub fn build(tasks: &[Task], scale: GanttScale) -> GanttResult<Self> {
        let min_date = tasks
            .iter()
            .map(|t| t.start)
            .min()
            .ok_or(GanttError::EmptyTasks)?;
        let max_date = tasks
            .iter()
            .map(|t| t.end)
            .max()
            .ok_or(GanttError::EmptyTasks)?;

        let width = scale.config().px_per_unit;
        let mut cells = Vec::new();
        let mut cursor = unit_floor(min_date, scale);
        while cursor <= max_date {
            let next = unit_next(cursor, scale);
            cells.push(TimelineCell {
                label: cell_label(cursor, scale),
                start: cursor,
                end: next,
                width,
            });
            cursor = next;
        }

        let top_groups = group_cells(&cells, scale);
        let total_width = cells.iter().map(|c| c.width).sum();

        Ok(Self {
            scale,
            min_date,
            max_date,
            bottom_cells: cells,
            top_groups,
            total_width,
        })
    }

    /// The date at pixel offset zero (start of the first cell).
    pub fn origin(&self) -> NaiveDate {
        self.bottom_cells[0].start
    }

    /// Convert a date to its x-pixel offset on the grid: the summed widths of
    /// every cell before the one containing it, plus a proportional offset
    /// inside that cell. Out-of-range dates clamp to the nearest edge.
    pub fn date_to_x(&self, date: NaiveDate) -> f32 {
        if date < self.origin() {
            return 0.0;
        }
        let mut x = 0.0;
        for cell in &self.bottom_cells {
            if date < cell.end {
                let into = (date - cell.start).num_days() as f32;
                return x + into / cell.span_days() as f32 * cell.width;
            }
            x += cell.width;
        }
        self.total_width
    }
}

/// Snap a date down to the start of the unit containing it.
fn unit_floor(date: NaiveDate, scale: GanttScale) -> NaiveDate {
    match scale {
        GanttScale::Day => date,
        GanttScale::Week => {
            date - Duration::days(date.weekday().num_days_from_monday() as i64)
        }
        GanttScale::Month => NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date),
    }
}

/// The start of the unit after the one beginning at `date`.
fn unit_next(date: NaiveDate, scale: GanttScale) -> NaiveDate {
    match scale {
        GanttScale::Day => date + Duration::days(1),
        GanttScale::Week => date + Duration::days(7),
        GanttScale::Month => {
            let (y, m) = if date.month() == 12 {
                (date.year() + 1, 1)
            } else {
                (date.year(), date.month() + 1)
            };
            NaiveDate::from_ymd_opt(y, m, 1).unwrap_or(date + Duration::days(30))
        }
    }
}

fn cell_label(start: NaiveDate, scale: GanttScale) -> String {
    match scale {
        GanttScale::Day => start.format("%d").to_string(),
        GanttScale::Week => start.format("W%V").to_string(),
        GanttScale::Month => start.format("%b").to_string(),
    }
}

fn group_key(cell_start: NaiveDate, rule: GroupingRule) -> (i32, u32) {
    match rule {
        GroupingRule::ByMonth => (cell_start.year(), cell_start.month()),
        GroupingRule::ByYear => (cell_start.year(), 0),
    }
}

fn group_label(cell_start: NaiveDate, rule: GroupingRule) -> String {
    match rule {
        GroupingRule::ByMonth => cell_start.format("%b %Y").to_string(),
        GroupingRule::ByYear => cell_start.format("%Y").to_string(),
    }
}

/// Roll consecutive bottom cells up into coarse header groups. A group's
/// width is the sum of its member cells' widths.
fn group_cells(cells: &[TimelineCell], scale: GanttScale) -> Vec<HeaderGroup> {
    let rule = scale.config().grouping;
    let mut groups: Vec<HeaderGroup> = Vec::new();
    let mut current_key = None;

    for cell in cells {
        let key = group_key(cell.start, rule);
        if current_key == Some(key) {
            if let Some(last) = groups.last_mut() {
                last.width += cell.width;
            }
        } else {
            groups.push(HeaderGroup {
                label: group_label(cell.start, rule),
                width: cell.width,
            });
            current_key = Some(key);
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn task(id: &str, start: NaiveDate, end: NaiveDate) -> Task {
        Task::new(id, id, start, end)
    }

    #[test]
    fn empty_task_list_is_an_error() {
        let err = Timeline::build(&[], GanttScale::Day).unwrap_err();
        assert!(matches!(err, GanttError::EmptyTasks));
    }

    #[test]
    fn daily_grid_spans_the_task_extremes() {
        let tasks = vec![
            task("A", date(2024, 1, 1), date(2024, 1, 5)),
            task("B", date(2024, 1, 3), date(2024, 1, 10)),
        ];
        let timeline = Timeline::build(&tasks, GanttScale::Day).unwrap();

        assert_eq!(timeline.min_date, date(2024, 1, 1));
        assert_eq!(timeline.max_date, date(2024, 1, 10));
        assert_eq!(timeline.bottom_cells.len(), 10);
        assert_abs_diff_eq!(timeline.total_width, 10.0 * 48.0);
        assert_eq!(timeline.bottom_cells[0].label, "01");
        assert_eq!(timeline.bottom_cells[9].label, "10");
    }

    #[test]
    fn daily_cells_group_by_month() {
        let tasks = vec![task("A", date(2024, 1, 30), date(2024, 2, 2))];
        let timeline = Timeline::build(&tasks, GanttScale::Day).unwrap();

        assert_eq!(timeline.top_groups.len(), 2);
        assert_eq!(timeline.top_groups[0].label, "Jan 2024");
        assert_abs_diff_eq!(timeline.top_groups[0].width, 2.0 * 48.0);
        assert_eq!(timeline.top_groups[1].label, "Feb 2024");
        assert_abs_diff_eq!(timeline.top_groups[1].width, 2.0 * 48.0);
    }

    #[test]
    fn weekly_cells_snap_to_monday() {
        // 2024-01-03 is a Wednesday; its week cell starts Monday 2024-01-01.
        let tasks = vec![task("A", date(2024, 1, 3), date(2024, 1, 16))];
        let timeline = Timeline::build(&tasks, GanttScale::Week).unwrap();

        assert_eq!(timeline.bottom_cells[0].start, date(2024, 1, 1));
        assert_eq!(timeline.bottom_cells[0].label, "W01");
        assert_eq!(timeline.bottom_cells.len(), 3);
        for cell in &timeline.bottom_cells {
            assert_eq!(cell.span_days(), 7);
        }
    }

    #[test]
    fn month_cells_have_fixed_width_regardless_of_day_count() {
        // February (29 days in 2024) and July (31) render identically wide.
        let tasks = vec![task("A", date(2024, 2, 10), date(2024, 7, 20))];
        let timeline = Timeline::build(&tasks, GanttScale::Month).unwrap();

        assert_eq!(timeline.bottom_cells.len(), 6);
        for cell in &timeline.bottom_cells {
            assert_abs_diff_eq!(cell.width, 120.0);
        }
        assert_eq!(timeline.bottom_cells[0].span_days(), 29);
        assert_eq!(timeline.bottom_cells[5].span_days(), 31);
        // Monthly scale groups by year.
        assert_eq!(timeline.top_groups.len(), 1);
        assert_eq!(timeline.top_groups[0].label, "2024");
        assert_abs_diff_eq!(timeline.top_groups[0].width, 6.0 * 120.0);
    }

    #[test]
    fn date_to_x_is_proportional_inside_a_month_cell() {
        let tasks = vec![task("A", date(2024, 1, 1), date(2024, 3, 15))];
        let timeline = Timeline::build(&tasks, GanttScale::Month).unwrap();

        assert_abs_diff_eq!(timeline.date_to_x(date(2024, 1, 1)), 0.0);
        // Jan 17 is 16 days into a 31-day cell.
        assert_abs_diff_eq!(
            timeline.date_to_x(date(2024, 1, 17)),
            16.0 / 31.0 * 120.0,
            epsilon = 1e-4
        );
        assert_abs_diff_eq!(timeline.date_to_x(date(2024, 2, 1)), 120.0);
    }

    #[test]
    fn out_of_range_dates_clamp_to_the_grid_edges() {
        let tasks = vec![task("A", date(2024, 1, 5), date(2024, 1, 10))];
        let timeline = Timeline::build(&tasks, GanttScale::Day).unwrap();

        assert_abs_diff_eq!(timeline.date_to_x(date(2023, 12, 1)), 0.0);
        assert_abs_diff_eq!(timeline.date_to_x(date(2024, 6, 1)), timeline.total_width);
    }

    proptest! {
        /// Cells are contiguous, non-overlapping, and cover the full task span
        /// for every scale.
        #[test]
        fn cells_tile_the_span(
            start_off in 0i64..800,
            len_a in 0i64..120,
            off_b in -60i64..60,
            len_b in 0i64..120,
            scale_idx in 0usize..3,
        ) {
            let base = date(2023, 6, 1) + Duration::days(start_off);
            let b_start = base + Duration::days(off_b);
            let tasks = vec![
                task("A", base, base + Duration::days(len_a)),
                task("B", b_start, b_start + Duration::days(len_b)),
            ];
            let scale = GanttScale::ALL[scale_idx];
            let timeline = Timeline::build(&tasks, scale).unwrap();

            let cells = &timeline.bottom_cells;
            prop_assert!(cells[0].start <= timeline.min_date);
            prop_assert!(cells[cells.len() - 1].end > timeline.max_date);
            for pair in cells.windows(2) {
                prop_assert_eq!(pair[0].end, pair[1].start);
            }
            let group_width: f32 = timeline.top_groups.iter().map(|g| g.width).sum();
            prop_assert!((group_width - timeline.total_width).abs() < 1e-3);
        }
    }
}
