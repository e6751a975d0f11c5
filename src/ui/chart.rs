use chrono::Duration;
use egui::{Pos2, Rect, Rounding, Sense, Stroke, Ui, Vec2};

use crate::layout::{resolve_arrows, transform, DragEngine, DragMode, Timeline, TaskTransformed};
use crate::model::{GanttScale, Task};
use crate::ui::theme;

const ROW_HEIGHT: f32 = theme::ROW_HEIGHT;
const HEADER_HEIGHT: f32 = theme::HEADER_HEIGHT;
const HANDLE_WIDTH: f32 = theme::HANDLE_WIDTH;

/// What the chart reported back to its host this frame.
#[derive(Debug, Default)]
pub struct ChartInteraction {
    /// The full updated task list, present exactly when a drag committed.
    /// The chart never emits a partial list.
    pub committed: Option<Vec<Task>>,
}

/// One chart instance: owns the derived layout state (timeline grid,
/// transformed bars, drag engine) for the task list its host feeds it.
/// Derived state is recomputed when the host invalidates or the scale
/// changes, never stored beyond that.
pub struct GanttChart {
    scale: GanttScale,
    timeline: Option<Timeline>,
    bars: Vec<TaskTransformed>,
    drag: DragEngine,
    stale: bool,
}

impl GanttChart {
    pub fn new(scale: GanttScale) -> Self {
        Self {
            scale,
            timeline: None,
            bars: Vec::new(),
            drag: DragEngine::default(),
            stale: true,
        }
    }

    pub fn scale(&self) -> GanttScale {
        self.scale
    }

    pub fn set_scale(&mut self, scale: GanttScale) {
        if self.scale != scale {
            self.scale = scale;
            self.stale = true;
        }
    }

    /// Tell the chart the task list changed; layout is rebuilt on next show.
    pub fn invalidate(&mut self) {
        self.stale = true;
    }

    fn rebuild(&mut self, tasks: &[Task]) {
        match Timeline::build(tasks, self.scale) {
            Ok(timeline) => {
                self.bars = transform(tasks, &timeline);
                self.timeline = Some(timeline);
            }
            // Empty input: nothing to lay out. The host may swap in demo
            // data; until then the chart renders a placeholder.
            Err(_) => {
                self.timeline = None;
                self.bars.clear();
            }
        }
        self.stale = false;
    }

    /// Render the chart and process bar interactions for one frame.
    pub fn show(&mut self, tasks: &[Task], ui: &mut Ui) -> ChartInteraction {
        if self.stale {
            self.rebuild(tasks);
        }

        let mut interaction = ChartInteraction::default();

        // Scale selector, top right (changing it only affects derived layout).
        ui.horizontal(|ui| {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let mut selected = self.scale;
                egui::ComboBox::from_id_salt("scale-selector")
                    .selected_text(selected.config().label_unit)
                    .show_ui(ui, |ui| {
                        for scale in GanttScale::ALL {
                            ui.selectable_value(
                                &mut selected,
                                scale,
                                scale.config().label_unit,
                            );
                        }
                    });
                self.set_scale(selected);
            });
        });
        ui.separator();

        if self.stale {
            self.rebuild(tasks);
        }

        let Some(timeline) = self.timeline.clone() else {
            ui.centered_and_justified(|ui| {
                ui.label(
                    egui::RichText::new("No tasks to display")
                        .font(theme::font_header())
                        .color(theme::TEXT_DIM),
                );
            });
            return interaction;
        };

        // Bars with any in-flight drag preview applied. Only the dragged
        // task is recomputed; the grid itself stays anchored until commit.
        let display: Vec<TaskTransformed> = self
            .bars
            .iter()
            .map(|bar| match self.drag.preview_for(&bar.task.id) {
                Some((start, end)) => {
                    let bar_left = timeline.date_to_x(start);
                    let bar_end = timeline.date_to_x(end + Duration::days(1));
                    let mut task = bar.task.clone();
                    task.start = start;
                    task.end = end;
                    TaskTransformed {
                        task,
                        bar_left,
                        bar_width: (bar_end - bar_left).max(0.0),
                        order: bar.order,
                    }
                }
                None => bar.clone(),
            })
            .collect();

        let available = ui.available_size();
        let chart_width = timeline.total_width.max(available.x);
        let chart_height = HEADER_HEIGHT + display.len() as f32 * ROW_HEIGHT + 16.0;

        egui::ScrollArea::both()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                let (response, painter) = ui.allocate_painter(
                    Vec2::new(chart_width, chart_height.max(available.y)),
                    Sense::hover(),
                );
                let origin = response.rect.min;
                let rows_origin = Pos2::new(origin.x, origin.y + HEADER_HEIGHT);

                painter.rect_filled(response.rect, 0.0, theme::BG_DARK);

                draw_header(&painter, origin, &timeline, chart_width, chart_height);
                draw_rows(&painter, rows_origin, display.len(), chart_width);

                for (index, bar) in display.iter().enumerate() {
                    let committed = self.interact_bar(ui, &painter, rows_origin, bar, index, tasks);
                    if committed.is_some() {
                        interaction.committed = committed;
                    }
                }

                // Lost pointer capture with no release event: fall back to
                // cancelled rather than leave a half-applied drag.
                if self.drag.is_active()
                    && interaction.committed.is_none()
                    && !ui.input(|i| i.pointer.any_down())
                {
                    self.drag.cancel();
                }

                draw_arrows(&painter, rows_origin, &display);
            });

        interaction
    }

    /// Draw one bar and run its move/resize interactions. Returns the full
    /// updated task list when a drag on this bar commits.
    fn interact_bar(
        &mut self,
        ui: &mut Ui,
        painter: &egui::Painter,
        rows_origin: Pos2,
        bar: &TaskTransformed,
        index: usize,
        tasks: &[Task],
    ) -> Option<Vec<Task>> {
        let y = rows_origin.y + index as f32 * ROW_HEIGHT;
        let bar_rect = Rect::from_min_size(
            Pos2::new(rows_origin.x + bar.bar_left, y + theme::BAR_INSET),
            Vec2::new(bar.bar_width.max(6.0), ROW_HEIGHT - theme::BAR_INSET * 2.0),
        );

        draw_bar(painter, bar, bar_rect, index);

        let bar_response = ui.interact(
            bar_rect,
            ui.make_persistent_id(("task-bar", &bar.task.id)),
            Sense::click_and_drag(),
        );
        let left_handle = Rect::from_min_max(
            Pos2::new(bar_rect.left() - HANDLE_WIDTH * 0.5, bar_rect.top()),
            Pos2::new(bar_rect.left() + HANDLE_WIDTH * 0.5, bar_rect.bottom()),
        );
        let right_handle = Rect::from_min_max(
            Pos2::new(bar_rect.right() - HANDLE_WIDTH * 0.5, bar_rect.top()),
            Pos2::new(bar_rect.right() + HANDLE_WIDTH * 0.5, bar_rect.bottom()),
        );
        let left_response = ui.interact(
            left_handle.expand(4.0),
            ui.make_persistent_id(("task-resize-left", &bar.task.id)),
            Sense::drag(),
        );
        let right_response = ui.interact(
            right_handle.expand(4.0),
            ui.make_persistent_id(("task-resize-right", &bar.task.id)),
            Sense::drag(),
        );

        for (response, mode) in [
            (&left_response, DragMode::ResizeLeft),
            (&right_response, DragMode::ResizeRight),
            (&bar_response, DragMode::Move),
        ] {
            if response.drag_started() {
                let ptr_x = response.interact_pointer_pos().map(|p| p.x).unwrap_or(0.0);
                self.drag.begin(&bar.task, mode, ptr_x);
            }
        }

        if left_response.dragged() || right_response.dragged() {
            ui.ctx().set_cursor_icon(egui::CursorIcon::ResizeHorizontal);
            let ptr_x = left_response
                .interact_pointer_pos()
                .or_else(|| right_response.interact_pointer_pos())
                .map(|p| p.x)
                .unwrap_or(0.0);
            self.drag.update(ptr_x, self.scale);
        } else if bar_response.dragged() {
            ui.ctx().set_cursor_icon(egui::CursorIcon::Grab);
            let ptr_x = bar_response.interact_pointer_pos().map(|p| p.x).unwrap_or(0.0);
            self.drag.update(ptr_x, self.scale);
        }

        let mut committed = None;
        if bar_response.drag_stopped()
            || left_response.drag_stopped()
            || right_response.drag_stopped()
        {
            if let Some(result) = self.drag.commit() {
                let updated: Vec<Task> = tasks
                    .iter()
                    .cloned()
                    .map(|mut task| {
                        if task.id == result.task_id {
                            task.start = result.start;
                            task.end = result.end;
                        }
                        task
                    })
                    .collect();
                committed = Some(updated);
                self.stale = true;
            }
        }

        // Handle affordances on hover.
        if left_response.hovered() || right_response.hovered() {
            ui.ctx().set_cursor_icon(egui::CursorIcon::ResizeHorizontal);
            let handle_h = bar_rect.height() * 0.55;
            let handle_y = bar_rect.center().y - handle_h / 2.0;
            for x in [bar_rect.left() - 1.5, bar_rect.right() - 2.5] {
                painter.rect_filled(
                    Rect::from_min_size(Pos2::new(x, handle_y), Vec2::new(4.0, handle_h)),
                    Rounding::same(2.0),
                    theme::HANDLE_COLOR,
                );
            }
        } else if bar_response.hovered() {
            ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
        }

        if bar_response.hovered() || left_response.hovered() || right_response.hovered() {
            egui::show_tooltip_at_pointer(
                ui.ctx(),
                ui.layer_id(),
                egui::Id::new(("task-tip", &bar.task.id)),
                |ui| {
                    ui.strong(&bar.task.name);
                    ui.label(format!(
                        "{} → {}",
                        bar.task.start.format("%Y-%m-%d"),
                        bar.task.end.format("%Y-%m-%d"),
                    ));
                },
            );
        }

        committed
    }
}

fn draw_header(
    painter: &egui::Painter,
    origin: Pos2,
    timeline: &Timeline,
    width: f32,
    chart_height: f32,
) {
    painter.rect_filled(
        Rect::from_min_size(origin, Vec2::new(width, HEADER_HEIGHT)),
        0.0,
        theme::BG_HEADER,
    );

    let mid_y = origin.y + HEADER_HEIGHT / 2.0;

    // Top row: coarse groups.
    let mut x = origin.x;
    for group in &timeline.top_groups {
        painter.line_segment(
            [Pos2::new(x, origin.y), Pos2::new(x, mid_y)],
            Stroke::new(0.5, theme::BORDER_SUBTLE),
        );
        painter.text(
            Pos2::new(x + 4.0, origin.y + HEADER_HEIGHT * 0.25),
            egui::Align2::LEFT_CENTER,
            &group.label,
            theme::font_header(),
            theme::TEXT_PRIMARY,
        );
        x += group.width;
    }

    // Bottom row: one cell per unit, with grid lines down the chart body.
    let mut x = origin.x;
    for cell in &timeline.bottom_cells {
        painter.line_segment(
            [Pos2::new(x, mid_y), Pos2::new(x, origin.y + chart_height)],
            Stroke::new(0.5, theme::GRID_LINE),
        );
        painter.text(
            Pos2::new(x + cell.width / 2.0, origin.y + HEADER_HEIGHT * 0.75),
            egui::Align2::CENTER_CENTER,
            &cell.label,
            theme::font_sub(),
            theme::TEXT_SECONDARY,
        );
        x += cell.width;
    }

    painter.line_segment(
        [
            Pos2::new(origin.x, origin.y + HEADER_HEIGHT),
            Pos2::new(origin.x + width, origin.y + HEADER_HEIGHT),
        ],
        Stroke::new(1.0, theme::BORDER_SUBTLE),
    );
}

fn draw_rows(painter: &egui::Painter, rows_origin: Pos2, count: usize, width: f32) {
    for i in 0..count {
        let y = rows_origin.y + i as f32 * ROW_HEIGHT;
        if i % 2 == 0 {
            painter.rect_filled(
                Rect::from_min_size(Pos2::new(rows_origin.x, y), Vec2::new(width, ROW_HEIGHT)),
                0.0,
                theme::BG_PANEL,
            );
        }
        painter.line_segment(
            [
                Pos2::new(rows_origin.x, y + ROW_HEIGHT),
                Pos2::new(rows_origin.x + width, y + ROW_HEIGHT),
            ],
            Stroke::new(0.5, theme::BORDER_SUBTLE),
        );
    }
}

fn draw_bar(painter: &egui::Painter, bar: &TaskTransformed, bar_rect: Rect, index: usize) {
    let rounding = Rounding::same(theme::BAR_ROUNDING);
    let color = theme::task_color(index);

    let shadow_rect = bar_rect.translate(Vec2::new(1.0, 2.0));
    painter.rect_filled(shadow_rect, rounding, egui::Color32::from_black_alpha(35));
    painter.rect_filled(bar_rect, rounding, color);

    // Task name on bar (single line, clipped to bar bounds).
    if bar_rect.width() > 30.0 && !bar.task.name.is_empty() {
        let galley = painter.layout_no_wrap(
            bar.task.name.clone(),
            theme::font_bar(),
            theme::TEXT_ON_BAR,
        );
        let clipped = painter.with_clip_rect(bar_rect);
        let text_y = bar_rect.top() + (bar_rect.height() - galley.size().y) / 2.0;
        clipped.galley(
            Pos2::new(bar_rect.left() + 6.0, text_y),
            galley,
            egui::Color32::TRANSPARENT,
        );
    }
}

fn draw_arrows(painter: &egui::Painter, rows_origin: Pos2, display: &[TaskTransformed]) {
    let offset = rows_origin.to_vec2();
    for route in resolve_arrows(display, ROW_HEIGHT) {
        let points: Vec<Pos2> = route.points.iter().map(|p| *p + offset).collect();
        painter.add(egui::Shape::line(
            points,
            Stroke::new(1.5, theme::ARROW_COLOR),
        ));

        let head: Vec<Pos2> = route
            .arrowhead(theme::ARROW_HEAD)
            .iter()
            .map(|p| *p + offset)
            .collect();
        painter.add(egui::Shape::convex_polygon(
            head,
            theme::ARROW_COLOR,
            Stroke::NONE,
        ));
    }
}
