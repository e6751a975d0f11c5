use std::path::PathBuf;

use tracing::{info, warn};

use crate::model::{GanttScale, Task};
use crate::ui::{self, GanttChart};

/// Bundled demo dataset, used when the app starts with no task source.
/// Standalone-demo plumbing only; a real host supplies its own tasks.
const DEMO_TASKS: &str = include_str!("../data/demo.json");

/// Main application state. Plays the host role: owns the task list, feeds it
/// to the chart, and applies the updated list the chart commits back.
pub struct GanttApp {
    pub tasks: Vec<Task>,
    pub chart: GanttChart,
    pub file_path: Option<PathBuf>,
    pub status_message: String,
}

impl GanttApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        ui::theme::apply_theme(&cc.egui_ctx);
        Self {
            tasks: demo_tasks(),
            chart: GanttChart::new(initial_scale()),
            file_path: None,
            status_message: "Ready".to_string(),
        }
    }

    /// The chart's commit callback: replace the task list wholesale.
    pub fn on_tasks_change(&mut self, updated: Vec<Task>) {
        let changed = updated
            .iter()
            .zip(&self.tasks)
            .find(|(new, old)| new.start != old.start || new.end != old.end)
            .map(|(new, _)| new.clone());
        self.tasks = updated;
        self.chart.invalidate();
        self.status_message = match changed {
            Some(task) => format!(
                "Updated '{}' ({} → {})",
                if task.name.is_empty() { &task.id } else { &task.name },
                task.start.format("%Y-%m-%d"),
                task.end.format("%Y-%m-%d")
            ),
            None => "Timeline updated".to_string(),
        };
    }

    // --- File operations (host plumbing) ---

    pub fn open_tasks(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Task JSON", &["json"])
            .pick_file()
        {
            match crate::io::load_tasks(&path) {
                Ok(tasks) => {
                    info!(count = tasks.len(), "loaded task list");
                    self.tasks = tasks;
                    self.file_path = Some(path);
                    self.chart.invalidate();
                    self.status_message = format!("Loaded {} tasks", self.tasks.len());
                }
                Err(e) => {
                    self.status_message = format!("Error loading: {}", e);
                }
            }
        }
    }

    pub fn save_tasks(&mut self) {
        if self.tasks.is_empty() {
            self.status_message = "Nothing to save".to_string();
            return;
        }
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Task JSON", &["json"])
            .set_file_name("tasks.json")
            .save_file()
        {
            match crate::io::save_tasks(&self.tasks, &path) {
                Ok(()) => {
                    self.file_path = Some(path);
                    self.status_message = "Tasks saved".to_string();
                }
                Err(e) => {
                    self.status_message = format!("Error saving: {}", e);
                }
            }
        }
    }

    pub fn load_demo_tasks(&mut self) {
        self.tasks = demo_tasks();
        self.file_path = None;
        self.chart.invalidate();
        self.status_message = "Demo data loaded".to_string();
    }
}

/// Starting scale, overridable by wire key (`GANTTVIEW_SCALE=weekly`).
/// An unknown key is a configuration error; it is reported here at the call
/// site and the default applies.
fn initial_scale() -> GanttScale {
    match std::env::var("GANTTVIEW_SCALE") {
        Ok(key) => GanttScale::from_key(&key).unwrap_or_else(|e| {
            warn!(error = %e, "falling back to daily scale");
            GanttScale::Day
        }),
        Err(_) => GanttScale::Day,
    }
}

fn demo_tasks() -> Vec<Task> {
    match serde_json::from_str(DEMO_TASKS) {
        Ok(tasks) => tasks,
        Err(e) => {
            warn!(error = %e, "bundled demo fixture failed to parse");
            Vec::new()
        }
    }
}

impl eframe::App for GanttApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Top panel: toolbar
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui::toolbar::show_toolbar(self, ui);
        });

        // Bottom panel: status bar
        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(24.0)
            .frame(
                egui::Frame::default()
                    .fill(ui::theme::BG_PANEL)
                    .inner_margin(egui::Margin::symmetric(10.0, 0.0)),
            )
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    ui.label(
                        egui::RichText::new(&self.status_message)
                            .font(ui::theme::font_status())
                            .color(ui::theme::TEXT_SECONDARY),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(
                            egui::RichText::new(format!("Tasks: {}", self.tasks.len()))
                                .size(10.5)
                                .color(ui::theme::TEXT_DIM),
                        );
                    });
                });
            });

        // Central panel: the chart
        let chart_frame = egui::Frame::default()
            .fill(ui::theme::BG_DARK)
            .inner_margin(egui::Margin::same(4.0));
        egui::CentralPanel::default().frame(chart_frame).show(ctx, |ui| {
            let interaction = self.chart.show(&self.tasks, ui);
            if let Some(updated) = interaction.committed {
                self.on_tasks_change(updated);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn demo_fixture_parses() {
        let tasks = demo_tasks();
        assert!(!tasks.is_empty());
        for task in &tasks {
            assert!(task.end >= task.start, "task {} has end < start", task.id);
        }
        // Every declared dependency resolves inside the fixture.
        for task in &tasks {
            for dep in &task.dependencies {
                assert!(
                    tasks.iter().any(|t| t.id == dep.target_id),
                    "dangling dependency {} -> {}",
                    task.id,
                    dep.target_id
                );
            }
        }
    }

    #[test]
    fn commit_replaces_the_task_list_and_reports_the_change() {
        let mut tasks = demo_tasks();
        let mut app = GanttApp {
            tasks: tasks.clone(),
            chart: GanttChart::new(GanttScale::Day),
            file_path: None,
            status_message: String::new(),
        };
        tasks[0].start += Duration::days(2);
        tasks[0].end += Duration::days(2);
        app.on_tasks_change(tasks.clone());
        assert_eq!(app.tasks[0].start, tasks[0].start);
        assert!(app.status_message.contains("Updated"));
    }
}
