use egui::{menu, RichText, Ui};

use crate::app::GanttApp;
use crate::model::GanttScale;
use crate::ui::theme;

/// Render the top toolbar / menu bar.
pub fn show_toolbar(app: &mut GanttApp, ui: &mut Ui) {
    menu::bar(ui, |ui| {
        ui.menu_button(RichText::new("  File  ").font(theme::font_menu()), |ui| {
            if ui.button("  Open Tasks...").clicked() {
                app.open_tasks();
                ui.close_menu();
            }
            if ui.button("  Save Tasks...").clicked() {
                app.save_tasks();
                ui.close_menu();
            }
            ui.separator();
            if ui.button("  Load Demo Data").clicked() {
                app.load_demo_tasks();
                ui.close_menu();
            }
        });

        ui.menu_button(RichText::new("  View  ").font(theme::font_menu()), |ui| {
            ui.label(RichText::new("Timeline Scale").small().weak());
            for scale in GanttScale::ALL {
                let selected = app.chart.scale() == scale;
                if ui.radio(selected, scale.config().label_unit).clicked() {
                    app.chart.set_scale(scale);
                    ui.close_menu();
                }
            }
        });

        // Right-aligned source file name.
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let label = app
                .file_path
                .as_ref()
                .and_then(|p| p.file_name())
                .and_then(|n| n.to_str())
                .unwrap_or("demo data");
            ui.label(RichText::new(label).size(11.0).weak());
        });
    });
}
