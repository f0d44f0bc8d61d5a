use anyhow::{anyhow, bail, ensure, Context, Result};
use tracing::{debug, error, info, trace, warn};

use crate::ui::ui_types::App;

/// View options, persisted across launches via eframe storage.
#[derive(serde::Serialize, serde::Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Options {
    pub marker_radius: u32,
    pub image_scale: f64,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            marker_radius: 20,
            image_scale: 1.0,
        }
    }
}

impl App {
    pub fn options(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            self._options(ui);
        });
    }

    fn _options(&mut self, ui: &mut egui::Ui) {
        egui::widgets::global_theme_preference_buttons(ui);

        ui.horizontal(|ui| {
            ui.label("Marker radius:");
            let resp = ui.add(
                egui::DragValue::new(&mut self.options.marker_radius)
                    .speed(0.5)
                    .range(2..=60),
            );
            crate::ui::utils::scroll_to_adjust(ui, &resp, &mut self.options.marker_radius, 1);
        });

        ui.horizontal(|ui| {
            ui.label("Scale:");
            ui.radio_value(&mut self.options.image_scale, 0.5, "x0.5");
            ui.radio_value(&mut self.options.image_scale, 1.0, "x1.0");
        });
    }
}
