use egui::RichText;
use egui_extras::{Column, TableBuilder};

use super::ui_types::App;

impl App {
    pub fn progress_panel(&mut self, ui: &mut egui::Ui) {
        // errors at the top of the panel
        if !self.errors.is_empty() {
            ui.heading("Errors");
            ui.horizontal(|ui| {
                if ui.button("Clear All").clicked() {
                    self.errors.clear();
                }

                let error_count = self.errors.len();
                ui.label(format!(
                    "({} error{})",
                    error_count,
                    if error_count == 1 { "" } else { "s" }
                ));
            });

            egui::ScrollArea::vertical()
                .id_salt("errors")
                .max_height(150.0)
                .show(ui, |ui| {
                    for error in self.errors.iter().rev() {
                        ui.label(
                            RichText::new(error).color(egui::Color32::from_rgb(255, 100, 100)),
                        );
                        ui.separator();
                    }
                });

            ui.separator();
        }

        let Some(session) = self.session.as_ref() else {
            return;
        };

        ui.heading("Labeled");
        ui.label(format!(
            "{} done, {} remaining",
            session.ledger().len(),
            session.remaining()
        ));
        ui.separator();

        // newest first
        TableBuilder::new(ui)
            .striped(true)
            .column(Column::remainder())
            .column(Column::auto())
            .header(18.0, |mut header| {
                header.col(|ui| {
                    ui.strong("fileID");
                });
                header.col(|ui| {
                    ui.strong("num");
                });
            })
            .body(|mut body| {
                for record in session.ledger().records().iter().rev() {
                    body.row(16.0, |mut row| {
                        row.col(|ui| {
                            ui.label(record.file_id.as_str());
                        });
                        row.col(|ui| {
                            ui.label(record.num.to_string());
                        });
                    });
                }
            });
    }
}
