pub mod progress;
pub mod ui_types;
pub mod utils;
pub mod viewer;

use ui_types::*;

use anyhow::{anyhow, bail, ensure, Context, Result};
use tracing::{debug, error, info, trace, warn};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use egui::RichText;

use crate::session::{InputEvent, Session, Step};

/// New
impl App {
    /// Called once before the first frame.
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        session: Session,
        completed: Arc<AtomicBool>,
    ) -> Self {
        let mut out: Self = if let Some(storage) = cc.storage {
            eframe::get_value(storage, eframe::APP_KEY).unwrap_or_default()
        } else {
            Default::default()
        };

        if let Err(e) = crate::appconfig::read_options_from_file(
            crate::appconfig::CONFIG_FILE_NAME,
            &mut out.options,
        ) {
            debug!("Failed to read options from file: {}", e);
        }

        out.session = Some(session);
        out.completed = completed;
        out
    }
}

/// event dispatch
impl App {
    pub fn dispatch(&mut self, ctx: &egui::Context, event: InputEvent) {
        let Some(session) = self.session.as_mut() else {
            return;
        };

        match session.apply(event) {
            Ok(Step::Continue) => {}
            Ok(Step::Committed) => {
                // drop the texture so the next image gets decoded
                self.texture = None;
                self.texture_file = None;
            }
            Ok(Step::Finished) => {
                self.completed.store(true, Ordering::SeqCst);
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            }
            Ok(Step::Aborted) => {
                info!("quit requested, remaining images left for a later run");
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            }
            Err(e) => {
                error!("Failed to commit annotations: {}", e);
                self.errors.push(format!("Failed to commit annotations: {}", e));
                // a failed commit ends the run; prior commits are already on disk
                let _ = session.apply(InputEvent::Quit);
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            }
        }
    }
}

/// controls
impl App {
    fn controls(&mut self, ui: &mut egui::Ui) {
        let ctx = ui.ctx().clone();

        ui.horizontal(|ui| {
            if ui.button(RichText::new("Next (N)").size(16.)).clicked() {
                self.dispatch(&ctx, InputEvent::Next);
            }
            if ui.button(RichText::new("Reset (R)").size(16.)).clicked() {
                self.dispatch(&ctx, InputEvent::Reset);
            }
            if ui.button(RichText::new("Quit (Q)").size(16.)).clicked() {
                self.dispatch(&ctx, InputEvent::Quit);
            }

            ui.separator();

            ui.label("Marker radius:");
            let resp = ui.add(
                egui::DragValue::new(&mut self.options.marker_radius)
                    .speed(0.5)
                    .range(2..=60),
            );
            utils::scroll_to_adjust(ui, &resp, &mut self.options.marker_radius, 1);

            if let Some(capture) = self.session.as_ref().and_then(|s| s.current()) {
                ui.separator();
                ui.label(format!("{} points", capture.points().len()));
            }
        });
    }
}

impl eframe::App for App {
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, self);
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        /// keyboard shortcuts
        if ctx.input(|i| i.key_pressed(egui::Key::Escape) || i.key_pressed(egui::Key::Q)) {
            self.dispatch(ctx, InputEvent::Quit);
            return;
        }
        if ctx.input(|i| i.key_pressed(egui::Key::N)) {
            self.dispatch(ctx, InputEvent::Next);
        }
        if ctx.input(|i| i.key_pressed(egui::Key::R)) {
            self.dispatch(ctx, InputEvent::Reset);
        }

        /// advance to the next unlabeled image
        if let Some(session) = self.session.as_mut() {
            if !session.is_aborted()
                && session.current().is_none()
                && session.begin_next().is_none()
            {
                self.completed.store(true, Ordering::SeqCst);
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                return;
            }
        }

        egui::TopBottomPanel::top("tabs").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.selectable_value(&mut self.current_tab, Tab::Annotate, "Annotate");
                ui.selectable_value(&mut self.current_tab, Tab::Options, "Options");
            });
        });

        match self.current_tab {
            Tab::Annotate => {
                egui::SidePanel::right("progress")
                    .resizable(false)
                    .default_width(260.)
                    .show(ctx, |ui| {
                        self.progress_panel(ui);
                    });

                egui::TopBottomPanel::bottom("controls").show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        self.controls(ui);
                    });
                });

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        self.viewer(ui);
                    });
                });
            }
            Tab::Options => {
                self.options(ctx);
            }
        }
    }
}
