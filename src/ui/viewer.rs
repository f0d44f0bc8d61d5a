use std::path::Path;

use anyhow::{anyhow, bail, ensure, Context, Result};
use tracing::{debug, error, info, trace, warn};

use egui::{Color32, RichText, Vec2};

use super::ui_types::App;
use crate::session::InputEvent;

impl App {
    pub fn viewer(&mut self, ui: &mut egui::Ui) {
        let Some((file_id, path)) = self
            .session
            .as_ref()
            .and_then(|s| s.current())
            .map(|c| (c.file_id().to_string(), c.path().to_path_buf()))
        else {
            ui.label("No image to annotate");
            return;
        };

        if let Some(session) = self.session.as_ref() {
            let done = session.ledger().len();
            let total = done + session.remaining();
            ui.label(
                RichText::new(format!("{}  ({} / {})", file_id, done + 1, total))
                    .size(16.)
                    .strong(),
            );
        }

        /// decode the current image into a texture once
        if self.texture_file.as_deref() != Some(file_id.as_str()) {
            match load_color_image(&path) {
                Ok(image) => {
                    self.image_size = (image.size[0], image.size[1]);
                    let texture = ui
                        .ctx()
                        .load_texture(file_id.clone(), image, Default::default());
                    self.texture = Some(texture);
                    self.texture_file = Some(file_id.clone());
                }
                Err(e) => {
                    error!("Failed to load {}: {}", path.display(), e);
                    self.errors
                        .push(format!("Failed to load {}: {}", path.display(), e));
                    if let Some(session) = self.session.as_mut() {
                        session.skip_current();
                    }
                    self.texture = None;
                    self.texture_file = None;
                    return;
                }
            }
        }

        let Some(texture) = self.texture.as_ref() else {
            return;
        };

        let scale = self.options.image_scale as f32;
        let size = Vec2::new(self.image_size.0 as f32, self.image_size.1 as f32) * scale;

        let img = egui::Image::from_texture((texture.id(), size))
            .fit_to_exact_size(size)
            .max_size(size)
            .sense(egui::Sense::click());

        let resp = ui.add(img);
        let rect = resp.rect;

        if resp.clicked() {
            if let Some(pos) = ui.input(|i| i.pointer.interact_pos()) {
                let x = ((pos.x - rect.min.x) / scale).round().max(0.) as u32;
                let y = ((pos.y - rect.min.y) / scale).round().max(0.) as u32;
                let x = x.min(self.image_size.0.saturating_sub(1) as u32);
                let y = y.min(self.image_size.1.saturating_sub(1) as u32);

                let ctx = ui.ctx().clone();
                self.dispatch(&ctx, InputEvent::Point(x, y));
            }
        }

        /// one dot per captured point
        if let Some(capture) = self.session.as_ref().and_then(|s| s.current()) {
            let painter = ui.painter_at(rect);
            let radius = self.options.marker_radius as f32 * scale;

            for &(x, y) in capture.points() {
                let pos = rect.min + Vec2::new(x as f32 * scale, y as f32 * scale);
                painter.circle_filled(pos, radius + 2. * scale, Color32::WHITE);
                painter.circle_filled(pos, radius, Color32::RED);
            }
        }
    }
}

fn load_color_image(path: &Path) -> Result<egui::ColorImage> {
    let img = image::open(path)
        .with_context(|| format!("Failed to decode image {}", path.display()))?;
    let rgba = img.to_rgba8();
    let (w, h) = rgba.dimensions();

    Ok(egui::ColorImage::from_rgba_unmultiplied(
        [w as usize, h as usize],
        rgba.as_flat_samples().as_slice(),
    ))
}
