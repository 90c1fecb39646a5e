// The eframe shell: renders the session state and feeds pointer and keyboard
// events into the controller's transitions. All crop arithmetic lives in
// `session`; this layer only paints and does the file I/O the user asked for.

use std::path::PathBuf;

use eframe::egui;
use image::DynamicImage;
use log::{error, info};

use crate::cli::SaveMode;
use crate::loader::{self, LoadedImage};
use crate::session::{CropBox, Session};

/// A finished crop waiting for the user's save/discard decision.
struct PendingCrop {
    image: DynamicImage,
    texture: egui::TextureHandle,
    region: CropBox,
    source: PathBuf,
}

pub struct CropApp {
    session: Session,
    save_mode: SaveMode,

    loaded: Option<LoadedImage>,
    loaded_path: Option<PathBuf>,
    texture: Option<egui::TextureHandle>,
    load_error: Option<String>,

    pending: Option<PendingCrop>,
    drag_size: Option<(u32, u32)>,
    quitting: bool,
}

impl CropApp {
    pub fn new(session: Session, save_mode: SaveMode) -> Self {
        Self {
            session,
            save_mode,
            loaded: None,
            loaded_path: None,
            texture: None,
            load_error: None,
            pending: None,
            drag_size: None,
            quitting: false,
        }
    }

    fn upload_texture(
        ctx: &egui::Context,
        name: &str,
        img: &DynamicImage,
    ) -> egui::TextureHandle {
        let size = [img.width() as usize, img.height() as usize];
        let rgba = img.to_rgba8();
        let pixels = rgba.as_flat_samples();
        let color_image = egui::ColorImage::from_rgba_unmultiplied(size, pixels.as_slice());
        ctx.load_texture(name, color_image, egui::TextureOptions::LINEAR)
    }

    /// Reload the displayed image when the cursor moved to a different path.
    fn ensure_loaded(&mut self, ctx: &egui::Context) {
        let current = self.session.current_path().to_path_buf();
        if self.loaded_path.as_deref() == Some(current.as_path()) {
            return;
        }

        match loader::load(&current) {
            Ok(loaded) => {
                self.texture = Some(Self::upload_texture(ctx, "image", &loaded.display));
                self.loaded = Some(loaded);
                self.load_error = None;
            }
            Err(e) => {
                error!("{e:#}");
                self.texture = None;
                self.loaded = None;
                self.load_error = Some(format!("{e:#}"));
            }
        }
        self.loaded_path = Some(current);
        self.drag_size = None;
    }

    fn status_line(&self) -> String {
        let name = self
            .session
            .current_path()
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let name: String = name.chars().take(64).collect();
        match self.drag_size {
            Some((w, h)) => format!("{name} ({w}x{h})"),
            None => name,
        }
    }

    /// A drag just ended with a non-empty box: cut the crop from the original
    /// buffer and dispatch it according to the save mode.
    fn finish_crop(&mut self, ctx: &egui::Context, region: CropBox) {
        let Some(loaded) = &self.loaded else { return };
        let cropped = loader::crop(&loaded.original, region);
        let source = self.session.current_path().to_path_buf();

        match self.save_mode {
            SaveMode::Immediate => {
                self.write_crop(&cropped, &region.output_path(&source));
            }
            SaveMode::Dialog => {
                let dialog = rfd::FileDialog::new().set_file_name(region.output_name(&source));
                let dialog = match source.parent() {
                    Some(dir) => dialog.set_directory(dir),
                    None => dialog,
                };
                if let Some(path) = dialog.save_file() {
                    self.write_crop(&cropped, &path);
                }
            }
            SaveMode::Confirm => {
                let texture = Self::upload_texture(ctx, "preview", &cropped);
                self.pending = Some(PendingCrop {
                    image: cropped,
                    texture,
                    region,
                    source,
                });
            }
        }
    }

    fn write_crop(&self, img: &DynamicImage, path: &std::path::Path) {
        match loader::save(img, path) {
            Ok(()) => info!("Saved crop to {}", path.display()),
            Err(e) => error!("{e:#}"),
        }
    }

    fn delete_current(&mut self, ctx: &egui::Context) {
        let path = self.session.current_path().to_path_buf();
        if let Err(e) = std::fs::remove_file(&path) {
            error!("Failed to delete {}: {e}", path.display());
            return;
        }
        info!("Deleted {}", path.display());

        self.session.remove_current();
        self.pending = None;
        self.loaded_path = None;
        if self.session.is_empty() {
            info!("No more image files in the directory.");
            self.quitting = true;
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
    }

    fn handle_keys(&mut self, ctx: &egui::Context) {
        let (prev, next, delete) = ctx.input(|i| {
            (
                i.key_pressed(egui::Key::ArrowLeft) || i.key_pressed(egui::Key::S),
                i.key_pressed(egui::Key::ArrowRight) || i.key_pressed(egui::Key::F),
                i.key_pressed(egui::Key::D) || i.key_pressed(egui::Key::Delete),
            )
        });

        if prev {
            self.session.advance(-1);
            self.drag_size = None;
        }
        if next {
            self.session.advance(1);
            self.drag_size = None;
        }
        if delete {
            self.delete_current(ctx);
        }
    }

    fn show_canvas(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) {
        let (scale, display_size) = match &self.loaded {
            Some(l) => (
                l.scale,
                egui::vec2(l.display.width() as f32, l.display.height() as f32),
            ),
            None => return,
        };
        let Some(texture_id) = self.texture.as_ref().map(|t| t.id()) else {
            return;
        };

        let (rect, response) = ui.allocate_exact_size(display_size, egui::Sense::click_and_drag());
        let painter = ui.painter_at(rect);

        painter.image(
            texture_id,
            rect,
            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
            egui::Color32::WHITE,
        );

        // Pointer positions relative to the image, i.e. display coordinates.
        if response.drag_started_by(egui::PointerButton::Primary) {
            if let Some(pos) = response.interact_pointer_pos() {
                let p = pos - rect.min;
                self.session.press(p.x, p.y);
                self.drag_size = None;
            }
        }
        if response.dragged_by(egui::PointerButton::Primary) {
            if let Some(pos) = response.interact_pointer_pos() {
                let p = pos - rect.min;
                self.drag_size = self.session.motion(p.x, p.y);
            }
        }
        if response.drag_stopped_by(egui::PointerButton::Primary) {
            let pos = response
                .interact_pointer_pos()
                .or(ctx.input(|i| i.pointer.latest_pos()));
            if let Some(pos) = pos {
                let p = pos - rect.min;
                let region =
                    self.session
                        .release(p.x, p.y, scale, display_size.x, display_size.y);
                self.drag_size = None;
                if let Some(region) = region {
                    self.finish_crop(ctx, region);
                }
            }
        }
        if response.secondary_clicked() {
            self.session.cancel();
            self.drag_size = None;
        }

        if let Some((start, current)) = self.session.drag_rect() {
            let outline = egui::Rect::from_two_pos(
                rect.min + egui::vec2(start.0, start.1),
                rect.min + egui::vec2(current.0, current.1),
            );
            painter.rect_stroke(outline, 0.0, egui::Stroke::new(2.0, egui::Color32::RED));
        }
    }

    fn show_preview(&mut self, ctx: &egui::Context) {
        let Some(pending) = &self.pending else { return };

        let (w, h) = (pending.image.width(), pending.image.height());
        let preview_scale = loader::display_scale(w, h);
        let preview_size = egui::vec2(w as f32 * preview_scale, h as f32 * preview_scale);
        let texture_id = pending.texture.id();

        let mut open = true;
        let mut save = false;
        let mut discard = false;
        egui::Window::new("Cropped image")
            .open(&mut open)
            .resizable(false)
            .show(ctx, |ui| {
                ui.image((texture_id, preview_size));
                ui.horizontal(|ui| {
                    if ui.button("Save").clicked() {
                        save = true;
                    }
                    if ui.button("Discard").clicked() {
                        discard = true;
                    }
                });
            });

        if save {
            if let Some(pending) = self.pending.take() {
                self.write_crop(&pending.image, &pending.region.output_path(&pending.source));
            }
        } else if discard || !open {
            // Closing the window is equivalent to Discard.
            self.pending = None;
        }
    }
}

impl eframe::App for CropApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.quitting {
            return;
        }

        self.handle_keys(ctx);
        if self.quitting {
            return;
        }

        self.ensure_loaded(ctx);

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.label(self.status_line());
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(err) = &self.load_error {
                ui.colored_label(egui::Color32::RED, err);
                return;
            }
            egui::ScrollArea::both().show(ui, |ui| {
                self.show_canvas(ctx, ui);
            });
        });

        self.show_preview(ctx);
    }
}
