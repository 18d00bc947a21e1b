// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! This module contains the main application structure that implements
//! the egui::App trait. It owns the annotation store and the view
//! controller, loads images in the background and turns UI actions into
//! controller and store calls, reporting failures as toasts.

use crate::config::Config;
use crate::controller::{PointerEvent, Transition, ViewController, ViewState};
use crate::error::StoreError;
use crate::io::{media, serialization};
use crate::models::annotation::ImageId;
use crate::store::AnnotationStore;
use crate::ui::label_input::{LabelAction, LabelInput};
use crate::ui::toast::Toasts;
use crate::ui::{canvas, properties, toolbar};
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver};
use std::time::Duration;

/// Result of background image loading operation.
struct LoadedImageData {
    image_id: ImageId,
    image: media::LoadedImage,
}

/// Main application state.
pub struct PinboardApp {
    config: Config,

    /// Durable annotation records
    store: Box<dyn AnnotationStore>,

    /// State of the current image view
    view: ViewController,

    /// Loaded image texture for display
    image_texture: Option<egui::TextureHandle>,

    /// Natural image dimensions (width, height)
    image_size: Option<(u32, u32)>,

    /// Image whose annotations are read once the canvas reports its size
    awaiting_view: Option<ImageId>,

    /// Receiver for background image loading
    image_loader: Option<Receiver<Result<LoadedImageData, String>>>,

    /// Loading state message
    loading_message: Option<String>,

    label_input: LabelInput,

    /// Whether the clear confirmation is open
    confirm_clear: bool,

    toasts: Toasts,
}

impl PinboardApp {
    /// Create a new application instance around an opened store.
    pub fn new(config: Config, store: Box<dyn AnnotationStore>) -> Self {
        Self {
            view: ViewController::with_min_draw_size(config.min_draw_px),
            label_input: LabelInput::new(&config.default_color),
            config,
            store,
            image_texture: None,
            image_size: None,
            awaiting_view: None,
            image_loader: None,
            loading_message: None,
            confirm_clear: false,
            toasts: Toasts::new(Duration::from_secs(4)),
        }
    }

    /// Queue a notification shown when the window first draws.
    pub fn notify_error(&mut self, message: impl Into<String>) {
        self.toasts.error(message);
    }

    /// Load an image file and create a texture for display (asynchronously).
    pub fn load_image_file(&mut self, path: PathBuf) {
        let (sender, receiver) = channel();
        self.image_loader = Some(receiver);
        self.loading_message = Some("Loading image...".to_string());
        self.confirm_clear = false;
        self.view.navigate_away();

        // Spawn background thread for loading
        std::thread::spawn(move || {
            let result = media::load_image(&path)
                .map(|image| {
                    log::info!(
                        "Loaded image: {} ({}x{})",
                        path.display(),
                        image.width,
                        image.height
                    );
                    LoadedImageData {
                        image_id: media::image_id_for(&path),
                        image,
                    }
                })
                .map_err(|e| format!("{:#}", e));

            let _ = sender.send(result);
        });
    }

    /// Check for completed image loading.
    fn poll_loader(&mut self, ctx: &egui::Context) {
        let Some(receiver) = &self.image_loader else {
            return;
        };
        let Ok(result) = receiver.try_recv() else {
            return;
        };

        self.image_loader = None;
        self.loading_message = None;

        match result {
            Ok(loaded) => {
                let size = [loaded.image.width as usize, loaded.image.height as usize];
                let color_image =
                    egui::ColorImage::from_rgba_unmultiplied(size, &loaded.image.pixels);
                let texture =
                    ctx.load_texture("loaded_image", color_image, egui::TextureOptions::LINEAR);

                self.image_texture = Some(texture);
                self.image_size = Some((loaded.image.width, loaded.image.height));
                self.awaiting_view = Some(loaded.image_id);
            }
            Err(e) => {
                log::error!("Failed to load image: {}", e);
                self.toasts.error(format!("Failed to load image: {}", e));
            }
        }
    }

    fn report(&mut self, action: &str, result: Result<(), StoreError>) {
        if let Err(e) = result {
            log::error!("Failed to {}: {}", action, e);
            self.toasts.error(format!("Failed to {}: {}", action, e));
        }
    }

    fn handle_pointer(&mut self, event: PointerEvent) {
        match self.view.handle(event, self.store.as_mut()) {
            Ok(Transition::AwaitingLabel) => self.label_input.reset(&self.config.default_color),
            Ok(_) => {}
            Err(e) => self.report("save annotation", Err(e)),
        }
    }

    fn handle_label(&mut self, action: LabelAction) {
        let result = match action {
            LabelAction::Save { label, color } => {
                self.view.confirm_label(&label, color, self.store.as_mut())
            }
            LabelAction::Cancel => Ok(self.view.cancel_label()),
            LabelAction::None => return,
        };
        if let Err(e) = result {
            self.report("save annotation", Err(e));
        }
    }

    /// Export every stored record to a file picked by the user.
    fn export_all(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON", &["json"])
            .add_filter("YAML", &["yaml", "yml"])
            .set_file_name(self.config.export_name.as_str())
            .save_file()
        else {
            return;
        };

        let result = self
            .store
            .export_all()
            .map_err(anyhow::Error::from)
            .and_then(|records| serialization::export(&records, &path).map(|_| records.len()));

        match result {
            Ok(count) => {
                log::info!("Exported {} records to {}", count, path.display());
                self.toasts.info(format!("Exported {} images", count));
            }
            Err(e) => {
                log::error!("Failed to export annotations: {:#}", e);
                self.toasts.error(format!("Failed to export: {:#}", e));
            }
        }
    }

    /// Import records from a file picked by the user.
    fn import(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Annotations", &["json", "yaml", "yml"])
            .pick_file()
        else {
            return;
        };

        let result = serialization::read_document(&path).and_then(|document| {
            let count = self.store.import_value(document)?;
            self.view.reload(self.store.as_ref())?;
            Ok(count)
        });

        match result {
            Ok(count) => {
                log::info!("Imported {} records from {}", count, path.display());
                self.toasts.info("Import successful!");
            }
            Err(e) => {
                let malformed = e
                    .downcast_ref::<StoreError>()
                    .is_some_and(StoreError::is_malformed);
                if malformed {
                    log::warn!("Rejected import from {}: {:#}", path.display(), e);
                } else {
                    log::error!("Error importing annotations: {:#}", e);
                }
                self.toasts.error(format!("Failed to import: {:#}", e));
            }
        }
    }

    fn show_clear_confirmation(&mut self, ctx: &egui::Context) {
        let mut decision = None;
        egui::Window::new("Clear annotations")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label("Delete all annotations for this image?");
                ui.horizontal(|ui| {
                    if ui.button("Delete").clicked() {
                        decision = Some(true);
                    }
                    if ui.button("Cancel").clicked() {
                        decision = Some(false);
                    }
                });
            });

        if let Some(confirmed) = decision {
            self.confirm_clear = false;
            if confirmed {
                let result = self.view.clear(self.store.as_mut());
                self.report("clear annotations", result);
            }
        }
    }
}

impl eframe::App for PinboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_loader(ctx);

        // Request repaint if still loading (to update spinner)
        if self.loading_message.is_some() {
            ctx.request_repaint();
        }

        // Top menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open Image...").clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter(
                                "Images",
                                &["jpg", "jpeg", "png", "bmp", "gif", "webp", "tiff", "tif"],
                            )
                            .pick_file()
                        {
                            self.load_image_file(path);
                        }
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Export All...").clicked() {
                        self.export_all();
                        ui.close_menu();
                    }
                    if ui.button("Import...").clicked() {
                        self.import();
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
            });
        });

        // Annotation controls
        let toolbar_action = egui::TopBottomPanel::top("toolbar")
            .show(ctx, |ui| toolbar::show(ui, self.view.state()))
            .inner;

        match toolbar_action {
            toolbar::ToolbarAction::ToggleAnnotate => {
                self.view.toggle_annotate();
            }
            toolbar::ToolbarAction::Clear => self.confirm_clear = true,
            toolbar::ToolbarAction::ExportAll => self.export_all(),
            toolbar::ToolbarAction::Import => self.import(),
            toolbar::ToolbarAction::None => {}
        }

        // Annotation list (right side)
        egui::SidePanel::right("properties")
            .default_width(250.0)
            .show(ctx, |ui| {
                properties::show(ui, self.view.image_id(), self.view.annotations());
            });

        // Escape cancels a pending label, otherwise leaves annotate mode
        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            if self.view.pending_label().is_some() {
                self.view.cancel_label();
            } else if self.view.is_annotating() {
                self.view.toggle_annotate();
            }
        }

        // Main canvas (center)
        let output = egui::CentralPanel::default()
            .show(ctx, |ui| {
                if let Some(ref message) = self.loading_message {
                    ui.centered_and_justified(|ui| {
                        ui.vertical_centered(|ui| {
                            ui.add_space(20.0);
                            ui.spinner();
                            ui.add_space(10.0);
                            ui.label(
                                egui::RichText::new(message)
                                    .size(16.0)
                                    .color(egui::Color32::from_gray(200)),
                            );
                        });
                    });
                    None
                } else {
                    let overlay = self.view.render();
                    Some(canvas::show(
                        ui,
                        &self.image_texture,
                        self.image_size,
                        &overlay,
                        self.view.state(),
                    ))
                }
            })
            .inner;

        if let Some(output) = output {
            if let Some(size) = output.display_size {
                if let Some(image_id) = self.awaiting_view.take() {
                    let result = self.view.open_image(image_id, size, self.store.as_ref());
                    self.report("load annotations", result);
                    ctx.request_repaint();
                } else if self.view.image_size() != Some(size) {
                    self.view.resize(size);
                    ctx.request_repaint();
                }
            }

            for event in output.events {
                self.handle_pointer(event);
            }

            if let Some(pending) = self.view.pending_label() {
                let pos = output.origin + egui::vec2(pending.x as f32, pending.y as f32);
                let action = self.label_input.show(ctx, pos);
                self.handle_label(action);
            }
        }

        if self.confirm_clear && self.view.state() != ViewState::Idle {
            self.show_clear_confirmation(ctx);
        }

        self.toasts.show(ctx);
    }
}
