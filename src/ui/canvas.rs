// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Drawing canvas for image display and annotation.
//!
//! This module fits the loaded image into the central panel, paints the
//! annotation overlay on top of it and turns mouse input into pointer events
//! relative to the image's top-left corner.

use crate::controller::{Overlay, PointerEvent, RenderedBox, ViewState};
use crate::models::annotation::HexColor;
use crate::util::geometry::{ImageSize, PixelRect, Pos};

/// Result of one frame of canvas interaction.
pub struct CanvasOutput {
    /// Size the image is displayed at this frame.
    pub display_size: Option<ImageSize>,
    /// Screen position of the image's top-left corner.
    pub origin: egui::Pos2,
    pub events: Vec<PointerEvent>,
}

/// Display the main canvas area and collect pointer input.
pub fn show(
    ui: &mut egui::Ui,
    image_texture: &Option<egui::TextureHandle>,
    image_size: Option<(u32, u32)>,
    overlay: &Overlay<'_>,
    state: ViewState,
) -> CanvasOutput {
    let mut output = CanvasOutput {
        display_size: None,
        origin: ui.min_rect().min,
        events: Vec::new(),
    };

    ui.style_mut().visuals.extreme_bg_color = egui::Color32::from_gray(40);
    let available_size = ui.available_size();

    egui::Frame::canvas(ui.style()).show(ui, |ui| {
        ui.set_min_size(available_size);

        let (Some(texture), Some((img_width, img_height))) = (image_texture, image_size) else {
            show_welcome(ui);
            return;
        };

        // Fit the image into the available space, keeping its aspect ratio
        let available = ui.available_size();
        let img_aspect = img_width as f32 / img_height as f32;
        let available_aspect = available.x / available.y;

        let (display_width, display_height) = if img_aspect > available_aspect {
            (available.x, available.x / img_aspect)
        } else {
            (available.y * img_aspect, available.y)
        };

        let x_offset = (available.x - display_width) / 2.0;
        let y_offset = (available.y - display_height) / 2.0;
        let image_rect = egui::Rect::from_min_size(
            ui.min_rect().min + egui::vec2(x_offset, y_offset),
            egui::vec2(display_width, display_height),
        );

        ui.painter().image(
            texture.id(),
            image_rect,
            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
            egui::Color32::WHITE,
        );

        output.origin = image_rect.min;
        output.display_size = ImageSize::new(display_width as f64, display_height as f64).ok();

        let response = ui.allocate_rect(image_rect, egui::Sense::click_and_drag());
        let to_image = |pos: egui::Pos2| {
            Pos::new(
                (pos.x - image_rect.min.x) as f64,
                (pos.y - image_rect.min.y) as f64,
            )
        };

        if response.drag_started() {
            let press = ui.input(|i| i.pointer.press_origin()).or(response.interact_pointer_pos());
            if let Some(pos) = press {
                output.events.push(PointerEvent::Press(to_image(pos)));
            }
        }
        if response.dragged() {
            if let Some(pos) = response.interact_pointer_pos() {
                output.events.push(PointerEvent::Move(to_image(pos)));
            }
        }
        if response.drag_stopped() {
            let release = response
                .interact_pointer_pos()
                .or_else(|| ui.input(|i| i.pointer.latest_pos()));
            if let Some(pos) = release {
                output.events.push(PointerEvent::Release(to_image(pos)));
            }
        }

        if let Some(hover) = response.hover_pos() {
            set_cursor(ui, overlay, state, to_image(hover));
        }

        let painter = ui.painter();
        for rendered in &overlay.boxes {
            draw_box(painter, rendered, image_rect.min);
        }
        if let Some(draft) = overlay.draft {
            draw_draft(painter, &draft, image_rect.min);
        }
        if let Some(pending) = overlay.pending {
            draw_draft(painter, &pending, image_rect.min);
        }
    });

    // Display current mode at the bottom
    ui.separator();
    ui.horizontal(|ui| {
        let mode = match state {
            ViewState::Idle => "No image",
            ViewState::Viewing => "Viewing",
            ViewState::Drawing => "Annotating",
        };
        ui.label(format!("Mode: {}", mode));
        ui.separator();
        ui.label(format!("{} annotations", overlay.boxes.len()));
    });

    output
}

fn show_welcome(ui: &mut egui::Ui) {
    ui.centered_and_justified(|ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(20.0);
            ui.heading(
                egui::RichText::new("Pinboard")
                    .size(32.0)
                    .color(egui::Color32::from_gray(200)),
            );
            ui.add_space(20.0);
            ui.label(
                egui::RichText::new("Open an image to view and add annotations")
                    .color(egui::Color32::from_gray(180)),
            );
            ui.add_space(10.0);
            ui.label(
                egui::RichText::new("File → Open Image...")
                    .weak()
                    .color(egui::Color32::from_gray(130)),
            );
        });
    });
}

fn set_cursor(ui: &egui::Ui, overlay: &Overlay<'_>, state: ViewState, pos: Pos) {
    let hit = overlay
        .boxes
        .iter()
        .rev()
        .find(|b| b.rect.contains(pos) || b.rect.handle().contains(pos));
    let icon = match hit {
        Some(b) if b.rect.handle().contains(pos) => egui::CursorIcon::ResizeNwSe,
        Some(_) => egui::CursorIcon::Move,
        None if state == ViewState::Drawing => egui::CursorIcon::Crosshair,
        None => return,
    };
    ui.ctx().set_cursor_icon(icon);
}

fn color32(color: &HexColor, alpha: u8) -> egui::Color32 {
    let [r, g, b] = color.to_rgb();
    egui::Color32::from_rgba_unmultiplied(r, g, b, alpha)
}

fn screen_rect(rect: &PixelRect, origin: egui::Pos2) -> egui::Rect {
    egui::Rect::from_min_size(
        origin + egui::vec2(rect.x as f32, rect.y as f32),
        egui::vec2(rect.width as f32, rect.height as f32),
    )
}

/// Draw an annotation box with its resize handle and label badge.
fn draw_box(painter: &egui::Painter, rendered: &RenderedBox<'_>, origin: egui::Pos2) {
    let rect = screen_rect(&rendered.rect, origin);
    let solid = color32(rendered.color, 255);
    let stroke_width = if rendered.live { 3.0 } else { 2.0 };

    painter.rect(
        rect,
        0.0,
        color32(rendered.color, 51),
        egui::Stroke::new(stroke_width, solid),
    );
    painter.rect_filled(screen_rect(&rendered.rect.handle(), origin), 0.0, solid);

    let galley = painter.layout_no_wrap(
        rendered.label.to_string(),
        egui::FontId::proportional(12.0),
        egui::Color32::WHITE,
    );
    let badge = egui::Rect::from_min_size(
        rect.min - egui::vec2(0.0, galley.size().y + 6.0),
        galley.size() + egui::vec2(8.0, 4.0),
    );
    painter.rect_filled(badge, 3.0, solid);
    painter.galley(badge.min + egui::vec2(4.0, 2.0), galley, egui::Color32::WHITE);
}

/// Draw the dashed rectangle of a draw in progress.
fn draw_draft(painter: &egui::Painter, rect: &PixelRect, origin: egui::Pos2) {
    let rect = screen_rect(rect, origin);
    let yellow = egui::Color32::from_rgb(255, 255, 0);

    painter.rect_filled(rect, 0.0, egui::Color32::from_rgba_unmultiplied(255, 255, 0, 51));
    let corners = [
        rect.left_top(),
        rect.right_top(),
        rect.right_bottom(),
        rect.left_bottom(),
        rect.left_top(),
    ];
    painter.extend(egui::Shape::dashed_line(&corners, egui::Stroke::new(2.0, yellow), 6.0, 4.0));
}
