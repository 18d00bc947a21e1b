// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Inline label and colour input shown after drawing a rectangle.

use crate::models::annotation::HexColor;

/// What the user did with the label input this frame.
pub enum LabelAction {
    None,
    Save { label: String, color: HexColor },
    Cancel,
}

/// Editable state of the label popup.
pub struct LabelInput {
    text: String,
    rgb: [u8; 3],
    focus_pending: bool,
}

impl LabelInput {
    pub fn new(color: &HexColor) -> Self {
        Self {
            text: String::new(),
            rgb: color.to_rgb(),
            focus_pending: true,
        }
    }

    /// Start over for a freshly drawn rectangle.
    pub fn reset(&mut self, color: &HexColor) {
        *self = Self::new(color);
    }

    /// Show the popup with its top-left corner at `pos`.
    pub fn show(&mut self, ctx: &egui::Context, pos: egui::Pos2) -> LabelAction {
        let mut action = LabelAction::None;

        egui::Area::new(egui::Id::new("annotation_label_input"))
            .fixed_pos(pos)
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.color_edit_button_srgb(&mut self.rgb);

                        let text = ui.add(
                            egui::TextEdit::singleline(&mut self.text)
                                .hint_text("Annotation text")
                                .desired_width(160.0),
                        );
                        if self.focus_pending {
                            text.request_focus();
                            self.focus_pending = false;
                        }
                        let submitted =
                            text.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

                        if ui.button("Save").clicked() || submitted {
                            action = LabelAction::Save {
                                label: self.text.clone(),
                                color: HexColor::from_rgb(self.rgb),
                            };
                        }
                        if ui.button("✕").clicked() {
                            action = LabelAction::Cancel;
                        }
                    });
                });
            });

        action
    }
}
