// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation controls bar.
//!
//! This module provides the row of buttons for toggling annotate mode,
//! clearing the current image and backing up every stored record.

use crate::controller::ViewState;

/// Button pressed in the toolbar this frame.
pub enum ToolbarAction {
    None,
    ToggleAnnotate,
    Clear,
    ExportAll,
    Import,
}

/// Display the toolbar with the annotation controls.
pub fn show(ui: &mut egui::Ui, state: ViewState) -> ToolbarAction {
    let mut action = ToolbarAction::None;
    let has_image = state != ViewState::Idle;

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        ui.label("Annotations:");

        ui.separator();

        let annotate_text = if state == ViewState::Drawing { "Exit Annotate" } else { "Annotate" };
        if ui
            .add_enabled(
                has_image,
                egui::SelectableLabel::new(state == ViewState::Drawing, annotate_text),
            )
            .clicked()
        {
            action = ToolbarAction::ToggleAnnotate;
        }

        if ui.add_enabled(has_image, egui::Button::new("Clear")).clicked() {
            action = ToolbarAction::Clear;
        }

        ui.separator();

        if ui.button("Export All").clicked() {
            action = ToolbarAction::ExportAll;
        }

        if ui.button("Import").clicked() {
            action = ToolbarAction::Import;
        }

        ui.separator();

        let hint = match state {
            ViewState::Idle => "Open an image to see its annotations",
            ViewState::Viewing => "Drag boxes to move them, drag the corner handle to resize",
            ViewState::Drawing => "Drag on the image to draw a box, then name it",
        };

        ui.label(egui::RichText::new(hint).italics().weak());
    });

    action
}
