// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation list panel.
//!
//! Lists the annotations of the current image with their colour and
//! stored percentage coordinates.

use crate::models::annotation::{Annotation, ImageId};

pub fn show(ui: &mut egui::Ui, image_id: Option<&ImageId>, annotations: &[Annotation]) {
    ui.heading("Annotations");
    ui.separator();

    let Some(image_id) = image_id else {
        ui.label(egui::RichText::new("No image loaded").weak());
        return;
    };

    ui.label(format!("Image: {}", image_id));
    ui.add_space(4.0);

    if annotations.is_empty() {
        ui.label(egui::RichText::new("None yet").weak());
        return;
    }

    egui::ScrollArea::vertical().show(ui, |ui| {
        for annotation in annotations {
            let [r, g, b] = annotation.color.to_rgb();
            ui.horizontal(|ui| {
                let (swatch, _) =
                    ui.allocate_exact_size(egui::vec2(12.0, 12.0), egui::Sense::hover());
                ui.painter().rect_filled(swatch, 2.0, egui::Color32::from_rgb(r, g, b));
                ui.label(&annotation.label).on_hover_text(annotation.color.as_str());
            });
            ui.label(
                egui::RichText::new(format!(
                    "x {:.1}%  y {:.1}%  w {:.1}%  h {:.1}%",
                    annotation.x_pct * 100.0,
                    annotation.y_pct * 100.0,
                    annotation.w_pct * 100.0,
                    annotation.h_pct * 100.0,
                ))
                .small()
                .weak(),
            );
            ui.add_space(4.0);
        }
    });
}
