// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Short-lived notifications stacked in the bottom-right corner.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Error,
}

struct Toast {
    message: String,
    level: ToastLevel,
    shown_at: Instant,
}

pub struct Toasts {
    items: Vec<Toast>,
    duration: Duration,
}

impl Toasts {
    pub fn new(duration: Duration) -> Self {
        Self {
            items: Vec::new(),
            duration,
        }
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(message.into(), ToastLevel::Info);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(message.into(), ToastLevel::Error);
    }

    fn push(&mut self, message: String, level: ToastLevel) {
        self.items.push(Toast {
            message,
            level,
            shown_at: Instant::now(),
        });
    }

    fn prune(&mut self, now: Instant) {
        let duration = self.duration;
        self.items.retain(|t| now.duration_since(t.shown_at) < duration);
    }

    pub fn show(&mut self, ctx: &egui::Context) {
        self.prune(Instant::now());
        if self.items.is_empty() {
            return;
        }

        egui::Area::new(egui::Id::new("toasts"))
            .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-12.0, -12.0))
            .order(egui::Order::Tooltip)
            .interactable(false)
            .show(ctx, |ui| {
                for toast in &self.items {
                    let fill = match toast.level {
                        ToastLevel::Info => egui::Color32::from_rgb(40, 110, 60),
                        ToastLevel::Error => egui::Color32::from_rgb(160, 40, 40),
                    };
                    egui::Frame::none()
                        .fill(fill)
                        .rounding(4.0)
                        .inner_margin(egui::Margin::symmetric(10.0, 6.0))
                        .show(ui, |ui| {
                            ui.label(
                                egui::RichText::new(&toast.message)
                                    .color(egui::Color32::WHITE),
                            );
                        });
                    ui.add_space(4.0);
                }
            });

        ctx.request_repaint_after(Duration::from_millis(250));
    }
}
