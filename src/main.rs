// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Pinboard - resolution-independent image annotations
//!
//! A cross-platform desktop application for drawing labelled rectangles on
//! images. Rectangles are stored as fractions of the displayed image size,
//! keyed by image id, so they stay anchored to the image content at any
//! window size.

mod app;
mod config;
mod controller;
mod error;
mod io;
mod models;
mod store;
mod ui;
mod util;

use anyhow::Result;
use app::PinboardApp;
use config::Config;
use std::path::PathBuf;
use store::{AnnotationStore, JsonFileStore, MemoryStore};

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let config = Config::load()?;
    let image_path = std::env::args_os().nth(1).map(PathBuf::from);

    let mut store_error = None;
    let store: Box<dyn AnnotationStore> = match JsonFileStore::open(config.store_path.clone()) {
        Ok(store) => {
            log::info!("Using annotation store {}", store.path().display());
            Box::new(store)
        }
        Err(e) => {
            log::error!("{}", e);
            store_error = Some(format!("{}; annotations will not be saved", e));
            Box::new(MemoryStore::new())
        }
    };

    // Configure egui options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("Pinboard - Image Annotations"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Pinboard",
        options,
        Box::new(move |_cc| {
            let mut app = PinboardApp::new(config, store);
            if let Some(message) = store_error {
                app.notify_error(message);
            }
            if let Some(path) = image_path {
                app.load_image_file(path);
            }
            Ok(Box::new(app))
        }),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
