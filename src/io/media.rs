// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Image file loading.
//!
//! This module decodes image files into RGBA pixels suitable for an egui
//! texture and works out the identifier annotations are stored under.

use crate::models::annotation::ImageId;
use anyhow::{Context, Result};
use std::path::Path;

/// Decoded image ready for upload as a texture.
pub struct LoadedImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// Decode an image file into RGBA8 pixels.
pub fn load_image(path: &Path) -> Result<LoadedImage> {
    let img = image::open(path)
        .with_context(|| format!("Failed to decode {}", path.display()))?
        .to_rgba8();

    Ok(LoadedImage {
        width: img.width(),
        height: img.height(),
        pixels: img.into_raw(),
    })
}

/// Identifier for an image file.
///
/// Paths that follow the host's `/image/<id>/` layout keep that numeric id
/// so exports stay compatible; anything else is keyed by its file stem.
pub fn image_id_for(path: &Path) -> ImageId {
    let source = path.to_string_lossy();
    if let Some(id) = ImageId::from_source(&source) {
        return id;
    }

    path.file_stem()
        .map(|stem| ImageId::Text(stem.to_string_lossy().into_owned()))
        .unwrap_or_else(|| ImageId::Text(source.into_owned()))
}
