// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! This module provides the coordinate transformations between pixel
//! rectangles (relative to the displayed image's top-left corner) and
//! percentage rectangles (fractions of the displayed image size). Only the
//! percentage form is ever persisted; pixels are derived on every render.

use crate::error::GeometryError;

/// Side length of the square resize handle at a box's bottom-right corner.
pub const HANDLE_SIZE: f64 = 10.0;

/// A position in pixels relative to the image's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pos {
    pub x: f64,
    pub y: f64,
}

impl Pos {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Current rendered size of the reference image. Always positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageSize {
    width: f64,
    height: f64,
}

impl ImageSize {
    /// Create a size, rejecting zero, negative or non-finite dimensions.
    pub fn new(width: f64, height: f64) -> Result<Self, GeometryError> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if valid(width) && valid(height) {
            Ok(Self { width, height })
        } else {
            Err(GeometryError::InvalidImageSize { width, height })
        }
    }
}

/// A rectangle in pixels, relative to the image's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PixelRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Rectangle spanned by two corner positions, in any order.
    pub fn from_corners(a: Pos, b: Pos) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            width: (a.x - b.x).abs(),
            height: (a.y - b.y).abs(),
        }
    }

    pub fn contains(&self, pos: Pos) -> bool {
        pos.x >= self.x
            && pos.x <= self.x + self.width
            && pos.y >= self.y
            && pos.y <= self.y + self.height
    }

    /// The resize handle square anchored inside the bottom-right corner.
    pub fn handle(&self) -> PixelRect {
        PixelRect::new(
            self.x + self.width - HANDLE_SIZE,
            self.y + self.height - HANDLE_SIZE,
            HANDLE_SIZE,
            HANDLE_SIZE,
        )
    }

    pub fn translated(&self, dx: f64, dy: f64) -> PixelRect {
        PixelRect::new(self.x + dx, self.y + dy, self.width, self.height)
    }
}

/// A rectangle expressed as fractions of the image's displayed size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PctRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Convert a pixel rectangle into fractions of the image size.
pub fn to_percent(rect: &PixelRect, size: &ImageSize) -> PctRect {
    PctRect {
        x: rect.x / size.width,
        y: rect.y / size.height,
        width: rect.width / size.width,
        height: rect.height / size.height,
    }
}

/// Convert a percentage rectangle into pixels at the current image size.
pub fn to_pixels(rect: &PctRect, size: &ImageSize) -> PixelRect {
    PixelRect {
        x: rect.x * size.width,
        y: rect.y * size.height,
        width: rect.width * size.width,
        height: rect.height * size.height,
    }
}
