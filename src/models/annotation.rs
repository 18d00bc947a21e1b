// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation data structures.
//!
//! This module defines the persisted form of a rectangle annotation, the
//! identifier it is keyed by, and its colour.

use crate::util::geometry::PctRect;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Colour applied when none is chosen.
pub const DEFAULT_COLOR: &str = "#e74c3c";

/// External identifier of an annotated image.
///
/// The host exposes numeric ids in image URLs; local files fall back to
/// their file stem.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ImageId {
    Number(i64),
    Text(String),
}

impl ImageId {
    /// Extract the numeric id from a source such as `/image/4995/thumbnail`.
    pub fn from_source(source: &str) -> Option<ImageId> {
        const MARKER: &str = "/image/";

        let mut rest = source;
        while let Some(start) = rest.find(MARKER) {
            rest = &rest[start + MARKER.len()..];
            let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
            if digits > 0 && rest[digits..].starts_with('/') {
                if let Ok(id) = rest[..digits].parse() {
                    return Some(ImageId::Number(id));
                }
            }
        }
        None
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageId::Number(id) => write!(f, "{}", id),
            ImageId::Text(id) => f.write_str(id),
        }
    }
}

impl From<i64> for ImageId {
    fn from(id: i64) -> Self {
        ImageId::Number(id)
    }
}

impl From<&str> for ImageId {
    fn from(id: &str) -> Self {
        ImageId::Text(id.to_string())
    }
}

#[derive(Debug, Error, PartialEq)]
#[error("invalid colour {0:?}, expected #RRGGBB")]
pub struct ColorError(pub String);

/// A `#rrggbb` colour, stored lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor(String);

impl HexColor {
    pub fn parse(value: &str) -> Result<Self, ColorError> {
        let digits = value
            .strip_prefix('#')
            .filter(|d| d.len() == 6 && d.bytes().all(|b| b.is_ascii_hexdigit()))
            .ok_or_else(|| ColorError(value.to_string()))?;
        Ok(HexColor(format!("#{}", digits.to_ascii_lowercase())))
    }

    pub fn from_rgb([r, g, b]: [u8; 3]) -> Self {
        HexColor(format!("#{:02x}{:02x}{:02x}", r, g, b))
    }

    pub fn to_rgb(&self) -> [u8; 3] {
        let channel = |i: usize| u8::from_str_radix(&self.0[i..i + 2], 16).unwrap_or(0);
        [channel(1), channel(3), channel(5)]
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for HexColor {
    fn default() -> Self {
        HexColor(DEFAULT_COLOR.to_string())
    }
}

impl TryFrom<String> for HexColor {
    type Error = ColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        HexColor::parse(&value)
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> Self {
        color.0
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A labelled rectangle with coordinates as fractions of the image size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    pub x_pct: f64,
    pub y_pct: f64,
    pub w_pct: f64,
    pub h_pct: f64,
    pub label: String,
    #[serde(default)]
    pub color: HexColor,
}

impl Annotation {
    /// Create an annotation covering the given percentage rectangle.
    pub fn new(rect: PctRect, label: String, color: HexColor) -> Self {
        Self {
            x_pct: rect.x,
            y_pct: rect.y,
            w_pct: rect.width,
            h_pct: rect.height,
            label,
            color,
        }
    }

    pub fn rect(&self) -> PctRect {
        PctRect {
            x: self.x_pct,
            y: self.y_pct,
            width: self.w_pct,
            height: self.h_pct,
        }
    }

    /// Check the coordinate invariants.
    ///
    /// Positions and extents are not clamped to the image: boxes dragged or
    /// resized past an edge stay where the user left them.
    pub fn validate(&self) -> Result<(), String> {
        let coords = [self.x_pct, self.y_pct, self.w_pct, self.h_pct];
        if coords.iter().any(|c| !c.is_finite()) {
            return Err("coordinates must be finite numbers".to_string());
        }
        if self.w_pct <= 0.0 || self.h_pct <= 0.0 {
            return Err("width and height must be positive".to_string());
        }
        Ok(())
    }
}
