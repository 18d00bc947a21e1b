// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Runtime configuration from environment variables.

use crate::controller::MIN_DRAW_PX;
use crate::models::annotation::{HexColor, DEFAULT_COLOR};
use anyhow::{anyhow, Context, Result};
use std::path::PathBuf;
use std::str::FromStr;

/// Default location of the annotation store file.
pub const DEFAULT_STORE_PATH: &str = "pinboard-annotations.json";

/// Default file name offered when exporting every record.
pub const DEFAULT_EXPORT_NAME: &str = "stash-image-annotations.json";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub store_path: PathBuf,
    pub export_name: String,
    pub default_color: HexColor,
    pub min_draw_px: f64,
}

impl Config {
    /// Read the configuration from the process environment.
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let color: String = try_load(&lookup, "PINBOARD_DEFAULT_COLOR", DEFAULT_COLOR)?;
        let min_draw_px: f64 =
            try_load(&lookup, "PINBOARD_MIN_DRAW_PX", &MIN_DRAW_PX.to_string())?;
        if !(min_draw_px.is_finite() && min_draw_px > 0.0) {
            return Err(anyhow!(
                "PINBOARD_MIN_DRAW_PX must be a positive number, got {}",
                min_draw_px
            ));
        }

        Ok(Self {
            store_path: try_load(&lookup, "PINBOARD_STORE", DEFAULT_STORE_PATH)?,
            export_name: try_load(&lookup, "PINBOARD_EXPORT_NAME", DEFAULT_EXPORT_NAME)?,
            default_color: HexColor::parse(&color).context("Invalid PINBOARD_DEFAULT_COLOR")?,
            min_draw_px,
        })
    }
}

fn try_load<T, F>(lookup: &F, key: &str, default: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    let value = lookup(key).unwrap_or_else(|| {
        log::debug!("{key} not set, using default: {default}");
        default.to_string()
    });

    value
        .parse()
        .map_err(|e| anyhow!("Invalid {key} value {value:?}: {e}"))
}
