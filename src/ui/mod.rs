// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! UI components for the Pinboard application.

pub mod canvas;
pub mod label_input;
pub mod properties;
pub mod toast;
pub mod toolbar;
