// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Data model for stored annotations.

pub mod annotation;
pub mod record;
