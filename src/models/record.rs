// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Stored annotation records.
//!
//! A record is the unit of persistence: every annotation of one image,
//! in drawing order. This is also the element type of export files.

use super::annotation::{Annotation, ImageId};
use crate::error::StoreError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// All annotations of one image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationRecord {
    pub image_id: ImageId,
    pub annotations: Vec<Annotation>,
}

impl AnnotationRecord {
    pub fn new(image_id: ImageId, annotations: Vec<Annotation>) -> Self {
        Self {
            image_id,
            annotations,
        }
    }
}

/// Validate an imported document and convert it into records.
///
/// The whole batch is checked before anything is returned, so a single bad
/// record rejects the import.
pub fn parse_records(document: Value) -> Result<Vec<AnnotationRecord>, StoreError> {
    let Value::Array(items) = document else {
        return Err(StoreError::MalformedRoot);
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            parse_record(item).map_err(|reason| StoreError::Malformed { index, reason })
        })
        .collect()
}

fn parse_record(item: Value) -> Result<AnnotationRecord, String> {
    let Value::Object(mut fields) = item else {
        return Err("record must be an object".to_string());
    };

    let image_id = match fields.remove("imageId") {
        Some(Value::Number(n)) => n
            .as_i64()
            .map(ImageId::Number)
            .ok_or_else(|| format!("imageId {} is not an integer", n))?,
        Some(Value::String(s)) if !s.trim().is_empty() => ImageId::Text(s),
        Some(_) => return Err("imageId must be an integer or a non-empty string".to_string()),
        None => return Err("missing imageId".to_string()),
    };

    let entries = match fields.remove("annotations") {
        Some(Value::Array(entries)) => entries,
        Some(_) => return Err(format!("annotations of image {} must be a list", image_id)),
        None => return Err(format!("missing annotations for image {}", image_id)),
    };

    let annotations = entries
        .into_iter()
        .enumerate()
        .map(|(i, entry)| -> Result<Annotation, String> {
            let annotation: Annotation = serde_json::from_value(entry)
                .map_err(|e| format!("annotation {} of image {}: {}", i, image_id, e))?;
            annotation
                .validate()
                .map_err(|e| format!("annotation {} of image {}: {}", i, image_id, e))?;
            Ok(annotation)
        })
        .collect::<Result<Vec<_>, String>>()?;

    Ok(AnnotationRecord::new(image_id, annotations))
}
