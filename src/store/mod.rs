// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation persistence.
//!
//! Annotations are kept per image as one record holding the full ordered
//! list. Every mutation replaces that list; there is no partial update.

mod file;

pub use file::JsonFileStore;

use crate::error::StoreError;
use crate::models::annotation::{Annotation, ImageId};
use crate::models::record::{parse_records, AnnotationRecord};
use std::collections::BTreeMap;

/// Key-value storage of annotation lists by image id.
pub trait AnnotationStore {
    /// Annotations stored for `id`, empty when there is no record.
    fn get(&self, id: &ImageId) -> Result<Vec<Annotation>, StoreError>;

    /// Replace the record for `id`. Last writer wins.
    fn save(&mut self, id: &ImageId, annotations: &[Annotation]) -> Result<(), StoreError>;

    /// Remove the record for `id`.
    fn clear(&mut self, id: &ImageId) -> Result<(), StoreError>;

    /// Every stored record.
    fn export_all(&self) -> Result<Vec<AnnotationRecord>, StoreError>;

    /// Upsert all records in one commit; later duplicates win.
    fn import_all(&mut self, records: Vec<AnnotationRecord>) -> Result<(), StoreError>;

    /// Append one annotation to the record for `id`.
    ///
    /// Read-modify-write: two processes appending to the same image race and
    /// the last save wins.
    fn append(&mut self, id: &ImageId, annotation: Annotation) -> Result<(), StoreError> {
        let mut annotations = self.get(id)?;
        annotations.push(annotation);
        self.save(id, &annotations)
    }

    /// Validate a raw import document and import it. Returns the record count.
    ///
    /// Nothing is written unless every record in the document is well formed.
    fn import_value(&mut self, document: serde_json::Value) -> Result<usize, StoreError> {
        let records = parse_records(document)?;
        let count = records.len();
        self.import_all(records)?;
        Ok(count)
    }
}

/// Volatile store used for tests and when no store file is available.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: BTreeMap<ImageId, Vec<Annotation>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AnnotationStore for MemoryStore {
    fn get(&self, id: &ImageId) -> Result<Vec<Annotation>, StoreError> {
        Ok(self.records.get(id).cloned().unwrap_or_default())
    }

    fn save(&mut self, id: &ImageId, annotations: &[Annotation]) -> Result<(), StoreError> {
        self.records.insert(id.clone(), annotations.to_vec());
        Ok(())
    }

    fn clear(&mut self, id: &ImageId) -> Result<(), StoreError> {
        self.records.remove(id);
        Ok(())
    }

    fn export_all(&self) -> Result<Vec<AnnotationRecord>, StoreError> {
        Ok(to_records(&self.records))
    }

    fn import_all(&mut self, records: Vec<AnnotationRecord>) -> Result<(), StoreError> {
        merge_records(&mut self.records, records);
        Ok(())
    }
}

fn to_records(map: &BTreeMap<ImageId, Vec<Annotation>>) -> Vec<AnnotationRecord> {
    map.iter()
        .map(|(id, annotations)| AnnotationRecord::new(id.clone(), annotations.clone()))
        .collect()
}

fn merge_records(map: &mut BTreeMap<ImageId, Vec<Annotation>>, records: Vec<AnnotationRecord>) {
    for record in records {
        map.insert(record.image_id, record.annotations);
    }
}
