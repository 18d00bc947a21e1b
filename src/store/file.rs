// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Durable store backed by a single JSON file.
//!
//! The file holds the same array of records that an export produces. Each
//! mutation writes the complete set to a sibling temp file and renames it
//! into place, so the on-disk file is always either the old or the new set.

use super::{merge_records, to_records, AnnotationStore};
use crate::error::StoreError;
use crate::models::annotation::{Annotation, ImageId};
use crate::models::record::{parse_records, AnnotationRecord};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Annotation store persisted to a JSON file.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    records: BTreeMap<ImageId, Vec<Annotation>>,
}

impl JsonFileStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let mut records = BTreeMap::new();

        match std::fs::read_to_string(&path) {
            Ok(json) => {
                let value: serde_json::Value =
                    serde_json::from_str(&json).map_err(|source| StoreError::Corrupt {
                        path: path.clone(),
                        source,
                    })?;
                // Same checks as an import, so whatever loads can be exported and re-imported
                let loaded = parse_records(value).inspect_err(|e| {
                    log::error!("Rejecting annotation store {}: {}", path.display(), e);
                })?;
                merge_records(&mut records, loaded);
                log::info!(
                    "Opened annotation store {} ({} images)",
                    path.display(),
                    records.len()
                );
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No annotation store at {}, starting empty", path.display());
            }
            Err(source) => return Err(StoreError::Io { path, source }),
        }

        Ok(Self { path, records })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Apply `change` to a copy of the records and persist it. The in-memory
    /// state is only replaced once the file has been written.
    fn commit<F>(&mut self, change: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut BTreeMap<ImageId, Vec<Annotation>>),
    {
        let mut next = self.records.clone();
        change(&mut next);
        self.write(&next)?;
        self.records = next;
        Ok(())
    }

    fn write(&self, records: &BTreeMap<ImageId, Vec<Annotation>>) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(&to_records(records))?;
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        std::fs::write(&tmp, json).map_err(io_err)?;
        std::fs::rename(&tmp, &self.path).map_err(io_err)?;
        log::debug!("Wrote {} records to {}", records.len(), self.path.display());
        Ok(())
    }
}

impl AnnotationStore for JsonFileStore {
    fn get(&self, id: &ImageId) -> Result<Vec<Annotation>, StoreError> {
        Ok(self.records.get(id).cloned().unwrap_or_default())
    }

    fn save(&mut self, id: &ImageId, annotations: &[Annotation]) -> Result<(), StoreError> {
        self.commit(|records| {
            records.insert(id.clone(), annotations.to_vec());
        })
    }

    fn clear(&mut self, id: &ImageId) -> Result<(), StoreError> {
        if !self.records.contains_key(id) {
            return Ok(());
        }
        self.commit(|records| {
            records.remove(id);
        })
    }

    fn export_all(&self) -> Result<Vec<AnnotationRecord>, StoreError> {
        Ok(to_records(&self.records))
    }

    fn import_all(&mut self, records: Vec<AnnotationRecord>) -> Result<(), StoreError> {
        self.commit(|current| merge_records(current, records))
    }
}
