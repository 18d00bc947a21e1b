// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation record export and import.
//!
//! This module handles writing every stored record to a backup file and
//! reading one back, in JSON or YAML depending on the file extension.
//! Imported documents are returned untyped so the store can validate the
//! whole batch before writing any of it.

use crate::models::record::AnnotationRecord;
use anyhow::{bail, Result};
use serde_json::Value;
use std::path::Path;

/// Backup file format, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
}

impl Format {
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path.extension().and_then(|s| s.to_str());
        match extension.map(str::to_ascii_lowercase).as_deref() {
            Some("json") => Ok(Format::Json),
            Some("yaml") | Some("yml") => Ok(Format::Yaml),
            _ => bail!("Unsupported file extension: {:?}", extension),
        }
    }
}

/// Export records to JSON format.
pub fn export_json(records: &[AnnotationRecord], path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(records)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Export records to YAML format.
pub fn export_yaml(records: &[AnnotationRecord], path: &Path) -> Result<()> {
    let yaml = serde_yaml::to_string(records)?;
    std::fs::write(path, yaml)?;
    Ok(())
}

/// Export records in the format implied by the extension of `path`.
pub fn export(records: &[AnnotationRecord], path: &Path) -> Result<()> {
    match Format::from_path(path)? {
        Format::Json => export_json(records, path),
        Format::Yaml => export_yaml(records, path),
    }
}

/// Read an import document from JSON format.
pub fn read_json(path: &Path) -> Result<Value> {
    let json = std::fs::read_to_string(path)?;
    let document = serde_json::from_str(&json)?;
    Ok(document)
}

/// Read an import document from YAML format.
pub fn read_yaml(path: &Path) -> Result<Value> {
    let yaml = std::fs::read_to_string(path)?;
    let document = serde_yaml::from_str(&yaml)?;
    Ok(document)
}

/// Read an import document in the format implied by the extension of `path`.
pub fn read_document(path: &Path) -> Result<Value> {
    match Format::from_path(path)? {
        Format::Json => read_json(path),
        Format::Yaml => read_yaml(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::annotation::{Annotation, HexColor, ImageId};
    use crate::store::{AnnotationStore, MemoryStore};
    use crate::util::geometry::PctRect;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn records() -> Vec<AnnotationRecord> {
        let rect = PctRect { x: 0.1, y: 0.2, width: 0.3, height: 0.4 };
        vec![
            AnnotationRecord::new(
                ImageId::Number(4995),
                vec![Annotation::new(rect, "Face".to_string(), HexColor::default())],
            ),
            AnnotationRecord::new(ImageId::from("beach"), Vec::new()),
        ]
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(Format::from_path(&PathBuf::from("a.JSON")).unwrap(), Format::Json);
        assert_eq!(Format::from_path(&PathBuf::from("a.yml")).unwrap(), Format::Yaml);
        assert!(Format::from_path(&PathBuf::from("a.txt")).is_err());
        assert!(Format::from_path(&PathBuf::from("annotations")).is_err());
    }

    #[test]
    fn test_json_export_shape() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("stash-image-annotations.json");
        export(&records(), &path).unwrap();

        let document = read_document(&path).unwrap();
        assert_eq!(document[0]["imageId"], 4995);
        assert_eq!(document[0]["annotations"][0]["label"], "Face");
        assert_eq!(document[0]["annotations"][0]["wPct"], 0.3);
        assert_eq!(document[1]["imageId"], "beach");
    }

    #[test]
    fn test_yaml_export_imports_into_store() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("backup.yaml");
        export(&records(), &path).unwrap();

        let mut store = MemoryStore::new();
        let count = store.import_value(read_document(&path).unwrap()).unwrap();
        assert_eq!(count, 2);
        assert_eq!(store.export_all().unwrap(), records());
    }
}
