// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document bundles — a JSON file holding one document's header and items,
// with an optional logo image next to it. The CLI's stand-in for the
// data-fetch layer.

use std::path::{Path, PathBuf};

use lembar_core::error::{LembarError, Result};
use lembar_core::{DocumentHeader, DocumentKey, ItemRow};
use lembar_render::{DocumentSource, ResolvedDocument};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// On-disk shape of a bundle file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Bundle {
    /// Lookup key. Defaults to the file stem.
    #[serde(default)]
    pub key: Option<String>,
    pub header: DocumentHeader,
    #[serde(default)]
    pub items: Vec<ItemRow>,
    /// Logo image path, relative to the bundle file.
    #[serde(default)]
    pub logo_path: Option<PathBuf>,
}

/// Serves the single document stored in one bundle file.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn read_bundle(&self) -> Result<Bundle> {
        let data = std::fs::read_to_string(&self.path)?;
        let bundle: Bundle = serde_json::from_str(&data)?;
        debug!(path = %self.path.display(), items = bundle.items.len(), "Bundle read");
        Ok(bundle)
    }

    /// Key of the bundle's document: its `key` field or the file stem.
    pub fn key(&self) -> Result<DocumentKey> {
        let bundle = self.read_bundle()?;
        Ok(DocumentKey(self.key_of(&bundle)))
    }

    fn key_of(&self, bundle: &Bundle) -> String {
        bundle.key.clone().unwrap_or_else(|| {
            self.path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default()
        })
    }

    /// A logo that cannot be read prints without a logo.
    fn load_logo(&self, relative: &Path) -> Option<Vec<u8>> {
        let base = self.path.parent().unwrap_or_else(|| Path::new("."));
        let logo_path = base.join(relative);
        match std::fs::read(&logo_path) {
            Ok(bytes) => Some(bytes),
            Err(err) => {
                warn!(path = %logo_path.display(), %err, "Logo not readable, printing without it");
                None
            }
        }
    }
}

impl DocumentSource for JsonFileSource {
    fn fetch(&self, key: &DocumentKey) -> Result<ResolvedDocument> {
        let bundle = self.read_bundle()?;
        if self.key_of(&bundle) != key.0 {
            return Err(LembarError::DocumentNotFound(key.to_string()));
        }
        let mut header = bundle.header;
        if let Some(relative) = bundle.logo_path.as_deref() {
            header.organization.logo = self.load_logo(relative);
        }
        Ok(ResolvedDocument {
            header,
            items: bundle.items,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const BUNDLE: &str = r#"{
        "header": {
            "number": "SJ-2026-001",
            "date": "2026-03-14",
            "organization": { "id": "org-1", "name": "PT Sinar Abadi" }
        },
        "items": [
            { "name": "Semen 50kg", "quantity": 12, "unit": "sak", "sort_order": 2 },
            { "name": "Pasir", "quantity": 1.5, "unit": "m3" }
        ],
        "logo_path": "logo.png"
    }"#;

    #[test]
    fn key_defaults_to_file_stem() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sj-1.json");
        std::fs::write(&path, BUNDLE).unwrap();
        let source = JsonFileSource::new(&path);
        assert_eq!(source.key().unwrap(), DocumentKey("sj-1".into()));
    }

    #[test]
    fn fetch_resolves_logo_relative_to_bundle() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sj-1.json");
        std::fs::write(&path, BUNDLE).unwrap();
        std::fs::write(dir.path().join("logo.png"), b"logo-bytes").unwrap();

        let doc = JsonFileSource::new(&path)
            .fetch(&DocumentKey("sj-1".into()))
            .unwrap();
        assert_eq!(doc.items.len(), 2);
        assert_eq!(doc.header.organization.logo.as_deref(), Some(b"logo-bytes".as_slice()));
    }

    #[test]
    fn missing_logo_file_is_not_fatal() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sj-1.json");
        std::fs::write(&path, BUNDLE).unwrap();
        let doc = JsonFileSource::new(&path)
            .fetch(&DocumentKey("sj-1".into()))
            .unwrap();
        assert!(doc.header.organization.logo.is_none());
    }

    #[test]
    fn other_key_is_not_found() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sj-1.json");
        std::fs::write(&path, BUNDLE).unwrap();
        let err = JsonFileSource::new(&path)
            .fetch(&DocumentKey("sj-2".into()))
            .unwrap_err();
        assert!(matches!(err, LembarError::DocumentNotFound(_)));
    }

    #[test]
    fn malformed_bundle_is_a_serialization_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = JsonFileSource::new(&path).read_bundle().unwrap_err();
        assert!(matches!(err, LembarError::Serialization(_)));
    }
}
