//! Artifact manifest: file names, row counts and digests for one run.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{OutputError, Result};
use crate::writer::{ArtifactKind, MANIFEST_FILE, WrittenArtifact, write_json};

pub const MANIFEST_SCHEMA: &str = "vgc.artifacts";
pub const MANIFEST_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactManifest {
    pub manifest: ManifestHeader,
    pub generated_at: String,
    pub lookups_sha256: String,
    pub files: Vec<ManifestFile>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestHeader {
    pub schema: String,
    pub schema_version: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestFile {
    pub path: String,
    pub kind: ArtifactKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<usize>,
    pub sha256: String,
}

impl ArtifactManifest {
    pub fn new(generated_at: &str, lookups_sha256: &str, artifacts: &[WrittenArtifact]) -> Self {
        Self {
            manifest: ManifestHeader {
                schema: MANIFEST_SCHEMA.to_string(),
                schema_version: MANIFEST_SCHEMA_VERSION,
            },
            generated_at: generated_at.to_string(),
            lookups_sha256: lookups_sha256.to_string(),
            files: artifacts
                .iter()
                .map(|artifact| ManifestFile {
                    path: artifact.name.clone(),
                    kind: artifact.kind,
                    rows: artifact.rows,
                    sha256: artifact.sha256.clone(),
                })
                .collect(),
        }
    }

    pub fn file(&self, path: &str) -> Option<&ManifestFile> {
        self.files.iter().find(|file| file.path == path)
    }
}

/// Write `manifest.json` listing every artifact of the run.
pub fn write_manifest(output_dir: &Path, manifest: &ArtifactManifest) -> Result<WrittenArtifact> {
    write_json(output_dir, MANIFEST_FILE, ArtifactKind::Summary, manifest)
}

/// Read `manifest.json` back from an output directory.
pub fn read_manifest(output_dir: &Path) -> Result<ArtifactManifest> {
    let path = output_dir.join(MANIFEST_FILE);
    let text = fs::read_to_string(&path).map_err(|source| OutputError::Read {
        artifact: MANIFEST_FILE.to_string(),
        source: vgc_ingest::IngestError::FileRead {
            path: path.clone(),
            source,
        },
    })?;
    serde_json::from_str(&text).map_err(|source| OutputError::Json {
        artifact: MANIFEST_FILE.to_string(),
        source,
    })
}
