//! Machine-readable summary of one plotting run.
//!
//! Written into the output directory after all charts render, so downstream
//! tooling can see what a run produced without globbing for PNGs. The write
//! goes to a temp file in the same directory first and is renamed over the
//! target, so a crash never leaves a half-written manifest.

use crate::render::ChartFile;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};

pub const MANIFEST_FILE: &str = "manifest.json";

/// Summary of one run: input, counts, and the charts written.
#[derive(Debug, Serialize)]
pub struct RunManifest {
    pub generated_at: DateTime<Utc>,
    pub input: PathBuf,
    pub record_count: usize,
    pub experiment_count: usize,
    pub charts: Vec<ChartFile>,
}

#[derive(Debug)]
pub enum ManifestError {
    Serialize {
        source: serde_json::Error,
    },
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    Rename {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },
}

impl std::fmt::Display for ManifestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ManifestError::Serialize { source } => {
                write!(f, "failed to serialize manifest: {source}")
            }
            ManifestError::Write { path, source } => {
                write!(f, "failed to write manifest {}: {source}", path.display())
            }
            ManifestError::Rename { from, to, source } => write!(
                f,
                "failed to rename manifest {} -> {}: {source}",
                from.display(),
                to.display()
            ),
        }
    }
}

impl std::error::Error for ManifestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ManifestError::Serialize { source } => Some(source),
            ManifestError::Write { source, .. } => Some(source),
            ManifestError::Rename { source, .. } => Some(source),
        }
    }
}

impl RunManifest {
    pub fn new(
        input: &Path,
        record_count: usize,
        experiment_count: usize,
        charts: Vec<ChartFile>,
    ) -> Self {
        Self {
            generated_at: Utc::now(),
            input: input.to_path_buf(),
            record_count,
            experiment_count,
            charts,
        }
    }

    /// Write the manifest into `dir` as `manifest.json`, atomically.
    /// Returns the manifest path.
    pub fn write(&self, dir: &Path) -> Result<PathBuf, ManifestError> {
        let path = dir.join(MANIFEST_FILE);
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ManifestError::Serialize { source: e })?;
        let tmp_path = dir.join(format!(".{}.tmp.{}", MANIFEST_FILE, std::process::id()));
        std::fs::write(&tmp_path, json.as_bytes()).map_err(|e| ManifestError::Write {
            path: tmp_path.clone(),
            source: e,
        })?;
        std::fs::rename(&tmp_path, &path).map_err(|e| ManifestError::Rename {
            from: tmp_path,
            to: path.clone(),
            source: e,
        })?;
        Ok(path)
    }
}
