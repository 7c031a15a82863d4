//! Locally persisted snapshot of the service point directory.
//!
//! The snapshot is a raw copy of the carrier's wire-format document, kept
//! on disk for when the remote API is unavailable. Saving validates the
//! document before touching the file, so a bad payload can never clobber
//! the last known-good snapshot.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::carrier::{ServicePointListDto, to_service_point};
use crate::domain::ServicePoint;

/// Errors from snapshot load/save.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// Reading or writing the snapshot file failed
    #[error("snapshot I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document is not a well-formed wire-format document
    #[error("malformed snapshot document: {message}")]
    Malformed { message: String },

    /// The document parsed but held no service point list
    #[error("snapshot contained no service point list")]
    MissingPayload,
}

/// Store for the on-disk snapshot file.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    /// Create a store for the given snapshot file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load the snapshot and map it to domain records.
    ///
    /// Only parcel-outlet-eligible entries are kept, de-duplicated by id
    /// (first occurrence wins).
    pub fn load(&self) -> Result<Vec<ServicePoint>, SnapshotError> {
        let contents = std::fs::read_to_string(&self.path).map_err(|e| SnapshotError::Io {
            path: self.path.clone(),
            source: e,
        })?;

        let root: ServicePointListDto =
            serde_json::from_str(&contents).map_err(|e| SnapshotError::Malformed {
                message: e.to_string(),
            })?;

        let Some(points) = root
            .service_point_information_response
            .and_then(|response| response.service_points)
        else {
            return Err(SnapshotError::MissingPayload);
        };

        let mut seen = HashSet::new();
        let mut result = Vec::new();
        for dto in &points {
            if !dto.eligible_parcel_outlet {
                continue;
            }
            if !seen.insert(dto.service_point_id.clone()) {
                continue;
            }
            result.push(to_service_point(dto));
        }

        Ok(result)
    }

    /// Validate and persist a raw wire-format document.
    ///
    /// The document must parse as wire format before the file is replaced;
    /// otherwise the existing snapshot is left untouched and an error is
    /// returned.
    ///
    /// Creates parent directories if they don't exist.
    pub fn save_raw(&self, raw: &str) -> Result<(), SnapshotError> {
        serde_json::from_str::<ServicePointListDto>(raw).map_err(|e| {
            SnapshotError::Malformed {
                message: e.to_string(),
            }
        })?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| SnapshotError::Io {
                path: self.path.clone(),
                source: e,
            })?;
        }

        std::fs::write(&self.path, raw).map_err(|e| SnapshotError::Io {
            path: self.path.clone(),
            source: e,
        })
    }

    /// Get the snapshot file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}
