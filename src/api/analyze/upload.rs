// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Temporary on-disk staging for uploaded images

use bytes::Bytes;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum StagingError {
    #[error("Failed to stage upload: {0}")]
    Io(#[from] std::io::Error),

    #[error("Staging task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// An uploaded image written to a temporary `.dcm` file.
///
/// The file is removed when this value is dropped, on every exit path of the
/// request that owns it.
#[derive(Debug)]
pub struct StagedUpload {
    file: NamedTempFile,
    size_bytes: usize,
}

impl StagedUpload {
    /// Write `data` to a fresh temporary file in `dir` (OS temp dir if `None`)
    pub async fn stage(data: Bytes, dir: Option<PathBuf>) -> Result<Self, StagingError> {
        let size_bytes = data.len();
        let file = tokio::task::spawn_blocking(move || -> std::io::Result<NamedTempFile> {
            let mut builder = tempfile::Builder::new();
            builder.prefix("dicom-").suffix(".dcm");
            let mut file = match dir {
                Some(dir) => builder.tempfile_in(dir)?,
                None => builder.tempfile()?,
            };
            file.write_all(&data)?;
            file.flush()?;
            Ok(file)
        })
        .await??;

        debug!("Staged {} bytes at {}", size_bytes, file.path().display());
        Ok(Self { file, size_bytes })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn size_bytes(&self) -> usize {
        self.size_bytes
    }
}
