//! Reading uploaded files.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::IntakeError;

/// Read the bytes of an `.svg` file (extension checked case-insensitively).
pub fn read_upload(path: &Path) -> Result<Vec<u8>, IntakeError> {
    if !path.is_file() {
        return Err(IntakeError::MissingFile(path.to_path_buf()));
    }
    if !has_svg_extension(path) {
        return Err(IntakeError::BadExtension(path.to_path_buf()));
    }
    Ok(fs::read(path)?)
}

fn has_svg_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("svg"))
}

/// A directory that keeps a copy of every accepted upload.
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store `bytes` under `file_name` (its last path component only),
    /// creating the directory if needed. Returns the stored path.
    pub fn save(&self, file_name: &Path, bytes: &[u8]) -> Result<PathBuf, IntakeError> {
        let name = file_name
            .file_name()
            .ok_or_else(|| IntakeError::MissingFile(file_name.to_path_buf()))?;
        fs::create_dir_all(&self.dir)?;
        let dest = self.dir.join(name);
        fs::write(&dest, bytes)?;
        log::debug!("stored upload at {}", dest.display());
        Ok(dest)
    }
}
