use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelLocateError {
    #[error("model not found: {0}")]
    NotFound(PathBuf),
    #[error("model directory {dir} does not contain {file}")]
    MissingInDirectory { dir: PathBuf, file: String },
}

/// Resolves a model argument that may name either a file or a directory.
///
/// A directory must contain `default_file`; a file is returned as is.
/// Nothing is downloaded: the path given on the command line is the only
/// place a model is looked up.
pub fn locate(path: &Path, default_file: &str) -> Result<PathBuf, ModelLocateError> {
    if path.is_dir() {
        let candidate = path.join(default_file);
        if candidate.is_file() {
            return Ok(candidate);
        }
        return Err(ModelLocateError::MissingInDirectory {
            dir: path.to_path_buf(),
            file: default_file.to_string(),
        });
    }
    if path.is_file() {
        return Ok(path.to_path_buf());
    }
    Err(ModelLocateError::NotFound(path.to_path_buf()))
}

/// Resolves a model argument that must name a regular file.
pub fn require_file(path: &Path) -> Result<PathBuf, ModelLocateError> {
    if path.is_file() {
        Ok(path.to_path_buf())
    } else {
        Err(ModelLocateError::NotFound(path.to_path_buf()))
    }
}
