use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::model::Directory;

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("cannot read fixture {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid fixture: {0}")]
    Json(#[from] serde_json::Error),
}

/// Read a directory snapshot from a JSON file.
pub fn load(path: &Path) -> Result<Directory, FixtureError> {
    let text = std::fs::read_to_string(path).map_err(|source| FixtureError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let directory = parse(&text)?;
    tracing::debug!(path = %path.display(), "fixture loaded");
    Ok(directory)
}

pub fn parse(json: &str) -> Result<Directory, FixtureError> {
    Ok(serde_json::from_str(json)?)
}
