//! One JSON question-pool file per theme, created on first use and treated
//! as read-only afterwards.
//!
//! The file holds an array of `{id, question, answer, explanation,
//! difficulty}` objects. Because generation is a pure function of
//! `(theme, total)`, re-creating a deleted file reproduces the same bytes,
//! and loading never mutates an existing pool.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::questions::{QuestionRecord, generate_pool};
use crate::types::Theme;

#[derive(Debug)]
pub enum PoolFileError {
    /// Underlying I/O failure.
    Io(io::Error),
    /// The file exists but does not parse as a question pool.
    Malformed { path: PathBuf, message: String },
}

impl fmt::Display for PoolFileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(error) => write!(f, "question pool I/O error: {error}"),
            Self::Malformed { path, message } => {
                write!(f, "malformed question pool {}: {message}", path.display())
            }
        }
    }
}

impl std::error::Error for PoolFileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(error) => Some(error),
            Self::Malformed { .. } => None,
        }
    }
}

pub fn pool_path(dir: &Path, theme: Theme) -> PathBuf {
    dir.join(format!("questions_{}.json", theme.key()))
}

/// Load the pool for `theme`, generating and writing it first if the file
/// does not exist yet. Existing files are never rewritten.
pub fn load_or_create(
    dir: &Path,
    theme: Theme,
    total: usize,
) -> Result<Vec<QuestionRecord>, PoolFileError> {
    let path = pool_path(dir, theme);
    if path.exists() {
        let content = fs::read_to_string(&path).map_err(PoolFileError::Io)?;
        return serde_json::from_str(&content)
            .map_err(|error| PoolFileError::Malformed { path, message: error.to_string() });
    }

    let pool = generate_pool(theme, total);
    fs::create_dir_all(dir).map_err(PoolFileError::Io)?;
    let json = serde_json::to_string_pretty(&pool)
        .map_err(io::Error::other)
        .map_err(PoolFileError::Io)?;
    fs::write(&path, json).map_err(PoolFileError::Io)?;
    Ok(pool)
}
