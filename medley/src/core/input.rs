//! Input references passed to stage invocations.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// What a single invocation was dispatched against.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputRef {
    /// A single collected file.
    File(PathBuf),
    /// The accumulated run report (batch stages).
    Batch,
}

impl InputRef {
    /// Returns the file path, if this reference is a file.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::File(path) => Some(path),
            Self::Batch => None,
        }
    }

    /// Returns true if this reference is the accumulated report.
    #[must_use]
    pub fn is_batch(&self) -> bool {
        matches!(self, Self::Batch)
    }
}

impl fmt::Display for InputRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Batch => write!(f, "<reports>"),
        }
    }
}

impl From<PathBuf> for InputRef {
    fn from(path: PathBuf) -> Self {
        Self::File(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_ref_path() {
        let input = InputRef::File(PathBuf::from("takes/drums.wav"));
        assert_eq!(input.path(), Some(Path::new("takes/drums.wav")));
        assert!(!input.is_batch());
    }

    #[test]
    fn test_batch_ref_display() {
        assert_eq!(InputRef::Batch.to_string(), "<reports>");
        assert!(InputRef::Batch.path().is_none());
    }
}
