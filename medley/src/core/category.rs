//! Input categories and invocation modes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of input a stage consumes.
///
/// Categories are an open vocabulary: the orchestrator only uses them to
/// route collected files, so any string is valid. Constructors are provided
/// for the categories the stock pipeline ships with.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InputCategory(String);

impl InputCategory {
    /// Creates a category from an arbitrary tag.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    /// Audio files (wav, flac, mp3).
    #[must_use]
    pub fn audio() -> Self {
        Self::new("audio")
    }

    /// MIDI files.
    #[must_use]
    pub fn midi() -> Self {
        Self::new("midi")
    }

    /// MusicXML scores.
    #[must_use]
    pub fn musicxml() -> Self {
        Self::new("musicxml")
    }

    /// The accumulated run report, for aggregation stages.
    #[must_use]
    pub fn report() -> Self {
        Self::new("report")
    }

    /// Returns the category tag.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InputCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for InputCategory {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

/// How the executor dispatches a stage over its matching inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvocationMode {
    /// One invocation per matching file.
    PerFile,
    /// A single invocation carrying the accumulated run report.
    Batch,
}

impl Default for InvocationMode {
    fn default() -> Self {
        Self::PerFile
    }
}

impl fmt::Display for InvocationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PerFile => write!(f, "per_file"),
            Self::Batch => write!(f, "batch"),
        }
    }
}
