//! Input file collection.
//!
//! The executor treats collected files as an already-available list per
//! category; this module is the stock collaborator that produces those
//! lists from directories on disk.

use crate::core::InputCategory;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

/// Default audio extensions.
pub const AUDIO_EXTENSIONS: [&str; 3] = ["wav", "flac", "mp3"];
/// Default MIDI extensions.
pub const MIDI_EXTENSIONS: [&str; 2] = ["mid", "midi"];
/// Default MusicXML extensions.
pub const MUSICXML_EXTENSIONS: [&str; 2] = ["xml", "musicxml"];

/// Lists regular files in `dir` whose extension (case-insensitive)
/// matches, sorted by path. A missing directory yields an empty list;
/// the listing is not recursive.
///
/// # Errors
///
/// Returns an IO error if the directory exists but cannot be read.
pub fn collect_files(dir: &Path, extensions: &[&str]) -> io::Result<Vec<PathBuf>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let matches = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                let ext = ext.to_lowercase();
                extensions.iter().any(|e| *e == ext)
            });
        if matches {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

/// Collected input files, grouped by category.
#[derive(Debug, Clone, Default)]
pub struct FileSet {
    files: HashMap<InputCategory, Vec<PathBuf>>,
}

impl FileSet {
    /// Creates an empty file set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects the stock media categories from their directories.
    ///
    /// # Errors
    ///
    /// Returns an IO error if a directory exists but cannot be read.
    pub fn from_media_dirs(
        audio_dir: &Path,
        midi_dir: &Path,
        musicxml_dir: &Path,
    ) -> io::Result<Self> {
        let mut set = Self::new();
        set.insert(InputCategory::audio(), collect_files(audio_dir, &AUDIO_EXTENSIONS)?);
        set.insert(InputCategory::midi(), collect_files(midi_dir, &MIDI_EXTENSIONS)?);
        set.insert(
            InputCategory::musicxml(),
            collect_files(musicxml_dir, &MUSICXML_EXTENSIONS)?,
        );
        Ok(set)
    }

    /// Sets the files for a category, replacing any existing list.
    pub fn insert(&mut self, category: InputCategory, files: Vec<PathBuf>) {
        self.files.insert(category, files);
    }

    /// Returns the files collected for a category; unknown categories
    /// are simply empty.
    #[must_use]
    pub fn matching(&self, category: &InputCategory) -> &[PathBuf] {
        self.files.get(category).map_or(&[], Vec::as_slice)
    }

    /// Returns the total number of collected files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.values().map(Vec::len).sum()
    }

    /// Returns true if no files were collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_directory_is_empty() {
        let files = collect_files(Path::new("/nonexistent/medley-test"), &AUDIO_EXTENSIONS).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_collect_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.WAV", "a.wav", "notes.txt", "c.flac"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }
        std::fs::create_dir(dir.path().join("nested.wav")).unwrap();

        let files = collect_files(dir.path(), &AUDIO_EXTENSIONS).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.wav", "b.WAV", "c.flac"]);
    }

    #[test]
    fn test_file_set_matching() {
        let mut set = FileSet::new();
        set.insert(InputCategory::midi(), vec![PathBuf::from("song.mid")]);
        assert_eq!(set.matching(&InputCategory::midi()).len(), 1);
        assert!(set.matching(&InputCategory::audio()).is_empty());
        assert_eq!(set.len(), 1);
    }
}
