use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::constants::corpus::CORPUS_FILE_EXTENSION;
use crate::errors::MarqueeError;

/// Flat listing of corpus files inside a single category directory.
pub struct CorpusDir {
    root: PathBuf,
    follow_links: bool,
}

impl CorpusDir {
    /// Listing rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            follow_links: false,
        }
    }

    /// Configure symlink traversal.
    pub fn with_follow_symlinks(mut self, follow_links: bool) -> Self {
        self.follow_links = follow_links;
        self
    }

    /// Corpus files directly under the root, sorted by path.
    pub fn corpus_files(&self) -> Result<Vec<PathBuf>, MarqueeError> {
        if !self.root.is_dir() {
            return Err(MarqueeError::Configuration(format!(
                "corpus directory '{}' not found",
                self.root.display()
            )));
        }
        let mut files: Vec<PathBuf> = WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .follow_links(self.follow_links)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|path| is_corpus_file(path))
            .collect();
        files.sort();
        Ok(files)
    }
}

/// True if the path has a `.json` extension (case-insensitive).
pub fn is_corpus_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(CORPUS_FILE_EXTENSION))
        .unwrap_or(false)
}

/// File stem as an owned string, if it is valid UTF-8.
pub fn file_stem(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(str::to_string)
}

/// Read a UTF-8 file, mapping a missing file to a configuration error.
pub fn read_text(path: &Path) -> Result<String, MarqueeError> {
    if !path.is_file() {
        return Err(MarqueeError::Configuration(format!(
            "corpus file '{}' not found",
            path.display()
        )));
    }
    Ok(fs::read_to_string(path)?)
}
