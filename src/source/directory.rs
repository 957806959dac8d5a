use std::path::{Path, PathBuf};

use tracing::debug;

use crate::constants::corpus::CORPUS_FILE_EXTENSION;
use crate::corpus::Corpus;
use crate::errors::MarqueeError;
use crate::source::CorpusSource;
use crate::transport::fs::{CorpusDir, file_stem, read_text};
use crate::types::CorpusId;

/// Reads corpora laid out as `<root>/<category>/<corpus id>.json`.
#[derive(Debug, Clone)]
pub struct DirectoryCorpusSource {
    root: PathBuf,
    follow_links: bool,
}

impl DirectoryCorpusSource {
    /// Source rooted at the corpora directory `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            follow_links: true,
        }
    }

    /// Override whether symlinked corpus files are followed.
    pub fn with_follow_links(mut self, follow_links: bool) -> Self {
        self.follow_links = follow_links;
        self
    }

    /// Corpora root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file backing `category/corpus_id`.
    pub fn corpus_path(&self, category: &str, corpus_id: &str) -> PathBuf {
        self.root
            .join(category)
            .join(format!("{corpus_id}.{CORPUS_FILE_EXTENSION}"))
    }
}

impl CorpusSource for DirectoryCorpusSource {
    fn load(
        &self,
        category: &str,
        corpus_id: &str,
        domain: Option<&str>,
    ) -> Result<Corpus, MarqueeError> {
        let path = self.corpus_path(category, corpus_id);
        let contents = read_text(&path)?;
        let corpus = Corpus::from_json_str(
            corpus_id,
            &path.display().to_string(),
            &contents,
            domain.unwrap_or(corpus_id),
        )?;
        debug!(
            "[marquee:corpus] loaded {} item(s) from {}",
            corpus.len(),
            path.display()
        );
        Ok(corpus)
    }

    fn corpus_ids(&self, category: &str) -> Result<Vec<CorpusId>, MarqueeError> {
        let files = CorpusDir::new(self.root.join(category))
            .with_follow_symlinks(self.follow_links)
            .corpus_files()?;
        Ok(files.iter().filter_map(|path| file_stem(path)).collect())
    }
}
