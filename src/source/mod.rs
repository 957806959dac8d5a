//! Corpus source interfaces.
//!
//! Ownership model:
//! - `CorpusSource` is the engine-facing loader: `(category, corpus id, domain?) -> Corpus`.
//! - `DirectoryCorpusSource` reads `<root>/<category>/<corpus id>.json`.
//! - `InMemoryCorpusSource` holds encoded payloads for tests and embedded lists.

use std::collections::HashMap;

use crate::corpus::Corpus;
use crate::errors::MarqueeError;
use crate::types::{CategoryId, CorpusId};

/// Directory-backed corpus source.
pub mod directory;

pub use directory::DirectoryCorpusSource;

/// Loader for named corpora.
pub trait CorpusSource: Send + Sync {
    /// Load one corpus.
    ///
    /// `domain` selects the JSON key holding the item array and defaults to
    /// `corpus_id`. The returned corpus is named after `corpus_id`.
    fn load(
        &self,
        category: &str,
        corpus_id: &str,
        domain: Option<&str>,
    ) -> Result<Corpus, MarqueeError>;

    /// Corpus identifiers available in `category`, sorted.
    fn corpus_ids(&self, category: &str) -> Result<Vec<CorpusId>, MarqueeError>;

    /// Load every corpus in `category` using the default domain convention.
    fn load_category(&self, category: &str) -> Result<Vec<Corpus>, MarqueeError> {
        self.corpus_ids(category)?
            .iter()
            .map(|corpus_id| self.load(category, corpus_id, None))
            .collect()
    }
}

/// In-memory corpus source keyed by `(category, corpus id)`.
#[derive(Debug, Default)]
pub struct InMemoryCorpusSource {
    payloads: HashMap<(CategoryId, CorpusId), String>,
}

impl InMemoryCorpusSource {
    /// Empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an encoded corpus payload.
    pub fn insert(
        &mut self,
        category: impl Into<CategoryId>,
        corpus_id: impl Into<CorpusId>,
        json: impl Into<String>,
    ) {
        self.payloads
            .insert((category.into(), corpus_id.into()), json.into());
    }

    /// Builder-style variant of [`InMemoryCorpusSource::insert`].
    pub fn with(
        mut self,
        category: impl Into<CategoryId>,
        corpus_id: impl Into<CorpusId>,
        json: impl Into<String>,
    ) -> Self {
        self.insert(category, corpus_id, json);
        self
    }
}

impl CorpusSource for InMemoryCorpusSource {
    fn load(
        &self,
        category: &str,
        corpus_id: &str,
        domain: Option<&str>,
    ) -> Result<Corpus, MarqueeError> {
        let origin = format!("{category}/{corpus_id}");
        let json = self
            .payloads
            .get(&(category.to_string(), corpus_id.to_string()))
            .ok_or_else(|| {
                MarqueeError::Configuration(format!("corpus '{origin}' not registered"))
            })?;
        Corpus::from_json_str(corpus_id, &origin, json, domain.unwrap_or(corpus_id))
    }

    fn corpus_ids(&self, category: &str) -> Result<Vec<CorpusId>, MarqueeError> {
        let mut ids: Vec<CorpusId> = self
            .payloads
            .keys()
            .filter(|(owner, _)| owner == category)
            .map(|(_, corpus_id)| corpus_id.clone())
            .collect();
        ids.sort();
        Ok(ids)
    }
}
