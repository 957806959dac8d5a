use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::MarqueeError;
use crate::types::{CorpusItem, DomainName};

/// Immutable named list of candidate strings.
///
/// The name doubles as the history domain under which values drawn from this
/// corpus are recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Corpus {
    name: DomainName,
    items: Vec<CorpusItem>,
}

impl Corpus {
    /// Create a corpus from a literal list (duplicates kept, order preserved).
    pub fn new<N, I, V>(name: N, items: I) -> Self
    where
        N: Into<DomainName>,
        I: IntoIterator<Item = V>,
        V: Into<CorpusItem>,
    {
        Self {
            name: name.into(),
            items: items.into_iter().map(Into::into).collect(),
        }
    }

    /// Decode the array stored under `domain` in a JSON object.
    ///
    /// `origin` only labels errors (usually the file path). Other top-level
    /// keys (for example `description`) are ignored.
    pub fn from_json_str(
        name: impl Into<DomainName>,
        origin: &str,
        json: &str,
        domain: &str,
    ) -> Result<Self, MarqueeError> {
        let mut data: Map<String, Value> =
            serde_json::from_str(json).map_err(|err| MarqueeError::decode(origin, err))?;
        let raw = data
            .remove(domain)
            .ok_or_else(|| MarqueeError::UnknownCorpusDomain {
                origin: origin.to_string(),
                domain: domain.to_string(),
            })?;
        let items: Vec<CorpusItem> =
            serde_json::from_value(raw).map_err(|err| MarqueeError::decode(origin, err))?;
        Ok(Self::new(name, items))
    }

    /// History domain name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All items in their original order.
    pub fn items(&self) -> &[CorpusItem] {
        &self.items
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when the corpus holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Uniform pick that ignores history; `None` for an empty corpus.
    pub fn random_item<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&str> {
        self.items.choose(rng).map(String::as_str)
    }
}
