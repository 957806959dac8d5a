use std::fmt;

use serde::{Deserialize, Serialize};

use crate::corpus::Corpus;

/// Named pool categories the engine draws from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolKind {
    /// Given names (`%F`).
    FirstName,
    /// Family names (`%L`).
    LastName,
    /// Titles such as `Admiral` (`%H`).
    Honorific,
    /// Job descriptions used in roles (`%O`).
    Occupation,
    /// Stand-alone character names used in roles (`%C`).
    CharacterName,
    /// Words placed before a performer's name (`%P`).
    PerformerPrefix,
}

impl PoolKind {
    /// Every pool kind in registration order.
    pub const ALL: [PoolKind; 6] = [
        PoolKind::FirstName,
        PoolKind::LastName,
        PoolKind::Honorific,
        PoolKind::Occupation,
        PoolKind::CharacterName,
        PoolKind::PerformerPrefix,
    ];

    /// Stable label used in logs and errors.
    pub const fn as_str(&self) -> &'static str {
        match self {
            PoolKind::FirstName => "first_name",
            PoolKind::LastName => "last_name",
            PoolKind::Honorific => "honorific",
            PoolKind::Occupation => "occupation",
            PoolKind::CharacterName => "character_name",
            PoolKind::PerformerPrefix => "performer_prefix",
        }
    }
}

impl fmt::Display for PoolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named group of interchangeable corpora.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CorpusPool {
    name: String,
    corpora: Vec<Corpus>,
}

impl CorpusPool {
    /// Empty pool labelled `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            corpora: Vec::new(),
        }
    }

    /// Pool holding `corpora`.
    pub fn with_corpora(name: impl Into<String>, corpora: impl IntoIterator<Item = Corpus>) -> Self {
        Self {
            name: name.into(),
            corpora: corpora.into_iter().collect(),
        }
    }

    /// Add a corpus to the pool.
    pub fn register(&mut self, corpus: Corpus) {
        self.corpora.push(corpus);
    }

    /// Pool label used in logs and errors.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Member corpora in registration order.
    pub fn corpora(&self) -> &[Corpus] {
        &self.corpora
    }

    /// Number of corpora.
    pub fn len(&self) -> usize {
        self.corpora.len()
    }

    /// True when no corpus is registered.
    pub fn is_empty(&self) -> bool {
        self.corpora.is_empty()
    }
}
