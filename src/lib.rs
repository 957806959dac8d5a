#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// Thin command-line runner used by the `marquee` binary.
pub mod apps;
/// Engine configuration, manifests, and run settings.
pub mod config;
/// Centralized constants used across sampling, templates, and persistence.
pub mod constants;
/// Immutable named word lists.
pub mod corpus;
/// Performer-name and role generation.
pub mod engine;
/// Candidate filters and filtered draws.
pub mod filters;
/// Ledger of previously produced values.
pub mod history;
/// Template tokens and expansion.
pub mod pattern;
/// Pool categories and corpus pools.
pub mod pool;
/// Exhaustion-tracking draws.
pub mod sampler;
/// Corpus loaders.
pub mod source;
/// History persistence backends.
pub mod store;
/// Filesystem transport used by corpus sources.
pub mod transport;
/// Shared type aliases.
pub mod types;

mod errors;

pub use config::{CorporaManifest, CorpusRef, EngineBuilder, EngineConfig, Settings};
pub use corpus::Corpus;
pub use engine::Engine;
pub use errors::MarqueeError;
pub use filters::{Filter, FilterChain, FilterSpec, draw_filtered};
pub use history::History;
pub use pattern::{Token, expand_template, title_case};
pub use pool::{CorpusPool, PoolKind};
pub use sampler::{
    draw_from_pool, is_corpus_exhausted, is_pool_exhausted, select_corpus_from_pool,
    select_value_from_corpus,
};
pub use source::{CorpusSource, DirectoryCorpusSource, InMemoryCorpusSource};
pub use store::{FileHistoryStore, HistoryStore, InMemoryHistoryStore};
pub use types::{CategoryId, CorpusId, CorpusItem, DomainName, FilterPattern, Template};
