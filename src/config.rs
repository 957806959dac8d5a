use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::constants::engine::{CORPORA_DIR_ENV, DATA_DIR_ENV, DEFAULT_MANIFEST_FILENAME};
use crate::constants::patterns::{
    DEFAULT_NAME_PATTERNS, DEFAULT_NUMERALS, DEFAULT_ROLE_PATTERNS, NAME_PATTERN_DOMAIN,
    NUMERAL_DOMAIN, ROLE_PATTERN_DOMAIN,
};
use crate::corpus::Corpus;
use crate::errors::MarqueeError;
use crate::filters::{Filter, FilterChain, FilterSpec};
use crate::pattern::tokens_in;
use crate::pool::{CorpusPool, PoolKind};
use crate::source::{CorpusSource, DirectoryCorpusSource};
use crate::store::FileHistoryStore;
use crate::types::{CategoryId, CorpusId, Template};

/// Read-only engine configuration produced by [`EngineBuilder::build`].
#[derive(Clone, Debug)]
pub struct EngineConfig {
    pools: BTreeMap<PoolKind, CorpusPool>,
    global_filters: FilterChain,
    pool_filters: BTreeMap<PoolKind, FilterChain>,
    name_patterns: CorpusPool,
    role_patterns: CorpusPool,
    numerals: CorpusPool,
    filter_retry_limit: Option<usize>,
}

impl EngineConfig {
    /// Start a new builder.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    /// Pool registered for `kind` (always present, possibly empty).
    pub fn pool(&self, kind: PoolKind) -> &CorpusPool {
        &self.pools[&kind]
    }

    /// Filters applied to every draw.
    pub fn global_filters(&self) -> &FilterChain {
        &self.global_filters
    }

    /// Filters applied to draws from `kind` only.
    pub fn pool_filters(&self, kind: PoolKind) -> &FilterChain {
        &self.pool_filters[&kind]
    }

    /// Single-corpus pool of eligible performer-name templates.
    pub fn name_patterns(&self) -> &CorpusPool {
        &self.name_patterns
    }

    /// Single-corpus pool of eligible role templates.
    pub fn role_patterns(&self) -> &CorpusPool {
        &self.role_patterns
    }

    /// Single-corpus pool of numerals substituted for `%n`.
    pub fn numerals(&self) -> &CorpusPool {
        &self.numerals
    }

    /// Optional cap on filtered re-draws.
    pub fn filter_retry_limit(&self) -> Option<usize> {
        self.filter_retry_limit
    }
}

/// Collects pools, filters, and templates before any sampling starts.
#[derive(Clone, Debug)]
pub struct EngineBuilder {
    pools: BTreeMap<PoolKind, CorpusPool>,
    global_filters: FilterChain,
    pool_filters: BTreeMap<PoolKind, FilterChain>,
    name_patterns: Vec<Template>,
    role_patterns: Vec<Template>,
    numerals: Vec<String>,
    filter_retry_limit: Option<usize>,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self {
            pools: PoolKind::ALL
                .into_iter()
                .map(|kind| (kind, CorpusPool::new(kind.as_str())))
                .collect(),
            global_filters: FilterChain::new(),
            pool_filters: PoolKind::ALL
                .into_iter()
                .map(|kind| (kind, FilterChain::new()))
                .collect(),
            name_patterns: DEFAULT_NAME_PATTERNS.map(String::from).to_vec(),
            role_patterns: DEFAULT_ROLE_PATTERNS.map(String::from).to_vec(),
            numerals: DEFAULT_NUMERALS.map(String::from).to_vec(),
            filter_retry_limit: None,
        }
    }
}

impl EngineBuilder {
    /// Builder with empty pools and the default templates.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder populated from a manifest, loading corpora through `source`.
    pub fn from_manifest(
        manifest: &CorporaManifest,
        source: &dyn CorpusSource,
    ) -> Result<Self, MarqueeError> {
        let mut builder = Self::new();
        for (kind, refs) in &manifest.pools {
            for corpus_ref in refs {
                for corpus in corpus_ref.load(source)? {
                    builder.register_corpus(*kind, corpus);
                }
            }
        }
        for spec in &manifest.global_filters {
            builder.register_global_filter(spec.build()?);
        }
        for (kind, specs) in &manifest.pool_filters {
            for spec in specs {
                builder.register_pool_filter(*kind, spec.build()?);
            }
        }
        if let Some(patterns) = &manifest.name_patterns {
            builder.name_patterns = patterns.clone();
        }
        if let Some(patterns) = &manifest.role_patterns {
            builder.role_patterns = patterns.clone();
        }
        if let Some(numerals) = &manifest.numerals {
            builder.numerals = numerals.clone();
        }
        builder.filter_retry_limit = manifest.filter_retry_limit;
        Ok(builder)
    }

    /// Add `corpus` to the pool for `kind`.
    pub fn register_corpus(&mut self, kind: PoolKind, corpus: Corpus) -> &mut Self {
        self.pools
            .entry(kind)
            .or_insert_with(|| CorpusPool::new(kind.as_str()))
            .register(corpus);
        self
    }

    /// Append a filter applied to every pool.
    pub fn register_global_filter(&mut self, filter: Filter) -> &mut Self {
        self.global_filters.push(filter);
        self
    }

    /// Append a filter applied to `kind` only.
    pub fn register_pool_filter(&mut self, kind: PoolKind, filter: Filter) -> &mut Self {
        self.pool_filters.entry(kind).or_default().push(filter);
        self
    }

    /// Consuming variant of [`EngineBuilder::register_corpus`].
    pub fn with_corpus(mut self, kind: PoolKind, corpus: Corpus) -> Self {
        self.register_corpus(kind, corpus);
        self
    }

    /// Consuming variant of [`EngineBuilder::register_global_filter`].
    pub fn with_global_filter(mut self, filter: Filter) -> Self {
        self.register_global_filter(filter);
        self
    }

    /// Consuming variant of [`EngineBuilder::register_pool_filter`].
    pub fn with_pool_filter(mut self, kind: PoolKind, filter: Filter) -> Self {
        self.register_pool_filter(kind, filter);
        self
    }

    /// Replace the performer-name templates.
    pub fn with_name_patterns<I, T>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Template>,
    {
        self.name_patterns = patterns.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the role templates.
    pub fn with_role_patterns<I, T>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Template>,
    {
        self.role_patterns = patterns.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the numerals substituted for `%n`.
    pub fn with_numerals<I, T>(mut self, numerals: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.numerals = numerals.into_iter().map(Into::into).collect();
        self
    }

    /// Cap filtered re-draws; `None` keeps retrying indefinitely.
    pub fn with_filter_retry_limit(mut self, limit: Option<usize>) -> Self {
        self.filter_retry_limit = limit;
        self
    }

    /// Freeze the configuration.
    ///
    /// Templates referencing a pool with no corpora are dropped, so a template
    /// is only ever drawn when every token in it can be filled.
    pub fn build(self) -> EngineConfig {
        let name_patterns = eligible_patterns(NAME_PATTERN_DOMAIN, &self.name_patterns, &self.pools);
        let role_patterns = eligible_patterns(ROLE_PATTERN_DOMAIN, &self.role_patterns, &self.pools);
        EngineConfig {
            name_patterns,
            role_patterns,
            numerals: single_corpus_pool(Corpus::new(NUMERAL_DOMAIN, self.numerals)),
            pools: self.pools,
            global_filters: self.global_filters,
            pool_filters: self.pool_filters,
            filter_retry_limit: self.filter_retry_limit,
        }
    }
}

fn single_corpus_pool(corpus: Corpus) -> CorpusPool {
    CorpusPool::with_corpora(corpus.name().to_string(), [corpus])
}

fn eligible_patterns(
    domain: &str,
    patterns: &[Template],
    pools: &BTreeMap<PoolKind, CorpusPool>,
) -> CorpusPool {
    let eligible = patterns.iter().filter(|pattern| {
        tokens_in(pattern).iter().all(|token| {
            token
                .pool_kind()
                .is_none_or(|kind| pools.get(&kind).is_some_and(|pool| !pool.is_empty()))
        })
    });
    single_corpus_pool(Corpus::new(domain, eligible.cloned()))
}

/// Reference to corpus files for one pool entry in a manifest.
///
/// Without `corpus`, every corpus in `category` is loaded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusRef {
    /// Category directory.
    pub category: CategoryId,
    /// Corpus file stem.
    #[serde(default)]
    pub corpus: Option<CorpusId>,
    /// JSON key holding the items; defaults to the corpus id.
    #[serde(default)]
    pub domain: Option<String>,
}

impl CorpusRef {
    fn load(&self, source: &dyn CorpusSource) -> Result<Vec<Corpus>, MarqueeError> {
        match &self.corpus {
            Some(corpus_id) => Ok(vec![source.load(
                &self.category,
                corpus_id,
                self.domain.as_deref(),
            )?]),
            None => source.load_category(&self.category),
        }
    }
}

/// Declarative pool/filter/template layout, stored as JSON.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorporaManifest {
    /// Corpora per pool.
    #[serde(default)]
    pub pools: BTreeMap<PoolKind, Vec<CorpusRef>>,
    /// Filters applied to every pool.
    #[serde(default)]
    pub global_filters: Vec<FilterSpec>,
    /// Filters applied per pool.
    #[serde(default)]
    pub pool_filters: BTreeMap<PoolKind, Vec<FilterSpec>>,
    /// Overrides the default performer-name templates.
    #[serde(default)]
    pub name_patterns: Option<Vec<Template>>,
    /// Overrides the default role templates.
    #[serde(default)]
    pub role_patterns: Option<Vec<Template>>,
    /// Overrides the default numerals.
    #[serde(default)]
    pub numerals: Option<Vec<String>>,
    /// Optional cap on filtered re-draws.
    #[serde(default)]
    pub filter_retry_limit: Option<usize>,
}

impl CorporaManifest {
    /// Decode a manifest; `origin` labels errors.
    pub fn from_json_str(origin: &str, json: &str) -> Result<Self, MarqueeError> {
        serde_json::from_str(json).map_err(|err| MarqueeError::decode(origin, err))
    }

    /// Read and decode the manifest at `path`.
    pub fn load(path: &Path) -> Result<Self, MarqueeError> {
        let contents = fs::read_to_string(path).map_err(|err| {
            MarqueeError::Configuration(format!(
                "could not read manifest '{}': {err}",
                path.display()
            ))
        })?;
        let manifest = Self::from_json_str(&path.display().to_string(), &contents)?;
        info!(
            "[marquee:config] manifest {} declares {} pool(s)",
            path.display(),
            manifest.pools.len()
        );
        Ok(manifest)
    }
}

/// Filesystem locations for a run.
#[derive(Clone, Debug)]
pub struct Settings {
    /// Directory holding `history.json`; must be writable.
    pub data_dir: PathBuf,
    /// Root of the `<category>/<corpus>.json` tree.
    pub corpora_dir: PathBuf,
    /// Manifest path; defaults to `manifest.json` under the corpora root.
    pub manifest_path: PathBuf,
}

impl Settings {
    /// Settings for explicit directories.
    pub fn new(data_dir: impl Into<PathBuf>, corpora_dir: impl Into<PathBuf>) -> Self {
        let corpora_dir = corpora_dir.into();
        Self {
            data_dir: data_dir.into(),
            manifest_path: corpora_dir.join(DEFAULT_MANIFEST_FILENAME),
            corpora_dir,
        }
    }

    /// Settings from `MARQUEE_DATA` and `MARQUEE_CORPORA`.
    pub fn from_env() -> Result<Self, MarqueeError> {
        Self::resolve(None, None)
    }

    /// Explicit directories where given, environment variables otherwise.
    pub fn resolve(
        data_dir: Option<PathBuf>,
        corpora_dir: Option<PathBuf>,
    ) -> Result<Self, MarqueeError> {
        let data_dir = match data_dir {
            Some(dir) => dir,
            None => required_env(DATA_DIR_ENV)?,
        };
        let corpora_dir = match corpora_dir {
            Some(dir) => dir,
            None => required_env(CORPORA_DIR_ENV)?,
        };
        Ok(Self::new(data_dir, corpora_dir))
    }

    /// Override the manifest location.
    pub fn with_manifest_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.manifest_path = path.into();
        self
    }

    /// Check that both directories exist and the data directory is writable.
    pub fn validate(&self) -> Result<(), MarqueeError> {
        if !self.corpora_dir.is_dir() {
            return Err(MarqueeError::Configuration(format!(
                "invalid corpora directory: '{}' not found",
                self.corpora_dir.display()
            )));
        }
        if !self.data_dir.is_dir() {
            return Err(MarqueeError::Configuration(format!(
                "invalid data directory: '{}' not found",
                self.data_dir.display()
            )));
        }
        // Permission bits alone miss ownership; create a scratch file instead.
        if let Err(err) = tempfile::tempfile_in(&self.data_dir) {
            return Err(MarqueeError::Configuration(format!(
                "invalid data directory: insufficient permissions for '{}': {err}",
                self.data_dir.display()
            )));
        }
        Ok(())
    }

    /// History store inside the data directory.
    pub fn history_store(&self) -> FileHistoryStore {
        FileHistoryStore::in_dir(&self.data_dir)
    }

    /// Corpus source over the corpora root.
    pub fn corpus_source(&self) -> DirectoryCorpusSource {
        DirectoryCorpusSource::new(&self.corpora_dir)
    }
}

fn required_env(name: &str) -> Result<PathBuf, MarqueeError> {
    env::var_os(name)
        .map(PathBuf::from)
        .ok_or_else(|| MarqueeError::Configuration(format!("missing environment variable '{name}'")))
}
