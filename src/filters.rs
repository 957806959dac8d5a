use std::fmt;
use std::sync::Arc;

use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::MarqueeError;
use crate::history::History;
use crate::pool::CorpusPool;
use crate::sampler::draw_from_pool;
use crate::types::{CorpusItem, FilterPattern};

/// Predicate over a candidate string; parameters are captured by the closure.
pub type Predicate = Arc<dyn Fn(&str) -> bool + Send + Sync + 'static>;

/// Labelled candidate predicate.
#[derive(Clone)]
pub struct Filter {
    label: String,
    predicate: Predicate,
}

impl fmt::Debug for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Filter").field("label", &self.label).finish()
    }
}

impl Filter {
    /// Wrap an arbitrary predicate.
    pub fn new<F>(label: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        Self {
            label: label.into(),
            predicate: Arc::new(predicate),
        }
    }

    /// Accept candidates with at most `max` hyphens.
    pub fn max_hyphens(max: usize) -> Self {
        Self::new(format!("max_hyphens({max})"), move |candidate| {
            filter_hyphens(candidate, max)
        })
    }

    /// Accept candidates with at most `max` spaces.
    pub fn max_spaces(max: usize) -> Self {
        Self::new(format!("max_spaces({max})"), move |candidate| {
            filter_spaces(candidate, max)
        })
    }

    /// Reject candidates whose lowercased form matches any of the regex `patterns`.
    pub fn unwanted_words<I, P>(patterns: I) -> Result<Self, MarqueeError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<str>,
    {
        let compiled = patterns
            .into_iter()
            .map(|pattern| compile_pattern(pattern.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(
            format!("unwanted_words({})", compiled.len()),
            move |candidate| filter_unwanted_words(candidate, &compiled),
        ))
    }

    /// Human-readable label, e.g. `max_hyphens(1)`.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Evaluate the predicate.
    pub fn evaluate(&self, candidate: &str) -> bool {
        (self.predicate)(candidate)
    }
}

/// Serializable description of a built-in filter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FilterSpec {
    /// See [`Filter::max_hyphens`].
    MaxHyphens {
        /// Highest accepted hyphen count.
        max: usize,
    },
    /// See [`Filter::max_spaces`].
    MaxSpaces {
        /// Highest accepted space count.
        max: usize,
    },
    /// See [`Filter::unwanted_words`].
    UnwantedWords {
        /// Regex sources matched against the lowercased candidate.
        patterns: Vec<FilterPattern>,
    },
}

impl FilterSpec {
    /// Build the described filter.
    pub fn build(&self) -> Result<Filter, MarqueeError> {
        match self {
            FilterSpec::MaxHyphens { max } => Ok(Filter::max_hyphens(*max)),
            FilterSpec::MaxSpaces { max } => Ok(Filter::max_spaces(*max)),
            FilterSpec::UnwantedWords { patterns } => Filter::unwanted_words(patterns),
        }
    }
}

/// Ordered queue of filters; a candidate passes only if every filter accepts it.
#[derive(Clone, Debug, Default)]
pub struct FilterChain {
    filters: Vec<Filter>,
}

impl FilterChain {
    /// Empty chain; accepts everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a filter to the end of the queue.
    pub fn push(&mut self, filter: Filter) {
        self.filters.push(filter);
    }

    /// Filters in evaluation order.
    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    /// True when no filter is queued.
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// `self` followed by `other`.
    pub fn chained(&self, other: &FilterChain) -> FilterChain {
        FilterChain {
            filters: self
                .filters
                .iter()
                .chain(other.filters.iter())
                .cloned()
                .collect(),
        }
    }

    /// Evaluate every filter (no short-circuit) and return the conjunction.
    pub fn accepts(&self, candidate: &str) -> bool {
        self.filters
            .iter()
            .fold(true, |accepted, filter| filter.evaluate(candidate) && accepted)
    }
}

impl FromIterator<Filter> for FilterChain {
    fn from_iter<I: IntoIterator<Item = Filter>>(iter: I) -> Self {
        Self {
            filters: iter.into_iter().collect(),
        }
    }
}

/// Draw from `pool` until a value passes `global_filters` followed by `pool_filters`.
///
/// Rejected values stay recorded in `history`. Without a `retry_limit` an
/// unsatisfiable filter set loops forever; with one, exceeding it yields
/// [`MarqueeError::FilterUnsatisfiable`].
pub fn draw_filtered<R: Rng + ?Sized>(
    pool: &CorpusPool,
    history: &mut History,
    global_filters: &FilterChain,
    pool_filters: &FilterChain,
    retry_limit: Option<usize>,
    rng: &mut R,
) -> Result<CorpusItem, MarqueeError> {
    let chain = global_filters.chained(pool_filters);
    let mut attempts = 0usize;
    loop {
        if let Some(limit) = retry_limit {
            if attempts >= limit {
                return Err(MarqueeError::FilterUnsatisfiable {
                    pool: pool.name().to_string(),
                    attempts,
                });
            }
        }
        attempts += 1;
        let candidate = draw_from_pool(pool, history, rng)?;
        if chain.accepts(&candidate) {
            return Ok(candidate);
        }
        debug!(
            "[marquee:filters] rejected '{}' from pool '{}'",
            candidate,
            pool.name()
        );
    }
}

/// True iff `candidate` has at most `max` `-` characters.
pub fn filter_hyphens(candidate: &str, max: usize) -> bool {
    candidate.matches('-').count() <= max
}

/// True iff `candidate` has at most `max` space characters.
pub fn filter_spaces(candidate: &str, max: usize) -> bool {
    candidate.matches(' ').count() <= max
}

/// True iff none of `patterns` matches the lowercased candidate.
pub fn filter_unwanted_words(candidate: &str, patterns: &[Regex]) -> bool {
    let lowered = candidate.to_lowercase();
    !patterns.iter().any(|pattern| pattern.is_match(&lowered))
}

fn compile_pattern(pattern: &str) -> Result<Regex, MarqueeError> {
    Regex::new(pattern).map_err(|err| MarqueeError::InvalidFilterPattern {
        pattern: pattern.to_string(),
        reason: err.to_string(),
    })
}
