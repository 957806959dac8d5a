//! Exhaustion-tracking draws over corpora and pools.
//!
//! A draw picks a corpus from a pool, then an item from that corpus, skipping
//! anything already recorded in [`History`]. Resets are two-level:
//! - item level: once every item of a corpus is recorded, that corpus's domain is cleared;
//! - pool level: once every corpus in a pool is exhausted, every corpus domain in the
//!   pool is cleared together, so no single list restarts while others are still fresh.
//!
//! A reset only happens after a full scan confirms exhaustion; the retry that
//! follows always succeeds, so each draw loops at most twice per level.

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::debug;

use crate::corpus::Corpus;
use crate::errors::MarqueeError;
use crate::history::History;
use crate::pool::CorpusPool;
use crate::types::CorpusItem;

/// True iff `history` has the corpus's domain and every corpus item is recorded in it.
///
/// Extra values recorded under the same domain have no effect.
pub fn is_corpus_exhausted(corpus: &Corpus, history: &History) -> bool {
    let Ok(recorded) = history.all_domain_items(corpus.name()) else {
        return false;
    };
    corpus
        .items()
        .iter()
        .all(|item| recorded.contains(item.as_str()))
}

/// True iff every corpus in the pool is exhausted (vacuously true for an empty pool).
pub fn is_pool_exhausted(pool: &CorpusPool, history: &History) -> bool {
    pool.corpora()
        .iter()
        .all(|corpus| is_corpus_exhausted(corpus, history))
}

/// Pick a random non-exhausted corpus, resetting the whole pool first if none is left.
pub fn select_corpus_from_pool<'a, R: Rng + ?Sized>(
    pool: &'a CorpusPool,
    history: &mut History,
    rng: &mut R,
) -> Result<&'a Corpus, MarqueeError> {
    let corpora = pool.corpora();
    if corpora.is_empty() {
        return Err(MarqueeError::EmptyPool {
            pool: pool.name().to_string(),
        });
    }
    loop {
        let mut order: Vec<usize> = (0..corpora.len()).collect();
        order.shuffle(rng);
        if let Some(idx) = order
            .into_iter()
            .find(|&idx| !is_corpus_exhausted(&corpora[idx], history))
        {
            return Ok(&corpora[idx]);
        }
        reset_pool(pool, history)?;
    }
}

/// Pick a random item not yet recorded for the corpus, resetting its domain first if all are.
///
/// Nothing is recorded here; see [`draw_from_pool`].
pub fn select_value_from_corpus<R: Rng + ?Sized>(
    corpus: &Corpus,
    history: &mut History,
    rng: &mut R,
) -> Result<CorpusItem, MarqueeError> {
    let items = corpus.items();
    if items.is_empty() {
        return Err(MarqueeError::EmptyCorpus {
            corpus: corpus.name().to_string(),
        });
    }
    loop {
        let mut order: Vec<usize> = (0..items.len()).collect();
        order.shuffle(rng);
        if let Some(idx) = order
            .into_iter()
            .find(|&idx| !history.has_domain_item(corpus.name(), &items[idx]))
        {
            return Ok(items[idx].clone());
        }
        debug!(
            "[marquee:sampler] corpus '{}' exhausted; resetting its domain",
            corpus.name()
        );
        history.remove_domain(corpus.name())?;
    }
}

/// Draw one value from the pool and record it under the selected corpus's domain.
pub fn draw_from_pool<R: Rng + ?Sized>(
    pool: &CorpusPool,
    history: &mut History,
    rng: &mut R,
) -> Result<CorpusItem, MarqueeError> {
    let corpus = select_corpus_from_pool(pool, history, rng)?;
    let value = select_value_from_corpus(corpus, history, rng)?;
    history.add_domain_item(corpus.name(), &value);
    Ok(value)
}

fn reset_pool(pool: &CorpusPool, history: &mut History) -> Result<(), MarqueeError> {
    debug!(
        "[marquee:sampler] pool '{}' exhausted; resetting {} corpus domain(s)",
        pool.name(),
        pool.len()
    );
    for corpus in pool.corpora() {
        // Two corpora may share a name; the first removal already cleared it.
        if history.has_domain(corpus.name()) {
            history.remove_domain(corpus.name())?;
        }
    }
    Ok(())
}
