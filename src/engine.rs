use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::config::EngineConfig;
use crate::errors::MarqueeError;
use crate::filters::draw_filtered;
use crate::history::History;
use crate::pattern::{Token, expand_template, title_case};
use crate::pool::{CorpusPool, PoolKind};
use crate::sampler::draw_from_pool;
use crate::store::HistoryStore;
use crate::types::CorpusItem;

/// Generates performer names and roles from a frozen [`EngineConfig`].
///
/// The engine owns the run's [`History`]; persist it with
/// [`Engine::write_history`] once the run is complete.
pub struct Engine<R: Rng = StdRng> {
    config: EngineConfig,
    history: History,
    rng: R,
}

impl Engine<StdRng> {
    /// Engine seeded from the operating system.
    pub fn new(config: EngineConfig, history: History) -> Self {
        Self::with_rng(config, history, StdRng::from_os_rng())
    }

    /// Engine with a reproducible seed.
    pub fn seeded(config: EngineConfig, history: History, seed: u64) -> Self {
        Self::with_rng(config, history, StdRng::seed_from_u64(seed))
    }

    /// Engine whose history is loaded from `store`.
    pub fn load(config: EngineConfig, store: &dyn HistoryStore) -> Result<Self, MarqueeError> {
        Ok(Self::new(config, store.load()?))
    }
}

impl<R: Rng> Engine<R> {
    /// Engine drawing randomness from `rng`.
    pub fn with_rng(config: EngineConfig, history: History, rng: R) -> Self {
        Self {
            config,
            history,
            rng,
        }
    }

    /// Frozen configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// History accumulated so far.
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Hand the accumulated history back to the caller.
    pub fn into_history(self) -> History {
        self.history
    }

    /// Persist the accumulated history.
    pub fn write_history(&self, store: &dyn HistoryStore) -> Result<(), MarqueeError> {
        store.save(&self.history)
    }

    /// Filtered draw from the pool registered for `kind`.
    pub fn random_value(&mut self, kind: PoolKind) -> Result<CorpusItem, MarqueeError> {
        draw_filtered(
            self.config.pool(kind),
            &mut self.history,
            self.config.global_filters(),
            self.config.pool_filters(kind),
            self.config.filter_retry_limit(),
            &mut self.rng,
        )
    }

    /// Filtered first name.
    pub fn random_first_name(&mut self) -> Result<CorpusItem, MarqueeError> {
        self.random_value(PoolKind::FirstName)
    }

    /// Filtered last name.
    pub fn random_last_name(&mut self) -> Result<CorpusItem, MarqueeError> {
        self.random_value(PoolKind::LastName)
    }

    /// Filtered honorific.
    pub fn random_honorific(&mut self) -> Result<CorpusItem, MarqueeError> {
        self.random_value(PoolKind::Honorific)
    }

    /// Filtered occupation, as stored (not title-cased).
    pub fn random_occupation(&mut self) -> Result<CorpusItem, MarqueeError> {
        self.random_value(PoolKind::Occupation)
    }

    /// Filtered character name, as stored.
    pub fn random_character_name(&mut self) -> Result<CorpusItem, MarqueeError> {
        self.random_value(PoolKind::CharacterName)
    }

    /// Filtered performer prefix.
    pub fn random_performer_prefix(&mut self) -> Result<CorpusItem, MarqueeError> {
        self.random_value(PoolKind::PerformerPrefix)
    }

    /// Unfiltered draw from the numeral corpus.
    pub fn random_numeral(&mut self) -> Result<CorpusItem, MarqueeError> {
        draw_from_pool(self.config.numerals(), &mut self.history, &mut self.rng)
    }

    /// Expand a performer-name template and title-case the result.
    pub fn performer_name(&mut self) -> Result<String, MarqueeError> {
        let template = self.draw_template(Templates::Name)?;
        let name = title_case(&self.expand(&template)?);
        debug!("[marquee:engine] '{}' -> '{}'", template, name);
        Ok(name)
    }

    /// Expand a role template; only occupation and character-name values are title-cased.
    pub fn role(&mut self) -> Result<String, MarqueeError> {
        let template = self.draw_template(Templates::Role)?;
        let role = self.expand(&template)?;
        debug!("[marquee:engine] '{}' -> '{}'", template, role);
        Ok(role)
    }

    fn draw_template(&mut self, templates: Templates) -> Result<String, MarqueeError> {
        let pool: &CorpusPool = match templates {
            Templates::Name => self.config.name_patterns(),
            Templates::Role => self.config.role_patterns(),
        };
        draw_from_pool(pool, &mut self.history, &mut self.rng)
    }

    fn expand(&mut self, template: &str) -> Result<String, MarqueeError> {
        expand_template(template, |token| match token.pool_kind() {
            Some(kind) => self.random_value(kind),
            None => {
                debug_assert_eq!(token, Token::Numeral);
                self.random_numeral()
            }
        })
    }
}

#[derive(Clone, Copy)]
enum Templates {
    Name,
    Role,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineBuilder;
    use crate::corpus::Corpus;
    use crate::filters::Filter;
    use crate::store::InMemoryHistoryStore;
    use std::collections::BTreeSet;

    fn engine(builder: EngineBuilder, seed: u64) -> Engine {
        Engine::seeded(builder.build(), History::new(), seed)
    }

    #[test]
    fn single_item_pools_return_their_item() {
        let mut engine = engine(
            EngineBuilder::new()
                .with_corpus(PoolKind::FirstName, Corpus::new("fruits", ["blueberry"]))
                .with_corpus(PoolKind::LastName, Corpus::new("condiments", ["mayonnaise"]))
                .with_corpus(PoolKind::Honorific, Corpus::new("honorifics", ["Admiral"]))
                .with_corpus(PoolKind::Occupation, Corpus::new("colors", ["violet"])),
            1,
        );
        assert_eq!(engine.random_first_name().unwrap(), "blueberry");
        assert_eq!(engine.random_last_name().unwrap(), "mayonnaise");
        assert_eq!(engine.random_honorific().unwrap(), "Admiral");
        assert_eq!(engine.random_occupation().unwrap(), "violet");
    }

    #[test]
    fn pool_filters_apply_only_to_their_pool() {
        let mut engine = engine(
            EngineBuilder::new()
                .with_corpus(
                    PoolKind::FirstName,
                    Corpus::new("hyphen", ["Cinderford", "Bradford-On-Avon"]),
                )
                .with_corpus(
                    PoolKind::LastName,
                    Corpus::new("towns", ["Bradford-On-Avon"]),
                )
                .with_corpus(
                    PoolKind::Honorific,
                    Corpus::new("titles", ["Dr.", "Vice Chancellor"]),
                )
                .with_corpus(
                    PoolKind::CharacterName,
                    Corpus::new("firstNames", ["Foo", "Bar Baz"]),
                )
                .with_pool_filter(PoolKind::FirstName, Filter::max_hyphens(1))
                .with_pool_filter(PoolKind::Honorific, Filter::max_spaces(0))
                .with_pool_filter(PoolKind::CharacterName, Filter::max_spaces(0)),
            4,
        );
        for _ in 0..4 {
            assert_eq!(engine.random_first_name().unwrap(), "Cinderford");
            assert_eq!(engine.random_last_name().unwrap(), "Bradford-On-Avon");
            assert_eq!(engine.random_honorific().unwrap(), "Dr.");
            assert_eq!(engine.random_character_name().unwrap(), "Foo");
        }
    }

    #[test]
    fn global_filters_apply_to_every_pool() {
        let mut engine = engine(
            EngineBuilder::new()
                .with_corpus(
                    PoolKind::PerformerPrefix,
                    Corpus::new("colors", ["violet", "red orange yellow green blue indigo"]),
                )
                .with_corpus(
                    PoolKind::Occupation,
                    Corpus::new("hues", ["violet", "red orange yellow green blue indigo"]),
                )
                .with_global_filter(Filter::max_spaces(4)),
            8,
        );
        for _ in 0..4 {
            assert_eq!(engine.random_performer_prefix().unwrap(), "violet");
            assert_eq!(engine.random_occupation().unwrap(), "violet");
        }
    }

    #[test]
    fn performer_name_is_title_cased_and_records_template() {
        let store = InMemoryHistoryStore::new();
        let mut engine = engine(
            EngineBuilder::new()
                .with_corpus(PoolKind::FirstName, Corpus::new("fruits", ["blueberry"]))
                .with_corpus(PoolKind::LastName, Corpus::new("cities", ["Avondale"])),
            12,
        );
        for _ in 0..5 {
            let name = engine.performer_name().unwrap();
            assert!(
                name == "Blueberry Avondale" || name == "Blueberry",
                "unexpected name {name}"
            );
        }
        assert!(engine.history().has_domain("name_pattern"));
        engine.write_history(&store).unwrap();
        assert_eq!(store.save_count(), 1);
        assert!(store.payload().unwrap().contains("name_pattern"));
    }

    #[test]
    fn default_roles_cover_occupations_and_character_names() {
        let mut engine = engine(
            EngineBuilder::new()
                .with_corpus(
                    PoolKind::CharacterName,
                    Corpus::new("foobar", ["foo", "bar-baz"]),
                )
                .with_corpus(
                    PoolKind::Occupation,
                    Corpus::new("colors", ["red orange yellow", "green", "blue-indigo violet"]),
                ),
            30,
        );
        let roles: BTreeSet<String> = (0..10).map(|_| engine.role().unwrap()).collect();
        let expected: BTreeSet<String> = [
            "the Red Orange Yellow",
            "the Green",
            "the Blue-Indigo Violet",
            "Foo",
            "Bar-Baz",
        ]
        .into_iter()
        .map(String::from)
        .collect();
        assert_eq!(roles, expected);
    }

    #[test]
    fn numeral_roles_use_numeral_domain() {
        let mut engine = engine(
            EngineBuilder::new()
                .with_corpus(PoolKind::Occupation, Corpus::new("jobs", ["guard"]))
                .with_role_patterns(["%O %n"])
                .with_numerals(["7"]),
            2,
        );
        assert_eq!(engine.role().unwrap(), "Guard 7");
        assert!(engine.history().has_domain_item("numeral", "7"));
        assert!(engine.history().has_domain_item("role_pattern", "%O %n"));
    }

    #[test]
    fn missing_templates_surface_as_empty_corpus() {
        let mut engine = engine(EngineBuilder::new(), 0);
        assert!(matches!(
            engine.performer_name(),
            Err(MarqueeError::EmptyCorpus { .. })
        ));
        assert!(matches!(
            engine.random_first_name(),
            Err(MarqueeError::EmptyPool { .. })
        ));
    }

    #[test]
    fn empty_history_writes_empty_object() {
        let store = InMemoryHistoryStore::new();
        let engine = engine(EngineBuilder::new(), 0);
        engine.write_history(&store).unwrap();
        assert_eq!(store.payload().as_deref(), Some("{}"));
    }
}
