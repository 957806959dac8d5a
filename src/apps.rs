use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tracing::{Level, info};
use tracing_subscriber::EnvFilter;

use crate::config::{CorporaManifest, EngineBuilder, Settings};
use crate::engine::Engine;
use crate::errors::MarqueeError;
use crate::history::History;
use crate::store::HistoryStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputKind {
    /// Performer name only.
    Name,
    /// Role only.
    Role,
    /// `<name> as <role>`.
    Credit,
}

#[derive(Debug, Parser)]
#[command(
    name = "marquee",
    disable_help_subcommand = true,
    about = "Generate performer names and roles without repeats",
    long_about = "Draw performer names and roles from word-list pools, avoiding repeats until every list is used up. History is persisted once at the end of the run.",
    after_help = "Directories resolve from explicit args first, then MARQUEE_DATA and MARQUEE_CORPORA."
)]
struct GenerateCli {
    #[arg(value_enum, default_value_t = OutputKind::Credit, help = "What to generate")]
    kind: OutputKind,
    #[arg(
        long,
        default_value_t = 1,
        value_parser = parse_positive_usize,
        help = "Number of lines to print"
    )]
    count: usize,
    #[arg(long, help = "Optional deterministic seed")]
    seed: Option<u64>,
    #[arg(long = "data-dir", value_name = "PATH", help = "Directory holding history.json")]
    data_dir: Option<PathBuf>,
    #[arg(long = "corpora-dir", value_name = "PATH", help = "Corpora root directory")]
    corpora_dir: Option<PathBuf>,
    #[arg(long, value_name = "PATH", help = "Manifest path (default: <corpora>/manifest.json)")]
    manifest: Option<PathBuf>,
    #[arg(long, help = "Do not write history back after the run")]
    dry_run: bool,
    #[arg(short, long, help = "Verbose output")]
    verbose: bool,
}

/// Parse `args` (without the program name) and print generated lines to stdout.
pub fn run_generate<I>(args_iter: I) -> Result<(), Box<dyn Error>>
where
    I: Iterator<Item = String>,
{
    let cli = GenerateCli::try_parse_from(std::iter::once("marquee".to_string()).chain(args_iter))?;
    setup_logging(cli.verbose);

    let mut settings = Settings::resolve(cli.data_dir, cli.corpora_dir)?;
    if let Some(manifest) = cli.manifest {
        settings = settings.with_manifest_path(manifest);
    }
    settings.validate()?;

    let store = settings.history_store();
    store.ensure_exists()?;
    let manifest = CorporaManifest::load(&settings.manifest_path)?;
    let config = EngineBuilder::from_manifest(&manifest, &settings.corpus_source())?.build();
    let history = store.load()?;

    let (lines, history) = match cli.seed {
        Some(seed) => generate(Engine::seeded(config, history, seed), cli.kind, cli.count)?,
        None => generate(Engine::new(config, history), cli.kind, cli.count)?,
    };
    for line in &lines {
        println!("{line}");
    }
    if cli.dry_run {
        info!("[marquee:app] dry run; history left untouched");
    } else {
        store.save(&history)?;
    }
    Ok(())
}

fn generate<R: rand::Rng>(
    mut engine: Engine<R>,
    kind: OutputKind,
    count: usize,
) -> Result<(Vec<String>, History), MarqueeError> {
    let mut lines = Vec::with_capacity(count);
    for _ in 0..count {
        let line = match kind {
            OutputKind::Name => engine.performer_name()?,
            OutputKind::Role => engine.role()?,
            OutputKind::Credit => {
                let name = engine.performer_name()?;
                let role = engine.role()?;
                format!("{name} as {role}")
            }
        };
        lines.push(line);
    }
    Ok((lines, engine.into_history()))
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}

fn parse_positive_usize(raw: &str) -> Result<usize, String> {
    let value: usize = raw
        .parse()
        .map_err(|_| format!("expected a positive integer, got '{raw}'"))?;
    if value == 0 {
        return Err("value must be at least 1".to_string());
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::Corpus;
    use crate::pool::PoolKind;

    #[test]
    fn cli_defaults_to_single_credit() {
        let cli = GenerateCli::try_parse_from(["marquee"]).unwrap();
        assert_eq!(cli.kind, OutputKind::Credit);
        assert_eq!(cli.count, 1);
        assert!(!cli.dry_run);
    }

    #[test]
    fn cli_rejects_zero_count() {
        assert!(GenerateCli::try_parse_from(["marquee", "name", "--count", "0"]).is_err());
        let cli = GenerateCli::try_parse_from(["marquee", "role", "--count", "3", "--seed", "9"])
            .unwrap();
        assert_eq!(cli.kind, OutputKind::Role);
        assert_eq!(cli.count, 3);
        assert_eq!(cli.seed, Some(9));
    }

    #[test]
    fn credit_lines_join_name_and_role() {
        let config = EngineBuilder::new()
            .with_corpus(PoolKind::FirstName, Corpus::new("fruits", ["blueberry"]))
            .with_corpus(PoolKind::CharacterName, Corpus::new("roles", ["narrator"]))
            .with_name_patterns(["%F"])
            .with_role_patterns(["%C"])
            .build();
        let engine = Engine::seeded(config, History::new(), 5);
        let (lines, history) = generate(engine, OutputKind::Credit, 2).unwrap();
        assert_eq!(lines, ["Blueberry as Narrator", "Blueberry as Narrator"]);
        assert!(history.has_domain_item("fruits", "blueberry"));
        assert!(history.has_domain_item("roles", "narrator"));
    }
}
