use std::env;
use std::io;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use tracing::{Level, info};
use tracing_subscriber::EnvFilter;

use concordance::{IndexOptions, Indexer, write_json, write_json_file};
use inscription_corpus::{ColumnLayout, Corpus, CorpusOptions, LoadMode};

const DEFAULT_CORPUS: &str = "corrected_latin.csv";
const DEFAULT_KWIC_RADIUS: usize = concordance::DEFAULT_KWIC_RADIUS;

fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = load_config();
    info!(
        "reading corpus at {} (mode: {:?})",
        config.corpus_path.display(),
        config.load_mode
    );
    match &config.output_path {
        Some(path) => info!("writing concordance to {}", path.display()),
        None => info!("writing concordance to stdout"),
    }

    let start = Instant::now();
    let corpus = Corpus::load_with_options(
        &config.corpus_path,
        config.load_mode,
        &CorpusOptions {
            layout: ColumnLayout::default(),
            has_headers: config.has_headers,
        },
    )?;
    info!("corpus loaded in {} ms", start.elapsed().as_millis());

    let index_start = Instant::now();
    let indexer = Indexer::with_options(IndexOptions {
        kwic_radius: config.kwic_radius,
        parallel: config.parallel,
    });
    let report = indexer.build(corpus.tokens());
    info!("index built in {} ms", index_start.elapsed().as_millis());

    match &config.output_path {
        Some(path) => write_json_file(path, &report.entries, config.pretty)
            .with_context(|| format!("write {}", path.display()))?,
        None => write_json(io::stdout().lock(), &report.entries, config.pretty)
            .context("write stdout")?,
    }
    info!(
        "wrote {} lemmas with {} citations",
        report.stats.lemmas, report.stats.citations
    );
    Ok(())
}

#[derive(Debug, Clone)]
struct Config {
    corpus_path: PathBuf,
    output_path: Option<PathBuf>,
    load_mode: LoadMode,
    kwic_radius: usize,
    has_headers: bool,
    pretty: bool,
    parallel: bool,
}

fn load_config() -> Config {
    let mut pretty = false;
    let mut parallel = false;
    let mut cli_headers = false;
    let mut cli_corpus: Option<PathBuf> = None;
    let mut cli_output: Option<PathBuf> = None;
    let mut cli_mode: Option<LoadMode> = None;
    let mut cli_radius: Option<usize> = None;
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--pretty" => pretty = true,
            "--parallel" => parallel = true,
            "--headers" => cli_headers = true,
            "--corpus" => cli_corpus = args.next().map(PathBuf::from),
            "--output" => cli_output = args.next().map(PathBuf::from),
            _ => {
                if let Some(path) = arg.strip_prefix("--corpus=") {
                    cli_corpus = Some(PathBuf::from(path));
                } else if let Some(path) = arg.strip_prefix("--output=") {
                    cli_output = Some(PathBuf::from(path));
                } else if let Some(mode) = arg.strip_prefix("--load-mode=") {
                    cli_mode = parse_load_mode(mode);
                } else if let Some(radius) = arg.strip_prefix("--radius=") {
                    cli_radius = radius.parse::<usize>().ok();
                }
            }
        }
    }

    let corpus_path = cli_corpus
        .or_else(|| env::var("CORPUS_PATH").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CORPUS));
    let output_path = cli_output.or_else(|| env::var("OUTPUT_PATH").ok().map(PathBuf::from));
    let load_mode = cli_mode
        .or_else(|| {
            env::var("CORPUS_LOAD_MODE")
                .ok()
                .as_deref()
                .and_then(parse_load_mode)
        })
        .unwrap_or(LoadMode::Mmap);
    let kwic_radius = cli_radius
        .or_else(|| {
            env::var("KWIC_RADIUS")
                .ok()
                .and_then(|v| v.parse::<usize>().ok())
        })
        .unwrap_or(DEFAULT_KWIC_RADIUS);
    let has_headers = cli_headers
        || env::var("CORPUS_HAS_HEADERS")
            .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

    Config {
        corpus_path,
        output_path,
        load_mode,
        kwic_radius,
        has_headers,
        pretty,
        parallel,
    }
}

fn parse_load_mode(raw: &str) -> Option<LoadMode> {
    match raw.to_ascii_lowercase().as_str() {
        "mmap" => Some(LoadMode::Mmap),
        "owned" => Some(LoadMode::Owned),
        _ => None,
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let max_level = env_filter
        .max_level_hint()
        .and_then(|hint| hint.into_level())
        .unwrap_or(Level::INFO);
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .with_target(false)
        .with_level(true)
        .with_max_level(max_level)
        .init();
}
