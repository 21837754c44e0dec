use std::collections::HashMap;
use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use inscription_corpus::{Corpus, LoadMode};
use inscription_morph::{Resolver, TagQuery, TagSource};

const USAGE: &str = "usage: cargo run -p inscription-morph --example resolve -- <corpus.csv> [<surface-form>]";

fn main() -> Result<()> {
    let mut args = env::args().skip(1);
    let path = args.next().map(PathBuf::from).context(USAGE)?;
    let word = args.next();
    if args.next().is_some() {
        bail!("too many arguments");
    }

    let corpus = Corpus::load_with_mode(&path, LoadMode::Mmap)
        .with_context(|| format!("loading corpus from {}", path.display()))?;
    let resolver = Resolver::default();

    if let Some(word) = word {
        println!("Surface: {}", word);
        for token in corpus
            .tokens()
            .iter()
            .filter(|t| t.is_indexable() && t.surface_form == word)
        {
            let res = resolver.resolve_traced(&TagQuery::from(token));
            println!(
                "  {:<12} {:<5} {:<24} [{:?}] {}",
                token.lemma, token.coarse_pos, res.tag, res.source, token.document_id
            );
        }
        return Ok(());
    }

    let mut by_source: HashMap<TagSource, usize> = HashMap::new();
    let mut malformed = 0usize;
    for token in corpus.tokens().iter().filter(|t| t.is_indexable()) {
        let res = resolver.resolve_traced(&TagQuery::from(token));
        *by_source.entry(res.source).or_default() += 1;
        malformed += res.malformed_payloads;
    }

    println!("Corpus: {}", path.display());
    for source in [
        TagSource::Inflection,
        TagSource::Candidate,
        TagSource::SecondaryCode,
        TagSource::Undefined,
    ] {
        println!(
            "  {:<14} {}",
            format!("{:?}", source),
            by_source.get(&source).copied().unwrap_or(0)
        );
    }
    println!("  malformed payloads: {}", malformed);

    Ok(())
}
