use std::collections::HashMap;
use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use inscription_corpus::{Corpus, LoadMode};

fn main() -> Result<()> {
    let path = env::args()
        .nth(1)
        .map(PathBuf::from)
        .context("usage: cargo run -p inscription-corpus --example stats -- <corpus.csv>")?;

    let corpus = Corpus::load_with_mode(&path, LoadMode::Mmap)
        .with_context(|| format!("loading corpus from {}", path.display()))?;

    let indexable = corpus.tokens().iter().filter(|t| t.is_indexable()).count();
    let with_a = corpus
        .tokens()
        .iter()
        .filter(|t| !t.analysis_a.is_empty())
        .count();
    let with_b = corpus
        .tokens()
        .iter()
        .filter(|t| !t.analysis_b.is_empty())
        .count();
    let mut by_pos: HashMap<&str, usize> = HashMap::new();
    for token in corpus.tokens() {
        *by_pos.entry(token.coarse_pos.as_str()).or_default() += 1;
    }
    let mut by_pos: Vec<_> = by_pos.into_iter().collect();
    by_pos.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

    println!("Corpus       : {}", path.display());
    println!("Tokens       : {}", corpus.len());
    println!("Documents    : {}", corpus.document_count());
    println!("Indexable    : {}", indexable);
    println!("With xml1    : {}", with_a);
    println!("With xml2    : {}", with_b);
    println!("Coarse POS:");
    for (pos, count) in by_pos {
        let label = if pos.is_empty() { "(none)" } else { pos };
        println!("  {:<6} {}", label, count);
    }

    Ok(())
}
