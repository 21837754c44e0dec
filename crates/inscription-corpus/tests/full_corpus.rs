use std::env;
use std::path::PathBuf;

use inscription_corpus::{Corpus, LoadMode};

fn corpus_path() -> Option<PathBuf> {
    env::var("IIP_CORPUS_CSV").ok().map(PathBuf::from)
}

#[test]
fn loads_full_latin_export() {
    let Some(path) = corpus_path() else {
        eprintln!("skipping: IIP_CORPUS_CSV not set");
        return;
    };
    let corpus = Corpus::load_with_mode(&path, LoadMode::Mmap).expect("load corpus");
    assert!(!corpus.is_empty());
    assert!(corpus.document_count() > 1);
    assert!(corpus.tokens().iter().any(|t| t.is_indexable()));
}
