use std::path::PathBuf;

use inscription_corpus::{Corpus, CorpusOptions, LoadMode};

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("corpus.csv")
}

#[test]
fn loads_fixture_with_quoted_payloads() {
    let corpus = Corpus::load(fixture()).expect("load fixture");
    assert_eq!(corpus.len(), 8);
    assert_eq!(corpus.document_count(), 2);

    let dis = &corpus.tokens()[0];
    assert_eq!(dis.document_id, "akko0001.xml");
    assert_eq!(dis.surface_form, "Dis");
    assert_eq!(dis.lemma, "Di");
    assert!(dis.analysis_a.starts_with("<words>"));
    assert!(dis.analysis_a.contains("<case>ablative</case>"));
    assert!(dis.analysis_b.is_empty());

    let lacuna = &corpus.tokens()[2];
    assert!(!lacuna.is_indexable());
    assert!(!corpus.tokens()[6].is_indexable());
}

#[test]
fn mmap_and_owned_agree() {
    let mapped = Corpus::load_with_mode(fixture(), LoadMode::Mmap).expect("mmap");
    let owned = Corpus::load_with_mode(fixture(), LoadMode::Owned).expect("owned");
    assert_eq!(mapped.tokens(), owned.tokens());
}

#[test]
fn empty_file_loads_as_empty_corpus() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.csv");
    std::fs::write(&path, b"").unwrap();
    for mode in [LoadMode::Mmap, LoadMode::Owned] {
        let corpus = Corpus::load_with_options(&path, mode, &CorpusOptions::default()).unwrap();
        assert!(corpus.is_empty());
    }
}

#[test]
fn missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Corpus::load(dir.path().join("nope.csv")).unwrap_err();
    assert!(err.to_string().contains("missing corpus file"));
}
