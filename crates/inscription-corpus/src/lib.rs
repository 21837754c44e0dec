//! Load tokenized inscription corpora from comma-separated tables.
//!
//! Each row of the table is one token; rows are grouped by the document they
//! belong to. Only the columns named in [`ColumnLayout`] are read, so tables
//! with extra bookkeeping columns load unchanged. Callers choose between a
//! memory-mapped file and an owned buffer at runtime via [`LoadMode`].
//!
//! # Example
//! ```no_run
//! use inscription_corpus::{Corpus, LoadMode};
//!
//! # fn main() -> anyhow::Result<()> {
//! let corpus = Corpus::load_with_mode("/path/to/corrected_latin.csv", LoadMode::Mmap)?;
//! println!("{} tokens in {} documents", corpus.len(), corpus.document_count());
//! # Ok(()) }
//! ```
//!
//! For a runnable demo, see `cargo run -p inscription-corpus --example stats -- <corpus.csv>`.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};
use csv::{ReaderBuilder, StringRecord};
use inscription_types::Token;
use memmap2::Mmap;
use tracing::info;

/// Strategy for loading the corpus file.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LoadMode {
    /// Memory-map the table (fast, zero-copy).
    Mmap,
    /// Read the table into an owned buffer (portable fallback).
    Owned,
}

enum Buffer {
    Mmap(Mmap),
    Owned(Vec<u8>),
}

impl Buffer {
    fn as_slice(&self) -> &[u8] {
        match self {
            Buffer::Mmap(m) => m.as_ref(),
            Buffer::Owned(v) => v.as_slice(),
        }
    }
}

/// Zero-based column positions of the fields a [`Token`] is built from.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ColumnLayout {
    pub document_id: usize,
    pub surface_form: usize,
    pub coarse_pos: usize,
    pub secondary_pos_code: usize,
    pub lemma: usize,
    pub analysis_a: usize,
    pub analysis_b: usize,
}

impl Default for ColumnLayout {
    /// Layout of the Latin inscription export.
    fn default() -> Self {
        Self {
            document_id: 0,
            surface_form: 7,
            coarse_pos: 8,
            secondary_pos_code: 9,
            lemma: 10,
            analysis_a: 11,
            analysis_b: 12,
        }
    }
}

impl ColumnLayout {
    fn min_width(&self) -> usize {
        [
            self.document_id,
            self.surface_form,
            self.coarse_pos,
            self.secondary_pos_code,
            self.lemma,
            self.analysis_a,
            self.analysis_b,
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
            + 1
    }

    fn token(&self, record: &StringRecord) -> Token {
        let field = |idx: usize| record.get(idx).unwrap_or_default().to_string();
        Token {
            document_id: field(self.document_id),
            surface_form: field(self.surface_form),
            lemma: field(self.lemma),
            coarse_pos: field(self.coarse_pos),
            secondary_pos_code: field(self.secondary_pos_code),
            analysis_a: field(self.analysis_a),
            analysis_b: field(self.analysis_b),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct CorpusOptions {
    pub layout: ColumnLayout,
    /// Treat the first row as a header and skip it.
    pub has_headers: bool,
}

/// An ordered token stream, as read from the table.
#[derive(Clone, Debug, Default)]
pub struct Corpus {
    tokens: Vec<Token>,
}

impl Corpus {
    /// Load a corpus table with the default layout, memory-mapping the file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::load_with_mode(path, LoadMode::Mmap)
    }

    /// Load a corpus table with the default layout, choosing the backing at runtime.
    pub fn load_with_mode(path: impl AsRef<Path>, mode: LoadMode) -> Result<Self> {
        Self::load_with_options(path, mode, &CorpusOptions::default())
    }

    pub fn load_with_options(
        path: impl AsRef<Path>,
        mode: LoadMode,
        options: &CorpusOptions,
    ) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            bail!("missing corpus file: {}", path.display());
        }
        let buffer = load_file(path, mode)?;
        let corpus = Self::from_reader(buffer.as_slice(), options)
            .with_context(|| format!("parse corpus {}", path.display()))?;
        info!(
            "loaded {} tokens in {} documents from {}",
            corpus.len(),
            corpus.document_count(),
            path.display()
        );
        Ok(corpus)
    }

    /// Parse a corpus table from any reader.
    pub fn from_reader<R: Read>(reader: R, options: &CorpusOptions) -> Result<Self> {
        let mut csv = ReaderBuilder::new()
            .has_headers(options.has_headers)
            .flexible(true)
            .from_reader(reader);
        let width = options.layout.min_width();
        let first_row = if options.has_headers { 2 } else { 1 };

        let mut tokens = Vec::new();
        for (idx, record) in csv.records().enumerate() {
            let row = idx + first_row;
            let record = record.with_context(|| format!("read row {row}"))?;
            if record.len() < width {
                bail!(
                    "row {row} has {} columns, expected at least {width}",
                    record.len()
                );
            }
            tokens.push(options.layout.token(&record));
        }
        Ok(Self { tokens })
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Number of runs of consecutive tokens sharing a document id.
    pub fn document_count(&self) -> usize {
        self.tokens
            .chunk_by(|a, b| a.document_id == b.document_id)
            .count()
    }
}

impl From<Vec<Token>> for Corpus {
    fn from(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }
}

fn load_file(path: &Path, mode: LoadMode) -> Result<Buffer> {
    let mut file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let empty = file
        .metadata()
        .with_context(|| format!("stat {}", path.display()))?
        .len()
        == 0;
    match mode {
        LoadMode::Mmap if !empty => {
            let map = unsafe { Mmap::map(&file) };
            map.map(Buffer::Mmap)
                .with_context(|| format!("mmap {}", path.display()))
        }
        _ => {
            let mut buf = Vec::new();
            file.read_to_end(&mut buf)
                .with_context(|| format!("read {}", path.display()))?;
            Ok(Buffer::Owned(buf))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROWS: &str = "\
a.xml,1,,,,,,Dis,N,DAT,deus,,
a.xml,2,,,,,,Manibus,N,DAT,manes,,
b.xml,1,,,,,,vixit,V,IND,vivo,<words/>,<infl/>
";

    #[test]
    fn maps_default_columns() {
        let corpus = Corpus::from_reader(ROWS.as_bytes(), &CorpusOptions::default()).unwrap();
        assert_eq!(corpus.len(), 3);
        let last = &corpus.tokens()[2];
        assert_eq!(last.document_id, "b.xml");
        assert_eq!(last.surface_form, "vixit");
        assert_eq!(last.coarse_pos, "V");
        assert_eq!(last.secondary_pos_code, "IND");
        assert_eq!(last.lemma, "vivo");
        assert_eq!(last.analysis_a, "<words/>");
        assert_eq!(last.analysis_b, "<infl/>");
    }

    #[test]
    fn counts_documents_as_runs() {
        let corpus = Corpus::from_reader(ROWS.as_bytes(), &CorpusOptions::default()).unwrap();
        assert_eq!(corpus.document_count(), 2);
        assert_eq!(Corpus::default().document_count(), 0);
    }

    #[test]
    fn skips_header_row_when_asked() {
        let table = format!("text,n,c2,c3,c4,c5,c6,word,pos1,pos2,lemma,xml1,xml2\n{ROWS}");
        let options = CorpusOptions {
            has_headers: true,
            ..CorpusOptions::default()
        };
        let corpus = Corpus::from_reader(table.as_bytes(), &options).unwrap();
        assert_eq!(corpus.len(), 3);
        assert_eq!(corpus.tokens()[0].surface_form, "Dis");
    }

    #[test]
    fn reports_short_rows() {
        let table = format!("{ROWS}c.xml,1,,,,,,short\n");
        let err = Corpus::from_reader(table.as_bytes(), &CorpusOptions::default()).unwrap_err();
        assert!(err.to_string().contains("row 4"), "{err}");
    }

    #[test]
    fn custom_layout_reads_narrow_tables() {
        let options = CorpusOptions {
            layout: ColumnLayout {
                document_id: 0,
                surface_form: 1,
                coarse_pos: 2,
                secondary_pos_code: 3,
                lemma: 4,
                analysis_a: 5,
                analysis_b: 6,
            },
            has_headers: false,
        };
        let corpus =
            Corpus::from_reader("x.xml,Aug,N,GEN,Augustus,,\n".as_bytes(), &options).unwrap();
        assert_eq!(corpus.tokens()[0].lemma, "Augustus");
    }
}
