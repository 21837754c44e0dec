use inscription_morph::Resolver;
use inscription_types::{LemmaEntry, Token};
use serde::Serialize;
use tracing::{info, warn};

use crate::aggregate::{LemmaIndex, aggregate_segment};
use crate::window::DEFAULT_KWIC_RADIUS;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct IndexOptions {
    pub kwic_radius: usize,
    /// Aggregate segments on the rayon pool (needs the `parallel` feature).
    pub parallel: bool,
}

impl Default for IndexOptions {
    fn default() -> Self {
        Self {
            kwic_radius: DEFAULT_KWIC_RADIUS,
            parallel: false,
        }
    }
}

/// A maximal run of consecutive indexable tokens from one document.
#[derive(Clone, Debug)]
pub struct Segment<'a> {
    pub document_id: &'a str,
    pub tokens: Vec<&'a Token>,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct IndexStats {
    pub documents: usize,
    pub tokens: usize,
    pub skipped_tokens: usize,
    pub lemmas: usize,
    pub forms: usize,
    pub citations: usize,
    pub undefined_tags: usize,
    pub malformed_payloads: usize,
}

#[derive(Clone, Debug)]
pub struct IndexReport {
    pub entries: Vec<LemmaEntry>,
    pub stats: IndexStats,
}

/// Split a document-ordered stream at document-id boundaries.
///
/// Unindexable tokens are dropped here, before any window is computed, and
/// do not open or close a segment.
pub fn segment_tokens(tokens: &[Token]) -> Vec<Segment<'_>> {
    let mut segments: Vec<Segment<'_>> = Vec::new();
    for token in tokens.iter().filter(|t| t.is_indexable()) {
        if let Some(current) = segments
            .last_mut()
            .filter(|s| s.document_id == token.document_id)
        {
            current.tokens.push(token);
        } else {
            segments.push(Segment {
                document_id: &token.document_id,
                tokens: vec![token],
            });
        }
    }
    segments
}

/// Drives segmentation, aggregation and finalization over a whole corpus.
pub struct Indexer {
    resolver: Resolver,
    options: IndexOptions,
}

impl Default for Indexer {
    fn default() -> Self {
        Self::new(Resolver::default(), IndexOptions::default())
    }
}

impl Indexer {
    pub fn new(resolver: Resolver, options: IndexOptions) -> Self {
        Self { resolver, options }
    }

    pub fn with_options(options: IndexOptions) -> Self {
        Self::new(Resolver::default(), options)
    }

    pub fn options(&self) -> IndexOptions {
        self.options
    }

    /// Build the sorted, counted concordance for `tokens`.
    pub fn build(&self, tokens: &[Token]) -> IndexReport {
        let segments = segment_tokens(tokens);
        let kept: usize = segments.iter().map(|s| s.tokens.len()).sum();
        if kept == 0 && !tokens.is_empty() {
            warn!("no indexable tokens among {} rows", tokens.len());
        }

        let index = if self.options.parallel {
            self.aggregate_parallel(&segments)
        } else {
            self.aggregate_sequential(&segments)
        };

        let undefined_tags = index.undefined_tags();
        let malformed_payloads = index.malformed_payloads();
        let entries = index.finalize();

        let stats = IndexStats {
            documents: segments.len(),
            tokens: kept,
            skipped_tokens: tokens.len() - kept,
            lemmas: entries.len(),
            forms: entries.iter().map(|e| e.forms.len()).sum(),
            citations: entries.iter().map(|e| e.count).sum(),
            undefined_tags,
            malformed_payloads,
        };
        info!(
            "indexed {} tokens from {} documents into {} lemmas ({} forms)",
            stats.tokens, stats.documents, stats.lemmas, stats.forms
        );
        info!(
            "skipped {} tokens; {} undefined tags; {} malformed payloads",
            stats.skipped_tokens, stats.undefined_tags, stats.malformed_payloads
        );

        IndexReport { entries, stats }
    }

    fn aggregate_sequential(&self, segments: &[Segment<'_>]) -> LemmaIndex {
        let mut index = LemmaIndex::new();
        for segment in segments {
            aggregate_segment(
                &segment.tokens,
                &self.resolver,
                self.options.kwic_radius,
                &mut index,
            );
        }
        index
    }

    #[cfg(feature = "parallel")]
    fn aggregate_parallel(&self, segments: &[Segment<'_>]) -> LemmaIndex {
        use rayon::prelude::*;

        let partials: Vec<LemmaIndex> = segments
            .par_iter()
            .map(|segment| {
                let mut part = LemmaIndex::new();
                aggregate_segment(
                    &segment.tokens,
                    &self.resolver,
                    self.options.kwic_radius,
                    &mut part,
                );
                part
            })
            .collect();

        // Merge in segment order so citation order matches the sequential path.
        let mut index = LemmaIndex::new();
        for part in partials {
            index.merge(part);
        }
        index
    }

    #[cfg(not(feature = "parallel"))]
    fn aggregate_parallel(&self, segments: &[Segment<'_>]) -> LemmaIndex {
        warn!("built without the `parallel` feature; aggregating sequentially");
        self.aggregate_sequential(segments)
    }
}

/// Build a concordance with the default resolver and options.
pub fn build_index(tokens: &[Token]) -> Vec<LemmaEntry> {
    Indexer::default().build(tokens).entries
}
