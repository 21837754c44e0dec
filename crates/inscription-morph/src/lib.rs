//! Fine-tag resolution for corpus tokens.
//!
//! Each token carries two independently produced morphological analyses
//! (Morpheus-style XML) plus a coarse POS code and a short secondary code.
//! [`Resolver`] turns these into one fine-tag string by trying an ordered list
//! of [`TagStrategy`] tiers until one yields a non-empty tag.
//!
//! # How it works
//! 1. [`InflectionStrategy`]: the single `infl` entry of `analysis_b`.
//! 2. [`CandidateStrategy`]: the first `word/entry/infl` of `analysis_a` that
//!    matches the token's POS and secondary code, or else the first entry.
//! 3. [`SecondaryCodeStrategy`]: the secondary code, lowercased.
//! 4. Nothing matched: [`UNDEFINED_TAG`].
//!
//! Malformed payloads never abort resolution; the tier is skipped.
//!
//! # Example
//! ```rust
//! use inscription_morph::{Resolver, TagQuery};
//!
//! let resolver = Resolver::default();
//! let tag = resolver.resolve(&TagQuery {
//!     analysis_b: "<infl><pofs>noun</pofs><decl>1st</decl><case>nom</case>\
//!                  <gend>fem</gend><num>sing</num></infl>",
//!     analysis_a: "",
//!     coarse_pos: "N",
//!     secondary_pos_code: "NOM",
//! });
//! assert_eq!(tag, "1st nom fem s ");
//! ```
//!
//! For a runnable demo, see `cargo run -p inscription-morph --example resolve -- <corpus.csv>`.

pub mod analysis;
pub mod tags;

use inscription_types::Token;
use tracing::debug;

pub use analysis::{Analysis, AnalysisError, Element};
pub use tags::{extract_tag, matches};

/// Tag assigned when no tier produced anything.
pub const UNDEFINED_TAG: &str = "undefined";

const CANDIDATE_PATH: &[&str] = &["word", "entry", "infl"];

/// Inputs the resolver looks at for one token.
#[derive(Clone, Copy, Debug)]
pub struct TagQuery<'a> {
    pub analysis_b: &'a str,
    pub analysis_a: &'a str,
    pub coarse_pos: &'a str,
    pub secondary_pos_code: &'a str,
}

impl<'a> From<&'a Token> for TagQuery<'a> {
    fn from(token: &'a Token) -> Self {
        Self {
            analysis_b: &token.analysis_b,
            analysis_a: &token.analysis_a,
            coarse_pos: &token.coarse_pos,
            secondary_pos_code: &token.secondary_pos_code,
        }
    }
}

/// Which tier produced a tag.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum TagSource {
    Inflection,
    Candidate,
    SecondaryCode,
    Undefined,
}

/// What a single tier made of the query.
#[derive(Debug)]
pub enum Attempt {
    Tag(String),
    NoTag,
    Unparseable(AnalysisError),
}

impl From<Option<String>> for Attempt {
    fn from(tag: Option<String>) -> Self {
        match tag {
            Some(tag) if !tag.is_empty() => Attempt::Tag(tag),
            _ => Attempt::NoTag,
        }
    }
}

/// One tier of the fallback chain.
pub trait TagStrategy: Send + Sync {
    fn source(&self) -> TagSource;
    fn attempt(&self, query: &TagQuery<'_>) -> Attempt;
}

/// Tier 1: the inflection carried by `analysis_b`.
#[derive(Clone, Copy, Debug, Default)]
pub struct InflectionStrategy;

impl TagStrategy for InflectionStrategy {
    fn source(&self) -> TagSource {
        TagSource::Inflection
    }

    fn attempt(&self, query: &TagQuery<'_>) -> Attempt {
        let root = match Analysis::parse(query.analysis_b) {
            Analysis::Parsed(root) => root,
            Analysis::Unparseable(err) => return Attempt::Unparseable(err),
        };
        let infl = if root.name == "infl" {
            Some(&root)
        } else {
            root.child("infl")
        };
        infl.map(extract_tag).into()
    }
}

/// Tier 2: the best candidate among the lexicon entries of `analysis_a`.
#[derive(Clone, Copy, Debug, Default)]
pub struct CandidateStrategy;

impl TagStrategy for CandidateStrategy {
    fn source(&self) -> TagSource {
        TagSource::Candidate
    }

    fn attempt(&self, query: &TagQuery<'_>) -> Attempt {
        let root = match Analysis::parse(query.analysis_a) {
            Analysis::Parsed(root) => root,
            Analysis::Unparseable(err) => return Attempt::Unparseable(err),
        };
        let candidates = root.find_all(CANDIDATE_PATH);
        candidates
            .iter()
            .find(|infl| matches(infl, query.coarse_pos, query.secondary_pos_code))
            .or_else(|| candidates.first())
            .map(|infl| extract_tag(infl))
            .into()
    }
}

/// Tier 3: the token's own secondary code.
#[derive(Clone, Copy, Debug, Default)]
pub struct SecondaryCodeStrategy;

impl TagStrategy for SecondaryCodeStrategy {
    fn source(&self) -> TagSource {
        TagSource::SecondaryCode
    }

    fn attempt(&self, query: &TagQuery<'_>) -> Attempt {
        Some(query.secondary_pos_code.to_lowercase()).into()
    }
}

/// Result of a resolution with provenance.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Resolution {
    pub tag: String,
    pub source: TagSource,
    /// Non-empty payloads that failed to parse along the way.
    pub malformed_payloads: usize,
}

/// Ordered chain of tag strategies.
pub struct Resolver {
    strategies: Vec<Box<dyn TagStrategy>>,
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new(vec![
            Box::new(InflectionStrategy),
            Box::new(CandidateStrategy),
            Box::new(SecondaryCodeStrategy),
        ])
    }
}

impl Resolver {
    pub fn new(strategies: Vec<Box<dyn TagStrategy>>) -> Self {
        Self { strategies }
    }

    pub fn resolve(&self, query: &TagQuery<'_>) -> String {
        self.resolve_traced(query).tag
    }

    /// Resolve and report which tier won.
    pub fn resolve_traced(&self, query: &TagQuery<'_>) -> Resolution {
        let mut malformed_payloads = 0;
        for strategy in &self.strategies {
            match strategy.attempt(query) {
                Attempt::Tag(tag) => {
                    return Resolution {
                        tag,
                        source: strategy.source(),
                        malformed_payloads,
                    };
                }
                Attempt::NoTag => {}
                Attempt::Unparseable(err) => {
                    if !err.is_empty_payload() {
                        debug!(tier = ?strategy.source(), "skipping unparseable analysis: {err}");
                        malformed_payloads += 1;
                    }
                }
            }
        }
        Resolution {
            tag: UNDEFINED_TAG.to_string(),
            source: TagSource::Undefined,
            malformed_payloads,
        }
    }
}

/// Resolve with the default strategy chain.
pub fn resolve(
    analysis_b: &str,
    analysis_a: &str,
    coarse_pos: &str,
    secondary_pos_code: &str,
) -> String {
    Resolver::default().resolve(&TagQuery {
        analysis_b,
        analysis_a,
        coarse_pos,
        secondary_pos_code,
    })
}
