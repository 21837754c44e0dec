//! Shared types for building concordances over tokenized inscription corpora.
//!
//! A corpus is a flat stream of [`Token`] rows, grouped by document. The
//! concordance built from it is a list of [`LemmaEntry`] records, each owning
//! its [`FormEntry`] collection, which in turn owns its [`Citation`]s. Keeping
//! the nesting as owned, typed records means a citation's context window and
//! inscription id always travel together.
//!
//! The fixed vocabularies used to interpret coarse part-of-speech codes and
//! mood abbreviations live here as [`CoarsePos`] and [`Mood`].
//!
//! ```rust
//! use inscription_types::{CoarsePos, Mood, Token};
//!
//! let token = Token {
//!     document_id: "akko0001.xml".into(),
//!     surface_form: "Iulia".into(),
//!     lemma: "Iulia".into(),
//!     coarse_pos: "N".into(),
//!     secondary_pos_code: "NOM".into(),
//!     analysis_a: String::new(),
//!     analysis_b: String::new(),
//! };
//! assert_eq!(token.lemma_key(), "iulia N");
//! assert_eq!(token.document_ref(), "akko0001");
//! assert_eq!(CoarsePos::from_code("N").map(CoarsePos::name), Some("noun"));
//! assert_eq!(Mood::from_code("PTC").map(Mood::name), Some("participle"));
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Lemmas starting with this marker carry an unresolved analysis and are skipped.
pub const UNRESOLVED_MARKER: char = '?';

/// Number of trailing characters (the file extension) dropped from a document id
/// to obtain the inscription id.
pub const DOCUMENT_SUFFIX_LEN: usize = 4;

/// One row of the token stream.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub document_id: String,
    pub surface_form: String,
    pub lemma: String,
    pub coarse_pos: String,
    pub secondary_pos_code: String,
    /// Lexicon analysis listing candidate `word/entry/infl` entries.
    pub analysis_a: String,
    /// Single-inflection analysis (`infl` root, or a root with `infl` children).
    pub analysis_b: String,
}

impl Token {
    /// Whether the token takes part in indexing at all.
    pub fn is_indexable(&self) -> bool {
        !self.lemma.is_empty() && !self.lemma.starts_with(UNRESOLVED_MARKER)
    }

    /// Composite `lemma pos` key; the lemma is lowercased.
    pub fn lemma_key(&self) -> String {
        lemma_key(&self.lemma, &self.coarse_pos)
    }

    /// Inscription id: the document id without its extension.
    pub fn document_ref(&self) -> String {
        strip_suffix_chars(&self.document_id, DOCUMENT_SUFFIX_LEN).to_string()
    }
}

/// Build the composite key used to identify a [`LemmaEntry`].
pub fn lemma_key(lemma: &str, coarse_pos: &str) -> String {
    format!("{} {}", lemma.to_lowercase(), coarse_pos)
}

/// Build the key used to identify a [`FormEntry`] within its lemma.
pub fn form_key(surface_form: &str, fine_tag: &str) -> String {
    format!("{surface_form} ({fine_tag})")
}

fn strip_suffix_chars(text: &str, n: usize) -> &str {
    let keep = text.chars().count().saturating_sub(n);
    match text.char_indices().nth(keep) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// A single keyword-in-context occurrence.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    pub context_window: String,
    pub document_ref: String,
}

/// One surface form of a lemma with a resolved fine tag.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct FormEntry {
    pub form: String,
    pub pos: String,
    pub count: usize,
    pub citations: Vec<Citation>,
}

impl FormEntry {
    /// A fresh form holding its first citation. `count` is filled in later.
    pub fn new(form: impl Into<String>, pos: impl Into<String>, citation: Citation) -> Self {
        Self {
            form: form.into(),
            pos: pos.into(),
            count: 0,
            citations: vec![citation],
        }
    }

    pub fn key(&self) -> String {
        form_key(&self.form, &self.pos)
    }
}

/// Every occurrence of one `(lemma, coarse pos)` pair.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct LemmaEntry {
    /// Lemma as spelled by the token that created the entry.
    pub lemma: String,
    pub pos: String,
    pub count: usize,
    pub forms: BTreeMap<String, FormEntry>,
}

impl LemmaEntry {
    pub fn new(lemma: impl Into<String>, pos: impl Into<String>, form: FormEntry) -> Self {
        Self {
            lemma: lemma.into(),
            pos: pos.into(),
            count: 0,
            forms: BTreeMap::from([(form.key(), form)]),
        }
    }

    pub fn key(&self) -> String {
        lemma_key(&self.lemma, &self.pos)
    }

    /// Recompute `count` on every form and on the lemma itself.
    pub fn recount(&mut self) {
        let mut total = 0;
        for form in self.forms.values_mut() {
            form.count = form.citations.len();
            total += form.count;
        }
        self.count = total;
    }
}

/// Coarse part-of-speech codes found in the corpus.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum CoarsePos {
    Adverb,
    Verb,
    Noun,
    Preposition,
    Conjunction,
    Adjective,
}

impl CoarsePos {
    /// Parse a corpus code (`N`, `V`, `ADJ`, ...) into an enum.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "ADV" => Some(CoarsePos::Adverb),
            "V" => Some(CoarsePos::Verb),
            "N" => Some(CoarsePos::Noun),
            "PREP" => Some(CoarsePos::Preposition),
            "CC" => Some(CoarsePos::Conjunction),
            "ADJ" => Some(CoarsePos::Adjective),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            CoarsePos::Adverb => "ADV",
            CoarsePos::Verb => "V",
            CoarsePos::Noun => "N",
            CoarsePos::Preposition => "PREP",
            CoarsePos::Conjunction => "CC",
            CoarsePos::Adjective => "ADJ",
        }
    }

    /// Full name as it appears in the `pofs` field of a morphological analysis.
    pub fn name(self) -> &'static str {
        match self {
            CoarsePos::Adverb => "adverb",
            CoarsePos::Verb => "verb",
            CoarsePos::Noun => "noun",
            CoarsePos::Preposition => "preposition",
            CoarsePos::Conjunction => "conjunction",
            CoarsePos::Adjective => "adjective",
        }
    }
}

impl fmt::Display for CoarsePos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Verb mood abbreviations used as secondary codes for verbs.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Mood {
    Indicative,
    Participle,
    Imperative,
    Subjunctive,
}

impl Mood {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "IND" => Some(Mood::Indicative),
            "PTC" => Some(Mood::Participle),
            "IMP" => Some(Mood::Imperative),
            "SUB" => Some(Mood::Subjunctive),
            _ => None,
        }
    }

    /// Full name as it appears in the `mood` field of a morphological analysis.
    pub fn name(self) -> &'static str {
        match self {
            Mood::Indicative => "indicative",
            Mood::Participle => "participle",
            Mood::Imperative => "imperative",
            Mood::Subjunctive => "subjunctive",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
