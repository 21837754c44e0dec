//! Lexical concordance over tokenized inscription corpora.
//!
//! [`Indexer`] splits a document-ordered token stream into per-document
//! [`Segment`]s, resolves a fine morphological tag for every token, and folds
//! each occurrence into a [`LemmaIndex`] as a keyword-in-context citation. The
//! finished index is a list of [`LemmaEntry`] records sorted by `lemma pos`,
//! with counts filled in at both the lemma and the form level.
//!
//! ```rust
//! use concordance::build_index;
//! use inscription_types::Token;
//!
//! let tokens: Vec<Token> = ["Dis", "Manibus", "sacrum"]
//!     .iter()
//!     .map(|w| Token {
//!         document_id: "akko0001.xml".into(),
//!         surface_form: (*w).into(),
//!         lemma: w.to_lowercase(),
//!         coarse_pos: "N".into(),
//!         ..Token::default()
//!     })
//!     .collect();
//! let entries = build_index(&tokens);
//! assert_eq!(entries.len(), 3);
//! assert_eq!(entries[0].lemma, "dis");
//! assert_eq!(entries[0].forms["Dis (undefined)"].citations[0].context_window, " Dis Manibus sacrum");
//! ```

pub mod aggregate;
pub mod export;
pub mod indexer;
pub mod window;

pub use aggregate::{LemmaIndex, aggregate_segment};
pub use export::{ExportError, write_json, write_json_file};
pub use indexer::{IndexOptions, IndexReport, IndexStats, Indexer, Segment, build_index, segment_tokens};
pub use inscription_types::{Citation, FormEntry, LemmaEntry, Token};
pub use window::{DEFAULT_KWIC_RADIUS, context_window};
