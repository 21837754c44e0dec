use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use inscription_morph::{Resolver, TagQuery, TagSource};
use inscription_types::{Citation, FormEntry, LemmaEntry, Token, form_key};

use crate::window::context_window;

/// Lemma entries keyed by their composite `lemma pos` key.
///
/// Counts on the entries stay at zero until [`LemmaIndex::finalize`].
#[derive(Clone, Debug, Default)]
pub struct LemmaIndex {
    entries: BTreeMap<String, LemmaEntry>,
    undefined_tags: usize,
    malformed_payloads: usize,
}

impl LemmaIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one occurrence of `token` with its resolved fine tag.
    pub fn insert(&mut self, token: &Token, fine_tag: &str, citation: Citation) {
        let key = form_key(&token.surface_form, fine_tag);
        match self.entries.entry(token.lemma_key()) {
            Entry::Occupied(mut lemma) => match lemma.get_mut().forms.entry(key) {
                Entry::Occupied(mut form) => form.get_mut().citations.push(citation),
                Entry::Vacant(slot) => {
                    slot.insert(FormEntry::new(&token.surface_form, fine_tag, citation));
                }
            },
            Entry::Vacant(slot) => {
                slot.insert(LemmaEntry::new(
                    &token.lemma,
                    &token.coarse_pos,
                    FormEntry::new(&token.surface_form, fine_tag, citation),
                ));
            }
        }
    }

    /// Fold a partial index built from later segments into this one.
    ///
    /// Colliding lemmas and forms keep the entry already present here and
    /// append the other side's citations after their own.
    pub fn merge(&mut self, other: LemmaIndex) {
        self.undefined_tags += other.undefined_tags;
        self.malformed_payloads += other.malformed_payloads;
        for (key, incoming) in other.entries {
            match self.entries.entry(key) {
                Entry::Vacant(slot) => {
                    slot.insert(incoming);
                }
                Entry::Occupied(mut lemma) => {
                    let forms = &mut lemma.get_mut().forms;
                    for (key, form) in incoming.forms {
                        match forms.entry(key) {
                            Entry::Vacant(slot) => {
                                slot.insert(form);
                            }
                            Entry::Occupied(mut existing) => {
                                existing.get_mut().citations.extend(form.citations);
                            }
                        }
                    }
                }
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, lemma_key: &str) -> Option<&LemmaEntry> {
        self.entries.get(lemma_key)
    }

    pub fn undefined_tags(&self) -> usize {
        self.undefined_tags
    }

    pub fn malformed_payloads(&self) -> usize {
        self.malformed_payloads
    }

    /// Fill in counts and emit entries sorted by composite key.
    pub fn finalize(self) -> Vec<LemmaEntry> {
        self.entries
            .into_values()
            .map(|mut entry| {
                entry.recount();
                entry
            })
            .collect()
    }
}

/// Fold one document's tokens into `index`.
///
/// Windows are taken over `segment` as given, so tokens excluded before
/// segmentation never show up in a neighbour's context.
pub fn aggregate_segment<T: Borrow<Token>>(
    segment: &[T],
    resolver: &Resolver,
    kwic_radius: usize,
    index: &mut LemmaIndex,
) {
    for (pos, token) in segment.iter().enumerate() {
        let token = token.borrow();
        let resolution = resolver.resolve_traced(&TagQuery::from(token));
        if resolution.source == TagSource::Undefined {
            index.undefined_tags += 1;
        }
        index.malformed_payloads += resolution.malformed_payloads;

        let citation = Citation {
            context_window: context_window(segment, pos, kwic_radius),
            document_ref: token.document_ref(),
        };
        index.insert(token, &resolution.tag, citation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(doc: &str, surface: &str, lemma: &str, pos: &str, code: &str) -> Token {
        Token {
            document_id: doc.into(),
            surface_form: surface.into(),
            lemma: lemma.into(),
            coarse_pos: pos.into(),
            secondary_pos_code: code.into(),
            ..Token::default()
        }
    }

    fn cite(ctx: &str, doc: &str) -> Citation {
        Citation {
            context_window: ctx.into(),
            document_ref: doc.into(),
        }
    }

    #[test]
    fn insert_creates_then_appends() {
        let mut index = LemmaIndex::new();
        let t = token("a0001.xml", "deo", "Deus", "N", "DAT");
        index.insert(&t, "dat", cite(" deo", "a0001"));
        index.insert(&t, "dat", cite(" deo", "b0002"));
        index.insert(&t, "abl", cite(" deo", "c0003"));

        let entry = index.get("deus N").expect("lemma present");
        assert_eq!(entry.lemma, "Deus");
        assert_eq!(entry.forms.len(), 2);
        let refs: Vec<_> = entry.forms["deo (dat)"]
            .citations
            .iter()
            .map(|c| c.document_ref.as_str())
            .collect();
        assert_eq!(refs, vec!["a0001", "b0002"]);
    }

    #[test]
    fn first_spelling_of_lemma_is_kept() {
        let mut index = LemmaIndex::new();
        index.insert(&token("a.xml", "Iovi", "Iuppiter", "N", ""), "dat", cite(" Iovi", "a"));
        index.insert(&token("b.xml", "iovi", "iuppiter", "N", ""), "dat", cite(" iovi", "b"));
        assert_eq!(index.len(), 1);
        assert_eq!(index.get("iuppiter N").unwrap().lemma, "Iuppiter");
    }

    #[test]
    fn segment_uses_positions_within_segment() {
        let seg = vec![
            token("a0001.xml", "Dis", "di", "N", "DAT"),
            token("a0001.xml", "Manibus", "manes", "N", "DAT"),
            token("a0001.xml", "sacrum", "sacer", "ADJ", "NOM"),
        ];
        let mut index = LemmaIndex::new();
        aggregate_segment(&seg, &Resolver::default(), 1, &mut index);

        let manes = index.get("manes N").unwrap();
        let form = &manes.forms["Manibus (dat)"];
        assert_eq!(form.citations[0].context_window, " Dis Manibus sacrum");
        assert_eq!(form.citations[0].document_ref, "a0001");
        let sacer = &index.get("sacer ADJ").unwrap().forms["sacrum (nom)"];
        assert_eq!(sacer.citations[0].context_window, " Manibus sacrum");
    }

    #[test]
    fn tallies_undefined_and_malformed() {
        let mut bad = token("a.xml", "et", "et", "CC", "");
        bad.analysis_b = "<infl>".into();
        let mut index = LemmaIndex::new();
        aggregate_segment(&[bad], &Resolver::default(), 2, &mut index);
        assert_eq!(index.undefined_tags(), 1);
        assert_eq!(index.malformed_payloads(), 1);
        assert!(index.get("et CC").unwrap().forms.contains_key("et (undefined)"));
    }

    #[test]
    fn merge_appends_in_order() {
        let t = token("a.xml", "deo", "deus", "N", "");
        let u = token("b.xml", "dis", "deus", "N", "");
        let v = token("b.xml", "votum", "votum", "N", "");

        let mut left = LemmaIndex::new();
        left.insert(&t, "dat", cite(" deo", "a"));
        let mut right = LemmaIndex::new();
        right.insert(&t, "dat", cite(" deo", "b"));
        right.insert(&u, "dat", cite(" dis", "b"));
        right.insert(&v, "acc", cite(" votum", "b"));

        left.merge(right);
        assert_eq!(left.len(), 2);
        let deus = left.get("deus N").unwrap();
        let refs: Vec<_> = deus.forms["deo (dat)"]
            .citations
            .iter()
            .map(|c| c.document_ref.as_str())
            .collect();
        assert_eq!(refs, vec!["a", "b"]);
        assert!(deus.forms.contains_key("dis (dat)"));
    }

    #[test]
    fn finalize_counts_and_sorts() {
        let mut index = LemmaIndex::new();
        index.insert(&token("a.xml", "votum", "votum", "N", ""), "acc", cite(" votum", "a"));
        index.insert(&token("a.xml", "deo", "deus", "N", ""), "dat", cite(" deo", "a"));
        index.insert(&token("b.xml", "deo", "deus", "N", ""), "dat", cite(" deo", "b"));
        index.insert(&token("b.xml", "dis", "deus", "N", ""), "dat", cite(" dis", "b"));

        let entries = index.finalize();
        let keys: Vec<_> = entries.iter().map(LemmaEntry::key).collect();
        assert_eq!(keys, vec!["deus N", "votum N"]);
        assert_eq!(entries[0].count, 3);
        assert_eq!(entries[0].forms["deo (dat)"].count, 2);
        assert_eq!(entries[1].count, 1);
    }
}
