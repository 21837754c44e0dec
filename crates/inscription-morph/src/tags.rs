//! Tag-string extraction and candidate matching on `infl` entries.

use inscription_types::{CoarsePos, Mood};

use crate::analysis::Element;

const NOUN_FIELDS: &[&str] = &["decl", "case", "gend", "num"];
const VERB_FIELDS: &[&str] = &["pers", "num", "voice", "tense", "mood"];
const ADJECTIVE_FIELDS: &[&str] = &["decl", "case", "gend", "num", "comp"];
const PRONOUN_FIELDS: &[&str] = &["case", "gend", "num"];

/// Fields to concatenate for an entry, keyed on the entry's own `pofs`.
fn fields_for(pofs: &str) -> &'static [&'static str] {
    match pofs {
        "noun" => NOUN_FIELDS,
        "verb" => VERB_FIELDS,
        "adjective" => ADJECTIVE_FIELDS,
        "pronoun" => PRONOUN_FIELDS,
        _ => &[],
    }
}

/// Build the fine tag for an `infl` entry.
///
/// Every present field contributes `"value "`; `num` is cut to its first
/// character. Missing fields contribute nothing, and an entry without a known
/// `pofs` yields the empty string.
pub fn extract_tag(infl: &Element) -> String {
    let Some(pofs) = infl.child_text("pofs") else {
        return String::new();
    };
    let mut tag = String::new();
    for field in fields_for(pofs) {
        if let Some(value) = infl.child_text(field) {
            if *field == "num" {
                tag.push_str(prefix(value, 1));
            } else {
                tag.push_str(value);
            }
            tag.push(' ');
        }
    }
    tag
}

/// Whether a candidate entry agrees with the token's coarse POS and secondary code.
pub fn matches(infl: &Element, coarse_pos: &str, secondary_pos_code: &str) -> bool {
    let Some(pos) = CoarsePos::from_code(coarse_pos) else {
        return false;
    };
    if infl.child_text("pofs") != Some(pos.name()) {
        return false;
    }

    let wanted = secondary_pos_code.to_lowercase();
    let starts_with_code =
        |field: &str| infl.child_text(field).is_some_and(|v| prefix(v, 3) == wanted);

    match pos {
        CoarsePos::Noun => starts_with_code("case"),
        CoarsePos::Verb => Mood::from_code(secondary_pos_code)
            .is_some_and(|mood| infl.child_text("mood") == Some(mood.name())),
        CoarsePos::Adjective => starts_with_code("case") || starts_with_code("comp"),
        _ => false,
    }
}

fn prefix(text: &str, chars: usize) -> &str {
    match text.char_indices().nth(chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
