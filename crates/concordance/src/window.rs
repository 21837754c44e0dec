use std::borrow::Borrow;

use inscription_types::Token;

/// Tokens taken on each side of the keyword.
pub const DEFAULT_KWIC_RADIUS: usize = 2;

/// Keyword-in-context snippet around `tokens[index]`.
///
/// Each surface form within `radius` positions is prefixed with a single space;
/// positions outside the slice are dropped rather than padded.
pub fn context_window<T: Borrow<Token>>(tokens: &[T], index: usize, radius: usize) -> String {
    let start = index.saturating_sub(radius);
    let end = index.saturating_add(radius).saturating_add(1).min(tokens.len());
    let mut window = String::new();
    for token in tokens.get(start..end).unwrap_or_default() {
        window.push(' ');
        window.push_str(&token.borrow().surface_form);
    }
    window
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(words: &[&str]) -> Vec<Token> {
        words
            .iter()
            .map(|w| Token {
                surface_form: (*w).to_string(),
                ..Token::default()
            })
            .collect()
    }

    #[test]
    fn centered_window_spans_both_sides() {
        let toks = tokens(&["A", "B", "C", "D", "E"]);
        assert_eq!(context_window(&toks, 2, 2), " A B C D E");
    }

    #[test]
    fn edges_are_not_padded() {
        let toks = tokens(&["A", "B", "C", "D", "E"]);
        assert_eq!(context_window(&toks, 0, 2), " A B C");
        assert_eq!(context_window(&toks, 4, 2), " C D E");
        assert_eq!(context_window(&toks, 1, 1), " A B C");
    }

    #[test]
    fn works_on_borrowed_tokens_and_odd_sizes() {
        let toks = tokens(&["Dis", "Manibus"]);
        let refs: Vec<&Token> = toks.iter().collect();
        assert_eq!(context_window(&refs, 1, DEFAULT_KWIC_RADIUS), " Dis Manibus");
        assert_eq!(context_window(&refs, 0, 0), " Dis");
        assert_eq!(context_window(&refs, 7, 2), "");
        assert_eq!(context_window::<Token>(&[], 0, 2), "");
    }
}
