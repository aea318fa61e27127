//! Token-independent string substitutions
//!
//! Applied before tokenization: these rewrite markup into markup, so the
//! tokenizer never needs to know about card names or flavor separators.

/// Expand card-level placeholders in a markup string.
///
/// `{cardname}` becomes the card's name; `{flavor}` becomes the flavor-text
/// separator (a thin divider bar, with the remainder italicized).
pub fn preprocess(markup: &str, card_name: &str) -> String {
    markup
        .replace("{cardname}", card_name)
        .replace("{flavor}", "{lns}{bar}{lns}{i}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cardname_substitution() {
        assert_eq!(
            preprocess("{cardname} attacks each turn.", "Arclight Phoenix"),
            "Arclight Phoenix attacks each turn."
        );
    }

    #[test]
    fn test_flavor_separator() {
        assert_eq!(
            preprocess("Deal damage.{flavor}It burns.", "X"),
            "Deal damage.{lns}{bar}{lns}{i}It burns."
        );
    }

    #[test]
    fn test_plain_text_untouched() {
        assert_eq!(preprocess("no placeholders here", "X"), "no placeholders here");
    }
}
