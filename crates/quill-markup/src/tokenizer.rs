//! Markup tokenizer
//!
//! Splitting is marker-based: a control character is inserted around every
//! brace group and every literal space, the string is split on the marker,
//! and each fragment is classified. The tokenizer is total — any input
//! produces a token stream, and unknown brace bodies become command tokens
//! that the layout engine later ignores.

use crate::token::{Token, TokenizerOptions};

/// Split marker, chosen to never occur in card text.
const SPLIT: char = '\u{1}';

/// Fraction of the reference font size a vertical-mode space advances by.
const VERTICAL_SPACE_RATIO: f32 = 0.6;

/// Tokenize a markup string into a flat token stream.
///
/// The stream always ends with an empty text token as an end-of-stream
/// sentinel.
pub fn tokenize(input: &str, opts: &TokenizerOptions) -> Vec<Token> {
    let substituted = substitute(input);

    let mut marked = String::with_capacity(substituted.len() + 16);
    for ch in substituted.chars() {
        match ch {
            '{' => {
                marked.push(SPLIT);
                marked.push(ch);
            }
            '}' => {
                marked.push(ch);
                marked.push(SPLIT);
            }
            ' ' => {
                marked.push(SPLIT);
                marked.push(' ');
                marked.push(SPLIT);
            }
            _ => marked.push(ch),
        }
    }

    let mut tokens = Vec::new();
    for fragment in marked.split(SPLIT).filter(|f| !f.is_empty()) {
        push_fragment(&mut tokens, fragment, opts);
    }

    // End-of-stream sentinel
    tokens.push(Token::text(""));
    tokens
}

fn push_fragment(tokens: &mut Vec<Token>, fragment: &str, opts: &TokenizerOptions) {
    if fragment == " " {
        if opts.vertical {
            let advance = (opts.vertical_ref_size * VERTICAL_SPACE_RATIO).round();
            tokens.push(Token::command(format!("down{advance}")));
        } else if !opts.suppress_spaces {
            tokens.push(Token::space());
        }
        return;
    }

    if let Some(body) = brace_body(fragment) {
        let body = body.to_ascii_lowercase();
        if classifies_as_symbol(&body, opts) {
            tokens.push(Token::symbol(body));
            if opts.vertical {
                tokens.push(Token::command("lns"));
            }
        } else {
            tokens.push(Token::command(body));
        }
        return;
    }

    // Bare text. Cost fields accept unbraced icon codes.
    if opts.cost && classifies_as_symbol(&fragment.to_ascii_lowercase(), opts) {
        tokens.push(Token::symbol(fragment.to_ascii_lowercase()));
        return;
    }

    if opts.vertical {
        for ch in fragment.chars() {
            tokens.push(Token::text(ch.to_string()));
            tokens.push(Token::command("lns"));
        }
    } else {
        tokens.push(Token::text(fragment));
    }
}

/// Literal shortcut substitutions, applied before any splitting.
fn substitute(input: &str) -> String {
    input
        .replace("\r\n", "{line}")
        .replace(['\r', '\n'], "{line}")
        .replace("{divider}", "{lns}{bar}{lns}")
        .replace(" - ", " \u{2014} ")
        .replace("--", "\u{2014}")
}

fn brace_body(fragment: &str) -> Option<&str> {
    fragment.strip_prefix('{')?.strip_suffix('}')
}

fn classifies_as_symbol(body: &str, opts: &TokenizerOptions) -> bool {
    if is_symbol_code(body) {
        return true;
    }
    if !opts.symbol_prefix.is_empty() {
        if let Some(rest) = body.strip_prefix(opts.symbol_prefix.as_str()) {
            return is_symbol_code(rest);
        }
    }
    false
}

/// Whether a brace body matches the fixed icon-code grammar.
///
/// Covers numeric generic mana (0-20), single-letter colors and variables,
/// tap/untap, two-letter hybrid / twobrid / phyrexian combinations,
/// three-letter hybrid phyrexian, loyalty deltas, and the divider bar.
pub fn is_symbol_code(code: &str) -> bool {
    match code {
        "bar" | "chaos" | "e" => return true,
        _ => {}
    }

    // Loyalty deltas: checked before plain numerals because integer parsing
    // would accept a leading sign.
    if let Some(rest) = code.strip_prefix('+').or_else(|| code.strip_prefix('-')) {
        return !rest.is_empty() && rest.len() <= 2 && rest.bytes().all(|b| b.is_ascii_digit());
    }

    if !code.is_empty() && code.bytes().all(|b| b.is_ascii_digit()) {
        return code.parse::<u32>().is_ok_and(|n| n <= 20);
    }

    let is_color = |c: u8| matches!(c, b'w' | b'u' | b'b' | b'r' | b'g');
    match code.as_bytes() {
        [c] => matches!(
            c,
            b'w' | b'u' | b'b' | b'r' | b'g' | b'c' | b's' | b'x' | b'y' | b'z' | b't' | b'q'
        ),
        [a, b] => {
            (is_color(*a) && is_color(*b) && a != b)
                || (*a == b'2' && is_color(*b))
                || (is_color(*a) && *b == b'p')
        }
        [a, b, b'p'] => is_color(*a) && is_color(*b) && a != b,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenKind;

    fn kinds(tokens: &[Token]) -> Vec<TokenKind> {
        tokens.iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_symbol_grammar() {
        for code in ["0", "20", "w", "u", "t", "q", "x", "wu", "2g", "gp", "gwp", "+1", "-12", "bar"] {
            assert!(is_symbol_code(code), "{code} should be an icon code");
        }
        for code in ["21", "ww", "pw", "wup2", "h", "+123", "+", "italic", ""] {
            assert!(!is_symbol_code(code), "{code} should not be an icon code");
        }
    }

    #[test]
    fn test_plain_text_roundtrip() {
        let tokens = tokenize("words and spaces", &TokenizerOptions::default());
        let rebuilt: String = tokens.iter().map(|t| t.value.as_str()).collect();
        assert_eq!(rebuilt, "words and spaces");
    }

    #[test]
    fn test_symbols_spaces_text() {
        let tokens = tokenize("{w}{u} Hello", &TokenizerOptions::default());
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::Symbol,
                TokenKind::Symbol,
                TokenKind::Space,
                TokenKind::Text,
                TokenKind::Text, // sentinel
            ]
        );
        assert_eq!(tokens[0].value, "w");
        assert_eq!(tokens[1].value, "u");
        assert_eq!(tokens[3].value, "Hello");
        assert_eq!(tokens[4].value, "");
    }

    #[test]
    fn test_unknown_brace_is_command() {
        let tokens = tokenize("{sparkle}", &TokenizerOptions::default());
        assert_eq!(tokens[0].kind, TokenKind::Command);
        assert_eq!(tokens[0].value, "sparkle");
    }

    #[test]
    fn test_newline_substitution() {
        let tokens = tokenize("one\ntwo", &TokenizerOptions::default());
        assert!(tokens.iter().any(|t| t.kind == TokenKind::Command && t.value == "line"));
    }

    #[test]
    fn test_divider_shortcut() {
        let tokens = tokenize("{divider}", &TokenizerOptions::default());
        let values: Vec<&str> = tokens.iter().map(|t| t.value.as_str()).collect();
        assert_eq!(values, vec!["lns", "bar", "lns", ""]);
        assert_eq!(tokens[1].kind, TokenKind::Symbol);
    }

    #[test]
    fn test_suppress_spaces() {
        let opts = TokenizerOptions { suppress_spaces: true, ..Default::default() };
        let tokens = tokenize("a b", &opts);
        assert!(tokens.iter().all(|t| t.kind != TokenKind::Space));
    }

    #[test]
    fn test_cost_mode_bare_codes() {
        let opts = TokenizerOptions { cost: true, suppress_spaces: true, ..Default::default() };
        let tokens = tokenize("2 w w", &opts);
        let symbols: Vec<&str> = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Symbol)
            .map(|t| t.value.as_str())
            .collect();
        assert_eq!(symbols, vec!["2", "w", "w"]);
    }

    #[test]
    fn test_vertical_mode_explodes_characters() {
        let opts = TokenizerOptions { vertical: true, vertical_ref_size: 10.0, ..Default::default() };
        let tokens = tokenize("ab c", &opts);
        let values: Vec<&str> = tokens.iter().map(|t| t.value.as_str()).collect();
        assert_eq!(values, vec!["a", "lns", "b", "lns", "down6", "c", "lns", ""]);
        assert!(tokens.iter().all(|t| t.kind != TokenKind::Space));
    }

    #[test]
    fn test_prefixed_codes() {
        let opts = TokenizerOptions { symbol_prefix: "pw".to_string(), ..Default::default() };
        let tokens = tokenize("{pw+1}", &opts);
        assert_eq!(tokens[0].kind, TokenKind::Symbol);
        assert_eq!(tokens[0].value, "pw+1");
    }

    #[test]
    fn test_sentinel_always_last() {
        for input in ["", "{w}", "text", "{line}"] {
            let tokens = tokenize(input, &TokenizerOptions::default());
            let last = tokens.last().unwrap();
            assert_eq!(last.kind, TokenKind::Text);
            assert_eq!(last.value, "");
        }
    }
}
