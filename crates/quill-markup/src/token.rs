//! Token stream types

/// Token kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Text,
    Symbol,
    Command,
    Space,
}

/// One fragment of tokenized markup.
///
/// `value` holds the literal text, the icon code, or the command body
/// (braces already stripped). Tokens are immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
}

impl Token {
    pub fn text(value: impl Into<String>) -> Self {
        Self { kind: TokenKind::Text, value: value.into() }
    }

    pub fn symbol(value: impl Into<String>) -> Self {
        Self { kind: TokenKind::Symbol, value: value.into() }
    }

    pub fn command(value: impl Into<String>) -> Self {
        Self { kind: TokenKind::Command, value: value.into() }
    }

    pub fn space() -> Self {
        Self { kind: TokenKind::Space, value: " ".to_string() }
    }
}

/// Tokenizer behavior switches, derived from the field being rendered
#[derive(Debug, Clone, Default)]
pub struct TokenizerOptions {
    /// Drop literal spaces entirely
    pub suppress_spaces: bool,
    /// Top-to-bottom text: one character per line
    pub vertical: bool,
    /// Icon-cost field: bare fragments matching the icon grammar are icons
    pub cost: bool,
    /// Reference font size for vertical-mode space advances, in pixels
    pub vertical_ref_size: f32,
    /// Pack-specific icon code prefix (empty for none)
    pub symbol_prefix: String,
}
