//! Quill Markup - escape-code grammar
//!
//! This crate turns raw card text into a flat token stream:
//! - Literal shortcut substitutions (dashes, line breaks, dividers)
//! - Brace-delimited escapes classified as icons or formatting commands
//! - Vertical-text character splitting for top-to-bottom fields
//! - A parsed `Command` value for every recognized escape

mod color;
mod command;
mod token;
mod tokenizer;

pub use color::Color;
pub use command::{Command, TextAlign};
pub use token::{Token, TokenKind, TokenizerOptions};
pub use tokenizer::{is_symbol_code, tokenize};
