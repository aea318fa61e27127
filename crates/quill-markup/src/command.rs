//! Formatting command grammar
//!
//! Brace escapes that are not icon codes parse into `Command` values. Several
//! commands share a prefix (`fontsize12` / `fontsize12pt` / `fontcolor` /
//! `font`), so dispatch checks the longer spellings first. Anything that does
//! not match parses to `Command::Unknown`, which the layout engine ignores.

use serde::{Deserialize, Serialize};

use crate::color::Color;

/// Horizontal text alignment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// A parsed formatting command
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Italic(bool),
    Bold(bool),
    Align(TextAlign),
    /// Restore alignment to the field's base value
    FixAlign,
    Font(String),
    /// Relative size change, additive to the running size
    FontSizeDelta(f32),
    /// Absolute size in points
    FontSizePt(f32),
    FontColor(Color),
    Outline(f32),
    OutlineColor(Color),
    /// Shadow offset, applied to both axes
    Shadow(f32),
    ShadowBlur(f32),
    ShadowColor(Color),
    Kerning(f32),
    Up(f32),
    Down(f32),
    NudgeLeft(f32),
    NudgeRight(f32),
    /// Raise the baseline within the current line only
    UpInline(f32),
    /// Line break with leading
    Line,
    /// Line break without extra leading
    LineNoGap,
    SaveX(u8),
    LoadX(u8),
    SymbolColor(Color),
    SymbolColorAuto,
    ArcRadius(f32),
    ArcStart(f32),
    Rotate(f32),
    Indent,
    Outdent,
    Unknown(String),
}

impl Command {
    /// Parse the body of a brace escape (without the braces).
    pub fn parse(body: &str) -> Command {
        let body = body.trim();
        match body {
            "i" | "italic" => return Command::Italic(true),
            "/i" | "/italic" => return Command::Italic(false),
            "b" | "bold" => return Command::Bold(true),
            "/b" | "/bold" => return Command::Bold(false),
            "left" => return Command::Align(TextAlign::Left),
            "center" => return Command::Align(TextAlign::Center),
            "right" => return Command::Align(TextAlign::Right),
            "fixtextalign" => return Command::FixAlign,
            "line" => return Command::Line,
            "lns" => return Command::LineNoGap,
            "savex" => return Command::SaveX(0),
            "savex2" => return Command::SaveX(1),
            "loadx" => return Command::LoadX(0),
            "loadx2" => return Command::LoadX(1),
            "indent" => return Command::Indent,
            "outdent" => return Command::Outdent,
            "symbolcolorauto" => return Command::SymbolColorAuto,
            _ => {}
        }

        // Longer spellings first: a failed payload parse must not fall
        // through to a shorter prefix.
        if let Some(rest) = body.strip_prefix("fontsize") {
            if let Some(pt) = rest.strip_suffix("pt") {
                if let Ok(v) = pt.parse::<f32>() {
                    return Command::FontSizePt(v);
                }
            } else if let Ok(v) = rest.parse::<f32>() {
                return Command::FontSizeDelta(v);
            }
        } else if let Some(rest) = body.strip_prefix("fontcolor") {
            if let Some(c) = Color::parse(rest) {
                return Command::FontColor(c);
            }
        } else if let Some(rest) = body.strip_prefix("font") {
            if !rest.is_empty() {
                return Command::Font(rest.to_string());
            }
        } else if let Some(rest) = body.strip_prefix("outlinecolor") {
            if let Some(c) = Color::parse(rest) {
                return Command::OutlineColor(c);
            }
        } else if let Some(rest) = body.strip_prefix("outline") {
            if let Ok(v) = rest.parse::<f32>() {
                return Command::Outline(v);
            }
        } else if let Some(rest) = body.strip_prefix("shadowcolor") {
            if let Some(c) = Color::parse(rest) {
                return Command::ShadowColor(c);
            }
        } else if let Some(rest) = body.strip_prefix("shadowblur") {
            if let Ok(v) = rest.parse::<f32>() {
                return Command::ShadowBlur(v);
            }
        } else if let Some(rest) = body.strip_prefix("shadow") {
            if let Ok(v) = rest.parse::<f32>() {
                return Command::Shadow(v);
            }
        } else if let Some(rest) = body.strip_prefix("kerning") {
            if let Ok(v) = rest.parse::<f32>() {
                return Command::Kerning(v);
            }
        } else if let Some(rest) = body.strip_prefix("upinline") {
            if let Ok(v) = rest.parse::<f32>() {
                return Command::UpInline(v);
            }
        } else if let Some(rest) = body.strip_prefix("up") {
            if let Ok(v) = rest.parse::<f32>() {
                return Command::Up(v);
            }
        } else if let Some(rest) = body.strip_prefix("down") {
            if let Ok(v) = rest.parse::<f32>() {
                return Command::Down(v);
            }
        } else if let Some(rest) = body.strip_prefix("left") {
            if let Ok(v) = rest.parse::<f32>() {
                return Command::NudgeLeft(v);
            }
        } else if let Some(rest) = body.strip_prefix("right") {
            if let Ok(v) = rest.parse::<f32>() {
                return Command::NudgeRight(v);
            }
        } else if let Some(rest) = body.strip_prefix("symbolcolor") {
            if let Some(c) = Color::parse(rest) {
                return Command::SymbolColor(c);
            }
        } else if let Some(rest) = body.strip_prefix("arcradius") {
            if let Ok(v) = rest.parse::<f32>() {
                return Command::ArcRadius(v);
            }
        } else if let Some(rest) = body.strip_prefix("arcstart") {
            if let Ok(v) = rest.parse::<f32>() {
                return Command::ArcStart(v);
            }
        } else if let Some(rest) = body.strip_prefix("rotate") {
            if let Ok(v) = rest.parse::<f32>() {
                return Command::Rotate(v);
            }
        }

        Command::Unknown(body.to_string())
    }
}
