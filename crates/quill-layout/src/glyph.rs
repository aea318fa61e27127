//! Positioned glyphs, lines, and the layout result
//!
//! All coordinates are surface pixels relative to the field origin. Lines
//! are append-only during layout and read-only during drawing.

use std::sync::Arc;

use quill_atlas::SymbolInfo;
use quill_markup::{Color, TextAlign};

use crate::spec::{Outline, Shadow};
use crate::style::Style;

/// A run of text with a style snapshot
#[derive(Debug, Clone)]
pub struct TextGlyph {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub style: Style,
    /// Angle along the arc, degrees, when the field lays out on a circle
    pub arc_angle: Option<f32>,
}

/// An inline or absolutely-placed icon
#[derive(Debug, Clone)]
pub struct SymbolGlyph {
    pub info: Arc<SymbolInfo>,
    /// Randomized back image drawn behind the icon
    pub back: Option<Arc<SymbolInfo>>,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Tint for color-matched icons
    pub tint: Option<Color>,
    pub outline: Outline,
    pub shadow: Shadow,
    pub arc_angle: Option<f32>,
}

impl SymbolGlyph {
    pub fn outlined(&self) -> bool {
        self.outline.is_visible()
    }
}

/// An inter-word gap
#[derive(Debug, Clone, Copy)]
pub struct SpaceGlyph {
    pub x: f32,
    pub width: f32,
}

/// One positioned glyph
#[derive(Debug, Clone)]
pub enum Glyph {
    Text(TextGlyph),
    Symbol(SymbolGlyph),
    Space(SpaceGlyph),
}

impl Glyph {
    pub fn is_space(&self) -> bool {
        matches!(self, Glyph::Space(_))
    }
}

/// One laid-out line
#[derive(Debug, Clone)]
pub struct Line {
    pub glyphs: Vec<Glyph>,
    /// Top of the line, field-relative pixels
    pub y: f32,
    /// Measured content width
    pub width: f32,
    pub align: TextAlign,
}

/// The product of one layout pass
#[derive(Debug, Clone)]
pub struct LayoutResult {
    pub lines: Vec<Line>,
    /// Icons placed outside the line system (spot/table placement)
    pub placed_icons: Vec<SymbolGlyph>,
    /// Vertical overflow against the field height
    pub overflow_v: bool,
    /// Horizontal overflow against the field width
    pub overflow_h: bool,
    /// Font size this pass ran at, pixels
    pub font_size: f32,
    pub widest: f32,
    pub total_height: f32,
    /// Vertical centering shift applied when compositing
    pub v_adjust: f32,
    /// Whole-block justification shift
    pub h_adjust: f32,
    /// Paragraph rotation in degrees (spec value, possibly overridden)
    pub rotation: f32,
    /// Arc radius active at end of stream; arc fields never shrink or wrap
    pub arc_radius: f32,
}

impl LayoutResult {
    pub fn overflow(&self) -> bool {
        self.overflow_v || self.overflow_h
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }
}
