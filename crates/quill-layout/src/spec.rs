//! Field specification and coordinate scaling
//!
//! A `FieldSpec` describes one text region on a card face. Geometry is stored
//! in normalized card coordinates (fractions of card width/height) so the
//! same spec renders at any surface resolution; `PackMetrics` carries the
//! actual pixel dimensions and does the scaling.

use serde::{Deserialize, Serialize};

use quill_markup::{Color, TextAlign};

/// Drop shadow parameters. Zero offsets and blur mean no shadow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Shadow {
    pub dx: f32,
    pub dy: f32,
    pub blur: f32,
    pub color: Color,
}

impl Shadow {
    pub fn is_visible(&self) -> bool {
        self.dx != 0.0 || self.dy != 0.0 || self.blur > 0.0
    }
}

/// Outline stroke parameters. Zero width means no outline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Outline {
    pub width: f32,
    pub color: Color,
}

impl Outline {
    pub fn is_visible(&self) -> bool {
        self.width > 0.0
    }
}

/// Horizontal placement of the whole paragraph block within the field
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockJustify {
    #[default]
    None,
    Left,
    Center,
    Right,
}

/// An absolute icon position, field-relative normalized coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IconSpot {
    pub x: f32,
    pub y: f32,
}

/// A fixed icon slot for multi-slot cost displays
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IconSlot {
    pub x: f32,
    pub y: f32,
    pub size: f32,
}

/// How icon glyphs are positioned
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IconPlacement {
    /// Icons flow inline with the text
    #[default]
    Flow,
    /// Icons land on absolute field-relative spots, keyed by icon order
    Spots(Vec<IconSpot>),
    /// Icons land on fixed slots carrying their own size
    Table(Vec<IconSlot>),
}

impl IconPlacement {
    pub fn is_flow(&self) -> bool {
        matches!(self, IconPlacement::Flow)
    }
}

/// One text region on a card face. Caller-owned, read-only to the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldSpec {
    /// Left edge; fields without one start at the card's left edge
    pub x: Option<f32>,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Base font size, normalized to card height
    pub size: f32,
    /// Font family key (lowercase, no spaces)
    pub font: String,
    pub color: Color,
    pub align: TextAlign,
    /// Block shift relative to its own alignment
    pub justify: BlockJustify,
    /// Distribute leftover width across inter-word gaps
    pub full_justify: bool,
    pub one_line: bool,
    /// Vertical overflow participates in shrink-to-fit
    pub bounded: bool,
    /// Icon-cost field: spaces at line starts are dropped
    pub cost: bool,
    pub vertical_center: bool,
    /// Top-to-bottom character layout
    pub vertical: bool,
    pub icon_placement: IconPlacement,
    pub shadow: Shadow,
    pub outline: Outline,
    pub kerning: f32,
    /// Extra spacing after each inline icon, normalized to card width
    pub symbol_spacing: f32,
    /// Pack-specific icon code prefix
    pub symbol_prefix: String,
    pub arc_radius: f32,
    pub arc_start: f32,
    /// Paragraph rotation in degrees
    pub rotation: f32,
    /// Extra leading between lines, normalized to card height
    pub line_spacing: f32,
    /// Final pixel shift of the paragraph on the target
    pub shift_x: f32,
    pub shift_y: f32,
}

impl Default for FieldSpec {
    fn default() -> Self {
        Self {
            x: None,
            y: 0.0,
            width: 1.0,
            height: 1.0,
            size: 0.04,
            font: "mplantin".to_string(),
            color: Color::BLACK,
            align: TextAlign::Left,
            justify: BlockJustify::None,
            full_justify: false,
            one_line: false,
            bounded: true,
            cost: false,
            vertical_center: false,
            vertical: false,
            icon_placement: IconPlacement::Flow,
            shadow: Shadow::default(),
            outline: Outline::default(),
            kerning: 0.0,
            symbol_spacing: 0.0,
            symbol_prefix: String::new(),
            arc_radius: 0.0,
            arc_start: 0.0,
            rotation: 0.0,
            line_spacing: 0.0,
            shift_x: 0.0,
            shift_y: 0.0,
        }
    }
}

/// Pure scaling from normalized field space to surface pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PackMetrics {
    pub card_width: f32,
    pub card_height: f32,
}

impl PackMetrics {
    pub fn new(card_width: f32, card_height: f32) -> Self {
        Self { card_width, card_height }
    }

    pub fn x(&self, v: f32) -> f32 {
        v * self.card_width
    }

    pub fn y(&self, v: f32) -> f32 {
        v * self.card_height
    }

    /// Font and icon sizes scale with card height
    pub fn size(&self, v: f32) -> f32 {
        v * self.card_height
    }
}
