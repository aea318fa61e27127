//! Quill Layout - field typesetting engine
//!
//! Turns a token stream into positioned lines of glyphs:
//! - Command dispatch over the markup grammar (style, position, arc, tabs)
//! - Greedy word wrap with single-line overflow detection
//! - Inline and absolutely-placed icon glyphs
//! - Iterative shrink-to-fit at decreasing font sizes
//!
//! The engine is a pure function of its inputs: all mutable state lives in a
//! per-pass `LayoutState` that is discarded when the pass returns. It never
//! fails — unresolvable icons are dropped and malformed commands ignored.

mod engine;
mod fonts;
mod glyph;
mod measure;
mod shrink;
mod spec;
mod style;

pub use engine::layout;
pub use fonts::{BoldMode, FamilyTraits, FontTraits, ItalicMode};
pub use glyph::{Glyph, LayoutResult, Line, SpaceGlyph, SymbolGlyph, TextGlyph};
pub use measure::{FixedMeasure, TextMeasure};
pub use shrink::layout_fitted;
pub use spec::{
    BlockJustify, FieldSpec, IconPlacement, IconSlot, IconSpot, Outline, PackMetrics, Shadow,
};
pub use style::Style;

pub use quill_markup::{Color, TextAlign};
