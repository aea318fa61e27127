//! Font store: matching, measurement, and glyph outlines
//!
//! Families resolve through the same strategy table the layout engine uses
//! for italic/bold semantics: suffix-token families query a style-suffixed
//! name, keyword families select style and weight axes. Measurement shapes
//! with rustybuzz and sums advances; when no face is available the store
//! falls back to a fixed-advance estimate so layout stays total on hosts
//! with missing fonts.

use fontdb::{Family, Query, Weight};
use rustybuzz::UnicodeBuffer;
use tiny_skia::Path;
use ttf_parser::{Face, GlyphId, OutlineBuilder};

use quill_layout::{BoldMode, FontTraits, ItalicMode, Style, TextMeasure};

/// Advance estimate per character when no face is available.
const FALLBACK_ADVANCE: f32 = 0.5;
/// Baseline estimate when no face is available.
const FALLBACK_ASCENT: f32 = 0.8;

/// fontdb-backed font store
pub struct FontStore {
    db: fontdb::Database,
    traits: FontTraits,
}

impl FontStore {
    /// An empty store; load fonts before rendering text.
    pub fn new(traits: FontTraits) -> Self {
        Self { db: fontdb::Database::new(), traits }
    }

    /// A store populated with the system's installed fonts.
    pub fn with_system_fonts(traits: FontTraits) -> Self {
        let mut store = Self::new(traits);
        store.db.load_system_fonts();
        store
    }

    /// Register an in-memory font file.
    pub fn load_font_data(&mut self, data: Vec<u8>) {
        self.db.load_font_data(data);
    }

    pub fn traits(&self) -> &FontTraits {
        &self.traits
    }

    /// Resolve a style to a face, applying the family's italic/bold strategy.
    fn query_id(&self, style: &Style) -> Option<fontdb::ID> {
        let family = self.traits.family(&style.family);
        let mut name = family.family.clone();
        let mut db_style = fontdb::Style::Normal;
        let mut weight = Weight::NORMAL;

        if style.italic {
            match family.italic {
                ItalicMode::Suffix => name.push_str(" Italic"),
                ItalicMode::Keyword => db_style = fontdb::Style::Italic,
                // No upright companion exists; the flag never survives
                // layout for these families.
                ItalicMode::ResetShape => {}
            }
        }
        if style.bold {
            match family.bold {
                BoldMode::Suffix => name.push_str(" Bold"),
                BoldMode::Keyword => weight = Weight::BOLD,
            }
        }

        let query = Query {
            families: &[Family::Name(&name)],
            weight,
            stretch: fontdb::Stretch::Normal,
            style: db_style,
        };
        self.db.query(&query)
    }

    /// Distance from the text top to the baseline for this style.
    pub fn ascent(&self, style: &Style) -> f32 {
        self.query_id(style)
            .and_then(|id| {
                self.db.with_face_data(id, |data, index| {
                    let face = Face::parse(data, index).ok()?;
                    Some(style.size * face.ascender() as f32 / face.units_per_em() as f32)
                })?
            })
            .unwrap_or(style.size * FALLBACK_ASCENT)
    }

    /// Shaped glyphs for one word: ids, pen-relative positions, total width.
    fn shape(&self, text: &str, style: &Style) -> Option<ShapedWord> {
        let id = self.query_id(style)?;
        self.db.with_face_data(id, |data, index| {
            let face = rustybuzz::Face::from_slice(data, index)?;
            let upem = face.units_per_em() as f32;
            let scale = style.size / upem;

            let mut buffer = UnicodeBuffer::new();
            buffer.push_str(text);
            let output = rustybuzz::shape(&face, &[], buffer);

            let mut glyphs = Vec::with_capacity(output.len());
            let mut pen = 0.0f32;
            for (info, pos) in output.glyph_infos().iter().zip(output.glyph_positions()) {
                glyphs.push(ShapedGlyph {
                    glyph_id: info.glyph_id as u16,
                    x: pen + pos.x_offset as f32 * scale,
                    y: pos.y_offset as f32 * scale,
                });
                pen += pos.x_advance as f32 * scale + style.kerning;
            }
            Some(ShapedWord { glyphs, width: pen })
        })?
    }

    /// A filled path for a word, positioned at `origin_x` with its baseline
    /// on `baseline_y`. `None` when no face is available or the word has no
    /// outline (all whitespace).
    pub fn word_path(&self, text: &str, style: &Style, origin_x: f32, baseline_y: f32) -> Option<Path> {
        let shaped = self.shape(text, style)?;
        let id = self.query_id(style)?;
        self.db.with_face_data(id, |data, index| {
            let face = Face::parse(data, index).ok()?;
            let scale = style.size / face.units_per_em() as f32;

            let mut builder = GlyphPathBuilder::new(scale, origin_x, baseline_y);
            for glyph in &shaped.glyphs {
                builder.set_pen(glyph.x, glyph.y);
                face.outline_glyph(GlyphId(glyph.glyph_id), &mut builder);
            }
            builder.finish()
        })?
    }
}

impl TextMeasure for FontStore {
    fn text_width(&self, text: &str, style: &Style) -> f32 {
        match self.shape(text, style) {
            Some(shaped) => shaped.width,
            None => {
                let count = text.chars().count() as f32;
                count * (style.size * FALLBACK_ADVANCE + style.kerning)
            }
        }
    }
}

struct ShapedGlyph {
    glyph_id: u16,
    /// Pen-relative pixel position
    x: f32,
    y: f32,
}

struct ShapedWord {
    glyphs: Vec<ShapedGlyph>,
    width: f32,
}

/// Converts ttf-parser outlines (font units, y-up) into one tiny-skia path
/// (pixels, y-down).
struct GlyphPathBuilder {
    builder: tiny_skia::PathBuilder,
    scale: f32,
    origin_x: f32,
    baseline_y: f32,
    pen_x: f32,
    pen_y: f32,
}

impl GlyphPathBuilder {
    fn new(scale: f32, origin_x: f32, baseline_y: f32) -> Self {
        Self {
            builder: tiny_skia::PathBuilder::new(),
            scale,
            origin_x,
            baseline_y,
            pen_x: 0.0,
            pen_y: 0.0,
        }
    }

    fn set_pen(&mut self, x: f32, y: f32) {
        self.pen_x = x;
        self.pen_y = y;
    }

    fn tx(&self, x: f32) -> f32 {
        self.origin_x + self.pen_x + x * self.scale
    }

    fn ty(&self, y: f32) -> f32 {
        // Flip: font outlines are y-up, the surface is y-down.
        self.baseline_y - self.pen_y - y * self.scale
    }

    fn finish(self) -> Option<Path> {
        self.builder.finish()
    }
}

impl OutlineBuilder for GlyphPathBuilder {
    fn move_to(&mut self, x: f32, y: f32) {
        self.builder.move_to(self.tx(x), self.ty(y));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.builder.line_to(self.tx(x), self.ty(y));
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        self.builder
            .quad_to(self.tx(x1), self.ty(y1), self.tx(x), self.ty(y));
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.builder.cubic_to(
            self.tx(x1),
            self.ty(y1),
            self.tx(x2),
            self.ty(y2),
            self.tx(x),
            self.ty(y),
        );
    }

    fn close(&mut self) {
        self.builder.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_layout::FieldSpec;

    #[test]
    fn test_fallback_measurement_without_fonts() {
        let store = FontStore::new(FontTraits::standard());
        let style = Style::from_spec(&FieldSpec::default(), 10.0);
        assert_eq!(store.text_width("abcd", &style), 20.0);
    }

    #[test]
    fn test_fallback_ascent_without_fonts() {
        let store = FontStore::new(FontTraits::standard());
        let style = Style::from_spec(&FieldSpec::default(), 10.0);
        assert_eq!(store.ascent(&style), 8.0);
    }

    #[test]
    fn test_word_path_none_without_fonts() {
        let store = FontStore::new(FontTraits::standard());
        let style = Style::from_spec(&FieldSpec::default(), 10.0);
        assert!(store.word_path("abcd", &style, 0.0, 8.0).is_none());
    }
}
