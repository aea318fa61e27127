//! Host text-measurement seam
//!
//! Layout never touches font files directly; it measures through this trait.
//! The render crate's font store implements it with real shaping, and tests
//! (or headless hosts) use the fixed-advance measurer.

use crate::style::Style;

/// Measures the advance width of a run of text in one style.
pub trait TextMeasure {
    /// Width in surface pixels, including per-glyph kerning.
    fn text_width(&self, text: &str, style: &Style) -> f32;
}

/// Deterministic measurer: every character advances by a fixed fraction of
/// the font size.
#[derive(Debug, Clone, Copy)]
pub struct FixedMeasure {
    pub advance_ratio: f32,
}

impl FixedMeasure {
    pub fn new(advance_ratio: f32) -> Self {
        Self { advance_ratio }
    }
}

impl Default for FixedMeasure {
    fn default() -> Self {
        Self { advance_ratio: 0.5 }
    }
}

impl TextMeasure for FixedMeasure {
    fn text_width(&self, text: &str, style: &Style) -> f32 {
        let count = text.chars().count() as f32;
        count * (style.size * self.advance_ratio + style.kerning)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::FieldSpec;

    #[test]
    fn test_fixed_measure() {
        let style = Style::from_spec(&FieldSpec::default(), 10.0);
        let measure = FixedMeasure::new(0.5);
        assert_eq!(measure.text_width("abcd", &style), 20.0);
        assert_eq!(measure.text_width("", &style), 0.0);
    }

    #[test]
    fn test_kerning_is_per_glyph() {
        let mut style = Style::from_spec(&FieldSpec::default(), 10.0);
        style.kerning = 2.0;
        let measure = FixedMeasure::new(0.5);
        assert_eq!(measure.text_width("ab", &style), 14.0);
    }
}
