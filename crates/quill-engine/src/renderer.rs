//! Per-field render orchestration

use tiny_skia::PixmapMut;

use quill_atlas::{RandomSource, SymbolAtlas};
use quill_layout::{layout_fitted, FieldSpec, PackMetrics};
use quill_markup::{tokenize, TokenizerOptions};
use quill_render::{Compositor, FontStore, Scratch};

use crate::preprocess::preprocess;
use crate::Result;

/// Card-level state shared by every field of one render
pub struct CardContext<'a> {
    /// Card name, substituted for `{cardname}`
    pub name: String,
    /// Randomness for icon back-variant selection
    pub rng: &'a mut dyn RandomSource,
}

/// Diagnostics for one rendered field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderReport {
    /// Font size the field was finally drawn at, pixels
    pub font_size: f32,
    /// Content still overflowed after the shrink floor was reached
    pub overflowed: bool,
}

/// Renders card fields against one atlas, font store, and scratch set.
///
/// Holds the scratch surfaces by `&mut`: one renderer, one render at a time.
/// The atlas and font store are read-only and may back any number of
/// renderers.
pub struct FieldRenderer<'a> {
    atlas: &'a SymbolAtlas,
    fonts: &'a FontStore,
    metrics: PackMetrics,
    scratch: &'a mut Scratch,
}

impl<'a> FieldRenderer<'a> {
    pub fn new(
        atlas: &'a SymbolAtlas,
        fonts: &'a FontStore,
        metrics: PackMetrics,
        scratch: &'a mut Scratch,
    ) -> Self {
        Self { atlas, fonts, metrics, scratch }
    }

    /// Render one field's markup into the target surface.
    pub fn render(
        &mut self,
        spec: &FieldSpec,
        markup: &str,
        ctx: &mut CardContext<'_>,
        target: &mut PixmapMut<'_>,
    ) -> Result<RenderReport> {
        let span = tracing::debug_span!("render_field", font = %spec.font);
        let _guard = span.enter();

        let text = preprocess(markup, &ctx.name);
        let options = TokenizerOptions {
            suppress_spaces: false,
            vertical: spec.vertical,
            cost: spec.cost,
            vertical_ref_size: self.metrics.size(spec.size),
            symbol_prefix: spec.symbol_prefix.clone(),
        };
        let tokens = tokenize(&text, &options);

        let result = layout_fitted(
            &tokens,
            spec,
            &self.metrics,
            self.atlas,
            self.fonts,
            self.fonts.traits(),
            &mut *ctx.rng,
        );

        Compositor::new(self.fonts, self.scratch).draw(&result, spec, &self.metrics, target)?;

        let report = RenderReport {
            font_size: result.font_size,
            overflowed: result.overflow(),
        };
        tracing::debug!(
            font_size = report.font_size,
            overflowed = report.overflowed,
            lines = result.line_count(),
            "field rendered"
        );
        Ok(report)
    }
}
