//! Shrink-to-fit driver
//!
//! Bounded fields re-run layout at one pixel smaller per iteration until the
//! content fits or the size floor is reached. Every iteration measures from
//! scratch — a field is laid out at most a few dozen times per card, so
//! correctness wins over incremental reuse.

use quill_atlas::{RandomSource, SymbolAtlas};
use quill_markup::Token;

use crate::engine::layout;
use crate::fonts::FontTraits;
use crate::glyph::LayoutResult;
use crate::measure::TextMeasure;
use crate::spec::{FieldSpec, PackMetrics};

/// Smallest font size the driver will try, in pixels.
const MIN_FONT_SIZE: f32 = 1.0;

/// Lay out a field, shrinking the font until it fits.
///
/// One-line fields retry on any overflow; multi-line fields only on vertical
/// overflow. Arc-mode and explicit icon-placement fields are exempt and lay
/// out exactly once. The returned result is the last attempt — when the size
/// floor is reached the overflow flags stay set and the caller draws the
/// layout as-is.
#[allow(clippy::too_many_arguments)]
pub fn layout_fitted(
    tokens: &[Token],
    spec: &FieldSpec,
    metrics: &PackMetrics,
    atlas: &SymbolAtlas,
    measure: &dyn TextMeasure,
    traits: &FontTraits,
    rng: &mut dyn RandomSource,
) -> LayoutResult {
    let mut size = metrics.size(spec.size).max(MIN_FONT_SIZE);
    let shrinkable = spec.arc_radius == 0.0
        && spec.icon_placement.is_flow()
        && (spec.one_line || spec.bounded);

    loop {
        let result = layout(tokens, spec, metrics, atlas, measure, traits, size, rng);
        let retry = shrinkable
            && if spec.one_line {
                result.overflow()
            } else {
                result.overflow_v
            };
        if !retry || size <= MIN_FONT_SIZE {
            if shrinkable && result.overflow() {
                tracing::debug!(
                    font_size = result.font_size,
                    "field still overflows at the size floor"
                );
            }
            return result;
        }
        size = (size - 1.0).max(MIN_FONT_SIZE);
        tracing::debug!(size, "content overflows, retrying smaller");
    }
}
