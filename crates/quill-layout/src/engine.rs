//! The layout state machine
//!
//! A single left-to-right walk over the token stream. Commands mutate the
//! running state, symbols and text become glyphs, spaces measure and may
//! trigger a wrap. All mutable state lives in the pass-local `LayoutState`;
//! nothing survives the call.

use std::mem;
use std::sync::Arc;

use quill_atlas::{RandomSource, SymbolAtlas};
use quill_markup::{Color, Command, TextAlign, Token, TokenKind};

use crate::fonts::{FontTraits, ItalicMode};
use crate::glyph::{Glyph, LayoutResult, Line, SpaceGlyph, SymbolGlyph, TextGlyph};
use crate::measure::TextMeasure;
use crate::spec::{BlockJustify, FieldSpec, IconPlacement, PackMetrics};
use crate::style::Style;

/// Points convert to pixels at the CSS ratio (96 dpi / 72 pt).
const PT_TO_PX: f32 = 4.0 / 3.0;
/// Inline icons are this fraction of the current font size.
const SYMBOL_SCALE: f32 = 0.78;
/// Icons drop this fraction of the font size to sit on the text baseline.
const SYMBOL_BASELINE_DROP: f32 = 0.16;
/// Gap after each inline icon, as a fraction of the font size.
const SYMBOL_GAP: f32 = 0.04;

struct LayoutState<'a> {
    spec: &'a FieldSpec,
    metrics: &'a PackMetrics,
    field_w: f32,
    field_h: f32,
    line_spacing: f32,
    symbol_spacing: f32,

    x: f32,
    y: f32,
    line_start: f32,
    inline_rise: f32,
    style: Style,
    base_align: TextAlign,
    saved_x: [f32; 2],
    symbol_color: Option<Color>,
    arc_radius: f32,
    arc_start: f32,
    arc_angle: f32,
    rotation: f32,
    icon_index: usize,

    line_glyphs: Vec<Glyph>,
    lines: Vec<Line>,
    placed_icons: Vec<SymbolGlyph>,
    widest: f32,
    bottom: f32,
    aborted: bool,
}

impl<'a> LayoutState<'a> {
    fn new(spec: &'a FieldSpec, metrics: &'a PackMetrics, size: f32) -> Self {
        let style = Style::from_spec(spec, size);
        Self {
            spec,
            metrics,
            field_w: metrics.x(spec.width),
            field_h: metrics.y(spec.height),
            line_spacing: metrics.y(spec.line_spacing),
            symbol_spacing: metrics.x(spec.symbol_spacing),
            x: 0.0,
            y: 0.0,
            line_start: 0.0,
            inline_rise: 0.0,
            base_align: style.align,
            style,
            saved_x: [0.0; 2],
            symbol_color: None,
            arc_radius: metrics.size(spec.arc_radius),
            arc_start: spec.arc_start,
            arc_angle: spec.arc_start,
            rotation: spec.rotation,
            icon_index: 0,
            line_glyphs: Vec::new(),
            lines: Vec::new(),
            placed_icons: Vec::new(),
            widest: 0.0,
            bottom: 0.0,
            aborted: false,
        }
    }

    fn wrap_leading(&self) -> f32 {
        self.style.size + self.line_spacing
    }

    /// Angle for a glyph placed now, when arc layout is active.
    fn arc_angle(&self) -> Option<f32> {
        (self.arc_radius > 0.0).then_some(self.arc_angle)
    }

    /// Advance the pen, tracking the arc angle when on a circle.
    fn advance(&mut self, width: f32) {
        self.x += width;
        if self.arc_radius > 0.0 {
            self.arc_angle += (width / self.arc_radius).to_degrees();
        }
    }

    /// Whether a glyph of this width would run past the line end.
    fn overflows(&self, width: f32) -> bool {
        self.arc_radius == 0.0 && self.x + width > self.field_w
    }

    /// Close the current line, pushing it even when empty, and open a new
    /// one `leading` pixels further down.
    fn close_line(&mut self, leading: f32) {
        let mut glyphs = mem::take(&mut self.line_glyphs);
        while glyphs.last().is_some_and(Glyph::is_space) {
            glyphs.pop();
        }
        let width = (line_extent(&glyphs) - self.line_start).max(0.0);
        self.lines.push(Line {
            glyphs,
            y: self.y,
            width,
            align: self.style.align,
        });
        self.widest = self.widest.max(width);
        self.bottom = self.bottom.max(self.y + self.style.size);
        self.y += leading;
        self.x = self.line_start;
        self.inline_rise = 0.0;
    }

    fn flush(&mut self) {
        if !self.line_glyphs.is_empty() {
            self.close_line(self.wrap_leading());
        }
    }

    fn handle_command(&mut self, body: &str, traits: &FontTraits) {
        match Command::parse(body) {
            Command::Italic(on) => match traits.family(&self.style.family).italic {
                // The face carries no upright shape; the toggle only resets
                // the style flag.
                ItalicMode::ResetShape => self.style.italic = false,
                _ => self.style.italic = on,
            },
            Command::Bold(on) => self.style.bold = on,
            Command::Align(align) => self.style.align = align,
            Command::FixAlign => self.style.align = self.base_align,
            Command::Font(name) => self.style.family = name,
            Command::FontSizeDelta(v) => self.style.size = (self.style.size + v).max(1.0),
            Command::FontSizePt(v) => self.style.size = (v * PT_TO_PX).max(1.0),
            Command::FontColor(c) => self.style.color = c,
            Command::Outline(v) => self.style.outline.width = v.max(0.0),
            Command::OutlineColor(c) => self.style.outline.color = c,
            Command::Shadow(v) => {
                self.style.shadow.dx = v;
                self.style.shadow.dy = v;
            }
            Command::ShadowBlur(v) => self.style.shadow.blur = v.max(0.0),
            Command::ShadowColor(c) => self.style.shadow.color = c,
            Command::Kerning(v) => self.style.kerning = v,
            Command::Up(v) => self.y -= v,
            Command::Down(v) => self.y += v,
            Command::NudgeLeft(v) => self.x -= v,
            Command::NudgeRight(v) => self.x += v,
            Command::UpInline(v) => self.inline_rise = v,
            Command::Line => self.close_line(self.style.size + self.line_spacing),
            Command::LineNoGap => self.close_line(self.style.size),
            Command::SaveX(slot) => self.saved_x[slot as usize] = self.x,
            // Restore is forward-only on the first slot: the pen never
            // retreats past content it has already passed. The second slot
            // restores unconditionally.
            Command::LoadX(0) => self.x = self.x.max(self.saved_x[0]),
            Command::LoadX(_) => self.x = self.saved_x[1],
            Command::SymbolColor(c) => self.symbol_color = Some(c),
            Command::SymbolColorAuto => self.symbol_color = None,
            Command::ArcRadius(v) => {
                self.arc_radius = v.max(0.0);
                self.arc_angle = self.arc_start;
            }
            Command::ArcStart(v) => {
                self.arc_start = v;
                self.arc_angle = v;
            }
            Command::Rotate(v) => self.rotation = v,
            Command::Indent => self.line_start = self.x,
            Command::Outdent => {
                self.line_start = 0.0;
                if self.line_glyphs.is_empty() {
                    self.x = 0.0;
                }
            }
            Command::Unknown(_) => {}
        }
    }

    fn handle_space(&mut self, measure: &dyn TextMeasure) {
        // Cost fields drop the space a line would otherwise open with.
        if self.spec.cost && self.line_glyphs.is_empty() {
            return;
        }
        let width = measure.text_width(" ", &self.style);
        if !self.spec.one_line && !self.line_glyphs.is_empty() && self.overflows(width) {
            // Wrap instead of inserting the space.
            self.close_line(self.wrap_leading());
            return;
        }
        self.line_glyphs.push(Glyph::Space(SpaceGlyph { x: self.x, width }));
        self.advance(width);
    }

    fn handle_text(&mut self, value: &str, measure: &dyn TextMeasure, traits: &FontTraits) {
        if value.is_empty() {
            return; // end-of-stream sentinel
        }
        let word = traits.family(&self.style.family).swash_word(value);
        let width = measure.text_width(&word, &self.style);
        if self.overflows(width) {
            if self.spec.one_line {
                // Single-line fields abort on the first word that does not
                // fit; the shrink driver retries at a smaller size.
                self.widest = self.widest.max(self.x + width);
                self.aborted = true;
                return;
            }
            if !self.line_glyphs.is_empty() {
                self.close_line(self.wrap_leading());
            }
        }
        let glyph = TextGlyph {
            text: word,
            x: self.x,
            y: self.y - self.inline_rise,
            width,
            style: self.style.clone(),
            arc_angle: self.arc_angle(),
        };
        self.line_glyphs.push(Glyph::Text(glyph));
        self.advance(width);
    }

    fn handle_symbol(
        &mut self,
        code: &str,
        atlas: &SymbolAtlas,
        rng: &mut dyn RandomSource,
    ) {
        let Some(info) = atlas.resolve(&self.spec.symbol_prefix, code) else {
            tracing::debug!(code, "icon code not in atlas, dropped");
            return;
        };
        let info = Arc::clone(info);
        self.icon_index += 1;

        let tint = info
            .color_match
            .then(|| self.symbol_color.unwrap_or(self.style.color));
        let back = info
            .back_code(rng)
            .and_then(|c| atlas.get(&c).map(Arc::clone));

        if info.code == "bar" {
            // Full-width divider: spans the field and leaves the pen at the
            // line start instead of advancing.
            let height = self.style.size * SYMBOL_SCALE * info.height_factor;
            self.line_glyphs.push(Glyph::Symbol(SymbolGlyph {
                info,
                back,
                x: 0.0,
                y: self.y - self.inline_rise,
                width: self.field_w,
                height,
                tint,
                outline: self.style.outline,
                shadow: self.style.shadow,
                arc_angle: None,
            }));
            self.x = self.line_start;
            return;
        }

        let nominal = self.style.size * SYMBOL_SCALE;
        match &self.spec.icon_placement {
            IconPlacement::Spots(spots) => {
                let Some(spot) = spots.get(self.icon_index - 1) else {
                    tracing::debug!(code, "icon beyond the last placement spot, dropped");
                    return;
                };
                self.placed_icons.push(SymbolGlyph {
                    x: self.metrics.x(spot.x),
                    y: self.metrics.y(spot.y),
                    width: nominal * info.width_factor,
                    height: nominal * info.height_factor,
                    info,
                    back,
                    tint,
                    outline: self.style.outline,
                    shadow: self.style.shadow,
                    arc_angle: None,
                });
            }
            IconPlacement::Table(slots) => {
                let Some(slot) = slots.get(self.icon_index - 1) else {
                    tracing::debug!(code, "icon beyond the last layout slot, dropped");
                    return;
                };
                let size = self.metrics.size(slot.size);
                self.placed_icons.push(SymbolGlyph {
                    x: self.metrics.x(slot.x),
                    y: self.metrics.y(slot.y),
                    width: size * info.width_factor,
                    height: size * info.height_factor,
                    info,
                    back,
                    tint,
                    outline: self.style.outline,
                    shadow: self.style.shadow,
                    arc_angle: None,
                });
            }
            IconPlacement::Flow => {
                let width = nominal * info.width_factor;
                let height = nominal * info.height_factor;
                if !self.spec.one_line && !self.line_glyphs.is_empty() && self.overflows(width) {
                    self.close_line(self.wrap_leading());
                }
                let glyph = SymbolGlyph {
                    info,
                    back,
                    x: self.x,
                    y: self.y + self.style.size * SYMBOL_BASELINE_DROP - self.inline_rise,
                    width,
                    height,
                    tint,
                    outline: self.style.outline,
                    shadow: self.style.shadow,
                    arc_angle: self.arc_angle(),
                };
                self.line_glyphs.push(Glyph::Symbol(glyph));
                self.advance(width + self.style.size * SYMBOL_GAP + self.symbol_spacing);
            }
        }
    }

    fn finish(mut self, font_size: f32) -> LayoutResult {
        if self.aborted {
            return LayoutResult {
                lines: Vec::new(),
                placed_icons: self.placed_icons,
                overflow_v: false,
                overflow_h: true,
                font_size,
                widest: self.widest,
                total_height: 0.0,
                v_adjust: 0.0,
                h_adjust: 0.0,
                rotation: self.rotation,
                arc_radius: self.arc_radius,
            };
        }
        self.flush();

        let overflow_h = self.widest > self.field_w;
        let overflow_v = self.spec.bounded && self.bottom > self.field_h;
        let v_adjust = if self.spec.vertical_center && !self.lines.is_empty() {
            (self.field_h - self.bottom) / 2.0
        } else {
            0.0
        };
        let h_adjust = match self.spec.justify {
            BlockJustify::None | BlockJustify::Left => 0.0,
            BlockJustify::Center => (self.field_w - self.widest) / 2.0,
            BlockJustify::Right => self.field_w - self.widest,
        };

        tracing::trace!(
            lines = self.lines.len(),
            widest = self.widest,
            height = self.bottom,
            overflow_h,
            overflow_v,
            "layout pass complete"
        );

        LayoutResult {
            lines: self.lines,
            placed_icons: self.placed_icons,
            overflow_v,
            overflow_h,
            font_size,
            widest: self.widest,
            total_height: self.bottom,
            v_adjust,
            h_adjust,
            rotation: self.rotation,
            arc_radius: self.arc_radius,
        }
    }
}

/// Right edge of the furthest glyph on a line.
fn line_extent(glyphs: &[Glyph]) -> f32 {
    glyphs
        .iter()
        .map(|g| match g {
            Glyph::Text(t) => t.x + t.width,
            Glyph::Symbol(s) => s.x + s.width,
            Glyph::Space(s) => s.x + s.width,
        })
        .fold(0.0, f32::max)
}

/// Lay out one token stream at a fixed font size.
///
/// Pure given its inputs; never fails. Unresolvable icon codes are dropped,
/// unrecognized commands ignored.
#[allow(clippy::too_many_arguments)]
pub fn layout(
    tokens: &[Token],
    spec: &FieldSpec,
    metrics: &PackMetrics,
    atlas: &SymbolAtlas,
    measure: &dyn TextMeasure,
    traits: &FontTraits,
    size: f32,
    rng: &mut dyn RandomSource,
) -> LayoutResult {
    let mut state = LayoutState::new(spec, metrics, size);

    for token in tokens {
        match token.kind {
            TokenKind::Command => state.handle_command(&token.value, traits),
            TokenKind::Symbol => state.handle_symbol(&token.value, atlas, rng),
            TokenKind::Space => state.handle_space(measure),
            TokenKind::Text => state.handle_text(&token.value, measure, traits),
        }
        if state.aborted {
            break;
        }
    }

    state.finish(size)
}
