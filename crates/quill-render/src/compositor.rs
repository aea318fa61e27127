//! Glyph compositor
//!
//! Renders a layout result in two passes: each line is composed on a scratch
//! surface (text directly, icons through the icon routine), blitted into the
//! paragraph surface with its alignment shift, and the finished paragraph is
//! placed on the target with the centering adjustments, caller shift, and
//! optional rotation.
//!
//! Outlined icons use a three-surface technique: filled discs for every
//! outlined icon land on the auxiliary surface and composite *under* the
//! already-drawn text, then the icon images composite on top. Outline
//! strokes never bleed over neighboring glyphs, and text still shows
//! through the gaps between icons.

use tiny_skia::{
    BlendMode, FillRule, FilterQuality, Paint, PathBuilder, Pixmap, PixmapMut, PixmapPaint, Rect,
    Stroke, Transform,
};

use quill_layout::{
    FieldSpec, Glyph, LayoutResult, Line, PackMetrics, SymbolGlyph, TextAlign, TextGlyph,
};
use quill_markup::Color;

use crate::fonts::FontStore;
use crate::justify::justified_space_width;
use crate::scratch::Scratch;
use crate::{RenderError, Result};

/// Alpha factor for the spread taps of a blurred shadow.
const BLUR_TAP_ALPHA: f32 = 0.5;

/// Field geometry resolved to pixels
struct Frame {
    x: f32,
    y: f32,
    width: f32,
    arc_radius: f32,
}

/// Draws layout results through a shared scratch-surface set.
///
/// Holding the scratch by `&mut` makes the engine's non-reentrancy explicit:
/// two concurrent renders need two scratch sets.
pub struct Compositor<'a> {
    fonts: &'a FontStore,
    scratch: &'a mut Scratch,
}

impl<'a> Compositor<'a> {
    pub fn new(fonts: &'a FontStore, scratch: &'a mut Scratch) -> Self {
        Self { fonts, scratch }
    }

    /// Composite one laid-out field onto the target surface.
    pub fn draw(
        &mut self,
        result: &LayoutResult,
        spec: &FieldSpec,
        metrics: &PackMetrics,
        target: &mut PixmapMut<'_>,
    ) -> Result<()> {
        if target.width() == 0 || target.height() == 0 {
            return Err(RenderError::EmptyTarget);
        }
        self.scratch.ensure(target.width(), target.height())?;

        let frame = Frame {
            x: metrics.x(spec.x.unwrap_or(0.0)),
            y: metrics.y(spec.y),
            width: metrics.x(spec.width),
            // Already in pixels: the layout pass scales the field value and
            // arc commands carry literal pixel radii.
            arc_radius: result.arc_radius,
        };

        let Scratch { line, paragraph, aux } = &mut *self.scratch;
        paragraph.fill(tiny_skia::Color::TRANSPARENT);

        let last = result.lines.len().saturating_sub(1);
        for (index, lay_line) in result.lines.iter().enumerate() {
            if lay_line.glyphs.is_empty() {
                continue;
            }
            compose_line(
                self.fonts,
                line,
                aux,
                lay_line,
                &frame,
                spec.full_justify && index != last,
            );
            let shift = alignment_shift(lay_line, frame.width);
            paragraph.draw_pixmap(
                shift.round() as i32,
                0,
                line.as_ref(),
                &PixmapPaint::default(),
                Transform::identity(),
                None,
            );
        }

        // Spot- and table-placed icons bypass per-line alignment entirely.
        for icon in &result.placed_icons {
            draw_icon(&mut paragraph.as_mut(), aux, icon, 0.0, &frame);
        }

        let dest_x = frame.x + result.h_adjust + spec.shift_x;
        let dest_y = frame.y + result.v_adjust + spec.shift_y;
        let mut transform = Transform::from_translate(dest_x, dest_y);
        if result.rotation != 0.0 {
            transform = transform.post_concat(Transform::from_rotate_at(
                result.rotation,
                dest_x,
                dest_y,
            ));
        }
        target.draw_pixmap(
            0,
            0,
            paragraph.as_ref(),
            &PixmapPaint { quality: FilterQuality::Bilinear, ..PixmapPaint::default() },
            transform,
            None,
        );
        Ok(())
    }
}

/// Compose one line onto the line surface.
fn compose_line(
    fonts: &FontStore,
    line_pix: &mut Pixmap,
    aux: &mut Pixmap,
    line: &Line,
    frame: &Frame,
    justify: bool,
) {
    line_pix.fill(tiny_skia::Color::TRANSPARENT);

    // Full justification widens every gap by the same amount.
    let extra_per_gap = if justify {
        let gaps: Vec<f32> = line
            .glyphs
            .iter()
            .filter_map(|g| match g {
                Glyph::Space(s) => Some(s.width),
                _ => None,
            })
            .collect();
        match gaps.first() {
            Some(&natural) => {
                let leftover = frame.width - line.width;
                justified_space_width(natural, leftover, gaps.len()) - natural
            }
            None => 0.0,
        }
    } else {
        0.0
    };

    let mut shift = 0.0f32;
    let mut icons: Vec<(&SymbolGlyph, f32)> = Vec::new();
    for glyph in &line.glyphs {
        match glyph {
            Glyph::Space(_) => shift += extra_per_gap,
            Glyph::Text(text) => draw_text(fonts, line_pix, text, shift, frame),
            Glyph::Symbol(symbol) => icons.push((symbol, shift)),
        }
    }

    if icons.is_empty() {
        return;
    }

    if icons.iter().any(|(icon, _)| icon.outlined()) {
        // Pass one: outline discs, composited under the text already on the
        // line surface.
        aux.fill(tiny_skia::Color::TRANSPARENT);
        for (icon, dx) in &icons {
            if icon.outlined() {
                draw_outline_disc(aux, icon, *dx, frame);
            }
        }
        line_pix.draw_pixmap(
            0,
            0,
            aux.as_ref(),
            &PixmapPaint { blend_mode: BlendMode::DestinationOver, ..PixmapPaint::default() },
            Transform::identity(),
            None,
        );

        // Pass two: all icon images as one layer on top.
        aux.fill(tiny_skia::Color::TRANSPARENT);
        for (icon, dx) in &icons {
            draw_icon_direct(&mut aux.as_mut(), icon, *dx, frame);
            if let Some(tint) = icon.tint {
                tint_rect(&mut aux.as_mut(), icon, *dx, frame, tint);
            }
        }
        line_pix.draw_pixmap(
            0,
            0,
            aux.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
    } else {
        for (icon, dx) in &icons {
            draw_icon(&mut line_pix.as_mut(), aux, icon, *dx, frame);
        }
    }
}

/// Horizontal blit offset for a composed line.
fn alignment_shift(line: &Line, field_width: f32) -> f32 {
    let left = line
        .glyphs
        .iter()
        .map(|g| match g {
            Glyph::Text(t) => t.x,
            Glyph::Symbol(s) => s.x,
            Glyph::Space(s) => s.x,
        })
        .fold(f32::INFINITY, f32::min);
    let left = if left.is_finite() { left } else { 0.0 };
    match line.align {
        TextAlign::Left => 0.0,
        TextAlign::Center => (field_width - line.width) / 2.0 - left,
        TextAlign::Right => field_width - line.width - left,
    }
}

/// Shadow, outline, and fill passes for one text glyph.
fn draw_text(fonts: &FontStore, pix: &mut Pixmap, glyph: &TextGlyph, dx: f32, frame: &Frame) {
    let style = &glyph.style;
    let baseline = glyph.y + fonts.ascent(style);
    let (origin_x, transform) = glyph_transform(glyph.arc_angle, glyph.x + dx, glyph.y, glyph.width, frame);
    let Some(path) = fonts.word_path(&glyph.text, style, origin_x, baseline) else {
        tracing::debug!(word = %glyph.text, family = %style.family, "no face for text glyph, dropped");
        return;
    };

    if style.shadow.is_visible() {
        let shadow = style.shadow;
        let mut taps = vec![(shadow.dx, shadow.dy, 1.0f32)];
        if shadow.blur > 0.0 {
            let spread = shadow.blur / 2.0;
            for (ox, oy) in [(-spread, 0.0), (spread, 0.0), (0.0, -spread), (0.0, spread)] {
                taps.push((shadow.dx + ox, shadow.dy + oy, BLUR_TAP_ALPHA));
            }
        }
        for (ox, oy, alpha) in taps {
            let paint = color_paint(shadow.color, alpha);
            pix.fill_path(
                &path,
                &paint,
                FillRule::Winding,
                transform.post_translate(ox, oy),
                None,
            );
        }
    }

    if style.outline.is_visible() {
        let paint = color_paint(style.outline.color, 1.0);
        // Stroke is centered on the edge; half of it is covered by the fill.
        let stroke = Stroke { width: style.outline.width * 2.0, ..Stroke::default() };
        pix.stroke_path(&path, &paint, &stroke, transform, None);
    }

    let paint = color_paint(style.color, 1.0);
    pix.fill_path(&path, &paint, FillRule::Winding, transform, None);
}

/// Icon draw for the no-outline path: drop shadow first, then the icon —
/// tinted through the auxiliary surface when color matching asks for it,
/// directly otherwise.
fn draw_icon(target: &mut PixmapMut<'_>, aux: &mut Pixmap, icon: &SymbolGlyph, dx: f32, frame: &Frame) {
    if icon.shadow.is_visible() {
        let (x, transform) = glyph_transform(icon.arc_angle, icon.x + dx, icon.y, icon.width, frame);
        let (sx, sy) = (x + icon.shadow.dx, icon.y + icon.shadow.dy);
        aux.fill(tiny_skia::Color::TRANSPARENT);
        blit_scaled(&mut aux.as_mut(), &icon.info.image, sx, sy, icon.width, icon.height, transform);
        silhouette_rect(&mut aux.as_mut(), sx, sy, icon.width, icon.height, transform, icon.shadow.color);
        target.draw_pixmap(
            0,
            0,
            aux.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
    }
    if let Some(tint) = icon.tint {
        aux.fill(tiny_skia::Color::TRANSPARENT);
        draw_icon_direct(&mut aux.as_mut(), icon, dx, frame);
        tint_rect(&mut aux.as_mut(), icon, dx, frame, tint);
        target.draw_pixmap(
            0,
            0,
            aux.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
    } else {
        draw_icon_direct(target, icon, dx, frame);
    }
}

/// Back image (when present) and icon image, scaled into the glyph box.
fn draw_icon_direct(target: &mut PixmapMut<'_>, icon: &SymbolGlyph, dx: f32, frame: &Frame) {
    let (x, transform) = glyph_transform(icon.arc_angle, icon.x + dx, icon.y, icon.width, frame);
    if let Some(back) = &icon.back {
        blit_scaled(target, &back.image, x, icon.y, icon.width, icon.height, transform);
    }
    blit_scaled(target, &icon.info.image, x, icon.y, icon.width, icon.height, transform);
}

fn blit_scaled(
    target: &mut PixmapMut<'_>,
    image: &Pixmap,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    transform: Transform,
) {
    let sx = width / image.width() as f32;
    let sy = height / image.height() as f32;
    let placement = Transform::from_translate(x, y).pre_scale(sx, sy);
    target.draw_pixmap(
        0,
        0,
        image.as_ref(),
        &PixmapPaint { quality: FilterQuality::Bilinear, ..PixmapPaint::default() },
        placement.post_concat(transform),
        None,
    );
}

/// The color-fill compositing trick: keep the alpha already on the surface,
/// replace its color. Restricted to the glyph box (under the same arc
/// transform as the glyph) so neighbors stay untouched.
fn tint_rect(target: &mut PixmapMut<'_>, icon: &SymbolGlyph, dx: f32, frame: &Frame, tint: Color) {
    let (x, transform) = glyph_transform(icon.arc_angle, icon.x + dx, icon.y, icon.width, frame);
    silhouette_rect(target, x, icon.y, icon.width, icon.height, transform, tint);
}

fn silhouette_rect(
    target: &mut PixmapMut<'_>,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    transform: Transform,
    color: Color,
) {
    let Some(rect) = Rect::from_xywh(x, y, width, height) else {
        return;
    };
    let mut paint = color_paint(color, 1.0);
    paint.blend_mode = BlendMode::SourceIn;
    target.fill_rect(rect, &paint, transform, None);
}

/// Filled disc behind an outlined icon, sized to the glyph box plus the
/// outline width.
fn draw_outline_disc(aux: &mut Pixmap, icon: &SymbolGlyph, dx: f32, frame: &Frame) {
    let (x, transform) = glyph_transform(icon.arc_angle, icon.x + dx, icon.y, icon.width, frame);
    let cx = x + icon.width / 2.0;
    let cy = icon.y + icon.height / 2.0;
    let radius = icon.width.max(icon.height) / 2.0 + icon.outline.width;
    let mut builder = PathBuilder::new();
    builder.push_circle(cx, cy, radius);
    let Some(path) = builder.finish() else {
        return;
    };
    let paint = color_paint(icon.outline.color, 1.0);
    aux.fill_path(&path, &paint, FillRule::Winding, transform, None);
}

/// Anchor position and transform for a glyph, handling arc placement.
///
/// On an arc the glyph is drawn as if at the top of the circle and rotated
/// into place around the circle's center.
fn glyph_transform(arc_angle: Option<f32>, x: f32, y: f32, width: f32, frame: &Frame) -> (f32, Transform) {
    match arc_angle {
        None => (x, Transform::identity()),
        Some(angle) => {
            let anchor_x = frame.width / 2.0 - width / 2.0;
            let pivot_x = frame.width / 2.0;
            let pivot_y = y + frame.arc_radius;
            (anchor_x, Transform::from_rotate_at(angle, pivot_x, pivot_y))
        }
    }
}

fn color_paint(color: Color, alpha: f32) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.anti_alias = true;
    let a = (color.a as f32 * alpha).round().clamp(0.0, 255.0) as u8;
    paint.set_color(tiny_skia::Color::from_rgba8(color.r, color.g, color.b, a));
    paint
}
