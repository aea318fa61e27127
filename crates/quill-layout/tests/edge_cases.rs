//! Edge case tests for quill-layout
//!
//! Command quirks, style snapshots, and the less-traveled field modes.

use std::sync::Arc;

use quill_atlas::{RandomSource, SymbolAtlas, SymbolInfo};
use quill_layout::{
    layout, Color, FieldSpec, FixedMeasure, FontTraits, Glyph, LayoutResult, PackMetrics,
};
use quill_markup::{tokenize, TokenizerOptions};
use tiny_skia::Pixmap;

struct SeqRandom(u32);

impl RandomSource for SeqRandom {
    fn next(&mut self, bound: u32) -> u32 {
        let v = self.0 % bound;
        self.0 += 1;
        v
    }
}

fn pixmap() -> Arc<Pixmap> {
    Arc::new(Pixmap::new(4, 4).unwrap())
}

fn test_atlas() -> SymbolAtlas {
    let mut builder = SymbolAtlas::builder();
    for code in ["w", "u", "t"] {
        builder.insert(SymbolInfo::new(code, pixmap())).unwrap();
    }
    builder
        .insert(SymbolInfo::new("x", pixmap()).color_matched())
        .unwrap();
    builder
        .insert(SymbolInfo::new("q", pixmap()).with_back("qb{}", 2))
        .unwrap();
    builder.insert(SymbolInfo::new("qb0", pixmap())).unwrap();
    builder.insert(SymbolInfo::new("qb1", pixmap())).unwrap();
    builder.build()
}

fn run(markup: &str, spec: &FieldSpec) -> LayoutResult {
    let tokens = tokenize(markup, &TokenizerOptions::default());
    layout(
        &tokens,
        spec,
        &PackMetrics::new(100.0, 100.0),
        &test_atlas(),
        &FixedMeasure::new(0.5),
        &FontTraits::standard(),
        10.0,
        &mut SeqRandom(0),
    )
}

fn wide_spec() -> FieldSpec {
    FieldSpec {
        width: 0.90,
        height: 0.90,
        size: 0.10,
        ..Default::default()
    }
}

fn glyph_x(result: &LayoutResult, line: usize, index: usize) -> f32 {
    match &result.lines[line].glyphs[index] {
        Glyph::Text(t) => t.x,
        Glyph::Symbol(s) => s.x,
        Glyph::Space(s) => s.x,
    }
}

// ============================================================================
// TAB STOPS: SAVEX / LOADX
// ============================================================================

#[test]
fn test_loadx_restores_forward() {
    // Pen at 10 after "AB", saved; nudged back to 2; loadx moves forward to
    // the saved stop.
    let result = run("AB{savex}{left8}{loadx}CD", &wide_spec());
    assert_eq!(glyph_x(&result, 0, 1), 10.0);
}

#[test]
fn test_loadx_never_retreats() {
    // Pen at 30 is past the saved 10: restore keeps the greater position.
    let result = run("AB{savex}{right20}{loadx}CD", &wide_spec());
    assert_eq!(glyph_x(&result, 0, 1), 30.0);
}

#[test]
fn test_loadx2_restores_unconditionally() {
    // The second slot retreats where the first will not.
    let result = run("AB{savex2}{right20}{loadx2}CD", &wide_spec());
    assert_eq!(glyph_x(&result, 0, 1), 10.0);
}

#[test]
fn test_save_slots_are_independent() {
    let result = run("AB{savex}CD{savex2}{loadx}EF", &wide_spec());
    // loadx: pen at 20 already past the 10 stop, stays.
    assert_eq!(glyph_x(&result, 0, 2), 20.0);
    let result = run("AB{savex}CD{savex2}{left15}{loadx2}EF", &wide_spec());
    // loadx2 goes to the 20 stop even though the pen fell back to 5.
    assert_eq!(glyph_x(&result, 0, 2), 20.0);
}

// ============================================================================
// POSITION COMMANDS
// ============================================================================

#[test]
fn test_nudges_move_pen() {
    let result = run("A{right5}B", &wide_spec());
    assert_eq!(glyph_x(&result, 0, 1), 10.0); // 5 from "A" + 5 nudge
    let result = run("AB{left4}C", &wide_spec());
    assert_eq!(glyph_x(&result, 0, 1), 6.0);
}

#[test]
fn test_up_down_shift_lines() {
    let result = run("A{down7}B{line}C", &wide_spec());
    match (&result.lines[0].glyphs[0], &result.lines[0].glyphs[1]) {
        (Glyph::Text(a), Glyph::Text(b)) => {
            assert_eq!(a.y, 0.0);
            assert_eq!(b.y, 7.0);
        }
        other => panic!("unexpected glyphs: {other:?}"),
    }
    // The shift persists into later lines.
    assert_eq!(result.lines[1].y, 17.0);
}

#[test]
fn test_upinline_is_line_local() {
    let result = run("A{upinline3}B{line}C", &wide_spec());
    match (&result.lines[0].glyphs[1], &result.lines[1].glyphs[0]) {
        (Glyph::Text(b), Glyph::Text(c)) => {
            assert_eq!(b.y, -3.0, "raised within the line");
            assert_eq!(c.y, 10.0, "reset after the break");
        }
        other => panic!("unexpected glyphs: {other:?}"),
    }
}

#[test]
fn test_indent_moves_wrapped_line_starts() {
    let spec = FieldSpec {
        width: 0.30,
        height: 0.90,
        size: 0.10,
        bounded: false,
        ..Default::default()
    };
    let result = run("AB{indent}CD{line}EF", &spec);
    // After {indent} at pen 10, the next line starts at 10.
    assert_eq!(result.lines[1].y, 10.0);
    assert_eq!(glyph_x(&result, 1, 0), 10.0);

    let result = run("AB{indent}CD{line}{outdent}EF", &spec);
    assert_eq!(glyph_x(&result, 1, 0), 0.0); // back at the field start
}

// ============================================================================
// STYLE COMMANDS
// ============================================================================

#[test]
fn test_style_snapshots_do_not_alias() {
    let result = run("{fontcolor#ff0000}A {fontcolor#00ff00}B", &wide_spec());
    let styles: Vec<Color> = result.lines[0]
        .glyphs
        .iter()
        .filter_map(|g| match g {
            Glyph::Text(t) => Some(t.style.color),
            _ => None,
        })
        .collect();
    assert_eq!(styles, vec![Color::rgb(255, 0, 0), Color::rgb(0, 255, 0)]);
}

#[test]
fn test_fontsize_relative_and_absolute() {
    let result = run("A{fontsize-4}B{fontsize12pt}C", &wide_spec());
    let sizes: Vec<f32> = result.lines[0]
        .glyphs
        .iter()
        .filter_map(|g| match g {
            Glyph::Text(t) => Some(t.style.size),
            _ => None,
        })
        .collect();
    assert_eq!(sizes[0], 10.0);
    assert_eq!(sizes[1], 6.0);
    assert_eq!(sizes[2], 16.0); // 12pt at 4/3
}

#[test]
fn test_shadow_and_outline_commands() {
    let result = run("{shadow3}{shadowcolor#112233}{outline2}{outlinecolorwhite}A{shadow0}{outline0}B", &wide_spec());
    let styles: Vec<_> = result.lines[0]
        .glyphs
        .iter()
        .filter_map(|g| match g {
            Glyph::Text(t) => Some(&t.style),
            _ => None,
        })
        .collect();
    assert_eq!(styles[0].shadow.dx, 3.0);
    assert_eq!(styles[0].shadow.color, Color::rgb(0x11, 0x22, 0x33));
    assert_eq!(styles[0].outline.width, 2.0);
    assert!(styles[0].outline.is_visible());
    assert!(!styles[1].shadow.is_visible());
    assert!(!styles[1].outline.is_visible());
}

#[test]
fn test_kerning_widens_words() {
    let result = run("ABCD{line}{kerning2}ABCD", &wide_spec());
    let widths: Vec<f32> = result
        .lines
        .iter()
        .map(|l| l.width)
        .collect();
    assert_eq!(widths[0], 20.0);
    assert_eq!(widths[1], 28.0); // 4 glyphs, 2px each
}

#[test]
fn test_italic_reset_shape_family() {
    let result = run("{fontgoudymedieval}{i}A", &wide_spec());
    match &result.lines[0].glyphs[0] {
        Glyph::Text(t) => assert!(!t.style.italic, "medieval face has no italic shape"),
        other => panic!("unexpected glyph: {other:?}"),
    }
    let result = run("{i}A", &wide_spec());
    match &result.lines[0].glyphs[0] {
        Glyph::Text(t) => assert!(t.style.italic),
        other => panic!("unexpected glyph: {other:?}"),
    }
}

#[test]
fn test_swash_finals_applied_in_layout() {
    let result = run("{fontgoudymedieval}sort", &wide_spec());
    match &result.lines[0].glyphs[0] {
        Glyph::Text(t) => assert_eq!(t.text, "sor\u{a787}"),
        other => panic!("unexpected glyph: {other:?}"),
    }
}

#[test]
fn test_unknown_command_is_noop() {
    let plain = run("AB", &wide_spec());
    let noisy = run("{sparkle}{wibble3}AB", &wide_spec());
    assert_eq!(plain.line_count(), noisy.line_count());
    assert_eq!(glyph_x(&plain, 0, 0), glyph_x(&noisy, 0, 0));
}

// ============================================================================
// SYMBOL COLOR AND BACK VARIANTS
// ============================================================================

#[test]
fn test_color_match_tint_follows_text_color() {
    let result = run("{fontcolor#336699}{x}", &wide_spec());
    match &result.lines[0].glyphs[0] {
        Glyph::Symbol(s) => assert_eq!(s.tint, Some(Color::rgb(0x33, 0x66, 0x99))),
        other => panic!("unexpected glyph: {other:?}"),
    }
}

#[test]
fn test_symbol_color_override_and_auto() {
    let result = run("{symbolcolorwhite}{x}{symbolcolorauto}{x}", &wide_spec());
    let tints: Vec<_> = result.lines[0]
        .glyphs
        .iter()
        .filter_map(|g| match g {
            Glyph::Symbol(s) => Some(s.tint),
            _ => None,
        })
        .collect();
    assert_eq!(tints[0], Some(Color::WHITE));
    assert_eq!(tints[1], Some(Color::BLACK)); // back to the text color
}

#[test]
fn test_plain_icons_are_not_tinted() {
    let result = run("{symbolcolorwhite}{w}", &wide_spec());
    match &result.lines[0].glyphs[0] {
        Glyph::Symbol(s) => assert_eq!(s.tint, None),
        other => panic!("unexpected glyph: {other:?}"),
    }
}

#[test]
fn test_back_variants_resolve_through_atlas() {
    let result = run("{q}{q}{q}", &wide_spec());
    let backs: Vec<Option<String>> = result.lines[0]
        .glyphs
        .iter()
        .filter_map(|g| match g {
            Glyph::Symbol(s) => Some(s.back.as_ref().map(|b| b.code.clone())),
            _ => None,
        })
        .collect();
    // SeqRandom cycles 0, 1, 0.
    assert_eq!(
        backs,
        vec![
            Some("qb0".to_string()),
            Some("qb1".to_string()),
            Some("qb0".to_string())
        ]
    );
}

// ============================================================================
// FIELD MODES
// ============================================================================

#[test]
fn test_cost_field_skips_leading_spaces() {
    let spec = FieldSpec {
        cost: true,
        ..wide_spec()
    };
    let tokens = tokenize(" {w}", &TokenizerOptions::default());
    let result = layout(
        &tokens,
        &spec,
        &PackMetrics::new(100.0, 100.0),
        &test_atlas(),
        &FixedMeasure::new(0.5),
        &FontTraits::standard(),
        10.0,
        &mut SeqRandom(0),
    );
    match &result.lines[0].glyphs[0] {
        Glyph::Symbol(s) => assert_eq!(s.x, 0.0, "leading space dropped"),
        other => panic!("unexpected glyph: {other:?}"),
    }
}

#[test]
fn test_arc_glyphs_carry_increasing_angles() {
    let spec = FieldSpec {
        arc_radius: 0.50,
        arc_start: -20.0,
        ..wide_spec()
    };
    let result = run("AB CD EF", &spec);
    let angles: Vec<f32> = result.lines[0]
        .glyphs
        .iter()
        .filter_map(|g| match g {
            Glyph::Text(t) => t.arc_angle,
            _ => None,
        })
        .collect();
    assert_eq!(angles.len(), 3);
    assert_eq!(angles[0], -20.0);
    assert!(angles.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_empty_input_yields_empty_layout() {
    let result = run("", &wide_spec());
    assert_eq!(result.line_count(), 0);
    assert_eq!(result.total_height, 0.0);
    assert!(!result.overflow());
}
