use vecplot::backend::{Op, RecordingContext};
use vecplot::stamps::StampShape;
use vecplot::theme::{StyleToken, Theme};
use vecplot::DrawContext;

#[test]
fn tokens_resolve_to_concrete_drawing_state() {
    let style = Theme::default();
    let mut ctx = RecordingContext::new();
    style.apply(&mut ctx, StyleToken::GenericLine);
    assert!(ctx
        .ops()
        .iter()
        .any(|op| matches!(op, Op::SetSourceRgb(..))));
    assert!(ctx
        .ops()
        .iter()
        .any(|op| matches!(op, Op::SetLineWidth(w) if *w == style.line_width)));
}

#[test]
fn data_themes_rotate() {
    let style = Theme::default();
    let n = style.data_themes.len();
    assert!(n >= 4);
    // The palette wraps around.
    assert_eq!(style.symbol_for(0), style.symbol_for(n));
    assert_eq!(style.data_color(1), style.data_color(n + 1));
    // Distinct entries differ.
    assert_ne!(style.data_color(0), style.data_color(1));
}

#[test]
fn data_line_uses_the_dash_pattern() {
    let style = Theme::default();
    let mut ctx = RecordingContext::new();
    // Palette entry 1 is dashed.
    style.apply_data_line(&mut ctx, 1);
    assert!(ctx
        .ops()
        .iter()
        .any(|op| matches!(op, Op::SetDash(d, _) if !d.is_empty())));
    // Stamps are never dashed.
    let mut ctx = RecordingContext::new();
    style.apply_data_stamp(&mut ctx, 1);
    assert!(ctx
        .ops()
        .iter()
        .all(|op| !matches!(op, Op::SetDash(d, _) if !d.is_empty())));
}

#[test]
fn named_colors_resolve() {
    let style = Theme::default();
    assert_eq!(style.get_color("background"), Some(style.background));
    assert_eq!(style.get_color("foreground"), Some(style.foreground));
    assert_eq!(style.get_color("nonesuch"), None);
}

#[test]
fn inverse_palette_swaps_roles() {
    let dark = Theme::white_on_black();
    assert_eq!(dark.background, vecplot::Color::BLACK);
    assert_eq!(dark.foreground, vecplot::Color::WHITE);
}

#[test]
fn theme_round_trips_through_json() {
    let mut style = Theme::default();
    style.small_scale = 4.0;
    style.data_themes[0].symbol = StampShape::Plus;
    let json = style.to_json().unwrap();
    let back = Theme::from_json(&json).unwrap();
    assert_eq!(back.small_scale, 4.0);
    assert_eq!(back.data_themes[0].symbol, StampShape::Plus);
    assert_eq!(back.foreground, style.foreground);
}

#[test]
fn recording_context_text_metrics_are_deterministic() {
    let mut ctx = RecordingContext::new();
    let a = ctx.text_extents("123").unwrap();
    let b = ctx.text_extents("123").unwrap();
    assert_eq!(a, b);
    assert!(ctx.text_extents("1234").unwrap().width > a.width);
}
