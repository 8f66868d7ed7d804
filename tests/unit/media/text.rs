use super::*;

#[test]
fn case_transforms_apply_before_layout() {
    let mut style = TextStyle { content: "Hello World".into(), ..TextStyle::default() };
    assert_eq!(TextLayoutEngine::transformed_content(&style), "Hello World");

    style.transform = TextTransform::Uppercase;
    assert_eq!(TextLayoutEngine::transformed_content(&style), "HELLO WORLD");

    style.transform = TextTransform::Lowercase;
    assert_eq!(TextLayoutEngine::transformed_content(&style), "hello world");
}

#[test]
fn measure_falls_back_without_a_registered_font() {
    let mut engine = TextLayoutEngine::new();
    let style = TextStyle {
        content: "Title".into(),
        font_size: 40.0,
        line_height: 1.2,
        font_family: "Unregistered".into(),
        ..TextStyle::default()
    };
    let (w, h) = engine.measure(&style).unwrap();
    assert_eq!(w, 5.0 * 40.0 * 0.6);
    assert_eq!(h, 48.0);
}

#[test]
fn fallback_width_includes_letter_spacing() {
    let mut engine = TextLayoutEngine::new();
    let style = TextStyle {
        content: "ab".into(),
        font_size: 10.0,
        line_height: 1.0,
        letter_spacing: 3.0,
        font_family: "Unregistered".into(),
        ..TextStyle::default()
    };
    let (w, h) = engine.measure(&style).unwrap();
    assert_eq!(w, 2.0 * 10.0 * 0.6 + 2.0 * 3.0);
    assert_eq!(h, 10.0);
}

#[test]
fn fallback_counts_chars_after_transform() {
    let mut engine = TextLayoutEngine::new();
    let style = TextStyle {
        content: "ABC".into(),
        transform: TextTransform::Lowercase,
        font_size: 10.0,
        line_height: 1.0,
        font_family: "Unregistered".into(),
        ..TextStyle::default()
    };
    let (w, _) = engine.measure(&style).unwrap();
    assert_eq!(w, 3.0 * 10.0 * 0.6);
}

#[test]
fn shape_requires_a_registered_family() {
    let mut engine = TextLayoutEngine::new();
    let style = TextStyle { font_family: "Nope".into(), ..TextStyle::default() };
    assert!(engine.shape(&style, [255, 255, 255, 255]).is_none());
}

#[test]
fn empty_content_measures_zero_wide() {
    let mut engine = TextLayoutEngine::new();
    let style = TextStyle {
        content: String::new(),
        font_size: 40.0,
        line_height: 1.2,
        font_family: "Unregistered".into(),
        ..TextStyle::default()
    };
    let (w, h) = engine.measure(&style).unwrap();
    assert_eq!(w, 0.0);
    assert_eq!(h, 48.0);
}
