use super::*;

#[test]
fn endpoints_are_fixed() {
    for ease in [Ease::Linear, Ease::InQuad, Ease::OutQuad, Ease::InOutQuad] {
        assert_eq!(ease.apply(0.0), 0.0);
        assert_eq!(ease.apply(1.0), 1.0);
    }
}

#[test]
fn input_is_clamped() {
    assert_eq!(Ease::Linear.apply(-0.5), 0.0);
    assert_eq!(Ease::OutQuad.apply(2.0), 1.0);
}

#[test]
fn out_quad_decelerates() {
    // t * (2 - t) at the midpoint.
    assert_eq!(Ease::OutQuad.apply(0.5), 0.75);
    assert!(Ease::OutQuad.apply(0.25) > 0.25);
    assert!(Ease::InQuad.apply(0.25) < 0.25);
}

#[test]
fn in_out_quad_is_symmetric() {
    let e = Ease::InOutQuad;
    for t in [0.1, 0.25, 0.4] {
        assert!((e.apply(t) - (1.0 - e.apply(1.0 - t))).abs() < 1e-12);
    }
    assert_eq!(e.apply(0.5), 0.5);
}

#[test]
fn serde_names_are_camel_case() {
    assert_eq!(serde_json::to_string(&Ease::OutQuad).unwrap(), "\"outQuad\"");
    let e: Ease = serde_json::from_str("\"inOutQuad\"").unwrap();
    assert_eq!(e, Ease::InOutQuad);
}
