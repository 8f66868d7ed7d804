use super::*;

#[test]
fn fps_rejects_zero_parts() {
    assert!(Fps::new(30, 1).is_ok());
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(30, 0).is_err());
}

#[test]
fn fps_frame_math_round_trips() {
    let fps = Fps::new(30, 1).unwrap();
    assert_eq!(fps.as_f64(), 30.0);
    assert_eq!(fps.frames_to_secs(30), 1.0);
    assert_eq!(fps.secs_to_frames_ceil(1.0), 30);
    // A partial trailing frame is still rendered.
    assert_eq!(fps.secs_to_frames_ceil(1.001), 31);
    assert_eq!(fps.secs_to_frames_ceil(0.0), 0);
}

#[test]
fn ntsc_rate_is_fractional() {
    let fps = Fps::new(30_000, 1_001).unwrap();
    assert!((fps.as_f64() - 29.97).abs() < 0.01);
}

#[test]
fn premultiply_scales_color_channels() {
    let c = Rgba8Premul::from_straight_rgba(255, 128, 0, 128);
    assert_eq!(c.a, 128);
    assert_eq!(c.r, 128);
    assert_eq!(c.g, 64);
    assert_eq!(c.b, 0);

    let opaque = Rgba8Premul::from_straight_rgba(10, 20, 30, 255);
    assert_eq!((opaque.r, opaque.g, opaque.b, opaque.a), (10, 20, 30, 255));
}

#[test]
fn hex_colors_parse_in_all_widths() {
    assert_eq!(parse_hex_rgba("#fff"), Some([255, 255, 255, 255]));
    assert_eq!(parse_hex_rgba("#000000"), Some([0, 0, 0, 255]));
    assert_eq!(parse_hex_rgba("#ff000080"), Some([255, 0, 0, 128]));
    assert_eq!(parse_hex_rgba("  #00FF00  "), Some([0, 255, 0, 255]));
    assert_eq!(parse_hex_rgba("red"), None);
    assert_eq!(parse_hex_rgba("#12345"), None);
    assert_eq!(parse_hex_rgba("#gg0000"), None);
}
