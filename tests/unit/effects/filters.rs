use super::*;
use crate::document::model::ClipProperties;

#[test]
fn default_properties_build_an_identity_chain() {
    let chain = FilterChain::from_properties(&ClipProperties::default());
    assert!(chain.is_identity());
    assert!(chain.matrix.is_none());
    assert_eq!(chain.blur_px, 0.0);
}

#[test]
fn preset_names_are_exact_lowercase() {
    assert_eq!(FilterPreset::from_name("grayscale"), Some(FilterPreset::Grayscale));
    assert_eq!(FilterPreset::from_name("noir"), Some(FilterPreset::Noir));
    assert_eq!(FilterPreset::from_name("Grayscale"), None);
    assert_eq!(FilterPreset::from_name("vhs"), None);
}

#[test]
fn unknown_preset_names_are_ignored() {
    let props = ClipProperties {
        filter: Some("vhs".into()),
        ..ClipProperties::default()
    };
    assert!(FilterChain::from_properties(&props).is_identity());
}

#[test]
fn blur_slider_maps_to_fifth_pixels() {
    let props = ClipProperties { blur: 10.0, ..ClipProperties::default() };
    let chain = FilterChain::from_properties(&props);
    assert!(chain.matrix.is_none());
    assert_eq!(chain.blur_px, 2.0);
    assert!(!chain.is_identity());
}

#[test]
fn dreamy_preset_adds_a_pixel_of_blur() {
    let props = ClipProperties {
        filter: Some("dreamy".into()),
        ..ClipProperties::default()
    };
    let chain = FilterChain::from_properties(&props);
    assert!(chain.matrix.is_some());
    assert_eq!(chain.blur_px, 1.0);
}

#[test]
fn brightness_scales_color_channels_only() {
    let props = ClipProperties { brightness: 50.0, ..ClipProperties::default() };
    let chain = FilterChain::from_properties(&props);
    let out = chain.transform_color([100, 100, 100, 255]);
    assert_eq!(out, [150, 150, 150, 255]);
}

#[test]
fn transform_color_clamps_and_passes_identity() {
    let identity = FilterChain { matrix: None, blur_px: 0.0 };
    assert_eq!(identity.transform_color([12, 34, 56, 78]), [12, 34, 56, 78]);

    let props = ClipProperties { brightness: 300.0, ..ClipProperties::default() };
    let chain = FilterChain::from_properties(&props);
    let out = chain.transform_color([200, 200, 200, 255]);
    assert_eq!(out, [255, 255, 255, 255]);
}

#[test]
fn grayscale_matrix_flattens_a_premul_buffer() {
    let props = ClipProperties {
        filter: Some("grayscale".into()),
        ..ClipProperties::default()
    };
    let chain = FilterChain::from_properties(&props);

    let mut pixels = vec![255u8, 0, 0, 255, 0, 255, 0, 255];
    let mut a = Vec::new();
    let mut b = Vec::new();
    chain.apply_in_place(&mut pixels, 2, 1, &mut a, &mut b).unwrap();

    for px in pixels.chunks_exact(4) {
        assert_eq!(px[0], px[1]);
        assert_eq!(px[1], px[2]);
        assert_eq!(px[3], 255);
    }
    // Rec. 709 luma: green is far brighter than red.
    assert!(pixels[4] > pixels[0]);
}

#[test]
fn color_matrix_preserves_transparent_pixels() {
    let props = ClipProperties { brightness: 50.0, ..ClipProperties::default() };
    let chain = FilterChain::from_properties(&props);
    let mut pixels = vec![0u8, 0, 0, 0];
    let mut a = Vec::new();
    let mut b = Vec::new();
    chain.apply_in_place(&mut pixels, 1, 1, &mut a, &mut b).unwrap();
    assert_eq!(pixels, vec![0, 0, 0, 0]);
}

#[test]
fn blur_leaves_a_constant_image_unchanged() {
    let props = ClipProperties { blur: 10.0, ..ClipProperties::default() };
    let chain = FilterChain::from_properties(&props);

    let mut pixels = vec![120u8; 8 * 8 * 4];
    let mut a = Vec::new();
    let mut b = Vec::new();
    chain.apply_in_place(&mut pixels, 8, 8, &mut a, &mut b).unwrap();
    assert!(pixels.iter().all(|&p| p.abs_diff(120) <= 1));
}

#[test]
fn blur_spreads_an_impulse() {
    let props = ClipProperties { blur: 5.0, ..ClipProperties::default() };
    let chain = FilterChain::from_properties(&props);

    let w = 9;
    let mut pixels = vec![0u8; w * w * 4];
    let center = (4 * w + 4) * 4;
    pixels[center..center + 4].copy_from_slice(&[255, 255, 255, 255]);

    let mut a = Vec::new();
    let mut b = Vec::new();
    chain.apply_in_place(&mut pixels, w as u32, w as u32, &mut a, &mut b).unwrap();

    assert!(pixels[center] < 255);
    let neighbor = (4 * w + 5) * 4;
    assert!(pixels[neighbor] > 0);
}

#[test]
fn apply_rejects_mismatched_buffer_sizes() {
    let props = ClipProperties { brightness: 10.0, ..ClipProperties::default() };
    let chain = FilterChain::from_properties(&props);
    let mut pixels = vec![0u8; 12];
    let mut a = Vec::new();
    let mut b = Vec::new();
    assert!(chain.apply_in_place(&mut pixels, 2, 2, &mut a, &mut b).is_err());
}

#[test]
fn adjustments_compose_with_the_preset_last() {
    // Brightness then noir: noir's grayscale must see the brightened values,
    // so the result differs from noir alone on a colored input.
    let bright_noir = FilterChain::from_properties(&ClipProperties {
        brightness: 60.0,
        filter: Some("noir".into()),
        ..ClipProperties::default()
    });
    let noir = FilterChain::from_properties(&ClipProperties {
        filter: Some("noir".into()),
        ..ClipProperties::default()
    });
    let input = [80, 120, 40, 255];
    let a = bright_noir.transform_color(input);
    let b = noir.transform_color(input);
    assert!(a[0] > b[0]);
    assert_eq!(a[0], a[1]);
    assert_eq!(b[0], b[1]);
}
