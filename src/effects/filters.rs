//! Per-clip color adjustment and blur.
//!
//! Clip color controls (brightness, contrast, saturation, hue) and named
//! looks compose into a single 4x5 color matrix applied to straight-alpha
//! values; blur runs as a separable gaussian in Q16 fixed point over
//! premultiplied rgba8.

use crate::document::model::ClipProperties;
use crate::foundation::error::{CutlineError, CutlineResult};

/// 4x5 row-major color matrix over straight-alpha rgba in `[0, 1]`.
pub(crate) type ColorMatrix = [f32; 20];

const IDENTITY: ColorMatrix = [
    1.0, 0.0, 0.0, 0.0, 0.0, //
    0.0, 1.0, 0.0, 0.0, 0.0, //
    0.0, 0.0, 1.0, 0.0, 0.0, //
    0.0, 0.0, 0.0, 1.0, 0.0,
];

/// A named look layered on top of the per-clip color controls.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum FilterPreset {
    Grayscale,
    Sepia,
    Vintage,
    Dreamy,
    Cyber,
    Dramatic,
    Noir,
}

impl FilterPreset {
    pub(crate) fn from_name(name: &str) -> Option<Self> {
        match name {
            "grayscale" => Some(Self::Grayscale),
            "sepia" => Some(Self::Sepia),
            "vintage" => Some(Self::Vintage),
            "dreamy" => Some(Self::Dreamy),
            "cyber" => Some(Self::Cyber),
            "dramatic" => Some(Self::Dramatic),
            "noir" => Some(Self::Noir),
            _ => None,
        }
    }

    fn matrix(self) -> ColorMatrix {
        match self {
            Self::Grayscale => grayscale(1.0),
            Self::Sepia => sepia(1.0),
            Self::Vintage => compose(brightness(0.9), compose(contrast(1.2), sepia(0.5))),
            Self::Dreamy => compose(saturate(1.2), brightness(1.1)),
            Self::Cyber => compose(saturate(2.0), compose(contrast(1.5), hue_rotate(180.0))),
            Self::Dramatic => compose(grayscale(0.3), compose(brightness(0.9), contrast(1.4))),
            Self::Noir => compose(brightness(0.8), compose(contrast(1.5), grayscale(1.0))),
        }
    }

    fn extra_blur_px(self) -> f64 {
        match self {
            Self::Dreamy => 1.0,
            _ => 0.0,
        }
    }
}

/// The resolved filter work for one clip at one frame.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct FilterChain {
    pub(crate) matrix: Option<ColorMatrix>,
    pub(crate) blur_px: f64,
}

impl FilterChain {
    /// Build the chain from a clip's color controls and optional preset.
    ///
    /// Adjustments apply in the order brightness, contrast, saturation, hue,
    /// then the preset. The blur slider maps to pixels at a fifth of its
    /// value.
    pub(crate) fn from_properties(props: &ClipProperties) -> Self {
        let mut m = IDENTITY;
        let mut touched = false;
        if props.brightness != 0.0 {
            m = compose(brightness(1.0 + props.brightness as f32 / 100.0), m);
            touched = true;
        }
        if props.contrast != 0.0 {
            m = compose(contrast(1.0 + props.contrast as f32 / 100.0), m);
            touched = true;
        }
        if props.saturation != 0.0 {
            m = compose(saturate(1.0 + props.saturation as f32 / 100.0), m);
            touched = true;
        }
        if props.hue != 0.0 {
            m = compose(hue_rotate(props.hue as f32), m);
            touched = true;
        }
        let mut blur_px = props.blur / 5.0;
        if let Some(preset) = props.filter.as_deref().and_then(FilterPreset::from_name) {
            m = compose(preset.matrix(), m);
            blur_px += preset.extra_blur_px();
            touched = true;
        }
        Self { matrix: touched.then_some(m), blur_px: blur_px.max(0.0) }
    }

    /// Whether the chain changes pixels at all.
    pub(crate) fn is_identity(&self) -> bool {
        self.matrix.is_none() && self.blur_px <= 0.0
    }

    /// Run the chain over a premultiplied rgba8 buffer in place.
    pub(crate) fn apply_in_place(
        &self,
        pixels: &mut [u8],
        width: u32,
        height: u32,
        scratch: &mut Vec<u8>,
        scratch_b: &mut Vec<u8>,
    ) -> CutlineResult<()> {
        let expected = (width as usize) * (height as usize) * 4;
        if pixels.len() != expected {
            return Err(CutlineError::render(format!(
                "filter buffer is {} bytes, expected {expected}",
                pixels.len()
            )));
        }
        if let Some(m) = self.matrix {
            scratch.resize(expected, 0);
            scratch.copy_from_slice(pixels);
            color_matrix_rgba8_premul(scratch, pixels, m);
        }
        if self.blur_px > 0.0 {
            let sigma = self.blur_px as f32;
            let radius = (self.blur_px * 2.0).ceil() as u32;
            let kernel = gaussian_kernel_q16(radius, sigma)?;
            scratch.resize(expected, 0);
            scratch_b.resize(expected, 0);
            scratch.copy_from_slice(pixels);
            blur_rgba8_premul_q16(scratch, pixels, scratch_b, width, height, &kernel);
        }
        Ok(())
    }

    /// Run the color matrix over one straight-alpha rgba color.
    ///
    /// Used for text fills, which are painted as solid color rather than
    /// rasterized to an intermediate surface.
    pub(crate) fn transform_color(&self, rgba: [u8; 4]) -> [u8; 4] {
        let Some(m) = self.matrix else {
            return rgba;
        };
        let r = rgba[0] as f32 / 255.0;
        let g = rgba[1] as f32 / 255.0;
        let b = rgba[2] as f32 / 255.0;
        let a = rgba[3] as f32 / 255.0;
        let out = [
            (m[0] * r + m[1] * g + m[2] * b + m[3] * a + m[4]).clamp(0.0, 1.0),
            (m[5] * r + m[6] * g + m[7] * b + m[8] * a + m[9]).clamp(0.0, 1.0),
            (m[10] * r + m[11] * g + m[12] * b + m[13] * a + m[14]).clamp(0.0, 1.0),
            (m[15] * r + m[16] * g + m[17] * b + m[18] * a + m[19]).clamp(0.0, 1.0),
        ];
        [
            (out[0] * 255.0).round() as u8,
            (out[1] * 255.0).round() as u8,
            (out[2] * 255.0).round() as u8,
            (out[3] * 255.0).round() as u8,
        ]
    }
}

/// `b` applied after `a`.
fn compose(b: ColorMatrix, a: ColorMatrix) -> ColorMatrix {
    let mut out = [0.0f32; 20];
    for row in 0..4 {
        for col in 0..5 {
            let mut v = 0.0;
            for k in 0..4 {
                v += b[row * 5 + k] * a[k * 5 + col];
            }
            if col == 4 {
                v += b[row * 5 + 4];
            }
            out[row * 5 + col] = v;
        }
    }
    out
}

fn brightness(v: f32) -> ColorMatrix {
    let v = v.max(0.0);
    [
        v, 0.0, 0.0, 0.0, 0.0, //
        0.0, v, 0.0, 0.0, 0.0, //
        0.0, 0.0, v, 0.0, 0.0, //
        0.0, 0.0, 0.0, 1.0, 0.0,
    ]
}

fn contrast(v: f32) -> ColorMatrix {
    let v = v.max(0.0);
    let o = (1.0 - v) / 2.0;
    [
        v, 0.0, 0.0, 0.0, o, //
        0.0, v, 0.0, 0.0, o, //
        0.0, 0.0, v, 0.0, o, //
        0.0, 0.0, 0.0, 1.0, 0.0,
    ]
}

fn saturate(s: f32) -> ColorMatrix {
    let s = s.max(0.0);
    [
        0.213 + 0.787 * s,
        0.715 - 0.715 * s,
        0.072 - 0.072 * s,
        0.0,
        0.0,
        0.213 - 0.213 * s,
        0.715 + 0.285 * s,
        0.072 - 0.072 * s,
        0.0,
        0.0,
        0.213 - 0.213 * s,
        0.715 - 0.715 * s,
        0.072 + 0.928 * s,
        0.0,
        0.0,
        0.0,
        0.0,
        0.0,
        1.0,
        0.0,
    ]
}

fn grayscale(amount: f32) -> ColorMatrix {
    saturate(1.0 - amount.clamp(0.0, 1.0))
}

fn sepia(amount: f32) -> ColorMatrix {
    let s = 1.0 - amount.clamp(0.0, 1.0);
    [
        0.393 + 0.607 * s,
        0.769 - 0.769 * s,
        0.189 - 0.189 * s,
        0.0,
        0.0,
        0.349 - 0.349 * s,
        0.686 + 0.314 * s,
        0.168 - 0.168 * s,
        0.0,
        0.0,
        0.272 - 0.272 * s,
        0.534 - 0.534 * s,
        0.131 + 0.869 * s,
        0.0,
        0.0,
        0.0,
        0.0,
        0.0,
        1.0,
        0.0,
    ]
}

fn hue_rotate(degrees: f32) -> ColorMatrix {
    let rad = degrees.to_radians();
    let c = rad.cos();
    let s = rad.sin();
    [
        0.213 + c * 0.787 - s * 0.213,
        0.715 - c * 0.715 - s * 0.715,
        0.072 - c * 0.072 + s * 0.928,
        0.0,
        0.0,
        0.213 - c * 0.213 + s * 0.143,
        0.715 + c * 0.285 + s * 0.140,
        0.072 - c * 0.072 - s * 0.283,
        0.0,
        0.0,
        0.213 - c * 0.213 - s * 0.787,
        0.715 - c * 0.715 + s * 0.715,
        0.072 + c * 0.928 + s * 0.072,
        0.0,
        0.0,
        0.0,
        0.0,
        0.0,
        1.0,
        0.0,
    ]
}

fn gaussian_kernel_q16(radius: u32, sigma: f32) -> CutlineResult<Vec<u32>> {
    if radius == 0 {
        return Ok(vec![1 << 16]);
    }
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(CutlineError::render("blur sigma must be finite and > 0"));
    }

    let r = radius as i32;
    let mut weights_f = Vec::<f64>::with_capacity((2 * r + 1) as usize);
    let mut sum = 0.0f64;
    let sigma = sigma as f64;
    let denom = 2.0 * sigma * sigma;
    for i in -r..=r {
        let x = i as f64;
        let w = (-x * x / denom).exp();
        weights_f.push(w);
        sum += w;
    }
    if sum <= 0.0 {
        return Err(CutlineError::render("gaussian kernel sum is zero"));
    }

    // Normalize to a fixed 1<<16 total so the blur never gains or loses energy.
    let mut weights = Vec::<u32>::with_capacity(weights_f.len());
    let mut acc: i64 = 0;
    for &wf in &weights_f {
        let q = ((wf / sum) * 65536.0).round() as i64;
        let q = q.clamp(0, 65536);
        weights.push(q as u32);
        acc += q;
    }
    let delta = 65536 - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        let mid_val = i64::from(weights[mid]);
        weights[mid] = (mid_val + delta).clamp(0, 65536) as u32;
    }

    Ok(weights)
}

fn blur_rgba8_premul_q16(
    src: &[u8],
    dst: &mut [u8],
    tmp: &mut [u8],
    width: u32,
    height: u32,
    kernel_q16: &[u32],
) {
    if kernel_q16.len() == 1 {
        dst.copy_from_slice(src);
        return;
    }

    horizontal_blur_q16(src, tmp, width, height, kernel_q16);
    vertical_blur_q16(tmp, dst, width, height, kernel_q16);
}

fn horizontal_blur_q16(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    for y in 0..height as i32 {
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let dx = ki as i32 - radius;
                let sx = (x + dx).clamp(0, w - 1);
                let idx = ((y * w + sx) as usize) * 4;
                for c in 0..4 {
                    acc[c] += (kw as u64) * (src[idx + c] as u64);
                }
            }
            let out_idx = ((y * w + x) as usize) * 4;
            for c in 0..4 {
                dst[out_idx + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

fn vertical_blur_q16(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    let h = height as i32;
    for y in 0..h {
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let dy = ki as i32 - radius;
                let sy = (y + dy).clamp(0, h - 1);
                let idx = ((sy * w + x) as usize) * 4;
                for c in 0..4 {
                    acc[c] += (kw as u64) * (src[idx + c] as u64);
                }
            }
            let out_idx = ((y * w + x) as usize) * 4;
            for c in 0..4 {
                dst[out_idx + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

fn q16_to_u8(acc: u64) -> u8 {
    let v = (acc + 32768) >> 16;
    (v.min(255)) as u8
}

fn color_matrix_rgba8_premul(src: &[u8], dst: &mut [u8], m: ColorMatrix) {
    debug_assert_eq!(src.len(), dst.len());
    for (s, d) in src.chunks_exact(4).zip(dst.chunks_exact_mut(4)) {
        let pr = s[0] as f32 / 255.0;
        let pg = s[1] as f32 / 255.0;
        let pb = s[2] as f32 / 255.0;
        let pa = s[3] as f32 / 255.0;

        // Convert premul -> straight for matrix application.
        let inv_a = if pa > 0.0 { 1.0 / pa } else { 0.0 };
        let r = pr * inv_a;
        let g = pg * inv_a;
        let b = pb * inv_a;
        let a = pa;

        let out_r = (m[0] * r + m[1] * g + m[2] * b + m[3] * a + m[4]).clamp(0.0, 1.0);
        let out_g = (m[5] * r + m[6] * g + m[7] * b + m[8] * a + m[9]).clamp(0.0, 1.0);
        let out_b = (m[10] * r + m[11] * g + m[12] * b + m[13] * a + m[14]).clamp(0.0, 1.0);
        let out_a = (m[15] * r + m[16] * g + m[17] * b + m[18] * a + m[19]).clamp(0.0, 1.0);

        // Convert straight -> premul.
        let pr = (out_r * out_a).clamp(0.0, 1.0);
        let pg = (out_g * out_a).clamp(0.0, 1.0);
        let pb = (out_b * out_a).clamp(0.0, 1.0);

        d[0] = (pr * 255.0).round().clamp(0.0, 255.0) as u8;
        d[1] = (pg * 255.0).round().clamp(0.0, 255.0) as u8;
        d[2] = (pb * 255.0).round().clamp(0.0, 255.0) as u8;
        d[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/filters.rs"]
mod tests;
