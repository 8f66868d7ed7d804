//! Video and audio elements decoded through `ffprobe`/`ffmpeg` shell-outs.
//!
//! Only compiled with the `media-ffmpeg` feature. Frames are decoded one at
//! a time from the asset's source path and cached keyed by quantized source
//! time, so a paused playhead does not re-run ffmpeg every frame.

use crate::document::model::{Asset, AssetKind};
use crate::foundation::error::{CutlineError, CutlineResult};
use crate::media::element::{MediaElement, MediaFrame, ReadyState};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Decoded frames kept per element.
const FRAME_CACHE_CAP: usize = 16;

/// Frame cache key resolution, milliseconds.
const FRAME_KEY_MS: f64 = 1000.0;

#[derive(Clone, Debug)]
struct SourceInfo {
    path: PathBuf,
    width: u32,
    height: u32,
    duration: f64,
}

/// Probe source metadata through `ffprobe`.
fn probe_source(source_path: &Path) -> CutlineResult<SourceInfo> {
    #[derive(serde::Deserialize)]
    struct ProbeStream {
        codec_type: Option<String>,
        width: Option<u32>,
        height: Option<u32>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeFormat {
        duration: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeOut {
        streams: Vec<ProbeStream>,
        format: Option<ProbeFormat>,
    }

    let out = std::process::Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-print_format",
            "json",
            "-show_streams",
            "-show_format",
        ])
        .arg(source_path)
        .output()
        .map_err(|e| CutlineError::media(format!("failed to run ffprobe: {e}")))?;
    if !out.status.success() {
        return Err(CutlineError::media(format!(
            "ffprobe failed for '{}': {}",
            source_path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    let parsed: ProbeOut = serde_json::from_slice(&out.stdout)
        .map_err(|e| CutlineError::media(format!("ffprobe json parse failed: {e}")))?;
    let video = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"));
    let duration = parsed
        .format
        .and_then(|f| f.duration)
        .and_then(|d| d.parse::<f64>().ok())
        .unwrap_or(0.0);

    Ok(SourceInfo {
        path: source_path.to_path_buf(),
        width: video.and_then(|s| s.width).unwrap_or(0),
        height: video.and_then(|s| s.height).unwrap_or(0),
        duration,
    })
}

/// Decode a single RGBA frame at `source_time_sec`.
fn decode_frame_rgba8(source: &SourceInfo, source_time_sec: f64) -> CutlineResult<Vec<u8>> {
    let out = std::process::Command::new("ffmpeg")
        .args(["-v", "error", "-ss", &format!("{source_time_sec:.9}")])
        .arg("-i")
        .arg(&source.path)
        .args(["-frames:v", "1", "-f", "rawvideo", "-pix_fmt", "rgba", "pipe:1"])
        .output()
        .map_err(|e| CutlineError::media(format!("failed to run ffmpeg for video decode: {e}")))?;

    if !out.status.success() {
        return Err(CutlineError::media(format!(
            "ffmpeg video decode failed for '{}': {}",
            source.path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    let expected = source.width as usize * source.height as usize * 4;
    if expected == 0 || out.stdout.len() < expected {
        return Err(CutlineError::media(format!(
            "decoded frame has invalid size: got {} bytes, expected {expected}",
            out.stdout.len()
        )));
    }
    Ok(out.stdout[..expected].to_vec())
}

/// Video or audio element decoding through ffmpeg.
pub(crate) struct FfmpegMedia {
    asset: Asset,
    state: ReadyState,
    info: Option<SourceInfo>,
    time: f64,
    paused: bool,
    rate: f64,
    volume: f64,
    muted: bool,
    frames: VecDeque<(u64, MediaFrame)>,
}

impl FfmpegMedia {
    pub(crate) fn new(asset: Asset) -> Self {
        Self {
            asset,
            state: ReadyState::Unloaded,
            info: None,
            time: 0.0,
            paused: true,
            rate: 1.0,
            volume: 1.0,
            muted: false,
            frames: VecDeque::new(),
        }
    }

    fn frame_key(&self) -> u64 {
        (self.time * FRAME_KEY_MS).round() as u64
    }

    fn decode_current(&mut self) -> Option<MediaFrame> {
        let info = self.info.as_ref()?;
        if info.width == 0 || info.height == 0 {
            return None;
        }
        let key = self.frame_key();
        if let Some((_, frame)) = self.frames.iter().find(|(k, _)| *k == key) {
            return Some(frame.clone());
        }
        match decode_frame_rgba8(info, self.time) {
            Ok(mut data) => {
                crate::media::image::premultiply_rgba8(&mut data);
                let frame = MediaFrame {
                    width: info.width,
                    height: info.height,
                    rgba8_premul: Arc::new(data),
                };
                if self.frames.len() >= FRAME_CACHE_CAP {
                    self.frames.pop_front();
                }
                self.frames.push_back((key, frame.clone()));
                self.state = ReadyState::HaveCurrentData;
                Some(frame)
            }
            Err(err) => {
                tracing::warn!(asset_id = %self.asset.id, error = %err, "frame decode failed");
                None
            }
        }
    }
}

impl MediaElement for FfmpegMedia {
    fn load(&mut self) {
        if self.state != ReadyState::Unloaded {
            return;
        }
        self.state = ReadyState::Loading;
        let Some(url) = self.asset.url.clone() else {
            tracing::debug!(asset_id = %self.asset.id, "media asset has no source path");
            return;
        };
        match probe_source(Path::new(&url)) {
            Ok(info) => {
                self.info = Some(info);
                self.state = ReadyState::HaveMetadata;
            }
            Err(err) => {
                tracing::warn!(asset_id = %self.asset.id, error = %err, "media probe failed");
            }
        }
    }

    fn unload(&mut self) {
        self.frames.clear();
        self.info = None;
        self.state = ReadyState::Unloaded;
        self.time = 0.0;
        self.paused = true;
    }

    fn ready_state(&self) -> ReadyState {
        self.state
    }

    fn natural_size(&self) -> Option<(f64, f64)> {
        let info = self.info.as_ref()?;
        (info.width > 0 && info.height > 0).then_some((info.width as f64, info.height as f64))
    }

    fn duration(&self) -> Option<f64> {
        self.info.as_ref().map(|i| i.duration)
    }

    fn current_time(&self) -> f64 {
        self.time
    }

    fn seek(&mut self, time: f64) {
        let max = self.duration().unwrap_or(f64::INFINITY);
        self.time = time.clamp(0.0, max);
    }

    fn play(&mut self) {
        self.paused = false;
    }

    fn pause(&mut self) {
        self.paused = true;
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn rate(&self) -> f64 {
        self.rate
    }

    fn set_rate(&mut self, rate: f64) {
        self.rate = rate;
    }

    fn volume(&self) -> f64 {
        self.volume
    }

    fn set_volume(&mut self, volume: f64) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    fn muted(&self) -> bool {
        self.muted
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn advance(&mut self, dt: f64) {
        if self.state >= ReadyState::HaveMetadata && !self.paused {
            let max = self.duration().unwrap_or(f64::INFINITY);
            self.time = (self.time + dt * self.rate).clamp(0.0, max);
        }
    }

    fn current_frame(&mut self) -> Option<MediaFrame> {
        if self.asset.kind == AssetKind::Audio {
            return None;
        }
        if self.state < ReadyState::HaveMetadata {
            return None;
        }
        self.decode_current()
    }
}
