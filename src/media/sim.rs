//! Deterministic in-memory media elements for tests.
//!
//! A [`SimMedia`] behaves like a decoded clip with configurable dimensions,
//! duration and load latency, renders solid-color frames, and counts every
//! control write so tests can assert the engine issues no redundant ones.
//! Clones share state, so a test can keep a handle to an element it handed
//! to the cache.

use crate::media::element::{MediaElement, MediaFrame, ReadyState};
use std::sync::{Arc, Mutex};

/// Counters for every control write an engine issued to a [`SimMedia`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SimWrites {
    /// Calls to `seek`.
    pub seeks: u32,
    /// Calls to `play`.
    pub plays: u32,
    /// Calls to `pause`.
    pub pauses: u32,
    /// Calls to `set_rate`.
    pub rate_writes: u32,
    /// Calls to `set_volume`.
    pub volume_writes: u32,
    /// Calls to `set_muted`.
    pub mute_writes: u32,
}

#[derive(Debug)]
struct Inner {
    width: u32,
    height: u32,
    duration: Option<f64>,
    color: [u8; 4],
    load_latency_ticks: u32,
    ticks_loading: u32,
    state: ReadyState,
    time: f64,
    paused: bool,
    rate: f64,
    volume: f64,
    muted: bool,
    writes: SimWrites,
}

/// Scripted media element.
#[derive(Clone, Debug)]
pub struct SimMedia {
    inner: Arc<Mutex<Inner>>,
}

impl SimMedia {
    /// A bounded source with the given dimensions and duration.
    pub fn new(width: u32, height: u32, duration: f64) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                width,
                height,
                duration: Some(duration),
                color: [255, 255, 255, 255],
                load_latency_ticks: 0,
                ticks_loading: 0,
                state: ReadyState::Unloaded,
                time: 0.0,
                paused: true,
                rate: 1.0,
                volume: 1.0,
                muted: false,
                writes: SimWrites::default(),
            })),
        }
    }

    /// A still source with no intrinsic duration.
    pub fn still(width: u32, height: u32) -> Self {
        let m = Self::new(width, height, 0.0);
        m.lock().duration = None;
        m
    }

    /// Delay metadata until this many `advance` calls after `load`.
    pub fn with_load_latency(self, ticks: u32) -> Self {
        self.lock().load_latency_ticks = ticks;
        self
    }

    /// Color of produced frames, straight rgba.
    pub fn with_color(self, rgba: [u8; 4]) -> Self {
        self.lock().color = rgba;
        self
    }

    /// Snapshot the write counters.
    pub fn writes(&self) -> SimWrites {
        self.lock().writes
    }

    /// Take and reset the write counters.
    pub fn take_writes(&self) -> SimWrites {
        std::mem::take(&mut self.lock().writes)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        match self.inner.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl MediaElement for SimMedia {
    fn load(&mut self) {
        let mut s = self.lock();
        if s.state == ReadyState::Unloaded {
            s.state = if s.load_latency_ticks == 0 {
                ReadyState::HaveCurrentData
            } else {
                ReadyState::Loading
            };
            s.ticks_loading = 0;
        }
    }

    fn unload(&mut self) {
        let mut s = self.lock();
        s.state = ReadyState::Unloaded;
        s.time = 0.0;
        s.paused = true;
    }

    fn ready_state(&self) -> ReadyState {
        self.lock().state
    }

    fn natural_size(&self) -> Option<(f64, f64)> {
        let s = self.lock();
        (s.state >= ReadyState::HaveMetadata).then_some((s.width as f64, s.height as f64))
    }

    fn duration(&self) -> Option<f64> {
        self.lock().duration
    }

    fn current_time(&self) -> f64 {
        self.lock().time
    }

    fn seek(&mut self, time: f64) {
        let mut s = self.lock();
        s.writes.seeks += 1;
        let max = s.duration.unwrap_or(f64::INFINITY);
        s.time = time.clamp(0.0, max);
    }

    fn play(&mut self) {
        let mut s = self.lock();
        s.writes.plays += 1;
        s.paused = false;
    }

    fn pause(&mut self) {
        let mut s = self.lock();
        s.writes.pauses += 1;
        s.paused = true;
    }

    fn is_paused(&self) -> bool {
        self.lock().paused
    }

    fn rate(&self) -> f64 {
        self.lock().rate
    }

    fn set_rate(&mut self, rate: f64) {
        let mut s = self.lock();
        s.writes.rate_writes += 1;
        s.rate = rate;
    }

    fn volume(&self) -> f64 {
        self.lock().volume
    }

    fn set_volume(&mut self, volume: f64) {
        let mut s = self.lock();
        s.writes.volume_writes += 1;
        s.volume = volume.clamp(0.0, 1.0);
    }

    fn muted(&self) -> bool {
        self.lock().muted
    }

    fn set_muted(&mut self, muted: bool) {
        let mut s = self.lock();
        s.writes.mute_writes += 1;
        s.muted = muted;
    }

    fn advance(&mut self, dt: f64) {
        let mut s = self.lock();
        if s.state == ReadyState::Loading {
            s.ticks_loading += 1;
            if s.ticks_loading >= s.load_latency_ticks {
                s.state = ReadyState::HaveCurrentData;
            }
            return;
        }
        if s.state == ReadyState::HaveCurrentData && !s.paused {
            let max = s.duration.unwrap_or(f64::INFINITY);
            s.time = (s.time + dt * s.rate).clamp(0.0, max);
        }
    }

    fn current_frame(&mut self) -> Option<MediaFrame> {
        let s = self.lock();
        if s.state < ReadyState::HaveCurrentData {
            return None;
        }
        let [r, g, b, a] = s.color;
        let af = a as f32 / 255.0;
        let px = [
            (r as f32 * af).round() as u8,
            (g as f32 * af).round() as u8,
            (b as f32 * af).round() as u8,
            a,
        ];
        let mut data = Vec::with_capacity((s.width * s.height * 4) as usize);
        for _ in 0..s.width * s.height {
            data.extend_from_slice(&px);
        }
        Some(MediaFrame { width: s.width, height: s.height, rgba8_premul: Arc::new(data) })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/media/sim.rs"]
mod tests;
