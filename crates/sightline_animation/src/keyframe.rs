//! Timed keyframe animations
//!
//! A [`KeyframeAnimation`] interpolates a scalar through keyframes placed on
//! normalized time [0, 1] over a fixed duration, with an optional start
//! delay. The delay is part of the animation itself (not the caller's
//! bookkeeping) because staggered effects like odometer digits and heading
//! units are expressed as one animation per unit, each with its own delay.

use crate::easing::Easing;

/// A single keyframe: a value at a normalized time position
#[derive(Debug, Clone, Copy)]
pub struct Keyframe {
    /// Position in normalized time, 0.0 to 1.0
    pub time: f32,
    pub value: f32,
    /// Easing applied on the segment ending at this keyframe
    pub easing: Easing,
}

impl Keyframe {
    pub fn new(time: f32, value: f32, easing: Easing) -> Self {
        Self {
            time,
            value,
            easing,
        }
    }
}

/// Playback status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Playback {
    Stopped,
    Delaying,
    Playing,
    Finished,
}

/// A delayed, eased scalar animation over sorted keyframes
#[derive(Debug, Clone)]
pub struct KeyframeAnimation {
    duration_ms: f32,
    delay_ms: f32,
    keyframes: Vec<Keyframe>,
    /// Time since start(), including the delay period
    elapsed_ms: f32,
    playback: Playback,
}

impl KeyframeAnimation {
    pub fn new(duration_ms: u32) -> Self {
        Self {
            duration_ms: duration_ms.max(1) as f32,
            delay_ms: 0.0,
            keyframes: Vec::new(),
            elapsed_ms: 0.0,
            playback: Playback::Stopped,
        }
    }

    /// Add a keyframe (builder); keyframes are kept sorted by time
    pub fn keyframe(mut self, time: f32, value: f32, easing: Easing) -> Self {
        self.keyframes.push(Keyframe::new(time, value, easing));
        self.keyframes
            .sort_by(|a, b| a.time.partial_cmp(&b.time).unwrap_or(std::cmp::Ordering::Equal));
        self
    }

    /// Straight run from one value to another
    pub fn from_to(self, start: f32, end: f32, easing: Easing) -> Self {
        self.keyframe(0.0, start, Easing::Linear).keyframe(1.0, end, easing)
    }

    /// Delay before playback begins, in milliseconds (builder)
    pub fn delay(mut self, delay_ms: u32) -> Self {
        self.delay_ms = delay_ms as f32;
        self
    }

    pub fn delay_ms(&self) -> f32 {
        self.delay_ms
    }

    /// Begin playback from the start (including any delay)
    pub fn start(&mut self) {
        self.elapsed_ms = 0.0;
        self.playback = if self.delay_ms > 0.0 {
            Playback::Delaying
        } else {
            Playback::Playing
        };
    }

    pub fn stop(&mut self) {
        self.playback = Playback::Stopped;
    }

    /// Playing or waiting out its delay
    pub fn is_playing(&self) -> bool {
        matches!(self.playback, Playback::Delaying | Playback::Playing)
    }

    /// Ran to completion (distinct from never started / stopped)
    pub fn is_finished(&self) -> bool {
        self.playback == Playback::Finished
    }

    /// Normalized progress through the post-delay duration
    pub fn progress(&self) -> f32 {
        match self.playback {
            Playback::Stopped => 0.0,
            Playback::Delaying => 0.0,
            Playback::Finished => 1.0,
            Playback::Playing => {
                ((self.elapsed_ms - self.delay_ms) / self.duration_ms).clamp(0.0, 1.0)
            }
        }
    }

    /// Advance by `dt_ms` milliseconds
    pub fn tick(&mut self, dt_ms: f32) {
        if !self.is_playing() {
            return;
        }
        self.elapsed_ms += dt_ms;

        if self.playback == Playback::Delaying && self.elapsed_ms >= self.delay_ms {
            self.playback = Playback::Playing;
        }
        if self.playback == Playback::Playing
            && self.elapsed_ms - self.delay_ms >= self.duration_ms
        {
            self.playback = Playback::Finished;
        }
    }

    /// Current interpolated value
    ///
    /// Before playback (and during the delay) this is the first keyframe's
    /// value, so consumers can render the resting pose without special cases.
    pub fn value(&self) -> f32 {
        self.sample_at(self.progress())
    }

    /// Sample the track at an arbitrary normalized progress
    pub fn sample_at(&self, progress: f32) -> f32 {
        let Some(first) = self.keyframes.first() else {
            return 0.0;
        };
        let progress = progress.clamp(0.0, 1.0);

        let mut prev = first;
        let mut next = first;
        for kf in &self.keyframes {
            if kf.time <= progress {
                prev = kf;
            }
            if kf.time >= progress {
                next = kf;
                break;
            }
            next = kf;
        }

        let span = next.time - prev.time;
        if span.abs() < f32::EPSILON {
            return next.value;
        }
        let local = (progress - prev.time) / span;
        let eased = next.easing.apply(local);
        prev.value + (next.value - prev.value) * eased
    }
}
