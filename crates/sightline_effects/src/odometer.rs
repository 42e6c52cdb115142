//! Odometer digit counter
//!
//! The statistics counters ("1200+ placements") roll each digit strip from
//! 0 to its final digit, one column after another. Mechanics:
//!
//! - digit `i` of the value rolls to offset `-(digit_i) * digit_height`;
//! - columns start `stagger_secs` apart, left to right;
//! - the roll triggers exactly once per mount, the first time the counter
//!   is at least the configured fraction visible. Later visibility changes
//!   (scrolling away and back) never replay it.

use sightline_animation::{AnimatedKeyframe, Easing, KeyframeAnimation, SchedulerHandle};
use sightline_viewport::derive::{digit_offsets, stagger_delays};
use sightline_viewport::OdometerConfig;
use std::sync::{Arc, Mutex};

/// Animate-once latch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OdometerPhase {
    /// Waiting for the first qualifying visibility report
    Armed,
    /// The roll has been started; never re-triggers
    Played,
}

struct OdometerInner {
    handle: SchedulerHandle,
    config: OdometerConfig,
    value: u64,
    width: usize,
    targets: Vec<f32>,
    digits: Vec<AnimatedKeyframe>,
    phase: OdometerPhase,
}

impl OdometerInner {
    fn rebuild_digits(&mut self) {
        self.targets = digit_offsets(self.value, self.width, self.config.digit_height_px);
        let delays = stagger_delays(self.targets.len(), self.config.stagger_secs);
        self.digits = self
            .targets
            .iter()
            .zip(&delays)
            .map(|(&offset, &delay)| {
                let animation = KeyframeAnimation::new(self.config.duration_ms)
                    .from_to(0.0, offset, Easing::EaseOutCubic)
                    .delay((delay * 1000.0).round() as u32);
                AnimatedKeyframe::new(self.handle.clone(), animation)
            })
            .collect();
    }

    fn play(&mut self) {
        for digit in &self.digits {
            digit.start();
        }
        self.phase = OdometerPhase::Played;
    }
}

/// Driver for one odometer counter
#[derive(Clone)]
pub struct Odometer {
    inner: Arc<Mutex<OdometerInner>>,
}

impl Odometer {
    /// `width` pads with leading zeros: value 42 at width 3 renders `042`
    pub fn new(handle: SchedulerHandle, value: u64, width: usize, config: OdometerConfig) -> Self {
        let mut inner = OdometerInner {
            handle,
            config,
            value,
            width,
            targets: Vec::new(),
            digits: Vec::new(),
            phase: OdometerPhase::Armed,
        };
        inner.rebuild_digits();
        Self {
            inner: Arc::new(Mutex::new(inner)),
        }
    }

    /// Feed a visibility report; the first qualifying one starts the roll
    pub fn on_visibility(&self, ratio: f32) {
        let mut inner = self.inner.lock().unwrap();
        if inner.phase == OdometerPhase::Armed && ratio >= inner.config.visibility {
            tracing::debug!(value = inner.value, "odometer roll started");
            inner.play();
        }
    }

    /// Adapter for [`IntersectionObserver::observe`]
    ///
    /// [`IntersectionObserver::observe`]: sightline_viewport::IntersectionObserver::observe
    pub fn visibility_callback(&self) -> impl Fn(f32) + Send + Sync {
        let this = self.clone();
        move |ratio| this.on_visibility(ratio)
    }

    /// Replace the value (stats refreshed after load)
    ///
    /// A write of the same value is a no-op; re-renders with an unchanged
    /// final value must not restart the roll. A genuinely new value rebuilds
    /// the columns and, if the counter already played, rolls immediately.
    pub fn set_value(&self, value: u64) {
        let mut inner = self.inner.lock().unwrap();
        if inner.value == value {
            return;
        }
        inner.value = value;
        inner.rebuild_digits();
        if inner.phase == OdometerPhase::Played {
            inner.play();
        }
    }

    /// Final per-digit offsets (most significant first)
    pub fn targets(&self) -> Vec<f32> {
        self.inner.lock().unwrap().targets.clone()
    }

    /// Stagger delays per digit, in seconds
    pub fn delays(&self) -> Vec<f32> {
        let inner = self.inner.lock().unwrap();
        stagger_delays(inner.targets.len(), inner.config.stagger_secs)
    }

    /// Current animated offsets (the rendered position of each strip)
    pub fn offsets(&self) -> Vec<f32> {
        self.inner
            .lock()
            .unwrap()
            .digits
            .iter()
            .map(|d| d.value())
            .collect()
    }

    pub fn has_played(&self) -> bool {
        self.inner.lock().unwrap().phase == OdometerPhase::Played
    }

    /// Any column still rolling (including stagger waits)
    pub fn is_rolling(&self) -> bool {
        self.inner.lock().unwrap().digits.iter().any(|d| d.is_playing())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sightline_animation::AnimationScheduler;

    fn config() -> OdometerConfig {
        OdometerConfig::default()
    }

    #[test]
    fn test_targets_and_delays_for_042() {
        let scheduler = AnimationScheduler::new();
        let odo = Odometer::new(scheduler.handle(), 42, 3, config());

        let h = config().digit_height_px;
        assert_eq!(odo.targets(), vec![0.0, -4.0 * h, -2.0 * h]);

        let delays = odo.delays();
        assert!((delays[0] - 0.0).abs() < 1e-6);
        assert!((delays[1] - 0.15).abs() < 1e-6);
        assert!((delays[2] - 0.30).abs() < 1e-6);
    }

    #[test]
    fn test_triggers_once_at_sixty_percent() {
        let scheduler = AnimationScheduler::new();
        let odo = Odometer::new(scheduler.handle(), 42, 3, config());

        odo.on_visibility(0.3);
        assert!(!odo.has_played());

        odo.on_visibility(0.6);
        assert!(odo.has_played());
        assert!(odo.is_rolling());

        // Scroll away and back: progress is untouched
        scheduler.tick();
        let mid = odo.offsets();
        odo.on_visibility(0.0);
        odo.on_visibility(0.95);
        assert_eq!(odo.offsets(), mid);
    }

    #[test]
    fn test_resting_offsets_before_trigger() {
        let scheduler = AnimationScheduler::new();
        let odo = Odometer::new(scheduler.handle(), 907, 3, config());
        assert_eq!(odo.offsets(), vec![0.0, 0.0, 0.0]);
        assert!(!odo.is_rolling());
    }

    #[test]
    fn test_same_value_does_not_restart() {
        let scheduler = AnimationScheduler::new();
        let odo = Odometer::new(scheduler.handle(), 1200, 4, config());
        odo.on_visibility(1.0);

        // Simulated re-render delivering the same data
        odo.set_value(1200);
        assert!(odo.has_played());

        std::thread::sleep(std::time::Duration::from_millis(5));
        scheduler.tick();
        let rolled = odo.offsets();
        odo.set_value(1200);
        assert_eq!(odo.offsets(), rolled);
    }

    #[test]
    fn test_new_value_rolls_after_play() {
        let scheduler = AnimationScheduler::new();
        let odo = Odometer::new(scheduler.handle(), 99, 2, config());
        odo.on_visibility(1.0);

        odo.set_value(63);
        let h = config().digit_height_px;
        assert_eq!(odo.targets(), vec![-6.0 * h, -3.0 * h]);
        assert!(odo.is_rolling());
    }
}
