//! Animation scheduler
//!
//! Owns every live animation and advances them on each tick. Animations
//! register implicitly through their RAII wrappers:
//!
//! - [`AnimatedValue`] - spring-backed retargetable value
//! - [`AnimatedKeyframe`] - timed keyframe animation
//!
//! Wrappers hold a [`SchedulerHandle`] (a weak reference), so a dropped
//! scheduler degrades every operation to a no-op instead of panicking, and a
//! dropped wrapper removes its animation, so the scheduler never accumulates
//! orphaned entries.
//!
//! There is deliberately no global scheduler: hosts construct one and pass
//! handles down, the same way the readiness gate is injected.
//!
//! # Driver thread
//!
//! `tick()` can be called from a host's frame loop, or `start_driver()` runs
//! a background ticker that raises a needs-redraw flag while anything is
//! still moving:
//!
//! ```ignore
//! let mut scheduler = AnimationScheduler::new();
//! scheduler.start_driver();
//!
//! // Host event loop:
//! if scheduler.take_needs_redraw() {
//!     window.request_redraw();
//! }
//! ```

use crate::keyframe::KeyframeAnimation;
use crate::spring::{Spring, SpringConfig};
use slotmap::{new_key_type, SlotMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, Weak};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

new_key_type! {
    /// Handle to a registered spring
    pub struct SpringId;
    /// Handle to a registered keyframe animation
    pub struct KeyframeId;
}

struct SchedulerInner {
    springs: SlotMap<SpringId, Spring>,
    keyframes: SlotMap<KeyframeId, KeyframeAnimation>,
    last_tick: Instant,
}

impl SchedulerInner {
    fn advance(&mut self) -> bool {
        let now = Instant::now();
        let dt = (now - self.last_tick).as_secs_f32();
        self.last_tick = now;

        for (_, spring) in self.springs.iter_mut() {
            spring.step(dt);
        }
        for (_, keyframe) in self.keyframes.iter_mut() {
            keyframe.tick(dt * 1000.0);
        }

        // Entries are removed only when their wrapper drops, so finished
        // animations can be restarted (odometer replays on remount).
        self.springs.iter().any(|(_, s)| !s.is_settled())
            || self.keyframes.iter().any(|(_, k)| k.is_playing())
    }
}

/// The scheduler that ticks all registered animations
pub struct AnimationScheduler {
    inner: Arc<Mutex<SchedulerInner>>,
    stop_flag: Arc<AtomicBool>,
    needs_redraw: Arc<AtomicBool>,
    driver: Option<JoinHandle<()>>,
}

impl AnimationScheduler {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(SchedulerInner {
                springs: SlotMap::with_key(),
                keyframes: SlotMap::with_key(),
                last_tick: Instant::now(),
            })),
            stop_flag: Arc::new(AtomicBool::new(false)),
            needs_redraw: Arc::new(AtomicBool::new(false)),
            driver: None,
        }
    }

    /// Weak handle for wrappers and drivers
    pub fn handle(&self) -> SchedulerHandle {
        SchedulerHandle {
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Advance all animations; returns true while any is still active
    pub fn tick(&self) -> bool {
        self.inner.lock().unwrap().advance()
    }

    /// Start the background driver at 120 ticks/second
    ///
    /// Keeps animations moving while the host is between redraws. Idempotent.
    pub fn start_driver(&mut self) {
        if self.driver.is_some() {
            return;
        }
        let inner = Arc::clone(&self.inner);
        let stop_flag = Arc::clone(&self.stop_flag);
        let needs_redraw = Arc::clone(&self.needs_redraw);

        self.driver = Some(thread::spawn(move || {
            let frame = Duration::from_micros(1_000_000 / 120);
            while !stop_flag.load(Ordering::Relaxed) {
                let started = Instant::now();
                let active = inner.lock().unwrap().advance();
                if active {
                    needs_redraw.store(true, Ordering::Release);
                }
                let elapsed = started.elapsed();
                if elapsed < frame {
                    thread::sleep(frame - elapsed);
                }
            }
            tracing::debug!("animation driver stopped");
        }));
    }

    /// Stop the background driver and join it
    pub fn stop_driver(&mut self) {
        self.stop_flag.store(true, Ordering::Relaxed);
        if let Some(handle) = self.driver.take() {
            let _ = handle.join();
        }
        self.stop_flag.store(false, Ordering::Relaxed);
    }

    pub fn is_driver_running(&self) -> bool {
        self.driver.is_some()
    }

    /// Check and clear the needs-redraw flag in one atomic swap
    pub fn take_needs_redraw(&self) -> bool {
        self.needs_redraw.swap(false, Ordering::Acquire)
    }

    pub fn spring_count(&self) -> usize {
        self.inner.lock().unwrap().springs.len()
    }

    pub fn keyframe_count(&self) -> usize {
        self.inner.lock().unwrap().keyframes.len()
    }

    pub fn has_active_animations(&self) -> bool {
        let inner = self.inner.lock().unwrap();
        inner.springs.iter().any(|(_, s)| !s.is_settled())
            || inner.keyframes.iter().any(|(_, k)| k.is_playing())
    }
}

impl Default for AnimationScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for AnimationScheduler {
    fn drop(&mut self) {
        self.stop_driver();
    }
}

/// Weak scheduler reference held by animation wrappers
///
/// Every operation no-ops (or reports "settled"/"not playing") once the
/// scheduler is gone.
#[derive(Clone)]
pub struct SchedulerHandle {
    inner: Weak<Mutex<SchedulerInner>>,
}

impl SchedulerHandle {
    // =========================================================================
    // Springs
    // =========================================================================

    pub fn register_spring(&self, spring: Spring) -> Option<SpringId> {
        self.inner.upgrade().map(|inner| {
            let mut guard = inner.lock().unwrap();
            // Fresh tick baseline so the first step after registration gets
            // a sane dt instead of the gap since the last animation died.
            guard.last_tick = Instant::now();
            guard.springs.insert(spring)
        })
    }

    pub fn set_spring_target(&self, id: SpringId, target: f32) {
        if let Some(inner) = self.inner.upgrade() {
            if let Some(spring) = inner.lock().unwrap().springs.get_mut(id) {
                spring.set_target(target);
            }
        }
    }

    pub fn spring_value(&self, id: SpringId) -> Option<f32> {
        self.inner
            .upgrade()
            .and_then(|inner| inner.lock().unwrap().springs.get(id).map(|s| s.value()))
    }

    /// True if the spring settled or no longer exists
    pub fn spring_settled(&self, id: SpringId) -> bool {
        self.inner
            .upgrade()
            .and_then(|inner| inner.lock().unwrap().springs.get(id).map(|s| s.is_settled()))
            .unwrap_or(true)
    }

    pub fn remove_spring(&self, id: SpringId) {
        if let Some(inner) = self.inner.upgrade() {
            inner.lock().unwrap().springs.remove(id);
        }
    }

    // =========================================================================
    // Keyframes
    // =========================================================================

    pub fn register_keyframe(&self, animation: KeyframeAnimation) -> Option<KeyframeId> {
        self.inner.upgrade().map(|inner| {
            let mut guard = inner.lock().unwrap();
            guard.last_tick = Instant::now();
            guard.keyframes.insert(animation)
        })
    }

    pub fn start_keyframe(&self, id: KeyframeId) {
        self.with_keyframe(id, |k| k.start());
    }

    pub fn stop_keyframe(&self, id: KeyframeId) {
        self.with_keyframe(id, |k| k.stop());
    }

    pub fn keyframe_value(&self, id: KeyframeId) -> Option<f32> {
        self.inner
            .upgrade()
            .and_then(|inner| inner.lock().unwrap().keyframes.get(id).map(|k| k.value()))
    }

    pub fn keyframe_progress(&self, id: KeyframeId) -> Option<f32> {
        self.inner
            .upgrade()
            .and_then(|inner| inner.lock().unwrap().keyframes.get(id).map(|k| k.progress()))
    }

    pub fn keyframe_playing(&self, id: KeyframeId) -> bool {
        self.inner
            .upgrade()
            .and_then(|inner| {
                inner
                    .lock()
                    .unwrap()
                    .keyframes
                    .get(id)
                    .map(|k| k.is_playing())
            })
            .unwrap_or(false)
    }

    pub fn keyframe_finished(&self, id: KeyframeId) -> bool {
        self.inner
            .upgrade()
            .and_then(|inner| {
                inner
                    .lock()
                    .unwrap()
                    .keyframes
                    .get(id)
                    .map(|k| k.is_finished())
            })
            .unwrap_or(false)
    }

    pub fn remove_keyframe(&self, id: KeyframeId) {
        if let Some(inner) = self.inner.upgrade() {
            inner.lock().unwrap().keyframes.remove(id);
        }
    }

    fn with_keyframe(&self, id: KeyframeId, f: impl FnOnce(&mut KeyframeAnimation)) {
        if let Some(inner) = self.inner.upgrade() {
            if let Some(keyframe) = inner.lock().unwrap().keyframes.get_mut(id) {
                f(keyframe);
            }
        }
    }

    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }
}

// =============================================================================
// Animated value (spring-backed)
// =============================================================================

/// A value that animates toward its target with spring physics
///
/// The spring is created lazily on the first real target change and removed
/// when the wrapper drops.
pub struct AnimatedValue {
    handle: SchedulerHandle,
    spring_id: Option<SpringId>,
    config: SpringConfig,
    current: f32,
    target: f32,
}

impl AnimatedValue {
    pub fn new(handle: SchedulerHandle, initial: f32, config: SpringConfig) -> Self {
        Self {
            handle,
            spring_id: None,
            config,
            current: initial,
            target: initial,
        }
    }

    /// Retarget; starts animating if the target actually moved
    pub fn set_target(&mut self, target: f32) {
        self.target = target;
        match self.spring_id {
            Some(id) => self.handle.set_spring_target(id, target),
            None => {
                if (target - self.current).abs() > 0.001 {
                    let spring = Spring::new(self.config, self.current);
                    if let Some(id) = self.handle.register_spring(spring) {
                        self.spring_id = Some(id);
                        self.handle.set_spring_target(id, target);
                    }
                }
            }
        }
    }

    /// Current animated value
    pub fn get(&self) -> f32 {
        match self.spring_id {
            Some(id) => self.handle.spring_value(id).unwrap_or(self.target),
            None => self.current,
        }
    }

    /// Jump to a value, cancelling any animation
    pub fn set_immediate(&mut self, value: f32) {
        if let Some(id) = self.spring_id.take() {
            self.handle.remove_spring(id);
        }
        self.current = value;
        self.target = value;
    }

    pub fn is_animating(&self) -> bool {
        match self.spring_id {
            Some(id) => !self.handle.spring_settled(id),
            None => false,
        }
    }

    pub fn target(&self) -> f32 {
        self.target
    }
}

impl Drop for AnimatedValue {
    fn drop(&mut self) {
        if let Some(id) = self.spring_id {
            self.handle.remove_spring(id);
        }
    }
}

// =============================================================================
// Animated keyframe
// =============================================================================

/// A registered keyframe animation with RAII deregistration
pub struct AnimatedKeyframe {
    handle: SchedulerHandle,
    keyframe_id: Option<KeyframeId>,
    /// Resting value reported if the scheduler is gone
    resting: f32,
}

impl AnimatedKeyframe {
    /// Register the animation; it does not play until `start()`
    pub fn new(handle: SchedulerHandle, animation: KeyframeAnimation) -> Self {
        let resting = animation.sample_at(0.0);
        let keyframe_id = handle.register_keyframe(animation);
        Self {
            handle,
            keyframe_id,
            resting,
        }
    }

    pub fn start(&self) {
        if let Some(id) = self.keyframe_id {
            self.handle.start_keyframe(id);
        }
    }

    pub fn stop(&self) {
        if let Some(id) = self.keyframe_id {
            self.handle.stop_keyframe(id);
        }
    }

    pub fn value(&self) -> f32 {
        self.keyframe_id
            .and_then(|id| self.handle.keyframe_value(id))
            .unwrap_or(self.resting)
    }

    pub fn progress(&self) -> f32 {
        self.keyframe_id
            .and_then(|id| self.handle.keyframe_progress(id))
            .unwrap_or(0.0)
    }

    pub fn is_playing(&self) -> bool {
        self.keyframe_id
            .map(|id| self.handle.keyframe_playing(id))
            .unwrap_or(false)
    }

    pub fn is_finished(&self) -> bool {
        self.keyframe_id
            .map(|id| self.handle.keyframe_finished(id))
            .unwrap_or(false)
    }
}

impl Drop for AnimatedKeyframe {
    fn drop(&mut self) {
        if let Some(id) = self.keyframe_id {
            self.handle.remove_keyframe(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::easing::Easing;

    #[test]
    fn test_tick_moves_springs() {
        let scheduler = AnimationScheduler::new();
        let handle = scheduler.handle();

        let mut value = AnimatedValue::new(handle, 0.0, SpringConfig::track());
        assert!(!value.is_animating());

        value.set_target(100.0);
        assert!(value.is_animating());

        std::thread::sleep(Duration::from_millis(5));
        scheduler.tick();
        assert!(value.get() > 0.0);
    }

    #[test]
    fn test_wrapper_drop_removes_entry() {
        let scheduler = AnimationScheduler::new();
        {
            let mut value = AnimatedValue::new(scheduler.handle(), 0.0, SpringConfig::track());
            value.set_target(50.0);
            assert_eq!(scheduler.spring_count(), 1);
        }
        assert_eq!(scheduler.spring_count(), 0);
    }

    #[test]
    fn test_dead_scheduler_degrades() {
        let handle = {
            let scheduler = AnimationScheduler::new();
            scheduler.handle()
        };
        assert!(!handle.is_alive());

        let mut value = AnimatedValue::new(handle.clone(), 7.0, SpringConfig::track());
        value.set_target(100.0);
        assert_eq!(value.get(), 7.0);
        assert!(!value.is_animating());

        let anim = AnimatedKeyframe::new(
            handle,
            KeyframeAnimation::new(100).from_to(3.0, 9.0, Easing::Linear),
        );
        anim.start();
        assert_eq!(anim.value(), 3.0);
        assert!(!anim.is_playing());
    }

    #[test]
    fn test_keyframe_roundtrip_through_scheduler() {
        let scheduler = AnimationScheduler::new();
        let anim = AnimatedKeyframe::new(
            scheduler.handle(),
            KeyframeAnimation::new(1000).from_to(0.0, -80.0, Easing::Linear),
        );
        assert_eq!(scheduler.keyframe_count(), 1);

        anim.start();
        assert!(anim.is_playing());
        std::thread::sleep(Duration::from_millis(10));
        scheduler.tick();
        assert!(anim.value() < 0.0);
        assert!(!anim.is_finished());
    }

    #[test]
    fn test_set_immediate_cancels() {
        let scheduler = AnimationScheduler::new();
        let mut value = AnimatedValue::new(scheduler.handle(), 0.0, SpringConfig::reveal());
        value.set_target(300.0);
        assert_eq!(scheduler.spring_count(), 1);

        value.set_immediate(300.0);
        assert_eq!(scheduler.spring_count(), 0);
        assert_eq!(value.get(), 300.0);
        assert!(!value.is_animating());
    }
}
