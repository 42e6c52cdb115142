//! Heading reveal
//!
//! Section headings fade in unit by unit (whitespace-split words) the first
//! time they scroll into view. Setup is deferred twice:
//!
//! - until the readiness gate opens: splitting and animating a heading
//!   whose final text (and font) has not arrived would reveal placeholder
//!   glyphs, so [`HeadingReveal::mount`] awaits the gate first;
//! - until the heading is sufficiently visible: the roll is an
//!   animate-once latch, same as the odometer.

use sightline_animation::{AnimatedKeyframe, Easing, KeyframeAnimation, SchedulerHandle};
use sightline_core::LoadGate;
use sightline_viewport::derive::stagger_delays;
use std::sync::{Arc, Mutex};

/// Tunables for the reveal
#[derive(Debug, Clone, Copy)]
pub struct RevealConfig {
    /// Per-unit fade duration (after its stagger delay)
    pub duration_ms: u32,
    /// Stagger between consecutive units, in seconds
    pub stagger_secs: f32,
    /// Visible fraction that triggers the reveal
    pub trigger_visibility: f32,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            duration_ms: 450,
            stagger_secs: 0.06,
            trigger_visibility: 0.2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RevealPhase {
    Armed,
    Played,
}

struct RevealInner {
    units: Vec<String>,
    anims: Vec<AnimatedKeyframe>,
    phase: RevealPhase,
    trigger_visibility: f32,
}

/// Driver for one heading's split reveal
#[derive(Clone)]
pub struct HeadingReveal {
    inner: Arc<Mutex<RevealInner>>,
}

impl HeadingReveal {
    /// Build immediately from already-final text
    pub fn new(handle: SchedulerHandle, text: &str, config: RevealConfig) -> Self {
        let units: Vec<String> = text.split_whitespace().map(str::to_owned).collect();
        let delays = stagger_delays(units.len(), config.stagger_secs);
        let anims = delays
            .iter()
            .map(|&delay| {
                let animation = KeyframeAnimation::new(config.duration_ms)
                    .from_to(0.0, 1.0, Easing::EaseOut)
                    .delay((delay * 1000.0).round() as u32);
                AnimatedKeyframe::new(handle.clone(), animation)
            })
            .collect();

        Self {
            inner: Arc::new(Mutex::new(RevealInner {
                units,
                anims,
                phase: RevealPhase::Armed,
                trigger_visibility: config.trigger_visibility,
            })),
        }
    }

    /// Build once content (and fonts) have arrived
    ///
    /// The one-shot continuation: awaits the gate, then runs the same
    /// synchronous setup as [`HeadingReveal::new`].
    pub async fn mount(
        gate: &LoadGate,
        handle: SchedulerHandle,
        text: &str,
        config: RevealConfig,
    ) -> Self {
        gate.wait_ready().await;
        Self::new(handle, text, config)
    }

    /// Feed a visibility report; the first qualifying one plays the reveal
    pub fn on_visibility(&self, ratio: f32) {
        let mut inner = self.inner.lock().unwrap();
        if inner.phase == RevealPhase::Armed && ratio >= inner.trigger_visibility {
            for anim in &inner.anims {
                anim.start();
            }
            inner.phase = RevealPhase::Played;
        }
    }

    /// Adapter for [`IntersectionObserver::observe`]
    ///
    /// [`IntersectionObserver::observe`]: sightline_viewport::IntersectionObserver::observe
    pub fn visibility_callback(&self) -> impl Fn(f32) + Send + Sync {
        let this = self.clone();
        move |ratio| this.on_visibility(ratio)
    }

    pub fn units(&self) -> Vec<String> {
        self.inner.lock().unwrap().units.clone()
    }

    /// Current opacity of each unit, 0 (hidden) to 1 (revealed)
    pub fn unit_opacities(&self) -> Vec<f32> {
        self.inner
            .lock()
            .unwrap()
            .anims
            .iter()
            .map(|a| a.value())
            .collect()
    }

    pub fn has_played(&self) -> bool {
        self.inner.lock().unwrap().phase == RevealPhase::Played
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sightline_animation::AnimationScheduler;

    #[test]
    fn test_splits_on_whitespace() {
        let scheduler = AnimationScheduler::new();
        let reveal = HeadingReveal::new(
            scheduler.handle(),
            "Shaping  Hospitality Leaders",
            RevealConfig::default(),
        );
        assert_eq!(reveal.units(), vec!["Shaping", "Hospitality", "Leaders"]);
        assert_eq!(reveal.unit_opacities(), vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_plays_once() {
        let scheduler = AnimationScheduler::new();
        let reveal =
            HeadingReveal::new(scheduler.handle(), "Our Placements", RevealConfig::default());

        reveal.on_visibility(0.1);
        assert!(!reveal.has_played());

        reveal.on_visibility(0.25);
        assert!(reveal.has_played());

        // Re-entering the viewport later never replays
        std::thread::sleep(std::time::Duration::from_millis(5));
        scheduler.tick();
        let mid = reveal.unit_opacities();
        reveal.on_visibility(0.0);
        reveal.on_visibility(1.0);
        assert_eq!(reveal.unit_opacities(), mid);
    }

    #[tokio::test]
    async fn test_mount_waits_for_gate() {
        let scheduler = AnimationScheduler::new();
        let gate = LoadGate::new();

        let pending = {
            let gate = gate.clone();
            let handle = scheduler.handle();
            tokio::spawn(async move {
                HeadingReveal::mount(&gate, handle, "Alumni Stories", RevealConfig::default())
                    .await
            })
        };

        tokio::task::yield_now().await;
        assert!(!pending.is_finished());

        gate.set_ready(true);
        let reveal = pending.await.unwrap();
        assert_eq!(reveal.units().len(), 2);
    }
}
