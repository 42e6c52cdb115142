//! Footer reveal
//!
//! The site footer sits parked below its slot and slides up as the reader
//! approaches the end of the page. Unlike the progress ring, this one is
//! spring-smoothed: the target flips between "parked" and "revealed" at a
//! progress threshold, and the spring carries the offset there, inheriting
//! velocity if the reader reverses mid-slide.

use sightline_animation::{AnimatedValue, SchedulerHandle, SpringConfig};
use sightline_viewport::derive::page_progress;
use sightline_viewport::ScrollMetrics;
use std::sync::{Arc, Mutex};

/// Page progress at which the footer starts revealing
pub const FOOTER_REVEAL_PROGRESS: f32 = 0.85;

/// Driver for the sliding footer
#[derive(Clone)]
pub struct FooterReveal {
    /// Parked offset: the footer's height, i.e. fully below its slot
    parked_offset: f32,
    reveal_progress: f32,
    offset_y: Arc<Mutex<AnimatedValue>>,
}

impl FooterReveal {
    pub fn new(handle: SchedulerHandle, footer_height: f32) -> Self {
        Self::with_trigger(handle, footer_height, FOOTER_REVEAL_PROGRESS)
    }

    pub fn with_trigger(handle: SchedulerHandle, footer_height: f32, reveal_progress: f32) -> Self {
        Self {
            parked_offset: footer_height,
            reveal_progress,
            offset_y: Arc::new(Mutex::new(AnimatedValue::new(
                handle,
                footer_height,
                SpringConfig::reveal(),
            ))),
        }
    }

    /// Retarget from a fresh sample
    pub fn on_metrics(&self, metrics: &ScrollMetrics) {
        let revealed = page_progress(metrics) >= self.reveal_progress;
        let target = if revealed { 0.0 } else { self.parked_offset };
        self.offset_y.lock().unwrap().set_target(target);
    }

    /// Current vertical offset: `parked_offset` when hidden, 0 when revealed
    pub fn offset_y(&self) -> f32 {
        self.offset_y.lock().unwrap().get()
    }

    /// Whether the slide is still in flight
    pub fn is_sliding(&self) -> bool {
        self.offset_y.lock().unwrap().is_animating()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sightline_animation::AnimationScheduler;

    fn metrics(top: f32) -> ScrollMetrics {
        ScrollMetrics::new(top, 1280.0, 720.0, 2000.0)
    }

    #[test]
    fn test_parked_before_trigger() {
        let scheduler = AnimationScheduler::new();
        let footer = FooterReveal::new(scheduler.handle(), 240.0);

        footer.on_metrics(&metrics(1000.0)); // Progress 0.5
        assert_eq!(footer.offset_y(), 240.0);
        assert!(!footer.is_sliding());
    }

    #[test]
    fn test_slides_in_past_trigger() {
        let scheduler = AnimationScheduler::new();
        let footer = FooterReveal::new(scheduler.handle(), 240.0);

        footer.on_metrics(&metrics(1800.0)); // Progress 0.9
        assert!(footer.is_sliding());

        // Run the spring to rest
        for _ in 0..5000 {
            std::thread::sleep(std::time::Duration::from_millis(1));
            scheduler.tick();
            if !footer.is_sliding() {
                break;
            }
        }
        assert!((footer.offset_y()).abs() < 1.0);
    }

    #[test]
    fn test_reversal_retargets_mid_flight() {
        let scheduler = AnimationScheduler::new();
        let footer = FooterReveal::new(scheduler.handle(), 240.0);

        footer.on_metrics(&metrics(1800.0));
        std::thread::sleep(std::time::Duration::from_millis(10));
        scheduler.tick();
        let mid = footer.offset_y();
        assert!(mid < 240.0);

        // Reader scrolls back up: footer parks again from wherever it was
        footer.on_metrics(&metrics(800.0));
        assert!(footer.is_sliding());
        for _ in 0..5000 {
            std::thread::sleep(std::time::Duration::from_millis(1));
            scheduler.tick();
            if !footer.is_sliding() {
                break;
            }
        }
        assert!((footer.offset_y() - 240.0).abs() < 1.0);
    }
}
