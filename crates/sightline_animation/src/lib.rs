//! Sightline Animation System
//!
//! Springs, easing curves, delayed keyframe animations, and the scheduler
//! that drives them.
//!
//! # Features
//!
//! - **Spring Physics**: RK4-integrated springs that inherit velocity when
//!   retargeted mid-flight
//! - **Keyframe Animations**: timed tracks with easing and built-in start
//!   delay (the unit of staggered effects)
//! - **Scheduler**: central registry ticked by the host or by an optional
//!   background driver thread; RAII wrappers deregister on drop
//!
//! Schedulers are injected explicitly; there is no process-global instance.

pub mod easing;
pub mod keyframe;
pub mod scheduler;
pub mod spring;

pub use easing::Easing;
pub use keyframe::{Keyframe, KeyframeAnimation};
pub use scheduler::{
    AnimatedKeyframe, AnimatedValue, AnimationScheduler, KeyframeId, SchedulerHandle, SpringId,
};
pub use spring::{Spring, SpringConfig};
