//! Easing curves
//!
//! Normalized-time easing functions: input and output both span [0, 1].
//! Inputs outside the range are clamped, so callers can feed raw progress
//! without pre-clamping.

/// An easing function applied to normalized animation progress
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Easing {
    #[default]
    Linear,
    /// Quadratic ease-in (slow start)
    EaseIn,
    /// Quadratic ease-out (slow finish)
    EaseOut,
    /// Quadratic ease-in-out
    EaseInOut,
    /// Cubic ease-out; the default for digit-roll animations, which want a
    /// fast launch and a soft landing on the final digit
    EaseOutCubic,
    /// Hermite smoothstep, C1-continuous at both ends
    Smoothstep,
}

impl Easing {
    /// Apply the curve to progress `t`, clamping input to [0, 1]
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t,
            Easing::EaseOut => t * (2.0 - t),
            Easing::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
            Easing::EaseOutCubic => {
                let u = 1.0 - t;
                1.0 - u * u * u
            }
            Easing::Smoothstep => t * t * (3.0 - 2.0 * t),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CURVES: [Easing; 6] = [
        Easing::Linear,
        Easing::EaseIn,
        Easing::EaseOut,
        Easing::EaseInOut,
        Easing::EaseOutCubic,
        Easing::Smoothstep,
    ];

    #[test]
    fn test_endpoints_fixed() {
        for curve in CURVES {
            assert!((curve.apply(0.0)).abs() < 1e-6, "{curve:?} at 0");
            assert!((curve.apply(1.0) - 1.0).abs() < 1e-6, "{curve:?} at 1");
        }
    }

    #[test]
    fn test_out_of_range_clamped() {
        for curve in CURVES {
            assert_eq!(curve.apply(-2.0), curve.apply(0.0));
            assert_eq!(curve.apply(3.0), curve.apply(1.0));
        }
    }

    #[test]
    fn test_monotonic() {
        for curve in CURVES {
            let mut prev = 0.0;
            for i in 1..=100 {
                let v = curve.apply(i as f32 / 100.0);
                assert!(v >= prev - 1e-6, "{curve:?} not monotonic at step {i}");
                prev = v;
            }
        }
    }

    #[test]
    fn test_ease_out_cubic_front_loaded() {
        // More than half the distance should be covered by t=0.3
        assert!(Easing::EaseOutCubic.apply(0.3) > 0.5);
    }
}
