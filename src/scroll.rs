//! Scroll-to-transform mapping.
//!
//! The host page owns the scroll position; this module only turns a
//! normalized scroll-progress scalar into rotation targets. Both functions
//! are pure: no hidden state, deterministic, and safe to call at any
//! frequency including once per frame.
//!
//! # Example
//!
//! ```
//! use vitrine::scroll;
//!
//! // Halfway through the section, the specimen has turned a quarter turn.
//! assert_eq!(scroll::yaw(0.5), std::f32::consts::FRAC_PI_4);
//! ```

use std::f32::consts::FRAC_PI_2;

/// Yaw (rotation around the vertical axis) for a given scroll progress.
///
/// Progress is clamped to `[0, 1]` before use, so the result is always in
/// `[0, π/2]` and monotonically non-decreasing in the input. The frame loop
/// overwrites yaw with this value every tick rather than accumulating
/// deltas, which keeps scroll the single source of truth.
pub fn yaw(progress: f32) -> f32 {
    progress.clamp(0.0, 1.0) * FRAC_PI_2
}

/// Outer wrapper tilt, in degrees, for a given scroll progress.
///
/// Consumed by the visibility wrapper's enter/exit transition, not by the
/// 3D scene itself. Progress is clamped to `[0, 1]` before use, the same
/// as [`yaw`], so the tilt never exceeds 20 degrees.
pub fn outer_tilt(progress: f32) -> f32 {
    progress.clamp(0.0, 1.0) * 20.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

    #[test]
    fn yaw_endpoints() {
        assert_eq!(yaw(0.0), 0.0);
        assert_eq!(yaw(1.0), FRAC_PI_2);
        assert_eq!(yaw(0.5), FRAC_PI_4);
    }

    #[test]
    fn yaw_clamps_out_of_range_input() {
        assert_eq!(yaw(-3.0), 0.0);
        assert_eq!(yaw(42.0), FRAC_PI_2);
    }

    #[test]
    fn yaw_is_monotonic_and_bounded() {
        let mut last = 0.0f32;
        for i in 0..=1000 {
            let p = i as f32 / 1000.0;
            let y = yaw(p);
            assert!((0.0..=FRAC_PI_2).contains(&y));
            assert!(y >= last);
            last = y;
        }
    }

    #[test]
    fn yaw_is_idempotent() {
        for i in 0..=100 {
            let p = i as f32 / 100.0;
            assert_eq!(yaw(p), yaw(p));
        }
    }

    #[test]
    fn outer_tilt_is_linear() {
        assert_eq!(outer_tilt(0.0), 0.0);
        assert_eq!(outer_tilt(0.5), 10.0);
        assert_eq!(outer_tilt(1.0), 20.0);
    }

    #[test]
    fn outer_tilt_clamps_out_of_range_input() {
        assert_eq!(outer_tilt(-3.0), 0.0);
        assert_eq!(outer_tilt(5.0), 20.0);
    }
}
