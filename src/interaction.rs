//! Pointer-driven orbital interaction with bounded angles and spring
//! snap-back.
//!
//! [`DragOrbit`] is the only stateful, time-integrated part of the showcase
//! core. It turns pointer drags into an azimuth/polar orbit around the
//! specimen, hard-clamps both angles to fixed ranges on every update, and
//! relaxes back to the neutral rest orientation with a critically damped
//! spring once the pointer is released.
//!
//! The controller is deliberately independent of any rendering or windowing
//! type so it can be unit-tested tick by tick.
//!
//! # Example
//!
//! ```
//! use vitrine::{DragOrbit, OrbitPhase};
//! use glam::Vec2;
//!
//! let mut orbit = DragOrbit::new();
//! orbit.pointer_down();
//! orbit.pointer_move(Vec2::new(120.0, 0.0), 1.0 / 60.0);
//! orbit.pointer_up();
//! assert_eq!(orbit.phase(), OrbitPhase::Relaxing);
//!
//! // Keep ticking and it settles back to rest.
//! for _ in 0..600 {
//!     orbit.tick(1.0 / 60.0);
//! }
//! assert_eq!(orbit.phase(), OrbitPhase::Idle);
//! assert_eq!(orbit.angles(), (0.0, 0.0));
//! ```

use std::f32::consts::{FRAC_PI_2, FRAC_PI_3, PI};

use glam::Vec2;

/// Lower azimuth bound in radians.
pub const AZIMUTH_MIN: f32 = -PI / 1.4;
/// Upper azimuth bound in radians.
pub const AZIMUTH_MAX: f32 = FRAC_PI_2;
/// Polar bound magnitude in radians (range is symmetric).
pub const POLAR_LIMIT: f32 = FRAC_PI_3;

/// Angles (and velocities) closer to rest than this count as settled.
const REST_EPSILON: f32 = 1e-3;

/// Distance-to-rest (max-norm, radians) below which the snap profile takes
/// over from the active profile.
const SNAP_DISTANCE: f32 = 0.25;
/// Angular speed (rad/s) below which the snap profile takes over.
const SNAP_SPEED: f32 = 1.5;

/// Largest integration step; longer ticks are subdivided.
const MAX_STEP: f32 = 1.0 / 120.0;

/// A damped spring characterization.
///
/// Only mass and tension are specified; friction is derived for critical
/// damping (`2·sqrt(mass·tension)`), which returns to rest as fast as
/// possible without oscillating.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringProfile {
    pub mass: f32,
    pub tension: f32,
}

impl SpringProfile {
    /// Profile used while the relaxation is in visible motion.
    pub const ACTIVE: Self = Self {
        mass: 2.0,
        tension: 400.0,
    };

    /// Profile used near rest, cutting off the asymptotic tail.
    pub const SNAP: Self = Self {
        mass: 4.0,
        tension: 400.0,
    };

    /// Critical damping coefficient for this profile.
    pub fn friction(&self) -> f32 {
        2.0 * (self.mass * self.tension).sqrt()
    }
}

/// Phase of the interaction state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OrbitPhase {
    /// At rest, waiting for a pointer.
    Idle,
    /// Pointer held; drag deltas accumulate into the angles.
    Dragging,
    /// Pointer released; spring relaxation toward rest is in flight.
    Relaxing,
}

/// Bounded orbital drag controller with spring snap-back.
#[derive(Clone, Debug)]
pub struct DragOrbit {
    azimuth: f32,
    polar: f32,
    /// Angular velocity in rad/s, x = azimuth, y = polar.
    velocity: Vec2,
    phase: OrbitPhase,
    /// Radians of rotation per pixel of pointer travel.
    sensitivity: f32,
}

impl Default for DragOrbit {
    fn default() -> Self {
        Self {
            azimuth: 0.0,
            polar: 0.0,
            velocity: Vec2::ZERO,
            phase: OrbitPhase::Idle,
            sensitivity: 0.005,
        }
    }
}

impl DragOrbit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the drag sensitivity (radians per pixel).
    pub fn sensitivity(mut self, sensitivity: f32) -> Self {
        self.sensitivity = sensitivity;
        self
    }

    /// Current `(azimuth, polar)` in radians. Always within bounds.
    pub fn angles(&self) -> (f32, f32) {
        (self.azimuth, self.polar)
    }

    /// Current phase of the state machine.
    pub fn phase(&self) -> OrbitPhase {
        self.phase
    }

    /// Begin a drag. Interrupts a relaxation in flight, carrying over the
    /// current angles as the new starting point.
    pub fn pointer_down(&mut self) {
        self.phase = OrbitPhase::Dragging;
        self.velocity = Vec2::ZERO;
    }

    /// Feed a pointer movement delta (pixels) while dragging.
    ///
    /// Deltas outside a drag are ignored. Movement past a bound stops
    /// advancing that axis; the clamped axis also contributes no residual
    /// velocity, so releasing at a bound does not fling the orbit.
    pub fn pointer_move(&mut self, delta: Vec2, dt: f32) {
        if self.phase != OrbitPhase::Dragging {
            return;
        }

        let requested_azimuth = self.azimuth + delta.x * self.sensitivity;
        let requested_polar = self.polar + delta.y * self.sensitivity;

        let azimuth = requested_azimuth.clamp(AZIMUTH_MIN, AZIMUTH_MAX);
        let polar = requested_polar.clamp(-POLAR_LIMIT, POLAR_LIMIT);

        if dt > 0.0 {
            // Velocity reflects the clamped movement, not the request.
            self.velocity = Vec2::new(azimuth - self.azimuth, polar - self.polar) / dt;
        }

        self.azimuth = azimuth;
        self.polar = polar;
    }

    /// Release the pointer. Residual velocity is retained and the spring
    /// relaxation toward `(0, 0)` begins.
    pub fn pointer_up(&mut self) {
        if self.phase == OrbitPhase::Dragging {
            self.phase = OrbitPhase::Relaxing;
        }
    }

    /// Advance the relaxation by `dt` seconds.
    ///
    /// No-op unless the controller is `Relaxing`. Long ticks are subdivided
    /// to keep the integration stable regardless of frame pacing.
    pub fn tick(&mut self, dt: f32) {
        if self.phase != OrbitPhase::Relaxing || dt <= 0.0 {
            return;
        }

        let mut remaining = dt;
        while remaining > 0.0 {
            let step = remaining.min(MAX_STEP);
            remaining -= step;
            self.integrate(step);

            if self.at_rest() {
                self.azimuth = 0.0;
                self.polar = 0.0;
                self.velocity = Vec2::ZERO;
                self.phase = OrbitPhase::Idle;
                return;
            }
        }
    }

    /// Which spring profile applies right now.
    ///
    /// The active profile runs through the visible swing; the snap profile
    /// takes over close to rest to kill the asymptotic tail.
    pub fn profile(&self) -> SpringProfile {
        let distance = self.azimuth.abs().max(self.polar.abs());
        if distance < SNAP_DISTANCE && self.velocity.length() < SNAP_SPEED {
            SpringProfile::SNAP
        } else {
            SpringProfile::ACTIVE
        }
    }

    fn integrate(&mut self, dt: f32) {
        let profile = self.profile();
        let friction = profile.friction();

        // Semi-implicit Euler on each axis independently.
        let accel_azimuth = (-profile.tension * self.azimuth - friction * self.velocity.x)
            / profile.mass;
        let accel_polar =
            (-profile.tension * self.polar - friction * self.velocity.y) / profile.mass;

        self.velocity.x += accel_azimuth * dt;
        self.velocity.y += accel_polar * dt;

        self.azimuth = (self.azimuth + self.velocity.x * dt).clamp(AZIMUTH_MIN, AZIMUTH_MAX);
        self.polar = (self.polar + self.velocity.y * dt).clamp(-POLAR_LIMIT, POLAR_LIMIT);
    }

    fn at_rest(&self) -> bool {
        self.azimuth.abs() <= REST_EPSILON
            && self.polar.abs() <= REST_EPSILON
            && self.velocity.x.abs() <= REST_EPSILON
            && self.velocity.y.abs() <= REST_EPSILON
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn assert_in_bounds(orbit: &DragOrbit) {
        let (azimuth, polar) = orbit.angles();
        assert!(
            (AZIMUTH_MIN..=AZIMUTH_MAX).contains(&azimuth),
            "azimuth {azimuth} out of bounds"
        );
        assert!(
            (-POLAR_LIMIT..=POLAR_LIMIT).contains(&polar),
            "polar {polar} out of bounds"
        );
    }

    #[test]
    fn starts_idle_at_rest() {
        let orbit = DragOrbit::new();
        assert_eq!(orbit.phase(), OrbitPhase::Idle);
        assert_eq!(orbit.angles(), (0.0, 0.0));
    }

    #[test]
    fn drag_accumulates_scaled_deltas() {
        let mut orbit = DragOrbit::new();
        orbit.pointer_down();
        orbit.pointer_move(Vec2::new(100.0, -40.0), DT);
        let (azimuth, polar) = orbit.angles();
        assert!((azimuth - 0.5).abs() < 1e-6);
        assert!((polar - -0.2).abs() < 1e-6);
    }

    #[test]
    fn moves_outside_a_drag_are_ignored() {
        let mut orbit = DragOrbit::new();
        orbit.pointer_move(Vec2::new(500.0, 500.0), DT);
        assert_eq!(orbit.angles(), (0.0, 0.0));
        assert_eq!(orbit.phase(), OrbitPhase::Idle);
    }

    #[test]
    fn bounds_hold_for_arbitrary_drag_sequences() {
        let mut orbit = DragOrbit::new();
        orbit.pointer_down();
        // Deterministic pseudo-random walk with wild magnitudes.
        let mut seed = 0x2545f491u32;
        for i in 0..500 {
            seed = seed.wrapping_mul(1664525).wrapping_add(1013904223);
            let x = ((seed >> 16) as f32 / 655.36) - 50.0;
            let y = ((seed & 0xffff) as f32 / 655.36) - 50.0;
            orbit.pointer_move(Vec2::new(x * 100.0, y * 100.0), DT);
            assert_in_bounds(&orbit);
            if i % 97 == 0 {
                orbit.pointer_up();
                orbit.tick(DT);
                assert_in_bounds(&orbit);
                orbit.pointer_down();
            }
        }
    }

    #[test]
    fn azimuth_request_past_pi_clamps_to_upper_bound() {
        let mut orbit = DragOrbit::new();
        orbit.pointer_down();
        // A single huge drag requesting well past pi.
        orbit.pointer_move(Vec2::new(PI / 0.005 * 2.0, 0.0), DT);
        let (azimuth, _) = orbit.angles();
        assert_eq!(azimuth, AZIMUTH_MAX);
    }

    #[test]
    fn release_relaxes_back_to_rest_within_bounded_ticks() {
        let starts = [
            (AZIMUTH_MAX, POLAR_LIMIT),
            (AZIMUTH_MIN, -POLAR_LIMIT),
            (0.3, -0.1),
            (-1.5, 0.9),
        ];
        for (azimuth, polar) in starts {
            let mut orbit = DragOrbit::new();
            orbit.pointer_down();
            orbit.pointer_move(
                Vec2::new(azimuth / 0.005, polar / 0.005),
                DT,
            );
            orbit.pointer_up();

            let mut ticks = 0;
            while orbit.phase() == OrbitPhase::Relaxing {
                orbit.tick(DT);
                assert_in_bounds(&orbit);
                ticks += 1;
                assert!(ticks < 600, "did not settle from ({azimuth}, {polar})");
            }
            assert_eq!(orbit.phase(), OrbitPhase::Idle);
            assert_eq!(orbit.angles(), (0.0, 0.0));
        }
    }

    #[test]
    fn new_drag_interrupts_relaxation_without_teleporting() {
        let mut orbit = DragOrbit::new();
        orbit.pointer_down();
        orbit.pointer_move(Vec2::new(200.0, 0.0), DT);
        orbit.pointer_up();
        for _ in 0..5 {
            orbit.tick(DT);
        }
        let (before, _) = orbit.angles();
        assert!(before.abs() > REST_EPSILON);

        orbit.pointer_down();
        assert_eq!(orbit.phase(), OrbitPhase::Dragging);
        let (after, _) = orbit.angles();
        assert_eq!(before, after);
    }

    #[test]
    fn residual_velocity_carries_into_relaxation() {
        let mut orbit = DragOrbit::new();
        orbit.pointer_down();
        // Fast outward flick, released mid-swing.
        orbit.pointer_move(Vec2::new(40.0, 0.0), DT);
        let (at_release, _) = orbit.angles();
        orbit.pointer_up();
        orbit.tick(DT / 4.0);
        let (after_one_tick, _) = orbit.angles();
        // Outward velocity keeps it moving away from rest for a moment.
        assert!(after_one_tick > at_release);
    }

    #[test]
    fn snap_profile_engages_near_rest() {
        let mut orbit = DragOrbit::new();
        orbit.pointer_down();
        orbit.pointer_move(Vec2::new(300.0, 0.0), DT);
        orbit.pointer_up();
        assert_eq!(orbit.profile(), SpringProfile::ACTIVE);

        while orbit.phase() == OrbitPhase::Relaxing {
            orbit.tick(DT);
            let (azimuth, polar) = orbit.angles();
            if azimuth.abs().max(polar.abs()) < SNAP_DISTANCE && orbit.velocity.length() < SNAP_SPEED
            {
                assert_eq!(orbit.profile(), SpringProfile::SNAP);
            }
        }
    }

    #[test]
    fn critical_damping_coefficients() {
        assert!((SpringProfile::ACTIVE.friction() - 2.0 * (800.0f32).sqrt()).abs() < 1e-4);
        assert!((SpringProfile::SNAP.friction() - 80.0).abs() < 1e-4);
    }
}
