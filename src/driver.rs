//! Per-frame transform composition for the specimen.
//!
//! [`SpecimenDriver`] is the render loop's brain: once per tick it combines
//! the scroll-driven yaw, the idle breathing drift, and the interaction
//! controller's orbit into the specimen's final [`Transform`].
//!
//! Yaw is overwritten from scroll progress every frame, never accumulated,
//! so repeated ticks at the same scroll position cannot drift. The orbit
//! is applied as a separate rotation component around the scroll yaw; the
//! two never collapse into a single angle.

use crate::interaction::DragOrbit;
use crate::mesh::Transform;
use crate::scroll;
use glam::{Quat, Vec3};

/// Idle drift amplitude in world units.
const DRIFT_AMPLITUDE: f32 = 0.2;
/// Idle drift rate in radians per second (period ≈ 4π s).
const DRIFT_RATE: f32 = 0.5;

/// Composes scroll, drift, and interaction state into the frame transform.
#[derive(Clone, Debug)]
pub struct SpecimenDriver {
    base: Transform,
}

impl Default for SpecimenDriver {
    fn default() -> Self {
        // The showcase framing: normalized specimens are enlarged and
        // seated slightly below the camera axis.
        Self {
            base: Transform::new()
                .position(Vec3::new(0.0, -1.0, 0.0))
                .uniform_scale(1.5),
        }
    }
}

impl SpecimenDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the base framing transform.
    pub fn with_base(mut self, base: Transform) -> Self {
        self.base = base;
        self
    }

    /// The decorative vertical drift at elapsed time `time`.
    ///
    /// Bounded to ±[`DRIFT_AMPLITUDE`] and independent of scroll.
    pub fn drift(time: f32) -> f32 {
        (time * DRIFT_RATE).sin() * DRIFT_AMPLITUDE
    }

    /// Compute the specimen transform for one frame.
    ///
    /// `time` is total elapsed wall-clock seconds; `scroll_progress` is the
    /// host's normalized scroll scalar (clamped internally by the mapper).
    pub fn compose(&self, time: f32, scroll_progress: f32, orbit: &DragOrbit) -> Transform {
        let yaw = Quat::from_rotation_y(scroll::yaw(scroll_progress));

        let (azimuth, polar) = orbit.angles();
        let orbit_rotation = Quat::from_rotation_y(azimuth) * Quat::from_rotation_x(polar);

        Transform {
            position: self.base.position + Vec3::Y * Self::drift(time),
            // Orbit wraps around the scroll yaw; composed, not merged.
            rotation: orbit_rotation * yaw * self.base.rotation,
            scale: self.base.scale,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{LoadState, ModelCache};
    use crate::model::RawModel;
    use crate::scheduler::{FrameScheduler, FrameTick};
    use glam::Vec2;
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};
    use std::sync::mpsc;
    use std::sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    };
    use std::time::{Duration, Instant};

    fn yaw_of(transform: &Transform) -> f32 {
        // With no orbit and no base rotation, the quaternion is a pure Y
        // rotation; recover the angle.
        2.0 * transform.rotation.w.acos().copysign(transform.rotation.y)
    }

    #[test]
    fn yaw_tracks_scroll_endpoints() {
        let driver = SpecimenDriver::new();
        let orbit = DragOrbit::new();

        let start = driver.compose(0.0, 0.0, &orbit);
        assert!(yaw_of(&start).abs() < 1e-5);

        let end = driver.compose(0.0, 1.0, &orbit);
        assert!((yaw_of(&end) - FRAC_PI_2).abs() < 1e-5);

        let mid = driver.compose(0.0, 0.5, &orbit);
        assert!((yaw_of(&mid) - FRAC_PI_4).abs() < 1e-5);
    }

    #[test]
    fn repeated_composition_does_not_accumulate_yaw() {
        let driver = SpecimenDriver::new();
        let orbit = DragOrbit::new();
        let first = driver.compose(1.0, 0.3, &orbit);
        for _ in 0..100 {
            let again = driver.compose(1.0, 0.3, &orbit);
            assert_eq!(first, again);
        }
    }

    #[test]
    fn drift_is_bounded_and_scroll_independent() {
        for i in 0..1000 {
            let t = i as f32 * 0.037;
            let d = SpecimenDriver::drift(t);
            assert!(d.abs() <= DRIFT_AMPLITUDE + 1e-6);
        }
        let driver = SpecimenDriver::new();
        let orbit = DragOrbit::new();
        let a = driver.compose(2.0, 0.0, &orbit);
        let b = driver.compose(2.0, 1.0, &orbit);
        assert_eq!(a.position, b.position);
    }

    #[test]
    fn drift_oscillates_around_base_height() {
        let driver = SpecimenDriver::new();
        let orbit = DragOrbit::new();
        // Peak of sin at t = pi / (2 * rate).
        let peak = driver.compose(std::f32::consts::PI, 0.0, &orbit);
        assert!((peak.position.y - (-1.0 + DRIFT_AMPLITUDE)).abs() < 1e-5);
    }

    #[test]
    fn orbit_composes_with_scroll_yaw_without_replacing_it() {
        let driver = SpecimenDriver::new();
        let mut orbit = DragOrbit::new();
        orbit.pointer_down();
        orbit.pointer_move(Vec2::new(0.0, 60.0), 1.0 / 60.0);

        let with_orbit = driver.compose(0.0, 1.0, &orbit);
        let without = driver.compose(0.0, 1.0, &DragOrbit::new());

        // Polar drag tilts the result away from the pure yaw orientation,
        // but removing the orbit recovers the scroll-only rotation exactly.
        assert_ne!(with_orbit.rotation, without.rotation);
        assert!((yaw_of(&without) - FRAC_PI_2).abs() < 1e-5);
    }

    // Teardown race: cancelling the frame callback while the model is
    // still loading means no transform update fires after teardown, even
    // once the load resolves.
    #[test]
    fn torn_down_driver_never_updates_after_late_load() {
        let (release, gate) = mpsc::channel::<()>();
        let gate = Mutex::new(gate);
        let cache = ModelCache::with_loader(move |_| {
            let _ = gate.lock().unwrap().recv();
            Ok(RawModel::placeholder())
        });

        let updates = Arc::new(AtomicUsize::new(0));
        let mut scheduler = FrameScheduler::new();

        let driver = SpecimenDriver::new();
        let orbit = DragOrbit::new();
        let cache_for_frame = cache.clone();
        let updates_for_frame = Arc::clone(&updates);
        let handle = scheduler.register(move |tick: FrameTick| {
            // Not ready: the tick is a no-op for the 3D subtree.
            if cache_for_frame.state("specimen") == LoadState::Ready {
                let _ = driver.compose(tick.time, 0.5, &orbit);
                updates_for_frame.fetch_add(1, Ordering::SeqCst);
            }
        });

        cache.request("specimen");
        scheduler.run(FrameTick { time: 0.0, dt: 0.016 });
        assert_eq!(updates.load(Ordering::SeqCst), 0);

        // Teardown while the load is still in flight.
        scheduler.cancel(handle);
        release.send(()).unwrap();

        let deadline = Instant::now() + Duration::from_secs(5);
        while cache.state("specimen") != LoadState::Ready {
            assert!(Instant::now() < deadline);
            std::thread::sleep(Duration::from_millis(1));
        }

        for i in 0..10 {
            scheduler.run(FrameTick {
                time: i as f32 * 0.016,
                dt: 0.016,
            });
        }
        assert_eq!(updates.load(Ordering::SeqCst), 0);
    }
}
