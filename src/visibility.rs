//! Mount lifecycle and visibility-driven enter/exit transition.
//!
//! Two orthogonal pieces of state gate the showcase:
//!
//! - [`MountState`] runs `Unmounted → Mounting → Active` exactly once.
//!   `Mounting` lasts a single tick so the 3D surface is never rendered on
//!   the initial attach frame (avoids a flash of unsized content), and
//!   `Active` is terminal.
//! - [`VisibilityFade`] animates the outer wrapper between fully visible
//!   and dimmed in response to the host's visibility flag. Dimming is
//!   purely visual; it never unmounts or tears anything down.

use crate::scroll;

/// Easing functions for smooth transitions.
///
/// These control the acceleration curve of transition animations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Easing {
    /// Constant speed throughout.
    Linear,
    /// Start slow, accelerate.
    EaseIn,
    /// Start fast, decelerate.
    #[default]
    EaseOut,
    /// Start slow, speed up, then slow down.
    EaseInOut,
}

impl Easing {
    /// Apply the easing function to a linear progress value (0.0 to 1.0).
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t,
            Easing::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
        }
    }
}

/// One-way mount lifecycle for the presentation subtree.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MountState {
    /// Before the first tick completes. Nothing is rendered.
    #[default]
    Unmounted,
    /// Single transient tick between attach and the first rendered frame.
    Mounting,
    /// Fully mounted. Terminal; visibility changes never revert this.
    Active,
}

impl MountState {
    /// Advance the lifecycle by one tick. `Active` is absorbing.
    pub fn tick(&mut self) {
        *self = match self {
            MountState::Unmounted => MountState::Mounting,
            MountState::Mounting | MountState::Active => MountState::Active,
        };
    }

    /// Whether the 3D surface should be rendered at all.
    pub fn is_active(&self) -> bool {
        matches!(self, MountState::Active)
    }
}

/// Snapshot of the outer wrapper's animated style for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WrapperTransition {
    /// Wrapper opacity in `[0, 1]`.
    pub opacity: f32,
    /// Uniform wrapper scale.
    pub scale: f32,
    /// Wrapper tilt in degrees, driven by scroll progress.
    pub outer_rotation: f32,
}

/// Opacity/scale targets when the section is visible.
const VISIBLE: (f32, f32) = (1.0, 1.0);
/// Targets when the section scrolls out of view: dimmed, never hidden.
const DIMMED: (f32, f32) = (0.7, 0.9);
/// Starting style for the very first enter animation.
const ENTER_FROM: (f32, f32) = (0.0, 0.8);
/// Fixed transition duration in seconds.
const DURATION: f32 = 0.8;

/// Eased interpolation of the wrapper's opacity and scale.
///
/// The fade is a pure function of the visibility flag and elapsed
/// transition time; it carries no reference to the 3D transform state.
#[derive(Clone, Debug)]
pub struct VisibilityFade {
    visible: bool,
    from: (f32, f32),
    to: (f32, f32),
    elapsed: f32,
    easing: Easing,
}

impl Default for VisibilityFade {
    fn default() -> Self {
        Self {
            visible: true,
            from: ENTER_FROM,
            to: VISIBLE,
            elapsed: 0.0,
            easing: Easing::EaseOut,
        }
    }
}

impl VisibilityFade {
    /// A fade about to play its first enter animation (opacity 0 → 1).
    pub fn new() -> Self {
        Self::default()
    }

    /// React to the host's visibility flag.
    ///
    /// A change retargets the animation from the current interpolated
    /// values, so mid-flight toggles stay continuous. Calls with an
    /// unchanged flag are no-ops.
    pub fn set_visible(&mut self, visible: bool) {
        if visible == self.visible {
            return;
        }
        self.from = (self.opacity(), self.scale());
        self.to = if visible { VISIBLE } else { DIMMED };
        self.elapsed = 0.0;
        self.visible = visible;
    }

    /// Advance the transition clock.
    pub fn update(&mut self, dt: f32) {
        if dt > 0.0 {
            self.elapsed = (self.elapsed + dt).min(DURATION);
        }
    }

    /// Current wrapper opacity.
    pub fn opacity(&self) -> f32 {
        let t = self.easing.apply(self.elapsed / DURATION);
        self.from.0 + (self.to.0 - self.from.0) * t
    }

    /// Current wrapper scale.
    pub fn scale(&self) -> f32 {
        let t = self.easing.apply(self.elapsed / DURATION);
        self.from.1 + (self.to.1 - self.from.1) * t
    }

    /// Whether the transition has reached its target.
    pub fn settled(&self) -> bool {
        self.elapsed >= DURATION
    }

    /// Full wrapper style for this frame, including the scroll-driven tilt.
    pub fn sample(&self, scroll_progress: f32) -> WrapperTransition {
        WrapperTransition {
            opacity: self.opacity(),
            scale: self.scale(),
            outer_rotation: scroll::outer_tilt(scroll_progress),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn easing_endpoints() {
        for easing in [
            Easing::Linear,
            Easing::EaseIn,
            Easing::EaseOut,
            Easing::EaseInOut,
        ] {
            assert_eq!(easing.apply(0.0), 0.0);
            assert_eq!(easing.apply(1.0), 1.0);
            assert_eq!(easing.apply(-2.0), 0.0);
            assert_eq!(easing.apply(5.0), 1.0);
        }
    }

    #[test]
    fn ease_out_decelerates() {
        // More than half the distance covered by the halfway point.
        assert!(Easing::EaseOut.apply(0.5) > 0.5);
    }

    #[test]
    fn mount_reaches_active_and_stays() {
        let mut mount = MountState::default();
        assert_eq!(mount, MountState::Unmounted);
        assert!(!mount.is_active());

        mount.tick();
        assert_eq!(mount, MountState::Mounting);
        assert!(!mount.is_active());

        mount.tick();
        assert_eq!(mount, MountState::Active);
        for _ in 0..10 {
            mount.tick();
            assert!(mount.is_active());
        }
    }

    #[test]
    fn first_enter_animates_from_zero_opacity() {
        let mut fade = VisibilityFade::new();
        assert_eq!(fade.opacity(), 0.0);
        assert_eq!(fade.scale(), 0.8);

        fade.update(DURATION);
        assert_eq!(fade.opacity(), 1.0);
        assert_eq!(fade.scale(), 1.0);
        assert!(fade.settled());
    }

    #[test]
    fn hiding_dims_to_partial_opacity_over_fixed_duration() {
        let mut fade = VisibilityFade::new();
        fade.update(DURATION);

        fade.set_visible(false);
        assert_eq!(fade.opacity(), 1.0);

        // Mid-flight: strictly between the endpoints.
        fade.update(DURATION / 2.0);
        let mid = fade.opacity();
        assert!(mid < 1.0 && mid > 0.7, "mid opacity {mid}");

        fade.update(DURATION / 2.0);
        assert!((fade.opacity() - 0.7).abs() < 1e-6);
        assert!((fade.scale() - 0.9).abs() < 1e-6);
    }

    #[test]
    fn dimmed_is_never_fully_hidden() {
        let mut fade = VisibilityFade::new();
        fade.update(DURATION);
        fade.set_visible(false);
        for _ in 0..120 {
            fade.update(1.0 / 60.0);
            assert!(fade.opacity() >= 0.7);
        }
    }

    #[test]
    fn mid_flight_toggle_is_continuous() {
        let mut fade = VisibilityFade::new();
        fade.update(DURATION);
        fade.set_visible(false);
        fade.update(0.2);
        let at_toggle = fade.opacity();

        fade.set_visible(true);
        assert_eq!(fade.opacity(), at_toggle);
        fade.update(DURATION);
        assert_eq!(fade.opacity(), 1.0);
    }

    #[test]
    fn redundant_visibility_writes_do_not_restart() {
        let mut fade = VisibilityFade::new();
        fade.update(0.4);
        let before = fade.opacity();
        fade.set_visible(true);
        assert_eq!(fade.opacity(), before);
    }

    #[test]
    fn sample_carries_scroll_tilt() {
        let fade = VisibilityFade::new();
        let style = fade.sample(0.5);
        assert_eq!(style.outer_rotation, 10.0);
    }

    #[test]
    fn sample_clamps_overshooting_scroll_progress() {
        let fade = VisibilityFade::new();
        assert_eq!(fade.sample(5.0).outer_rotation, 20.0);
        assert_eq!(fade.sample(-1.0).outer_rotation, 0.0);
    }
}
