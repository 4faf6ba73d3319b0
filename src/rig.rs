//! The static presentation rig: lights, camera framing, environment.
//!
//! None of this is algorithmically interesting; it is the contract surface
//! the render pass consumes. The defaults reproduce the showcase's warm
//! three-light studio setup: a soft ambient fill, a strong amber key light
//! from above-right, and a faint white rim light from behind-left.

use crate::camera::Camera;
use glam::Vec3;

/// An RGBA color with float components.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

    /// Warm amber of the key light (#ffc947).
    pub const AMBER: Color = Color::rgb(1.0, 0.788, 0.278);
}

/// Uniform fill light with no direction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AmbientLight {
    pub intensity: f32,
}

/// Key light shining from a position toward the origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DirectionalLight {
    /// Light position; the direction is toward the origin.
    pub position: Vec3,
    pub intensity: f32,
    pub color: Color,
}

/// Point light with distance falloff.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    pub intensity: f32,
    pub color: Color,
}

/// Named environment backdrop preset.
///
/// A contract surface only: the renderer keeps the background transparent
/// and uses the preset (and its blur) for nothing beyond tinting the
/// ambient term, but hosts select it as part of the rig.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EnvironmentPreset {
    #[default]
    Forest,
    Studio,
    Night,
}

/// The full static rig consumed by the render pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PresentationRig {
    pub ambient: AmbientLight,
    pub key: DirectionalLight,
    pub rim: PointLight,
    pub camera: Camera,
    pub environment: EnvironmentPreset,
    /// Environment blur amount in `[0, 1]`.
    pub environment_blur: f32,
}

impl Default for PresentationRig {
    fn default() -> Self {
        Self {
            ambient: AmbientLight { intensity: 0.4 },
            key: DirectionalLight {
                position: Vec3::new(10.0, 10.0, 5.0),
                intensity: 1.5,
                color: Color::AMBER,
            },
            rim: PointLight {
                position: Vec3::new(-10.0, -10.0, -10.0),
                intensity: 0.3,
                color: Color::WHITE,
            },
            camera: Camera::new(),
            environment: EnvironmentPreset::Forest,
            environment_blur: 0.8,
        }
    }
}

impl PresentationRig {
    pub fn new() -> Self {
        Self::default()
    }
}
