//! # Vitrine
//!
//! **A scroll-driven 3D specimen showcase for marketing pages.**
//!
//! Vitrine renders a single hero model that rotates with the host page's
//! scroll position, breathes with a gentle idle drift, lets visitors drag
//! it around inside fixed angular bounds, and springs back to its framed
//! pose when released. Visibility changes dim it; they never tear it down.
//!
//! ## Quick Start
//!
//! ```no_run
//! use vitrine::*;
//!
//! fn main() {
//!     run(|ctx| {
//!         ctx.model("assets/specimen.stl");
//!
//!         move |frame| {
//!             // Drive scroll progress from the wheel.
//!             let scroll = frame.scroll() - frame.input.scroll_delta().y * 0.05;
//!             frame.set_scroll(scroll.clamp(0.0, 1.0));
//!         }
//!     });
//! }
//! ```
//!
//! ## Anatomy
//!
//! - **Scroll mapping** — [`scroll::yaw`] turns normalized scroll into a
//!   quarter-turn of specimen yaw, recomputed absolutely every frame.
//! - **Interaction** — [`DragOrbit`] bounds pointer drags and relaxes back
//!   to rest with a critically damped spring.
//! - **Lifecycle** — [`ModelCache`] decodes models off-thread and is only
//!   ever polled, so a torn-down showcase can never be written to by a
//!   late load. [`MountState`] and [`VisibilityFade`] gate what is drawn.
//! - **Presentation** — [`PresentationRig`] fixes the camera and the warm
//!   three-light setup; [`SpecimenDriver`] composes the per-frame
//!   transform.
//!
//! Every piece is a plain value type usable without a window; `run` wires
//! them to winit and wgpu for hosts that want the whole loop.

mod app;
mod assets;
mod camera;
mod driver;
mod gpu;
mod input;
mod interaction;
mod mesh;
mod model;
mod rig;
mod scheduler;
pub mod scroll;
mod specimen_pass;
mod visibility;

pub use app::{Frame, SetupContext, ShowcaseConfig, run, run_with_config};
pub use assets::{LoadState, ModelCache};
pub use camera::Camera;
pub use driver::SpecimenDriver;
pub use gpu::GpuContext;
pub use input::Input;
pub use interaction::{
    AZIMUTH_MAX, AZIMUTH_MIN, DragOrbit, OrbitPhase, POLAR_LIMIT, SpringProfile,
};
pub use mesh::{Mesh, Transform, Vertex3d};
pub use model::{ModelError, RawModel};
pub use rig::{
    AmbientLight, Color, DirectionalLight, EnvironmentPreset, PointLight, PresentationRig,
};
pub use scheduler::{FrameHandle, FrameScheduler, FrameTick};
pub use specimen_pass::SpecimenPass;
pub use visibility::{Easing, MountState, VisibilityFade, WrapperTransition};

// Re-export glam math types for convenience
pub use glam::{Mat4, Quat, Vec2, Vec3, Vec4};

// Re-export commonly used winit types for convenience
pub use winit::event::MouseButton;
pub use winit::keyboard::KeyCode;
