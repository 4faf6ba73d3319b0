//! The showcase application shell.
//!
//! Wires the window, GPU surface, input, model cache, and the animation
//! state machines into a single frame loop. Hosts provide a setup closure
//! that configures the showcase and returns a per-frame closure; the frame
//! closure feeds in the host-side signals (scroll progress and section
//! visibility) and can inspect input and load state.
//!
//! The animation state advances only through a [`FrameScheduler`] callback
//! registered at startup and cancelled on teardown, so closing the window
//! stops all further ticks before the loop exits.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Instant;
use winit::application::ApplicationHandler;
use winit::event::{MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::KeyCode;
use winit::window::{Window, WindowAttributes, WindowId};

use crate::assets::{LoadState, ModelCache};
use crate::driver::SpecimenDriver;
use crate::gpu::GpuContext;
use crate::input::Input;
use crate::interaction::DragOrbit;
use crate::mesh::Mesh;
use crate::model::RawModel;
use crate::rig::{Color, PresentationRig};
use crate::scheduler::{FrameHandle, FrameScheduler, FrameTick};
use crate::specimen_pass::SpecimenPass;
use crate::visibility::{MountState, VisibilityFade};
use glam::Quat;

type ActivateFn = Box<dyn FnMut()>;

/// The per-frame animation state, advanced only by the scheduler tick.
struct AnimState {
    orbit: DragOrbit,
    mount: MountState,
    fade: VisibilityFade,
    scroll_progress: f32,
    visible: bool,
}

impl AnimState {
    fn new() -> Self {
        Self {
            orbit: DragOrbit::new(),
            mount: MountState::default(),
            fade: VisibilityFade::new(),
            scroll_progress: 0.0,
            visible: true,
        }
    }
}

/// Register the showcase tick with the scheduler. Cancelling the returned
/// handle freezes the animation state for good.
fn register_anim_tick(
    scheduler: &mut FrameScheduler,
    anim: &Rc<RefCell<AnimState>>,
) -> FrameHandle {
    let anim = Rc::clone(anim);
    scheduler.register(move |tick: FrameTick| {
        let state = &mut *anim.borrow_mut();
        state.orbit.tick(tick.dt);
        state.mount.tick();
        state.fade.set_visible(state.visible);
        state.fade.update(tick.dt);
    })
}

/// Context provided during showcase setup.
pub struct SetupContext<'a> {
    pub gpu: &'a GpuContext,
    pub cache: &'a ModelCache,
    model_key: &'a mut Option<String>,
    rig: &'a mut PresentationRig,
    driver: &'a mut SpecimenDriver,
    on_activate: &'a mut Option<ActivateFn>,
}

impl SetupContext<'_> {
    /// Request the specimen model by path and start decoding it in the
    /// background. Until the decode finishes (or if it fails) the showcase
    /// renders the built-in placeholder sphere instead.
    pub fn model(&mut self, path: impl Into<String>) -> &mut Self {
        let path = path.into();
        self.cache.request(&path);
        *self.model_key = Some(path);
        self
    }

    /// Replace the default presentation rig.
    pub fn rig(&mut self, rig: PresentationRig) -> &mut Self {
        *self.rig = rig;
        self
    }

    /// Replace the default specimen driver (base framing transform).
    pub fn driver(&mut self, driver: SpecimenDriver) -> &mut Self {
        *self.driver = driver;
        self
    }

    /// Register the activation callback, fired once per Enter or Space
    /// press. The showcase only signals the intent; what activation means
    /// belongs to the host.
    pub fn on_activate(&mut self, callback: impl FnMut() + 'static) -> &mut Self {
        *self.on_activate = Some(Box::new(callback));
        self
    }
}

/// Context provided to the host closure each frame.
pub struct Frame<'a> {
    /// GPU context, for size queries and advanced use.
    pub gpu: &'a GpuContext,
    /// Input state for this frame.
    pub input: &'a Input,
    /// Read-only view of the orbit controller.
    pub orbit: &'a DragOrbit,
    /// Load state of the requested specimen model.
    pub load_state: LoadState,
    /// Total elapsed time in seconds.
    pub time: f32,
    /// Delta time since last frame in seconds.
    pub dt: f32,
    scroll_progress: &'a mut f32,
    visible: &'a mut bool,
}

impl Frame<'_> {
    /// Current frames per second.
    pub fn fps(&self) -> f32 {
        if self.dt > 0.0 { 1.0 / self.dt } else { 0.0 }
    }

    /// Surface width in pixels.
    pub fn width(&self) -> u32 {
        self.gpu.width()
    }

    /// Surface height in pixels.
    pub fn height(&self) -> u32 {
        self.gpu.height()
    }

    /// Feed the host's normalized scroll position.
    ///
    /// Values outside `[0, 1]` are accepted; the mapping clamps.
    pub fn set_scroll(&mut self, progress: f32) {
        *self.scroll_progress = progress;
    }

    /// The scroll position as last set.
    pub fn scroll(&self) -> f32 {
        *self.scroll_progress
    }

    /// Feed the host's section visibility flag. Hiding dims the showcase;
    /// it never unmounts it.
    pub fn set_visible(&mut self, visible: bool) {
        *self.visible = visible;
    }

    /// The visibility flag as last set.
    pub fn is_visible(&self) -> bool {
        *self.visible
    }
}

/// Configuration for the showcase window.
pub struct ShowcaseConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for ShowcaseConfig {
    fn default() -> Self {
        Self {
            title: "Vitrine".to_string(),
            width: 800,
            height: 600,
        }
    }
}

impl ShowcaseConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }
}

/// Run a showcase with setup and frame closures.
///
/// # Example
/// ```ignore
/// vitrine::run(|ctx| {
///     ctx.model("assets/specimen.stl");
///
///     move |frame| {
///         let scroll = frame.scroll() + frame.input.scroll_delta().y * -0.05;
///         frame.set_scroll(scroll.clamp(0.0, 1.0));
///     }
/// });
/// ```
pub fn run<S, F>(setup: S)
where
    S: FnOnce(&mut SetupContext) -> F + 'static,
    F: FnMut(&mut Frame) + 'static,
{
    run_with_config(ShowcaseConfig::default(), setup);
}

/// Run a showcase with custom window configuration.
pub fn run_with_config<S, F>(config: ShowcaseConfig, setup: S)
where
    S: FnOnce(&mut SetupContext) -> F + 'static,
    F: FnMut(&mut Frame) + 'static,
{
    let event_loop = EventLoop::new().unwrap();
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = ShowcaseApp::Pending {
        config,
        setup: Some(Box::new(move |gpu, cache| {
            let mut model_key = None;
            let mut rig = PresentationRig::new();
            let mut driver = SpecimenDriver::new();
            let mut on_activate = None;

            let mut ctx = SetupContext {
                gpu,
                cache,
                model_key: &mut model_key,
                rig: &mut rig,
                driver: &mut driver,
                on_activate: &mut on_activate,
            };

            let frame_fn = setup(&mut ctx);

            (
                Box::new(frame_fn) as Box<dyn FnMut(&mut Frame)>,
                model_key,
                rig,
                driver,
                on_activate,
            )
        })),
    };

    event_loop.run_app(&mut app).unwrap();
}

type SetupFn = Box<
    dyn FnOnce(
        &GpuContext,
        &ModelCache,
    ) -> (
        Box<dyn FnMut(&mut Frame)>,
        Option<String>,
        PresentationRig,
        SpecimenDriver,
        Option<ActivateFn>,
    ),
>;

enum ShowcaseApp {
    Pending {
        config: ShowcaseConfig,
        setup: Option<SetupFn>,
    },
    Running {
        window: Arc<Window>,
        gpu: GpuContext,
        cache: ModelCache,
        input: Input,
        frame_fn: Box<dyn FnMut(&mut Frame)>,
        model_key: Option<String>,
        on_activate: Option<ActivateFn>,
        pass: SpecimenPass,
        driver: SpecimenDriver,
        anim: Rc<RefCell<AnimState>>,
        scheduler: FrameScheduler,
        anim_handle: FrameHandle,
        /// Uploaded once when the cache reports the model ready.
        mesh: Option<Mesh>,
        placeholder: Mesh,
        start_time: Instant,
        last_frame: Instant,
    },
}

impl ApplicationHandler for ShowcaseApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if let ShowcaseApp::Pending { config, setup } = self {
            let window_attrs = WindowAttributes::default()
                .with_title(&config.title)
                .with_inner_size(winit::dpi::LogicalSize::new(config.width, config.height))
                .with_transparent(true);

            let window = Arc::new(event_loop.create_window(window_attrs).unwrap());
            let gpu = GpuContext::new(window.clone());
            let cache = ModelCache::new();

            let setup_fn = setup.take().unwrap();
            let (frame_fn, model_key, rig, driver, on_activate) = setup_fn(&gpu, &cache);

            let pass = SpecimenPass::new(&gpu, rig);
            let placeholder = RawModel::placeholder().upload(&gpu);

            let anim = Rc::new(RefCell::new(AnimState::new()));
            let mut scheduler = FrameScheduler::new();
            let anim_handle = register_anim_tick(&mut scheduler, &anim);

            *self = ShowcaseApp::Running {
                window,
                gpu,
                cache,
                input: Input::new(),
                frame_fn,
                model_key,
                on_activate,
                pass,
                driver,
                anim,
                scheduler,
                anim_handle,
                mesh: None,
                placeholder,
                start_time: Instant::now(),
                last_frame: Instant::now(),
            };
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let ShowcaseApp::Running {
            window,
            gpu,
            cache,
            input,
            frame_fn,
            model_key,
            on_activate,
            pass,
            driver,
            anim,
            scheduler,
            anim_handle,
            mesh,
            placeholder,
            start_time,
            last_frame,
        } = self
        else {
            return;
        };

        input.handle_event(&event);

        match event {
            WindowEvent::CloseRequested => {
                // Teardown: no further ticks reach the animation state.
                scheduler.cancel(*anim_handle);
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                gpu.resize(size.width, size.height);
            }
            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let time = start_time.elapsed().as_secs_f32();
                let dt = now.duration_since(*last_frame).as_secs_f32();
                *last_frame = now;

                // Poll the cache; upload the mesh once when the decode lands.
                let load_state = match model_key.as_deref() {
                    Some(key) => {
                        let state = cache.state(key);
                        if state == LoadState::Ready
                            && mesh.is_none()
                            && let Some(model) = cache.get(key)
                        {
                            log::info!("specimen '{}' ready, uploading", key);
                            *mesh = Some(model.upload(gpu));
                        }
                        state
                    }
                    None => LoadState::Unrequested,
                };

                {
                    let state = &mut *anim.borrow_mut();

                    let mut frame = Frame {
                        gpu,
                        input,
                        orbit: &state.orbit,
                        load_state,
                        time,
                        dt,
                        scroll_progress: &mut state.scroll_progress,
                        visible: &mut state.visible,
                    };
                    frame_fn(&mut frame);

                    // Pointer drags feed the orbit before the tick runs.
                    if input.mouse_pressed(MouseButton::Left) {
                        state.orbit.pointer_down();
                    }
                    if input.mouse_down(MouseButton::Left) {
                        state.orbit.pointer_move(input.mouse_delta(), dt);
                    }
                    if input.mouse_released(MouseButton::Left) {
                        state.orbit.pointer_up();
                    }
                }

                if (input.key_pressed(KeyCode::Enter) || input.key_pressed(KeyCode::Space))
                    && let Some(activate) = on_activate
                {
                    activate();
                }

                scheduler.run(FrameTick { time, dt });

                let output = match gpu.surface.get_current_texture() {
                    Ok(output) => output,
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        gpu.resize(gpu.width(), gpu.height());
                        window.request_redraw();
                        return;
                    }
                    Err(e) => {
                        log::warn!("dropped frame: {e}");
                        window.request_redraw();
                        return;
                    }
                };
                let view = output
                    .texture
                    .create_view(&wgpu::TextureViewDescriptor::default());

                let state = anim.borrow();
                if state.mount.is_active() {
                    let style = state.fade.sample(state.scroll_progress);
                    let mut transform = driver.compose(time, state.scroll_progress, &state.orbit);
                    // The wrapper's style applies outside the specimen's own
                    // transform stack.
                    transform.scale *= style.scale;
                    transform.rotation =
                        Quat::from_rotation_y(style.outer_rotation.to_radians())
                            * transform.rotation;

                    let tint = Color::rgba(1.0, 1.0, 1.0, style.opacity);
                    let drawn = mesh.as_ref().unwrap_or(placeholder);
                    pass.render(gpu, &view, time, drawn, transform, tint);
                } else {
                    pass.clear(gpu, &view);
                }

                output.present();
                input.begin_frame();
                window.request_redraw();
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anim_tick_advances_fade_and_mount() {
        let anim = Rc::new(RefCell::new(AnimState::new()));
        let mut scheduler = FrameScheduler::new();
        register_anim_tick(&mut scheduler, &anim);

        assert_eq!(anim.borrow().fade.opacity(), 0.0);
        scheduler.run(FrameTick { time: 0.0, dt: 0.4 });
        scheduler.run(FrameTick { time: 0.4, dt: 0.4 });

        let state = anim.borrow();
        assert!(state.mount.is_active());
        assert_eq!(state.fade.opacity(), 1.0);
    }

    // Teardown cancels the scheduled tick; the animation state must stay
    // frozen no matter how many frames the loop still delivers.
    #[test]
    fn cancelled_anim_tick_freezes_the_showcase() {
        let anim = Rc::new(RefCell::new(AnimState::new()));
        let mut scheduler = FrameScheduler::new();
        let handle = register_anim_tick(&mut scheduler, &anim);

        scheduler.run(FrameTick { time: 0.0, dt: 0.1 });
        let opacity = anim.borrow().fade.opacity();
        assert!(opacity > 0.0);

        scheduler.cancel(handle);
        for i in 1..20 {
            scheduler.run(FrameTick {
                time: i as f32 * 0.1,
                dt: 0.1,
            });
        }

        let state = anim.borrow();
        assert_eq!(state.fade.opacity(), opacity);
        assert!(!state.mount.is_active());
        assert!(scheduler.is_empty());
    }
}
