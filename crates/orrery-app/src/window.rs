//! Window creation and event routing via winit.
//!
//! [`App`] implements winit's [`ApplicationHandler`]. The window, GPU context
//! and scene are created together in `resumed`; any failure there stops the
//! event loop before a frame is drawn and is returned from [`run`].

use std::sync::Arc;
use std::time::Instant;

use orrery_config::Config;
use orrery_input::{Action, InputMap, RawKeyEvent};
use orrery_render::{RenderContext, SurfaceError, init_render_context_blocking};
use orrery_scene::{
    EffectFlags, ImageDirSource, ModeState, ProceduralSource, SceneComposer, SceneSettings,
    TextureSource,
};
use tracing::{debug, error, info, instrument, warn};
use winit::application::ApplicationHandler;
use winit::event::{DeviceEvent, DeviceId, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Window, WindowAttributes, WindowId};

use crate::error::AppError;

/// Returns [`WindowAttributes`] based on the given configuration.
pub fn window_attributes_from_config(config: &Config) -> WindowAttributes {
    WindowAttributes::default()
        .with_title(config.window.title.clone())
        .with_inner_size(winit::dpi::LogicalSize::new(
            config.window.width as f64,
            config.window.height as f64,
        ))
}

/// Scene parameters from configuration. `star_seed` has already been
/// resolved so the run can be reproduced from the log.
pub fn scene_settings_from_config(config: &Config, star_seed: u64) -> SceneSettings {
    let [r, g, b, a] = config.render.clear_color;
    SceneSettings {
        fov_y_degrees: config.render.fov_y_degrees,
        near: config.render.near,
        far: config.render.far,
        clear_color: wgpu::Color { r, g, b, a },
        start_distance: config.camera.start_distance,
        dolly_step: config.camera.dolly_step,
        pitch_divisor: config.camera.pitch_divisor,
        star_seed,
        orbit_segments: config.scene.orbit_segments,
        sky_scale: config.scene.sky_scale,
        time_scale: config.scene.time_scale,
        overlay_text: config.render.overlay_text,
        font_atlas: config.resources.font_atlas.clone(),
    }
}

/// Image files when a texture directory is configured, placeholders otherwise.
pub fn texture_source_from_config(config: &Config) -> Box<dyn TextureSource> {
    match &config.resources.texture_dir {
        Some(dir) => {
            info!("Loading textures from {}", dir.display());
            Box::new(ImageDirSource::new(dir))
        }
        None => {
            info!("No texture directory configured, using procedural textures");
            Box::new(ProceduralSource::new(config.resources.font_atlas.clone()))
        }
    }
}

/// Apply a mode action. Returns `false` for actions that are not mode changes.
pub fn apply_mode_action(modes: &mut ModeState, action: Action) -> bool {
    match action {
        Action::ShadingReset => modes.set_cel(false),
        Action::CelShading => modes.set_cel(true),
        Action::NormalMapOff => modes.set_normal_map(false),
        Action::NormalMapOn => modes.set_normal_map(true),
        Action::ToggleGreyscale => modes.toggle_effect(EffectFlags::GREYSCALE),
        Action::ToggleFlipX => modes.toggle_effect(EffectFlags::FLIP_X),
        Action::ToggleFlipY => modes.toggle_effect(EffectFlags::FLIP_Y),
        Action::ToggleBlur => modes.toggle_effect(EffectFlags::BLUR),
        Action::DollyForward | Action::DollyBackward | Action::Quit => return false,
    }
    true
}

/// Viewer state driven by the event loop.
pub struct App {
    config: Config,
    input: InputMap,
    window: Option<Arc<Window>>,
    gpu: Option<RenderContext>,
    scene: Option<SceneComposer>,
    start_time: Instant,
    /// First fatal error; ends the event loop.
    failure: Option<AppError>,
}

impl App {
    pub fn new(config: Config, input: InputMap) -> Self {
        Self {
            config,
            input,
            window: None,
            gpu: None,
            scene: None,
            start_time: Instant::now(),
            failure: None,
        }
    }

    /// Create the window, GPU context and scene, in that order.
    fn initialize(&mut self, event_loop: &ActiveEventLoop) -> Result<(), AppError> {
        let window = Arc::new(event_loop.create_window(window_attributes_from_config(&self.config))?);
        let size = window.inner_size();
        info!(
            "Window created: {}x{} physical (scale: {:.2})",
            size.width,
            size.height,
            window.scale_factor()
        );

        let gpu = init_render_context_blocking(window.clone(), self.config.window.vsync)?;

        let star_seed = self.config.scene.star_seed.unwrap_or_else(rand::random);
        info!("Star field seed: {star_seed}");
        let source = texture_source_from_config(&self.config);
        let scene = SceneComposer::new(
            &gpu,
            scene_settings_from_config(&self.config, star_seed),
            source.as_ref(),
        )?;

        window.request_redraw();
        self.window = Some(window);
        self.gpu = Some(gpu);
        self.scene = Some(scene);
        self.start_time = Instant::now();
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: AppError) {
        error!("{err}");
        self.failure.get_or_insert(err);
        event_loop.exit();
    }

    fn handle_action(&mut self, event_loop: &ActiveEventLoop, action: Action) {
        if action == Action::Quit {
            info!("Quit requested");
            event_loop.exit();
            return;
        }
        let (Some(gpu), Some(scene)) = (&self.gpu, &mut self.scene) else {
            return;
        };
        match action {
            Action::DollyForward => scene.step_forward(&gpu.queue),
            Action::DollyBackward => scene.step_backward(&gpu.queue),
            _ => {
                if apply_mode_action(scene.modes_mut(), action) {
                    debug!(action = action.name(), "{}", scene.modes().status_line());
                }
            }
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(gpu), Some(scene)) = (&self.gpu, &mut self.scene) else {
            return;
        };
        let elapsed = self.start_time.elapsed().as_secs_f32();
        match scene.render(gpu, elapsed) {
            Ok(()) => {}
            Err(SurfaceError::Timeout) => warn!("Surface timeout, skipping frame"),
            Err(err) => {
                self.fail(event_loop, err.into());
                return;
            }
        }
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(err) = self.initialize(event_loop) {
            self.fail(event_loop, err);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested, shutting down");
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                // The off-screen image keeps its size; only the surface follows.
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(new_size.width, new_size.height);
                    info!("Surface resized to {}x{}", new_size.width, new_size.height);
                }
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if let Some(action) = self.input.resolve(RawKeyEvent::from(&event)) {
                    self.handle_action(event_loop, action);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event
            && let (Some(gpu), Some(scene)) = (&self.gpu, &mut self.scene)
        {
            scene.pitch(&gpu.queue, delta.1 as f32);
        }
    }
}

/// Run the viewer until the window closes. Returns the first fatal error.
#[instrument(skip_all)]
pub fn run(config: Config) -> Result<(), AppError> {
    let input = InputMap::with_overrides(&config.input.keybindings)?;
    let event_loop = EventLoop::new()?;
    let mut app = App::new(config, input);
    event_loop.run_app(&mut app)?;
    match app.failure.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
