//! The render loop driver.
//!
//! A [`Canvas`] reacts to windowing events forwarded by the toolkit host:
//! first paint performs one-time GL setup, every paint runs
//! clear → draw → swap, resizes are applied once the event dispatch that
//! reported them has completed, and close tears GPU objects down before the
//! provider's context goes away. Every handler re-activates the canvas's own
//! context before touching GL.

use std::fmt;

use tracing::{debug, error, info, trace, warn};

use crate::{
    error::Error,
    frame_timing::{FrameStats, FrameTimer},
    gl::{Capabilities, ClearBuffers, GlApi, GlBinding, GlState, ShaderSources},
    input::{DragDelta, DragTracker},
    provider::{ContextProvider, viewport_size},
    scene::{Feature, Scene, SceneKind},
};

/// Background colour of the demo canvas, rgb(96, 147, 172).
pub const DEFAULT_BACKGROUND: [f32; 4] = [96.0 / 255.0, 147.0 / 255.0, 172.0 / 255.0, 1.0];

/// What a canvas draws and how its GL state is set up.
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasConfig {
    /// Scene drawn on every paint.
    pub scene: SceneKind,
    /// Clear colour as linear RGBA.
    pub background: [f32; 4],
    /// Enables alpha blending (`SRC_ALPHA`, `ONE_MINUS_SRC_ALPHA`).
    pub blending: bool,
    /// Required by scenes that draw with a shader program.
    pub shaders: Option<ShaderSources>,
    /// Optional features requested on top of the scene.
    pub features: Vec<Feature>,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            scene: SceneKind::Triangle,
            background: DEFAULT_BACKGROUND,
            blending: false,
            shaders: None,
            features: Vec::new(),
        }
    }
}

impl CanvasConfig {
    /// Checks that the scene supports every requested feature and has the
    /// shader sources it needs.
    ///
    /// # Errors
    /// Returns [`Error::Unsupported`] for features the scene does not
    /// implement, or [`Error::Shader`] if the scene needs shader sources and
    /// none were given.
    pub fn validate(&self) -> Result<(), Error> {
        for &feature in &self.features {
            self.scene.require(feature)?;
        }

        if self.scene.needs_shaders() && self.shaders.is_none() {
            return Err(Error::Shader(format!("scene '{}' requires shader sources", self.scene)));
        }

        Ok(())
    }
}

/// Lifecycle of a canvas's GL resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Bound, no GL state or objects created yet.
    Uninitialized,
    /// GL state and scene objects exist; nothing presented yet.
    Initialized,
    /// At least one frame was presented.
    Rendering,
    /// GPU objects released and the binding dropped.
    Destroyed,
}

/// Result of a paint event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PaintOutcome {
    /// A frame was presented.
    Rendered(FrameStats),
    /// Nothing was done: the canvas is broken or destroyed.
    Skipped,
    /// GL failed during this paint; the canvas no longer renders.
    Failed,
}

type DragHook = Box<dyn FnMut(DragDelta)>;

/// Drives one surface/context pair through init, paint, resize and teardown.
///
/// The first GL failure is logged and permanently disables rendering for the
/// canvas; events are still accepted but perform no GL work.
pub struct Canvas<P: ContextProvider, G: GlApi> {
    binding: GlBinding<G>,
    gl_state: GlState,
    scene: Option<Scene<G>>,
    config: CanvasConfig,
    state: LoopState,
    broken: bool,
    viewport_pending: bool,
    timer: FrameTimer,
    drag: DragTracker,
    drag_hook: Option<DragHook>,
    // dropped last, after the binding released its bookkeeping
    provider: P,
}

impl<P: ContextProvider, G: GlApi> Canvas<P, G> {
    /// Binds `gl` to `provider`'s context. No GL state is touched until the
    /// first paint.
    ///
    /// # Errors
    /// Returns an error if `config` is invalid or the binding rejects the
    /// provider's context.
    pub fn new(provider: P, gl: G, config: CanvasConfig) -> Result<Self, Error> {
        config.validate()?;

        let mut binding = GlBinding::new(gl);
        binding.bind(&provider)?;

        Ok(Self {
            binding,
            gl_state: GlState::default(),
            scene: None,
            config,
            state: LoopState::Uninitialized,
            broken: false,
            viewport_pending: false,
            timer: FrameTimer::default(),
            drag: DragTracker::default(),
            drag_hook: None,
            provider,
        })
    }

    /// Installs a hook receiving cursor deltas of left-button drags.
    pub fn set_drag_hook(&mut self, hook: impl FnMut(DragDelta) + 'static) {
        self.drag_hook = Some(Box::new(hook));
    }

    /// One-time GL setup. Does nothing unless the canvas is uninitialized.
    ///
    /// # Errors
    /// Returns the first GL, shader or context error; the canvas stays
    /// uninitialized.
    pub fn init_gl(&mut self) -> Result<(), Error> {
        if self.state != LoopState::Uninitialized {
            return Ok(());
        }

        let gl = self.binding.bind(&self.provider)?;
        let state = &mut self.gl_state;

        state
            .clear_color(gl, self.config.background)
            .clear_depth(gl, 1.0)
            .depth_func(gl, glow::LEQUAL)
            .set_enabled(gl, Capabilities::DEPTH_TEST | Capabilities::CULL_FACE, true);

        if self.config.blending {
            state
                .set_enabled(gl, Capabilities::BLEND, true)
                .blend_func(gl, glow::SRC_ALPHA, glow::ONE_MINUS_SRC_ALPHA);
        }

        let scene = Scene::create(gl, self.config.scene, self.config.shaders.as_ref())?;
        if let Err(e) = check_gl_error(gl, "initialization") {
            scene.delete(gl);
            return Err(e);
        }
        self.scene = Some(scene);

        if let Some((width, height)) =
            viewport_size(self.provider.client_size(), self.provider.content_scale())
        {
            state.viewport(gl, 0, 0, width, height);
        }

        self.state = LoopState::Initialized;
        info!(scene = %self.config.scene, viewport = ?state.current_viewport(), "GL initialized");
        Ok(())
    }

    /// Handles a paint event: lazy init, then clear → draw → swap.
    pub fn paint(&mut self) -> PaintOutcome {
        if self.broken || self.state == LoopState::Destroyed {
            trace!(state = ?self.state, broken = self.broken, "paint skipped");
            return PaintOutcome::Skipped;
        }

        match self.render_frame() {
            Ok(stats) => PaintOutcome::Rendered(stats),
            Err(e) => {
                self.disable(&e);
                PaintOutcome::Failed
            },
        }
    }

    fn render_frame(&mut self) -> Result<FrameStats, Error> {
        self.init_gl()?;

        let gl = self.binding.bind(&self.provider)?;
        gl.clear((ClearBuffers::COLOR | ClearBuffers::DEPTH).bits());

        if let Some(scene) = &self.scene {
            scene.render(gl);
        }
        check_gl_error(gl, "draw")?;

        self.provider.swap_buffers()?;
        self.state = LoopState::Rendering;

        Ok(self.timer.tick())
    }

    /// Schedules a viewport update for after the current event dispatch.
    pub fn on_resize(&mut self) {
        self.viewport_pending = true;
    }

    /// Runs work deferred by earlier events. Returns true if the viewport
    /// was updated.
    pub fn apply_deferred(&mut self) -> bool {
        if !std::mem::take(&mut self.viewport_pending) {
            return false;
        }

        if self.broken || self.state == LoopState::Destroyed {
            return false;
        }

        match self.update_viewport() {
            Ok(applied) => applied,
            Err(e) => {
                self.disable(&e);
                false
            },
        }
    }

    fn update_viewport(&mut self) -> Result<bool, Error> {
        let client = self.provider.client_size();
        let Some((width, height)) = viewport_size(client, self.provider.content_scale()) else {
            debug!(?client, "empty client area, viewport unchanged");
            return Ok(false);
        };

        self.provider.resize(width as u32, height as u32);
        let gl = self.binding.bind(&self.provider)?;
        self.gl_state.viewport(gl, 0, 0, width, height);
        self.provider.request_redraw();

        debug!(width, height, "viewport updated");
        Ok(true)
    }

    /// Left button pressed at `(x, y)` in logical units.
    pub fn on_mouse_down(&mut self, x: f64, y: f64) {
        self.drag.press(x, y);
    }

    /// Left button released.
    pub fn on_mouse_up(&mut self) {
        self.drag.release();
    }

    /// Tracks the cursor; a left-button drag is handed to the drag hook and
    /// requests a repaint. Returns the drag delta, if any.
    pub fn on_mouse_motion(&mut self, x: f64, y: f64, left_down: bool) -> Option<DragDelta> {
        let delta = self.drag.motion(x, y, left_down)?;
        if let Some(hook) = self.drag_hook.as_mut() {
            hook(delta);
        }
        self.provider.request_redraw();
        Some(delta)
    }

    /// Focus gained or lost; repaints the canvas.
    pub fn on_focus_changed(&mut self) {
        self.provider.request_redraw();
    }

    /// Releases the drawable, the shader program and the binding, in that
    /// order. Idempotent; also runs on drop.
    pub fn destroy(&mut self) {
        if self.state == LoopState::Destroyed {
            return;
        }

        if let Some(scene) = self.scene.take() {
            match self.binding.bind(&self.provider) {
                Ok(gl) => scene.delete(gl),
                Err(e) => warn!(error = %e, "context unavailable, GPU objects left to the context"),
            }
        }

        self.binding.unbind();
        self.state = LoopState::Destroyed;
        info!("canvas destroyed");
    }

    fn disable(&mut self, cause: &Error) {
        error!(error = %cause, "OpenGL failed, disabling rendering for this canvas");
        self.broken = true;
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> LoopState {
        self.state
    }

    /// True once a GL failure disabled rendering.
    #[must_use]
    pub fn is_broken(&self) -> bool {
        self.broken
    }

    /// Configuration the canvas was created with.
    #[must_use]
    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    /// The surface and context this canvas draws into.
    #[must_use]
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Current viewport as `[x, y, width, height]`.
    #[must_use]
    pub fn viewport(&self) -> [i32; 4] {
        self.gl_state.current_viewport()
    }
}

impl<P: ContextProvider, G: GlApi> Drop for Canvas<P, G> {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl<P: ContextProvider, G: GlApi> fmt::Debug for Canvas<P, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Canvas")
            .field("state", &self.state)
            .field("broken", &self.broken)
            .field("scene", &self.config.scene)
            .field("viewport", &self.gl_state.current_viewport())
            .field("viewport_pending", &self.viewport_pending)
            .finish_non_exhaustive()
    }
}

fn check_gl_error<G: GlApi>(gl: &G, operation: &'static str) -> Result<(), Error> {
    match gl.get_error() {
        glow::NO_ERROR => Ok(()),
        code => Err(Error::Gl { code, operation }),
    }
}
