use color_eyre::{Report, eyre::WrapErr};
use glbridge_core::{Canvas, CanvasConfig, ContextProvider, PaintOutcome};
use tracing::{debug, error, info};
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::{ElementState, KeyEvent, MouseButton, WindowEvent},
    event_loop::ActiveEventLoop,
    keyboard::{Key, NamedKey},
    window::{Window, WindowId},
};

use crate::{
    cli::{Cli, MIN_CLIENT_SIZE},
    surface::GlutinSurface,
};

type NativeCanvas = Canvas<GlutinSurface, glow::Context>;

/// Hosts one canvas and forwards window events to it.
pub struct App {
    cli: Cli,
    config: CanvasConfig,
    canvas: Option<NativeCanvas>,
    /// Last cursor position in logical units.
    cursor: (f64, f64),
    left_down: bool,
    error: Option<Report>,
}

impl App {
    pub fn new(cli: Cli, config: CanvasConfig) -> Self {
        Self {
            cli,
            config,
            canvas: None,
            cursor: (0.0, 0.0),
            left_down: false,
            error: None,
        }
    }

    /// Error that stopped the event loop, if any.
    pub fn finish(self) -> Result<(), Report> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn create_canvas(&self, event_loop: &ActiveEventLoop) -> Result<NativeCanvas, Report> {
        let window_attrs = Window::default_attributes()
            .with_title(self.cli.title.clone())
            .with_inner_size(LogicalSize::new(self.cli.width, self.cli.height))
            .with_min_inner_size(LogicalSize::new(MIN_CLIENT_SIZE.0, MIN_CLIENT_SIZE.1));

        let surface = GlutinSurface::create(
            event_loop,
            window_attrs,
            &self.cli.surface_attributes(),
            self.cli.vsync,
        )
        .wrap_err("Failed to create GL surface")?;

        let gl = surface.load_gl();
        let mut canvas =
            Canvas::new(surface, gl, self.config.clone()).wrap_err("Failed to bind GL context")?;

        canvas.set_drag_hook(|delta| debug!(dx = delta.dx, dy = delta.dy, "drag"));
        canvas.provider().request_redraw();

        Ok(canvas)
    }

    fn close(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(mut canvas) = self.canvas.take() {
            canvas.destroy();
        }
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.canvas.is_some() {
            return;
        }

        match self.create_canvas(event_loop) {
            Ok(canvas) => {
                info!(scene = %self.config.scene, "canvas ready");
                self.canvas = Some(canvas);
            },
            Err(e) => {
                error!(error = %e, "failed to create canvas");
                self.error = Some(e);
                event_loop.exit();
            },
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key: Key::Named(NamedKey::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                self.close(event_loop);
                return;
            },
            _ => {},
        }

        let Some(canvas) = self.canvas.as_mut() else {
            return;
        };

        match event {
            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => canvas.on_resize(),
            WindowEvent::RedrawRequested => {
                if let PaintOutcome::Rendered(stats) = canvas.paint() {
                    canvas.provider().set_status(&stats);
                }
            },
            WindowEvent::MouseInput { state, button: MouseButton::Left, .. } => {
                let (x, y) = self.cursor;
                match state {
                    ElementState::Pressed => {
                        self.left_down = true;
                        canvas.on_mouse_down(x, y);
                    },
                    ElementState::Released => {
                        self.left_down = false;
                        canvas.on_mouse_up();
                    },
                }
            },
            WindowEvent::CursorMoved { position, .. } => {
                let logical = position.to_logical::<f64>(canvas.provider().scale_factor());
                self.cursor = (logical.x, logical.y);
                canvas.on_mouse_motion(logical.x, logical.y, self.left_down);
            },
            WindowEvent::Focused(_) => canvas.on_focus_changed(),
            _ => {},
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        // event dispatch is complete: run deferred resize handling
        if let Some(canvas) = self.canvas.as_mut() {
            canvas.apply_deferred();
        }
    }
}
