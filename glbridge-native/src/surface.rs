//! Window, surface and GL context allocated through glutin.

use std::num::NonZeroU32;

use glbridge_core::{
    ConfigChoice, ConfigInfo, ContextProvider, Error, FrameStats, PixelFormat, Profile,
    SurfaceAttributes, pick_config,
};
use glutin::{
    config::{ColorBufferType, Config, ConfigTemplateBuilder, GlConfig},
    context::{
        ContextApi, ContextAttributesBuilder, GlProfile, NotCurrentGlContext,
        PossiblyCurrentContext, PossiblyCurrentGlContext, Version,
    },
    display::{GetGlDisplay, GlDisplay},
    surface::{GlSurface, Surface, SwapInterval, WindowSurface},
};
use glutin_winit::{DisplayBuilder, GlWindow};
use raw_window_handle::HasWindowHandle;
use tracing::{info, warn};
use winit::{
    event_loop::ActiveEventLoop,
    window::{Window, WindowAttributes},
};

/// A winit window with a glutin surface and context.
///
/// Fields drop in declaration order: the context goes first, then the
/// surface, then the window it was created for.
pub struct GlutinSurface {
    gl_context: PossiblyCurrentContext,
    gl_surface: Surface<WindowSurface>,
    window: Window,
    title: String,
}

impl GlutinSurface {
    /// Creates the window, picks a framebuffer config for `attrs` and creates
    /// a context for it, leaving the context current.
    ///
    /// Unavailable pixel formats and context versions fall back to the
    /// display's defaults instead of failing.
    ///
    /// # Errors
    /// Returns [`Error::Context`] if even the fallback configuration cannot
    /// produce a window, surface or context.
    pub fn create(
        event_loop: &ActiveEventLoop,
        window_attrs: WindowAttributes,
        attrs: &SurfaceAttributes,
        vsync: bool,
    ) -> Result<Self, Error> {
        let format = attrs.pixel_format;
        let title = window_attrs.title.clone();

        let build = |template: ConfigTemplateBuilder| {
            DisplayBuilder::new()
                .with_window_attributes(Some(window_attrs.clone()))
                .build(event_loop, template, |configs| choose_config(configs, &format))
        };

        let (window, gl_config) = match build(config_template(&format)) {
            Ok(built) => built,
            Err(e) => {
                warn!(error = %e, "requested pixel format unavailable, using an unconstrained template");
                build(ConfigTemplateBuilder::new()).map_err(Error::surface_creation_failed)?
            },
        };
        let window =
            window.ok_or_else(|| Error::surface_creation_failed("no window was created"))?;

        info!(
            samples = gl_config.num_samples(),
            depth = gl_config.depth_size(),
            alpha = gl_config.alpha_size(),
            "framebuffer config selected"
        );

        let raw_window_handle = window
            .window_handle()
            .map_err(Error::surface_creation_failed)?
            .as_raw();
        let gl_display = gl_config.display();

        let profile = match attrs.api.profile {
            Profile::Core => GlProfile::Core,
            Profile::Compatibility => GlProfile::Compatibility,
        };
        let requested = ContextAttributesBuilder::new()
            .with_profile(profile)
            .with_context_api(ContextApi::OpenGl(Some(Version::new(
                attrs.api.major,
                attrs.api.minor,
            ))))
            .build(Some(raw_window_handle));
        let fallback = ContextAttributesBuilder::new().build(Some(raw_window_handle));

        let not_current = match unsafe { gl_display.create_context(&gl_config, &requested) } {
            Ok(context) => context,
            Err(e) => {
                warn!(
                    error = %e,
                    major = attrs.api.major,
                    minor = attrs.api.minor,
                    "requested context version unavailable, using default context attributes"
                );
                unsafe { gl_display.create_context(&gl_config, &fallback) }
                    .map_err(Error::surface_creation_failed)?
            },
        };

        let surface_attrs = window
            .build_surface_attributes(Default::default())
            .map_err(Error::surface_creation_failed)?;
        let gl_surface = unsafe { gl_display.create_window_surface(&gl_config, &surface_attrs) }
            .map_err(Error::surface_creation_failed)?;

        let gl_context = not_current
            .make_current(&gl_surface)
            .map_err(Error::context_activation_failed)?;

        let interval = if vsync { SwapInterval::Wait(NonZeroU32::MIN) } else { SwapInterval::DontWait };
        if let Err(e) = gl_surface.set_swap_interval(&gl_context, interval) {
            warn!(error = %e, vsync, "failed to set swap interval");
        }

        Ok(Self { gl_context, gl_surface, window, title })
    }

    /// Loads glow's function pointers from this surface's display.
    pub fn load_gl(&self) -> glow::Context {
        let display = self.gl_context.display();
        unsafe { glow::Context::from_loader_function_cstr(|name| display.get_proc_address(name)) }
    }

    /// Shows the latest frame timing next to the window title.
    pub fn set_status(&self, stats: &FrameStats) {
        self.window.set_title(&format!("{} | {stats}", self.title));
    }

    pub fn scale_factor(&self) -> f64 {
        self.window.scale_factor()
    }
}

impl ContextProvider for GlutinSurface {
    fn make_current(&self) -> Result<(), Error> {
        self.gl_context
            .make_current(&self.gl_surface)
            .map_err(Error::context_activation_failed)
    }

    fn resize(&self, width: u32, height: u32) {
        if let (Some(width), Some(height)) = (NonZeroU32::new(width), NonZeroU32::new(height)) {
            self.gl_surface.resize(&self.gl_context, width, height);
        }
    }

    fn swap_buffers(&self) -> Result<(), Error> {
        self.gl_surface
            .swap_buffers(&self.gl_context)
            .map_err(Error::swap_buffers_failed)
    }

    fn client_size(&self) -> (f64, f64) {
        let size = self
            .window
            .inner_size()
            .to_logical::<f64>(self.window.scale_factor());
        (size.width, size.height)
    }

    fn content_scale(&self) -> f64 {
        self.window.scale_factor()
    }

    fn request_redraw(&self) {
        self.window.request_redraw();
    }
}

/// Constrained template: every requested minimum is a hard requirement.
fn config_template(format: &PixelFormat) -> ConfigTemplateBuilder {
    let template = ConfigTemplateBuilder::new()
        .with_buffer_type(ColorBufferType::Rgb {
            r_size: format.red,
            g_size: format.green,
            b_size: format.blue,
        })
        .with_alpha_size(format.alpha)
        .with_depth_size(format.depth)
        .with_single_buffering(!format.double_buffer);

    match format.samples {
        Some(samples) => template.with_multisampling(samples),
        None => template,
    }
}

fn choose_config(configs: Box<dyn Iterator<Item = Config> + '_>, format: &PixelFormat) -> Config {
    let mut configs: Vec<Config> = configs.collect();
    let infos: Vec<ConfigInfo> = configs.iter().map(config_info).collect();

    let idx = match pick_config(&infos, format) {
        Some(ConfigChoice::Matched(idx)) => idx,
        Some(ConfigChoice::Fallback(idx)) => {
            warn!(?format, "no config satisfies the pixel format, using the display default");
            idx
        },
        None => 0,
    };

    // glutin reports a missing match as an error before calling the picker,
    // so the list is never empty here
    configs.swap_remove(idx)
}

fn config_info(config: &Config) -> ConfigInfo {
    let (red, green, blue) = match config.color_buffer_type() {
        Some(ColorBufferType::Rgb { r_size, g_size, b_size }) => (r_size, g_size, b_size),
        _ => (0, 0, 0),
    };

    ConfigInfo {
        red,
        green,
        blue,
        alpha: config.alpha_size(),
        depth: config.depth_size(),
        samples: config.num_samples(),
    }
}
