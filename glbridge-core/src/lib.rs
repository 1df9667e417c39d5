//! Render loop and context lifecycle for GL contexts borrowed from a
//! windowing toolkit.
//!
//! The toolkit owns the window, the surface and the GL context
//! ([`ContextProvider`]). A separate GL call library, [`glow`], is loaded
//! against that foreign context and wrapped by [`GlBinding`]. [`Canvas`] ties
//! both to the toolkit's paint, resize, input and close events.

mod canvas;
pub mod error;
mod frame_timing;
mod gl;
mod input;
mod provider;
mod scene;

#[cfg(test)]
mod mock;

pub use canvas::{Canvas, CanvasConfig, DEFAULT_BACKGROUND, LoopState, PaintOutcome};
pub use error::Error;
pub use frame_timing::{FrameStats, FrameTimer, NOMINAL_FRAMETIME_MS};
pub use gl::{
    Capabilities, ClearBuffers, ColorVertex, ContextVersion, Drawable, GlApi, GlBinding, GlState,
    ShaderProgram, ShaderSources, ShaderStage, Triangle,
};
pub use input::{DragDelta, DragTracker};
pub use provider::{
    ApiVersion, ConfigChoice, ConfigInfo, ContextProvider, PixelFormat, Profile,
    SurfaceAttributes, pick_config, viewport_size,
};
pub use scene::{Feature, SceneKind, Support};
