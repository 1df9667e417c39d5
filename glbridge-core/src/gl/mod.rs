mod api;
mod binding;
mod buffer;
mod program;
mod renderer;
mod state;
mod triangle;

pub use api::{ContextVersion, GlApi};
pub use binding::GlBinding;
use buffer::*;
pub use program::{ShaderProgram, ShaderSources, ShaderStage};
pub use renderer::Drawable;
pub use state::{Capabilities, ClearBuffers, GlState};
pub use triangle::{ColorVertex, Triangle};
