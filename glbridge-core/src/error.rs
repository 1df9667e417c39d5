//! Errors raised while binding, initializing and rendering.

use std::path::Path;

use crate::gl::ShaderStage;

/// Error categories for the render loop and its GL resources.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The binding adapter could not recognize the foreign context, or was
    /// used while unbound.
    #[error("Binding error: {0}")]
    Binding(String),

    /// Surface or context creation, activation, or buffer swap errors.
    #[error("Context error: {0}")]
    Context(String),

    /// Shader object or program creation errors.
    #[error("Shader error: {0}")]
    Shader(String),

    /// A shader stage failed to compile.
    #[error("Shader compilation failed ({stage}): {log}")]
    ShaderCompile {
        /// Stage that failed.
        stage: ShaderStage,
        /// Compiler info log.
        log: String,
    },

    /// The shader program failed to link.
    #[error("Shader linking failed: {0}")]
    ShaderLink(String),

    /// GL resource creation or management errors.
    #[error("Resource error: {0}")]
    Resource(String),

    /// The GL error flag was raised by a call.
    #[error("GL error 0x{code:04X} during {operation}")]
    Gl {
        /// Value returned by `glGetError`.
        code: u32,
        /// What the canvas was doing when the flag was read.
        operation: &'static str,
    },

    /// Reading external data failed.
    #[error("I/O error: {0}")]
    Io(String),

    /// The requested feature exists only as a placeholder.
    #[error("Not implemented: {0}")]
    Unsupported(String),
}

impl Error {
    // Binding errors
    pub(crate) fn binding_unrecognized_context() -> Self {
        Self::Binding("GL binding could not recognize the provided context".to_string())
    }

    pub(crate) fn binding_released() -> Self {
        Self::Binding("GL binding used after it was unbound".to_string())
    }

    // Context errors
    /// The provider's context could not be made current.
    pub fn context_activation_failed(detail: impl std::fmt::Display) -> Self {
        Self::Context(format!("Failed to make context current: {detail}"))
    }

    /// Presenting the back buffer failed.
    pub fn swap_buffers_failed(detail: impl std::fmt::Display) -> Self {
        Self::Context(format!("Failed to swap buffers: {detail}"))
    }

    /// The window, surface or context could not be allocated.
    pub fn surface_creation_failed(detail: impl std::fmt::Display) -> Self {
        Self::Context(format!("Failed to create surface: {detail}"))
    }

    // Shader errors
    pub(crate) fn shader_creation_failed(detail: &str) -> Self {
        Self::Shader(format!("Shader creation failed: {detail}"))
    }

    pub(crate) fn shader_program_creation_failed(detail: &str) -> Self {
        Self::Shader(format!("Shader program creation failed: {detail}"))
    }

    // Resource errors
    pub(crate) fn buffer_creation_failed(buffer_type: &str, detail: &str) -> Self {
        Self::Resource(format!("Failed to create {buffer_type} buffer: {detail}"))
    }

    pub(crate) fn vertex_array_creation_failed(detail: &str) -> Self {
        Self::Resource(format!("Failed to create vertex array object: {detail}"))
    }

    pub(crate) fn read_failed(path: &Path, err: &std::io::Error) -> Self {
        Self::Io(format!("Failed to read '{}': {err}", path.display()))
    }

    pub(crate) fn not_implemented(feature: &str) -> Self {
        Self::Unsupported(feature.to_string())
    }
}
