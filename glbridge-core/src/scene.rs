//! What a canvas draws, and which optional features each scene offers.

use std::{fmt, str::FromStr};

use crate::{
    error::Error,
    gl::{Drawable, GlApi, ShaderProgram, ShaderSources, Triangle},
};

/// Scenes a canvas can be configured with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SceneKind {
    /// A vertex-coloured triangle drawn with a shader program.
    #[default]
    Triangle,
    /// Placeholder cube: clears and presents, draws no geometry.
    Cube,
}

/// Optional features a scene may provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    /// Per-vertex colours interpolated across faces.
    VertexColors,
    /// Image textures applied to the geometry.
    Textures,
    /// Rotating the scene by dragging.
    OrbitControls,
    /// Legacy light and material setup.
    FixedFunctionLighting,
}

impl Feature {
    /// Human-readable feature name, used in errors.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::VertexColors => "vertex colors",
            Self::Textures => "texture loading",
            Self::OrbitControls => "orbit controls",
            Self::FixedFunctionLighting => "fixed-function lighting",
        }
    }
}

/// Whether a scene provides a [`Feature`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Support {
    /// Implemented and usable.
    Available,
    /// Placeholder only.
    NotImplemented,
}

impl SceneKind {
    /// Support level of `feature` in this scene.
    #[must_use]
    pub fn support(self, feature: Feature) -> Support {
        match (self, feature) {
            (Self::Triangle, Feature::VertexColors) => Support::Available,
            _ => Support::NotImplemented,
        }
    }

    /// Fails for any feature the scene only has a placeholder for.
    ///
    /// # Errors
    /// Returns [`Error::Unsupported`] naming the feature.
    pub fn require(self, feature: Feature) -> Result<(), Error> {
        match self.support(feature) {
            Support::Available => Ok(()),
            Support::NotImplemented => Err(Error::not_implemented(feature.name())),
        }
    }

    /// True if the scene draws with a shader program.
    #[must_use]
    pub fn needs_shaders(self) -> bool {
        matches!(self, Self::Triangle)
    }
}

impl fmt::Display for SceneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Triangle => f.write_str("triangle"),
            Self::Cube => f.write_str("cube"),
        }
    }
}

impl FromStr for SceneKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "triangle" => Ok(Self::Triangle),
            "cube" => Ok(Self::Cube),
            _ => Err(format!("Unknown scene '{s}'. Expected 'triangle' or 'cube'")),
        }
    }
}

/// GPU-side objects of a live scene.
#[derive(Debug)]
#[must_use = "call `delete(gl)` before dropping to avoid GPU resource leaks"]
pub(crate) enum Scene<G: GlApi> {
    Triangle {
        program: ShaderProgram<G>,
        triangle: Triangle<G>,
    },
    Cube,
}

impl<G: GlApi> Scene<G> {
    pub(crate) fn create(
        gl: &G,
        kind: SceneKind,
        shaders: Option<&ShaderSources>,
    ) -> Result<Self, Error> {
        match kind {
            SceneKind::Triangle => {
                let sources = shaders
                    .ok_or_else(|| Error::Shader("triangle scene requires shader sources".into()))?;
                let triangle = Triangle::new(gl)?;
                let program = match ShaderProgram::create(gl, sources) {
                    Ok(program) => program,
                    Err(e) => {
                        triangle.delete(gl);
                        return Err(e);
                    },
                };
                Ok(Self::Triangle { program, triangle })
            },
            SceneKind::Cube => Ok(Self::Cube),
        }
    }

    /// Issues the scene's draw calls.
    pub(crate) fn render(&self, gl: &G) {
        match self {
            Self::Triangle { program, triangle } => {
                program.use_program(gl);
                triangle.prepare(gl);
                triangle.draw(gl);
            },
            Self::Cube => {},
        }
    }

    /// Drawable first, then the program.
    pub(crate) fn delete(&self, gl: &G) {
        if let Self::Triangle { program, triangle } = self {
            triangle.delete(gl);
            program.delete(gl);
        }
    }
}
