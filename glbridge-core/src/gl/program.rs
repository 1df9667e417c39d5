use std::{fmt, path::Path};

use tracing::debug;

use crate::{error::Error, gl::GlApi};

/// Vertex and fragment shader source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSources {
    /// Vertex stage source.
    pub vertex: String,
    /// Fragment stage source.
    pub fragment: String,
}

impl ShaderSources {
    /// Sources given as text.
    pub fn new(vertex: impl Into<String>, fragment: impl Into<String>) -> Self {
        Self { vertex: vertex.into(), fragment: fragment.into() }
    }

    /// Reads both stages from UTF-8 text files, without preprocessing.
    ///
    /// # Errors
    /// Returns [`Error::Io`] if either file cannot be read as UTF-8.
    pub fn from_files(vertex: &Path, fragment: &Path) -> Result<Self, Error> {
        let read = |path: &Path| {
            std::fs::read_to_string(path).map_err(|e| Error::read_failed(path, &e))
        };

        Ok(Self { vertex: read(vertex)?, fragment: read(fragment)? })
    }
}

/// A linked program built from one vertex and one fragment stage.
///
/// The stages are detached once linked and kept until [`delete`](Self::delete)
/// releases them together with the program.
#[derive(Debug)]
#[must_use = "call `delete(gl)` before dropping to avoid GPU resource leaks"]
pub struct ShaderProgram<G: GlApi> {
    pub(crate) program: G::Program,
    stages: [G::Shader; 2],
}

impl<G: GlApi> ShaderProgram<G> {
    /// Compiles both stages and links them.
    ///
    /// # Errors
    /// Returns [`Error::ShaderCompile`] or [`Error::ShaderLink`] with the
    /// driver's info log; every object created so far is deleted first.
    pub fn create(gl: &G, sources: &ShaderSources) -> Result<Self, Error> {
        let vertex_shader = compile_shader(gl, ShaderStage::Vertex, &sources.vertex)?;
        let fragment_shader =
            match compile_shader(gl, ShaderStage::Fragment, &sources.fragment) {
                Ok(shader) => shader,
                Err(e) => {
                    gl.delete_shader(vertex_shader);
                    return Err(e);
                },
            };

        let program = match gl.create_program() {
            Ok(program) => program,
            Err(e) => {
                gl.delete_shader(vertex_shader);
                gl.delete_shader(fragment_shader);
                return Err(Error::shader_program_creation_failed(&e));
            },
        };

        // attach shaders and link program
        gl.attach_shader(program, vertex_shader);
        gl.attach_shader(program, fragment_shader);
        gl.link_program(program);
        let linked = check_link_status(gl, program);

        // stages are not needed by the linked program
        gl.detach_shader(program, vertex_shader);
        gl.detach_shader(program, fragment_shader);

        let program = Self { program, stages: [vertex_shader, fragment_shader] };
        if let Err(e) = linked {
            program.delete(gl);
            return Err(e);
        }

        debug!(program = ?program.program, "shader program linked");
        Ok(program)
    }

    /// Use the shader program.
    pub fn use_program(&self, gl: &G) {
        gl.use_program(Some(self.program));
    }

    /// Deletes the program and its two stage objects.
    pub fn delete(&self, gl: &G) {
        gl.delete_program(self.program);
        for shader in self.stages {
            gl.delete_shader(shader);
        }
    }
}

fn compile_shader<G: GlApi>(
    gl: &G,
    stage: ShaderStage,
    source: &str,
) -> Result<G::Shader, Error> {
    let shader = gl
        .create_shader(stage.into())
        .map_err(|e| Error::shader_creation_failed(&e))?;

    gl.shader_source(shader, source);
    gl.compile_shader(shader);

    if !gl.shader_compile_status(shader) {
        let log = gl.shader_info_log(shader);
        gl.delete_shader(shader);
        return Err(Error::ShaderCompile { stage, log });
    }

    Ok(shader)
}

fn check_link_status<G: GlApi>(gl: &G, program: G::Program) -> Result<(), Error> {
    if !gl.program_link_status(program) {
        return Err(Error::ShaderLink(gl.program_info_log(program)));
    }

    Ok(())
}

/// Programmable pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    /// `GL_VERTEX_SHADER`
    Vertex,
    /// `GL_FRAGMENT_SHADER`
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vertex => f.write_str("vertex"),
            Self::Fragment => f.write_str("fragment"),
        }
    }
}

impl From<ShaderStage> for u32 {
    fn from(val: ShaderStage) -> Self {
        use ShaderStage::*;

        match val {
            Vertex => glow::VERTEX_SHADER,
            Fragment => glow::FRAGMENT_SHADER,
        }
    }
}
