//! The GL call surface used by the render loop.
//!
//! [`GlApi`] covers exactly the calls this crate issues. It is implemented
//! for [`glow::Context`], which loads its function pointers against a context
//! created elsewhere (by the windowing toolkit), and for a recording mock in
//! tests. All calls act on whatever context is current on the calling thread;
//! [`GlBinding`](crate::gl::GlBinding) makes sure that is the canvas's own.

use std::fmt::Debug;

use glow::HasContext;

/// Version reported by a bound context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextVersion {
    /// Major version.
    pub major: u32,
    /// Minor version.
    pub minor: u32,
    /// True for OpenGL ES contexts.
    pub embedded: bool,
}

impl std::fmt::Display for ContextVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let api = if self.embedded { "OpenGL ES" } else { "OpenGL" };
        write!(f, "{api} {}.{}", self.major, self.minor)
    }
}

/// GL calls issued by shader programs, drawables and the render loop.
///
/// Methods mirror the GL entry points of the same name; handles are the
/// implementation's own object types.
pub trait GlApi {
    /// Shader object handle.
    type Shader: Copy + Debug + PartialEq;
    /// Program object handle.
    type Program: Copy + Debug + PartialEq;
    /// Buffer object handle.
    type Buffer: Copy + Debug + PartialEq;
    /// Vertex array object handle.
    type VertexArray: Copy + Debug + PartialEq;

    /// Version of the context the functions were loaded for, if recognizable.
    fn context_version(&self) -> Option<ContextVersion>;
    /// Renderer and version strings, for logging.
    fn renderer_info(&self) -> String;

    /// `glClearColor`
    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32);
    /// `glClearDepth`
    fn clear_depth(&self, depth: f64);
    /// `glDepthFunc`
    fn depth_func(&self, func: u32);
    /// `glEnable`
    fn enable(&self, capability: u32);
    /// `glDisable`
    fn disable(&self, capability: u32);
    /// `glBlendFunc`
    fn blend_func(&self, src: u32, dst: u32);
    /// `glViewport`
    fn viewport(&self, x: i32, y: i32, width: i32, height: i32);
    /// `glGetError`; reading the flag resets it.
    fn get_error(&self) -> u32;

    /// `glClear`
    fn clear(&self, mask: u32);
    /// `glDrawArrays`
    fn draw_arrays(&self, mode: u32, first: i32, count: i32);

    /// `glCreateShader`
    fn create_shader(&self, stage: u32) -> Result<Self::Shader, String>;
    /// `glShaderSource`
    fn shader_source(&self, shader: Self::Shader, source: &str);
    /// `glCompileShader`
    fn compile_shader(&self, shader: Self::Shader);
    /// `GL_COMPILE_STATUS` of `shader`.
    fn shader_compile_status(&self, shader: Self::Shader) -> bool;
    /// `glGetShaderInfoLog`
    fn shader_info_log(&self, shader: Self::Shader) -> String;
    /// `glDeleteShader`
    fn delete_shader(&self, shader: Self::Shader);
    /// `glCreateProgram`
    fn create_program(&self) -> Result<Self::Program, String>;
    /// `glAttachShader`
    fn attach_shader(&self, program: Self::Program, shader: Self::Shader);
    /// `glDetachShader`
    fn detach_shader(&self, program: Self::Program, shader: Self::Shader);
    /// `glLinkProgram`
    fn link_program(&self, program: Self::Program);
    /// `GL_LINK_STATUS` of `program`.
    fn program_link_status(&self, program: Self::Program) -> bool;
    /// `glGetProgramInfoLog`
    fn program_info_log(&self, program: Self::Program) -> String;
    /// `glUseProgram`; `None` unbinds.
    fn use_program(&self, program: Option<Self::Program>);
    /// `glDeleteProgram`
    fn delete_program(&self, program: Self::Program);

    /// `glGenVertexArrays` for a single object.
    fn create_vertex_array(&self) -> Result<Self::VertexArray, String>;
    /// `glBindVertexArray`; `None` unbinds.
    fn bind_vertex_array(&self, vertex_array: Option<Self::VertexArray>);
    /// `glDeleteVertexArrays` for a single object.
    fn delete_vertex_array(&self, vertex_array: Self::VertexArray);
    /// `glGenBuffers` for a single object.
    fn create_buffer(&self) -> Result<Self::Buffer, String>;
    /// `glBindBuffer`; `None` unbinds.
    fn bind_buffer(&self, target: u32, buffer: Option<Self::Buffer>);
    /// `glBufferData` with the bytes of `data`.
    fn buffer_data_u8_slice(&self, target: u32, data: &[u8], usage: u32);
    /// `glDeleteBuffers` for a single object.
    fn delete_buffer(&self, buffer: Self::Buffer);
    /// `glEnableVertexAttribArray`
    fn enable_vertex_attrib_array(&self, index: u32);
    /// `glVertexAttribPointer` with `GL_FLOAT` components.
    fn vertex_attrib_pointer_f32(
        &self,
        index: u32,
        size: i32,
        normalized: bool,
        stride: i32,
        offset: i32,
    );
}

impl GlApi for glow::Context {
    type Shader = glow::Shader;
    type Program = glow::Program;
    type Buffer = glow::Buffer;
    type VertexArray = glow::VertexArray;

    fn context_version(&self) -> Option<ContextVersion> {
        let version = HasContext::version(self);
        (version.major > 0).then_some(ContextVersion {
            major: version.major,
            minor: version.minor,
            embedded: version.is_embedded,
        })
    }

    fn renderer_info(&self) -> String {
        unsafe {
            format!(
                "{} ({})",
                HasContext::get_parameter_string(self, glow::RENDERER),
                HasContext::get_parameter_string(self, glow::VERSION)
            )
        }
    }

    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32) {
        unsafe { HasContext::clear_color(self, r, g, b, a) };
    }

    fn clear_depth(&self, depth: f64) {
        unsafe { HasContext::clear_depth_f64(self, depth) };
    }

    fn depth_func(&self, func: u32) {
        unsafe { HasContext::depth_func(self, func) };
    }

    fn enable(&self, capability: u32) {
        unsafe { HasContext::enable(self, capability) };
    }

    fn disable(&self, capability: u32) {
        unsafe { HasContext::disable(self, capability) };
    }

    fn blend_func(&self, src: u32, dst: u32) {
        unsafe { HasContext::blend_func(self, src, dst) };
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        unsafe { HasContext::viewport(self, x, y, width, height) };
    }

    fn get_error(&self) -> u32 {
        unsafe { HasContext::get_error(self) }
    }

    fn clear(&self, mask: u32) {
        unsafe { HasContext::clear(self, mask) };
    }

    fn draw_arrays(&self, mode: u32, first: i32, count: i32) {
        unsafe { HasContext::draw_arrays(self, mode, first, count) };
    }

    fn create_shader(&self, stage: u32) -> Result<Self::Shader, String> {
        unsafe { HasContext::create_shader(self, stage) }
    }

    fn shader_source(&self, shader: Self::Shader, source: &str) {
        unsafe { HasContext::shader_source(self, shader, source) };
    }

    fn compile_shader(&self, shader: Self::Shader) {
        unsafe { HasContext::compile_shader(self, shader) };
    }

    fn shader_compile_status(&self, shader: Self::Shader) -> bool {
        unsafe { HasContext::get_shader_compile_status(self, shader) }
    }

    fn shader_info_log(&self, shader: Self::Shader) -> String {
        unsafe { HasContext::get_shader_info_log(self, shader) }
    }

    fn delete_shader(&self, shader: Self::Shader) {
        unsafe { HasContext::delete_shader(self, shader) };
    }

    fn create_program(&self) -> Result<Self::Program, String> {
        unsafe { HasContext::create_program(self) }
    }

    fn attach_shader(&self, program: Self::Program, shader: Self::Shader) {
        unsafe { HasContext::attach_shader(self, program, shader) };
    }

    fn detach_shader(&self, program: Self::Program, shader: Self::Shader) {
        unsafe { HasContext::detach_shader(self, program, shader) };
    }

    fn link_program(&self, program: Self::Program) {
        unsafe { HasContext::link_program(self, program) };
    }

    fn program_link_status(&self, program: Self::Program) -> bool {
        unsafe { HasContext::get_program_link_status(self, program) }
    }

    fn program_info_log(&self, program: Self::Program) -> String {
        unsafe { HasContext::get_program_info_log(self, program) }
    }

    fn use_program(&self, program: Option<Self::Program>) {
        unsafe { HasContext::use_program(self, program) };
    }

    fn delete_program(&self, program: Self::Program) {
        unsafe { HasContext::delete_program(self, program) };
    }

    fn create_vertex_array(&self) -> Result<Self::VertexArray, String> {
        unsafe { HasContext::create_vertex_array(self) }
    }

    fn bind_vertex_array(&self, vertex_array: Option<Self::VertexArray>) {
        unsafe { HasContext::bind_vertex_array(self, vertex_array) };
    }

    fn delete_vertex_array(&self, vertex_array: Self::VertexArray) {
        unsafe { HasContext::delete_vertex_array(self, vertex_array) };
    }

    fn create_buffer(&self) -> Result<Self::Buffer, String> {
        unsafe { HasContext::create_buffer(self) }
    }

    fn bind_buffer(&self, target: u32, buffer: Option<Self::Buffer>) {
        unsafe { HasContext::bind_buffer(self, target, buffer) };
    }

    fn buffer_data_u8_slice(&self, target: u32, data: &[u8], usage: u32) {
        unsafe { HasContext::buffer_data_u8_slice(self, target, data, usage) };
    }

    fn delete_buffer(&self, buffer: Self::Buffer) {
        unsafe { HasContext::delete_buffer(self, buffer) };
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        unsafe { HasContext::enable_vertex_attrib_array(self, index) };
    }

    fn vertex_attrib_pointer_f32(
        &self,
        index: u32,
        size: i32,
        normalized: bool,
        stride: i32,
        offset: i32,
    ) {
        unsafe {
            HasContext::vertex_attrib_pointer_f32(
                self,
                index,
                size,
                glow::FLOAT,
                normalized,
                stride,
                offset,
            );
        }
    }
}
