//! Recording GL and provider doubles shared by the unit tests.

use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
    rc::Rc,
};

use crate::{
    error::Error,
    gl::{ContextVersion, GlApi},
    provider::ContextProvider,
};

pub(crate) type CallLog = Rc<RefCell<Vec<Call>>>;

pub(crate) fn new_log() -> CallLog {
    Rc::new(RefCell::new(Vec::new()))
}

/// Id of the provider whose context is current on the test thread.
pub(crate) type CurrentContext = Rc<Cell<Option<u32>>>;

/// A recorded GL or provider call.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    // provider
    MakeCurrent,
    ResizeSurface(u32, u32),
    SwapBuffers,
    RequestRedraw,

    // gl
    ClearColor([f32; 4]),
    ClearDepth,
    DepthFunc(u32),
    Enable(u32),
    Disable(u32),
    BlendFunc(u32, u32),
    Viewport(i32, i32, i32, i32),
    GetError,
    Clear(u32),
    DrawArrays { mode: u32, first: i32, count: i32 },
    CreateShader(u32),
    ShaderSource(u32),
    CompileShader(u32),
    DeleteShader(u32),
    CreateProgram(u32),
    AttachShader(u32, u32),
    DetachShader(u32, u32),
    LinkProgram(u32),
    UseProgram(Option<u32>),
    DeleteProgram(u32),
    CreateVertexArray(u32),
    BindVertexArray(Option<u32>),
    DeleteVertexArray(u32),
    CreateBuffer(u32),
    BindBuffer(u32, Option<u32>),
    BufferData { target: u32, len: usize },
    DeleteBuffer(u32),
    EnableVertexAttribArray(u32),
    VertexAttribPointer { index: u32, size: i32, stride: i32, offset: i32 },

    /// Logged before a GL call issued while another context was current.
    WrongContext { expected: u32, current: Option<u32> },
}

impl Call {
    pub(crate) fn is_gl(&self) -> bool {
        !matches!(
            self,
            Call::MakeCurrent | Call::ResizeSurface(..) | Call::SwapBuffers | Call::RequestRedraw
        )
    }
}

/// Kind of GL object, for create/delete accounting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum ObjectKind {
    Shader,
    Program,
    VertexArray,
    Buffer,
}

/// Per-object create and delete counts reconstructed from a call log.
#[derive(Debug, Default)]
pub(crate) struct ResourceLedger {
    pub(crate) created: HashMap<(ObjectKind, u32), usize>,
    pub(crate) deleted: HashMap<(ObjectKind, u32), usize>,
    /// Deletes observed before the matching create.
    pub(crate) premature_deletes: usize,
}

impl ResourceLedger {
    pub(crate) fn from_log(log: &[Call]) -> Self {
        let mut ledger = Self::default();
        for call in log {
            match *call {
                Call::CreateShader(h) => ledger.create(ObjectKind::Shader, h),
                Call::CreateProgram(h) => ledger.create(ObjectKind::Program, h),
                Call::CreateVertexArray(h) => ledger.create(ObjectKind::VertexArray, h),
                Call::CreateBuffer(h) => ledger.create(ObjectKind::Buffer, h),
                Call::DeleteShader(h) => ledger.delete(ObjectKind::Shader, h),
                Call::DeleteProgram(h) => ledger.delete(ObjectKind::Program, h),
                Call::DeleteVertexArray(h) => ledger.delete(ObjectKind::VertexArray, h),
                Call::DeleteBuffer(h) => ledger.delete(ObjectKind::Buffer, h),
                _ => {},
            }
        }
        ledger
    }

    fn create(&mut self, kind: ObjectKind, handle: u32) {
        *self.created.entry((kind, handle)).or_default() += 1;
    }

    fn delete(&mut self, kind: ObjectKind, handle: u32) {
        if !self.created.contains_key(&(kind, handle)) {
            self.premature_deletes += 1;
        }
        *self.deleted.entry((kind, handle)).or_default() += 1;
    }

    /// True if every created object was deleted exactly once, after creation.
    pub(crate) fn is_balanced(&self) -> bool {
        self.premature_deletes == 0
            && self.created.len() == self.deleted.len()
            && self
                .created
                .iter()
                .all(|(key, &n)| n == 1 && self.deleted.get(key) == Some(&1))
    }

    pub(crate) fn live(&self) -> usize {
        self.created
            .keys()
            .filter(|key| !self.deleted.contains_key(key))
            .count()
    }
}

/// GL double that records every call and hands out sequential handles.
#[derive(Debug)]
pub(crate) struct MockGl {
    log: CallLog,
    next_handle: Cell<u32>,
    version: Option<ContextVersion>,
    fail_compile: bool,
    fail_link: bool,
    /// 1-based draw call after which the error flag is raised.
    error_after_draw: Option<usize>,
    draws: Cell<usize>,
    pending_error: Cell<u32>,
    context: Option<(CurrentContext, u32)>,
}

impl MockGl {
    pub(crate) fn new(log: CallLog) -> Self {
        Self {
            log,
            next_handle: Cell::new(1),
            version: Some(ContextVersion { major: 3, minor: 3, embedded: false }),
            fail_compile: false,
            fail_link: false,
            error_after_draw: None,
            draws: Cell::new(0),
            pending_error: Cell::new(glow::NO_ERROR),
            context: None,
        }
    }

    /// Flags every call made while context `id` is not current.
    pub(crate) fn on_context(mut self, current: &CurrentContext, id: u32) -> Self {
        self.context = Some((current.clone(), id));
        self
    }

    pub(crate) fn with_version(mut self, version: Option<ContextVersion>) -> Self {
        self.version = version;
        self
    }

    pub(crate) fn failing_compile(mut self) -> Self {
        self.fail_compile = true;
        self
    }

    pub(crate) fn failing_link(mut self) -> Self {
        self.fail_link = true;
        self
    }

    pub(crate) fn error_after_draw(mut self, draw: usize) -> Self {
        self.error_after_draw = Some(draw);
        self
    }

    fn record(&self, call: Call) {
        if let Some((current, id)) = &self.context
            && current.get() != Some(*id)
        {
            self.log
                .borrow_mut()
                .push(Call::WrongContext { expected: *id, current: current.get() });
        }
        self.log.borrow_mut().push(call);
    }

    fn handle(&self) -> u32 {
        let handle = self.next_handle.get();
        self.next_handle.set(handle + 1);
        handle
    }
}

impl GlApi for MockGl {
    type Shader = u32;
    type Program = u32;
    type Buffer = u32;
    type VertexArray = u32;

    fn context_version(&self) -> Option<ContextVersion> {
        self.version
    }

    fn renderer_info(&self) -> String {
        "mock".to_string()
    }

    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32) {
        self.record(Call::ClearColor([r, g, b, a]));
    }

    fn clear_depth(&self, _depth: f64) {
        self.record(Call::ClearDepth);
    }

    fn depth_func(&self, func: u32) {
        self.record(Call::DepthFunc(func));
    }

    fn enable(&self, capability: u32) {
        self.record(Call::Enable(capability));
    }

    fn disable(&self, capability: u32) {
        self.record(Call::Disable(capability));
    }

    fn blend_func(&self, src: u32, dst: u32) {
        self.record(Call::BlendFunc(src, dst));
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        self.record(Call::Viewport(x, y, width, height));
    }

    fn get_error(&self) -> u32 {
        self.record(Call::GetError);
        self.pending_error.replace(glow::NO_ERROR)
    }

    fn clear(&self, mask: u32) {
        self.record(Call::Clear(mask));
    }

    fn draw_arrays(&self, mode: u32, first: i32, count: i32) {
        self.record(Call::DrawArrays { mode, first, count });
        let draws = self.draws.get() + 1;
        self.draws.set(draws);
        if self.error_after_draw == Some(draws) {
            self.pending_error.set(glow::INVALID_OPERATION);
        }
    }

    fn create_shader(&self, _stage: u32) -> Result<u32, String> {
        let handle = self.handle();
        self.record(Call::CreateShader(handle));
        Ok(handle)
    }

    fn shader_source(&self, shader: u32, _source: &str) {
        self.record(Call::ShaderSource(shader));
    }

    fn compile_shader(&self, shader: u32) {
        self.record(Call::CompileShader(shader));
    }

    fn shader_compile_status(&self, _shader: u32) -> bool {
        !self.fail_compile
    }

    fn shader_info_log(&self, _shader: u32) -> String {
        "0:1(1): error: syntax error".to_string()
    }

    fn delete_shader(&self, shader: u32) {
        self.record(Call::DeleteShader(shader));
    }

    fn create_program(&self) -> Result<u32, String> {
        let handle = self.handle();
        self.record(Call::CreateProgram(handle));
        Ok(handle)
    }

    fn attach_shader(&self, program: u32, shader: u32) {
        self.record(Call::AttachShader(program, shader));
    }

    fn detach_shader(&self, program: u32, shader: u32) {
        self.record(Call::DetachShader(program, shader));
    }

    fn link_program(&self, program: u32) {
        self.record(Call::LinkProgram(program));
    }

    fn program_link_status(&self, _program: u32) -> bool {
        !self.fail_link
    }

    fn program_info_log(&self, _program: u32) -> String {
        "error: unresolved varying".to_string()
    }

    fn use_program(&self, program: Option<u32>) {
        self.record(Call::UseProgram(program));
    }

    fn delete_program(&self, program: u32) {
        self.record(Call::DeleteProgram(program));
    }

    fn create_vertex_array(&self) -> Result<u32, String> {
        let handle = self.handle();
        self.record(Call::CreateVertexArray(handle));
        Ok(handle)
    }

    fn bind_vertex_array(&self, vertex_array: Option<u32>) {
        self.record(Call::BindVertexArray(vertex_array));
    }

    fn delete_vertex_array(&self, vertex_array: u32) {
        self.record(Call::DeleteVertexArray(vertex_array));
    }

    fn create_buffer(&self) -> Result<u32, String> {
        let handle = self.handle();
        self.record(Call::CreateBuffer(handle));
        Ok(handle)
    }

    fn bind_buffer(&self, target: u32, buffer: Option<u32>) {
        self.record(Call::BindBuffer(target, buffer));
    }

    fn buffer_data_u8_slice(&self, target: u32, data: &[u8], _usage: u32) {
        self.record(Call::BufferData { target, len: data.len() });
    }

    fn delete_buffer(&self, buffer: u32) {
        self.record(Call::DeleteBuffer(buffer));
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        self.record(Call::EnableVertexAttribArray(index));
    }

    fn vertex_attrib_pointer_f32(
        &self,
        index: u32,
        size: i32,
        _normalized: bool,
        stride: i32,
        offset: i32,
    ) {
        self.record(Call::VertexAttribPointer { index, size, stride, offset });
    }
}

/// Provider double with a fixed client area.
#[derive(Debug)]
pub(crate) struct MockProvider {
    log: CallLog,
    client_size: Cell<(f64, f64)>,
    content_scale: f64,
    fail_make_current: bool,
    fail_swap: bool,
    context: Option<(CurrentContext, u32)>,
}

impl MockProvider {
    pub(crate) fn new(log: CallLog) -> Self {
        Self {
            log,
            client_size: Cell::new((480.0, 400.0)),
            content_scale: 1.0,
            fail_make_current: false,
            fail_swap: false,
            context: None,
        }
    }

    /// Activating this provider makes context `id` current.
    pub(crate) fn on_context(mut self, current: &CurrentContext, id: u32) -> Self {
        self.context = Some((current.clone(), id));
        self
    }

    pub(crate) fn with_scale(mut self, content_scale: f64) -> Self {
        self.content_scale = content_scale;
        self
    }

    pub(crate) fn failing_make_current(mut self) -> Self {
        self.fail_make_current = true;
        self
    }

    pub(crate) fn failing_swap(mut self) -> Self {
        self.fail_swap = true;
        self
    }

    pub(crate) fn set_client_size(&self, width: f64, height: f64) {
        self.client_size.set((width, height));
    }
}

impl ContextProvider for MockProvider {
    fn make_current(&self) -> Result<(), Error> {
        self.log.borrow_mut().push(Call::MakeCurrent);
        if self.fail_make_current {
            return Err(Error::context_activation_failed("surface lost"));
        }
        if let Some((current, id)) = &self.context {
            current.set(Some(*id));
        }
        Ok(())
    }

    fn resize(&self, width: u32, height: u32) {
        self.log.borrow_mut().push(Call::ResizeSurface(width, height));
    }

    fn swap_buffers(&self) -> Result<(), Error> {
        self.log.borrow_mut().push(Call::SwapBuffers);
        if self.fail_swap {
            return Err(Error::swap_buffers_failed("surface lost"));
        }
        Ok(())
    }

    fn client_size(&self) -> (f64, f64) {
        self.client_size.get()
    }

    fn content_scale(&self) -> f64 {
        self.content_scale
    }

    fn request_redraw(&self) {
        self.log.borrow_mut().push(Call::RequestRedraw);
    }
}
