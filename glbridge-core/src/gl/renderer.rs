use crate::gl::GlApi;

/// Trait for objects that can be rendered.
///
/// Callers make the owning context current and bind the shader program
/// before `prepare`.
pub trait Drawable<G: GlApi> {
    /// Prepares the object for rendering.
    ///
    /// Binds the vertex array the draw call reads.
    fn prepare(&self, gl: &G);

    /// Performs the actual rendering.
    ///
    /// Issues the draw calls; all state was set up by `prepare()`.
    fn draw(&self, gl: &G);

    /// Releases the GPU resources owned by the object.
    fn delete(&self, gl: &G);
}
