use std::mem::{offset_of, size_of};

use crate::{
    error::Error,
    gl::{Drawable, GlApi, buffer_upload_array},
};

/// Interleaved vertex: position followed by colour.
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
pub struct ColorVertex {
    /// Clip-space position.
    pub position: [f32; 3],
    /// Linear RGB.
    pub color: [f32; 3],
}

impl ColorVertex {
    const POSITION_LOCATION: u32 = 0;
    const COLOR_LOCATION: u32 = 1;
    const STRIDE: i32 = size_of::<Self>() as i32;
}

/// Yep, it's a triangle.
const TRIANGLE_VERTICES: [ColorVertex; 3] = [
    ColorVertex { position: [-0.5, -0.5, 0.0], color: [1.0, 0.3, 0.0] },
    ColorVertex { position: [0.5, -0.5, 0.0], color: [0.7, 0.9, 0.0] },
    ColorVertex { position: [0.0, 0.5, 0.0], color: [0.1, 0.3, 0.5] },
];

/// A vertex-coloured triangle in its own vertex array.
#[derive(Debug)]
#[must_use = "call `delete(gl)` before dropping to avoid GPU resource leaks"]
pub struct Triangle<G: GlApi> {
    vao: G::VertexArray,
    vbo: G::Buffer,
    vertex_count: i32,
}

impl<G: GlApi> Triangle<G> {
    /// Uploads the vertices and records the attribute layout in a new VAO.
    ///
    /// # Errors
    /// Returns [`Error::Resource`] if the vertex array or buffer cannot be
    /// created.
    pub fn new(gl: &G) -> Result<Self, Error> {
        let vao = gl
            .create_vertex_array()
            .map_err(|e| Error::vertex_array_creation_failed(&e))?;
        gl.bind_vertex_array(Some(vao));

        let vbo = match gl.create_buffer() {
            Ok(vbo) => vbo,
            Err(e) => {
                gl.bind_vertex_array(None);
                gl.delete_vertex_array(vao);
                return Err(Error::buffer_creation_failed("vertex", &e));
            },
        };
        gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
        buffer_upload_array(gl, glow::ARRAY_BUFFER, &TRIANGLE_VERTICES, glow::STATIC_DRAW);

        let stride = ColorVertex::STRIDE;
        gl.enable_vertex_attrib_array(ColorVertex::POSITION_LOCATION);
        gl.vertex_attrib_pointer_f32(
            ColorVertex::POSITION_LOCATION,
            3,
            false,
            stride,
            offset_of!(ColorVertex, position) as i32,
        );

        gl.enable_vertex_attrib_array(ColorVertex::COLOR_LOCATION);
        gl.vertex_attrib_pointer_f32(
            ColorVertex::COLOR_LOCATION,
            3,
            false,
            stride,
            offset_of!(ColorVertex, color) as i32,
        );

        // Unbind VAO to prevent accidental modification
        gl.bind_vertex_array(None);

        Ok(Self {
            vao,
            vbo,
            vertex_count: TRIANGLE_VERTICES.len() as i32,
        })
    }

    /// Number of vertices drawn.
    #[must_use]
    pub fn vertex_count(&self) -> i32 {
        self.vertex_count
    }
}

impl<G: GlApi> Drawable<G> for Triangle<G> {
    fn prepare(&self, gl: &G) {
        gl.bind_vertex_array(Some(self.vao));
    }

    fn draw(&self, gl: &G) {
        gl.draw_arrays(glow::TRIANGLES, 0, self.vertex_count);
    }

    fn delete(&self, gl: &G) {
        gl.delete_vertex_array(self.vao);
        gl.delete_buffer(self.vbo);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{Call, MockGl, ResourceLedger, new_log};

    #[test]
    fn test_vertex_layout() {
        assert_eq!(ColorVertex::STRIDE, 24);
        assert_eq!(offset_of!(ColorVertex, position), 0);
        assert_eq!(offset_of!(ColorVertex, color), 12);
    }

    #[test]
    fn test_new_describes_interleaved_attributes() {
        let log = new_log();
        let gl = MockGl::new(log.clone());

        let triangle = Triangle::new(&gl).expect("triangle");
        assert_eq!(triangle.vertex_count(), 3);

        let calls = log.borrow();
        assert!(calls.contains(&Call::BufferData { target: glow::ARRAY_BUFFER, len: 72 }));
        assert!(calls.contains(&Call::VertexAttribPointer {
            index: 0,
            size: 3,
            stride: 24,
            offset: 0
        }));
        assert!(calls.contains(&Call::VertexAttribPointer {
            index: 1,
            size: 3,
            stride: 24,
            offset: 12
        }));
        assert_eq!(calls.last(), Some(&Call::BindVertexArray(None)));
    }

    #[test]
    fn test_delete_releases_vao_and_vbo() {
        let log = new_log();
        let gl = MockGl::new(log.clone());

        let triangle = Triangle::new(&gl).expect("triangle");
        triangle.delete(&gl);

        let ledger = ResourceLedger::from_log(&log.borrow());
        assert!(ledger.is_balanced());
        assert_eq!(ledger.created.len(), 2);
    }
}
