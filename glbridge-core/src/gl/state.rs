use bitflags::bitflags;

use crate::gl::GlApi;

bitflags! {
    /// Server-side capabilities toggled by the render loop.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Capabilities: u8 {
        /// `GL_DEPTH_TEST`
        const DEPTH_TEST = 1 << 0;
        /// `GL_CULL_FACE`
        const CULL_FACE  = 1 << 1;
        /// `GL_BLEND`
        const BLEND      = 1 << 2;
    }
}

bitflags! {
    /// Buffers cleared at the start of a frame.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ClearBuffers: u32 {
        /// `GL_COLOR_BUFFER_BIT`
        const COLOR = glow::COLOR_BUFFER_BIT;
        /// `GL_DEPTH_BUFFER_BIT`
        const DEPTH = glow::DEPTH_BUFFER_BIT;
    }
}

impl Capabilities {
    fn gl_enum(self) -> u32 {
        if self == Self::DEPTH_TEST {
            glow::DEPTH_TEST
        } else if self == Self::CULL_FACE {
            glow::CULL_FACE
        } else {
            glow::BLEND
        }
    }
}

/// Manages simple GL state to reduce redundant state changes.
///
/// Setters only reach the context when the tracked value differs, which also
/// makes repeated setup sequences free of side effects.
#[derive(Debug, Clone, PartialEq)]
pub struct GlState {
    // [x, y, width, height]
    viewport: [i32; 4],
    clear_color: [f32; 4],
    clear_depth: f64,
    depth_func: u32,
    blend_func: (u32, u32),
    enabled: Capabilities,
}

impl Default for GlState {
    /// GL defaults for a fresh context.
    fn default() -> Self {
        Self {
            viewport: [0, 0, 0, 0],
            clear_color: [0.0, 0.0, 0.0, 0.0],
            clear_depth: 1.0,
            depth_func: glow::LESS,
            blend_func: (glow::ONE, glow::ZERO),
            enabled: Capabilities::empty(),
        }
    }
}

impl GlState {
    /// Set viewport dimensions
    pub fn viewport<G: GlApi>(
        &mut self,
        gl: &G,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    ) -> &mut Self {
        let new_viewport = [x, y, width, height];
        if self.viewport != new_viewport {
            gl.viewport(x, y, width, height);
            self.viewport = new_viewport;
        }
        self
    }

    /// Set clear color
    pub fn clear_color<G: GlApi>(&mut self, gl: &G, rgba: [f32; 4]) -> &mut Self {
        if self.clear_color != rgba {
            let [r, g, b, a] = rgba;
            gl.clear_color(r, g, b, a);
            self.clear_color = rgba;
        }
        self
    }

    /// Set depth clear value
    pub fn clear_depth<G: GlApi>(&mut self, gl: &G, depth: f64) -> &mut Self {
        if self.clear_depth != depth {
            gl.clear_depth(depth);
            self.clear_depth = depth;
        }
        self
    }

    /// Set depth comparison function
    pub fn depth_func<G: GlApi>(&mut self, gl: &G, func: u32) -> &mut Self {
        if self.depth_func != func {
            gl.depth_func(func);
            self.depth_func = func;
        }
        self
    }

    /// Set blend factors
    pub fn blend_func<G: GlApi>(&mut self, gl: &G, src: u32, dst: u32) -> &mut Self {
        if self.blend_func != (src, dst) {
            gl.blend_func(src, dst);
            self.blend_func = (src, dst);
        }
        self
    }

    /// Enable or disable capabilities
    pub fn set_enabled<G: GlApi>(
        &mut self,
        gl: &G,
        capabilities: Capabilities,
        enable: bool,
    ) -> &mut Self {
        for cap in capabilities.iter() {
            if self.enabled.contains(cap) != enable {
                if enable {
                    gl.enable(cap.gl_enum());
                } else {
                    gl.disable(cap.gl_enum());
                }
                self.enabled.set(cap, enable);
            }
        }
        self
    }

    /// Currently enabled capabilities
    #[must_use]
    pub fn enabled(&self) -> Capabilities {
        self.enabled
    }

    /// Current viewport as `[x, y, width, height]`.
    #[must_use]
    pub fn current_viewport(&self) -> [i32; 4] {
        self.viewport
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{Call, MockGl, new_log};

    #[test]
    fn test_redundant_changes_are_skipped() {
        let log = new_log();
        let gl = MockGl::new(log.clone());
        let mut state = GlState::default();

        state
            .viewport(&gl, 0, 0, 640, 480)
            .viewport(&gl, 0, 0, 640, 480)
            .clear_color(&gl, [0.5, 0.5, 0.5, 1.0])
            .clear_color(&gl, [0.5, 0.5, 0.5, 1.0])
            .clear_depth(&gl, 1.0);

        assert_eq!(
            *log.borrow(),
            vec![Call::Viewport(0, 0, 640, 480), Call::ClearColor([0.5, 0.5, 0.5, 1.0])]
        );
    }

    #[test]
    fn test_capabilities_toggle_once() {
        let log = new_log();
        let gl = MockGl::new(log.clone());
        let mut state = GlState::default();

        state.set_enabled(&gl, Capabilities::DEPTH_TEST | Capabilities::CULL_FACE, true);
        state.set_enabled(&gl, Capabilities::DEPTH_TEST, true);
        state.set_enabled(&gl, Capabilities::CULL_FACE, false);

        assert_eq!(
            *log.borrow(),
            vec![
                Call::Enable(glow::DEPTH_TEST),
                Call::Enable(glow::CULL_FACE),
                Call::Disable(glow::CULL_FACE),
            ]
        );
        assert_eq!(state.enabled(), Capabilities::DEPTH_TEST);
    }
}
