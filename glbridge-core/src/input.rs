/// Cursor movement between two consecutive drag events, in logical units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragDelta {
    /// Horizontal movement, positive to the right.
    pub dx: f64,
    /// Vertical movement, positive downwards.
    pub dy: f64,
}

impl DragDelta {
    /// Rotation in degrees, where dragging across the full viewport turns
    /// 180 degrees. Returns `(about_x, about_y)`; extents are clamped to 1.
    #[must_use]
    pub fn rotation_degrees(&self, viewport: (i32, i32)) -> (f64, f64) {
        let width = f64::from(viewport.0.max(1));
        let height = f64::from(viewport.1.max(1));
        (self.dy * 180.0 / height, self.dx * 180.0 / width)
    }
}

/// Tracks the last and current cursor position of a left-button drag.
#[derive(Debug, Clone, Copy)]
pub struct DragTracker {
    last: (f64, f64),
    current: (f64, f64),
    captured: bool,
}

impl Default for DragTracker {
    fn default() -> Self {
        Self { last: (30.0, 30.0), current: (30.0, 30.0), captured: false }
    }
}

impl DragTracker {
    /// Starts a drag at `(x, y)`.
    pub fn press(&mut self, x: f64, y: f64) {
        self.captured = true;
        self.last = (x, y);
        self.current = (x, y);
    }

    /// Ends the current drag.
    pub fn release(&mut self) {
        self.captured = false;
    }

    /// Moves the cursor; yields a delta only while dragging with the left
    /// button held after a press on this canvas.
    pub fn motion(&mut self, x: f64, y: f64, left_down: bool) -> Option<DragDelta> {
        if !(self.captured && left_down) {
            return None;
        }

        self.last = self.current;
        self.current = (x, y);
        Some(DragDelta {
            dx: self.current.0 - self.last.0,
            dy: self.current.1 - self.last.1,
        })
    }

    /// Latest cursor position.
    #[must_use]
    pub fn position(&self) -> (f64, f64) {
        self.current
    }

    /// Cursor position before the latest motion.
    #[must_use]
    pub fn last_position(&self) -> (f64, f64) {
        self.last
    }
}
