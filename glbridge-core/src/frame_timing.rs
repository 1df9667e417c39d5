use std::{
    fmt,
    time::{Duration, Instant},
};

/// Reported when the previous frame is unknown or too far in the past.
pub const NOMINAL_FRAMETIME_MS: f64 = 10.0;

/// Deltas above this are stalls (window drags, suspended loops), not frames.
const OUTLIER_THRESHOLD_MS: f64 = 1000.0;

/// Frame duration and the rate derived from it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStats {
    /// Time since the previous frame, in milliseconds.
    pub frametime_ms: f64,
    /// Frames per second derived from `frametime_ms`.
    pub fps: u32,
}

impl FrameStats {
    fn from_delta(delta: Option<Duration>) -> Self {
        let frametime_ms = delta
            .map(|d| d.as_nanos() as f64 / 1_000_000.0)
            .filter(|&ms| ms <= OUTLIER_THRESHOLD_MS)
            .unwrap_or(NOMINAL_FRAMETIME_MS);

        // saturates to u32::MAX for a zero delta
        let fps = (1000.0 / frametime_ms) as u32;
        Self { frametime_ms, fps }
    }
}

impl fmt::Display for FrameStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Frametime: {:.3} ms, FPS: {}", self.frametime_ms, self.fps)
    }
}

/// Measures the time between consecutive presented frames.
#[derive(Debug, Default, Clone, Copy)]
pub struct FrameTimer {
    last_frame: Option<Instant>,
}

impl FrameTimer {
    /// Records a frame presented at `now`.
    pub fn tick_at(&mut self, now: Instant) -> FrameStats {
        let delta = self
            .last_frame
            .map(|last| now.saturating_duration_since(last));
        self.last_frame = Some(now);
        FrameStats::from_delta(delta)
    }

    /// Records a frame presented now.
    pub fn tick(&mut self) -> FrameStats {
        self.tick_at(Instant::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_frame_reports_nominal() {
        let mut timer = FrameTimer::default();
        let stats = timer.tick_at(Instant::now());
        assert_eq!(stats.frametime_ms, NOMINAL_FRAMETIME_MS);
        assert_eq!(stats.fps, 100);
    }

    #[test]
    fn test_regular_frame() {
        let mut timer = FrameTimer::default();
        let t0 = Instant::now();
        timer.tick_at(t0);

        let stats = timer.tick_at(t0 + Duration::from_millis(20));
        assert!((stats.frametime_ms - 20.0).abs() < 1e-9);
        assert_eq!(stats.fps, 50);
    }

    #[test]
    fn test_stall_is_clamped_to_nominal() {
        let mut timer = FrameTimer::default();
        let t0 = Instant::now();
        timer.tick_at(t0);

        let stats = timer.tick_at(t0 + Duration::from_millis(1500));
        assert_eq!(stats.frametime_ms, NOMINAL_FRAMETIME_MS);

        // exactly one second is still a real frame
        let t1 = t0 + Duration::from_millis(1500);
        let stats = timer.tick_at(t1 + Duration::from_millis(1000));
        assert_eq!(stats.frametime_ms, 1000.0);
        assert_eq!(stats.fps, 1);
    }

    #[test]
    fn test_display_format() {
        let stats = FrameStats { frametime_ms: 16.6667, fps: 59 };
        assert_eq!(stats.to_string(), "Frametime: 16.667 ms, FPS: 59");
    }
}
