//! Surfaces and contexts owned by the windowing toolkit.
//!
//! The toolkit allocates the drawable surface and its GL context; this crate
//! only borrows them through [`ContextProvider`]. Pixel-format selection is
//! kept here as plain data so it can be shared by every toolkit backend.

use crate::error::Error;

/// A window-system surface with an associated GL context.
///
/// Implementations own both. Dropping the provider destroys the context and
/// the surface, so it must outlive every [`GlBinding`](crate::gl::GlBinding)
/// created against it.
pub trait ContextProvider {
    /// Makes this surface's context current on the calling thread.
    ///
    /// # Errors
    /// Returns [`Error::Context`] if the window system refuses the switch.
    fn make_current(&self) -> Result<(), Error>;

    /// Resizes the drawable to `width` x `height` physical pixels.
    fn resize(&self, width: u32, height: u32);

    /// Presents the back buffer.
    ///
    /// # Errors
    /// Returns [`Error::Context`] if presenting fails.
    fn swap_buffers(&self) -> Result<(), Error>;

    /// Client area in logical units.
    fn client_size(&self) -> (f64, f64);

    /// Ratio between physical pixels and logical units.
    fn content_scale(&self) -> f64;

    /// Asks the toolkit to deliver a paint event soon.
    fn request_redraw(&self);
}

/// Context profile requested from the window system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Profile {
    /// Core profile, no deprecated functionality.
    #[default]
    Core,
    /// Compatibility profile.
    Compatibility,
}

/// Minimum API version and profile of the requested context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiVersion {
    /// Major version.
    pub major: u8,
    /// Minor version.
    pub minor: u8,
    /// Requested profile.
    pub profile: Profile,
}

impl Default for ApiVersion {
    fn default() -> Self {
        Self { major: 3, minor: 3, profile: Profile::Core }
    }
}

/// Requested pixel format. Channel and depth sizes are minimums.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelFormat {
    /// Red channel bits.
    pub red: u8,
    /// Green channel bits.
    pub green: u8,
    /// Blue channel bits.
    pub blue: u8,
    /// Alpha channel bits.
    pub alpha: u8,
    /// Depth buffer bits.
    pub depth: u8,
    /// Requests a back buffer.
    pub double_buffer: bool,
    /// Multisample count; `None` disables multisampling.
    pub samples: Option<u8>,
}

impl Default for PixelFormat {
    fn default() -> Self {
        Self {
            red: 8,
            green: 8,
            blue: 8,
            alpha: 8,
            depth: 24,
            double_buffer: true,
            samples: None,
        }
    }
}

impl PixelFormat {
    /// Returns true if `config` meets every minimum of this format.
    #[must_use]
    pub fn satisfied_by(&self, config: &ConfigInfo) -> bool {
        config.red >= self.red
            && config.green >= self.green
            && config.blue >= self.blue
            && config.alpha >= self.alpha
            && config.depth >= self.depth
            && self.samples.is_none_or(|s| config.samples >= s)
    }
}

/// Everything needed to allocate a surface and its context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SurfaceAttributes {
    /// Framebuffer requirements.
    pub pixel_format: PixelFormat,
    /// Context version and profile.
    pub api: ApiVersion,
}

/// A framebuffer configuration offered by the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConfigInfo {
    /// Red channel bits.
    pub red: u8,
    /// Green channel bits.
    pub green: u8,
    /// Blue channel bits.
    pub blue: u8,
    /// Alpha channel bits.
    pub alpha: u8,
    /// Depth buffer bits.
    pub depth: u8,
    /// Multisample count, 0 without multisampling.
    pub samples: u8,
}

/// Outcome of [`pick_config`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigChoice {
    /// Index of a configuration satisfying the request.
    Matched(usize),
    /// Nothing satisfied the request; index of the display's default.
    Fallback(usize),
}

/// Picks a configuration for `format` among `candidates`.
///
/// Satisfying candidates win; among them an exact sample count is preferred,
/// then the highest sample count. Without any satisfying candidate the first
/// one offered is used. Returns `None` only for an empty candidate list.
#[must_use]
pub fn pick_config(candidates: &[ConfigInfo], format: &PixelFormat) -> Option<ConfigChoice> {
    if candidates.is_empty() {
        return None;
    }

    let wanted = format.samples.unwrap_or(0);
    let best = candidates
        .iter()
        .enumerate()
        .filter(|(_, c)| format.satisfied_by(c))
        .max_by_key(|&(idx, c)| {
            // earliest index wins ties
            (c.samples == wanted, c.samples, std::cmp::Reverse(idx))
        })
        .map(|(idx, _)| idx);

    Some(match best {
        Some(idx) => ConfigChoice::Matched(idx),
        None => ConfigChoice::Fallback(0),
    })
}

/// Viewport for a client area, in physical pixels.
///
/// Returns `None` when either dimension rounds to zero.
#[must_use]
pub fn viewport_size(client: (f64, f64), content_scale: f64) -> Option<(i32, i32)> {
    let width = (client.0 * content_scale).round();
    let height = (client.1 * content_scale).round();
    (width >= 1.0 && height >= 1.0).then_some((width as i32, height as i32))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(depth: u8, alpha: u8, samples: u8) -> ConfigInfo {
        ConfigInfo { red: 8, green: 8, blue: 8, alpha, depth, samples }
    }

    #[test]
    fn test_pick_prefers_satisfying_config() {
        let candidates = [config(16, 8, 0), config(24, 8, 0), config(24, 0, 0)];
        let choice = pick_config(&candidates, &PixelFormat::default());
        assert_eq!(choice, Some(ConfigChoice::Matched(1)));
    }

    #[test]
    fn test_pick_exact_sample_count() {
        let candidates = [config(24, 8, 0), config(24, 8, 8), config(24, 8, 4)];
        let format = PixelFormat { samples: Some(4), ..PixelFormat::default() };
        assert_eq!(pick_config(&candidates, &format), Some(ConfigChoice::Matched(2)));

        let format = PixelFormat { samples: Some(2), ..PixelFormat::default() };
        assert_eq!(pick_config(&candidates, &format), Some(ConfigChoice::Matched(1)));
    }

    #[test]
    fn test_pick_without_multisampling_prefers_single_sample() {
        let candidates = [config(24, 8, 4), config(24, 8, 0)];
        assert_eq!(
            pick_config(&candidates, &PixelFormat::default()),
            Some(ConfigChoice::Matched(1))
        );
    }

    #[test]
    fn test_pick_falls_back_to_default() {
        let candidates = [config(16, 0, 0), config(16, 8, 0)];
        let choice = pick_config(&candidates, &PixelFormat::default());
        assert_eq!(choice, Some(ConfigChoice::Fallback(0)));
        assert_eq!(pick_config(&[], &PixelFormat::default()), None);
    }

    #[test]
    fn test_viewport_scales_client_size() {
        assert_eq!(viewport_size((480.0, 400.0), 1.0), Some((480, 400)));
        assert_eq!(viewport_size((480.0, 400.0), 2.0), Some((960, 800)));
        assert_eq!(viewport_size((100.0, 50.0), 1.5), Some((150, 75)));
    }

    #[test]
    fn test_viewport_skips_empty_client_area() {
        assert_eq!(viewport_size((0.0, 400.0), 2.0), None);
        assert_eq!(viewport_size((480.0, 0.0), 1.0), None);
        assert_eq!(viewport_size((0.0, 0.0), 1.0), None);
    }
}
