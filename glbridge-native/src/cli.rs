use std::path::PathBuf;

use clap::Parser;
use color_eyre::{Report, eyre::eyre};
use glbridge_core::{
    ApiVersion, CanvasConfig, Feature, PixelFormat, SceneKind, ShaderSources, SurfaceAttributes,
};

/// Smallest client area the window may be resized to.
pub const MIN_CLIENT_SIZE: (u32, u32) = (312, 72);

#[derive(Parser, Debug)]
#[command(
    name = "glbridge",
    about = "Draws into a GL context borrowed from the window system",
    long_about = "Creates a window with a GL 3.3 core context, hands the context to glow and \
                  renders a vertex-coloured triangle on every paint event"
)]
pub struct Cli {
    /// Scene to draw: triangle or cube (placeholder)
    #[arg(long, default_value = "triangle", value_name = "SCENE")]
    pub scene: SceneKind,

    /// Window title
    #[arg(long, default_value = "OpenGL 01: Triangle")]
    pub title: String,

    /// Initial client width in logical pixels
    #[arg(long, default_value = "480", value_name = "PX")]
    pub width: u32,

    /// Initial client height in logical pixels
    #[arg(long, default_value = "480", value_name = "PX")]
    pub height: u32,

    /// Multisample count; 0 disables multisampling
    #[arg(long, default_value = "0", value_name = "N")]
    pub samples: u8,

    /// Background colour as hex RRGGBB
    #[arg(long, default_value = "6093ac", value_parser = parse_hex_color, value_name = "RRGGBB")]
    pub background: [f32; 4],

    /// Enable alpha blending
    #[arg(long)]
    pub blend: bool,

    /// Synchronize buffer swaps with the display refresh
    #[arg(long)]
    pub vsync: bool,

    /// Directory containing vertex.glsl and fragment.glsl
    #[arg(long, value_name = "DIR", default_value = concat!(env!("CARGO_MANIFEST_DIR"), "/shaders"))]
    pub shader_dir: PathBuf,

    /// Texture to apply to the scene (not implemented)
    #[arg(long, value_name = "PATH")]
    pub texture: Option<PathBuf>,
}

impl Cli {
    /// Validates the CLI arguments
    pub fn validate(&self) -> Result<(), Report> {
        if self.width < MIN_CLIENT_SIZE.0 || self.height < MIN_CLIENT_SIZE.1 {
            return Err(eyre!(
                "Window size must be at least {}x{}",
                MIN_CLIENT_SIZE.0,
                MIN_CLIENT_SIZE.1
            ));
        }

        if self.samples > 0 && !self.samples.is_power_of_two() {
            return Err(eyre!("Sample count must be a power of two, got {}", self.samples));
        }

        if self.scene.needs_shaders() && !self.shader_dir.is_dir() {
            return Err(eyre!(
                "Shader directory does not exist: {}",
                self.shader_dir.display()
            ));
        }

        Ok(())
    }

    /// Pixel format and context version requested from the window system.
    pub fn surface_attributes(&self) -> SurfaceAttributes {
        SurfaceAttributes {
            pixel_format: PixelFormat {
                samples: (self.samples > 0).then_some(self.samples),
                ..PixelFormat::default()
            },
            api: ApiVersion::default(),
        }
    }

    /// Canvas configuration, loading shader sources when the scene needs them.
    pub fn canvas_config(&self) -> Result<CanvasConfig, Report> {
        let shaders = if self.scene.needs_shaders() {
            Some(ShaderSources::from_files(
                &self.shader_dir.join("vertex.glsl"),
                &self.shader_dir.join("fragment.glsl"),
            )?)
        } else {
            None
        };

        let features = self
            .texture
            .iter()
            .map(|_| Feature::Textures)
            .collect();

        Ok(CanvasConfig {
            scene: self.scene,
            background: self.background,
            blending: self.blend,
            shaders,
            features,
        })
    }
}

fn parse_hex_color(s: &str) -> Result<[f32; 4], String> {
    let hex = s.trim_start_matches('#');
    if hex.len() != 6 {
        return Err(format!("Invalid colour '{s}'. Expected format: RRGGBB"));
    }

    let value =
        u32::from_str_radix(hex, 16).map_err(|_| format!("Invalid hexadecimal colour: {s}"))?;
    let channel = |shift: u32| ((value >> shift) & 0xff) as f32 / 255.0;

    Ok([channel(16), channel(8), channel(0), 1.0])
}
