//! # Preview Configuration
//!
//! One serializable structure describing everything a preview session needs:
//! viewport, atlas assets, layout parameters, selectable textures and shaders,
//! and the camera placement handed to the rendering back end.
//!
//! Files are TOML or RON; see [`Config`](crate::config::Config).

use serde::{Deserialize, Serialize};

use crate::config::{Config, ConfigError};
use crate::render::text::LayoutParams;

/// Viewport settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Viewport width in pixels
    pub width: u32,
    /// Viewport height in pixels
    pub height: u32,
    /// Clear colour as 0xRRGGBB
    pub clear_color: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 600,
            height: 400,
            clear_color: 0x00F0_F0F0,
        }
    }
}

/// Glyph atlas assets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtlasConfig {
    /// Edge length of the square atlas texture in pixels
    pub dimension: f32,
    /// Path to the glyph metadata table (JSON or RON)
    pub metadata_path: String,
    /// Path to the glyph metrics table (JSON or RON)
    pub metrics_path: String,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            dimension: 512.0,
            metadata_path: "resources/glyphs/metadata.json".to_string(),
            metrics_path: "resources/glyphs/metrics.json".to_string(),
        }
    }
}

/// Layout settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Uniform layout scale, passed straight through to the layout engine
    pub scale: f32,
    /// Text laid out when the session starts
    pub initial_text: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            scale: 1.0,
            initial_text: "Hello, world".to_string(),
        }
    }
}

/// Shader selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShaderSelectionConfig {
    /// Directory holding `<name>.vert` and `<name>.frag` sources
    pub directory: String,
    /// Vertex shader name
    pub vertex: String,
    /// Selectable fragment shader names; the first one is used at start-up
    pub fragments: Vec<String>,
}

impl Default for ShaderSelectionConfig {
    fn default() -> Self {
        Self {
            directory: "resources/shaders".to_string(),
            vertex: "vertexShader".to_string(),
            fragments: vec!["msdfFragmentShader".to_string()],
        }
    }
}

/// Perspective camera placement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    /// Near clipping plane
    pub near: f32,
    /// Far clipping plane
    pub far: f32,
    /// Eye position
    pub position: [f32; 3],
    /// Look-at target
    pub target: [f32; 3],
    /// Up direction
    pub up: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 45.0,
            near: 1.0,
            far: 10_000.0,
            position: [0.0, 20.0, 100.0],
            target: [0.0, 0.0, 0.0],
            up: [0.0, 1.0, 0.0],
        }
    }
}

/// Complete preview configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    /// Viewport settings
    pub window: WindowConfig,
    /// Atlas assets
    pub atlas: AtlasConfig,
    /// Layout settings
    pub layout: LayoutConfig,
    /// Selectable atlas textures; the first one is used at start-up
    pub textures: Vec<String>,
    /// Shader selection
    pub shaders: ShaderSelectionConfig,
    /// Camera placement
    pub camera: CameraConfig,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            atlas: AtlasConfig::default(),
            layout: LayoutConfig::default(),
            textures: vec!["resources/texture0.png".to_string()],
            shaders: ShaderSelectionConfig::default(),
            camera: CameraConfig::default(),
        }
    }
}

impl Config for PreviewConfig {}

impl PreviewConfig {
    /// Check that the values are usable together
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "window size must be non-zero, got {}x{}",
                self.window.width, self.window.height
            )));
        }
        if !(self.atlas.dimension.is_finite() && self.atlas.dimension > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "atlas dimension must be positive, got {}",
                self.atlas.dimension
            )));
        }
        if !(self.layout.scale.is_finite() && self.layout.scale > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "layout scale must be positive, got {}",
                self.layout.scale
            )));
        }
        if self.textures.is_empty() {
            return Err(ConfigError::Invalid("no textures configured".to_string()));
        }
        if self.shaders.fragments.is_empty() {
            return Err(ConfigError::Invalid("no fragment shaders configured".to_string()));
        }
        Ok(())
    }

    /// Layout parameters derived from the atlas and layout sections
    pub fn layout_params(&self) -> LayoutParams {
        LayoutParams {
            atlas_dimension: self.atlas.dimension,
            scale: self.layout.scale,
        }
    }

    /// Texture selected at start-up
    pub fn initial_texture(&self) -> Option<&str> {
        self.textures.first().map(String::as_str)
    }

    /// Fragment shader selected at start-up
    pub fn initial_fragment_shader(&self) -> Option<&str> {
        self.shaders.fragments.first().map(String::as_str)
    }
}
