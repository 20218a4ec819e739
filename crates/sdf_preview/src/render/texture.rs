//! Texture handles, sampler filters and the texture loading capability

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::RenderError;

/// Opaque handle to a texture owned by a [`TextureLoader`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u64);

/// Texture sampling filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TextureFilter {
    /// Bilinear interpolation
    #[default]
    Linear,
    /// Nearest texel
    Nearest,
}

impl TextureFilter {
    /// All selectable filters, in menu order
    pub const ALL: [TextureFilter; 2] = [TextureFilter::Linear, TextureFilter::Nearest];

    /// Display name
    pub fn name(self) -> &'static str {
        match self {
            TextureFilter::Linear => "Linear",
            TextureFilter::Nearest => "Nearest",
        }
    }
}

impl fmt::Display for TextureFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error for unrecognized filter names
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown texture filter '{0}' (expected Linear or Nearest)")]
pub struct ParseFilterError(String);

impl FromStr for TextureFilter {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|filter| filter.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseFilterError(s.to_string()))
    }
}

/// Minification and magnification filters for one texture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SamplerState {
    /// Filter used when the texture is minified
    pub min_filter: TextureFilter,
    /// Filter used when the texture is magnified
    pub mag_filter: TextureFilter,
}

/// A texture that finished loading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadedTexture {
    /// Handle for binding the texture
    pub handle: TextureHandle,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

/// Loads textures by URL or path
pub trait TextureLoader {
    /// Load a texture; the returned handle stays valid while the loader lives
    fn load_texture(&mut self, url: &str) -> Result<LoadedTexture, RenderError>;
}
