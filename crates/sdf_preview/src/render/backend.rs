//! Mesh back-end capability and the values passed to it

use std::sync::Arc;

use super::camera::Camera;
use super::text::LayoutResult;
use super::texture::{LoadedTexture, SamplerState, TextureHandle};
use super::RenderError;
use crate::core::config::PreviewConfig;
use crate::foundation::math::Vec2;

/// Texture bound to the `iTexture` uniform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureBinding {
    /// Bound texture
    pub handle: TextureHandle,
    /// Sampler filters for the texture
    pub sampler: SamplerState,
}

/// Uniform values consumed by the preview shaders
///
/// Field names map to the GLSL uniforms `iResolution`, `iTexture` and
/// `iTextureSize`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShaderUniforms {
    /// Viewport size in pixels
    pub i_resolution: Vec2,
    /// Atlas texture and sampler
    pub i_texture: TextureBinding,
    /// Atlas size in pixels
    pub i_texture_size: Vec2,
}

impl ShaderUniforms {
    /// Uniforms for a freshly loaded texture
    pub fn new(resolution: Vec2, texture: &LoadedTexture, sampler: SamplerState) -> Self {
        Self {
            i_resolution: resolution,
            i_texture: TextureBinding {
                handle: texture.handle,
                sampler,
            },
            i_texture_size: texture_size(texture),
        }
    }

    /// Same uniforms with a different texture, keeping the current sampler
    pub fn with_texture(self, texture: &LoadedTexture) -> Self {
        Self {
            i_texture: TextureBinding {
                handle: texture.handle,
                sampler: self.i_texture.sampler,
            },
            i_texture_size: texture_size(texture),
            ..self
        }
    }

    /// Same uniforms with a different sampler
    pub fn with_sampler(self, sampler: SamplerState) -> Self {
        Self {
            i_texture: TextureBinding {
                sampler,
                ..self.i_texture
            },
            ..self
        }
    }
}

fn texture_size(texture: &LoadedTexture) -> Vec2 {
    Vec2::new(texture.width as f32, texture.height as f32)
}

/// One-time scene description sent when a session starts
#[derive(Debug, Clone, PartialEq)]
pub struct SceneSetup {
    /// Viewport width in pixels
    pub width: u32,
    /// Viewport height in pixels
    pub height: u32,
    /// Clear colour as 0xRRGGBB
    pub clear_color: u32,
    /// Initial camera
    pub camera: Camera,
    /// Render both faces of the text quads
    pub double_sided: bool,
    /// Alpha-blend the text material
    pub transparent: bool,
}

impl SceneSetup {
    /// Scene described by a preview configuration
    pub fn from_config(config: &PreviewConfig) -> Self {
        let width = config.window.width;
        let height = config.window.height;
        Self {
            width,
            height,
            clear_color: config.window.clear_color,
            camera: Camera::from_config(&config.camera, width as f32 / height.max(1) as f32),
            double_sided: true,
            transparent: true,
        }
    }

    /// Viewport size as a vector, for `iResolution`
    pub fn resolution(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }
}

/// Receives geometry and material state and draws the text mesh
pub trait MeshBackend {
    /// Create the scene, camera and controls
    fn configure_scene(&mut self, setup: &SceneSetup) -> Result<(), RenderError>;

    /// Replace the mesh's `position` and `uv` attributes
    fn upload_geometry(&mut self, layout: Arc<LayoutResult>) -> Result<(), RenderError>;

    /// Set the vertex shader shared by all fragment shaders
    fn set_vertex_shader(&mut self, source: &str) -> Result<(), RenderError>;

    /// Swap the fragment shader and rebuild the material
    fn set_fragment_shader(&mut self, source: &str) -> Result<(), RenderError>;

    /// Replace the uniform values
    fn set_uniforms(&mut self, uniforms: &ShaderUniforms) -> Result<(), RenderError>;

    /// Draw one frame
    fn render(&mut self) -> Result<(), RenderError>;
}
