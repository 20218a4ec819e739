//! Rendering collaborators
//!
//! The crate does not draw anything itself. It computes geometry and state and
//! hands them to implementations of the capability traits defined here:
//!
//! - [`TextureLoader`]: turns a texture URL into an opaque handle
//! - [`ShaderSource`]: resolves shader names to source text
//! - [`MeshBackend`]: receives geometry, shaders and uniforms, and draws

pub mod backend;
pub mod camera;
pub mod shader;
pub mod text;
pub mod texture;

pub use backend::{MeshBackend, SceneSetup, ShaderUniforms, TextureBinding};
pub use camera::Camera;
pub use shader::{ShaderDirectory, ShaderLibrary, ShaderSource};
pub use text::{LayoutParams, LayoutResult, TextLayout};
pub use texture::{LoadedTexture, SamplerState, TextureFilter, TextureHandle, TextureLoader};

use thiserror::Error;

/// Errors reported by rendering collaborators
#[derive(Error, Debug)]
pub enum RenderError {
    /// A texture could not be loaded
    #[error("Failed to load texture '{url}': {reason}")]
    TextureLoad {
        /// Requested texture
        url: String,
        /// Underlying failure
        reason: String,
    },

    /// No shader with the requested name
    #[error("Shader '{0}' not found")]
    ShaderNotFound(String),

    /// Back-end specific failure
    #[error("Render backend error: {0}")]
    Backend(String),
}
