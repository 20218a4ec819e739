//! Preview session and a headless back end
//!
//! [`PreviewSession`] drives the rendering collaborators from user-level
//! operations (change text, texture, shader, filters). [`HeadlessBackend`],
//! [`ImageTextureLoader`] and the shader lookups in [`crate::render::shader`]
//! let the whole pipeline run without a graphics context.

pub mod headless;
pub mod session;

pub use headless::{HeadlessBackend, ImageTextureLoader};
pub use session::{PreviewSession, PreviewState, SessionChanges, SessionError};

#[cfg(test)]
mod test_resource_pipeline;
