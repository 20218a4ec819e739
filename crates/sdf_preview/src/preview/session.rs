//! Preview session
//!
//! Owns the user-visible state of a preview and forwards every change to the
//! back end as an explicit value: a fresh `Arc<LayoutResult>` on text change,
//! a new [`ShaderUniforms`] on texture or filter change. Nothing is shared
//! mutably between the session and its collaborators.
//!
//! State is only committed after the back end accepted the change, so a failed
//! call leaves the session exactly as it was.

use std::sync::Arc;

use bitflags::bitflags;
use thiserror::Error;

use crate::core::config::PreviewConfig;
use crate::render::backend::{MeshBackend, SceneSetup, ShaderUniforms};
use crate::render::text::{LayoutResult, TextLayout};
use crate::render::texture::{SamplerState, TextureFilter, TextureLoader};
use crate::render::{RenderError, ShaderSource};

bitflags! {
    /// What a session operation changed
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SessionChanges: u8 {
        /// The current text
        const TEXT = 1 << 0;
        /// The uploaded mesh geometry
        const GEOMETRY = 1 << 1;
        /// The bound atlas texture
        const TEXTURE = 1 << 2;
        /// The fragment shader
        const SHADER = 1 << 3;
        /// Texture sampler filters
        const SAMPLER = 1 << 4;
        /// A frame was drawn
        const FRAME = 1 << 5;
    }
}

/// Session errors
#[derive(Error, Debug)]
pub enum SessionError {
    /// An operation ran before [`PreviewSession::initialize`]
    #[error("preview session is not initialized")]
    NotInitialized,

    /// A rendering collaborator failed
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Current user-visible state of an initialized session
#[derive(Debug, Clone)]
pub struct PreviewState {
    /// Text currently laid out
    pub text: String,
    /// Layout uploaded for `text`
    pub layout: Arc<LayoutResult>,
    /// Selected texture URL
    pub texture_url: String,
    /// Selected fragment shader name
    pub fragment_shader: String,
    /// Uniform values last sent to the back end
    pub uniforms: ShaderUniforms,
}

/// Orchestrates layout, texture, shader and back end for one preview
pub struct PreviewSession<L, S, B> {
    config: PreviewConfig,
    layout: TextLayout,
    loader: L,
    shaders: S,
    backend: B,
    state: Option<PreviewState>,
}

impl<L, S, B> PreviewSession<L, S, B>
where
    L: TextureLoader,
    S: ShaderSource,
    B: MeshBackend,
{
    /// Create an uninitialized session
    pub fn new(config: PreviewConfig, layout: TextLayout, loader: L, shaders: S, backend: B) -> Self {
        Self {
            config,
            layout,
            loader,
            shaders,
            backend,
            state: None,
        }
    }

    /// Build the scene, load the texture and shaders, and lay out the initial text
    ///
    /// Calling this again starts over with fresh state.
    pub fn initialize(&mut self, shader_name: &str, texture_url: &str) -> Result<SessionChanges, SessionError> {
        log::info!("Initializing preview: shader '{}', texture '{}'", shader_name, texture_url);
        if self.state.is_some() {
            log::warn!("Preview session re-initialized; previous state discarded");
        }

        let texture = self.loader.load_texture(texture_url)?;
        let setup = SceneSetup::from_config(&self.config);
        let uniforms = ShaderUniforms::new(setup.resolution(), &texture, SamplerState::default());
        let vertex = self.shaders.vertex_source()?;
        let fragment = self.shaders.fragment_source(shader_name)?;

        self.backend.configure_scene(&setup)?;
        self.backend.set_vertex_shader(&vertex)?;
        self.backend.set_fragment_shader(&fragment)?;
        self.backend.set_uniforms(&uniforms)?;

        let text = self.config.layout.initial_text.clone();
        let layout = Arc::new(self.layout.layout_text(&text));
        self.backend.upload_geometry(Arc::clone(&layout))?;

        log::info!(
            "Preview initialized: {}x{} texture, {} glyphs for {:?}",
            texture.width,
            texture.height,
            layout.glyph_count(),
            text
        );

        self.state = Some(PreviewState {
            text,
            layout,
            texture_url: texture_url.to_string(),
            fragment_shader: shader_name.to_string(),
            uniforms,
        });

        Ok(SessionChanges::all().difference(SessionChanges::FRAME))
    }

    /// Lay out new text and upload it
    ///
    /// Setting the current text again is a no-op.
    pub fn change_text(&mut self, text: &str) -> Result<SessionChanges, SessionError> {
        let state = self.state.as_ref().ok_or(SessionError::NotInitialized)?;
        if state.text == text {
            return Ok(SessionChanges::empty());
        }

        let layout = self.layout.layout_text(text);
        let mut changes = SessionChanges::TEXT;
        let layout = if layout == *state.layout {
            // e.g. only unknown code points were added
            Arc::clone(&state.layout)
        } else {
            let layout = Arc::new(layout);
            self.backend.upload_geometry(Arc::clone(&layout))?;
            changes |= SessionChanges::GEOMETRY;
            layout
        };

        log::debug!("Text changed to {:?}: {} glyphs", text, layout.glyph_count());

        let state = self.state_mut()?;
        state.text = text.to_string();
        state.layout = layout;
        Ok(changes)
    }

    /// Swap the atlas texture, carrying over the current sampler filters
    pub fn change_texture(&mut self, texture_url: &str) -> Result<SessionChanges, SessionError> {
        let uniforms = self.state.as_ref().ok_or(SessionError::NotInitialized)?.uniforms;

        let texture = self.loader.load_texture(texture_url)?;
        let uniforms = uniforms.with_texture(&texture);
        self.backend.set_uniforms(&uniforms)?;

        log::info!("Texture changed to '{}' ({}x{})", texture_url, texture.width, texture.height);

        let state = self.state_mut()?;
        state.texture_url = texture_url.to_string();
        state.uniforms = uniforms;
        Ok(SessionChanges::TEXTURE)
    }

    /// Swap the fragment shader
    pub fn change_shader(&mut self, shader_name: &str) -> Result<SessionChanges, SessionError> {
        if self.state.is_none() {
            return Err(SessionError::NotInitialized);
        }

        let source = self.shaders.fragment_source(shader_name)?;
        self.backend.set_fragment_shader(&source)?;

        log::info!("Fragment shader changed to '{}'", shader_name);

        self.state_mut()?.fragment_shader = shader_name.to_string();
        Ok(SessionChanges::SHADER)
    }

    /// Set the minification filter of the current texture
    pub fn change_min_filter(&mut self, filter: TextureFilter) -> Result<SessionChanges, SessionError> {
        self.update_sampler(|sampler| sampler.min_filter = filter)
    }

    /// Set the magnification filter of the current texture
    pub fn change_mag_filter(&mut self, filter: TextureFilter) -> Result<SessionChanges, SessionError> {
        self.update_sampler(|sampler| sampler.mag_filter = filter)
    }

    /// Draw one frame
    pub fn render_frame(&mut self) -> Result<SessionChanges, SessionError> {
        if self.state.is_none() {
            return Err(SessionError::NotInitialized);
        }
        self.backend.render()?;
        Ok(SessionChanges::FRAME)
    }

    /// Current state, `None` before initialization
    pub fn state(&self) -> Option<&PreviewState> {
        self.state.as_ref()
    }

    /// Configuration the session was built from
    pub fn config(&self) -> &PreviewConfig {
        &self.config
    }

    /// Layout engine
    pub fn layout_engine(&self) -> &TextLayout {
        &self.layout
    }

    /// Back end
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Mutable back end
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Texture loader
    pub fn loader(&self) -> &L {
        &self.loader
    }

    fn update_sampler(&mut self, edit: impl FnOnce(&mut SamplerState)) -> Result<SessionChanges, SessionError> {
        let uniforms = self.state.as_ref().ok_or(SessionError::NotInitialized)?.uniforms;

        let mut sampler = uniforms.i_texture.sampler;
        edit(&mut sampler);
        if sampler == uniforms.i_texture.sampler {
            return Ok(SessionChanges::empty());
        }

        let uniforms = uniforms.with_sampler(sampler);
        self.backend.set_uniforms(&uniforms)?;

        log::debug!("Sampler changed: min {}, mag {}", sampler.min_filter, sampler.mag_filter);

        self.state_mut()?.uniforms = uniforms;
        Ok(SessionChanges::SAMPLER)
    }

    fn state_mut(&mut self) -> Result<&mut PreviewState, SessionError> {
        self.state.as_mut().ok_or(SessionError::NotInitialized)
    }
}
