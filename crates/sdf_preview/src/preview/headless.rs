//! Headless rendering collaborators
//!
//! [`HeadlessBackend`] accepts everything a GPU back end would and records it,
//! which makes the preview pipeline observable in tests and usable from the
//! command line. [`ImageTextureLoader`] decodes atlas images from disk.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::assets::ImageData;
use crate::foundation::collections::{key_from_raw, key_to_raw, HandleMap};
use crate::render::backend::{MeshBackend, SceneSetup, ShaderUniforms};
use crate::render::text::LayoutResult;
use crate::render::texture::{LoadedTexture, TextureHandle, TextureLoader};
use crate::render::RenderError;

/// Back end that records what it is given instead of drawing
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    scene: Option<SceneSetup>,
    geometry: Option<Arc<LayoutResult>>,
    vertex_shader: Option<String>,
    fragment_shader: Option<String>,
    uniforms: Option<ShaderUniforms>,
    geometry_uploads: usize,
    material_rebuilds: usize,
    uniform_updates: usize,
    frames_rendered: u64,
}

impl HeadlessBackend {
    /// Create an empty back end
    pub fn new() -> Self {
        Self::default()
    }

    /// Scene setup received, if any
    pub fn scene(&self) -> Option<&SceneSetup> {
        self.scene.as_ref()
    }

    /// Last uploaded geometry
    pub fn geometry(&self) -> Option<&Arc<LayoutResult>> {
        self.geometry.as_ref()
    }

    /// Current vertex shader source
    pub fn vertex_shader(&self) -> Option<&str> {
        self.vertex_shader.as_deref()
    }

    /// Current fragment shader source
    pub fn fragment_shader(&self) -> Option<&str> {
        self.fragment_shader.as_deref()
    }

    /// Current uniform values
    pub fn uniforms(&self) -> Option<&ShaderUniforms> {
        self.uniforms.as_ref()
    }

    /// Number of geometry uploads
    pub fn geometry_uploads(&self) -> usize {
        self.geometry_uploads
    }

    /// Number of material rebuilds caused by shader swaps
    pub fn material_rebuilds(&self) -> usize {
        self.material_rebuilds
    }

    /// Number of uniform updates
    pub fn uniform_updates(&self) -> usize {
        self.uniform_updates
    }

    /// Number of frames drawn
    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    fn require_scene(&self, operation: &str) -> Result<(), RenderError> {
        if self.scene.is_none() {
            return Err(RenderError::Backend(format!("{operation} before scene was configured")));
        }
        Ok(())
    }
}

impl MeshBackend for HeadlessBackend {
    fn configure_scene(&mut self, setup: &SceneSetup) -> Result<(), RenderError> {
        log::debug!(
            "Headless scene {}x{}, clear #{:06X}",
            setup.width,
            setup.height,
            setup.clear_color
        );
        self.scene = Some(setup.clone());
        Ok(())
    }

    fn upload_geometry(&mut self, layout: Arc<LayoutResult>) -> Result<(), RenderError> {
        self.require_scene("upload_geometry")?;
        log::trace!(
            "Uploading {} vertices ({} + {} bytes)",
            layout.vertex_count(),
            layout.position_bytes().len(),
            layout.uv_bytes().len()
        );
        self.geometry = Some(layout);
        self.geometry_uploads += 1;
        Ok(())
    }

    fn set_vertex_shader(&mut self, source: &str) -> Result<(), RenderError> {
        self.require_scene("set_vertex_shader")?;
        self.vertex_shader = Some(source.to_string());
        Ok(())
    }

    fn set_fragment_shader(&mut self, source: &str) -> Result<(), RenderError> {
        self.require_scene("set_fragment_shader")?;
        self.fragment_shader = Some(source.to_string());
        self.material_rebuilds += 1;
        Ok(())
    }

    fn set_uniforms(&mut self, uniforms: &ShaderUniforms) -> Result<(), RenderError> {
        self.require_scene("set_uniforms")?;
        self.uniforms = Some(*uniforms);
        self.uniform_updates += 1;
        Ok(())
    }

    fn render(&mut self) -> Result<(), RenderError> {
        self.require_scene("render")?;
        if self.fragment_shader.is_none() {
            return Err(RenderError::Backend("render without a fragment shader".to_string()));
        }
        self.frames_rendered += 1;
        Ok(())
    }
}

/// Loads atlas textures from disk and keeps their pixels
#[derive(Debug, Default)]
pub struct ImageTextureLoader {
    base_dir: Option<PathBuf>,
    textures: HandleMap<ImageData>,
}

impl ImageTextureLoader {
    /// Loader resolving URLs against the working directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Loader resolving relative URLs against `base_dir`
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: Some(base_dir.into()),
            textures: HandleMap::new(),
        }
    }

    /// Pixels of a loaded texture
    pub fn get(&self, handle: TextureHandle) -> Option<&ImageData> {
        self.textures.get(key_from_raw(handle.0))
    }

    /// Drop a loaded texture; its handle becomes stale
    pub fn release(&mut self, handle: TextureHandle) -> Option<ImageData> {
        self.textures.remove(key_from_raw(handle.0))
    }

    /// Number of textures held
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    /// True when no texture is held
    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    /// Register already-decoded pixels
    pub fn insert(&mut self, image: ImageData) -> LoadedTexture {
        let (width, height) = (image.width, image.height);
        let key = self.textures.insert(image);
        LoadedTexture {
            handle: TextureHandle(key_to_raw(key)),
            width,
            height,
        }
    }

    fn resolve(&self, url: &str) -> PathBuf {
        let path = Path::new(url);
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

impl TextureLoader for ImageTextureLoader {
    fn load_texture(&mut self, url: &str) -> Result<LoadedTexture, RenderError> {
        let path = self.resolve(url);
        let image = ImageData::from_file(&path).map_err(|e| RenderError::TextureLoad {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        if !image.is_square() {
            log::warn!(
                "Atlas '{}' is {}x{}; layout assumes a square atlas",
                url,
                image.width,
                image.height
            );
        }
        Ok(self.insert(image))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::GlyphTables;
    use crate::core::config::PreviewConfig;
    use crate::foundation::math::Vec2;
    use crate::render::text::{LayoutParams, TextLayout};
    use crate::render::texture::SamplerState;

    #[test]
    fn test_backend_requires_scene() {
        let mut backend = HeadlessBackend::new();
        let layout = Arc::new(LayoutResult::default());

        assert!(matches!(backend.upload_geometry(layout), Err(RenderError::Backend(_))));
        assert!(backend.render().is_err());
        assert_eq!(backend.geometry_uploads(), 0);
    }

    #[test]
    fn test_backend_records_state() {
        let mut backend = HeadlessBackend::new();
        backend
            .configure_scene(&SceneSetup::from_config(&PreviewConfig::default()))
            .unwrap();
        backend.set_fragment_shader("// a").unwrap();
        backend.set_fragment_shader("// b").unwrap();

        let layout = Arc::new(TextLayout::new(GlyphTables::default(), LayoutParams::default()).layout_text("x"));
        backend.upload_geometry(layout).unwrap();

        let texture = LoadedTexture {
            handle: TextureHandle(9),
            width: 512,
            height: 512,
        };
        let uniforms = ShaderUniforms::new(Vec2::new(600.0, 400.0), &texture, SamplerState::default());
        backend.set_uniforms(&uniforms).unwrap();
        backend.render().unwrap();

        assert_eq!(backend.fragment_shader(), Some("// b"));
        assert_eq!(backend.material_rebuilds(), 2);
        assert!(backend.geometry().unwrap().is_empty());
        assert_eq!(backend.uniforms().unwrap().i_texture.handle, TextureHandle(9));
        assert_eq!(backend.frames_rendered(), 1);
    }

    #[test]
    fn test_render_needs_fragment_shader() {
        let mut backend = HeadlessBackend::new();
        backend
            .configure_scene(&SceneSetup::from_config(&PreviewConfig::default()))
            .unwrap();
        assert!(matches!(backend.render(), Err(RenderError::Backend(_))));
    }

    #[test]
    fn test_loader_insert_and_release() {
        let mut loader = ImageTextureLoader::new();
        let loaded = loader.insert(ImageData::solid_color(16, 16, [0, 0, 0, 255]));

        assert_eq!((loaded.width, loaded.height), (16, 16));
        assert_eq!(loader.get(loaded.handle).unwrap().width, 16);
        assert_eq!(loader.len(), 1);

        assert!(loader.release(loaded.handle).is_some());
        assert!(loader.get(loaded.handle).is_none());
        assert!(loader.is_empty());
    }

    #[test]
    fn test_loader_reads_png_from_base_dir() {
        let dir = std::env::temp_dir().join(format!("sdf_preview_textures_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        image::RgbaImage::from_pixel(32, 32, image::Rgba([255, 255, 255, 128]))
            .save(dir.join("atlas.png"))
            .unwrap();

        let mut loader = ImageTextureLoader::with_base_dir(&dir);
        let loaded = loader.load_texture("atlas.png").unwrap();
        assert_eq!((loaded.width, loaded.height), (32, 32));
        assert_eq!(&loader.get(loaded.handle).unwrap().data[0..4], &[255, 255, 255, 128]);

        assert!(matches!(
            loader.load_texture("missing.png"),
            Err(RenderError::TextureLoad { .. })
        ));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
