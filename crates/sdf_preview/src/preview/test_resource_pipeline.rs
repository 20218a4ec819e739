//! End-to-end run over the shipped resources
//!
//! Loads `resources/preview.toml`, the glyph tables, shaders and atlas from the
//! workspace and drives a headless session through every operation.

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use crate::assets::GlyphTables;
    use crate::config::Config;
    use crate::core::config::PreviewConfig;
    use crate::preview::{HeadlessBackend, ImageTextureLoader, PreviewSession, SessionChanges};
    use crate::render::text::TextLayout;
    use crate::render::texture::TextureFilter;
    use crate::render::ShaderDirectory;

    fn workspace_root() -> PathBuf {
        // Two levels up from crates/sdf_preview
        let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        path.pop();
        path.pop();
        path
    }

    fn load_config() -> PreviewConfig {
        let path = workspace_root().join("resources").join("preview.toml");
        let config = PreviewConfig::load_from_file(&path)
            .unwrap_or_else(|e| panic!("Failed to load {:?}: {}", path, e));
        config.validate().unwrap();
        config
    }

    #[test]
    fn test_shipped_config_matches_defaults() {
        assert_eq!(load_config(), PreviewConfig::default());
    }

    #[test]
    fn test_shipped_tables_cover_printable_ascii() {
        let root = workspace_root();
        let config = load_config();
        let tables = GlyphTables::load(
            root.join(&config.atlas.metadata_path),
            root.join(&config.atlas.metrics_path),
        )
        .unwrap();

        assert!((32..127).all(|c| tables.contains(c)));
        assert!(!tables.contains(0xE9));
    }

    #[test]
    fn test_headless_session_over_resources() {
        let root = workspace_root();
        let config = load_config();
        let tables = GlyphTables::load(
            root.join(&config.atlas.metadata_path),
            root.join(&config.atlas.metrics_path),
        )
        .unwrap();
        let layout = TextLayout::new(tables, config.layout_params());
        let shaders = ShaderDirectory::new(root.join(&config.shaders.directory), config.shaders.vertex.as_str());
        let shader = config.initial_fragment_shader().unwrap().to_string();
        let texture = config.initial_texture().unwrap().to_string();

        let mut session = PreviewSession::new(
            config,
            layout,
            ImageTextureLoader::with_base_dir(&root),
            shaders,
            HeadlessBackend::new(),
        );
        session.initialize(&shader, &texture).unwrap();

        let state = session.state().unwrap();
        assert_eq!(state.layout.glyph_count(), "Hello, world".len());
        assert_eq!(state.uniforms.i_texture_size.x, 512.0);
        assert!(session.backend().fragment_shader().unwrap().contains("median"));
        assert_eq!(session.loader().len(), 1);

        assert_eq!(
            session.change_text("SDF\u{00E9}").unwrap(),
            SessionChanges::TEXT | SessionChanges::GEOMETRY
        );
        assert_eq!(session.backend().geometry().unwrap().glyph_count(), 3);

        session.change_min_filter(TextureFilter::Nearest).unwrap();
        session.change_texture(&texture).unwrap();
        assert_eq!(session.loader().len(), 2);
        assert_eq!(
            session.backend().uniforms().unwrap().i_texture.sampler.min_filter,
            TextureFilter::Nearest
        );

        session.render_frame().unwrap();
        assert_eq!(session.backend().frames_rendered(), 1);
    }
}
