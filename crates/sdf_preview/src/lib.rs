//! # SDF Preview
//!
//! Glyph layout and preview orchestration for signed-distance-field text.
//!
//! ## Features
//!
//! - **Glyph Layout**: strings to textured quads from precomputed atlas tables
//! - **Asset Loading**: JSON/RON glyph tables and PNG atlas images
//! - **Preview Session**: text, texture, shader and filter changes pushed to a
//!   pluggable rendering back end
//! - **Headless Back End**: run the full pipeline without a graphics context
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sdf_preview::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = PreviewConfig::load_from_file("resources/preview.toml")?;
//!     let tables = GlyphTables::load(&config.atlas.metadata_path, &config.atlas.metrics_path)?;
//!     let layout = TextLayout::new(tables, config.layout_params());
//!
//!     let result = layout.layout_text("Hello, world");
//!     println!("{} glyphs, {} vertices", result.glyph_count(), result.vertex_count());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::cast_precision_loss)]

pub mod assets;
pub mod config;
pub mod core;
pub mod foundation;
pub mod preview;
pub mod render;

/// Common imports for crate users
pub mod prelude {
    pub use crate::{
        assets::{AssetError, GlyphMetadata, GlyphMetrics, GlyphTables, ImageData},
        config::{Config, ConfigError},
        core::config::PreviewConfig,
        preview::{HeadlessBackend, ImageTextureLoader, PreviewSession, SessionChanges, SessionError},
        render::{
            text::{layout_glyphs, LayoutParams, LayoutResult, TextBounds, TextLayout, TextVertex},
            MeshBackend, RenderError, ShaderDirectory, ShaderLibrary, ShaderSource, TextureFilter, TextureLoader,
        },
    };
}
