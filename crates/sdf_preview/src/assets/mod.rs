//! Asset loading: glyph tables and atlas images

pub mod glyph_tables;
pub mod image_loader;

pub use glyph_tables::{GlyphMetadata, GlyphMetrics, GlyphTables, TableFormat};
pub use image_loader::ImageData;

use thiserror::Error;

/// Asset loading errors
#[derive(Error, Debug)]
pub enum AssetError {
    /// Reading the asset from disk failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Decoding the asset failed
    #[error("Failed to load asset: {0}")]
    LoadFailed(String),

    /// Structured data did not match the expected schema
    #[error("Failed to parse {path}: {message}")]
    Parse {
        /// Source the data came from
        path: String,
        /// Parser message
        message: String,
    },

    /// The file extension maps to no known format
    #[error("Unsupported asset format: {0}")]
    UnsupportedFormat(String),

    /// A glyph record holds values the layout cannot use
    #[error("Invalid glyph record for code point {code_point}: {reason}")]
    InvalidGlyph {
        /// Offending code point
        code_point: u32,
        /// What is wrong with it
        reason: String,
    },
}
