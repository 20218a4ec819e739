//! Text layout system
//!
//! Turns strings into textured quads using precomputed glyph tables.

pub mod text_layout;

pub use text_layout::*;
