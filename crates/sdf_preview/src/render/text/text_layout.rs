//! Text layout engine
//!
//! Converts text into one textured quad per glyph. Each quad is two triangles
//! (six unindexed vertices) so the buffers can be bound directly as
//! `position` and `uv` attributes.
//!
//! # Layout Coordinate System
//!
//! - Origin (0, 0) is the pen position of the first glyph, on the baseline
//! - +X axis points right, +Y axis points up
//! - All vertices lie in the z = 0 plane
//!
//! UVs use a bottom-left origin: atlas pixel rows are counted from the top,
//! so V is flipped against the atlas dimension.

use crate::assets::{GlyphMetadata, GlyphMetrics, GlyphTables};

/// Number of vertices emitted per glyph
pub const VERTICES_PER_GLYPH: usize = 6;

/// Components per position (x, y, z)
pub const POSITION_COMPONENTS: usize = 3;

/// Components per texture coordinate (u, v)
pub const UV_COMPONENTS: usize = 2;

/// Parameters shared by every glyph in a layout
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutParams {
    /// Edge length of the square atlas texture in pixels
    pub atlas_dimension: f32,
    /// Uniform scale applied to positions and advances
    pub scale: f32,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            atlas_dimension: 512.0,
            scale: 1.0,
        }
    }
}

/// Interleaved vertex for back ends that prefer one buffer
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
pub struct TextVertex {
    /// Position in layout space
    pub position: [f32; 3],
    /// Atlas texture coordinate
    pub uv: [f32; 2],
}

/// Bounding box for text layout
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextBounds {
    /// Minimum X coordinate
    pub min_x: f32,
    /// Minimum Y coordinate
    pub min_y: f32,
    /// Maximum X coordinate
    pub max_x: f32,
    /// Maximum Y coordinate
    pub max_y: f32,
}

impl TextBounds {
    /// Calculate width of bounding box
    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    /// Calculate height of bounding box
    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }
}

/// Flat vertex buffers for one laid-out string
///
/// `positions` holds `x, y, z` triples and `uvs` holds `u, v` pairs. Both
/// describe the same vertices in the same order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutResult {
    positions: Vec<f32>,
    uvs: Vec<f32>,
}

impl LayoutResult {
    /// Flat position buffer, three floats per vertex
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    /// Flat UV buffer, two floats per vertex
    pub fn uvs(&self) -> &[f32] {
        &self.uvs
    }

    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / POSITION_COMPONENTS
    }

    /// Number of glyph quads
    pub fn glyph_count(&self) -> usize {
        self.vertex_count() / VERTICES_PER_GLYPH
    }

    /// True when no glyph was emitted
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Position buffer as raw bytes for upload
    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    /// UV buffer as raw bytes for upload
    pub fn uv_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.uvs)
    }

    /// Interleaved `x, y, z, u, v` buffer for single-binding back ends
    pub fn interleaved(&self) -> Vec<f32> {
        self.vertices()
            .flat_map(|v| [v.position[0], v.position[1], v.position[2], v.uv[0], v.uv[1]])
            .collect()
    }

    /// Iterate vertices with position and UV paired up
    pub fn vertices(&self) -> impl Iterator<Item = TextVertex> + '_ {
        self.positions
            .chunks_exact(POSITION_COMPONENTS)
            .zip(self.uvs.chunks_exact(UV_COMPONENTS))
            .map(|(p, t)| TextVertex {
                position: [p[0], p[1], p[2]],
                uv: [t[0], t[1]],
            })
    }

    /// Axis-aligned bounds of all emitted positions, `None` when empty
    pub fn bounds(&self) -> Option<TextBounds> {
        let mut points = self.positions.chunks_exact(POSITION_COMPONENTS);
        let first = points.next()?;
        let init = TextBounds {
            min_x: first[0],
            min_y: first[1],
            max_x: first[0],
            max_y: first[1],
        };
        Some(points.fold(init, |b, p| TextBounds {
            min_x: b.min_x.min(p[0]),
            min_y: b.min_y.min(p[1]),
            max_x: b.max_x.max(p[0]),
            max_y: b.max_y.max(p[1]),
        }))
    }

    fn with_glyph_capacity(glyphs: usize) -> Self {
        Self {
            positions: Vec::with_capacity(glyphs * VERTICES_PER_GLYPH * POSITION_COMPONENTS),
            uvs: Vec::with_capacity(glyphs * VERTICES_PER_GLYPH * UV_COMPONENTS),
        }
    }

    fn push_quad(&mut self, [x0, y0, x1, y1]: [f32; 4], [u0, v0, u1, v1]: [f32; 4]) {
        // Two triangles: (x1,y0) (x0,y0) (x1,y1) and (x0,y1) (x1,y1) (x0,y0)
        #[rustfmt::skip]
        self.positions.extend_from_slice(&[
            x1, y0, 0.0,
            x0, y0, 0.0,
            x1, y1, 0.0,
            x0, y1, 0.0,
            x1, y1, 0.0,
            x0, y0, 0.0,
        ]);
        #[rustfmt::skip]
        self.uvs.extend_from_slice(&[
            u1, v0,
            u0, v0,
            u1, v1,
            u0, v1,
            u1, v1,
            u0, v0,
        ]);
    }
}

/// Lay out a sequence of code points along a single baseline
///
/// Code points missing from either table are skipped: they emit no vertices
/// and do not move the pen. The function is pure; an empty or fully unknown
/// input yields an empty result.
pub fn layout_glyphs<I>(code_points: I, tables: &GlyphTables, params: LayoutParams) -> LayoutResult
where
    I: IntoIterator<Item = u32>,
{
    let code_points = code_points.into_iter();
    let mut result = LayoutResult::with_glyph_capacity(code_points.size_hint().0);

    let scale = params.scale;
    let mut pen_x = 0.0f32;
    let pen_y = 0.0f32;

    for code_point in code_points {
        let Some((metadata, metrics)) = tables.get(code_point) else {
            log::trace!("Skipping code point U+{:04X}: not in glyph tables", code_point);
            continue;
        };

        let quad = glyph_quad(pen_x, pen_y, scale, metadata, metrics);
        let uv = glyph_uv_rect(metadata, params.atlas_dimension);
        result.push_quad(quad, uv);

        pen_x += metrics.advance * scale;
    }

    result
}

/// Layout-space rectangle `[x0, y0, x1, y1]` of a glyph drawn at the pen
fn glyph_quad(pen_x: f32, pen_y: f32, scale: f32, metadata: &GlyphMetadata, metrics: &GlyphMetrics) -> [f32; 4] {
    let x0 = (pen_x - metrics.translate_x) * scale;
    let y0 = (pen_y - metrics.translate_y) * scale;
    let x1 = x0 + (metadata.size.x as f32 / metrics.scale) * scale;
    let y1 = y0 + (metadata.size.y as f32 / metrics.scale) * scale;
    [x0, y0, x1, y1]
}

/// Texture rectangle `[u0, v0, u1, v1]` of a glyph, independent of the pen
pub fn glyph_uv_rect(metadata: &GlyphMetadata, atlas_dimension: f32) -> [f32; 4] {
    let x = metadata.position.x as f32;
    let y = metadata.position.y as f32;
    let w = metadata.size.x as f32;
    let h = metadata.size.y as f32;

    let u0 = x / atlas_dimension;
    let v0 = (atlas_dimension - y - h) / atlas_dimension;
    let u1 = (x + w) / atlas_dimension;
    let v1 = (atlas_dimension - y) / atlas_dimension;
    [u0, v0, u1, v1]
}

/// Text layout engine bound to one set of glyph tables
#[derive(Debug, Clone)]
pub struct TextLayout {
    tables: GlyphTables,
    params: LayoutParams,
}

impl TextLayout {
    /// Create a new text layout engine
    pub fn new(tables: GlyphTables, params: LayoutParams) -> Self {
        Self { tables, params }
    }

    /// Convert a string into glyph quads, one per renderable `char`
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use sdf_preview::render::text::{TextLayout, LayoutParams};
    /// # use sdf_preview::assets::GlyphTables;
    /// let tables = GlyphTables::load("metadata.json", "metrics.json")?;
    /// let layout = TextLayout::new(tables, LayoutParams::default());
    /// let result = layout.layout_text("Hello");
    /// assert_eq!(result.vertex_count(), 5 * 6);
    /// # Ok::<(), sdf_preview::assets::AssetError>(())
    /// ```
    pub fn layout_text(&self, text: &str) -> LayoutResult {
        layout_glyphs(text.chars().map(u32::from), &self.tables, self.params)
    }

    /// Calculate bounding box for a text string
    pub fn calculate_bounds(&self, text: &str) -> Option<TextBounds> {
        self.layout_text(text).bounds()
    }

    /// Glyph tables used by this layout engine
    pub fn tables(&self) -> &GlyphTables {
        &self.tables
    }

    /// Layout parameters
    pub fn params(&self) -> LayoutParams {
        self.params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn metrics(translate_x: f32, translate_y: f32, scale: f32, advance: f32) -> GlyphMetrics {
        GlyphMetrics {
            translate_x,
            translate_y,
            scale,
            advance,
        }
    }

    fn sample_tables() -> GlyphTables {
        let mut tables = GlyphTables::default();
        tables.insert('a' as u32, GlyphMetadata::new(0, 0, 10, 20), metrics(0.0, 0.0, 1.0, 12.0));
        tables.insert('b' as u32, GlyphMetadata::new(32, 64, 16, 8), metrics(1.0, 2.0, 2.0, 7.0));
        // metadata only
        tables.metadata.insert('c' as u32, GlyphMetadata::new(0, 0, 4, 4));
        // metrics only
        tables.metrics.insert('d' as u32, metrics(0.0, 0.0, 1.0, 100.0));
        tables
    }

    fn engine() -> TextLayout {
        TextLayout::new(sample_tables(), LayoutParams::default())
    }

    fn vertex_xs(result: &LayoutResult, glyph: usize) -> Vec<f32> {
        result
            .vertices()
            .skip(glyph * VERTICES_PER_GLYPH)
            .take(VERTICES_PER_GLYPH)
            .map(|v| v.position[0])
            .collect()
    }

    #[test]
    fn test_single_glyph_reference_values() {
        let result = engine().layout_text("a");

        #[rustfmt::skip]
        let expected_positions: [f32; 18] = [
            10.0, 0.0, 0.0,
            0.0, 0.0, 0.0,
            10.0, 20.0, 0.0,
            0.0, 20.0, 0.0,
            10.0, 20.0, 0.0,
            0.0, 0.0, 0.0,
        ];
        // 10x20 glyph at the atlas origin: u1 = 10/512, v0 = (512 - 20)/512
        #[rustfmt::skip]
        let expected_uvs: [f32; 12] = [
            0.019_531_25, 0.960_937_5,
            0.0, 0.960_937_5,
            0.019_531_25, 1.0,
            0.0, 1.0,
            0.019_531_25, 1.0,
            0.0, 0.960_937_5,
        ];

        assert_eq!(result.positions().len(), expected_positions.len());
        assert_eq!(result.uvs().len(), expected_uvs.len());
        for (got, want) in result.positions().iter().zip(expected_positions) {
            assert_relative_eq!(*got, want);
        }
        for (got, want) in result.uvs().iter().zip(expected_uvs) {
            assert_relative_eq!(*got, want);
        }

        // next glyph starts at pen x = 12
        let pair = engine().layout_text("aa");
        assert_relative_eq!(vertex_xs(&pair, 1)[1], 12.0);
    }

    #[test]
    fn test_pen_advances_by_previous_glyph() {
        let result = engine().layout_text("aa");
        assert_eq!(result.glyph_count(), 2);

        let first = vertex_xs(&result, 0);
        let second = vertex_xs(&result, 1);
        for (a, b) in first.iter().zip(&second) {
            assert_relative_eq!(b - a, 12.0);
        }
    }

    #[test]
    fn test_translate_and_metric_scale() {
        // 'b' after 'a': pen at 12, translate (1, 2), size 16x8 at metric scale 2
        let result = engine().layout_text("ab");
        let b: Vec<TextVertex> = result.vertices().skip(VERTICES_PER_GLYPH).collect();

        // (x1, y0) then (x0, y0)
        assert_relative_eq!(b[0].position[0], 11.0 + 8.0);
        assert_relative_eq!(b[0].position[1], -2.0);
        assert_relative_eq!(b[1].position[0], 11.0);
        // (x1, y1)
        assert_relative_eq!(b[2].position[1], -2.0 + 4.0);
    }

    #[test]
    fn test_layout_scale_multiplies_offsets_and_advance() {
        let params = LayoutParams {
            atlas_dimension: 512.0,
            scale: 2.0,
        };
        let result = TextLayout::new(sample_tables(), params).layout_text("ab");
        let b: Vec<TextVertex> = result.vertices().skip(VERTICES_PER_GLYPH).collect();

        // x0 = (24 - 1) * 2, x1 = x0 + (16 / 2) * 2
        assert_relative_eq!(b[1].position[0], 46.0);
        assert_relative_eq!(b[0].position[0], 62.0);
        assert_relative_eq!(b[0].position[1], -4.0);
    }

    #[test]
    fn test_empty_text() {
        let result = engine().layout_text("");
        assert!(result.is_empty());
        assert!(result.uvs().is_empty());
        assert_eq!(result.bounds(), None);
    }

    #[test]
    fn test_unknown_code_points_only() {
        // 'c' and 'd' each appear in just one table
        let result = engine().layout_text("cdzz\u{1F600}");
        assert!(result.is_empty());
        assert!(result.uvs().is_empty());
    }

    #[test]
    fn test_unknown_code_points_do_not_move_pen() {
        let plain = engine().layout_text("ab");
        let noisy = engine().layout_text("xa?d\u{00E9}bc");
        assert_eq!(plain, noisy);
    }

    #[test]
    fn test_buffer_lengths_match_glyph_count() {
        let text = "abcdab ba";
        let tables = sample_tables();
        let expected = text.chars().filter(|c| tables.contains(*c as u32)).count();
        let result = engine().layout_text(text);

        assert_eq!(result.glyph_count(), expected);
        assert_eq!(result.positions().len(), 3 * 6 * expected);
        assert_eq!(result.uvs().len(), 2 * 6 * expected);
        assert_eq!(result.vertices().count(), 6 * expected);
    }

    #[test]
    fn test_uvs_independent_of_pen_position() {
        let alone = engine().layout_text("b");
        let shifted = engine().layout_text("aaab");

        let tail = &shifted.uvs()[shifted.uvs().len() - alone.uvs().len()..];
        assert_eq!(alone.uvs(), tail);
    }

    #[test]
    fn test_uv_rect_flips_v() {
        let [u0, v0, u1, v1] = glyph_uv_rect(&GlyphMetadata::new(32, 64, 16, 8), 512.0);
        assert_relative_eq!(u0, 32.0 / 512.0);
        assert_relative_eq!(u1, 48.0 / 512.0);
        assert_relative_eq!(v0, (512.0 - 64.0 - 8.0) / 512.0);
        assert_relative_eq!(v1, (512.0 - 64.0) / 512.0);
    }

    #[test]
    fn test_layout_glyphs_accepts_code_point_iter() {
        let tables = sample_tables();
        let from_iter = layout_glyphs([97u32, 98, 0x10FFFF], &tables, LayoutParams::default());
        assert_eq!(from_iter, engine().layout_text("ab"));
    }

    #[test]
    fn test_bounds() {
        let bounds = engine().calculate_bounds("ab").unwrap();
        assert_relative_eq!(bounds.min_x, 0.0);
        assert_relative_eq!(bounds.max_x, 19.0);
        assert_relative_eq!(bounds.min_y, -2.0);
        assert_relative_eq!(bounds.max_y, 20.0);
        assert_relative_eq!(bounds.width(), 19.0);
        assert_relative_eq!(bounds.height(), 22.0);
    }

    #[test]
    fn test_byte_views() {
        let result = engine().layout_text("ab");
        assert_eq!(result.position_bytes().len(), result.positions().len() * 4);
        assert_eq!(result.uv_bytes().len(), result.uvs().len() * 4);
        assert_eq!(std::mem::size_of::<TextVertex>(), std::mem::size_of::<f32>() * 5);
    }

    #[test]
    fn test_interleaved_matches_split_buffers() {
        let result = engine().layout_text("ba");
        let interleaved = result.interleaved();

        assert_eq!(interleaved.len(), result.vertex_count() * 5);
        for (i, vertex) in interleaved.chunks_exact(5).enumerate() {
            assert_eq!(&vertex[..3], &result.positions()[i * 3..i * 3 + 3]);
            assert_eq!(&vertex[3..], &result.uvs()[i * 2..i * 2 + 2]);
        }
    }
}
