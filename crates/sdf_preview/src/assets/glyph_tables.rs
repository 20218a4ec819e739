//! Glyph metadata and metrics tables
//!
//! Both tables are keyed by Unicode code point. The metadata table locates each
//! glyph's rectangle inside the shared atlas texture, the metrics table says how
//! that rectangle sits relative to the pen on the baseline.
//!
//! JSON object keys are decimal code point strings (`"72": {...}`); RON files
//! may use integer keys directly.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::assets::AssetError;
use crate::foundation::math::UVec2;

/// Location of a glyph inside the atlas texture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlyphMetadata {
    /// Origin of the glyph rectangle in atlas pixels
    pub position: UVec2,
    /// Width and height of the glyph rectangle in atlas pixels
    pub size: UVec2,
}

impl GlyphMetadata {
    /// Create metadata from pixel coordinates
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            position: UVec2::new(x, y),
            size: UVec2::new(width, height),
        }
    }
}

/// Placement of a glyph relative to the pen
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GlyphMetrics {
    /// Horizontal offset subtracted from the pen position
    #[serde(rename = "translatex", alias = "translateX")]
    pub translate_x: f32,
    /// Vertical offset subtracted from the baseline
    #[serde(rename = "translatey", alias = "translateY")]
    pub translate_y: f32,
    /// Divisor turning atlas pixels into layout units
    pub scale: f32,
    /// Pen advance after this glyph
    pub advance: f32,
}

/// Serialization formats accepted for glyph tables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    /// JSON, as emitted by common atlas generators
    Json,
    /// Rusty Object Notation
    Ron,
}

impl TableFormat {
    /// Pick a format from a file extension
    pub fn from_path(path: &Path) -> Result<Self, AssetError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("ron") => Ok(Self::Ron),
            _ => Err(AssetError::UnsupportedFormat(path.display().to_string())),
        }
    }

    fn parse<T: for<'de> Deserialize<'de>>(self, contents: &str, origin: &str) -> Result<T, AssetError> {
        let parsed = match self {
            Self::Json => serde_json::from_str(contents).map_err(|e| e.to_string()),
            Self::Ron => ron::from_str(contents).map_err(|e| e.to_string()),
        };
        parsed.map_err(|message| AssetError::Parse {
            path: origin.to_string(),
            message,
        })
    }
}

/// The two lookup tables the layout engine reads
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlyphTables {
    /// Atlas rectangles by code point
    pub metadata: HashMap<u32, GlyphMetadata>,
    /// Baseline metrics by code point
    pub metrics: HashMap<u32, GlyphMetrics>,
}

impl GlyphTables {
    /// Build tables from already-parsed maps
    pub fn new(metadata: HashMap<u32, GlyphMetadata>, metrics: HashMap<u32, GlyphMetrics>) -> Self {
        Self { metadata, metrics }
    }

    /// Parse both tables from JSON text
    pub fn from_json_strs(metadata: &str, metrics: &str) -> Result<Self, AssetError> {
        Self::from_strs(metadata, metrics, TableFormat::Json)
    }

    /// Parse both tables from text in the given format
    pub fn from_strs(metadata: &str, metrics: &str, format: TableFormat) -> Result<Self, AssetError> {
        let tables = Self {
            metadata: format.parse(metadata, "<metadata>")?,
            metrics: format.parse(metrics, "<metrics>")?,
        };
        tables.validate()?;
        Ok(tables)
    }

    /// Load both tables from disk; each file's format follows its extension
    pub fn load(metadata_path: impl AsRef<Path>, metrics_path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let tables = Self {
            metadata: load_table(metadata_path.as_ref())?,
            metrics: load_table(metrics_path.as_ref())?,
        };
        tables.validate()?;

        log::info!(
            "Loaded glyph tables: {} metadata records, {} metrics records, {} usable glyphs",
            tables.metadata.len(),
            tables.metrics.len(),
            tables.glyph_count()
        );
        Ok(tables)
    }

    /// Both records for a code point, if the glyph is renderable
    pub fn get(&self, code_point: u32) -> Option<(&GlyphMetadata, &GlyphMetrics)> {
        Some((self.metadata.get(&code_point)?, self.metrics.get(&code_point)?))
    }

    /// Whether both tables hold the code point
    pub fn contains(&self, code_point: u32) -> bool {
        self.get(code_point).is_some()
    }

    /// Number of code points present in both tables
    pub fn glyph_count(&self) -> usize {
        self.metadata.keys().filter(|c| self.metrics.contains_key(c)).count()
    }

    /// Insert one glyph into both tables
    pub fn insert(&mut self, code_point: u32, metadata: GlyphMetadata, metrics: GlyphMetrics) {
        self.metadata.insert(code_point, metadata);
        self.metrics.insert(code_point, metrics);
    }

    // A zero or negative metrics scale would put NaN or inf into the vertex buffer.
    fn validate(&self) -> Result<(), AssetError> {
        for (&code_point, metrics) in &self.metrics {
            if !(metrics.scale.is_finite() && metrics.scale > 0.0) {
                return Err(AssetError::InvalidGlyph {
                    code_point,
                    reason: format!("scale must be positive, got {}", metrics.scale),
                });
            }
            let offsets = [metrics.translate_x, metrics.translate_y, metrics.advance];
            if offsets.iter().any(|v| !v.is_finite()) {
                return Err(AssetError::InvalidGlyph {
                    code_point,
                    reason: "non-finite translate or advance".to_string(),
                });
            }
        }
        Ok(())
    }
}

fn load_table<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<HashMap<u32, T>, AssetError> {
    let format = TableFormat::from_path(path)?;
    log::debug!("Loading glyph table from {:?}", path);
    let contents = std::fs::read_to_string(path)?;
    format.parse(&contents, &path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const METADATA_JSON: &str = r#"{
        "72": { "position": [0, 0], "size": [10, 20] },
        "105": { "position": [10, 0], "size": [4, 20] },
        "33": { "position": [14, 0], "size": [3, 18] }
    }"#;

    const METRICS_JSON: &str = r#"{
        "72": { "translatex": 1.5, "translatey": 2.0, "scale": 1.0, "advance": 12.0 },
        "105": { "translateX": 0.5, "translateY": 2.0, "scale": 2.0, "advance": 5.0 }
    }"#;

    #[test]
    fn test_parse_json_tables() {
        let tables = GlyphTables::from_json_strs(METADATA_JSON, METRICS_JSON).unwrap();

        assert_eq!(tables.metadata.len(), 3);
        assert_eq!(tables.metrics.len(), 2);
        assert_eq!(tables.metadata[&72], GlyphMetadata::new(0, 0, 10, 20));
        assert_eq!(tables.metrics[&72].translate_x, 1.5);
        // camel-case alias
        assert_eq!(tables.metrics[&105].translate_x, 0.5);
        assert_eq!(tables.metrics[&105].scale, 2.0);
    }

    #[test]
    fn test_contains_requires_both_tables() {
        let tables = GlyphTables::from_json_strs(METADATA_JSON, METRICS_JSON).unwrap();

        assert!(tables.contains('H' as u32));
        assert!(tables.contains('i' as u32));
        // '!' has metadata but no metrics
        assert!(!tables.contains('!' as u32));
        assert!(!tables.contains('z' as u32));
        assert_eq!(tables.glyph_count(), 2);
    }

    #[test]
    fn test_parse_ron_tables() {
        let metadata = "{ 65: (position: (0, 0), size: (8, 8)) }";
        let metrics = "{ 65: (translatex: 0.0, translatey: 0.0, scale: 1.0, advance: 9.0) }";
        let tables = GlyphTables::from_strs(metadata, metrics, TableFormat::Ron).unwrap();

        assert!(tables.contains('A' as u32));
        assert_eq!(tables.metrics[&65].advance, 9.0);
    }

    #[test]
    fn test_rejects_zero_scale() {
        let metrics = r#"{ "72": { "translatex": 0, "translatey": 0, "scale": 0, "advance": 1 } }"#;
        let result = GlyphTables::from_json_strs(METADATA_JSON, metrics);
        assert!(matches!(result, Err(AssetError::InvalidGlyph { code_point: 72, .. })));
    }

    #[test]
    fn test_parse_error_names_source() {
        let result = GlyphTables::from_json_strs("{ not json", METRICS_JSON);
        match result {
            Err(AssetError::Parse { path, .. }) => assert_eq!(path, "<metadata>"),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_table_format_from_extension() {
        assert_eq!(TableFormat::from_path(Path::new("m.json")).unwrap(), TableFormat::Json);
        assert_eq!(TableFormat::from_path(Path::new("m.ron")).unwrap(), TableFormat::Ron);
        assert!(TableFormat::from_path(Path::new("m.csv")).is_err());
    }

    #[test]
    fn test_load_from_disk() {
        let dir = std::env::temp_dir().join(format!("sdf_preview_tables_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let metadata_path = dir.join("metadata.json");
        let metrics_path = dir.join("metrics.json");
        std::fs::write(&metadata_path, METADATA_JSON).unwrap();
        std::fs::write(&metrics_path, METRICS_JSON).unwrap();

        let tables = GlyphTables::load(&metadata_path, &metrics_path).unwrap();
        assert_eq!(tables.glyph_count(), 2);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
