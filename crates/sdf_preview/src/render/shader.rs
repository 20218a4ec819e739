//! Shader source lookup
//!
//! Shaders are addressed by name. A vertex shader is shared by every
//! fragment shader the preview can switch between.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::RenderError;

/// Resolves shader names to GLSL source text
pub trait ShaderSource {
    /// Source of the vertex shader
    fn vertex_source(&self) -> Result<String, RenderError>;

    /// Source of the named fragment shader
    fn fragment_source(&self, name: &str) -> Result<String, RenderError>;
}

/// Shaders stored as `<dir>/<name>.vert` and `<dir>/<name>.frag`
#[derive(Debug, Clone)]
pub struct ShaderDirectory {
    root: PathBuf,
    vertex_name: String,
}

impl ShaderDirectory {
    /// Create a lookup rooted at `root` using `vertex_name` for the vertex stage
    pub fn new(root: impl Into<PathBuf>, vertex_name: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            vertex_name: vertex_name.into(),
        }
    }

    /// Directory searched for shader files
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn read(&self, name: &str, extension: &str) -> Result<String, RenderError> {
        let path = self.root.join(format!("{name}.{extension}"));
        log::debug!("Reading shader source {:?}", path);
        std::fs::read_to_string(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                RenderError::ShaderNotFound(name.to_string())
            } else {
                RenderError::Backend(format!("failed to read {}: {}", path.display(), e))
            }
        })
    }
}

impl ShaderSource for ShaderDirectory {
    fn vertex_source(&self) -> Result<String, RenderError> {
        self.read(&self.vertex_name, "vert")
    }

    fn fragment_source(&self, name: &str) -> Result<String, RenderError> {
        self.read(name, "frag")
    }
}

/// In-memory shader sources
#[derive(Debug, Clone, Default)]
pub struct ShaderLibrary {
    vertex: String,
    fragments: HashMap<String, String>,
}

impl ShaderLibrary {
    /// Create a library with the given vertex shader
    pub fn new(vertex: impl Into<String>) -> Self {
        Self {
            vertex: vertex.into(),
            fragments: HashMap::new(),
        }
    }

    /// Add or replace a fragment shader
    pub fn with_fragment(mut self, name: impl Into<String>, source: impl Into<String>) -> Self {
        self.fragments.insert(name.into(), source.into());
        self
    }

    /// Names of the registered fragment shaders
    pub fn fragment_names(&self) -> impl Iterator<Item = &str> {
        self.fragments.keys().map(String::as_str)
    }
}

impl ShaderSource for ShaderLibrary {
    fn vertex_source(&self) -> Result<String, RenderError> {
        Ok(self.vertex.clone())
    }

    fn fragment_source(&self, name: &str) -> Result<String, RenderError> {
        self.fragments
            .get(name)
            .cloned()
            .ok_or_else(|| RenderError::ShaderNotFound(name.to_string()))
    }
}
