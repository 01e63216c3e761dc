//! Shader pipeline stages

use std::fmt;

/// One programmable stage of the GL pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ShaderStage {
    /// Per-vertex stage
    Vertex,
    /// Per-primitive stage between vertex and rasterizer
    Geometry,
    /// Per-fragment stage
    Fragment,
}

impl ShaderStage {
    /// The GL shader type enum for this stage
    pub fn gl_enum(self) -> u32 {
        match self {
            Self::Vertex => glow::VERTEX_SHADER,
            Self::Geometry => glow::GEOMETRY_SHADER,
            Self::Fragment => glow::FRAGMENT_SHADER,
        }
    }

    /// Lowercase stage name
    pub fn name(self) -> &'static str {
        match self {
            Self::Vertex => "vertex",
            Self::Geometry => "geometry",
            Self::Fragment => "fragment",
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gl_enums_are_distinct() {
        assert_eq!(ShaderStage::Vertex.gl_enum(), 0x8B31);
        assert_eq!(ShaderStage::Fragment.gl_enum(), 0x8B30);
        assert_eq!(ShaderStage::Geometry.gl_enum(), 0x8DD9);
    }
}
