//! # Ripple Configuration
//!
//! All tunables of the ripple renderer in one serializable structure, split
//! into window, shader, mesh, camera and wave sections. Every section has
//! `#[serde(default)]`, so a config file only needs the values it changes.
//!
//! ```toml
//! [mesh]
//! quads_x = 80
//! quads_z = 80
//!
//! [wave]
//! wireframe = false
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub use crate::config::{Config, ConfigError};
use crate::render::mesh::GridSpec;

/// Directories searched, in order, when resolving shader file names
const SHADER_DIRS: [&str; 5] = [
    "shaders/",
    "ripple_app/shaders/",
    "resources/shaders/",
    "../shaders/",
    "./",
];

/// # Window Configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    /// Initial width in screen coordinates
    pub width: u32,
    /// Initial height in screen coordinates
    pub height: u32,
    /// Title bar text
    pub title: String,
    /// Requested OpenGL context version (major, minor)
    pub gl_version: (u32, u32),
    /// Wait for vertical sync on present
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 960,
            title: "Ripple Mesh Deformer".to_string(),
            gl_version: (4, 1),
            vsync: true,
        }
    }
}

/// # Shader Configuration
///
/// Paths of the GLSL source files, one per stage. The geometry stage is
/// optional.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ShaderConfig {
    /// Path to the vertex shader source
    pub vertex_path: PathBuf,
    /// Path to the fragment shader source
    pub fragment_path: PathBuf,
    /// Path to an optional geometry shader source
    pub geometry_path: Option<PathBuf>,
}

impl ShaderConfig {
    /// Create a new shader configuration
    pub fn new(vertex_path: impl Into<PathBuf>, fragment_path: impl Into<PathBuf>) -> Self {
        Self {
            vertex_path: vertex_path.into(),
            fragment_path: fragment_path.into(),
            geometry_path: None,
        }
    }

    /// Create shader config with automatic path resolution
    ///
    /// Tries the common shader locations so the binary can be started from
    /// the workspace root or from the app directory.
    pub fn with_path_resolution(vertex_name: &str, fragment_name: &str) -> Self {
        Self::new(resolve_shader_path(vertex_name), resolve_shader_path(fragment_name))
    }
}

impl Default for ShaderConfig {
    fn default() -> Self {
        Self::with_path_resolution("ripple.vert", "ripple.frag")
    }
}

fn resolve_shader_path(name: &str) -> PathBuf {
    SHADER_DIRS
        .iter()
        .map(|dir| Path::new(dir).join(name))
        .find(|candidate| candidate.exists())
        .unwrap_or_else(|| Path::new("shaders").join(name))
}

/// # Mesh Configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MeshConfig {
    /// Number of quads along X
    pub quads_x: u32,
    /// Number of quads along Z
    pub quads_z: u32,
    /// World-space extent along X
    pub size_x: f32,
    /// World-space extent along Z
    pub size_z: f32,
}

impl MeshConfig {
    /// Grid parameters for the mesh builder
    pub fn grid_spec(&self) -> GridSpec {
        GridSpec {
            quads_x: self.quads_x,
            quads_z: self.quads_z,
            size_x: self.size_x,
            size_z: self.size_z,
        }
    }
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            quads_x: 40,
            quads_z: 40,
            size_x: 4.0,
            size_z: 4.0,
        }
    }
}

/// # Camera Configuration
///
/// Angles are in radians, the field of view in degrees.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees
    pub fov_y_degrees: f32,
    /// Near clip plane distance
    pub near: f32,
    /// Far clip plane distance
    pub far: f32,
    /// Translation along the view axis
    pub distance: f32,
    /// Rotation about X
    pub rotation_x: f32,
    /// Rotation about Y
    pub rotation_y: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_y_degrees: 45.0,
            near: 1.0,
            far: 1000.0,
            distance: -5.0,
            rotation_x: 500.0,
            rotation_y: -75.0,
        }
    }
}

/// # Wave Configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WaveConfig {
    /// Scale applied to `sin(elapsed)` before it is sent as `waveTime`
    pub speed: f32,
    /// RGBA colour sent as `newColor`
    pub color: [f32; 4],
    /// Clear colour
    pub clear_color: [f32; 4],
    /// Draw polygon outlines instead of filled triangles
    pub wireframe: bool,
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            speed: 2.0,
            color: [0.0, 1.0, 0.0, 1.0],
            clear_color: [0.0, 0.0, 0.0, 1.0],
            wireframe: true,
        }
    }
}

/// # Complete Ripple Configuration
///
/// Top-level configuration consumed by [`crate::Engine::run`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RippleConfig {
    /// Window and context settings
    pub window: WindowConfig,
    /// Shader source locations
    pub shaders: ShaderConfig,
    /// Grid resolution and extent
    pub mesh: MeshConfig,
    /// Camera placement and projection
    pub camera: CameraConfig,
    /// Animation and colour
    pub wave: WaveConfig,
}

impl RippleConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::Invalid("window size must be non-zero".to_string()));
        }
        if self.window.title.is_empty() {
            return Err(ConfigError::Invalid("window title cannot be empty".to_string()));
        }
        if self.window.gl_version.0 < 3 || (self.window.gl_version.0 == 3 && self.window.gl_version.1 < 2) {
            return Err(ConfigError::Invalid(format!(
                "OpenGL {}.{} has no core profile; 3.2 or newer is required",
                self.window.gl_version.0, self.window.gl_version.1
            )));
        }

        self.mesh
            .grid_spec()
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        let camera = &self.camera;
        if !(camera.fov_y_degrees > 0.0 && camera.fov_y_degrees < 180.0) {
            return Err(ConfigError::Invalid(format!(
                "field of view must be in (0, 180) degrees, got {}",
                camera.fov_y_degrees
            )));
        }
        if !(camera.near > 0.0 && camera.near < camera.far) {
            return Err(ConfigError::Invalid(format!(
                "clip planes must satisfy 0 < near < far, got near={} far={}",
                camera.near, camera.far
            )));
        }

        Ok(())
    }
}

impl Config for RippleConfig {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigFormat;

    #[test]
    fn test_defaults_validate() {
        let config = RippleConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.mesh.quads_x, 40);
        assert_eq!(config.window.gl_version, (4, 1));
        assert!(config.wave.wireframe);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let text = r#"
            [mesh]
            quads_x = 8

            [wave]
            speed = 0.5
        "#;
        let config = RippleConfig::from_str_with(text, ConfigFormat::Toml).unwrap();

        assert_eq!(config.mesh.quads_x, 8);
        assert_eq!(config.mesh.quads_z, 40);
        assert_eq!(config.wave.speed, 0.5);
        assert_eq!(config.window, WindowConfig::default());
    }

    #[test]
    fn test_ron_and_toml_agree() {
        let mut config = RippleConfig::default();
        config.camera.distance = -7.5;
        config.shaders.geometry_path = Some(PathBuf::from("shaders/extra.geom"));

        for format in [ConfigFormat::Toml, ConfigFormat::Ron] {
            let text = config.to_string_with(format).unwrap();
            let parsed = RippleConfig::from_str_with(&text, format).unwrap();
            assert_eq!(parsed, config, "{format:?}");
        }
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = RippleConfig::default();
        config.mesh.quads_z = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = RippleConfig::default();
        config.camera.near = 10.0;
        config.camera.far = 1.0;
        assert!(config.validate().is_err());

        let mut config = RippleConfig::default();
        config.window.gl_version = (2, 1);
        assert!(config.validate().is_err());

        let mut config = RippleConfig::default();
        config.window.width = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unresolved_shader_falls_back_to_shaders_dir() {
        let shaders = ShaderConfig::with_path_resolution("does-not-exist.vert", "nor-this.frag");
        assert_eq!(shaders.vertex_path, Path::new("shaders").join("does-not-exist.vert"));
        assert_eq!(shaders.fragment_path, Path::new("shaders").join("nor-this.frag"));
    }
}
