//! Core engine infrastructure
//!
//! Hosts the unified configuration consumed by the renderer and the
//! application loop.

pub mod config;

// Re-export commonly used config types
pub use config::{
    CameraConfig,
    Config,
    ConfigError,
    MeshConfig,
    RippleConfig,
    ShaderConfig,
    WaveConfig,
    WindowConfig,
};
