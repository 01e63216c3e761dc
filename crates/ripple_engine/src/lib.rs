//! # Ripple Engine
//!
//! Renders a flat grid that a vertex shader deforms into an animated radial
//! ripple, using OpenGL through `glow` and a GLFW window.
//!
//! ## Features
//!
//! - **Shader Programs**: compile, link and introspect GLSL programs with a
//!   name-to-location registry for attributes and uniforms
//! - **Grid Meshes**: regular triangulated grids with a checkerboard split
//! - **Frame Rendering**: fixed perspective camera and per-frame uniforms
//! - **Configuration**: TOML/RON config files with defaults for every value
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ripple_engine::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     ripple_engine::foundation::logging::init();
//!     let config = RippleConfig::default();
//!     Engine::run(&config)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod core;
pub mod foundation;
pub mod render;

mod engine;

pub use engine::{build_program, Engine, EngineError};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        Engine, EngineError,
        core::config::{Config, RippleConfig, ShaderConfig, WaveConfig, WindowConfig},
        foundation::{
            math::{Mat4, Vec3, Vec4},
            time::Timer,
        },
        render::{
            build_grid, FrameInput, FrameRenderer, GlWindow, GridMesh, GridSpec, Location, Scene,
            ShaderProgram, ShaderStage, ShaderUnit,
        },
    };
}
