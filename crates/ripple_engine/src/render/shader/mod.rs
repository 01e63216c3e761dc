//! GLSL shader compilation and program management
//!
//! - [`ShaderUnit`]: one compiled stage, released on drop
//! - [`ShaderProgram`]: links units and keeps the name-to-location registry
//! - [`ShaderDevice`]: the GL calls both of them make, implemented for
//!   [`glow::Context`]

pub mod device;
pub mod location;
pub mod program;
pub mod stage;
pub mod unit;

#[cfg(test)]
pub(crate) mod testing;

use std::path::PathBuf;
use thiserror::Error;

pub use device::{ActiveVariable, ShaderDevice, UniformValue};
pub use location::Location;
pub use program::{ShaderProgram, RESERVED_PREFIX};
pub use stage::ShaderStage;
pub use unit::ShaderUnit;

/// Shader compilation and linking errors
#[derive(Error, Debug)]
pub enum ShaderError {
    /// The compiler rejected a stage; `log` is the compiler output
    #[error("{stage} shader failed to compile: {log}")]
    Compile {
        /// Stage that failed
        stage: ShaderStage,
        /// Compiler diagnostic
        log: String,
    },

    /// The linker rejected the program; `log` is the linker output
    #[error("program failed to link: {log}")]
    Link {
        /// Linker diagnostic
        log: String,
    },

    /// A shader source file could not be read
    #[error("cannot read shader source {path}: {source}")]
    Io {
        /// File that was requested
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// The driver refused to allocate an object
    #[error("driver failed to {operation}: {reason}")]
    Driver {
        /// What was being attempted
        operation: &'static str,
        /// Driver-provided reason
        reason: String,
    },

    /// The program was used before a successful link
    #[error("program is not linked")]
    NotLinked,
}

/// Result type for shader operations
pub type ShaderResult<T> = Result<T, ShaderError>;
