//! Rendering: shader programs, grid geometry, camera, window and the
//! per-frame renderer.

pub mod camera;
pub mod mesh;
pub mod renderer;
pub mod shader;
pub mod window;

pub use camera::{FrameInput, Scene};
pub use mesh::{build_grid, GridMesh, GridSpec, GridVertex, MeshError};
pub use renderer::{FrameRenderer, FrameUniforms, RenderError};
pub use shader::{Location, ShaderError, ShaderProgram, ShaderStage, ShaderUnit};
pub use window::{GlWindow, HostEvent, WindowError};
