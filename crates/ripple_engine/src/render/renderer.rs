//! Per-frame ripple renderer
//!
//! Owns the linked program and the GPU copies of the grid. Every frame it
//! uploads the MVP matrix, the mesh colour and the wave phase, clears, and
//! issues one indexed draw over the whole grid.

use glow::HasContext;
use std::rc::Rc;
use thiserror::Error;

use super::camera::FrameInput;
use super::mesh::GridMesh;
use super::shader::{Location, ShaderError, ShaderProgram, UniformValue};
use crate::core::config::WaveConfig;
use crate::foundation::math::Mat4Ext;

/// Position attribute consumed by the vertex stage
pub const VERTEX_ATTRIBUTE: &str = "vertex";
/// Wave phase uniform
pub const WAVE_TIME_UNIFORM: &str = "waveTime";
/// Combined transform uniform
pub const MVP_UNIFORM: &str = "modelViewProjectMatrix";
/// Mesh colour uniform
pub const COLOR_UNIFORM: &str = "newColor";

/// Rendering errors
#[derive(Error, Debug)]
pub enum RenderError {
    /// Program misuse or failure
    #[error("shader error: {0}")]
    Shader(#[from] ShaderError),

    /// The linked program does not consume the position attribute
    #[error("program has no active '{0}' attribute")]
    MissingAttribute(&'static str),

    /// More indices than one draw call can address
    #[error("{0} indices exceed the draw call limit")]
    TooManyIndices(usize),

    /// The driver refused to allocate an object
    #[error("driver failed to {operation}: {reason}")]
    Driver {
        /// What was being attempted
        operation: &'static str,
        /// Driver-provided reason
        reason: String,
    },
}

/// Result type for rendering operations
pub type RenderResult<T> = Result<T, RenderError>;

/// Wave phase sent to the vertex stage: `sin(elapsed) * speed`
pub fn wave_time(elapsed: f32, speed: f32) -> f32 {
    elapsed.sin() * speed
}

/// Uniform values for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameUniforms {
    /// Column-major model-view-projection matrix
    pub model_view_projection: [f32; 16],
    /// Mesh colour
    pub color: [f32; 4],
    /// Wave phase
    pub wave_time: f32,
}

impl FrameUniforms {
    /// Derive the uniforms for `frame`
    pub fn for_frame(frame: &FrameInput, wave: &WaveConfig) -> Self {
        Self {
            model_view_projection: frame.model_view_projection().to_column_array(),
            color: wave.color,
            wave_time: wave_time(frame.elapsed, wave.speed),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct UniformSlots {
    model_view_projection: Location,
    color: Location,
    wave_time: Location,
}

/// Create the vertex array and the two buffers of a grid
///
/// If any allocation fails, the objects already created are released
/// before the error is returned.
fn allocate_grid_objects<A: Copy, B: Copy>(
    mut create_array: impl FnMut() -> Result<A, String>,
    mut create_buffer: impl FnMut() -> Result<B, String>,
    mut delete_array: impl FnMut(A),
    mut delete_buffer: impl FnMut(B),
) -> RenderResult<(A, B, B)> {
    let driver = |operation: &'static str| move |reason: String| RenderError::Driver { operation, reason };

    let vertex_array = create_array().map_err(driver("create vertex array"))?;
    let vertex_buffer = match create_buffer() {
        Ok(buffer) => buffer,
        Err(reason) => {
            delete_array(vertex_array);
            return Err(driver("create vertex buffer")(reason));
        }
    };
    let index_buffer = match create_buffer() {
        Ok(buffer) => buffer,
        Err(reason) => {
            delete_buffer(vertex_buffer);
            delete_array(vertex_array);
            return Err(driver("create index buffer")(reason));
        }
    };
    Ok((vertex_array, vertex_buffer, index_buffer))
}

/// Draws the uploaded grid with the ripple program
pub struct FrameRenderer {
    gl: Rc<glow::Context>,
    program: ShaderProgram<glow::Context>,
    slots: UniformSlots,
    wave: WaveConfig,
    vertex_array: glow::VertexArray,
    vertex_buffer: glow::Buffer,
    index_buffer: glow::Buffer,
    index_count: i32,
}

impl FrameRenderer {
    /// Take ownership of a linked program and upload `mesh`
    ///
    /// Registers the attribute and uniforms the ripple shaders use. A
    /// uniform the program does not have is tolerated (its uploads are
    /// ignored); a missing position attribute is an error.
    pub fn new(
        gl: Rc<glow::Context>,
        mut program: ShaderProgram<glow::Context>,
        mesh: GridMesh,
        wave: &WaveConfig,
    ) -> RenderResult<Self> {
        program.activate()?;

        let position = program.register_attribute(VERTEX_ATTRIBUTE);
        let slots = UniformSlots {
            wave_time: program.register_uniform(WAVE_TIME_UNIFORM),
            model_view_projection: program.register_uniform(MVP_UNIFORM),
            color: program.register_uniform(COLOR_UNIFORM),
        };
        log::info!("{}", program.describe().trim_end());

        let position_index = position.index().ok_or(RenderError::MissingAttribute(VERTEX_ATTRIBUTE))?;
        let index_count = i32::try_from(mesh.indices().len())
            .map_err(|_| RenderError::TooManyIndices(mesh.indices().len()))?;

        let (vertices, indices) = mesh.into_parts();

        // SAFETY: `gl` is the context current on this thread; each closure
        // only creates or deletes objects of that context.
        let (vertex_array, vertex_buffer, index_buffer) = allocate_grid_objects(
            || unsafe { gl.create_vertex_array() },
            || unsafe { gl.create_buffer() },
            |array| unsafe { gl.delete_vertex_array(array) },
            |buffer| unsafe { gl.delete_buffer(buffer) },
        )?;

        // SAFETY: the objects bound here are the ones allocated just above
        unsafe {
            gl.bind_vertex_array(Some(vertex_array));

            gl.bind_buffer(glow::ARRAY_BUFFER, Some(vertex_buffer));
            gl.buffer_data_u8_slice(glow::ARRAY_BUFFER, bytemuck::cast_slice(&vertices), glow::STATIC_DRAW);
            gl.vertex_attrib_pointer_f32(position_index, 3, glow::FLOAT, false, 0, 0);
            gl.enable_vertex_attrib_array(position_index);

            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(index_buffer));
            gl.buffer_data_u8_slice(glow::ELEMENT_ARRAY_BUFFER, bytemuck::cast_slice(&indices), glow::STATIC_DRAW);

            gl.bind_vertex_array(None);

            if wave.wireframe {
                gl.polygon_mode(glow::FRONT_AND_BACK, glow::LINE);
            }
        }

        log::debug!(
            "Uploaded {} vertices and {} indices to {:?}/{:?}",
            vertices.len(),
            indices.len(),
            vertex_buffer,
            index_buffer
        );

        Ok(Self {
            gl,
            program,
            slots,
            wave: wave.clone(),
            vertex_array,
            vertex_buffer,
            index_buffer,
            index_count,
        })
    }

    /// Match the GL viewport to the framebuffer
    pub fn set_viewport(&self, width: u32, height: u32) {
        let width = i32::try_from(width).unwrap_or(i32::MAX);
        let height = i32::try_from(height).unwrap_or(i32::MAX);
        // SAFETY: plain state change on the current context
        unsafe { self.gl.viewport(0, 0, width, height) };
    }

    /// Draw one frame; presenting is left to the window
    pub fn render(&self, frame: &FrameInput) {
        let uniforms = FrameUniforms::for_frame(frame, &self.wave);
        let [r, g, b, a] = self.wave.clear_color;

        // SAFETY: the vertex array and program belong to this context
        unsafe {
            self.gl.bind_vertex_array(Some(self.vertex_array));
        }

        self.program
            .set_uniform(self.slots.model_view_projection, UniformValue::Mat4(uniforms.model_view_projection));
        self.program.set_uniform(self.slots.color, UniformValue::Vec4(uniforms.color));
        self.program.set_uniform(self.slots.wave_time, UniformValue::Float(uniforms.wave_time));

        // SAFETY: as above
        unsafe {
            self.gl.clear_color(r, g, b, a);
            self.gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
            self.gl.draw_elements(glow::TRIANGLES, self.index_count, glow::UNSIGNED_INT, 0);
            self.gl.bind_vertex_array(None);
        }
    }
}

impl Drop for FrameRenderer {
    fn drop(&mut self) {
        log::debug!("Releasing grid buffers");
        self.program.deactivate();
        // SAFETY: these objects were created by this context and are not
        // used after this point
        unsafe {
            self.gl.delete_vertex_array(self.vertex_array);
            self.gl.delete_buffer(self.vertex_buffer);
            self.gl.delete_buffer(self.index_buffer);
        }
    }
}
