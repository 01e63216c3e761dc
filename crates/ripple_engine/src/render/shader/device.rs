//! The driver seam under the shader program
//!
//! [`ShaderDevice`] is the narrow set of GL entry points the shader program
//! needs. The real implementation forwards to a [`glow::Context`]; tests use
//! a recording device so the program lifecycle can be checked without a GPU.

use glow::HasContext;
use std::fmt;

use super::location::Location;
use super::stage::ShaderStage;

/// An active attribute or uniform reported by the driver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveVariable {
    /// Variable name as declared in GLSL
    pub name: String,
    /// Location inside the program
    pub location: Location,
}

/// A value to upload into a uniform slot
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    /// `bool`, uploaded as an integer
    Bool(bool),
    /// `int`
    Int(i32),
    /// `float`
    Float(f32),
    /// `vec2`
    Vec2([f32; 2]),
    /// `vec3`
    Vec3([f32; 3]),
    /// `vec4`
    Vec4([f32; 4]),
    /// `mat3`, column-major
    Mat3([f32; 9]),
    /// `mat4`, column-major
    Mat4([f32; 16]),
}

/// GL entry points used by [`super::ShaderProgram`] and [`super::ShaderUnit`]
///
/// Every call assumes the device's context is current on the calling thread.
pub trait ShaderDevice {
    /// Shader object handle
    type Shader: Copy + Eq + fmt::Debug;
    /// Program object handle
    type Program: Copy + Eq + fmt::Debug;

    /// Allocate an empty shader object for `stage`
    fn create_shader(&self, stage: ShaderStage) -> Result<Self::Shader, String>;
    /// Set the source of `shader`, compile it and report the compile status
    fn compile_shader(&self, shader: Self::Shader, source: &str) -> bool;
    /// The compiler log of `shader`
    fn shader_info_log(&self, shader: Self::Shader) -> String;
    /// Release a shader object
    fn delete_shader(&self, shader: Self::Shader);

    /// Allocate an empty program object
    fn create_program(&self) -> Result<Self::Program, String>;
    /// Attach a compiled shader to a program
    fn attach_shader(&self, program: Self::Program, shader: Self::Shader);
    /// Detach a shader from a program
    fn detach_shader(&self, program: Self::Program, shader: Self::Shader);
    /// Link `program` and report the link status
    fn link_program(&self, program: Self::Program) -> bool;
    /// The linker log of `program`
    fn program_info_log(&self, program: Self::Program) -> String;
    /// Make `program` current, or unbind with `None`
    fn use_program(&self, program: Option<Self::Program>);
    /// Release a program object
    fn delete_program(&self, program: Self::Program);

    /// Location of an active attribute
    fn attribute_location(&self, program: Self::Program, name: &str) -> Location;
    /// Location of an active uniform
    fn uniform_location(&self, program: Self::Program, name: &str) -> Location;
    /// Every active attribute of a linked program
    fn active_attributes(&self, program: Self::Program) -> Vec<ActiveVariable>;
    /// Every active uniform of a linked program
    fn active_uniforms(&self, program: Self::Program) -> Vec<ActiveVariable>;

    /// Upload a value to a uniform of the current program
    ///
    /// A [`Location::NOT_FOUND`] target is ignored.
    fn set_uniform(&self, location: Location, value: UniformValue);
}

fn gl_uniform_location(location: Location) -> Option<glow::UniformLocation> {
    location.index().map(glow::NativeUniformLocation)
}

// SAFETY (all blocks below): the handles passed in were created by this
// context, and callers only use the device while its context is current.
impl ShaderDevice for glow::Context {
    type Shader = glow::Shader;
    type Program = glow::Program;

    fn create_shader(&self, stage: ShaderStage) -> Result<Self::Shader, String> {
        unsafe { HasContext::create_shader(self, stage.gl_enum()) }
    }

    fn compile_shader(&self, shader: Self::Shader, source: &str) -> bool {
        unsafe {
            self.shader_source(shader, source);
            HasContext::compile_shader(self, shader);
            self.get_shader_compile_status(shader)
        }
    }

    fn shader_info_log(&self, shader: Self::Shader) -> String {
        unsafe { self.get_shader_info_log(shader) }
    }

    fn delete_shader(&self, shader: Self::Shader) {
        unsafe { HasContext::delete_shader(self, shader) }
    }

    fn create_program(&self) -> Result<Self::Program, String> {
        unsafe { HasContext::create_program(self) }
    }

    fn attach_shader(&self, program: Self::Program, shader: Self::Shader) {
        unsafe { HasContext::attach_shader(self, program, shader) }
    }

    fn detach_shader(&self, program: Self::Program, shader: Self::Shader) {
        unsafe { HasContext::detach_shader(self, program, shader) }
    }

    fn link_program(&self, program: Self::Program) -> bool {
        unsafe {
            HasContext::link_program(self, program);
            self.get_program_link_status(program)
        }
    }

    fn program_info_log(&self, program: Self::Program) -> String {
        unsafe { self.get_program_info_log(program) }
    }

    fn use_program(&self, program: Option<Self::Program>) {
        unsafe { HasContext::use_program(self, program) }
    }

    fn delete_program(&self, program: Self::Program) {
        unsafe { HasContext::delete_program(self, program) }
    }

    fn attribute_location(&self, program: Self::Program, name: &str) -> Location {
        Location::from(unsafe { self.get_attrib_location(program, name) })
    }

    fn uniform_location(&self, program: Self::Program, name: &str) -> Location {
        Location::from(unsafe { self.get_uniform_location(program, name) }.map(|location| location.0))
    }

    fn active_attributes(&self, program: Self::Program) -> Vec<ActiveVariable> {
        unsafe {
            (0..self.get_active_attributes(program))
                .filter_map(|index| self.get_active_attribute(program, index))
                .map(|attribute| ActiveVariable {
                    location: Location::from(self.get_attrib_location(program, &attribute.name)),
                    name: attribute.name,
                })
                .collect()
        }
    }

    fn active_uniforms(&self, program: Self::Program) -> Vec<ActiveVariable> {
        unsafe {
            (0..self.get_active_uniforms(program))
                .filter_map(|index| self.get_active_uniform(program, index))
                .map(|uniform| ActiveVariable {
                    location: Location::from(
                        self.get_uniform_location(program, &uniform.name).map(|location| location.0),
                    ),
                    name: uniform.name,
                })
                .collect()
        }
    }

    fn set_uniform(&self, location: Location, value: UniformValue) {
        let Some(target) = gl_uniform_location(location) else {
            return;
        };
        let target = Some(&target);
        unsafe {
            match value {
                UniformValue::Bool(v) => self.uniform_1_i32(target, i32::from(v)),
                UniformValue::Int(v) => self.uniform_1_i32(target, v),
                UniformValue::Float(v) => self.uniform_1_f32(target, v),
                UniformValue::Vec2([x, y]) => self.uniform_2_f32(target, x, y),
                UniformValue::Vec3([x, y, z]) => self.uniform_3_f32(target, x, y, z),
                UniformValue::Vec4([x, y, z, w]) => self.uniform_4_f32(target, x, y, z, w),
                UniformValue::Mat3(m) => self.uniform_matrix_3_f32_slice(target, false, &m),
                UniformValue::Mat4(m) => self.uniform_matrix_4_f32_slice(target, false, &m),
            }
        }
    }
}
