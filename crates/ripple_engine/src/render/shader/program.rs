//! Linked GLSL programs
//!
//! [`ShaderProgram`] collects at most one compiled unit per stage, links them
//! and then serves as the registry of attribute and uniform locations the
//! renderer reads every frame.
//!
//! Required call order:
//!
//! 1. [`ShaderProgram::add_shader`] / [`ShaderProgram::add_shader_from_file`] /
//!    [`ShaderProgram::register`] for each stage
//! 2. [`ShaderProgram::link`]
//! 3. [`ShaderProgram::activate`]
//! 4. [`ShaderProgram::register_attribute`] / [`ShaderProgram::register_uniform`]
//! 5. [`ShaderProgram::lookup_attribute`] / [`ShaderProgram::lookup_uniform`]
//!    and the `set_*` helpers during rendering
//! 6. [`ShaderProgram::destroy`], or just drop the program
//!
//! Compile and link failures are returned to the caller and also logged.
//! The program stays usable afterwards: a failed stage is simply absent, and
//! a failed link leaves the program unlinked with every lookup returning
//! [`Location::NOT_FOUND`].

use std::collections::{BTreeMap, HashMap};
use std::fmt::Write as _;
use std::path::Path;
use std::rc::Rc;

use super::device::{ShaderDevice, UniformValue};
use super::location::Location;
use super::stage::ShaderStage;
use super::unit::ShaderUnit;
use super::{ShaderError, ShaderResult};
use crate::foundation::math::{Mat3, Mat3Ext, Mat4, Mat4Ext, Vec2, Vec3, Vec4};

/// Names starting with this prefix belong to GLSL built-ins
pub const RESERVED_PREFIX: &str = "gl_";

/// A GLSL program and its name-to-location registry
pub struct ShaderProgram<D: ShaderDevice> {
    device: Rc<D>,
    units: BTreeMap<ShaderStage, ShaderUnit<D>>,
    handle: Option<D::Program>,
    linked: bool,
    attributes: HashMap<String, Location>,
    uniforms: HashMap<String, Location>,
}

impl<D: ShaderDevice> ShaderProgram<D> {
    /// Create an empty program with no stages and no driver object
    pub fn new(device: Rc<D>) -> Self {
        Self {
            device,
            units: BTreeMap::new(),
            handle: None,
            linked: false,
            attributes: HashMap::new(),
            uniforms: HashMap::new(),
        }
    }

    /// Compile `source` and register it for `stage`
    ///
    /// On a compile error the stage is left as it was and the error returned.
    pub fn add_shader(&mut self, stage: ShaderStage, source: &str) -> ShaderResult<()> {
        let unit = ShaderUnit::compile(&self.device, stage, source)?;
        self.register(unit);
        Ok(())
    }

    /// Read a source file, compile it and register it for `stage`
    pub fn add_shader_from_file(&mut self, stage: ShaderStage, path: impl AsRef<Path>) -> ShaderResult<()> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| {
            log::error!("Cannot read {stage} shader {}: {source}", path.display());
            ShaderError::Io { path: path.to_path_buf(), source }
        })?;
        log::debug!("Loaded {stage} shader source from {}", path.display());
        self.add_shader(stage, &source)
    }

    /// Register a compiled unit
    ///
    /// A later registration for the same stage replaces the earlier one,
    /// releasing its shader object.
    pub fn register(&mut self, unit: ShaderUnit<D>) {
        let stage = unit.stage();
        if let Some(previous) = self.units.insert(stage, unit) {
            log::debug!("Replacing {stage} shader {:?}", previous.handle());
        }
    }

    /// Whether a compiled unit is waiting to be linked for `stage`
    pub fn has_stage(&self, stage: ShaderStage) -> bool {
        self.units.contains_key(&stage)
    }

    /// Stages currently waiting to be linked
    pub fn pending_stages(&self) -> Vec<ShaderStage> {
        self.units.keys().copied().collect()
    }

    /// Link every registered unit into a new program object
    ///
    /// Any previous program object is released first and the location maps
    /// are cleared. Whatever the outcome, every registered unit is released
    /// once this returns.
    pub fn link(&mut self) -> ShaderResult<()> {
        self.destroy();
        self.attributes.clear();
        self.uniforms.clear();

        let units = std::mem::take(&mut self.units);
        let program = self
            .device
            .create_program()
            .map_err(|reason| ShaderError::Driver { operation: "create program", reason })?;
        self.handle = Some(program);

        for unit in units.values() {
            self.device.attach_shader(program, unit.handle());
        }
        let linked = self.device.link_program(program);
        for unit in units.values() {
            self.device.detach_shader(program, unit.handle());
        }
        let stages: Vec<ShaderStage> = units.keys().copied().collect();
        drop(units);

        if !linked {
            let log = self.device.program_info_log(program);
            log::error!("Program {program:?} link error: {}", log.trim_end());
            return Err(ShaderError::Link { log });
        }

        self.linked = true;
        log::info!("Linked program {program:?} from stages {stages:?}");
        Ok(())
    }

    /// Whether the last [`Self::link`] succeeded
    pub fn is_linked(&self) -> bool {
        self.linked
    }

    /// The driver program handle, if one exists
    pub fn handle(&self) -> Option<D::Program> {
        self.handle
    }

    /// Make this program current for subsequent draws
    ///
    /// Refuses, without touching the driver, when the program is not linked.
    pub fn activate(&self) -> ShaderResult<()> {
        match self.handle {
            Some(program) if self.linked => {
                self.device.use_program(Some(program));
                Ok(())
            }
            _ => Err(ShaderError::NotLinked),
        }
    }

    /// Unbind whatever program is current
    pub fn deactivate(&self) {
        self.device.use_program(None);
    }

    /// Query and store the location of attribute `name`
    ///
    /// Stores and returns [`Location::NOT_FOUND`] when the program is not
    /// linked, the name is reserved, or the attribute is not active.
    pub fn register_attribute(&mut self, name: &str) -> Location {
        let location = self.query(name, |device, program| device.attribute_location(program, name));
        if !location.is_found() {
            log::warn!("Attribute '{name}' has no location in this program");
        }
        self.attributes.insert(name.to_string(), location);
        location
    }

    /// Query and store the location of uniform `name`
    ///
    /// Same rules as [`Self::register_attribute`].
    pub fn register_uniform(&mut self, name: &str) -> Location {
        let location = self.query(name, |device, program| device.uniform_location(program, name));
        if !location.is_found() {
            log::warn!("Uniform '{name}' has no location in this program");
        }
        self.uniforms.insert(name.to_string(), location);
        location
    }

    fn query(&self, name: &str, lookup: impl FnOnce(&D, D::Program) -> Location) -> Location {
        match self.handle {
            Some(program) if self.linked && !name.starts_with(RESERVED_PREFIX) => {
                lookup(self.device.as_ref(), program)
            }
            _ => Location::NOT_FOUND,
        }
    }

    /// Previously registered location of attribute `name`
    pub fn lookup_attribute(&self, name: &str) -> Location {
        self.attributes.get(name).copied().unwrap_or(Location::NOT_FOUND)
    }

    /// Previously registered location of uniform `name`
    pub fn lookup_uniform(&self, name: &str) -> Location {
        self.uniforms.get(name).copied().unwrap_or(Location::NOT_FOUND)
    }

    /// Release the program object
    ///
    /// Safe to call any number of times, including before any link.
    pub fn destroy(&mut self) {
        if let Some(program) = self.handle.take() {
            log::debug!("Deleting program {program:?}");
            self.device.delete_program(program);
        }
        self.linked = false;
    }

    /// Upload `value` to `location` of the current program
    pub fn set_uniform(&self, location: Location, value: UniformValue) {
        self.device.set_uniform(location, value);
    }

    /// Upload a `bool` uniform by registered name
    pub fn set_bool(&self, name: &str, value: bool) {
        self.set_uniform(self.lookup_uniform(name), UniformValue::Bool(value));
    }

    /// Upload an `int` uniform by registered name
    pub fn set_int(&self, name: &str, value: i32) {
        self.set_uniform(self.lookup_uniform(name), UniformValue::Int(value));
    }

    /// Upload a `float` uniform by registered name
    pub fn set_float(&self, name: &str, value: f32) {
        self.set_uniform(self.lookup_uniform(name), UniformValue::Float(value));
    }

    /// Upload a `vec2` uniform by registered name
    pub fn set_vec2(&self, name: &str, value: &Vec2) {
        self.set_uniform(self.lookup_uniform(name), UniformValue::Vec2([value.x, value.y]));
    }

    /// Upload a `vec3` uniform by registered name
    pub fn set_vec3(&self, name: &str, value: &Vec3) {
        self.set_uniform(self.lookup_uniform(name), UniformValue::Vec3([value.x, value.y, value.z]));
    }

    /// Upload a `vec4` uniform by registered name
    pub fn set_vec4(&self, name: &str, value: &Vec4) {
        self.set_uniform(
            self.lookup_uniform(name),
            UniformValue::Vec4([value.x, value.y, value.z, value.w]),
        );
    }

    /// Upload a `mat3` uniform by registered name
    pub fn set_mat3(&self, name: &str, value: &Mat3) {
        self.set_uniform(self.lookup_uniform(name), UniformValue::Mat3(value.to_column_array()));
    }

    /// Upload a `mat4` uniform by registered name
    pub fn set_mat4(&self, name: &str, value: &Mat4) {
        self.set_uniform(self.lookup_uniform(name), UniformValue::Mat4(value.to_column_array()));
    }

    /// Human-readable listing of the program's active variables
    pub fn describe(&self) -> String {
        let mut out = String::new();
        let Some(program) = self.handle else {
            out.push_str("GLSL program: <none>\n");
            return out;
        };

        let _ = writeln!(out, "GLSL program handle: {program:?} (linked: {})", self.linked);
        if !self.linked {
            return out;
        }
        for attribute in self.device.active_attributes(program) {
            let _ = writeln!(out, "Attribute name: {} location: {}", attribute.name, attribute.location);
        }
        for uniform in self.device.active_uniforms(program) {
            let _ = writeln!(out, "Uniform name:   {} location: {}", uniform.name, uniform.location);
        }
        out
    }
}

impl<D: ShaderDevice> Drop for ShaderProgram<D> {
    fn drop(&mut self) {
        self.destroy();
    }
}
