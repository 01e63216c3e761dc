//! Recording [`ShaderDevice`] for tests
//!
//! Hands out increasing integer handles, tracks which objects are alive and
//! counts releases of dead handles. Compilation accepts any source with a
//! `main` function and balanced brackets; linking requires a vertex stage.
//! Active variables are picked out of `in` and `uniform` declarations.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};

use super::device::{ActiveVariable, ShaderDevice, UniformValue};
use super::location::Location;
use super::stage::ShaderStage;

pub const VERTEX_SOURCE: &str = "\
#version 410 core
in vec3 vertex;
uniform float waveTime;
uniform mat4 modelViewProjectMatrix;
void main() {
    gl_Position = modelViewProjectMatrix * vec4(vertex.x, sin(waveTime), vertex.z, 1.0);
}
";

pub const FRAGMENT_SOURCE: &str = "\
#version 410 core
uniform vec4 newColor;
out vec4 fragColor;
void main() {
    fragColor = newColor;
}
";

pub const GEOMETRY_SOURCE: &str = "\
#version 410 core
layout(triangles) in;
layout(triangle_strip, max_vertices = 3) out;
void main() {
    for (int i = 0; i < 3; ++i) { gl_Position = gl_in[i].gl_Position; EmitVertex(); }
    EndPrimitive();
}
";

#[derive(Default)]
struct ShaderState {
    stage: Option<ShaderStage>,
    source: String,
    log: String,
}

#[derive(Default)]
struct ProgramState {
    attached: BTreeSet<u32>,
    attributes: Vec<String>,
    uniforms: Vec<String>,
    log: String,
}

#[derive(Default)]
struct State {
    next_handle: u32,
    refuse_allocations: bool,
    shaders: BTreeMap<u32, ShaderState>,
    programs: BTreeMap<u32, ProgramState>,
    deleted_shaders: Vec<u32>,
    deleted_programs: Vec<u32>,
    double_releases: usize,
    location_queries: usize,
    attached_stages: Vec<ShaderStage>,
    current_program: Option<u32>,
    uploads: Vec<(Location, UniformValue)>,
}

impl State {
    fn allocate(&mut self) -> Result<u32, String> {
        if self.refuse_allocations {
            return Err("out of handles".to_string());
        }
        self.next_handle += 1;
        Ok(self.next_handle)
    }
}

/// In-memory stand-in for a GL context
#[derive(Default)]
pub struct RecordingDevice {
    state: RefCell<State>,
}

impl RecordingDevice {
    pub fn refuse_allocations(&self, refuse: bool) {
        self.state.borrow_mut().refuse_allocations = refuse;
    }

    pub fn live_shader_count(&self) -> usize {
        self.state.borrow().shaders.len()
    }

    pub fn live_program_count(&self) -> usize {
        self.state.borrow().programs.len()
    }

    pub fn shaders_deleted(&self) -> usize {
        self.state.borrow().deleted_shaders.len()
    }

    pub fn programs_deleted(&self) -> usize {
        self.state.borrow().deleted_programs.len()
    }

    pub fn was_deleted(&self, shader: u32) -> bool {
        self.state.borrow().deleted_shaders.contains(&shader)
    }

    pub fn last_created_shader(&self) -> Option<u32> {
        self.state.borrow().shaders.keys().next_back().copied()
    }

    pub fn double_releases(&self) -> usize {
        self.state.borrow().double_releases
    }

    pub fn location_queries(&self) -> usize {
        self.state.borrow().location_queries
    }

    /// Stages attached at the most recent link, in attach order
    pub fn attached_stages(&self) -> Vec<ShaderStage> {
        self.state.borrow().attached_stages.clone()
    }

    pub fn current_program(&self) -> Option<u32> {
        self.state.borrow().current_program
    }

    pub fn uploads(&self) -> Vec<(Location, UniformValue)> {
        self.state.borrow().uploads.clone()
    }
}

fn compiles(source: &str) -> Result<(), String> {
    if !source.contains("void main") {
        return Err("ERROR: 0:1: 'main' : function not defined".to_string());
    }
    let balanced = |open: char, close: char| {
        let mut depth = 0i32;
        for c in source.chars() {
            if c == open {
                depth += 1;
            } else if c == close {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            }
        }
        depth == 0
    };
    if !balanced('(', ')') || !balanced('{', '}') {
        return Err("ERROR: 0:1: syntax error, unexpected end of file".to_string());
    }
    Ok(())
}

fn declared(source: &str, qualifier: &str) -> Vec<String> {
    source
        .lines()
        .filter_map(|line| {
            let tokens: Vec<&str> = line.trim().trim_end_matches(';').split_whitespace().collect();
            match tokens.as_slice() {
                [q, _ty, name] if *q == qualifier => Some((*name).to_string()),
                _ => None,
            }
        })
        .collect()
}

fn position(names: &[String], name: &str) -> Location {
    Location::from(names.iter().position(|n| n == name).map(|i| i as u32))
}

impl ShaderDevice for RecordingDevice {
    type Shader = u32;
    type Program = u32;

    fn create_shader(&self, stage: ShaderStage) -> Result<u32, String> {
        let mut state = self.state.borrow_mut();
        let handle = state.allocate()?;
        state.shaders.insert(handle, ShaderState { stage: Some(stage), ..ShaderState::default() });
        Ok(handle)
    }

    fn compile_shader(&self, shader: u32, source: &str) -> bool {
        let mut state = self.state.borrow_mut();
        let Some(entry) = state.shaders.get_mut(&shader) else {
            return false;
        };
        entry.source = source.to_string();
        match compiles(source) {
            Ok(()) => true,
            Err(log) => {
                entry.log = log;
                false
            }
        }
    }

    fn shader_info_log(&self, shader: u32) -> String {
        self.state.borrow().shaders.get(&shader).map(|s| s.log.clone()).unwrap_or_default()
    }

    fn delete_shader(&self, shader: u32) {
        let mut state = self.state.borrow_mut();
        if state.shaders.remove(&shader).is_some() {
            state.deleted_shaders.push(shader);
        } else {
            state.double_releases += 1;
        }
    }

    fn create_program(&self) -> Result<u32, String> {
        let mut state = self.state.borrow_mut();
        let handle = state.allocate()?;
        state.programs.insert(handle, ProgramState::default());
        state.attached_stages.clear();
        Ok(handle)
    }

    fn attach_shader(&self, program: u32, shader: u32) {
        let mut state = self.state.borrow_mut();
        if let Some(stage) = state.shaders.get(&shader).and_then(|s| s.stage) {
            state.attached_stages.push(stage);
        }
        if let Some(entry) = state.programs.get_mut(&program) {
            entry.attached.insert(shader);
        }
    }

    fn detach_shader(&self, program: u32, shader: u32) {
        if let Some(entry) = self.state.borrow_mut().programs.get_mut(&program) {
            entry.attached.remove(&shader);
        }
    }

    fn link_program(&self, program: u32) -> bool {
        let mut state = self.state.borrow_mut();
        let attached: Vec<(ShaderStage, String)> = state
            .programs
            .get(&program)
            .map(|p| {
                p.attached
                    .iter()
                    .filter_map(|handle| state.shaders.get(handle))
                    .filter_map(|s| s.stage.map(|stage| (stage, s.source.clone())))
                    .collect()
            })
            .unwrap_or_default();

        let Some(entry) = state.programs.get_mut(&program) else {
            return false;
        };
        if !attached.iter().any(|(stage, _)| *stage == ShaderStage::Vertex) {
            entry.log = "ERROR: Program has no vertex shader attached".to_string();
            return false;
        }

        for (stage, source) in &attached {
            if *stage == ShaderStage::Vertex {
                entry.attributes.extend(declared(source, "in"));
            }
            for uniform in declared(source, "uniform") {
                if !entry.uniforms.contains(&uniform) {
                    entry.uniforms.push(uniform);
                }
            }
        }
        true
    }

    fn program_info_log(&self, program: u32) -> String {
        self.state.borrow().programs.get(&program).map(|p| p.log.clone()).unwrap_or_default()
    }

    fn use_program(&self, program: Option<u32>) {
        self.state.borrow_mut().current_program = program;
    }

    fn delete_program(&self, program: u32) {
        let mut state = self.state.borrow_mut();
        if state.programs.remove(&program).is_some() {
            state.deleted_programs.push(program);
        } else {
            state.double_releases += 1;
        }
    }

    fn attribute_location(&self, program: u32, name: &str) -> Location {
        let mut state = self.state.borrow_mut();
        state.location_queries += 1;
        state.programs.get(&program).map_or(Location::NOT_FOUND, |p| position(&p.attributes, name))
    }

    fn uniform_location(&self, program: u32, name: &str) -> Location {
        let mut state = self.state.borrow_mut();
        state.location_queries += 1;
        state.programs.get(&program).map_or(Location::NOT_FOUND, |p| position(&p.uniforms, name))
    }

    fn active_attributes(&self, program: u32) -> Vec<ActiveVariable> {
        let state = self.state.borrow();
        state
            .programs
            .get(&program)
            .map(|p| {
                p.attributes
                    .iter()
                    .map(|name| ActiveVariable {
                        name: name.clone(),
                        location: position(&p.attributes, name),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    fn active_uniforms(&self, program: u32) -> Vec<ActiveVariable> {
        let state = self.state.borrow();
        state
            .programs
            .get(&program)
            .map(|p| {
                p.uniforms
                    .iter()
                    .map(|name| ActiveVariable {
                        name: name.clone(),
                        location: position(&p.uniforms, name),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    fn set_uniform(&self, location: Location, value: UniformValue) {
        if location.is_found() {
            self.state.borrow_mut().uploads.push((location, value));
        }
    }
}
