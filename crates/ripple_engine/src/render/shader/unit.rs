//! Compiled shader objects

use std::rc::Rc;

use super::device::ShaderDevice;
use super::stage::ShaderStage;
use super::{ShaderError, ShaderResult};

/// A successfully compiled shader object for one stage
///
/// The GL object is released when the unit is dropped. A unit handed to
/// [`super::ShaderProgram::register`] lives until the next link, or until a
/// later registration for the same stage replaces it.
pub struct ShaderUnit<D: ShaderDevice> {
    device: Rc<D>,
    stage: ShaderStage,
    source: String,
    handle: D::Shader,
}

impl<D: ShaderDevice> ShaderUnit<D> {
    /// Compile `source` for `stage`
    ///
    /// On failure the compiler log is returned in [`ShaderError::Compile`]
    /// and the shader object is released before returning.
    pub fn compile(device: &Rc<D>, stage: ShaderStage, source: impl Into<String>) -> ShaderResult<Self> {
        let source = source.into();
        let handle = device
            .create_shader(stage)
            .map_err(|reason| ShaderError::Driver { operation: "create shader", reason })?;

        if !device.compile_shader(handle, &source) {
            let log = device.shader_info_log(handle);
            device.delete_shader(handle);
            log::error!("{stage} shader compile error: {}", log.trim_end());
            return Err(ShaderError::Compile { stage, log });
        }

        log::debug!("Compiled {stage} shader {handle:?}");
        Ok(Self {
            device: Rc::clone(device),
            stage,
            source,
            handle,
        })
    }

    /// The stage this unit was compiled for
    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    /// The source text it was compiled from
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The driver handle
    pub fn handle(&self) -> D::Shader {
        self.handle
    }
}

impl<D: ShaderDevice> Drop for ShaderUnit<D> {
    fn drop(&mut self) {
        log::debug!("Releasing {} shader {:?}", self.stage, self.handle);
        self.device.delete_shader(self.handle);
    }
}

impl<D: ShaderDevice> std::fmt::Debug for ShaderUnit<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShaderUnit")
            .field("stage", &self.stage)
            .field("handle", &self.handle)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::shader::testing::{RecordingDevice, FRAGMENT_SOURCE, VERTEX_SOURCE};

    #[test]
    fn test_compile_success_keeps_handle_until_drop() {
        let device = Rc::new(RecordingDevice::default());

        let unit = ShaderUnit::compile(&device, ShaderStage::Vertex, VERTEX_SOURCE).unwrap();
        assert_eq!(unit.stage(), ShaderStage::Vertex);
        assert_eq!(unit.source(), VERTEX_SOURCE);
        assert_eq!(device.live_shader_count(), 1);

        drop(unit);
        assert_eq!(device.live_shader_count(), 0);
        assert_eq!(device.double_releases(), 0);
    }

    #[test]
    fn test_compile_failure_reports_log_and_releases() {
        let device = Rc::new(RecordingDevice::default());

        let err = ShaderUnit::compile(&device, ShaderStage::Fragment, "this is not glsl").unwrap_err();
        match err {
            ShaderError::Compile { stage, log } => {
                assert_eq!(stage, ShaderStage::Fragment);
                assert!(!log.is_empty());
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(device.live_shader_count(), 0);
        assert_eq!(device.shaders_deleted(), 1);
    }

    #[test]
    fn test_driver_refusal_is_reported() {
        let device = Rc::new(RecordingDevice::default());
        device.refuse_allocations(true);

        let err = ShaderUnit::compile(&device, ShaderStage::Fragment, FRAGMENT_SOURCE).unwrap_err();
        assert!(matches!(err, ShaderError::Driver { operation: "create shader", .. }));
        assert_eq!(device.shaders_deleted(), 0);
    }
}
