//! Core engine implementation

use std::rc::Rc;
use thiserror::Error;

use crate::core::config::{ConfigError, RippleConfig, ShaderConfig};
use crate::foundation::time::Timer;
use crate::render::{
    build_grid, shader::ShaderDevice, FrameRenderer, GlWindow, HostEvent, MeshError, RenderError, Scene,
    ShaderError, ShaderProgram, ShaderStage, WindowError,
};

/// Frames between frame-rate log lines
const FPS_LOG_INTERVAL: u64 = 600;

/// Engine errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Configuration could not be loaded or is invalid
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Window or context creation failed
    #[error("window error: {0}")]
    Window(#[from] WindowError),

    /// Grid parameters were rejected
    #[error("mesh error: {0}")]
    Mesh(#[from] MeshError),

    /// The shader program could not be built
    #[error("shader error: {0}")]
    Shader(#[from] ShaderError),

    /// Renderer setup failed
    #[error("render error: {0}")]
    Render(#[from] RenderError),
}

/// Compile and link the configured shader stages
///
/// A stage whose file is missing or does not compile is reported and left
/// out; the link then goes ahead with whatever stages remain. Only a link
/// failure or a driver refusal is returned as an error.
pub fn build_program<D: ShaderDevice>(
    device: &Rc<D>,
    shaders: &ShaderConfig,
) -> Result<ShaderProgram<D>, ShaderError> {
    let mut program = ShaderProgram::new(Rc::clone(device));

    let stages = [
        (ShaderStage::Vertex, Some(&shaders.vertex_path)),
        (ShaderStage::Geometry, shaders.geometry_path.as_ref()),
        (ShaderStage::Fragment, Some(&shaders.fragment_path)),
    ];
    for (stage, path) in stages {
        let Some(path) = path else { continue };
        match program.add_shader_from_file(stage, path) {
            Ok(()) => {}
            Err(e @ (ShaderError::Io { .. } | ShaderError::Compile { .. })) => {
                log::warn!("Continuing without the {stage} stage: {e}");
            }
            Err(e) => return Err(e),
        }
    }

    program.link()?;
    Ok(program)
}

/// Main engine entry point
///
/// Owns nothing between runs; [`Engine::run`] builds the window, program
/// and mesh, then loops until the window is asked to close.
pub struct Engine;

impl Engine {
    /// Run the ripple renderer with `config` until the window closes
    pub fn run(config: &RippleConfig) -> Result<(), EngineError> {
        config.validate()?;

        log::info!("Initializing engine...");
        let mut window = GlWindow::new(&config.window)?;
        let gl = Rc::new(window.load_gl());

        let mesh = build_grid(config.mesh.grid_spec())?;
        let program = build_program(&gl, &config.shaders)?;

        let (width, height) = window.framebuffer_size();
        let mut scene = Scene::new(&config.camera, width, height);
        let renderer = FrameRenderer::new(Rc::clone(&gl), program, mesh, &config.wave)?;
        renderer.set_viewport(width, height);

        let mut timer = Timer::new();
        log::info!("Starting main loop...");

        while !window.should_close() {
            window.poll_events();
            for event in window.drain_events() {
                match event {
                    HostEvent::Resized(width, height) => {
                        renderer.set_viewport(width, height);
                        scene.resize(width, height);
                        renderer.render(&scene.frame_input(timer.elapsed()));
                        window.swap_buffers();
                    }
                    HostEvent::Refresh => {
                        log::trace!("Window refresh requested");
                        renderer.render(&scene.frame_input(timer.elapsed()));
                        window.swap_buffers();
                    }
                    HostEvent::CloseRequested => log::info!("Escape pressed, closing"),
                }
            }

            timer.update();
            renderer.render(&scene.frame_input(timer.elapsed()));
            window.swap_buffers();

            if timer.frame_count() % FPS_LOG_INTERVAL == 0 {
                log::debug!(
                    "Frame {}: {:.1} fps average, last frame {:.2} ms",
                    timer.frame_count(),
                    timer.average_fps(),
                    timer.delta_time() * 1000.0
                );
            }
        }

        log::info!("Shutting down after {} frames", timer.frame_count());
        // GL objects must go before the context's window
        drop(renderer);
        drop(window);
        Ok(())
    }
}
