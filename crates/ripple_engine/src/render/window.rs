//! GLFW window with an OpenGL context
//!
//! Creates the window and its core-profile context, loads the GL function
//! pointers into a [`glow::Context`], and turns raw GLFW events into the
//! few [`HostEvent`]s the application loop reacts to.

use glfw::Context as _;
use thiserror::Error;

use crate::core::config::WindowConfig;

/// Window management errors
#[derive(Error, Debug)]
pub enum WindowError {
    /// `glfwInit` failed
    #[error("GLFW initialization failed: {0}")]
    InitializationFailed(String),

    /// Window or context creation failed
    #[error("Window creation failed ({width}x{height}, OpenGL {major}.{minor} core)")]
    CreationFailed {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
        /// Requested context major version
        major: u32,
        /// Requested context minor version
        minor: u32,
    },
}

/// Result type for window operations
pub type WindowResult<T> = Result<T, WindowError>;

/// Window events the application loop handles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    /// Framebuffer resized to the given pixel size
    Resized(u32, u32),
    /// Window contents need redrawing
    Refresh,
    /// User asked to quit (Escape)
    CloseRequested,
}

impl HostEvent {
    /// Map a GLFW event, ignoring the ones the application does not use
    pub fn from_glfw(event: &glfw::WindowEvent) -> Option<Self> {
        match *event {
            glfw::WindowEvent::Key(glfw::Key::Escape, _, glfw::Action::Press, _) => Some(Self::CloseRequested),
            glfw::WindowEvent::FramebufferSize(width, height) => Some(Self::Resized(
                u32::try_from(width).unwrap_or(0),
                u32::try_from(height).unwrap_or(0),
            )),
            glfw::WindowEvent::Refresh => Some(Self::Refresh),
            _ => None,
        }
    }
}

fn log_glfw_error(error: glfw::Error, description: String) {
    log::error!("GLFW error {error:?}: {description}");
}

/// GLFW window owning a current OpenGL context
pub struct GlWindow {
    glfw: glfw::Glfw,
    window: glfw::PWindow,
    events: glfw::GlfwReceiver<(f64, glfw::WindowEvent)>,
}

impl GlWindow {
    /// Create the window and make its context current on this thread
    pub fn new(config: &WindowConfig) -> WindowResult<Self> {
        let mut glfw = glfw::init(log_glfw_error)
            .map_err(|e| WindowError::InitializationFailed(format!("{e:?}")))?;

        let (major, minor) = config.gl_version;
        glfw.window_hint(glfw::WindowHint::ContextVersion(major, minor));
        glfw.window_hint(glfw::WindowHint::OpenGlProfile(glfw::OpenGlProfileHint::Core));
        glfw.window_hint(glfw::WindowHint::OpenGlForwardCompat(true));
        glfw.window_hint(glfw::WindowHint::Resizable(true));

        let (mut window, events) = glfw
            .create_window(config.width, config.height, &config.title, glfw::WindowMode::Windowed)
            .ok_or(WindowError::CreationFailed {
                width: config.width,
                height: config.height,
                major,
                minor,
            })?;

        window.make_current();
        glfw.set_swap_interval(if config.vsync {
            glfw::SwapInterval::Sync(1)
        } else {
            glfw::SwapInterval::None
        });

        window.set_key_polling(true);
        window.set_framebuffer_size_polling(true);
        window.set_refresh_polling(true);
        window.set_close_polling(true);

        log::info!(
            "Created {}x{} window '{}' with OpenGL {major}.{minor} core context",
            config.width,
            config.height,
            config.title
        );

        Ok(Self { glfw, window, events })
    }

    /// Load GL function pointers for this window's context
    pub fn load_gl(&mut self) -> glow::Context {
        // SAFETY: the context was made current in `new` and the loader
        // returns pointers for that context.
        unsafe { glow::Context::from_loader_function(|name| self.window.get_proc_address(name) as *const _) }
    }

    /// Whether a close has been requested
    pub fn should_close(&self) -> bool {
        self.window.should_close()
    }

    /// Process pending window-system events
    pub fn poll_events(&mut self) {
        self.glfw.poll_events();
    }

    /// Drain queued events into [`HostEvent`]s
    ///
    /// Escape also sets the close flag.
    pub fn drain_events(&mut self) -> Vec<HostEvent> {
        let events: Vec<HostEvent> = glfw::flush_messages(&self.events)
            .filter_map(|(_, event)| HostEvent::from_glfw(&event))
            .collect();
        if events.contains(&HostEvent::CloseRequested) {
            self.window.set_should_close(true);
        }
        events
    }

    /// Framebuffer size in pixels
    pub fn framebuffer_size(&self) -> (u32, u32) {
        let (width, height) = self.window.get_framebuffer_size();
        (u32::try_from(width).unwrap_or(0), u32::try_from(height).unwrap_or(0))
    }

    /// Present the back buffer
    pub fn swap_buffers(&mut self) {
        self.window.swap_buffers();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glfw::{Action, Key, Modifiers, WindowEvent};

    #[test]
    fn test_escape_press_requests_close() {
        let event = WindowEvent::Key(Key::Escape, 0, Action::Press, Modifiers::empty());
        assert_eq!(HostEvent::from_glfw(&event), Some(HostEvent::CloseRequested));
    }

    #[test]
    fn test_other_keys_and_releases_are_ignored() {
        let release = WindowEvent::Key(Key::Escape, 0, Action::Release, Modifiers::empty());
        let other = WindowEvent::Key(Key::Space, 0, Action::Press, Modifiers::empty());
        assert_eq!(HostEvent::from_glfw(&release), None);
        assert_eq!(HostEvent::from_glfw(&other), None);
    }

    #[test]
    fn test_framebuffer_and_refresh_events() {
        assert_eq!(
            HostEvent::from_glfw(&WindowEvent::FramebufferSize(1920, 1080)),
            Some(HostEvent::Resized(1920, 1080))
        );
        assert_eq!(HostEvent::from_glfw(&WindowEvent::FramebufferSize(-1, 4)), Some(HostEvent::Resized(0, 4)));
        assert_eq!(HostEvent::from_glfw(&WindowEvent::Refresh), Some(HostEvent::Refresh));
        assert_eq!(HostEvent::from_glfw(&WindowEvent::Close), None);
    }
}
