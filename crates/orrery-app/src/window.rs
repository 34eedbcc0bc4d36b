//! Window creation and event handling via winit.
//!
//! [`ViewerApp`] implements winit's [`ApplicationHandler`]: it forwards
//! input to [`AppState`], and on every redraw ticks the clock, runs one
//! frame and updates the window title.

use std::sync::Arc;

use orrery_config::Config;
use tracing::{error, info, instrument};
use winit::application::ApplicationHandler;
use winit::event::{DeviceEvent, DeviceId, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Fullscreen, Window, WindowAttributes, WindowId};

use crate::error::AppError;
use crate::state::AppState;

/// Returns [`WindowAttributes`] based on the given configuration.
pub fn window_attributes_from_config(config: &Config) -> WindowAttributes {
    let attrs = WindowAttributes::default()
        .with_title(config.window.title.clone())
        .with_inner_size(winit::dpi::LogicalSize::new(
            config.window.width as f64,
            config.window.height as f64,
        ));
    if config.window.fullscreen {
        attrs.with_fullscreen(Some(Fullscreen::Borderless(None)))
    } else {
        attrs
    }
}

/// The window host.
pub struct ViewerApp {
    state: AppState,
    window: Option<Arc<Window>>,
    failure: Option<AppError>,
}

impl ViewerApp {
    pub fn new(config: Config) -> Self {
        Self {
            state: AppState::new(config),
            window: None,
            failure: None,
        }
    }

    fn set_captured(&mut self, captured: bool) {
        if let Some(window) = &self.window {
            self.state.mouse_mut().set_captured(window, captured);
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let time = self.state.clock_mut().tick();
        self.state.step(time);

        if self.state.exit_requested() {
            event_loop.exit();
            return;
        }
        if let Some(window) = &self.window {
            window.set_title(&self.state.status_line());
            window.request_redraw();
        }
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let attrs = window_attributes_from_config(self.state.config());
        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                error!("Failed to create window: {e}");
                self.failure = Some(e.into());
                event_loop.exit();
                return;
            }
        };

        let size = window.inner_size();
        self.state.resize(size.width, size.height);
        info!(
            "Window created: {}x{} (scale: {:.2})",
            size.width,
            size.height,
            window.scale_factor()
        );
        window.request_redraw();
        self.window = Some(window);

        if self.state.config().input.capture_cursor {
            self.set_captured(true);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested, shutting down");
                self.state.request_exit();
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                self.state.resize(new_size.width, new_size.height);
            }
            WindowEvent::KeyboardInput { event, .. } => {
                self.state.keyboard_mut().process_event(&event);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.state.mouse_mut().on_cursor_moved(position.x, position.y);
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.state.mouse_mut().on_button(button, state);
                if button == MouseButton::Left && !self.state.mouse().is_captured() {
                    self.set_captured(true);
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.state.mouse_mut().on_scroll(delta);
            }
            WindowEvent::CursorEntered { .. } => {
                self.state.mouse_mut().on_cursor_entered();
            }
            WindowEvent::CursorLeft { .. } => {
                self.state.mouse_mut().on_cursor_left();
            }
            WindowEvent::Focused(false) => {
                // Key releases are not delivered while unfocused.
                self.state.keyboard_mut().release_all();
                if self.state.mouse().is_captured() {
                    self.set_captured(false);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.state.mouse_mut().on_raw_motion(delta.0, delta.1);
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.state.shutdown();
    }
}

/// Creates an event loop and runs the viewer with the given config.
///
/// Blocks until the window is closed.
#[instrument(skip(config))]
pub fn run_with_config(config: Config) -> Result<(), AppError> {
    let event_loop = EventLoop::new()?;
    let mut app = ViewerApp::new(config);
    event_loop.run_app(&mut app)?;
    match app.failure.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::{LogicalSize, Size};

    #[test]
    fn test_window_attributes_from_config() {
        let mut config = Config::default();
        config.window.width = 1600;
        config.window.height = 900;
        config.window.title = "Orrery".to_string();

        let attrs = window_attributes_from_config(&config);
        assert_eq!(attrs.title, "Orrery");
        assert_eq!(
            attrs.inner_size,
            Some(Size::Logical(LogicalSize::new(1600.0, 900.0)))
        );
        assert!(attrs.fullscreen.is_none());
    }

    #[test]
    fn test_fullscreen_is_borderless() {
        let mut config = Config::default();
        config.window.fullscreen = true;
        let attrs = window_attributes_from_config(&config);
        assert_eq!(attrs.fullscreen, Some(Fullscreen::Borderless(None)));
    }
}
