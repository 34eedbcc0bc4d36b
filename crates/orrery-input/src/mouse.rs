//! Frame-coherent mouse state for mouse-look and scroll-zoom.
//!
//! [`MouseState`] accumulates cursor motion and wheel input during a frame.
//! The first cursor position seen (and the first after the cursor re-enters
//! the window) produces no motion, so the view does not jump.

use glam::Vec2;
use tracing::debug;
use winit::event::{ElementState, MouseButton, MouseScrollDelta};

/// Pixels of smooth scrolling treated as one wheel line.
const PIXELS_PER_LINE: f64 = 40.0;

/// Cursor, wheel and click state for one frame.
#[derive(Debug, Clone, Default)]
pub struct MouseState {
    position: Option<Vec2>,
    delta: Vec2,
    scroll: f32,
    left_clicked: bool,
    captured: bool,
    cursor_in_window: bool,
}

impl MouseState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ── Event handlers ──────────────────────────────────────────────

    /// `CursorMoved`. Ignored for motion while captured; raw deltas are used
    /// then.
    pub fn on_cursor_moved(&mut self, x: f64, y: f64) {
        let new_pos = Vec2::new(x as f32, y as f32);
        if !self.captured
            && let Some(old) = self.position
        {
            self.delta += new_pos - old;
        }
        self.position = Some(new_pos);
    }

    /// `DeviceEvent::MouseMotion`. Only counted while captured.
    pub fn on_raw_motion(&mut self, dx: f64, dy: f64) {
        if self.captured {
            self.delta += Vec2::new(dx as f32, dy as f32);
        }
    }

    /// `MouseWheel`. Positive is away from the user.
    pub fn on_scroll(&mut self, delta: MouseScrollDelta) {
        self.scroll += match delta {
            MouseScrollDelta::LineDelta(_, y) => y,
            MouseScrollDelta::PixelDelta(pos) => (pos.y / PIXELS_PER_LINE) as f32,
        };
    }

    /// `MouseInput`. Only left-button presses are tracked.
    pub fn on_button(&mut self, button: MouseButton, state: ElementState) {
        if button == MouseButton::Left && state == ElementState::Pressed {
            self.left_clicked = true;
        }
    }

    /// `CursorEntered`.
    pub fn on_cursor_entered(&mut self) {
        self.cursor_in_window = true;
        self.position = None;
    }

    /// `CursorLeft`.
    pub fn on_cursor_left(&mut self) {
        self.cursor_in_window = false;
        self.position = None;
    }

    /// Grabs (or frees) the cursor on `window` and switches between raw and
    /// position-based motion.
    pub fn set_captured(&mut self, window: &winit::window::Window, captured: bool) {
        use winit::window::CursorGrabMode;
        if captured {
            // Locked is not supported everywhere; Confined is the fallback.
            if window.set_cursor_grab(CursorGrabMode::Locked).is_err() {
                let _ = window.set_cursor_grab(CursorGrabMode::Confined);
            }
            window.set_cursor_visible(false);
        } else {
            let _ = window.set_cursor_grab(CursorGrabMode::None);
            window.set_cursor_visible(true);
        }
        debug!("Cursor captured: {}", captured);
        self.set_captured_flag(captured);
    }

    /// Sets the capture flag without touching a window.
    pub fn set_captured_flag(&mut self, captured: bool) {
        self.captured = captured;
        self.position = None;
    }

    /// Clears per-frame motion, scroll and clicks.
    pub fn clear_transients(&mut self) {
        self.delta = Vec2::ZERO;
        self.scroll = 0.0;
        self.left_clicked = false;
    }

    // ── Queries ─────────────────────────────────────────────────────

    /// Last cursor position, if one has been seen since entering.
    #[must_use]
    pub fn position(&self) -> Option<Vec2> {
        self.position
    }

    /// Raw motion this frame in window pixels (+y is down).
    #[must_use]
    pub fn delta(&self) -> Vec2 {
        self.delta
    }

    /// Motion as yaw/pitch offsets: +x turns right, +y looks up. With
    /// `invert_y`, moving the mouse down looks up.
    #[must_use]
    pub fn look_offset(&self, invert_y: bool) -> Vec2 {
        if invert_y {
            self.delta
        } else {
            Vec2::new(self.delta.x, -self.delta.y)
        }
    }

    /// Wheel lines accumulated this frame.
    #[must_use]
    pub fn scroll(&self) -> f32 {
        self.scroll
    }

    /// Whether the left button was pressed this frame.
    #[must_use]
    pub fn left_clicked(&self) -> bool {
        self.left_clicked
    }

    #[must_use]
    pub fn is_captured(&self) -> bool {
        self.captured
    }

    #[must_use]
    pub fn is_cursor_in_window(&self) -> bool {
        self.cursor_in_window
    }
}
