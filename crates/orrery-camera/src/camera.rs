//! Euler-angle camera with a scripted orbit mode.
//!
//! The camera has two modes. In [`CameraMode::FreeFly`] keyboard, mouse and
//! scroll input move and rotate it. [`Camera::orbit`] switches it to
//! [`CameraMode::Orbiting`], where its position and orientation are driven
//! each frame by the orbit routine and free-fly input is silently ignored.
//! Only [`Camera::reset`] returns it to free-fly.

use std::fmt::Write;

use glam::{Mat4, Vec3};
use tracing::debug;

use crate::basis::{Basis, euler_front};
use crate::orbit::OrbitRig;

/// Default yaw in degrees; looks down -Z.
pub const DEFAULT_YAW: f32 = -90.0;
/// Default pitch in degrees.
pub const DEFAULT_PITCH: f32 = 0.0;
/// Default movement speed in world units per second.
pub const DEFAULT_SPEED: f32 = 5.0;
/// Default degrees of rotation per pixel of mouse movement.
pub const DEFAULT_SENSITIVITY: f32 = 0.1;
/// Default (and widest) field of view in degrees.
pub const DEFAULT_ZOOM: f32 = 45.0;

/// Pitch is kept inside ±this many degrees when constraining.
pub const PITCH_LIMIT: f32 = 89.0;
/// Narrowest field of view in degrees.
pub const ZOOM_MIN: f32 = 1.0;
/// Widest field of view in degrees.
pub const ZOOM_MAX: f32 = 45.0;

/// Direction of a discrete movement step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Movement {
    /// Along `front`.
    Forward,
    /// Against `front`.
    Backward,
    /// Against `right`.
    Left,
    /// Along `right`.
    Right,
}

/// Which input drives the camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraMode {
    /// Keyboard/mouse/scroll input.
    FreeFly,
    /// The orbit routine; free-fly input is ignored.
    Orbiting,
}

/// State restored by [`Camera::reset`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraSnapshot {
    /// Eye position.
    pub position: Vec3,
    /// Yaw in degrees.
    pub yaw: f32,
    /// Pitch in degrees.
    pub pitch: f32,
    /// Field of view in degrees.
    pub zoom: f32,
}

/// Free-fly camera with yaw/pitch orientation and an orbit mode.
#[derive(Debug, Clone)]
pub struct Camera {
    position: Vec3,
    basis: Basis,
    world_up: Vec3,
    yaw: f32,
    pitch: f32,
    zoom: f32,
    /// World units per second for [`process_movement`](Self::process_movement).
    pub movement_speed: f32,
    /// Degrees per pixel for [`process_look`](Self::process_look).
    pub mouse_sensitivity: f32,
    is_orbiting: bool,
    initial: CameraSnapshot,
}

impl Camera {
    /// Creates a camera at `position` looking along `yaw`/`pitch` (degrees).
    /// The construction state is captured for [`reset`](Self::reset).
    pub fn new(position: Vec3, world_up: Vec3, yaw: f32, pitch: f32) -> Self {
        let mut camera = Self {
            position,
            basis: Basis::default(),
            world_up,
            yaw,
            pitch,
            zoom: DEFAULT_ZOOM,
            movement_speed: DEFAULT_SPEED,
            mouse_sensitivity: DEFAULT_SENSITIVITY,
            is_orbiting: false,
            initial: CameraSnapshot {
                position,
                yaw,
                pitch,
                zoom: DEFAULT_ZOOM,
            },
        };
        camera.update_vectors();
        camera
    }

    /// Sets the starting field of view, clamped to `[ZOOM_MIN, ZOOM_MAX]`.
    /// Also becomes the zoom restored by [`reset`](Self::reset).
    #[must_use]
    pub fn with_zoom(mut self, zoom: f32) -> Self {
        self.zoom = zoom.clamp(ZOOM_MIN, ZOOM_MAX);
        self.initial.zoom = self.zoom;
        self
    }

    /// Sets the movement speed.
    #[must_use]
    pub fn with_movement_speed(mut self, speed: f32) -> Self {
        self.movement_speed = speed;
        self
    }

    /// Sets the mouse sensitivity.
    #[must_use]
    pub fn with_mouse_sensitivity(mut self, sensitivity: f32) -> Self {
        self.mouse_sensitivity = sensitivity;
        self
    }

    // ── Queries ─────────────────────────────────────────────────────

    /// Eye position in world space.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Unit view direction.
    pub fn front(&self) -> Vec3 {
        self.basis.front
    }

    /// Unit camera-space +X.
    pub fn right(&self) -> Vec3 {
        self.basis.right
    }

    /// Unit camera-space +Y.
    pub fn up(&self) -> Vec3 {
        self.basis.up
    }

    /// The full orthonormal basis.
    pub fn basis(&self) -> Basis {
        self.basis
    }

    /// World up used for basis derivation.
    pub fn world_up(&self) -> Vec3 {
        self.world_up
    }

    /// Yaw in degrees. Stale while orbiting.
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Pitch in degrees. Stale while orbiting.
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Field of view in degrees.
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Whether the orbit routine currently drives the camera.
    pub fn is_orbiting(&self) -> bool {
        self.is_orbiting
    }

    /// Current mode.
    pub fn mode(&self) -> CameraMode {
        if self.is_orbiting {
            CameraMode::Orbiting
        } else {
            CameraMode::FreeFly
        }
    }

    /// The state captured at construction.
    pub fn initial_state(&self) -> CameraSnapshot {
        self.initial
    }

    /// Right-handed view matrix looking from `position` along `front`.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.basis.front, self.basis.up)
    }

    /// OpenGL-style perspective projection using [`zoom`](Self::zoom) as
    /// the vertical field of view.
    pub fn projection_matrix(&self, aspect_ratio: f32, near: f32, far: f32) -> Mat4 {
        Mat4::perspective_rh_gl(self.zoom.to_radians(), aspect_ratio, near, far)
    }

    // ── Free-fly input ──────────────────────────────────────────────

    /// Moves `movement_speed * dt` along `front` or `right`. Ignored while
    /// orbiting.
    pub fn process_movement(&mut self, direction: Movement, dt: f32) {
        if self.is_orbiting {
            return;
        }
        let velocity = self.movement_speed * dt;
        match direction {
            Movement::Forward => self.position += self.basis.front * velocity,
            Movement::Backward => self.position -= self.basis.front * velocity,
            Movement::Left => self.position -= self.basis.right * velocity,
            Movement::Right => self.position += self.basis.right * velocity,
        }
    }

    /// Applies a mouse delta in pixels to yaw and pitch. With
    /// `constrain_pitch`, pitch stays within ±[`PITCH_LIMIT`]. Ignored while
    /// orbiting.
    pub fn process_look(&mut self, dx: f32, dy: f32, constrain_pitch: bool) {
        if self.is_orbiting {
            return;
        }
        self.yaw += dx * self.mouse_sensitivity;
        self.pitch += dy * self.mouse_sensitivity;

        if constrain_pitch {
            self.pitch = self.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        }

        self.update_vectors();
    }

    /// Narrows the field of view by `offset` degrees, clamped to
    /// `[ZOOM_MIN, ZOOM_MAX]`. Ignored while orbiting.
    pub fn process_zoom(&mut self, offset: f32) {
        if self.is_orbiting {
            return;
        }
        self.zoom = (self.zoom - offset).clamp(ZOOM_MIN, ZOOM_MAX);
    }

    // ── Orbit mode ──────────────────────────────────────────────────

    /// Turns the camera toward `target` without touching yaw/pitch. A
    /// target at the eye position leaves the orientation unchanged.
    pub fn look_at(&mut self, target: Vec3) {
        if let Some(basis) =
            Basis::looking_along_or(target - self.position, self.world_up, self.basis.right)
        {
            self.basis = basis;
        }
    }

    /// Places the camera on `rig`'s circle around `target` at `time`
    /// seconds and faces the target. Enters orbit mode.
    pub fn orbit(&mut self, target: Vec3, time: f32, rig: &OrbitRig) {
        if !self.is_orbiting {
            debug!("Camera entering orbit mode around {target}");
            self.is_orbiting = true;
        }
        self.position = target + rig.offset(time);
        self.look_at(target);
    }

    /// Restores the construction state and leaves orbit mode.
    pub fn reset(&mut self) {
        self.position = self.initial.position;
        self.yaw = self.initial.yaw;
        self.pitch = self.initial.pitch;
        self.zoom = self.initial.zoom;
        if self.is_orbiting {
            debug!("Camera leaving orbit mode");
        }
        self.is_orbiting = false;
        self.update_vectors();
    }

    /// Writes a one-line summary (mode, position, orientation, fov).
    pub fn write_status(&self, out: &mut String) {
        let p = self.position;
        let mode = match self.mode() {
            CameraMode::FreeFly => "free",
            CameraMode::Orbiting => "orbit",
        };
        let _ = write!(
            out,
            "[{mode}] pos=({:.1}, {:.1}, {:.1}) yaw={:.1} pitch={:.1} fov={:.0}",
            p.x, p.y, p.z, self.yaw, self.pitch, self.zoom,
        );
    }

    fn update_vectors(&mut self) {
        let front = euler_front(self.yaw, self.pitch);
        if let Some(basis) = Basis::looking_along_or(front, self.world_up, self.basis.right) {
            self.basis = basis;
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Vec3::Y, DEFAULT_YAW, DEFAULT_PITCH)
    }
}
