//! Procedural orbital and axial motion.
//!
//! A body's placement is a pure function of elapsed time: the same time
//! always yields the same matrix, so nothing about motion is stored.

use glam::{Mat4, Vec3, Vec4};

/// Camera-facing glow billboard settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlowParams {
    /// Size of the billboard quad.
    pub scale: f32,
    /// RGBA tint handed to the glow shader.
    pub tint: Vec4,
}

/// Immutable motion and appearance parameters of a body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitParams {
    /// Uniform model scale.
    pub scale: f32,
    /// Semi-major axis.
    pub orbital_radius: f32,
    /// Orbital angular rate in rad/s.
    pub orbital_speed: f32,
    /// Spin rate in degrees per second.
    pub axial_speed: f32,
    /// Axial tilt in degrees, about +Z.
    pub axial_tilt: f32,
    /// Minor/major axis ratio; 1.0 is circular.
    pub ellipticity: f32,
    /// Glow billboard, if the body has one.
    pub glow: Option<GlowParams>,
}

impl Default for OrbitParams {
    fn default() -> Self {
        Self {
            scale: 1.0,
            orbital_radius: 0.0,
            orbital_speed: 0.0,
            axial_speed: 0.0,
            axial_tilt: 0.0,
            ellipticity: 1.0,
            glow: None,
        }
    }
}

impl OrbitParams {
    /// Orbit angle in radians at `time` seconds.
    pub fn orbit_angle(&self, time: f32) -> f32 {
        time * self.orbital_speed
    }

    /// Position on the (possibly elliptical) orbit in the XZ plane.
    pub fn orbital_position(&self, time: f32) -> Vec3 {
        let angle = self.orbit_angle(time);
        Vec3::new(
            self.orbital_radius * angle.cos(),
            0.0,
            self.orbital_radius * self.ellipticity * angle.sin(),
        )
    }

    /// Model matrix at `time`: translate to the orbital position, tilt about
    /// Z, spin about Y, then scale.
    pub fn world_transform(&self, time: f32) -> Mat4 {
        Mat4::from_translation(self.orbital_position(time))
            * Mat4::from_rotation_z(self.axial_tilt.to_radians())
            * Mat4::from_rotation_y((time * self.axial_speed).to_radians())
            * Mat4::from_scale(Vec3::splat(self.scale))
    }

    /// Origin of the model after [`world_transform`](Self::world_transform).
    pub fn world_position(&self, time: f32) -> Vec3 {
        self.world_transform(time).transform_point3(Vec3::ZERO)
    }
}
