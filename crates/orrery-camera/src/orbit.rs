//! Scripted circular camera path around a target.

use glam::Vec3;

/// Shape of the orbit-camera path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitRig {
    /// Horizontal distance from the target.
    pub radius: f32,
    /// Angular rate in rad/s.
    pub speed: f32,
    /// Height above the target.
    pub height: f32,
}

impl OrbitRig {
    /// Offset of the eye from the target at `time` seconds.
    pub fn offset(&self, time: f32) -> Vec3 {
        let angle = time * self.speed;
        Vec3::new(
            self.radius * angle.cos(),
            self.height,
            self.radius * angle.sin(),
        )
    }
}

impl Default for OrbitRig {
    fn default() -> Self {
        Self {
            radius: 6.0,
            speed: 0.5,
            height: 2.0,
        }
    }
}
