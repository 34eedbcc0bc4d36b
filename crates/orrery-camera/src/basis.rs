//! Orthonormal camera basis derived from Euler angles or a view direction.

use glam::Vec3;

/// The camera's `front`/`right`/`up` triple.
///
/// Always built through one of the constructors, which keep the three
/// vectors unit length and mutually orthogonal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Basis {
    /// View direction.
    pub front: Vec3,
    /// Camera-space +X.
    pub right: Vec3,
    /// Camera-space +Y.
    pub up: Vec3,
}

/// Unit view direction for `yaw`/`pitch` in degrees. Yaw -90 with pitch 0
/// looks down -Z.
pub fn euler_front(yaw: f32, pitch: f32) -> Vec3 {
    let (yaw, pitch) = (yaw.to_radians(), pitch.to_radians());
    Vec3::new(
        yaw.cos() * pitch.cos(),
        pitch.sin(),
        yaw.sin() * pitch.cos(),
    )
    .normalize()
}

impl Basis {
    /// Basis looking along `front`, with `right = front × world_up` and
    /// `up = right × front`. Returns `None` when `front` is zero or
    /// parallel to `world_up`.
    pub fn looking_along(front: Vec3, world_up: Vec3) -> Option<Self> {
        let front = front.try_normalize()?;
        let right = front.cross(world_up).try_normalize()?;
        let up = right.cross(front).try_normalize()?;
        Some(Self { front, right, up })
    }

    /// Like [`looking_along`](Self::looking_along), but when `front` is
    /// parallel to `world_up` the right vector is taken from `right_hint`
    /// (projected onto the plane orthogonal to `front`).
    pub fn looking_along_or(front: Vec3, world_up: Vec3, right_hint: Vec3) -> Option<Self> {
        if let Some(basis) = Self::looking_along(front, world_up) {
            return Some(basis);
        }
        let front = front.try_normalize()?;
        let right = (right_hint - front * right_hint.dot(front)).try_normalize()?;
        let up = right.cross(front).try_normalize()?;
        Some(Self { front, right, up })
    }

    /// Largest deviation from orthonormality: the max over the three norms'
    /// distance from 1 and the three pairwise dot products.
    pub fn orthonormal_error(&self) -> f32 {
        let norms = [self.front, self.right, self.up].map(|v| (v.length() - 1.0).abs());
        let dots = [
            self.front.dot(self.right).abs(),
            self.front.dot(self.up).abs(),
            self.right.dot(self.up).abs(),
        ];
        norms.into_iter().chain(dots).fold(0.0, f32::max)
    }
}

impl Default for Basis {
    fn default() -> Self {
        Self {
            front: Vec3::NEG_Z,
            right: Vec3::X,
            up: Vec3::Y,
        }
    }
}
