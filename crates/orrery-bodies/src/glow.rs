//! Camera-facing glow billboard.

use glam::{Mat3, Mat4, Vec3};

/// Model matrix for a quad at `position` that always faces the camera.
///
/// The inverse of the view rotation (its transpose, since it is
/// orthonormal) cancels the camera's orientation, so the quad's local XY
/// plane ends up parallel to the screen.
pub fn billboard_transform(position: Vec3, view: Mat4, scale: f32) -> Mat4 {
    let camera_rotation = Mat3::from_mat4(view).transpose();
    Mat4::from_translation(position)
        * Mat4::from_mat3(camera_rotation)
        * Mat4::from_scale(Vec3::splat(scale))
}
