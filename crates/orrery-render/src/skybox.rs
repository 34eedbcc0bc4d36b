//! Skybox drawing interface.
//!
//! The skybox is drawn first each frame with the camera translation removed
//! from the view so it stays centred on the eye.

use std::path::Path;

use glam::{Mat3, Mat4};
use tracing::warn;

use crate::handle::TextureHandle;
use crate::texture::TextureStore;

/// Number of cube faces, in +X, -X, +Y, -Y, +Z, -Z order.
pub const CUBE_FACES: usize = 6;

/// Draws the environment cube.
pub trait SkyboxRenderer {
    /// `view` must already have its translation removed.
    fn draw(&mut self, view: Mat4, projection: Mat4);

    /// Returns any textures the skybox holds to `store`.
    fn release(&mut self, _store: &mut dyn TextureStore) {}
}

/// The rotation part of `view` as a 4×4 matrix.
pub fn strip_translation(view: Mat4) -> Mat4 {
    Mat4::from_mat3(Mat3::from_mat4(view))
}

/// Headless [`SkyboxRenderer`] holding one texture per face.
#[derive(Debug, Default, Clone)]
pub struct HeadlessSkybox {
    faces: Vec<TextureHandle>,
    last_draw: Option<(Mat4, Mat4)>,
    draws: u64,
}

impl HeadlessSkybox {
    /// Loads the six face images. Faces that fail to load stay invalid.
    pub fn load<P: AsRef<Path>>(faces: &[P], store: &mut dyn TextureStore) -> Self {
        if faces.len() != CUBE_FACES {
            warn!(
                "Skybox expects {} faces, got {}",
                CUBE_FACES,
                faces.len()
            );
        }
        let faces = faces
            .iter()
            .take(CUBE_FACES)
            .map(|face| store.load_texture(face.as_ref()))
            .collect();
        Self {
            faces,
            ..Self::default()
        }
    }

    /// Face handles in load order.
    pub fn faces(&self) -> &[TextureHandle] {
        &self.faces
    }

    /// Whether all six faces loaded.
    pub fn is_complete(&self) -> bool {
        self.faces.len() == CUBE_FACES && self.faces.iter().all(|f| f.is_valid())
    }

    /// Matrices passed to the most recent draw.
    pub fn last_draw(&self) -> Option<(Mat4, Mat4)> {
        self.last_draw
    }

    /// Number of draws so far.
    pub fn draws(&self) -> u64 {
        self.draws
    }
}

impl SkyboxRenderer for HeadlessSkybox {
    fn draw(&mut self, view: Mat4, projection: Mat4) {
        self.last_draw = Some((view, projection));
        self.draws += 1;
    }

    fn release(&mut self, store: &mut dyn TextureStore) {
        for face in self.faces.drain(..) {
            store.release_texture(face);
        }
    }
}
