//! Draw submission interface and a headless backend that records it.

use glam::Vec4;

use crate::handle::TextureHandle;
use crate::model::Mesh;

/// Texture unit binding.
pub trait TextureUnits {
    /// Binds `handle` to texture unit `unit`.
    fn bind_texture(&mut self, unit: u32, handle: TextureHandle);
}

/// Everything a frame submits besides uniforms.
pub trait DrawBackend: TextureUnits {
    /// Called once before the frame is cleared.
    fn begin_frame(&mut self) {}
    /// Clears color and depth.
    fn clear(&mut self, color: Vec4);
    /// Draws one mesh with the current program and bindings.
    fn draw_mesh(&mut self, mesh: &Mesh);
    /// Draws the unit billboard quad used for glows.
    fn draw_glow_quad(&mut self);
}

/// One recorded backend call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Clear(Vec4),
    Bind { unit: u32, handle: TextureHandle },
    Mesh { name: String },
    GlowQuad,
}

/// [`DrawBackend`] that records calls instead of issuing them.
#[derive(Debug, Default, Clone)]
pub struct HeadlessBackend {
    calls: Vec<DrawCall>,
    units: Vec<TextureHandle>,
    frames: u64,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls recorded since the last [`begin_frame`](DrawBackend::begin_frame).
    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    /// Handle currently bound to `unit`, if any.
    pub fn bound(&self, unit: u32) -> Option<TextureHandle> {
        self.units
            .get(unit as usize)
            .copied()
            .filter(|h| h.is_valid())
    }

    /// Number of mesh draws recorded.
    pub fn mesh_draws(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, DrawCall::Mesh { .. }))
            .count()
    }

    /// Number of glow quads recorded.
    pub fn glow_draws(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, DrawCall::GlowQuad))
            .count()
    }

    /// Frames started so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl TextureUnits for HeadlessBackend {
    fn bind_texture(&mut self, unit: u32, handle: TextureHandle) {
        let index = unit as usize;
        if self.units.len() <= index {
            self.units.resize(index + 1, TextureHandle::INVALID);
        }
        self.units[index] = handle;
        self.calls.push(DrawCall::Bind { unit, handle });
    }
}

impl DrawBackend for HeadlessBackend {
    /// Drops the previous frame's calls. Bindings persist across frames.
    fn begin_frame(&mut self) {
        self.calls.clear();
        self.frames += 1;
    }

    fn clear(&mut self, color: Vec4) {
        self.calls.push(DrawCall::Clear(color));
    }

    fn draw_mesh(&mut self, mesh: &Mesh) {
        self.calls.push(DrawCall::Mesh {
            name: mesh.name.clone(),
        });
    }

    fn draw_glow_quad(&mut self) {
        self.calls.push(DrawCall::GlowQuad);
    }
}
