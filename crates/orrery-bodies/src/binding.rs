//! Texture-unit binding strategies.
//!
//! Each body picks one strategy. Its result is a list of [`UnitBinding`]s:
//! which texture goes on which unit, and which sampler uniform is pointed
//! at that unit.

use orrery_render::{Mesh, TextureHandle, TextureKind};

/// Uniform name for the single texture of [`TextureBinding::Simple`].
pub const SIMPLE_UNIFORM: &str = "texture_diffuse1";
/// Uniform names for [`TextureBinding::DayNightClouds`], units 0, 1, 2.
pub const DAY_UNIFORM: &str = "texture_day";
pub const NIGHT_UNIFORM: &str = "texture_night";
pub const CLOUDS_UNIFORM: &str = "texture_clouds";

/// How a body's textures map onto texture units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextureBinding {
    /// Bind the textures the model's materials reference.
    MeshTextures,
    /// One texture on unit 0 for every mesh.
    Simple { texture: TextureHandle },
    /// Day, night and cloud layers on units 0, 1 and 2.
    DayNightClouds {
        day: TextureHandle,
        night: TextureHandle,
        clouds: TextureHandle,
    },
}

/// A body-owned texture that can be swapped out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureSlot {
    /// The [`TextureBinding::Simple`] texture.
    Simple,
    Day,
    Night,
    Clouds,
}

/// One texture unit assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitBinding {
    pub unit: u32,
    /// Sampler uniform set to `unit`.
    pub uniform: String,
    /// Texture to bind; invalid handles are not bound.
    pub handle: TextureHandle,
}

impl UnitBinding {
    fn new(unit: u32, uniform: impl Into<String>, handle: TextureHandle) -> Self {
        Self {
            unit,
            uniform: uniform.into(),
            handle,
        }
    }
}

impl TextureBinding {
    /// Unit assignments for drawing `mesh`.
    pub fn bindings_for(&self, mesh: &Mesh) -> Vec<UnitBinding> {
        match *self {
            TextureBinding::Simple { texture } => vec![UnitBinding::new(0, SIMPLE_UNIFORM, texture)],
            TextureBinding::DayNightClouds { day, night, clouds } => vec![
                UnitBinding::new(0, DAY_UNIFORM, day),
                UnitBinding::new(1, NIGHT_UNIFORM, night),
                UnitBinding::new(2, CLOUDS_UNIFORM, clouds),
            ],
            TextureBinding::MeshTextures => mesh_bindings(mesh),
        }
    }

    /// Handles owned through this binding. Mesh textures belong to the
    /// model and are not listed.
    pub fn owned_handles(&self) -> Vec<TextureHandle> {
        match *self {
            TextureBinding::MeshTextures => Vec::new(),
            TextureBinding::Simple { texture } => vec![texture],
            TextureBinding::DayNightClouds { day, night, clouds } => vec![day, night, clouds],
        }
    }

    /// The handle stored in `slot`, if this binding has that slot.
    pub fn slot_mut(&mut self, slot: TextureSlot) -> Option<&mut TextureHandle> {
        match (self, slot) {
            (TextureBinding::Simple { texture }, TextureSlot::Simple) => Some(texture),
            (TextureBinding::DayNightClouds { day, .. }, TextureSlot::Day) => Some(day),
            (TextureBinding::DayNightClouds { night, .. }, TextureSlot::Night) => Some(night),
            (TextureBinding::DayNightClouds { clouds, .. }, TextureSlot::Clouds) => Some(clouds),
            _ => None,
        }
    }
}

/// Mesh textures in material order on consecutive units, named
/// `<kind prefix><n>` with a 1-based counter per kind.
fn mesh_bindings(mesh: &Mesh) -> Vec<UnitBinding> {
    let (mut diffuse, mut specular, mut normal, mut height) = (0u32, 0u32, 0u32, 0u32);
    mesh.textures
        .iter()
        .zip(0u32..)
        .map(|(texture, unit)| {
            let counter = match texture.kind {
                TextureKind::Diffuse => &mut diffuse,
                TextureKind::Specular => &mut specular,
                TextureKind::Normal => &mut normal,
                TextureKind::Height => &mut height,
            };
            *counter += 1;
            let uniform = format!("{}{}", texture.kind.uniform_prefix(), counter);
            UnitBinding::new(unit, uniform, texture.handle)
        })
        .collect()
}
