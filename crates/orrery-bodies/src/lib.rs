//! Orbiting bodies: time-driven placement, glow billboards, texture binding
//! and the scene that holds them.

pub mod binding;
pub mod body;
pub mod glow;
pub mod motion;
pub mod scene;

#[cfg(test)]
mod test_support;

pub use binding::{
    CLOUDS_UNIFORM, DAY_UNIFORM, NIGHT_UNIFORM, SIMPLE_UNIFORM, TextureBinding, TextureSlot,
    UnitBinding,
};
pub use body::{OrbitingBody, ShaderKind};
pub use glow::billboard_transform;
pub use motion::{GlowParams, OrbitParams};
pub use scene::Scene;
