//! A textured model moving on a time-driven orbit.

use std::path::Path;

use glam::{Mat4, Vec3, Vec4};
use orrery_config::{BodyConfig, TextureConfig};
use orrery_render::{AssetLoader, DrawBackend, Mesh, Model, ShaderProgram, TextureHandle, TextureStore};
use tracing::{debug, warn};

use crate::binding::{TextureBinding, TextureSlot, UnitBinding};
use crate::glow::billboard_transform;
use crate::motion::{GlowParams, OrbitParams};

/// Which shader program a body is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderKind {
    /// Generic lit planet shader with material samplers.
    Planet,
    /// Day/night/cloud blending shader.
    Earth,
}

/// A model placed by [`OrbitParams`] and textured by a [`TextureBinding`].
#[derive(Debug)]
pub struct OrbitingBody {
    name: String,
    params: OrbitParams,
    model: Model,
    textures: TextureBinding,
}

impl OrbitingBody {
    /// Creates a body that owns `model` and the handles in `textures`.
    pub fn new(
        name: impl Into<String>,
        params: OrbitParams,
        model: Model,
        textures: TextureBinding,
    ) -> Self {
        Self {
            name: name.into(),
            params,
            model,
            textures,
        }
    }

    /// Loads the model and textures `config` names. Load failures leave
    /// empty meshes or invalid handles; the body is still built.
    pub fn from_config(config: &BodyConfig, loader: &mut impl AssetLoader) -> Self {
        let model = loader.load_model(Path::new(&config.model));
        if model.is_empty() {
            warn!("Body '{}' has no meshes", config.name);
        }

        let textures = match &config.textures {
            TextureConfig::MeshTextures => TextureBinding::MeshTextures,
            TextureConfig::Simple(path) => TextureBinding::Simple {
                texture: loader.load_texture(Path::new(path)),
            },
            TextureConfig::DayNightClouds { day, night, clouds } => TextureBinding::DayNightClouds {
                day: loader.load_texture(Path::new(day)),
                night: loader.load_texture(Path::new(night)),
                clouds: loader.load_texture(Path::new(clouds)),
            },
        };

        let params = OrbitParams {
            scale: config.scale,
            orbital_radius: config.orbital_radius,
            orbital_speed: config.orbital_speed,
            axial_speed: config.axial_speed,
            axial_tilt: config.axial_tilt,
            ellipticity: config.ellipticity,
            glow: config.glow.as_ref().map(|g| GlowParams {
                scale: g.scale,
                tint: Vec4::from_array(g.tint),
            }),
        };

        debug!(
            "Built body '{}' ({} meshes, {:?})",
            config.name,
            model.meshes.len(),
            textures
        );
        Self::new(config.name.clone(), params, model, textures)
    }

    /// Name used for lookups and the orbit target.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Orbit, spin and glow parameters.
    pub fn params(&self) -> &OrbitParams {
        &self.params
    }

    /// Model drawn for this body.
    pub fn model(&self) -> &Model {
        &self.model
    }

    /// Textures bound before drawing.
    pub fn textures(&self) -> &TextureBinding {
        &self.textures
    }

    /// Program this body is drawn with.
    pub fn shader_kind(&self) -> ShaderKind {
        match self.textures {
            TextureBinding::DayNightClouds { .. } => ShaderKind::Earth,
            _ => ShaderKind::Planet,
        }
    }

    /// Model matrix at `time` seconds.
    pub fn world_transform(&self, time: f32) -> Mat4 {
        self.params.world_transform(time)
    }

    /// World-space centre at `time` seconds.
    pub fn world_position(&self, time: f32) -> Vec3 {
        self.params.world_position(time)
    }

    /// Position on the orbit at `time` seconds.
    pub fn orbital_position(&self, time: f32) -> Vec3 {
        self.params.orbital_position(time)
    }

    /// Whether the body draws a glow billboard.
    pub fn has_glow(&self) -> bool {
        self.params.glow.is_some()
    }

    /// Glow tint, or `None` without glow.
    pub fn glow_tint(&self) -> Option<Vec4> {
        self.params.glow.map(|g| g.tint)
    }

    /// Camera-facing billboard matrix, or `None` without glow.
    pub fn glow_transform(&self, time: f32, view: Mat4) -> Option<Mat4> {
        let glow = self.params.glow?;
        Some(billboard_transform(
            self.world_position(time),
            view,
            glow.scale,
        ))
    }

    /// Texture unit assignments for drawing `mesh`.
    pub fn texture_bindings(&self, mesh: &Mesh) -> Vec<UnitBinding> {
        self.textures.bindings_for(mesh)
    }

    /// Sets `model` and the sampler uniforms, binds textures and draws every
    /// mesh. The caller activates `shader` first.
    pub fn draw(&self, time: f32, shader: &mut dyn ShaderProgram, backend: &mut dyn DrawBackend) {
        shader.set_mat4("model", self.world_transform(time));
        for mesh in &self.model.meshes {
            for binding in self.texture_bindings(mesh) {
                shader.set_int(&binding.uniform, binding.unit as i32);
                if binding.handle.is_valid() {
                    backend.bind_texture(binding.unit, binding.handle);
                }
            }
            backend.draw_mesh(mesh);
        }
    }

    /// Draws the glow billboard if the body has one. Returns whether
    /// anything was drawn.
    pub fn draw_glow(
        &self,
        time: f32,
        view: Mat4,
        shader: &mut dyn ShaderProgram,
        backend: &mut dyn DrawBackend,
    ) -> bool {
        let (Some(model), Some(tint)) = (self.glow_transform(time, view), self.glow_tint()) else {
            return false;
        };
        shader.set_mat4("model", model);
        shader.set_vec4("glowTint", tint);
        backend.draw_glow_quad();
        true
    }

    /// Swaps the texture in `slot` for `texture` and releases the old one.
    ///
    /// Returns `false`, leaving ownership of `texture` with the caller, if
    /// this body's binding has no such slot.
    pub fn replace_texture(
        &mut self,
        slot: TextureSlot,
        texture: TextureHandle,
        store: &mut dyn TextureStore,
    ) -> bool {
        let Some(current) = self.textures.slot_mut(slot) else {
            warn!("Body '{}' has no {:?} texture slot", self.name, slot);
            return false;
        };
        let old = std::mem::replace(current, texture);
        store.release_texture(old);
        true
    }

    /// Releases every texture the body owns. Drawing afterwards binds
    /// nothing.
    pub fn release(&mut self, store: &mut dyn TextureStore) {
        for handle in self.textures.owned_handles() {
            store.release_texture(handle);
        }
        for slot in [
            TextureSlot::Simple,
            TextureSlot::Day,
            TextureSlot::Night,
            TextureSlot::Clouds,
        ] {
            if let Some(handle) = self.textures.slot_mut(slot) {
                *handle = TextureHandle::INVALID;
            }
        }
        self.model.release(store);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{StubDecoder, assets, earth_config, sun_config};
    use orrery_render::{
        AssetLibrary, DrawCall, HeadlessBackend, MeshSource, ModelSource, TextureKind, TextureRef,
        UniformRecorder, UniformValue,
    };

    fn assert_vec_near(a: Vec3, b: Vec3, eps: f32) {
        assert!((a - b).length() < eps, "{a} != {b}");
    }

    #[test]
    fn test_from_config_copies_motion_params() {
        let mut assets = assets();
        let earth = OrbitingBody::from_config(&earth_config(), &mut assets);
        let params = earth.params();
        assert_eq!(params.orbital_radius, 42.0);
        assert_eq!(params.axial_tilt, 23.44);
        assert_eq!(params.ellipticity, 1.0);
        assert_eq!(earth.glow_tint(), Some(Vec4::new(0.3, 0.5, 1.0, 0.35)));
        assert_eq!(earth.shader_kind(), ShaderKind::Earth);
        assert_eq!(earth.name(), "Earth");
    }

    #[test]
    fn test_glow_disabled_returns_none() {
        let body = OrbitingBody::new(
            "Mars",
            OrbitParams {
                orbital_radius: 60.0,
                ..OrbitParams::default()
            },
            Model::default(),
            TextureBinding::MeshTextures,
        );
        assert!(!body.has_glow());
        assert!(body.glow_transform(1.0, Mat4::IDENTITY).is_none());
        assert!(body.glow_tint().is_none());

        let mut shader = UniformRecorder::new("glow");
        let mut backend = HeadlessBackend::new();
        assert!(!body.draw_glow(1.0, Mat4::IDENTITY, &mut shader, &mut backend));
        assert_eq!(backend.glow_draws(), 0);
        assert!(shader.history().is_empty());
    }

    #[test]
    fn test_glow_follows_world_position() {
        let mut assets = assets();
        let earth = OrbitingBody::from_config(&earth_config(), &mut assets);
        let view = Mat4::look_at_rh(Vec3::new(0.0, 20.0, 200.0), Vec3::ZERO, Vec3::Y);
        for t in [0.0, 5.0, 60.0] {
            let glow = earth.glow_transform(t, view).unwrap();
            assert_vec_near(glow.transform_point3(Vec3::ZERO), earth.world_position(t), 1e-4);
        }
    }

    #[test]
    fn test_draw_glow_sets_model_and_tint() {
        let mut assets = assets();
        let sun = OrbitingBody::from_config(&sun_config(), &mut assets);
        let mut shader = UniformRecorder::new("glow");
        let mut backend = HeadlessBackend::new();
        let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 50.0), Vec3::ZERO, Vec3::Y);

        assert!(sun.draw_glow(2.0, view, &mut shader, &mut backend));
        assert_eq!(backend.glow_draws(), 1);
        assert_eq!(shader.mat4("model"), sun.glow_transform(2.0, view));
        assert_eq!(
            shader.get("glowTint"),
            Some(UniformValue::Vec4(Vec4::new(1.0, 0.8, 0.4, 0.6)))
        );
    }

    #[test]
    fn test_earth_draw_binds_three_units_per_mesh() {
        let mut assets = assets();
        let earth = OrbitingBody::from_config(&earth_config(), &mut assets);
        let mut shader = UniformRecorder::new("earth");
        let mut backend = HeadlessBackend::new();

        earth.draw(3.0, &mut shader, &mut backend);

        assert_eq!(shader.int("texture_day"), Some(0));
        assert_eq!(shader.int("texture_night"), Some(1));
        assert_eq!(shader.int("texture_clouds"), Some(2));
        assert_eq!(shader.mat4("model"), Some(earth.world_transform(3.0)));
        assert!(backend.bound(0).is_some());
        assert!(backend.bound(1).is_some());
        assert!(backend.bound(2).is_some());
        assert_eq!(backend.mesh_draws(), earth.model().meshes.len());
    }

    #[test]
    fn test_invalid_handles_are_not_bound() {
        let mut assets = AssetLibrary::new(StubDecoder);
        assets.register_model("sphere.obj", crate::test_support::sphere());
        let mut config = earth_config();
        config.textures = TextureConfig::DayNightClouds {
            day: "day.jpg".to_string(),
            night: "missing_night.jpg".to_string(),
            clouds: "clouds.jpg".to_string(),
        };
        let earth = OrbitingBody::from_config(&config, &mut assets);
        let mut shader = UniformRecorder::new("earth");
        let mut backend = HeadlessBackend::new();

        earth.draw(0.0, &mut shader, &mut backend);

        assert!(backend.bound(0).is_some());
        assert_eq!(backend.bound(1), None);
        assert!(backend.bound(2).is_some());
        let binds = backend
            .calls()
            .iter()
            .filter(|c| matches!(c, DrawCall::Bind { .. }))
            .count();
        assert_eq!(binds, 2);
        // The mesh is still drawn.
        assert_eq!(backend.mesh_draws(), 1);
    }

    #[test]
    fn test_mesh_textures_draw_uses_material_names() {
        let mut assets = AssetLibrary::new(StubDecoder);
        assets.register_model(
            "models/jupiter/jupiter.obj",
            ModelSource {
                meshes: vec![MeshSource {
                    name: "jupiter".to_string(),
                    textures: vec![
                        TextureRef::new(TextureKind::Diffuse, "jupiter.jpg"),
                        TextureRef::new(TextureKind::Specular, "jupiter_spec.jpg"),
                    ],
                    ..MeshSource::default()
                }],
                embedded: Vec::new(),
            },
        );
        let config = BodyConfig {
            name: "Jupiter".to_string(),
            model: "models/jupiter/jupiter.obj".to_string(),
            ..BodyConfig::default()
        };
        let jupiter = OrbitingBody::from_config(&config, &mut assets);
        let mut shader = UniformRecorder::new("planet");
        let mut backend = HeadlessBackend::new();

        jupiter.draw(1.0, &mut shader, &mut backend);

        assert_eq!(jupiter.shader_kind(), ShaderKind::Planet);
        assert_eq!(shader.int("texture_diffuse1"), Some(0));
        assert_eq!(shader.int("texture_specular1"), Some(1));
        assert_eq!(backend.mesh_draws(), 1);
    }

    #[test]
    fn test_replace_texture_releases_old_handle() {
        let mut assets = assets();
        let mut earth = OrbitingBody::from_config(&earth_config(), &mut assets);
        let TextureBinding::DayNightClouds { clouds: old, .. } = *earth.textures() else {
            panic!("earth binding");
        };
        assert_eq!(assets.textures().ref_count(old), 1);

        let fresh = assets.load_texture(Path::new("assets/textures/earth_clouds_storm.jpg"));
        assert!(earth.replace_texture(TextureSlot::Clouds, fresh, &mut assets));

        assert_eq!(assets.textures().ref_count(old), 0);
        assert_eq!(assets.textures().ref_count(fresh), 1);
        let TextureBinding::DayNightClouds { clouds, .. } = *earth.textures() else {
            panic!("earth binding");
        };
        assert_eq!(clouds, fresh);
    }

    #[test]
    fn test_replace_texture_with_wrong_slot_keeps_state() {
        let mut assets = assets();
        let mut sun = OrbitingBody::from_config(&sun_config(), &mut assets);
        let before = sun.textures().clone();
        let fresh = assets.load_texture(Path::new("night.jpg"));
        assert!(!sun.replace_texture(TextureSlot::Night, fresh, &mut assets));
        assert_eq!(sun.textures(), &before);
        assert_eq!(assets.textures().ref_count(fresh), 1);
    }

    #[test]
    fn test_release_frees_body_and_model_textures() {
        let mut assets = assets();
        let mut earth = OrbitingBody::from_config(&earth_config(), &mut assets);
        assert!(assets.textures().live_count() > 0);

        earth.release(&mut assets);

        assert_eq!(assets.textures().live_count(), 0);
        assert!(earth.textures().owned_handles().iter().all(|h| !h.is_valid()));

        let mut shader = UniformRecorder::new("earth");
        let mut backend = HeadlessBackend::new();
        earth.draw(0.0, &mut shader, &mut backend);
        assert_eq!(backend.bound(0), None);
    }

    #[test]
    fn test_missing_model_still_builds() {
        let mut assets = AssetLibrary::new(StubDecoder);
        let body = OrbitingBody::from_config(&sun_config(), &mut assets);
        assert!(body.model().is_empty());
        let mut shader = UniformRecorder::new("planet");
        let mut backend = HeadlessBackend::new();
        body.draw(0.0, &mut shader, &mut backend);
        assert_eq!(backend.mesh_draws(), 0);
        assert!(shader.mat4("model").is_some());
    }
}
