//! The set of bodies making up the solar system.

use glam::Vec3;
use orrery_config::SceneConfig;
use orrery_render::{AssetLoader, TextureStore};
use tracing::{info, warn};

use crate::body::{OrbitingBody, ShaderKind};

/// Ordered, named collection of bodies with an optional light source.
#[derive(Debug, Default)]
pub struct Scene {
    bodies: Vec<OrbitingBody>,
    light: Option<usize>,
}

impl Scene {
    /// Builds every body `config` lists, loading assets through `loader`.
    pub fn from_config(config: &SceneConfig, loader: &mut impl AssetLoader) -> Self {
        let mut bodies: Vec<OrbitingBody> = Vec::with_capacity(config.bodies.len());
        for body in &config.bodies {
            if bodies.iter().any(|b| b.name() == body.name) {
                warn!("Duplicate body name '{}'; lookups return the first", body.name);
            }
            bodies.push(OrbitingBody::from_config(body, loader));
        }

        let light = config.light_body.as_deref().and_then(|name| {
            let index = bodies.iter().position(|b| b.name() == name);
            if index.is_none() {
                warn!("Light body '{}' is not in the scene", name);
            }
            index
        });

        info!("Scene built with {} bodies", bodies.len());
        Self { bodies, light }
    }

    /// Appends a body. The first body named like an existing one is the
    /// one [`body`](Self::body) finds.
    pub fn push(&mut self, body: OrbitingBody) {
        self.bodies.push(body);
    }

    /// Makes the body called `name` the light source. Returns `false` if
    /// there is no such body.
    pub fn set_light_body(&mut self, name: &str) -> bool {
        match self.index_of(name) {
            Some(index) => {
                self.light = Some(index);
                true
            }
            None => false,
        }
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.bodies.iter().position(|b| b.name() == name)
    }

    /// Looks up a body by name.
    pub fn body(&self, name: &str) -> Option<&OrbitingBody> {
        self.index_of(name).map(|i| &self.bodies[i])
    }

    /// Mutable lookup by name.
    pub fn body_mut(&mut self, name: &str) -> Option<&mut OrbitingBody> {
        let index = self.index_of(name)?;
        self.bodies.get_mut(index)
    }

    /// Bodies in draw order.
    pub fn iter(&self) -> impl Iterator<Item = &OrbitingBody> {
        self.bodies.iter()
    }

    /// Bodies drawn with `kind`, in draw order.
    pub fn with_shader(&self, kind: ShaderKind) -> impl Iterator<Item = &OrbitingBody> {
        self.bodies.iter().filter(move |b| b.shader_kind() == kind)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// The light-source body, if any.
    pub fn light_body(&self) -> Option<&OrbitingBody> {
        self.light.and_then(|i| self.bodies.get(i))
    }

    /// World position of the light source at `time`; the origin without one.
    pub fn light_position(&self, time: f32) -> Vec3 {
        self.light_body()
            .map_or(Vec3::ZERO, |body| body.world_position(time))
    }

    /// Releases every body's textures.
    pub fn release(&mut self, store: &mut dyn TextureStore) {
        for body in &mut self.bodies {
            body.release(store);
        }
    }
}

impl<'a> IntoIterator for &'a Scene {
    type Item = &'a OrbitingBody;
    type IntoIter = std::slice::Iter<'a, OrbitingBody>;

    fn into_iter(self) -> Self::IntoIter {
        self.bodies.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::TextureBinding;
    use crate::motion::OrbitParams;
    use crate::test_support::{assets, earth_config, sun_config};
    use orrery_config::BodyConfig;
    use orrery_render::Model;

    fn scene_config() -> SceneConfig {
        let mars = BodyConfig {
            name: "Mars".to_string(),
            model: "sphere.obj".to_string(),
            orbital_radius: 60.0,
            orbital_speed: 0.02,
            ..BodyConfig::default()
        };
        SceneConfig {
            light_body: Some("Sun".to_string()),
            bodies: vec![sun_config(), earth_config(), mars],
        }
    }

    #[test]
    fn test_bodies_keep_config_order() {
        let mut assets = assets();
        let scene = Scene::from_config(&scene_config(), &mut assets);
        let names: Vec<_> = scene.iter().map(|b| b.name()).collect();
        assert_eq!(names, ["Sun", "Earth", "Mars"]);
        assert_eq!(scene.len(), 3);
        assert!(!scene.is_empty());
    }

    #[test]
    fn test_lookup_by_name() {
        let mut assets = assets();
        let mut scene = Scene::from_config(&scene_config(), &mut assets);
        assert_eq!(scene.body("Earth").map(|b| b.params().orbital_radius), Some(42.0));
        assert!(scene.body("Pluto").is_none());
        assert!(scene.body_mut("Mars").is_some());
    }

    #[test]
    fn test_light_position_tracks_light_body() {
        let mut assets = assets();
        let mut scene = Scene::from_config(&scene_config(), &mut assets);
        assert_eq!(scene.light_position(10.0), Vec3::ZERO);

        assert!(scene.set_light_body("Mars"));
        let mars = scene.body("Mars").unwrap().world_position(10.0);
        assert_eq!(scene.light_position(10.0), mars);
        assert!(!scene.set_light_body("Vulcan"));
    }

    #[test]
    fn test_unknown_light_body_falls_back_to_origin() {
        let mut assets = assets();
        let mut config = scene_config();
        config.light_body = Some("Vulcan".to_string());
        let scene = Scene::from_config(&config, &mut assets);
        assert!(scene.light_body().is_none());
        assert_eq!(scene.light_position(3.0), Vec3::ZERO);
    }

    #[test]
    fn test_shader_groups() {
        let mut assets = assets();
        let scene = Scene::from_config(&scene_config(), &mut assets);
        let earth: Vec<_> = scene.with_shader(ShaderKind::Earth).map(|b| b.name()).collect();
        let planets: Vec<_> = scene.with_shader(ShaderKind::Planet).map(|b| b.name()).collect();
        assert_eq!(earth, ["Earth"]);
        assert_eq!(planets, ["Sun", "Mars"]);
    }

    #[test]
    fn test_duplicate_names_resolve_to_first() {
        let mut scene = Scene::default();
        for radius in [10.0, 20.0] {
            scene.push(OrbitingBody::new(
                "Twin",
                OrbitParams {
                    orbital_radius: radius,
                    ..OrbitParams::default()
                },
                Model::default(),
                TextureBinding::MeshTextures,
            ));
        }
        assert_eq!(scene.body("Twin").map(|b| b.params().orbital_radius), Some(10.0));
        assert_eq!((&scene).into_iter().count(), 2);
    }

    #[test]
    fn test_release_frees_all_textures() {
        let mut assets = assets();
        let mut scene = Scene::from_config(&scene_config(), &mut assets);
        assert!(assets.textures().live_count() > 0);
        scene.release(&mut assets);
        assert_eq!(assets.textures().live_count(), 0);
    }
}
