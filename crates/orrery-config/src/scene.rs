//! Solar-system scene description: one entry per orbiting body.
//!
//! Orbital rates are stored already scaled to the scene's time base, so the
//! core motion model treats them as opaque angular rates.

use serde::{Deserialize, Serialize};

/// Scale applied to relative orbital rates (Earth = 1.0) to get rad/s.
pub const ORBIT_RATE_SCALE: f32 = 0.025;

/// The set of bodies to load and animate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SceneConfig {
    /// Body whose world position is used as the light source.
    pub light_body: Option<String>,
    /// Bodies in draw order.
    pub bodies: Vec<BodyConfig>,
}

/// One orbiting body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BodyConfig {
    /// Unique display name, used for orbit targets and the light body.
    pub name: String,
    /// Model file handed to the model loader.
    pub model: String,
    /// Uniform scale of the model.
    pub scale: f32,
    /// Semi-major axis of the orbit.
    pub orbital_radius: f32,
    /// Orbital angular rate in rad/s.
    pub orbital_speed: f32,
    /// Spin rate in degrees per second.
    pub axial_speed: f32,
    /// Axial tilt in degrees.
    pub axial_tilt: f32,
    /// Ratio of minor to major orbit axis (1.0 = circular).
    pub ellipticity: f32,
    /// Camera-facing glow billboard, if any.
    pub glow: Option<GlowConfig>,
    /// How the body's textures are bound.
    pub textures: TextureConfig,
}

/// Glow billboard parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GlowConfig {
    /// Size of the billboard quad.
    pub scale: f32,
    /// RGBA tint multiplied into the glow.
    pub tint: [f32; 4],
}

/// Texture sources for a body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub enum TextureConfig {
    /// Use the textures referenced by the model's own materials.
    #[default]
    MeshTextures,
    /// One diffuse texture for the whole body.
    Simple(String),
    /// Day, night and cloud layers blended by the shader.
    DayNightClouds {
        /// Sunlit surface.
        day: String,
        /// City lights on the dark side.
        night: String,
        /// Cloud layer.
        clouds: String,
    },
}

impl Default for BodyConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            model: String::new(),
            scale: 1.0,
            orbital_radius: 0.0,
            orbital_speed: 0.0,
            axial_speed: 0.0,
            axial_tilt: 0.0,
            ellipticity: 1.0,
            glow: None,
            textures: TextureConfig::MeshTextures,
        }
    }
}

impl SceneConfig {
    /// Looks up a body by name.
    pub fn body(&self, name: &str) -> Option<&BodyConfig> {
        self.bodies.iter().find(|b| b.name == name)
    }
}

#[allow(clippy::too_many_arguments)]
fn planet(
    name: &str,
    scale: f32,
    orbital_radius: f32,
    relative_rate: f32,
    axial_speed: f32,
    axial_tilt: f32,
    ellipticity: f32,
) -> BodyConfig {
    let slug = name.to_lowercase();
    BodyConfig {
        name: name.to_string(),
        model: format!("assets/models/{slug}/{slug}.obj"),
        scale,
        orbital_radius,
        orbital_speed: relative_rate * ORBIT_RATE_SCALE,
        axial_speed,
        axial_tilt,
        ellipticity,
        ..BodyConfig::default()
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        let sun = BodyConfig {
            name: "Sun".to_string(),
            model: "assets/models/sphere.obj".to_string(),
            scale: 8.0,
            axial_speed: 2.0,
            glow: Some(GlowConfig {
                scale: 30.0,
                tint: [1.0, 0.8, 0.4, 0.6],
            }),
            textures: TextureConfig::Simple("assets/textures/sun.jpg".to_string()),
            ..BodyConfig::default()
        };

        let earth = BodyConfig {
            model: "assets/models/sphere.obj".to_string(),
            glow: Some(GlowConfig {
                scale: 2.6,
                tint: [0.3, 0.5, 1.0, 0.35],
            }),
            textures: TextureConfig::DayNightClouds {
                day: "assets/textures/earth_day.jpg".to_string(),
                night: "assets/textures/earth_night.jpg".to_string(),
                clouds: "assets/textures/earth_clouds.jpg".to_string(),
            },
            ..planet("Earth", 1.0, 42.0, 1.0, 20.0, 23.44, 1.0)
        };

        Self {
            light_body: Some("Sun".to_string()),
            bodies: vec![
                sun,
                planet("Mercury", 0.4, 20.0, 4.15, 0.34, 0.03, 0.979),
                planet("Venus", 0.9, 30.0, 1.62, -0.08, 177.4, 1.0),
                earth,
                planet("Mars", 0.55, 55.0, 0.53, 19.5, 25.19, 0.996),
                planet("Jupiter", 3.5, 85.0, 0.084, 48.0, 3.13, 0.999),
                planet("Saturn", 3.0, 115.0, 0.034, 45.0, 26.73, 0.998),
                planet("Uranus", 2.0, 140.0, 0.012, -28.0, 97.77, 0.999),
                planet("Neptune", 1.9, 165.0, 0.006, 30.0, 28.32, 1.0),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scene_has_sun_and_eight_planets() {
        let scene = SceneConfig::default();
        assert_eq!(scene.bodies.len(), 9);
        assert_eq!(scene.bodies[0].name, "Sun");
        assert_eq!(scene.light_body.as_deref(), Some("Sun"));
    }

    #[test]
    fn test_orbital_rates_are_prescaled() {
        let scene = SceneConfig::default();
        let earth = scene.body("Earth").unwrap();
        assert!((earth.orbital_speed - ORBIT_RATE_SCALE).abs() < 1e-7);
        let mercury = scene.body("Mercury").unwrap();
        assert!(mercury.orbital_speed > earth.orbital_speed);
    }

    #[test]
    fn test_earth_uses_day_night_clouds() {
        let scene = SceneConfig::default();
        let earth = scene.body("Earth").unwrap();
        assert!(matches!(
            earth.textures,
            TextureConfig::DayNightClouds { .. }
        ));
        assert!((earth.axial_tilt - 23.44).abs() < 1e-4);
    }

    #[test]
    fn test_body_defaults_are_circular_untilted_without_glow() {
        let body: BodyConfig = ron::from_str("(name: \"Rock\", orbital_radius: 10.0)").unwrap();
        assert_eq!(body.ellipticity, 1.0);
        assert_eq!(body.axial_tilt, 0.0);
        assert!(body.glow.is_none());
        assert_eq!(body.textures, TextureConfig::MeshTextures);
    }

    #[test]
    fn test_texture_config_parses_variants() {
        let simple: TextureConfig = ron::from_str("Simple(\"moon.png\")").unwrap();
        assert_eq!(simple, TextureConfig::Simple("moon.png".to_string()));

        let layered: TextureConfig =
            ron::from_str("DayNightClouds(day: \"d.png\", night: \"n.png\", clouds: \"c.png\")")
                .unwrap();
        assert!(matches!(layered, TextureConfig::DayNightClouds { .. }));
    }

    #[test]
    fn test_unknown_body_lookup() {
        assert!(SceneConfig::default().body("Pluto").is_none());
    }
}
