//! Fixtures shared by this crate's tests.

use std::path::Path;

use orrery_config::{BodyConfig, GlowConfig, TextureConfig};
use orrery_render::{
    AssetLibrary, DecodedTexture, MeshSource, ModelSource, TextureDecoder, TextureError,
    TextureKind, TextureRef,
};

/// Decodes anything to a 1×1 RGBA texel unless its name contains
/// "missing".
pub(crate) struct StubDecoder;

impl StubDecoder {
    fn decode(name: &str) -> Result<DecodedTexture, TextureError> {
        if name.contains("missing") {
            return Err(TextureError::ZeroDimensions {
                width: 0,
                height: 0,
            });
        }
        Ok(DecodedTexture {
            width: 1,
            height: 1,
            channels: 4,
            pixels: vec![255; 4],
        })
    }
}

impl TextureDecoder for StubDecoder {
    fn decode_file(&mut self, path: &Path) -> Result<DecodedTexture, TextureError> {
        Self::decode(&path.to_string_lossy())
    }

    fn decode_bytes(&mut self, name: &str, _bytes: &[u8]) -> Result<DecodedTexture, TextureError> {
        Self::decode(name)
    }
}

pub(crate) fn sphere() -> ModelSource {
    ModelSource {
        meshes: vec![MeshSource {
            name: "sphere".to_string(),
            vertex_count: 2145,
            index_count: 12288,
            textures: vec![TextureRef::new(TextureKind::Diffuse, "sphere.jpg")],
        }],
        embedded: Vec::new(),
    }
}

pub(crate) fn assets() -> AssetLibrary<StubDecoder> {
    let mut assets = AssetLibrary::new(StubDecoder);
    assets.register_model("sphere.obj", sphere());
    assets
}

pub(crate) fn earth_config() -> BodyConfig {
    BodyConfig {
        name: "Earth".to_string(),
        model: "sphere.obj".to_string(),
        scale: 1.0,
        orbital_radius: 42.0,
        orbital_speed: 0.025,
        axial_speed: 50.0,
        axial_tilt: 23.44,
        ellipticity: 1.0,
        glow: Some(GlowConfig {
            scale: 2.6,
            tint: [0.3, 0.5, 1.0, 0.35],
        }),
        textures: TextureConfig::DayNightClouds {
            day: "assets/textures/earth_day.jpg".to_string(),
            night: "assets/textures/earth_night.jpg".to_string(),
            clouds: "assets/textures/earth_clouds.jpg".to_string(),
        },
    }
}

pub(crate) fn sun_config() -> BodyConfig {
    BodyConfig {
        name: "Sun".to_string(),
        model: "sphere.obj".to_string(),
        scale: 8.0,
        axial_speed: 2.0,
        glow: Some(GlowConfig {
            scale: 30.0,
            tint: [1.0, 0.8, 0.4, 0.6],
        }),
        textures: TextureConfig::Simple("assets/textures/sun.jpg".to_string()),
        ..BodyConfig::default()
    }
}
