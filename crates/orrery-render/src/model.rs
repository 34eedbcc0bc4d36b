//! Loaded models, their meshes and the textures their materials reference.
//!
//! Geometry itself is opaque here: a [`Mesh`] only carries what drawing and
//! texture binding need. Models come from an [`AssetLoader`]; the bundled
//! [`AssetLibrary`] resolves models registered in memory and loads their
//! material textures through a [`TextureCache`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::handle::TextureHandle;
use crate::texture::{TextureCache, TextureDecoder, TextureStore};

/// Material texture role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureKind {
    Diffuse,
    Specular,
    Normal,
    Height,
}

impl TextureKind {
    /// Sampler uniform prefix; the shader expects a 1-based index appended.
    pub fn uniform_prefix(self) -> &'static str {
        match self {
            TextureKind::Diffuse => "texture_diffuse",
            TextureKind::Specular => "texture_specular",
            TextureKind::Normal => "texture_normal",
            TextureKind::Height => "texture_height",
        }
    }
}

/// A texture referenced by a mesh's material.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshTexture {
    pub kind: TextureKind,
    pub handle: TextureHandle,
    /// Reference as written in the material (file name or `*N`).
    pub source: String,
}

/// One drawable piece of a model.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mesh {
    pub name: String,
    pub vertex_count: u32,
    pub index_count: u32,
    /// Material textures in material order.
    pub textures: Vec<MeshTexture>,
}

/// A loaded model. Owns one claim on every distinct texture its meshes
/// reference.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Model {
    pub path: PathBuf,
    pub meshes: Vec<Mesh>,
    owned: Vec<TextureHandle>,
}

impl Model {
    /// A model with no meshes, returned when loading fails.
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Builds a model from already-loaded meshes. Each distinct valid
    /// handle they reference is owned once.
    pub fn from_meshes(path: impl Into<PathBuf>, meshes: Vec<Mesh>) -> Self {
        let mut owned = Vec::new();
        for texture in meshes.iter().flat_map(|m| &m.textures) {
            if texture.handle.is_valid() && !owned.contains(&texture.handle) {
                owned.push(texture.handle);
            }
        }
        Self {
            path: path.into(),
            meshes,
            owned,
        }
    }

    /// Whether loading produced no meshes.
    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    /// Distinct texture handles this model holds.
    pub fn owned_textures(&self) -> &[TextureHandle] {
        &self.owned
    }

    /// Releases every owned texture and clears the handles from the meshes.
    pub fn release(&mut self, store: &mut dyn TextureStore) {
        for handle in self.owned.drain(..) {
            store.release_texture(handle);
        }
        for texture in self.meshes.iter_mut().flat_map(|m| &mut m.textures) {
            texture.handle = TextureHandle::INVALID;
        }
    }
}

/// A texture store that can also load models.
pub trait AssetLoader: TextureStore {
    /// Loads the model at `path`. Returns an empty model on failure.
    fn load_model(&mut self, path: &Path) -> Model;
}

/// Material texture reference inside a [`MeshSource`].
#[derive(Debug, Clone, PartialEq)]
pub struct TextureRef {
    pub kind: TextureKind,
    /// File name relative to the model's directory, or `*N` for the N-th
    /// embedded image.
    pub path: String,
}

impl TextureRef {
    pub fn new(kind: TextureKind, path: impl Into<String>) -> Self {
        Self {
            kind,
            path: path.into(),
        }
    }
}

/// Unresolved description of a mesh.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MeshSource {
    pub name: String,
    pub vertex_count: u32,
    pub index_count: u32,
    pub textures: Vec<TextureRef>,
}

/// Unresolved description of a model, as an importer would produce it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ModelSource {
    pub meshes: Vec<MeshSource>,
    /// Encoded images stored inside the model file.
    pub embedded: Vec<Vec<u8>>,
}

/// [`AssetLoader`] over registered model descriptions and a texture cache.
#[derive(Debug)]
pub struct AssetLibrary<D> {
    textures: TextureCache<D>,
    models: HashMap<PathBuf, ModelSource>,
}

impl<D: TextureDecoder> AssetLibrary<D> {
    pub fn new(decoder: D) -> Self {
        Self {
            textures: TextureCache::new(decoder),
            models: HashMap::new(),
        }
    }

    /// Makes `source` available under `path`.
    pub fn register_model(&mut self, path: impl Into<PathBuf>, source: ModelSource) {
        self.models.insert(path.into(), source);
    }

    /// Whether a description is registered for `path`.
    pub fn has_model(&self, path: &Path) -> bool {
        self.models.contains_key(path)
    }

    /// The texture cache.
    pub fn textures(&self) -> &TextureCache<D> {
        &self.textures
    }

    fn load_reference(
        textures: &mut TextureCache<D>,
        model_path: &Path,
        source: &ModelSource,
        reference: &str,
    ) -> TextureHandle {
        if let Some(index) = reference.strip_prefix('*') {
            let bytes = index
                .parse::<usize>()
                .ok()
                .and_then(|i| source.embedded.get(i));
            return match bytes {
                Some(bytes) => {
                    let key = format!("{}{}", model_path.display(), reference);
                    textures.load_embedded(&key, bytes)
                }
                None => {
                    warn!(
                        "Model '{}' references missing embedded texture '{}'",
                        model_path.display(),
                        reference
                    );
                    TextureHandle::INVALID
                }
            };
        }
        let directory = model_path.parent().unwrap_or(Path::new(""));
        textures.load_texture(&directory.join(reference))
    }
}

impl<D: TextureDecoder> TextureStore for AssetLibrary<D> {
    fn load_texture(&mut self, path: &Path) -> TextureHandle {
        self.textures.load_texture(path)
    }

    fn load_embedded(&mut self, key: &str, bytes: &[u8]) -> TextureHandle {
        self.textures.load_embedded(key, bytes)
    }

    fn release_texture(&mut self, handle: TextureHandle) {
        self.textures.release_texture(handle);
    }
}

impl<D: TextureDecoder> AssetLoader for AssetLibrary<D> {
    fn load_model(&mut self, path: &Path) -> Model {
        let Some(source) = self.models.get(path) else {
            warn!("Failed to load model '{}': not found", path.display());
            return Model::empty(path);
        };

        // References repeated across meshes resolve to one claim per model.
        let mut loaded: HashMap<&str, TextureHandle> = HashMap::new();
        let mut meshes = Vec::with_capacity(source.meshes.len());
        for mesh in &source.meshes {
            let textures = mesh
                .textures
                .iter()
                .map(|reference| {
                    let handle = *loaded.entry(reference.path.as_str()).or_insert_with(|| {
                        Self::load_reference(&mut self.textures, path, source, &reference.path)
                    });
                    MeshTexture {
                        kind: reference.kind,
                        handle,
                        source: reference.path.clone(),
                    }
                })
                .collect();
            meshes.push(Mesh {
                name: mesh.name.clone(),
                vertex_count: mesh.vertex_count,
                index_count: mesh.index_count,
                textures,
            });
        }

        debug!(
            "Loaded model '{}' ({} meshes, {} textures)",
            path.display(),
            meshes.len(),
            loaded.len()
        );
        Model::from_meshes(path, meshes)
    }
}
