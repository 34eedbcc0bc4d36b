//! Rendering collaborators: shader programs, texture units, texture and
//! model loading, and the skybox. Each interface ships with a headless
//! implementation so frames can be built and inspected without a GPU.

pub mod backend;
pub mod handle;
pub mod model;
pub mod shader;
pub mod skybox;
pub mod texture;

pub use backend::{DrawBackend, DrawCall, HeadlessBackend, TextureUnits};
pub use handle::TextureHandle;
pub use model::{
    AssetLibrary, AssetLoader, Mesh, MeshSource, MeshTexture, Model, ModelSource, TextureKind,
    TextureRef,
};
pub use shader::{ShaderProgram, UniformRecorder, UniformValue};
pub use skybox::{CUBE_FACES, HeadlessSkybox, SkyboxRenderer, strip_translation};
pub use texture::{
    DecodedTexture, ImageDecoder, TextureCache, TextureDecoder, TextureError, TextureInfo,
    TextureStore,
};
