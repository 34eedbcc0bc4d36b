//! Texture decoding and a de-duplicating, reference-counted texture cache.
//!
//! Loading never fails from the caller's point of view: a texture that
//! cannot be decoded yields [`TextureHandle::INVALID`] and a warning. The
//! [`TextureCache`] hands out one handle per distinct source, counting how
//! many owners hold it, and forgets the texture when the last owner calls
//! [`TextureStore::release_texture`].

use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, warn};

use crate::handle::TextureHandle;

/// Errors produced while decoding a texture.
#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    /// The image file or buffer could not be read or decoded.
    #[error("failed to decode texture '{source_name}': {source}")]
    Decode {
        source_name: String,
        #[source]
        source: image::ImageError,
    },

    /// Width or height is zero.
    #[error("texture dimensions must be non-zero, got {width}x{height}")]
    ZeroDimensions { width: u32, height: u32 },

    /// Pixel data length doesn't match the dimensions and channel count.
    #[error(
        "texture data size ({actual}) does not match expected ({expected}) for {width}x{height}x{channels}"
    )]
    DataSizeMismatch {
        actual: usize,
        expected: usize,
        width: u32,
        height: u32,
        channels: u8,
    },

    /// Only 1, 2, 3 and 4 channel images are supported.
    #[error("unsupported channel count {0}")]
    UnsupportedChannels(u8),
}

/// 8-bit pixel data ready for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedTexture {
    pub width: u32,
    pub height: u32,
    /// 1 (red), 2 (red/alpha), 3 (RGB) or 4 (RGBA).
    pub channels: u8,
    pub pixels: Vec<u8>,
}

impl DecodedTexture {
    /// Checks dimensions, channel count and buffer length agree.
    pub fn validate(&self) -> Result<(), TextureError> {
        if self.width == 0 || self.height == 0 {
            return Err(TextureError::ZeroDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if !(1..=4).contains(&self.channels) {
            return Err(TextureError::UnsupportedChannels(self.channels));
        }
        let expected = self.width as usize * self.height as usize * self.channels as usize;
        if self.pixels.len() != expected {
            return Err(TextureError::DataSizeMismatch {
                actual: self.pixels.len(),
                expected,
                width: self.width,
                height: self.height,
                channels: self.channels,
            });
        }
        Ok(())
    }
}

/// Turns image files or in-memory encoded images into pixels.
pub trait TextureDecoder {
    /// Decodes the image at `path`.
    fn decode_file(&mut self, path: &Path) -> Result<DecodedTexture, TextureError>;
    /// Decodes an encoded image held in memory (e.g. embedded in a model).
    fn decode_bytes(&mut self, name: &str, bytes: &[u8]) -> Result<DecodedTexture, TextureError>;
}

/// [`TextureDecoder`] backed by the `image` crate. Keeps the source's
/// channel count (grey, grey/alpha, RGB or RGBA) at 8 bits per channel.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageDecoder;

impl ImageDecoder {
    fn convert(image: image::DynamicImage) -> DecodedTexture {
        let (width, height) = (image.width(), image.height());
        let (channels, pixels) = match image.color().channel_count() {
            1 => (1, image.into_luma8().into_raw()),
            2 => (2, image.into_luma_alpha8().into_raw()),
            3 => (3, image.into_rgb8().into_raw()),
            _ => (4, image.into_rgba8().into_raw()),
        };
        DecodedTexture {
            width,
            height,
            channels,
            pixels,
        }
    }
}

impl TextureDecoder for ImageDecoder {
    fn decode_file(&mut self, path: &Path) -> Result<DecodedTexture, TextureError> {
        let image = image::open(path).map_err(|source| TextureError::Decode {
            source_name: path.display().to_string(),
            source,
        })?;
        Ok(Self::convert(image))
    }

    fn decode_bytes(&mut self, name: &str, bytes: &[u8]) -> Result<DecodedTexture, TextureError> {
        let image = image::load_from_memory(bytes).map_err(|source| TextureError::Decode {
            source_name: name.to_string(),
            source,
        })?;
        Ok(Self::convert(image))
    }
}

/// Loads and releases textures by handle.
pub trait TextureStore {
    /// Loads the texture at `path`. Returns [`TextureHandle::INVALID`] on
    /// failure.
    fn load_texture(&mut self, path: &Path) -> TextureHandle;

    /// Loads an encoded image embedded in a model, identified by `key`
    /// (unique per model and texture index). Returns
    /// [`TextureHandle::INVALID`] on failure.
    fn load_embedded(&mut self, key: &str, bytes: &[u8]) -> TextureHandle;

    /// Gives up one owner's claim on `handle`. Invalid handles are ignored.
    fn release_texture(&mut self, handle: TextureHandle);
}

/// Metadata kept for a live texture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureInfo {
    /// Path or embedded key the texture was loaded from.
    pub key: String,
    pub width: u32,
    pub height: u32,
    pub channels: u8,
    /// Number of outstanding owners.
    pub refs: u32,
}

/// De-duplicating texture store over a [`TextureDecoder`].
#[derive(Debug)]
pub struct TextureCache<D> {
    decoder: D,
    by_key: HashMap<String, TextureHandle>,
    entries: HashMap<TextureHandle, TextureInfo>,
    next_id: u32,
}

impl<D: TextureDecoder> TextureCache<D> {
    /// Creates an empty cache.
    pub fn new(decoder: D) -> Self {
        Self {
            decoder,
            by_key: HashMap::new(),
            entries: HashMap::new(),
            next_id: 1,
        }
    }

    /// The underlying decoder.
    pub fn decoder(&self) -> &D {
        &self.decoder
    }

    /// Metadata for a live handle.
    pub fn info(&self, handle: TextureHandle) -> Option<&TextureInfo> {
        self.entries.get(&handle)
    }

    /// Outstanding owners of `handle` (0 if not live).
    pub fn ref_count(&self, handle: TextureHandle) -> u32 {
        self.entries.get(&handle).map_or(0, |e| e.refs)
    }

    /// Number of distinct live textures.
    pub fn live_count(&self) -> usize {
        self.entries.len()
    }

    fn acquire(
        &mut self,
        key: &str,
        decode: impl FnOnce(&mut D) -> Result<DecodedTexture, TextureError>,
    ) -> TextureHandle {
        if let Some(&handle) = self.by_key.get(key)
            && let Some(entry) = self.entries.get_mut(&handle)
        {
            entry.refs += 1;
            debug!("Reusing texture '{}' as {} (refs={})", key, handle, entry.refs);
            return handle;
        }

        let decoded = match decode(&mut self.decoder).and_then(|t| t.validate().map(|()| t)) {
            Ok(decoded) => decoded,
            Err(e) => {
                warn!("Texture failed to load at '{}': {}", key, e);
                return TextureHandle::INVALID;
            }
        };

        let handle = TextureHandle(self.next_id);
        self.next_id += 1;
        debug!(
            "Loaded texture '{}' as {} ({}x{}, {} channels)",
            key, handle, decoded.width, decoded.height, decoded.channels
        );
        self.by_key.insert(key.to_string(), handle);
        self.entries.insert(
            handle,
            TextureInfo {
                key: key.to_string(),
                width: decoded.width,
                height: decoded.height,
                channels: decoded.channels,
                refs: 1,
            },
        );
        handle
    }
}

impl<D: TextureDecoder> TextureStore for TextureCache<D> {
    fn load_texture(&mut self, path: &Path) -> TextureHandle {
        let key = path.to_string_lossy().into_owned();
        self.acquire(&key, |decoder| decoder.decode_file(path))
    }

    fn load_embedded(&mut self, key: &str, bytes: &[u8]) -> TextureHandle {
        self.acquire(key, |decoder| decoder.decode_bytes(key, bytes))
    }

    fn release_texture(&mut self, handle: TextureHandle) {
        if !handle.is_valid() {
            return;
        }
        let Some(entry) = self.entries.get_mut(&handle) else {
            warn!("Release of unknown texture {}", handle);
            return;
        };
        entry.refs -= 1;
        if entry.refs == 0
            && let Some(entry) = self.entries.remove(&handle)
        {
            self.by_key.remove(&entry.key);
            debug!("Freed texture '{}' ({})", entry.key, handle);
        }
    }
}
