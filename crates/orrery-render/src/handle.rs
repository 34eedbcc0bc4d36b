//! Opaque texture handle.

use std::fmt;

/// Identifier of a loaded texture. `0` means "nothing loaded" and is never
/// bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct TextureHandle(pub u32);

impl TextureHandle {
    /// The sentinel returned when a load fails.
    pub const INVALID: Self = Self(0);

    /// Whether this handle refers to a loaded texture.
    pub fn is_valid(self) -> bool {
        self.0 != 0
    }
}

impl fmt::Display for TextureHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "tex#{}", self.0)
        } else {
            f.write_str("tex#invalid")
        }
    }
}
