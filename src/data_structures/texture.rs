//! Texture resources and their semantic roles.
//!
//! A [`Texture`] pairs a GPU texture handle with the semantic role that
//! drives texture-unit assignment and uniform naming at draw time. Clones
//! share one underlying GPU object through an `Arc`'d inner; dropping a
//! clone never releases the GPU object. Release happens only when the
//! resource cache is cleared, so ownership is effectively cache-lifetime.

use std::sync::Arc;

use crate::context::{PixelFormat, TextureHandle};

/// Semantic classification of a texture, driving both texture-unit
/// assignment and shader uniform naming.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextureRole {
    #[default]
    Diffuse,
    Specular,
}

impl TextureRole {
    /// The uniform-name fragment for this role, as in `texture_diffuse[0]`.
    pub fn uniform_name(self) -> &'static str {
        match self {
            TextureRole::Diffuse => "diffuse",
            TextureRole::Specular => "specular",
        }
    }
}

#[derive(Debug, Default)]
struct TextureShared {
    handle: TextureHandle,
    role: TextureRole,
    image_format: PixelFormat,
    internal_format: PixelFormat,
    size: [u32; 2],
}

/// A loaded texture. The default value is the empty texture (null handle),
/// which the resource cache hands out for unknown names.
#[derive(Clone, Debug, Default)]
pub struct Texture {
    shared: Arc<TextureShared>,
}

impl Texture {
    /// Wrap a freshly uploaded GPU texture. The image and internal formats
    /// both follow the caller's decode request.
    pub fn new(handle: TextureHandle, role: TextureRole, format: PixelFormat, size: [u32; 2]) -> Self {
        Self {
            shared: Arc::new(TextureShared {
                handle,
                role,
                image_format: format,
                internal_format: format,
                size,
            }),
        }
    }

    pub fn handle(&self) -> TextureHandle {
        self.shared.handle
    }

    pub fn role(&self) -> TextureRole {
        self.shared.role
    }

    pub fn image_format(&self) -> PixelFormat {
        self.shared.image_format
    }

    pub fn internal_format(&self) -> PixelFormat {
        self.shared.internal_format
    }

    /// [width, height] in pixels.
    pub fn size(&self) -> [u32; 2] {
        self.shared.size
    }

    pub fn is_empty(&self) -> bool {
        self.shared.handle.is_null()
    }
}
