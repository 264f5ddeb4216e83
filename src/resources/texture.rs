//! Texture-slot resolution: path rooting, image decode and GPU upload.

use std::path::{Component, Path, PathBuf};

use image::GenericImageView;

use crate::{
    context::{GraphicsContext, PixelFormat},
    data_structures::texture::{Texture, TextureRole},
    resources::{cache::ResourceCache, error::TextureError},
};

/// Resolve a material-declared texture path against the configured root.
///
/// Root and prefix components are stripped first: absolute paths in source
/// assets are not honored and can never escape the textures root.
pub(crate) fn resolve_path(textures_root: &Path, declared: &str) -> PathBuf {
    let relative: PathBuf = Path::new(declared)
        .components()
        .filter(|component| matches!(component, Component::Normal(_)))
        .collect();
    textures_root.join(relative)
}

/// Decode an image file into raw RGB or RGBA bytes plus its dimensions.
///
/// The channel count follows the caller's `alpha` flag, never the decoded
/// pixel data: an RGBA image decoded with `alpha == false` silently loses
/// its alpha channel, which is exactly the upload contract the caller asked
/// for.
pub fn load_image(path: &Path, alpha: bool) -> Result<(Vec<u8>, [u32; 2]), TextureError> {
    let img = image::open(path).map_err(|source| TextureError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    let (width, height) = img.dimensions();
    let pixels = if alpha {
        img.to_rgba8().into_raw()
    } else {
        img.to_rgb8().into_raw()
    };
    Ok((pixels, [width, height]))
}

/// Decode an image file and upload it once, without touching the cache.
pub fn load_texture(
    ctx: &mut dyn GraphicsContext,
    path: &Path,
    alpha: bool,
    role: TextureRole,
) -> Result<Texture, TextureError> {
    let (pixels, size) = load_image(path, alpha)?;
    let format = if alpha { PixelFormat::Rgba } else { PixelFormat::Rgb };
    let label = path.display().to_string();
    let handle = ctx.upload_texture(&label, size, format, &pixels);
    Ok(Texture::new(handle, role, format, size))
}

/// Resolve the texture slots a material declares under one role.
///
/// Each declared path doubles as the cache's logical name: an existing entry
/// is reused, otherwise the image is loaded and uploaded exactly once. A
/// slot that fails to load is logged and omitted; the mesh proceeds with
/// fewer textures.
pub(crate) fn resolve_slots(
    ctx: &mut dyn GraphicsContext,
    cache: &mut ResourceCache,
    textures_root: &Path,
    declared: &[String],
    alpha: bool,
    role: TextureRole,
) -> Vec<Texture> {
    let mut textures = Vec::new();
    for name in declared {
        if let Some(existing) = cache.cached_texture(name) {
            textures.push(existing);
            continue;
        }
        let path = resolve_path(textures_root, name);
        match cache.load_texture(ctx, &path, name, alpha, role) {
            Ok(texture) => textures.push(texture),
            Err(e) => log::warn!("dropping {} texture slot {name}: {e}", role.uniform_name()),
        }
    }
    textures
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declared_paths_stay_under_the_root() {
        let root = Path::new("assets/Textures");
        assert_eq!(
            resolve_path(root, "bark/oak.png"),
            Path::new("assets/Textures/bark/oak.png")
        );
        assert_eq!(
            resolve_path(root, "/var/leak/oak.png"),
            Path::new("assets/Textures/var/leak/oak.png")
        );
    }
}
