//! Failure taxonomy for asset import.
//!
//! Broken source files degrade: an unparseable scene becomes an empty model,
//! a missing texture image becomes an omitted slot. Neither error type ever
//! crosses the importer boundary; both are logged where they occur. Data
//! shapes the pipeline does not support (normal/occlusion maps) are handled
//! separately, as hard failures.

use std::path::PathBuf;

use thiserror::Error;

/// The scene file itself could not be read or parsed.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("failed to parse scene file {}: {source}", .path.display())]
    Scene {
        path: PathBuf,
        source: gltf::Error,
    },

    #[error("failed to read buffer {uri} referenced by {}: {source}", .path.display())]
    Buffer {
        path: PathBuf,
        uri: String,
        source: std::io::Error,
    },

    #[error("{} references its binary payload, but the file carries none", .path.display())]
    MissingBlob { path: PathBuf },

    #[error("failed to load OBJ file {}: {source}", .path.display())]
    Obj {
        path: PathBuf,
        source: tobj::LoadError,
    },
}

/// A single texture slot failed to resolve; the owning mesh proceeds with
/// fewer textures than its material nominally declares.
#[derive(Debug, Error)]
pub enum TextureError {
    #[error("failed to decode texture image {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("texture slot references an image embedded in the binary payload")]
    Embedded,
}
