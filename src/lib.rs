//! scenebake
//!
//! A scene-flattening asset import pipeline. This crate ingests
//! externally-authored 3D scene files (node hierarchies carrying meshes,
//! materials, textures and light sources) and flattens them into a
//! renderer-ready representation: world-space-baked vertex/index buffers per
//! mesh, deduplicated texture resources and a bounded lamp list, behind a
//! name-keyed resource cache with at-most-once upload semantics.
//!
//! High-level modules
//! - `context`: the graphics-context capability the pipeline draws through
//! - `data_structures`: flattened scene data (meshes, textures, lighting)
//! - `resources`: scene importers and the name-keyed resource cache
//!
//! The crate never talks to a GPU directly: all uploads and draws go through
//! the [`context::GraphicsContext`] trait, so a real backend lives outside
//! this crate and the bundled [`context::headless::HeadlessContext`] serves
//! tests and headless tooling.

pub mod context;
pub mod data_structures;
pub mod resources;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath::*;
pub use context::{GraphicsContext, Shader};
pub use data_structures::lighting::{Lamp, LightingInfo, MAX_LIGHTS};
pub use data_structures::model::{MAX_MESH_TEXTURES, MaterialColors, Mesh, MeshVertex, Model, ModelData};
pub use data_structures::texture::{Texture, TextureRole};
pub use resources::{ImportOptions, cache::ResourceCache};
