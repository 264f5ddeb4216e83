//! The name-keyed resource cache.
//!
//! One `ResourceCache` instance owns every shader, texture and imported
//! model-data bundle, each keyed by a caller-chosen logical name (not the
//! file path). Construct one at application start and pass it down; there
//! is deliberately no global state, so tests get a fresh cache each.
//!
//! `load_*` always re-imports/re-uploads and overwrites the entry under the
//! given name (last-writer-wins); at-most-once loading holds as long as the
//! caller does not `load_*` the same name twice, and the importer's own
//! texture resolution goes through [`Self::cached_texture`] first to get
//! exactly that guarantee.

use std::{collections::HashMap, fs, path::Path, sync::Arc};

use anyhow::Context as _;

use crate::{
    context::{GraphicsContext, Shader},
    data_structures::{
        model::ModelData,
        texture::{Texture, TextureRole},
    },
    resources::{ImportOptions, error::TextureError},
};

#[derive(Debug, Default)]
pub struct ResourceCache {
    shaders: HashMap<String, Shader>,
    textures: HashMap<String, Texture>,
    model_data: HashMap<String, Arc<ModelData>>,
}

impl ResourceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read shader source files, compile through the context and register
    /// the program under `name`. Always recompiles and overwrites.
    pub fn load_shader(
        &mut self,
        ctx: &mut dyn GraphicsContext,
        vertex_path: &Path,
        fragment_path: &Path,
        geometry_path: Option<&Path>,
        name: &str,
    ) -> anyhow::Result<Shader> {
        let vertex_src = fs::read_to_string(vertex_path)
            .with_context(|| format!("reading vertex shader {}", vertex_path.display()))?;
        let fragment_src = fs::read_to_string(fragment_path)
            .with_context(|| format!("reading fragment shader {}", fragment_path.display()))?;
        let geometry_src = match geometry_path {
            Some(path) => Some(
                fs::read_to_string(path)
                    .with_context(|| format!("reading geometry shader {}", path.display()))?,
            ),
            None => None,
        };
        let program = ctx.compile_shader(name, &vertex_src, &fragment_src, geometry_src.as_deref())?;
        let shader = Shader::new(program);
        self.shaders.insert(name.to_string(), shader);
        Ok(shader)
    }

    /// The cached shader under `name`, or the null shader when absent.
    pub fn shader(&self, name: &str) -> Shader {
        self.shaders.get(name).copied().unwrap_or_default()
    }

    /// Decode, upload and register a texture under `name`. Always reloads
    /// and overwrites. `alpha` selects RGBA over RGB decode and is the
    /// caller's contract, not detected from the file.
    pub fn load_texture(
        &mut self,
        ctx: &mut dyn GraphicsContext,
        path: &Path,
        name: &str,
        alpha: bool,
        role: TextureRole,
    ) -> Result<Texture, TextureError> {
        let texture = super::texture::load_texture(ctx, path, alpha, role)?;
        self.textures.insert(name.to_string(), texture.clone());
        Ok(texture)
    }

    /// The cached texture under `name`, or the empty texture when absent.
    pub fn texture(&self, name: &str) -> Texture {
        self.textures.get(name).cloned().unwrap_or_default()
    }

    /// The cached texture under `name`, if one exists. The importer's slot
    /// resolution checks this before loading, which is what makes repeated
    /// references to one image deduplicate to a single upload.
    pub fn cached_texture(&self, name: &str) -> Option<Texture> {
        self.textures.get(name).cloned()
    }

    /// Import a scene file and register the flattened data under `name`.
    /// Always re-imports and overwrites. A file the asset library cannot
    /// parse yields an empty bundle, not an error.
    pub fn load_model_data(
        &mut self,
        ctx: &mut dyn GraphicsContext,
        path: &Path,
        name: &str,
        options: &ImportOptions,
    ) -> Arc<ModelData> {
        let data = Arc::new(super::import_scene(ctx, self, path, options));
        self.model_data.insert(name.to_string(), data.clone());
        data
    }

    /// The cached model data under `name`, or an empty bundle when absent.
    pub fn model_data(&self, name: &str) -> Arc<ModelData> {
        self.model_data.get(name).cloned().unwrap_or_default()
    }

    /// Release every GPU shader and texture object and drop all entries.
    ///
    /// Mesh buffers inside cached model data are not released here; their
    /// handles live until the backend itself is torn down (see DESIGN.md).
    pub fn clear(&mut self, ctx: &mut dyn GraphicsContext) {
        for shader in self.shaders.values() {
            ctx.delete_shader(shader.handle());
        }
        for texture in self.textures.values() {
            ctx.delete_texture(texture.handle());
        }
        self.shaders.clear();
        self.textures.clear();
        self.model_data.clear();
    }
}
