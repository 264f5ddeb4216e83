//! Scene import and flattening.
//!
//! This module walks an externally-parsed scene-graph tree, accumulates node
//! transforms multiplicatively from root to leaf, bakes every mesh's
//! vertices into world space, resolves material texture slots through the
//! resource cache, and collects light-emitting nodes into a lamp list. The
//! result is a flat [`ModelData`]: draw time never re-applies per-node
//! sub-transforms, because the importer has already folded them into the
//! vertex data.
//!
//! Import is best-effort: a file the asset library cannot parse is logged
//! and yields an empty [`ModelData`] rather than failing the caller.

pub mod cache;
pub mod error;
pub mod texture;

use std::{
    fs,
    path::{Path, PathBuf},
};

use cgmath::{Matrix4, SquareMatrix, Vector3, Vector4};

use crate::{
    context::GraphicsContext,
    data_structures::{
        lighting::{Lamp, MAX_LIGHTS},
        model::{MaterialColors, Mesh, MeshVertex, ModelData},
        texture::{Texture, TextureRole},
    },
    resources::{cache::ResourceCache, error::ImportError},
};

/// Import configuration. The defaults: textures under a `Textures/` root,
/// RGB decode, lamp positions read verbatim from their nodes.
#[derive(Clone, Debug)]
pub struct ImportOptions {
    /// Root directory material texture paths resolve against. Absolute
    /// paths in source assets are not honored.
    pub textures_root: PathBuf,
    /// Request RGBA (true) or RGB (false) decode for every material
    /// texture. This is a caller contract: the decoded channel count is
    /// never detected from the image file.
    pub texture_alpha: bool,
    /// When true, lamp positions get the accumulated ancestor transform
    /// applied, the way mesh vertices do. When false (the default), a
    /// lamp's position is its node's own translation, untransformed.
    pub bake_light_transforms: bool,
    /// Lamps substituted when the file defines no lights of its own.
    pub fallback_lamps: Vec<Lamp>,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            textures_root: PathBuf::from("Textures"),
            texture_alpha: false,
            bake_light_transforms: false,
            fallback_lamps: Vec::new(),
        }
    }
}

/// Import a scene file into flattened [`ModelData`].
///
/// Dispatches on the file extension: `.obj` goes through the flat OBJ path,
/// everything else through the glTF scene-graph path. An unreadable or
/// unparseable file logs the library's diagnostic and returns an empty
/// bundle: a broken asset must not crash the caller.
pub fn import_scene(
    ctx: &mut dyn GraphicsContext,
    cache: &mut ResourceCache,
    path: &Path,
    options: &ImportOptions,
) -> ModelData {
    let result = match path.extension().and_then(|ext| ext.to_str()) {
        Some("obj") => import_obj(ctx, cache, path, options),
        _ => import_gltf(ctx, cache, path, options),
    };
    match result {
        Ok(data) => data,
        Err(e) => {
            log::error!("scene import failed, continuing with empty model data: {e}");
            ModelData::default()
        }
    }
}

fn import_gltf(
    ctx: &mut dyn GraphicsContext,
    cache: &mut ResourceCache,
    path: &Path,
    options: &ImportOptions,
) -> Result<ModelData, ImportError> {
    let gltf = gltf::Gltf::open(path).map_err(|source| ImportError::Scene {
        path: path.to_path_buf(),
        source,
    })?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));

    // Buffers are loaded up front. Images are deliberately not: texture
    // slots resolve against the configured textures root instead.
    let mut buffer_data: Vec<Vec<u8>> = Vec::new();
    for buffer in gltf.buffers() {
        match buffer.source() {
            gltf::buffer::Source::Bin => {
                let blob = gltf.blob.as_deref().ok_or_else(|| ImportError::MissingBlob {
                    path: path.to_path_buf(),
                })?;
                buffer_data.push(blob.to_vec());
            }
            gltf::buffer::Source::Uri(uri) => {
                let bin = fs::read(base_dir.join(uri)).map_err(|source| ImportError::Buffer {
                    path: path.to_path_buf(),
                    uri: uri.to_string(),
                    source,
                })?;
                buffer_data.push(bin);
            }
        }
    }

    let mut data = ModelData::default();
    for scene in gltf.scenes() {
        for node in scene.nodes() {
            flatten_node(
                ctx,
                cache,
                &node,
                &buffer_data,
                Matrix4::identity(),
                options,
                &mut data,
            );
        }
    }

    if data.lamps.len() > MAX_LIGHTS {
        log::warn!(
            "{} defines {} lights, keeping the first {MAX_LIGHTS}",
            path.display(),
            data.lamps.len()
        );
        data.lamps.truncate(MAX_LIGHTS);
    }
    if data.lamps.is_empty() {
        data.lamps = options.fallback_lamps.clone();
    }
    log::info!(
        "imported {}: {} meshes, {} lamps",
        path.display(),
        data.meshes.len(),
        data.lamps.len()
    );
    Ok(data)
}

/// Depth-first traversal with cumulative transform composition. Ancestor
/// transforms apply before a node's own: `local = inherited * node matrix`.
fn flatten_node(
    ctx: &mut dyn GraphicsContext,
    cache: &mut ResourceCache,
    node: &gltf::Node<'_>,
    buffers: &[Vec<u8>],
    inherited: Matrix4<f32>,
    options: &ImportOptions,
    out: &mut ModelData,
) {
    let local = inherited * Matrix4::from(node.transform().matrix());

    if let Some(light) = node.light() {
        out.lamps.push(lamp_from_node(node, &light, local, options));
    }

    if let Some(mesh) = node.mesh() {
        let mesh_name = mesh.name().unwrap_or("unnamed_mesh");
        for primitive in mesh.primitives() {
            if primitive.mode() != gltf::mesh::Mode::Triangles {
                log::warn!(
                    "skipping non-triangle primitive (mode {:?}) in mesh {mesh_name}",
                    primitive.mode()
                );
                continue;
            }
            let (vertices, indices) = read_primitive(&primitive, buffers, mesh_name, local);
            let textures = material_textures(ctx, cache, &primitive.material(), options);
            let colors = material_colors(&primitive.material());
            out.meshes
                .push(Mesh::import(ctx, mesh_name, vertices, indices, textures, colors));
        }
    }

    for child in node.children() {
        flatten_node(ctx, cache, &child, buffers, local, options, out);
    }
}

fn lamp_from_node(
    node: &gltf::Node<'_>,
    light: &gltf::khr_lights_punctual::Light<'_>,
    world: Matrix4<f32>,
    options: &ImportOptions,
) -> Lamp {
    let position = if options.bake_light_transforms {
        (world * Vector4::new(0.0, 0.0, 0.0, 1.0)).truncate()
    } else {
        // The node's reported translation only; ancestor transforms are
        // not applied here, while mesh vertices do get them.
        Vector3::from(node.transform().decomposed().0)
    };
    Lamp {
        position,
        color: Vector3::from(light.color()),
    }
}

/// Read one primitive's vertex attributes and indices, baking positions
/// through the accumulated node transform. Normals default to zero and
/// texture coordinates to (0,0) when the source omits them.
fn read_primitive(
    primitive: &gltf::Primitive<'_>,
    buffers: &[Vec<u8>],
    mesh_name: &str,
    transform: Matrix4<f32>,
) -> (Vec<MeshVertex>, Vec<u32>) {
    let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(Vec::as_slice));

    let mut vertices = Vec::new();
    if let Some(positions) = reader.read_positions() {
        for position in positions {
            let world = transform * Vector4::new(position[0], position[1], position[2], 1.0);
            vertices.push(MeshVertex {
                position: [world.x, world.y, world.z],
                ..Default::default()
            });
        }
    }
    if let Some(normals) = reader.read_normals() {
        for (vertex, normal) in vertices.iter_mut().zip(normals) {
            vertex.normal = normal;
        }
    }
    if let Some(tex_coords) = reader.read_tex_coords(0) {
        for (vertex, uv) in vertices.iter_mut().zip(tex_coords.into_f32()) {
            vertex.tex_coords = uv;
        }
    }

    let indices: Vec<u32> = reader
        .read_indices()
        .map(|indices| indices.into_u32().collect())
        .unwrap_or_else(|| (0..vertices.len() as u32).collect());
    let indices = validate_indices(indices, vertices.len(), mesh_name);

    (vertices, indices)
}

/// Keep only whole, in-range triangles. A trailing partial face and any
/// face referencing vertices past the end are dropped with a warning, not
/// padded or clamped.
fn validate_indices(indices: Vec<u32>, vertex_count: usize, mesh_name: &str) -> Vec<u32> {
    let whole = indices.len() - indices.len() % 3;
    if whole != indices.len() {
        log::warn!(
            "mesh {mesh_name} index count {} is not a multiple of 3, dropping the remainder",
            indices.len()
        );
    }
    let mut out = Vec::with_capacity(whole);
    for face in indices[..whole].chunks_exact(3) {
        if face.iter().all(|&i| (i as usize) < vertex_count) {
            out.extend_from_slice(face);
        } else {
            log::warn!("mesh {mesh_name} face {face:?} references out-of-range vertices, skipping");
        }
    }
    out
}

/// Material colors as the library reports them; opaque black when the
/// primitive has no material of its own.
fn material_colors(material: &gltf::Material<'_>) -> MaterialColors {
    if material.index().is_none() {
        return MaterialColors::default();
    }
    let mut colors = MaterialColors::default();
    colors.diffuse = material.pbr_metallic_roughness().base_color_factor();
    let emissive = material.emissive_factor();
    colors.emissive = [emissive[0], emissive[1], emissive[2], 1.0];
    if let Some(sg) = material.pbr_specular_glossiness() {
        colors.diffuse = sg.diffuse_factor();
        let specular = sg.specular_factor();
        colors.specular = [specular[0], specular[1], specular[2], 1.0];
    }
    colors
}

/// Resolve the diffuse and specular texture slots a material declares.
///
/// Panics on normal and occlusion maps: those are texture kinds this
/// pipeline has no uniform-naming rule for, which makes the asset itself
/// unsupported, not a condition the draw loop could recover from.
fn material_textures(
    ctx: &mut dyn GraphicsContext,
    cache: &mut ResourceCache,
    material: &gltf::Material<'_>,
    options: &ImportOptions,
) -> Vec<Texture> {
    if material.normal_texture().is_some() || material.occlusion_texture().is_some() {
        panic!(
            "material {:?} carries a normal or occlusion map, which this pipeline does not support",
            material.name()
        );
    }

    let mut diffuse = Vec::new();
    let mut specular = Vec::new();
    if let Some(info) = material.pbr_metallic_roughness().base_color_texture() {
        push_slot(&mut diffuse, info.texture());
    }
    if let Some(sg) = material.pbr_specular_glossiness() {
        if let Some(info) = sg.diffuse_texture() {
            push_slot(&mut diffuse, info.texture());
        }
        if let Some(info) = sg.specular_glossiness_texture() {
            push_slot(&mut specular, info.texture());
        }
    }

    let mut textures = texture::resolve_slots(
        ctx,
        cache,
        &options.textures_root,
        &diffuse,
        options.texture_alpha,
        TextureRole::Diffuse,
    );
    textures.extend(texture::resolve_slots(
        ctx,
        cache,
        &options.textures_root,
        &specular,
        options.texture_alpha,
        TextureRole::Specular,
    ));
    textures
}

/// Record a slot's source path. Images embedded in the binary payload have
/// no path to resolve, so the slot is omitted like any other failed load.
fn push_slot(slots: &mut Vec<String>, texture: gltf::Texture<'_>) {
    match texture.source().source() {
        gltf::image::Source::Uri { uri, .. } => slots.push(uri.to_string()),
        gltf::image::Source::View { .. } => {
            log::warn!(
                "dropping texture slot {:?}: {}",
                texture.name(),
                error::TextureError::Embedded
            );
        }
    }
}

/// Flat OBJ import: one mesh per model in the file, no hierarchy, no
/// lights. Material diffuse/specular/ambient colors and texture maps come
/// from the accompanying MTL library when one resolves.
fn import_obj(
    ctx: &mut dyn GraphicsContext,
    cache: &mut ResourceCache,
    path: &Path,
    options: &ImportOptions,
) -> Result<ModelData, ImportError> {
    let (models, materials) = tobj::load_obj(
        path,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
    )
    .map_err(|source| ImportError::Obj {
        path: path.to_path_buf(),
        source,
    })?;
    let materials = materials.unwrap_or_else(|e| {
        log::warn!("no usable material library for {}: {e}", path.display());
        Vec::new()
    });

    let mut data = ModelData::default();
    for model in &models {
        let mesh = &model.mesh;
        let vertices: Vec<MeshVertex> = (0..mesh.positions.len() / 3)
            .map(|i| MeshVertex {
                position: [
                    mesh.positions[i * 3],
                    mesh.positions[i * 3 + 1],
                    mesh.positions[i * 3 + 2],
                ],
                normal: [
                    mesh.normals.get(i * 3).copied().unwrap_or(0.0),
                    mesh.normals.get(i * 3 + 1).copied().unwrap_or(0.0),
                    mesh.normals.get(i * 3 + 2).copied().unwrap_or(0.0),
                ],
                tex_coords: [
                    mesh.texcoords.get(i * 2).copied().unwrap_or(0.0),
                    mesh.texcoords.get(i * 2 + 1).copied().unwrap_or(0.0),
                ],
            })
            .collect();
        let indices = validate_indices(mesh.indices.clone(), vertices.len(), &model.name);

        let mut colors = MaterialColors::default();
        let mut textures = Vec::new();
        if let Some(material) = mesh.material_id.and_then(|id| materials.get(id)) {
            let diffuse = material.diffuse.unwrap_or([0.0, 0.0, 0.0]);
            colors.diffuse = [
                diffuse[0],
                diffuse[1],
                diffuse[2],
                material.dissolve.unwrap_or(1.0),
            ];
            if let Some(specular) = material.specular {
                colors.specular = [specular[0], specular[1], specular[2], 1.0];
            }
            if let Some(ambient) = material.ambient {
                colors.ambient = [ambient[0], ambient[1], ambient[2], 1.0];
            }
            if let Some(map) = &material.diffuse_texture {
                textures.extend(texture::resolve_slots(
                    ctx,
                    cache,
                    &options.textures_root,
                    std::slice::from_ref(map),
                    options.texture_alpha,
                    TextureRole::Diffuse,
                ));
            }
            if let Some(map) = &material.specular_texture {
                textures.extend(texture::resolve_slots(
                    ctx,
                    cache,
                    &options.textures_root,
                    std::slice::from_ref(map),
                    options.texture_alpha,
                    TextureRole::Specular,
                ));
            }
        }
        data.meshes
            .push(Mesh::import(ctx, &model.name, vertices, indices, textures, colors));
    }
    data.lamps = options.fallback_lamps.clone();
    log::info!(
        "imported {}: {} meshes (flat), {} fallback lamps",
        path.display(),
        data.meshes.len(),
        data.lamps.len()
    );
    Ok(data)
}
