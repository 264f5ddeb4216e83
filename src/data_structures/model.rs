//! Meshes, flattened model data and the placeable model wrapper.
//!
//! A [`Mesh`] owns its vertex/index data plus the textures and material
//! colors resolved at import time, and uploads itself to the graphics
//! context exactly once when constructed. [`ModelData`] is the flat result
//! of one scene import (meshes + lamps), shared between any number of
//! [`Model`] instances through an `Arc`; meshes are never deep-copied per
//! instance.

use std::sync::Arc;

use cgmath::{Euler, Matrix4, Quaternion, Rad, SquareMatrix, Vector3};

use crate::{
    context::{GraphicsContext, MeshHandle, Shader},
    data_structures::{
        lighting::{Lamp, LightingInfo},
        texture::{Texture, TextureRole},
    },
};

/// Per-role ceiling on texture slots a single mesh can bind, matching the
/// shader's `diffuseActive[]`/`specularActive[]` array size.
pub const MAX_MESH_TEXTURES: usize = 4;

/// One vertex as uploaded to the GPU. Positions are in mesh-local space only
/// transiently during import; once a mesh is constructed they are baked into
/// ancestor-accumulated world space and never re-transformed at draw time.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coords: [f32; 2],
}

/// The full material color set reported by the source asset. Each channel
/// defaults to opaque black when the mesh has no material.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MaterialColors {
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
    pub ambient: [f32; 4],
    pub emissive: [f32; 4],
    pub transparent: [f32; 4],
}

impl Default for MaterialColors {
    fn default() -> Self {
        let black = [0.0, 0.0, 0.0, 1.0];
        Self {
            diffuse: black,
            specular: black,
            ambient: black,
            emissive: black,
            transparent: black,
        }
    }
}

/// A world-space mesh with its GPU buffers, textures and material colors.
///
/// Invariants held by construction: the index buffer is a triangle list
/// (length divisible by 3) and every index is in range of the vertex buffer.
/// The GPU handle is created once here and lives as long as the mesh.
#[derive(Debug)]
pub struct Mesh {
    pub name: String,
    vertices: Vec<MeshVertex>,
    indices: Vec<u32>,
    textures: Vec<Texture>,
    pub colors: MaterialColors,
    gpu: MeshHandle,
}

impl Mesh {
    /// Take ownership of import results and upload them to the graphics
    /// context. This is the only upload this mesh will ever perform.
    pub fn import(
        ctx: &mut dyn GraphicsContext,
        name: &str,
        vertices: Vec<MeshVertex>,
        indices: Vec<u32>,
        textures: Vec<Texture>,
        colors: MaterialColors,
    ) -> Self {
        debug_assert_eq!(indices.len() % 3, 0);
        debug_assert!(indices.iter().all(|&i| (i as usize) < vertices.len()));
        let gpu = ctx.upload_mesh(
            name,
            bytemuck::cast_slice(&vertices),
            bytemuck::cast_slice(&indices),
        );
        Self {
            name: name.to_string(),
            vertices,
            indices,
            textures,
            colors,
            gpu,
        }
    }

    pub fn vertices(&self) -> &[MeshVertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn textures(&self) -> &[Texture] {
        &self.textures
    }

    pub fn gpu_handle(&self) -> MeshHandle {
        self.gpu
    }

    /// Upload the flat diffuse color and the lighting snapshot, bind every
    /// texture to a sequential unit starting at 0, and issue one indexed
    /// triangle-list draw.
    ///
    /// Texture uniforms are named `texture_<role>[<slot>]` with a per-role
    /// slot counter, and the `diffuseActive`/`specularActive` masks mark
    /// which slots are populated so the shader can skip unbound ones. A mesh
    /// with zero indices or zero textures draws without error.
    pub fn draw(&self, ctx: &mut dyn GraphicsContext, shader: &Shader, lighting: &LightingInfo) {
        shader.set_vector4(ctx, "color", &[self.colors.diffuse]);

        shader.set_bool(ctx, "lightActive", &lighting.light_active);
        shader.set_vector4(ctx, "lightColor", &lighting.light_color);
        shader.set_vector3(ctx, "lightPos", &lighting.light_pos);
        shader.set_float(ctx, "specularStrength", &lighting.specular_strength);

        shader.set_vector4(ctx, "ambientColor", &[lighting.ambient_color]);
        shader.set_float(ctx, "ambientStrength", &[lighting.ambient_strength]);
        shader.set_vector3(ctx, "viewPos", &[lighting.view_pos]);

        let mut diffuse_active = [false; MAX_MESH_TEXTURES];
        let mut specular_active = [false; MAX_MESH_TEXTURES];
        let mut diffuse_slots = 0;
        let mut specular_slots = 0;
        let mut unit = 0u32;
        for texture in &self.textures {
            let (slot, active) = match texture.role() {
                TextureRole::Diffuse => {
                    diffuse_slots += 1;
                    (diffuse_slots - 1, &mut diffuse_active)
                }
                TextureRole::Specular => {
                    specular_slots += 1;
                    (specular_slots - 1, &mut specular_active)
                }
            };
            if slot >= MAX_MESH_TEXTURES {
                log::warn!(
                    "mesh {} exceeds {MAX_MESH_TEXTURES} {} slots, skipping a texture",
                    self.name,
                    texture.role().uniform_name()
                );
                continue;
            }
            active[slot] = true;
            let uniform = format!("texture_{}[{}]", texture.role().uniform_name(), slot);
            shader.set_int(ctx, &uniform, unit as i32);
            ctx.bind_texture(unit, texture.handle());
            unit += 1;
        }
        shader.set_bool(ctx, "diffuseActive", &diffuse_active);
        shader.set_bool(ctx, "specularActive", &specular_active);

        ctx.draw_indexed(self.gpu, self.indices.len() as u32);
    }
}

/// The flattened result of one scene import: world-space meshes plus the
/// lamps enumerated from the file. Immutable after import and cached by
/// logical name; [`Model`] instances share it by reference.
#[derive(Debug, Default)]
pub struct ModelData {
    pub meshes: Vec<Mesh>,
    pub lamps: Vec<Lamp>,
}

impl ModelData {
    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty() && self.lamps.is_empty()
    }
}

/// A placeable instance of cached [`ModelData`]: placement + shared data +
/// shader. Vertices are already world-space baked, so drawing applies only
/// the whole-model placement matrix on top.
#[derive(Debug)]
pub struct Model {
    pub position: Vector3<f32>,
    /// Euler angles in radians.
    pub rotation: Vector3<f32>,
    pub scale: Vector3<f32>,
    data: Arc<ModelData>,
    shader: Shader,
    current_world: Matrix4<f32>,
}

impl Model {
    pub fn new(data: Arc<ModelData>, shader: Shader) -> Self {
        Self {
            position: Vector3::new(0.0, 0.0, 0.0),
            rotation: Vector3::new(0.0, 0.0, 0.0),
            scale: Vector3::new(1.0, 1.0, 1.0),
            data,
            shader,
            current_world: Matrix4::identity(),
        }
    }

    pub fn with_placement(
        data: Arc<ModelData>,
        shader: Shader,
        position: Vector3<f32>,
        rotation: Vector3<f32>,
        scale: Vector3<f32>,
    ) -> Self {
        Self {
            position,
            rotation,
            scale,
            ..Self::new(data, shader)
        }
    }

    pub fn data(&self) -> &Arc<ModelData> {
        &self.data
    }

    pub fn shader(&self) -> Shader {
        self.shader
    }

    pub fn set_shader(&mut self, shader: Shader) {
        self.shader = shader;
    }

    /// The placement matrix, composed as `scale * translate * rotate`.
    pub fn world_matrix(&self) -> Matrix4<f32> {
        let rotation = Quaternion::from(Euler::new(
            Rad(self.rotation.x),
            Rad(self.rotation.y),
            Rad(self.rotation.z),
        ));
        Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
            * Matrix4::from_translation(self.position)
            * Matrix4::from(rotation)
    }

    /// Per-frame hook; placement animation goes here in downstream code.
    pub fn update(&mut self, _dt: f32) {}

    /// Recompute the world matrix from the current placement, upload
    /// `projection * view` and the world matrix once, then draw every mesh
    /// with the same lighting snapshot.
    pub fn draw(
        &mut self,
        ctx: &mut dyn GraphicsContext,
        projection: Matrix4<f32>,
        view: Matrix4<f32>,
        lighting: &LightingInfo,
    ) {
        self.shader.bind(ctx);

        self.current_world = self.world_matrix();
        let proj_view = projection * view;
        self.shader.set_matrix4(ctx, "pv", &proj_view);
        self.shader.set_matrix4(ctx, "model", &self.current_world);

        for mesh in &self.data.meshes {
            mesh.draw(ctx, &self.shader, lighting);
        }
    }
}
