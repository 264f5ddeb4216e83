//! A recording graphics context that runs without a GPU.
//!
//! [`HeadlessContext`] mints monotonically increasing handles and records
//! every call it receives. The test suite asserts against the recorded call
//! stream; headless tools (asset validation, CI import checks) can use it to
//! run the full import pipeline on machines with no graphics stack.

use crate::context::{
    GraphicsContext, MeshHandle, PixelFormat, ShaderHandle, TextureHandle, UniformValue,
};

/// One recorded [`GraphicsContext`] call.
#[derive(Clone, Debug, PartialEq)]
pub enum ContextCall {
    UseShader(ShaderHandle),
    SetUniform {
        shader: ShaderHandle,
        name: String,
        value: RecordedUniform,
    },
    BindTexture {
        unit: u32,
        texture: TextureHandle,
    },
    DrawIndexed {
        mesh: MeshHandle,
        index_count: u32,
    },
    DeleteShader(ShaderHandle),
    DeleteTexture(TextureHandle),
}

/// Owned snapshot of a [`UniformValue`] upload.
#[derive(Clone, Debug, PartialEq)]
pub enum RecordedUniform {
    Bool(Vec<bool>),
    Int(i32),
    Float(Vec<f32>),
    Vec3(Vec<[f32; 3]>),
    Vec4(Vec<[f32; 4]>),
    Mat4([[f32; 4]; 4]),
}

impl From<UniformValue<'_>> for RecordedUniform {
    fn from(value: UniformValue<'_>) -> Self {
        match value {
            UniformValue::Bool(v) => RecordedUniform::Bool(v.to_vec()),
            UniformValue::Int(v) => RecordedUniform::Int(v),
            UniformValue::Float(v) => RecordedUniform::Float(v.to_vec()),
            UniformValue::Vec3(v) => RecordedUniform::Vec3(v.to_vec()),
            UniformValue::Vec4(v) => RecordedUniform::Vec4(v.to_vec()),
            UniformValue::Mat4(v) => RecordedUniform::Mat4(v),
        }
    }
}

/// A mesh upload as the backend saw it.
#[derive(Clone, Debug, PartialEq)]
pub struct MeshUpload {
    pub handle: MeshHandle,
    pub label: String,
    pub vertex_bytes: usize,
    pub index_bytes: usize,
}

/// A texture upload as the backend saw it.
#[derive(Clone, Debug, PartialEq)]
pub struct TextureUpload {
    pub handle: TextureHandle,
    pub label: String,
    pub size: [u32; 2],
    pub format: PixelFormat,
    pub byte_len: usize,
}

#[derive(Debug, Default)]
pub struct HeadlessContext {
    next_handle: u32,
    calls: Vec<ContextCall>,
    meshes: Vec<MeshUpload>,
    textures: Vec<TextureUpload>,
    shaders: Vec<String>,
}

impl HeadlessContext {
    pub fn new() -> Self {
        Self::default()
    }

    fn next(&mut self) -> u32 {
        self.next_handle += 1;
        self.next_handle
    }

    /// Every recorded call, in order.
    pub fn calls(&self) -> &[ContextCall] {
        &self.calls
    }

    /// Forget the recorded call stream; uploads stay known.
    pub fn reset_calls(&mut self) {
        self.calls.clear();
    }

    pub fn uploaded_meshes(&self) -> &[MeshUpload] {
        &self.meshes
    }

    pub fn uploaded_textures(&self) -> &[TextureUpload] {
        &self.textures
    }

    /// Labels of every compiled shader program, in compile order.
    pub fn compiled_shaders(&self) -> &[String] {
        &self.shaders
    }

    /// The most recent value uploaded for a uniform name, if any.
    pub fn uniform(&self, name: &str) -> Option<&RecordedUniform> {
        self.calls.iter().rev().find_map(|call| match call {
            ContextCall::SetUniform {
                name: set, value, ..
            } if set == name => Some(value),
            _ => None,
        })
    }

    /// Every uniform name in upload order, duplicates included.
    pub fn uniform_names(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                ContextCall::SetUniform { name, .. } => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Texture-unit bindings in call order.
    pub fn bound_textures(&self) -> Vec<(u32, TextureHandle)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                ContextCall::BindTexture { unit, texture } => Some((*unit, *texture)),
                _ => None,
            })
            .collect()
    }

    pub fn draw_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, ContextCall::DrawIndexed { .. }))
            .count()
    }
}

impl GraphicsContext for HeadlessContext {
    fn compile_shader(
        &mut self,
        label: &str,
        vertex_src: &str,
        fragment_src: &str,
        _geometry_src: Option<&str>,
    ) -> anyhow::Result<ShaderHandle> {
        if vertex_src.trim().is_empty() || fragment_src.trim().is_empty() {
            anyhow::bail!("shader {label} has an empty stage");
        }
        let handle = ShaderHandle(self.next());
        self.shaders.push(label.to_string());
        Ok(handle)
    }

    fn upload_mesh(&mut self, label: &str, vertices: &[u8], indices: &[u8]) -> MeshHandle {
        let handle = MeshHandle(self.next());
        self.meshes.push(MeshUpload {
            handle,
            label: label.to_string(),
            vertex_bytes: vertices.len(),
            index_bytes: indices.len(),
        });
        handle
    }

    fn upload_texture(
        &mut self,
        label: &str,
        size: [u32; 2],
        format: PixelFormat,
        pixels: &[u8],
    ) -> TextureHandle {
        debug_assert_eq!(
            pixels.len(),
            (size[0] * size[1] * format.bytes_per_pixel()) as usize,
            "pixel byte length does not match {size:?} at {format:?}"
        );
        let handle = TextureHandle(self.next());
        self.textures.push(TextureUpload {
            handle,
            label: label.to_string(),
            size,
            format,
            byte_len: pixels.len(),
        });
        handle
    }

    fn delete_shader(&mut self, shader: ShaderHandle) {
        self.calls.push(ContextCall::DeleteShader(shader));
    }

    fn delete_texture(&mut self, texture: TextureHandle) {
        self.calls.push(ContextCall::DeleteTexture(texture));
    }

    fn use_shader(&mut self, shader: ShaderHandle) {
        self.calls.push(ContextCall::UseShader(shader));
    }

    fn set_uniform(&mut self, shader: ShaderHandle, name: &str, value: UniformValue<'_>) {
        self.calls.push(ContextCall::SetUniform {
            shader,
            name: name.to_string(),
            value: value.into(),
        });
    }

    fn bind_texture(&mut self, unit: u32, texture: TextureHandle) {
        self.calls.push(ContextCall::BindTexture { unit, texture });
    }

    fn draw_indexed(&mut self, mesh: MeshHandle, index_count: u32) {
        self.calls.push(ContextCall::DrawIndexed { mesh, index_count });
    }
}
