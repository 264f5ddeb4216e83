//! The graphics-context capability the pipeline is written against.
//!
//! All GPU-facing work in this crate (buffer and texture uploads, shader
//! compilation, uniform uploads, draw calls) goes through the
//! [`GraphicsContext`] trait. The trait is the whole contract: a real
//! backend implements it outside this crate, and [`headless::HeadlessContext`]
//! implements it without a GPU for tests and tooling.
//!
//! Handles are plain integers minted by the backend. Zero is reserved as the
//! null handle, so `Default` handles are always invalid. Nothing in this
//! crate implements `Drop` for a handle: GPU objects are released only when
//! the resource cache is explicitly cleared.

pub mod headless;

use cgmath::Matrix4;

/// Opaque handle to a linked shader program. Zero is the null program.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ShaderHandle(pub u32);

impl ShaderHandle {
    pub fn is_null(&self) -> bool {
        self.0 == 0
    }
}

/// Opaque handle to a mesh's GPU-resident vertex and index buffers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct MeshHandle(pub u32);

impl MeshHandle {
    pub fn is_null(&self) -> bool {
        self.0 == 0
    }
}

/// Opaque handle to a GPU-resident texture object.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u32);

impl TextureHandle {
    pub fn is_null(&self) -> bool {
        self.0 == 0
    }
}

/// Channel layout of decoded pixel data handed to [`GraphicsContext::upload_texture`].
///
/// The layout is a caller contract carried all the way from the image decode
/// request; it is never sniffed from the pixel bytes themselves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PixelFormat {
    #[default]
    Rgb,
    Rgba,
}

impl PixelFormat {
    pub fn bytes_per_pixel(self) -> u32 {
        match self {
            PixelFormat::Rgb => 3,
            PixelFormat::Rgba => 4,
        }
    }
}

/// A named uniform upload: scalars, vectors and matrices, single value or
/// array (the slice length is the array count).
#[derive(Clone, Copy, Debug)]
pub enum UniformValue<'a> {
    Bool(&'a [bool]),
    Int(i32),
    Float(&'a [f32]),
    Vec3(&'a [[f32; 3]]),
    Vec4(&'a [[f32; 4]]),
    Mat4([[f32; 4]; 4]),
}

/// The consumed graphics capability.
///
/// Everything here must be called from the thread that owns the underlying
/// graphics context; the pipeline is synchronous and never moves work off
/// the calling thread.
pub trait GraphicsContext {
    /// Compile and link a shader program from source text. The geometry
    /// stage is optional.
    fn compile_shader(
        &mut self,
        label: &str,
        vertex_src: &str,
        fragment_src: &str,
        geometry_src: Option<&str>,
    ) -> anyhow::Result<ShaderHandle>;

    /// Upload vertex and index data once, returning the handle used for all
    /// subsequent draws of this mesh.
    fn upload_mesh(&mut self, label: &str, vertices: &[u8], indices: &[u8]) -> MeshHandle;

    /// Upload decoded pixel data. `pixels` must be `size[0] * size[1] *
    /// format.bytes_per_pixel()` bytes.
    fn upload_texture(
        &mut self,
        label: &str,
        size: [u32; 2],
        format: PixelFormat,
        pixels: &[u8],
    ) -> TextureHandle;

    fn delete_shader(&mut self, shader: ShaderHandle);

    fn delete_texture(&mut self, texture: TextureHandle);

    /// Make `shader` the active program for subsequent uniform uploads and
    /// draw calls.
    fn use_shader(&mut self, shader: ShaderHandle);

    fn set_uniform(&mut self, shader: ShaderHandle, name: &str, value: UniformValue<'_>);

    /// Bind `texture` to the numbered texture unit.
    fn bind_texture(&mut self, unit: u32, texture: TextureHandle);

    /// Issue one indexed triangle-list draw over `index_count` indices.
    fn draw_indexed(&mut self, mesh: MeshHandle, index_count: u32);
}

/// A compiled shader program.
///
/// `Shader` is a value type: copies alias the same program object, and
/// dropping a copy never releases it. The default value is the null program,
/// which the resource cache hands out for unknown names.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Shader {
    program: ShaderHandle,
}

impl Shader {
    pub fn new(program: ShaderHandle) -> Self {
        Self { program }
    }

    pub fn handle(&self) -> ShaderHandle {
        self.program
    }

    pub fn is_null(&self) -> bool {
        self.program.is_null()
    }

    /// Make this the active program.
    pub fn bind(&self, ctx: &mut dyn GraphicsContext) {
        ctx.use_shader(self.program);
    }

    pub fn set_bool(&self, ctx: &mut dyn GraphicsContext, name: &str, values: &[bool]) {
        ctx.set_uniform(self.program, name, UniformValue::Bool(values));
    }

    pub fn set_int(&self, ctx: &mut dyn GraphicsContext, name: &str, value: i32) {
        ctx.set_uniform(self.program, name, UniformValue::Int(value));
    }

    pub fn set_float(&self, ctx: &mut dyn GraphicsContext, name: &str, values: &[f32]) {
        ctx.set_uniform(self.program, name, UniformValue::Float(values));
    }

    pub fn set_vector3(&self, ctx: &mut dyn GraphicsContext, name: &str, values: &[[f32; 3]]) {
        ctx.set_uniform(self.program, name, UniformValue::Vec3(values));
    }

    pub fn set_vector4(&self, ctx: &mut dyn GraphicsContext, name: &str, values: &[[f32; 4]]) {
        ctx.set_uniform(self.program, name, UniformValue::Vec4(values));
    }

    pub fn set_matrix4(&self, ctx: &mut dyn GraphicsContext, name: &str, matrix: &Matrix4<f32>) {
        ctx.set_uniform(self.program, name, UniformValue::Mat4((*matrix).into()));
    }
}
