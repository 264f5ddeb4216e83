use std::sync::Arc;

use cgmath::{Euler, Matrix4, Quaternion, Rad, Vector3};
use scenebake::{
    LightingInfo, Mesh, MeshVertex, Model, ModelData, Shader, Texture, TextureRole,
    context::{
        PixelFormat, ShaderHandle, TextureHandle,
        headless::{HeadlessContext, RecordedUniform},
    },
    data_structures::model::MaterialColors,
};

use crate::common::test_utils::{assert_matrix_eq, init_logging};

mod common;

fn triangle() -> (Vec<MeshVertex>, Vec<u32>) {
    let vertices = vec![
        MeshVertex {
            position: [0.0, 0.0, 0.0],
            normal: [0.0, 0.0, 1.0],
            tex_coords: [0.0, 0.0],
        },
        MeshVertex {
            position: [1.0, 0.0, 0.0],
            normal: [0.0, 0.0, 1.0],
            tex_coords: [1.0, 0.0],
        },
        MeshVertex {
            position: [0.0, 1.0, 0.0],
            normal: [0.0, 0.0, 1.0],
            tex_coords: [0.0, 1.0],
        },
    ];
    (vertices, vec![0, 1, 2])
}

fn texture(handle: u32, role: TextureRole) -> Texture {
    Texture::new(TextureHandle(handle), role, PixelFormat::Rgb, [2, 2])
}

#[test]
fn texture_slots_count_independently_per_role() {
    init_logging();
    let mut ctx = HeadlessContext::new();
    let (vertices, indices) = triangle();
    let mesh = Mesh::import(
        &mut ctx,
        "slots",
        vertices,
        indices,
        vec![
            texture(101, TextureRole::Diffuse),
            texture(102, TextureRole::Diffuse),
            texture(103, TextureRole::Specular),
        ],
        MaterialColors::default(),
    );

    let shader = Shader::new(ShaderHandle(7));
    mesh.draw(&mut ctx, &shader, &LightingInfo::default());

    let slot_uniforms: Vec<&str> = ctx
        .uniform_names()
        .into_iter()
        .filter(|name| name.starts_with("texture_"))
        .collect();
    assert_eq!(
        slot_uniforms,
        vec!["texture_diffuse[0]", "texture_diffuse[1]", "texture_specular[0]"]
    );

    // Units are assigned sequentially from 0, in texture order.
    assert_eq!(
        ctx.uniform("texture_diffuse[1]"),
        Some(&RecordedUniform::Int(1))
    );
    assert_eq!(
        ctx.bound_textures(),
        vec![
            (0, TextureHandle(101)),
            (1, TextureHandle(102)),
            (2, TextureHandle(103)),
        ]
    );

    assert_eq!(
        ctx.uniform("diffuseActive"),
        Some(&RecordedUniform::Bool(vec![true, true, false, false]))
    );
    assert_eq!(
        ctx.uniform("specularActive"),
        Some(&RecordedUniform::Bool(vec![true, false, false, false]))
    );
}

#[test]
fn untextured_mesh_draws_with_all_false_masks() {
    init_logging();
    let mut ctx = HeadlessContext::new();
    let (vertices, indices) = triangle();
    let mesh = Mesh::import(
        &mut ctx,
        "bare",
        vertices,
        indices,
        Vec::new(),
        MaterialColors::default(),
    );

    let shader = Shader::new(ShaderHandle(7));
    mesh.draw(&mut ctx, &shader, &LightingInfo::default());

    assert_eq!(
        ctx.uniform("diffuseActive"),
        Some(&RecordedUniform::Bool(vec![false; 4]))
    );
    assert_eq!(
        ctx.uniform("specularActive"),
        Some(&RecordedUniform::Bool(vec![false; 4]))
    );
    assert!(ctx.bound_textures().is_empty());
    assert_eq!(ctx.draw_count(), 1);
}

#[test]
fn degenerate_mesh_with_no_indices_still_draws() {
    init_logging();
    let mut ctx = HeadlessContext::new();
    let mesh = Mesh::import(
        &mut ctx,
        "degenerate",
        Vec::new(),
        Vec::new(),
        Vec::new(),
        MaterialColors::default(),
    );

    let shader = Shader::new(ShaderHandle(7));
    mesh.draw(&mut ctx, &shader, &LightingInfo::default());
    assert_eq!(ctx.draw_count(), 1);
}

#[test]
fn mesh_draw_uploads_color_and_the_lighting_snapshot() {
    init_logging();
    let mut ctx = HeadlessContext::new();
    let (vertices, indices) = triangle();
    let colors = MaterialColors {
        diffuse: [0.9, 0.2, 0.1, 1.0],
        ..MaterialColors::default()
    };
    let mesh = Mesh::import(&mut ctx, "lit", vertices, indices, Vec::new(), colors);

    let lamps = [scenebake::Lamp {
        position: Vector3::new(1.0, 2.0, 3.0),
        color: Vector3::new(1.0, 0.5, 0.0),
    }];
    let lighting = LightingInfo::from_lamps(&lamps, 0.5, Vector3::new(0.0, 0.0, 8.0));

    let shader = Shader::new(ShaderHandle(7));
    mesh.draw(&mut ctx, &shader, &lighting);

    assert_eq!(
        ctx.uniform("color"),
        Some(&RecordedUniform::Vec4(vec![[0.9, 0.2, 0.1, 1.0]]))
    );
    match ctx.uniform("lightPos") {
        Some(RecordedUniform::Vec3(positions)) => {
            assert_eq!(positions.len(), scenebake::MAX_LIGHTS);
            assert_eq!(positions[0], [1.0, 2.0, 3.0]);
        }
        other => panic!("lightPos not uploaded as a vec3 array: {other:?}"),
    }
    match ctx.uniform("lightActive") {
        Some(RecordedUniform::Bool(active)) => {
            assert!(active[0]);
            assert!(active[1..].iter().all(|&a| !a));
        }
        other => panic!("lightActive not uploaded as a bool array: {other:?}"),
    }
    assert_eq!(
        ctx.uniform("viewPos"),
        Some(&RecordedUniform::Vec3(vec![[0.0, 0.0, 8.0]]))
    );
    assert_eq!(
        ctx.uniform("ambientStrength"),
        Some(&RecordedUniform::Float(vec![0.1]))
    );
}

#[test]
fn model_draw_composes_scale_translate_rotate() {
    init_logging();
    let mut ctx = HeadlessContext::new();
    let (vertices, indices) = triangle();
    let mesh = Mesh::import(
        &mut ctx,
        "placed",
        vertices,
        indices,
        Vec::new(),
        MaterialColors::default(),
    );
    let data = Arc::new(ModelData {
        meshes: vec![mesh],
        lamps: Vec::new(),
    });

    let shader = Shader::new(ShaderHandle(3));
    let position = Vector3::new(1.0, 2.0, 3.0);
    let rotation = Vector3::new(0.3, 0.5, 0.2);
    let scale = Vector3::new(2.0, 2.0, 2.0);
    let mut model = Model::with_placement(data, shader, position, rotation, scale);

    let projection = Matrix4::from_nonuniform_scale(1.0, 2.0, 0.5);
    let view = Matrix4::from_translation(Vector3::new(0.0, 0.0, -10.0));
    model.draw(&mut ctx, projection, view, &LightingInfo::default());

    let expected_world = Matrix4::from_nonuniform_scale(scale.x, scale.y, scale.z)
        * Matrix4::from_translation(position)
        * Matrix4::from(Quaternion::from(Euler::new(
            Rad(rotation.x),
            Rad(rotation.y),
            Rad(rotation.z),
        )));
    match ctx.uniform("model") {
        Some(RecordedUniform::Mat4(actual)) => assert_matrix_eq(actual, expected_world),
        other => panic!("model matrix not uploaded: {other:?}"),
    }
    match ctx.uniform("pv") {
        Some(RecordedUniform::Mat4(actual)) => assert_matrix_eq(actual, projection * view),
        other => panic!("pv matrix not uploaded: {other:?}"),
    }

    // pv and model go up once per model, then one draw per mesh.
    let matrix_uploads = ctx
        .uniform_names()
        .into_iter()
        .filter(|name| *name == "pv" || *name == "model")
        .count();
    assert_eq!(matrix_uploads, 2);
    assert_eq!(ctx.draw_count(), 1);
}
