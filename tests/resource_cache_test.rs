use std::sync::Arc;

use scenebake::{
    TextureRole,
    context::{PixelFormat, headless::{ContextCall, HeadlessContext}},
    ResourceCache,
};

use crate::common::test_utils::{fixture, fixture_options, init_logging};

mod common;

#[test]
fn cache_is_a_faithful_passthrough_after_load() {
    init_logging();
    let mut ctx = HeadlessContext::new();
    let mut cache = ResourceCache::new();

    let loaded = cache.load_model_data(
        &mut ctx,
        &fixture("nested_nodes.gltf"),
        "scene",
        &fixture_options(),
    );
    let cached = cache.model_data("scene");
    assert!(Arc::ptr_eq(&loaded, &cached));

    // Counts match a direct import of the same file.
    let mut direct_ctx = HeadlessContext::new();
    let mut direct_cache = ResourceCache::new();
    let direct = scenebake::resources::import_scene(
        &mut direct_ctx,
        &mut direct_cache,
        &fixture("nested_nodes.gltf"),
        &fixture_options(),
    );
    assert_eq!(cached.meshes.len(), direct.meshes.len());
    assert_eq!(cached.lamps.len(), direct.lamps.len());
    for (cached_mesh, direct_mesh) in cached.meshes.iter().zip(&direct.meshes) {
        assert_eq!(cached_mesh.vertices().len(), direct_mesh.vertices().len());
    }
}

#[test]
fn loading_the_same_name_twice_overwrites() {
    init_logging();
    let mut ctx = HeadlessContext::new();
    let mut cache = ResourceCache::new();

    cache.load_model_data(
        &mut ctx,
        &fixture("nested_nodes.gltf"),
        "thing",
        &fixture_options(),
    );
    cache.load_model_data(
        &mut ctx,
        &fixture("one_light.gltf"),
        "thing",
        &fixture_options(),
    );

    // Only the second import remains retrievable.
    let data = cache.model_data("thing");
    assert!(data.meshes.is_empty());
    assert_eq!(data.lamps.len(), 1);
}

#[test]
fn getters_return_empty_values_for_unknown_names() {
    init_logging();
    let cache = ResourceCache::new();

    assert!(cache.shader("nope").is_null());
    assert!(cache.texture("nope").is_empty());
    assert!(cache.model_data("nope").is_empty());
    assert!(cache.cached_texture("nope").is_none());
}

#[test]
fn shaders_compile_from_source_files() {
    init_logging();
    let mut ctx = HeadlessContext::new();
    let mut cache = ResourceCache::new();

    let shader = cache
        .load_shader(
            &mut ctx,
            &fixture("basic.vert"),
            &fixture("basic.frag"),
            None,
            "basic",
        )
        .expect("shader sources should compile");
    assert!(!shader.is_null());
    assert_eq!(cache.shader("basic"), shader);
    assert_eq!(ctx.compiled_shaders(), ["basic".to_string()]);

    let missing = cache.load_shader(
        &mut ctx,
        &fixture("missing.vert"),
        &fixture("basic.frag"),
        None,
        "broken",
    );
    assert!(missing.is_err());
    assert!(cache.shader("broken").is_null());
}

#[test]
fn alpha_flag_controls_the_decoded_channel_count() {
    init_logging();
    let mut ctx = HeadlessContext::new();
    let mut cache = ResourceCache::new();

    let opaque = cache
        .load_texture(&mut ctx, &fixture("checker.png"), "opaque", false, TextureRole::Diffuse)
        .expect("fixture image should decode");
    assert_eq!(opaque.image_format(), PixelFormat::Rgb);

    let with_alpha = cache
        .load_texture(&mut ctx, &fixture("checker.png"), "cutout", true, TextureRole::Diffuse)
        .expect("fixture image should decode");
    assert_eq!(with_alpha.image_format(), PixelFormat::Rgba);
    assert_eq!(with_alpha.size(), [2, 2]);

    let uploads = ctx.uploaded_textures();
    assert_eq!(uploads.len(), 2);
    assert_eq!(uploads[0].byte_len, 12);
    assert_eq!(uploads[1].byte_len, 16);
}

#[test]
fn clear_releases_gpu_objects_and_empties_every_map() {
    init_logging();
    let mut ctx = HeadlessContext::new();
    let mut cache = ResourceCache::new();

    let shader = cache
        .load_shader(
            &mut ctx,
            &fixture("basic.vert"),
            &fixture("basic.frag"),
            None,
            "basic",
        )
        .unwrap();
    let texture = cache
        .load_texture(&mut ctx, &fixture("checker.png"), "checker", false, TextureRole::Diffuse)
        .unwrap();
    cache.load_model_data(
        &mut ctx,
        &fixture("textured.gltf"),
        "scene",
        &fixture_options(),
    );

    ctx.reset_calls();
    cache.clear(&mut ctx);

    assert!(cache.shader("basic").is_null());
    assert!(cache.texture("checker").is_empty());
    assert!(cache.model_data("scene").is_empty());

    let calls = ctx.calls();
    assert!(calls.contains(&ContextCall::DeleteShader(shader.handle())));
    assert!(calls.contains(&ContextCall::DeleteTexture(texture.handle())));
    // One shader plus three cached textures ("checker" and the two the
    // import resolved); mesh buffers inside cached model data are
    // deliberately not released.
    assert_eq!(calls.len(), 4);
}
