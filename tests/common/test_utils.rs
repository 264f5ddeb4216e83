// Shared across the test binaries; not every binary uses every helper.
#![allow(dead_code)]

use std::path::PathBuf;

use scenebake::{ImportOptions, Matrix4};

pub(crate) fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub(crate) fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

pub(crate) fn fixture(name: &str) -> PathBuf {
    fixtures_dir().join(name)
}

/// Import options rooted at the fixtures directory, so material texture
/// paths resolve next to the scene files.
pub(crate) fn fixture_options() -> ImportOptions {
    ImportOptions {
        textures_root: fixtures_dir(),
        ..ImportOptions::default()
    }
}

pub(crate) fn assert_matrix_eq(actual: &[[f32; 4]; 4], expected: Matrix4<f32>) {
    let expected: [[f32; 4]; 4] = expected.into();
    for (col_actual, col_expected) in actual.iter().zip(expected.iter()) {
        for (a, e) in col_actual.iter().zip(col_expected.iter()) {
            assert!(
                (a - e).abs() < 1e-5,
                "matrix mismatch:\n  actual   {actual:?}\n  expected {expected:?}"
            );
        }
    }
}
