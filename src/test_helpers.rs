//! Shared test utilities for the flashback test suite.
//!
//! Provides fixture builders that lay out an input folder of real (tiny)
//! images and a config pointing at it, so pipeline tests run against the
//! filesystem without needing ffmpeg.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_input(&["a.png", "b.png"]);
//! let config = test_config(tmp.path());
//! let plan = build_plan(&config, 42).unwrap();
//! ```

use std::fs::File;
use std::path::Path;
use std::time::SystemTime;
use tempfile::TempDir;

use crate::config::SlideshowConfig;

// =========================================================================
// Fixture setup
// =========================================================================

/// Write a `width`×`height` black PNG.
pub fn write_png(path: &Path, width: u32, height: u32) {
    image::RgbImage::new(width, height).save(path).unwrap();
}

/// Set a file's modification time.
pub fn set_modified(path: &Path, when: SystemTime) {
    File::options()
        .write(true)
        .open(path)
        .unwrap()
        .set_modified(when)
        .unwrap();
}

/// Create a temp dir with an `input_images/` folder holding one small PNG per name.
///
/// Output videos go to the temp dir root.
pub fn setup_input(names: &[&str]) -> TempDir {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("input_images");
    std::fs::create_dir(&input).unwrap();
    for name in names {
        write_png(&input.join(name), 16, 9);
    }
    tmp
}

/// Config for a fixture created by [`setup_input`]: small, fast, seeded.
pub fn test_config(root: &Path) -> SlideshowConfig {
    let mut config = SlideshowConfig {
        input_dir: root.join("input_images"),
        output_dir: root.to_path_buf(),
        fps: 10,
        resolution: "320x180".to_string(),
        seed: Some(42),
        ..SlideshowConfig::default()
    };
    config.timing.crescendo_duration = 2.0;
    config.timing.loop_duration = 1.0;
    config
}
