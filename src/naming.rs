//! File naming for final outputs and temporary clips.
//!
//! ## Output files
//!
//! Finished videos are named `{base}_{fps}fps_{n}.{ext}`, where `n` is the
//! smallest positive integer whose name is free in the output directory.
//! Earlier renders are never overwritten:
//!
//! - `memory_flashback_30fps_1.mp4` (first run)
//! - `memory_flashback_30fps_2.mp4` (second run)
//!
//! ## Clips
//!
//! Temporary clips use a zero-padded queue index, `clip_00000.mp4`, so a
//! directory listing sorts in playback order.

use std::path::{Path, PathBuf};

/// Name of the `n`-th candidate output file.
pub fn output_file_name(base_name: &str, fps: u32, n: u32, extension: &str) -> String {
    format!("{base_name}_{fps}fps_{n}.{extension}")
}

/// First output path in `dir` that does not exist yet.
pub fn unique_output_path(dir: &Path, base_name: &str, fps: u32, extension: &str) -> PathBuf {
    (1..)
        .map(|n| dir.join(output_file_name(base_name, fps, n, extension)))
        .find(|candidate| !candidate.exists())
        .unwrap_or_else(|| dir.join(output_file_name(base_name, fps, u32::MAX, extension)))
}

/// Temporary clip file name for queue position `index`.
pub fn clip_file_name(index: usize, extension: &str) -> String {
    format!("clip_{index:05}.{extension}")
}
