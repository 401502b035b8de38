//! Video encoding: clips, concat manifest, and the external ffmpeg process.
//!
//! | Operation | Implementation |
//! |---|---|
//! | **Version probe** | `ffmpeg -version` |
//! | **Render clip** | `-loop 1` still image → libx264 clip |
//! | **Concat** | concat demuxer + stream copy |
//!
//! The module is split into:
//! - **Backend**: [`Encoder`] trait + [`EncodeError`]
//! - **Ffmpeg**: [`FfmpegEncoder`] and its argument builders
//! - **Manifest**: the clip list fed to the concat demuxer

pub mod backend;
pub mod ffmpeg;
pub mod manifest;

pub use backend::{EncodeError, Encoder};
pub use ffmpeg::FfmpegEncoder;
pub use manifest::{MANIFEST_FILE_NAME, format_manifest, write_manifest};
