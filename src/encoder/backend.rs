//! Encoder trait and shared error type.
//!
//! The [`Encoder`] trait defines the three operations the pipeline needs from
//! a video encoder: report its version, render one clip, and stitch clips
//! together. The production implementation is
//! [`FfmpegEncoder`](super::ffmpeg::FfmpegEncoder), which shells out to an
//! external `ffmpeg` binary.

use crate::clip::ClipParams;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(
        "Encoder '{program}' not found. Install ffmpeg or point encoder.program (--ffmpeg) at the executable"
    )]
    EncoderNotFound { program: String },
    #[error("Clip {index} failed ({status}): {stderr}")]
    ClipFailed {
        index: usize,
        status: String,
        stderr: String,
    },
    #[error("Concatenation failed ({status}): {stderr}")]
    ConcatFailed { status: String, stderr: String },
}

impl EncodeError {
    /// Whether this error only concerns a single clip.
    ///
    /// Everything else (missing binary, IO on the workspace) stops the run
    /// regardless of the clip failure policy.
    pub fn is_clip_failure(&self) -> bool {
        matches!(self, EncodeError::ClipFailed { .. })
    }
}

/// Trait for video encoders.
pub trait Encoder {
    /// Human-readable version string, used by `check` to confirm availability.
    fn version(&self) -> Result<String, EncodeError>;

    /// Render one still image into a clip at `clip.output`.
    fn render_clip(&self, clip: &ClipParams) -> Result<(), EncodeError>;

    /// Join the clips listed in `manifest` into `output` without re-encoding.
    fn concat(&self, manifest: &Path, output: &Path) -> Result<(), EncodeError>;
}
