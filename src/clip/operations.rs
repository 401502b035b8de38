//! High-level clip planning.
//!
//! These functions combine calculations with the render queue. They take
//! the resolved settings, compute parameters for each job, and hand back
//! [`ClipParams`] ready for an encoder.

use super::calculations::frame_count;
use super::params::{ClipParams, CropSpec, Resolution, ZoomMotion, ZoomPath, ZoomRange};
use crate::naming::clip_file_name;
use crate::queue::{RenderJob, RenderQueue};
use crate::random::RandomSource;
use std::path::Path;

/// Zoom settings; absent when zoom is disabled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomSettings {
    pub range: ZoomRange,
    /// Extra frames generated past `ceil(duration * fps)`.
    pub frame_margin: u32,
}

/// Everything the clip planner needs besides the job itself.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipSettings {
    pub crop: CropSpec,
    pub fps: u32,
    pub zoom: Option<ZoomSettings>,
    /// Container extension for temporary clips (e.g. `mp4`).
    pub extension: String,
}

impl ClipSettings {
    pub fn new(
        resolution: Resolution,
        fps: u32,
        zoom: Option<ZoomSettings>,
        extension: &str,
    ) -> Self {
        Self {
            crop: CropSpec::for_resolution(resolution),
            fps,
            zoom,
            extension: extension.to_string(),
        }
    }
}

/// Plan one clip. Draws from `rng` only when zoom is enabled.
pub fn plan_clip(
    index: usize,
    job: &RenderJob,
    clip_dir: &Path,
    settings: &ClipSettings,
    rng: &mut impl RandomSource,
) -> ClipParams {
    let zoom = settings.zoom.map(|zoom| ZoomMotion {
        path: ZoomPath::sample(zoom.range, rng),
        frames: frame_count(job.duration, settings.fps, zoom.frame_margin),
    });

    ClipParams {
        index,
        source: job.image.path.clone(),
        output: clip_dir.join(clip_file_name(index, &settings.extension)),
        duration: job.duration,
        fps: settings.fps,
        crop: settings.crop,
        geometry: job.image.dimensions.map(|d| settings.crop.fill_geometry(d)),
        zoom,
    }
}

/// Plan every clip of a queue, in queue order.
pub fn plan_clips(
    queue: &RenderQueue,
    clip_dir: &Path,
    settings: &ClipSettings,
    rng: &mut impl RandomSource,
) -> Vec<ClipParams> {
    queue
        .jobs()
        .iter()
        .enumerate()
        .map(|(index, job)| plan_clip(index, job, clip_dir, settings, rng))
        .collect()
}
