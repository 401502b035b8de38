//! Parameter types for clip rendering.
//!
//! These structs describe *what* a clip looks like, not *how* it gets
//! encoded. They are the interface between [`operations`](super::operations),
//! which decides crop and zoom for each render job, and the
//! [`encoder`](crate::encoder), which turns a [`ClipParams`] into a process
//! invocation. Keeping them plain data lets the whole plan be printed, diffed,
//! and tested without ffmpeg.
//!
//! ## Types
//!
//! - [`Resolution`]: Target `WIDTHxHEIGHT`, parsed from config.
//! - [`CropSpec`]: Aspect-fill crop box; identical for every clip at one resolution.
//! - [`FillGeometry`]: Explicit scale + crop offsets when the source size is known.
//! - [`ZoomPath`]: Randomized start/end magnification and fixed pan anchor.
//! - [`ClipParams`]: Everything needed to render one clip.

use super::calculations::{calculate_fill_dimensions, center_offset, interpolate_scale};
use crate::random::RandomSource;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// Pixel dimensions of a source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Resolution must be in format 'WIDTHxHEIGHT' (e.g. 1920x1080), got '{0}'")]
pub struct ResolutionError(pub String);

/// Output video resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl FromStr for Resolution {
    type Err = ResolutionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ResolutionError(s.to_string());
        let (w, h) = s.trim().split_once('x').ok_or_else(invalid)?;
        let width: u32 = w.trim().parse().map_err(|_| invalid())?;
        let height: u32 = h.trim().parse().map_err(|_| invalid())?;
        if width == 0 || height == 0 {
            return Err(invalid());
        }
        Ok(Self { width, height })
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Aspect-fill crop: cover the target box, then center-crop to exactly it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropSpec {
    pub width: u32,
    pub height: u32,
}

/// Concrete scale and crop offsets for one source size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillGeometry {
    pub scaled_width: u32,
    pub scaled_height: u32,
    pub offset_x: u32,
    pub offset_y: u32,
}

impl CropSpec {
    pub fn for_resolution(resolution: Resolution) -> Self {
        Self {
            width: resolution.width,
            height: resolution.height,
        }
    }

    /// Scale and centered offsets that fill this box from `source`.
    pub fn fill_geometry(&self, source: Dimensions) -> FillGeometry {
        let (scaled_width, scaled_height) = calculate_fill_dimensions(
            (source.width.max(1), source.height.max(1)),
            (self.width, self.height),
        );
        FillGeometry {
            scaled_width,
            scaled_height,
            offset_x: center_offset(scaled_width, self.width),
            offset_y: center_offset(scaled_height, self.height),
        }
    }

    /// Filter chain for the crop alone.
    ///
    /// The encoder sizes the fill from the decoded frame, which ffmpeg has
    /// already rotated per EXIF orientation. Header dimensions can be swapped
    /// relative to that, so [`FillGeometry`] is never baked into the filter.
    pub fn filter(&self) -> String {
        let (w, h) = (self.width, self.height);
        format!("scale={w}:{h}:force_original_aspect_ratio=increase,crop={w}:{h}:(iw-ow)/2:(ih-oh)/2")
    }
}

/// Allowed magnification range for zoom sampling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomRange {
    pub min: f64,
    pub max: f64,
}

impl Default for ZoomRange {
    fn default() -> Self {
        Self { min: 1.0, max: 1.5 }
    }
}

/// Per-clip zoom: linear magnification from `start_scale` to `end_scale`,
/// viewport anchored at `(pan_x, pan_y)` within the croppable margin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomPath {
    pub start_scale: f64,
    pub end_scale: f64,
    pub pan_x: f64,
    pub pan_y: f64,
}

impl ZoomPath {
    /// Draw an independent zoom path. Draw order: start, end, x, y.
    pub fn sample(range: ZoomRange, rng: &mut impl RandomSource) -> Self {
        Self {
            start_scale: rng.uniform(range.min, range.max),
            end_scale: rng.uniform(range.min, range.max),
            pan_x: rng.uniform(0.0, 1.0),
            pan_y: rng.uniform(0.0, 1.0),
        }
    }

    /// Magnification at fraction `t` of the clip.
    pub fn scale_at(&self, t: f64) -> f64 {
        interpolate_scale(self.start_scale, self.end_scale, t)
    }
}

/// Zoom path plus the number of frames the zoom filter generates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomMotion {
    pub path: ZoomPath,
    pub frames: u32,
}

/// Full description of one clip render.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClipParams {
    /// Position in the render queue (also the temp file sequence number).
    pub index: usize,
    pub source: PathBuf,
    pub output: PathBuf,
    /// Seconds.
    pub duration: f64,
    pub fps: u32,
    pub crop: CropSpec,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geometry: Option<FillGeometry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zoom: Option<ZoomMotion>,
}

impl ClipParams {
    /// Complete video filter chain: crop, then zoom/pan when enabled.
    pub fn filter_expression(&self) -> String {
        let crop = self.crop.filter();
        let Some(motion) = self.zoom else {
            return crop;
        };

        let ZoomPath {
            start_scale: zs,
            end_scale: ze,
            pan_x,
            pan_y,
        } = motion.path;
        // Frames spanning the requested duration; the margin frames hold end_scale.
        let active = (self.duration * self.fps as f64).max(1.0);
        format!(
            "{crop},zoompan=z='{zs:.6}+({ze:.6}-{zs:.6})*min(on/{active:.4},1)':\
             x='(iw-iw/zoom)*{pan_x:.6}':y='(ih-ih/zoom)*{pan_y:.6}':\
             d={frames}:s={w}x{h}:fps={fps}",
            frames = motion.frames,
            w = self.crop.width,
            h = self.crop.height,
            fps = self.fps,
        )
    }
}
