//! Clip parameter generation: what each clip looks like before ffmpeg sees it.
//!
//! | Concern | Where |
//! |---|---|
//! | **Aspect fill** | [`CropSpec`] + `calculate_fill_dimensions` |
//! | **Zoom / pan** | [`ZoomPath::sample`] through an injected [`RandomSource`](crate::random::RandomSource) |
//! | **Frame budget** | `frame_count` = `ceil(duration * fps)` + margin |
//! | **Filter chain** | [`ClipParams::filter_expression`] |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for geometry and frame math (unit testable)
//! - **Parameters**: Data structures describing one clip
//! - **Operations**: Planning functions combining calculations with render jobs

mod calculations;
pub mod operations;
mod params;

pub use operations::{ClipSettings, ZoomSettings, plan_clip, plan_clips};
pub use params::{
    ClipParams, CropSpec, Dimensions, FillGeometry, Resolution, ResolutionError, ZoomMotion,
    ZoomPath, ZoomRange,
};
