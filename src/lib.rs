//! # Flashback
//!
//! Turns a folder of photos into a "memory flashback" video: each photo becomes
//! a short clip, the clips accelerate from lingering to a single frame, and a
//! strobe loop cycles through the whole set at one photo per frame before the
//! video ends.
//!
//! # Architecture: Plan, Then Encode
//!
//! A run is split into a pure planning phase and an effectful encoding phase:
//!
//! ```text
//! 1. Plan     input_images/  →  Plan           (scan, order, timing, zoom; no ffmpeg)
//! 2. Render   Plan           →  temp_clips/    (one ffmpeg process per clip)
//! 3. Stitch   temp_clips/    →  <base>_<fps>fps_<n>.mp4   (concat demuxer, stream copy)
//! ```
//!
//! All randomness (shuffle, zoom, pan) is drawn from one seeded generator
//! during planning, so `flashback plan --seed N` shows exactly what
//! `flashback render --seed N` will encode.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Finds input images, probes their size, orders them randomly or by date |
//! | [`timing`] | Crescendo and static duration math |
//! | [`queue`] | Primary pass + high-speed loop as an ordered list of render jobs |
//! | [`clip`] | Aspect-fill crop, zoom/pan sampling, and the per-clip filter chain |
//! | [`random`] | Injectable random source; seeded PRNG and scripted test source |
//! | [`encoder`] | [`Encoder`](encoder::Encoder) trait, ffmpeg implementation, concat manifest |
//! | [`naming`] | Non-clobbering output names and clip file names |
//! | [`pipeline`] | Orchestrates a run, owns the temp workspace, emits progress |
//! | [`config`] | `flashback.toml` loading, validation, merging, and CLI overrides |
//! | [`output`] | CLI output formatting |
//! | [`logging`] | `tracing` subscriber setup |
//!
//! # Design Decisions
//!
//! ## External ffmpeg
//!
//! Encoding H.264 in-process would mean linking a large C library or shipping
//! a slow pure-Rust encoder. ffmpeg is already on most machines that make
//! videos, handles every input format, and its concat demuxer joins clips
//! without re-encoding. The [`Encoder`](encoder::Encoder) trait keeps the
//! rest of the crate independent of it, and tests run against a mock.
//!
//! ## One Clip Per Photo
//!
//! Every queue entry becomes its own small file instead of one giant filter
//! graph. A failing photo is then isolated to one clip, progress is easy to
//! report, and the filter chain for each clip stays short enough to read in
//! `flashback plan --json`.
//!
//! ## Fill, Never Letterbox
//!
//! Photos of any shape are scaled to cover the output frame and center-cropped.
//! Every clip has identical dimensions, which the concat demuxer requires for
//! stream copy.

pub mod clip;
pub mod config;
pub mod encoder;
pub mod logging;
pub mod naming;
pub mod output;
pub mod pipeline;
pub mod queue;
pub mod random;
pub mod scan;
pub mod timing;

#[cfg(test)]
pub(crate) mod test_helpers;
