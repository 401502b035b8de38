//! End-to-end slideshow rendering.
//!
//! Ties the stages together:
//!
//! ```text
//! scan → order → durations → queue → clip plan → render clips → manifest → concat → cleanup
//! ```
//!
//! Everything up to the clip plan is pure and shared with the `plan` command,
//! so a dry run and a real run with the same seed describe the same video.
//!
//! ## Workspace
//!
//! Clips are rendered into `<input_dir>/temp_clips/` together with the concat
//! manifest. The folder is created fresh for every run and removed afterwards,
//! whether the run succeeded or not. Failing to remove it is logged, never
//! reported as a run failure.
//!
//! ## Failure policy
//!
//! A missing encoder binary always stops the run. A single clip failing stops
//! it under [`ClipFailurePolicy::Abort`]; under [`ClipFailurePolicy::Tolerate`]
//! the clip is left out of the manifest and counted in the [`RunSummary`].
//!
//! ## Progress
//!
//! With a sender attached, [`RenderEvent`]s are emitted as the run advances.
//! Clip progress is reported every [`PROGRESS_INTERVAL`] clips and after the
//! last one.

use crate::clip::{ClipParams, Resolution, plan_clips};
use crate::config::{ClipFailurePolicy, ConfigError, SlideshowConfig};
use crate::encoder::{EncodeError, Encoder, FfmpegEncoder, MANIFEST_FILE_NAME, write_manifest};
use crate::naming::unique_output_path;
use crate::queue::{DurationSource, build_queue};
use crate::random::{XorShift64, seed_from_clock};
use crate::scan::{ScanError, order_images, scan};
use crate::timing::primary_durations;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;

/// Clip workspace folder created inside the input directory.
pub const CLIP_DIR_NAME: &str = "temp_clips";

/// Clips rendered between two progress events.
pub const PROGRESS_INTERVAL: usize = 10;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error("No clips were rendered ({failed} failed); nothing to stitch")]
    NothingRendered { failed: usize },
    #[error("Created input folder '{}'. Put your photos in it and run again.", .0.display())]
    InputCreated(PathBuf),
}

/// Progress events sent while a run advances.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderEvent {
    /// Plan is ready; rendering is about to start.
    Planned {
        images: usize,
        clips: usize,
        total_duration: f64,
        seed: u64,
    },
    /// `done` of `total` clips have been attempted.
    Progress { done: usize, total: usize },
    /// A clip failed and was skipped (tolerate policy only).
    ClipSkipped { index: usize, reason: String },
    /// All clips attempted; joining them into the output file.
    Stitching { clips: usize },
    /// Output file written.
    Finished { output: PathBuf },
}

/// Full description of a run, computed without touching the encoder.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Plan {
    pub seed: u64,
    pub input_dir: PathBuf,
    pub clip_dir: PathBuf,
    pub output: PathBuf,
    pub fps: u32,
    pub resolution: Resolution,
    pub image_count: usize,
    /// Seconds of video the plan produces.
    pub total_duration: f64,
    pub clips: Vec<ClipParams>,
}

impl Plan {
    /// Clips shown in the first pass (one per image); the rest are the loop.
    pub fn primary_clips(&self) -> &[ClipParams] {
        &self.clips[..self.image_count.min(self.clips.len())]
    }

    pub fn loop_clips(&self) -> &[ClipParams] {
        &self.clips[self.image_count.min(self.clips.len())..]
    }
}

/// Outcome of a finished run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub output: PathBuf,
    pub seed: u64,
    pub image_count: usize,
    pub clip_count: usize,
    /// Indices of clips left out under the tolerate policy.
    pub failed_clips: Vec<usize>,
    pub total_duration: f64,
}

/// Result of the `check` command.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckReport {
    pub input_dir: PathBuf,
    pub image_count: usize,
    pub encoder_version: String,
}

/// The configured seed, or a fresh one from the clock.
pub fn resolve_seed(config: &SlideshowConfig) -> u64 {
    match config.seed {
        Some(seed) => seed,
        None => {
            let seed = seed_from_clock();
            tracing::info!(seed, "No seed configured; pass --seed {seed} to reproduce this run");
            seed
        }
    }
}

/// Build the full render plan for `config` using `seed`.
///
/// Scans and orders the images, assigns durations, appends the loop, and
/// samples every clip's zoom. Randomness is drawn in that order from a single
/// generator, so the plan is a pure function of the input folder and seed.
pub fn build_plan(config: &SlideshowConfig, seed: u64) -> Result<Plan, PipelineError> {
    config.validate()?;
    let settings = config.clip_settings()?;

    let images = scan(&config.input_dir, &config.scan_options())?;
    let mut rng = XorShift64::from_seed(seed);
    let ordered = order_images(images, config.order_mode(), &mut rng);

    let durations = primary_durations(ordered.len(), config.timing_mode(), config.fps);
    let queue = build_queue(
        &ordered,
        DurationSource::PerImage(&durations),
        config.timing.loop_duration,
        config.fps,
    );

    let input_dir = std::path::absolute(&config.input_dir)?;
    let clip_dir = input_dir.join(CLIP_DIR_NAME);
    let clips = plan_clips(&queue, &clip_dir, &settings, &mut rng);
    let output = unique_output_path(
        &config.output_dir,
        &config.base_name,
        config.fps,
        &config.extension,
    );

    tracing::debug!(
        images = ordered.len(),
        clips = clips.len(),
        seed,
        "Built render plan"
    );

    Ok(Plan {
        seed,
        input_dir,
        clip_dir,
        output,
        fps: config.fps,
        resolution: config.resolution()?,
        image_count: ordered.len(),
        total_duration: queue.total_duration(),
        clips,
    })
}

/// Render the slideshow with ffmpeg.
pub fn run(
    config: &SlideshowConfig,
    events: Option<Sender<RenderEvent>>,
) -> Result<RunSummary, PipelineError> {
    let encoder = FfmpegEncoder::from_config(&config.encoder);
    run_with_encoder(&encoder, config, events)
}

/// Render the slideshow using a specific encoder (allows testing with mock).
pub fn run_with_encoder(
    encoder: &impl Encoder,
    config: &SlideshowConfig,
    events: Option<Sender<RenderEvent>>,
) -> Result<RunSummary, PipelineError> {
    create_default_input(&config.input_dir, uses_default_input(config))?;
    let seed = resolve_seed(config);
    let plan = build_plan(config, seed)?;

    emit(
        &events,
        RenderEvent::Planned {
            images: plan.image_count,
            clips: plan.clips.len(),
            total_duration: plan.total_duration,
            seed,
        },
    );

    prepare_workspace(&plan.clip_dir)?;
    let result = render_plan(encoder, config.encoder.on_clip_failure, &plan, &config.output_dir, &events);
    cleanup_workspace(&plan.clip_dir);
    result
}

/// Confirm the input folder has images and the encoder can be started.
pub fn check_with_encoder(
    encoder: &impl Encoder,
    config: &SlideshowConfig,
) -> Result<CheckReport, PipelineError> {
    config.validate()?;
    create_default_input(&config.input_dir, uses_default_input(config))?;
    let images = scan(&config.input_dir, &config.scan_options())?;
    let encoder_version = encoder.version()?;
    Ok(CheckReport {
        input_dir: config.input_dir.clone(),
        image_count: images.len(),
        encoder_version,
    })
}

/// [`check_with_encoder`] against the configured ffmpeg.
pub fn check(config: &SlideshowConfig) -> Result<CheckReport, PipelineError> {
    check_with_encoder(&FfmpegEncoder::from_config(&config.encoder), config)
}

fn render_plan(
    encoder: &impl Encoder,
    policy: ClipFailurePolicy,
    plan: &Plan,
    output_dir: &Path,
    events: &Option<Sender<RenderEvent>>,
) -> Result<RunSummary, PipelineError> {
    let total = plan.clips.len();
    let mut rendered = Vec::with_capacity(total);
    let mut failed_clips = Vec::new();

    for (i, clip) in plan.clips.iter().enumerate() {
        match encoder.render_clip(clip) {
            Ok(()) => rendered.push(clip.output.clone()),
            Err(e) if e.is_clip_failure() && policy == ClipFailurePolicy::Tolerate => {
                tracing::warn!(index = clip.index, source = %clip.source.display(), error = %e, "Skipping failed clip");
                emit(
                    events,
                    RenderEvent::ClipSkipped {
                        index: clip.index,
                        reason: e.to_string(),
                    },
                );
                failed_clips.push(clip.index);
            }
            Err(e) => return Err(e.into()),
        }

        let done = i + 1;
        if done % PROGRESS_INTERVAL == 0 || done == total {
            emit(events, RenderEvent::Progress { done, total });
        }
    }

    if rendered.is_empty() {
        return Err(PipelineError::NothingRendered {
            failed: failed_clips.len(),
        });
    }

    emit(
        events,
        RenderEvent::Stitching {
            clips: rendered.len(),
        },
    );
    let manifest = plan.clip_dir.join(MANIFEST_FILE_NAME);
    write_manifest(&manifest, &rendered)?;
    fs::create_dir_all(output_dir)?;
    if let Err(e) = encoder.concat(&manifest, &plan.output) {
        remove_partial_output(&plan.output);
        return Err(e.into());
    }

    tracing::info!(output = %plan.output.display(), clips = rendered.len(), "Slideshow written");
    emit(
        events,
        RenderEvent::Finished {
            output: plan.output.clone(),
        },
    );

    Ok(RunSummary {
        output: plan.output.clone(),
        seed: plan.seed,
        image_count: plan.image_count,
        clip_count: rendered.len(),
        failed_clips,
        total_duration: plan.total_duration,
    })
}

/// Create an empty clip workspace, clearing leftovers from an interrupted run.
fn prepare_workspace(clip_dir: &Path) -> std::io::Result<()> {
    if clip_dir.exists() {
        tracing::debug!(dir = %clip_dir.display(), "Removing stale clip workspace");
        fs::remove_dir_all(clip_dir)?;
    }
    fs::create_dir_all(clip_dir)
}

fn cleanup_workspace(clip_dir: &Path) {
    if let Err(e) = fs::remove_dir_all(clip_dir) {
        tracing::warn!(dir = %clip_dir.display(), error = %e, "Could not remove clip workspace");
    }
}

fn remove_partial_output(output: &Path) {
    match fs::remove_file(output) {
        Ok(()) => tracing::debug!(output = %output.display(), "Removed partial output"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => {
            tracing::warn!(output = %output.display(), error = %e, "Could not remove partial output")
        }
    }
}

/// Create the stock input folder on first use and stop so the user can fill it.
///
/// Only the default location is created; a missing custom `--input` is left
/// to the scan, which reports it as missing.
fn create_default_input(dir: &Path, is_default: bool) -> Result<(), PipelineError> {
    if !is_default || dir.exists() {
        return Ok(());
    }
    fs::create_dir_all(dir)?;
    tracing::info!(dir = %dir.display(), "Created input folder");
    Err(PipelineError::InputCreated(dir.to_path_buf()))
}

fn uses_default_input(config: &SlideshowConfig) -> bool {
    config.input_dir == SlideshowConfig::default().input_dir
}

fn emit(events: &Option<Sender<RenderEvent>>, event: RenderEvent) {
    if let Some(tx) = events {
        tx.send(event).ok();
    }
}
