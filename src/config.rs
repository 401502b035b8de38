//! Slideshow configuration.
//!
//! Handles loading, validating, and merging `flashback.toml`. Stock defaults
//! are overridden by the config file, and the file is overridden by
//! command-line flags. The resolved [`SlideshowConfig`] is an immutable value
//! handed to every stage; nothing reads configuration from global state.
//!
//! ## Config File Location
//!
//! `flashback.toml` in the working directory is picked up automatically.
//! `--config <path>` points at any other file (which then must exist).
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! input_dir = "./input_images"  # Folder scanned for photos (not recursive)
//! output_dir = "."              # Where the finished video is written
//! base_name = "memory_flashback"
//! fps = 30
//! resolution = "1920x1080"      # WIDTHxHEIGHT
//! extension = "mp4"             # Container for clips and final output
//! # seed = 1234                 # Fix shuffle + zoom randomness
//!
//! [order]
//! random = true                 # false = oldest photo first
//!
//! [timing]
//! crescendo = true              # false = every photo gets static_duration
//! crescendo_duration = 10.0     # Seconds for the accelerating pass
//! loop_duration = 5.0           # Seconds of one-frame-per-photo strobe after it
//! static_duration = 2.0
//!
//! [zoom]
//! enabled = true
//! min = 1.0
//! max = 1.5
//! frame_margin = 5              # Extra frames generated per zoomed clip
//!
//! [encoder]
//! program = "ffmpeg"
//! codec = "libx264"
//! pixel_format = "yuv420p"
//! on_clip_failure = "abort"     # or "tolerate"
//!
//! [scan]
//! extensions = ["jpg", "jpeg", "png", "tiff", "bmp"]
//! case_sensitive = true
//!
//! [logging]
//! level = "warn"
//! json = false
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse. Override just the values you want:
//!
//! ```toml
//! fps = 24
//! [zoom]
//! enabled = false
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::clip::{ClipSettings, Resolution, ResolutionError, ZoomRange, ZoomSettings};
use crate::scan::{OrderMode, ScanOptions};
use crate::timing::TimingMode;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default config file name looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "flashback.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),
    #[error(transparent)]
    InvalidResolution(#[from] ResolutionError),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Top-level configuration.
///
/// All fields have defaults matching the stock config. Unknown keys are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SlideshowConfig {
    /// Directory scanned for input images.
    pub input_dir: PathBuf,
    /// Directory the final video is written to.
    pub output_dir: PathBuf,
    /// Output file prefix, e.g. `memory_flashback` → `memory_flashback_30fps_1.mp4`.
    pub base_name: String,
    /// Target frames per second.
    pub fps: u32,
    /// Output resolution as `WIDTHxHEIGHT`.
    pub resolution: String,
    /// Container extension for clips and output.
    pub extension: String,
    /// Seed for shuffle and zoom sampling. Random per run when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub order: OrderConfig,
    pub timing: TimingConfig,
    pub zoom: ZoomConfig,
    pub encoder: EncoderConfig,
    pub scan: ScanConfig,
    pub logging: LoggingConfig,
}

impl Default for SlideshowConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("./input_images"),
            output_dir: PathBuf::from("."),
            base_name: "memory_flashback".to_string(),
            fps: 30,
            resolution: "1920x1080".to_string(),
            extension: "mp4".to_string(),
            seed: None,
            order: OrderConfig::default(),
            timing: TimingConfig::default(),
            zoom: ZoomConfig::default(),
            encoder: EncoderConfig::default(),
            scan: ScanConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Image ordering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OrderConfig {
    /// `true` shuffles; `false` sorts by modification time, oldest first.
    pub random: bool,
}

impl Default for OrderConfig {
    fn default() -> Self {
        Self { random: true }
    }
}

/// Timing of the primary pass and the strobe loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimingConfig {
    /// Accelerate through the photos instead of holding each one equally.
    pub crescendo: bool,
    /// Total seconds of the crescendo pass.
    pub crescendo_duration: f64,
    /// Seconds of one-frame-per-photo loop after the primary pass (0 = none).
    pub loop_duration: f64,
    /// Seconds per photo when `crescendo` is off.
    pub static_duration: f64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            crescendo: true,
            crescendo_duration: 10.0,
            loop_duration: 5.0,
            static_duration: 2.0,
        }
    }
}

/// Zoom/pan effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ZoomConfig {
    pub enabled: bool,
    /// Smallest magnification a clip may start or end at.
    pub min: f64,
    /// Largest magnification a clip may start or end at.
    pub max: f64,
    /// Frames generated past `ceil(duration * fps)` so the filter never runs dry.
    pub frame_margin: u32,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min: 1.0,
            max: 1.5,
            frame_margin: 5,
        }
    }
}

/// What to do when one clip fails to encode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClipFailurePolicy {
    /// Stop the batch at the first failed clip.
    #[default]
    Abort,
    /// Keep going; failures are counted and reported before stitching.
    Tolerate,
}

/// External encoder settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EncoderConfig {
    /// Executable name (looked up on PATH) or path.
    pub program: String,
    /// Video codec for clips.
    pub codec: String,
    /// Output pixel format.
    pub pixel_format: String,
    pub on_clip_failure: ClipFailurePolicy,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            program: "ffmpeg".to_string(),
            codec: "libx264".to_string(),
            pixel_format: "yuv420p".to_string(),
            on_clip_failure: ClipFailurePolicy::Abort,
        }
    }
}

/// Input discovery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScanConfig {
    /// Image extensions without the dot.
    pub extensions: Vec<String>,
    /// Match extensions exactly (`jpg` does not match `JPG`).
    pub case_sensitive: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extensions: ["jpg", "jpeg", "png", "tiff", "bmp"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            case_sensitive: true,
        }
    }
}

/// Diagnostic logging. `RUST_LOG` takes precedence over `level`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// `tracing` filter directive, e.g. `"warn"` or `"flashback=debug"`.
    pub level: String,
    /// Emit JSON lines instead of human-readable logs.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            json: false,
        }
    }
}

impl SlideshowConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let resolution = self.resolution()?;
        if self.fps == 0 {
            return Err(ConfigError::Validation("fps must be positive".into()));
        }
        if self.encoder.pixel_format == "yuv420p"
            && (resolution.width % 2 != 0 || resolution.height % 2 != 0)
        {
            return Err(ConfigError::Validation(format!(
                "resolution {resolution} must have even width and height for yuv420p output"
            )));
        }
        if self.base_name.trim().is_empty() {
            return Err(ConfigError::Validation("base_name must not be empty".into()));
        }
        if self.extension.trim().is_empty() || self.extension.starts_with('.') {
            return Err(ConfigError::Validation(
                "extension must be a bare extension like \"mp4\"".into(),
            ));
        }

        let timing = &self.timing;
        check_seconds("timing.loop_duration", timing.loop_duration, true)?;
        check_frames("timing.loop_duration", timing.loop_duration, self.fps)?;
        if timing.crescendo {
            check_seconds("timing.crescendo_duration", timing.crescendo_duration, false)?;
            check_frames("timing.crescendo_duration", timing.crescendo_duration, self.fps)?;
        } else {
            check_seconds("timing.static_duration", timing.static_duration, false)?;
            check_frames("timing.static_duration", timing.static_duration, self.fps)?;
        }

        let zoom = &self.zoom;
        if zoom.enabled {
            if !(zoom.min.is_finite() && zoom.max.is_finite()) || zoom.min <= 0.0 {
                return Err(ConfigError::Validation(
                    "zoom.min and zoom.max must be positive numbers".into(),
                ));
            }
            if zoom.min > zoom.max {
                return Err(ConfigError::Validation(
                    "zoom.min must not exceed zoom.max".into(),
                ));
            }
        }

        if self.scan.extensions.is_empty() {
            return Err(ConfigError::Validation(
                "scan.extensions must not be empty".into(),
            ));
        }
        if self.encoder.program.trim().is_empty() {
            return Err(ConfigError::Validation(
                "encoder.program must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Parsed output resolution.
    pub fn resolution(&self) -> Result<Resolution, ConfigError> {
        Ok(self.resolution.parse()?)
    }

    pub fn order_mode(&self) -> OrderMode {
        if self.order.random {
            OrderMode::Random
        } else {
            OrderMode::Chronological
        }
    }

    pub fn timing_mode(&self) -> TimingMode {
        if self.timing.crescendo {
            TimingMode::Crescendo {
                total: self.timing.crescendo_duration,
            }
        } else {
            TimingMode::Static {
                duration: self.timing.static_duration,
            }
        }
    }

    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            extensions: self.scan.extensions.clone(),
            case_sensitive: self.scan.case_sensitive,
        }
    }

    /// Settings for the clip planner.
    pub fn clip_settings(&self) -> Result<ClipSettings, ConfigError> {
        let zoom = self.zoom.enabled.then_some(ZoomSettings {
            range: ZoomRange {
                min: self.zoom.min,
                max: self.zoom.max,
            },
            frame_margin: self.zoom.frame_margin,
        });
        Ok(ClipSettings::new(
            self.resolution()?,
            self.fps,
            zoom,
            &self.extension,
        ))
    }
}

fn check_seconds(key: &str, value: f64, allow_zero: bool) -> Result<(), ConfigError> {
    let ok = value.is_finite() && (value > 0.0 || (allow_zero && value == 0.0));
    if ok {
        Ok(())
    } else if allow_zero {
        Err(ConfigError::Validation(format!(
            "{key} must be zero or a positive number of seconds"
        )))
    } else {
        Err(ConfigError::Validation(format!(
            "{key} must be a positive number of seconds"
        )))
    }
}

/// Durations are capped so that `seconds * fps` stays at or below this many frames.
pub const MAX_FRAMES: u64 = 1_000_000;

fn check_frames(key: &str, seconds: f64, fps: u32) -> Result<(), ConfigError> {
    if seconds * fps as f64 > MAX_FRAMES as f64 {
        return Err(ConfigError::Validation(format!(
            "{key} of {seconds} s at {fps} fps exceeds the limit of {MAX_FRAMES} frames"
        )));
    }
    Ok(())
}

// =============================================================================
// Command-line overrides
// =============================================================================

/// Values given on the command line; `None` leaves the file/default value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    pub input_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub base_name: Option<String>,
    pub fps: Option<u32>,
    pub resolution: Option<String>,
    pub encoder_program: Option<String>,
    pub seed: Option<u64>,
    pub random: Option<bool>,
    pub zoom: Option<bool>,
    pub crescendo: Option<bool>,
    pub log_level: Option<String>,
}

impl Overrides {
    /// Apply overrides on top of `config`.
    pub fn apply(self, config: &mut SlideshowConfig) {
        if let Some(v) = self.input_dir {
            config.input_dir = v;
        }
        if let Some(v) = self.output_dir {
            config.output_dir = v;
        }
        if let Some(v) = self.base_name {
            config.base_name = v;
        }
        if let Some(v) = self.fps {
            config.fps = v;
        }
        if let Some(v) = self.resolution {
            config.resolution = v;
        }
        if let Some(v) = self.encoder_program {
            config.encoder.program = v;
        }
        if let Some(v) = self.seed {
            config.seed = Some(v);
        }
        if let Some(v) = self.random {
            config.order.random = v;
        }
        if let Some(v) = self.zoom {
            config.zoom.enabled = v;
        }
        if let Some(v) = self.crescendo {
            config.timing.crescendo = v;
        }
        if let Some(v) = self.log_level {
            config.logging.level = v;
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SlideshowConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Merge an optional overlay onto the stock defaults, apply command-line
/// overrides, then deserialize and validate once.
pub fn resolve_config(
    overlay: Option<toml::Value>,
    overrides: Overrides,
) -> Result<SlideshowConfig, ConfigError> {
    let base = stock_defaults_value();
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let mut config: SlideshowConfig = merged.try_into()?;
    overrides.apply(&mut config);
    config.validate()?;
    Ok(config)
}

/// Load an explicit config file. The file must exist.
pub fn load_config_file(path: &Path, overrides: Overrides) -> Result<SlideshowConfig, ConfigError> {
    if !path.is_file() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    resolve_config(Some(value), overrides)
}

/// Load `flashback.toml` from `dir`, falling back to stock defaults when absent.
pub fn load_config(dir: &Path, overrides: Overrides) -> Result<SlideshowConfig, ConfigError> {
    let path = dir.join(CONFIG_FILE_NAME);
    if path.is_file() {
        load_config_file(&path, overrides)
    } else {
        resolve_config(None, overrides)
    }
}

/// Returns a fully-commented stock `flashback.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# flashback configuration
# =======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Command-line flags override this file.
# Unknown keys will cause an error.

# Folder scanned for photos. Subfolders are ignored.
input_dir = "./input_images"

# Where the finished video is written. Existing videos are never overwritten:
# the name gets the next free number, e.g. memory_flashback_30fps_2.mp4.
output_dir = "."
base_name = "memory_flashback"

# Frames per second of the output. One frame (1/fps s) is the shortest
# time any photo can be shown.
fps = 30

# Output size as WIDTHxHEIGHT. Photos are scaled to cover it and
# center-cropped, so there are never black bars.
# 1920x1080 = Full HD, 1280x720 = HD, 1080x1920 = vertical (Reels/TikTok).
resolution = "1920x1080"

# Container for the temporary clips and the final video.
extension = "mp4"

# Fix the random shuffle and zoom choices so a run can be reproduced.
# seed = 1234

# ---------------------------------------------------------------------------
# Ordering
# ---------------------------------------------------------------------------
[order]
# true = shuffle the photos, false = oldest (by file modification time) first.
random = true

# ---------------------------------------------------------------------------
# Timing
# ---------------------------------------------------------------------------
[timing]
# true = accelerate: the first photo is shown longest and each one after it
# a little shorter, ending at a single frame.
# false = every photo is shown for static_duration.
crescendo = true

# Seconds the whole crescendo pass lasts. With too many photos for this time,
# every photo falls back to a single frame.
crescendo_duration = 10.0

# Seconds of high-speed loop after the first pass: one frame per photo,
# cycling through them in the same order. 0 disables the loop.
loop_duration = 5.0

# Seconds per photo when crescendo = false.
static_duration = 2.0

# ---------------------------------------------------------------------------
# Zoom / pan
# ---------------------------------------------------------------------------
[zoom]
# Slow random zoom and pan on every clip. Disable for faster renders.
enabled = true

# Each clip starts and ends at a random magnification in [min, max].
min = 1.0
max = 1.5

# Extra frames generated per zoomed clip so the filter never runs out
# before the clip's duration is reached.
frame_margin = 5

# ---------------------------------------------------------------------------
# Encoder
# ---------------------------------------------------------------------------
[encoder]
# ffmpeg executable: a name on PATH or a full path (e.g. "./ffmpeg.exe").
program = "ffmpeg"
codec = "libx264"
pixel_format = "yuv420p"

# "abort" stops at the first clip ffmpeg fails to encode.
# "tolerate" keeps going and reports the failed clips before stitching.
on_clip_failure = "abort"

# ---------------------------------------------------------------------------
# Input discovery
# ---------------------------------------------------------------------------
[scan]
extensions = ["jpg", "jpeg", "png", "tiff", "bmp"]
# true = "jpg" does not match "IMG.JPG".
case_sensitive = true

# ---------------------------------------------------------------------------
# Logging (RUST_LOG overrides level)
# ---------------------------------------------------------------------------
[logging]
level = "warn"
json = false
"##
}
