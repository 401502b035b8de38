//! ffmpeg-backed [`Encoder`].
//!
//! Each clip is one `ffmpeg` process that loops a still image through the
//! crop (and optional zoompan) filter chain:
//!
//! ```text
//! ffmpeg -hide_banner -loglevel error -y -loop 1 -i <image> -vf <filter>
//!        -c:v libx264 -t <seconds> -pix_fmt yuv420p -r <fps> <clip>
//! ```
//!
//! Clips are then stitched with the concat demuxer and stream copy, so the
//! final step never re-encodes:
//!
//! ```text
//! ffmpeg -hide_banner -loglevel error -y -f concat -safe 0 -i concat_list.txt -c copy <output>
//! ```
//!
//! The argument builders are pure functions so they can be tested without
//! an ffmpeg install.

use super::backend::{EncodeError, Encoder};
use crate::clip::ClipParams;
use crate::config::EncoderConfig;
use std::io::ErrorKind;
use std::path::Path;
use std::process::{Command, Output, Stdio};

/// Longest stderr excerpt kept in an error.
const STDERR_TAIL_CHARS: usize = 500;

/// Encoder that shells out to an external `ffmpeg` binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FfmpegEncoder {
    program: String,
    codec: String,
    pixel_format: String,
}

impl FfmpegEncoder {
    pub fn new(program: &str, codec: &str, pixel_format: &str) -> Self {
        Self {
            program: program.to_string(),
            codec: codec.to_string(),
            pixel_format: pixel_format.to_string(),
        }
    }

    pub fn from_config(config: &EncoderConfig) -> Self {
        Self::new(&config.program, &config.codec, &config.pixel_format)
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn run(&self, args: &[String]) -> Result<Output, EncodeError> {
        tracing::trace!(program = %self.program, args = %args.join(" "), "Running encoder");
        Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|error| {
                if error.kind() == ErrorKind::NotFound {
                    EncodeError::EncoderNotFound {
                        program: self.program.clone(),
                    }
                } else {
                    EncodeError::Io(error)
                }
            })
    }
}

impl Encoder for FfmpegEncoder {
    fn version(&self) -> Result<String, EncodeError> {
        let output = self.run(&["-version".to_string()])?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(stdout.lines().next().unwrap_or_default().trim().to_string())
    }

    fn render_clip(&self, clip: &ClipParams) -> Result<(), EncodeError> {
        let args = clip_args(clip, &self.codec, &self.pixel_format);
        let output = self.run(&args)?;
        if output.status.success() {
            return Ok(());
        }
        Err(EncodeError::ClipFailed {
            index: clip.index,
            status: output.status.to_string(),
            stderr: stderr_tail(&output.stderr),
        })
    }

    fn concat(&self, manifest: &Path, output_path: &Path) -> Result<(), EncodeError> {
        let output = self.run(&concat_args(manifest, output_path))?;
        if output.status.success() {
            return Ok(());
        }
        Err(EncodeError::ConcatFailed {
            status: output.status.to_string(),
            stderr: stderr_tail(&output.stderr),
        })
    }
}

fn quiet_args() -> Vec<String> {
    ["-hide_banner", "-loglevel", "error", "-y"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Arguments that render one clip.
pub fn clip_args(clip: &ClipParams, codec: &str, pixel_format: &str) -> Vec<String> {
    let mut args = quiet_args();
    args.extend([
        "-loop".to_string(),
        "1".to_string(),
        "-i".to_string(),
        clip.source.to_string_lossy().into_owned(),
        "-vf".to_string(),
        clip.filter_expression(),
        "-c:v".to_string(),
        codec.to_string(),
        "-t".to_string(),
        format!("{:.5}", clip.duration),
        "-pix_fmt".to_string(),
        pixel_format.to_string(),
        "-r".to_string(),
        clip.fps.to_string(),
        clip.output.to_string_lossy().into_owned(),
    ]);
    args
}

/// Arguments that stitch the clips in `manifest` into `output`.
pub fn concat_args(manifest: &Path, output: &Path) -> Vec<String> {
    let mut args = quiet_args();
    args.extend([
        "-f".to_string(),
        "concat".to_string(),
        "-safe".to_string(),
        "0".to_string(),
        "-i".to_string(),
        manifest.to_string_lossy().into_owned(),
        "-c".to_string(),
        "copy".to_string(),
        output.to_string_lossy().into_owned(),
    ]);
    args
}

fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let chars: Vec<char> = text.chars().collect();
    let start = chars.len().saturating_sub(STDERR_TAIL_CHARS);
    chars[start..].iter().collect::<String>().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clip::{CropSpec, Resolution};
    use std::path::PathBuf;

    fn clip() -> ClipParams {
        ClipParams {
            index: 7,
            source: "/in/a.jpg".into(),
            output: "/in/temp_clips/clip_00007.mp4".into(),
            duration: 1.0 / 3.0,
            fps: 30,
            crop: CropSpec::for_resolution(Resolution {
                width: 1280,
                height: 720,
            }),
            geometry: None,
            zoom: None,
        }
    }

    fn value_after<'a>(args: &'a [String], flag: &str) -> &'a str {
        let pos = args.iter().position(|a| a == flag).unwrap();
        &args[pos + 1]
    }

    #[test]
    fn clip_args_loop_still_image() {
        let args = clip_args(&clip(), "libx264", "yuv420p");
        assert_eq!(value_after(&args, "-loop"), "1");
        assert_eq!(value_after(&args, "-i"), "/in/a.jpg");
        assert_eq!(value_after(&args, "-c:v"), "libx264");
        assert_eq!(value_after(&args, "-pix_fmt"), "yuv420p");
        assert_eq!(value_after(&args, "-r"), "30");
        assert!(args.contains(&"-y".to_string()));
        assert_eq!(args.last().unwrap(), "/in/temp_clips/clip_00007.mp4");
    }

    #[test]
    fn clip_duration_has_five_decimals() {
        let args = clip_args(&clip(), "libx264", "yuv420p");
        assert_eq!(value_after(&args, "-t"), "0.33333");
    }

    #[test]
    fn clip_args_carry_filter_expression() {
        let c = clip();
        let args = clip_args(&c, "libx264", "yuv420p");
        assert_eq!(value_after(&args, "-vf"), c.filter_expression());
    }

    #[test]
    fn clip_args_input_precedes_output_options() {
        let args = clip_args(&clip(), "libx264", "yuv420p");
        let input = args.iter().position(|a| a == "-i").unwrap();
        let codec = args.iter().position(|a| a == "-c:v").unwrap();
        assert!(input < codec);
    }

    #[test]
    fn concat_args_stream_copy() {
        let args = concat_args(Path::new("/w/concat_list.txt"), Path::new("/out/v_30fps_1.mp4"));
        assert_eq!(value_after(&args, "-f"), "concat");
        assert_eq!(value_after(&args, "-safe"), "0");
        assert_eq!(value_after(&args, "-i"), "/w/concat_list.txt");
        assert_eq!(value_after(&args, "-c"), "copy");
        assert_eq!(args.last().unwrap(), "/out/v_30fps_1.mp4");
    }

    #[test]
    fn stderr_tail_keeps_end() {
        let long = "x".repeat(1000) + "the actual error";
        let tail = stderr_tail(long.as_bytes());
        assert_eq!(tail.chars().count(), STDERR_TAIL_CHARS);
        assert!(tail.ends_with("the actual error"));
    }

    #[test]
    fn stderr_tail_trims_whitespace() {
        assert_eq!(stderr_tail(b"  boom\n"), "boom");
    }

    #[test]
    fn missing_program_maps_to_not_found() {
        let encoder = FfmpegEncoder::new(
            "/definitely/not/a/real/ffmpeg-binary",
            "libx264",
            "yuv420p",
        );
        let err = encoder.version().unwrap_err();
        assert!(matches!(
            err,
            EncodeError::EncoderNotFound { ref program } if program == "/definitely/not/a/real/ffmpeg-binary"
        ));

        let err = encoder
            .concat(Path::new("/tmp/list.txt"), &PathBuf::from("/tmp/out.mp4"))
            .unwrap_err();
        assert!(matches!(err, EncodeError::EncoderNotFound { .. }));
    }

    #[test]
    fn from_config_uses_encoder_section() {
        let encoder = FfmpegEncoder::from_config(&EncoderConfig {
            program: "./ffmpeg.exe".into(),
            ..EncoderConfig::default()
        });
        assert_eq!(encoder.program(), "./ffmpeg.exe");
    }
}
