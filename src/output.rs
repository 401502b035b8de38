//! CLI output formatting.
//!
//! Every report has a pure `format_*` function returning lines, and a
//! `print_*` wrapper that writes them to stdout. Tests exercise the format
//! functions directly. Diagnostics go through `tracing` to stderr; this
//! module only produces what the user asked to see.
//!
//! # Output Format
//!
//! ## Render progress
//!
//! ```text
//! Rendering 4 photos as 154 clips (15.0s, seed 42)
//! Rendering... 6.5% (10/154)
//! ...
//! Rendering... 100.0% (154/154)
//! Stitching 154 clips
//! Done: ./memory_flashback_30fps_1.mp4
//! ```
//!
//! ## Plan
//!
//! ```text
//! Plan (seed 42)
//!     Input: /home/me/input_images (4 photos)
//!     Output: ./memory_flashback_30fps_1.mp4
//!     Format: 1920x1080 @ 30fps
//!     Length: 15.0s in 154 clips
//!
//! Primary
//! 001 IMG_0003.jpg 4.950s zoom 1.12→1.40
//! 002 IMG_0001.jpg 3.317s zoom 1.33→1.05
//! ...
//!
//! Loop
//!     150 one-frame clips cycling the 4 photos
//! ```

use crate::clip::ClipParams;
use crate::pipeline::{CheckReport, Plan, RenderEvent, RunSummary};

/// Format a 1-based positional index as zero-padded 3-digit string.
fn format_index(pos: usize) -> String {
    format!("{:03}", pos)
}

fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn file_name(clip: &ClipParams) -> String {
    clip.source
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| clip.source.display().to_string())
}

fn clip_line(clip: &ClipParams) -> String {
    let mut line = format!(
        "{} {} {:.3}s",
        format_index(clip.index + 1),
        file_name(clip),
        clip.duration
    );
    if let Some(motion) = clip.zoom {
        line.push_str(&format!(
            " zoom {:.2}→{:.2}",
            motion.path.start_scale, motion.path.end_scale
        ));
    }
    line
}

/// Percentage of `done` over `total`, 100 when there is nothing to do.
fn percent(done: usize, total: usize) -> f64 {
    if total == 0 {
        return 100.0;
    }
    done as f64 / total as f64 * 100.0
}

// ============================================================================
// Render
// ============================================================================

pub fn format_event(event: &RenderEvent) -> Vec<String> {
    match event {
        RenderEvent::Planned {
            images,
            clips,
            total_duration,
            seed,
        } => vec![format!(
            "Rendering {images} photos as {clips} clips ({total_duration:.1}s, seed {seed})"
        )],
        RenderEvent::Progress { done, total } => vec![format!(
            "Rendering... {:.1}% ({done}/{total})",
            percent(*done, *total)
        )],
        RenderEvent::ClipSkipped { index, reason } => {
            vec![format!("{}Skipped clip {}: {reason}", indent(1), format_index(index + 1))]
        }
        RenderEvent::Stitching { clips } => vec![format!("Stitching {clips} clips")],
        RenderEvent::Finished { output } => vec![format!("Done: {}", output.display())],
    }
}

pub fn format_summary(summary: &RunSummary) -> Vec<String> {
    let mut lines = vec![
        format!("Video: {}", summary.output.display()),
        format!(
            "{}{} photos, {} clips, {:.1}s",
            indent(1),
            summary.image_count,
            summary.clip_count,
            summary.total_duration
        ),
        format!("{}Seed: {}", indent(1), summary.seed),
    ];
    if !summary.failed_clips.is_empty() {
        let failed: Vec<String> = summary
            .failed_clips
            .iter()
            .map(|i| format_index(i + 1))
            .collect();
        lines.push(format!(
            "{}Skipped {} failed clips: {}",
            indent(1),
            failed.len(),
            failed.join(", ")
        ));
    }
    lines
}

pub fn print_summary(summary: &RunSummary) {
    for line in format_summary(summary) {
        println!("{}", line);
    }
}

// ============================================================================
// Plan
// ============================================================================

pub fn format_plan(plan: &Plan) -> Vec<String> {
    let mut lines = vec![
        format!("Plan (seed {})", plan.seed),
        format!(
            "{}Input: {} ({} photos)",
            indent(1),
            plan.input_dir.display(),
            plan.image_count
        ),
        format!("{}Output: {}", indent(1), plan.output.display()),
        format!("{}Format: {} @ {}fps", indent(1), plan.resolution, plan.fps),
        format!(
            "{}Length: {:.1}s in {} clips",
            indent(1),
            plan.total_duration,
            plan.clips.len()
        ),
        String::new(),
        "Primary".to_string(),
    ];
    lines.extend(plan.primary_clips().iter().map(clip_line));

    let loop_clips = plan.loop_clips();
    if !loop_clips.is_empty() {
        lines.push(String::new());
        lines.push("Loop".to_string());
        lines.push(format!(
            "{}{} one-frame clips cycling the {} photos",
            indent(1),
            loop_clips.len(),
            plan.image_count
        ));
    }
    lines
}

pub fn print_plan(plan: &Plan) {
    for line in format_plan(plan) {
        println!("{}", line);
    }
}

// ============================================================================
// Check
// ============================================================================

pub fn format_check(report: &CheckReport) -> Vec<String> {
    vec![
        format!(
            "Input: {} ({} photos)",
            report.input_dir.display(),
            report.image_count
        ),
        format!("Encoder: {}", report.encoder_version),
        "Ready to render".to_string(),
    ]
}

pub fn print_check(report: &CheckReport) {
    for line in format_check(report) {
        println!("{}", line);
    }
}
