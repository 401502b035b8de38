//! Render queue construction.
//!
//! A queue is the final video's timeline: one [`RenderJob`] per output clip,
//! in playback order. It has two phases laid end to end:
//!
//! ```text
//! [ primary: one job per image, caller's order ][ loop: one-frame jobs cycling the images ]
//! ```
//!
//! The primary pass takes its durations from the timing module (crescendo)
//! or a single constant (static). The loop pass is appended whenever
//! `loop_duration > 0`, regardless of timing mode, and walks the original
//! image order cyclically: loop job `k` shows `images[k % len]`.
//!
//! The builder never reorders; ordering happens upstream in [`crate::scan`].
//! The boundary between the phases is not stored, it is simply the number of
//! source images.

use crate::scan::ImageRef;
use crate::timing::{loop_frame_count, min_frame_duration};
use serde::Serialize;

/// One output clip: an image shown for `duration` seconds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderJob {
    pub image: ImageRef,
    pub duration: f64,
}

/// Where primary-pass durations come from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DurationSource<'a> {
    /// One duration per image, same order as the images.
    PerImage(&'a [f64]),
    /// Same duration for every image.
    Constant(f64),
}

/// Ordered render jobs. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RenderQueue {
    jobs: Vec<RenderJob>,
}

impl RenderQueue {
    pub fn jobs(&self) -> &[RenderJob] {
        &self.jobs
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Sum of all job durations in seconds.
    pub fn total_duration(&self) -> f64 {
        self.jobs.iter().map(|j| j.duration).sum()
    }
}

/// Build the queue: primary pass, then the loop pass.
///
/// With [`DurationSource::PerImage`] the list must have one entry per image;
/// extra durations are ignored and missing ones cut the primary pass short.
pub fn build_queue(
    images: &[ImageRef],
    durations: DurationSource<'_>,
    loop_duration: f64,
    fps: u32,
) -> RenderQueue {
    debug_assert!(
        !matches!(durations, DurationSource::PerImage(d) if d.len() != images.len()),
        "one duration per image"
    );

    let loop_jobs = if images.is_empty() {
        0
    } else {
        loop_frame_count(loop_duration, fps)
    };
    let mut jobs = Vec::with_capacity(images.len().saturating_add(loop_jobs));

    match durations {
        DurationSource::PerImage(per_image) => {
            jobs.extend(images.iter().zip(per_image).map(|(image, &duration)| RenderJob {
                image: image.clone(),
                duration,
            }));
        }
        DurationSource::Constant(duration) => {
            jobs.extend(images.iter().map(|image| RenderJob {
                image: image.clone(),
                duration,
            }));
        }
    }

    let frame = min_frame_duration(fps);
    jobs.extend(
        images
            .iter()
            .cycle()
            .take(loop_jobs)
            .map(|image| RenderJob {
                image: image.clone(),
                duration: frame,
            }),
    );

    RenderQueue { jobs }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timing::compute_crescendo_durations;
    use std::path::PathBuf;
    use std::time::SystemTime;

    fn images(names: &[&str]) -> Vec<ImageRef> {
        names
            .iter()
            .map(|n| ImageRef {
                path: PathBuf::from(format!("/photos/{n}")),
                modified: SystemTime::UNIX_EPOCH,
                dimensions: None,
            })
            .collect()
    }

    fn names(queue: &RenderQueue) -> Vec<String> {
        queue
            .jobs()
            .iter()
            .map(|j| j.image.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn primary_pass_preserves_caller_order() {
        let imgs = images(&["c.jpg", "a.jpg", "b.jpg"]);
        let q = build_queue(&imgs, DurationSource::Constant(2.0), 0.0, 30);
        assert_eq!(names(&q), vec!["c.jpg", "a.jpg", "b.jpg"]);
        assert!(q.jobs().iter().all(|j| j.duration == 2.0));
    }

    #[test]
    fn per_image_durations_are_applied_in_order() {
        let imgs = images(&["1.jpg", "2.jpg", "3.jpg", "4.jpg"]);
        let durations = compute_crescendo_durations(4, 2.0, 10);
        let q = build_queue(&imgs, DurationSource::PerImage(&durations), 0.0, 10);
        assert_eq!(q.len(), 4);
        for (job, d) in q.jobs().iter().zip(&durations) {
            assert_eq!(job.duration, *d);
        }
        assert!((q.total_duration() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn loop_pass_appends_one_frame_jobs() {
        let imgs = images(&["a.jpg", "b.jpg", "c.jpg", "d.jpg"]);
        let q = build_queue(&imgs, DurationSource::Constant(1.0), 1.0, 10);
        assert_eq!(q.len(), 4 + 10);
        assert!(q.jobs()[4..].iter().all(|j| j.duration == 0.1));
    }

    #[test]
    fn loop_pass_cycles_original_order() {
        let imgs = images(&["x.jpg", "y.jpg", "z.jpg"]);
        let q = build_queue(&imgs, DurationSource::Constant(1.0), 0.7, 10);
        let loop_names: Vec<String> = names(&q)[3..].to_vec();
        assert_eq!(
            loop_names,
            vec!["x.jpg", "y.jpg", "z.jpg", "x.jpg", "y.jpg", "z.jpg", "x.jpg"]
        );
        for (k, job) in q.jobs()[3..].iter().enumerate() {
            assert_eq!(job.image, imgs[k % imgs.len()]);
        }
    }

    #[test]
    fn loop_pass_independent_of_timing_mode() {
        let imgs = images(&["a.jpg", "b.jpg"]);
        let durations = [0.5, 0.25];
        let crescendo = build_queue(&imgs, DurationSource::PerImage(&durations), 0.5, 20);
        let constant = build_queue(&imgs, DurationSource::Constant(3.0), 0.5, 20);
        assert_eq!(crescendo.jobs()[2..], constant.jobs()[2..]);
        assert_eq!(crescendo.len(), 2 + 10);
    }

    #[test]
    fn length_is_images_plus_floor_of_loop_frames() {
        let imgs = images(&["a.jpg", "b.jpg", "c.jpg"]);
        let q = build_queue(&imgs, DurationSource::Constant(1.0), 2.55, 10);
        assert_eq!(q.len(), 3 + 25);
    }

    #[test]
    fn no_loop_when_duration_is_zero() {
        let imgs = images(&["a.jpg"]);
        let q = build_queue(&imgs, DurationSource::Constant(1.0), 0.0, 30);
        assert_eq!(q.len(), 1);
    }

    #[test]
    fn empty_images_yield_empty_queue() {
        let q = build_queue(&[], DurationSource::Constant(1.0), 5.0, 30);
        assert!(q.is_empty());
    }

    #[test]
    fn queue_serializes_as_job_list() {
        let imgs = images(&["a.jpg"]);
        let q = build_queue(&imgs, DurationSource::Constant(1.5), 0.0, 30);
        let json = serde_json::to_value(&q).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["duration"], 1.5);
    }
}
