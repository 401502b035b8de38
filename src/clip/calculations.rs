//! Pure geometry and frame math for clip rendering.
//!
//! All functions here are pure and testable without any I/O or images.

/// Slack so that `0.3 * 10` style products do not round up to an extra frame.
const FRAME_EPSILON: f64 = 1e-9;

/// Calculate dimensions needed to fill a target area (resize before crop).
///
/// Returns dimensions that completely cover the target area while maintaining
/// the source aspect ratio. One dimension matches exactly, the other may exceed.
///
/// # Arguments
/// * `source` - Original image dimensions (width, height)
/// * `target` - Target area dimensions (width, height)
///
/// # Returns
/// * `(width, height)` - Fill dimensions, each at least the target's
pub fn calculate_fill_dimensions(source: (u32, u32), target: (u32, u32)) -> (u32, u32) {
    let (src_w, src_h) = source;
    let (tgt_w, tgt_h) = target;

    let src_aspect = src_w as f64 / src_h as f64;
    let tgt_aspect = tgt_w as f64 / tgt_h as f64;

    if src_aspect > tgt_aspect {
        // Source is wider: height matches, width overflows
        let h = tgt_h;
        let w = ((h as f64 * src_aspect).round() as u32).max(tgt_w);
        (w, h)
    } else {
        // Source is taller (or same shape): width matches, height overflows
        let w = tgt_w;
        let h = ((w as f64 / src_aspect).round() as u32).max(tgt_h);
        (w, h)
    }
}

/// Offset that centers a `target`-sized window inside `scaled`.
pub fn center_offset(scaled: u32, target: u32) -> u32 {
    scaled.saturating_sub(target) / 2
}

/// Frames the zoom filter must generate for a clip of `duration` seconds.
///
/// `ceil(duration * fps)` plus `margin` extra frames so the filter never runs
/// dry before the encoder reaches the requested duration.
pub fn frame_count(duration: f64, fps: u32, margin: u32) -> u32 {
    let exact = duration * fps as f64;
    let frames = (exact - FRAME_EPSILON).ceil().max(1.0) as u32;
    frames + margin
}

/// Linear zoom interpolation at fraction `t` of the clip (clamped to `[0, 1]`).
pub fn interpolate_scale(start: f64, end: f64, t: f64) -> f64 {
    start + (end - start) * t.clamp(0.0, 1.0)
}

/// Top-left offset of the zoomed viewport along one axis.
///
/// At zoom `z` the viewport covers `extent / z`; the remaining margin is
/// `extent - extent / z`, and `anchor ∈ [0, 1]` picks a point along it.
pub fn pan_offset(extent: f64, zoom: f64, anchor: f64) -> f64 {
    if zoom <= 0.0 {
        return 0.0;
    }
    (extent - extent / zoom) * anchor.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // calculate_fill_dimensions
    // =========================================================================

    #[test]
    fn fill_wider_source_to_landscape_target() {
        // 4000x2000 (2:1) → 1920x1080: height matches, width = 1080 * 2 = 2160
        assert_eq!(
            calculate_fill_dimensions((4000, 2000), (1920, 1080)),
            (2160, 1080)
        );
    }

    #[test]
    fn fill_portrait_source_to_landscape_target() {
        // 3000x4000 (3:4) → 1920x1080: width matches, height = 1920 * 4/3 = 2560
        assert_eq!(
            calculate_fill_dimensions((3000, 4000), (1920, 1080)),
            (1920, 2560)
        );
    }

    #[test]
    fn fill_landscape_source_to_portrait_target() {
        // 1600x900 (16:9) → 1080x1920: height matches, width = 1920 * 16/9 = 3413
        assert_eq!(
            calculate_fill_dimensions((1600, 900), (1080, 1920)),
            (3413, 1920)
        );
    }

    #[test]
    fn fill_same_aspect_ratio() {
        assert_eq!(
            calculate_fill_dimensions((3840, 2160), (1920, 1080)),
            (1920, 1080)
        );
    }

    #[test]
    fn fill_small_source_upscales() {
        // 100x100 → 640x360: wider target, width matches
        assert_eq!(calculate_fill_dimensions((100, 100), (640, 360)), (640, 640));
    }

    #[test]
    fn fill_always_covers_target() {
        for &src in &[(1, 1000), (1000, 1), (333, 777), (1921, 1079), (7, 5)] {
            let (w, h) = calculate_fill_dimensions(src, (1920, 1080));
            assert!(w >= 1920 && h >= 1080, "{src:?} → {w}x{h}");
        }
    }

    // =========================================================================
    // center_offset
    // =========================================================================

    #[test]
    fn center_offset_splits_overflow() {
        assert_eq!(center_offset(2160, 1920), 120);
        assert_eq!(center_offset(1080, 1080), 0);
        assert_eq!(center_offset(1081, 1080), 0);
    }

    #[test]
    fn center_offset_never_underflows() {
        assert_eq!(center_offset(100, 200), 0);
    }

    // =========================================================================
    // frame_count
    // =========================================================================

    #[test]
    fn frame_count_rounds_up_and_adds_margin() {
        assert_eq!(frame_count(0.9, 10, 5), 14);
        assert_eq!(frame_count(0.95, 10, 5), 15);
        assert_eq!(frame_count(2.0, 30, 0), 60);
    }

    #[test]
    fn frame_count_absorbs_float_noise() {
        // 0.3 * 10 = 3.0000000000000004
        assert_eq!(frame_count(0.3, 10, 0), 3);
    }

    #[test]
    fn frame_count_has_at_least_one_frame() {
        assert_eq!(frame_count(0.0, 30, 0), 1);
    }

    // =========================================================================
    // interpolate_scale / pan_offset
    // =========================================================================

    #[test]
    fn interpolate_scale_endpoints_and_midpoint() {
        assert_eq!(interpolate_scale(1.0, 1.5, 0.0), 1.0);
        assert_eq!(interpolate_scale(1.0, 1.5, 1.0), 1.5);
        assert_eq!(interpolate_scale(1.0, 1.5, 0.5), 1.25);
        assert!((interpolate_scale(1.4, 1.2, 0.5) - 1.3).abs() < 1e-12);
    }

    #[test]
    fn interpolate_scale_clamps_fraction() {
        assert_eq!(interpolate_scale(1.0, 1.5, 2.0), 1.5);
        assert_eq!(interpolate_scale(1.0, 1.5, -1.0), 1.0);
    }

    #[test]
    fn pan_offset_spans_margin() {
        // 1920 at zoom 2 → viewport 960, margin 960
        assert_eq!(pan_offset(1920.0, 2.0, 0.0), 0.0);
        assert_eq!(pan_offset(1920.0, 2.0, 1.0), 960.0);
        assert_eq!(pan_offset(1920.0, 2.0, 0.5), 480.0);
    }

    #[test]
    fn pan_offset_no_margin_at_unit_zoom() {
        assert_eq!(pan_offset(1920.0, 1.0, 0.8), 0.0);
    }
}
