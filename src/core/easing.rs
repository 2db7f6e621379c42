//! Easing curves shared by the camera transitions and fades.

/// Smoothstep easing `t² · (3 − 2t)`, zero velocity at both ends.
///
/// Input is clamped to `[0, 1]` so callers can feed raw progress values.
pub fn smoothstep(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Advance a progress value by `delta * rate`, clamped to `[0, 1]`.
pub fn advance_progress(progress: f32, delta_secs: f32, rate: f32) -> f32 {
    (progress + delta_secs.max(0.0) * rate).clamp(0.0, 1.0)
}

/// Linear remap of `value` from `[in_min, in_max]` to `[0, 1]`, clamped.
pub fn inverse_lerp_clamped(in_min: f32, in_max: f32, value: f32) -> f32 {
    if (in_max - in_min).abs() <= f32::EPSILON {
        return if value >= in_max { 1.0 } else { 0.0 };
    }
    ((value - in_min) / (in_max - in_min)).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-6;

    #[test]
    fn test_smoothstep_endpoints_and_midpoint() {
        assert!(smoothstep(0.0).abs() < EPSILON);
        assert!((smoothstep(1.0) - 1.0).abs() < EPSILON);
        assert!((smoothstep(0.5) - 0.5).abs() < EPSILON);
    }

    #[test]
    fn test_smoothstep_clamps_out_of_range() {
        assert!(smoothstep(-3.0).abs() < EPSILON);
        assert!((smoothstep(7.0) - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_smoothstep_is_monotonic() {
        let mut last = 0.0;
        for i in 0..=100 {
            let v = smoothstep(i as f32 / 100.0);
            assert!(v >= last);
            last = v;
        }
    }

    #[test]
    fn test_advance_progress_clamps() {
        assert!((advance_progress(0.9, 1.0, 0.5) - 1.0).abs() < EPSILON);
        assert!((advance_progress(0.2, 0.1, 2.0) - 0.4).abs() < EPSILON);
        // Negative frame deltas never rewind a transition.
        assert!((advance_progress(0.5, -1.0, 2.0) - 0.5).abs() < EPSILON);
    }

    #[test]
    fn test_inverse_lerp_clamped() {
        assert!((inverse_lerp_clamped(480.0, 1280.0, 880.0) - 0.5).abs() < EPSILON);
        assert!(inverse_lerp_clamped(480.0, 1280.0, 100.0).abs() < EPSILON);
        assert!((inverse_lerp_clamped(480.0, 1280.0, 4000.0) - 1.0).abs() < EPSILON);
        assert!((inverse_lerp_clamped(10.0, 10.0, 10.0) - 1.0).abs() < EPSILON);
    }
}
