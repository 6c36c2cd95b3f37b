//! Value interpolation for one frame.

use crate::easing::EasingFn;

/// Linear interpolation of scalars.
#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Frame sample fed to [`interpolate`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample {
    pub start: f64,
    pub end: f64,
    /// Elapsed fraction of the duration, in [0,1].
    pub progress: f64,
    pub elapsed_ms: f64,
    pub duration_ms: f64,
}

/// Unrounded value for a sample.
///
/// Progress-shaped easing is mirrored for descending ranges: the curve is
/// applied to the distance from `end`, so a descending count reuses the same
/// shape as an ascending one.
pub fn interpolate(sample: &Sample, easing: Option<&EasingFn>) -> f64 {
    let Sample {
        start,
        end,
        progress,
        elapsed_ms,
        duration_ms,
    } = *sample;
    match easing {
        None => lerp(start, end, progress),
        Some(EasingFn::Progress(f)) => {
            if end > start {
                start + (end - start) * f(progress)
            } else if start > end {
                end + (start - end) * (1.0 - f(progress))
            } else {
                start
            }
        }
        Some(EasingFn::RawTime(f)) => f(elapsed_ms, start, end - start, duration_ms),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::easing::EasingRegistry;
    use crate::easing::EasingResolver;

    fn sample(start: f64, end: f64, progress: f64) -> Sample {
        Sample {
            start,
            end,
            progress,
            elapsed_ms: progress * 1000.0,
            duration_ms: 1000.0,
        }
    }

    #[test]
    fn linear_is_direction_agnostic() {
        assert_eq!(interpolate(&sample(0.0, 100.0, 0.5), None), 50.0);
        assert_eq!(interpolate(&sample(100.0, 0.0, 0.25), None), 75.0);
        assert_eq!(interpolate(&sample(-10.0, 10.0, 0.75), None), 5.0);
    }

    #[test]
    fn progress_easing_is_mirrored_when_descending() {
        let square = EasingFn::progress(|p| p * p);
        // ascending: 0 + 100 * 0.25
        assert_eq!(interpolate(&sample(0.0, 100.0, 0.5), Some(&square)), 25.0);
        // descending: 0 + 100 * (1 - 0.25)
        assert_eq!(interpolate(&sample(100.0, 0.0, 0.5), Some(&square)), 75.0);
    }

    #[test]
    fn raw_time_easing_receives_elapsed_start_delta_duration() {
        let probe = EasingFn::raw_time(|t, b, c, d| {
            assert_eq!((t, b, c, d), (250.0, 100.0, -100.0, 1000.0));
            42.0
        });
        assert_eq!(interpolate(&sample(100.0, 0.0, 0.25), Some(&probe)), 42.0);
    }

    #[test]
    fn builtin_raw_time_quad_matches_progress_square() {
        let reg = EasingRegistry::new();
        let quad = reg.resolve("easeInQuad").unwrap();
        let v = interpolate(&sample(0.0, 200.0, 0.5), Some(&quad));
        assert!((v - 50.0).abs() < 1e-9);
    }
}
