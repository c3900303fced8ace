//! Piecewise-linear sub-index interpolation.

use super::breakpoints::profile;
use super::pollutant::PollutantKey;

/// Compute the AQI sub-index of a concentration.
///
/// Returns `None` when the concentration is missing (NaN, infinite) or not
/// strictly positive. Segments are scanned in ascending order and the first
/// one whose upper bound is `>= concentration` wins, so a value sitting
/// exactly on a breakpoint is scored by the lower segment. Both segments agree
/// there, which keeps the curve continuous. Anything above the last
/// threshold is extrapolated along the open segment.
pub fn interpolate(key: PollutantKey, concentration: f64) -> Option<f64> {
    if !concentration.is_finite() || concentration <= 0.0 {
        return None;
    }

    let (open, bounded) = profile(key).segments.split_last()?;
    let segment = bounded
        .iter()
        .find(|segment| concentration <= segment.concentration_high)
        .unwrap_or(open);

    Some(segment.index_at(concentration))
}

/// Same as [`interpolate`] for an optional reading
pub fn interpolate_opt(key: PollutantKey, concentration: Option<f64>) -> Option<f64> {
    concentration.and_then(|value| interpolate(key, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aqi::breakpoints::profiles;

    const EPSILON: f64 = 1e-9;

    fn assert_close(actual: Option<f64>, expected: f64) {
        let actual = actual.expect("expected a sub-index");
        assert!(
            (actual - expected).abs() < EPSILON,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_first_breakpoint_ceiling_is_50() {
        assert_close(interpolate(PollutantKey::No2, 40.0), 50.0);
        assert_close(interpolate(PollutantKey::Pm10, 25.0), 50.0);
        assert_close(interpolate(PollutantKey::O3, 100.0), 50.0);
        assert_close(interpolate(PollutantKey::Pm25, 15.0), 50.0);
    }

    #[test]
    fn test_values_inside_segments() {
        assert_close(interpolate(PollutantKey::No2, 20.0), 25.0);
        assert_close(interpolate(PollutantKey::No2, 65.0), 75.0);
        assert_close(interpolate(PollutantKey::No2, 105.0), 125.0);
        assert_close(interpolate(PollutantKey::No2, 175.0), 175.0);
        assert_close(interpolate(PollutantKey::Pm10, 60.0), 112.5);
        assert_close(interpolate(PollutantKey::O3, 120.0), 75.0);
        assert_close(interpolate(PollutantKey::Pm25, 42.5), 125.0);
    }

    #[test]
    fn test_matches_closed_form_formulas() {
        // Reference formulas written the way the per-pollutant branches read
        fn no2(c: f64) -> f64 {
            if c <= 40.0 {
                (c / 40.0) * 50.0
            } else if c <= 90.0 {
                50.0 + ((c - 40.0) / 50.0) * 50.0
            } else if c <= 120.0 {
                100.0 + ((c - 90.0) / 30.0) * 50.0
            } else if c <= 230.0 {
                150.0 + ((c - 120.0) / 110.0) * 50.0
            } else {
                200.0 + ((c - 230.0) / 170.0) * 100.0
            }
        }

        fn pm25(c: f64) -> f64 {
            if c <= 15.0 {
                (c / 15.0) * 50.0
            } else if c <= 30.0 {
                50.0 + ((c - 15.0) / 15.0) * 50.0
            } else if c <= 55.0 {
                100.0 + ((c - 30.0) / 25.0) * 50.0
            } else if c <= 110.0 {
                150.0 + ((c - 55.0) / 55.0) * 50.0
            } else {
                200.0 + ((c - 110.0) / 90.0) * 100.0
            }
        }

        for step in 1..2000 {
            let c = step as f64 * 0.37;
            assert_close(interpolate(PollutantKey::No2, c), no2(c));
            assert_close(interpolate(PollutantKey::Pm25, c), pm25(c));
        }
    }

    #[test]
    fn test_continuity_at_every_breakpoint() {
        for profile in profiles() {
            for pair in profile.segments.windows(2) {
                let boundary = pair[0].concentration_high;
                let from_lower = pair[0].index_at(boundary);
                let from_upper = pair[1].index_at(boundary);
                assert!((from_lower - from_upper).abs() < EPSILON);

                let at = interpolate(profile.key, boundary).unwrap();
                let just_below = interpolate(profile.key, boundary - 1e-7).unwrap();
                let just_above = interpolate(profile.key, boundary + 1e-7).unwrap();
                assert!((at - from_lower).abs() < EPSILON);
                assert!((at - just_below).abs() < 1e-4);
                assert!((at - just_above).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn test_boundary_value_uses_lower_segment() {
        // 90 closes the second NO2 segment: exactly 100, not the start of the third
        assert_close(interpolate(PollutantKey::No2, 90.0), 100.0);
        assert_close(interpolate(PollutantKey::Pm10, 180.0), 200.0);
        assert_close(interpolate(PollutantKey::O3, 240.0), 200.0);
        assert_close(interpolate(PollutantKey::Pm25, 110.0), 200.0);
    }

    #[test]
    fn test_extrapolation_above_highest_threshold() {
        assert_close(interpolate(PollutantKey::No2, 400.0), 300.0);
        assert_close(interpolate(PollutantKey::No2, 570.0), 400.0);
        assert_close(interpolate(PollutantKey::Pm10, 300.0), 300.0);
        assert_close(interpolate(PollutantKey::Pm10, 540.0), 500.0);
        assert_close(interpolate(PollutantKey::O3, 720.0), 500.0);
        assert_close(interpolate(PollutantKey::Pm25, 470.0), 600.0);
    }

    #[test]
    fn test_lowest_index_is_zero() {
        for key in PollutantKey::ALL {
            let tiny = interpolate(key, 1e-12).unwrap();
            assert!(tiny >= 0.0 && tiny < 1e-9);
        }
    }

    #[test]
    fn test_invalid_concentrations_are_undefined() {
        for key in PollutantKey::ALL {
            assert_eq!(interpolate(key, 0.0), None);
            assert_eq!(interpolate(key, -0.0), None);
            assert_eq!(interpolate(key, -3.5), None);
            assert_eq!(interpolate(key, f64::NAN), None);
            assert_eq!(interpolate(key, f64::INFINITY), None);
            assert_eq!(interpolate_opt(key, None), None);
        }
    }

    #[test]
    fn test_interpolation_is_monotonic() {
        for key in PollutantKey::ALL {
            let mut previous = 0.0;
            for step in 1..5000 {
                let value = interpolate(key, step as f64 * 0.2).unwrap();
                assert!(value > previous);
                previous = value;
            }
        }
    }
}
