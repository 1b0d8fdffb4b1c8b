use crate::error::{EditorError, Result};
use std::f64::consts::PI;

pub fn rad_to_deg(radians: f64) -> f64 {
    radians * 180.0 / PI
}

pub fn deg_to_rad(degrees: f64) -> f64 {
    degrees * PI / 180.0
}

/// Rejects NaN and the infinities before a typed value can reach the state tree.
pub fn check_finite(value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EditorError::Validation { value })
    }
}

/// Coerces text from a numeric input the way the draggable inputs report it:
/// blank text reads as zero and anything unparsable becomes NaN.
pub fn parse_number(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;
    use rstest::rstest;

    #[test]
    fn rad_to_deg_known_points() {
        assert_eq!(rad_to_deg(0.0), 0.0);
        assert_relative_eq!(rad_to_deg(PI), 180.0);
        assert_relative_eq!(rad_to_deg(PI / 2.0), 90.0);
        assert_relative_eq!(rad_to_deg(-PI / 4.0), -45.0);
    }

    #[test]
    fn deg_to_rad_inverts_rad_to_deg() {
        assert_relative_eq!(deg_to_rad(rad_to_deg(1.234)), 1.234, epsilon = 1e-12);
        assert_relative_eq!(deg_to_rad(180.0), PI);
    }

    #[rstest]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    #[case(f64::NEG_INFINITY)]
    fn check_finite_rejects(#[case] value: f64) {
        let err = check_finite(value).unwrap_err();
        assert!(matches!(err, EditorError::Validation { .. }));
    }

    #[rstest]
    #[case(3.5)]
    #[case(0.0)]
    #[case(-9999.0)]
    fn check_finite_passes_through(#[case] value: f64) {
        assert_eq!(check_finite(value).unwrap(), value);
    }

    #[rstest]
    #[case("", 0.0)]
    #[case("  ", 0.0)]
    #[case("1.5", 1.5)]
    #[case(" -2 ", -2.0)]
    #[case("1e3", 1000.0)]
    fn parse_number_reads_numbers(#[case] raw: &str, #[case] expected: f64) {
        assert_eq!(parse_number(raw), expected);
    }

    #[test]
    fn parse_number_garbage_is_rejected_by_check_finite() {
        assert!(parse_number("abc").is_nan());
        assert!(check_finite(parse_number("abc")).is_err());
        assert!(check_finite(parse_number("inf")).is_err());
    }

    proptest! {
        #[test]
        fn rad_to_deg_is_monotonic(a in -1.0e6f64..1.0e6, b in -1.0e6f64..1.0e6) {
            if a < b {
                prop_assert!(rad_to_deg(a) <= rad_to_deg(b));
            } else {
                prop_assert!(rad_to_deg(a) >= rad_to_deg(b));
            }
        }
    }
}
