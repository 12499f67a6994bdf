use crate::models::Heading;

/// Fold any angle into [0, 360)
pub fn normalize_degrees(degrees: f64) -> f64 {
    let folded = ((degrees % 360.0) + 360.0) % 360.0;
    // Tiny negative inputs round up to exactly 360
    if folded >= 360.0 {
        0.0
    } else {
        folded
    }
}

/// A rule for bucketing a wind direction into a coarse heading
pub trait CompassPolicy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Classify a direction in degrees (0 = North). Total over all reals;
    /// NaN and infinities fall into the policy's catch-all bucket.
    fn classify(&self, degrees: f64) -> Heading;
}

/// N/E/S/W with east and west given 120° each
///
/// East = [30,150), South = [150,210), West = [210,330), North = the rest.
pub struct FourPoint;

impl CompassPolicy for FourPoint {
    fn name(&self) -> &'static str {
        "four-point"
    }

    fn classify(&self, degrees: f64) -> Heading {
        let d = normalize_degrees(degrees);
        if (30.0..150.0).contains(&d) {
            Heading::East
        } else if (150.0..210.0).contains(&d) {
            Heading::South
        } else if (210.0..330.0).contains(&d) {
            Heading::West
        } else {
            Heading::North
        }
    }
}

/// East for the open interval (0,180), West otherwise
pub struct TwoPoint;

impl CompassPolicy for TwoPoint {
    fn name(&self) -> &'static str {
        "two-point"
    }

    fn classify(&self, degrees: f64) -> Heading {
        let d = normalize_degrees(degrees);
        if d > 0.0 && d < 180.0 {
            Heading::East
        } else {
            Heading::West
        }
    }
}

/// Wind from the east puts Heathrow arrivals overhead
pub fn is_easterly(degrees: f64) -> bool {
    TwoPoint.classify(degrees) == Heading::East
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, Heading::North)]
    #[case(29.9, Heading::North)]
    #[case(30.0, Heading::East)]
    #[case(90.0, Heading::East)]
    #[case(149.9, Heading::East)]
    #[case(150.0, Heading::South)]
    #[case(209.9, Heading::South)]
    #[case(210.0, Heading::West)]
    #[case(329.9, Heading::West)]
    #[case(330.0, Heading::North)]
    #[case(359.9, Heading::North)]
    fn four_point_half_open_edges(#[case] degrees: f64, #[case] expected: Heading) {
        assert_eq!(FourPoint.classify(degrees), expected);
    }

    #[rstest]
    #[case(0.0, Heading::West)]
    #[case(0.1, Heading::East)]
    #[case(90.0, Heading::East)]
    #[case(179.9, Heading::East)]
    #[case(180.0, Heading::West)]
    #[case(270.0, Heading::West)]
    #[case(360.0, Heading::West)]
    fn two_point_open_interval(#[case] degrees: f64, #[case] expected: Heading) {
        assert_eq!(TwoPoint.classify(degrees), expected);
    }

    #[test]
    fn normalize_stays_in_range() {
        for d in [-720.5, -360.0, -90.0, -1e-20, 0.0, 45.0, 359.999, 360.0, 721.0, 1e9] {
            let n = normalize_degrees(d);
            assert!((0.0..360.0).contains(&n), "{} normalized to {}", d, n);
        }
        assert_eq!(normalize_degrees(-90.0), 270.0);
        assert_eq!(normalize_degrees(450.0), 90.0);
    }

    #[test]
    fn classification_invariant_under_normalization() {
        let policies: [&dyn CompassPolicy; 2] = [&FourPoint, &TwoPoint];
        for policy in policies {
            for d in [-330.0, -180.0, -30.0, -1.0, 30.0, 150.0, 390.0, 570.0, 1000.0] {
                assert_eq!(
                    policy.classify(normalize_degrees(d)),
                    policy.classify(d),
                    "{} disagrees at {}",
                    policy.name(),
                    d
                );
            }
        }
    }

    #[test]
    fn negative_and_wrapped_inputs() {
        // -270 is 90: east under both policies
        assert_eq!(FourPoint.classify(-270.0), Heading::East);
        assert!(is_easterly(-270.0));
        // 390 is 30: four-point east boundary
        assert_eq!(FourPoint.classify(390.0), Heading::East);
        assert!(!is_easterly(540.0));
    }

    #[test]
    fn non_finite_falls_through() {
        assert_eq!(FourPoint.classify(f64::NAN), Heading::North);
        assert_eq!(TwoPoint.classify(f64::INFINITY), Heading::West);
    }
}
