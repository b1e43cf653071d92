//! Slot geometry calculation
//!
//! Turns slot endpoints and tool dimensions into the derived values used to
//! lay out the toolpath: the slot vector and length, the approach angle, the
//! stepover plan and the clearance arc left between cutter and slot walls.
//! Everything here is a pure function of its inputs.

use serde::{Deserialize, Serialize};
use slotmill_core::{DomainError, DomainResult, Point2, ToolpathParameters};
use std::fmt;
use std::str::FromStr;

/// Remainders at or below this are treated as an exact multiple of the stepover.
pub const REMAINDER_EPSILON: f64 = 1e-9;

/// Upper bound on passes (primary, whole stepovers and leftover) in one program.
///
/// Each pass is eight lines of G-code, so this caps a program at under a
/// million lines.
pub const MAX_PASS_COUNT: u64 = 100_000;

/// Which side of the programmed line the cutter runs on
///
/// The programmed start and end points lie on the slot centreline. Running on
/// the right or left moves the cutter sideways by the clearance radius so its
/// edge follows that wall of the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SideOfTravel {
    /// Right of the direction of travel
    Right,
    /// Left of the direction of travel
    Left,
    /// On the line of travel
    #[default]
    Centre,
}

impl SideOfTravel {
    /// Sign applied to the left-hand lateral normal
    pub fn sign(self) -> f64 {
        match self {
            Self::Right => -1.0,
            Self::Left => 1.0,
            Self::Centre => 0.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Right => "right",
            Self::Left => "left",
            Self::Centre => "centre",
        }
    }
}

impl fmt::Display for SideOfTravel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SideOfTravel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "right" => Ok(Self::Right),
            "left" => Ok(Self::Left),
            "centre" | "center" => Ok(Self::Centre),
            other => Err(format!(
                "unknown side of travel '{}' (expected right, left or centre)",
                other
            )),
        }
    }
}

/// Derived geometry of one slot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlotGeometry {
    /// X component of the slot vector
    pub dx: f64,
    /// Y component of the slot vector
    pub dy: f64,
    /// Length of the slot
    pub length: f64,
    /// Length divided by stepover width
    pub raw_stepover_count: f64,
    /// Whole stepovers that fit in the slot length
    pub stepover_count: u64,
    /// Fractional stepover left after the whole ones
    pub remainder: f64,
    /// A partial pass is required to cover the remainder
    pub has_leftover: bool,
    /// Slot width minus cutter diameter
    pub arc_diameter: f64,
    pub arc_radius: f64,
    /// `asin(dy / length)` in degrees, in [-90, 90]
    pub raw_angle: f64,
    /// Direction of travel in degrees, in [0, 360)
    pub abs_angle: f64,
}

impl SlotGeometry {
    /// Compute the geometry for a validated parameter set
    pub fn compute(params: &ToolpathParameters) -> DomainResult<Self> {
        Self::from_dimensions(
            params.start(),
            params.end(),
            params.stepover_width(),
            params.slot_width(),
            params.cutter_diameter(),
        )
    }

    /// Compute the geometry from raw dimensions
    pub fn from_dimensions(
        start: Point2,
        end: Point2,
        stepover_width: f64,
        slot_width: f64,
        cutter_diameter: f64,
    ) -> DomainResult<Self> {
        let dx = end.x - start.x;
        let dy = end.y - start.y;
        let length = dx.hypot(dy);

        if length == 0.0 {
            return Err(DomainError::InvalidGeometry {
                x: start.x,
                y: start.y,
            });
        }
        // Finite endpoints far apart can still overflow the difference
        if !length.is_finite() {
            return Err(DomainError::NonFinite {
                name: "slot length",
                value: length,
            });
        }

        let plan = StepoverPlan::new(length, stepover_width)?;

        let arc_diameter = slot_width - cutter_diameter;
        if arc_diameter <= 0.0 {
            return Err(DomainError::CutterTooLarge {
                cutter_diameter,
                slot_width,
            });
        }

        let raw_angle = (dy / length).clamp(-1.0, 1.0).asin().to_degrees();

        Ok(Self {
            dx,
            dy,
            length,
            raw_stepover_count: plan.raw,
            stepover_count: plan.count,
            remainder: plan.remainder,
            has_leftover: plan.has_leftover,
            arc_diameter,
            arc_radius: arc_diameter / 2.0,
            raw_angle,
            abs_angle: absolute_angle(dx, dy, raw_angle),
        })
    }

    /// Unit vector along the direction of travel
    pub fn direction(&self) -> (f64, f64) {
        (self.dx / self.length, self.dy / self.length)
    }

    /// Unit vector perpendicular to the slot, to the left of travel
    pub fn lateral_normal(&self) -> (f64, f64) {
        (-self.dy / self.length, self.dx / self.length)
    }

    /// Total passes: the primary pass, one per whole stepover, and the leftover pass
    pub fn pass_count(&self) -> u64 {
        1 + self.stepover_count + u64::from(self.has_leftover)
    }

    /// Sideways shift of the cutter centre for `side`
    ///
    /// Right and left move the cutter by the clearance radius plus `allowance`
    /// along the lateral normal. The centre position ignores `allowance`.
    pub fn side_shift(&self, side: SideOfTravel, allowance: f64) -> DomainResult<Point2> {
        if side == SideOfTravel::Centre {
            return Ok(Point2::default());
        }

        let distance = side.sign() * (self.arc_radius + allowance);
        if !distance.is_finite() {
            return Err(DomainError::NonFinite {
                name: "side allowance",
                value: allowance,
            });
        }

        let (nx, ny) = self.lateral_normal();
        Ok(Point2::new(nx * distance + 0.0, ny * distance + 0.0))
    }
}

/// Stepover plan derived from a slot length
#[derive(Debug, Clone, Copy, PartialEq)]
struct StepoverPlan {
    raw: f64,
    count: u64,
    remainder: f64,
    has_leftover: bool,
}

impl StepoverPlan {
    fn new(length: f64, stepover_width: f64) -> DomainResult<Self> {
        if stepover_width <= 0.0 || !stepover_width.is_finite() {
            return Err(DomainError::InvalidStepover {
                value: stepover_width,
            });
        }

        let mut raw = length / stepover_width;
        // 10 / 0.1 lands just under 100 in binary floating point
        let nearest = raw.round();
        if (raw - nearest).abs() <= REMAINDER_EPSILON {
            raw = nearest;
        }

        if !raw.is_finite() {
            return Err(DomainError::NonFinite {
                name: "stepover count",
                value: raw,
            });
        }

        let floored = raw.floor();
        let remainder = raw - floored;
        let has_leftover = remainder > REMAINDER_EPSILON;

        // Checked in floating point so the cast below cannot saturate
        let passes = floored + 1.0 + if has_leftover { 1.0 } else { 0.0 };
        if passes > MAX_PASS_COUNT as f64 {
            return Err(DomainError::TooManyPasses {
                passes,
                max: MAX_PASS_COUNT,
            });
        }

        Ok(Self {
            raw,
            count: floored as u64,
            remainder,
            has_leftover,
        })
    }
}

/// Map `asin`-derived angle onto [0, 360) using the signs of the slot vector.
///
/// When `dx < 0` the same `180 - raw` rule covers both `dy >= 0` and `dy < 0`;
/// it agrees with `atan2` in all four quadrants.
pub fn absolute_angle(dx: f64, dy: f64, raw_angle: f64) -> f64 {
    let angle = if dx < 0.0 {
        180.0 - raw_angle
    } else if dy < 0.0 {
        360.0 + raw_angle
    } else {
        raw_angle
    };

    // +0.0 folds a negative zero into zero
    if angle >= 360.0 {
        angle - 360.0 + 0.0
    } else {
        angle + 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry(end_x: f64, end_y: f64) -> SlotGeometry {
        SlotGeometry::from_dimensions(
            Point2::new(0.0, 0.0),
            Point2::new(end_x, end_y),
            0.1,
            1.5,
            0.75,
        )
        .unwrap()
    }

    #[test]
    fn test_slot_length() {
        let g = geometry(10.0, 10.0);
        assert_eq!(g.dx, 10.0);
        assert_eq!(g.dy, 10.0);
        assert!((g.length - 200f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_stepover_plan_with_leftover() {
        let g = geometry(10.0, 10.0);
        assert!((g.raw_stepover_count - 141.421356).abs() < 1e-5);
        assert_eq!(g.stepover_count, 141);
        assert!(g.has_leftover);
        assert!((g.remainder - 0.421356).abs() < 1e-5);
        assert_eq!(g.pass_count(), 143);
    }

    #[test]
    fn test_exact_multiple_has_no_leftover() {
        // 6-8-10 triangle, 10 / 0.1 is not exactly 100 in f64
        let g = geometry(6.0, 8.0);
        assert_eq!(g.stepover_count, 100);
        assert!(!g.has_leftover);
        assert_eq!(g.remainder, 0.0);
        assert_eq!(g.pass_count(), 101);
    }

    #[test]
    fn test_arc_radius() {
        let g = geometry(10.0, 10.0);
        assert!((g.arc_diameter - 0.75).abs() < 1e-12);
        assert!((g.arc_radius - 0.375).abs() < 1e-12);
    }

    #[test]
    fn test_quadrant_angles() {
        assert!((geometry(10.0, 10.0).abs_angle - 45.0).abs() < 1e-9);
        assert!((geometry(-10.0, 10.0).abs_angle - 135.0).abs() < 1e-9);
        assert!((geometry(-10.0, -10.0).abs_angle - 225.0).abs() < 1e-9);
        assert!((geometry(10.0, -10.0).abs_angle - 315.0).abs() < 1e-9);
    }

    #[test]
    fn test_axis_aligned_angles() {
        assert_eq!(geometry(5.0, 0.0).abs_angle, 0.0);
        assert!((geometry(0.0, 5.0).abs_angle - 90.0).abs() < 1e-9);
        assert!((geometry(-5.0, 0.0).abs_angle - 180.0).abs() < 1e-9);
        assert!((geometry(0.0, -5.0).abs_angle - 270.0).abs() < 1e-9);
    }

    #[test]
    fn test_angle_matches_atan2() {
        for step in 0..72 {
            let theta = (step as f64 * 5.0 + 1.0).to_radians();
            let (x, y) = (theta.cos() * 7.0, theta.sin() * 7.0);
            let g = geometry(x, y);

            let expected = y.atan2(x).to_degrees().rem_euclid(360.0);
            assert!(
                (g.abs_angle - expected).abs() < 1e-6,
                "direction ({x}, {y}): got {}, expected {}",
                g.abs_angle,
                expected
            );
            assert!((0.0..360.0).contains(&g.abs_angle));
        }
    }

    #[test]
    fn test_negative_zero_angle_normalized() {
        let angle = absolute_angle(1.0, -0.0, -0.0);
        assert_eq!(angle, 0.0);
        assert!(angle.is_sign_positive());
    }

    #[test]
    fn test_tiny_negative_angle_stays_below_360() {
        let angle = absolute_angle(1.0, -1e-300, -1e-300);
        assert!(angle < 360.0);
    }

    #[test]
    fn test_zero_length_rejected() {
        let err = SlotGeometry::from_dimensions(
            Point2::new(2.0, 2.0),
            Point2::new(2.0, 2.0),
            0.1,
            1.5,
            0.75,
        )
        .unwrap_err();
        assert_eq!(err, DomainError::InvalidGeometry { x: 2.0, y: 2.0 });
    }

    #[test]
    fn test_zero_stepover_rejected() {
        let err = SlotGeometry::from_dimensions(
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            0.0,
            1.5,
            0.75,
        )
        .unwrap_err();
        assert_eq!(err, DomainError::InvalidStepover { value: 0.0 });
    }

    #[test]
    fn test_oversized_cutter_rejected() {
        let err = SlotGeometry::from_dimensions(
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            0.1,
            1.0,
            1.25,
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::CutterTooLarge { .. }));
    }

    #[test]
    fn test_lateral_normal_is_perpendicular() {
        let g = geometry(3.0, 4.0);
        let (ux, uy) = g.direction();
        let (nx, ny) = g.lateral_normal();
        assert!((ux * nx + uy * ny).abs() < 1e-12);
        assert!((nx - -0.8).abs() < 1e-12);
        assert!((ny - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_overflowing_length_rejected() {
        let err = SlotGeometry::from_dimensions(
            Point2::new(-1e308, 0.0),
            Point2::new(1e308, 0.0),
            0.1,
            1.5,
            0.75,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            DomainError::NonFinite { name: "slot length", value } if value.is_infinite()
        ));
    }

    #[test]
    fn test_overflowing_stepover_count_rejected() {
        let err = SlotGeometry::from_dimensions(
            Point2::new(0.0, 0.0),
            Point2::new(1e300, 0.0),
            1e-300,
            1.5,
            0.75,
        )
        .unwrap_err();
        assert_eq!(err.kind(), "non_finite");
    }

    #[test]
    fn test_pass_count_capped() {
        // 14.142 / 1e-9 asks for about 1.4e10 passes
        let err = SlotGeometry::from_dimensions(
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 10.0),
            1e-9,
            1.5,
            0.75,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            DomainError::TooManyPasses { max: MAX_PASS_COUNT, passes } if passes > 1e10
        ));

        // Exactly at the cap is still allowed
        let g = SlotGeometry::from_dimensions(
            Point2::new(0.0, 0.0),
            Point2::new((MAX_PASS_COUNT - 1) as f64, 0.0),
            1.0,
            1.5,
            0.75,
        )
        .unwrap();
        assert_eq!(g.pass_count(), MAX_PASS_COUNT);
    }

    #[test]
    fn test_side_shift() {
        // Travel along +X: left is +Y, right is -Y
        let g = geometry(10.0, 0.0);
        assert_eq!(
            g.side_shift(SideOfTravel::Centre, 5.0).unwrap(),
            Point2::default()
        );

        let left = g.side_shift(SideOfTravel::Left, 0.0).unwrap();
        assert!(left.x.abs() < 1e-12);
        assert!((left.y - 0.375).abs() < 1e-12);

        let right = g.side_shift(SideOfTravel::Right, 0.125).unwrap();
        assert!(right.x.abs() < 1e-12);
        assert!((right.y - -0.5).abs() < 1e-12);

        let err = g.side_shift(SideOfTravel::Left, f64::NAN).unwrap_err();
        assert_eq!(err.kind(), "non_finite");
    }

    #[test]
    fn test_side_of_travel_parse() {
        assert_eq!("Right".parse::<SideOfTravel>(), Ok(SideOfTravel::Right));
        assert_eq!("left".parse::<SideOfTravel>(), Ok(SideOfTravel::Left));
        assert_eq!("center".parse::<SideOfTravel>(), Ok(SideOfTravel::Centre));
        assert!("up".parse::<SideOfTravel>().is_err());
        assert_eq!(SideOfTravel::default().to_string(), "centre");
    }
}
