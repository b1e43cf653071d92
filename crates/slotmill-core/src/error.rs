//! Error handling for SlotMill
//!
//! Every invariant of the toolpath input is checked before any G-code is
//! produced. Violations are reported through [`DomainError`], which names the
//! failed invariant and carries the offending value(s).
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Input validation error
///
/// Raised when a set of machining parameters cannot describe a valid slot cut.
/// These are deterministic failures; retrying with the same input fails the
/// same way.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Start and end points coincide, so the slot has no length or direction
    #[error("Invalid geometry: start and end points coincide at ({x:.3}, {y:.3})")]
    InvalidGeometry {
        /// X coordinate shared by both points.
        x: f64,
        /// Y coordinate shared by both points.
        y: f64,
    },

    /// Stepover width is zero or negative
    #[error("Invalid stepover width: {value} (must be > 0)")]
    InvalidStepover {
        /// The rejected stepover width.
        value: f64,
    },

    /// Cutter leaves no positive clearance inside the slot
    #[error(
        "Cutter too large: diameter {cutter_diameter:.3} must be smaller than slot width {slot_width:.3}"
    )]
    CutterTooLarge {
        /// Diameter of the cutter.
        cutter_diameter: f64,
        /// Width of the slot.
        slot_width: f64,
    },

    /// Spindle speed is zero or negative
    #[error("Invalid spindle speed: {value} (must be > 0)")]
    InvalidSpindleSpeed {
        /// The rejected spindle speed.
        value: f64,
    },

    /// A feed rate is zero or negative
    #[error("Invalid {name}: {value} (must be > 0)")]
    InvalidFeedRate {
        /// Which feed rate was rejected.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// The slot needs more passes than a program may hold
    #[error("Too many passes: {passes} required, at most {max} allowed")]
    TooManyPasses {
        /// Passes the stepover plan asks for.
        passes: f64,
        /// Upper bound on passes per program.
        max: u64,
    },

    /// A parameter is NaN or infinite
    #[error("Parameter '{name}' must be a finite number, got {value}")]
    NonFinite {
        /// Name of the parameter.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },
}

impl DomainError {
    /// Short machine-readable identifier for the failed invariant
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidGeometry { .. } => "invalid_geometry",
            Self::InvalidStepover { .. } => "invalid_stepover",
            Self::CutterTooLarge { .. } => "cutter_too_large",
            Self::InvalidSpindleSpeed { .. } => "invalid_spindle_speed",
            Self::InvalidFeedRate { .. } => "invalid_feed_rate",
            Self::TooManyPasses { .. } => "too_many_passes",
            Self::NonFinite { .. } => "non_finite",
        }
    }
}

/// Result type alias for domain validation.
pub type DomainResult<T> = Result<T, DomainError>;
