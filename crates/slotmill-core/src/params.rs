//! Machining parameters for a straight slot cut
//!
//! [`ToolpathParameters`] can only be obtained through
//! [`ToolpathParametersBuilder::build`], which checks every invariant up front.
//! Code holding a `ToolpathParameters` can therefore rely on a non-zero slot
//! length, a positive stepover and a cutter that fits inside the slot.

use crate::error::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};

/// A point in the XY plane
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Offset this point by `(dx, dy)`
    pub fn offset(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Validated input for one slot-milling run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ToolpathParametersBuilder", into = "ToolpathParametersBuilder")]
pub struct ToolpathParameters {
    start_depth: f64,
    depth_of_cut: f64,
    safe_z: f64,
    slot_width: f64,
    start: Point2,
    end: Point2,
    cut_feed: f64,
    plunge_feed: f64,
    cutter_diameter: f64,
    stepover_width: f64,
    spindle_speed: f64,
}

impl ToolpathParameters {
    /// Start a builder pre-filled with the sample job parameters
    pub fn builder() -> ToolpathParametersBuilder {
        ToolpathParametersBuilder::default()
    }

    /// Z of the stock surface where the cut starts
    pub fn start_depth(&self) -> f64 {
        self.start_depth
    }

    /// Absolute Z of the slot floor (negative is below the stock surface)
    pub fn depth_of_cut(&self) -> f64 {
        self.depth_of_cut
    }

    /// Clearance height for rapid moves
    pub fn safe_z(&self) -> f64 {
        self.safe_z
    }

    pub fn slot_width(&self) -> f64 {
        self.slot_width
    }

    pub fn start(&self) -> Point2 {
        self.start
    }

    pub fn end(&self) -> Point2 {
        self.end
    }

    /// Feed rate for horizontal cutting moves
    pub fn cut_feed(&self) -> f64 {
        self.cut_feed
    }

    /// Feed rate for vertical plunges
    pub fn plunge_feed(&self) -> f64 {
        self.plunge_feed
    }

    pub fn cutter_diameter(&self) -> f64 {
        self.cutter_diameter
    }

    pub fn stepover_width(&self) -> f64 {
        self.stepover_width
    }

    /// Spindle speed (RPM)
    pub fn spindle_speed(&self) -> f64 {
        self.spindle_speed
    }

    /// Turn these parameters back into an editable builder
    pub fn to_builder(&self) -> ToolpathParametersBuilder {
        self.clone().into()
    }
}

/// Builder for [`ToolpathParameters`]
///
/// Also serves as the plain, unvalidated representation used by configuration
/// files. Missing fields fall back to the sample job below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolpathParametersBuilder {
    start_depth: f64,
    depth_of_cut: f64,
    safe_z: f64,
    slot_width: f64,
    start_x: f64,
    start_y: f64,
    end_x: f64,
    end_y: f64,
    cut_feed: f64,
    plunge_feed: f64,
    cutter_diameter: f64,
    stepover_width: f64,
    spindle_speed: f64,
}

impl Default for ToolpathParametersBuilder {
    fn default() -> Self {
        Self {
            start_depth: 0.0,
            depth_of_cut: -0.4,
            safe_z: 1.0,
            slot_width: 1.5,
            start_x: 0.0,
            start_y: 0.0,
            end_x: 10.0,
            end_y: 10.0,
            cut_feed: 162.1,
            plunge_feed: 22.4,
            cutter_diameter: 0.75,
            stepover_width: 0.1,
            spindle_speed: 2900.0,
        }
    }
}

impl ToolpathParametersBuilder {
    pub fn start_depth(mut self, value: f64) -> Self {
        self.start_depth = value;
        self
    }

    pub fn depth_of_cut(mut self, value: f64) -> Self {
        self.depth_of_cut = value;
        self
    }

    pub fn safe_z(mut self, value: f64) -> Self {
        self.safe_z = value;
        self
    }

    pub fn slot_width(mut self, value: f64) -> Self {
        self.slot_width = value;
        self
    }

    pub fn start(mut self, x: f64, y: f64) -> Self {
        self.start_x = x;
        self.start_y = y;
        self
    }

    pub fn start_x(mut self, value: f64) -> Self {
        self.start_x = value;
        self
    }

    pub fn start_y(mut self, value: f64) -> Self {
        self.start_y = value;
        self
    }

    pub fn end(mut self, x: f64, y: f64) -> Self {
        self.end_x = x;
        self.end_y = y;
        self
    }

    pub fn end_x(mut self, value: f64) -> Self {
        self.end_x = value;
        self
    }

    pub fn end_y(mut self, value: f64) -> Self {
        self.end_y = value;
        self
    }

    pub fn cut_feed(mut self, value: f64) -> Self {
        self.cut_feed = value;
        self
    }

    pub fn plunge_feed(mut self, value: f64) -> Self {
        self.plunge_feed = value;
        self
    }

    pub fn cutter_diameter(mut self, value: f64) -> Self {
        self.cutter_diameter = value;
        self
    }

    pub fn stepover_width(mut self, value: f64) -> Self {
        self.stepover_width = value;
        self
    }

    pub fn spindle_speed(mut self, value: f64) -> Self {
        self.spindle_speed = value;
        self
    }

    /// Validate and freeze the parameters
    pub fn build(self) -> DomainResult<ToolpathParameters> {
        self.validate()?;
        Ok(ToolpathParameters {
            start_depth: self.start_depth,
            depth_of_cut: self.depth_of_cut,
            safe_z: self.safe_z,
            slot_width: self.slot_width,
            start: Point2::new(self.start_x, self.start_y),
            end: Point2::new(self.end_x, self.end_y),
            cut_feed: self.cut_feed,
            plunge_feed: self.plunge_feed,
            cutter_diameter: self.cutter_diameter,
            stepover_width: self.stepover_width,
            spindle_speed: self.spindle_speed,
        })
    }

    /// Check every invariant without consuming the builder
    pub fn validate(&self) -> DomainResult<()> {
        for (name, value) in self.named_values() {
            if !value.is_finite() {
                return Err(DomainError::NonFinite { name, value });
            }
        }

        if self.start_x == self.end_x && self.start_y == self.end_y {
            return Err(DomainError::InvalidGeometry {
                x: self.start_x,
                y: self.start_y,
            });
        }

        if self.stepover_width <= 0.0 {
            return Err(DomainError::InvalidStepover {
                value: self.stepover_width,
            });
        }

        if self.cutter_diameter >= self.slot_width {
            return Err(DomainError::CutterTooLarge {
                cutter_diameter: self.cutter_diameter,
                slot_width: self.slot_width,
            });
        }

        if self.spindle_speed <= 0.0 {
            return Err(DomainError::InvalidSpindleSpeed {
                value: self.spindle_speed,
            });
        }

        if self.plunge_feed <= 0.0 {
            return Err(DomainError::InvalidFeedRate {
                name: "plunge feed",
                value: self.plunge_feed,
            });
        }

        if self.cut_feed <= 0.0 {
            return Err(DomainError::InvalidFeedRate {
                name: "cut feed",
                value: self.cut_feed,
            });
        }

        Ok(())
    }

    fn named_values(&self) -> [(&'static str, f64); 13] {
        [
            ("start_depth", self.start_depth),
            ("depth_of_cut", self.depth_of_cut),
            ("safe_z", self.safe_z),
            ("slot_width", self.slot_width),
            ("start_x", self.start_x),
            ("start_y", self.start_y),
            ("end_x", self.end_x),
            ("end_y", self.end_y),
            ("cut_feed", self.cut_feed),
            ("plunge_feed", self.plunge_feed),
            ("cutter_diameter", self.cutter_diameter),
            ("stepover_width", self.stepover_width),
            ("spindle_speed", self.spindle_speed),
        ]
    }
}

impl TryFrom<ToolpathParametersBuilder> for ToolpathParameters {
    type Error = DomainError;

    fn try_from(builder: ToolpathParametersBuilder) -> Result<Self, Self::Error> {
        builder.build()
    }
}

impl From<ToolpathParameters> for ToolpathParametersBuilder {
    fn from(p: ToolpathParameters) -> Self {
        Self {
            start_depth: p.start_depth,
            depth_of_cut: p.depth_of_cut,
            safe_z: p.safe_z,
            slot_width: p.slot_width,
            start_x: p.start.x,
            start_y: p.start.y,
            end_x: p.end.x,
            end_y: p.end.y,
            cut_feed: p.cut_feed,
            plunge_feed: p.plunge_feed,
            cutter_diameter: p.cutter_diameter,
            stepover_width: p.stepover_width,
            spindle_speed: p.spindle_speed,
        }
    }
}
