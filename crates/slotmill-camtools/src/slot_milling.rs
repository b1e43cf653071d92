//! Slot milling program assembly
//!
//! Builds the start, body and end blocks of a straight slot cut from validated
//! [`ToolpathParameters`] and the [`SlotGeometry`] derived from them.
//!
//! The body cuts the slot with single-axis moves (X, then Y). After the primary
//! pass it repeats the cut once per whole stepover, each time shifted one more
//! stepover width along the slot's lateral normal, then once more by the
//! fractional remainder when the slot length is not an exact multiple of the
//! stepover width.
//!
//! The whole pass set can be moved off the centreline to the right or left of
//! travel by the clearance radius, so the cutter edge runs along one slot wall.

use crate::geometry::{SideOfTravel, SlotGeometry};
use crate::instruction::{
    format_number, Argument, GCodeLine, DEFAULT_COMMENT_COLUMN, FEED_DECIMALS, LENGTH_DECIMALS,
};
use crate::program::GCodeProgram;
use serde::{Deserialize, Serialize};
use slotmill_core::{DomainError, DomainResult, Point2, ToolpathParameters, Units};
use tracing::debug;

/// Program conventions that do not come from the machining parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgramOptions {
    /// Unit system declared in the start block
    pub units: Units,
    /// Open the program with a comment per input parameter
    pub echo_parameters: bool,
    /// Wrap the program in `===Main Start===` / `===Main End===` comments
    pub section_markers: bool,
    /// Cut the stepover passes; when false only the primary pass is emitted
    pub multi_pass: bool,
    /// Precede each pass with a `Pass k of N` comment
    pub pass_markers: bool,
    /// Decimals written for feed rates
    pub feed_decimals: usize,
    /// Column at which trailing comments start
    pub comment_column: usize,
    /// Side of the programmed line the cutter runs on
    pub side: SideOfTravel,
    /// Extra sideways distance added to the clearance radius off the centreline
    pub side_allowance: f64,
}

impl Default for ProgramOptions {
    fn default() -> Self {
        Self {
            units: Units::Mm,
            echo_parameters: true,
            section_markers: true,
            multi_pass: true,
            pass_markers: true,
            feed_decimals: FEED_DECIMALS,
            comment_column: DEFAULT_COMMENT_COLUMN,
            side: SideOfTravel::Centre,
            side_allowance: 0.0,
        }
    }
}

/// Generate a program with default options
pub fn generate(params: &ToolpathParameters) -> DomainResult<GCodeProgram> {
    SlotMillingGenerator::new(params.clone()).generate()
}

/// Generator for straight slot milling G-code
#[derive(Debug, Clone)]
pub struct SlotMillingGenerator {
    params: ToolpathParameters,
    options: ProgramOptions,
}

impl SlotMillingGenerator {
    pub fn new(params: ToolpathParameters) -> Self {
        Self {
            params,
            options: ProgramOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ProgramOptions) -> Self {
        self.options = options;
        self
    }

    pub fn params(&self) -> &ToolpathParameters {
        &self.params
    }

    pub fn options(&self) -> &ProgramOptions {
        &self.options
    }

    /// Derived geometry for the current parameters
    pub fn geometry(&self) -> DomainResult<SlotGeometry> {
        SlotGeometry::compute(&self.params)
    }

    /// Generate the complete program
    pub fn generate(&self) -> DomainResult<GCodeProgram> {
        let geometry = self.geometry()?;
        let passes = self.pass_offsets(&geometry)?;

        debug!(
            length = geometry.length,
            abs_angle = geometry.abs_angle,
            stepovers = geometry.stepover_count,
            leftover = geometry.has_leftover,
            arc_radius = geometry.arc_radius,
            side = %self.options.side,
            passes = passes.len(),
            "Computed slot geometry"
        );

        Ok(GCodeProgram::new(
            self.start_block(&geometry, passes[0]),
            self.body_block(&passes),
            self.end_block(),
            self.options.comment_column,
        ))
    }

    /// Offset of every pass from the programmed line, primary pass first
    ///
    /// Never empty. The pass count is bounded by [`crate::geometry::MAX_PASS_COUNT`].
    pub fn pass_offsets(&self, geometry: &SlotGeometry) -> DomainResult<Vec<Point2>> {
        let shift = geometry.side_shift(self.options.side, self.options.side_allowance)?;

        let mut distances = vec![0.0];
        if self.options.multi_pass {
            let width = self.params.stepover_width();
            let whole = geometry.stepover_count;
            distances.extend((1..=whole).map(|k| k as f64 * width));
            if geometry.has_leftover {
                distances.push((whole as f64 + geometry.remainder) * width);
            }
        }

        let (nx, ny) = geometry.lateral_normal();
        let offsets: Vec<Point2> = distances
            .into_iter()
            .map(|d| Point2::new(shift.x + nx * d, shift.y + ny * d))
            .collect();

        for offset in &offsets {
            self.check_pass_endpoints(offset)?;
        }
        Ok(offsets)
    }

    // Endpoints near f64::MAX can overflow once shifted
    fn check_pass_endpoints(&self, offset: &Point2) -> DomainResult<()> {
        let p = &self.params;
        let start = p.start().offset(offset.x, offset.y);
        let end = p.end().offset(offset.x, offset.y);
        let coordinates = [
            ("pass start x", start.x),
            ("pass start y", start.y),
            ("pass end x", end.x),
            ("pass end y", end.y),
        ];
        match coordinates.iter().find(|(_, value)| !value.is_finite()) {
            Some(&(name, value)) => Err(DomainError::NonFinite { name, value }),
            None => Ok(()),
        }
    }

    fn start_block(&self, geometry: &SlotGeometry, first: Point2) -> Vec<GCodeLine> {
        let p = &self.params;
        let units = self.options.units;
        let mut block = Vec::new();

        if self.options.echo_parameters {
            block.extend(self.parameter_echo(geometry));
        }

        if self.options.section_markers {
            block.push(GCodeLine::comment("===Main Start==="));
        }

        block.push(GCodeLine::command("G90").with_comment("Absolute XYZ"));
        // Units as the command, path mode and plane as modal words
        block.push(
            GCodeLine::command(units.gcode())
                .arg(Argument::modal('G', 64))
                .arg(Argument::modal('G', 17))
                .with_comment(format!("{}, Best Speed Path, XY Plane", units.label())),
        );
        block.push(
            GCodeLine::command("M3")
                .arg(Argument::spindle(p.spindle_speed()))
                .with_comment("Spindle Speed"),
        );
        block.push(
            GCodeLine::command("G0")
                .arg(Argument::length('Z', p.safe_z()))
                .with_comment("Go to safe height"),
        );
        let start = p.start().offset(first.x, first.y);
        block.push(
            GCodeLine::command("G0")
                .arg(Argument::length('X', start.x))
                .arg(Argument::length('Y', start.y))
                .with_comment("Rapid to start point"),
        );

        block
    }

    fn body_block(&self, passes: &[Point2]) -> Vec<GCodeLine> {
        let p = &self.params;
        let feed_decimals = self.options.feed_decimals;
        let total = passes.len();
        let mut block = Vec::with_capacity(total * 8);

        for (index, offset) in passes.iter().enumerate() {
            let start = p.start().offset(offset.x, offset.y);
            let end = p.end().offset(offset.x, offset.y);

            if self.options.pass_markers && total > 1 {
                block.push(GCodeLine::comment(format!("Pass {} of {}", index + 1, total)));
            }

            // The start block already left the tool above the primary start point
            if index > 0 {
                block.push(
                    GCodeLine::command("G0")
                        .arg(Argument::length('X', start.x))
                        .arg(Argument::length('Y', start.y))
                        .with_comment("Rapid to pass start"),
                );
            }

            block.push(
                GCodeLine::words(vec![Argument::feed(p.plunge_feed(), feed_decimals)])
                    .with_comment("Plunge Feed"),
            );
            block.push(
                GCodeLine::command("G1")
                    .arg(Argument::length('Z', p.depth_of_cut()))
                    .with_comment("Plunge to depth"),
            );
            block.push(
                GCodeLine::words(vec![Argument::feed(p.cut_feed(), feed_decimals)])
                    .with_comment("Cut Feed"),
            );
            block.push(
                GCodeLine::command("G1")
                    .arg(Argument::length('X', end.x))
                    .with_comment(format!("To go X{}", format_number(end.x, LENGTH_DECIMALS))),
            );
            block.push(
                GCodeLine::command("G1")
                    .arg(Argument::length('Y', end.y))
                    .with_comment(format!("To go Y{}", format_number(end.y, LENGTH_DECIMALS))),
            );
            block.push(
                GCodeLine::command("G0")
                    .arg(Argument::length('Z', p.safe_z()))
                    .with_comment("Safe Z"),
            );
        }

        block
    }

    fn end_block(&self) -> Vec<GCodeLine> {
        let mut block = vec![
            GCodeLine::command("G0")
                .arg(Argument::length('Z', self.params.safe_z()))
                .with_comment("Safe Z"),
            GCodeLine::command("M5").with_comment("Spindle Stop"),
            GCodeLine::command("M30").with_comment("End & Rewind"),
        ];

        if self.options.section_markers {
            block.push(GCodeLine::comment("===Main End==="));
        }

        block
    }

    fn parameter_echo(&self, geometry: &SlotGeometry) -> Vec<GCodeLine> {
        let p = &self.params;
        let feed = |v: f64| format_number(v, self.options.feed_decimals);
        let len = |v: f64| format_number(v, LENGTH_DECIMALS);

        let entries = [
            ("Start depth", len(p.start_depth())),
            ("Depth of cut", len(p.depth_of_cut())),
            ("Safe Z", len(p.safe_z())),
            ("Slot width", len(p.slot_width())),
            ("Start X", len(p.start().x)),
            ("Start Y", len(p.start().y)),
            ("End X", len(p.end().x)),
            ("End Y", len(p.end().y)),
            ("Cut feed", feed(p.cut_feed())),
            ("Plunge feed", feed(p.plunge_feed())),
            ("Cutter diameter", len(p.cutter_diameter())),
            ("Stepover width", len(p.stepover_width())),
            ("Spindle speed", format_number(p.spindle_speed(), 0)),
        ];

        let mut lines = vec![GCodeLine::comment("===Input Variables===")];
        lines.extend(
            entries
                .iter()
                .map(|(name, value)| GCodeLine::comment(format!("{} = {}", name, value))),
        );

        lines.push(GCodeLine::comment("===Slot Geometry==="));
        lines.push(GCodeLine::comment(format!("Slot length = {}", len(geometry.length))));
        lines.push(GCodeLine::comment(format!(
            "Approach angle = {}",
            len(geometry.abs_angle)
        )));
        lines.push(GCodeLine::comment(format!(
            "Stepovers = {}{}",
            geometry.stepover_count,
            if geometry.has_leftover {
                " + leftover"
            } else {
                ""
            }
        )));
        lines.push(GCodeLine::comment(format!("Arc radius = {}", len(geometry.arc_radius))));
        if self.options.side != SideOfTravel::Centre {
            lines.push(GCodeLine::comment(format!(
                "Side of travel = {} + {}",
                self.options.side,
                len(self.options.side_allowance)
            )));
        }

        lines
    }
}
