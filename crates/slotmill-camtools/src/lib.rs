//! # SlotMill CAM Tools
//!
//! Generates G-code for milling a straight slot.
//!
//! ## Pipeline
//!
//! - **Geometry**: slot vector, length, approach angle, stepover plan and arc radius
//! - **Instruction**: formatting of single G-code lines
//! - **Slot Milling**: assembly of the start, body and end blocks
//! - **Emitter**: console and atomic file output of a finished program
//!
//! ```no_run
//! use slotmill_camtools::{generate, ConsoleEmitter, ProgramEmitter};
//! use slotmill_core::ToolpathParameters;
//!
//! let params = ToolpathParameters::builder().end(25.0, 0.0).build()?;
//! let program = generate(&params)?;
//! ConsoleEmitter::stdout().emit(&program)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod emitter;
pub mod error;
pub mod geometry;
pub mod instruction;
pub mod program;
pub mod slot_milling;

pub use emitter::{ConsoleEmitter, EmitOutcome, FileEmitter, ProgramEmitter};
pub use error::{CamToolError, CamToolResult};
pub use geometry::{SideOfTravel, SlotGeometry, MAX_PASS_COUNT};
pub use instruction::{Argument, GCodeLine};
pub use program::{GCodeProgram, SectionKind};
pub use slot_milling::{generate, ProgramOptions, SlotMillingGenerator};
