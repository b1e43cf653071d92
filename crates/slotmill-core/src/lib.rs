//! # SlotMill Core
//!
//! Core types for SlotMill: validated machining parameters, the unit system
//! of a generated program, and the domain error raised when parameters cannot
//! describe a valid slot.

pub mod error;
pub mod params;
pub mod units;

pub use error::{DomainError, DomainResult};
pub use params::{Point2, ToolpathParameters, ToolpathParametersBuilder};
pub use units::Units;
