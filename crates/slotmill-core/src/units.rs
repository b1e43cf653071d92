//! Program unit system
//!
//! Selects the G-code units word written in the start block. Values are never
//! converted: parameters are interpreted in the selected unit system.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unit system of a generated program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    /// Millimeters (G21)
    #[default]
    Mm,
    /// Inches (G20)
    Inch,
}

impl Units {
    /// The G-code word selecting this unit system
    pub fn gcode(&self) -> &'static str {
        match self {
            Self::Mm => "G21",
            Self::Inch => "G20",
        }
    }

    /// Human-readable label used in generated comments
    pub fn label(&self) -> &'static str {
        match self {
            Self::Mm => "mm",
            Self::Inch => "inch",
        }
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Units {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mm" | "metric" | "g21" => Ok(Self::Mm),
            "inch" | "in" | "imperial" | "g20" => Ok(Self::Inch),
            _ => Err(format!("Unknown unit system: {}", s)),
        }
    }
}
