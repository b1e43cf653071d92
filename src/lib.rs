//! # SlotMill
//!
//! Generates G-code for milling a straight slot from a handful of machining
//! parameters.
//!
//! ## Architecture
//!
//! SlotMill is organized as a workspace with multiple crates:
//!
//! 1. **slotmill-core** - Validated parameters, units, domain errors
//! 2. **slotmill-camtools** - Slot geometry, G-code formatting, block assembly, emitters
//! 3. **slotmill-settings** - TOML/JSON configuration files
//! 4. **slotmill** - Command-line binary that ties the crates together

pub mod cli;

pub use slotmill_camtools::{
    generate, CamToolError, ConsoleEmitter, EmitOutcome, FileEmitter, GCodeLine, GCodeProgram,
    ProgramEmitter, ProgramOptions, SlotGeometry, SlotMillingGenerator,
};
pub use slotmill_core::{DomainError, Point2, ToolpathParameters, ToolpathParametersBuilder, Units};
pub use slotmill_settings::{Config, OutputSettings, OutputTarget, SettingsError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("SLOTMILL_BUILD_DATE");

/// Version string shown by `--version`
pub const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (built ",
    env!("SLOTMILL_BUILD_DATE"),
    ")"
);

/// Initialize logging
///
/// Sets up structured logging with:
/// - Output on stderr, so programs printed to stdout stay clean
/// - RUST_LOG environment variable support; `level` applies only when it is unset
/// - Optional JSON lines instead of human-readable output
pub fn init_logging(level: tracing::Level, json: bool) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let env_filter = log_filter(level, rust_log.as_deref());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true);

    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer.json())
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer.compact())
            .try_init()?;
    }

    Ok(())
}

/// Filter from a RUST_LOG value, falling back to `level` when it is unset,
/// blank or unparsable
fn log_filter(level: tracing::Level, rust_log: Option<&str>) -> tracing_subscriber::EnvFilter {
    use tracing_subscriber::EnvFilter;

    rust_log
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::default().add_directive(level.into()))
}
