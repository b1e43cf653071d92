//! Command-line interface
//!
//! Settings are layered: built-in defaults, then the config file, then flags.

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use slotmill_camtools::{EmitOutcome, SideOfTravel, SlotMillingGenerator};
use slotmill_core::{ToolpathParametersBuilder, Units};
use slotmill_settings::{Config, OutputTarget};
use std::path::PathBuf;
use tracing::{debug, info};

type Setter = fn(ToolpathParametersBuilder, f64) -> ToolpathParametersBuilder;

/// Generate G-code for milling a straight slot
#[derive(Parser, Debug, Clone, Default)]
#[command(
    version,
    long_version = crate::LONG_VERSION,
    about,
    long_about = None,
    allow_negative_numbers = true
)]
pub struct Cli {
    /// Configuration file (TOML or JSON)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print the program to stdout
    #[arg(long, conflicts_with = "output_dir")]
    pub console: bool,

    /// Write the program into this directory
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// File name to write instead of a yyyyMMdd-HHmmss.txt timestamp
    #[arg(long, value_name = "NAME")]
    pub file_name: Option<String>,

    /// Slot start X
    #[arg(long)]
    pub start_x: Option<f64>,

    /// Slot start Y
    #[arg(long)]
    pub start_y: Option<f64>,

    /// Slot end X
    #[arg(long)]
    pub end_x: Option<f64>,

    /// Slot end Y
    #[arg(long)]
    pub end_y: Option<f64>,

    /// Z of the stock surface
    #[arg(long)]
    pub start_depth: Option<f64>,

    /// Absolute Z of the slot floor (negative is below the stock)
    #[arg(long)]
    pub depth: Option<f64>,

    /// Clearance height for rapid moves
    #[arg(long)]
    pub safe_z: Option<f64>,

    /// Width of the slot
    #[arg(long)]
    pub slot_width: Option<f64>,

    /// Cutter diameter
    #[arg(long)]
    pub cutter_diameter: Option<f64>,

    /// Stepover width between passes
    #[arg(long)]
    pub stepover: Option<f64>,

    /// Feed rate for cutting moves
    #[arg(long)]
    pub cut_feed: Option<f64>,

    /// Feed rate for plunges
    #[arg(long)]
    pub plunge_feed: Option<f64>,

    /// Spindle speed (RPM)
    #[arg(long)]
    pub spindle_speed: Option<f64>,

    /// Unit system of the program (mm or inch)
    #[arg(long)]
    pub units: Option<Units>,

    /// Run the cutter right or left of the programmed line, or on it (centre)
    #[arg(long, value_name = "SIDE")]
    pub side: Option<SideOfTravel>,

    /// Extra sideways distance when running right or left of the line
    #[arg(long, value_name = "DIST")]
    pub side_allowance: Option<f64>,

    /// Emit only the primary pass
    #[arg(long)]
    pub single_pass: bool,

    /// Do not echo input parameters as comments
    #[arg(long)]
    pub no_echo: bool,

    /// Save the effective configuration to FILE and exit
    #[arg(long, value_name = "FILE")]
    pub write_config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Log as JSON lines
    #[arg(long)]
    pub log_json: bool,
}

/// What a CLI run produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The effective configuration was saved
    ConfigWritten(PathBuf),
    /// A program was generated and emitted
    Emitted(EmitOutcome),
}

impl Cli {
    /// Log level selected by `-v` flags
    pub fn log_level(&self) -> tracing::Level {
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            _ => tracing::Level::DEBUG,
        }
    }

    /// Load the config file (if any) and apply flag overrides
    pub fn resolve_config(&self) -> Result<Config> {
        let mut config = Config::load_or_default(self.config.as_deref())
            .context("Failed to load configuration")?;

        let mut toolpath = config.toolpath.clone();
        let overrides: [(Option<f64>, Setter); 13] = [
            (self.start_x, ToolpathParametersBuilder::start_x),
            (self.start_y, ToolpathParametersBuilder::start_y),
            (self.end_x, ToolpathParametersBuilder::end_x),
            (self.end_y, ToolpathParametersBuilder::end_y),
            (self.start_depth, ToolpathParametersBuilder::start_depth),
            (self.depth, ToolpathParametersBuilder::depth_of_cut),
            (self.safe_z, ToolpathParametersBuilder::safe_z),
            (self.slot_width, ToolpathParametersBuilder::slot_width),
            (self.cutter_diameter, ToolpathParametersBuilder::cutter_diameter),
            (self.stepover, ToolpathParametersBuilder::stepover_width),
            (self.cut_feed, ToolpathParametersBuilder::cut_feed),
            (self.plunge_feed, ToolpathParametersBuilder::plunge_feed),
            (self.spindle_speed, ToolpathParametersBuilder::spindle_speed),
        ];
        for (value, apply) in overrides {
            if let Some(value) = value {
                toolpath = apply(toolpath, value);
            }
        }
        config.toolpath = toolpath;

        if let Some(units) = self.units {
            config.program.units = units;
        }
        if let Some(side) = self.side {
            config.program.side = side;
        }
        if let Some(allowance) = self.side_allowance {
            config.program.side_allowance = allowance;
        }
        if self.single_pass {
            config.program.multi_pass = false;
        }
        if self.no_echo {
            config.program.echo_parameters = false;
        }

        if self.console {
            config.output.target = OutputTarget::Console;
        }
        if let Some(dir) = &self.output_dir {
            config.output.target = OutputTarget::File;
            config.output.directory = dir.clone();
        }
        if let Some(name) = &self.file_name {
            config.output.file_name = Some(name.clone());
        }

        config.validate().context("Invalid configuration")?;
        Ok(config)
    }
}

/// Run the CLI: resolve settings, generate the program and emit it
pub fn run(cli: &Cli) -> Result<RunOutcome> {
    let config = cli.resolve_config()?;

    if let Some(path) = &cli.write_config {
        config
            .save_to_file(path)
            .with_context(|| format!("Failed to write configuration: {}", path.display()))?;
        info!(path = %path.display(), "Configuration saved");
        return Ok(RunOutcome::ConfigWritten(path.clone()));
    }

    let params = config.to_parameters()?;
    let generator = SlotMillingGenerator::new(params).with_options(config.program.clone());
    let program = generator.generate().context("Failed to generate toolpath")?;
    debug!(lines = program.line_count(), "Program assembled");

    let mut emitter = config.output.emitter();
    let outcome = emitter.emit(&program).context("Failed to emit program")?;
    Ok(RunOutcome::Emitted(outcome))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "slotmill",
            "--end-x",
            "-20",
            "--end-y",
            "5.5",
            "--depth",
            "-1.2",
            "--units",
            "inch",
            "--single-pass",
        ])
        .unwrap();

        let config = cli.resolve_config().unwrap();
        let params = config.to_parameters().unwrap();
        assert_eq!(params.end().x, -20.0);
        assert_eq!(params.end().y, 5.5);
        assert_eq!(params.depth_of_cut(), -1.2);
        assert_eq!(config.program.units, Units::Inch);
        assert!(!config.program.multi_pass);
        assert_eq!(config.output.target, OutputTarget::Console);
    }

    #[test]
    fn test_console_conflicts_with_output_dir() {
        let result = Cli::try_parse_from(["slotmill", "--console", "--output-dir", "out"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_run_writes_program_file() {
        let dir = TempDir::new().unwrap();
        let dir_arg = dir.path().to_string_lossy().to_string();
        let cli = Cli::try_parse_from([
            "slotmill",
            "--output-dir",
            dir_arg.as_str(),
            "--file-name",
            "slot.txt",
            "--end-x",
            "3",
            "--end-y",
            "0",
            "--stepover",
            "1",
        ])
        .unwrap();

        let outcome = run(&cli).unwrap();
        let path = dir.path().join("slot.txt");
        assert!(matches!(
            outcome,
            RunOutcome::Emitted(EmitOutcome::Written { path: ref p, .. }) if *p == path
        ));

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("M3 S2900"));
        assert!(text.contains("G0 Z1.000"));
        assert!(text.contains("(Pass 4 of 4)"));
        assert!(text.contains("\r\n"));
    }

    #[test]
    fn test_invalid_parameters_create_no_file() {
        let dir = TempDir::new().unwrap();
        let dir_arg = dir.path().to_string_lossy().to_string();
        let cli = Cli::try_parse_from([
            "slotmill",
            "--output-dir",
            dir_arg.as_str(),
            "--stepover",
            "0",
        ])
        .unwrap();

        let err = run(&cli).unwrap_err();
        assert!(format!("{:#}", err).contains("Invalid stepover width"));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_write_config_then_load_it() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("job.toml");
        let config_arg = config_path.to_string_lossy().to_string();

        let cli = Cli::try_parse_from([
            "slotmill",
            "--spindle-speed",
            "12000",
            "--write-config",
            config_arg.as_str(),
        ])
        .unwrap();
        assert_eq!(
            run(&cli).unwrap(),
            RunOutcome::ConfigWritten(config_path.clone())
        );

        let saved = Config::load_from_file(&config_path).unwrap();
        assert_eq!(saved.to_parameters().unwrap().spindle_speed(), 12000.0);

        // Flags still win over the file
        let cli = Cli::try_parse_from([
            "slotmill",
            "--config",
            config_arg.as_str(),
            "--spindle-speed",
            "8000",
        ])
        .unwrap();
        let config = cli.resolve_config().unwrap();
        assert_eq!(config.to_parameters().unwrap().spindle_speed(), 8000.0);
    }

    #[test]
    fn test_verbosity_levels() {
        let cli = Cli::try_parse_from(["slotmill"]).unwrap();
        assert_eq!(cli.log_level(), tracing::Level::WARN);
        let cli = Cli::try_parse_from(["slotmill", "-vv"]).unwrap();
        assert_eq!(cli.log_level(), tracing::Level::DEBUG);
    }

    #[test]
    fn test_side_flags() {
        let cli = Cli::try_parse_from([
            "slotmill",
            "--side",
            "left",
            "--side-allowance",
            "-0.05",
        ])
        .unwrap();
        let config = cli.resolve_config().unwrap();
        assert_eq!(config.program.side, SideOfTravel::Left);
        assert_eq!(config.program.side_allowance, -0.05);

        assert!(Cli::try_parse_from(["slotmill", "--side", "up"]).is_err());
    }

    #[test]
    fn test_unreachable_pass_count_is_reported() {
        let dir = TempDir::new().unwrap();
        let dir_arg = dir.path().to_string_lossy().to_string();
        let cli = Cli::try_parse_from([
            "slotmill",
            "--output-dir",
            dir_arg.as_str(),
            "--stepover",
            "0.000000001",
        ])
        .unwrap();

        let err = run(&cli).unwrap_err();
        assert!(format!("{:#}", err).contains("Too many passes"));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
