use clap::Parser;
use slotmill::cli::{run, Cli};
use slotmill::init_logging;
use tracing::info;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.log_level(), cli.log_json)?;
    info!(version = slotmill::VERSION, built = slotmill::BUILD_DATE, "Starting SlotMill");

    run(&cli)?;

    Ok(())
}
