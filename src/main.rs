//! CLI entry point for splitting images into tiles and stitching them back

use clap::Parser;
use tilestitch::io::cli::{BatchProcessor, Cli};
use tilestitch::io::logging::setup_logging;

fn main() -> tilestitch::Result<()> {
    let cli = Cli::parse();
    let _logger = setup_logging(&cli.log_level, cli.log_dir.as_deref())?;
    let processor = BatchProcessor::new(cli)?;
    processor.process().map(|_| ())
}
