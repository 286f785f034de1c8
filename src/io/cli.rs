//! Command-line interface for batch splitting and stitching

use crate::io::batch::{
    BatchSummary, SplitOptions, SplitOutcome, StitchOptions, collect_sources, collect_units,
    run_batch, split_file, stitch_folder,
};
use crate::io::configuration::{
    DEFAULT_LOG_LEVEL, DEFAULT_OVERLAP, DEFAULT_SPLIT_OUTPUT, DEFAULT_STITCH_OUTPUT,
    DEFAULT_TILE_EXTENSION, DEFAULT_TILE_SIZE,
};
use crate::io::error::{Result, file_system, invalid_configuration};
use crate::io::progress::ProgressManager;
use crate::math::window::BlendRamp;
use crate::spatial::grid::TileGeometry;
use clap::{Args, Parser, Subcommand};
use log::info;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "tilestitch")]
#[command(
    author,
    version,
    about = "Split images into overlapping tiles and stitch processed tiles back together"
)]
/// Command-line arguments for the tiling tool
pub struct Cli {
    /// Operation to run
    #[command(subcommand)]
    pub command: Command,

    /// Suppress progress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Number of worker threads (defaults to one per core)
    #[arg(short, long, global = true)]
    pub jobs: Option<usize>,

    /// Log specification, e.g. `info` or `debug`
    #[arg(long, global = true, default_value = DEFAULT_LOG_LEVEL)]
    pub log_level: String,

    /// Also write rotated log files into this directory
    #[arg(long, global = true, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,
}

/// Available operations
#[derive(Subcommand)]
pub enum Command {
    /// Split images into overlapping grid tiles
    Split(SplitArgs),
    /// Reassemble tile folders into full images
    Stitch(StitchArgs),
}

/// Tiling parameters shared by both operations; they must match between
/// the split and the stitch of the same images
#[derive(Args, Debug, Clone)]
pub struct TilingArgs {
    /// Tile edge length in pixels
    #[arg(short = 't', long, default_value_t = DEFAULT_TILE_SIZE)]
    pub tile_size: u32,

    /// Fraction of the tile edge shared with each neighbour, in [0, 1)
    #[arg(short = 'f', long, default_value_t = DEFAULT_OVERLAP)]
    pub overlap: f64,
}

impl TilingArgs {
    /// Validate the parameters into a tiling geometry
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` for a non-positive tile size or an
    /// overlap outside `[0, 1)`.
    pub fn geometry(&self) -> Result<TileGeometry> {
        TileGeometry::new(self.tile_size, self.overlap)
    }
}

/// Arguments of the `split` operation
#[derive(Args, Debug, Clone)]
pub struct SplitArgs {
    /// Image file or directory of images to split
    #[arg(value_name = "TARGET")]
    pub target: PathBuf,

    /// Root folder receiving one tile folder per image
    #[arg(short, long, default_value = DEFAULT_SPLIT_OUTPUT)]
    pub output: PathBuf,

    #[command(flatten)]
    /// Tiling parameters
    pub tiling: TilingArgs,

    /// Image format of written tiles, by extension
    #[arg(long, default_value = DEFAULT_TILE_EXTENSION)]
    pub format: String,

    /// Do not write the tiles.json manifest
    #[arg(long)]
    pub no_manifest: bool,
}

/// Arguments of the `stitch` operation
#[derive(Args, Debug, Clone)]
pub struct StitchArgs {
    /// Tiles root holding one folder per image, or a single tile folder
    #[arg(value_name = "TILES_ROOT")]
    pub input: PathBuf,

    /// Folder receiving the reconstructed images
    #[arg(short, long, default_value = DEFAULT_STITCH_OUTPUT)]
    pub output: PathBuf,

    #[command(flatten)]
    /// Tiling parameters
    pub tiling: TilingArgs,

    /// Image format of reconstructed images, by extension
    #[arg(long, default_value = DEFAULT_TILE_EXTENSION)]
    pub format: String,

    /// Sampling of the blend ramp at tile borders
    #[arg(long, value_enum, default_value_t = BlendRamp::Centered)]
    pub ramp: BlendRamp,
}

// Rejects extensions the image encoder cannot write
fn validate_format(format: &str) -> Result<String> {
    let extension = format.trim_start_matches('.').to_ascii_lowercase();
    match image::ImageFormat::from_extension(&extension) {
        Some(kind) if kind.writing_enabled() => Ok(extension),
        _ => Err(invalid_configuration(
            "format",
            &format,
            &"is not a writable image format",
        )),
    }
}

fn report_split(source: &Path, outcome: &SplitOutcome) -> usize {
    info!(
        "{} → {} tiles in {} ({} slivers dropped)",
        source.display(),
        outcome.tiles_written,
        outcome.output_dir.display(),
        outcome.discarded
    );
    outcome.tiles_written
}

enum Job {
    Split {
        target: PathBuf,
        output: PathBuf,
        options: SplitOptions,
    },
    Stitch {
        input: PathBuf,
        output: PathBuf,
        options: StitchOptions,
    },
}

/// Orchestrates a batch run with validated configuration
///
/// All configuration is checked in [`BatchProcessor::new`], so a bad tile
/// size, overlap or format stops the run before any file is touched.
pub struct BatchProcessor {
    job: Job,
    jobs: Option<usize>,
    quiet: bool,
}

impl BatchProcessor {
    /// Validate CLI arguments into a runnable processor
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if the tiling parameters, the output
    /// format or the worker count are invalid.
    pub fn new(cli: Cli) -> Result<Self> {
        if cli.jobs == Some(0) {
            return Err(invalid_configuration(
                "jobs",
                &0,
                &"must be at least one thread",
            ));
        }

        let job = match cli.command {
            Command::Split(args) => Job::Split {
                options: SplitOptions {
                    geometry: args.tiling.geometry()?,
                    extension: validate_format(&args.format)?,
                    write_manifest: !args.no_manifest,
                },
                target: args.target,
                output: args.output,
            },
            Command::Stitch(args) => Job::Stitch {
                options: StitchOptions {
                    geometry: args.tiling.geometry()?,
                    ramp: args.ramp,
                    extension: validate_format(&args.format)?,
                },
                input: args.input,
                output: args.output,
            },
        };

        Ok(Self {
            job,
            jobs: cli.jobs,
            quiet: cli.quiet,
        })
    }

    /// Run the batch and return aggregate counts
    ///
    /// # Errors
    ///
    /// Returns an error only for failures that affect the whole run, such as
    /// an unreadable input root or output directory. Individual images and
    /// folders that fail are logged and counted instead.
    pub fn process(&self) -> Result<BatchSummary> {
        match &self.job {
            Job::Split {
                target,
                output,
                options,
            } => self.split(target, output, options),
            Job::Stitch {
                input,
                output,
                options,
            } => self.stitch(input, output, options),
        }
    }

    fn progress(&self, label: &str, units: usize) -> ProgressManager {
        if self.quiet {
            ProgressManager::hidden()
        } else {
            ProgressManager::new(label, units)
        }
    }

    fn split(&self, target: &Path, output: &Path, options: &SplitOptions) -> Result<BatchSummary> {
        let sources = collect_sources(target)?;
        std::fs::create_dir_all(output).map_err(|e| file_system(output, "create directory", e))?;

        // A single image is the whole run, so its failure is not isolated
        if target.is_file() {
            let outcome = split_file(target, output, options)?;
            let summary = BatchSummary {
                succeeded: 1,
                failed: 0,
                tiles: report_split(target, &outcome),
            };
            info!(
                "Created {} total tiles in '{}'",
                summary.tiles,
                output.display()
            );
            return Ok(summary);
        }

        let progress = self.progress("Images", sources.len());
        let summary = run_batch(
            &sources,
            self.jobs,
            &progress,
            |source| split_file(source, output, options),
            report_split,
        )?;

        let message = format!(
            "Created {} total tiles in '{}'",
            summary.tiles,
            output.display()
        );
        progress.finish(&message);
        info!("{message}");
        Ok(summary)
    }

    fn stitch(&self, input: &Path, output: &Path, options: &StitchOptions) -> Result<BatchSummary> {
        let units = collect_units(input)?;
        std::fs::create_dir_all(output).map_err(|e| file_system(output, "create directory", e))?;

        let progress = self.progress("Folders", units.len());
        let summary = run_batch(
            &units,
            self.jobs,
            &progress,
            |folder| stitch_folder(folder, output, options),
            |folder, outcome| {
                info!(
                    "{} → {} ({} tiles, {} unreadable, {}x{} canvas)",
                    folder.display(),
                    outcome.output.display(),
                    outcome.tiles_used,
                    outcome.tiles_skipped,
                    outcome.canvas.1,
                    outcome.canvas.0
                );
                outcome.tiles_used
            },
        )?;

        let message = format!(
            "Reconstructed {} of {} images from {} tiles",
            summary.succeeded,
            units.len(),
            summary.tiles
        );
        progress.finish(&message);
        info!("{message}");
        Ok(summary)
    }
}
