//! Per-unit split and stitch jobs over the filesystem
//!
//! A unit is one source image (split) or one tile folder (stitch). Units are
//! independent: a failing unit is logged and reported, never fatal to the
//! rest of the batch.

use crate::algorithm::split::split_with_plan;
use crate::algorithm::stitch::Stitcher;
use crate::io::configuration::has_supported_extension;
use crate::io::error::{Result, TilingError, file_system, invalid_configuration};
use crate::io::image::{load_rgb, save_rgb};
use crate::io::manifest::{ManifestTile, TileManifest};
use crate::io::naming::{TileId, coord_from_path, reconstructed_file_name};
use crate::io::progress::ProgressManager;
use crate::math::window::BlendRamp;
use crate::spatial::grid::{GridCoord, TileGeometry};
use crate::spatial::tiles::TilePlan;
use log::{debug, info, warn};
use rayon::prelude::*;
use std::collections::{BTreeMap, HashMap};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Settings for splitting source images
#[derive(Debug, Clone)]
pub struct SplitOptions {
    /// Validated tiling geometry
    pub geometry: TileGeometry,
    /// Extension (and encoder) of written tiles
    pub extension: String,
    /// Whether to write the sidecar manifest
    pub write_manifest: bool,
}

/// Settings for stitching tile folders
#[derive(Debug, Clone)]
pub struct StitchOptions {
    /// Validated tiling geometry, must match the split
    pub geometry: TileGeometry,
    /// Blend ramp profile
    pub ramp: BlendRamp,
    /// Extension (and encoder) of the reconstructed image
    pub extension: String,
}

/// Result of splitting one source image
#[derive(Debug, Clone)]
pub struct SplitOutcome {
    /// Folder the tiles were written to
    pub output_dir: PathBuf,
    /// Number of tiles written
    pub tiles_written: usize,
    /// Grid cells dropped as trailing slivers
    pub discarded: usize,
}

/// Result of stitching one tile folder
#[derive(Debug, Clone)]
pub struct StitchOutcome {
    /// Path of the reconstructed image
    pub output: PathBuf,
    /// Tiles blended into the canvas
    pub tiles_used: usize,
    /// Tiles listed or named correctly but unreadable
    pub tiles_skipped: usize,
    /// Canvas (height, width)
    pub canvas: (usize, usize),
}

/// Aggregate counts over a batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Units that completed
    pub succeeded: usize,
    /// Units that failed or produced no output
    pub failed: usize,
    /// Tiles written (split) or blended (stitch) over all units
    pub tiles: usize,
}

/// Collect split sources from a single image file or a directory of images
///
/// # Errors
///
/// Returns an error if the target is neither a supported image nor a
/// readable directory, or if two images in the directory share a stem.
pub fn collect_sources(target: &Path) -> Result<Vec<PathBuf>> {
    if target.is_file() {
        if has_supported_extension(target) {
            Ok(vec![target.to_path_buf()])
        } else {
            Err(invalid_configuration(
                "target",
                &target.display(),
                &"must be a .png, .jpg or .jpeg image",
            ))
        }
    } else if target.is_dir() {
        let entries =
            std::fs::read_dir(target).map_err(|e| file_system(target, "read directory", e))?;
        let mut files = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|e| file_system(target, "read directory", e))?
                .path();
            if path.is_file() && has_supported_extension(&path) {
                files.push(path);
            }
        }
        files.sort();
        reject_shared_stems(&files)?;
        Ok(files)
    } else {
        Err(invalid_configuration(
            "target",
            &target.display(),
            &"must be an image file or a directory",
        ))
    }
}

// Sources with the same stem would write into the same tile folder
fn reject_shared_stems(files: &[PathBuf]) -> Result<()> {
    let mut seen: HashMap<OsString, &Path> = HashMap::new();
    for file in files {
        let stem = file.file_stem().unwrap_or_default().to_os_string();
        if let Some(previous) = seen.insert(stem, file.as_path()) {
            return Err(invalid_configuration(
                "target",
                &file.display(),
                &format!(
                    "shares its output folder with '{}'; rename one of them",
                    previous.display()
                ),
            ));
        }
    }
    Ok(())
}

/// Collect stitch units below a tiles root
///
/// Every subdirectory is one unit. A root without subdirectories is itself
/// treated as a single unit.
///
/// # Errors
///
/// Returns `FileSystem` if the root cannot be read.
pub fn collect_units(root: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(root).map_err(|e| file_system(root, "read directory", e))?;
    let mut units = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|e| file_system(root, "read directory", e))?
            .path();
        if path.is_dir() {
            units.push(path);
        }
    }

    if units.is_empty() {
        units.push(root.to_path_buf());
    }
    units.sort();
    Ok(units)
}

/// Split one source image and write its tiles to `<output_root>/<stem>/`
///
/// # Errors
///
/// Returns `InvalidImage` if the source cannot be decoded, or an export
/// error if a tile or the manifest cannot be written.
pub fn split_file(
    input: &Path,
    output_root: &Path,
    options: &SplitOptions,
) -> Result<SplitOutcome> {
    let image = load_rgb(input)?;
    let stem = input
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();
    let output_dir = output_root.join(&stem);
    std::fs::create_dir_all(&output_dir)
        .map_err(|e| file_system(&output_dir, "create directory", e))?;

    let (height, width) = (image.height() as usize, image.width() as usize);
    let plan = TilePlan::new(&options.geometry, height, width);
    debug!(
        "{}: {}x{} grid, {} slivers dropped, {} pixels uncovered",
        input.display(),
        plan.grid_extent().0,
        plan.grid_extent().1,
        plan.discarded(),
        plan.uncovered_pixels()
    );

    let source_name = input
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();
    let mut manifest = TileManifest::new(source_name, height, width, &options.geometry);

    for tile in split_with_plan(&image, &plan) {
        let file = TileId::new(stem.as_str(), tile.coord).file_name(&options.extension);
        save_rgb(&tile.pixels, &output_dir.join(&file))?;
        manifest.tiles.push(ManifestTile {
            coord: tile.coord,
            file,
            height: tile.region.height,
            width: tile.region.width,
        });
    }

    if options.write_manifest {
        manifest.write_to(&output_dir)?;
    }

    Ok(SplitOutcome {
        output_dir,
        tiles_written: manifest.tiles.len(),
        discarded: plan.discarded(),
    })
}

// Supported raster files of a folder carrying a grid tag, sorted
fn tagged_files(folder: &Path) -> Result<Vec<(GridCoord, PathBuf)>> {
    let entries =
        std::fs::read_dir(folder).map_err(|e| file_system(folder, "read directory", e))?;
    let mut tiles = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|e| file_system(folder, "read directory", e))?
            .path();
        if !path.is_file() || !has_supported_extension(&path) {
            continue;
        }
        match coord_from_path(&path) {
            Some(coord) => tiles.push((coord, path)),
            None => debug!("Ignoring untagged file: {}", path.display()),
        }
    }
    tiles.sort();
    Ok(tiles)
}

// Tiles of a unit as (grid coordinate, file path), sorted by coordinate
//
// With a manifest, its coordinates define the unit. A listed file that is
// gone (e.g. re-encoded to another extension) is replaced by a tagged file
// with the same coordinate.
fn unit_tiles(folder: &Path, geometry: &TileGeometry) -> Result<Vec<(GridCoord, PathBuf)>> {
    let Some(manifest) = TileManifest::read_from(folder)? else {
        return tagged_files(folder);
    };
    manifest.ensure_matches(geometry)?;

    let mut tagged: BTreeMap<GridCoord, PathBuf> = tagged_files(folder)?.into_iter().collect();
    let mut tiles = Vec::with_capacity(manifest.tiles.len());
    for entry in &manifest.tiles {
        let listed = folder.join(&entry.file);
        if listed.is_file() {
            tiles.push((entry.coord, listed));
        } else if let Some(path) = tagged.remove(&entry.coord) {
            debug!("Using {} for listed tile {}", path.display(), entry.file);
            tiles.push((entry.coord, path));
        } else {
            warn!("Manifest lists missing tile: {}", listed.display());
        }
    }

    tiles.sort();
    Ok(tiles)
}

/// Reconstruct one tile folder into `<output_dir>/reconstructed_<folder>.<ext>`
///
/// Unreadable tiles are skipped with a warning. The canvas is sized from the
/// grid coordinates of every listed tile, readable or not.
///
/// # Errors
///
/// Returns `EmptyInput` if the folder yields no usable tile, or
/// `InvalidConfiguration` if its manifest disagrees with the stitch
/// geometry.
pub fn stitch_folder(
    folder: &Path,
    output_dir: &Path,
    options: &StitchOptions,
) -> Result<StitchOutcome> {
    let folder_name = folder
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();
    let tiles = unit_tiles(folder, &options.geometry)?;

    let mut stitcher = Stitcher::for_coords(
        options.geometry,
        tiles.iter().map(|(coord, _)| *coord),
        options.ramp,
        &folder_name,
    )?;

    let mut tiles_skipped = 0;
    for (coord, path) in &tiles {
        match load_rgb(path) {
            Ok(tile) => stitcher.add_tile(*coord, &tile)?,
            Err(e) => {
                warn!("Could not read tile: {e}");
                tiles_skipped += 1;
            }
        }
    }

    if stitcher.tiles_used() == 0 {
        return Err(TilingError::EmptyInput { unit: folder_name });
    }

    let tiles_used = stitcher.tiles_used();
    let canvas = stitcher.canvas_dimensions();
    let output = output_dir.join(reconstructed_file_name(&folder_name, &options.extension));
    save_rgb(&stitcher.finish(), &output)?;

    Ok(StitchOutcome {
        output,
        tiles_used,
        tiles_skipped,
        canvas,
    })
}

/// Run `job` over every unit on a worker pool of `jobs` threads
///
/// Failures are logged per unit and counted; they never abort the batch.
/// `report` is called for each successful unit and returns its tile count.
///
/// # Errors
///
/// Returns `InvalidConfiguration` if the worker pool cannot be built.
pub fn run_batch<T, F, C>(
    units: &[PathBuf],
    jobs: Option<usize>,
    progress: &ProgressManager,
    job: F,
    report: C,
) -> Result<BatchSummary>
where
    T: Send,
    F: Fn(&Path) -> Result<T> + Sync,
    C: Fn(&Path, &T) -> usize + Sync,
{
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(threads) = jobs {
        builder = builder.num_threads(threads);
    }
    let pool = builder
        .build()
        .map_err(|e| invalid_configuration("jobs", &jobs.unwrap_or_default(), &e))?;

    let results: Vec<Option<usize>> = pool.install(|| {
        units
            .par_iter()
            .map(|unit| match job(unit) {
                Ok(outcome) => {
                    let tiles = report(unit, &outcome);
                    progress.complete_unit(unit, tiles);
                    Some(tiles)
                }
                Err(TilingError::EmptyInput { unit: name }) => {
                    warn!("No valid tiles found in {name}");
                    progress.skip_unit(unit);
                    None
                }
                Err(e) => {
                    warn!("Skipping {}: {e}", unit.display());
                    progress.skip_unit(unit);
                    None
                }
            })
            .collect()
    });

    let summary = results.iter().fold(BatchSummary::default(), |mut acc, result| {
        match result {
            Some(tiles) => {
                acc.succeeded += 1;
                acc.tiles += tiles;
            }
            None => acc.failed += 1,
        }
        acc
    });

    info!(
        "Processed {} of {} units ({} failed)",
        summary.succeeded,
        units.len(),
        summary.failed
    );
    Ok(summary)
}
