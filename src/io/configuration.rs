//! Tiling constants and runtime configuration defaults

// Defaults shared by split and stitch; both sides must agree on them
/// Default tile edge length in pixels
pub const DEFAULT_TILE_SIZE: u32 = 512;
/// Default fraction of the tile edge shared with each neighbour
pub const DEFAULT_OVERLAP: f64 = 0.15;

// Trailing fragments narrower than T / divisor are dropped
/// Divisor applied to the tile size to get the minimum emitted extent
pub const MIN_TILE_FRACTION_DIVISOR: u32 = 4;

/// Floor applied to accumulated weights before normalisation
pub const WEIGHT_EPSILON: f32 = 1e-7;

/// Upper bound on the tile edge length
pub const MAX_TILE_SIZE: u32 = 16_384;

// Safety limit to prevent excessive memory allocation
/// Maximum reconstructed canvas edge length in pixels
pub const MAX_CANVAS_DIMENSION: usize = 65_535;

// File naming
/// Extension used for tiles and reconstructions unless overridden
pub const DEFAULT_TILE_EXTENSION: &str = "jpg";
/// Prefix of reconstructed image file names
pub const RECONSTRUCTED_PREFIX: &str = "reconstructed_";
/// Default root folder for split output
pub const DEFAULT_SPLIT_OUTPUT: &str = "split_tiles";
/// Default folder for reconstructed images
pub const DEFAULT_STITCH_OUTPUT: &str = "reconstructed_images";
/// Name of the sidecar manifest written next to split tiles
pub const MANIFEST_FILE_NAME: &str = "tiles.json";
/// Raster extensions accepted as split sources and stitch tiles
pub const SUPPORTED_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

// Progress bar display settings
/// Width of the batch progress bar in characters
pub const PROGRESS_BAR_WIDTH: u16 = 40;

/// Default log specification handed to the logger
pub const DEFAULT_LOG_LEVEL: &str = "info";
/// Size at which log files are rotated
pub const LOG_ROTATE_BYTES: u64 = 1024 * 1024;
/// Number of rotated log files kept on disk
pub const LOG_FILES_KEPT: usize = 5;

/// Check whether a path has one of the supported raster extensions
pub fn has_supported_extension(path: &std::path::Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|supported| ext.eq_ignore_ascii_case(supported))
        })
}
