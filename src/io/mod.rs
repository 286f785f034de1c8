//! Input/output operations, configuration and error handling

/// Per-unit split and stitch jobs and batch execution
pub mod batch;
/// Command-line interface and batch orchestration
pub mod cli;
/// Tiling constants and defaults
pub mod configuration;
/// Error types
pub mod error;
/// Raster loading, saving and float conversion
pub mod image;
/// Logger initialisation
pub mod logging;
/// Sidecar manifest of split tiles
pub mod manifest;
/// Tile file naming and grid tag parsing
pub mod naming;
/// Batch progress display
pub mod progress;
