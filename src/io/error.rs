//! Error types for split and stitch operations

use crate::spatial::grid::GridCoord;
use std::fmt;
use std::path::PathBuf;

/// Main error type for all tiling operations
#[derive(Debug)]
pub enum TilingError {
    /// Source image or tile could not be read or decoded
    InvalidImage {
        /// Path to the image file
        path: PathBuf,
        /// Underlying image decoding error
        source: image::ImageError,
    },

    /// Tiling parameter validation failed
    InvalidConfiguration {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// Stitch invoked without any usable tile
    EmptyInput {
        /// Name of the reconstruction unit (usually the tile folder)
        unit: String,
    },

    /// Tile file name does not carry a `_y<row>_x<col>.` grid tag
    MalformedTileName {
        /// The offending file name
        name: String,
    },

    /// Tile placement falls outside the allocated canvas
    ///
    /// Occurs when a tile is accumulated whose grid coordinate exceeds the
    /// maximum coordinate the canvas was sized for.
    PlacementOutOfBounds {
        /// Grid coordinate of the rejected tile
        coord: GridCoord,
        /// Canvas dimensions (height, width)
        canvas: (usize, usize),
    },

    /// Grid coordinates imply a canvas larger than the supported maximum
    CanvasTooLarge {
        /// Largest grid coordinate among the tiles
        max: GridCoord,
        /// Maximum canvas edge length in pixels
        limit: usize,
    },

    /// Failed to save an image to disk
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        source: image::ImageError,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Sidecar manifest could not be read, written or parsed
    Manifest {
        /// Path of the manifest file
        path: PathBuf,
        /// Description of the failure
        reason: String,
    },
}

impl fmt::Display for TilingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidImage { path, source } => {
                write!(f, "Invalid image '{}': {source}", path.display())
            }
            Self::InvalidConfiguration {
                parameter,
                value,
                reason,
            } => {
                write!(
                    f,
                    "Invalid configuration '{parameter}' = '{value}': {reason}"
                )
            }
            Self::EmptyInput { unit } => {
                write!(f, "No valid tiles found in '{unit}'")
            }
            Self::MalformedTileName { name } => {
                write!(f, "Tile name '{name}' has no _y<row>_x<col> grid tag")
            }
            Self::PlacementOutOfBounds { coord, canvas } => {
                write!(
                    f,
                    "Tile at row {} col {} falls outside the {}x{} canvas",
                    coord.row, coord.col, canvas.0, canvas.1
                )
            }
            Self::CanvasTooLarge { max, limit } => {
                write!(
                    f,
                    "Tiles up to row {} col {} need a canvas wider than {limit}px",
                    max.row, max.col
                )
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export image to '{}': {source}",
                    path.display()
                )
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
            Self::Manifest { path, reason } => {
                write!(f, "Manifest error in '{}': {reason}", path.display())
            }
        }
    }
}

impl std::error::Error for TilingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidImage { source, .. } | Self::ImageExport { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for tiling results
pub type Result<T> = std::result::Result<T, TilingError>;

impl From<image::ImageError> for TilingError {
    fn from(err: image::ImageError) -> Self {
        Self::InvalidImage {
            path: PathBuf::from("<unknown>"),
            source: err,
        }
    }
}

impl From<std::io::Error> for TilingError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

/// Create an invalid configuration error
pub fn invalid_configuration(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> TilingError {
    TilingError::InvalidConfiguration {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create a file system error bound to a path
pub fn file_system(
    path: impl Into<PathBuf>,
    operation: &'static str,
    source: std::io::Error,
) -> TilingError {
    TilingError::FileSystem {
        path: path.into(),
        operation,
        source,
    }
}
