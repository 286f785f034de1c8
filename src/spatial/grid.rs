//! Tile grid geometry shared by the splitter and the stitcher
//!
//! A grid is fully described by the tile edge length and the overlap
//! fraction. Everything else (pixel overlap, step, grid extents, tile
//! origins, canvas size) is derived here so that both sides of a round trip
//! compute identical placements.

use crate::io::configuration::{MAX_TILE_SIZE, MIN_TILE_FRACTION_DIVISOR};
use crate::io::error::{Result, invalid_configuration};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of a tile in the partition grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCoord {
    /// Zero-based grid row
    pub row: usize,
    /// Zero-based grid column
    pub col: usize,
}

impl GridCoord {
    /// Create a grid coordinate
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Component-wise maximum of two coordinates
    ///
    /// Unlike `Ord::max`, which compares lexicographically, row and column
    /// are maximised independently.
    #[must_use]
    pub fn component_max(self, other: Self) -> Self {
        Self {
            row: self.row.max(other.row),
            col: self.col.max(other.col),
        }
    }
}

impl fmt::Display for GridCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "y{}_x{}", self.row, self.col)
    }
}

/// Pixel rectangle of a tile in source coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileRegion {
    /// Top edge (inclusive)
    pub y: usize,
    /// Left edge (inclusive)
    pub x: usize,
    /// Clipped height
    pub height: usize,
    /// Clipped width
    pub width: usize,
}

impl TileRegion {
    /// Whether a source pixel lies inside the region
    pub const fn contains(&self, y: usize, x: usize) -> bool {
        y >= self.y && y < self.y + self.height && x >= self.x && x < self.x + self.width
    }
}

/// Validated tiling parameters
///
/// Construction is the only place tile size and overlap are checked, so any
/// `TileGeometry` value is safe to split or stitch with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileGeometry {
    tile_size: usize,
    overlap: f64,
    overlap_px: usize,
    step: usize,
}

impl TileGeometry {
    /// Build the geometry for tile size `T` and overlap fraction `f`
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if:
    /// - `tile_size` is zero or exceeds the supported maximum
    /// - `overlap` is not finite or lies outside `[0, 1)`
    /// - the resulting step size is not positive
    pub fn new(tile_size: u32, overlap: f64) -> Result<Self> {
        if tile_size == 0 {
            return Err(invalid_configuration(
                "tile_size",
                &tile_size,
                &"must be positive",
            ));
        }
        if tile_size > MAX_TILE_SIZE {
            return Err(invalid_configuration(
                "tile_size",
                &tile_size,
                &format!("must not exceed {MAX_TILE_SIZE}"),
            ));
        }
        if !overlap.is_finite() || !(0.0..1.0).contains(&overlap) {
            return Err(invalid_configuration(
                "overlap",
                &overlap,
                &"must be a fraction in [0, 1)",
            ));
        }

        let tile_size = tile_size as usize;
        let overlap_px = (tile_size as f64 * overlap).floor() as usize;
        let step = tile_size.saturating_sub(overlap_px);
        if step == 0 {
            return Err(invalid_configuration(
                "overlap",
                &overlap,
                &format!("leaves no step between {tile_size}px tiles"),
            ));
        }

        Ok(Self {
            tile_size,
            overlap,
            overlap_px,
            step,
        })
    }

    /// Tile edge length `T`
    pub const fn tile_size(&self) -> usize {
        self.tile_size
    }

    /// Overlap fraction `f` as supplied
    pub const fn overlap(&self) -> f64 {
        self.overlap
    }

    /// Overlap between neighbouring tiles in pixels, `floor(T * f)`
    pub const fn overlap_px(&self) -> usize {
        self.overlap_px
    }

    /// Distance between neighbouring tile origins, `T - overlap_px`
    pub const fn step(&self) -> usize {
        self.step
    }

    /// Smallest clipped extent a tile may have and still be emitted
    pub const fn min_extent(&self) -> usize {
        self.tile_size / MIN_TILE_FRACTION_DIVISOR as usize
    }

    /// Number of grid rows and columns covering a `height` x `width` source
    pub const fn grid_extent(&self, height: usize, width: usize) -> (usize, usize) {
        (
            height.saturating_sub(self.overlap_px).div_ceil(self.step),
            width.saturating_sub(self.overlap_px).div_ceil(self.step),
        )
    }

    /// Top-left corner of a tile in source (or canvas) pixels
    pub const fn origin(&self, coord: GridCoord) -> (usize, usize) {
        (coord.row * self.step, coord.col * self.step)
    }

    /// Clipped region of a tile within a `height` x `width` source
    ///
    /// Returns `None` when the clipped tile is a sliver smaller than
    /// [`Self::min_extent`] in either dimension.
    pub fn region(&self, coord: GridCoord, height: usize, width: usize) -> Option<TileRegion> {
        let (y, x) = self.origin(coord);
        let tile_height = (y + self.tile_size).min(height).saturating_sub(y);
        let tile_width = (x + self.tile_size).min(width).saturating_sub(x);
        let min_extent = self.min_extent();

        (tile_height >= min_extent && tile_width >= min_extent && tile_height > 0 && tile_width > 0)
            .then_some(TileRegion {
                y,
                x,
                height: tile_height,
                width: tile_width,
            })
    }

    /// Canvas (height, width) needed to place tiles up to `max`
    ///
    /// Returns `None` if the size overflows `usize`.
    pub fn canvas_dimensions(&self, max: GridCoord) -> Option<(usize, usize)> {
        let extent = |index: usize| {
            index
                .checked_mul(self.step)
                .and_then(|offset| offset.checked_add(self.tile_size))
        };
        Some((extent(max.row)?, extent(max.col)?))
    }
}
