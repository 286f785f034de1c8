//! Tile plans: which grid cells of a source image are emitted
//!
//! A plan is computed from the source dimensions alone, before any pixel is
//! touched, so it can be inspected (coverage, counts) and reused for the
//! actual cropping.

use bitvec::prelude::{BitVec, bitvec};

use crate::spatial::grid::{GridCoord, TileGeometry, TileRegion};

/// A single planned tile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannedTile {
    /// Grid coordinate of the tile
    pub coord: GridCoord,
    /// Clipped source region
    pub region: TileRegion,
}

/// Ordered set of tiles covering a source image
///
/// Tiles are stored in row-major order. Trailing fragments below the minimum
/// extent are already filtered out.
#[derive(Debug, Clone)]
pub struct TilePlan {
    height: usize,
    width: usize,
    rows: usize,
    cols: usize,
    tiles: Vec<PlannedTile>,
}

impl TilePlan {
    /// Plan the tiles for a `height` x `width` source
    pub fn new(geometry: &TileGeometry, height: usize, width: usize) -> Self {
        let (rows, cols) = geometry.grid_extent(height, width);

        let mut tiles = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            for col in 0..cols {
                let coord = GridCoord::new(row, col);
                if let Some(region) = geometry.region(coord, height, width) {
                    tiles.push(PlannedTile { coord, region });
                }
            }
        }

        Self {
            height,
            width,
            rows,
            cols,
            tiles,
        }
    }

    /// Planned tiles in row-major order
    pub fn tiles(&self) -> &[PlannedTile] {
        &self.tiles
    }

    /// Grid extent (rows, cols) before sliver filtering
    pub const fn grid_extent(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Number of grid cells dropped as slivers
    pub const fn discarded(&self) -> usize {
        (self.rows * self.cols).saturating_sub(self.tiles.len())
    }

    /// Source dimensions (height, width) the plan was computed for
    pub const fn source_dimensions(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    /// Row-major mask of source pixels covered by at least one planned tile
    pub fn coverage(&self) -> BitVec {
        let mut mask = bitvec![0; self.height * self.width];
        for tile in &self.tiles {
            let region = tile.region;
            for y in region.y..region.y + region.height {
                let start = y * self.width + region.x;
                if let Some(span) = mask.get_mut(start..start + region.width) {
                    span.fill(true);
                }
            }
        }
        mask
    }

    /// Number of source pixels no planned tile covers
    pub fn uncovered_pixels(&self) -> usize {
        self.coverage().count_zeros()
    }
}
