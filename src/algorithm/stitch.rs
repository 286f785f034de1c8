//! Reassembling tiles into a canvas with weighted seam blending
//!
//! Every tile is multiplied by the shared blend window and added into a float
//! canvas, while the window itself is added into a weight accumulator. The
//! final image is the canvas divided by the accumulated weight, so
//! overlapping tiles contribute in proportion to their distance from their
//! own borders.

use crate::io::configuration::{MAX_CANVAS_DIMENSION, WEIGHT_EPSILON};
use crate::io::error::{Result, TilingError};
use crate::io::image::{from_unit_array, to_unit_array};
use crate::math::window::{BlendRamp, BlendWindow};
use crate::spatial::grid::{GridCoord, TileGeometry};
use image::RgbImage;
use image::imageops::{FilterType, resize};
use ndarray::{Array2, Array3, Axis, Zip, s};

/// Resampling filter applied to tiles whose size no longer matches `T`
pub const RESIZE_FILTER: FilterType = FilterType::Triangle;

/// Accumulates tiles of one reconstruction unit
///
/// Owns the canvas and weight accumulator for a single stitch; tiles are
/// added sequentially and [`Stitcher::finish`] consumes the accumulator.
#[derive(Debug)]
pub struct Stitcher {
    geometry: TileGeometry,
    window: BlendWindow,
    canvas: Array3<f32>,
    weights: Array2<f32>,
    tiles_used: usize,
}

impl Stitcher {
    /// Allocate a stitcher able to place tiles up to grid coordinate `max`
    ///
    /// # Errors
    ///
    /// Returns `CanvasTooLarge` if the implied canvas exceeds the supported
    /// maximum edge length.
    pub fn new(geometry: TileGeometry, max: GridCoord, ramp: BlendRamp) -> Result<Self> {
        let (height, width) = geometry
            .canvas_dimensions(max)
            .filter(|&(h, w)| h <= MAX_CANVAS_DIMENSION && w <= MAX_CANVAS_DIMENSION)
            .ok_or(TilingError::CanvasTooLarge {
                max,
                limit: MAX_CANVAS_DIMENSION,
            })?;

        let tile_size = geometry.tile_size();
        Ok(Self {
            geometry,
            window: BlendWindow::new(tile_size, geometry.overlap_px(), ramp),
            canvas: Array3::zeros((height, width, 3)),
            weights: Array2::zeros((height, width)),
            tiles_used: 0,
        })
    }

    /// Allocate a stitcher sized for the given set of grid coordinates
    ///
    /// # Errors
    ///
    /// Returns `EmptyInput` if `coords` is empty, or `CanvasTooLarge` if the
    /// largest coordinate implies an oversized canvas.
    pub fn for_coords<I>(
        geometry: TileGeometry,
        coords: I,
        ramp: BlendRamp,
        unit: &str,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = GridCoord>,
    {
        let max = coords
            .into_iter()
            .reduce(GridCoord::component_max)
            .ok_or_else(|| TilingError::EmptyInput {
                unit: unit.to_string(),
            })?;
        Self::new(geometry, max, ramp)
    }

    /// Canvas (height, width) in pixels
    pub fn canvas_dimensions(&self) -> (usize, usize) {
        self.weights.dim()
    }

    /// Number of tiles accumulated so far
    pub const fn tiles_used(&self) -> usize {
        self.tiles_used
    }

    /// Blend window shared by all tiles
    pub const fn window(&self) -> &BlendWindow {
        &self.window
    }

    /// Accumulated blend weights before normalisation
    pub const fn accumulated_weights(&self) -> &Array2<f32> {
        &self.weights
    }

    /// Blend a tile into the canvas at its grid placement
    ///
    /// Tiles that are not exactly T x T are resampled to T x T first.
    ///
    /// # Errors
    ///
    /// Returns `PlacementOutOfBounds` if the tile does not fit the canvas
    /// this stitcher was sized for.
    pub fn add_tile(&mut self, coord: GridCoord, tile: &RgbImage) -> Result<()> {
        let tile_size = self.geometry.tile_size();
        let (canvas_height, canvas_width) = self.canvas_dimensions();
        let step = self.geometry.step();
        let fits = |index: usize, extent: usize| {
            index
                .checked_mul(step)
                .filter(|&offset| offset <= extent.saturating_sub(tile_size))
        };

        let (Some(y), Some(x)) = (fits(coord.row, canvas_height), fits(coord.col, canvas_width))
        else {
            return Err(TilingError::PlacementOutOfBounds {
                coord,
                canvas: (canvas_height, canvas_width),
            });
        };

        let side = tile_size as u32;
        let pixels = if tile.dimensions() == (side, side) {
            to_unit_array(tile)
        } else {
            to_unit_array(&resize(tile, side, side, RESIZE_FILTER))
        };

        let window = self.window.weights();
        let window_3d = window.view().insert_axis(Axis(2));

        Zip::from(
            self.canvas
                .slice_mut(s![y..y + tile_size, x..x + tile_size, ..]),
        )
        .and(&pixels)
        .and_broadcast(&window_3d)
        .for_each(|dst, &src, &w| *dst += src * w);

        let mut weight_view = self
            .weights
            .slice_mut(s![y..y + tile_size, x..x + tile_size]);
        weight_view += window;

        self.tiles_used += 1;
        Ok(())
    }

    /// Normalise by the accumulated weights and convert to 8-bit RGB
    pub fn finish(mut self) -> RgbImage {
        let weights_3d = self.weights.view().insert_axis(Axis(2));
        Zip::from(&mut self.canvas)
            .and_broadcast(&weights_3d)
            .for_each(|value, &w| *value /= w.max(WEIGHT_EPSILON));

        from_unit_array(&self.canvas)
    }
}

/// Stitch a set of grid-tagged tiles into one image
///
/// # Errors
///
/// Returns `EmptyInput` if `tiles` is empty, `CanvasTooLarge` if the grid
/// coordinates imply an oversized canvas.
pub fn stitch_tiles(
    tiles: &[(GridCoord, RgbImage)],
    geometry: TileGeometry,
    ramp: BlendRamp,
) -> Result<RgbImage> {
    let coords = tiles.iter().map(|(coord, _)| *coord);
    let mut stitcher = Stitcher::for_coords(geometry, coords, ramp, "<memory>")?;
    for (coord, tile) in tiles {
        stitcher.add_tile(*coord, tile)?;
    }
    Ok(stitcher.finish())
}
