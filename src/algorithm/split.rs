//! Splitting a source image into overlapping grid tiles

use crate::spatial::grid::{GridCoord, TileGeometry, TileRegion};
use crate::spatial::tiles::TilePlan;
use image::RgbImage;
use image::imageops::crop_imm;

/// A tile cut from a source image
#[derive(Debug, Clone)]
pub struct SplitTile {
    /// Grid coordinate of the tile
    pub coord: GridCoord,
    /// Clipped region the pixels were taken from
    pub region: TileRegion,
    /// Tile pixels, `region.height` x `region.width`
    pub pixels: RgbImage,
}

/// Split an image into overlapping tiles
///
/// Tiles are produced in row-major grid order. Trailing fragments smaller
/// than a quarter tile in either dimension are not emitted.
pub fn split_image(image: &RgbImage, geometry: &TileGeometry) -> Vec<SplitTile> {
    let plan = TilePlan::new(
        geometry,
        image.height() as usize,
        image.width() as usize,
    );
    split_with_plan(image, &plan)
}

/// Crop the tiles of an existing plan out of `image`
///
/// The plan must have been computed for the dimensions of `image`; regions
/// are clipped again to the image bounds regardless.
pub fn split_with_plan(image: &RgbImage, plan: &TilePlan) -> Vec<SplitTile> {
    plan.tiles()
        .iter()
        .map(|planned| {
            let region = planned.region;
            let pixels = crop_imm(
                image,
                region.x as u32,
                region.y as u32,
                region.width as u32,
                region.height as u32,
            )
            .to_image();
            SplitTile {
                coord: planned.coord,
                region,
                pixels,
            }
        })
        .collect()
}
