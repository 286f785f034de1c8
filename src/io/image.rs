//! Raster loading and saving with unit-range float conversion

use crate::io::error::{Result, TilingError, file_system};
use image::RgbImage;
use ndarray::Array3;
use std::path::Path;

/// Load an image from disk as 8-bit RGB
///
/// # Errors
///
/// Returns `InvalidImage` if the file cannot be opened or decoded.
pub fn load_rgb(path: &Path) -> Result<RgbImage> {
    image::open(path)
        .map(|img| img.to_rgb8())
        .map_err(|source| TilingError::InvalidImage {
            path: path.to_path_buf(),
            source,
        })
}

/// Save an RGB image, creating the parent directory if needed
///
/// The encoder is chosen from the file extension.
///
/// # Errors
///
/// Returns an error if:
/// - The parent directory cannot be created
/// - The image cannot be encoded or written to the specified path
pub fn save_rgb(img: &RgbImage, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| file_system(parent, "create directory", e))?;
    }

    img.save(path).map_err(|source| TilingError::ImageExport {
        path: path.to_path_buf(),
        source,
    })
}

/// Convert an RGB image to a (height, width, 3) array scaled to `[0, 1]`
pub fn to_unit_array(img: &RgbImage) -> Array3<f32> {
    let (width, height) = img.dimensions();
    let shape = (height as usize, width as usize, 3);
    // `pixels` yields exactly width * height pixels even if the backing
    // buffer is longer
    let values: Vec<f32> = img
        .pixels()
        .flat_map(|pixel| pixel.0)
        .map(|value| f32::from(value) / 255.0)
        .collect();

    Array3::from_shape_vec(shape, values).unwrap_or_else(|_| Array3::zeros(shape))
}

/// Convert a unit-range (height, width, 3) array back to 8-bit RGB
///
/// Values are rescaled to `[0, 255]`, rounded to the nearest level and clipped.
pub fn from_unit_array(data: &Array3<f32>) -> RgbImage {
    let (height, width, _) = data.dim();

    RgbImage::from_fn(width as u32, height as u32, |x, y| {
        let mut rgb = [0u8; 3];
        for (c, slot) in rgb.iter_mut().enumerate() {
            let value = data.get((y as usize, x as usize, c)).copied().unwrap_or(0.0);
            *slot = (value * 255.0).round().clamp(0.0, 255.0) as u8;
        }
        image::Rgb(rgb)
    })
}
