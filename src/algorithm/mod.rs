/// Splitting source images into overlapping grid tiles
pub mod split;
/// Blended reconstruction of images from grid tiles
pub mod stitch;
