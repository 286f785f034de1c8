//! Overlapping tile split and seam-blended stitch for oversized imagery
//!
//! Large images are partitioned into a deterministic grid of overlapping
//! square tiles so each tile can be processed independently (for example by
//! a detector that only accepts bounded inputs). The processed tiles are then
//! composited back into one canvas with a tapering blend window, so overlaps
//! fade into each other instead of leaving hard seams.

#![deny(unsafe_code)]

/// Split and stitch algorithms
pub mod algorithm;
/// Input/output operations and error handling
pub mod io;
/// Blend window mathematics
pub mod math;
/// Grid geometry and tile planning
pub mod spatial;

pub use io::error::{Result, TilingError};
