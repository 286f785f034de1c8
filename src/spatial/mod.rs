//! Spatial data structures for tile grids
//!
//! This module contains spatial-related functionality including:
//! - Grid geometry derived from tile size and overlap
//! - Tile plans and source coverage

/// Grid coordinates, tile regions and validated tiling geometry
pub mod grid;
/// Tile planning and coverage utilities
pub mod tiles;

pub use grid::{GridCoord, TileGeometry, TileRegion};
pub use tiles::TilePlan;
