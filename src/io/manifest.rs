//! Sidecar manifest recording how a folder of tiles was produced
//!
//! The manifest persists the tiling parameters next to the tiles so a later
//! stitch can detect a tile size or overlap mismatch instead of silently
//! producing a corrupted canvas. It also lists every tile with its typed grid
//! coordinate, so reconstruction does not depend on file name parsing.

use crate::io::configuration::MANIFEST_FILE_NAME;
use crate::io::error::{Result, TilingError, invalid_configuration};
use crate::spatial::grid::{GridCoord, TileGeometry};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// Overlap fractions are compared with a tolerance for decimal round trips
const OVERLAP_TOLERANCE: f64 = 1e-9;

/// One tile entry in the manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestTile {
    /// Grid coordinate of the tile
    #[serde(flatten)]
    pub coord: GridCoord,
    /// File name relative to the manifest's folder
    pub file: String,
    /// Clipped height in the source
    pub height: usize,
    /// Clipped width in the source
    pub width: usize,
}

/// Tiling parameters and tile list for one split source image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileManifest {
    /// File name of the source image
    pub source: String,
    /// Source height in pixels
    pub source_height: usize,
    /// Source width in pixels
    pub source_width: usize,
    /// Tile edge length
    pub tile_size: usize,
    /// Overlap fraction
    pub overlap: f64,
    /// Overlap in pixels
    pub overlap_px: usize,
    /// Step between tile origins in pixels
    pub step: usize,
    /// Tiles written, in row-major order
    pub tiles: Vec<ManifestTile>,
}

impl TileManifest {
    /// Start a manifest for a source image split with `geometry`
    pub fn new(
        source: impl Into<String>,
        source_height: usize,
        source_width: usize,
        geometry: &TileGeometry,
    ) -> Self {
        Self {
            source: source.into(),
            source_height,
            source_width,
            tile_size: geometry.tile_size(),
            overlap: geometry.overlap(),
            overlap_px: geometry.overlap_px(),
            step: geometry.step(),
            tiles: Vec::new(),
        }
    }

    /// Path of the manifest inside a tile folder
    pub fn path_in(folder: &Path) -> PathBuf {
        folder.join(MANIFEST_FILE_NAME)
    }

    /// Check that the manifest was produced with the same tiling parameters
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` naming the first mismatching parameter.
    pub fn ensure_matches(&self, geometry: &TileGeometry) -> Result<()> {
        if self.tile_size != geometry.tile_size() {
            return Err(invalid_configuration(
                "tile_size",
                &geometry.tile_size(),
                &format!("tiles of '{}' were split with {}", self.source, self.tile_size),
            ));
        }
        if (self.overlap - geometry.overlap()).abs() > OVERLAP_TOLERANCE
            || self.overlap_px != geometry.overlap_px()
        {
            return Err(invalid_configuration(
                "overlap",
                &geometry.overlap(),
                &format!("tiles of '{}' were split with {}", self.source, self.overlap),
            ));
        }
        Ok(())
    }

    /// Grid coordinates of all listed tiles
    pub fn coords(&self) -> impl Iterator<Item = GridCoord> + '_ {
        self.tiles.iter().map(|tile| tile.coord)
    }

    /// Write the manifest as pretty-printed JSON into `folder`
    ///
    /// # Errors
    ///
    /// Returns `Manifest` if serialisation or the file write fails.
    pub fn write_to(&self, folder: &Path) -> Result<PathBuf> {
        let path = Self::path_in(folder);
        let json = serde_json::to_string_pretty(self).map_err(|e| TilingError::Manifest {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        std::fs::write(&path, json).map_err(|e| TilingError::Manifest {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        Ok(path)
    }

    /// Read the manifest of `folder`, if it has one
    ///
    /// # Errors
    ///
    /// Returns `Manifest` if the file exists but cannot be read or parsed.
    pub fn read_from(folder: &Path) -> Result<Option<Self>> {
        let path = Self::path_in(folder);
        if !path.is_file() {
            return Ok(None);
        }

        let text = std::fs::read_to_string(&path).map_err(|e| TilingError::Manifest {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        serde_json::from_str(&text)
            .map(Some)
            .map_err(|e| TilingError::Manifest {
                path,
                reason: e.to_string(),
            })
    }
}
