//! Tile file naming: `<source-stem>_y<row>_x<col>.<ext>`
//!
//! The grid tag in the file name is the persisted link between a tile and its
//! placement when no manifest is available. Parsing mirrors a search for
//! `_y(\d+)_x(\d+)\.` anywhere in the name; the first match wins.

use crate::io::configuration::RECONSTRUCTED_PREFIX;
use crate::io::error::{Result, TilingError};
use crate::spatial::grid::GridCoord;
use std::path::Path;

/// Typed identity of a tile: source stem plus grid coordinate
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TileId {
    /// File stem of the source image the tile was cut from
    pub source: String,
    /// Grid coordinate of the tile
    pub coord: GridCoord,
}

impl TileId {
    /// Create a tile identifier
    pub fn new(source: impl Into<String>, coord: GridCoord) -> Self {
        Self {
            source: source.into(),
            coord,
        }
    }

    /// File name for this tile with the given extension
    pub fn file_name(&self, extension: &str) -> String {
        format!(
            "{}_y{}_x{}.{extension}",
            self.source, self.coord.row, self.coord.col
        )
    }
}

/// Extract the grid coordinate from a tile file name
///
/// # Errors
///
/// Returns `MalformedTileName` if the name has no `_y<row>_x<col>.` tag or the
/// numbers do not fit in `usize`.
pub fn parse_tile_name(name: &str) -> Result<GridCoord> {
    let malformed = || TilingError::MalformedTileName {
        name: name.to_string(),
    };

    let mut search_from = 0;
    while let Some(offset) = name.get(search_from..).and_then(|rest| rest.find("_y")) {
        let start = search_from + offset;
        if let Some(coord) = name.get(start..).and_then(match_grid_tag) {
            return Ok(coord);
        }
        search_from = start + 1;
    }

    Err(malformed())
}

// Matches `_y<digits>_x<digits>.` at the very start of `candidate`
fn match_grid_tag(candidate: &str) -> Option<GridCoord> {
    let rest = candidate.strip_prefix("_y")?;
    let (row, rest) = split_digits(rest)?;
    let rest = rest.strip_prefix("_x")?;
    let (col, rest) = split_digits(rest)?;
    rest.starts_with('.').then_some(GridCoord::new(row, col))
}

fn split_digits(text: &str) -> Option<(usize, &str)> {
    let end = text
        .char_indices()
        .find(|(_, ch)| !ch.is_ascii_digit())
        .map_or(text.len(), |(index, _)| index);
    if end == 0 {
        return None;
    }
    let (digits, rest) = text.split_at(end);
    digits.parse().ok().map(|value| (value, rest))
}

/// Grid coordinate of a tile path, if its file name carries a grid tag
pub fn coord_from_path(path: &Path) -> Option<GridCoord> {
    path.file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| parse_tile_name(name).ok())
}

/// File name of the reconstruction for a tile folder
pub fn reconstructed_file_name(folder_name: &str, extension: &str) -> String {
    format!("{RECONSTRUCTED_PREFIX}{folder_name}.{extension}")
}
