//! Tests for tile file naming and grid tag parsing

#[cfg(test)]
mod tests {
    use std::path::Path;
    use tilestitch::TilingError;
    use tilestitch::io::naming::{
        TileId, coord_from_path, parse_tile_name, reconstructed_file_name,
    };
    use tilestitch::spatial::grid::GridCoord;

    // Tests tile names embed the source stem and grid tag
    // Verified by swapping row and column in the name
    #[test]
    fn test_tile_file_name() {
        let id = TileId::new("img", GridCoord::new(3, 12));
        assert_eq!(id.file_name("jpg"), "img_y3_x12.jpg");
    }

    // Tests generated names parse back to their coordinate
    // Verified by parsing the column before the row
    #[test]
    fn test_parse_generated_name() {
        let id = TileId::new("aerial_scan", GridCoord::new(7, 0));
        assert_eq!(
            parse_tile_name(&id.file_name("png")).unwrap(),
            GridCoord::new(7, 0)
        );
        assert_eq!(parse_tile_name("img_y3_x12.jpg").unwrap(), GridCoord::new(3, 12));
    }

    // Tests the first complete tag wins when several appear
    // Verified by taking the last tag in the name
    #[test]
    fn test_parse_first_match() {
        assert_eq!(
            parse_tile_name("frame_y1_x2_y3_x4.png").unwrap(),
            GridCoord::new(3, 4)
        );
        assert_eq!(
            parse_tile_name("a_y1_x2.b_y3_x4.png").unwrap(),
            GridCoord::new(1, 2)
        );
        assert_eq!(parse_tile_name("x_y_y5_x6.png").unwrap(), GridCoord::new(5, 6));
    }

    // Tests leading zeros are accepted
    // Verified by rejecting zero-padded numbers
    #[test]
    fn test_parse_leading_zeros() {
        assert_eq!(parse_tile_name("a_y01_x002.png").unwrap(), GridCoord::new(1, 2));
    }

    // Tests names without a complete tag are malformed
    // Verified by accepting a tag without the trailing dot
    #[test]
    fn test_parse_malformed() {
        for name in [
            "img.png",
            "img_y3.png",
            "img_x3_y4.png",
            "img_y3_x.png",
            "img_y3_x4",
            "img_y-1_x2.png",
            "img_y99999999999999999999999_x1.png",
        ] {
            assert!(
                matches!(
                    parse_tile_name(name),
                    Err(TilingError::MalformedTileName { .. })
                ),
                "{name} should be malformed"
            );
        }
    }

    // Tests path lookups only consider the file name
    // Verified by parsing the full path string
    #[test]
    fn test_coord_from_path() {
        assert_eq!(
            coord_from_path(Path::new("dir_y9_x9.d/tile_y1_x2.png")),
            Some(GridCoord::new(1, 2))
        );
        assert_eq!(coord_from_path(Path::new("dir_y9_x9.d/notes.png")), None);
    }

    // Tests reconstructed names use the folder name and extension
    // Verified by dropping the prefix
    #[test]
    fn test_reconstructed_file_name() {
        assert_eq!(
            reconstructed_file_name("img", "jpg"),
            "reconstructed_img.jpg"
        );
    }
}
