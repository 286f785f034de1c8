//! Tests for tile planning, coordinate uniqueness and source coverage

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use tilestitch::spatial::grid::TileGeometry;
    use tilestitch::spatial::tiles::TilePlan;

    // Tests the 1000x1000 scenario keeps all nine tiles
    // Verified by dropping tiles exactly a quarter tile wide
    #[test]
    fn test_plan_scenario_nine_tiles() {
        let geometry = TileGeometry::new(512, 0.15).unwrap();
        let plan = TilePlan::new(&geometry, 1000, 1000);

        assert_eq!(plan.grid_extent(), (3, 3));
        assert_eq!(plan.tiles().len(), 9);
        assert_eq!(plan.discarded(), 0);
        assert_eq!(plan.source_dimensions(), (1000, 1000));
    }

    // Tests tiles come out in row-major order with unique coordinates
    // Verified by swapping the row and column loops
    #[test]
    fn test_plan_row_major_unique() {
        let geometry = TileGeometry::new(64, 0.25).unwrap();
        let plan = TilePlan::new(&geometry, 150, 200);

        let coords: Vec<_> = plan.tiles().iter().map(|tile| tile.coord).collect();
        let unique: HashSet<_> = coords.iter().copied().collect();
        assert_eq!(unique.len(), coords.len());

        let mut sorted = coords.clone();
        sorted.sort();
        assert_eq!(coords, sorted);
    }

    // Tests a full plan covers every source pixel
    // Verified by skipping the last row of each region in the mask
    #[test]
    fn test_plan_full_coverage() {
        let geometry = TileGeometry::new(512, 0.15).unwrap();
        let plan = TilePlan::new(&geometry, 1000, 1000);

        let coverage = plan.coverage();
        assert_eq!(coverage.len(), 1_000_000);
        assert!(coverage.all());
        assert_eq!(plan.uncovered_pixels(), 0);
    }

    // Tests only pixels inside dropped slivers are left uncovered
    // Verified by keeping sliver tiles in the plan
    #[test]
    fn test_plan_sliver_uncovered() {
        let geometry = TileGeometry::new(512, 0.0).unwrap();
        let (height, width) = (512, 1100);
        let plan = TilePlan::new(&geometry, height, width);

        assert_eq!(plan.grid_extent(), (1, 3));
        assert_eq!(plan.tiles().len(), 2);
        assert_eq!(plan.discarded(), 1);
        assert_eq!(plan.uncovered_pixels(), 76 * 512);

        let coverage = plan.coverage();
        for (index, covered) in coverage.iter().by_vals().enumerate() {
            let x = index % width;
            assert_eq!(covered, x < 1024, "pixel {index} coverage mismatch");
        }
    }

    // Tests every pixel of an overlapping plan lies in at least one region
    // Verified by using the tile size instead of the step for origins
    #[test]
    fn test_plan_regions_cover_pixels() {
        let geometry = TileGeometry::new(64, 0.25).unwrap();
        let (height, width) = (150, 200);
        let plan = TilePlan::new(&geometry, height, width);

        for y in 0..height {
            for x in 0..width {
                assert!(
                    plan.tiles().iter().any(|tile| tile.region.contains(y, x)),
                    "pixel ({y}, {x}) not covered"
                );
            }
        }
    }

    // Tests an empty source produces an empty plan
    // Verified by forcing at least one grid row
    #[test]
    fn test_plan_empty_source() {
        let geometry = TileGeometry::new(64, 0.25).unwrap();
        let plan = TilePlan::new(&geometry, 0, 0);

        assert!(plan.tiles().is_empty());
        assert_eq!(plan.uncovered_pixels(), 0);
    }
}
