//! Checks that every source file has a mirrored unit test file and back

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::fs;
    use std::io;
    use std::path::Path;

    const SRC_DIR: &str = "src";
    const UNIT_DIR: &str = "tests/unit";

    // Files that only wire modules together
    fn is_wiring(relative: &str) -> bool {
        relative == "lib.rs" || relative == "main.rs" || relative.ends_with("mod.rs")
    }

    fn relative_paths(base: &Path) -> BTreeSet<String> {
        let mut paths = BTreeSet::new();
        if let Err(error) = walk(base, base, &mut paths) {
            assert!(!base.exists(), "Failed to read {}: {error}", base.display());
        }
        paths
    }

    fn walk(dir: &Path, base: &Path, paths: &mut BTreeSet<String>) -> Result<(), io::Error> {
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            let relative = path
                .strip_prefix(base)
                .map_err(|_| io::Error::other("Failed to strip prefix"))?
                .to_string_lossy()
                .to_string();

            if path.is_dir() {
                paths.insert(relative);
                walk(&path, base, paths)?;
            } else if path.extension().and_then(|ext| ext.to_str()) == Some("rs") {
                paths.insert(relative);
            }
        }
        Ok(())
    }

    #[test]
    fn test_every_source_file_has_unit_tests() {
        let sources = relative_paths(Path::new(SRC_DIR));
        let units = relative_paths(Path::new(UNIT_DIR));

        let missing: Vec<_> = sources
            .iter()
            .filter(|path| !is_wiring(path) && !units.contains(*path))
            .map(|path| format!("  - src/{path} -> tests/unit/{path}"))
            .collect();

        assert!(
            missing.is_empty(),
            "Source files without unit tests:\n{}",
            missing.join("\n")
        );
    }

    #[test]
    fn test_every_unit_test_has_source() {
        let sources = relative_paths(Path::new(SRC_DIR));
        let units = relative_paths(Path::new(UNIT_DIR));

        let orphaned: Vec<_> = units
            .iter()
            .filter(|path| !is_wiring(path) && !sources.contains(*path))
            .map(|path| format!("  - tests/unit/{path} (no src/{path})"))
            .collect();

        assert!(
            orphaned.is_empty(),
            "Unit test files without a source counterpart:\n{}",
            orphaned.join("\n")
        );
    }

    #[test]
    fn test_every_test_file_contains_tests() {
        let tests_dir = Path::new("tests");
        let mut empty = Vec::new();

        for relative in relative_paths(tests_dir) {
            let path = tests_dir.join(&relative);
            let is_wiring_file = path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name == "main.rs" || name == "mod.rs");
            if !path.is_file() || is_wiring_file {
                continue;
            }

            let content = fs::read_to_string(&path).unwrap_or_default();
            if !content.contains("#[test]") {
                empty.push(format!("  - {}", path.display()));
            }
        }

        assert!(
            empty.is_empty(),
            "Test files without any #[test] function:\n{}",
            empty.join("\n")
        );
    }
}
