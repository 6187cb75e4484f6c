use camino::Utf8PathBuf;
use std::fs;

/// Directory containing the JSON extract fixtures.
pub fn fixtures_dir() -> Utf8PathBuf {
    Utf8PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

/// Path of a named fixture, checked to exist.
pub fn fixture_path(name: &str) -> Utf8PathBuf {
    let path = fixtures_dir().join(name);
    assert!(path.is_file(), "missing fixture {path}");
    path
}

/// Read the scenario titles of a feature file in declaration order.
pub fn scenario_titles(feature: &str) -> Vec<String> {
    let path = Utf8PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(feature);
    let contents = fs::read_to_string(&path).unwrap_or_else(|err| {
        panic!("failed to read feature file {path}: {err}");
    });
    contents
        .lines()
        .filter_map(|line| line.trim().strip_prefix("Scenario: "))
        .map(str::to_owned)
        .collect()
}
