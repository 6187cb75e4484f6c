//! Test helpers for composing ingest CLI extracts and layered overrides.

use super::*;
use std::fs;
use tempfile::TempDir;

/// Two nodes shared by two ways, so both nodes are intersections.
pub(super) const CROSSING_EXTRACT: &str = r#"{
  "osm3s": {"timestamp_osm_base": "2015-03-04T11:22:02Z"},
  "elements": [
    {"type": "node", "id": 1, "lon": 15.04237, "lat": 58.546269, "tags": {"highway": "traffic_signals"}},
    {"type": "node", "id": 2, "lon": 15.0448, "lat": 58.544477},
    {"type": "way", "id": 10, "nodes": [1, 2], "tags": {"highway": "primary"}},
    {"type": "way", "id": 11, "nodes": [2, 1], "tags": {"highway": "secondary"}}
  ]
}"#;

/// A way pointing at a node that never appears.
pub(super) const DANGLING_EXTRACT: &str = r#"{
  "osm3s": {"timestamp_osm_base": "2015-03-04T11:22:02Z"},
  "elements": [
    {"type": "node", "id": 1, "lon": 15.04237, "lat": 58.546269},
    {"type": "way", "id": 10, "nodes": [1, 99]}
  ]
}"#;

#[derive(Debug, Clone, Default)]
pub(super) struct LayerOverrides {
    pub(super) input: Option<Utf8PathBuf>,
    pub(super) output_dir: Option<Utf8PathBuf>,
    pub(super) links_file: Option<String>,
    pub(super) nodes_file: Option<String>,
}

#[derive(Debug)]
pub(super) struct ExtractFiles {
    _dir: TempDir,
    crossing: Utf8PathBuf,
    config_crossing: Utf8PathBuf,
    dangling: Utf8PathBuf,
    output_dir: Utf8PathBuf,
}

impl ExtractFiles {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root =
            Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 temp directory");
        let crossing = root.join("crossing.json");
        let config_crossing = root.join("config.crossing.json");
        let dangling = root.join("dangling.json");
        for (path, contents) in [
            (&crossing, CROSSING_EXTRACT),
            (&config_crossing, CROSSING_EXTRACT),
            (&dangling, DANGLING_EXTRACT),
        ] {
            fs::write(path, contents).expect("write extract");
        }
        Self {
            _dir: dir,
            crossing,
            config_crossing,
            dangling,
            output_dir: root.join("tables"),
        }
    }

    pub(super) fn crossing(&self) -> &Utf8Path {
        &self.crossing
    }

    pub(super) fn config_crossing(&self) -> &Utf8Path {
        &self.config_crossing
    }

    pub(super) fn dangling(&self) -> &Utf8Path {
        &self.dangling
    }

    pub(super) fn output_dir(&self) -> &Utf8Path {
        &self.output_dir
    }
}

pub(super) fn merge_layers(
    mut cli_args: IngestArgs,
    file_layer: Option<LayerOverrides>,
    env_layer: Option<LayerOverrides>,
) -> Result<IngestOutcome, CliError> {
    merge_field(
        &mut cli_args.input,
        extract_field(&env_layer, |layer| &layer.input),
        extract_field(&file_layer, |layer| &layer.input),
    );
    merge_field(
        &mut cli_args.output_dir,
        extract_field(&env_layer, |layer| &layer.output_dir),
        extract_field(&file_layer, |layer| &layer.output_dir),
    );
    merge_field(
        &mut cli_args.links_file,
        extract_field(&env_layer, |layer| &layer.links_file),
        extract_field(&file_layer, |layer| &layer.links_file),
    );
    merge_field(
        &mut cli_args.nodes_file,
        extract_field(&env_layer, |layer| &layer.nodes_file),
        extract_field(&file_layer, |layer| &layer.nodes_file),
    );
    run_ingest(cli_args)
}

fn merge_field<T: Clone>(target: &mut Option<T>, env_value: Option<T>, file_value: Option<T>) {
    if target.is_none()
        && let Some(value) = env_value.or(file_value)
    {
        *target = Some(value);
    }
}

fn extract_field<T: Clone>(
    layer: &Option<LayerOverrides>,
    accessor: fn(&LayerOverrides) -> &Option<T>,
) -> Option<T> {
    layer.as_ref().and_then(|entry| accessor(entry).clone())
}
