//! Unit tests for the ingestion entry points.

use super::*;
use camino::Utf8PathBuf;
use roadnet_core::{NodeId, WayId};
use rstest::{fixture, rstest};
use serde_json::{Value, json};
use std::io::Write;
use tempfile::NamedTempFile;

fn document(elements: &Value) -> String {
    json!({
        "version": 0.6,
        "generator": "Overpass API",
        "osm3s": {"timestamp_osm_base": "2015-03-04T11:22:02Z", "copyright": "ODbL"},
        "elements": elements
    })
    .to_string()
}

#[fixture]
fn sample_nodes() -> Vec<Value> {
    vec![
        json!({"type": "node", "id": 1, "lon": 15.04237, "lat": 58.546269,
               "tags": {"highway": "traffic_signals"}}),
        json!({"type": "node", "id": 2, "lon": 15.0448, "lat": 58.544477}),
    ]
}

fn with_ways(mut nodes: Vec<Value>, ways: &[(u64, &[u64])]) -> String {
    nodes.extend(ways.iter().map(|(id, refs)| {
        json!({"type": "way", "id": id, "nodes": refs, "tags": {"highway": "primary"}})
    }));
    document(&Value::Array(nodes))
}

fn intersections(report: &OsmIngestReport) -> Vec<u64> {
    report
        .network
        .intersections
        .iter()
        .map(NodeId::get)
        .collect()
}

#[rstest]
fn single_way_builds_one_polyline(sample_nodes: Vec<Value>) {
    let report =
        parse_str(&with_ways(sample_nodes, &[(10, &[1, 2][..])])).expect("valid extract");
    let network = &report.network;

    assert_eq!(network.provenance.timestamp(), "2015-03-04T11:22:02Z");
    assert_eq!(network.points.len(), 2);
    let link = network.polylines.get(WayId::new(10)).expect("polyline 10");
    let coords: Vec<(f64, f64)> = link.line_string().coords().map(|c| (c.x, c.y)).collect();
    assert_eq!(coords, vec![(15.04237, 58.546269), (15.0448, 58.544477)]);
    assert!(network.intersections.is_empty());
}

#[rstest]
#[case(&[(10, &[1, 2][..]), (11, &[2, 1][..])], vec![1, 2])]
#[case(&[(10, &[1, 2, 1][..])], vec![1])]
#[case(&[(10, &[1, 2][..])], vec![])]
fn detects_intersections(
    sample_nodes: Vec<Value>,
    #[case] ways: &[(u64, &[u64])],
    #[case] expected: Vec<u64>,
) {
    let report = parse_str(&with_ways(sample_nodes, ways)).expect("valid extract");
    assert_eq!(intersections(&report), expected);
    assert_eq!(report.network.polylines.len(), ways.len());
}

#[rstest]
fn summary_counts_and_bounds(sample_nodes: Vec<Value>) {
    let report =
        parse_str(&with_ways(sample_nodes, &[(10, &[1, 2][..])])).expect("valid extract");
    let summary = &report.summary;
    assert_eq!(summary.nodes, 2);
    assert_eq!(summary.ways, 1);
    assert!(summary.skipped.is_empty());
    let bounds = summary.bounds.expect("nodes present");
    assert_eq!(bounds.min(), Coord { x: 15.04237, y: 58.544477 });
    assert_eq!(bounds.max(), Coord { x: 15.0448, y: 58.546269 });
}

#[test]
fn out_of_range_coordinates_are_kept_but_not_bounded() {
    let report = parse_str(&document(&json!([
        {"type": "node", "id": 1, "lon": 200.0, "lat": 0.0}
    ])))
    .expect("coordinates are not range checked");
    assert_eq!(report.network.points.len(), 1);
    assert!(report.summary.bounds.is_none());
}

#[test]
fn missing_elements_means_an_empty_network() {
    let report = parse_str(r#"{"osm3s": {"timestamp_osm_base": "2020-01-01T00:00:00Z"}}"#)
        .expect("elements default to empty");
    assert!(report.network.points.is_empty());
    assert!(report.network.polylines.is_empty());
    assert_eq!(report.summary, OsmIngestSummary::default());
}

#[rstest]
#[case(r#"{"elements": []}"#)]
#[case(r#"{"osm3s": {"copyright": "ODbL"}, "elements": []}"#)]
#[case(r#"{"osm3s": {"timestamp_osm_base": 7}, "elements": []}"#)]
fn rejects_missing_provenance(#[case] json: &str) {
    let err = parse_str(json).expect_err("provenance required");
    assert!(
        matches!(
            err,
            OsmIngestError::MalformedDocument { .. } | OsmIngestError::Decode { .. }
        ),
        "unexpected error: {err:?}"
    );
}

#[rstest]
#[case("not json")]
#[case(r#"{"osm3s": {"timestamp_osm_base": "t"}, "elements": {}}"#)]
fn rejects_undecodable_documents(#[case] json: &str) {
    let err = parse_str(json).expect_err("decode failure");
    assert!(matches!(err, OsmIngestError::Decode { .. }));
}

#[test]
fn reader_entry_point_matches_string_entry_point() {
    let json = with_ways(sample_nodes(), &[(10, &[1, 2][..])]);
    let from_reader = parse_reader(json.as_bytes()).expect("reader");
    let from_str = parse_str(&json).expect("string");
    assert_eq!(from_reader, from_str);
}

#[test]
fn non_object_elements_are_malformed() {
    let err = parse_str(&document(&json!([42]))).expect_err("number record");
    assert!(matches!(
        err,
        OsmIngestError::MalformedRecord {
            index: 0,
            field: "type",
            ..
        }
    ));
}

#[test]
fn reads_extracts_from_disk() {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(with_ways(sample_nodes(), &[(10, &[1, 2][..])]).as_bytes())
        .expect("write extract");
    let path = Utf8PathBuf::from_path_buf(file.path().to_path_buf()).expect("utf-8 path");

    let report = ingest_osm_json(&path).expect("valid file");
    assert_eq!(report.network.polylines.len(), 1);
}

#[test]
fn disk_errors_carry_the_path() {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(b"{ truncated").expect("write garbage");
    let path = Utf8PathBuf::from_path_buf(file.path().to_path_buf()).expect("utf-8 path");

    match ingest_osm_json(&path).expect_err("invalid json") {
        OsmIngestError::DecodeFile { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("expected a decode error, got {other:?}"),
    }

    let missing = path.with_file_name("absent-extract.json");
    match ingest_osm_json(&missing).expect_err("missing file") {
        OsmIngestError::Open { path: reported, .. } => assert_eq!(reported, missing),
        other => panic!("expected an open error, got {other:?}"),
    }
}
