//! Test-only builders for points and small networks used by unit and
//! behaviour tests across the workspace.

use geo::Coord;

use crate::{NodeId, PointEntity, PointTable, Tags};

/// Build an untagged point at `(lon, lat)`.
#[must_use]
pub fn point(id: u64, lon: f64, lat: f64) -> PointEntity {
    PointEntity::new(NodeId::new(id), Coord { x: lon, y: lat }, Tags::new())
}

/// Build a point with the supplied `key=value` tags.
#[must_use]
pub fn tagged_point(id: u64, lon: f64, lat: f64, tags: &[(&str, &str)]) -> PointEntity {
    PointEntity::new(NodeId::new(id), Coord { x: lon, y: lat }, tags_from(tags))
}

/// Build a [`Tags`] map from string pairs.
#[must_use]
pub fn tags_from(pairs: &[(&str, &str)]) -> Tags {
    pairs
        .iter()
        .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
        .collect()
}

/// A point table holding the two sample points used throughout the tests.
///
/// Point 1 sits at `(15.04237, 58.546269)` and point 2 at
/// `(15.0448, 58.544477)`.
#[must_use]
pub fn sample_point_table() -> PointTable {
    let mut table = PointTable::new();
    for sample in [point(1, 15.04237, 58.546269), point(2, 15.0448, 58.544477)] {
        table
            .upsert(sample)
            .expect("sample identifiers are distinct");
    }
    table
}

