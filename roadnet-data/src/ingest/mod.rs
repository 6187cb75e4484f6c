//! Overpass API JSON ingestion into a [`RoadNetwork`].
//!
//! A run makes one pass over the `elements` array. Nodes become points as
//! they arrive; ways are buffered and resolved once every node is known.
use std::io::{BufReader, Read};

use camino::Utf8Path;
use geo::{Coord, Rect};
use log::info;
use roadnet_core::RoadNetwork;

mod accumulator;
mod error;
mod ids;
mod point;
mod polyline;
mod record;
mod tags;

use accumulator::PointPhase;

pub use error::OsmIngestError;
pub use point::ingest_point;
pub use polyline::{IncidenceTracker, ingest_way};
pub use record::{ElementKind, RawDocument, RawElement, RawMetadata};
pub use tags::map_tags;

/// An element passed over because its declared kind is not supported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedElement {
    /// Position of the record in the `elements` array.
    pub index: usize,
    /// The declared `type`, verbatim.
    pub kind: String,
}

/// Summary of raw OSM elements discovered during ingestion.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OsmIngestSummary {
    /// Number of node records read, repeats included.
    pub nodes: u64,
    /// Number of way records read.
    pub ways: u64,
    /// Records skipped because of an unsupported kind, in input order.
    pub skipped: Vec<SkippedElement>,
    /// Bounding box covering all node coordinates, if any nodes were present.
    /// Coordinates are WGS84 with `x = longitude`, `y = latitude`.
    pub bounds: Option<Rect<f64>>,
}

impl OsmIngestSummary {
    fn include_bounds(&mut self, bounds: Rect<f64>) {
        match &mut self.bounds {
            Some(existing) => {
                let min = Coord {
                    x: existing.min().x.min(bounds.min().x),
                    y: existing.min().y.min(bounds.min().y),
                };
                let max = Coord {
                    x: existing.max().x.max(bounds.max().x),
                    y: existing.max().y.max(bounds.max().y),
                };
                *existing = Rect::new(min, max);
            }
            None => self.bounds = Some(bounds),
        }
    }

    fn record_node(&mut self, location: Coord<f64>) {
        self.nodes += 1;
        if let Some(bounds) = Self::coordinate_bounds(location) {
            self.include_bounds(bounds);
        }
    }

    fn record_way(&mut self) {
        self.ways += 1;
    }

    fn record_skipped(&mut self, index: usize, kind: &str) {
        self.skipped.push(SkippedElement {
            index,
            kind: kind.to_owned(),
        });
    }

    fn coordinate_bounds(location: Coord<f64>) -> Option<Rect<f64>> {
        (location.x.is_finite()
            && location.y.is_finite()
            && (-180.0..=180.0).contains(&location.x)
            && (-90.0..=90.0).contains(&location.y))
        .then(|| Rect::new(location, location))
    }
}

/// Detailed report of an OSM ingestion run.
#[derive(Debug, Clone, PartialEq)]
pub struct OsmIngestReport {
    /// Element counts, skipped records and bounding box information.
    pub summary: OsmIngestSummary,
    /// The assembled road network.
    pub network: RoadNetwork,
}

/// Build a road network from an already decoded document.
///
/// The first integrity violation aborts the run and no partial network is
/// returned.
///
/// # Examples
/// ```
/// use roadnet_data::{RawDocument, parse_document};
/// use serde_json::json;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let document: RawDocument = serde_json::from_value(json!({
///     "osm3s": {"timestamp_osm_base": "2015-03-04T11:22:02Z"},
///     "elements": [
///         {"type": "node", "id": 1, "lon": 15.04237, "lat": 58.546269},
///         {"type": "node", "id": 2, "lon": 15.0448, "lat": 58.544477},
///         {"type": "way", "id": 10, "nodes": [1, 2]}
///     ]
/// }))?;
/// let report = parse_document(document)?;
/// assert_eq!(report.network.polylines.len(), 1);
/// assert!(report.network.intersections.is_empty());
/// # Ok(())
/// # }
/// ```
pub fn parse_document(document: RawDocument) -> Result<OsmIngestReport, OsmIngestError> {
    let provenance = document.provenance()?;
    info!(
        "Parsing {} elements extracted at {}",
        document.elements.len(),
        provenance.timestamp()
    );

    let mut phase = PointPhase::default();
    for (index, value) in document.elements.into_iter().enumerate() {
        phase.process_element(RawElement::from_value(index, value)?)?;
    }
    let report = phase.finish().resolve_ways(provenance)?;

    let network = &report.network;
    info!(
        "Loaded {} points, {} polylines and {} intersections",
        network.points.len(),
        network.polylines.len(),
        network.intersections.len()
    );
    Ok(report)
}

/// Decode a JSON string and build its road network.
///
/// # Examples
/// ```
/// use roadnet_data::parse_str;
///
/// # fn main() -> Result<(), roadnet_data::OsmIngestError> {
/// let report = parse_str(r#"{"osm3s": {"timestamp_osm_base": "t"}, "elements": []}"#)?;
/// assert_eq!(report.network.provenance.timestamp(), "t");
/// # Ok(())
/// # }
/// ```
pub fn parse_str(json: &str) -> Result<OsmIngestReport, OsmIngestError> {
    let document =
        serde_json::from_str(json).map_err(|source| OsmIngestError::Decode { source })?;
    parse_document(document)
}

/// Decode JSON from `reader` and build its road network.
pub fn parse_reader<R: Read>(reader: R) -> Result<OsmIngestReport, OsmIngestError> {
    let document =
        serde_json::from_reader(reader).map_err(|source| OsmIngestError::Decode { source })?;
    parse_document(document)
}

/// Read an Overpass JSON file and build its road network.
///
/// # Examples
/// ```no_run
/// use camino::Utf8Path;
/// use roadnet_data::ingest_osm_json;
///
/// # fn main() -> Result<(), roadnet_data::OsmIngestError> {
/// let report = ingest_osm_json(Utf8Path::new("extract.json"))?;
/// println!("Loaded {} polylines", report.network.polylines.len());
/// # Ok(())
/// # }
/// ```
pub fn ingest_osm_json(path: &Utf8Path) -> Result<OsmIngestReport, OsmIngestError> {
    let file = roadnet_fs::open_utf8_file(path).map_err(|source| OsmIngestError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let document = serde_json::from_reader(BufReader::new(file)).map_err(|source| {
        OsmIngestError::DecodeFile {
            path: path.to_path_buf(),
            source,
        }
    })?;
    parse_document(document)
}

#[cfg(test)]
mod tests;
