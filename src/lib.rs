//! Facade crate for the road network extractor.
//!
//! This crate re-exports the core network types and, behind the default
//! `ingest` feature, the Overpass JSON ingestion and table export pipeline.

#![forbid(unsafe_code)]

pub use roadnet_core::{
    CoordinateConflict, DuplicatePolyline, IntersectionSet, NetworkElement, NodeId, PointEntity,
    PointTable, PolylineEntity, PolylineError, PolylineTable, Provenance, RoadNetwork, Tags,
    Upsert, WayId,
};

#[cfg(feature = "ingest")]
pub use roadnet_data::{
    ExportError, ExportPaths, ExportReport, OsmIngestError, OsmIngestReport, OsmIngestSummary,
    SkippedElement, export_network, ingest_osm_json, parse_reader, parse_str,
};
