//! Data ingestion and export for road network extraction.
//!
//! Responsibilities:
//! - Decode Overpass API JSON extracts and build a [`RoadNetwork`].
//! - Write the network as semicolon-delimited link and intersection tables.
//!
//! Boundaries:
//! - Entity and table rules live in `roadnet-core`; this crate maps raw
//!   records onto them and reports where a record broke them.
//!
//! Invariants:
//! - A run either returns a complete network or an error; partial networks
//!   never escape.
//! - No global mutable state.
//!
//! [`RoadNetwork`]: roadnet_core::RoadNetwork

pub mod export;
pub mod ingest;

pub use export::{
    ExportError, ExportPaths, ExportReport, export_network, write_intersection_table,
    write_link_table,
};
pub use ingest::{
    ElementKind, IncidenceTracker, OsmIngestError, OsmIngestReport, OsmIngestSummary,
    RawDocument, RawElement, RawMetadata, SkippedElement, ingest_osm_json, ingest_point,
    ingest_way, map_tags, parse_document, parse_reader, parse_str,
};
