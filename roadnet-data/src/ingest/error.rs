//! Errors raised while turning an OSM JSON extract into a road network.

use std::io;

use camino::Utf8PathBuf;
use geo::Coord;
use roadnet_core::{CoordinateConflict, NodeId, WayId};
use thiserror::Error;

/// Errors returned by the ingestion entry points.
///
/// Every variant aborts the run: no partial network is ever returned.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum OsmIngestError {
    /// The input file could not be opened.
    #[error("failed to open OSM JSON file at {path:?}")]
    Open {
        /// Path that failed to open.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The input is not a valid extract document.
    #[error("failed to decode OSM JSON data")]
    Decode {
        /// Decoder error returned by `serde_json`.
        #[source]
        source: serde_json::Error,
    },
    /// The input file is not a valid extract document.
    #[error("failed to decode OSM JSON data at {path:?}")]
    DecodeFile {
        /// Path of the offending file.
        path: Utf8PathBuf,
        /// Decoder error returned by `serde_json`.
        #[source]
        source: serde_json::Error,
    },
    /// Document-level metadata is missing or has the wrong type.
    #[error("malformed document: {reason}")]
    MalformedDocument {
        /// What is wrong with the document.
        reason: &'static str,
    },
    /// A required record field is missing or cannot be coerced.
    #[error("malformed {kind} record at element {index}: field `{field}` {reason}")]
    MalformedRecord {
        /// Position of the record in the `elements` array.
        index: usize,
        /// Declared kind of the record.
        kind: &'static str,
        /// Name of the offending field.
        field: &'static str,
        /// Why the field was rejected.
        reason: String,
    },
    /// A repeated node identifier arrived with a different coordinate.
    #[error(
        "node {id} appears at ({}, {}) and at ({}, {})",
        stored.x, stored.y, incoming.x, incoming.y
    )]
    CoordinateMismatch {
        /// Identifier shared by both records.
        id: NodeId,
        /// Coordinate from the first record.
        stored: Coord<f64>,
        /// Coordinate from the rejected record.
        incoming: Coord<f64>,
    },
    /// A way references a node that never appeared in the input.
    #[error("way {way_id} references unknown node {point_id}")]
    UnresolvedPointReference {
        /// Way carrying the reference.
        way_id: WayId,
        /// Node identifier that could not be resolved.
        point_id: NodeId,
    },
    /// Two way records share an identifier.
    #[error("way {way_id} already exists")]
    DuplicatePolylineId {
        /// The repeated identifier.
        way_id: WayId,
    },
}

impl From<CoordinateConflict> for OsmIngestError {
    fn from(conflict: CoordinateConflict) -> Self {
        let CoordinateConflict {
            id,
            stored,
            incoming,
        } = conflict;
        Self::CoordinateMismatch {
            id,
            stored,
            incoming,
        }
    }
}
