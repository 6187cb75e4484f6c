//! Polyline ingestion: way records into the polyline table.
//!
//! Runs after every node has been ingested. Way records may reference nodes
//! that appear later in the input, so resolving them earlier would reject
//! valid extracts.

use std::collections::HashSet;

use roadnet_core::{
    IntersectionSet, NodeId, PointEntity, PointTable, PolylineEntity, PolylineTable,
};

use super::{OsmIngestError, RawElement};

/// Incidence bookkeeping shared across all ways of a run.
///
/// A point enters the intersection set on its second incidence, whether that
/// comes from another way or from the same way referencing it again.
#[derive(Debug, Clone, Default)]
pub struct IncidenceTracker {
    used: HashSet<NodeId>,
    intersections: IntersectionSet,
}

impl IncidenceTracker {
    /// Create an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one incidence of `id`.
    ///
    /// Returns `true` when the point became an intersection with this call.
    pub fn record(&mut self, id: NodeId) -> bool {
        if self.used.insert(id) {
            false
        } else {
            self.intersections.insert(id)
        }
    }

    /// Whether `id` has been referenced at least once.
    #[must_use]
    pub fn is_used(&self, id: NodeId) -> bool {
        self.used.contains(&id)
    }

    /// Intersections detected so far.
    #[must_use]
    pub const fn intersections(&self) -> &IntersectionSet {
        &self.intersections
    }

    /// Consume the tracker, keeping the intersection set.
    #[must_use]
    pub fn into_intersections(self) -> IntersectionSet {
        self.intersections
    }
}

/// Ingest one way record into `polylines`.
///
/// Every referenced node must already be in `points`; each reference counts
/// as one incidence in `incidences`. Fails with
/// [`OsmIngestError::UnresolvedPointReference`] for an unknown node and
/// [`OsmIngestError::DuplicatePolylineId`] for a repeated way identifier, in
/// which case the stored polyline is kept.
///
/// # Examples
/// ```
/// use roadnet_core::{NodeId, PointTable, PolylineTable, WayId};
/// use roadnet_data::{IncidenceTracker, RawElement, ingest_point, ingest_way};
/// use serde_json::json;
///
/// # fn main() -> Result<(), roadnet_data::OsmIngestError> {
/// let mut points = PointTable::new();
/// for (index, (id, lon)) in [(1, 0.0), (2, 1.0)].into_iter().enumerate() {
///     let node = json!({"type": "node", "id": id, "lon": lon, "lat": 0.0});
///     ingest_point(&RawElement::from_value(index, node)?, &mut points)?;
/// }
///
/// let mut polylines = PolylineTable::new();
/// let mut incidences = IncidenceTracker::new();
/// let loop_way = json!({"type": "way", "id": 10, "nodes": [1, 2, 1]});
/// ingest_way(&RawElement::from_value(2, loop_way)?, &points, &mut polylines, &mut incidences)?;
///
/// assert!(polylines.contains(WayId::new(10)));
/// assert!(incidences.intersections().contains(NodeId::new(1)));
/// # Ok(())
/// # }
/// ```
pub fn ingest_way(
    element: &RawElement,
    points: &PointTable,
    polylines: &mut PolylineTable,
    incidences: &mut IncidenceTracker,
) -> Result<(), OsmIngestError> {
    let way_id = element.way_id()?;
    let tags = element.tags()?;
    let refs = element.node_refs()?;
    if refs.len() < roadnet_core::polyline::MIN_POLYLINE_POINTS {
        return Err(element.malformed(
            "nodes",
            &format!("must hold at least two node identifiers, got {}", refs.len()),
        ));
    }

    let mut resolved: Vec<&PointEntity> = Vec::with_capacity(refs.len());
    for point_id in refs {
        let point = points
            .get(point_id)
            .ok_or(OsmIngestError::UnresolvedPointReference { way_id, point_id })?;
        incidences.record(point_id);
        resolved.push(point);
    }

    if polylines.contains(way_id) {
        return Err(OsmIngestError::DuplicatePolylineId { way_id });
    }
    let polyline = PolylineEntity::new(way_id, &resolved, tags)
        .map_err(|err| element.malformed("nodes", &err.to_string()))?;
    polylines
        .insert(polyline)
        .map_err(|duplicate| OsmIngestError::DuplicatePolylineId {
            way_id: duplicate.id,
        })
}
