//! Two-phase accumulator for Overpass JSON ingestion.
//!
//! [`PointPhase`] consumes the element stream: nodes land in the point table
//! straight away, ways wait in a FIFO buffer. Finishing the phase yields
//! [`CompletedPoints`], the only value from which ways can be resolved, so no
//! way is ever checked against a partially populated point table.
use std::collections::VecDeque;

use log::{debug, warn};
use roadnet_core::{PointTable, PolylineTable, Provenance, RoadNetwork};

use super::point::ingest_point;
use super::polyline::{IncidenceTracker, ingest_way};
use super::{ElementKind, OsmIngestError, OsmIngestReport, OsmIngestSummary, RawElement};

#[derive(Debug, Default)]
pub(super) struct PointPhase {
    summary: OsmIngestSummary,
    points: PointTable,
    deferred_ways: VecDeque<RawElement>,
}

impl PointPhase {
    pub(super) fn process_element(&mut self, element: RawElement) -> Result<(), OsmIngestError> {
        match element.kind() {
            ElementKind::Node => {
                ingest_point(&element, &mut self.points)?;
                self.summary.record_node(element.location()?);
            }
            ElementKind::Way => {
                self.summary.record_way();
                self.deferred_ways.push_back(element);
            }
            ElementKind::Other(declared) => {
                warn!(
                    "Skipping element {} with unsupported type `{}`",
                    element.index(),
                    element.kind()
                );
                self.summary.record_skipped(element.index(), declared);
            }
        }
        Ok(())
    }

    pub(super) fn finish(self) -> CompletedPoints {
        CompletedPoints {
            summary: self.summary,
            points: self.points,
            deferred_ways: self.deferred_ways,
        }
    }
}

#[derive(Debug)]
pub(super) struct CompletedPoints {
    summary: OsmIngestSummary,
    points: PointTable,
    deferred_ways: VecDeque<RawElement>,
}

impl CompletedPoints {
    pub(super) fn resolve_ways(
        mut self,
        provenance: Provenance,
    ) -> Result<OsmIngestReport, OsmIngestError> {
        debug!(
            "Resolving {} deferred ways against {} points",
            self.deferred_ways.len(),
            self.points.len()
        );
        let mut polylines = PolylineTable::new();
        let mut incidences = IncidenceTracker::new();
        while let Some(way) = self.deferred_ways.pop_front() {
            ingest_way(&way, &self.points, &mut polylines, &mut incidences)?;
        }
        Ok(OsmIngestReport {
            summary: self.summary,
            network: RoadNetwork {
                points: self.points,
                polylines,
                intersections: incidences.into_intersections(),
                provenance,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roadnet_core::{NodeId, WayId};
    use serde_json::{Value, json};

    fn run(records: Vec<Value>) -> Result<OsmIngestReport, OsmIngestError> {
        let mut phase = PointPhase::default();
        for (index, record) in records.into_iter().enumerate() {
            phase.process_element(RawElement::from_value(index, record)?)?;
        }
        phase
            .finish()
            .resolve_ways(Provenance::new("2015-03-04T11:22:02Z"))
    }

    #[test]
    fn ways_may_precede_their_nodes() {
        let report = run(vec![
            json!({"type": "way", "id": 10, "nodes": [1, 2]}),
            json!({"type": "node", "id": 1, "lon": 0.0, "lat": 0.0}),
            json!({"type": "node", "id": 2, "lon": 1.0, "lat": 1.0}),
        ])
        .expect("forward references resolve");
        assert!(report.network.polylines.contains(WayId::new(10)));
        assert_eq!(report.summary.nodes, 2);
        assert_eq!(report.summary.ways, 1);
    }

    #[test]
    fn ways_resolve_in_input_order() {
        let err = run(vec![
            json!({"type": "node", "id": 1, "lon": 0.0, "lat": 0.0}),
            json!({"type": "way", "id": 10, "nodes": [1, 7]}),
            json!({"type": "way", "id": 11, "nodes": [1, 8]}),
        ])
        .expect_err("first buffered way fails first");
        assert!(matches!(
            err,
            OsmIngestError::UnresolvedPointReference { way_id, point_id }
                if way_id == WayId::new(10) && point_id == NodeId::new(7)
        ));
    }

    #[test]
    fn unknown_kinds_are_recorded_and_skipped() {
        let report = run(vec![
            json!({"type": "relation", "id": 5, "members": []}),
            json!({"type": "node", "id": 1, "lon": 0.0, "lat": 0.0}),
            json!({"type": "area", "id": 6}),
        ])
        .expect("skips are recoverable");
        let skipped: Vec<(usize, &str)> = report
            .summary
            .skipped
            .iter()
            .map(|skip| (skip.index, skip.kind.as_str()))
            .collect();
        assert_eq!(skipped, vec![(0, "relation"), (2, "area")]);
        assert_eq!(report.network.points.len(), 1);
    }

    #[test]
    fn malformed_deferred_way_aborts() {
        let err = run(vec![
            json!({"type": "node", "id": 1, "lon": 0.0, "lat": 0.0}),
            json!({"type": "way", "id": 10}),
        ])
        .expect_err("way without references");
        assert!(matches!(
            err,
            OsmIngestError::MalformedRecord {
                index: 1,
                kind: "way",
                field: "nodes",
                ..
            }
        ));
    }
}
