//! Owned tables for a single extraction run and the resulting network.
//!
//! The tables are plain stores passed by reference to the ingestion stages;
//! there is no shared global state. Each enforces one integrity rule:
//!
//! - [`PointTable`] keeps coordinates immutable and merges tags on repeats.
//! - [`PolylineTable`] rejects a second polyline with an existing identifier.
//! - [`IntersectionSet`] only ever grows.

use std::collections::hash_map::Entry;
use std::collections::{BTreeSet, HashMap};

use geo::Coord;
use thiserror::Error;

use crate::{NodeId, PointEntity, PolylineEntity, WayId};

/// A repeated point identifier arrived with a different coordinate.
#[derive(Debug, Clone, Error, PartialEq)]
#[error(
    "point {id} already stored at ({}, {}), refusing ({}, {})",
    stored.x, stored.y, incoming.x, incoming.y
)]
pub struct CoordinateConflict {
    /// Identifier shared by both records.
    pub id: NodeId,
    /// Coordinate already held by the table.
    pub stored: Coord<f64>,
    /// Coordinate carried by the rejected record.
    pub incoming: Coord<f64>,
}

/// A polyline identifier was inserted twice.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("polyline {id} already exists")]
pub struct DuplicatePolyline {
    /// The repeated identifier.
    pub id: WayId,
}

/// Outcome of [`PointTable::upsert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    /// The identifier was new and the point was stored.
    Inserted,
    /// The identifier existed; the incoming tags were merged.
    Merged,
}

/// Point entities keyed by identifier.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use roadnet_core::{NodeId, PointEntity, PointTable, Tags, Upsert};
///
/// # fn main() -> Result<(), roadnet_core::CoordinateConflict> {
/// let mut table = PointTable::new();
/// let at = Coord { x: 1.0, y: 2.0 };
/// let first = PointEntity::new(NodeId::new(1), at, Tags::from([("a".into(), "1".into())]));
/// let again = PointEntity::new(NodeId::new(1), at, Tags::from([("b".into(), "2".into())]));
///
/// assert_eq!(table.upsert(first)?, Upsert::Inserted);
/// assert_eq!(table.upsert(again)?, Upsert::Merged);
/// assert_eq!(table.len(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointTable {
    points: HashMap<NodeId, PointEntity>,
}

impl PointTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new point or merge its tags into the stored one.
    ///
    /// Fails, leaving the stored point untouched, when the identifier exists
    /// with a different coordinate.
    pub fn upsert(&mut self, point: PointEntity) -> Result<Upsert, CoordinateConflict> {
        match self.points.entry(point.id()) {
            Entry::Vacant(slot) => {
                slot.insert(point);
                Ok(Upsert::Inserted)
            }
            Entry::Occupied(mut slot) => {
                let stored = slot.get_mut();
                if !stored.has_location(point.location()) {
                    return Err(CoordinateConflict {
                        id: point.id(),
                        stored: stored.location(),
                        incoming: point.location(),
                    });
                }
                stored.merge_tags(point.into_tags());
                Ok(Upsert::Merged)
            }
        }
    }

    /// Look up a point.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&PointEntity> {
        self.points.get(&id)
    }

    /// Whether the identifier is present.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.points.contains_key(&id)
    }

    /// Number of stored points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Iterate over the stored points in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = &PointEntity> {
        self.points.values()
    }
}

/// Polyline entities keyed by identifier.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolylineTable {
    polylines: HashMap<WayId, PolylineEntity>,
}

impl PolylineTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a polyline, refusing identifiers that already exist.
    ///
    /// The stored polyline is never replaced.
    pub fn insert(&mut self, polyline: PolylineEntity) -> Result<(), DuplicatePolyline> {
        match self.polylines.entry(polyline.id()) {
            Entry::Vacant(slot) => {
                slot.insert(polyline);
                Ok(())
            }
            Entry::Occupied(slot) => Err(DuplicatePolyline { id: *slot.key() }),
        }
    }

    /// Look up a polyline.
    #[must_use]
    pub fn get(&self, id: WayId) -> Option<&PolylineEntity> {
        self.polylines.get(&id)
    }

    /// Whether the identifier is present.
    #[must_use]
    pub fn contains(&self, id: WayId) -> bool {
        self.polylines.contains_key(&id)
    }

    /// Number of stored polylines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.polylines.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.polylines.is_empty()
    }

    /// Iterate over the stored polylines in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = &PolylineEntity> {
        self.polylines.values()
    }

    /// Polylines ordered by identifier.
    #[must_use]
    pub fn sorted(&self) -> Vec<&PolylineEntity> {
        let mut polylines: Vec<&PolylineEntity> = self.polylines.values().collect();
        polylines.sort_by_key(|polyline| polyline.id());
        polylines
    }
}

/// Point identifiers referenced by two or more polyline incidences.
///
/// Append-only; iteration is in ascending identifier order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntersectionSet {
    ids: BTreeSet<NodeId>,
}

impl IntersectionSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an identifier; returns `false` when it was already present.
    pub fn insert(&mut self, id: NodeId) -> bool {
        self.ids.insert(id)
    }

    /// Whether the identifier is an intersection.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.ids.contains(&id)
    }

    /// Number of intersections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether no intersections were detected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Iterate in ascending identifier order.
    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.ids.iter().copied()
    }
}

impl FromIterator<NodeId> for IntersectionSet {
    fn from_iter<I: IntoIterator<Item = NodeId>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

/// Extraction time of the source dataset, carried through unmodified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provenance {
    timestamp: String,
}

impl Provenance {
    /// Wrap a timestamp string.
    pub fn new(timestamp: impl Into<String>) -> Self {
        Self {
            timestamp: timestamp.into(),
        }
    }

    /// The timestamp exactly as read from the source.
    #[must_use]
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }
}

/// The result of a complete extraction run.
#[derive(Debug, Clone, PartialEq)]
pub struct RoadNetwork {
    /// Every point seen in the input.
    pub points: PointTable,
    /// Every polyline built from the input.
    pub polylines: PolylineTable,
    /// Points with two or more polyline incidences.
    pub intersections: IntersectionSet,
    /// Dataset extraction time.
    pub provenance: Provenance,
}

impl RoadNetwork {
    /// Intersection points in ascending identifier order.
    ///
    /// Identifiers missing from the point table are skipped; ingestion never
    /// produces them.
    pub fn intersection_points(&self) -> impl Iterator<Item = &PointEntity> {
        self.intersections
            .iter()
            .filter_map(|id| self.points.get(id))
    }

    /// Resolve the points of a polyline through the point table.
    pub fn polyline_points<'a>(
        &'a self,
        polyline: &'a PolylineEntity,
    ) -> impl Iterator<Item = Option<&'a PointEntity>> + 'a {
        polyline.nodes().iter().map(|id| self.points.get(*id))
    }
}
