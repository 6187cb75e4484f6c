//! Polyline entities: ordered point references forming a network link.

use std::fmt;

use geo::{Coord, Geometry, LineString};
use thiserror::Error;

use crate::point::write_tags;
use crate::{NetworkElement, NodeId, PointEntity, Tags, WayId};

/// Minimum number of point references in a polyline.
pub const MIN_POLYLINE_POINTS: usize = 2;

/// Errors returned by [`PolylineEntity::new`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PolylineError {
    /// Fewer than [`MIN_POLYLINE_POINTS`] points were supplied.
    #[error("polyline {id} needs at least {MIN_POLYLINE_POINTS} points, got {count}")]
    TooFewPoints {
        /// Identifier of the rejected polyline.
        id: WayId,
        /// Number of points supplied.
        count: usize,
    },
}

/// A network link built from an ordered sequence of points.
///
/// Points are referenced by [`NodeId`]; the owning [`crate::PointTable`]
/// resolves them. The line geometry is captured from the resolved points at
/// construction. Point coordinates never change once created, so the
/// captured line stays in step with the table.
///
/// Consecutive duplicates and closed loops are valid.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use roadnet_core::{NodeId, PointEntity, PolylineEntity, Tags, WayId};
///
/// # fn main() -> Result<(), roadnet_core::PolylineError> {
/// let a = PointEntity::new(NodeId::new(1), Coord { x: 15.04237, y: 58.546269 }, Tags::new());
/// let b = PointEntity::new(NodeId::new(2), Coord { x: 15.0448, y: 58.544477 }, Tags::new());
/// let link = PolylineEntity::new(WayId::new(10), &[&a, &b], Tags::new())?;
///
/// assert_eq!(link.nodes(), &[NodeId::new(1), NodeId::new(2)]);
/// assert_eq!(link.line_string().0.len(), 2);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PolylineEntity {
    id: WayId,
    nodes: Vec<NodeId>,
    line: LineString<f64>,
    tags: Tags,
}

impl PolylineEntity {
    /// Validate and construct a polyline from resolved points.
    pub fn new(id: WayId, points: &[&PointEntity], tags: Tags) -> Result<Self, PolylineError> {
        if points.len() < MIN_POLYLINE_POINTS {
            return Err(PolylineError::TooFewPoints {
                id,
                count: points.len(),
            });
        }
        let nodes = points.iter().map(|point| point.id()).collect();
        let coords: Vec<Coord<f64>> = points.iter().map(|point| point.location()).collect();
        Ok(Self {
            id,
            nodes,
            line: LineString::new(coords),
            tags,
        })
    }

    /// Identifier of the polyline.
    #[must_use]
    pub const fn id(&self) -> WayId {
        self.id
    }

    /// Ordered point references.
    #[must_use]
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// Line through the referenced point coordinates, in order.
    #[must_use]
    pub const fn line_string(&self) -> &LineString<f64> {
        &self.line
    }

    /// All tags attached to the polyline.
    #[must_use]
    pub const fn tags(&self) -> &Tags {
        &self.tags
    }

    /// Look up a single tag value.
    #[must_use]
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }

    /// Whether the first and last references name the same point.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.nodes.first() == self.nodes.last()
    }
}

impl NetworkElement for PolylineEntity {
    fn element_id(&self) -> u64 {
        self.id.get()
    }

    fn geometry(&self) -> Geometry<f64> {
        Geometry::LineString(self.line.clone())
    }
}

impl fmt::Display for PolylineEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "way {} through", self.id)?;
        for (node, coord) in self.nodes.iter().zip(self.line.coords()) {
            write!(f, "\n  node {node} ({:.6}, {:.6})", coord.x, coord.y)?;
        }
        write_tags(f, &self.tags)
    }
}
