//! Capability shared by every network entity.

use geo::Geometry;

/// Anything in the network with an identity and a geometry.
///
/// Points expose a [`geo::Point`] and polylines a [`geo::LineString`], both
/// wrapped in [`Geometry`] so exporters can treat them uniformly.
///
/// # Examples
/// ```
/// use geo::{Coord, Geometry};
/// use roadnet_core::{NetworkElement, NodeId, PointEntity, Tags};
///
/// let point = PointEntity::new(NodeId::new(7), Coord { x: 1.0, y: 2.0 }, Tags::new());
/// assert_eq!(point.element_id(), 7);
/// assert!(matches!(point.geometry(), Geometry::Point(_)));
/// ```
pub trait NetworkElement {
    /// Raw identifier of the element within its own namespace.
    fn element_id(&self) -> u64;

    /// Geometry of the element in WGS84 (`x = longitude`, `y = latitude`).
    fn geometry(&self) -> Geometry<f64>;
}
