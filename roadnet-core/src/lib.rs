//! Core domain types for road network extraction.
//!
//! The model is deliberately small: point entities with immutable
//! coordinates, polylines that reference points by identifier, and the
//! tables that own them for the duration of a parse. Constructors and table
//! operations return `Result` so integrity violations surface early.

use std::collections::HashMap;

pub mod element;
pub mod ids;
pub mod network;
pub mod point;
pub mod polyline;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use element::NetworkElement;
pub use ids::{NodeId, WayId};
pub use network::{
    CoordinateConflict, DuplicatePolyline, IntersectionSet, PointTable, PolylineTable, Provenance,
    RoadNetwork, Upsert,
};
pub use point::PointEntity;
pub use polyline::{PolylineEntity, PolylineError};

/// Free-form key/value attributes attached to points and polylines.
///
/// Mirrors OpenStreetMap's tag structure. Keys are unique; iteration order
/// carries no meaning.
pub type Tags = HashMap<String, String>;
