//! Point ingestion: node records into the point table.

use roadnet_core::{PointEntity, PointTable};

use super::{OsmIngestError, RawElement};

/// Ingest one node record into `points`.
///
/// A new identifier inserts a point. A known identifier with exactly the same
/// coordinate merges the record's tags into the stored point, later values
/// winning. A known identifier at any other coordinate fails with
/// [`OsmIngestError::CoordinateMismatch`] and leaves the table untouched.
/// There is deliberately no floating-point tolerance.
///
/// # Examples
/// ```
/// use roadnet_core::{NodeId, PointTable};
/// use roadnet_data::{RawElement, ingest_point};
/// use serde_json::json;
///
/// # fn main() -> Result<(), roadnet_data::OsmIngestError> {
/// let mut points = PointTable::new();
/// let record = json!({"type": "node", "id": 1, "lon": 15.04237, "lat": 58.546269});
/// ingest_point(&RawElement::from_value(0, record)?, &mut points)?;
/// assert!(points.contains(NodeId::new(1)));
/// # Ok(())
/// # }
/// ```
pub fn ingest_point(element: &RawElement, points: &mut PointTable) -> Result<(), OsmIngestError> {
    let id = element.node_id()?;
    let location = element.location()?;
    let tags = element.tags()?;
    points.upsert(PointEntity::new(id, location, tags))?;
    Ok(())
}
