use std::collections::BTreeMap;
use std::fmt;

use geo::{Coord, Geometry, Point};

use crate::{NetworkElement, NodeId, Tags};

/// A network node: identity, coordinate and tags.
///
/// Coordinates are WGS84 with `x = longitude` and `y = latitude`. The
/// coordinate is fixed at construction; only the tags can grow afterwards,
/// through [`crate::PointTable::upsert`].
///
/// # Examples
/// ```
/// use geo::Coord;
/// use roadnet_core::{NodeId, PointEntity, Tags};
///
/// let point = PointEntity::new(
///     NodeId::new(1),
///     Coord { x: 15.04237, y: 58.546269 },
///     Tags::from([("highway".into(), "crossing".into())]),
/// );
///
/// assert_eq!(point.id(), NodeId::new(1));
/// assert_eq!(point.tag("highway"), Some("crossing"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PointEntity {
    id: NodeId,
    location: Coord<f64>,
    tags: Tags,
}

impl PointEntity {
    /// Construct a point entity.
    #[must_use]
    pub const fn new(id: NodeId, location: Coord<f64>, tags: Tags) -> Self {
        Self { id, location, tags }
    }

    /// Identifier of the point.
    #[must_use]
    pub const fn id(&self) -> NodeId {
        self.id
    }

    /// Coordinate of the point.
    #[must_use]
    pub const fn location(&self) -> Coord<f64> {
        self.location
    }

    /// Longitude in degrees.
    #[must_use]
    pub const fn lon(&self) -> f64 {
        self.location.x
    }

    /// Latitude in degrees.
    #[must_use]
    pub const fn lat(&self) -> f64 {
        self.location.y
    }

    /// All tags attached to the point.
    #[must_use]
    pub const fn tags(&self) -> &Tags {
        &self.tags
    }

    /// Look up a single tag value.
    #[must_use]
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }

    /// Whether `location` matches the stored coordinate exactly.
    ///
    /// No tolerance is applied: any numeric difference counts as a
    /// different coordinate.
    #[must_use]
    pub fn has_location(&self, location: Coord<f64>) -> bool {
        self.location.x == location.x && self.location.y == location.y
    }

    /// Consume the point, keeping only its tags.
    pub(crate) fn into_tags(self) -> Tags {
        self.tags
    }

    /// Merge `tags` into the stored tags, later values winning on collision.
    pub(crate) fn merge_tags(&mut self, tags: Tags) {
        self.tags.extend(tags);
    }
}

impl NetworkElement for PointEntity {
    fn element_id(&self) -> u64 {
        self.id.get()
    }

    fn geometry(&self) -> Geometry<f64> {
        Geometry::Point(Point::from(self.location))
    }
}

impl fmt::Display for PointEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "node {} ({:.6}, {:.6})",
            self.id, self.location.x, self.location.y
        )?;
        write_tags(f, &self.tags)
    }
}

/// Render tags one per line, sorted by key, or a marker when there are none.
pub(crate) fn write_tags(f: &mut fmt::Formatter<'_>, tags: &Tags) -> fmt::Result {
    if tags.is_empty() {
        return write!(f, "\n  no tags");
    }
    let sorted: BTreeMap<&str, &str> = tags
        .iter()
        .map(|(key, value)| (key.as_str(), value.as_str()))
        .collect();
    for (key, value) in sorted {
        write!(f, "\n  {key}={value}")?;
    }
    Ok(())
}
