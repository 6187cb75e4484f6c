//! Raw Overpass API JSON records and typed field access.
//!
//! Records stay as JSON objects until an ingestion stage asks for a field,
//! so each missing or mistyped field can be reported with its element index.

use std::fmt;

use geo::Coord;
use roadnet_core::{NodeId, Provenance, Tags, WayId};
use serde::Deserialize;
use serde_json::{Map, Value};

use super::OsmIngestError;
use super::ids::coerce_raw_id;
use super::tags::map_tags;

/// Top-level shape of an Overpass API JSON document.
///
/// Unknown top-level fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawDocument {
    /// Server metadata holding the extraction timestamp.
    #[serde(default)]
    pub osm3s: Option<RawMetadata>,
    /// The raw element records, in input order.
    #[serde(default)]
    pub elements: Vec<Value>,
}

/// The `osm3s` metadata object.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMetadata {
    /// Time the extract was taken from the OSM database.
    #[serde(default)]
    pub timestamp_osm_base: Option<String>,
}

impl RawDocument {
    /// Read the provenance timestamp.
    pub fn provenance(&self) -> Result<Provenance, OsmIngestError> {
        let metadata = self
            .osm3s
            .as_ref()
            .ok_or(OsmIngestError::MalformedDocument {
                reason: "missing `osm3s` metadata object",
            })?;
        let timestamp =
            metadata
                .timestamp_osm_base
                .as_deref()
                .ok_or(OsmIngestError::MalformedDocument {
                    reason: "missing `osm3s.timestamp_osm_base` string",
                })?;
        Ok(Provenance::new(timestamp))
    }
}

/// Declared kind of a raw record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementKind {
    /// A point record.
    Node,
    /// A polyline record.
    Way,
    /// Any other declared kind, kept verbatim for diagnostics.
    Other(String),
}

impl ElementKind {
    /// Classify a declared `type`, ignoring ASCII case.
    #[must_use]
    pub fn classify(declared: &str) -> Self {
        if declared.eq_ignore_ascii_case("node") {
            Self::Node
        } else if declared.eq_ignore_ascii_case("way") {
            Self::Way
        } else {
            Self::Other(declared.to_owned())
        }
    }

    const fn label(&self) -> &'static str {
        match self {
            Self::Node => "node",
            Self::Way => "way",
            Self::Other(_) => "element",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Other(declared) => f.write_str(declared),
            known => f.write_str(known.label()),
        }
    }
}

/// One record from the `elements` array, with its position.
#[derive(Debug, Clone, PartialEq)]
pub struct RawElement {
    index: usize,
    kind: ElementKind,
    fields: Map<String, Value>,
}

impl RawElement {
    /// Wrap a JSON value found at `index`.
    ///
    /// Fails when the value is not an object or lacks a string `type`.
    ///
    /// # Examples
    /// ```
    /// use roadnet_data::{ElementKind, RawElement};
    /// use serde_json::json;
    ///
    /// # fn main() -> Result<(), roadnet_data::OsmIngestError> {
    /// let element = RawElement::from_value(0, json!({"type": "NODE", "id": 1}))?;
    /// assert_eq!(element.kind(), &ElementKind::Node);
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_value(index: usize, value: Value) -> Result<Self, OsmIngestError> {
        let Value::Object(fields) = value else {
            return Err(malformed(
                index,
                "element",
                "type",
                "is unavailable because the record is not an object",
            ));
        };
        let kind = match fields.get("type") {
            Some(Value::String(declared)) => ElementKind::classify(declared),
            Some(_) => {
                return Err(malformed(index, "element", "type", "must be a string"));
            }
            None => return Err(malformed(index, "element", "type", "is missing")),
        };
        Ok(Self {
            index,
            kind,
            fields,
        })
    }

    /// Position of the record in the input.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Declared kind of the record.
    #[must_use]
    pub const fn kind(&self) -> &ElementKind {
        &self.kind
    }

    pub(super) fn node_id(&self) -> Result<NodeId, OsmIngestError> {
        self.raw_id().map(NodeId::new)
    }

    pub(super) fn way_id(&self) -> Result<WayId, OsmIngestError> {
        self.raw_id().map(WayId::new)
    }

    fn raw_id(&self) -> Result<u64, OsmIngestError> {
        let value = self.required("id")?;
        coerce_raw_id(value).map_err(|reason| self.malformed("id", reason))
    }

    pub(super) fn location(&self) -> Result<Coord<f64>, OsmIngestError> {
        Ok(Coord {
            x: self.degrees("lon")?,
            y: self.degrees("lat")?,
        })
    }

    fn degrees(&self, field: &'static str) -> Result<f64, OsmIngestError> {
        self.required(field)?
            .as_f64()
            .ok_or_else(|| self.malformed(field, "must be a number"))
    }

    pub(super) fn tags(&self) -> Result<Tags, OsmIngestError> {
        match self.fields.get("tags") {
            None | Some(Value::Null) => Ok(map_tags(None)),
            Some(Value::Object(raw)) => Ok(map_tags(Some(raw))),
            Some(_) => Err(self.malformed("tags", "must be an object")),
        }
    }

    pub(super) fn node_refs(&self) -> Result<Vec<NodeId>, OsmIngestError> {
        let Value::Array(refs) = self.required("nodes")? else {
            return Err(self.malformed("nodes", "must be an array of node identifiers"));
        };
        refs.iter()
            .enumerate()
            .map(|(position, raw)| {
                coerce_raw_id(raw).map(NodeId::new).map_err(|reason| {
                    self.malformed("nodes", &format!("entry {position} {reason}"))
                })
            })
            .collect()
    }

    fn required(&self, field: &'static str) -> Result<&Value, OsmIngestError> {
        match self.fields.get(field) {
            None | Some(Value::Null) => Err(self.malformed(field, "is missing")),
            Some(value) => Ok(value),
        }
    }

    pub(super) fn malformed(&self, field: &'static str, reason: &str) -> OsmIngestError {
        malformed(self.index, self.kind.label(), field, reason)
    }
}

fn malformed(index: usize, kind: &'static str, field: &'static str, reason: &str) -> OsmIngestError {
    OsmIngestError::MalformedRecord {
        index,
        kind,
        field,
        reason: reason.to_owned(),
    }
}
