//! Semicolon-delimited table export for a [`RoadNetwork`].
//!
//! Two tables are produced: one row per polyline (the link table) and one
//! row per intersection point (the intersection table). Attribute columns
//! are the union of tag keys across the exported rows, sorted by key, with
//! the WKT geometry in the final `geom` column.
use std::collections::BTreeSet;
use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use csv::{Writer, WriterBuilder};
use log::debug;
use roadnet_core::{RoadNetwork, Tags};
use tempfile::NamedTempFile;
use thiserror::Error;

mod wkt;

/// Field delimiter used by both tables.
pub const DELIMITER: u8 = b';';

/// Default file name of the link table.
pub const DEFAULT_LINKS_FILE: &str = "output.txt";

/// Default file name of the intersection table.
pub const DEFAULT_NODES_FILE: &str = "output_nodes.txt";

/// Errors raised while writing the exported tables.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExportError {
    /// The output directory could not be created.
    #[error("failed to create output directory {path}")]
    CreateDirectory {
        /// Directory that could not be created.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// A temporary file could not be created in the output directory.
    #[error("failed to create a temporary file in {path}")]
    CreateTemp {
        /// Directory holding the temporary file.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// A record could not be written.
    #[error("failed to write table record")]
    Write {
        /// Error reported by the CSV writer.
        #[source]
        source: csv::Error,
    },
    /// Buffered output could not be flushed.
    #[error("failed to flush table output")]
    Flush {
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// A finished table could not be moved into place.
    #[error("failed to persist table to {path}")]
    Persist {
        /// Final destination of the table.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

impl From<csv::Error> for ExportError {
    fn from(source: csv::Error) -> Self {
        Self::Write { source }
    }
}

/// File names of the exported tables inside the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPaths {
    /// Link table file name.
    pub links_file: String,
    /// Intersection table file name.
    pub nodes_file: String,
}

impl Default for ExportPaths {
    fn default() -> Self {
        Self {
            links_file: DEFAULT_LINKS_FILE.to_owned(),
            nodes_file: DEFAULT_NODES_FILE.to_owned(),
        }
    }
}

/// Outcome of a successful [`export_network`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    /// Where the link table was written.
    pub links_path: Utf8PathBuf,
    /// Number of link rows written.
    pub links: usize,
    /// Where the intersection table was written.
    pub nodes_path: Utf8PathBuf,
    /// Number of intersection rows written.
    pub intersections: usize,
}

fn table_writer<W: io::Write>(writer: W) -> Writer<W> {
    WriterBuilder::new().delimiter(DELIMITER).from_writer(writer)
}

fn sorted_keys<'a>(tags: impl Iterator<Item = &'a Tags>) -> Vec<&'a str> {
    tags.flat_map(|tags| tags.keys().map(String::as_str))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn header(id_column: &str, keys: &[&str]) -> Vec<String> {
    std::iter::once(id_column)
        .chain(keys.iter().copied())
        .chain(std::iter::once("geom"))
        .map(str::to_owned)
        .collect()
}

fn row(id: String, keys: &[&str], tags: &Tags, geom: String) -> Vec<String> {
    let mut fields = Vec::with_capacity(keys.len() + 2);
    fields.push(id);
    fields.extend(
        keys.iter()
            .map(|key| tags.get(*key).cloned().unwrap_or_default()),
    );
    fields.push(geom);
    fields
}

/// Write the link table: one row per polyline in identifier order.
///
/// Returns the number of rows written, excluding the header.
///
/// # Examples
/// ```
/// use roadnet_data::{parse_str, write_link_table};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let report = parse_str(r#"{
///     "osm3s": {"timestamp_osm_base": "2015-03-04T11:22:02Z"},
///     "elements": [
///         {"type": "node", "id": 1, "lon": 15.04237, "lat": 58.546269},
///         {"type": "node", "id": 2, "lon": 15.0448, "lat": 58.544477},
///         {"type": "way", "id": 10, "nodes": [1, 2], "tags": {"highway": "primary"}}
///     ]
/// }"#)?;
/// let mut out = Vec::new();
/// write_link_table(&report.network, &mut out)?;
/// assert_eq!(
///     String::from_utf8(out)?,
///     "link_id;highway;geom\n10;primary;LINESTRING (15.04237 58.546269, 15.0448 58.544477)\n"
/// );
/// # Ok(())
/// # }
/// ```
pub fn write_link_table<W: io::Write>(
    network: &RoadNetwork,
    writer: W,
) -> Result<usize, ExportError> {
    let polylines = network.polylines.sorted();
    let keys = sorted_keys(polylines.iter().map(|polyline| polyline.tags()));
    let mut table = table_writer(writer);
    table.write_record(header("link_id", &keys))?;
    for polyline in &polylines {
        table.write_record(row(
            polyline.id().to_string(),
            &keys,
            polyline.tags(),
            wkt::line_string(polyline.line_string()),
        ))?;
    }
    table.flush().map_err(|source| ExportError::Flush { source })?;
    Ok(polylines.len())
}

/// Write the intersection table: one row per intersection point in
/// identifier order.
///
/// Returns the number of rows written, excluding the header.
pub fn write_intersection_table<W: io::Write>(
    network: &RoadNetwork,
    writer: W,
) -> Result<usize, ExportError> {
    let points: Vec<_> = network.intersection_points().collect();
    let keys = sorted_keys(points.iter().map(|point| point.tags()));
    let mut table = table_writer(writer);
    table.write_record(header("node_id", &keys))?;
    for point in &points {
        table.write_record(row(
            point.id().to_string(),
            &keys,
            point.tags(),
            wkt::point(point.location()),
        ))?;
    }
    table.flush().map_err(|source| ExportError::Flush { source })?;
    Ok(points.len())
}

fn write_temp<F>(dir: &Utf8Path, write: F) -> Result<(NamedTempFile, usize), ExportError>
where
    F: FnOnce(&mut NamedTempFile) -> Result<usize, ExportError>,
{
    let mut temp = NamedTempFile::new_in(dir).map_err(|source| ExportError::CreateTemp {
        path: dir.to_path_buf(),
        source,
    })?;
    let rows = write(&mut temp)?;
    Ok((temp, rows))
}

fn persist(temp: NamedTempFile, path: &Utf8Path) -> Result<(), ExportError> {
    temp.persist(path)
        .map(drop)
        .map_err(|err| ExportError::Persist {
            path: path.to_path_buf(),
            source: err.error,
        })
}

/// Write both tables into `dir`, creating the directory when missing.
///
/// Each table is first written to a temporary file in `dir`. Neither file is
/// renamed into place until both tables are complete, so a failed write
/// never replaces an earlier export.
pub fn export_network(
    network: &RoadNetwork,
    dir: &Utf8Path,
    paths: &ExportPaths,
) -> Result<ExportReport, ExportError> {
    roadnet_fs::ensure_dir(dir).map_err(|source| ExportError::CreateDirectory {
        path: dir.to_path_buf(),
        source,
    })?;

    let (links_temp, links) = write_temp(dir, |file| write_link_table(network, file))?;
    let (nodes_temp, intersections) =
        write_temp(dir, |file| write_intersection_table(network, file))?;

    let links_path = dir.join(&paths.links_file);
    let nodes_path = dir.join(&paths.nodes_file);
    persist(links_temp, &links_path)?;
    persist(nodes_temp, &nodes_path)?;

    debug!("Wrote {links} links to {links_path} and {intersections} intersections to {nodes_path}");
    Ok(ExportReport {
        links_path,
        links,
        nodes_path,
        intersections,
    })
}
