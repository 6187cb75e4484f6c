//! Well-known text rendering for exported geometries.
//!
//! Coordinates are written as `x y` with Rust's shortest round-trip float
//! formatting, so a value read back parses to the same `f64`.

use geo::{Coord, LineString};

/// Render a coordinate as `POINT (x y)`.
pub(crate) fn point(location: Coord<f64>) -> String {
    format!("POINT ({} {})", location.x, location.y)
}

/// Render a line as `LINESTRING (x y, x y, ...)`.
pub(crate) fn line_string(line: &LineString<f64>) -> String {
    let coords: Vec<String> = line
        .coords()
        .map(|coord| format!("{} {}", coord.x, coord.y))
        .collect();
    format!("LINESTRING ({})", coords.join(", "))
}
