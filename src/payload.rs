//! Polygon payload parsing.
//!
//! The authoring widget stores its polygons as JSON text. Two shapes are
//! understood:
//!
//! * `[{"points": [{"x": 1, "y": 2}, ...]}, ...]`, one object per polygon
//!   (extra keys are ignored, a missing `points` is an empty polygon);
//! * `[{"x": 1, "y": 2}, ...]`, a bare point list, read as a single polygon.
//!
//! Anything else degrades to an empty [`PolygonSet`], which the combiner turns
//! into a fully selected mask. Bad authoring data never fails a request.

use serde::Deserialize;

use crate::types::{Point, Polygon, PolygonSet};

// Variant order matters: a polygon object ignores unknown keys, so a bare
// point would also deserialize as an (empty) polygon.
#[derive(Deserialize)]
#[serde(untagged)]
enum Payload {
    Points(Vec<Point>),
    Polygons(Vec<Polygon>),
}

impl From<Payload> for PolygonSet {
    fn from(payload: Payload) -> Self {
        match payload {
            Payload::Polygons(polygons) => PolygonSet::new(polygons),
            Payload::Points(points) if points.is_empty() => PolygonSet::empty(),
            Payload::Points(points) => PolygonSet::new(vec![Polygon::new(points)]),
        }
    }
}

/// Strict parse. Exposed so callers can tell a bad payload from an empty one.
pub fn try_parse(text: &str) -> Result<PolygonSet, serde_json::Error> {
    serde_json::from_str::<Payload>(text).map(PolygonSet::from)
}

/// Fail-open parse: any error yields the empty set.
pub fn parse(text: &str) -> PolygonSet {
    if text.trim().is_empty() {
        return PolygonSet::empty();
    }
    match try_parse(text) {
        Ok(set) => {
            log::debug!(
                "Parsed {} polygon(s), {} fillable",
                set.len(),
                set.fillable().count()
            );
            set
        }
        Err(e) => {
            log::warn!("Ignoring malformed polygon data ({e}); selecting the whole image");
            PolygonSet::empty()
        }
    }
}
