//! Union of polygon coverage masks, with the "nothing drawn selects
//! everything" fallback and outward-only feathering.
//!
//! The union is a reduction with elementwise max. Max is associative,
//! commutative and idempotent, so the sequential fold and the rayon reduce
//! produce bit-identical masks for any polygon order.

#[cfg(feature = "multithreading")]
use rayon::prelude::*;

use crate::raster::rasterize;
use crate::types::{Feather, Mask, PolygonSet};
use crate::vision::{gaussian_blur, max_in_place, union};

/// Sharp union of every fillable polygon. All zeros when nothing was drawn.
#[cfg(feature = "multithreading")]
pub fn union_mask(polygons: &PolygonSet, width: usize, height: usize) -> Mask {
    polygons
        .polygons()
        .par_iter()
        .filter_map(|polygon| rasterize(polygon, width, height))
        .reduce(|| Mask::zeros(width, height), union)
}

/// Sharp union of every fillable polygon. All zeros when nothing was drawn.
#[cfg(not(feature = "multithreading"))]
pub fn union_mask(polygons: &PolygonSet, width: usize, height: usize) -> Mask {
    polygons
        .iter()
        .filter_map(|polygon| rasterize(polygon, width, height))
        .fold(Mask::zeros(width, height), union)
}

/// Build the final mask for a request.
///
/// * No polygon contributes coverage: every pixel is selected (all ones).
/// * `feather == 0`: the sharp union, untouched.
/// * `feather > 0`: `max(sharp, gaussian(sharp, feather))`, so the solid
///   interior stays at 1.0 and only the outside gains a soft falloff.
pub fn combine(polygons: &PolygonSet, width: usize, height: usize, feather: Feather) -> Mask {
    let mut combined = union_mask(polygons, width, height);

    if combined.max_value() == 0.0 {
        log::debug!(
            "No polygon coverage ({} polygon(s) given); selecting the whole {width}x{height} image",
            polygons.len()
        );
        return Mask::ones(width, height);
    }

    if !feather.is_none() {
        let blurred = gaussian_blur(&combined, f64::from(feather.0));
        max_in_place(&mut combined, &blurred);
    }
    combined
}
