//! Polygon scan conversion.
//!
//! Pixel `(px, py)` is sampled at the integer point `(px, py)`. The interior
//! is filled scanline by scanline with the even-odd rule, then every edge is
//! traced so that pixels the outline passes through are covered as well. A
//! square from `(0,0)` to `(50,50)` therefore covers columns and rows `0..=50`.
//!
//! Work per polygon is bounded by `height * edges`, so vertices far outside
//! the canvas cost nothing extra.

use crate::types::{Mask, Point, Polygon};

/// Rasterize one polygon into a binary coverage mask at `width` x `height`.
/// Returns `None` for polygons that cannot be filled (fewer than three
/// points or non-finite coordinates); callers leave those out of the union.
pub fn rasterize(polygon: &Polygon, width: usize, height: usize) -> Option<Mask> {
    if !polygon.is_fillable() {
        return None;
    }
    let mut mask = Mask::zeros(width, height);
    if width == 0 || height == 0 {
        return Some(mask);
    }

    let edges = edges(&polygon.points);
    fill_interior(&mut mask, &edges);
    for &(a, b) in &edges {
        trace_edge(&mut mask, a, b);
    }
    Some(mask)
}

/// Closed edge list: last point connects to the first.
fn edges(points: &[Point]) -> Vec<(Point, Point)> {
    points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(&a, &b)| (a, b))
        .collect()
}

/// Set `mask[y][x0..=x1]` to 1.0, with the span clipped to the canvas.
fn fill_span(mask: &mut Mask, y: usize, x0: f64, x1: f64) {
    let last = (mask.width - 1) as f64;
    if x1 < 0.0 || x0 > last || x0 > x1 {
        return;
    }
    let start = x0.max(0.0) as usize;
    let end = x1.min(last) as usize;
    let row = y * mask.width;
    for a in &mut mask.alpha[row + start..=row + end] {
        *a = 1.0;
    }
}

/// Canvas rows whose sample lines fall inside `[lo, hi]`.
fn rows_between(lo: f64, hi: f64, height: usize) -> std::ops::RangeInclusive<usize> {
    let last = (height - 1) as f64;
    let first = lo.ceil().max(0.0);
    let end = hi.floor().min(last);
    if first > end {
        return 1..=0;
    }
    first as usize..=end as usize
}

fn fill_interior(mask: &mut Mask, edges: &[(Point, Point)]) {
    let (min_y, max_y) = edges
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (a, _)| {
            (lo.min(a.y), hi.max(a.y))
        });

    let mut crossings: Vec<f64> = Vec::with_capacity(edges.len());
    for py in rows_between(min_y, max_y, mask.height) {
        let y = py as f64;
        crossings.clear();
        for &(a, b) in edges {
            // Half-open in y so a shared vertex is counted once.
            let (lo, hi) = if a.y < b.y { (a, b) } else { (b, a) };
            if lo.y <= y && y < hi.y {
                crossings.push(lo.x + (y - lo.y) * (hi.x - lo.x) / (hi.y - lo.y));
            }
        }
        crossings.sort_by(f64::total_cmp);
        for pair in crossings.chunks_exact(2) {
            fill_span(mask, py, pair[0].ceil(), pair[1].floor());
        }
    }
}

/// Mark the pixels an edge passes through. Each row owns the band
/// `[py - 0.5, py + 0.5]`; the part of the edge inside that band is
/// rounded to whole pixels.
fn trace_edge(mask: &mut Mask, a: Point, b: Point) {
    let (lo, hi) = if a.y <= b.y { (a, b) } else { (b, a) };

    if lo.y == hi.y {
        let py = lo.y.round();
        if py >= 0.0 && py <= (mask.height - 1) as f64 {
            let (x0, x1) = (lo.x.min(hi.x), lo.x.max(hi.x));
            fill_span(mask, py as usize, x0.round(), x1.round());
        }
        return;
    }

    let slope = (hi.x - lo.x) / (hi.y - lo.y);
    let x_at = |y: f64| lo.x + (y - lo.y) * slope;

    for py in rows_between(lo.y - 0.5, hi.y + 0.5, mask.height) {
        let band_top = (py as f64 - 0.5).max(lo.y);
        let band_bottom = (py as f64 + 0.5).min(hi.y);
        let (xa, xb) = (x_at(band_top), x_at(band_bottom));
        fill_span(mask, py, xa.min(xb).round(), xa.max(xb).round());
    }
}
