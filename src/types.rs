// Core types shared by the rasterizer, combiner and pipeline.

use image::{GrayImage, Luma, Rgb, RgbImage};
use ndarray::{Array3, Array4};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Minimum vertex count for a polygon to enclose any area.
pub const MIN_POLYGON_POINTS: usize = 3;

/// A point in image pixel space. May be fractional or outside the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64, // column, grows to the right
    pub y: f64, // row, grows downward
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Closed polygon; the last point connects back to the first.
/// Visual: one outline the user traced over the upright image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    #[serde(default)]
    pub points: Vec<Point>, // vertices in drawing order, fewer than 3 fills nothing
}

impl Polygon {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// True when the polygon takes part in rasterization: at least three
    /// points, all of them finite.
    pub fn is_fillable(&self) -> bool {
        self.points.len() >= MIN_POLYGON_POINTS && self.points.iter().all(|p| p.is_finite())
    }
}

impl From<Vec<(f64, f64)>> for Polygon {
    fn from(coords: Vec<(f64, f64)>) -> Self {
        Self::new(coords.into_iter().map(|(x, y)| Point::new(x, y)).collect())
    }
}

/// Polygons to union into one mask. Order carries no meaning.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolygonSet(Vec<Polygon>);

impl PolygonSet {
    pub fn new(polygons: Vec<Polygon>) -> Self {
        Self(polygons)
    }

    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Polygon> {
        self.0.iter()
    }

    pub fn polygons(&self) -> &[Polygon] {
        &self.0
    }

    /// Polygons that will actually be rasterized.
    pub fn fillable(&self) -> impl Iterator<Item = &Polygon> {
        self.0.iter().filter(|p| p.is_fillable())
    }
}

impl From<Vec<Polygon>> for PolygonSet {
    fn from(polygons: Vec<Polygon>) -> Self {
        Self(polygons)
    }
}

impl FromIterator<Polygon> for PolygonSet {
    fn from_iter<I: IntoIterator<Item = Polygon>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Feather (blur) radius in pixels. Zero means a hard edge.
/// Visual: how far the selection fades out past the outline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Feather(pub u32);

impl Feather {
    pub const NONE: Feather = Feather(0);

    pub fn is_none(self) -> bool {
        self.0 == 0
    }
}

impl From<u32> for Feather {
    fn from(radius: u32) -> Self {
        Feather(radius)
    }
}

/// Single-channel mask in [0,1] per pixel; 1 = selected, 0 = not selected.
/// Used both for one polygon's coverage and for the combined result.
/// Visual: white where the edit applies, black where the image is kept.
#[derive(Debug, Clone, PartialEq)]
pub struct Mask {
    pub width: usize,    // same as the upright image
    pub height: usize,   // same as the upright image
    pub alpha: Vec<f32>, // row-major, length = width * height
}

impl Mask {
    pub fn filled(width: usize, height: usize, value: f32) -> Self {
        Self { width, height, alpha: vec![value; width * height] }
    }

    pub fn zeros(width: usize, height: usize) -> Self {
        Self::filled(width, height, 0.0)
    }

    pub fn ones(width: usize, height: usize) -> Self {
        Self::filled(width, height, 1.0)
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.alpha[y * self.width + x]
    }

    /// Largest value in the mask; 0.0 for an empty canvas.
    pub fn max_value(&self) -> f32 {
        self.alpha.iter().copied().fold(0.0, f32::max)
    }

    /// Quantize to 8-bit grayscale for export.
    pub fn to_luma8(&self) -> GrayImage {
        GrayImage::from_fn(self.width as u32, self.height as u32, |x, y| {
            let a = self.get(x as usize, y as usize);
            Luma([(a.clamp(0.0, 1.0) * 255.0).round() as u8])
        })
    }

    /// Host layout: shape (1, height, width).
    pub fn into_batch(self) -> Result<Array3<f32>> {
        Ok(Array3::from_shape_vec((1, self.height, self.width), self.alpha)?)
    }
}

/// RGB image in [0,1], interleaved per pixel.
/// Visual: the photo as the user saw it, transparency flattened onto white.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceImage {
    pub width: usize,     // after EXIF rotation
    pub height: usize,    // after EXIF rotation
    pub pixels: Vec<f32>, // length = width * height * 3, R G B per pixel
}

impl SourceImage {
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> [f32; 3] {
        let i = (y * self.width + x) * 3;
        [self.pixels[i], self.pixels[i + 1], self.pixels[i + 2]]
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn to_rgb8(&self) -> RgbImage {
        RgbImage::from_fn(self.width as u32, self.height as u32, |x, y| {
            let [r, g, b] = self.get(x as usize, y as usize);
            let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
            Rgb([q(r), q(g), q(b)])
        })
    }

    /// Host layout: shape (1, height, width, 3).
    pub fn into_batch(self) -> Result<Array4<f32>> {
        Ok(Array4::from_shape_vec((1, self.height, self.width, 3), self.pixels)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polygon_needs_three_finite_points() {
        assert!(!Polygon::from(vec![(0.0, 0.0), (1.0, 1.0)]).is_fillable());
        assert!(Polygon::from(vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)]).is_fillable());
        assert!(!Polygon::from(vec![(0.0, 0.0), (f64::NAN, 0.0), (1.0, 1.0)]).is_fillable());
    }

    #[test]
    fn fillable_skips_degenerate() {
        let set = PolygonSet::new(vec![
            Polygon::from(vec![(0.0, 0.0), (1.0, 0.0)]),
            Polygon::from(vec![(0.0, 0.0), (4.0, 0.0), (4.0, 4.0)]),
        ]);
        assert_eq!(set.len(), 2);
        assert_eq!(set.fillable().count(), 1);
    }

    #[test]
    fn mask_max_and_export() {
        let mut mask = Mask::zeros(3, 2);
        assert_eq!(mask.max_value(), 0.0);
        mask.alpha[4] = 0.5;
        assert_eq!(mask.max_value(), 0.5);
        assert_eq!(mask.get(1, 1), 0.5);

        let gray = mask.to_luma8();
        assert_eq!(gray.dimensions(), (3, 2));
        assert_eq!(gray.get_pixel(1, 1)[0], 128);
        assert_eq!(gray.get_pixel(0, 0)[0], 0);
    }

    #[test]
    fn batches_have_leading_dimension() {
        let mask = Mask::ones(4, 2).into_batch().unwrap();
        assert_eq!(mask.shape(), &[1, 2, 4]);

        let image = SourceImage { width: 4, height: 2, pixels: vec![0.25; 24] };
        let batch = image.into_batch().unwrap();
        assert_eq!(batch.shape(), &[1, 2, 4, 3]);
        assert_eq!(batch[[0, 1, 3, 2]], 0.25);
    }
}
