//! One load request, end to end:
//! decode → orientation → RGB normalization → payload → union mask.
//!
//! Every call starts from the raw inputs; nothing is cached between calls,
//! and identical inputs give identical buffers.

use std::io::{BufRead, Cursor, Seek};
use std::path::Path;

use image::{DynamicImage, ImageReader};
use ndarray::{Array3, Array4};

use crate::channels::to_source_image;
use crate::combine::combine;
use crate::error::{Error, Result};
use crate::orientation::{Orientation, read_orientation};
use crate::payload;
use crate::types::{Feather, Mask, PolygonSet, SourceImage};

/// The two buffers handed back to the host.
#[derive(Debug, Clone, PartialEq)]
pub struct MaskedImage {
    pub image: SourceImage, // upright RGB floats
    pub mask: Mask,         // same canvas as `image`
}

impl MaskedImage {
    /// `(image, mask)` as `(1, H, W, 3)` and `(1, H, W)` tensors.
    pub fn into_batches(self) -> Result<(Array4<f32>, Array3<f32>)> {
        Ok((self.image.into_batch()?, self.mask.into_batch()?))
    }
}

fn decode_oriented<R: BufRead + Seek>(reader: ImageReader<R>) -> Result<DynamicImage> {
    let mut decoder = reader.into_decoder()?;
    let orientation = read_orientation(&mut decoder);
    let img = DynamicImage::from_decoder(decoder)?;
    if orientation != Orientation::Identity {
        log::debug!("Applying EXIF orientation {}", orientation.exif_tag());
    }
    Ok(orientation.apply(&img))
}

/// Decode a file and rotate it upright.
pub fn open_image(path: &Path) -> Result<DynamicImage> {
    let reader = ImageReader::open(path)
        .and_then(|r| r.with_guessed_format())
        .map_err(|e| Error::io(path, e))?;
    decode_oriented(reader)
}

/// Decode in-memory bytes and rotate them upright.
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| Error::io("<memory>", e))?;
    decode_oriented(reader)
}

/// Core of a request once the image is decoded and upright.
pub fn mask_image(img: &DynamicImage, polygons: &PolygonSet, feather: Feather) -> MaskedImage {
    let image = to_source_image(img);
    let (width, height) = image.dimensions();
    let mask = combine(polygons, width, height, feather);
    MaskedImage { image, mask }
}

/// Load from bytes with the raw polygon payload text.
pub fn load_bytes(bytes: &[u8], feather: Feather, polygon_data: &str) -> Result<MaskedImage> {
    let img = decode_image(bytes)?;
    Ok(mask_image(&img, &payload::parse(polygon_data), feather))
}

/// Load from a file with the raw polygon payload text.
pub fn load_image_and_mask(path: &Path, feather: Feather, polygon_data: &str) -> Result<MaskedImage> {
    let img = open_image(path)?;
    let polygons = payload::parse(polygon_data);
    log::info!(
        "Loading {} ({}x{}), {} polygon(s), feather {}",
        path.display(),
        img.width(),
        img.height(),
        polygons.len(),
        feather.0
    );
    Ok(mask_image(&img, &polygons, feather))
}
