//! Polygon mask loader.
//!
//! Loads an image, turns it upright according to its EXIF orientation,
//! normalizes it to RGB floats and builds a grayscale mask from any number of
//! user-drawn polygons (union, optional outward feathering). When no usable
//! polygon is given the mask selects the whole image.

pub mod channels;
pub mod combine;
pub mod config;
pub mod error;
pub mod host;
pub mod orientation;
pub mod payload;
pub mod pipeline;
pub mod raster;
pub mod types;
pub mod vision;

pub use combine::combine;
pub use config::Config;
pub use error::{Error, Result};
pub use host::InputDirectory;
pub use orientation::Orientation;
pub use pipeline::{MaskedImage, load_bytes, load_image_and_mask};
pub use raster::rasterize;
pub use types::{Feather, Mask, Point, Polygon, PolygonSet, SourceImage};
