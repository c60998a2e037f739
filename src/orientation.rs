// Rotates a decoded image so pixel (0,0) is the top-left the user saw when
// drawing polygons. Only the three pure rotations are honored; mirrored
// orientations and anything unreadable fall through as identity.

use image::metadata::Orientation as DecoderOrientation;
use image::{DynamicImage, ImageDecoder};

/// Display rotation recovered from the EXIF orientation tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    /// Tag 1, absent, or anything not handled below.
    #[default]
    Identity,
    /// Tag 3.
    Rotate180,
    /// Tag 6: rotate 90 degrees clockwise.
    Rotate90,
    /// Tag 8: rotate 270 degrees clockwise (90 counter-clockwise).
    Rotate270,
}

impl Orientation {
    pub fn from_exif_tag(tag: u16) -> Self {
        match tag {
            3 => Orientation::Rotate180,
            6 => Orientation::Rotate90,
            8 => Orientation::Rotate270,
            _ => Orientation::Identity,
        }
    }

    pub fn exif_tag(self) -> u16 {
        match self {
            Orientation::Identity => 1,
            Orientation::Rotate180 => 3,
            Orientation::Rotate90 => 6,
            Orientation::Rotate270 => 8,
        }
    }

    /// The rotation that undoes this one.
    pub fn inverse(self) -> Self {
        match self {
            Orientation::Rotate90 => Orientation::Rotate270,
            Orientation::Rotate270 => Orientation::Rotate90,
            other => other,
        }
    }

    /// Rotate with canvas expansion: 90/270 swap width and height.
    /// The input is left untouched.
    pub fn apply(self, img: &DynamicImage) -> DynamicImage {
        match self {
            Orientation::Identity => img.clone(),
            Orientation::Rotate180 => img.rotate180(),
            Orientation::Rotate90 => img.rotate90(),
            Orientation::Rotate270 => img.rotate270(),
        }
    }
}

impl From<DecoderOrientation> for Orientation {
    fn from(value: DecoderOrientation) -> Self {
        match value {
            DecoderOrientation::Rotate180 => Orientation::Rotate180,
            DecoderOrientation::Rotate90 => Orientation::Rotate90,
            DecoderOrientation::Rotate270 => Orientation::Rotate270,
            // Mirrored variants (tags 2, 4, 5, 7) are left as stored.
            _ => Orientation::Identity,
        }
    }
}

/// Read the orientation from a decoder before pixels are pulled out of it.
/// Metadata errors count as "no orientation info".
pub fn read_orientation<D: ImageDecoder>(decoder: &mut D) -> Orientation {
    match decoder.orientation() {
        Ok(value) => Orientation::from(value),
        Err(e) => {
            log::debug!("Ignoring unreadable orientation metadata: {e}");
            Orientation::Identity
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    // 4x2 image with a distinct color in each corner.
    fn corners() -> DynamicImage {
        let mut img = RgbImage::new(4, 2);
        img.put_pixel(0, 0, Rgb([255, 0, 0]));
        img.put_pixel(3, 0, Rgb([0, 255, 0]));
        img.put_pixel(0, 1, Rgb([0, 0, 255]));
        img.put_pixel(3, 1, Rgb([255, 255, 0]));
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn tag_mapping() {
        assert_eq!(Orientation::from_exif_tag(1), Orientation::Identity);
        assert_eq!(Orientation::from_exif_tag(3), Orientation::Rotate180);
        assert_eq!(Orientation::from_exif_tag(6), Orientation::Rotate90);
        assert_eq!(Orientation::from_exif_tag(8), Orientation::Rotate270);
        for tag in [0, 2, 4, 5, 7, 9, 255] {
            assert_eq!(Orientation::from_exif_tag(tag), Orientation::Identity);
        }
        for o in [Orientation::Rotate180, Orientation::Rotate90, Orientation::Rotate270] {
            assert_eq!(Orientation::from_exif_tag(o.exif_tag()), o);
        }
    }

    #[test]
    fn mirrored_decoder_values_pass_through() {
        assert_eq!(Orientation::from(DecoderOrientation::FlipHorizontal), Orientation::Identity);
        assert_eq!(Orientation::from(DecoderOrientation::Rotate90FlipH), Orientation::Identity);
        assert_eq!(Orientation::from(DecoderOrientation::Rotate90), Orientation::Rotate90);
    }

    // Decoder whose metadata read always fails.
    struct BrokenMetadata;

    impl ImageDecoder for BrokenMetadata {
        fn dimensions(&self) -> (u32, u32) {
            (1, 1)
        }

        fn color_type(&self) -> image::ColorType {
            image::ColorType::L8
        }

        fn orientation(&mut self) -> image::ImageResult<DecoderOrientation> {
            Err(image::ImageError::IoError(std::io::Error::other("truncated exif")))
        }

        fn read_image(self, buf: &mut [u8]) -> image::ImageResult<()> {
            buf.fill(0);
            Ok(())
        }

        fn read_image_boxed(self: Box<Self>, buf: &mut [u8]) -> image::ImageResult<()> {
            (*self).read_image(buf)
        }
    }

    #[test_log::test]
    fn unreadable_metadata_is_identity() {
        assert_eq!(read_orientation(&mut BrokenMetadata), Orientation::Identity);
    }

    #[test]
    fn tag_6_turns_clockwise_and_expands() {
        let out = Orientation::Rotate90.apply(&corners()).to_rgb8();
        assert_eq!(out.dimensions(), (2, 4));
        // Bottom-left ends up top-left after a clockwise quarter turn.
        assert_eq!(out.get_pixel(0, 0), &Rgb([0, 0, 255]));
        assert_eq!(out.get_pixel(1, 0), &Rgb([255, 0, 0]));
    }

    #[test]
    fn tag_8_turns_counter_clockwise() {
        let out = Orientation::Rotate270.apply(&corners()).to_rgb8();
        assert_eq!(out.dimensions(), (2, 4));
        // Top-right ends up top-left.
        assert_eq!(out.get_pixel(0, 0), &Rgb([0, 255, 0]));
    }

    #[test]
    fn tag_3_keeps_dimensions() {
        let out = Orientation::Rotate180.apply(&corners()).to_rgb8();
        assert_eq!(out.dimensions(), (4, 2));
        assert_eq!(out.get_pixel(0, 0), &Rgb([255, 255, 0]));
    }

    #[test]
    fn round_trip_restores_corners() {
        let original = corners();
        for o in [Orientation::Rotate90, Orientation::Rotate270, Orientation::Rotate180] {
            let back = o.inverse().apply(&o.apply(&original));
            assert_eq!(back.to_rgb8(), original.to_rgb8());
        }
        let back = Orientation::Rotate270.apply(&Orientation::Rotate90.apply(&original));
        assert_eq!(back.to_rgb8(), original.to_rgb8());
    }
}
