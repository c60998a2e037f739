// Converts whatever the decoder produced into the canonical RGB float image.
// Transparent pixels are flattened onto white so the downstream stage never
// sees an alpha channel.

use image::DynamicImage;

use crate::types::SourceImage;

const WHITE: f32 = 1.0;

#[inline]
fn unit(c: u8) -> f32 {
    c as f32 / 255.0
}

/// Normalize any decoded image to 3 channels in [0,1]. Never fails.
pub fn to_source_image(img: &DynamicImage) -> SourceImage {
    let (w, h) = (img.width() as usize, img.height() as usize);
    let mut pixels = Vec::with_capacity(w * h * 3);

    if img.color().has_alpha() {
        // out = rgb * a + white * (1 - a)
        for px in img.to_rgba8().pixels() {
            let a = unit(px[3]);
            let inv = 1.0 - a;
            for c in 0..3 {
                pixels.push(unit(px[c]) * a + WHITE * inv);
            }
        }
    } else {
        // Gray, palette-expanded and 16-bit images go through the decoder's own conversion.
        for px in img.to_rgb8().pixels() {
            pixels.extend(px.0.iter().map(|&c| unit(c)));
        }
    }

    SourceImage { width: w, height: h, pixels }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, LumaA, Rgb, RgbImage, Rgba, RgbaImage};

    #[test]
    fn rgb_scales_to_unit_range() {
        let img = RgbImage::from_pixel(2, 1, Rgb([255, 0, 51]));
        let out = to_source_image(&DynamicImage::ImageRgb8(img));
        assert_eq!(out.dimensions(), (2, 1));
        assert_eq!(out.get(1, 0), [1.0, 0.0, 0.2]);
    }

    #[test]
    fn transparent_flattens_to_white() {
        let mut img = RgbaImage::new(3, 1);
        img.put_pixel(0, 0, Rgba([0, 0, 0, 0]));
        img.put_pixel(1, 0, Rgba([0, 0, 0, 255]));
        img.put_pixel(2, 0, Rgba([255, 0, 0, 51]));
        let out = to_source_image(&DynamicImage::ImageRgba8(img));

        assert_eq!(out.get(0, 0), [1.0, 1.0, 1.0]);
        assert_eq!(out.get(1, 0), [0.0, 0.0, 0.0]);
        let [r, g, b] = out.get(2, 0);
        assert!((r - 1.0).abs() < 1e-6);
        assert!((g - 0.8).abs() < 1e-6);
        assert!((b - 0.8).abs() < 1e-6);
    }

    #[test]
    fn gray_expands_to_three_equal_channels() {
        let img = GrayImage::from_pixel(1, 2, Luma([102]));
        let out = to_source_image(&DynamicImage::ImageLuma8(img));
        assert_eq!(out.pixels.len(), 6);
        assert_eq!(out.get(0, 1), [0.4, 0.4, 0.4]);
    }

    #[test]
    fn gray_alpha_is_flattened_too() {
        let img = image::GrayAlphaImage::from_pixel(1, 1, LumaA([0, 0]));
        let out = to_source_image(&DynamicImage::ImageLumaA8(img));
        assert_eq!(out.get(0, 0), [1.0, 1.0, 1.0]);
    }
}
