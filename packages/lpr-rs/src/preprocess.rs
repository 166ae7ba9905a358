//! Plate crop preparation for OCR: crop, Rec. 601 grayscale, inverted binary threshold.
use image::{imageops, GrayImage, Luma, RgbImage};
use lpr_ocr::OcrInput;

use crate::geometry::BoundingBox;

pub const DEFAULT_BINARIZE_THRESHOLD: u8 = 64;

/// Cuts `bbox` out of `image`.
///
/// Coordinates are truncated toward zero and clamped to the image, the way
/// integer array slicing would. Returns `None` when nothing is left.
pub fn crop(image: &RgbImage, bbox: &BoundingBox) -> Option<RgbImage> {
    let clamp = |v: f32, max: u32| (v.max(0.0) as u32).min(max);
    let x1 = clamp(bbox.x1, image.width());
    let y1 = clamp(bbox.y1, image.height());
    let x2 = clamp(bbox.x2, image.width());
    let y2 = clamp(bbox.y2, image.height());
    if x2 <= x1 || y2 <= y1 {
        return None;
    }
    Some(imageops::crop_imm(image, x1, y1, x2 - x1, y2 - y1).to_image())
}

/// Rec. 601 luma (0.299, 0.587, 0.114) in 14-bit fixed point, rounded.
pub fn grayscale_601(image: &RgbImage) -> GrayImage {
    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        let [r, g, b] = image.get_pixel(x, y).0;
        let luma = (r as u32 * 4899 + g as u32 * 9617 + b as u32 * 1868 + (1 << 13)) >> 14;
        Luma([luma as u8])
    })
}

/// Pixels brighter than `threshold` become black, everything else white.
pub fn binarize_inverted(gray: &GrayImage, threshold: u8) -> GrayImage {
    let mut out = gray.clone();
    for pixel in out.pixels_mut() {
        *pixel = if pixel[0] > threshold { Luma([0]) } else { Luma([255]) };
    }
    out
}

/// Full plate preparation; `None` if the box does not overlap the frame.
pub fn prepare_plate(frame: &RgbImage, bbox: &BoundingBox, threshold: u8) -> Option<OcrInput> {
    let cropped = crop(frame, bbox)?;
    let gray = grayscale_601(&cropped);
    let binary = binarize_inverted(&gray, threshold);
    let (width, height) = binary.dimensions();
    Some(OcrInput::Luma {
        width,
        height,
        pixels: binary.into_raw(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn frame() -> RgbImage {
        RgbImage::from_fn(100, 50, |x, _| if x < 50 { Rgb([255, 255, 255]) } else { Rgb([10, 10, 10]) })
    }

    #[test]
    fn test_crop_truncates_float_coordinates() {
        let cropped = crop(&frame(), &BoundingBox::new(10.9, 5.2, 30.7, 25.9)).unwrap();
        assert_eq!(cropped.dimensions(), (20, 20));
    }

    #[test]
    fn test_crop_clamps_to_frame() {
        let cropped = crop(&frame(), &BoundingBox::new(-5.0, -5.0, 500.0, 20.0)).unwrap();
        assert_eq!(cropped.dimensions(), (100, 20));
    }

    #[test]
    fn test_crop_outside_frame_is_none() {
        assert!(crop(&frame(), &BoundingBox::new(200.0, 10.0, 300.0, 20.0)).is_none());
        assert!(crop(&frame(), &BoundingBox::new(10.2, 10.0, 10.8, 20.0)).is_none());
    }

    #[test]
    fn test_grayscale_uses_601_weights() {
        let image = RgbImage::from_vec(
            5,
            1,
            vec![255, 0, 0, 0, 255, 0, 0, 0, 255, 255, 255, 255, 0, 0, 0],
        )
        .unwrap();
        assert_eq!(grayscale_601(&image).into_raw(), vec![76, 150, 29, 255, 0]);
    }

    #[test]
    fn test_saturated_red_binarizes_black() {
        let red = RgbImage::from_pixel(4, 2, Rgb([255, 0, 0]));
        let input = prepare_plate(&red, &BoundingBox::new(0.0, 0.0, 4.0, 2.0), 64).unwrap();
        let OcrInput::Luma { pixels, .. } = input else {
            panic!("expected luma input");
        };
        assert!(pixels.iter().all(|&p| p == 0));
    }

    #[test]
    fn test_binarize_inverts_at_threshold() {
        let gray = GrayImage::from_raw(4, 1, vec![0, 64, 65, 255]).unwrap();
        let out = binarize_inverted(&gray, 64);
        assert_eq!(out.into_raw(), vec![255, 255, 0, 0]);
    }

    #[test]
    fn test_prepare_plate_dark_text_turns_white() {
        let input = prepare_plate(&frame(), &BoundingBox::new(40.0, 0.0, 60.0, 10.0), 64).unwrap();
        match input {
            OcrInput::Luma { width, height, pixels } => {
                assert_eq!((width, height), (20, 10));
                // light half -> black, dark half -> white
                assert_eq!(pixels[0], 0);
                assert_eq!(pixels[19], 255);
            }
            other => panic!("unexpected input {other:?}"),
        }
    }
}
