// THEORY:
// Color segmentation turns a color frame into a binary mask of "pixels that look
// like the tracked object". It is the first stage of every tick.
//
// 1.  **Blur first**: a normalized box blur suppresses sensor noise. It runs on
//     the RGB channels, before the HSV conversion, because averaging hue values
//     near the 0/180 wrap-around would produce meaningless colors.
// 2.  **Convert**: every blurred pixel is converted to 8-bit HSV.
// 3.  **Threshold**: a pixel is set iff all three HSV channels fall within the
//     inclusive range chosen on the sliders.

use crate::core_modules::frame::{Frame, Mask, MASK_CLEAR, MASK_SET};
use crate::core_modules::hsv::{Hsv, HsvRange};
use image::{GrayImage, Luma, Rgb};

/// Runs blur → HSV → threshold and returns the raw (uncleaned) mask.
pub fn segment(frame: &Frame, range: &HsvRange, blur_size: u32) -> Mask {
    let blurred = box_blur(frame, blur_size);
    threshold(&blurred, range)
}

/// Normalized box blur with a `size`×`size` window, applied per channel.
/// Sizes of 0 or 1 leave the frame untouched.
pub fn box_blur(frame: &Frame, size: u32) -> Frame {
    if size <= 1 {
        return frame.clone();
    }
    let radius = size / 2;
    let (width, height) = frame.dimensions();

    let blurred: Vec<GrayImage> = (0..3)
        .map(|channel| {
            let plane =
                GrayImage::from_fn(width, height, |x, y| Luma([frame.get_pixel(x, y)[channel]]));
            imageproc::filter::box_filter(&plane, radius, radius)
        })
        .collect();

    Frame::from_fn(width, height, |x, y| {
        Rgb([
            blurred[0].get_pixel(x, y)[0],
            blurred[1].get_pixel(x, y)[0],
            blurred[2].get_pixel(x, y)[0],
        ])
    })
}

/// Per-channel AND threshold of a color frame against an HSV range.
pub fn threshold(frame: &Frame, range: &HsvRange) -> Mask {
    let (width, height) = frame.dimensions();
    Mask::from_fn(width, height, |x, y| {
        let Rgb([r, g, b]) = *frame.get_pixel(x, y);
        if range.contains(Hsv::from_rgb(r, g, b)) {
            Luma([MASK_SET])
        } else {
            Luma([MASK_CLEAR])
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn red_range() -> HsvRange {
        HsvRange::from_bounds([0, 100, 100], [10, 255, 255])
    }

    #[test]
    fn uniform_red_frame_is_fully_set() {
        let frame = Frame::from_pixel(32, 24, Rgb([255, 0, 0]));
        let mask = segment(&frame, &red_range(), 7);
        assert!(mask.pixels().all(|p| p[0] == MASK_SET));
    }

    #[test]
    fn uniform_blue_frame_is_fully_clear() {
        let frame = Frame::from_pixel(32, 24, Rgb([0, 0, 255]));
        let mask = segment(&frame, &red_range(), 7);
        assert!(mask.pixels().all(|p| p[0] == MASK_CLEAR));
    }

    #[test]
    fn blur_keeps_uniform_frames_uniform() {
        let frame = Frame::from_pixel(16, 16, Rgb([12, 200, 77]));
        assert_eq!(box_blur(&frame, 7), frame);
    }

    #[test]
    fn blur_softens_a_single_bright_pixel() {
        let mut frame = Frame::new(15, 15);
        frame.put_pixel(7, 7, Rgb([245, 245, 245]));
        let blurred = box_blur(&frame, 7);
        // 245 spread over a 7×7 window.
        assert_eq!(blurred.get_pixel(7, 7), &Rgb([5, 5, 5]));
        assert_eq!(blurred.get_pixel(0, 0), &Rgb([0, 0, 0]));
    }

    #[test]
    fn mask_matches_frame_dimensions() {
        let frame = Frame::new(40, 30);
        let mask = segment(&frame, &red_range(), 7);
        assert_eq!(mask.dimensions(), (40, 30));
    }
}
