// THEORY:
// Morphological cleanup removes speckle noise from the raw color mask and glues
// fragments of the tracked object back together.
//
// 1.  **Erode** with a small rectangle: isolated specks narrower than the
//     element vanish, surviving regions shrink.
// 2.  **Dilate** with a rectangle twice as large: surviving regions grow back
//     past their original size, which merges nearby fragments of an object
//     that lighting has split into pieces.
//
// Elements are rectangles anchored at `(width / 2, height / 2)`. Pixels outside
// the image never take part, so nothing erodes inward from the image border.
// The windowed min/max itself is `imageproc::morphology`.

use crate::core_modules::frame::{MASK_SET, Mask};
use image::{GrayImage, Luma};
use imageproc::morphology::{Mask as Footprint, grayscale_dilate, grayscale_erode};

/// Largest side `imageproc` accepts for a structuring element.
const MAX_SIDE: u32 = 511;

/// A rectangular structuring element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StructuringElement {
    pub width: u32,
    pub height: u32,
}

impl StructuringElement {
    pub const fn square(size: u32) -> Self {
        Self {
            width: size,
            height: size,
        }
    }

    fn footprint(&self) -> Footprint {
        let width = self.width.clamp(1, MAX_SIDE);
        let height = self.height.clamp(1, MAX_SIDE);
        let area = GrayImage::from_pixel(width, height, Luma([MASK_SET]));
        Footprint::from_image(&area, (width / 2) as u8, (height / 2) as u8)
    }
}

/// The erode/dilate schedule applied to every raw mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cleanup {
    pub erode_element: StructuringElement,
    pub erode_iterations: u32,
    pub dilate_element: StructuringElement,
    pub dilate_iterations: u32,
}

impl Default for Cleanup {
    fn default() -> Self {
        Self {
            erode_element: StructuringElement::square(12),
            erode_iterations: 2,
            dilate_element: StructuringElement::square(24),
            dilate_iterations: 2,
        }
    }
}

impl Cleanup {
    /// Erodes then dilates, each step consuming the previous result.
    pub fn apply(&self, mask: &Mask) -> Mask {
        let eroded = erode(mask, self.erode_element, self.erode_iterations);
        dilate(&eroded, self.dilate_element, self.dilate_iterations)
    }
}

/// Applies `iterations` erosions (windowed minimum).
pub fn erode(mask: &Mask, element: StructuringElement, iterations: u32) -> Mask {
    let footprint = element.footprint();
    (0..iterations).fold(mask.clone(), |current, _| grayscale_erode(&current, &footprint))
}

/// Applies `iterations` dilations (windowed maximum).
pub fn dilate(mask: &Mask, element: StructuringElement, iterations: u32) -> Mask {
    let footprint = element.footprint();
    (0..iterations).fold(mask.clone(), |current, _| grayscale_dilate(&current, &footprint))
}
