// THEORY:
// The contour extractor is the last analysis stage of a tick. It turns the
// cleaned mask into a list of `Detection`s: one per connected region, each
// carrying the region's outer boundary, its bounding rectangle and the center
// of that rectangle.
//
// Only external borders are reported. A region with holes yields one contour;
// a region sitting inside a hole of another region is ignored, since the game
// only cares about the outermost silhouette of the tracked object.
//
// Border following itself is delegated to `imageproc` (Suzuki-Abe).

use crate::core_modules::frame::{BoundingRect, Contour, Mask, Point};
use imageproc::contours::{BorderType, find_contours};

/// One detected region of the cleaned mask.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    pub contour: Contour,
    pub rect: BoundingRect,
    /// Rectangle-center approximation of the centroid.
    pub center: Point,
}

impl Detection {
    fn from_contour(contour: Contour) -> Option<Self> {
        let rect = contour.bounding_rect()?;
        Some(Self {
            center: rect.center(),
            contour,
            rect,
        })
    }

    /// The annotation drawn next to the centroid.
    pub fn label(&self) -> String {
        format!("Tracking object at ({},{})", self.center.x, self.center.y)
    }
}

/// Extracts every external contour of `mask`. An all-clear mask yields an empty list.
pub fn extract(mask: &Mask) -> Vec<Detection> {
    find_contours::<i32>(mask)
        .into_iter()
        .filter(|c| matches!(c.border_type, BorderType::Outer) && c.parent.is_none())
        .filter_map(|c| {
            let points = c.points.iter().map(|p| Point::new(p.x, p.y)).collect();
            Detection::from_contour(Contour::new(points))
        })
        .collect()
}
