// The per-tick building blocks, bottom-up: pixel data and color space, then the
// mask stages, then the game objects that react to what the masks found.

pub mod frame;
pub mod hsv;
pub mod segmentation;
pub mod morphology;
pub mod contour_extractor;
pub mod ball;
pub mod collision;
pub mod render;
