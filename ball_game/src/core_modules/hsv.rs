// THEORY:
// Color thresholding is done in HSV space because hue stays roughly constant
// when the lighting on a colored object changes, while RGB values swing wildly.
//
// All values follow the 8-bit convention used by camera pipelines: hue is
// halved into [0, 180] so it fits in a byte, saturation and value live in
// [0, 255]. The conversion reproduces the integer rounding of the common vision
// libraries, so ranges tuned against a live camera transfer unchanged.

pub const HUE_MAX: u8 = 180;
pub const CHANNEL_MAX: u8 = 255;

/// A single pixel in 8-bit HSV.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Hsv {
    pub h: u8,
    pub s: u8,
    pub v: u8,
}

impl Hsv {
    pub const fn new(h: u8, s: u8, v: u8) -> Self {
        Self { h, s, v }
    }

    /// Converts an RGB pixel to HSV with round-half-up integer math.
    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        let (r, g, b) = (i32::from(r), i32::from(g), i32::from(b));
        let v = r.max(g).max(b);
        let min = r.min(g).min(b);
        let diff = v - min;

        let s = if v == 0 { 0 } else { (255 * diff + v / 2) / v };

        let h = if diff == 0 {
            0
        } else {
            // Position inside the six-sector hue wheel, scaled by `diff`.
            let sector = if v == r {
                g - b
            } else if v == g {
                b - r + 2 * diff
            } else {
                r - g + 4 * diff
            };
            let h = (60 * sector + diff).div_euclid(2 * diff);
            if h < 0 { h + i32::from(HUE_MAX) } else { h % i32::from(HUE_MAX) }
        };

        Self {
            h: h as u8,
            s: s as u8,
            v: v as u8,
        }
    }
}

/// An inclusive lower/upper HSV threshold pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HsvRange {
    pub lower: Hsv,
    pub upper: Hsv,
}

impl HsvRange {
    pub const fn new(lower: Hsv, upper: Hsv) -> Self {
        Self { lower, upper }
    }

    /// Builds a range from raw control values, clamping each channel into its
    /// legal interval. A lower bound above its upper bound is kept as-is and
    /// simply matches nothing on that channel.
    pub fn from_bounds(lower: [i32; 3], upper: [i32; 3]) -> Self {
        let clamp = |value: i32, max: u8| value.clamp(0, i32::from(max)) as u8;
        Self {
            lower: Hsv::new(
                clamp(lower[0], HUE_MAX),
                clamp(lower[1], CHANNEL_MAX),
                clamp(lower[2], CHANNEL_MAX),
            ),
            upper: Hsv::new(
                clamp(upper[0], HUE_MAX),
                clamp(upper[1], CHANNEL_MAX),
                clamp(upper[2], CHANNEL_MAX),
            ),
        }
    }

    /// True iff every channel of `px` lies inside its inclusive bounds.
    pub fn contains(&self, px: Hsv) -> bool {
        (self.lower.h..=self.upper.h).contains(&px.h)
            && (self.lower.s..=self.upper.s).contains(&px.s)
            && (self.lower.v..=self.upper.v).contains(&px.v)
    }

    /// The human readable form shown next to the sliders.
    pub fn describe(&self) -> String {
        format!(
            "Hue range: {}-{}. Sat. range: {}-{}. Value range: {}-{}",
            self.lower.h, self.upper.h, self.lower.s, self.upper.s, self.lower.v, self.upper.v
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primaries_land_on_their_sector_starts() {
        assert_eq!(Hsv::from_rgb(255, 0, 0), Hsv::new(0, 255, 255));
        assert_eq!(Hsv::from_rgb(0, 255, 0), Hsv::new(60, 255, 255));
        assert_eq!(Hsv::from_rgb(0, 0, 255), Hsv::new(120, 255, 255));
    }

    #[test]
    fn grays_have_no_hue_or_saturation() {
        assert_eq!(Hsv::from_rgb(0, 0, 0), Hsv::new(0, 0, 0));
        assert_eq!(Hsv::from_rgb(128, 128, 128), Hsv::new(0, 0, 128));
    }

    #[test]
    fn magenta_wraps_below_red() {
        // r == v and g < b gives a negative sector that wraps to the top of the wheel.
        let px = Hsv::from_rgb(255, 0, 128);
        assert!(px.h > 160 && px.h < HUE_MAX, "hue {}", px.h);
    }

    #[test]
    fn washed_out_red_keeps_hue_and_halves_saturation() {
        let px = Hsv::from_rgb(255, 128, 128);
        assert_eq!(px.h, 0);
        assert_eq!(px.s, 127);
        assert_eq!(px.v, 255);
    }

    #[test]
    fn range_is_inclusive_on_both_ends() {
        let range = HsvRange::new(Hsv::new(10, 20, 30), Hsv::new(40, 50, 60));
        assert!(range.contains(Hsv::new(10, 20, 30)));
        assert!(range.contains(Hsv::new(40, 50, 60)));
        assert!(!range.contains(Hsv::new(41, 50, 60)));
        assert!(!range.contains(Hsv::new(10, 19, 30)));
    }

    #[test]
    fn bounds_are_clamped_per_channel() {
        let range = HsvRange::from_bounds([-5, 300, 12], [200, 255, 999]);
        assert_eq!(range.lower, Hsv::new(0, 255, 12));
        assert_eq!(range.upper, Hsv::new(180, 255, 255));
    }

    #[test]
    fn describe_lists_each_channel() {
        let range = HsvRange::from_bounds([20, 60, 50], [50, 200, 255]);
        assert_eq!(
            range.describe(),
            "Hue range: 20-50. Sat. range: 60-200. Value range: 50-255"
        );
    }
}
