// THEORY:
// The controls module describes the knobs the player can turn while the game
// runs: six HSV range sliders and the ball speed. The presentation layer owns
// the widgets and publishes a `Controls` snapshot whenever one changes; the tick
// worker reads the latest snapshot once per tick.

use crate::core_modules::hsv::HsvRange;

/// Static description of one slider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliderSpec {
    pub name: &'static str,
    pub min: i32,
    pub max: i32,
    pub default: i32,
}

impl SliderSpec {
    pub fn clamp(&self, value: i32) -> i32 {
        value.clamp(self.min, self.max)
    }
}

pub const HUE_START: SliderSpec = SliderSpec {
    name: "Hue start",
    min: 0,
    max: 180,
    default: 20,
};
pub const HUE_STOP: SliderSpec = SliderSpec {
    name: "Hue stop",
    min: 0,
    max: 180,
    default: 50,
};
pub const SATURATION_START: SliderSpec = SliderSpec {
    name: "Sat start",
    min: 0,
    max: 255,
    default: 60,
};
pub const SATURATION_STOP: SliderSpec = SliderSpec {
    name: "Sat stop",
    min: 0,
    max: 255,
    default: 200,
};
pub const VALUE_START: SliderSpec = SliderSpec {
    name: "Value start",
    min: 0,
    max: 255,
    default: 50,
};
pub const VALUE_STOP: SliderSpec = SliderSpec {
    name: "Value stop",
    min: 0,
    max: 255,
    default: 255,
};
pub const BALL_SPEED: SliderSpec = SliderSpec {
    name: "Ball speed",
    min: 1,
    max: 50,
    default: 5,
};

/// The seven sliders in display order.
pub const SLIDERS: [SliderSpec; 7] = [
    BALL_SPEED,
    HUE_START,
    HUE_STOP,
    SATURATION_START,
    SATURATION_STOP,
    VALUE_START,
    VALUE_STOP,
];

/// Label of the start/stop toggle for each camera state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToggleState {
    #[default]
    Inactive,
    Active,
}

impl ToggleState {
    pub fn label(&self) -> &'static str {
        match self {
            ToggleState::Inactive => "Start Camera",
            ToggleState::Active => "Stop Camera",
        }
    }
}

/// A snapshot of every control value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    pub hue: (i32, i32),
    pub saturation: (i32, i32),
    pub value: (i32, i32),
    pub ball_speed: i32,
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            hue: (HUE_START.default, HUE_STOP.default),
            saturation: (SATURATION_START.default, SATURATION_STOP.default),
            value: (VALUE_START.default, VALUE_STOP.default),
            ball_speed: BALL_SPEED.default,
        }
    }
}

impl Controls {
    fn slot_mut(&mut self, name: &str) -> Option<&mut i32> {
        let slot = match name {
            n if n == HUE_START.name => &mut self.hue.0,
            n if n == HUE_STOP.name => &mut self.hue.1,
            n if n == SATURATION_START.name => &mut self.saturation.0,
            n if n == SATURATION_STOP.name => &mut self.saturation.1,
            n if n == VALUE_START.name => &mut self.value.0,
            n if n == VALUE_STOP.name => &mut self.value.1,
            n if n == BALL_SPEED.name => &mut self.ball_speed,
            _ => return None,
        };
        Some(slot)
    }

    /// Sets the slider called `name` (see [`SLIDERS`]), clamping into its range.
    /// Returns false for an unknown slider.
    pub fn set(&mut self, name: &str, value: i32) -> bool {
        let Some(spec) = SLIDERS.iter().find(|s| s.name == name) else {
            return false;
        };
        let value = spec.clamp(value);
        match self.slot_mut(name) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    pub fn range(&self) -> HsvRange {
        HsvRange::from_bounds(
            [self.hue.0, self.saturation.0, self.value.0],
            [self.hue.1, self.saturation.1, self.value.1],
        )
    }

    /// Ball speed clamped into the slider range.
    pub fn speed(&self) -> i32 {
        BALL_SPEED.clamp(self.ball_speed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_slider_table() {
        let controls = Controls::default();
        let mut from_table = Controls {
            hue: (0, 0),
            saturation: (0, 0),
            value: (0, 0),
            ball_speed: 0,
        };
        for spec in SLIDERS {
            assert!(from_table.set(spec.name, spec.default), "{}", spec.name);
        }
        assert_eq!(from_table, controls);
        assert_eq!(
            controls.range().describe(),
            "Hue range: 20-50. Sat. range: 60-200. Value range: 50-255"
        );
    }

    #[test]
    fn set_clamps_into_the_slider_range() {
        let mut controls = Controls::default();
        assert!(controls.set("Hue stop", 500));
        assert!(controls.set("Ball speed", 0));
        assert_eq!(controls.hue.1, 180);
        assert_eq!(controls.speed(), 1);
        assert!(!controls.set("Brightness", 3));
    }

    #[test]
    fn toggle_labels() {
        assert_eq!(ToggleState::default().label(), "Start Camera");
        assert_eq!(ToggleState::Active.label(), "Stop Camera");
    }
}
