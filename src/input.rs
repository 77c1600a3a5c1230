/// Toolkit-agnostic input model: held controls, discrete actions and the
/// touch-button strip at the bottom of the playfield.

use crate::constants::*;
use crate::entities::GameEvent;

/// Flags sampled once per frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Controls {
    pub left: bool,
    pub right: bool,
    pub shoot: bool,
}

impl Controls {
    pub fn merge(self, other: Controls) -> Controls {
        Controls {
            left: self.left || other.left,
            right: self.right || other.right,
            shoot: self.shoot || other.shoot,
        }
    }
}

/// One-shot actions delivered between frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    /// Enter on the start screen, or restart after game over.
    Start,
    Shoot,
    /// Wipes enemies and enemy bullets. Debug only.
    DebugClear,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Button {
    Left,
    Right,
    Shoot,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TouchButton {
    pub button: Button,
    /// Centre of the button.
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub label: &'static str,
}

impl TouchButton {
    /// Strict interior test, edges excluded.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x > self.x - self.w / 2.0
            && x < self.x + self.w / 2.0
            && y > self.y - self.h / 2.0
            && y < self.y + self.h / 2.0
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TouchLayout {
    pub buttons: [TouchButton; 3],
}

impl Default for TouchLayout {
    fn default() -> Self {
        let y = CANVAS_HEIGHT - BUTTON_AREA_HEIGHT / 2.0;
        let make = |button, x, label| TouchButton {
            button,
            x,
            y,
            w: BUTTON_WIDTH,
            h: BUTTON_HEIGHT,
            label,
        };
        Self {
            buttons: [
                make(Button::Left, BUTTON_MARGIN + BUTTON_WIDTH / 2.0, "←"),
                make(Button::Right, CANVAS_WIDTH / 2.0, "→"),
                make(
                    Button::Shoot,
                    CANVAS_WIDTH - BUTTON_MARGIN - BUTTON_WIDTH / 2.0,
                    "SHOOT",
                ),
            ],
        }
    }
}

impl TouchLayout {
    pub fn hit(&self, x: f32, y: f32) -> Option<Button> {
        self.buttons
            .iter()
            .find(|b| b.contains(x, y))
            .map(|b| b.button)
    }

    /// Controls held by a set of simultaneous touch points.
    pub fn controls_for(&self, points: &[(f32, f32)]) -> Controls {
        let mut controls = Controls::default();
        for &(x, y) in points {
            match self.hit(x, y) {
                Some(Button::Left) => controls.left = true,
                Some(Button::Right) => controls.right = true,
                Some(Button::Shoot) => controls.shoot = true,
                None => {}
            }
        }
        controls
    }
}

/// Keyboard and touch flags kept apart so touch-shoot can be one-shot while
/// a held key keeps firing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputState {
    pub keys: Controls,
    pub touch: Controls,
}

impl InputState {
    pub fn held(&self) -> Controls {
        self.keys.merge(self.touch)
    }

    pub fn set_touch_points(&mut self, layout: &TouchLayout, points: &[(f32, f32)]) {
        self.touch = layout.controls_for(points);
    }

    pub fn release_touch(&mut self) {
        self.touch = Controls::default();
    }

    /// A touch shoot fires once per press.
    pub fn after_frame(&mut self, events: &[GameEvent]) {
        if events.iter().any(|e| matches!(e, GameEvent::Shot { .. })) {
            self.touch.shoot = false;
        }
    }
}
