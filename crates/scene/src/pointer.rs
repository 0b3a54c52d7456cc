use foundation::easing::{Ease, lerp};
use foundation::math::Vec2;
use foundation::tween::Tween2;

pub const DOT_SECONDS: f64 = 0.1;
pub const OUTLINE_SECONDS: f64 = 0.3;
pub const FADE_IN_SECONDS: f64 = 0.3;

/// Where the two cursor indicators are drawn this frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointerVisual {
    pub dot: Vec2,
    pub outline: Vec2,
    pub opacity: f64,
}

/// A dot that follows the pointer almost immediately and an outline that
/// trails it. Both stay hidden until the first pointer move.
#[derive(Debug, Clone)]
pub struct PointerFollower {
    dot: Tween2,
    outline: Tween2,
    seen: bool,
    fade_elapsed_s: f64,
}

impl Default for PointerFollower {
    fn default() -> Self {
        Self::new()
    }
}

impl PointerFollower {
    pub fn new() -> Self {
        Self::with_durations(DOT_SECONDS, OUTLINE_SECONDS)
    }

    pub fn with_durations(dot_s: f64, outline_s: f64) -> Self {
        Self {
            dot: Tween2::new(Vec2::ZERO, dot_s, Ease::Power3Out),
            outline: Tween2::new(Vec2::ZERO, outline_s, Ease::Power3Out),
            seen: false,
            fade_elapsed_s: 0.0,
        }
    }

    pub fn on_pointer_move(&mut self, x: f64, y: f64) {
        let at = Vec2::new(x, y);
        if !self.seen {
            self.seen = true;
            self.dot.jump(at);
            self.outline.jump(at);
            return;
        }
        self.dot.retarget(at);
        self.outline.retarget(at);
    }

    pub fn advance(&mut self, dt_s: f64) -> PointerVisual {
        let dot = self.dot.advance(dt_s);
        let outline = self.outline.advance(dt_s);
        if self.seen {
            self.fade_elapsed_s += dt_s.max(0.0);
        }
        PointerVisual {
            dot,
            outline,
            opacity: self.opacity(),
        }
    }

    pub fn opacity(&self) -> f64 {
        if !self.seen {
            return 0.0;
        }
        lerp(0.0, 1.0, (self.fade_elapsed_s / FADE_IN_SECONDS).min(1.0))
    }

    pub fn is_settled(&self) -> bool {
        self.dot.is_settled() && self.outline.is_settled() && self.opacity() >= 1.0
    }
}
