use crate::easing::{Ease, lerp};
use crate::math::Vec2;

/// A retargetable 2D tween with "quick-to" semantics.
///
/// Every call to [`Tween2::retarget`] restarts the tween from the current
/// value, so rapid retargeting never jumps.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Tween2 {
    from: Vec2,
    to: Vec2,
    current: Vec2,
    elapsed_s: f64,
    duration_s: f64,
    ease: Ease,
}

impl Tween2 {
    pub fn new(at: Vec2, duration_s: f64, ease: Ease) -> Self {
        Self {
            from: at,
            to: at,
            current: at,
            elapsed_s: 0.0,
            duration_s: duration_s.max(0.0),
            ease,
        }
    }

    pub fn retarget(&mut self, to: Vec2) {
        self.from = self.current;
        self.to = to;
        self.elapsed_s = 0.0;
    }

    /// Snaps to `at` without animating.
    pub fn jump(&mut self, at: Vec2) {
        self.from = at;
        self.to = at;
        self.current = at;
        self.elapsed_s = self.duration_s;
    }

    pub fn advance(&mut self, dt_s: f64) -> Vec2 {
        self.elapsed_s += dt_s.max(0.0);
        let t = if self.duration_s <= 0.0 {
            1.0
        } else {
            self.elapsed_s / self.duration_s
        };
        let k = self.ease.apply(t);
        self.current = Vec2::new(
            lerp(self.from.x, self.to.x, k),
            lerp(self.from.y, self.to.y, k),
        );
        self.current
    }

    pub fn value(&self) -> Vec2 {
        self.current
    }

    pub fn is_settled(&self) -> bool {
        self.elapsed_s >= self.duration_s
    }
}

/// Frame-rate independent exponential approach toward `target`.
///
/// `time_constant_s <= 0` snaps immediately.
pub fn approach(current: f64, target: f64, time_constant_s: f64, dt_s: f64) -> f64 {
    if time_constant_s <= 0.0 {
        return target;
    }
    let k = 1.0 - (-dt_s.max(0.0) / time_constant_s).exp();
    lerp(current, target, k)
}
