use foundation::tween::approach;

/// Smooths raw scroll progress before it reaches the timeline, so the
/// choreography trails the scrollbar by roughly `lag_s` seconds.
///
/// The smoother only shapes the *input* to a seek; the timeline itself stays
/// a pure function of whatever value comes out.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrubSmoother {
    current: f64,
    target: f64,
    lag_s: f64,
}

/// Below this distance the smoother snaps to its target.
const SETTLE_EPSILON: f64 = 1e-4;

impl ScrubSmoother {
    pub fn new(initial: f64, lag_s: f64) -> Self {
        Self {
            current: initial,
            target: initial,
            lag_s: lag_s.max(0.0),
        }
    }

    pub fn set_target(&mut self, target: f64) {
        self.target = target;
        if self.lag_s == 0.0 {
            self.current = target;
        }
    }

    /// Advances by `dt_s` and returns the smoothed value.
    pub fn advance(&mut self, dt_s: f64) -> f64 {
        self.current = approach(self.current, self.target, self.lag_s, dt_s);
        if (self.current - self.target).abs() < SETTLE_EPSILON {
            self.current = self.target;
        }
        self.current
    }

    pub fn value(&self) -> f64 {
        self.current
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn is_settled(&self) -> bool {
        self.current == self.target
    }
}

#[cfg(test)]
mod tests {
    use super::ScrubSmoother;

    #[test]
    fn zero_lag_follows_immediately() {
        let mut s = ScrubSmoother::new(0.0, 0.0);
        s.set_target(5.0);
        assert_eq!(s.value(), 5.0);
        assert!(s.is_settled());
    }

    #[test]
    fn lag_trails_then_settles() {
        let mut s = ScrubSmoother::new(0.0, 1.0);
        s.set_target(10.0);
        let first = s.advance(1.0 / 60.0);
        assert!(first > 0.0 && first < 1.0);
        for _ in 0..1200 {
            s.advance(1.0 / 60.0);
        }
        assert!(s.is_settled());
        assert_eq!(s.value(), 10.0);
    }

    #[test]
    fn scrolling_back_reverses() {
        let mut s = ScrubSmoother::new(10.0, 0.5);
        s.set_target(2.0);
        let v = s.advance(0.1);
        assert!(v < 10.0 && v > 2.0);
    }
}
