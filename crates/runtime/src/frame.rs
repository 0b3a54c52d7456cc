use foundation::time::Time;

/// Longest step a single frame may advance, so a backgrounded tab does not
/// fast-forward every animation on return.
pub const MAX_FRAME_DT_S: f64 = 0.1;

/// Frame metadata handed to per-frame consumers.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    /// 0-based frame index.
    pub index: u64,
    /// Delta since the previous frame (seconds).
    pub dt_s: f64,
    /// Accumulated time at the start of the frame (seconds).
    pub time: Time,
}

impl Frame {
    pub fn new(index: u64, dt_s: f64) -> Self {
        Self {
            index,
            dt_s,
            time: Time(index as f64 * dt_s),
        }
    }

    pub fn next(self) -> Self {
        Self::new(self.index + 1, self.dt_s)
    }
}

/// Turns display-callback timestamps (milliseconds) into [`Frame`]s.
#[derive(Debug, Default, Clone)]
pub struct FrameClock {
    last_ms: Option<f64>,
    index: u64,
    elapsed_s: f64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick(&mut self, now_ms: f64) -> Frame {
        let dt_s = match self.last_ms {
            Some(last) => ((now_ms - last) / 1000.0).clamp(0.0, MAX_FRAME_DT_S),
            None => 0.0,
        };
        self.last_ms = Some(now_ms);
        let frame = Frame {
            index: self.index,
            dt_s,
            time: Time(self.elapsed_s),
        };
        self.index = self.index.wrapping_add(1);
        self.elapsed_s += dt_s;
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::{Frame, FrameClock, MAX_FRAME_DT_S};
    use foundation::time::Time;

    #[test]
    fn frame_time_is_deterministic() {
        let a = Frame::new(10, 1.0 / 60.0);
        let b = Frame::new(10, 1.0 / 60.0);
        assert_eq!(a, b);
        assert_eq!(a.time, Time(10.0 / 60.0));
    }

    #[test]
    fn clock_first_frame_has_zero_dt() {
        let mut clock = FrameClock::new();
        let f0 = clock.tick(1000.0);
        assert_eq!(f0.index, 0);
        assert_eq!(f0.dt_s, 0.0);

        let f1 = clock.tick(1016.0);
        assert_eq!(f1.index, 1);
        assert!((f1.dt_s - 0.016).abs() < 1e-12);
    }

    #[test]
    fn clock_clamps_long_pauses_and_backwards_time() {
        let mut clock = FrameClock::new();
        clock.tick(0.0);
        assert_eq!(clock.tick(60_000.0).dt_s, MAX_FRAME_DT_S);
        assert_eq!(clock.tick(10.0).dt_s, 0.0);
    }
}
