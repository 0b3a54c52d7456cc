/// Time primitives.
///
/// `Time` is unit-agnostic: the renderer feeds it seconds, the choreography
/// timeline feeds it timeline units.
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd)]
pub struct Time(pub f64);

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TimeSpan {
    pub start: Time,
    pub end: Time,
}

impl TimeSpan {
    pub fn new(start: f64, end: f64) -> Self {
        Self {
            start: Time(start),
            end: Time(end),
        }
    }

    /// Span starting at `start` and lasting `duration`.
    pub fn starting_at(start: f64, duration: f64) -> Self {
        Self::new(start, start + duration)
    }

    pub fn instant(t: Time) -> Self {
        Self { start: t, end: t }
    }

    pub fn duration(&self) -> f64 {
        (self.end.0 - self.start.0).max(0.0)
    }

    pub fn contains(&self, t: Time) -> bool {
        t.0 >= self.start.0 && t.0 <= self.end.0
    }

    pub fn overlaps(&self, other: &TimeSpan) -> bool {
        self.start.0 < other.end.0 && other.start.0 < self.end.0
    }

    /// Normalized position of `t` inside the span, clamped to `[0, 1]`.
    ///
    /// Zero-length spans behave like a step at `start`.
    pub fn progress_at(&self, t: Time) -> f64 {
        let d = self.duration();
        if d <= 0.0 {
            return if t.0 < self.start.0 { 0.0 } else { 1.0 };
        }
        ((t.0 - self.start.0) / d).clamp(0.0, 1.0)
    }
}
