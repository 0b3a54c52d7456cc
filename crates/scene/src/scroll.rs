use runtime::scrub::ScrubSmoother;

/// Maps raw scroll offsets on the tall virtual track to timeline progress.
///
/// The track is `track_height_px` tall and the viewport shows
/// `viewport_height_px` of it, so the scrollable range is the difference.
/// A resize only changes the mapping; progress stays continuous in offset.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ScrollTrack {
    track_height_px: f64,
    viewport_height_px: f64,
    total_units: f64,
}

impl ScrollTrack {
    pub fn new(track_height_px: f64, viewport_height_px: f64, total_units: f64) -> Self {
        Self {
            track_height_px: track_height_px.max(0.0),
            viewport_height_px: viewport_height_px.max(0.0),
            total_units: total_units.max(0.0),
        }
    }

    pub fn resize(&mut self, track_height_px: f64, viewport_height_px: f64) {
        self.track_height_px = track_height_px.max(0.0);
        self.viewport_height_px = viewport_height_px.max(0.0);
    }

    pub fn scrollable_px(&self) -> f64 {
        (self.track_height_px - self.viewport_height_px).max(0.0)
    }

    pub fn total_units(&self) -> f64 {
        self.total_units
    }

    /// Progress in timeline units for a scroll offset. Zero when nothing
    /// scrolls.
    pub fn progress_for(&self, offset_px: f64) -> f64 {
        let range = self.scrollable_px();
        if range <= 0.0 || !offset_px.is_finite() {
            return 0.0;
        }
        (offset_px / range).clamp(0.0, 1.0) * self.total_units
    }

    /// Scroll offset that lands on `progress`.
    pub fn offset_for(&self, progress: f64) -> f64 {
        if self.total_units <= 0.0 || !progress.is_finite() {
            return 0.0;
        }
        (progress / self.total_units).clamp(0.0, 1.0) * self.scrollable_px()
    }
}

/// Raw scroll offsets in, smoothed timeline progress out.
///
/// Every input event (scroll or resize) recomputes the target from the
/// current offset under the current mapping, so a resize alone is enough
/// to move the choreography.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollInput {
    track: ScrollTrack,
    smoother: ScrubSmoother,
}

impl ScrollInput {
    /// Starts settled on the progress of `offset_px`.
    pub fn new(track: ScrollTrack, offset_px: f64, lag_s: f64) -> Self {
        let initial = track.progress_for(offset_px);
        Self {
            track,
            smoother: ScrubSmoother::new(initial, lag_s),
        }
    }

    pub fn on_scroll(&mut self, offset_px: f64) {
        self.smoother.set_target(self.track.progress_for(offset_px));
    }

    pub fn on_resize(&mut self, track_height_px: f64, viewport_height_px: f64, offset_px: f64) {
        self.track.resize(track_height_px, viewport_height_px);
        self.on_scroll(offset_px);
    }

    /// Smoothed progress after `dt_s` seconds.
    pub fn advance(&mut self, dt_s: f64) -> f64 {
        self.smoother.advance(dt_s)
    }

    pub fn progress(&self) -> f64 {
        self.smoother.value()
    }

    pub fn target(&self) -> f64 {
        self.smoother.target()
    }

    pub fn track(&self) -> &ScrollTrack {
        &self.track
    }
}
