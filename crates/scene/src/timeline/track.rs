use foundation::easing::{Ease, lerp};
use foundation::time::{Time, TimeSpan};

/// What a track writes to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Target {
    /// Index into the timeline's section list.
    Section(usize),
    Camera,
    Gate,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Property {
    Scale,
    Opacity,
    /// Simulated depth offset. Negative is behind the screen plane.
    Depth,
    /// 1.0 when the target accepts pointer input, 0.0 otherwise.
    Interactive,
}

/// One keyframe instruction: interpolate `property` of `target` from `from`
/// to `to` across `span`, shaped by `ease`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Track {
    pub target: Target,
    pub property: Property,
    pub from: f64,
    pub to: f64,
    pub span: TimeSpan,
    pub ease: Ease,
}

impl Track {
    pub fn new(target: Target, property: Property, from: f64, to: f64, span: TimeSpan) -> Self {
        Self {
            target,
            property,
            from,
            to,
            span,
            ease: Ease::Linear,
        }
    }

    /// Instantaneous assignment at `at`.
    pub fn set(target: Target, property: Property, value: f64, at: f64) -> Self {
        Self::new(target, property, value, value, TimeSpan::instant(Time(at)))
    }

    pub fn with_ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    pub fn value_at(&self, progress: f64) -> f64 {
        let t = self.span.progress_at(Time(progress));
        lerp(self.from, self.to, self.ease.apply(t))
    }
}

/// Every track writing one (target, property) pair, ordered by start.
#[derive(Debug, Clone, PartialEq)]
pub struct Channel {
    target: Target,
    property: Property,
    tracks: Vec<Track>,
}

impl Channel {
    pub fn new(target: Target, property: Property) -> Self {
        Self {
            target,
            property,
            tracks: Vec::new(),
        }
    }

    pub fn target(&self) -> Target {
        self.target
    }

    pub fn property(&self) -> Property {
        self.property
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Inserts after any track with the same start, so later instructions
    /// win ties.
    pub fn push(&mut self, track: Track) {
        let at = self
            .tracks
            .partition_point(|t| t.span.start.0 <= track.span.start.0);
        self.tracks.insert(at, track);
    }

    /// The latest-started track owns the value. Before the first track the
    /// channel rests on its first `from`; after a track ends it holds `to`.
    pub fn value_at(&self, progress: f64) -> Option<f64> {
        let first = self.tracks.first()?;
        let started = self.tracks.partition_point(|t| t.span.start.0 <= progress);
        if started == 0 {
            return Some(first.from);
        }
        Some(self.tracks[started - 1].value_at(progress))
    }
}

#[cfg(test)]
mod tests {
    use super::{Channel, Property, Target, Track};
    use foundation::easing::Ease;
    use foundation::time::TimeSpan;

    fn ramp(from: f64, to: f64, start: f64, end: f64) -> Track {
        Track::new(
            Target::Camera,
            Property::Depth,
            from,
            to,
            TimeSpan::new(start, end),
        )
    }

    #[test]
    fn track_clamps_outside_its_window() {
        let t = ramp(0.0, 10.0, 1.0, 3.0);
        assert_eq!(t.value_at(0.0), 0.0);
        assert_eq!(t.value_at(2.0), 5.0);
        assert_eq!(t.value_at(9.0), 10.0);
    }

    #[test]
    fn eased_track_hits_both_ends() {
        let t = ramp(0.5, 1.0, 0.0, 1.0).with_ease(Ease::Power2Out);
        assert_eq!(t.value_at(0.0), 0.5);
        assert_eq!(t.value_at(1.0), 1.0);
        assert!(t.value_at(0.5) > 0.75);
    }

    #[test]
    fn channel_hands_over_between_tracks() {
        let mut ch = Channel::new(Target::Camera, Property::Depth);
        ch.push(ramp(50.0, 200.0, 7.0, 10.0));
        ch.push(ramp(-500.0, 0.0, 0.0, 3.0));
        ch.push(ramp(0.0, 50.0, 3.0, 7.0));
        assert_eq!(ch.value_at(-4.0), Some(-500.0));
        assert_eq!(ch.value_at(1.5), Some(-250.0));
        assert_eq!(ch.value_at(5.0), Some(25.0));
        assert_eq!(ch.value_at(8.5), Some(125.0));
        assert_eq!(ch.value_at(99.0), Some(200.0));
    }

    #[test]
    fn later_instruction_wins_a_tie() {
        let mut ch = Channel::new(Target::Gate, Property::Interactive);
        ch.push(Track::set(Target::Gate, Property::Interactive, 1.0, 2.0));
        ch.push(Track::set(Target::Gate, Property::Interactive, 0.0, 2.0));
        assert_eq!(ch.value_at(2.0), Some(0.0));
        assert_eq!(ch.value_at(1.0), Some(1.0));
    }

    #[test]
    fn empty_channel_has_no_value() {
        assert_eq!(Channel::new(Target::Camera, Property::Depth).value_at(0.0), None);
    }
}
