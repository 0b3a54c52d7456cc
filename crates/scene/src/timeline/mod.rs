//! Choreography timeline.
//!
//! Built once from the ordered section list: every section contributes an
//! enter, hold and exit instruction per property, and the scene contributes
//! the camera flight and the gate fly-through. Sampling is a pure function of
//! progress, so seeking to a value always reproduces the same snapshot.

mod phase;
mod track;

pub use phase::*;
pub use track::*;

use crate::error::TimelineError;
use crate::section::{Entrance, ExitStyle, Section};
use crate::snapshot::{SceneVisual, Snapshot};
use foundation::easing::Ease;
use foundation::time::TimeSpan;
use std::collections::HashSet;

const OVERRUN_EPSILON: f64 = 1e-9;

/// Per-section motion values shared by every fly-through card.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SectionMotion {
    pub enter_scale: f64,
    pub enter_depth: f64,
    pub hold_drift: f64,
    pub exit_depth: f64,
    pub enter_ease: Ease,
    pub hold_ease: Ease,
    pub exit_ease: Ease,
}

impl Default for SectionMotion {
    fn default() -> Self {
        Self {
            enter_scale: 0.5,
            enter_depth: -500.0,
            hold_drift: 50.0,
            exit_depth: 200.0,
            enter_ease: Ease::Power2Out,
            hold_ease: Ease::Linear,
            exit_ease: Ease::Power2In,
        }
    }
}

/// Camera flight over the whole timeline and gate fly-through over the
/// first section.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SceneMotion {
    pub camera_start_z: f64,
    pub camera_end_z: f64,
    pub gate_end_scale: f64,
    pub gate_end_opacity: f64,
    pub gate_ease: Ease,
}

impl Default for SceneMotion {
    fn default() -> Self {
        Self {
            camera_start_z: 30.0,
            camera_end_z: -20.0,
            gate_end_scale: 3.0,
            gate_end_opacity: 0.0,
            gate_ease: Ease::Power2In,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct TimelineOptions {
    pub split: PhaseSplit,
    pub section: SectionMotion,
    pub scene: SceneMotion,
}

impl TimelineOptions {
    pub fn with_split(mut self, split: PhaseSplit) -> Self {
        self.split = split;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
struct SectionChannels {
    scale: Channel,
    opacity: Channel,
    depth: Channel,
    interactive: Channel,
}

impl SectionChannels {
    fn new(index: usize) -> Self {
        let target = Target::Section(index);
        Self {
            scale: Channel::new(target, Property::Scale),
            opacity: Channel::new(target, Property::Opacity),
            depth: Channel::new(target, Property::Depth),
            interactive: Channel::new(target, Property::Interactive),
        }
    }

    fn get(&self, property: Property) -> &Channel {
        match property {
            Property::Scale => &self.scale,
            Property::Opacity => &self.opacity,
            Property::Depth => &self.depth,
            Property::Interactive => &self.interactive,
        }
    }

    fn push(&mut self, track: Track) {
        match track.property {
            Property::Scale => self.scale.push(track),
            Property::Opacity => self.opacity.push(track),
            Property::Depth => self.depth.push(track),
            Property::Interactive => self.interactive.push(track),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    sections: Vec<Section>,
    windows: Vec<PhaseWindows>,
    total_units: f64,
    options: TimelineOptions,
    section_channels: Vec<SectionChannels>,
    camera_z: Channel,
    gate_scale: Channel,
    gate_opacity: Channel,
    gaps: Vec<TimeSpan>,
}

impl Timeline {
    pub fn build(sections: &[Section], total_units: f64) -> Result<Self, TimelineError> {
        Self::build_with(sections, total_units, &TimelineOptions::default())
    }

    pub fn build_with(
        sections: &[Section],
        total_units: f64,
        options: &TimelineOptions,
    ) -> Result<Self, TimelineError> {
        validate(sections, total_units, options)?;

        let mut timeline = Timeline {
            sections: sections.to_vec(),
            windows: sections.iter().map(|s| options.split.windows(s)).collect(),
            total_units,
            options: *options,
            section_channels: (0..sections.len()).map(SectionChannels::new).collect(),
            camera_z: Channel::new(Target::Camera, Property::Depth),
            gate_scale: Channel::new(Target::Gate, Property::Scale),
            gate_opacity: Channel::new(Target::Gate, Property::Opacity),
            gaps: Vec::new(),
        };

        for (i, section) in sections.iter().enumerate() {
            if section.end_time() > total_units + OVERRUN_EPSILON {
                tracing::warn!(
                    id = %section.id,
                    end = section.end_time(),
                    total_units,
                    "section window runs past the end of the timeline"
                );
            }
            for track in section_tracks(i, section, &timeline.windows[i], &options.section) {
                timeline.section_channels[i].push(track);
            }
        }
        timeline.push_scene_tracks();

        timeline.gaps = coverage_gaps(sections, total_units);
        for gap in &timeline.gaps {
            tracing::warn!(
                start = gap.start.0,
                end = gap.end.0,
                "no section covers part of the timeline"
            );
        }

        tracing::debug!(
            sections = sections.len(),
            tracks = timeline.track_count(),
            total_units,
            "timeline built"
        );
        Ok(timeline)
    }

    fn push_scene_tracks(&mut self) {
        let scene = self.options.scene;
        self.camera_z.push(Track::new(
            Target::Camera,
            Property::Depth,
            scene.camera_start_z,
            scene.camera_end_z,
            TimeSpan::new(0.0, self.total_units),
        ));

        let rest = SceneVisual::default();
        let gate_span = self.sections[0].window();
        self.gate_scale.push(
            Track::new(
                Target::Gate,
                Property::Scale,
                rest.gate_scale,
                scene.gate_end_scale,
                gate_span,
            )
            .with_ease(scene.gate_ease),
        );
        self.gate_opacity.push(
            Track::new(
                Target::Gate,
                Property::Opacity,
                rest.gate_opacity,
                scene.gate_end_opacity,
                gate_span,
            )
            .with_ease(scene.gate_ease),
        );
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn total_units(&self) -> f64 {
        self.total_units
    }

    pub fn options(&self) -> &TimelineOptions {
        &self.options
    }

    pub fn windows(&self, index: usize) -> Option<&PhaseWindows> {
        self.windows.get(index)
    }

    pub fn channel(&self, target: Target, property: Property) -> Option<&Channel> {
        match (target, property) {
            (Target::Section(i), p) => self.section_channels.get(i).map(|c| c.get(p)),
            (Target::Camera, Property::Depth) => Some(&self.camera_z),
            (Target::Gate, Property::Scale) => Some(&self.gate_scale),
            (Target::Gate, Property::Opacity) => Some(&self.gate_opacity),
            _ => None,
        }
    }

    /// All tracks, section channels first, in registry order.
    pub fn tracks(&self) -> impl Iterator<Item = &Track> {
        self.section_channels
            .iter()
            .flat_map(|c| [&c.scale, &c.opacity, &c.depth, &c.interactive])
            .chain([&self.camera_z, &self.gate_scale, &self.gate_opacity])
            .flat_map(|c| c.tracks().iter())
    }

    pub fn track_count(&self) -> usize {
        self.tracks().count()
    }

    /// Stretches of the timeline where no section is on screen.
    pub fn coverage_gaps(&self) -> &[TimeSpan] {
        &self.gaps
    }

    pub fn phase_of(&self, index: usize, progress: f64) -> Option<Phase> {
        let section = self.sections.get(index)?;
        let windows = self.windows.get(index)?;
        Some(Phase::at(windows, section, sanitize(progress)))
    }

    pub fn sample(&self, progress: f64) -> Snapshot {
        let mut snapshot = Snapshot::with_sections(self.sections.len());
        self.sample_into(progress, &mut snapshot);
        snapshot
    }

    /// Writes the state at `progress` into `out`. Allocation-free once `out`
    /// holds one entry per section.
    pub fn sample_into(&self, progress: f64, out: &mut Snapshot) {
        let p = sanitize(progress);
        out.progress = p;
        out.sections
            .resize(self.sections.len(), crate::snapshot::SectionVisual::REST);

        for (i, visual) in out.sections.iter_mut().enumerate() {
            let ch = &self.section_channels[i];
            visual.scale = ch.scale.value_at(p).unwrap_or(1.0);
            visual.opacity = ch.opacity.value_at(p).unwrap_or(1.0);
            visual.depth = ch.depth.value_at(p).unwrap_or(0.0);
            visual.interactive = ch.interactive.value_at(p).unwrap_or(1.0) >= 0.5;
            visual.phase = Phase::at(&self.windows[i], &self.sections[i], p);
        }

        let rest = SceneVisual::default();
        out.scene = SceneVisual {
            camera_z: self.camera_z.value_at(p).unwrap_or(rest.camera_z),
            gate_scale: self.gate_scale.value_at(p).unwrap_or(rest.gate_scale),
            gate_opacity: self.gate_opacity.value_at(p).unwrap_or(rest.gate_opacity),
        };
    }
}

fn sanitize(progress: f64) -> f64 {
    if progress.is_nan() { 0.0 } else { progress }
}

fn validate(
    sections: &[Section],
    total_units: f64,
    options: &TimelineOptions,
) -> Result<(), TimelineError> {
    if !total_units.is_finite() || total_units <= 0.0 {
        return Err(TimelineError::InvalidTotal(total_units));
    }
    if sections.is_empty() {
        return Err(TimelineError::Empty);
    }
    options.split.validate()?;

    let mut seen = HashSet::new();
    for s in sections {
        if !seen.insert(s.id.as_str()) {
            return Err(TimelineError::DuplicateId(s.id.clone()));
        }
        let start_ok = s.start_time.is_finite() && s.start_time >= 0.0;
        let duration_ok = s.duration.is_finite() && s.duration > 0.0;
        if !start_ok || !duration_ok {
            return Err(TimelineError::InvalidWindow {
                id: s.id.clone(),
                start: s.start_time,
                duration: s.duration,
            });
        }
        if !s.exit_scale.is_finite() || s.exit_scale <= 0.0 {
            return Err(TimelineError::InvalidExitScale {
                id: s.id.clone(),
                exit_scale: s.exit_scale,
            });
        }
    }
    Ok(())
}

fn section_tracks(
    index: usize,
    section: &Section,
    w: &PhaseWindows,
    motion: &SectionMotion,
) -> Vec<Track> {
    let target = Target::Section(index);
    let ramp = |property, from, to, span, ease| Track::new(target, property, from, to, span).with_ease(ease);
    let mut tracks = Vec::with_capacity(10);

    match section.entrance {
        Entrance::FlyIn => {
            tracks.push(ramp(Property::Scale, motion.enter_scale, 1.0, w.enter, motion.enter_ease));
            tracks.push(ramp(Property::Opacity, 0.0, 1.0, w.enter, motion.enter_ease));
            tracks.push(ramp(Property::Depth, motion.enter_depth, 0.0, w.enter, motion.enter_ease));
            tracks.push(Track::set(target, Property::Interactive, 0.0, w.enter.start.0));
            tracks.push(Track::set(target, Property::Interactive, 1.0, w.enter.end.0));
        }
        Entrance::Present => {
            tracks.push(ramp(Property::Scale, 1.0, 1.0, w.enter, Ease::Linear));
            tracks.push(ramp(Property::Opacity, 1.0, 1.0, w.enter, Ease::Linear));
            tracks.push(ramp(Property::Depth, 0.0, 0.0, w.enter, Ease::Linear));
            tracks.push(Track::set(target, Property::Interactive, 1.0, w.enter.start.0));
        }
    }

    tracks.push(ramp(Property::Depth, 0.0, motion.hold_drift, w.hold, motion.hold_ease));

    match section.exit {
        ExitStyle::FlyPast => {
            tracks.push(ramp(Property::Scale, 1.0, section.exit_scale, w.exit, motion.exit_ease));
            tracks.push(ramp(Property::Opacity, 1.0, 0.0, w.exit, motion.exit_ease));
            tracks.push(ramp(Property::Depth, motion.hold_drift, motion.exit_depth, w.exit, motion.exit_ease));
            tracks.push(Track::set(target, Property::Interactive, 0.0, w.exit.start.0));
        }
        ExitStyle::Remain => {
            tracks.push(ramp(Property::Depth, motion.hold_drift, motion.hold_drift, w.exit, Ease::Linear));
        }
    }
    tracks
}

/// Gaps in `[0, total_units]` not covered by any section's visible range.
/// Opening sections are visible from 0 and closing sections until the end.
fn coverage_gaps(sections: &[Section], total_units: f64) -> Vec<TimeSpan> {
    let mut ranges: Vec<(f64, f64)> = sections
        .iter()
        .map(|s| {
            let start = match s.entrance {
                Entrance::Present => 0.0,
                Entrance::FlyIn => s.start_time,
            };
            let end = match s.exit {
                ExitStyle::Remain => total_units.max(s.end_time()),
                ExitStyle::FlyPast => s.end_time(),
            };
            (start, end)
        })
        .collect();
    ranges.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut gaps = Vec::new();
    let mut covered = 0.0;
    for (start, end) in ranges {
        if start > covered {
            gaps.push(TimeSpan::new(covered, start.min(total_units)));
        }
        covered = f64::max(covered, end);
        if covered >= total_units {
            break;
        }
    }
    if covered < total_units {
        gaps.push(TimeSpan::new(covered, total_units));
    }
    gaps.retain(|g| g.duration() > 0.0);
    gaps
}
