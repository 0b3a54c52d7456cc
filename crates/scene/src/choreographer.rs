//! Binds a [`Timeline`] to concrete targets and keeps them in step with the
//! scroll signal.
//!
//! Mounting captures each target's pristine state before the first write;
//! teardown writes it back in reverse binding order. Every seek is
//! "derive snapshot, apply snapshot": the timeline samples into a reused
//! [`Snapshot`], then each bound surface receives its slice.

use crate::snapshot::{SceneVisual, SectionVisual, Snapshot};
use crate::timeline::Timeline;
use runtime::signal::{Signal, Subscription};
use std::cell::RefCell;
use std::rc::Rc;

/// A section target that can be styled and later returned to how it was.
pub trait SectionSurface {
    type Pristine;

    fn capture(&self) -> Self::Pristine;
    fn apply(&mut self, visual: &SectionVisual, z_index: i32);
    fn restore(&mut self, pristine: Self::Pristine);
}

/// Resolves section ids to surfaces. Missing ids are not an error.
pub trait Stage {
    type Surface: SectionSurface;

    fn locate(&mut self, id: &str) -> Option<Self::Surface>;
}

/// The scene knobs the choreographer owns.
pub trait SceneRig {
    fn scene_pose(&self) -> SceneVisual;
    fn set_scene_pose(&mut self, pose: &SceneVisual);
}

/// For choreographies with no 3D scene attached.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoRig;

impl SceneRig for NoRig {
    fn scene_pose(&self) -> SceneVisual {
        SceneVisual::default()
    }

    fn set_scene_pose(&mut self, _pose: &SceneVisual) {}
}

impl<T: SceneRig> SceneRig for Rc<RefCell<T>> {
    fn scene_pose(&self) -> SceneVisual {
        self.borrow().scene_pose()
    }

    fn set_scene_pose(&mut self, pose: &SceneVisual) {
        self.borrow_mut().set_scene_pose(pose);
    }
}

struct Binding<S: SectionSurface> {
    index: usize,
    surface: S,
    pristine: Option<S::Pristine>,
}

pub struct Choreographer<S: SectionSurface, R: SceneRig = NoRig> {
    timeline: Timeline,
    bindings: Vec<Binding<S>>,
    rig: Option<(R, SceneVisual)>,
    skipped: Vec<String>,
    snapshot: Snapshot,
    scroll: Option<Subscription<f64>>,
    torn_down: bool,
}

impl<S: SectionSurface, R: SceneRig> Choreographer<S, R> {
    /// Binds every section the stage can locate, captures pristine state and
    /// applies the state at progress 0.
    pub fn mount<St>(timeline: Timeline, stage: &mut St, rig: Option<R>) -> Self
    where
        St: Stage<Surface = S>,
    {
        let mut bindings = Vec::with_capacity(timeline.sections().len());
        let mut skipped = Vec::new();
        for (index, section) in timeline.sections().iter().enumerate() {
            match stage.locate(&section.id) {
                Some(surface) => {
                    let pristine = Some(surface.capture());
                    bindings.push(Binding {
                        index,
                        surface,
                        pristine,
                    });
                }
                None => {
                    tracing::warn!(id = %section.id, "section target not found, skipping binding");
                    skipped.push(section.id.clone());
                }
            }
        }

        let rig = rig.map(|r| {
            let pristine = r.scene_pose();
            (r, pristine)
        });
        let snapshot = Snapshot::with_sections(timeline.sections().len());

        tracing::debug!(
            bound = bindings.len(),
            skipped = skipped.len(),
            rig = rig.is_some(),
            "choreographer mounted"
        );

        let mut choreographer = Self {
            timeline,
            bindings,
            rig,
            skipped,
            snapshot,
            scroll: None,
            torn_down: false,
        };
        choreographer.seek(0.0);
        choreographer
    }

    /// Subscribes to a scroll-progress signal; `sync` then follows it.
    /// Replaces any earlier subscription.
    pub fn attach_scroll(&mut self, signal: &Signal<f64>) {
        if self.torn_down {
            return;
        }
        self.scroll = Some(signal.subscribe());
    }

    /// Seeks to the newest scroll value if it changed since the last sync.
    /// Intermediate values are never replayed.
    pub fn sync(&mut self) -> bool {
        let next = match self.scroll.as_mut() {
            Some(sub) => sub.poll(),
            None => None,
        };
        match next {
            Some(progress) => {
                self.seek(progress);
                true
            }
            None => false,
        }
    }

    pub fn seek(&mut self, progress: f64) {
        if self.torn_down {
            return;
        }
        self.timeline.sample_into(progress, &mut self.snapshot);
        for binding in &mut self.bindings {
            let section = &self.timeline.sections()[binding.index];
            binding
                .surface
                .apply(&self.snapshot.sections[binding.index], section.z_index);
        }
        if let Some((rig, _)) = self.rig.as_mut() {
            rig.set_scene_pose(&self.snapshot.scene);
        }
    }

    /// Restores every bound target and drops the scroll subscription.
    /// Later calls do nothing.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        self.scroll = None;
        for binding in self.bindings.iter_mut().rev() {
            if let Some(pristine) = binding.pristine.take() {
                binding.surface.restore(pristine);
            }
        }
        if let Some((rig, pristine)) = self.rig.as_mut() {
            rig.set_scene_pose(pristine);
        }
        tracing::debug!(bound = self.bindings.len(), "choreographer torn down");
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn bound_count(&self) -> usize {
        self.bindings.len()
    }

    /// Ids of sections whose targets could not be located at mount.
    pub fn skipped(&self) -> &[String] {
        &self.skipped
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }
}

impl<S: SectionSurface, R: SceneRig> Drop for Choreographer<S, R> {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::{Choreographer, NoRig, SceneRig, SectionSurface, Stage};
    use crate::section::Section;
    use crate::snapshot::{SceneVisual, SectionVisual};
    use crate::timeline::Timeline;
    use pretty_assertions::assert_eq;
    use runtime::signal::Signal;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq, Default)]
    struct Style {
        transform: String,
        opacity: String,
        pointer_events: String,
        z_index: String,
    }

    #[derive(Clone)]
    struct FakeEl(Rc<RefCell<Style>>);

    impl SectionSurface for FakeEl {
        type Pristine = Style;

        fn capture(&self) -> Style {
            self.0.borrow().clone()
        }

        fn apply(&mut self, visual: &SectionVisual, z_index: i32) {
            let mut s = self.0.borrow_mut();
            s.transform = visual.css_transform();
            s.opacity = format!("{:.4}", visual.opacity);
            s.pointer_events = if visual.interactive { "auto" } else { "none" }.into();
            s.z_index = z_index.to_string();
        }

        fn restore(&mut self, pristine: Style) {
            *self.0.borrow_mut() = pristine;
        }
    }

    #[derive(Default)]
    struct FakeStage(HashMap<String, Rc<RefCell<Style>>>);

    impl FakeStage {
        fn with(ids: &[&str]) -> Self {
            let mut stage = Self::default();
            for id in ids {
                let style = Style {
                    opacity: "1".into(),
                    ..Style::default()
                };
                stage.0.insert(id.to_string(), Rc::new(RefCell::new(style)));
            }
            stage
        }

        fn style(&self, id: &str) -> Style {
            self.0[id].borrow().clone()
        }

        fn styles(&self, ids: &[&str]) -> Vec<Style> {
            ids.iter().map(|id| self.style(id)).collect()
        }
    }

    impl Stage for FakeStage {
        type Surface = FakeEl;

        fn locate(&mut self, id: &str) -> Option<FakeEl> {
            self.0.get(id).cloned().map(FakeEl)
        }
    }

    #[derive(Debug, Default)]
    struct FakeRig(SceneVisual);

    impl SceneRig for FakeRig {
        fn scene_pose(&self) -> SceneVisual {
            self.0
        }

        fn set_scene_pose(&mut self, pose: &SceneVisual) {
            self.0 = *pose;
        }
    }

    const IDS: [&str; 3] = ["hero", "about", "features"];

    fn timeline() -> Timeline {
        let sections = vec![
            Section::new("hero", 0.0, 10.0).present().with_z_index(20),
            Section::new("about", 7.0, 10.0).with_z_index(10),
            Section::new("features", 14.0, 10.0),
        ];
        Timeline::build(&sections, 24.0).unwrap()
    }

    #[test]
    fn teardown_restores_pristine_styles() {
        let mut stage = FakeStage::with(&IDS);
        let before = stage.styles(&IDS);
        let mut ch: Choreographer<FakeEl> = Choreographer::mount(timeline(), &mut stage, None);
        ch.seek(12.0);
        assert_ne!(stage.styles(&IDS), before);

        ch.teardown();
        assert_eq!(stage.styles(&IDS), before);
        ch.teardown();
        assert_eq!(stage.styles(&IDS), before);
        assert!(ch.is_torn_down());
    }

    #[test]
    fn seek_after_teardown_is_inert() {
        let mut stage = FakeStage::with(&IDS);
        let before = stage.styles(&IDS);
        let mut ch: Choreographer<FakeEl> = Choreographer::mount(timeline(), &mut stage, None);
        ch.teardown();
        ch.seek(9.0);
        assert_eq!(stage.styles(&IDS), before);
    }

    #[test]
    fn drop_tears_down() {
        let mut stage = FakeStage::with(&IDS);
        let before = stage.styles(&IDS);
        {
            let mut ch: Choreographer<FakeEl> = Choreographer::mount(timeline(), &mut stage, None);
            ch.seek(20.0);
        }
        assert_eq!(stage.styles(&IDS), before);
    }

    #[test]
    fn scrolling_back_matches_a_direct_seek() {
        let mut path_stage = FakeStage::with(&IDS);
        let mut direct_stage = FakeStage::with(&IDS);
        let mut path: Choreographer<FakeEl> =
            Choreographer::mount(timeline(), &mut path_stage, None);
        let mut direct: Choreographer<FakeEl> =
            Choreographer::mount(timeline(), &mut direct_stage, None);

        for p in [1.0, 5.0, 9.5, 15.0, 23.0, 24.0, 18.0, 8.25] {
            path.seek(p);
        }
        direct.seek(8.25);
        assert_eq!(path.snapshot(), direct.snapshot());
        assert_eq!(path_stage.styles(&IDS), direct_stage.styles(&IDS));
    }

    #[test]
    fn missing_targets_are_skipped() {
        let mut stage = FakeStage::with(&["hero", "features"]);
        let mut ch: Choreographer<FakeEl> = Choreographer::mount(timeline(), &mut stage, None);
        assert_eq!(ch.bound_count(), 2);
        assert_eq!(ch.skipped(), &["about".to_string()]);

        ch.seek(15.0);
        assert_eq!(stage.style("features").pointer_events, "none");
        assert_eq!(stage.style("hero").opacity, "0.0000");
    }

    #[test]
    fn applies_stacking_order() {
        let mut stage = FakeStage::with(&IDS);
        let _ch: Choreographer<FakeEl> = Choreographer::mount(timeline(), &mut stage, None);
        let z: Vec<String> = stage.styles(&IDS).into_iter().map(|s| s.z_index).collect();
        assert_eq!(z, vec!["20", "10", "0"]);
    }

    #[test]
    fn sync_follows_the_latest_scroll_value() {
        let mut stage = FakeStage::with(&IDS);
        let scroll = Signal::new("scroll", 0.0);
        let mut ch: Choreographer<FakeEl> = Choreographer::mount(timeline(), &mut stage, None);
        ch.attach_scroll(&scroll);
        assert!(ch.sync());
        assert!(!ch.sync());

        scroll.set(3.0);
        scroll.set(11.0);
        assert!(ch.sync());
        assert_eq!(ch.snapshot().progress, 11.0);

        ch.teardown();
        assert_eq!(scroll.subscriber_count(), 0);
        scroll.set(2.0);
        assert!(!ch.sync());
    }

    #[test]
    fn drives_and_restores_the_scene_rig() {
        let mut stage = FakeStage::with(&IDS);
        let rig = Rc::new(RefCell::new(FakeRig(SceneVisual {
            camera_z: 99.0,
            gate_scale: 1.0,
            gate_opacity: 1.0,
        })));
        let mut ch: Choreographer<FakeEl, _> =
            Choreographer::mount(timeline(), &mut stage, Some(rig.clone()));
        ch.seek(24.0);
        assert_eq!(rig.borrow().0.camera_z, -20.0);
        assert_eq!(rig.borrow().0.gate_opacity, 0.0);

        ch.teardown();
        assert_eq!(rig.borrow().0.camera_z, 99.0);
    }

    #[test]
    fn works_without_a_rig() {
        let mut stage = FakeStage::with(&IDS);
        let mut ch: Choreographer<FakeEl, NoRig> =
            Choreographer::mount(timeline(), &mut stage, Some(NoRig));
        ch.seek(3.0);
        assert_eq!(ch.snapshot().sections.len(), 3);
    }
}
