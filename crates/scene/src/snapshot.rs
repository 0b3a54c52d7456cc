use crate::timeline::Phase;

/// Derived visual state of one section at one progress value.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SectionVisual {
    pub scale: f64,
    pub opacity: f64,
    pub depth: f64,
    pub interactive: bool,
    pub phase: Phase,
}

impl SectionVisual {
    /// On screen, centered, accepting input.
    pub const REST: SectionVisual = SectionVisual {
        scale: 1.0,
        opacity: 1.0,
        depth: 0.0,
        interactive: true,
        phase: Phase::Held,
    };

    /// CSS transform for this visual, depth in pixels.
    pub fn css_transform(&self) -> String {
        format!("translateZ({:.3}px) scale({:.5})", self.depth, self.scale)
    }
}

impl Default for SectionVisual {
    fn default() -> Self {
        Self::REST
    }
}

/// The choreographer-owned knobs of the 3D scene.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SceneVisual {
    pub camera_z: f64,
    pub gate_scale: f64,
    pub gate_opacity: f64,
}

impl Default for SceneVisual {
    fn default() -> Self {
        Self {
            camera_z: 30.0,
            gate_scale: 1.0,
            gate_opacity: 0.8,
        }
    }
}

/// Everything the timeline drives, sampled at a single progress value.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Snapshot {
    pub progress: f64,
    pub sections: Vec<SectionVisual>,
    pub scene: SceneVisual,
}

impl Snapshot {
    pub fn with_sections(count: usize) -> Self {
        Self {
            progress: 0.0,
            sections: vec![SectionVisual::REST; count],
            scene: SceneVisual::default(),
        }
    }

    pub fn section(&self, index: usize) -> Option<&SectionVisual> {
        self.sections.get(index)
    }

    pub fn visible_count(&self) -> usize {
        self.sections.iter().filter(|s| s.opacity > 0.0).count()
    }
}
