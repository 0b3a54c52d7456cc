use crate::section::Section;

/// Overlap between consecutive windows in the shipped layout, in timeline
/// units. Section *n* exits while section *n+1* enters.
pub const DEFAULT_OVERLAP: f64 = 0.7;

/// Spacing between consecutive z-indices assigned by the builder.
const Z_STEP: i32 = 10;

/// Ordered, static list of content sections plus the timeline length.
///
/// Order is narrative order; the choreographer never reorders it.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionRegistry {
    sections: Vec<Section>,
    total_units: f64,
}

impl SectionRegistry {
    pub fn new(sections: Vec<Section>, total_units: f64) -> Self {
        Self {
            sections,
            total_units,
        }
    }

    /// Registry whose total length is the end of its last window.
    pub fn from_sections(sections: Vec<Section>) -> Self {
        let total_units = sections
            .iter()
            .map(Section::end_time)
            .fold(0.0, f64::max);
        Self::new(sections, total_units)
    }

    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// The shipped landing layout: an opening hero, eight fly-through cards
    /// and a closing call to action that stays on screen.
    pub fn landing() -> Self {
        Self::builder()
            .overlap(DEFAULT_OVERLAP)
            .opening("hero", 2.0, 3.0)
            .card("about", 3.0)
            .card("features", 3.0)
            .card("tech-stack", 3.0)
            .card("process", 3.0)
            .card("portfolio", 3.0)
            .card("image-lab", 3.0)
            .card("guarantees", 3.0)
            .card("testimonials", 3.0)
            .closing("cta", 4.3)
            .build()
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn total_units(&self) -> f64 {
        self.total_units
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.sections.iter().position(|s| s.id == id)
    }

    pub fn get(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }
}

impl Default for SectionRegistry {
    fn default() -> Self {
        Self::landing()
    }
}

/// Lays sections out back to back with a fixed overlap and assigns stacking
/// order so every exiting card paints above the one entering behind it.
#[derive(Debug, Default, Clone)]
pub struct RegistryBuilder {
    sections: Vec<Section>,
    overlap: f64,
    cursor: f64,
}

impl RegistryBuilder {
    pub fn overlap(mut self, overlap: f64) -> Self {
        self.overlap = overlap.max(0.0);
        self
    }

    /// A card already on screen at its window start.
    pub fn opening(self, id: &str, duration: f64, exit_scale: f64) -> Self {
        let section = self.next(id, duration).with_exit_scale(exit_scale).present();
        self.push(section)
    }

    pub fn card(self, id: &str, duration: f64) -> Self {
        let section = self.next(id, duration);
        self.push(section)
    }

    /// A card that stays on screen after its window.
    pub fn closing(self, id: &str, duration: f64) -> Self {
        let section = self.next(id, duration).remain();
        self.push(section)
    }

    pub fn build(self) -> SectionRegistry {
        let n = self.sections.len() as i32;
        let sections = self
            .sections
            .into_iter()
            .enumerate()
            .map(|(i, s)| s.with_z_index((n - 1 - i as i32) * Z_STEP))
            .collect();
        SectionRegistry::from_sections(sections)
    }

    fn next(&self, id: &str, duration: f64) -> Section {
        let start = if self.sections.is_empty() {
            self.cursor
        } else {
            (self.cursor - self.overlap).max(0.0)
        };
        Section::new(id, start, duration)
    }

    fn push(mut self, section: Section) -> Self {
        self.cursor = section.end_time();
        self.sections.push(section);
        self
    }
}
