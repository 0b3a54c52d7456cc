use crate::error::TimelineError;
use crate::section::{Entrance, ExitStyle, Section};
use foundation::time::TimeSpan;
use serde::{Deserialize, Serialize};

const SPLIT_EPSILON: f64 = 1e-6;

/// Relative share of a section window spent entering, holding and exiting.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseSplit {
    pub enter: f64,
    pub hold: f64,
    pub exit: f64,
}

impl PhaseSplit {
    pub const CLASSIC: PhaseSplit = PhaseSplit {
        enter: 0.3,
        hold: 0.4,
        exit: 0.3,
    };

    pub const LONG_HOLD: PhaseSplit = PhaseSplit {
        enter: 0.2,
        hold: 0.6,
        exit: 0.2,
    };

    pub fn new(enter: f64, hold: f64, exit: f64) -> Result<Self, TimelineError> {
        let split = Self { enter, hold, exit };
        split.validate()?;
        Ok(split)
    }

    pub fn validate(&self) -> Result<(), TimelineError> {
        let parts = [self.enter, self.hold, self.exit];
        let sum: f64 = parts.iter().sum();
        if parts.iter().any(|p| !p.is_finite() || *p < 0.0) || (sum - 1.0).abs() > SPLIT_EPSILON {
            return Err(TimelineError::InvalidSplit {
                enter: self.enter,
                hold: self.hold,
                exit: self.exit,
            });
        }
        Ok(())
    }

    /// Cuts a section window into its three consecutive sub-windows.
    pub fn windows(&self, section: &Section) -> PhaseWindows {
        let s = section.start_time;
        let d = section.duration;
        let enter_end = s + self.enter * d;
        let exit_start = s + (self.enter + self.hold) * d;
        PhaseWindows {
            enter: TimeSpan::new(s, enter_end),
            hold: TimeSpan::new(enter_end, exit_start),
            exit: TimeSpan::new(exit_start, s + d),
        }
    }
}

impl Default for PhaseSplit {
    fn default() -> Self {
        Self::CLASSIC
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PhaseWindows {
    pub enter: TimeSpan,
    pub hold: TimeSpan,
    pub exit: TimeSpan,
}

/// Where a section stands relative to the current progress.
///
/// Derived on demand and never stored: the same progress always maps to the
/// same phase, whichever direction the user scrolled from.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Phase {
    Unseen,
    Entering,
    Held,
    Exiting,
    Passed,
}

impl Phase {
    pub fn at(windows: &PhaseWindows, section: &Section, progress: f64) -> Phase {
        let raw = if progress < windows.enter.start.0 {
            Phase::Unseen
        } else if progress < windows.enter.end.0 {
            Phase::Entering
        } else if progress < windows.exit.start.0 {
            Phase::Held
        } else if progress < windows.exit.end.0 {
            Phase::Exiting
        } else {
            Phase::Passed
        };
        match (raw, section.entrance, section.exit) {
            (Phase::Unseen | Phase::Entering, Entrance::Present, _) => Phase::Held,
            (Phase::Exiting | Phase::Passed, _, ExitStyle::Remain) => Phase::Held,
            (phase, _, _) => phase,
        }
    }

    /// Whether a section in this phase is drawn at all.
    pub fn is_visible(self) -> bool {
        !matches!(self, Phase::Unseen | Phase::Passed)
    }
}

#[cfg(test)]
mod tests {
    use super::{Phase, PhaseSplit};
    use crate::error::TimelineError;
    use crate::section::Section;
    use pretty_assertions::assert_eq;

    #[test]
    fn presets_are_valid() {
        assert!(PhaseSplit::CLASSIC.validate().is_ok());
        assert!(PhaseSplit::LONG_HOLD.validate().is_ok());
        assert_eq!(PhaseSplit::default(), PhaseSplit::CLASSIC);
    }

    #[test]
    fn rejects_bad_ratios() {
        assert!(matches!(
            PhaseSplit::new(0.5, 0.5, 0.5),
            Err(TimelineError::InvalidSplit { .. })
        ));
        assert!(PhaseSplit::new(-0.1, 0.6, 0.5).is_err());
        assert!(PhaseSplit::new(f64::NAN, 0.5, 0.5).is_err());
        assert!(PhaseSplit::new(0.0, 1.0, 0.0).is_ok());
    }

    #[test]
    fn windows_tile_the_section() {
        let s = Section::new("about", 10.0, 10.0);
        let w = PhaseSplit::LONG_HOLD.windows(&s);
        assert_eq!(w.enter.start.0, 10.0);
        assert_eq!(w.enter.end.0, 12.0);
        assert_eq!(w.hold.end.0, 18.0);
        assert_eq!(w.exit.start.0, 18.0);
        assert_eq!(w.exit.end.0, 20.0);
    }

    #[test]
    fn phase_is_positional() {
        let s = Section::new("about", 0.0, 10.0);
        let w = PhaseSplit::CLASSIC.windows(&s);
        let phases: Vec<Phase> = [-1.0, 0.0, 2.9, 3.0, 6.9, 7.0, 9.9, 10.0, 50.0]
            .iter()
            .map(|p| Phase::at(&w, &s, *p))
            .collect();
        assert_eq!(
            phases,
            vec![
                Phase::Unseen,
                Phase::Entering,
                Phase::Entering,
                Phase::Held,
                Phase::Held,
                Phase::Exiting,
                Phase::Exiting,
                Phase::Passed,
                Phase::Passed,
            ]
        );
    }

    #[test]
    fn present_and_remain_sections_rest_outside_their_window() {
        let hero = Section::new("hero", 0.0, 2.0).present();
        let cta = Section::new("cta", 5.0, 2.0).remain();
        let hw = PhaseSplit::CLASSIC.windows(&hero);
        let cw = PhaseSplit::CLASSIC.windows(&cta);
        assert_eq!(Phase::at(&hw, &hero, 0.0), Phase::Held);
        assert_eq!(Phase::at(&hw, &hero, 1.9), Phase::Exiting);
        assert_eq!(Phase::at(&cw, &cta, 100.0), Phase::Held);
        assert!(!Phase::Passed.is_visible());
    }
}
