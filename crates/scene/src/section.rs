use foundation::time::TimeSpan;
use serde::{Deserialize, Serialize};

/// How a section arrives on screen.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Entrance {
    /// Starts distant and transparent, flies toward the viewer.
    #[default]
    FlyIn,
    /// Already at rest when its window opens (the opening card).
    Present,
}

/// How a section leaves the screen.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExitStyle {
    /// Zooms past the camera and fades out.
    #[default]
    FlyPast,
    /// Stays at rest once its window closes (the closing card).
    Remain,
}

pub const DEFAULT_EXIT_SCALE: f64 = 1.5;

/// One full-viewport content card and its choreography window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: String,
    pub start_time: f64,
    pub duration: f64,
    #[serde(default = "default_exit_scale")]
    pub exit_scale: f64,
    #[serde(default)]
    pub z_index: i32,
    #[serde(default)]
    pub entrance: Entrance,
    #[serde(default)]
    pub exit: ExitStyle,
}

fn default_exit_scale() -> f64 {
    DEFAULT_EXIT_SCALE
}

impl Section {
    pub fn new(id: impl Into<String>, start_time: f64, duration: f64) -> Self {
        Self {
            id: id.into(),
            start_time,
            duration,
            exit_scale: DEFAULT_EXIT_SCALE,
            z_index: 0,
            entrance: Entrance::FlyIn,
            exit: ExitStyle::FlyPast,
        }
    }

    pub fn with_exit_scale(mut self, exit_scale: f64) -> Self {
        self.exit_scale = exit_scale;
        self
    }

    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    pub fn present(mut self) -> Self {
        self.entrance = Entrance::Present;
        self
    }

    pub fn remain(mut self) -> Self {
        self.exit = ExitStyle::Remain;
        self
    }

    pub fn end_time(&self) -> f64 {
        self.start_time + self.duration
    }

    pub fn window(&self) -> TimeSpan {
        TimeSpan::starting_at(self.start_time, self.duration)
    }
}
