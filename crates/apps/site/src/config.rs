use crate::error::SiteError;
use runtime::gate::DEFAULT_BOOT_DELAY_MS;
use scene::registry::SectionRegistry;
use scene::section::Section;
use scene::timeline::{PhaseSplit, TimelineOptions};
use serde::Deserialize;

/// Seconds the scrubbed progress trails the scrollbar.
pub const DEFAULT_SCRUB_SECONDS: f64 = 1.0;

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Runtime knobs passed to `boot` as JSON. Every field is optional.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct SiteConfig {
    /// Overrides the timeline length; defaults to the layout's own.
    pub total_units: Option<f64>,
    pub phase_split: PhaseSplit,
    pub boot_delay_ms: u32,
    /// 0 makes the choreography follow the scrollbar exactly.
    pub scrub_seconds: f64,
    pub log_level: String,
    pub api_key: Option<String>,
    /// Replaces the shipped landing layout.
    pub sections: Option<Vec<Section>>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            total_units: None,
            phase_split: PhaseSplit::default(),
            boot_delay_ms: DEFAULT_BOOT_DELAY_MS,
            scrub_seconds: DEFAULT_SCRUB_SECONDS,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            api_key: None,
            sections: None,
        }
    }
}

impl SiteConfig {
    /// `None` or a blank string yields the defaults.
    pub fn from_json(json: Option<&str>) -> Result<Self, SiteError> {
        let Some(json) = json.filter(|s| !s.trim().is_empty()) else {
            return Ok(Self::default());
        };
        let config: Self =
            serde_json::from_str(json).map_err(|e| SiteError::Config(e.to_string()))?;
        config.phase_split.validate()?;
        if !config.scrub_seconds.is_finite() || config.scrub_seconds < 0.0 {
            return Err(SiteError::Config(format!(
                "scrubSeconds must be a non-negative number, got {}",
                config.scrub_seconds
            )));
        }
        Ok(config)
    }

    pub fn registry(&self) -> SectionRegistry {
        let registry = match &self.sections {
            Some(sections) => SectionRegistry::from_sections(sections.clone()),
            None => SectionRegistry::landing(),
        };
        match self.total_units {
            Some(total) => SectionRegistry::new(registry.sections().to_vec(), total),
            None => registry,
        }
    }

    pub fn timeline_options(&self) -> TimelineOptions {
        TimelineOptions::default().with_split(self.phase_split)
    }

    /// Runtime key first, then the one baked in at build time.
    pub fn api_key(&self) -> String {
        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| option_env!("GEMINI_API_KEY").map(str::to_string))
            .unwrap_or_default()
    }
}
