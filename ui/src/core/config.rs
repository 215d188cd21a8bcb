//! Runtime settings for the participant counter and the export pipeline.
//!
//! Defaults live in code; `assets/settings.json` is embedded and may override
//! any subset of fields.

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::timing::FrameSchedule;

const SETTINGS_JSON: &str = include_str!("../../assets/settings.json");

#[derive(Debug, Error)]
#[error("malformed settings: {0}")]
pub struct SettingsError(#[from] serde_json::Error);

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub counter: CounterSettings,
    pub export: ExportSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CounterSettings {
    /// Name of the shared counter cell.
    pub key: String,
    /// Optimistic-transaction attempts before giving up.
    pub max_attempts: u32,
}

impl Default for CounterSettings {
    fn default() -> Self {
        Self {
            key: "participantCount".into(),
            max_attempts: 25,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    pub static_scale: f32,
    pub animated_scale: f32,
    pub duration_secs: u32,
    pub fps: u32,
    pub snowflakes: usize,
    /// Hex colour painted behind the card before rasterizing.
    pub background: String,
    pub region_id: String,
    pub suppress_ids: Vec<String>,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            static_scale: 2.0,
            animated_scale: 1.5,
            duration_secs: 2,
            fps: 15,
            snowflakes: 60,
            background: "#2d3e50".into(),
            region_id: "result-card".into(),
            suppress_ids: vec!["music-controller".into()],
        }
    }
}

impl ExportSettings {
    pub fn schedule(&self) -> FrameSchedule {
        FrameSchedule::new(self.duration_secs, self.fps)
    }
}

impl Settings {
    pub fn from_json(raw: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Settings parsed from the embedded asset. Parsed once; a malformed
    /// asset is reported on every call rather than replaced by defaults.
    pub fn embedded() -> Result<&'static Settings, SettingsError> {
        static SETTINGS: OnceCell<Settings> = OnceCell::new();
        SETTINGS.get_or_try_init(|| Self::from_json(SETTINGS_JSON))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_settings_match_defaults() {
        let settings = Settings::embedded().unwrap();
        assert_eq!(settings, &Settings::default());
    }

    #[test]
    fn partial_settings_fall_back_per_field() {
        let settings = Settings::from_json(r#"{ "export": { "fps": 10 } }"#).unwrap();
        assert_eq!(settings.export.fps, 10);
        assert_eq!(settings.export.duration_secs, 2);
        assert_eq!(settings.counter.key, "participantCount");
        assert_eq!(settings.export.schedule().total_frames(), 20);
    }

    #[test]
    fn malformed_settings_are_an_error() {
        assert!(Settings::from_json("{ \"export\": 3 }").is_err());
    }
}
