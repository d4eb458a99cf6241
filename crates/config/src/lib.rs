mod load;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub use load::{config_path, load_config};

/// Tunables for every widget on a page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub player: PlayerConfig,
    pub timeline: TimelineConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Used when a widget carries no track name.
    pub default_track_name: String,
    /// Used when a widget defines no accent color.
    pub default_accent: String,
    pub seek_step_secs: f64,
    /// Seek step while shift is held.
    pub seek_step_modified_secs: f64,
    pub stroke_width: f64,
    /// Vertical margin kept free above and below the analysed waveform.
    pub sample_margin: f64,
    /// Phase added to the synthetic sine on every frame.
    pub fallback_phase_step: f64,
    /// Full sine periods drawn across the surface width.
    pub fallback_periods: f64,
    /// Synthetic amplitude is the surface height divided by this.
    pub fallback_amplitude_divisor: f64,
    pub fallback_x_step: f64,
    pub analysis: AnalysisConfig,
    pub labels: LabelConfig,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            default_track_name: "audio".to_string(),
            default_accent: "#38bdf8".to_string(),
            seek_step_secs: 5.0,
            seek_step_modified_secs: 10.0,
            stroke_width: 2.0,
            sample_margin: 2.0,
            fallback_phase_step: 0.04,
            fallback_periods: 6.0,
            fallback_amplitude_divisor: 3.0,
            fallback_x_step: 2.0,
            analysis: AnalysisConfig::default(),
            labels: LabelConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Analyser window; also the length of the reused sample buffer.
    pub fft_size: usize,
    pub smoothing: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            fft_size: 2048,
            smoothing: 0.85,
        }
    }
}

/// Prefixes for the accessible labels, followed by the track name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    pub play: String,
    pub pause: String,
    pub progress: String,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            play: "Play".to_string(),
            pause: "Pause".to_string(),
            progress: "Progress".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    /// Used when a timeline has no usable max-offset attribute.
    pub default_max_offset: f64,
    /// Movement beyond this many pixels turns a press into a drag.
    pub drag_threshold: f64,
    pub wheel_factor: f64,
    /// Animation frames a finished drag keeps suppressing node clicks.
    pub click_suppress_frames: u32,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            default_max_offset: 140.0,
            drag_threshold: 3.0,
            wheel_factor: 0.4,
            click_suppress_frames: 1,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config '{path}': {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid config value for '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl Config {
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: PathBuf::from("<inline>"),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let fft_size = self.player.analysis.fft_size;
        if !fft_size.is_power_of_two() || !(32..=32768).contains(&fft_size) {
            return Err(ConfigError::Invalid {
                field: "player.analysis.fft_size",
                reason: format!("{fft_size} is not a power of two in 32..=32768"),
            });
        }

        let smoothing = self.player.analysis.smoothing;
        if !(0.0..=1.0).contains(&smoothing) {
            return Err(ConfigError::Invalid {
                field: "player.analysis.smoothing",
                reason: format!("{smoothing} is outside 0..=1"),
            });
        }

        let positive = [
            ("player.seek_step_secs", self.player.seek_step_secs),
            ("player.seek_step_modified_secs", self.player.seek_step_modified_secs),
            ("player.fallback_x_step", self.player.fallback_x_step),
            ("player.stroke_width", self.player.stroke_width),
            (
                "player.fallback_amplitude_divisor",
                self.player.fallback_amplitude_divisor,
            ),
            ("timeline.wheel_factor", self.timeline.wheel_factor),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("{value} must be a positive number"),
                });
            }
        }

        let non_negative = [
            ("player.sample_margin", self.player.sample_margin),
            ("player.fallback_phase_step", self.player.fallback_phase_step),
            ("player.fallback_periods", self.player.fallback_periods),
            ("timeline.default_max_offset", self.timeline.default_max_offset),
            ("timeline.drag_threshold", self.timeline.drag_threshold),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("{value} must be a non-negative number"),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_widget_behaviour() {
        let config = Config::default();
        assert_eq!(config.player.default_track_name, "audio");
        assert_eq!(config.player.analysis.fft_size, 2048);
        assert_eq!(config.player.seek_step_secs, 5.0);
        assert_eq!(config.player.seek_step_modified_secs, 10.0);
        assert_eq!(config.timeline.default_max_offset, 140.0);
        assert_eq!(config.timeline.wheel_factor, 0.4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml_str(
            r#"
            [timeline]
            default_max_offset = 200.0

            [player.labels]
            play = "Reproducir"
            "#,
        )
        .expect("parse");

        assert_eq!(config.timeline.default_max_offset, 200.0);
        assert_eq!(config.timeline.drag_threshold, 3.0);
        assert_eq!(config.player.labels.play, "Reproducir");
        assert_eq!(config.player.labels.pause, "Pause");
    }

    #[test]
    fn test_rejects_bad_fft_size() {
        let err = Config::from_toml_str("[player.analysis]\nfft_size = 1000\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "player.analysis.fft_size",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_non_positive_wheel_factor() {
        let err = Config::from_toml_str("[timeline]\nwheel_factor = 0.0\n").unwrap_err();
        assert!(err.to_string().contains("timeline.wheel_factor"));
    }

    #[test]
    fn test_rejects_unusable_drag_threshold() {
        for value in ["nan", "-5.0", "inf"] {
            let text = format!("[timeline]\ndrag_threshold = {value}\n");
            let err = Config::from_toml_str(&text).unwrap_err();
            assert!(
                matches!(
                    err,
                    ConfigError::Invalid {
                        field: "timeline.drag_threshold",
                        ..
                    }
                ),
                "{value} accepted"
            );
        }
        assert!(Config::from_toml_str("[timeline]\ndrag_threshold = 0.0\n").is_ok());
    }

    #[test]
    fn test_rejects_unusable_drawing_values() {
        let cases = [
            ("[player]\nstroke_width = -2.0\n", "player.stroke_width"),
            ("[player]\nstroke_width = 0.0\n", "player.stroke_width"),
            ("[player]\nsample_margin = nan\n", "player.sample_margin"),
            ("[player]\nfallback_phase_step = inf\n", "player.fallback_phase_step"),
            ("[player]\nfallback_periods = -1.0\n", "player.fallback_periods"),
        ];
        for (text, expected) in cases {
            match Config::from_toml_str(text) {
                Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, expected),
                other => panic!("{expected}: expected invalid, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let err = Config::from_toml_str("[player\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_serialized_config_parses_back() {
        let mut config = Config::default();
        config.player.labels.progress = "Progreso".to_string();
        let text = config.to_toml_string().expect("serialize");
        let parsed = Config::from_toml_str(&text).expect("parse");
        assert_eq!(parsed, config);
    }
}
