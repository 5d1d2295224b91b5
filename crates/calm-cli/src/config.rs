//! Configuration loading and management.

use std::path::{Path, PathBuf};

use anyhow::Context;
use calm_core::{BufferConfig, StressConfig};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Colours used for the stress gradient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Colors {
    pub low: String,
    pub high: String,
}

impl Default for Colors {
    fn default() -> Self {
        Self {
            low: "#22c55e".to_string(),
            high: "#ef4444".to_string(),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Stress estimation thresholds.
    pub stress: StressConfig,
    /// Buffer sizing policy.
    pub buffers: BufferConfig,
    pub colors: Colors,
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    ///
    /// Later sources win: defaults, `~/.config/calm/config.toml`, the given
    /// file, then `CALM_*` environment variables (`__` separates sections,
    /// e.g. `CALM_BUFFERS__EXAM_MULTIPLIER=4`).
    pub fn load_from(config_path: Option<&Path>) -> anyhow::Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        if let Some(path) = config_path {
            anyhow::ensure!(path.exists(), "config file not found: {}", path.display());
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed("CALM_").split("__"));

        let config: Self = figment.extract().context("failed to parse configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects configurations the engines would refuse at compute time.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.stress.validate().context("invalid [stress] section")?;
        self.buffers.validate().context("invalid [buffers] section")?;
        Ok(())
    }
}

/// Returns the platform-specific config directory for calm.
///
/// On Linux: `~/.config/calm`
pub fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("calm"))
}

#[cfg(test)]
mod tests {
    use super::*;

    use calm_core::WindowFilter;

    #[test]
    fn test_dirs_config_path_ends_with_calm() {
        let path = dirs_config_path().unwrap();
        assert_eq!(path.file_name().unwrap(), "calm");
    }

    #[test]
    fn test_default_config_matches_engine_defaults() {
        let config = Config::default();
        assert_eq!(config.stress, StressConfig::default());
        assert_eq!(config.buffers, BufferConfig::default());
        assert_eq!(config.colors.low, "#22c55e");
    }

    #[test]
    fn test_file_overrides_individual_fields() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("calm.toml");
        std::fs::write(
            &path,
            r#"
[stress]
window_filter = "overlap"
heavy_day_limit = 2

[buffers]
exam_multiplier = 4.0
priority_escalation = true

[colors]
high = "crimson"
"#,
        )
        .unwrap();

        let config = Config::load_from(Some(&path)).unwrap();
        assert_eq!(config.stress.window_filter, WindowFilter::Overlap);
        assert_eq!(config.stress.heavy_day_limit, 2);
        assert!((config.stress.high_density - 0.8).abs() < f64::EPSILON);
        assert!((config.buffers.exam_multiplier - 4.0).abs() < f64::EPSILON);
        assert!(config.buffers.priority_escalation);
        assert!((config.buffers.base_buffer_minutes - 15.0).abs() < f64::EPSILON);
        assert_eq!(config.colors.low, "#22c55e");
        assert_eq!(config.colors.high, "crimson");
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("calm.toml");
        std::fs::write(&path, "[buffers]\nmin_buffer_minutes = 500.0\n").unwrap();

        let err = Config::load_from(Some(&path)).unwrap_err();
        assert!(format!("{err:#}").contains("[buffers]"));
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let temp = tempfile::tempdir().unwrap();
        let err = Config::load_from(Some(&temp.path().join("nope.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }
}
