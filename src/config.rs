use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// Pipeline configuration with tunable thresholds.
///
/// Loaded from an optional JSON file; any field left out keeps its default.
/// Invalid values are fatal: the pipeline refuses to run on a config that
/// fails `validate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Gap that splits viewing sessions.
    pub session_gap_minutes: i64,

    /// Retention window measured backward from now.
    pub retention_years: u32,

    /// Maximum video ids per metadata lookup call (external service limit).
    pub api_batch_size: usize,

    /// Minimum videos in a session for it to count as a binge.
    pub binge_threshold_videos: usize,

    /// Duration category breakpoints: below `short_max_minutes` is Short,
    /// below `medium_max_minutes` is Medium, the rest is Long.
    pub short_max_minutes: f64,
    pub medium_max_minutes: f64,

    /// Rows kept in the top-channels report.
    pub top_channel_limit: usize,

    /// Metadata service credential; with none configured every event takes
    /// the fallback path.
    pub api_key: Option<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            session_gap_minutes: 30,
            retention_years: 3,
            api_batch_size: 50,
            binge_threshold_videos: 3,
            short_max_minutes: 4.0,
            medium_max_minutes: 20.0,
            top_channel_limit: 30,
            api_key: None,
        }
    }
}

impl PipelineConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        let config: PipelineConfig = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config at {}", path.display()))?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.session_gap_minutes <= 0 {
            bail!(
                "session_gap_minutes must be positive, got {}",
                self.session_gap_minutes
            );
        }
        if self.retention_years == 0 {
            bail!("retention_years must be at least 1");
        }
        if self.api_batch_size == 0 || self.api_batch_size > 50 {
            bail!(
                "api_batch_size must be in 1..=50, got {}",
                self.api_batch_size
            );
        }
        if self.binge_threshold_videos == 0 {
            bail!("binge_threshold_videos must be at least 1");
        }
        if self.short_max_minutes <= 0.0 || self.medium_max_minutes <= self.short_max_minutes {
            bail!(
                "duration breakpoints must satisfy 0 < short ({}) < medium ({})",
                self.short_max_minutes,
                self.medium_max_minutes
            );
        }
        if self.top_channel_limit == 0 {
            bail!("top_channel_limit must be at least 1");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(PipelineConfig::default().validate().is_ok());
    }

    #[test]
    fn negative_gap_is_fatal() {
        let config = PipelineConfig {
            session_gap_minutes: -5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn oversized_batch_is_fatal() {
        let config = PipelineConfig {
            api_batch_size: 51,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn inverted_breakpoints_are_fatal() {
        let config = PipelineConfig {
            short_max_minutes: 20.0,
            medium_max_minutes: 4.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let config: PipelineConfig =
            serde_json::from_str(r#"{ "session_gap_minutes": 45 }"#).unwrap();
        assert_eq!(config.session_gap_minutes, 45);
        assert_eq!(config.api_batch_size, 50);
        assert_eq!(config.retention_years, 3);
    }
}
