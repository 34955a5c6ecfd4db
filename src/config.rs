// src/config.rs
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::drivers::{FallbackGenerator, DEFAULT_CHANNEL_COUNT, DEFAULT_WINDOW_LEN};

/// Dashboard settings. Every field has a default, so a config file only lists overrides.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub data_path: PathBuf,
    pub channel_count: usize,
    pub window_len: usize,
    pub replay_interval_ms: u64,
    pub load_timeout_ms: u64,
    pub fallback_points: usize,
    pub fallback_step_secs: f64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        let fallback = FallbackGenerator::default();
        Self {
            data_path: PathBuf::from("data/sensor_data.csv"),
            channel_count: DEFAULT_CHANNEL_COUNT,
            window_len: DEFAULT_WINDOW_LEN,
            replay_interval_ms: 2000,
            load_timeout_ms: 5000,
            fallback_points: fallback.points,
            fallback_step_secs: fallback.step_secs,
        }
    }
}

impl DashboardConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text).context("invalid dashboard config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read config file {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("in {}", path.display()))
    }

    pub fn validate(&self) -> Result<()> {
        if self.channel_count == 0 {
            bail!("channel_count must be greater than zero");
        }
        if self.window_len == 0 {
            bail!("window_len must be greater than zero");
        }
        if self.replay_interval_ms == 0 {
            bail!("replay_interval_ms must be greater than zero");
        }
        if self.fallback_points == 0 || !(self.fallback_step_secs > 0.0) {
            bail!("fallback_points and fallback_step_secs must be positive");
        }
        Ok(())
    }

    pub fn replay_interval(&self) -> Duration {
        Duration::from_millis(self.replay_interval_ms)
    }

    pub fn load_timeout(&self) -> Duration {
        Duration::from_millis(self.load_timeout_ms)
    }

    pub fn fallback(&self) -> FallbackGenerator {
        FallbackGenerator {
            points: self.fallback_points,
            step_secs: self.fallback_step_secs,
        }
    }
}
