//! `stepwise.toml` config loading.

use serde::{Deserialize, Serialize};

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use crate::{DEFAULT_MAX_STEPS, ProblemId, Speed};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Reporter {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Playback speed new sessions start at.
    #[serde(default)]
    pub default_speed: Speed,

    /// Recorder cap; generation aborts past this many steps.
    #[serde(default = "default_max_steps")]
    pub max_steps: usize,

    /// Default reporter for CLI commands.
    #[serde(default = "default_reporter")]
    pub reporter: Reporter,

    /// Base interval overrides in milliseconds, keyed by problem id.
    #[serde(default)]
    pub intervals: BTreeMap<String, u64>,
}

fn default_max_steps() -> usize {
    DEFAULT_MAX_STEPS
}

fn default_reporter() -> Reporter {
    Reporter::Pretty
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_speed: Speed::default(),
            max_steps: default_max_steps(),
            reporter: default_reporter(),
            intervals: BTreeMap::new(),
        }
    }
}

impl Config {
    pub fn load_optional(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(s) => match toml::from_str::<Config>(&s) {
                Ok(cfg) => cfg,
                Err(err) => {
                    tracing::warn!("failed to parse config {}: {err}", path.display());
                    Self::default()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(err) => {
                tracing::warn!("failed to read config {}: {err}", path.display());
                Self::default()
            }
        }
    }

    /// Per-step display time at 1x for `id`, honoring `[intervals]`.
    pub fn base_interval(&self, id: ProblemId) -> Duration {
        self.intervals
            .get(id.as_str())
            .map(|ms| Duration::from_millis(*ms))
            .unwrap_or_else(|| id.meta().base_interval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let path = std::env::temp_dir().join(format!("stepwise-missing-{}.toml", uuid::Uuid::new_v4()));
        let cfg = Config::load_optional(&path);
        assert_eq!(cfg.max_steps, DEFAULT_MAX_STEPS);
        assert_eq!(cfg.default_speed, Speed::NORMAL);
        assert_eq!(cfg.reporter, Reporter::Pretty);
    }

    #[test]
    fn parses_all_keys() {
        let cfg: Config = toml::from_str(
            r#"
default_speed = 1.5
max_steps = 500
reporter = "json"

[intervals]
two_sum = 250
"#,
        )
        .expect("parse");
        assert_eq!(cfg.default_speed, Speed::new(1.5).expect("speed"));
        assert_eq!(cfg.max_steps, 500);
        assert_eq!(cfg.reporter, Reporter::Json);
        assert_eq!(cfg.base_interval(ProblemId::TwoSum), Duration::from_millis(250));
        assert_eq!(
            cfg.base_interval(ProblemId::BinarySearch),
            ProblemId::BinarySearch.meta().base_interval
        );
    }

    #[test]
    fn off_grid_speed_falls_back_to_defaults() {
        let dir = std::env::temp_dir().join(format!("stepwise-config-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).expect("mkdir");
        let path = dir.join("stepwise.toml");
        std::fs::write(&path, "default_speed = 0.3\n").expect("write");
        let cfg = Config::load_optional(&path);
        assert_eq!(cfg.default_speed, Speed::NORMAL);
        std::fs::remove_dir_all(&dir).expect("cleanup");
    }
}
